//! # Persistência — Carregamento da KB do Disco
//!
//! A [`KnowledgeBase`] é lida uma única vez na inicialização, a partir de
//! um arquivo JSON (por padrão `data/knowledge_base.json`).
//!
//! ## Ordem de Carregamento
//!
//! ```text
//! arquivo existe?  ── sim → lê + desserializa (erro → propagado com contexto)
//!        │
//!        └─ não → KB embutida no binário (include_str!)
//! ```
//!
//! Quem chama decide o que fazer com um erro; o `main` registra um `warn`
//! e cai para a KB embutida.

use std::path::Path;

use anyhow::{Context, Result};

use crate::core::KnowledgeBase;

/// Carrega a KB de `path`, ou a embutida se o arquivo não existir.
///
/// # Erros
///
/// Retorna erro se o arquivo existir mas não puder ser lido ou estiver
/// corrompido/incompatível com o formato atual.
pub fn load_kb(path: impl AsRef<Path>) -> Result<KnowledgeBase> {
    let path = path.as_ref();
    if !path.exists() {
        tracing::info!(path = %path.display(), "Nenhum arquivo de KB encontrado, usando a KB embutida");
        return KnowledgeBase::embedded().context("Falha ao interpretar a KB embutida");
    }
    let json = std::fs::read_to_string(path)
        .with_context(|| format!("Falha ao ler {}", path.display()))?;
    let kb = KnowledgeBase::from_json(&json)
        .with_context(|| format!("Falha ao desserializar {}", path.display()))?;
    Ok(kb)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn temp_path(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("feed-advisor-{}-{}", std::process::id(), name))
    }

    #[test]
    fn missing_file_falls_back_to_embedded() {
        let kb = load_kb(temp_path("does-not-exist.json")).unwrap();
        assert_eq!(kb, KnowledgeBase::embedded().unwrap());
    }

    #[test]
    fn reads_custom_file() {
        let path = temp_path("custom.json");
        std::fs::write(
            &path,
            r#"{"ingredients": {"Maize": {"category": "Grain", "crude_protein_pct": 8, "price_per_kg": 40, "preparation": "", "quality_control": ""}}}"#,
        )
        .unwrap();
        let kb = load_kb(&path).unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!(kb.frame_count(), 0);
        assert_eq!(kb.ingredient_count(), 1);
        assert_eq!(kb.ingredients["Maize"].price_per_kg, 40.0);
    }

    #[test]
    fn corrupted_file_is_an_error() {
        let path = temp_path("corrupted.json");
        std::fs::write(&path, "{ not json").unwrap();
        let result = load_kb(&path);
        std::fs::remove_file(&path).ok();

        let err = result.unwrap_err();
        assert!(format!("{:#}", err).contains("Falha ao desserializar"));
    }

    #[test]
    fn partly_malformed_file_keeps_its_good_entries() {
        let path = temp_path("partly-malformed.json");
        std::fs::write(
            &path,
            r#"{
                "rules": [
                    {"name": "R_Chick", "priority": 1, "if": {"Type": "Chick"}, "then": {"Recommend": "Chick Mash"}},
                    {"name": "R_Bad_Age", "if": {"Age_Weeks": [20, 40, 76]}, "then": {"Recommend": "Never"}},
                    {"name": "R_Bad_Priority", "priority": "high", "if": {"Any": true}, "then": {"Reminder": "Vaccinate"}}
                ],
                "ingredients": {
                    "Maize": {"category": "Grain", "crude_protein_pct": 8},
                    "Fishmeal": {"category": "Protein Supplement", "price_per_kg": 120}
                }
            }"#,
        )
        .unwrap();
        let result = load_kb(&path);
        std::fs::remove_file(&path).ok();

        let kb = result.unwrap();
        assert_eq!(kb.rule_count(), 3);
        assert_eq!(kb.rules[0].priority, Some(1));
        assert_eq!(kb.rules[2].priority, None);
        assert_eq!(kb.ingredients["Maize"].price_per_kg, 0.0);
        assert_eq!(kb.ingredients["Fishmeal"].price_per_kg, 120.0);
        assert_ne!(kb, KnowledgeBase::embedded().unwrap());
    }
}
