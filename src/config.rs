//! # Configuração — Variáveis de Ambiente
//!
//! | Variável | Padrão | Uso |
//! |----------|--------|-----|
//! | `FEED_ADVISOR_ADDR` | `0.0.0.0:3000` | Endereço do servidor HTTP |
//! | `FEED_ADVISOR_KB_PATH` | `data/knowledge_base.json` | Arquivo da KB |
//! | `FEED_ADVISOR_BATCH_KG` | `70` | Lote padrão para custos |
//!
//! O nível de log continua vindo de `RUST_LOG` (ver `main`).

use std::path::PathBuf;

use crate::core::frames::DEFAULT_BATCH_KG;

const ADDR_VAR: &str = "FEED_ADVISOR_ADDR";
const KB_PATH_VAR: &str = "FEED_ADVISOR_KB_PATH";
const BATCH_KG_VAR: &str = "FEED_ADVISOR_BATCH_KG";

const DEFAULT_ADDR: &str = "0.0.0.0:3000";
const DEFAULT_KB_PATH: &str = "data/knowledge_base.json";

/// Configuração da aplicação.
#[derive(Clone, Debug, PartialEq)]
pub struct Settings {
    pub addr: String,
    pub kb_path: PathBuf,
    pub batch_weight_kg: f64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            addr: DEFAULT_ADDR.to_string(),
            kb_path: PathBuf::from(DEFAULT_KB_PATH),
            batch_weight_kg: DEFAULT_BATCH_KG,
        }
    }
}

impl Settings {
    /// Lê a configuração do ambiente do processo.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Monta a configuração a partir de uma função de consulta.
    ///
    /// Valores vazios são ignorados; lotes inválidos (não numéricos ou
    /// não positivos) geram `warn` e mantêm o padrão.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut settings = Self::default();
        let value = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        if let Some(addr) = value(ADDR_VAR) {
            settings.addr = addr;
        }
        if let Some(path) = value(KB_PATH_VAR) {
            settings.kb_path = PathBuf::from(path);
        }
        if let Some(raw) = value(BATCH_KG_VAR) {
            match raw.parse::<f64>() {
                Ok(kg) if kg.is_finite() && kg > 0.0 => settings.batch_weight_kg = kg,
                _ => tracing::warn!(
                    var = BATCH_KG_VAR,
                    value = %raw,
                    default = DEFAULT_BATCH_KG,
                    "Lote inválido, usando o padrão"
                ),
            }
        }
        settings
    }
}
