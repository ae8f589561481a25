//! # Frames — Registros Estruturados do Conhecimento Avícola
//!
//! Um *frame* descreve, de forma declarativa, tudo o que o sistema sabe
//! sobre uma entidade do domínio:
//!
//! - [`ChickenFrame`] — uma fase de vida (Chick, Pullet, Layer, Broiler …)
//! - [`RecipeFrame`] — uma fórmula de ração para um lote de referência
//! - [`IngredientFrame`] — um ingrediente com proteína bruta e preço
//!
//! ## Definição de Idade
//!
//! A idade de cada fase é descrita por [`AgeStage`], que pode ser:
//!
//! ```text
//! { "fuzzy": { "growing": [2, 5, 9] } }   → conjuntos triangulares (a, b, c)
//! { "weeks": "0-8" }                      → faixa crisp (só informativa)
//! ```
//!
//! Conjuntos fuzzy malformados **não** impedem o carregamento: ficam
//! guardados como [`TriangleSpec::Invalid`] e valem grau 0 na fuzzificação.

use std::sync::LazyLock;

use indexmap::IndexMap;
use regex::Regex;
use serde::{Deserialize, Serialize};

/// Faixa crisp `"low-high"` em semanas (aceita decimais: `"0-1.5"`).
static CRISP_RANGE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*(\d+(?:\.\d+)?)\s*-\s*(\d+(?:\.\d+)?)\s*$").expect("crisp range regex")
});

/// Pontos de controle de um conjunto fuzzy triangular, como vieram do JSON.
///
/// Aceita um array `[a, b, c]` ou um texto `"a,b,c"` / `"a-b-c"`.
/// Qualquer outro formato é preservado em `Invalid`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TriangleSpec {
    Points(Vec<f64>),
    Text(String),
    Invalid(serde_json::Value),
}

impl TriangleSpec {
    /// Extrai `(a, b, c)` com `a ≤ b ≤ c`, ou `None` se malformado.
    pub fn points(&self) -> Option<(f64, f64, f64)> {
        let values: Vec<f64> = match self {
            TriangleSpec::Points(v) => v.clone(),
            TriangleSpec::Text(s) => {
                let parsed: Option<Vec<f64>> = s
                    .split(|c: char| c == ',' || c == ';' || c == '-' || c.is_whitespace())
                    .filter(|part| !part.is_empty())
                    .map(|part| part.parse::<f64>().ok())
                    .collect();
                parsed?
            }
            TriangleSpec::Invalid(_) => return None,
        };

        match values.as_slice() {
            [a, b, c]
                if a.is_finite() && b.is_finite() && c.is_finite() && a <= b && b <= c =>
            {
                Some((*a, *b, *c))
            }
            _ => None,
        }
    }
}

/// Definição da faixa etária de uma fase de vida.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AgeStage {
    /// Conjuntos fuzzy rotulados, na ordem declarada.
    Fuzzy { fuzzy: IndexMap<String, TriangleSpec> },
    /// Faixa crisp `"low-high"` em semanas.
    Crisp { weeks: String },
}

impl AgeStage {
    /// Limites da faixa crisp, se for o caso e se o texto for válido.
    pub fn crisp_bounds(&self) -> Option<(f64, f64)> {
        let AgeStage::Crisp { weeks } = self else {
            return None;
        };
        let caps = CRISP_RANGE_RE.captures(weeks)?;
        let low = caps[1].parse::<f64>().ok()?;
        let high = caps[2].parse::<f64>().ok()?;
        Some((low, high))
    }

    /// Descrição curta para listagens (`"0-8 weeks"`, `"growing, peak"`).
    pub fn describe(&self) -> String {
        match self {
            AgeStage::Crisp { weeks } => match self.crisp_bounds() {
                Some((low, high)) => format!("{}-{} weeks", low, high),
                None => format!("{} (invalid)", weeks.trim()),
            },
            AgeStage::Fuzzy { fuzzy } => fuzzy
                .iter()
                .map(|(label, spec)| match spec.points() {
                    Some((a, b, c)) => format!("{} ({}/{}/{})", label, a, b, c),
                    None => format!("{} (invalid)", label),
                })
                .collect::<Vec<_>>()
                .join(", "),
        }
    }
}

/// Frame de uma fase de vida da ave.
///
/// Imutável após o carregamento da [`KnowledgeBase`](super::KnowledgeBase).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ChickenFrame {
    /// Definição de idade (fuzzy ou crisp).
    pub age_stage: AgeStage,
    /// Objetivo principal — "Growth", "Egg Production", "Meat Production".
    #[serde(default)]
    pub primary_goal: String,
    /// Ração padrão quando nenhuma regra recomenda outra.
    #[serde(default)]
    pub recommended_feed_type: String,
    /// Faixas de DCP rotuladas (ex: `"Starter_DCP": "20-22%"`).
    #[serde(default)]
    pub protein_requirement_dcp: IndexMap<String, String>,
    /// Consumo diário em gramas por ave.
    #[serde(default)]
    pub daily_feed_consumption_g: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_feed_per_stage_kg: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub calcium_requirement: Option<String>,
}

impl ChickenFrame {
    /// `true` para frames da linhagem de corte (broilers).
    ///
    /// Um frame é de corte quando o objetivo menciona "meat" ou quando a
    /// chave menciona "broiler".
    pub fn is_meat_lineage(&self, key: &str) -> bool {
        self.primary_goal.to_lowercase().contains("meat")
            || key.to_lowercase().contains("broiler")
    }
}

/// Frame de receita — quantidades em kg para um lote de referência.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RecipeFrame {
    /// Label do tipo de ração/fase a que a receita se destina.
    pub target_type: String,
    #[serde(default)]
    pub target_dcp: String,
    /// Ingrediente → kg, na ordem declarada.
    pub ingredients: IndexMap<String, f64>,
    /// Peso do lote de referência das quantidades.
    #[serde(default = "default_reference_batch_kg")]
    pub reference_batch_kg: f64,
}

/// Lote de referência padrão das receitas (70 kg).
pub const DEFAULT_BATCH_KG: f64 = 70.0;

fn default_reference_batch_kg() -> f64 {
    DEFAULT_BATCH_KG
}

/// Frame de ingrediente com dados nutricionais e de preço.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct IngredientFrame {
    /// Categoria ("Grain", "Protein Supplement", "Mineral Supplement" …).
    #[serde(default)]
    pub category: String,
    /// Proteína bruta (%).
    #[serde(default)]
    pub crude_protein_pct: f64,
    /// Preço por kg (KES). Ausente conta como 0.
    #[serde(default)]
    pub price_per_kg: f64,
    #[serde(default)]
    pub preparation: String,
    #[serde(default)]
    pub quality_control: String,
}
