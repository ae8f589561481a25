//! # Facts — Fatos Derivados de Cada Requisição
//!
//! O conjunto de [`Facts`] é a "memória de trabalho" do sistema especialista:
//! um mapa ordenado `chave → valor` montado a cada chamada de
//! [`FeedAdvisor::recommend`](crate::advisor::FeedAdvisor::recommend) e
//! descartado logo depois.
//!
//! ## Chaves Conhecidas
//!
//! | Chave | Origem | Exemplo |
//! |-------|--------|---------|
//! | `Type` | Frame detectado | `"Layer"` |
//! | `Age_Weeks` | Requisição | `25` |
//! | `Reason` | Requisição | `"Eggs"` |
//! | `Age_Fuzzy` | Melhor label fuzzy | `"productive"` |
//! | `EggProduction` | Requisição (opcional) | `"40%"` |
//! | `Health` | Requisição (opcional) | `"Sick"` |
//! | `FeedCost` | Requisição (opcional) | `"High"` |

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Chave do frame detectado.
pub const TYPE: &str = "Type";
/// Idade em semanas.
pub const AGE_WEEKS: &str = "Age_Weeks";
/// Motivo da criação (ovos, carne).
pub const REASON: &str = "Reason";
/// Label fuzzy com maior grau de pertinência.
pub const AGE_FUZZY: &str = "Age_Fuzzy";
/// Taxa de postura (ex: `"40%"`).
pub const EGG_PRODUCTION: &str = "EggProduction";
/// Estado de saúde do lote.
pub const HEALTH: &str = "Health";
/// Tag de custo de ração.
pub const FEED_COST: &str = "FeedCost";

/// Valor de um fato — texto, número ou flag booleana.
///
/// A comparação de igualdade é **exata** e não converte entre variantes:
/// `Text("25")` é diferente de `Number(25.0)`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FactValue {
    Flag(bool),
    Number(f64),
    Text(String),
}

impl FactValue {
    /// Interpreta o valor como número.
    ///
    /// Textos são convertidos após remover espaços e um `%` final
    /// (`"40%"` → `40.0`). Flags nunca são numéricas.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            FactValue::Number(n) => Some(*n),
            FactValue::Text(s) => parse_numeric(s),
            FactValue::Flag(_) => None,
        }
    }
}

impl From<f64> for FactValue {
    fn from(value: f64) -> Self {
        FactValue::Number(value)
    }
}

impl From<&str> for FactValue {
    fn from(value: &str) -> Self {
        FactValue::Text(value.to_string())
    }
}

impl From<String> for FactValue {
    fn from(value: String) -> Self {
        FactValue::Text(value)
    }
}

/// Converte `"40"`, `"40%"` ou `" 12.5 % "` em número.
///
/// Retorna `None` para qualquer coisa que não seja um número finito.
pub fn parse_numeric(text: &str) -> Option<f64> {
    let trimmed = text.trim();
    let trimmed = trimmed.strip_suffix('%').unwrap_or(trimmed).trim();
    trimmed.parse::<f64>().ok().filter(|n| n.is_finite())
}

/// Memória de trabalho de uma requisição — mapa ordenado de fatos.
///
/// A ordem de inserção é preservada apenas para exibição; o motor de
/// regras consulta os fatos por chave.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Facts(IndexMap<String, FactValue>);

impl Facts {
    pub fn new() -> Self {
        Self(IndexMap::new())
    }

    /// Insere (ou substitui) um fato.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<FactValue>) {
        self.0.insert(key.into(), value.into());
    }

    /// Variante encadeável de [`insert`](Facts::insert).
    #[cfg(test)]
    pub fn with(mut self, key: impl Into<String>, value: impl Into<FactValue>) -> Self {
        self.insert(key, value);
        self
    }

    pub fn get(&self, key: &str) -> Option<&FactValue> {
        self.0.get(key)
    }

    /// Atalho para fatos textuais (ex: `Type`).
    #[cfg(test)]
    pub fn text(&self, key: &str) -> Option<&str> {
        match self.0.get(key) {
            Some(FactValue::Text(s)) => Some(s.as_str()),
            _ => None,
        }
    }

    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[cfg(test)]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}
