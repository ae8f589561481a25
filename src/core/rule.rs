//! # Rule — Regras de Produção da Base de Conhecimento
//!
//! Cada [`Rule`] tem a forma clássica **SE condições ENTÃO consequente**:
//!
//! ```json
//! {
//!   "name": "R_Layer_LowProduction",
//!   "if":   { "Type": "Layer", "Age_Weeks": [20, 76], "EggProduction": "<50%" },
//!   "then": { "Recommend": "Grower Mash", "DCP": "16-18%" }
//! }
//! ```
//!
//! ## Taxonomia de Predicados
//!
//! O valor de cada condição é convertido, na desserialização, em um
//! [`Predicate`] fechado:
//!
//! | JSON | Predicado | Verdadeiro quando |
//! |------|-----------|-------------------|
//! | `[low, high]` | [`Range`](Predicate::Range) | `low ≤ fato ≤ high` |
//! | `"<50%"` | [`Below`](Predicate::Below) | `fato < 50` |
//! | texto/número/bool | [`Equals`](Predicate::Equals) | `fato == valor` |
//! | qualquer outro | [`Invalid`](Predicate::Invalid) | nunca |
//!
//! A chave especial `"Any"` é um curinga: vale sempre, independente do valor.
//!
//! Condições malformadas (ex: `[20, 40, 76]`) não derrubam a regra na
//! carga: viram `Invalid` e a regra simplesmente nunca casa.

use indexmap::IndexMap;
use serde::{Deserialize, Deserializer, Serialize};

use super::facts::{parse_numeric, FactValue};

/// Chave curinga — a condição é sempre satisfeita.
pub const WILDCARD: &str = "Any";

/// Predicado de uma condição, já classificado.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(from = "RawPredicate", into = "RawPredicate")]
pub enum Predicate {
    /// Intervalo numérico fechado `[low, high]`.
    Range { low: f64, high: f64 },
    /// Limiar estrito `"<N"`. `threshold` é `None` quando o texto não tem número.
    Below { threshold: Option<f64>, raw: String },
    /// Igualdade exata.
    Equals(FactValue),
    /// Valor que não forma nenhum predicado conhecido; sempre falso.
    Invalid(serde_json::Value),
}

/// Forma "crua" do predicado no JSON.
#[derive(Clone, Serialize, Deserialize)]
#[serde(untagged)]
enum RawPredicate {
    Range([f64; 2]),
    Value(FactValue),
    Other(serde_json::Value),
}

impl From<RawPredicate> for Predicate {
    fn from(raw: RawPredicate) -> Self {
        match raw {
            RawPredicate::Range([low, high]) => Predicate::Range { low, high },
            RawPredicate::Value(FactValue::Text(text)) if text.trim_start().starts_with('<') => {
                let threshold = parse_numeric(&text.trim_start()[1..]);
                Predicate::Below {
                    threshold,
                    raw: text,
                }
            }
            RawPredicate::Value(value) => Predicate::Equals(value),
            RawPredicate::Other(value) => Predicate::Invalid(value),
        }
    }
}

impl From<Predicate> for RawPredicate {
    fn from(predicate: Predicate) -> Self {
        match predicate {
            Predicate::Range { low, high } => RawPredicate::Range([low, high]),
            Predicate::Below { raw, .. } => RawPredicate::Value(FactValue::Text(raw)),
            Predicate::Equals(value) => RawPredicate::Value(value),
            Predicate::Invalid(value) => RawPredicate::Other(value),
        }
    }
}

impl Predicate {
    /// Avalia o predicado contra o valor de um fato.
    ///
    /// Falhas de conversão numérica tornam o predicado falso; nunca há erro.
    pub fn evaluate(&self, fact: &FactValue) -> bool {
        match self {
            Predicate::Range { low, high } => fact
                .as_number()
                .is_some_and(|value| *low <= value && value <= *high),
            Predicate::Below { threshold, .. } => match (threshold, fact.as_number()) {
                (Some(threshold), Some(value)) => value < *threshold,
                _ => false,
            },
            Predicate::Equals(expected) => fact == expected,
            Predicate::Invalid(_) => false,
        }
    }
}

/// Consequente ("então") de uma regra.
///
/// Todos os campos são opcionais; o [`RuleEngine`](crate::inference::RuleEngine)
/// os devolve sem mesclar.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Consequent {
    #[serde(rename = "Recommend", default, skip_serializing_if = "Option::is_none")]
    pub recommend: Option<String>,
    #[serde(rename = "DCP", default, skip_serializing_if = "Option::is_none")]
    pub dcp: Option<String>,
    #[serde(rename = "Warning", default, skip_serializing_if = "Option::is_none")]
    pub warning: Option<String>,
    #[serde(rename = "Advice", default, skip_serializing_if = "Option::is_none")]
    pub advice: Option<String>,
    #[serde(rename = "Reminder", default, skip_serializing_if = "Option::is_none")]
    pub reminder: Option<String>,
    #[serde(rename = "Daily_Feed_g", default, skip_serializing_if = "Option::is_none")]
    pub daily_feed_g: Option<f64>,
}

/// Regra de produção.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Rule {
    pub name: String,
    /// Apenas informativa — a ordem de avaliação é a ordem de declaração.
    /// Valores que não são inteiros não negativos viram `None`.
    #[serde(
        default,
        deserialize_with = "lenient_priority",
        skip_serializing_if = "Option::is_none"
    )]
    pub priority: Option<u32>,
    #[serde(rename = "if", default)]
    pub conditions: IndexMap<String, Predicate>,
    #[serde(rename = "then", default)]
    pub consequent: Consequent,
}

fn lenient_priority<'de, D>(deserializer: D) -> Result<Option<u32>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(value.as_u64().and_then(|n| u32::try_from(n).ok()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn predicate(json: &str) -> Predicate {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn classifies_predicates() {
        assert_eq!(
            predicate("[20, 76]"),
            Predicate::Range {
                low: 20.0,
                high: 76.0
            }
        );
        assert_eq!(
            predicate("\"<50%\""),
            Predicate::Below {
                threshold: Some(50.0),
                raw: "<50%".into()
            }
        );
        assert_eq!(
            predicate("\"Layer\""),
            Predicate::Equals(FactValue::Text("Layer".into()))
        );
        assert_eq!(predicate("true"), Predicate::Equals(FactValue::Flag(true)));
    }

    #[test]
    fn below_with_garbage_threshold_is_false() {
        let p = predicate("\"<lots\"");
        assert!(matches!(p, Predicate::Below { threshold: None, .. }));
        assert!(!p.evaluate(&FactValue::Text("10%".into())));
    }

    #[test]
    fn below_is_strict_and_strips_percent() {
        let p = predicate("\"<50%\"");
        assert!(p.evaluate(&FactValue::Text("40%".into())));
        assert!(p.evaluate(&FactValue::Number(49.9)));
        assert!(!p.evaluate(&FactValue::Text("50%".into())));
        assert!(!p.evaluate(&FactValue::Text("unknown".into())));
    }

    #[test]
    fn range_is_inclusive() {
        let p = predicate("[0, 8]");
        assert!(p.evaluate(&FactValue::Number(0.0)));
        assert!(p.evaluate(&FactValue::Number(8.0)));
        assert!(!p.evaluate(&FactValue::Number(8.01)));
        assert!(!p.evaluate(&FactValue::Text("young".into())));
    }

    #[test]
    fn equality_is_exact() {
        let p = predicate("\"Sick\"");
        assert!(p.evaluate(&FactValue::Text("Sick".into())));
        assert!(!p.evaluate(&FactValue::Text("sick".into())));
        assert!(!p.evaluate(&FactValue::Number(1.0)));
    }

    #[test]
    fn rule_round_trips_raw_threshold() {
        let rule: Rule = serde_json::from_str(
            r#"{"name": "R", "if": {"EggProduction": "<50%"}, "then": {"Advice": "x"}}"#,
        )
        .unwrap();
        let json = serde_json::to_value(&rule).unwrap();
        assert_eq!(json["if"]["EggProduction"], "<50%");
    }

    #[test]
    fn malformed_condition_never_matches() {
        let p = predicate("[20, 40, 76]");
        assert!(matches!(p, Predicate::Invalid(_)));
        assert!(!p.evaluate(&FactValue::Number(30.0)));
        assert!(!p.evaluate(&FactValue::Text("30".into())));

        let p = predicate(r#"{"min": 20}"#);
        assert!(matches!(p, Predicate::Invalid(_)));
    }

    #[test]
    fn priority_is_read_leniently() {
        let rule: Rule = serde_json::from_str(
            r#"{"name": "R", "priority": "high", "if": {"Any": true}, "then": {}}"#,
        )
        .unwrap();
        assert_eq!(rule.priority, None);
        let rule: Rule = serde_json::from_str(r#"{"name": "R", "priority": 3}"#).unwrap();
        assert_eq!(rule.priority, Some(3));
        let rule: Rule = serde_json::from_str(r#"{"name": "R", "priority": -1}"#).unwrap();
        assert_eq!(rule.priority, None);
    }
}
