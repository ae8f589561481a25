//! # Motor de Regras de Produção
//!
//! Avalia as [`Rule`]s da [`KnowledgeBase`] contra os [`Facts`] de uma
//! requisição e devolve **todos** os consequentes das regras satisfeitas.
//!
//! ## Como Funciona
//!
//! ```text
//! para cada regra, na ordem declarada:
//!   para cada condição (chave → predicado):
//!     chave "Any"          → verdadeiro
//!     fato ausente         → regra NÃO casa
//!     senão                → predicado.evaluate(fato)
//!   todas verdadeiras? → consequente vai para a saída
//! ```
//!
//! A ordem da saída é a ordem de declaração das regras — o
//! [`resolver`](super::resolver) depende disso para o desempate.
//!
//! ## Exemplo
//!
//! ```text
//! Fatos: Type=Layer, Age_Weeks=25, EggProduction="40%"
//! ─────────────────────────────────────────────
//! R_Layer_Feed          ✓ → Recommend "Layers Mash"
//! R_Layer_LowProduction ✓ → Recommend "Grower Mash" (40 < 50)
//! R_Water_Requirement   ✓ → Reminder …
//! ```

use serde::{Deserialize, Serialize};

use crate::core::rule::WILDCARD;
use crate::core::{Consequent, Facts, KnowledgeBase, Predicate, Rule};

/// Consequente de uma regra satisfeita, marcado com o nome da regra.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MatchedRule {
    /// Nome da regra de origem (rastreabilidade).
    pub rule: String,
    #[serde(flatten)]
    pub consequent: Consequent,
}

/// Motor de regras — struct sem estado, totalmente funcional.
///
/// Recebe a KB por referência e não guarda nada entre chamadas, o que
/// permite uso concorrente sem sincronização.
pub struct RuleEngine;

impl RuleEngine {
    /// Aplica todas as regras da KB aos fatos.
    ///
    /// Determinístico: mesmos fatos e mesma ordem de regras produzem a
    /// mesma saída.
    pub fn apply(kb: &KnowledgeBase, facts: &Facts) -> Vec<MatchedRule> {
        let matched: Vec<MatchedRule> = kb
            .rules
            .iter()
            .filter(|rule| Self::matches(rule, facts))
            .map(|rule| {
                tracing::debug!(rule = %rule.name, "Regras: regra satisfeita");
                MatchedRule {
                    rule: rule.name.clone(),
                    consequent: rule.consequent.clone(),
                }
            })
            .collect();
        tracing::debug!(
            evaluated = kb.rules.len(),
            matched = matched.len(),
            "Regras: ciclo concluído"
        );
        matched
    }

    /// `true` se todas as condições da regra valem para os fatos.
    pub fn matches(rule: &Rule, facts: &Facts) -> bool {
        rule.conditions
            .iter()
            .all(|(key, predicate)| condition_holds(key, predicate, facts))
    }
}

fn condition_holds(key: &str, predicate: &Predicate, facts: &Facts) -> bool {
    if key == WILDCARD {
        return true;
    }
    match facts.get(key) {
        Some(fact) => predicate.evaluate(fact),
        None => false,
    }
}
