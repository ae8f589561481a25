//! # Resolução da Recomendação
//!
//! Junta a saída do [`RuleEngine`](super::RuleEngine) com os defaults do
//! frame detectado para chegar a **um** tipo de ração recomendado.
//!
//! ## Política
//!
//! 1. O tipo recomendado é o `Recommend` do **primeiro** consequente (na
//!    ordem das regras) que declara um. Sem nenhum, vale o
//!    `recommended_feed_type` do frame detectado.
//! 2. **Política de orçamento baixo** (não é uma regra da KB): com
//!    orçamento `"low"` e nenhum consequente já recomendando
//!    "Alternative Feed Mix", um consequente sintético é anexado ao fim
//!    da lista. O tipo do passo 1 é resolvido antes desta injeção.
//!
//! Avisos, conselhos e lembretes continuam por regra, sem deduplicação.

use super::rules::MatchedRule;
use crate::core::{ChickenFrame, Consequent};

/// Ração alternativa injetada pela política de orçamento baixo.
pub const ALTERNATIVE_FEED_MIX: &str = "Alternative Feed Mix";

/// Nome usado para marcar o consequente sintético.
pub const LOW_BUDGET_POLICY: &str = "Policy_Low_Budget";

const LOW_BUDGET_ADVICE: &str = "Use maize bran + fishmeal as cheaper substitute.";

/// Tipo de ração primário: primeiro `Recommend` das regras, senão o
/// default do frame (ou vazio sem frame).
pub fn primary_feed_type(matched: &[MatchedRule], frame: Option<&ChickenFrame>) -> String {
    matched
        .iter()
        .find_map(|m| m.consequent.recommend.clone())
        .or_else(|| frame.map(|f| f.recommended_feed_type.clone()))
        .unwrap_or_default()
}

/// `true` quando o orçamento informado é "low" (sem diferenciar caixa).
pub fn is_low_budget(budget: &str) -> bool {
    budget.trim().eq_ignore_ascii_case("low")
}

/// Anexa o consequente da política de orçamento baixo, se aplicável.
///
/// Retorna `true` quando a injeção aconteceu.
pub fn apply_budget_policy(matched: &mut Vec<MatchedRule>, budget: &str) -> bool {
    if !is_low_budget(budget) {
        return false;
    }
    let already_recommended = matched.iter().any(|m| {
        m.consequent
            .recommend
            .as_deref()
            .is_some_and(|r| r.contains(ALTERNATIVE_FEED_MIX))
    });
    if already_recommended {
        return false;
    }

    tracing::debug!("Resolver: política de orçamento baixo aplicada");
    matched.push(MatchedRule {
        rule: LOW_BUDGET_POLICY.to_string(),
        consequent: Consequent {
            recommend: Some(ALTERNATIVE_FEED_MIX.to_string()),
            advice: Some(LOW_BUDGET_ADVICE.to_string()),
            ..Consequent::default()
        },
    });
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::KnowledgeBase;

    fn matched(rule: &str, recommend: Option<&str>) -> MatchedRule {
        MatchedRule {
            rule: rule.into(),
            consequent: Consequent {
                recommend: recommend.map(str::to_string),
                ..Consequent::default()
            },
        }
    }

    #[test]
    fn first_recommendation_wins() {
        let list = vec![
            matched("R_Water_Requirement", None),
            matched("R_Layer_Feed", Some("Layers Mash")),
            matched("R_Layer_LowProduction", Some("Grower Mash")),
        ];
        assert_eq!(primary_feed_type(&list, None), "Layers Mash");
    }

    #[test]
    fn falls_back_to_frame_default() {
        let kb = KnowledgeBase::embedded().unwrap();
        let list = vec![matched("R_Water_Requirement", None)];
        assert_eq!(
            primary_feed_type(&list, kb.frame("Layer")),
            "Layers' Mash"
        );
        assert_eq!(primary_feed_type(&list, None), "");
    }

    #[test]
    fn low_budget_appends_alternative_mix() {
        let mut list = vec![matched("R_Layer_Feed", Some("Layers Mash"))];
        assert!(apply_budget_policy(&mut list, " LOW "));
        let last = list.last().unwrap();
        assert_eq!(last.rule, LOW_BUDGET_POLICY);
        assert_eq!(last.consequent.recommend.as_deref(), Some(ALTERNATIVE_FEED_MIX));
        assert!(last.consequent.advice.is_some());
    }

    #[test]
    fn low_budget_does_not_duplicate_existing_mix() {
        let mut list = vec![matched("R_Emergency_Filler", Some("Alternative Feed Mix"))];
        assert!(!apply_budget_policy(&mut list, "low"));
        assert_eq!(list.len(), 1);
    }

    #[test]
    fn other_budgets_leave_list_untouched() {
        let mut list = vec![matched("R_Layer_Feed", Some("Layers Mash"))];
        assert!(!apply_budget_policy(&mut list, "high"));
        assert!(!apply_budget_policy(&mut list, ""));
        assert_eq!(list.len(), 1);
    }
}
