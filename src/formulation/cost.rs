//! # Calculadora de Custo
//!
//! Precifica a lista de ingredientes de uma receita para um lote de
//! determinado peso.
//!
//! ## Fórmulas
//!
//! ```text
//! escala        = lote / lote_referência        (1.0 no lote padrão de 70 kg)
//! quantidade_i  = kg_i × escala
//! custo_i       = round2(preço_i × quantidade_i)
//! total         = round2(Σ preço_i × quantidade_i)
//! custo_por_kg  = round2(total / lote)          (0 se lote ≤ 0)
//! ```
//!
//! ## Resolução de Preço (primeiro acerto vence)
//!
//! 1. Chave exata
//! 2. Igualdade sem diferenciar caixa
//! 3. Substring em qualquer direção
//! 4. Igualdade após remover sufixo entre parênteses
//!    ("Fishmeal" ↔ "Fishmeal (Omena)")
//!
//! Ingredientes não resolvidos custam 0.0, mas **continuam** no detalhamento.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use super::recipe::normalize_label;
use crate::core::{KnowledgeBase, RecipeFrame};

/// Preço resolvido para um nome de ingrediente.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PriceMatch {
    /// Chave do ingrediente na KB que forneceu o preço.
    pub ingredient: String,
    pub price_per_kg: f64,
}

/// Linha do detalhamento de custo.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct IngredientCost {
    pub amount_kg: f64,
    pub price_per_kg: f64,
    pub cost: f64,
    /// Ingrediente da KB usado no preço; `None` quando não resolvido.
    pub priced_as: Option<String>,
}

/// Detalhamento de custo de uma receita.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct CostBreakdown {
    pub batch_weight_kg: f64,
    pub ingredients: IndexMap<String, IngredientCost>,
    pub total_cost: f64,
    pub cost_per_kg: f64,
}

impl CostBreakdown {
    /// Detalhamento zerado (receita desconhecida ou ausente).
    pub fn empty(batch_weight_kg: f64) -> Self {
        Self {
            batch_weight_kg,
            ..Self::default()
        }
    }
}

/// Arredonda para 2 casas decimais.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Remove um sufixo entre parênteses: "Fishmeal (Omena)" → "Fishmeal".
fn strip_parenthetical(name: &str) -> &str {
    match name.find('(') {
        Some(idx) => name[..idx].trim(),
        None => name.trim(),
    }
}

/// Resolve o preço por kg de um ingrediente.
pub fn price_ingredient(kb: &KnowledgeBase, name: &str) -> Option<PriceMatch> {
    let found = |key: &String| {
        kb.ingredients.get(key).map(|frame| PriceMatch {
            ingredient: key.clone(),
            price_per_kg: frame.price_per_kg.max(0.0),
        })
    };

    if let Some((key, _)) = kb.ingredients.get_key_value(name) {
        return found(key);
    }

    let wanted = normalize_label(name);
    if wanted.is_empty() {
        return None;
    }
    let keys: Vec<(&String, String)> = kb
        .ingredients
        .keys()
        .map(|key| (key, normalize_label(key)))
        .filter(|(_, normalized)| !normalized.is_empty())
        .collect();

    if let Some((key, _)) = keys.iter().find(|(_, k)| *k == wanted) {
        return found(*key);
    }
    if let Some((key, _)) = keys
        .iter()
        .find(|(_, k)| k.contains(&wanted) || wanted.contains(k.as_str()))
    {
        return found(*key);
    }

    let wanted_base = strip_parenthetical(&wanted);
    if let Some((key, _)) = keys
        .iter()
        .find(|(_, k)| !wanted_base.is_empty() && strip_parenthetical(k) == wanted_base)
    {
        return found(*key);
    }

    tracing::debug!(ingredient = %name, "Custo: ingrediente sem preço, usando 0");
    None
}

/// Custo de uma receita pelo nome. Receita desconhecida → detalhamento zerado.
pub fn cost(kb: &KnowledgeBase, recipe_name: &str, batch_weight_kg: f64) -> CostBreakdown {
    match kb.recipes.get(recipe_name) {
        Some(recipe) => cost_recipe(kb, recipe, batch_weight_kg),
        None => {
            tracing::debug!(recipe = %recipe_name, "Custo: receita desconhecida");
            CostBreakdown::empty(batch_weight_kg)
        }
    }
}

/// Custo de um [`RecipeFrame`] já resolvido.
///
/// Lotes não positivos (ou não finitos) zeram as quantidades.
pub fn cost_recipe(kb: &KnowledgeBase, recipe: &RecipeFrame, batch_weight_kg: f64) -> CostBreakdown {
    let valid_batch = batch_weight_kg.is_finite() && batch_weight_kg > 0.0;
    let scale = if valid_batch && recipe.reference_batch_kg > 0.0 {
        batch_weight_kg / recipe.reference_batch_kg
    } else {
        0.0
    };

    let mut ingredients = IndexMap::new();
    let mut total = 0.0;
    for (name, quantity) in &recipe.ingredients {
        let amount_kg = quantity.max(0.0) * scale;
        let priced = price_ingredient(kb, name);
        let price_per_kg = priced.as_ref().map_or(0.0, |p| p.price_per_kg);
        let raw_cost = price_per_kg * amount_kg;
        total += raw_cost;
        ingredients.insert(
            name.clone(),
            IngredientCost {
                amount_kg: round2(amount_kg),
                price_per_kg,
                cost: round2(raw_cost),
                priced_as: priced.map(|p| p.ingredient),
            },
        );
    }

    let total_cost = round2(total);
    let cost_per_kg = if valid_batch {
        round2(total_cost / batch_weight_kg)
    } else {
        0.0
    };

    CostBreakdown {
        batch_weight_kg,
        ingredients,
        total_cost,
        cost_per_kg,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::frames::DEFAULT_BATCH_KG;

    fn kb() -> KnowledgeBase {
        KnowledgeBase::embedded().unwrap()
    }

    #[test]
    fn price_resolution_order() {
        let kb = kb();
        assert_eq!(price_ingredient(&kb, "Whole Maize").unwrap().price_per_kg, 50.0);
        assert_eq!(price_ingredient(&kb, "whole maize").unwrap().ingredient, "Whole Maize");
        let fish = price_ingredient(&kb, "Fishmeal").unwrap();
        assert_eq!(fish.ingredient, "Fishmeal (Omena)");
        assert_eq!(fish.price_per_kg, 95.0);
        assert!(price_ingredient(&kb, "Premix").is_none());
    }

    #[test]
    fn parenthetical_suffix_is_ignored_on_both_sides() {
        let kb = kb();
        let m = price_ingredient(&kb, "Fishmeal (Dagaa)").unwrap();
        assert_eq!(m.ingredient, "Fishmeal (Omena)");
    }

    #[test]
    fn chick_mash_total_matches_manual_sum() {
        let kb = kb();
        let recipe = &kb.recipes["70kg Chick Mash"];
        let expected: f64 = recipe
            .ingredients
            .iter()
            .map(|(name, qty)| {
                qty * price_ingredient(&kb, name).map_or(0.0, |p| p.price_per_kg)
            })
            .sum();

        let breakdown = cost(&kb, "70kg Chick Mash", DEFAULT_BATCH_KG);
        assert!((breakdown.total_cost - round2(expected)).abs() < 1e-9);
        assert_eq!(breakdown.cost_per_kg, round2(breakdown.total_cost / 70.0));
        assert_eq!(breakdown.ingredients.len(), recipe.ingredients.len());

        let premix = &breakdown.ingredients["Premix"];
        assert_eq!(premix.price_per_kg, 0.0);
        assert_eq!(premix.cost, 0.0);
        assert!(premix.priced_as.is_none());
    }

    #[test]
    fn chick_mash_known_values() {
        // 31.5×50 + 9.1×17 + 7×32 + 16.8×50 + 1.5×95 + 1.75×12 + 0.03×50 + 0.02×0
        let breakdown = cost(&kb(), "70kg Chick Mash", 70.0);
        assert!((breakdown.total_cost - 2958.7).abs() < 1e-9);
        assert!((breakdown.cost_per_kg - 42.27).abs() < 1e-9);
    }

    #[test]
    fn unknown_recipe_is_all_zero() {
        let breakdown = cost(&kb(), "Nonexistent", 70.0);
        assert!(breakdown.ingredients.is_empty());
        assert_eq!(breakdown.total_cost, 0.0);
        assert_eq!(breakdown.cost_per_kg, 0.0);
    }

    #[test]
    fn quantities_scale_with_batch() {
        let kb = kb();
        let full = cost(&kb, "70kg Layers Mash", 70.0);
        let double = cost(&kb, "70kg Layers Mash", 140.0);
        assert_eq!(double.ingredients["Whole Maize"].amount_kg, 68.0);
        assert!((double.total_cost - 2.0 * full.total_cost).abs() < 0.02);
        assert_eq!(full.ingredients["Whole Maize"].amount_kg, 34.0);
    }

    #[test]
    fn non_positive_batch_yields_zero_costs() {
        let zero = cost(&kb(), "70kg Layers Mash", 0.0);
        assert_eq!(zero.total_cost, 0.0);
        assert_eq!(zero.cost_per_kg, 0.0);
        let negative = cost(&kb(), "70kg Layers Mash", -5.0);
        assert!(negative.ingredients.values().all(|i| i.amount_kg >= 0.0));
    }
}
