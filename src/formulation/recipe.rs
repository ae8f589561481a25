//! # Casamento de Receitas
//!
//! Encontra o [`RecipeFrame`] correspondente a um label de tipo de ração
//! recomendado (ex: "Layers Mash" → receita com `target_type` "Layer").
//!
//! ## Estratégia Tolerante (primeiro acerto vence)
//!
//! ```text
//! 1. Igualdade exata (sem diferenciar caixa) com target_type
//! 2. Substring em qualquer direção
//! 3. target_type começa com o PRIMEIRO token do label
//! ```
//!
//! Cada passo percorre as receitas na ordem declarada. Labels vazios não
//! casam com nada; sem acerto, o retorno é `None` (não é erro).

use serde::{Deserialize, Serialize};
use unicode_normalization::UnicodeNormalization;

use crate::core::{KnowledgeBase, RecipeFrame};

/// Receita encontrada — nome + frame.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RecipeMatch {
    pub name: String,
    pub recipe: RecipeFrame,
}

/// Normaliza um label para comparação tolerante (NFKC + minúsculas).
pub fn normalize_label(text: &str) -> String {
    text.trim().nfkc().collect::<String>().to_lowercase()
}

/// Procura a receita de um tipo de ração.
pub fn find_recipe<'a>(kb: &'a KnowledgeBase, label: &str) -> Option<(&'a str, &'a RecipeFrame)> {
    let wanted = normalize_label(label);
    if wanted.is_empty() {
        return None;
    }

    let targets: Vec<(&str, &RecipeFrame, String)> = kb
        .recipes
        .iter()
        .map(|(name, recipe)| (name.as_str(), recipe, normalize_label(&recipe.target_type)))
        .filter(|(_, _, target)| !target.is_empty())
        .collect();

    let hit = targets
        .iter()
        .find(|(_, _, target)| *target == wanted)
        .or_else(|| {
            targets
                .iter()
                .find(|(_, _, target)| wanted.contains(target.as_str()) || target.contains(&wanted))
        })
        .or_else(|| {
            let first_token = wanted.split_whitespace().next()?;
            targets
                .iter()
                .find(|(_, _, target)| target.starts_with(first_token))
        });

    match hit {
        Some((name, recipe, _)) => {
            tracing::debug!(label = %label, recipe = %name, "Receitas: receita encontrada");
            Some((*name, *recipe))
        }
        None => {
            tracing::debug!(label = %label, "Receitas: nenhuma receita corresponde");
            None
        }
    }
}
