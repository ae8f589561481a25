//! # KnowledgeBase — Contêiner Central de Conhecimento Avícola
//!
//! A [`KnowledgeBase`] reúne tudo o que o sistema especialista sabe:
//!
//! - **Frames de fase** (`frames`) — Chick, Pullet, Layer, Broiler …
//! - **Regras de produção** (`rules`) — avaliadas na ordem declarada
//! - **Receitas** (`recipes`) — fórmulas para lotes de 70 kg
//! - **Ingredientes** (`ingredients`) — proteína bruta e preço por kg
//!
//! ## Ciclo de Vida
//!
//! A KB é construída **uma única vez** na inicialização e nunca mais é
//! alterada. No servidor ela é compartilhada como `Arc<KnowledgeBase>` —
//! sem locks, porque leituras concorrentes de dados imutáveis são seguras.
//!
//! ## Ordem Importa
//!
//! Todos os mapas são [`IndexMap`]s: a ordem de declaração no JSON é
//! preservada e usada nos desempates do detector de fase, do casamento de
//! receitas e no fallback "primeiro frame declarado".
//!
//! ## KB Embutida
//!
//! Uma KB padrão é compilada no binário a partir de
//! `data/knowledge_base.json` e usada quando nenhum arquivo externo é
//! fornecido (ver [`persistence`](crate::persistence)).
//!
//! ## Entradas Inválidas
//!
//! Cada frame, regra, receita e ingrediente é interpretado isoladamente.
//! Uma entrada que não casa com o esquema é descartada com `warn!` e o
//! resto da KB carrega normalmente. Só JSON inválido ou um documento
//! que não é objeto viram [`KnowledgeBaseError::Parse`].
//!
//! ## Exemplo
//!
//! ```text
//! let kb = KnowledgeBase::embedded()?;
//! assert!(kb.frame("Layer").is_some());
//! assert_eq!(kb.first_frame_key(), Some("Chick"));
//! ```

use indexmap::IndexMap;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::frames::{ChickenFrame, IngredientFrame, RecipeFrame};
use super::rule::Rule;
use crate::error::KnowledgeBaseError;

/// KB padrão embutida no binário em tempo de compilação.
const EMBEDDED_KB: &str = include_str!("../../data/knowledge_base.json");

/// Base de conhecimento imutável — frames, regras, receitas e ingredientes.
///
/// Campos ausentes no JSON viram coleções vazias e entradas inválidas são
/// descartadas; o motor degrada graciosamente em vez de recusar a KB.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "RawKnowledgeBase")]
pub struct KnowledgeBase {
    /// Frames de fase de vida: chave → frame.
    #[serde(default)]
    pub frames: IndexMap<String, ChickenFrame>,

    /// Regras de produção, na ordem de avaliação.
    #[serde(default)]
    pub rules: Vec<Rule>,

    /// Receitas: nome → frame.
    #[serde(default)]
    pub recipes: IndexMap<String, RecipeFrame>,

    /// Ingredientes: nome → frame com preço.
    #[serde(default)]
    pub ingredients: IndexMap<String, IngredientFrame>,
}

/// Forma bruta do documento: cada entrada ainda é um `Value` solto.
#[derive(Deserialize)]
struct RawKnowledgeBase {
    #[serde(default)]
    frames: IndexMap<String, Value>,
    #[serde(default)]
    rules: Vec<Value>,
    #[serde(default)]
    recipes: IndexMap<String, Value>,
    #[serde(default)]
    ingredients: IndexMap<String, Value>,
}

impl From<RawKnowledgeBase> for KnowledgeBase {
    fn from(raw: RawKnowledgeBase) -> Self {
        let rules = raw
            .rules
            .into_iter()
            .enumerate()
            .filter_map(|(i, value)| {
                let entry = value
                    .get("name")
                    .and_then(Value::as_str)
                    .map_or_else(|| format!("#{i}"), str::to_string);
                parse_entry("rules", &entry, value)
            })
            .collect();

        KnowledgeBase {
            frames: parse_section("frames", raw.frames),
            rules,
            recipes: parse_section("recipes", raw.recipes),
            ingredients: parse_section("ingredients", raw.ingredients),
        }
    }
}

fn parse_section<T: DeserializeOwned>(
    section: &str,
    entries: IndexMap<String, Value>,
) -> IndexMap<String, T> {
    entries
        .into_iter()
        .filter_map(|(key, value)| parse_entry(section, &key, value).map(|item| (key, item)))
        .collect()
}

fn parse_entry<T: DeserializeOwned>(section: &str, entry: &str, value: Value) -> Option<T> {
    match serde_json::from_value(value) {
        Ok(item) => Some(item),
        Err(e) => {
            tracing::warn!(section, entry, error = %e, "KB: entrada inválida ignorada");
            None
        }
    }
}

impl KnowledgeBase {
    /// Cria uma KB vazia.
    pub fn new() -> Self {
        Self::default()
    }

    /// Desserializa uma KB a partir de JSON.
    ///
    /// # Erros
    ///
    /// Retorna [`KnowledgeBaseError::Parse`] se o documento não for JSON
    /// válido ou violar o esquema de nível superior. Entradas individuais
    /// malformadas **não** são erro — são descartadas com aviso.
    pub fn from_json(json: &str) -> Result<Self, KnowledgeBaseError> {
        let kb: KnowledgeBase = serde_json::from_str(json)?;
        tracing::debug!(
            frames = kb.frames.len(),
            rules = kb.rules.len(),
            recipes = kb.recipes.len(),
            ingredients = kb.ingredients.len(),
            "KB: documento interpretado"
        );
        Ok(kb)
    }

    /// KB padrão compilada no binário.
    pub fn embedded() -> Result<Self, KnowledgeBaseError> {
        Self::from_json(EMBEDDED_KB)
    }

    /// Busca um frame de fase pela chave exata.
    pub fn frame(&self, key: &str) -> Option<&ChickenFrame> {
        self.frames.get(key)
    }

    /// Busca um frame pela chave, ignorando maiúsculas/minúsculas.
    ///
    /// Tenta primeiro a chave exata.
    pub fn find_frame(&self, key: &str) -> Option<(&str, &ChickenFrame)> {
        if let Some((k, frame)) = self.frames.get_key_value(key) {
            return Some((k.as_str(), frame));
        }
        let key_lower = key.trim().to_lowercase();
        self.frames
            .iter()
            .find(|(k, _)| k.to_lowercase() == key_lower)
            .map(|(k, frame)| (k.as_str(), frame))
    }

    /// Chave do primeiro frame declarado.
    pub fn first_frame_key(&self) -> Option<&str> {
        self.frames.keys().next().map(String::as_str)
    }

    /// Número total de frames de fase.
    pub fn frame_count(&self) -> usize {
        self.frames.len()
    }

    /// Número total de regras.
    pub fn rule_count(&self) -> usize {
        self.rules.len()
    }

    pub fn recipe_count(&self) -> usize {
        self.recipes.len()
    }

    pub fn ingredient_count(&self) -> usize {
        self.ingredients.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::frames::AgeStage;

    #[test]
    fn embedded_kb_loads() {
        let kb = KnowledgeBase::embedded().expect("embedded KB must parse");
        assert_eq!(kb.frame_count(), 6);
        assert_eq!(kb.rule_count(), 12);
        assert_eq!(kb.recipe_count(), 6);
        assert_eq!(kb.ingredient_count(), 8);
        assert_eq!(kb.first_frame_key(), Some("Chick"));
    }

    #[test]
    fn embedded_frames_are_all_fuzzy_and_valid() {
        let kb = KnowledgeBase::embedded().unwrap();
        for (key, frame) in &kb.frames {
            let AgeStage::Fuzzy { fuzzy } = &frame.age_stage else {
                panic!("{key} should be fuzzy");
            };
            for (label, spec) in fuzzy {
                assert!(spec.points().is_some(), "{key}/{label} is malformed");
            }
        }
    }

    #[test]
    fn rules_keep_declaration_order() {
        let kb = KnowledgeBase::embedded().unwrap();
        assert_eq!(kb.rules[0].name, "R_Chick_Feed");
        assert_eq!(kb.rules.last().unwrap().name, "R_Broiler_Sick");
    }

    #[test]
    fn missing_sections_default_to_empty() {
        let kb = KnowledgeBase::from_json("{}").unwrap();
        assert_eq!(kb, KnowledgeBase::new());
        assert_eq!(kb.first_frame_key(), None);
    }

    #[test]
    fn invalid_json_is_a_parse_error() {
        let err = KnowledgeBase::from_json("{ not json").unwrap_err();
        assert!(matches!(err, KnowledgeBaseError::Parse(_)));
    }

    #[test]
    fn find_frame_is_case_insensitive() {
        let kb = KnowledgeBase::embedded().unwrap();
        assert_eq!(kb.find_frame("layer").map(|(k, _)| k), Some("Layer"));
        assert_eq!(
            kb.find_frame("BROILER STARTER").map(|(k, _)| k),
            Some("Broiler Starter")
        );
        assert!(kb.find_frame("Duck").is_none());
    }

    const PARTLY_MALFORMED: &str = r#"{
        "frames": {
            "Layer": {"age_stage": {"fuzzy": {"Adult": [18, 30, 76]}}, "primary_goal": "Egg Production", "recommended_feed_type": "Layers Mash"},
            "Ghost": {"primary_goal": "Growth"}
        },
        "rules": [
            {"name": "R_Layer", "if": {"Type": "Layer"}, "then": {"Recommend": "Layers Mash"}},
            {"name": "R_Triple_Age", "if": {"Age_Weeks": [20, 40, 76]}, "then": {"Recommend": "Never"}},
            {"name": "R_Word_Priority", "priority": "high", "if": {"Type": "Layer"}, "then": {"Advice": "Clean water"}},
            "not a rule"
        ],
        "ingredients": {
            "Maize": {"category": "Grain", "crude_protein_pct": 9.0},
            "Gold Dust": {"price_per_kg": "cheap"}
        }
    }"#;

    #[test]
    fn malformed_entries_are_skipped_and_the_rest_loads() {
        let kb = KnowledgeBase::from_json(PARTLY_MALFORMED).unwrap();

        assert_eq!(kb.frames.keys().collect::<Vec<_>>(), ["Layer"]);
        let names: Vec<_> = kb.rules.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, ["R_Layer", "R_Triple_Age", "R_Word_Priority"]);
        assert_eq!(kb.rules[2].priority, None);
        assert_eq!(kb.ingredients.keys().collect::<Vec<_>>(), ["Maize"]);
        assert_eq!(kb.ingredients["Maize"].price_per_kg, 0.0);
    }

    #[test]
    fn good_rules_still_fire_beside_malformed_ones() {
        use crate::core::Facts;
        use crate::inference::RuleEngine;

        let kb = KnowledgeBase::from_json(PARTLY_MALFORMED).unwrap();
        let mut facts = Facts::new();
        facts.insert(crate::core::facts::TYPE, "Layer");
        facts.insert(crate::core::facts::AGE_WEEKS, 30.0);

        let fired: Vec<_> = RuleEngine::apply(&kb, &facts)
            .into_iter()
            .map(|m| m.rule)
            .collect();
        assert_eq!(fired, ["R_Layer", "R_Word_Priority"]);
    }

    #[test]
    fn non_object_document_is_a_parse_error() {
        let err = KnowledgeBase::from_json(r#""just text""#).unwrap_err();
        assert!(matches!(err, KnowledgeBaseError::Parse(_)));
    }
}
