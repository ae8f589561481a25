//! # Advisor — A Fachada do Sistema Especialista
//!
//! O [`FeedAdvisor`] é o **ponto de entrada** do motor: recebe uma
//! [`RecommendRequest`] e coordena todos os subsistemas até produzir uma
//! [`RecommendationResult`] completa.
//!
//! ## O Ciclo de Recomendação
//!
//! ```text
//! RecommendRequest (idade, motivo, orçamento, …)
//!   │
//!   ├── 1. DETECÇÃO    StageDetector → frame + label fuzzy
//!   ├── 2. FATOS       Type, Age_Weeks, Reason, Age_Fuzzy (+ opcionais)
//!   ├── 3. REGRAS      RuleEngine → consequentes na ordem declarada
//!   ├── 4. RESOLUÇÃO   primeiro Recommend (ou default do frame)
//!   │                  + política de orçamento baixo
//!   ├── 5. RECEITA     find_recipe(tipo recomendado)
//!   └── 6. CUSTO       cost_recipe(receita, lote)
//! ```
//!
//! ## Concorrência
//!
//! O advisor só guarda um `Arc<KnowledgeBase>` imutável e um peso de lote,
//! então é `Send + Sync` e pode ser compartilhado entre handlers sem lock.
//! [`FeedAdvisor::recommend_batch`] usa rayon para avaliar várias
//! requisições em paralelo, preservando a ordem de entrada.

use std::sync::Arc;

use indexmap::IndexMap;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::core::facts::{AGE_FUZZY, AGE_WEEKS, EGG_PRODUCTION, FEED_COST, HEALTH, REASON, TYPE};
use crate::core::{ChickenFrame, FactValue, Facts, IngredientFrame, KnowledgeBase, RecipeFrame};
use crate::formulation::{cost, cost_recipe, find_recipe, CostBreakdown, RecipeMatch};
use crate::inference::resolver::{apply_budget_policy, primary_feed_type};
use crate::inference::{DetectionResult, MatchedRule, RuleEngine, StageDetector};

/// Dicas gerais devolvidas por [`FeedAdvisor::feeding_advice`].
const GENERAL_TIPS: [&str; 4] = [
    "Provide clean, fresh water at all times",
    "Wash drinkers regularly to avoid diseases",
    "Avoid damp or moldy feed - mycotoxins can cause poisoning",
    "Store feed in dry, cool conditions",
];

/// Conselhos por preocupação: (termos aceitos, conselhos).
const CONCERN_ADVICE: [(&[&str], [&str; 3]); 3] = [
    (
        &["low egg production", "poor laying"],
        [
            "Consider switching to grower mash if egg production is below 50%",
            "Check for stress factors (overcrowding, temperature, lighting)",
            "Ensure adequate calcium levels for shell formation",
        ],
    ),
    (
        &["sick", "disease", "health"],
        [
            "Consider softer feed (chick mash) for sick birds",
            "Isolate sick birds to prevent spread",
            "Consult a veterinarian for proper diagnosis",
        ],
    ),
    (
        &["cost", "expensive", "budget"],
        [
            "Consider maize bran + fishmeal as cheaper substitute",
            "Buy ingredients in bulk to reduce costs",
            "Mix your own feed using local ingredients",
        ],
    ),
];

/// Pedido de recomendação.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RecommendRequest {
    pub age_weeks: f64,
    /// Motivo da criação ("Eggs", "Meat", …).
    pub reason: String,
    /// `"low"` ativa a política de orçamento baixo.
    #[serde(default)]
    pub budget: String,
    /// Taxa de postura: `"40%"` ou `40`.
    #[serde(default)]
    pub egg_production: Option<FactValue>,
    #[serde(default)]
    pub health: Option<String>,
    #[serde(default)]
    pub feed_cost: Option<String>,
    /// Peso do lote em kg; sem valor, usa o padrão do advisor.
    #[serde(default)]
    pub batch_kg: Option<f64>,
}

impl RecommendRequest {
    /// Pedido mínimo — só idade, motivo e orçamento.
    #[cfg(test)]
    pub fn new(age_weeks: f64, reason: impl Into<String>, budget: impl Into<String>) -> Self {
        Self {
            age_weeks,
            reason: reason.into(),
            budget: budget.into(),
            egg_production: None,
            health: None,
            feed_cost: None,
            batch_kg: None,
        }
    }
}

/// Resultado completo de uma recomendação.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RecommendationResult {
    /// Fatos montados para a requisição.
    pub facts: Facts,
    pub detection: DetectionResult,
    /// Consequentes das regras satisfeitas (+ política de orçamento).
    pub recommendations: Vec<MatchedRule>,
    pub recommended_feed_type: String,
    pub recipe: Option<RecipeMatch>,
    pub cost: CostBreakdown,
}

/// Resumo do frame usado em [`FeedingAdvice`].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BasicAdvice {
    /// Faixa etária legível (`"growing (2/5/9)"`, `"0-8 weeks"`).
    pub age_stage: String,
    pub primary_goal: String,
    pub recommended_feed: String,
    pub daily_consumption: String,
    pub protein_requirement: IndexMap<String, String>,
}

/// Conselhos de alimentação para um tipo de ave.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FeedingAdvice {
    pub chicken_type: String,
    pub basic_advice: BasicAdvice,
    pub general_tips: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub specific_advice: Vec<String>,
}

/// Fachada do sistema especialista de ração.
#[derive(Clone, Debug)]
pub struct FeedAdvisor {
    kb: Arc<KnowledgeBase>,
    batch_weight_kg: f64,
}

impl FeedAdvisor {
    /// Cria um advisor com o lote padrão de 70 kg.
    #[cfg(test)]
    pub fn new(kb: Arc<KnowledgeBase>) -> Self {
        Self::with_batch_weight(kb, crate::core::frames::DEFAULT_BATCH_KG)
    }

    pub fn with_batch_weight(kb: Arc<KnowledgeBase>, batch_weight_kg: f64) -> Self {
        Self {
            kb,
            batch_weight_kg,
        }
    }

    pub fn knowledge_base(&self) -> &KnowledgeBase {
        &self.kb
    }

    /// Peso de lote usado quando a requisição não informa um.
    pub fn batch_weight_kg(&self) -> f64 {
        self.batch_weight_kg
    }

    /// Executa o ciclo completo de recomendação.
    ///
    /// Nunca falha: entradas malformadas degradam para resultados
    /// parciais (receita `None`, custo zerado).
    pub fn recommend(&self, request: &RecommendRequest) -> RecommendationResult {
        let kb = self.kb.as_ref();

        let detection = StageDetector::detect(kb, request.age_weeks, &request.reason);
        let facts = Self::build_facts(request, &detection);

        let mut recommendations = RuleEngine::apply(kb, &facts);
        let frame = kb.frame(&detection.frame_key);
        // O tipo primário sai das regras ANTES da política de orçamento
        let recommended_feed_type = primary_feed_type(&recommendations, frame);
        apply_budget_policy(&mut recommendations, &request.budget);

        let batch_weight_kg = request.batch_kg.unwrap_or(self.batch_weight_kg);
        let (recipe, cost) = match find_recipe(kb, &recommended_feed_type) {
            Some((name, recipe)) => (
                Some(RecipeMatch {
                    name: name.to_string(),
                    recipe: recipe.clone(),
                }),
                cost_recipe(kb, recipe, batch_weight_kg),
            ),
            None => (None, CostBreakdown::empty(batch_weight_kg)),
        };

        tracing::info!(
            age_weeks = request.age_weeks,
            frame = %detection.frame_key,
            feed = %recommended_feed_type,
            recipe = recipe.as_ref().map(|r| r.name.as_str()).unwrap_or("-"),
            rules = recommendations.len(),
            "Recomendação gerada"
        );

        RecommendationResult {
            facts,
            detection,
            recommendations,
            recommended_feed_type,
            recipe,
            cost,
        }
    }

    /// Avalia várias requisições em paralelo; a saída segue a ordem de entrada.
    pub fn recommend_batch(&self, requests: &[RecommendRequest]) -> Vec<RecommendationResult> {
        requests.par_iter().map(|request| self.recommend(request)).collect()
    }

    /// Receita para um label de tipo de ração.
    pub fn get_recipe(&self, label: &str) -> Option<RecipeMatch> {
        find_recipe(&self.kb, label).map(|(name, recipe)| RecipeMatch {
            name: name.to_string(),
            recipe: recipe.clone(),
        })
    }

    /// Custo de uma receita pelo nome.
    pub fn cost(&self, recipe_name: &str, batch_weight_kg: f64) -> CostBreakdown {
        cost(&self.kb, recipe_name, batch_weight_kg)
    }

    /// Conselhos gerais e específicos para um tipo de ave.
    ///
    /// O tipo é procurado pela chave exata e depois sem diferenciar caixa;
    /// tipo desconhecido → `None`. Preocupações não reconhecidas só
    /// devolvem as dicas gerais.
    pub fn feeding_advice(&self, chicken_type: &str, concern: Option<&str>) -> Option<FeedingAdvice> {
        let (key, frame) = self.kb.find_frame(chicken_type)?;

        let specific_advice: Vec<String> = concern
            .map(|c| c.trim().to_lowercase())
            .and_then(|c| {
                CONCERN_ADVICE
                    .iter()
                    .find(|(terms, _)| terms.contains(&c.as_str()))
            })
            .map(|(_, advice)| advice.iter().map(|s| s.to_string()).collect())
            .unwrap_or_default();

        Some(FeedingAdvice {
            chicken_type: key.to_string(),
            basic_advice: BasicAdvice {
                age_stage: frame.age_stage.describe(),
                primary_goal: frame.primary_goal.clone(),
                recommended_feed: frame.recommended_feed_type.clone(),
                daily_consumption: format!("{}g per bird", frame.daily_feed_consumption_g),
                protein_requirement: frame.protein_requirement_dcp.clone(),
            },
            general_tips: GENERAL_TIPS.iter().map(|s| s.to_string()).collect(),
            specific_advice,
        })
    }

    pub fn chicken_types(&self) -> &IndexMap<String, ChickenFrame> {
        &self.kb.frames
    }

    pub fn recipes(&self) -> &IndexMap<String, RecipeFrame> {
        &self.kb.recipes
    }

    pub fn ingredients(&self) -> &IndexMap<String, IngredientFrame> {
        &self.kb.ingredients
    }

    fn build_facts(request: &RecommendRequest, detection: &DetectionResult) -> Facts {
        let mut facts = Facts::new();
        facts.insert(TYPE, detection.frame_key.as_str());
        facts.insert(AGE_WEEKS, request.age_weeks);
        facts.insert(REASON, request.reason.as_str());
        facts.insert(AGE_FUZZY, detection.best_label.as_str());
        if let Some(egg_production) = &request.egg_production {
            facts.insert(EGG_PRODUCTION, egg_production.clone());
        }
        if let Some(health) = &request.health {
            facts.insert(HEALTH, health.as_str());
        }
        if let Some(feed_cost) = &request.feed_cost {
            facts.insert(FEED_COST, feed_cost.as_str());
        }
        facts
    }
}
