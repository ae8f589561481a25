//! # Handlers HTTP — Os Endpoints da API
//!
//! Cada função pública neste módulo é um handler Axum, mapeado a uma
//! rota em [`super::create_router()`].
//!
//! | Handler | Método | Retorno |
//! |---------|--------|---------|
//! | `status` | GET | Contagens da KB + uptime |
//! | `recommend` | POST | `RecommendationResult` |
//! | `recommend_batch` | POST | `Vec<RecommendationResult>` |
//! | `list_recipes` | GET | Receitas na ordem declarada |
//! | `match_recipe` | GET | `RecipeMatch` ou `null` |
//! | `cost` | GET | `CostBreakdown` |
//! | `feeding_advice` | GET | `FeedingAdvice` (404 se tipo desconhecido) |
//! | `list_chicken_types` | GET | Frames na ordem declarada |
//! | `list_ingredients` | GET | Ingredientes na ordem declarada |
//!
//! ## Rastreamento
//!
//! Os handlers de recomendação abrem um span com um `request_id` (UUID v4),
//! então todos os logs do motor para aquela requisição ficam agrupados.

use axum::extract::{Query, State};
use axum::Json;
use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::state::AppState;
use crate::advisor::{FeedingAdvice, RecommendRequest, RecommendationResult};
use crate::core::{ChickenFrame, IngredientFrame, RecipeFrame};
use crate::error::ApiError;
use crate::formulation::{CostBreakdown, RecipeMatch};

/// Resposta do endpoint `/status`.
#[derive(Debug, Serialize, Deserialize)]
pub struct StatusResponse {
    pub ready: bool,
    pub frames: usize,
    pub rules: usize,
    pub recipes: usize,
    pub ingredients: usize,
    pub batch_weight_kg: f64,
    pub started_at: DateTime<Utc>,
    pub uptime_secs: i64,
}

/// Query de `/recipes/match`.
#[derive(Debug, Deserialize)]
pub struct LabelQuery {
    pub label: String,
}

/// Query de `/cost`.
#[derive(Debug, Deserialize)]
pub struct CostQuery {
    pub recipe: String,
    pub batch_kg: Option<f64>,
}

/// Query de `/advice`.
#[derive(Debug, Deserialize)]
pub struct AdviceQuery {
    pub chicken_type: String,
    pub concern: Option<String>,
}

fn validate(request: &RecommendRequest) -> Result<(), String> {
    if !request.age_weeks.is_finite() || request.age_weeks < 0.0 {
        return Err(format!(
            "age_weeks must be a non-negative number, got {}",
            request.age_weeks
        ));
    }
    match request.batch_kg {
        Some(batch) if !batch.is_finite() || batch <= 0.0 => {
            Err(format!("batch_kg must be positive, got {}", batch))
        }
        _ => Ok(()),
    }
}

/// GET `/status` — contagens da KB e uptime.
pub async fn status(State(state): State<AppState>) -> Json<StatusResponse> {
    let kb = state.advisor.knowledge_base();
    Json(StatusResponse {
        ready: true,
        frames: kb.frame_count(),
        rules: kb.rule_count(),
        recipes: kb.recipe_count(),
        ingredients: kb.ingredient_count(),
        batch_weight_kg: state.advisor.batch_weight_kg(),
        started_at: state.started_at,
        uptime_secs: (Utc::now() - state.started_at).num_seconds(),
    })
}

/// POST `/recommend` — executa o ciclo completo para uma ave/lote.
pub async fn recommend(
    State(state): State<AppState>,
    Json(request): Json<RecommendRequest>,
) -> Result<Json<RecommendationResult>, ApiError> {
    validate(&request).map_err(ApiError::BadRequest)?;
    let request_id = Uuid::new_v4();
    let span = tracing::info_span!("recommend", %request_id);
    let result = span.in_scope(|| state.advisor.recommend(&request));
    Ok(Json(result))
}

/// POST `/recommend/batch` — várias requisições, avaliadas em paralelo.
///
/// O trabalho roda em `spawn_blocking` para não ocupar o runtime tokio
/// enquanto o rayon processa o lote.
pub async fn recommend_batch(
    State(state): State<AppState>,
    Json(requests): Json<Vec<RecommendRequest>>,
) -> Result<Json<Vec<RecommendationResult>>, ApiError> {
    for (index, request) in requests.iter().enumerate() {
        validate(request).map_err(|e| ApiError::BadRequest(format!("item {}: {}", index, e)))?;
    }
    let request_id = Uuid::new_v4();
    let span = tracing::info_span!("recommend_batch", %request_id, size = requests.len());
    let advisor = state.advisor.clone();

    let results = tokio::task::spawn_blocking(move || {
        span.in_scope(|| advisor.recommend_batch(&requests))
    })
    .await
    .map_err(|e| {
        tracing::error!(error = %e, "Falha ao processar lote de recomendações");
        ApiError::Internal(e.to_string())
    })?;

    Ok(Json(results))
}

/// GET `/recipes` — catálogo de receitas.
pub async fn list_recipes(State(state): State<AppState>) -> Json<IndexMap<String, RecipeFrame>> {
    Json(state.advisor.recipes().clone())
}

/// GET `/recipes/match?label=` — receita para um tipo de ração (`null` sem acerto).
pub async fn match_recipe(
    State(state): State<AppState>,
    Query(query): Query<LabelQuery>,
) -> Json<Option<RecipeMatch>> {
    Json(state.advisor.get_recipe(&query.label))
}

/// GET `/cost?recipe=&batch_kg=` — custo de uma receita.
pub async fn cost(
    State(state): State<AppState>,
    Query(query): Query<CostQuery>,
) -> Result<Json<CostBreakdown>, ApiError> {
    let batch = query.batch_kg.unwrap_or(state.advisor.batch_weight_kg());
    if !batch.is_finite() || batch <= 0.0 {
        return Err(ApiError::BadRequest(format!("batch_kg must be positive, got {}", batch)));
    }
    Ok(Json(state.advisor.cost(&query.recipe, batch)))
}

/// GET `/advice?chicken_type=&concern=` — conselhos de alimentação.
pub async fn feeding_advice(
    State(state): State<AppState>,
    Query(query): Query<AdviceQuery>,
) -> Result<Json<FeedingAdvice>, ApiError> {
    state
        .advisor
        .feeding_advice(&query.chicken_type, query.concern.as_deref())
        .map(Json)
        .ok_or_else(|| {
            ApiError::NotFound(format!("chicken type '{}' not recognized", query.chicken_type))
        })
}

/// GET `/chicken-types` — frames de fase.
pub async fn list_chicken_types(
    State(state): State<AppState>,
) -> Json<IndexMap<String, ChickenFrame>> {
    Json(state.advisor.chicken_types().clone())
}

/// GET `/ingredients` — ingredientes com preço e notas.
pub async fn list_ingredients(
    State(state): State<AppState>,
) -> Json<IndexMap<String, IngredientFrame>> {
    Json(state.advisor.ingredients().clone())
}
