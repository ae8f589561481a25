//! # Módulo Web — API JSON do Sistema Especialista
//!
//! Camada HTTP construída com **Axum**. Todas as rotas devolvem JSON.
//!
//! ## Rotas
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │ Axum Router (este módulo)                                    │
//! │  ├── GET  /status             → contagens da KB + uptime     │
//! │  ├── POST /recommend          → recomendação completa        │
//! │  ├── POST /recommend/batch    → várias recomendações (rayon) │
//! │  ├── GET  /recipes            → catálogo de receitas         │
//! │  ├── GET  /recipes/match      → receita para um label        │
//! │  ├── GET  /cost               → custo de receita por lote    │
//! │  ├── GET  /advice             → conselhos por tipo de ave    │
//! │  ├── GET  /chicken-types      → catálogo de frames           │
//! │  └── GET  /ingredients        → catálogo de ingredientes     │
//! ├──────────────────────────────────────────────────────────────┤
//! │ CORS permissivo (tower_http::cors)                           │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! | Módulo | Responsabilidade |
//! |--------|------------------|
//! | [`state`] | Estado compartilhado (`AppState`) |
//! | [`handlers`] | Handlers Axum para cada rota |

pub mod handlers;
pub mod state;

use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::CorsLayer;

use state::AppState;

/// Cria o router Axum com todas as rotas da aplicação.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/status", get(handlers::status))
        // ── Recomendação ─────────────────────────────────────
        .route("/recommend", post(handlers::recommend))
        .route("/recommend/batch", post(handlers::recommend_batch))
        // ── Formulação ───────────────────────────────────────
        .route("/recipes", get(handlers::list_recipes))
        .route("/recipes/match", get(handlers::match_recipe))
        .route("/cost", get(handlers::cost))
        // ── Catálogos e conselhos ────────────────────────────
        .route("/advice", get(handlers::feeding_advice))
        .route("/chicken-types", get(handlers::list_chicken_types))
        .route("/ingredients", get(handlers::list_ingredients))
        .layer(CorsLayer::permissive())
        .with_state(state)
}
