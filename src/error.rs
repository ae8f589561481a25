//! # Erros Tipados
//!
//! O motor de inferência **nunca** falha: entradas malformadas degradam
//! para resultados parciais. Os erros abaixo existem apenas nas bordas —
//! carregamento da KB e camada HTTP.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use thiserror::Error;

/// Falha ao interpretar um documento de base de conhecimento.
#[derive(Debug, Error)]
pub enum KnowledgeBaseError {
    #[error("invalid knowledge base document: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Erros da API HTTP, convertidos em resposta JSON `{ "error": ... }`.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("not found: {0}")]
    NotFound(String),

    #[error("bad request: {0}")]
    BadRequest(String),

    #[error("internal error: {0}")]
    Internal(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self {
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        tracing::debug!(status = %status, error = %self, "API: requisição rejeitada");
        (status, Json(serde_json::json!({ "error": self.to_string() }))).into_response()
    }
}
