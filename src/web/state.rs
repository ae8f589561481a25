//! # Estado da Aplicação Web
//!
//! O estado é montado uma vez no `main` e clonado (barato, só `Arc`s)
//! para cada handler via extrator `State<AppState>`.
//!
//! ```text
//! AppState
//!  ├── advisor: Arc<FeedAdvisor>   (KB imutável, sem lock)
//!  └── started_at                  (para o uptime em /status)
//! ```

use std::sync::Arc;

use chrono::{DateTime, Utc};

use crate::advisor::FeedAdvisor;

/// Estado compartilhado da aplicação Axum.
#[derive(Clone)]
pub struct AppState {
    /// Fachada do sistema especialista.
    pub advisor: Arc<FeedAdvisor>,
    /// Instante de inicialização do servidor.
    pub started_at: DateTime<Utc>,
}

impl AppState {
    pub fn new(advisor: FeedAdvisor) -> Self {
        Self {
            advisor: Arc::new(advisor),
            started_at: Utc::now(),
        }
    }
}
