#![allow(rustdoc::broken_intra_doc_links, rustdoc::invalid_html_tags)]
//! # Feed Advisor — Sistema Especialista de Ração para Aves
//!
//! **Ponto de entrada principal** da aplicação.
//!
//! Recebe a idade de um lote, o motivo da criação (ovos ou carne) e o
//! orçamento, e responde com a fase detectada, as regras disparadas, o
//! tipo de ração recomendado, a receita e o custo do lote.
//!
//! ## Fluxo de Inicialização
//!
//! ```text
//! main()
//!   ├── Configura tracing/logging (RUST_LOG, padrão "info")
//!   ├── Lê Settings do ambiente
//!   ├── Carrega a KB (arquivo → embutida → vazia)
//!   ├── Cria FeedAdvisor (Arc<KnowledgeBase>, sem lock)
//!   ├── Monta AppState e Router
//!   └── Serve HTTP (padrão 0.0.0.0:3000)
//! ```
//!
//! ## Exemplo de Uso
//!
//! ```bash
//! # Executar com logs padrão (info)
//! cargo run
//!
//! # Logs detalhados (graus fuzzy, regras disparadas, preços)
//! RUST_LOG=debug cargo run
//!
//! curl -X POST localhost:3000/recommend \
//!      -H 'content-type: application/json' \
//!      -d '{"age_weeks": 25, "reason": "Eggs", "budget": "low"}'
//! ```

/// Módulo `core` — tipos fundamentais: frames, regras, fatos, KnowledgeBase.
mod core;

/// Módulo `inference` — fuzzificação, detecção de fase, regras, resolução.
mod inference;

/// Módulo `formulation` — casamento de receitas e cálculo de custo.
mod formulation;

/// Módulo `advisor` — fachada que orquestra o ciclo de recomendação.
mod advisor;

/// Módulo `persistence` — carregamento da KB em JSON.
mod persistence;

/// Módulo `config` — configuração via variáveis de ambiente.
mod config;

/// Módulo `error` — erros tipados da KB e da API.
mod error;

/// Módulo `web` — servidor axum e handlers JSON.
mod web;

use std::sync::Arc;

use anyhow::Result;
use tracing_subscriber::EnvFilter;

use crate::advisor::FeedAdvisor;
use crate::config::Settings;
use crate::core::KnowledgeBase;
use crate::web::state::AppState;

/// Função principal assíncrona.
///
/// # Erros
///
/// Retorna erro se não conseguir fazer bind no endereço configurado ou se
/// o servidor axum falhar durante a execução. Problemas na KB nunca
/// abortam a inicialização.
#[tokio::main]
async fn main() -> Result<()> {
    // Aceita RUST_LOG para configurar o nível. Exemplo: RUST_LOG=debug cargo run
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    tracing::info!("🐔 Feed Advisor — Starting...");

    let settings = Settings::from_env();

    let kb = match persistence::load_kb(&settings.kb_path) {
        Ok(kb) => kb,
        Err(e) => {
            tracing::warn!(error = %format!("{:#}", e), "Falha ao carregar KB do disco, usando a KB embutida");
            KnowledgeBase::embedded().unwrap_or_else(|e| {
                tracing::warn!(error = %e, "KB embutida inválida, iniciando vazia");
                KnowledgeBase::new()
            })
        }
    };
    tracing::info!(
        frames = kb.frame_count(),
        rules = kb.rule_count(),
        recipes = kb.recipe_count(),
        ingredients = kb.ingredient_count(),
        "KB carregada"
    );

    let advisor = FeedAdvisor::with_batch_weight(Arc::new(kb), settings.batch_weight_kg);
    let app = web::create_router(AppState::new(advisor));

    let listener = tokio::net::TcpListener::bind(&settings.addr).await?;
    tracing::info!(addr = %settings.addr, "🚀 Server running");

    axum::serve(listener, app).await?;

    Ok(())
}
