//! # Módulo Inference — Motor de Inferência do Sistema Especialista
//!
//! Este módulo contém o **raciocínio** do sistema: da idade da ave até um
//! tipo de ração recomendado.
//!
//! ## Etapas
//!
//! | Etapa | Sub-módulo | Entrada → Saída |
//! |-------|------------|-----------------|
//! | **Fuzzificação** | [`fuzzy`] | idade → graus por label |
//! | **Detecção de fase** | [`detector`] | idade + motivo → frame + label |
//! | **Regras** | [`rules`] | fatos → consequentes |
//! | **Resolução** | [`resolver`] | consequentes + frame → tipo de ração |
//!
//! ## Exemplo
//!
//! ```text
//! 25 semanas, "Eggs"
//!   → Detector: Layer / productive (0.17)
//!   → Regras: R_Layer_Feed, R_Layer_Calcium_Warning, …
//!   → Resolver: "Layers Mash"
//! ```
//!
//! Todas as etapas são funções puras sobre a KB imutável.

/// Sub-módulo de detecção de fase (fuzzy + fallback crisp).
pub mod detector;

/// Sub-módulo de pertinência triangular.
pub mod fuzzy;

/// Sub-módulo da política de resolução da recomendação.
pub mod resolver;

/// Sub-módulo com o motor de regras de produção.
pub mod rules;

pub use detector::{DetectionResult, StageDetector};
pub use rules::{MatchedRule, RuleEngine};
