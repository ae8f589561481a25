//! # Módulo Core — Tipos Fundamentais do Domínio
//!
//! Este módulo agrupa os **tipos de dados** sobre os quais o motor de
//! inferência trabalha. Nada aqui contém lógica de decisão:
//!
//! - [`KnowledgeBase`] — contêiner imutável carregado uma vez
//! - [`ChickenFrame`], [`RecipeFrame`], [`IngredientFrame`] — frames do domínio
//! - [`AgeStage`], [`TriangleSpec`](frames::TriangleSpec) — definição de idade (fuzzy ou crisp)
//! - [`Rule`], [`Predicate`], [`Consequent`] — regras de produção
//! - [`Facts`], [`FactValue`] — memória de trabalho por requisição
//!
//! ## Analogia com o Mundo Real
//!
//! Pense na [`KnowledgeBase`] como o **manual do extensionista**:
//! - Cada [`ChickenFrame`] é uma página sobre uma fase de vida da ave
//! - Cada [`Rule`] é uma recomendação "se … então …" do manual
//! - Cada [`RecipeFrame`] é uma fórmula de ração pronta para misturar

/// Sub-módulo com [`Facts`] e [`FactValue`].
pub mod facts;

/// Sub-módulo com os frames de fase, receita e ingrediente.
pub mod frames;

/// Sub-módulo com a implementação de [`KnowledgeBase`] — contêiner central.
pub mod knowledge_base;

/// Sub-módulo com [`Rule`] e a taxonomia de [`Predicate`]s.
pub mod rule;

// Re-exports para conveniência — permite usar `crate::core::Facts` diretamente.
pub use facts::{FactValue, Facts};
pub use frames::{AgeStage, ChickenFrame, IngredientFrame, RecipeFrame};
pub use knowledge_base::KnowledgeBase;
pub use rule::{Consequent, Predicate, Rule};
