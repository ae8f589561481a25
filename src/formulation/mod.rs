//! # Módulo Formulation — Da Recomendação à Receita Precificada
//!
//! Depois que o motor de inferência decide **qual** ração usar, este
//! módulo responde **como** fazê-la e **quanto** custa.
//!
//! ```text
//! "Layers Mash"
//!   → recipe::find_recipe  → "70kg Layers Mash"
//!   → cost::cost_recipe    → detalhamento por ingrediente + total
//! ```
//!
//! | Sub-módulo | Responsabilidade |
//! |------------|------------------|
//! | [`recipe`] | Casamento tolerante label → receita |
//! | [`cost`] | Resolução de preços e custo do lote |

pub mod cost;
pub mod recipe;

pub use cost::{cost, cost_recipe, CostBreakdown};
pub use recipe::{find_recipe, RecipeMatch};
