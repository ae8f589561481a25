//! # Fuzzificação — Pertinência Triangular
//!
//! Converte uma idade numérica em **graus de pertinência** aos conjuntos
//! fuzzy rotulados de um [`ChickenFrame`].
//!
//! ## Função Triangular
//!
//! ```text
//!  1.0 |        /\
//!      |       /  \
//!      |      /    \
//!  0.0 |_____/      \_____
//!            a   b   c
//! ```
//!
//! - `x < a` ou `x > c` → 0
//! - `a < x < b` → `(x − a) / (b − a)` (borda de subida)
//! - `b ≤ x < c` → `(c − x) / (c − b)` (borda de descida)
//! - pico degenerado (`a == b == x` ou `b == c == x`) → 1
//!
//! Divisões por zero resolvem para 0 em vez de falhar.

use indexmap::IndexMap;

use crate::core::{AgeStage, ChickenFrame};

/// Grau de pertinência de `x` ao triângulo `(a, b, c)`, sempre em `[0, 1]`.
pub fn membership(x: f64, a: f64, b: f64, c: f64) -> f64 {
    if (a == b && b == x) || (b == c && b == x) {
        return 1.0;
    }
    if x < a || x > c {
        return 0.0;
    }

    let degree = if a < x && x < b {
        let width = b - a;
        if width == 0.0 {
            0.0
        } else {
            (x - a) / width
        }
    } else if b <= x && x < c {
        let width = c - b;
        if width == 0.0 {
            0.0
        } else {
            (c - x) / width
        }
    } else {
        0.0
    };

    if degree.is_nan() {
        0.0
    } else {
        degree.clamp(0.0, 1.0)
    }
}

/// Calcula o grau de cada conjunto fuzzy do frame, na ordem declarada.
///
/// Conjuntos que não formam três números ordenados valem 0.0.
/// Frames com definição crisp não produzem entradas.
pub fn memberships_for_frame(frame: &ChickenFrame, age_weeks: f64) -> IndexMap<String, f64> {
    let AgeStage::Fuzzy { fuzzy } = &frame.age_stage else {
        return IndexMap::new();
    };

    fuzzy
        .iter()
        .map(|(label, spec)| {
            let degree = match spec.points() {
                Some((a, b, c)) => membership(age_weeks, a, b, c),
                None => {
                    tracing::debug!(label = %label, "Fuzzy: conjunto malformado, grau 0");
                    0.0
                }
            };
            (label.clone(), degree)
        })
        .collect()
}
