//! # Detector de Fase — Classificação Fuzzy com Fallback Crisp
//!
//! O [`StageDetector`] decide **qual frame** da KB descreve a ave e com
//! **qual label** fuzzy, a partir da idade e do motivo da criação.
//!
//! ## Algoritmo
//!
//! ```text
//! 1. Filtra candidatos pela linhagem:
//!    motivo de corte → frames de broiler; senão → frames de postura
//!    (se o filtro não deixar nenhum frame, todos viram candidatos)
//! 2. Para cada candidato: melhor (label, grau) — empate → primeiro label
//! 3. Entre candidatos: só troca com grau ESTRITAMENTE maior
//! 4. Melhor grau == 0.0 → tabela crisp fixa (fallback)
//! ```
//!
//! ## Tabela de Fallback
//!
//! | Linhagem | Idade (semanas) | Frame | Label |
//! |----------|-----------------|-------|-------|
//! | Corte | ≤ 1.5 | Broiler Starter | starter |
//! | Corte | ≤ 4 | Broiler Grower | grower |
//! | Corte | > 4 | Broiler Finisher | finisher |
//! | Postura | ≤ 8 | Chick | growing |
//! | Postura | ≤ 20 | Pullet | peak |
//! | Postura | > 20 | Layer | productive |
//!
//! Se a chave nominal não existir na KB, usa-se o primeiro frame declarado.

use serde::{Deserialize, Serialize};

use super::fuzzy::memberships_for_frame;
use crate::core::KnowledgeBase;

/// Linha da tabela crisp: (idade máxima inclusiva, frame, label).
type FallbackRow = (f64, &'static str, &'static str);

const MEAT_FALLBACK: [FallbackRow; 3] = [
    (1.5, "Broiler Starter", "starter"),
    (4.0, "Broiler Grower", "grower"),
    (f64::INFINITY, "Broiler Finisher", "finisher"),
];

const EGG_FALLBACK: [FallbackRow; 3] = [
    (8.0, "Chick", "growing"),
    (20.0, "Pullet", "peak"),
    (f64::INFINITY, "Layer", "productive"),
];

/// Caminho que produziu a classificação.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DetectionMethod {
    /// Algum conjunto fuzzy teve grau positivo.
    Fuzzy,
    /// Nenhum grau positivo — tabela crisp aplicada.
    Crisp,
}

/// Resultado da detecção de fase.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DetectionResult {
    /// Chave do frame escolhido (vira o fato `Type`).
    pub frame_key: String,
    /// Label fuzzy vencedor (vira o fato `Age_Fuzzy`).
    pub best_label: String,
    /// Grau de pertinência em `[0, 1]`; 1.0 no fallback crisp.
    pub degree: f64,
    pub method: DetectionMethod,
}

/// `true` quando o motivo indica produção de carne.
pub fn is_meat_reason(reason: &str) -> bool {
    let reason = reason.to_lowercase();
    reason.contains("meat") || reason.contains("broiler")
}

/// Detector de fase — struct sem estado, como o
/// [`RuleEngine`](super::RuleEngine).
pub struct StageDetector;

impl StageDetector {
    /// Classifica a ave em um frame e label da KB.
    ///
    /// Nunca falha: sem frames ou sem sobreposição fuzzy, a tabela crisp
    /// decide.
    pub fn detect(kb: &KnowledgeBase, age_weeks: f64, reason: &str) -> DetectionResult {
        let meat = is_meat_reason(reason);

        let mut candidates: Vec<(&str, _)> = kb
            .frames
            .iter()
            .filter(|(key, frame)| frame.is_meat_lineage(key) == meat)
            .map(|(key, frame)| (key.as_str(), frame))
            .collect();
        if candidates.is_empty() {
            tracing::debug!(reason = %reason, "Detector: nenhum frame da linhagem, usando todos");
            candidates = kb.frames.iter().map(|(k, f)| (k.as_str(), f)).collect();
        }

        let mut best: Option<(&str, String, f64)> = None;
        for (key, frame) in candidates {
            let mut frame_best: Option<(String, f64)> = None;
            for (label, degree) in memberships_for_frame(frame, age_weeks) {
                if frame_best.as_ref().map_or(true, |(_, d)| degree > *d) {
                    frame_best = Some((label, degree));
                }
            }
            let Some((label, degree)) = frame_best else {
                continue;
            };
            tracing::debug!(frame = %key, label = %label, degree = %format!("{:.3}", degree), "Detector: melhor label do frame");
            if best.as_ref().map_or(true, |(_, _, d)| degree > *d) {
                best = Some((key, label, degree));
            }
        }

        match best {
            Some((key, label, degree)) if degree > 0.0 => DetectionResult {
                frame_key: key.to_string(),
                best_label: label,
                degree,
                method: DetectionMethod::Fuzzy,
            },
            _ => Self::crisp_fallback(kb, age_weeks, meat),
        }
    }

    /// Aplica a tabela crisp fixa.
    fn crisp_fallback(kb: &KnowledgeBase, age_weeks: f64, meat: bool) -> DetectionResult {
        let table = if meat { &MEAT_FALLBACK } else { &EGG_FALLBACK };
        let (_, nominal_key, label) = table
            .iter()
            .find(|(max_age, _, _)| age_weeks <= *max_age)
            .unwrap_or(&table[table.len() - 1]);

        let frame_key = if kb.frames.contains_key(*nominal_key) {
            nominal_key.to_string()
        } else {
            let substitute = kb.first_frame_key().unwrap_or(*nominal_key);
            tracing::warn!(nominal = %nominal_key, substitute = %substitute, "Detector: frame do fallback ausente na KB");
            substitute.to_string()
        };

        tracing::debug!(frame = %frame_key, label = %label, age_weeks, "Detector: fallback crisp");
        DetectionResult {
            frame_key,
            best_label: label.to_string(),
            degree: 1.0,
            method: DetectionMethod::Crisp,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::frames::TriangleSpec;
    use crate::core::{AgeStage, ChickenFrame};
    use indexmap::IndexMap;

    fn kb() -> KnowledgeBase {
        KnowledgeBase::embedded().unwrap()
    }

    fn frame(goal: &str, sets: &[(&str, [f64; 3])]) -> ChickenFrame {
        ChickenFrame {
            age_stage: AgeStage::Fuzzy {
                fuzzy: sets
                    .iter()
                    .map(|(l, p)| (l.to_string(), TriangleSpec::Points(p.to_vec())))
                    .collect(),
            },
            primary_goal: goal.into(),
            recommended_feed_type: "Feed".into(),
            protein_requirement_dcp: IndexMap::new(),
            daily_feed_consumption_g: 0.0,
            total_feed_per_stage_kg: None,
            calcium_requirement: None,
        }
    }

    #[test]
    fn seven_week_layer_chick_is_chick() {
        let result = StageDetector::detect(&kb(), 7.0, "Eggs");
        assert_eq!(result.frame_key, "Chick");
        assert_eq!(result.best_label, "growing");
        assert!(result.degree > 0.0 && result.degree <= 1.0);
        assert_eq!(result.method, DetectionMethod::Fuzzy);
    }

    #[test]
    fn twenty_five_weeks_is_productive_layer() {
        let result = StageDetector::detect(&kb(), 25.0, "Eggs");
        assert_eq!(result.frame_key, "Layer");
        assert_eq!(result.best_label, "productive");
    }

    #[test]
    fn meat_reason_only_considers_broilers() {
        let result = StageDetector::detect(&kb(), 1.0, "Meat");
        assert!(result.frame_key.starts_with("Broiler"));
        // Aos 0 semanas o pico degenerado do starter vale 1.0
        let day_old = StageDetector::detect(&kb(), 0.0, "broiler meat");
        assert_eq!(day_old.frame_key, "Broiler Starter");
        assert_eq!(day_old.degree, 1.0);
    }

    #[test]
    fn no_overlap_falls_back_to_crisp_table() {
        let result = StageDetector::detect(&kb(), 100.0, "Eggs");
        assert_eq!(result.method, DetectionMethod::Crisp);
        assert_eq!(result.frame_key, "Layer");
        assert_eq!(result.best_label, "productive");

        let result = StageDetector::detect(&kb(), 9.0, "Meat");
        assert_eq!(result.method, DetectionMethod::Crisp);
        assert_eq!(result.frame_key, "Broiler Finisher");
        assert_eq!(result.best_label, "finisher");
    }

    #[test]
    fn crisp_table_thresholds() {
        let empty = KnowledgeBase::new();
        let cases = [
            (1.5, "Meat", "Broiler Starter"),
            (1.6, "Meat", "Broiler Grower"),
            (4.0, "Meat", "Broiler Grower"),
            (8.0, "Eggs", "Chick"),
            (8.5, "Eggs", "Pullet"),
            (20.0, "Eggs", "Pullet"),
            (20.5, "Eggs", "Layer"),
        ];
        for (age, reason, expected) in cases {
            let result = StageDetector::detect(&empty, age, reason);
            assert_eq!(result.frame_key, expected, "age {age} / {reason}");
        }
    }

    #[test]
    fn missing_fallback_key_uses_first_declared_frame() {
        let mut kb = KnowledgeBase::new();
        kb.frames
            .insert("Kienyeji".into(), frame("Dual Purpose", &[("adult", [30.0, 40.0, 50.0])]));
        kb.frames
            .insert("Duckling".into(), frame("Growth", &[("young", [0.0, 2.0, 4.0])]));
        let result = StageDetector::detect(&kb, 10.0, "Eggs");
        assert_eq!(result.method, DetectionMethod::Crisp);
        assert_eq!(result.frame_key, "Kienyeji");
        assert_eq!(result.best_label, "peak");
    }

    #[test]
    fn empty_candidate_set_widens_to_all_frames() {
        let mut kb = KnowledgeBase::new();
        kb.frames
            .insert("Layer".into(), frame("Egg Production", &[("productive", [0.0, 5.0, 10.0])]));
        let result = StageDetector::detect(&kb, 5.0, "Meat");
        assert_eq!(result.frame_key, "Layer");
        assert_eq!(result.method, DetectionMethod::Fuzzy);
    }

    #[test]
    fn ties_keep_first_seen() {
        let mut kb = KnowledgeBase::new();
        kb.frames.insert(
            "A".into(),
            frame("Growth", &[("first", [0.0, 5.0, 10.0]), ("second", [0.0, 5.0, 10.0])]),
        );
        kb.frames
            .insert("B".into(), frame("Growth", &[("other", [0.0, 5.0, 10.0])]));
        let result = StageDetector::detect(&kb, 3.0, "Eggs");
        assert_eq!(result.frame_key, "A");
        assert_eq!(result.best_label, "first");
    }

    #[test]
    fn malformed_sets_do_not_abort_detection() {
        let mut kb = KnowledgeBase::new();
        let mut broken = frame("Growth", &[]);
        broken.age_stage = AgeStage::Fuzzy {
            fuzzy: [("bad".to_string(), TriangleSpec::Text("x".into()))]
                .into_iter()
                .collect(),
        };
        kb.frames.insert("Chick".into(), broken);
        let result = StageDetector::detect(&kb, 3.0, "Eggs");
        assert_eq!(result.method, DetectionMethod::Crisp);
        assert_eq!(result.frame_key, "Chick");
    }
}
