//! Gap Map Builder
//!
//! Guttman-style mastery inference for every catalog topic. Tested topics keep
//! their recorded outcome; untested topics are placed relative to the final
//! ability estimate using their scale position:
//!
//! ```text
//! distance = θ - difficulty
//! distance >  se  → mastered
//! distance < -se  → not_mastered
//! otherwise       → untested (ambiguous, a candidate for near-term teaching)
//! ```

use std::collections::HashMap;

use crate::curriculum::Curriculum;
use crate::types::{CefrLevel, GapMapEntry, LevelSummary, MasteryStatus, Response};

/// One entry per catalog topic, in curriculum order.
///
/// Responses for topics outside the catalog are ignored.
pub fn build_gap_map(
    curriculum: &Curriculum,
    theta: f64,
    se: f64,
    responses: &[Response],
) -> Vec<GapMapEntry> {
    let outcomes: HashMap<&str, bool> = responses
        .iter()
        .map(|r| (r.topic_id.as_str(), r.is_correct))
        .collect();

    curriculum
        .topics()
        .iter()
        .map(|topic| {
            let (status, tested) = match outcomes.get(topic.id.as_str()) {
                Some(true) => (MasteryStatus::Mastered, true),
                Some(false) => (MasteryStatus::NotMastered, true),
                None => (
                    infer_status(theta, se, curriculum.difficulty(topic)),
                    false,
                ),
            };
            GapMapEntry {
                topic_id: topic.id.clone(),
                level: topic.level,
                status,
                tested,
            }
        })
        .collect()
}

fn infer_status(theta: f64, se: f64, difficulty: f64) -> MasteryStatus {
    let distance = theta - difficulty;
    if distance > se {
        MasteryStatus::Mastered
    } else if distance < -se {
        MasteryStatus::NotMastered
    } else {
        MasteryStatus::Untested
    }
}

/// Status counts per level, A1 first
pub fn summarize_gap_map(entries: &[GapMapEntry]) -> Vec<(CefrLevel, LevelSummary)> {
    let mut summaries: Vec<(CefrLevel, LevelSummary)> = CefrLevel::ALL
        .iter()
        .map(|&level| (level, LevelSummary::default()))
        .collect();

    for entry in entries {
        let summary = &mut summaries[entry.level.index()].1;
        match entry.status {
            MasteryStatus::Mastered => summary.mastered += 1,
            MasteryStatus::NotMastered => summary.not_mastered += 1,
            MasteryStatus::Untested => summary.untested += 1,
        }
    }

    summaries
}
