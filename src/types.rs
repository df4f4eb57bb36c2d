//! Common Types and Constants
//!
//! Shared data structures used across the placement modules.

use serde::{Deserialize, Serialize};
use std::fmt;

// ==================== Constants ====================

/// Width of every CEFR band on the theta scale
pub const LEVEL_SPAN: f64 = 1.0;

/// Guessing floor for four-option multiple choice
pub const MULTIPLE_CHOICE_GUESSING: f64 = 0.25;

/// Fixed item discrimination (a)
pub const DISCRIMINATION: f64 = 1.0;

// ==================== CEFR Levels ====================

/// CEFR proficiency band, ordered from A1 (lowest) to C2 (highest)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum CefrLevel {
    A1,
    A2,
    B1,
    B2,
    C1,
    C2,
}

impl CefrLevel {
    /// All levels in ascending order
    pub const ALL: [CefrLevel; 6] = [
        CefrLevel::A1,
        CefrLevel::A2,
        CefrLevel::B1,
        CefrLevel::B2,
        CefrLevel::C1,
        CefrLevel::C2,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::A1 => "A1",
            Self::A2 => "A2",
            Self::B1 => "B1",
            Self::B2 => "B2",
            Self::C1 => "C1",
            Self::C2 => "C2",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_uppercase().as_str() {
            "A1" => Some(Self::A1),
            "A2" => Some(Self::A2),
            "B1" => Some(Self::B1),
            "B2" => Some(Self::B2),
            "C1" => Some(Self::C1),
            "C2" => Some(Self::C2),
            _ => None,
        }
    }

    pub fn index(&self) -> usize {
        match self {
            Self::A1 => 0,
            Self::A2 => 1,
            Self::B1 => 2,
            Self::B2 => 3,
            Self::C1 => 4,
            Self::C2 => 5,
        }
    }

    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    /// Lower edge of this level's band on the theta scale
    pub fn base_theta(&self) -> f64 {
        self.index() as f64 - 2.0
    }

    /// Upper edge of this level's band on the theta scale
    pub fn top_theta(&self) -> f64 {
        self.base_theta() + LEVEL_SPAN
    }

    pub fn below(&self) -> Option<Self> {
        self.index().checked_sub(1).and_then(Self::from_index)
    }

    pub fn above(&self) -> Option<Self> {
        Self::from_index(self.index() + 1)
    }
}

impl fmt::Display for CefrLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ==================== Item Formats ====================

/// Presentation format of an item; determines the IRT guessing floor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ItemFormat {
    /// Free-text gap fill, guessing is not viable
    GapFill,
    /// Four-option multiple choice
    MultipleChoice,
}

impl ItemFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::GapFill => "gap_fill",
            Self::MultipleChoice => "multiple_choice",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "gap_fill" => Some(Self::GapFill),
            "multiple_choice" => Some(Self::MultipleChoice),
            _ => None,
        }
    }
}

impl fmt::Display for ItemFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ==================== Curriculum Types ====================

/// Grammar topic from the curriculum catalog
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Topic {
    pub id: String,
    pub level: CefrLevel,
    /// 1-based position within the level
    pub order: u32,
}

impl Topic {
    pub fn new(id: impl Into<String>, level: CefrLevel, order: u32) -> Self {
        Self {
            id: id.into(),
            level,
            order,
        }
    }
}

// ==================== Session Types ====================

/// One answered item, kept in chronological order in the session
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Response {
    pub topic_id: String,
    pub is_correct: bool,
    /// Item difficulty on the theta scale at the time it was presented
    pub difficulty: f64,
    /// Format the item was actually presented in
    pub item_format: ItemFormat,
}

impl Response {
    pub fn new(
        topic_id: impl Into<String>,
        is_correct: bool,
        difficulty: f64,
        item_format: ItemFormat,
    ) -> Self {
        Self {
            topic_id: topic_id.into(),
            is_correct,
            difficulty,
            item_format,
        }
    }
}

/// Ability estimate produced by the posterior estimator
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Posterior {
    /// EAP mean
    pub theta: f64,
    /// Posterior standard deviation, floored
    pub se: f64,
}

/// Item chosen by the selector for presentation
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SelectedItem {
    pub topic_id: String,
    pub level: CefrLevel,
    pub item_format: ItemFormat,
    /// Snapshot of the topic's scale position at selection time
    pub difficulty: f64,
}

// ==================== Gap Map Types ====================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MasteryStatus {
    Mastered,
    NotMastered,
    /// Within one SE of the ability estimate, genuinely ambiguous
    Untested,
}

impl MasteryStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Mastered => "mastered",
            Self::NotMastered => "not_mastered",
            Self::Untested => "untested",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GapMapEntry {
    pub topic_id: String,
    pub level: CefrLevel,
    pub status: MasteryStatus,
    /// Whether the status came from an actual response
    pub tested: bool,
}

/// Per-level reduction of a gap map
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LevelSummary {
    pub mastered: usize,
    pub not_mastered: usize,
    pub untested: usize,
}

impl LevelSummary {
    pub fn total(&self) -> usize {
        self.mastered + self.not_mastered + self.untested
    }
}
