use thiserror::Error;

/// Caller contract violations surfaced by the placement engine.
///
/// Exhaustion and the session cap are not errors; they are signalled through
/// `Option::None` from the selector and `PlacementEngine::should_stop`.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PlacementError {
    #[error("unknown topic: {0}")]
    UnknownTopic(String),
    #[error("topic already tested in this session: {0}")]
    DuplicateTopic(String),
    #[error("session cap of {cap} responses reached")]
    SessionCapReached { cap: usize },
    #[error("invalid difficulty for {topic_id}: {value}")]
    InvalidDifficulty { topic_id: String, value: f64 },
    #[error("invalid prior: mean={mean}, sd={sd}")]
    InvalidPrior { mean: f64, sd: f64 },
    #[error("invalid curriculum: {0}")]
    InvalidCurriculum(String),
    #[error("invalid session record: {0}")]
    InvalidRecord(String),
    #[error("validation error: {0}")]
    Validation(String),
}

pub type Result<T> = std::result::Result<T, PlacementError>;
