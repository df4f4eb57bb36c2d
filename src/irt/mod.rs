//! Item Response Theory Model
//!
//! Maps curriculum positions onto the theta scale and predicts the chance of a
//! correct answer with a three-parameter logistic (3PL) curve:
//!
//! ```text
//! P(correct | θ) = c + (1 - c) / (1 + exp(-a·(θ - b)))
//! ```
//!
//! - `a` is fixed at 1.0 for every item
//! - `b` is the topic difficulty from [`topic_difficulty`]
//! - `c` is the guessing floor, 0.25 for multiple choice and 0 for gap fill

use crate::types::{
    CefrLevel, ItemFormat, Response, DISCRIMINATION, LEVEL_SPAN, MULTIPLE_CHOICE_GUESSING,
};

// ==================== Difficulty Model ====================

/// Position of a topic on the theta scale.
///
/// Interpolates linearly across the level's band: the first topic sits at the
/// band's base, the last at `base + LEVEL_SPAN`. A single-topic level maps to
/// its base.
pub fn topic_difficulty(level: CefrLevel, order: u32, total_in_level: u32) -> f64 {
    let base = level.base_theta();
    let denominator = total_in_level.saturating_sub(1).max(1) as f64;
    let fraction = order.saturating_sub(1) as f64 / denominator;
    base + fraction * LEVEL_SPAN
}

// ==================== Response Probability ====================

/// Lower asymptote of the response curve for a format
pub fn guessing_floor(format: ItemFormat) -> f64 {
    match format {
        ItemFormat::MultipleChoice => MULTIPLE_CHOICE_GUESSING,
        ItemFormat::GapFill => 0.0,
    }
}

/// Probability of a correct response under the 3PL model
pub fn irt_probability(theta: f64, difficulty: f64, format: ItemFormat) -> f64 {
    let c = guessing_floor(format);
    let logistic = 1.0 / (1.0 + (-DISCRIMINATION * (theta - difficulty)).exp());
    c + (1.0 - c) * logistic
}

/// Log-likelihood of one recorded response at a candidate theta.
///
/// Uses the format stored with the response; may be `-inf` when the model
/// assigns the observed outcome zero probability.
pub fn response_log_likelihood(response: &Response, theta: f64) -> f64 {
    let p = irt_probability(theta, response.difficulty, response.item_format);
    if response.is_correct {
        p.ln()
    } else {
        (1.0 - p).ln()
    }
}
