use crate::error::{PlacementError, Result};

/// Check whether any value is NaN or infinite
pub fn has_invalid_values(arr: &[f64]) -> bool {
    arr.iter().any(|&x| x.is_nan() || x.is_infinite())
}

/// Apply the SE floor; NaN collapses to the floor as well
pub fn floor_standard_error(se: f64, min_se: f64) -> f64 {
    if se.is_nan() {
        min_se
    } else {
        se.max(min_se)
    }
}

/// Prior mean must be finite and prior SD strictly positive and finite
pub fn validate_prior(mean: f64, sd: f64) -> Result<()> {
    if has_invalid_values(&[mean, sd]) || sd <= 0.0 {
        return Err(PlacementError::InvalidPrior { mean, sd });
    }
    Ok(())
}

/// Difficulty stored with a response must be finite
pub fn validate_difficulty(topic_id: &str, value: f64) -> Result<()> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(PlacementError::InvalidDifficulty {
            topic_id: topic_id.to_string(),
            value,
        })
    }
}
