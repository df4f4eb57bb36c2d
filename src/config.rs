use serde::{Deserialize, Serialize};

use crate::error::{PlacementError, Result};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EstimatorConfig {
    /// Lower edge of the base quadrature grid
    pub grid_min: f64,
    /// Upper edge of the base quadrature grid
    pub grid_max: f64,
    /// Points on the base grid; fixes the grid spacing
    pub grid_points: usize,
    /// The grid is extended to cover prior mean ± this many prior SDs
    pub prior_coverage_sd: f64,
    /// Floor applied to the posterior SE
    pub min_se: f64,
    /// Simpson intervals per theta unit for level confidence
    pub confidence_steps_per_unit: usize,
}

impl Default for EstimatorConfig {
    fn default() -> Self {
        Self {
            grid_min: -4.0,
            grid_max: 6.0,
            grid_points: 101,
            prior_coverage_sd: 6.0,
            min_se: 0.1,
            confidence_steps_per_unit: 100,
        }
    }
}

impl EstimatorConfig {
    pub fn grid_step(&self) -> f64 {
        (self.grid_max - self.grid_min) / (self.grid_points.max(2) - 1) as f64
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PhaseConfig {
    /// Responses after which level-finding ends
    pub min_responses: usize,
    /// SE below which level-finding ends early
    pub se_threshold: f64,
}

impl Default for PhaseConfig {
    fn default() -> Self {
        Self {
            min_responses: 6,
            se_threshold: 0.5,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlacementConfig {
    pub estimator: EstimatorConfig,
    pub phase: PhaseConfig,
    /// Hard cap on responses per session
    pub session_cap: usize,
    /// First item goes to the floor probes when the prior sits below this
    pub beginner_probe_theta: f64,
    /// Prior SD used when the host supplies only a prior mean
    pub default_prior_sd: f64,
}

impl Default for PlacementConfig {
    fn default() -> Self {
        Self {
            estimator: EstimatorConfig::default(),
            phase: PhaseConfig::default(),
            session_cap: 10,
            beginner_probe_theta: -1.5,
            default_prior_sd: 1.5,
        }
    }
}

impl PlacementConfig {
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(val) = std::env::var("PLACEMENT_SESSION_CAP") {
            config.session_cap = val.parse().unwrap_or(config.session_cap);
        }
        if let Ok(val) = std::env::var("PLACEMENT_PHASE_MIN_RESPONSES") {
            config.phase.min_responses = val.parse().unwrap_or(config.phase.min_responses);
        }
        if let Ok(val) = std::env::var("PLACEMENT_PHASE_SE_THRESHOLD") {
            config.phase.se_threshold = val.parse().unwrap_or(config.phase.se_threshold);
        }
        if let Ok(val) = std::env::var("PLACEMENT_GRID_POINTS") {
            config.estimator.grid_points = val.parse().unwrap_or(config.estimator.grid_points);
        }
        if let Ok(val) = std::env::var("PLACEMENT_MIN_SE") {
            config.estimator.min_se = val.parse().unwrap_or(config.estimator.min_se);
        }
        if let Ok(val) = std::env::var("PLACEMENT_BEGINNER_PROBE_THETA") {
            config.beginner_probe_theta = val.parse().unwrap_or(config.beginner_probe_theta);
        }

        config
    }

    pub fn validate(&self) -> Result<()> {
        let est = &self.estimator;
        if est.grid_points < 61 {
            return Err(PlacementError::Validation(format!(
                "grid_points must be at least 61, got {}",
                est.grid_points
            )));
        }
        if !(est.grid_min.is_finite() && est.grid_max.is_finite()) || est.grid_min >= est.grid_max
        {
            return Err(PlacementError::Validation(format!(
                "grid bounds must satisfy min < max, got [{}, {}]",
                est.grid_min, est.grid_max
            )));
        }
        if est.min_se.is_nan() || est.min_se <= 0.0 {
            return Err(PlacementError::Validation(format!(
                "min_se must be positive, got {}",
                est.min_se
            )));
        }
        if est.prior_coverage_sd.is_nan() || est.prior_coverage_sd < 0.0 {
            return Err(PlacementError::Validation(format!(
                "prior_coverage_sd must be non-negative, got {}",
                est.prior_coverage_sd
            )));
        }
        if est.confidence_steps_per_unit == 0 {
            return Err(PlacementError::Validation(
                "confidence_steps_per_unit must be positive".to_string(),
            ));
        }
        if self.session_cap == 0 {
            return Err(PlacementError::Validation(
                "session_cap must be positive".to_string(),
            ));
        }
        if self.phase.min_responses == 0 || self.phase.min_responses > self.session_cap {
            return Err(PlacementError::Validation(format!(
                "phase.min_responses must be in 1..={}, got {}",
                self.session_cap, self.phase.min_responses
            )));
        }
        if self.phase.se_threshold.is_nan() || self.phase.se_threshold <= 0.0 {
            return Err(PlacementError::Validation(format!(
                "phase.se_threshold must be positive, got {}",
                self.phase.se_threshold
            )));
        }
        if !self.default_prior_sd.is_finite() || self.default_prior_sd <= 0.0 {
            return Err(PlacementError::Validation(format!(
                "default_prior_sd must be positive, got {}",
                self.default_prior_sd
            )));
        }
        Ok(())
    }
}
