//! Posterior Estimator
//!
//! Expected-a-posteriori (EAP) ability estimation by quadrature. The
//! unnormalised log-posterior is evaluated on an evenly spaced theta grid:
//!
//! ```text
//! log π(θ) = log N(θ; μ₀, σ₀) + Σᵢ log P(xᵢ | θ, bᵢ, formatᵢ)
//! ```
//!
//! Weights are exponentiated relative to the maximum log-posterior. The EAP
//! mean and SD are the weight-normalised first and second moments over the
//! grid. EAP stays finite for all-correct and all-incorrect patterns, where
//! maximum likelihood diverges.

use std::f64::consts::PI;

use crate::config::EstimatorConfig;
use crate::irt::response_log_likelihood;
use crate::sanitize::{floor_standard_error, has_invalid_values};
use crate::types::{Posterior, Response};

/// Upper bound on grid size for very wide priors
const MAX_GRID_POINTS: usize = 10_001;

/// Log density of Normal(mean, sd) at x
pub fn log_normal_density(x: f64, mean: f64, sd: f64) -> f64 {
    let z = (x - mean) / sd;
    -0.5 * z * z - sd.ln() - 0.5 * (2.0 * PI).ln()
}

/// Theta grid for a given prior.
///
/// Always spans `[grid_min, grid_max]` and is widened at the same spacing so
/// it also covers `prior_mean ± prior_coverage_sd · prior_sd`.
pub fn quadrature_grid(config: &EstimatorConfig, prior_mean: f64, prior_sd: f64) -> Vec<f64> {
    let reach = config.prior_coverage_sd * prior_sd;
    let lo = config.grid_min.min(prior_mean - reach);
    let hi = config.grid_max.max(prior_mean + reach);

    let mut step = config.grid_step();
    let mut intervals = ((hi - lo) / step).round() as usize;
    if intervals + 1 > MAX_GRID_POINTS {
        intervals = MAX_GRID_POINTS - 1;
        step = (hi - lo) / intervals as f64;
    }

    (0..=intervals).map(|i| lo + i as f64 * step).collect()
}

/// EAP ability estimate and its standard error.
///
/// Zero responses return the prior unchanged. Degenerate weights (non-finite
/// maximum, zero or non-finite total) also fall back to the prior.
pub fn compute_posterior(
    config: &EstimatorConfig,
    prior_mean: f64,
    prior_sd: f64,
    responses: &[Response],
) -> Posterior {
    let prior = Posterior {
        theta: prior_mean,
        se: floor_standard_error(prior_sd, config.min_se),
    };

    if responses.is_empty() {
        return prior;
    }
    if has_invalid_values(&[prior_mean, prior_sd]) || prior_sd <= 0.0 {
        tracing::warn!(prior_mean, prior_sd, "Invalid prior, posterior not updated");
        return prior;
    }

    let grid = quadrature_grid(config, prior_mean, prior_sd);
    let log_posterior: Vec<f64> = grid
        .iter()
        .map(|&theta| {
            let log_prior = log_normal_density(theta, prior_mean, prior_sd);
            responses
                .iter()
                .fold(log_prior, |acc, r| acc + response_log_likelihood(r, theta))
        })
        .collect();

    let max_log = log_posterior
        .iter()
        .copied()
        .fold(f64::NEG_INFINITY, f64::max);
    if !max_log.is_finite() {
        tracing::warn!(
            responses = responses.len(),
            "Posterior weights degenerate, falling back to prior"
        );
        return prior;
    }

    let weights: Vec<f64> = log_posterior
        .iter()
        .map(|&lp| (lp - max_log).exp())
        .collect();
    let total: f64 = weights.iter().sum();
    if !(total.is_finite() && total > 0.0) {
        tracing::warn!(
            responses = responses.len(),
            total,
            "Posterior weights underflowed, falling back to prior"
        );
        return prior;
    }

    let mean = grid
        .iter()
        .zip(&weights)
        .map(|(theta, w)| theta * w)
        .sum::<f64>()
        / total;
    let variance = grid
        .iter()
        .zip(&weights)
        .map(|(theta, w)| w * (theta - mean).powi(2))
        .sum::<f64>()
        / total;

    Posterior {
        theta: mean,
        se: floor_standard_error(variance.sqrt(), config.min_se),
    }
}
