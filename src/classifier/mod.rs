//! Proficiency Classifier
//!
//! Turns a continuous ability estimate into a CEFR band, scores how much of the
//! posterior mass supports that band, and locates the level boundary the
//! estimate is least certain about.

use serde::{Deserialize, Serialize};
use std::f64::consts::PI;
use std::fmt;

use crate::config::EstimatorConfig;
use crate::types::CefrLevel;

// ==================== Level Boundaries ====================

/// Boundary between two adjacent CEFR levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum LevelBoundary {
    #[serde(rename = "A1/A2")]
    A1A2,
    #[serde(rename = "A2/B1")]
    A2B1,
    #[serde(rename = "B1/B2")]
    B1B2,
    #[serde(rename = "B2/C1")]
    B2C1,
    #[serde(rename = "C1/C2")]
    C1C2,
}

impl LevelBoundary {
    pub const ALL: [LevelBoundary; 5] = [
        LevelBoundary::A1A2,
        LevelBoundary::A2B1,
        LevelBoundary::B1B2,
        LevelBoundary::B2C1,
        LevelBoundary::C1C2,
    ];

    pub fn index(&self) -> usize {
        match self {
            Self::A1A2 => 0,
            Self::A2B1 => 1,
            Self::B1B2 => 2,
            Self::B2C1 => 3,
            Self::C1C2 => 4,
        }
    }

    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::A1A2 => "A1/A2",
            Self::A2B1 => "A2/B1",
            Self::B1B2 => "B1/B2",
            Self::B2C1 => "B2/C1",
            Self::C1C2 => "C1/C2",
        }
    }

    /// Theta where the upper level's band begins
    pub fn anchor_theta(&self) -> f64 {
        self.upper().base_theta()
    }

    pub fn lower(&self) -> CefrLevel {
        CefrLevel::ALL[self.index()]
    }

    pub fn upper(&self) -> CefrLevel {
        CefrLevel::ALL[self.index() + 1]
    }
}

impl fmt::Display for LevelBoundary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

// ==================== Classification ====================

/// Step function over theta; each boundary belongs to the level above it.
///
/// NaN has no boundary at or below it and therefore maps to A1.
pub fn classify_level(theta: f64) -> CefrLevel {
    let crossed = LevelBoundary::ALL
        .iter()
        .filter(|boundary| theta >= boundary.anchor_theta())
        .count();
    CefrLevel::ALL[crossed]
}

/// Boundary whose anchor is closest to theta; ties go to the lower boundary
pub fn find_most_uncertain_boundary(theta: f64) -> LevelBoundary {
    let mut best = LevelBoundary::A1A2;
    let mut best_distance = (best.anchor_theta() - theta).abs();

    for boundary in LevelBoundary::ALL.iter().skip(1) {
        let distance = (boundary.anchor_theta() - theta).abs();
        if distance < best_distance {
            best = *boundary;
            best_distance = distance;
        }
    }

    best
}

// ==================== Confidence ====================

/// Share of a Normal(theta, se) posterior that falls inside `level`'s band.
///
/// The in-band mass is divided by the mass over the base estimator grid
/// `[grid_min, grid_max]`, so the value is relative to what the grid can
/// represent. This is the curriculum grid, not the prior-widened grid from
/// [`crate::posterior::quadrature_grid`]: confidence measures band mass
/// against the fixed scale every session shares, whatever its prior.
/// A non-positive or non-finite `se` is treated as a point mass.
pub fn level_confidence(theta: f64, se: f64, level: CefrLevel, config: &EstimatorConfig) -> f64 {
    if !theta.is_finite() {
        return 0.0;
    }
    if !se.is_finite() || se <= 0.0 {
        return if classify_level(theta) == level { 1.0 } else { 0.0 };
    }

    let density = |x: f64| normal_density(x, theta, se);
    let per_unit = config.confidence_steps_per_unit;

    let band = simpson(density, level.base_theta(), level.top_theta(), per_unit);
    let full = simpson(density, config.grid_min, config.grid_max, per_unit);

    if full <= 0.0 || !full.is_finite() {
        return 0.0;
    }
    (band / full).clamp(0.0, 1.0)
}

fn normal_density(x: f64, mean: f64, sd: f64) -> f64 {
    let z = (x - mean) / sd;
    (-0.5 * z * z).exp() / (sd * (2.0 * PI).sqrt())
}

/// Composite Simpson rule with an even interval count proportional to width
fn simpson<F: Fn(f64) -> f64>(f: F, a: f64, b: f64, steps_per_unit: usize) -> f64 {
    let width = b - a;
    if width <= 0.0 {
        return 0.0;
    }
    let mut n = ((width * steps_per_unit as f64).ceil() as usize).max(2);
    if n % 2 == 1 {
        n += 1;
    }
    let h = width / n as f64;

    let mut sum = f(a) + f(b);
    for i in 1..n {
        let weight = if i % 2 == 1 { 4.0 } else { 2.0 };
        sum += weight * f(a + i as f64 * h);
    }
    sum * h / 3.0
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Abramowitz & Stegun 7.1.26, |error| < 1.5e-7
    fn erf(x: f64) -> f64 {
        let sign = if x < 0.0 { -1.0 } else { 1.0 };
        let x = x.abs();
        let t = 1.0 / (1.0 + 0.3275911 * x);
        let poly = t
            * (0.254829592
                + t * (-0.284496736 + t * (1.421413741 + t * (-1.453152027 + t * 1.061405429))));
        sign * (1.0 - poly * (-x * x).exp())
    }

    fn normal_cdf(x: f64, mean: f64, sd: f64) -> f64 {
        0.5 * (1.0 + erf((x - mean) / (sd * std::f64::consts::SQRT_2)))
    }

    #[test]
    fn test_classify_level_boundaries() {
        assert_eq!(classify_level(-1.0), CefrLevel::A2);
        assert_eq!(classify_level(0.0), CefrLevel::B1);
        assert_eq!(classify_level(1.0), CefrLevel::B2);
        assert_eq!(classify_level(2.0), CefrLevel::C1);
        assert_eq!(classify_level(3.0), CefrLevel::C2);
    }

    #[test]
    fn test_classify_level_interior_and_extremes() {
        assert_eq!(classify_level(-1.0001), CefrLevel::A1);
        assert_eq!(classify_level(-0.5), CefrLevel::A2);
        assert_eq!(classify_level(0.9999), CefrLevel::B1);
        assert_eq!(classify_level(-50.0), CefrLevel::A1);
        assert_eq!(classify_level(50.0), CefrLevel::C2);
        assert_eq!(classify_level(f64::NAN), CefrLevel::A1);
    }

    #[test]
    fn test_find_most_uncertain_boundary() {
        assert_eq!(find_most_uncertain_boundary(-1.5), LevelBoundary::A1A2);
        assert_eq!(find_most_uncertain_boundary(1.0), LevelBoundary::B1B2);
        assert_eq!(find_most_uncertain_boundary(3.0), LevelBoundary::C1C2);
        assert_eq!(find_most_uncertain_boundary(9.0), LevelBoundary::C1C2);
    }

    #[test]
    fn test_boundary_ties_prefer_lower() {
        assert_eq!(find_most_uncertain_boundary(0.5), LevelBoundary::A2B1);
        assert_eq!(find_most_uncertain_boundary(2.5), LevelBoundary::B2C1);
        assert_eq!(find_most_uncertain_boundary(f64::NAN), LevelBoundary::A1A2);
    }

    #[test]
    fn test_boundary_labels_and_levels() {
        assert_eq!(LevelBoundary::B2C1.label(), "B2/C1");
        assert_eq!(LevelBoundary::B2C1.lower(), CefrLevel::B2);
        assert_eq!(LevelBoundary::B2C1.upper(), CefrLevel::C1);
        assert_eq!(LevelBoundary::A1A2.anchor_theta(), -1.0);
        assert_eq!(LevelBoundary::C1C2.anchor_theta(), 3.0);
        let json = serde_json::to_string(&LevelBoundary::A2B1).unwrap();
        assert_eq!(json, "\"A2/B1\"");
    }

    #[test]
    fn test_confidence_high_at_band_centre() {
        let config = EstimatorConfig::default();
        let conf = level_confidence(0.5, 0.1, CefrLevel::B1, &config);
        assert!(conf > 0.999, "centre of band with tight se, got {}", conf);
    }

    #[test]
    fn test_confidence_split_on_boundary() {
        let config = EstimatorConfig::default();
        let lower = level_confidence(1.0, 0.3, CefrLevel::B1, &config);
        let upper = level_confidence(1.0, 0.3, CefrLevel::B2, &config);
        assert!((lower - upper).abs() < 1e-6);
        assert!(lower < 0.5 && lower > 0.45, "got {}", lower);
    }

    #[test]
    fn test_confidence_shrinks_with_wider_se() {
        let config = EstimatorConfig::default();
        let tight = level_confidence(0.5, 0.2, CefrLevel::B1, &config);
        let wide = level_confidence(0.5, 1.5, CefrLevel::B1, &config);
        assert!(wide < tight);
        assert!(wide > 0.0);
    }

    #[test]
    fn test_confidence_degenerate_se() {
        let config = EstimatorConfig::default();
        assert_eq!(level_confidence(0.5, 0.0, CefrLevel::B1, &config), 1.0);
        assert_eq!(level_confidence(0.5, 0.0, CefrLevel::B2, &config), 0.0);
        assert_eq!(level_confidence(f64::NAN, 0.5, CefrLevel::B2, &config), 0.0);
    }

    #[test]
    fn test_confidences_sum_to_at_most_one() {
        let config = EstimatorConfig::default();
        for (theta, se) in [(-2.0, 1.5), (0.3, 0.4), (3.9, 0.8), (1.0, 2.0)] {
            let total: f64 = CefrLevel::ALL
                .iter()
                .map(|level| level_confidence(theta, se, *level, &config))
                .sum();
            assert!(total <= 1.0 + 1e-9, "theta={} se={} total={}", theta, se, total);
        }
    }

    /// Grid-normalised confidence stays within 1e-3 of the exact Normal band
    /// mass whenever theta lies in the curriculum band and se <= 0.6.
    #[test]
    fn test_grid_normalisation_error_is_bounded() {
        let config = EstimatorConfig::default();
        let mut worst: f64 = 0.0;
        for step in 0..=24 {
            let theta = -2.0 + step as f64 * 0.25;
            for se in [0.1, 0.3, 0.45, 0.6] {
                for level in CefrLevel::ALL {
                    let exact = normal_cdf(level.top_theta(), theta, se)
                        - normal_cdf(level.base_theta(), theta, se);
                    let conf = level_confidence(theta, se, level, &config);
                    worst = worst.max((conf - exact).abs());
                }
            }
        }
        assert!(worst < 1e-3, "worst deviation {}", worst);
    }
}
