//! # danci-placement - adaptive CEFR grammar placement engine
//!
//! Scoring and decision core of the grammar placement test:
//!
//! - **IRT model** - 3PL response probability with a format-dependent guessing floor
//! - **Posterior estimator** - EAP ability estimate by grid quadrature
//! - **Item selector** - two-phase policy (level finding, then gap mapping)
//! - **Classifier** - theta to CEFR band, band confidence, most uncertain boundary
//! - **Gap map** - Guttman-style mastery inference for every catalog topic
//!
//! Every operation is a pure function of its inputs; session state is replaced
//! wholesale on each answer and serializes to a flat record.
//!
//! ## Modules
//!
//! - [`irt`] - difficulty model and response probability
//! - [`posterior`] - quadrature grid and EAP
//! - [`classifier`] - level classification and confidence
//! - [`session`] - session state, phase machine, flat record
//! - [`selector`] - adaptive item selection
//! - [`gap_map`] - mastery inference and per-level summary
//! - [`curriculum`] - topic catalog and gateway lists
//! - [`engine`] - session lifecycle facade
//! - [`simulation`] - seeded synthetic candidates
//! - [`config`] - tunables with environment overrides
//! - [`sanitize`] - numeric guards
//! - [`types`] - shared types and constants
//!
//! ## Example
//!
//! ```rust
//! use danci_placement::PlacementEngine;
//!
//! let engine = PlacementEngine::standard();
//! let mut state = engine.start(-2.0).unwrap();
//!
//! while let Some(item) = engine.next_item(&state) {
//!     // Render the item and check the answer elsewhere
//!     let is_correct = item.difficulty < -0.5;
//!     state = engine.record_answer(&state, &item, is_correct).unwrap();
//! }
//!
//! let result = engine.finish(&state);
//! assert_eq!(result.gap_map.len(), 111);
//! ```

#![deny(clippy::all)]

// ============================================================================
// Modules
// ============================================================================

pub mod classifier;
pub mod config;
pub mod curriculum;
pub mod engine;
pub mod error;
pub mod gap_map;
pub mod irt;
pub mod posterior;
pub mod sanitize;
pub mod selector;
pub mod session;
pub mod simulation;
pub mod types;

// ============================================================================
// Re-exports
// ============================================================================

pub use classifier::{classify_level, find_most_uncertain_boundary, level_confidence, LevelBoundary};
pub use config::{EstimatorConfig, PhaseConfig, PlacementConfig};
pub use curriculum::{Curriculum, GatewayConfig};
pub use engine::{PlacementEngine, PlacementResult};
pub use error::{PlacementError, Result};
pub use gap_map::{build_gap_map, summarize_gap_map};
pub use irt::{irt_probability, topic_difficulty};
pub use posterior::compute_posterior;
pub use selector::{item_format_for, ItemSelector};
pub use session::{bayesian_update, Phase, SessionRecord, SessionState};
pub use simulation::{simulate_cohort, simulate_session, CohortReport, SimulatedCandidate};
pub use types::*;
