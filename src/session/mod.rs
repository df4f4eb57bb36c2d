//! Session State
//!
//! Immutable per-attempt record threaded through the placement test. Every
//! answered item produces a new state through [`bayesian_update`]; nothing is
//! mutated in place.
//!
//! Serialization goes through [`SessionRecord`], a flat record of numbers,
//! strings, booleans and flat lists, so hosts can persist state in any format.
//! Deserialization re-checks every invariant.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::classifier::classify_level;
use crate::config::PlacementConfig;
use crate::error::{PlacementError, Result};
use crate::posterior::compute_posterior;
use crate::sanitize::{floor_standard_error, validate_difficulty, validate_prior};
use crate::types::{CefrLevel, ItemFormat, Posterior, Response};

// ==================== Phase ====================

/// Test phase; the classified level exists only once gap mapping starts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Phase 1: probing level boundaries
    LevelFinding,
    /// Phase 2: probing topics around the locked level
    GapMapping { classified_level: CefrLevel },
}

impl Phase {
    pub fn number(&self) -> u8 {
        match self {
            Self::LevelFinding => 1,
            Self::GapMapping { .. } => 2,
        }
    }

    pub fn classified_level(&self) -> Option<CefrLevel> {
        match self {
            Self::LevelFinding => None,
            Self::GapMapping { classified_level } => Some(*classified_level),
        }
    }
}

// ==================== Session State ====================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "SessionRecord", into = "SessionRecord")]
pub struct SessionState {
    theta: f64,
    se: f64,
    prior_theta: f64,
    prior_sd: f64,
    responses: Vec<Response>,
    phase: Phase,
    tested_topic_ids: Vec<String>,
}

impl SessionState {
    /// Fresh session from a prior supplied by the host
    pub fn new(prior_theta: f64, prior_sd: f64, config: &PlacementConfig) -> Result<Self> {
        validate_prior(prior_theta, prior_sd)?;
        Ok(Self {
            theta: prior_theta,
            se: floor_standard_error(prior_sd, config.estimator.min_se),
            prior_theta,
            prior_sd,
            responses: Vec::new(),
            phase: Phase::LevelFinding,
            tested_topic_ids: Vec::new(),
        })
    }

    /// Fresh session using the configured default prior SD
    pub fn with_default_prior(prior_theta: f64, config: &PlacementConfig) -> Result<Self> {
        Self::new(prior_theta, config.default_prior_sd, config)
    }

    pub fn theta(&self) -> f64 {
        self.theta
    }

    pub fn se(&self) -> f64 {
        self.se
    }

    pub fn posterior(&self) -> Posterior {
        Posterior {
            theta: self.theta,
            se: self.se,
        }
    }

    pub fn prior_theta(&self) -> f64 {
        self.prior_theta
    }

    pub fn prior_sd(&self) -> f64 {
        self.prior_sd
    }

    pub fn responses(&self) -> &[Response] {
        &self.responses
    }

    pub fn response_count(&self) -> usize {
        self.responses.len()
    }

    pub fn tested_topic_ids(&self) -> &[String] {
        &self.tested_topic_ids
    }

    pub fn has_tested(&self, topic_id: &str) -> bool {
        self.tested_topic_ids.iter().any(|id| id == topic_id)
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn classified_level(&self) -> Option<CefrLevel> {
        self.phase.classified_level()
    }
}

// ==================== Bayesian Update ====================

/// Record one answer and produce the next session state.
///
/// The posterior is recomputed from the session prior over the whole history,
/// using each response's stored format. Phase 1 ends once the response count
/// reaches `phase.min_responses` or the SE drops below `phase.se_threshold`;
/// the level classified at that moment is locked for the rest of the session.
pub fn bayesian_update(
    state: &SessionState,
    response: Response,
    config: &PlacementConfig,
) -> Result<SessionState> {
    validate_difficulty(&response.topic_id, response.difficulty)?;
    if state.responses.len() >= config.session_cap {
        return Err(PlacementError::SessionCapReached {
            cap: config.session_cap,
        });
    }
    if state.has_tested(&response.topic_id) {
        return Err(PlacementError::DuplicateTopic(response.topic_id));
    }

    let mut responses = state.responses.clone();
    let mut tested_topic_ids = state.tested_topic_ids.clone();
    tested_topic_ids.push(response.topic_id.clone());
    responses.push(response);

    let posterior = compute_posterior(
        &config.estimator,
        state.prior_theta,
        state.prior_sd,
        &responses,
    );

    let phase = match state.phase {
        Phase::LevelFinding
            if responses.len() >= config.phase.min_responses
                || posterior.se < config.phase.se_threshold =>
        {
            let classified_level = classify_level(posterior.theta);
            tracing::info!(
                level = %classified_level,
                theta = posterior.theta,
                se = posterior.se,
                responses = responses.len(),
                "Placement level locked, entering gap mapping"
            );
            Phase::GapMapping { classified_level }
        }
        phase => phase,
    };

    tracing::debug!(
        theta = posterior.theta,
        se = posterior.se,
        responses = responses.len(),
        phase = phase.number(),
        "Session posterior updated"
    );

    Ok(SessionState {
        theta: posterior.theta,
        se: posterior.se,
        prior_theta: state.prior_theta,
        prior_sd: state.prior_sd,
        responses,
        phase,
        tested_topic_ids,
    })
}

// ==================== Flat Record ====================

/// `(topic_id, is_correct, difficulty, item_format)`
pub type ResponseTuple = (String, bool, f64, String);

/// Persistable form of [`SessionState`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionRecord {
    pub theta: f64,
    pub se: f64,
    pub prior_theta: f64,
    pub prior_sd: f64,
    pub responses: Vec<ResponseTuple>,
    /// 1 = level finding, 2 = gap mapping
    pub phase: u8,
    pub classified_level: Option<String>,
    pub tested_topic_ids: Vec<String>,
}

impl From<SessionState> for SessionRecord {
    fn from(state: SessionState) -> Self {
        Self {
            theta: state.theta,
            se: state.se,
            prior_theta: state.prior_theta,
            prior_sd: state.prior_sd,
            responses: state
                .responses
                .into_iter()
                .map(|r| {
                    (
                        r.topic_id,
                        r.is_correct,
                        r.difficulty,
                        r.item_format.as_str().to_string(),
                    )
                })
                .collect(),
            phase: state.phase.number(),
            classified_level: state
                .phase
                .classified_level()
                .map(|level| level.as_str().to_string()),
            tested_topic_ids: state.tested_topic_ids,
        }
    }
}

impl From<&SessionState> for SessionRecord {
    fn from(state: &SessionState) -> Self {
        Self::from(state.clone())
    }
}

impl TryFrom<SessionRecord> for SessionState {
    type Error = PlacementError;

    fn try_from(record: SessionRecord) -> Result<Self> {
        let invalid = PlacementError::InvalidRecord;

        if !record.theta.is_finite() {
            return Err(invalid(format!("theta must be finite, got {}", record.theta)));
        }
        if !record.se.is_finite() || record.se <= 0.0 {
            return Err(invalid(format!("se must be positive, got {}", record.se)));
        }
        validate_prior(record.prior_theta, record.prior_sd)?;

        let phase = match (record.phase, record.classified_level.as_deref()) {
            (1, None) => Phase::LevelFinding,
            (1, Some(level)) => {
                return Err(invalid(format!(
                    "phase 1 cannot carry a classified level ({})",
                    level
                )))
            }
            (2, Some(level)) => Phase::GapMapping {
                classified_level: CefrLevel::parse(level)
                    .ok_or_else(|| invalid(format!("unknown level: {}", level)))?,
            },
            (2, None) => return Err(invalid("phase 2 requires a classified level".to_string())),
            (other, _) => return Err(invalid(format!("unknown phase: {}", other))),
        };

        if record.responses.len() != record.tested_topic_ids.len() {
            return Err(invalid(format!(
                "{} responses but {} tested topics",
                record.responses.len(),
                record.tested_topic_ids.len()
            )));
        }

        let mut seen = HashSet::with_capacity(record.responses.len());
        let mut responses = Vec::with_capacity(record.responses.len());
        for ((topic_id, is_correct, difficulty, format), tested_id) in
            record.responses.into_iter().zip(&record.tested_topic_ids)
        {
            if topic_id != *tested_id {
                return Err(invalid(format!(
                    "response topic {} does not match tested topic {}",
                    topic_id, tested_id
                )));
            }
            if !seen.insert(topic_id.clone()) {
                return Err(PlacementError::DuplicateTopic(topic_id));
            }
            validate_difficulty(&topic_id, difficulty)?;
            let item_format = ItemFormat::parse(&format)
                .ok_or_else(|| invalid(format!("unknown item format: {}", format)))?;
            responses.push(Response {
                topic_id,
                is_correct,
                difficulty,
                item_format,
            });
        }

        Ok(Self {
            theta: record.theta,
            se: record.se,
            prior_theta: record.prior_theta,
            prior_sd: record.prior_sd,
            responses,
            phase,
            tested_topic_ids: record.tested_topic_ids,
        })
    }
}
