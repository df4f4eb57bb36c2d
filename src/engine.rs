//! Placement Engine
//!
//! Session lifecycle over the pure components: the host asks for an item,
//! renders it, reports correctness, checks `should_stop`, and repeats. At the
//! end `finish` classifies the candidate and builds the gap map.

use serde::{Deserialize, Serialize};

use crate::classifier::{classify_level, level_confidence};
use crate::config::PlacementConfig;
use crate::curriculum::{Curriculum, GatewayConfig};
use crate::error::{PlacementError, Result};
use crate::gap_map::{build_gap_map, summarize_gap_map};
use crate::selector::ItemSelector;
use crate::session::{bayesian_update, Phase, SessionRecord, SessionState};
use crate::types::{CefrLevel, GapMapEntry, LevelSummary, Response, SelectedItem};

/// Outcome handed to downstream lesson planning
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlacementResult {
    pub estimated_level: CefrLevel,
    /// Posterior mass inside the estimated level's band
    pub confidence: f64,
    pub theta: f64,
    pub se: f64,
    pub gap_map: Vec<GapMapEntry>,
    pub summary: Vec<(CefrLevel, LevelSummary)>,
    pub responses: Vec<Response>,
}

pub struct PlacementEngine {
    curriculum: Curriculum,
    gateways: GatewayConfig,
    config: PlacementConfig,
}

impl PlacementEngine {
    pub fn new(
        curriculum: Curriculum,
        gateways: GatewayConfig,
        config: PlacementConfig,
    ) -> Result<Self> {
        config.validate()?;
        gateways.validate(&curriculum)?;
        Ok(Self {
            curriculum,
            gateways,
            config,
        })
    }

    /// Built-in catalog, gateways and default configuration
    pub fn standard() -> Self {
        Self {
            curriculum: Curriculum::standard(),
            gateways: GatewayConfig::standard(),
            config: PlacementConfig::default(),
        }
    }

    pub fn curriculum(&self) -> &Curriculum {
        &self.curriculum
    }

    pub fn gateways(&self) -> &GatewayConfig {
        &self.gateways
    }

    pub fn config(&self) -> &PlacementConfig {
        &self.config
    }

    fn selector(&self) -> ItemSelector<'_> {
        ItemSelector::new(
            &self.curriculum,
            &self.gateways,
            self.config.beginner_probe_theta,
        )
    }

    // ==================== Lifecycle ====================

    /// New session with the configured default prior SD
    pub fn start(&self, prior_theta: f64) -> Result<SessionState> {
        SessionState::with_default_prior(prior_theta, &self.config)
    }

    pub fn start_with_prior(&self, prior_theta: f64, prior_sd: f64) -> Result<SessionState> {
        SessionState::new(prior_theta, prior_sd, &self.config)
    }

    /// Rebuild a persisted session, checking it against this engine's catalog
    /// and configuration.
    ///
    /// Rejects states `bayesian_update` can never produce: an SE under the
    /// floor, gap mapping with no answers, or level finding past
    /// `phase.min_responses`.
    pub fn resume(&self, record: SessionRecord) -> Result<SessionState> {
        let state = SessionState::try_from(record)?;
        let invalid = PlacementError::InvalidRecord;

        if state.se() < self.config.estimator.min_se {
            return Err(invalid(format!(
                "se {} is below the floor of {}",
                state.se(),
                self.config.estimator.min_se
            )));
        }
        match state.phase() {
            Phase::GapMapping { .. } if state.response_count() == 0 => {
                return Err(invalid(
                    "gap mapping requires at least one response".to_string(),
                ));
            }
            Phase::LevelFinding if state.response_count() >= self.config.phase.min_responses => {
                return Err(invalid(format!(
                    "{} responses should have ended level finding at {}",
                    state.response_count(),
                    self.config.phase.min_responses
                )));
            }
            _ => {}
        }
        if state.response_count() > self.config.session_cap {
            return Err(invalid(format!(
                "{} responses exceed the session cap of {}",
                state.response_count(),
                self.config.session_cap
            )));
        }
        for topic_id in state.tested_topic_ids() {
            self.curriculum.require(topic_id)?;
        }
        Ok(state)
    }

    /// Next item to present, or `None` when the cap is reached or the pool is
    /// exhausted
    pub fn next_item(&self, state: &SessionState) -> Option<SelectedItem> {
        if state.response_count() >= self.config.session_cap {
            return None;
        }
        self.selector().select_next(state)
    }

    /// Record the answer to an item returned by [`PlacementEngine::next_item`]
    pub fn record_answer(
        &self,
        state: &SessionState,
        item: &SelectedItem,
        is_correct: bool,
    ) -> Result<SessionState> {
        self.record_response(
            state,
            Response::new(
                item.topic_id.clone(),
                is_correct,
                item.difficulty,
                item.item_format,
            ),
        )
    }

    /// Record an arbitrary response; the topic must exist in the catalog
    pub fn record_response(&self, state: &SessionState, response: Response) -> Result<SessionState> {
        self.curriculum.require(&response.topic_id)?;
        bayesian_update(state, response, &self.config)
    }

    /// True once the cap is reached or no untested candidate topic remains
    pub fn should_stop(&self, state: &SessionState) -> bool {
        self.next_item(state).is_none()
    }

    pub fn finish(&self, state: &SessionState) -> PlacementResult {
        let estimated_level = match state.phase() {
            Phase::GapMapping { classified_level } => classified_level,
            Phase::LevelFinding => classify_level(state.theta()),
        };
        let confidence = level_confidence(
            state.theta(),
            state.se(),
            estimated_level,
            &self.config.estimator,
        );
        let gap_map = build_gap_map(
            &self.curriculum,
            state.theta(),
            state.se(),
            state.responses(),
        );
        let summary = summarize_gap_map(&gap_map);

        tracing::info!(
            level = %estimated_level,
            confidence,
            theta = state.theta(),
            se = state.se(),
            responses = state.response_count(),
            "Placement finished"
        );

        PlacementResult {
            estimated_level,
            confidence,
            theta: state.theta(),
            se: state.se(),
            gap_map,
            summary,
            responses: state.responses().to_vec(),
        }
    }
}
