//! Item Selector
//!
//! Two-phase adaptive policy deciding which topic and format to present next.
//!
//! Phase 1 (level finding):
//! - A session that starts well below the scale opens with the floor probes
//! - Otherwise the first untested gateway at the most uncertain boundary
//! - Exhausted boundaries fall through to neighbours at offsets +1, -1, +2, -2
//! - Last resort is a spiral over whole levels starting from A1
//!
//! Phase 2 (gap mapping) walks untested topics at the classified level, then
//! one level below, then one level above. `None` from either phase means the
//! pool is exhausted and the session should end.

use crate::classifier::{find_most_uncertain_boundary, LevelBoundary};
use crate::curriculum::{Curriculum, GatewayConfig};
use crate::session::{Phase, SessionState};
use crate::types::{CefrLevel, ItemFormat, SelectedItem, Topic};

/// Boundary offsets tried once the most uncertain boundary is exhausted
const ADJACENT_BOUNDARY_OFFSETS: [isize; 4] = [1, -1, 2, -2];

/// Even response counts get gap fill, odd counts multiple choice
pub fn item_format_for(response_count: usize) -> ItemFormat {
    if response_count % 2 == 0 {
        ItemFormat::GapFill
    } else {
        ItemFormat::MultipleChoice
    }
}

fn is_untested(tested: &[String], topic_id: &str) -> bool {
    !tested.iter().any(|id| id == topic_id)
}

pub struct ItemSelector<'a> {
    curriculum: &'a Curriculum,
    gateways: &'a GatewayConfig,
    beginner_probe_theta: f64,
}

impl<'a> ItemSelector<'a> {
    pub fn new(
        curriculum: &'a Curriculum,
        gateways: &'a GatewayConfig,
        beginner_probe_theta: f64,
    ) -> Self {
        Self {
            curriculum,
            gateways,
            beginner_probe_theta,
        }
    }

    /// Next item for a session, or `None` once the candidate pool is empty
    pub fn select_next(&self, state: &SessionState) -> Option<SelectedItem> {
        let tested = state.tested_topic_ids();
        let topic = match state.phase() {
            Phase::LevelFinding => {
                self.select_phase_one(state.theta(), tested, state.response_count())
            }
            Phase::GapMapping { classified_level } => {
                self.select_phase_two(classified_level, tested)
            }
        }?;

        let item = SelectedItem {
            topic_id: topic.id.clone(),
            level: topic.level,
            item_format: item_format_for(state.response_count()),
            difficulty: self.curriculum.difficulty(topic),
        };

        tracing::debug!(
            topic_id = %item.topic_id,
            level = %item.level,
            format = %item.item_format,
            difficulty = item.difficulty,
            phase = state.phase().number(),
            "Placement item selected"
        );

        Some(item)
    }

    // ==================== Phase 1 ====================

    pub fn select_phase_one(
        &self,
        theta: f64,
        tested: &[String],
        response_count: usize,
    ) -> Option<&'a Topic> {
        if response_count == 0 && theta < self.beginner_probe_theta {
            if let Some(topic) = self.first_untested(self.gateways.floor_probes(), tested) {
                tracing::debug!(topic_id = %topic.id, "Beginner floor probe");
                return Some(topic);
            }
        }

        let boundary = find_most_uncertain_boundary(theta);
        if let Some(topic) = self.first_untested(self.gateways.gateways_for(boundary), tested) {
            return Some(topic);
        }

        for offset in ADJACENT_BOUNDARY_OFFSETS {
            let neighbour = boundary
                .index()
                .checked_add_signed(offset)
                .and_then(LevelBoundary::from_index);
            if let Some(neighbour) = neighbour {
                if let Some(topic) =
                    self.first_untested(self.gateways.gateways_for(neighbour), tested)
                {
                    tracing::debug!(
                        from = %boundary,
                        to = %neighbour,
                        "Gateways exhausted, using adjacent boundary"
                    );
                    return Some(topic);
                }
            }
        }

        tracing::debug!(boundary = %boundary, "All gateways exhausted, spiral search");
        self.spiral_fallback(None, tested)
    }

    // ==================== Phase 2 ====================

    pub fn select_phase_two(&self, level: CefrLevel, tested: &[String]) -> Option<&'a Topic> {
        [Some(level), level.below(), level.above()]
            .into_iter()
            .flatten()
            .find_map(|candidate| self.first_untested_at_level(candidate, tested))
    }

    // ==================== Fallback ====================

    /// Scan whole levels at offsets 0, +1, -1, +2, -2, ... from `anchor`
    /// (A1 when no level has been classified yet)
    pub fn spiral_fallback(&self, anchor: Option<CefrLevel>, tested: &[String]) -> Option<&'a Topic> {
        let start = anchor.unwrap_or(CefrLevel::A1).index() as isize;
        let reach = CefrLevel::ALL.len() as isize;

        (0..reach)
            .flat_map(|distance| {
                if distance == 0 {
                    vec![0]
                } else {
                    vec![distance, -distance]
                }
            })
            .filter_map(|offset| {
                usize::try_from(start + offset)
                    .ok()
                    .and_then(CefrLevel::from_index)
            })
            .find_map(|level| self.first_untested_at_level(level, tested))
    }

    fn first_untested(&self, ids: &[String], tested: &[String]) -> Option<&'a Topic> {
        ids.iter()
            .filter(|id| is_untested(tested, id))
            .find_map(|id| self.curriculum.get(id))
    }

    fn first_untested_at_level(&self, level: CefrLevel, tested: &[String]) -> Option<&'a Topic> {
        self.curriculum
            .topics_at_level(level)
            .iter()
            .find(|topic| is_untested(tested, &topic.id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    fn level_ids(curriculum: &Curriculum, level: CefrLevel) -> Vec<String> {
        curriculum
            .topics_at_level(level)
            .iter()
            .map(|t| t.id.clone())
            .collect()
    }

    #[test]
    fn test_item_format_alternates() {
        assert_eq!(item_format_for(0), ItemFormat::GapFill);
        assert_eq!(item_format_for(1), ItemFormat::MultipleChoice);
        assert_eq!(item_format_for(2), ItemFormat::GapFill);
        assert_eq!(item_format_for(9), ItemFormat::MultipleChoice);
    }

    #[test]
    fn test_beginner_gets_floor_probe_first() {
        let curriculum = Curriculum::standard();
        let gateways = GatewayConfig::standard();
        let selector = ItemSelector::new(&curriculum, &gateways, -1.5);

        let topic = selector.select_phase_one(-2.0, &[], 0).unwrap();
        assert_eq!(topic.id, "a1_verb_to_be");

        // Only the very first item is a floor probe
        let tested = ids(&["a1_verb_to_be"]);
        let topic = selector.select_phase_one(-2.0, &tested, 1).unwrap();
        assert_eq!(topic.id, "a1_past_simple_regular");
    }

    #[test]
    fn test_every_standard_floor_probe_can_open_a_session() {
        let curriculum = Curriculum::standard();
        let gateways = GatewayConfig::standard();
        let selector = ItemSelector::new(&curriculum, &gateways, -1.5);

        let opening = selector.select_phase_one(-2.0, &[], 0).unwrap();
        assert_eq!(gateways.floor_probes(), &[opening.id.clone()][..]);
    }

    #[test]
    fn test_later_floor_probes_follow_tested_ones() {
        let curriculum = Curriculum::standard();
        let mut boundaries: [Vec<String>; 5] = Default::default();
        boundaries[0] = ids(&["a1_past_simple_regular"]);
        let gateways = GatewayConfig::new(
            boundaries,
            ids(&["a1_verb_to_be", "a1_there_is_there_are"]),
        );
        let selector = ItemSelector::new(&curriculum, &gateways, -1.5);

        let tested = ids(&["a1_verb_to_be"]);
        let topic = selector.select_phase_one(-2.0, &tested, 0).unwrap();
        assert_eq!(topic.id, "a1_there_is_there_are");
    }

    #[test]
    fn test_gateway_at_most_uncertain_boundary() {
        let curriculum = Curriculum::standard();
        let gateways = GatewayConfig::standard();
        let selector = ItemSelector::new(&curriculum, &gateways, -1.5);

        assert_eq!(selector.select_phase_one(0.0, &[], 0).unwrap().id, "a2_first_conditional");
        assert_eq!(selector.select_phase_one(-1.4, &[], 0).unwrap().id, "a1_past_simple_regular");
        assert_eq!(selector.select_phase_one(2.1, &[], 0).unwrap().id, "b2_mixed_conditionals");

        let tested = ids(&["a2_first_conditional"]);
        assert_eq!(
            selector.select_phase_one(0.0, &tested, 1).unwrap().id,
            "b1_present_perfect_vs_past_simple"
        );
    }

    #[test]
    fn test_exhausted_boundary_moves_up_first() {
        let curriculum = Curriculum::standard();
        let gateways = GatewayConfig::standard();
        let selector = ItemSelector::new(&curriculum, &gateways, -1.5);

        let tested = gateways.gateways_for(LevelBoundary::A2B1).to_vec();
        let topic = selector.select_phase_one(0.0, &tested, tested.len()).unwrap();
        assert_eq!(topic.id, "b1_reported_statements");

        let mut tested = tested;
        tested.extend(gateways.gateways_for(LevelBoundary::B1B2).to_vec());
        let topic = selector.select_phase_one(0.0, &tested, tested.len()).unwrap();
        assert_eq!(topic.id, "a1_past_simple_regular");
    }

    #[test]
    fn test_top_boundary_searches_downwards() {
        let curriculum = Curriculum::standard();
        let gateways = GatewayConfig::standard();
        let selector = ItemSelector::new(&curriculum, &gateways, -1.5);

        let tested = gateways.gateways_for(LevelBoundary::C1C2).to_vec();
        let topic = selector.select_phase_one(3.5, &tested, tested.len()).unwrap();
        assert_eq!(topic.id, "b2_mixed_conditionals");
    }

    #[test]
    fn test_spiral_after_all_gateways() {
        let curriculum = Curriculum::standard();
        let gateways = GatewayConfig::standard();
        let selector = ItemSelector::new(&curriculum, &gateways, -1.5);

        let tested: Vec<String> = LevelBoundary::ALL
            .iter()
            .flat_map(|b| gateways.gateways_for(*b).to_vec())
            .collect();
        let topic = selector.select_phase_one(2.0, &tested, tested.len()).unwrap();
        assert_eq!(topic.id, "a1_verb_to_be");
    }

    #[test]
    fn test_spiral_order_from_anchor() {
        let curriculum = Curriculum::standard();
        let gateways = GatewayConfig::standard();
        let selector = ItemSelector::new(&curriculum, &gateways, -1.5);

        let mut tested = level_ids(&curriculum, CefrLevel::B1);
        let topic = selector.spiral_fallback(Some(CefrLevel::B1), &tested).unwrap();
        assert_eq!(topic.level, CefrLevel::B2);

        tested.extend(level_ids(&curriculum, CefrLevel::B2));
        let topic = selector.spiral_fallback(Some(CefrLevel::B1), &tested).unwrap();
        assert_eq!(topic.level, CefrLevel::A2);

        tested.extend(level_ids(&curriculum, CefrLevel::A2));
        let topic = selector.spiral_fallback(Some(CefrLevel::B1), &tested).unwrap();
        assert_eq!(topic.level, CefrLevel::C1);
    }

    #[test]
    fn test_phase_two_order() {
        let curriculum = Curriculum::standard();
        let gateways = GatewayConfig::standard();
        let selector = ItemSelector::new(&curriculum, &gateways, -1.5);

        let topic = selector.select_phase_two(CefrLevel::B1, &[]).unwrap();
        assert_eq!(topic.id, "b1_present_perfect_vs_past_simple");

        let mut tested = ids(&["b1_present_perfect_vs_past_simple"]);
        let topic = selector.select_phase_two(CefrLevel::B1, &tested).unwrap();
        assert_eq!(topic.id, "b1_present_perfect_continuous");

        tested = level_ids(&curriculum, CefrLevel::B1);
        let topic = selector.select_phase_two(CefrLevel::B1, &tested).unwrap();
        assert_eq!(topic.level, CefrLevel::A2);
        assert_eq!(topic.order, 1);

        tested.extend(level_ids(&curriculum, CefrLevel::A2));
        let topic = selector.select_phase_two(CefrLevel::B1, &tested).unwrap();
        assert_eq!(topic.level, CefrLevel::B2);

        tested.extend(level_ids(&curriculum, CefrLevel::B2));
        assert!(selector.select_phase_two(CefrLevel::B1, &tested).is_none());
    }

    #[test]
    fn test_phase_two_at_edges() {
        let curriculum = Curriculum::standard();
        let gateways = GatewayConfig::standard();
        let selector = ItemSelector::new(&curriculum, &gateways, -1.5);

        let tested = level_ids(&curriculum, CefrLevel::A1);
        let topic = selector.select_phase_two(CefrLevel::A1, &tested).unwrap();
        assert_eq!(topic.level, CefrLevel::A2);

        let tested = level_ids(&curriculum, CefrLevel::C2);
        let topic = selector.select_phase_two(CefrLevel::C2, &tested).unwrap();
        assert_eq!(topic.level, CefrLevel::C1);
    }

    #[test]
    fn test_exhausted_curriculum_returns_none() {
        let curriculum = Curriculum::new(vec![
            Topic::new("a1_one", CefrLevel::A1, 1),
            Topic::new("b1_one", CefrLevel::B1, 1),
        ])
        .unwrap();
        let mut boundaries: [Vec<String>; 5] = Default::default();
        boundaries[1] = ids(&["b1_one"]);
        let gateways = GatewayConfig::new(boundaries, ids(&["a1_one"]));
        let selector = ItemSelector::new(&curriculum, &gateways, -1.5);

        assert_eq!(selector.select_phase_one(0.0, &[], 0).unwrap().id, "b1_one");
        let tested = ids(&["b1_one"]);
        assert_eq!(selector.select_phase_one(0.0, &tested, 1).unwrap().id, "a1_one");
        let tested = ids(&["b1_one", "a1_one"]);
        assert!(selector.select_phase_one(0.0, &tested, 2).is_none());
    }
}
