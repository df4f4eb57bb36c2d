//! Curriculum Catalog
//!
//! Read-only topic catalog plus the curated probe lists the selector draws
//! from. Both are plain values handed to the engine, so alternative curricula
//! can be injected in tests.

mod catalog;

use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

use crate::classifier::LevelBoundary;
use crate::error::{PlacementError, Result};
use crate::irt::topic_difficulty;
use crate::types::{CefrLevel, Topic};

// ==================== Curriculum ====================

#[derive(Debug, Clone)]
pub struct Curriculum {
    /// Sorted by (level, order)
    topics: Vec<Topic>,
    index: HashMap<String, usize>,
    /// Half-open range into `topics` per level
    level_ranges: [(usize, usize); 6],
}

impl Curriculum {
    /// Build a catalog, checking ids are unique and each level's orders run 1..=n
    pub fn new(mut topics: Vec<Topic>) -> Result<Self> {
        if topics.is_empty() {
            return Err(PlacementError::InvalidCurriculum(
                "catalog has no topics".to_string(),
            ));
        }
        topics.sort_by_key(|t| (t.level, t.order));

        let mut index = HashMap::with_capacity(topics.len());
        for (i, topic) in topics.iter().enumerate() {
            if topic.id.trim().is_empty() {
                return Err(PlacementError::InvalidCurriculum(format!(
                    "empty topic id at {} position {}",
                    topic.level, topic.order
                )));
            }
            if index.insert(topic.id.clone(), i).is_some() {
                return Err(PlacementError::InvalidCurriculum(format!(
                    "duplicate topic id: {}",
                    topic.id
                )));
            }
        }

        let level_ranges = Self::level_ranges(&topics);
        for level in CefrLevel::ALL {
            let (start, end) = level_ranges[level.index()];
            for (expected, topic) in (1u32..).zip(&topics[start..end]) {
                if topic.order != expected {
                    return Err(PlacementError::InvalidCurriculum(format!(
                        "{} orders must run 1..={} without gaps; found {} at position {}",
                        level,
                        end - start,
                        topic.order,
                        expected
                    )));
                }
            }
        }

        Ok(Self {
            topics,
            index,
            level_ranges,
        })
    }

    /// Built-in 111-topic grammar catalog
    pub fn standard() -> Self {
        let topics: Vec<Topic> = CefrLevel::ALL
            .iter()
            .flat_map(|&level| {
                (1u32..)
                    .zip(catalog::topics_for(level))
                    .map(move |(order, id)| Topic::new(*id, level, order))
            })
            .collect();

        let index = topics
            .iter()
            .enumerate()
            .map(|(i, t)| (t.id.clone(), i))
            .collect();
        let level_ranges = Self::level_ranges(&topics);

        Self {
            topics,
            index,
            level_ranges,
        }
    }

    fn level_ranges(sorted: &[Topic]) -> [(usize, usize); 6] {
        let mut ranges = [(0usize, 0usize); 6];
        let mut start = 0;
        for level in CefrLevel::ALL {
            let len = sorted[start..]
                .iter()
                .take_while(|t| t.level == level)
                .count();
            ranges[level.index()] = (start, start + len);
            start += len;
        }
        ranges
    }

    pub fn topics(&self) -> &[Topic] {
        &self.topics
    }

    pub fn len(&self) -> usize {
        self.topics.len()
    }

    pub fn is_empty(&self) -> bool {
        self.topics.is_empty()
    }

    pub fn get(&self, topic_id: &str) -> Option<&Topic> {
        self.index.get(topic_id).map(|&i| &self.topics[i])
    }

    /// Like [`Curriculum::get`], but an unknown id is a contract violation
    pub fn require(&self, topic_id: &str) -> Result<&Topic> {
        self.get(topic_id)
            .ok_or_else(|| PlacementError::UnknownTopic(topic_id.to_string()))
    }

    pub fn contains(&self, topic_id: &str) -> bool {
        self.index.contains_key(topic_id)
    }

    /// Topics of one level, foundational first
    pub fn topics_at_level(&self, level: CefrLevel) -> &[Topic] {
        let (start, end) = self.level_ranges[level.index()];
        &self.topics[start..end]
    }

    pub fn level_size(&self, level: CefrLevel) -> u32 {
        self.topics_at_level(level).len() as u32
    }

    /// Scale position of a catalog topic
    pub fn difficulty(&self, topic: &Topic) -> f64 {
        topic_difficulty(topic.level, topic.order, self.level_size(topic.level))
    }

    pub fn difficulty_of(&self, topic_id: &str) -> Result<f64> {
        self.require(topic_id).map(|topic| self.difficulty(topic))
    }
}

// ==================== Gateway Configuration ====================

/// Curated probe lists: gateway topics per level boundary and the beginner
/// floor probes
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GatewayConfig {
    /// Indexed by [`LevelBoundary::index`]
    boundaries: [Vec<String>; 5],
    floor_probes: Vec<String>,
}

impl GatewayConfig {
    pub fn new(boundaries: [Vec<String>; 5], floor_probes: Vec<String>) -> Self {
        Self {
            boundaries,
            floor_probes,
        }
    }

    /// Probe lists matching [`Curriculum::standard`]
    pub fn standard() -> Self {
        let owned = |ids: &[&str]| ids.iter().map(|id| id.to_string()).collect::<Vec<_>>();
        Self {
            boundaries: catalog::GATEWAYS.map(owned),
            floor_probes: owned(catalog::FLOOR_PROBES),
        }
    }

    pub fn gateways_for(&self, boundary: LevelBoundary) -> &[String] {
        &self.boundaries[boundary.index()]
    }

    /// Beginner probes. Only the opening item of a session draws from this
    /// list, so the first untested entry is the one presented; later entries
    /// matter only to callers passing an already-tested list to
    /// `ItemSelector::select_phase_one`.
    pub fn floor_probes(&self) -> &[String] {
        &self.floor_probes
    }

    /// Every listed topic must exist in the catalog and appear once per list
    pub fn validate(&self, curriculum: &Curriculum) -> Result<()> {
        let lists = self
            .boundaries
            .iter()
            .map(Vec::as_slice)
            .chain(std::iter::once(self.floor_probes.as_slice()));

        for list in lists {
            let mut seen = HashSet::new();
            for id in list {
                if !curriculum.contains(id) {
                    return Err(PlacementError::UnknownTopic(id.clone()));
                }
                if !seen.insert(id.as_str()) {
                    return Err(PlacementError::InvalidCurriculum(format!(
                        "topic listed twice in one probe list: {}",
                        id
                    )));
                }
            }
        }
        Ok(())
    }
}
