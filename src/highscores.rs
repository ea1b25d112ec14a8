//! Best-score table
//!
//! One record per (difficulty, round duration), persisted to storage.
//! A result replaces the stored record when it scores higher, or ties and
//! finishes faster.

use std::cmp::Ordering;
use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::persistence::{self, Storage, keys};
use crate::sim::Difficulty;

/// A single best result
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreRecord {
    pub score: u32,
    /// Seconds played
    pub time: f32,
    #[serde(default)]
    pub stars: u8,
    /// Unix timestamp (ms) when achieved
    pub timestamp: f64,
}

impl ScoreRecord {
    /// True when `self` should replace `other`
    pub fn beats(&self, other: &ScoreRecord) -> bool {
        self.score > other.score || (self.score == other.score && self.time < other.time)
    }

    /// Best first: higher score, then shorter time
    fn rank_cmp(&self, other: &ScoreRecord) -> Ordering {
        other
            .score
            .cmp(&self.score)
            .then(self.time.partial_cmp(&other.time).unwrap_or(Ordering::Equal))
    }
}

/// A record together with the round duration it was set on
#[derive(Debug, Clone, PartialEq)]
pub struct RankedScore {
    pub duration_secs: u32,
    pub record: ScoreRecord,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DurationScores {
    #[serde(default)]
    pub durations: BTreeMap<String, ScoreRecord>,
}

/// Per-difficulty best scores
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ScoreTable {
    tables: BTreeMap<Difficulty, DurationScores>,
}

impl Default for ScoreTable {
    fn default() -> Self {
        let tables = [
            Difficulty::Easy,
            Difficulty::Medium,
            Difficulty::Hard,
            Difficulty::Custom,
        ]
        .into_iter()
        .map(|d| (d, DurationScores::default()))
        .collect();
        Self { tables }
    }
}

impl ScoreTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a finished round. Returns true if it became the new best for
    /// its (difficulty, duration) slot.
    pub fn update(
        &mut self,
        difficulty: Difficulty,
        score: u32,
        time_left: f32,
        duration_secs: f32,
        stars: u8,
        now_ms: f64,
    ) -> bool {
        let record = ScoreRecord {
            score,
            time: (duration_secs - time_left).max(0.0),
            stars,
            timestamp: now_ms,
        };
        let slot = self.tables.entry(difficulty).or_default();
        let key = duration_secs.round().to_string();

        let improved = slot.durations.get(&key).is_none_or(|old| record.beats(old));
        if improved {
            log::info!(
                "New best for {} / {key}s: {} in {:.1}s",
                difficulty.as_str(),
                record.score,
                record.time
            );
            slot.durations.insert(key, record);
        }
        improved
    }

    fn ranked(&self, difficulty: Difficulty) -> impl Iterator<Item = RankedScore> + '_ {
        self.tables
            .get(&difficulty)
            .into_iter()
            .flat_map(|t| t.durations.iter())
            .filter_map(|(key, record)| {
                Some(RankedScore {
                    duration_secs: key.parse().ok()?,
                    record: record.clone(),
                })
            })
    }

    /// Best record across all durations of a difficulty
    pub fn best_for(&self, difficulty: Difficulty) -> Option<RankedScore> {
        self.ranked(difficulty)
            .min_by(|a, b| a.record.rank_cmp(&b.record))
    }

    /// All non-zero records of a difficulty, best first
    pub fn sorted_for(&self, difficulty: Difficulty) -> Vec<RankedScore> {
        let mut scores: Vec<RankedScore> = self
            .ranked(difficulty)
            .filter(|s| s.record.score > 0)
            .collect();
        scores.sort_by(|a, b| a.record.rank_cmp(&b.record));
        scores
    }

    /// Whether any ranked difficulty has a record (custom rounds don't count)
    pub fn has_any_best(&self) -> bool {
        Difficulty::RANKED
            .iter()
            .any(|d| self.best_for(*d).is_some())
    }

    pub fn clear(&mut self) {
        *self = Self::default();
        log::info!("Best scores cleared");
    }

    pub fn load<S: Storage + ?Sized>(storage: &S) -> Self {
        let mut table: Self = persistence::load_or_default(storage, keys::HIGH_SCORES);
        for d in [
            Difficulty::Easy,
            Difficulty::Medium,
            Difficulty::Hard,
            Difficulty::Custom,
        ] {
            table.tables.entry(d).or_default();
        }
        table
    }

    pub fn save<S: Storage + ?Sized>(&self, storage: &mut S) {
        persistence::save_json(storage, keys::HIGH_SCORES, self);
    }
}

/// Format a duration in seconds as `m:ss`
pub fn format_time(secs: f32) -> String {
    let total = secs.max(0.0).round() as u32;
    format!("{}:{:02}", total / 60, total % 60)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persistence::MemoryStorage;

    #[test]
    fn first_result_is_always_recorded() {
        let mut table = ScoreTable::new();
        assert!(!table.has_any_best());
        assert!(table.update(Difficulty::Easy, 0, 0.0, 60.0, 0, 1.0));
        assert!(table.has_any_best());
    }

    #[test]
    fn equal_score_faster_time_wins() {
        let mut table = ScoreTable::new();
        assert!(table.update(Difficulty::Medium, 10, 6.0, 36.0, 2, 1.0));
        // Same score, took longer
        assert!(!table.update(Difficulty::Medium, 10, 2.0, 36.0, 2, 2.0));
        // Same score, quicker
        assert!(table.update(Difficulty::Medium, 10, 10.0, 36.0, 3, 3.0));
        let best = table.best_for(Difficulty::Medium).unwrap();
        assert_eq!(best.record.time, 26.0);
        assert_eq!(best.record.stars, 3);
        // Lower score never replaces
        assert!(!table.update(Difficulty::Medium, 9, 30.0, 36.0, 3, 4.0));
    }

    #[test]
    fn records_are_kept_per_duration() {
        let mut table = ScoreTable::new();
        table.update(Difficulty::Custom, 4, 0.0, 30.0, 0, 1.0);
        table.update(Difficulty::Custom, 9, 0.0, 90.0, 0, 2.0);
        table.update(Difficulty::Custom, 9, 10.0, 45.0, 0, 3.0);
        let sorted = table.sorted_for(Difficulty::Custom);
        let durations: Vec<u32> = sorted.iter().map(|s| s.duration_secs).collect();
        assert_eq!(durations, vec![45, 90, 30]);
        assert_eq!(table.best_for(Difficulty::Custom).unwrap().duration_secs, 45);
        // Custom results don't unlock the carousel
        assert!(!table.has_any_best());
    }

    #[test]
    fn sorted_skips_zero_scores() {
        let mut table = ScoreTable::new();
        table.update(Difficulty::Hard, 0, 0.0, 24.0, 0, 1.0);
        assert!(table.sorted_for(Difficulty::Hard).is_empty());
        assert!(table.best_for(Difficulty::Hard).is_some());
    }

    #[test]
    fn storage_shape_and_round_trip() {
        let mut storage = MemoryStorage::new();
        let mut table = ScoreTable::new();
        table.update(Difficulty::Easy, 5, 10.0, 60.0, 1, 42.0);
        table.save(&mut storage);

        let raw: serde_json::Value =
            serde_json::from_str(&storage.get_item(keys::HIGH_SCORES).unwrap()).unwrap();
        assert_eq!(raw["easy"]["durations"]["60"]["score"], 5);
        assert_eq!(raw["easy"]["durations"]["60"]["time"], 50.0);

        assert_eq!(ScoreTable::load(&storage), table);
    }

    #[test]
    fn clear_empties_everything() {
        let mut table = ScoreTable::new();
        table.update(Difficulty::Easy, 5, 10.0, 60.0, 1, 42.0);
        table.clear();
        assert_eq!(table, ScoreTable::default());
    }

    #[test]
    fn time_formatting() {
        assert_eq!(format_time(0.0), "0:00");
        assert_eq!(format_time(65.4), "1:05");
    }
}
