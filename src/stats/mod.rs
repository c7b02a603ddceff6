//! Per-word learning records
//!
//! The selector only reads statistics through [`StatsProvider`]. [`StatsStore`]
//! is an in-memory implementation that also records answers and migrates
//! records stored under legacy source/target keys to GUID keys.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::types::{ActivityMode, ActivityType, Word, WordKey};

// ==================== Records ====================

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExerciseCounts {
    pub correct: u32,
    pub incorrect: u32,
}

/// Exercise types that keep their own counters
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ExerciseKind {
    MultipleChoice,
    ListeningEasy,
    ListeningHard,
    Typing,
    Blitz,
}

impl ExerciseKind {
    pub const ALL: [ExerciseKind; 5] = [
        ExerciseKind::MultipleChoice,
        ExerciseKind::ListeningEasy,
        ExerciseKind::ListeningHard,
        ExerciseKind::Typing,
        ExerciseKind::Blitz,
    ];

    /// Counter that an answered activity feeds
    pub fn for_activity(activity: ActivityType, mode: Option<ActivityMode>) -> Option<Self> {
        match activity {
            ActivityType::MultipleChoice => Some(Self::MultipleChoice),
            ActivityType::Typing => Some(Self::Typing),
            ActivityType::Listening => match mode {
                Some(ActivityMode::Hard) => Some(Self::ListeningHard),
                _ => Some(Self::ListeningEasy),
            },
            _ => None,
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct WordStats {
    pub exposed: bool,
    pub multiple_choice: ExerciseCounts,
    pub listening_easy: ExerciseCounts,
    pub listening_hard: ExerciseCounts,
    pub typing: ExerciseCounts,
    pub blitz: ExerciseCounts,
    pub last_seen: Option<DateTime<Utc>>,
    pub last_correct_answer: Option<DateTime<Utc>>,
    pub last_incorrect_answer: Option<DateTime<Utc>>,
}

impl WordStats {
    pub fn counts(&self, kind: ExerciseKind) -> &ExerciseCounts {
        match kind {
            ExerciseKind::MultipleChoice => &self.multiple_choice,
            ExerciseKind::ListeningEasy => &self.listening_easy,
            ExerciseKind::ListeningHard => &self.listening_hard,
            ExerciseKind::Typing => &self.typing,
            ExerciseKind::Blitz => &self.blitz,
        }
    }

    fn counts_mut(&mut self, kind: ExerciseKind) -> &mut ExerciseCounts {
        match kind {
            ExerciseKind::MultipleChoice => &mut self.multiple_choice,
            ExerciseKind::ListeningEasy => &mut self.listening_easy,
            ExerciseKind::ListeningHard => &mut self.listening_hard,
            ExerciseKind::Typing => &mut self.typing,
            ExerciseKind::Blitz => &mut self.blitz,
        }
    }

    /// Sum of correct answers across every exercise type
    pub fn exposures(&self) -> u32 {
        ExerciseKind::ALL
            .iter()
            .map(|kind| self.counts(*kind).correct)
            .fold(0, u32::saturating_add)
    }

    pub fn total_incorrect(&self) -> u32 {
        ExerciseKind::ALL
            .iter()
            .map(|kind| self.counts(*kind).incorrect)
            .fold(0, u32::saturating_add)
    }

    /// Record one answer; counters only ever grow
    pub fn record(&mut self, kind: ExerciseKind, correct: bool, at: DateTime<Utc>) {
        let counts = self.counts_mut(kind);
        if correct {
            counts.correct = counts.correct.saturating_add(1);
            self.last_correct_answer = Some(at);
        } else {
            counts.incorrect = counts.incorrect.saturating_add(1);
            self.last_incorrect_answer = Some(at);
        }
        self.exposed = true;
        self.last_seen = Some(at);
    }
}

// ==================== Provider seam ====================

/// Read access to learning statistics
pub trait StatsProvider {
    fn word_stats(&self, word: &Word) -> WordStats;

    fn total_correct_exposures(&self, word: &Word) -> u32 {
        self.word_stats(word).exposures()
    }
}

impl<F> StatsProvider for F
where
    F: Fn(&Word) -> WordStats,
{
    fn word_stats(&self, word: &Word) -> WordStats {
        self(word)
    }
}

// ==================== In-memory store ====================

/// Where a word's record currently lives
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum KeyResolution {
    /// Stored under the word's own key (GUID key, or legacy key for words without one)
    Primary(WordKey),
    /// Stored under the legacy source/target key only
    Legacy(WordKey),
    /// No record yet; new records go under this key
    Fresh(WordKey),
}

impl KeyResolution {
    pub fn key(&self) -> &WordKey {
        match self {
            KeyResolution::Primary(key) | KeyResolution::Legacy(key) | KeyResolution::Fresh(key) => key,
        }
    }
}

#[derive(Clone, Debug, Default)]
pub struct StatsStore {
    records: HashMap<WordKey, WordStats>,
}

impl StatsStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Try the GUID key, then the legacy key, then fall back to a fresh key
    pub fn resolve(&self, word: &Word) -> KeyResolution {
        let primary = word.key();
        if self.records.contains_key(&primary) {
            return KeyResolution::Primary(primary);
        }
        let legacy = word.legacy_key();
        if legacy != primary && self.records.contains_key(&legacy) {
            return KeyResolution::Legacy(legacy);
        }
        KeyResolution::Fresh(primary)
    }

    pub fn get(&self, word: &Word) -> Option<&WordStats> {
        match self.resolve(word) {
            KeyResolution::Fresh(_) => None,
            resolved => self.records.get(resolved.key()),
        }
    }

    /// Mutable record for `word`, moving a legacy record to the GUID key
    pub fn entry(&mut self, word: &Word) -> &mut WordStats {
        let key = match self.resolve(word) {
            KeyResolution::Legacy(legacy) => {
                let primary = word.key();
                if let Some(stats) = self.records.remove(&legacy) {
                    debug!(from = %legacy, to = %primary, "migrating legacy stats key");
                    self.records.insert(primary.clone(), stats);
                }
                primary
            }
            KeyResolution::Primary(key) | KeyResolution::Fresh(key) => key,
        };
        self.records.entry(key).or_default()
    }

    pub fn record_answer(
        &mut self,
        word: &Word,
        kind: ExerciseKind,
        correct: bool,
        at: DateTime<Utc>,
    ) {
        self.entry(word).record(kind, correct, at);
    }

    /// Mark a word as introduced without recording an answer
    pub fn mark_exposed(&mut self, word: &Word, at: DateTime<Utc>) {
        let stats = self.entry(word);
        stats.exposed = true;
        stats.last_seen = Some(at);
    }

    pub fn insert(&mut self, key: WordKey, stats: WordStats) {
        self.records.insert(key, stats);
    }

    pub fn reset_word(&mut self, word: &Word) {
        self.records.remove(&word.key());
        self.records.remove(&word.legacy_key());
    }

    pub fn reset(&mut self) {
        self.records.clear();
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Split `words` into (exposed, new) preserving order
    pub fn partition_exposed(&self, words: &[Word]) -> (Vec<Word>, Vec<Word>) {
        words
            .iter()
            .cloned()
            .partition(|word| self.get(word).map(|s| s.exposed).unwrap_or(false))
    }
}

impl StatsProvider for StatsStore {
    fn word_stats(&self, word: &Word) -> WordStats {
        self.get(word).cloned().unwrap_or_default()
    }

    fn total_correct_exposures(&self, word: &Word) -> u32 {
        self.get(word).map(WordStats::exposures).unwrap_or(0)
    }
}
