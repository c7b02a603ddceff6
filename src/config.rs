//! Tunable constants for weighting, tiering and Journey Mode branching
//!
//! Defaults reproduce the production tuning; a JSON document with any subset
//! of fields can override them.

use chrono::Duration;
use serde::{Deserialize, Serialize};

use crate::error::{Result, SelectionError};
use crate::types::*;

/// How the weight cache decides whether the active pool changed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PoolTracking {
    /// Length plus first/last key
    #[default]
    Endpoints,
    /// Full ordered key comparison
    Exact,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct WeightConfig {
    pub well_known_exposures: u32,
    pub mastered_exposures: u32,
    pub learning_weight: f64,
    pub well_known_weight: f64,
    pub mastered_weight: f64,
    pub stale_after_days: i64,
    pub stale_multiplier: f64,
    pub cache_ttl_secs: i64,
}

impl Default for WeightConfig {
    fn default() -> Self {
        Self {
            well_known_exposures: WELL_KNOWN_EXPOSURES,
            mastered_exposures: MASTERED_EXPOSURES,
            learning_weight: BASE_WEIGHT_LEARNING,
            well_known_weight: BASE_WEIGHT_WELL_KNOWN,
            mastered_weight: BASE_WEIGHT_MASTERED,
            stale_after_days: STALE_AFTER_DAYS,
            stale_multiplier: STALE_MULTIPLIER,
            cache_ttl_secs: WEIGHT_CACHE_TTL_SECS,
        }
    }
}

/// Exercise mix for one tier, in percent
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivityProbabilities {
    pub multiple_choice: f64,
    pub listening: f64,
    pub typing: f64,
}

impl ActivityProbabilities {
    pub const fn new(multiple_choice: f64, listening: f64, typing: f64) -> Self {
        Self {
            multiple_choice,
            listening,
            typing,
        }
    }

    pub fn total(&self) -> f64 {
        self.multiple_choice + self.listening + self.typing
    }

    /// Entries in table order
    pub fn entries(&self) -> [(ActivityType, f64); 3] {
        [
            (ActivityType::MultipleChoice, self.multiple_choice),
            (ActivityType::Listening, self.listening),
            (ActivityType::Typing, self.typing),
        ]
    }
}

/// Default per-tier tables
pub const DEFAULT_ACTIVITY_PROBABILITIES: [ActivityProbabilities; 3] = [
    ActivityProbabilities::new(50.0, 50.0, 0.0),
    ActivityProbabilities::new(40.0, 40.0, 20.0),
    ActivityProbabilities::new(20.0, 20.0, 60.0),
];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct JourneyConfig {
    pub bootstrap_exposed_words: usize,
    pub motivational_break_chance: f64,
    pub new_word_chance: f64,
    pub session_revisit_chance: f64,
    pub new_word_block_turns: u32,
    pub motivational_break_block_turns: u32,
}

impl Default for JourneyConfig {
    fn default() -> Self {
        Self {
            bootstrap_exposed_words: BOOTSTRAP_EXPOSED_WORDS,
            motivational_break_chance: MOTIVATIONAL_BREAK_CHANCE,
            new_word_chance: NEW_WORD_CHANCE,
            session_revisit_chance: SESSION_REVISIT_CHANCE,
            new_word_block_turns: NEW_WORD_BLOCK_TURNS,
            motivational_break_block_turns: MOTIVATIONAL_BREAK_BLOCK_TURNS,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SelectionConfig {
    pub weights: WeightConfig,
    pub journey: JourneyConfig,
    pub tier_two_exposures: u32,
    pub tier_three_exposures: u32,
    /// Indexed by tier - 1
    pub activity_probabilities: [ActivityProbabilities; 3],
    /// Probability of easy listening, indexed by tier - 1
    pub listening_easy_chance: [f64; 3],
    pub max_activity_attempts: usize,
    pub pool_tracking: PoolTracking,
}

impl Default for SelectionConfig {
    fn default() -> Self {
        Self {
            weights: WeightConfig::default(),
            journey: JourneyConfig::default(),
            tier_two_exposures: TIER_TWO_EXPOSURES,
            tier_three_exposures: TIER_THREE_EXPOSURES,
            activity_probabilities: DEFAULT_ACTIVITY_PROBABILITIES,
            listening_easy_chance: [
                LISTENING_EASY_TIER_ONE,
                LISTENING_EASY_TIER_TWO,
                LISTENING_EASY_TIER_THREE,
            ],
            max_activity_attempts: MAX_ACTIVITY_ATTEMPTS,
            pool_tracking: PoolTracking::default(),
        }
    }
}

impl SelectionConfig {
    /// Parse a (possibly partial) JSON document and validate the result
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: SelectionConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn probabilities_for(&self, tier: Tier) -> &ActivityProbabilities {
        &self.activity_probabilities[tier.to_index()]
    }

    pub fn listening_easy_chance_for(&self, tier: Tier) -> f64 {
        self.listening_easy_chance[tier.to_index()]
    }

    pub fn validate(&self) -> Result<()> {
        for (i, row) in self.activity_probabilities.iter().enumerate() {
            if row.entries().iter().any(|(_, p)| !p.is_finite() || *p < 0.0) {
                return Err(invalid(format!("tier {} has a negative or non-finite probability", i + 1)));
            }
            if (row.total() - 100.0).abs() > 1e-6 {
                return Err(invalid(format!(
                    "tier {} probabilities sum to {}, expected 100",
                    i + 1,
                    row.total()
                )));
            }
        }

        let chances = [
            ("listeningEasyChance", self.listening_easy_chance.to_vec()),
            (
                "journey chances",
                vec![
                    self.journey.motivational_break_chance,
                    self.journey.new_word_chance,
                    self.journey.session_revisit_chance,
                ],
            ),
        ];
        for (name, values) in chances {
            if values.iter().any(|p| !(0.0..=1.0).contains(p)) {
                return Err(invalid(format!("{name} must lie in [0, 1]")));
            }
        }

        if self.tier_two_exposures > self.tier_three_exposures {
            return Err(invalid("tierTwoExposures exceeds tierThreeExposures".to_string()));
        }
        if self.max_activity_attempts == 0 {
            return Err(invalid("maxActivityAttempts must be at least 1".to_string()));
        }

        let w = &self.weights;
        if w.cache_ttl_secs <= 0 || Duration::try_seconds(w.cache_ttl_secs).is_none() {
            return Err(invalid(format!("cacheTtlSecs {} out of range", w.cache_ttl_secs)));
        }
        if w.stale_after_days < 0 || Duration::try_days(w.stale_after_days).is_none() {
            return Err(invalid(format!("staleAfterDays {} out of range", w.stale_after_days)));
        }
        if w.well_known_exposures > w.mastered_exposures {
            return Err(invalid("wellKnownExposures exceeds masteredExposures".to_string()));
        }
        let factors = [
            w.learning_weight,
            w.well_known_weight,
            w.mastered_weight,
            w.stale_multiplier,
        ];
        if factors.iter().any(|f| !f.is_finite() || *f <= 0.0) {
            return Err(invalid("weights and multipliers must be positive".to_string()));
        }

        Ok(())
    }
}

fn invalid(message: String) -> SelectionError {
    SelectionError::InvalidConfig(message)
}
