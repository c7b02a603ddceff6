//! Activity-tier policy
//!
//! Maps a word's exposure count to a tier, and a tier to a distribution over
//! exercise types:
//!
//! | tier | multiple choice | listening | typing |
//! |------|-----------------|-----------|--------|
//! | 1    | 50              | 50        | 0      |
//! | 2    | 40              | 40        | 20     |
//! | 3    | 20              | 20        | 60     |
//!
//! Listening needs audio. When audio is off a listening roll produces nothing
//! and the caller rolls again; after the attempt budget runs out the result is
//! multiple choice, which has no preconditions.

use tracing::{trace, warn};

use crate::config::{ActivityProbabilities, SelectionConfig};
use crate::random::RandomSource;
use crate::types::*;

/// Tier from exposure count with the default thresholds (<4, <9, rest)
pub fn tier_for_exposures(exposures: u32) -> Tier {
    tier_for_exposures_with(exposures, &SelectionConfig::default())
}

pub fn tier_for_exposures_with(exposures: u32, config: &SelectionConfig) -> Tier {
    if exposures < config.tier_two_exposures {
        Tier::One
    } else if exposures < config.tier_three_exposures {
        Tier::Two
    } else {
        Tier::Three
    }
}

/// Roll an exercise type from a percentage table
///
/// Entries with zero probability are skipped; a roll past every threshold
/// (only possible with a malformed table) yields multiple choice.
pub fn sample_activity_type<R>(probabilities: &ActivityProbabilities, rng: &mut R) -> ActivityType
where
    R: RandomSource + ?Sized,
{
    let roll = rng.uniform(100.0);
    let mut cumulative = 0.0;
    for (activity, probability) in probabilities.entries() {
        if probability <= 0.0 {
            continue;
        }
        cumulative += probability;
        if roll < cumulative {
            return activity;
        }
    }
    ActivityType::MultipleChoice
}

fn random_direction<R>(rng: &mut R) -> ActivityMode
where
    R: RandomSource + ?Sized,
{
    if rng.chance(0.5) {
        ActivityMode::SourceToTarget
    } else {
        ActivityMode::TargetToSource
    }
}

/// One roll of the policy; `None` when the roll needs audio that is off
pub fn attempt_activity_selection<R>(
    word: &Word,
    tier: Tier,
    audio_enabled: bool,
    config: &SelectionConfig,
    rng: &mut R,
) -> Option<ActivityResult>
where
    R: RandomSource + ?Sized,
{
    let activity = sample_activity_type(config.probabilities_for(tier), rng);
    let mode = match activity {
        ActivityType::Listening => {
            if !audio_enabled {
                trace!(tier = tier.as_u8(), "listening rolled with audio disabled");
                return None;
            }
            if rng.chance(config.listening_easy_chance_for(tier)) {
                ActivityMode::Easy
            } else {
                ActivityMode::Hard
            }
        }
        _ => random_direction(rng),
    };

    Some(ActivityResult::new(activity, Some(word.clone()), Some(mode)))
}

/// Roll until a valid activity comes up, falling back to multiple choice
pub fn select_activity<R>(
    word: &Word,
    tier: Tier,
    audio_enabled: bool,
    config: &SelectionConfig,
    rng: &mut R,
) -> ActivityResult
where
    R: RandomSource + ?Sized,
{
    for _ in 0..config.max_activity_attempts {
        if let Some(result) = attempt_activity_selection(word, tier, audio_enabled, config, rng) {
            return result;
        }
    }

    warn!(
        attempts = config.max_activity_attempts,
        tier = tier.as_u8(),
        "no valid activity after retries, falling back to multiple choice"
    );
    ActivityResult::new(
        ActivityType::MultipleChoice,
        Some(word.clone()),
        Some(random_direction(rng)),
    )
}

// ==================== Unit Tests ====================
