use chrono::{DateTime, Duration, Utc};

use crate::config::WeightConfig;
use crate::stats::WordStats;

/// Base weight from exposure count: well-learned words come up less often
pub fn base_weight(exposures: u32, config: &WeightConfig) -> f64 {
    if exposures < config.well_known_exposures {
        config.learning_weight
    } else if exposures < config.mastered_exposures {
        config.well_known_weight
    } else {
        config.mastered_weight
    }
}

/// Boost for words not seen in a long time
pub fn time_multiplier(
    last_seen: Option<DateTime<Utc>>,
    now: DateTime<Utc>,
    config: &WeightConfig,
) -> f64 {
    // an unrepresentable window never goes stale
    let Some(window) = Duration::try_days(config.stale_after_days) else {
        return 1.0;
    };
    match last_seen {
        Some(seen) if now - seen > window => config.stale_multiplier,
        _ => 1.0,
    }
}

pub fn compute_word_weight(stats: &WordStats, now: DateTime<Utc>, config: &WeightConfig) -> f64 {
    base_weight(stats.exposures(), config) * time_multiplier(stats.last_seen, now, config)
}
