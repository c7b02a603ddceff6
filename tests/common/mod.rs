#![allow(dead_code)]

use std::sync::Once;

use chrono::{DateTime, Duration, Utc};
use trakaido_select::{ExerciseCounts, Word, WordStats};

static TRACING: Once = Once::new();

/// Route library logs to the test writer; filter with `RUST_LOG`
pub fn init_tracing() {
    TRACING.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();
    });
}

pub fn word(name: &str) -> Word {
    Word::with_guid(name, format!("{name}-en"), "nouns_one", "test", name)
}

pub fn stats_with_exposures(correct: u32, last_seen: Option<DateTime<Utc>>) -> WordStats {
    WordStats {
        exposed: true,
        multiple_choice: ExerciseCounts {
            correct,
            incorrect: 0,
        },
        last_seen,
        ..Default::default()
    }
}

pub fn days_ago(now: DateTime<Utc>, days: i64) -> DateTime<Utc> {
    now - Duration::days(days)
}
