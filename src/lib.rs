//! # trakaido-select - adaptive activity selection for vocabulary flashcards
//!
//! This crate decides, turn by turn, which word a learner sees next and which
//! exercise it is tested with:
//!
//! - **Weighted selection tree** - Fenwick tree sampler, O(log N) update and draw
//! - **Word weight cache** - time-bounded per-word weights kept in sync with the tree
//! - **Activity policy** - exposure tiers and exercise probability tables
//! - **Journey state** - per-session spacing of new words and motivational breaks
//! - **Selector** - Journey Mode and Drill Mode orchestration
//!
//! ## Module layout
//!
//! - [`tree`] - Fenwick-tree weighted sampler
//! - [`cache`] - weight cache, pool tracking and linear fallback
//! - [`policy`] - tier mapping and exercise-type sampling
//! - [`journey`] - session constraint machine
//! - [`selector`] - top-level per-turn decisions
//! - [`stats`] - per-word learning records and the stats provider seam
//! - [`random`] / [`clock`] - injectable randomness and time
//! - [`config`] - tunable constants
//! - [`types`] - shared types and constants
//!
//! ## Example
//!
//! ```rust
//! use trakaido_select::{
//!     ActivitySelector, ChaChaRandom, JourneyModeState, JourneyRequest, StatsStore,
//!     SystemClock, Word,
//! };
//!
//! let words = vec![
//!     Word::with_guid("labas", "hello", "phrases", "greetings", "N01"),
//!     Word::with_guid("ačiū", "thanks", "phrases", "greetings", "N02"),
//! ];
//! let stats = StatsStore::new();
//! let mut selector = ActivitySelector::new(ChaChaRandom::with_seed(7), SystemClock);
//! let mut session = JourneyModeState::new();
//!
//! let request = JourneyRequest::new(&[], &words, &words, true);
//! let result = selector.select_journey_activity(&request, &stats, Some(&mut session));
//! assert!(result.word.is_some());
//! ```

#![deny(clippy::all)]

// ============================================================================
// Modules
// ============================================================================

pub mod cache;
pub mod clock;
pub mod config;
pub mod error;
pub mod journey;
pub mod policy;
pub mod random;
pub mod selector;
pub mod stats;
pub mod tree;
pub mod types;

// ============================================================================
// Re-exports
// ============================================================================

pub use types::*;

pub use cache::{
    CacheStats, EndpointPoolTracker, ExactPoolTracker, PoolIdentityTracker, WordWeightCache,
};
pub use clock::{Clock, ManualClock, SystemClock};
pub use config::{ActivityProbabilities, JourneyConfig, PoolTracking, SelectionConfig, WeightConfig};
pub use error::{Result, SelectionError};
pub use journey::JourneyModeState;
pub use policy::{attempt_activity_selection, select_activity, tier_for_exposures};
pub use random::{ChaChaRandom, RandomSource, ScriptedRandom};
pub use selector::{ActivitySelector, JourneyRequest};
pub use stats::{ExerciseCounts, ExerciseKind, StatsProvider, StatsStore, WordStats};
pub use tree::WeightedSelectionTree;
