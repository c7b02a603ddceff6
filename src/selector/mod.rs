//! Per-turn activity selection for Journey Mode and Drill Mode
//!
//! Journey Mode decision order (first match wins):
//! 1. no words at all -> new word with whatever fallback word exists
//! 2. fewer than 10 exposed words -> introduce a random new word
//! 3. motivational break roll (3%) unless recently shown
//! 4. new word roll (15%) unless recently introduced
//! 5. nothing exposed -> new word if allowed, else grammar break
//! 6. session revisit roll (18%) -> oldest word introduced this session
//! 7. weighted pick over exposed words
//!
//! A picked word then goes through the tier policy. Every turn ends with one
//! call to [`JourneyModeState::update_after_activity`].

use tracing::debug;

use crate::cache::{select_linear, CacheStats, WordWeightCache};
use crate::clock::Clock;
use crate::config::SelectionConfig;
use crate::error::Result;
use crate::journey::JourneyModeState;
use crate::policy::{select_activity, tier_for_exposures_with};
use crate::random::RandomSource;
use crate::stats::{ExerciseKind, StatsProvider, StatsStore};
use crate::types::{ActivityResult, Difficulty, Word};

/// Word pools and flags for one Journey Mode turn
#[derive(Clone, Copy)]
pub struct JourneyRequest<'a> {
    pub exposed_words: &'a [Word],
    pub new_words: &'a [Word],
    pub all_words: &'a [Word],
    pub audio_enabled: bool,
    /// Replaces cached weights for the weighted pick (linear scan)
    pub weight_override: Option<&'a dyn Fn(&Word) -> f64>,
}

impl<'a> JourneyRequest<'a> {
    pub fn new(
        exposed_words: &'a [Word],
        new_words: &'a [Word],
        all_words: &'a [Word],
        audio_enabled: bool,
    ) -> Self {
        Self {
            exposed_words,
            new_words,
            all_words,
            audio_enabled,
            weight_override: None,
        }
    }

    pub fn with_weight_override(mut self, weight_of: &'a dyn Fn(&Word) -> f64) -> Self {
        self.weight_override = Some(weight_of);
        self
    }
}

/// Owns the weight cache, randomness and clock for one learner
#[derive(Debug)]
pub struct ActivitySelector<R, C> {
    config: SelectionConfig,
    cache: WordWeightCache,
    rng: R,
    clock: C,
}

impl<R: RandomSource, C: Clock> ActivitySelector<R, C> {
    pub fn new(rng: R, clock: C) -> Self {
        let config = SelectionConfig::default();
        let cache = WordWeightCache::with_tracking(config.weights.clone(), config.pool_tracking);
        Self {
            config,
            cache,
            rng,
            clock,
        }
    }

    pub fn with_config(config: SelectionConfig, rng: R, clock: C) -> Result<Self> {
        config.validate()?;
        let cache = WordWeightCache::with_tracking(config.weights.clone(), config.pool_tracking);
        Ok(Self {
            config,
            cache,
            rng,
            clock,
        })
    }

    pub fn config(&self) -> &SelectionConfig {
        &self.config
    }

    pub fn cache(&self) -> &WordWeightCache {
        &self.cache
    }

    /// Fresh session state using this selector's block lengths
    pub fn new_session(&self) -> JourneyModeState {
        JourneyModeState::with_config(&self.config.journey)
    }

    // ==================== Journey Mode ====================

    /// Pick the next Journey Mode activity
    ///
    /// Without a session state a throwaway one is used, so spacing rules only
    /// hold across turns when the caller keeps passing the same state.
    pub fn select_journey_activity<S>(
        &mut self,
        request: &JourneyRequest<'_>,
        stats: &S,
        journey: Option<&mut JourneyModeState>,
    ) -> ActivityResult
    where
        S: StatsProvider + ?Sized,
    {
        let mut scratch;
        let state = match journey {
            Some(state) => state,
            None => {
                scratch = self.new_session();
                &mut scratch
            }
        };

        let result = self.decide_journey_turn(request, stats, state);
        state.update_after_activity();
        result
    }

    fn decide_journey_turn<S>(
        &mut self,
        request: &JourneyRequest<'_>,
        stats: &S,
        state: &mut JourneyModeState,
    ) -> ActivityResult
    where
        S: StatsProvider + ?Sized,
    {
        let exposed = request.exposed_words;
        let new_words = request.new_words;
        let journey = self.config.journey.clone();

        if exposed.is_empty() && new_words.is_empty() {
            let fallback = request.all_words.first().cloned();
            debug!(has_fallback = fallback.is_some(), "no word pools, emitting fallback new word");
            if let Some(word) = &fallback {
                state.record_new_word_introduced(word.clone());
            }
            return ActivityResult::new_word(fallback);
        }

        if exposed.len() < journey.bootstrap_exposed_words && !new_words.is_empty() {
            debug!(exposed = exposed.len(), "bootstrapping with a new word");
            return self.introduce_new_word(new_words, state);
        }

        if !state.should_block_motivational_breaks()
            && self.rng.chance(journey.motivational_break_chance)
        {
            debug!("motivational break");
            state.record_motivational_break();
            return ActivityResult::motivational_break();
        }

        if !state.should_block_new_words()
            && !new_words.is_empty()
            && self.rng.chance(journey.new_word_chance)
        {
            debug!("introducing a new word");
            return self.introduce_new_word(new_words, state);
        }

        if exposed.is_empty() {
            if !state.should_block_new_words() && !new_words.is_empty() {
                return self.introduce_new_word(new_words, state);
            }
            debug!("nothing exposed and new words blocked, grammar break");
            return ActivityResult::grammar_break();
        }

        let revisit = if state.has_pending_new_words()
            && self.rng.chance(journey.session_revisit_chance)
        {
            state.get_and_remove_oldest_new_word()
        } else {
            None
        };

        let word = match revisit {
            Some(word) => {
                debug!(word = %word.key(), "revisiting a word introduced this session");
                word
            }
            None => match self.pick_exposed_word(request, stats) {
                Some(word) => word,
                None => return ActivityResult::grammar_break(),
            },
        };

        let exposures = stats.total_correct_exposures(&word);
        let tier = tier_for_exposures_with(exposures, &self.config);
        select_activity(&word, tier, request.audio_enabled, &self.config, &mut self.rng)
    }

    fn introduce_new_word(&mut self, new_words: &[Word], state: &mut JourneyModeState) -> ActivityResult {
        let word = new_words[self.rng.index(new_words.len())].clone();
        state.record_new_word_introduced(word.clone());
        ActivityResult::new_word(Some(word))
    }

    fn pick_exposed_word<S>(&mut self, request: &JourneyRequest<'_>, stats: &S) -> Option<Word>
    where
        S: StatsProvider + ?Sized,
    {
        match request.weight_override {
            Some(weight_of) => select_linear(request.exposed_words, weight_of, &mut self.rng).cloned(),
            None => {
                let now = self.clock.now();
                self.cache
                    .select_word_by_weight(request.exposed_words, stats, now, &mut self.rng)
            }
        }
    }

    // ==================== Drill Mode ====================

    /// Activity for `word` at a learner-chosen difficulty
    pub fn select_drill_activity(
        &mut self,
        word: &Word,
        difficulty: Difficulty,
        audio_enabled: bool,
    ) -> ActivityResult {
        select_activity(word, difficulty.tier(), audio_enabled, &self.config, &mut self.rng)
    }

    /// Like [`Self::select_drill_activity`], parsing `"easy" | "medium" | "hard"`
    pub fn select_drill_activity_str(
        &mut self,
        word: &Word,
        difficulty: &str,
        audio_enabled: bool,
    ) -> Result<ActivityResult> {
        let difficulty: Difficulty = difficulty.parse()?;
        Ok(self.select_drill_activity(word, difficulty, audio_enabled))
    }

    // ==================== Cache maintenance ====================

    pub fn invalidate_word_weight(&mut self, word: &Word) {
        self.cache.invalidate_word(word);
    }

    pub fn clear_word_weight_cache(&mut self) {
        self.cache.clear();
    }

    pub fn word_weight_cache_stats(&self) -> CacheStats {
        self.cache.stats()
    }

    /// Record the learner's answer to `activity` and drop the word's cached weight
    ///
    /// Breaks and new-word cards carry no exercise counter and are ignored.
    pub fn record_answer(&mut self, stats: &mut StatsStore, activity: &ActivityResult, correct: bool) {
        let Some(word) = &activity.word else {
            return;
        };
        let Some(kind) = ExerciseKind::for_activity(activity.activity_type, activity.mode) else {
            return;
        };
        stats.record_answer(word, kind, correct, self.clock.now());
        self.cache.invalidate_word(word);
    }
}

// ==================== Unit Tests ====================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::{ManualClock, SystemClock};
    use crate::error::SelectionError;
    use crate::random::{ChaChaRandom, ScriptedRandom};
    use crate::stats::{ExerciseCounts, WordStats};
    use crate::types::{ActivityMode, ActivityType};
    use chrono::Utc;

    fn words(prefix: &str, n: usize) -> Vec<Word> {
        (0..n)
            .map(|i| Word::with_guid(format!("{prefix}{i}"), format!("t{i}"), "c", "g", format!("{prefix}{i}")))
            .collect()
    }

    fn scripted(values: &[f64]) -> ActivitySelector<ScriptedRandom, SystemClock> {
        ActivitySelector::new(ScriptedRandom::new(values.iter().copied()), SystemClock)
    }

    #[test]
    fn test_no_words_uses_fallback() {
        let mut selector = scripted(&[0.5]);
        let all = words("a", 2);
        let mut state = JourneyModeState::new();
        let request = JourneyRequest::new(&[], &[], &all, true);

        let result = selector.select_journey_activity(&request, &StatsStore::new(), Some(&mut state));
        assert_eq!(result.activity_type, ActivityType::NewWord);
        assert_eq!(result.word, Some(all[0].clone()));
        assert_eq!(state.pending_new_words().count(), 1);
        // recorded then decremented once
        assert!(state.should_block_new_words());

        let empty = JourneyRequest::new(&[], &[], &[], true);
        let result = selector.select_journey_activity(&empty, &StatsStore::new(), None);
        assert_eq!(result, ActivityResult::new_word(None));
    }

    #[test]
    fn test_bootstrap_picks_new_word() {
        let mut selector = scripted(&[0.99]);
        let exposed = words("e", 3);
        let new = words("n", 4);
        let mut state = JourneyModeState::new();
        let request = JourneyRequest::new(&exposed, &new, &[], true);

        let result = selector.select_journey_activity(&request, &StatsStore::new(), Some(&mut state));
        assert_eq!(result.activity_type, ActivityType::NewWord);
        assert_eq!(result.word, Some(new[3].clone()));
    }

    #[test]
    fn test_motivational_break_roll_and_block() {
        let exposed = words("e", 12);
        let mut selector = scripted(&[0.01]);
        let mut state = JourneyModeState::new();
        let request = JourneyRequest::new(&exposed, &[], &[], true);
        let stats = StatsStore::new();

        let first = selector.select_journey_activity(&request, &stats, Some(&mut state));
        assert_eq!(first.activity_type, ActivityType::MotivationalBreak);
        assert!(first.word.is_none());

        for _ in 0..4 {
            let next = selector.select_journey_activity(&request, &stats, Some(&mut state));
            assert_ne!(next.activity_type, ActivityType::MotivationalBreak);
        }
        let after_block = selector.select_journey_activity(&request, &stats, Some(&mut state));
        assert_eq!(after_block.activity_type, ActivityType::MotivationalBreak);
    }

    #[test]
    fn test_new_word_roll() {
        let exposed = words("e", 12);
        let new = words("n", 2);
        // break roll misses (0.10 >= 0.03), new word roll hits (0.10 < 0.15), index 0
        let mut selector = scripted(&[0.10, 0.10, 0.0]);
        let mut state = JourneyModeState::new();
        let request = JourneyRequest::new(&exposed, &new, &[], true);

        let result = selector.select_journey_activity(&request, &StatsStore::new(), Some(&mut state));
        assert_eq!(result.activity_type, ActivityType::NewWord);
        assert_eq!(result.word, Some(new[0].clone()));
        assert_eq!(state.get_and_remove_oldest_new_word(), Some(new[0].clone()));
    }

    #[test]
    fn test_new_word_blocked_falls_through_to_exercise() {
        let exposed = words("e", 12);
        let new = words("n", 2);
        let mut selector = scripted(&[0.10]);
        let mut state = JourneyModeState::new();
        state.record_new_word_introduced(new[1].clone());
        let request = JourneyRequest::new(&exposed, &new, &[], true);

        let result = selector.select_journey_activity(&request, &StatsStore::new(), Some(&mut state));
        assert!(result.activity_type.is_exercise());
    }

    #[test]
    fn test_revisit_takes_oldest_session_word() {
        let exposed = words("e", 12);
        let introduced = words("n", 2);
        // break miss, revisit hit (0.10 < 0.18), then activity draws
        let mut selector = scripted(&[0.10]);
        let mut state = JourneyModeState::new();
        state.record_new_word_introduced(introduced[0].clone());
        state.record_new_word_introduced(introduced[1].clone());
        let request = JourneyRequest::new(&exposed, &[], &[], true);

        let result = selector.select_journey_activity(&request, &StatsStore::new(), Some(&mut state));
        assert!(result.activity_type.is_exercise());
        assert_eq!(result.word, Some(introduced[0].clone()));
        assert_eq!(state.pending_new_words().count(), 1);
    }

    #[test]
    fn test_grammar_break_when_nothing_exposed_and_blocked() {
        let new = words("n", 2);
        let mut config = SelectionConfig::default();
        config.journey.bootstrap_exposed_words = 0;
        let mut selector =
            ActivitySelector::with_config(config, ScriptedRandom::new([0.5]), SystemClock).unwrap();
        let mut state = JourneyModeState::new();
        state.record_new_word_introduced(new[0].clone());
        let request = JourneyRequest::new(&[], &new, &[], true);

        let result = selector.select_journey_activity(&request, &StatsStore::new(), Some(&mut state));
        assert_eq!(result, ActivityResult::grammar_break());

        let result = selector.select_journey_activity(&request, &StatsStore::new(), Some(&mut state));
        assert_eq!(result, ActivityResult::grammar_break());

        // block expired: the same turn now introduces a word
        let result = selector.select_journey_activity(&request, &StatsStore::new(), Some(&mut state));
        assert_eq!(result.activity_type, ActivityType::NewWord);
    }

    #[test]
    fn test_weight_override_is_used() {
        let exposed = words("e", 12);
        let favourite = exposed[5].clone();
        let override_fn = move |w: &Word| if *w == favourite { 1.0 } else { 0.0 };
        let mut selector = ActivitySelector::new(ChaChaRandom::with_seed(5), SystemClock);
        let mut state = JourneyModeState::new();
        let request = JourneyRequest::new(&exposed, &[], &[], true).with_weight_override(&override_fn);

        for _ in 0..200 {
            let result = selector.select_journey_activity(&request, &StatsStore::new(), Some(&mut state));
            if result.activity_type.is_exercise() {
                assert_eq!(result.word, Some(exposed[5].clone()));
            }
        }
        assert!(!selector.word_weight_cache_stats().tree_built);
    }

    #[test]
    fn test_tier_follows_exposures() {
        let exposed = words("e", 12);
        let stats = |_: &Word| WordStats {
            exposed: true,
            multiple_choice: ExerciseCounts {
                correct: 2,
                incorrect: 0,
            },
            ..Default::default()
        };
        let mut selector = ActivitySelector::new(ChaChaRandom::with_seed(8), SystemClock);
        let mut state = JourneyModeState::new();
        let request = JourneyRequest::new(&exposed, &[], &[], true);

        for _ in 0..500 {
            let result = selector.select_journey_activity(&request, &stats, Some(&mut state));
            assert_ne!(result.activity_type, ActivityType::Typing, "tier 1 has no typing");
        }
    }

    #[test]
    fn test_drill_forced_tier() {
        let word = words("d", 1).remove(0);
        let mut selector = ActivitySelector::new(ChaChaRandom::with_seed(3), SystemClock);
        for _ in 0..500 {
            let easy = selector.select_drill_activity(&word, Difficulty::Easy, true);
            assert_ne!(easy.activity_type, ActivityType::Typing);
            if easy.activity_type == ActivityType::Listening {
                assert_eq!(easy.mode, Some(ActivityMode::Easy));
            }
            let hard = selector.select_drill_activity(&word, Difficulty::Hard, false);
            assert_ne!(hard.activity_type, ActivityType::Listening);
            assert_eq!(hard.word, Some(word.clone()));
        }
    }

    #[test]
    fn test_drill_unknown_difficulty_fails() {
        let word = words("d", 1).remove(0);
        let mut selector = ActivitySelector::new(ChaChaRandom::with_seed(3), SystemClock);
        assert!(selector.select_drill_activity_str(&word, "medium", true).is_ok());
        assert!(matches!(
            selector.select_drill_activity_str(&word, "nightmare", true),
            Err(SelectionError::UnknownDifficulty(_))
        ));
    }

    #[test]
    fn test_invalid_config_rejected() {
        let mut config = SelectionConfig::default();
        config.max_activity_attempts = 0;
        assert!(ActivitySelector::with_config(config, ChaChaRandom::with_seed(1), SystemClock).is_err());
    }

    #[test]
    fn test_record_answer_updates_stats_and_invalidates() {
        let clock = ManualClock::new(Utc::now());
        let mut selector = ActivitySelector::new(ChaChaRandom::with_seed(4), &clock);
        let mut stats = StatsStore::new();
        let exposed = words("e", 12);
        for word in &exposed {
            stats.mark_exposed(word, clock.now());
        }
        let mut state = selector.new_session();
        let request = JourneyRequest::new(&exposed, &[], &[], true);

        let mut result = selector.select_journey_activity(&request, &stats, Some(&mut state));
        while !result.activity_type.is_exercise() {
            result = selector.select_journey_activity(&request, &stats, Some(&mut state));
        }
        assert!(selector.word_weight_cache_stats().tree_built);

        selector.record_answer(&mut stats, &result, true);
        let word = result.word.clone().unwrap();
        assert_eq!(stats.total_correct_exposures(&word), 1);
        assert!(selector.word_weight_cache_stats().dirty);

        selector.record_answer(&mut stats, &ActivityResult::motivational_break(), true);
        assert_eq!(stats.len(), 12);
    }

    #[test]
    fn test_clear_cache() {
        let mut selector = ActivitySelector::new(ChaChaRandom::with_seed(4), SystemClock);
        let exposed = words("e", 12);
        let request = JourneyRequest::new(&exposed, &[], &[], true);
        for _ in 0..20 {
            selector.select_journey_activity(&request, &StatsStore::new(), None);
        }
        assert!(selector.word_weight_cache_stats().cached_weights > 0);
        selector.clear_word_weight_cache();
        assert_eq!(selector.word_weight_cache_stats().cached_weights, 0);
    }
}
