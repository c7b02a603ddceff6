use crate::config::PoolTracking;
use crate::types::{Word, WordKey};

/// Decides whether the pool handed to the cache is the one the tree was built for
pub trait PoolIdentityTracker: Send {
    /// Remember `words` as the pool the tree now reflects
    fn record(&mut self, words: &[Word]);

    /// Whether `words` looks like the recorded pool
    fn matches(&self, words: &[Word]) -> bool;

    fn reset(&mut self);
}

pub fn tracker_for(mode: PoolTracking) -> Box<dyn PoolIdentityTracker> {
    match mode {
        PoolTracking::Endpoints => Box::new(EndpointPoolTracker::default()),
        PoolTracking::Exact => Box::new(ExactPoolTracker::default()),
    }
}

/// Compares length and the first/last keys only
///
/// O(1) per check. Two pools with the same length and endpoints but
/// different interiors are treated as the same pool.
#[derive(Clone, Debug, Default)]
pub struct EndpointPoolTracker {
    recorded: Option<Endpoints>,
}

#[derive(Clone, Debug, PartialEq)]
struct Endpoints {
    len: usize,
    first: Option<WordKey>,
    last: Option<WordKey>,
}

impl Endpoints {
    fn of(words: &[Word]) -> Self {
        Self {
            len: words.len(),
            first: words.first().map(Word::key),
            last: words.last().map(Word::key),
        }
    }
}

impl PoolIdentityTracker for EndpointPoolTracker {
    fn record(&mut self, words: &[Word]) {
        self.recorded = Some(Endpoints::of(words));
    }

    fn matches(&self, words: &[Word]) -> bool {
        match &self.recorded {
            Some(recorded) => {
                recorded.len == words.len()
                    && recorded.first.as_ref() == words.first().map(Word::key).as_ref()
                    && recorded.last.as_ref() == words.last().map(Word::key).as_ref()
            }
            None => false,
        }
    }

    fn reset(&mut self) {
        self.recorded = None;
    }
}

/// Compares every key in order, O(N) per check
#[derive(Clone, Debug, Default)]
pub struct ExactPoolTracker {
    keys: Option<Vec<WordKey>>,
}

impl PoolIdentityTracker for ExactPoolTracker {
    fn record(&mut self, words: &[Word]) {
        self.keys = Some(words.iter().map(Word::key).collect());
    }

    fn matches(&self, words: &[Word]) -> bool {
        match &self.keys {
            Some(keys) => {
                keys.len() == words.len()
                    && keys.iter().zip(words).all(|(key, word)| *key == word.key())
            }
            None => false,
        }
    }

    fn reset(&mut self) {
        self.keys = None;
    }
}
