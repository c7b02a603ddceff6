use std::fmt;
use std::hash::{Hash, Hasher};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::SelectionError;

// ==================== Constants ====================

/// Words with fewer exposures than this keep the full base weight
pub const WELL_KNOWN_EXPOSURES: u32 = 8;
/// Words at or above this many exposures get the smallest base weight
pub const MASTERED_EXPOSURES: u32 = 15;
pub const BASE_WEIGHT_LEARNING: f64 = 1.0;
pub const BASE_WEIGHT_WELL_KNOWN: f64 = 0.5;
pub const BASE_WEIGHT_MASTERED: f64 = 0.2;

/// Words unseen for longer than this get boosted
pub const STALE_AFTER_DAYS: i64 = 14;
pub const STALE_MULTIPLIER: f64 = 3.0;

/// Cached weights older than this are recomputed
pub const WEIGHT_CACHE_TTL_SECS: i64 = 5 * 60;

/// Exposure thresholds for tier 2 and tier 3
pub const TIER_TWO_EXPOSURES: u32 = 4;
pub const TIER_THREE_EXPOSURES: u32 = 9;

/// Attempts before falling back to multiple choice
pub const MAX_ACTIVITY_ATTEMPTS: usize = 10;

/// Session spacing (turns)
pub const NEW_WORD_BLOCK_TURNS: u32 = 2;
pub const MOTIVATIONAL_BREAK_BLOCK_TURNS: u32 = 5;

/// Journey Mode branch probabilities
pub const MOTIVATIONAL_BREAK_CHANCE: f64 = 0.03;
pub const NEW_WORD_CHANCE: f64 = 0.15;
pub const SESSION_REVISIT_CHANCE: f64 = 0.18;

/// Below this many exposed words, Journey Mode keeps introducing new ones
pub const BOOTSTRAP_EXPOSED_WORDS: usize = 10;

/// Probability of the easy listening sub-mode per tier
pub const LISTENING_EASY_TIER_ONE: f64 = 1.0;
pub const LISTENING_EASY_TIER_TWO: f64 = 0.6;
pub const LISTENING_EASY_TIER_THREE: f64 = 0.3;

// ==================== Words ====================

/// Stable identity of a vocabulary entry
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum WordKey {
    /// Corpus-scoped GUID, the preferred identity
    Guid { corpus: String, guid: String },
    /// Source/target composite used before GUIDs existed
    Legacy { source: String, target: String },
}

impl fmt::Display for WordKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WordKey::Guid { corpus, guid } => write!(f, "{corpus}:{guid}"),
            WordKey::Legacy { source, target } => write!(f, "{source}-{target}"),
        }
    }
}

/// A vocabulary entry as handed over by the corpus
///
/// Equality and hashing only look at [`Word::key`].
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Word {
    /// Term in the language being learned
    pub source: String,
    /// Term in the learner's language
    pub target: String,
    pub corpus: String,
    pub group: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub guid: Option<String>,
}

impl Word {
    pub fn new(
        source: impl Into<String>,
        target: impl Into<String>,
        corpus: impl Into<String>,
        group: impl Into<String>,
    ) -> Self {
        Self {
            source: source.into(),
            target: target.into(),
            corpus: corpus.into(),
            group: group.into(),
            guid: None,
        }
    }

    pub fn with_guid(
        source: impl Into<String>,
        target: impl Into<String>,
        corpus: impl Into<String>,
        group: impl Into<String>,
        guid: impl Into<String>,
    ) -> Self {
        Self {
            guid: Some(guid.into()),
            ..Self::new(source, target, corpus, group)
        }
    }

    /// GUID key when available, legacy composite otherwise
    pub fn key(&self) -> WordKey {
        match &self.guid {
            Some(guid) => WordKey::Guid {
                corpus: self.corpus.clone(),
                guid: guid.clone(),
            },
            None => self.legacy_key(),
        }
    }

    pub fn legacy_key(&self) -> WordKey {
        WordKey::Legacy {
            source: self.source.clone(),
            target: self.target.clone(),
        }
    }
}

impl PartialEq for Word {
    fn eq(&self, other: &Self) -> bool {
        self.key() == other.key()
    }
}

impl Eq for Word {}

impl Hash for Word {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.key().hash(state);
    }
}

// ==================== Activities ====================

/// What the UI should show next
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ActivityType {
    MultipleChoice,
    Listening,
    Typing,
    NewWord,
    MotivationalBreak,
    GrammarBreak,
}

impl ActivityType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::MultipleChoice => "multiple-choice",
            Self::Listening => "listening",
            Self::Typing => "typing",
            Self::NewWord => "new-word",
            Self::MotivationalBreak => "motivational-break",
            Self::GrammarBreak => "grammar-break",
        }
    }

    /// Exercise types are the ones the tier policy can produce
    pub fn is_exercise(&self) -> bool {
        matches!(self, Self::MultipleChoice | Self::Listening | Self::Typing)
    }
}

impl fmt::Display for ActivityType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Exercise sub-mode: a direction for multiple choice and typing, a
/// difficulty for listening
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ActivityMode {
    SourceToTarget,
    TargetToSource,
    Easy,
    Hard,
}

impl ActivityMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::SourceToTarget => "source-to-target",
            Self::TargetToSource => "target-to-source",
            Self::Easy => "easy",
            Self::Hard => "hard",
        }
    }
}

impl fmt::Display for ActivityMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result handed back to the UI layer
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivityResult {
    #[serde(rename = "type")]
    pub activity_type: ActivityType,
    pub word: Option<Word>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mode: Option<ActivityMode>,
}

impl ActivityResult {
    pub fn new(activity_type: ActivityType, word: Option<Word>, mode: Option<ActivityMode>) -> Self {
        Self {
            activity_type,
            word,
            mode,
        }
    }

    pub fn new_word(word: Option<Word>) -> Self {
        Self::new(ActivityType::NewWord, word, None)
    }

    pub fn motivational_break() -> Self {
        Self::new(ActivityType::MotivationalBreak, None, None)
    }

    pub fn grammar_break() -> Self {
        Self::new(ActivityType::GrammarBreak, None, None)
    }
}

// ==================== Tiers & difficulty ====================

/// Coarse mastery bucket driving the exercise mix
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Tier {
    One,
    Two,
    Three,
}

impl Tier {
    pub fn as_u8(&self) -> u8 {
        match self {
            Tier::One => 1,
            Tier::Two => 2,
            Tier::Three => 3,
        }
    }

    pub(crate) fn to_index(self) -> usize {
        self.as_u8() as usize - 1
    }
}

/// Drill Mode difficulty chosen by the learner
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

impl Difficulty {
    pub fn tier(&self) -> Tier {
        match self {
            Difficulty::Easy => Tier::One,
            Difficulty::Medium => Tier::Two,
            Difficulty::Hard => Tier::Three,
        }
    }
}

impl FromStr for Difficulty {
    type Err = SelectionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "easy" => Ok(Difficulty::Easy),
            "medium" => Ok(Difficulty::Medium),
            "hard" => Ok(Difficulty::Hard),
            _ => Err(SelectionError::UnknownDifficulty(s.to_string())),
        }
    }
}
