//! Per-session Journey Mode constraints
//!
//! Two countdowns keep new-word introductions and motivational breaks apart,
//! and a FIFO remembers words introduced this session so they can be revisited
//! early. The selector calls [`JourneyModeState::update_after_activity`] exactly
//! once per turn.

use std::collections::VecDeque;

use crate::config::JourneyConfig;
use crate::types::{Word, MOTIVATIONAL_BREAK_BLOCK_TURNS, NEW_WORD_BLOCK_TURNS};

#[derive(Clone, Debug)]
pub struct JourneyModeState {
    new_word_block: u32,
    break_block: u32,
    new_words: VecDeque<Word>,
    new_word_block_turns: u32,
    break_block_turns: u32,
}

impl Default for JourneyModeState {
    fn default() -> Self {
        Self::new()
    }
}

impl JourneyModeState {
    pub fn new() -> Self {
        Self {
            new_word_block: 0,
            break_block: 0,
            new_words: VecDeque::new(),
            new_word_block_turns: NEW_WORD_BLOCK_TURNS,
            break_block_turns: MOTIVATIONAL_BREAK_BLOCK_TURNS,
        }
    }

    pub fn with_config(config: &JourneyConfig) -> Self {
        Self {
            new_word_block_turns: config.new_word_block_turns,
            break_block_turns: config.motivational_break_block_turns,
            ..Self::new()
        }
    }

    pub fn record_new_word_introduced(&mut self, word: Word) {
        self.new_word_block = self.new_word_block_turns;
        self.new_words.push_back(word);
    }

    pub fn record_motivational_break(&mut self) {
        self.break_block = self.break_block_turns;
    }

    /// Count both blocks down by one turn
    pub fn update_after_activity(&mut self) {
        self.new_word_block = self.new_word_block.saturating_sub(1);
        self.break_block = self.break_block.saturating_sub(1);
    }

    pub fn should_block_new_words(&self) -> bool {
        self.new_word_block > 0
    }

    pub fn should_block_motivational_breaks(&self) -> bool {
        self.break_block > 0
    }

    pub fn get_and_remove_oldest_new_word(&mut self) -> Option<Word> {
        self.new_words.pop_front()
    }

    /// Words introduced this session and not yet revisited, oldest first
    pub fn pending_new_words(&self) -> impl Iterator<Item = &Word> {
        self.new_words.iter()
    }

    pub fn has_pending_new_words(&self) -> bool {
        !self.new_words.is_empty()
    }
}
