//! Input category detection.
//!
//! A query is read as Chinese when it carries any CJK ideograph, as pinyin
//! when it looks like one or more known syllables (optionally toned), and as
//! English otherwise.

use crate::phrases::{expand_phrase, is_english_override};
use crate::syllables::SyllableTable;
use cidian_core::utils::{has_tone_digit, strip_trailing_tone_digits};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// Default upper bound on syllables in a space-free pinyin token.
pub const DEFAULT_MAX_SYLLABLES: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Chinese,
    Pinyin,
    English,
}

impl Category {
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Chinese => "chinese",
            Category::Pinyin => "pinyin",
            Category::English => "english",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// CJK Unified Ideographs, Extension A and Extension B.
pub fn is_cjk_ideograph(ch: char) -> bool {
    matches!(ch,
        '\u{4E00}'..='\u{9FFF}' | '\u{3400}'..='\u{4DBF}' | '\u{20000}'..='\u{2A6DF}')
}

pub fn contains_cjk(text: &str) -> bool {
    text.chars().any(is_cjk_ideograph)
}

#[derive(Debug, Clone)]
pub struct InputClassifier {
    table: Arc<SyllableTable>,
    max_syllables: usize,
}

impl InputClassifier {
    pub fn new(table: Arc<SyllableTable>, max_syllables: usize) -> Self {
        Self {
            table,
            max_syllables,
        }
    }

    /// Classifier over the standard syllable table.
    pub fn standard() -> Self {
        Self::new(SyllableTable::standard(), DEFAULT_MAX_SYLLABLES)
    }

    pub fn max_syllables(&self) -> usize {
        self.max_syllables
    }

    /// Decide the category of `text`. Never fails.
    pub fn classify(&self, text: &str) -> Category {
        if contains_cjk(text) {
            return Category::Chinese;
        }

        let lowered = text.to_lowercase();
        if is_english_override(&lowered) {
            return Category::English;
        }
        if self.table.contains(strip_trailing_tone_digits(&lowered)) {
            return Category::Pinyin;
        }
        if has_tone_digit(&lowered) {
            return Category::Pinyin;
        }
        if self.segments(&lowered) || expand_phrase(&lowered).is_some() {
            return Category::Pinyin;
        }
        Category::English
    }

    fn segments(&self, lowered: &str) -> bool {
        let words: Vec<&str> = lowered.split_whitespace().collect();
        match words.as_slice() {
            [] => false,
            [single] if !lowered.contains(char::is_whitespace) => {
                self.table.segment(single, self.max_syllables).is_some()
            }
            _ => words
                .iter()
                .all(|w| self.table.contains(strip_trailing_tone_digits(w))),
        }
    }
}

impl Default for InputClassifier {
    fn default() -> Self {
        Self::standard()
    }
}
