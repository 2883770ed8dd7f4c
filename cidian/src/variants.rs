//! Pinyin variant generation.
//!
//! One raw pinyin-like query expands into the normalized forms worth trying
//! against the lexicon, most specific first.

use crate::phrases::expand_phrase;
use crate::syllables::SyllableTable;
use ahash::AHashSet;
use cidian_core::utils::{has_tone_digit, is_tone_digit, strip_tone_digits};
use std::sync::Arc;

#[derive(Debug, Clone)]
pub struct PinyinVariantGenerator {
    table: Arc<SyllableTable>,
}

impl PinyinVariantGenerator {
    pub fn new(table: Arc<SyllableTable>) -> Self {
        Self { table }
    }

    pub fn standard() -> Self {
        Self::new(SyllableTable::standard())
    }

    /// Ordered, deduplicated candidate forms of `text`. The first element is
    /// always `text` itself.
    ///
    /// - `ni3hao3` -> `ni3hao3`, `ni3 hao3`, `ni hao`
    /// - `nihao` -> `nihao`, `ni hao`, `ni3 hao3` (phrase table)
    /// - `ni hao` -> `ni hao`, `nihao`
    pub fn generate_variants(&self, text: &str) -> Vec<String> {
        let mut variants = vec![text.to_string()];

        if text.contains(' ') {
            variants.push(text.replace(' ', ""));
        } else if has_tone_digit(text) {
            let spaced = space_after_tones(text);
            let toneless = strip_tone_digits(&spaced);
            variants.push(spaced);
            variants.push(toneless);
        } else {
            let lowered = text.to_lowercase();
            for prefix in self.table.prefixes_of(&lowered) {
                if let Some(rest) = lowered.strip_prefix(prefix.as_str()) {
                    if !rest.is_empty() {
                        variants.push(format!("{prefix} {rest}"));
                    }
                }
            }
            if let Some(expansion) = expand_phrase(&lowered) {
                variants.push(expansion.to_string());
            }
        }

        dedup_in_order(variants)
    }
}

impl Default for PinyinVariantGenerator {
    fn default() -> Self {
        Self::standard()
    }
}

/// Insert a space after each group of tone digits that follows a letter.
fn space_after_tones(text: &str) -> String {
    let chars: Vec<char> = text.chars().collect();
    let mut out = String::with_capacity(text.len() + chars.len() / 2);
    let mut in_group = false;
    for (i, &ch) in chars.iter().enumerate() {
        out.push(ch);
        if is_tone_digit(ch) && (in_group || (i > 0 && chars[i - 1].is_ascii_alphabetic())) {
            in_group = true;
            let group_ends = chars.get(i + 1).map_or(true, |next| !is_tone_digit(*next));
            if group_ends {
                out.push(' ');
                in_group = false;
            }
        }
    }
    out.trim_end().to_string()
}

fn dedup_in_order(items: Vec<String>) -> Vec<String> {
    let mut seen = AHashSet::new();
    items
        .into_iter()
        .filter(|item| seen.insert(item.clone()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn variants(text: &str) -> Vec<String> {
        PinyinVariantGenerator::standard().generate_variants(text)
    }

    #[test]
    fn toned_without_spaces() {
        assert_eq!(variants("ni3hao3"), vec!["ni3hao3", "ni3 hao3", "ni hao"]);
        assert_eq!(variants("ni3hao"), vec!["ni3hao", "ni3 hao", "ni hao"]);
    }

    #[test]
    fn single_toned_syllable_dedups() {
        // "hao3" spaced is unchanged, so only the toneless form is new
        assert_eq!(variants("hao3"), vec!["hao3", "hao"]);
    }

    #[test]
    fn untoned_splits_every_prefix_longest_first() {
        assert_eq!(
            variants("xianzai"),
            vec!["xianzai", "xian zai", "xia nzai", "xi anzai", "xian4 zai4"]
        );
    }

    #[test]
    fn phrase_expansion_is_appended() {
        let v = variants("nihao");
        assert_eq!(v.first().map(String::as_str), Some("nihao"));
        assert!(v.contains(&"ni hao".to_string()));
        assert_eq!(v.last().map(String::as_str), Some("ni3 hao3"));
    }

    #[test]
    fn spaced_input_collapses() {
        assert_eq!(variants("ni hao"), vec!["ni hao", "nihao"]);
    }

    #[test]
    fn whole_word_syllable_is_not_split() {
        // "zhong" is itself a syllable; only proper prefixes produce splits
        assert_eq!(variants("zhong"), vec!["zhong"]);
    }

    #[test]
    fn variants_are_unique_and_start_with_input() {
        for text in ["woaini", "Ni3Hao3", "a", "zh", "ni hao ma", "xiexie"] {
            let v = variants(text);
            assert_eq!(v[0], text);
            let mut sorted = v.clone();
            sorted.sort();
            sorted.dedup();
            assert_eq!(sorted.len(), v.len(), "duplicates in {v:?}");
        }
    }
}
