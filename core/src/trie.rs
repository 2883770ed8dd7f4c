/// Prefix trie for syllable membership and segmentation.
use ahash::AHashMap;

/// A prefix tree over complete words (pinyin syllables in practice).
///
/// # Example
/// ```
/// use cidian_core::trie::TrieNode;
///
/// let trie = TrieNode::from_words(["ni", "hao"]);
/// assert!(trie.contains_word("ni"));
/// assert!(!trie.contains_word("n"));
///
/// let input: Vec<char> = "nihao".chars().collect();
/// assert_eq!(trie.walk_prefixes(&input, 0), vec![(2, "ni".to_string())]);
/// ```
#[derive(Debug, Default)]
pub struct TrieNode {
    children: AHashMap<char, TrieNode>,
    /// Set when a word ends at this node.
    word: Option<String>,
}

impl TrieNode {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a trie holding every word of `words`.
    pub fn from_words<I, S>(words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut trie = Self::new();
        for w in words {
            trie.insert(w.as_ref());
        }
        trie
    }

    /// Insert a word. Empty words are ignored.
    pub fn insert(&mut self, word: &str) {
        if word.is_empty() {
            return;
        }
        let mut node = self;
        for ch in word.chars() {
            node = node.children.entry(ch).or_default();
        }
        node.word = Some(word.to_string());
    }

    /// True only when `word` was inserted as a whole word, not as a prefix.
    pub fn contains_word(&self, word: &str) -> bool {
        let mut node = self;
        for ch in word.chars() {
            match node.children.get(&ch) {
                Some(child) => node = child,
                None => return false,
            }
        }
        node.word.is_some()
    }

    /// Number of words stored below this node (including itself).
    pub fn word_count(&self) -> usize {
        usize::from(self.word.is_some())
            + self.children.values().map(TrieNode::word_count).sum::<usize>()
    }

    /// Every word that starts at `input[start..]`, as
    /// `(exclusive end index, word)`, shortest first.
    pub fn walk_prefixes(&self, input: &[char], start: usize) -> Vec<(usize, String)> {
        let mut res = Vec::new();
        let mut node = self;
        for (idx, ch) in input.iter().enumerate().skip(start) {
            match node.children.get(ch) {
                Some(child) => {
                    node = child;
                    if let Some(w) = &node.word {
                        res.push((idx + 1, w.clone()));
                    }
                }
                None => break,
            }
        }
        res
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insert_and_contains() {
        let trie = TrieNode::from_words(["ni", "hao", "nihao"]);
        assert!(trie.contains_word("ni"));
        assert!(trie.contains_word("nihao"));
        assert!(!trie.contains_word("n"));
        assert!(!trie.contains_word("niha"));
        assert!(!trie.contains_word(""));
        assert_eq!(trie.word_count(), 3);
    }

    #[test]
    fn walk_prefixes_reports_every_match_shortest_first() {
        let trie = TrieNode::from_words(["x", "xi", "xian"]);
        let input: Vec<char> = "xiang".chars().collect();
        assert_eq!(
            trie.walk_prefixes(&input, 0),
            vec![
                (1, "x".to_string()),
                (2, "xi".to_string()),
                (4, "xian".to_string())
            ]
        );
    }

    #[test]
    fn walk_prefixes_from_offset_and_miss() {
        let trie = TrieNode::from_words(["ni", "hao"]);
        let input: Vec<char> = "nihao".chars().collect();
        assert_eq!(trie.walk_prefixes(&input, 2), vec![(5, "hao".to_string())]);
        assert!(trie.walk_prefixes(&input, 1).is_empty());
        assert!(trie.walk_prefixes(&input, 9).is_empty());
    }
}
