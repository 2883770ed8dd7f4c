// cidian/src/syllables.rs
//
// Table of valid toneless pinyin syllables. Built once into a trie and shared
// read-only by the classifier and the variant generator.

use cidian_core::TrieNode;
use once_cell::sync::Lazy;
use std::sync::Arc;

/// All standard pinyin syllables (without tone markers).
pub const PINYIN_SYLLABLES: &[&str] = &[
    "a", "ai", "an", "ang", "ao", "ba", "bai", "ban", "bang", "bao", "bei", "ben", "beng", "bi",
    "bian", "biao", "bie", "bin", "bing", "bo", "bu", "ca", "cai", "can", "cang", "cao", "ce",
    "cen", "ceng", "cha", "chai", "chan", "chang", "chao", "che", "chen", "cheng", "chi", "chong",
    "chou", "chu", "chuai", "chuan", "chuang", "chui", "chun", "chuo", "ci", "cong", "cou", "cu",
    "cuan", "cui", "cun", "cuo", "da", "dai", "dan", "dang", "dao", "de", "dei", "deng", "di",
    "dia", "dian", "diao", "die", "ding", "diu", "dong", "dou", "du", "duan", "dui", "dun", "duo",
    "e", "ei", "en", "er", "fa", "fan", "fang", "fei", "fen", "feng", "fo", "fou", "fu", "ga",
    "gai", "gan", "gang", "gao", "ge", "gei", "gen", "geng", "gong", "gou", "gu", "gua", "guai",
    "guan", "guang", "gui", "gun", "guo", "ha", "hai", "han", "hang", "hao", "he", "hei", "hen",
    "heng", "hong", "hou", "hu", "hua", "huai", "huan", "huang", "hui", "hun", "huo", "ji", "jia",
    "jian", "jiang", "jiao", "jie", "jin", "jing", "jiong", "jiu", "ju", "juan", "jue", "jun",
    "ka", "kai", "kan", "kang", "kao", "ke", "ken", "keng", "kong", "kou", "ku", "kua", "kuai",
    "kuan", "kuang", "kui", "kun", "kuo", "la", "lai", "lan", "lang", "lao", "le", "lei", "leng",
    "li", "lia", "lian", "liang", "liao", "lie", "lin", "ling", "liu", "lo", "long", "lou", "lu",
    "luan", "lun", "luo", "lv", "lve", "ma", "mai", "man", "mang", "mao", "me", "mei", "men",
    "meng", "mi", "mian", "miao", "mie", "min", "ming", "miu", "mo", "mou", "mu", "na", "nai",
    "nan", "nang", "nao", "ne", "nei", "nen", "neng", "ng", "ni", "nian", "niang", "niao", "nie",
    "nin", "ning", "niu", "nong", "nou", "nu", "nuan", "nuo", "nv", "nve", "o", "ou", "pa", "pai",
    "pan", "pang", "pao", "pei", "pen", "peng", "pi", "pian", "piao", "pie", "pin", "ping", "po",
    "pou", "pu", "qi", "qia", "qian", "qiang", "qiao", "qie", "qin", "qing", "qiong", "qiu", "qu",
    "quan", "que", "qun", "ran", "rang", "rao", "re", "ren", "reng", "ri", "rong", "rou", "ru",
    "ruan", "rui", "run", "ruo", "sa", "sai", "san", "sang", "sao", "se", "sen", "seng", "sha",
    "shai", "shan", "shang", "shao", "she", "shei", "shen", "sheng", "shi", "shou", "shu", "shua",
    "shuai", "shuan", "shuang", "shui", "shun", "shuo", "si", "song", "sou", "su", "suan", "sui",
    "sun", "suo", "ta", "tai", "tan", "tang", "tao", "te", "teng", "ti", "tian", "tiao", "tie",
    "ting", "tong", "tou", "tu", "tuan", "tui", "tun", "tuo", "wa", "wai", "wan", "wang", "wei",
    "wen", "weng", "wo", "wu", "xi", "xia", "xian", "xiang", "xiao", "xie", "xin", "xing", "xiong",
    "xiu", "xu", "xuan", "xue", "xun", "ya", "yan", "yang", "yao", "ye", "yi", "yin", "ying", "yo",
    "yong", "you", "yu", "yuan", "yue", "yun", "za", "zai", "zan", "zang", "zao", "ze", "zei",
    "zen", "zeng", "zha", "zhai", "zhan", "zhang", "zhao", "zhe", "zhen", "zheng", "zhi", "zhong",
    "zhou", "zhu", "zhua", "zhuai", "zhuan", "zhuang", "zhui", "zhun", "zhuo", "zi", "zong", "zou",
    "zu", "zuan", "zui", "zun", "zuo",
];

static STANDARD: Lazy<Arc<SyllableTable>> =
    Lazy::new(|| Arc::new(SyllableTable::new(PINYIN_SYLLABLES.iter().copied())));

/// Immutable set of valid syllables.
#[derive(Debug)]
pub struct SyllableTable {
    trie: TrieNode,
    len: usize,
}

impl SyllableTable {
    /// Build a table from lowercase syllables.
    pub fn new<I, S>(syllables: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let trie = TrieNode::from_words(syllables);
        let len = trie.word_count();
        Self { trie, len }
    }

    /// The process-wide standard table (built on first use).
    pub fn standard() -> Arc<SyllableTable> {
        Arc::clone(&STANDARD)
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn contains(&self, syllable: &str) -> bool {
        self.trie.contains_word(syllable)
    }

    /// Syllables that are prefixes of `text`, longest first.
    pub fn prefixes_of(&self, text: &str) -> Vec<String> {
        let chars: Vec<char> = text.chars().collect();
        let mut found: Vec<String> = self
            .trie
            .walk_prefixes(&chars, 0)
            .into_iter()
            .map(|(_, w)| w)
            .collect();
        found.reverse();
        found
    }

    /// Split `token` into at most `max_syllables` contiguous syllables.
    ///
    /// Partitions are explored longer prefixes first with backtracking; the
    /// first complete partition is returned.
    pub fn segment(&self, token: &str, max_syllables: usize) -> Option<Vec<String>> {
        let chars: Vec<char> = token.chars().collect();
        if chars.is_empty() {
            return None;
        }
        let mut parts = Vec::new();
        if self.segment_from(&chars, 0, max_syllables, &mut parts) {
            Some(parts)
        } else {
            None
        }
    }

    fn segment_from(
        &self,
        chars: &[char],
        start: usize,
        budget: usize,
        parts: &mut Vec<String>,
    ) -> bool {
        if start == chars.len() {
            return true;
        }
        if budget == 0 {
            return false;
        }
        for (end, word) in self.trie.walk_prefixes(chars, start).into_iter().rev() {
            parts.push(word);
            if self.segment_from(chars, end, budget - 1, parts) {
                return true;
            }
            parts.pop();
        }
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn standard_table_membership() {
        let table = SyllableTable::standard();
        assert_eq!(table.len(), PINYIN_SYLLABLES.len());
        assert!(table.contains("zhuang"));
        assert!(table.contains("a"));
        assert!(!table.contains("zh"));
        assert!(!table.contains("hello"));
    }

    #[test]
    fn prefixes_are_longest_first() {
        let table = SyllableTable::standard();
        assert_eq!(table.prefixes_of("xianzai"), vec!["xian", "xia", "xi"]);
        assert!(table.prefixes_of("vvv").is_empty());
    }

    #[test]
    fn segmentation_backtracks() {
        let table = SyllableTable::standard();
        // "fang" + "u" fails, so the split falls back to "fan" + "gu"
        assert_eq!(
            table.segment("fangu", 3),
            Some(vec!["fan".to_string(), "gu".to_string()])
        );
        assert_eq!(
            table.segment("xiane", 3),
            Some(vec!["xian".to_string(), "e".to_string()])
        );
        assert_eq!(
            table.segment("woaini", 3),
            Some(vec!["wo".to_string(), "ai".to_string(), "ni".to_string()])
        );
        assert_eq!(table.segment("woaini", 2), None);
        assert_eq!(table.segment("hello", 3), None);
        assert_eq!(table.segment("", 3), None);
    }

    #[test]
    fn custom_table() {
        let table = SyllableTable::new(["ni", "hao"]);
        assert_eq!(table.len(), 2);
        assert_eq!(
            table.segment("nihao", 2),
            Some(vec!["ni".to_string(), "hao".to_string()])
        );
    }
}
