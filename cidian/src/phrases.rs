// cidian/src/phrases.rs
//
// Static heuristic tables used by classification and variant generation.

use phf::{phf_map, phf_set};

/// Common phrases typed as one run of letters, mapped to their spaced,
/// fully toned pinyin.
pub static PHRASE_EXPANSIONS: phf::Map<&'static str, &'static str> = phf_map! {
    "nihao" => "ni3 hao3",
    "zaoan" => "zao3 an1",
    "xiexie" => "xie4 xie5",
    "duoshao" => "duo1 shao3",
    "bukeqi" => "bu4 ke4 qi5",
    "meiguanxi" => "mei2 guan1 xi5",
    "zaijian" => "zai4 jian4",
    "mingbai" => "ming2 bai5",
    "zhidao" => "zhi1 dao5",
    "xiangxin" => "xiang1 xin4",
    "ninhao" => "nin2 hao3",
    "woheni" => "wo3 he2 ni3",
    "jintian" => "jin1 tian1",
    "mingtian" => "ming2 tian1",
    "zuotian" => "zuo2 tian1",
    "xianzai" => "xian4 zai4",
    "dianhua" => "dian4 hua4",
    "gongzuo" => "gong1 zuo4",
    "xuexiao" => "xue2 xiao4",
    "pengyou" => "peng2 you5",
    "nihaoma" => "ni3 hao3 ma5",
    "nishishui" => "ni3 shi4 shui2",
    "nihenshou" => "ni3 hen3 shou4",
    "niqunar" => "ni3 qu4 na3 er5",
    "nishina" => "ni3 shi4 na3",
    "zenmele" => "zen3 me5 le5",
    "weishenme" => "wei4 shen2 me5",
    "wozhidao" => "wo3 zhi1 dao4",
    "wotingdong" => "wo3 ting1 dong3",
    "wobuzhidao" => "wo3 bu4 zhi1 dao4",
    "wobuhui" => "wo3 bu4 hui4",
    "woxiang" => "wo3 xiang3",
    "meiwenti" => "mei2 wen4 ti2",
    "duibuqi" => "dui4 bu5 qi3",
    "yierbaosi" => "yi1 er4 ba1 si4",
    "shijian" => "shi2 jian1",
    "shangjige" => "shang4 ji3 ge5",
    "xiajiwei" => "xia4 ji3 wei4",
    "chifan" => "chi1 fan4",
    "shuijiao" => "shui4 jiao4",
    "kafei" => "ka1 fei1",
    "pijiu" => "pi2 jiu3",
    "reshui" => "re4 shui3",
    "lengshuang" => "leng3 shuang1",
    "woaini" => "wo3 ai4 ni3",
    "henhaochi" => "hen3 hao3 chi1",
    "xiexieni" => "xie4 xie5 ni3",
    "henhaoting" => "hen3 hao3 ting1",
    "tingbuhao" => "ting1 bu5 hao3",
};

/// Short words that are valid syllables but should be read as English.
pub static ENGLISH_OVERRIDES: phf::Set<&'static str> = phf_set! {
    "can",
    "fan",
    "man",
    "pen",
};

/// Expansion for a lowercased phrase key.
pub fn expand_phrase(key: &str) -> Option<&'static str> {
    PHRASE_EXPANSIONS.get(key).copied()
}

pub fn is_english_override(lowered: &str) -> bool {
    ENGLISH_OVERRIDES.contains(lowered)
}
