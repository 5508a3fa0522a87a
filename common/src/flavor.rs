//! 味違い（フレーバー違い）判定
//!
//! "Jugo Naranja 1L" と "Jugo Mango 1L" のように、共通語が多く類似度は高いが
//! 味を表す1語だけが異なる商品を別商品として扱うためのフィルタ。

use crate::similarity::ratio;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

lazy_static::lazy_static! {
    static ref TOKEN_RE: Regex = Regex::new(r"\b[\wÀ-ÿ]+\b").unwrap();
}

/// 短くても味を表す語
pub const FLAVOR_EXCEPTIONS: [&str; 6] = ["ajo", "té", "sal", "pic", "lim", "ají"];

/// 元データで文字の代わりに使われている記号
const SYMBOL_REPLACEMENTS: [(char, &str); 3] = [
    ('¥', "n"), // piña が pi¥a と入力されている
    ('$', "s"),
    ('€', "e"),
];

/// 味違い判定のパラメータ
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FlavorOptions {
    /// この長さ以上の語を「長い語」とする
    pub min_token_length: usize,
    /// 残った語どうしの類似度がこれ未満なら味違い
    pub max_similarity: f64,
}

impl Default for FlavorOptions {
    fn default() -> Self {
        Self {
            min_token_length: 4,
            max_similarity: 0.6,
        }
    }
}

fn is_exception(token: &str) -> bool {
    FLAVOR_EXCEPTIONS.contains(&token)
}

/// (長い語, 短い語) に分割
fn clean_and_split(text: &str, min_len: usize) -> (BTreeSet<String>, BTreeSet<String>) {
    let mut replaced = text.to_string();
    for (symbol, replacement) in SYMBOL_REPLACEMENTS {
        replaced = replaced.replace(symbol, replacement);
    }
    let lowered = replaced.to_lowercase();

    let mut long_words = BTreeSet::new();
    let mut short_words = BTreeSet::new();
    for m in TOKEN_RE.find_iter(&lowered) {
        let word = m.as_str();
        if word.chars().all(char::is_numeric) {
            continue;
        }
        if word.chars().count() >= min_len {
            long_words.insert(word.to_string());
        } else {
            short_words.insert(word.to_string());
        }
    }
    (long_words, short_words)
}

/// `a` のうち `b` に近い語（編集距離 1、7文字以上は 2 まで）が無いもの
fn fuzzy_set_difference<'a>(a: &'a BTreeSet<String>, b: &BTreeSet<String>) -> Vec<&'a str> {
    a.iter()
        .filter(|w1| {
            let max_edits = if w1.chars().count() <= 6 { 1 } else { 2 };
            !b.iter()
                .any(|w2| strsim::levenshtein(w1.as_str(), w2.as_str()) <= max_edits)
        })
        .map(String::as_str)
        .collect()
}

/// 既定パラメータで味違いか判定する
pub fn is_different_flavor(name1: &str, name2: &str) -> bool {
    is_different_flavor_with(name1, name2, &FlavorOptions::default())
}

/// 2つの商品名が同じ商品ラインの別フレーバーか判定する
///
/// 互いに近い語を除いた残りが各1語ずつで、その2語の類似度が
/// `max_similarity` 未満のときだけ true。
pub fn is_different_flavor_with(name1: &str, name2: &str, options: &FlavorOptions) -> bool {
    let (mut tokens1, short1) = clean_and_split(name1, options.min_token_length);
    let (mut tokens2, short2) = clean_and_split(name2, options.min_token_length);

    tokens1.extend(short1.iter().filter(|w| is_exception(w.as_str())).cloned());
    tokens2.extend(short2.iter().filter(|w| is_exception(w.as_str())).cloned());

    // 短い一般語（例外語以外）は比較対象に入らない
    let unique1 = fuzzy_set_difference(&tokens1, &tokens2);
    let unique2 = fuzzy_set_difference(&tokens2, &tokens1);

    match (unique1.as_slice(), unique2.as_slice()) {
        ([tok1], [tok2]) => ratio(*tok1, *tok2) < options.max_similarity,
        _ => false,
    }
}
