//! 商品名からの数値抽出
//!
//! 容量・サイズの数値を取り出し、名前が似ていても容量が違う商品
//! （例: 250ML と 500ML）を同一視しないための拒否条件に使う。
//!
//! ## 抽出順序
//! 1. 括弧内を除去
//! 2. 分数 (1/2)
//! 3. 小数 (3.5)
//! 4. 文字に続く数字 (180ML)、文字の後の数字 (X2)、単独の数字
//!
//! 各段階でマッチした部分はテキストから取り除き、後段で再マッチしない。

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

lazy_static::lazy_static! {
    static ref PAREN_RE: Regex = Regex::new(r"\([^)]*\)").unwrap();
    static ref FRACTION_RE: Regex = Regex::new(r"\b(\d+)\s*/\s*(\d+)\b").unwrap();
    static ref DECIMAL_RE: Regex = Regex::new(r"\d+\.\d+").unwrap();
    // 数字の直後の英字（180ML の 180）
    static ref EMBEDDED_RE: Regex = Regex::new(r"(\d+)[a-zA-Z]").unwrap();
    // 英字の直後の数字（X2 の 2）
    static ref AFTER_LETTER_RE: Regex = Regex::new(r"[a-zA-Z](\d+)").unwrap();
    static ref STANDALONE_RE: Regex = Regex::new(r"\b\d+\b").unwrap();
}

/// 商品名から抽出した数値の多重集合
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NumericSignature(Vec<f64>);

impl NumericSignature {
    pub fn new(values: Vec<f64>) -> Self {
        Self(values)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// 抽出順の値
    pub fn values(&self) -> &[f64] {
        &self.0
    }

    fn sorted(&self) -> Vec<f64> {
        let mut values = self.0.clone();
        values.sort_by(|a, b| a.total_cmp(b));
        values
    }

    /// 順序を無視した多重集合としての一致
    pub fn same_multiset(&self, other: &NumericSignature) -> bool {
        if self.0.len() != other.0.len() {
            return false;
        }
        self.sorted()
            .iter()
            .zip(other.sorted().iter())
            .all(|(a, b)| a.total_cmp(b) == Ordering::Equal)
    }

    /// 両方が空でなく、かつ一致しない場合のみ照合を拒否する
    pub fn vetoes(&self, other: &NumericSignature) -> bool {
        !self.is_empty() && !other.is_empty() && !self.same_multiset(other)
    }
}

impl std::fmt::Display for NumericSignature {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let parts: Vec<String> = self.0.iter().map(|v| v.to_string()).collect();
        write!(f, "[{}]", parts.join(", "))
    }
}

/// 商品名から数値を抽出する
pub fn extract_numbers(name: &str) -> NumericSignature {
    let text = PAREN_RE.replace_all(name, "").into_owned();

    // 分数（分母0は値を捨てるが、テキストからは除去する）
    let fractions: Vec<f64> = FRACTION_RE
        .captures_iter(&text)
        .filter_map(|cap| {
            let numerator = cap[1].parse::<f64>().ok()?;
            let denominator = cap[2].parse::<f64>().ok()?;
            if denominator == 0.0 {
                None
            } else {
                Some(numerator / denominator)
            }
        })
        .collect();
    let text = FRACTION_RE.replace_all(&text, "").into_owned();

    let decimals: Vec<f64> = DECIMAL_RE
        .find_iter(&text)
        .filter_map(|m| m.as_str().parse::<f64>().ok())
        .collect();
    let text = DECIMAL_RE.replace_all(&text, "").into_owned();

    let standalone = STANDALONE_RE
        .find_iter(&text)
        .filter_map(|m| m.as_str().parse::<f64>().ok());
    let after_letter = AFTER_LETTER_RE
        .captures_iter(&text)
        .filter_map(|cap| cap[1].parse::<f64>().ok());
    let embedded = EMBEDDED_RE
        .captures_iter(&text)
        .filter_map(|cap| cap[1].parse::<f64>().ok());

    let mut values: Vec<f64> = standalone.chain(after_letter).chain(embedded).collect();
    values.extend(fractions);
    values.extend(decimals);

    NumericSignature(values)
}
