//! 商品名・ブランドの正規化

use regex::Regex;

lazy_static::lazy_static! {
    static ref NON_WORD_RE: Regex = Regex::new(r"[^\w\s]").unwrap();
    static ref SPACE_RE: Regex = Regex::new(r"\s+").unwrap();
}

/// 商品名を正規化する
///
/// 小文字化 → 記号除去 → 連続空白を1つに → 前後の空白除去
pub fn normalize_name(name: &str) -> String {
    let lowered = name.to_lowercase();
    let stripped = NON_WORD_RE.replace_all(&lowered, "");
    SPACE_RE.replace_all(&stripped, " ").trim().to_string()
}

/// ブランドを照合キーに揃える（trim + 大文字）
pub fn canonicalize_brand(brand: &str) -> String {
    brand.trim().to_uppercase()
}
