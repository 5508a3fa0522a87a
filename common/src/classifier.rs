//! 段階的分類パイプライン
//!
//! ## 処理フロー
//! 1. 設定の検証
//! 2. シート内重複の抽出
//! 3. 同一SKUペア → 完全一致 / 部分一致
//! 4. 異SKUペア → 確度高 / 要確認（味違い・連番SKUを除外）
//! 5. 全レコードから照合済みを差し引いた残りを単独商品とする

use crate::config::MatchConfig;
use crate::error::Result;
use crate::flavor::{is_different_flavor_with, FlavorOptions};
use crate::matcher::find_similar_products;
use crate::types::{CandidatePair, ClassificationTier, ProductRecord, SkuMode};
use log::{debug, info};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

/// 分類結果（6区分）
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Classification {
    /// 同一SKU・同一名
    pub exact_matches: Vec<CandidatePair>,
    /// 同一SKU・類似名
    pub partial_matches: Vec<CandidatePair>,
    /// 異SKU・確度高
    pub confident: Vec<CandidatePair>,
    /// 異SKU・要確認
    pub needs_review: Vec<CandidatePair>,
    /// シート内重複
    pub internal_duplicates: Vec<ProductRecord>,
    /// どこにも一致しなかった商品
    pub unmatched: Vec<ProductRecord>,
}

impl Classification {
    pub fn pairs(&self, tier: ClassificationTier) -> &[CandidatePair] {
        match tier {
            ClassificationTier::ExactMatch => &self.exact_matches,
            ClassificationTier::PartialMatch => &self.partial_matches,
            ClassificationTier::ConfidentDifferentSku => &self.confident,
            ClassificationTier::NeedsReviewDifferentSku => &self.needs_review,
            ClassificationTier::InternalDuplicate | ClassificationTier::Unmatched => &[],
        }
    }

    pub fn records(&self, tier: ClassificationTier) -> &[ProductRecord] {
        match tier {
            ClassificationTier::InternalDuplicate => &self.internal_duplicates,
            ClassificationTier::Unmatched => &self.unmatched,
            _ => &[],
        }
    }

    pub fn matched_pair_count(&self) -> usize {
        self.exact_matches.len()
            + self.partial_matches.len()
            + self.confident.len()
            + self.needs_review.len()
    }
}

/// 味違いと判定されたペアを除外
pub fn remove_flavor_variants(
    pairs: Vec<CandidatePair>,
    options: &FlavorOptions,
) -> Vec<CandidatePair> {
    let before = pairs.len();
    let kept: Vec<CandidatePair> = pairs
        .into_iter()
        .filter(|p| !is_different_flavor_with(&p.record1.name, &p.record2.name, options))
        .collect();
    debug!("味違い除外: {} → {}", before, kept.len());
    kept
}

/// 両方のSKUが整数で、差が `closeness` 以下なら true
///
/// 整数として読めないSKUが片方でもあれば判定不能として false。
pub fn sku_too_close(sku1: &str, sku2: &str, closeness: u64) -> bool {
    match (sku1.trim().parse::<i64>(), sku2.trim().parse::<i64>()) {
        (Ok(a), Ok(b)) => a.abs_diff(b) <= closeness,
        _ => false,
    }
}

/// 同じシート内で (SKU, 商品名) が重複しているレコード
///
/// (シート, SKU) 順に並べ、同じシート・SKU内は元の順序を保つ。
pub fn find_internal_duplicates(records: &[ProductRecord]) -> Vec<ProductRecord> {
    let mut counts: HashMap<(&str, &str, &str), usize> = HashMap::new();
    for record in records {
        *counts.entry(record.identity_key()).or_insert(0) += 1;
    }

    let mut duplicates: Vec<ProductRecord> = records
        .iter()
        .filter(|r| counts.get(&r.identity_key()).copied().unwrap_or(0) > 1)
        .cloned()
        .collect();
    duplicates.sort_by(|a, b| {
        (a.source_sheet.as_str(), a.sku.as_str()).cmp(&(b.source_sheet.as_str(), b.sku.as_str()))
    });
    duplicates
}

/// (シート, ブランド, 商品名, SKU) で重複を除く（最初の出現を残す）
pub fn dedup_catalog(records: &[ProductRecord]) -> Vec<ProductRecord> {
    let mut seen = HashSet::new();
    records
        .iter()
        .filter(|r| {
            seen.insert((
                r.source_sheet.as_str(),
                r.normalized_brand.as_str(),
                r.name.as_str(),
                r.sku.as_str(),
            ))
        })
        .cloned()
        .collect()
}

/// ペアのどちらかに現れる (ブランド, 商品名, SKU) を除いたレコード
pub fn subtract_pairs(records: Vec<ProductRecord>, pairs: &[CandidatePair]) -> Vec<ProductRecord> {
    let matched: HashSet<(&str, &str, &str)> = pairs
        .iter()
        .flat_map(|p| {
            [
                (p.brand.as_str(), p.record1.name.as_str(), p.record1.sku.as_str()),
                (p.brand.as_str(), p.record2.name.as_str(), p.record2.sku.as_str()),
            ]
        })
        .collect();

    records
        .into_iter()
        .filter(|r| !matched.contains(&r.catalog_key()))
        .collect()
}

/// 同一SKUペアを完全一致・部分一致に分ける
pub fn split_same_sku(
    records: &[ProductRecord],
    config: &MatchConfig,
) -> (Vec<CandidatePair>, Vec<CandidatePair>) {
    let pairs = find_similar_products(records, config.same_sku_threshold, SkuMode::SameSku);
    if pairs.is_empty() {
        return (Vec::new(), Vec::new());
    }
    let pairs = remove_flavor_variants(pairs, &config.flavor);
    pairs.into_iter().partition(|p| p.similarity == 100)
}

/// 異SKUペアを確度高・要確認に分ける
pub fn split_different_sku(
    records: &[ProductRecord],
    config: &MatchConfig,
) -> (Vec<CandidatePair>, Vec<CandidatePair>) {
    let pairs = find_similar_products(
        records,
        config.low_confidence_threshold,
        SkuMode::DifferentSku,
    );
    if pairs.is_empty() {
        return (Vec::new(), Vec::new());
    }
    let pairs = remove_flavor_variants(pairs, &config.flavor);

    // 連番SKUは偶然の一致として扱う
    let pairs: Vec<CandidatePair> = pairs
        .into_iter()
        .filter(|p| !sku_too_close(&p.record1.sku, &p.record2.sku, config.sku_closeness))
        .collect();

    pairs
        .into_iter()
        .partition(|p| p.similarity >= config.confidence_threshold)
}

/// 全レコードを6区分に分類する
///
/// # Arguments
/// * `records` - 全シートの商品レコード
/// * `config` - しきい値（照合前に検証する）
pub fn classify(records: &[ProductRecord], config: &MatchConfig) -> Result<Classification> {
    config.validate()?;

    let internal_duplicates = find_internal_duplicates(records);
    let catalog = dedup_catalog(records);
    info!(
        "分類開始: {}件（重複除去後 {}件、シート内重複 {}件）",
        records.len(),
        catalog.len(),
        internal_duplicates.len()
    );

    let (exact_matches, partial_matches) = split_same_sku(&catalog, config);
    let (confident, needs_review) = split_different_sku(&catalog, config);

    let mut unmatched = catalog;
    for pairs in [&confident, &needs_review, &exact_matches, &partial_matches] {
        unmatched = subtract_pairs(unmatched, pairs);
    }

    info!(
        "分類完了: 完全一致 {} / 部分一致 {} / 確度高 {} / 要確認 {} / 単独 {}",
        exact_matches.len(),
        partial_matches.len(),
        confident.len(),
        needs_review.len(),
        unmatched.len()
    );

    Ok(Classification {
        exact_matches,
        partial_matches,
        confident,
        needs_review,
        internal_duplicates,
        unmatched,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;

    fn rec(brand: &str, name: &str, sku: &str, sheet: &str) -> ProductRecord {
        ProductRecord::new(brand, name, sku, sheet)
    }

    #[test]
    fn test_sku_too_close() {
        assert!(sku_too_close("100", "103", 3));
        assert!(sku_too_close("103", "100", 3));
        assert!(sku_too_close(" 100", "100 ", 3));
        assert!(!sku_too_close("100", "104", 3));
        assert!(!sku_too_close("A100", "101", 3));
        assert!(!sku_too_close("", "1", 3));
    }

    #[test]
    fn test_find_internal_duplicates() {
        let records = vec![
            rec("ACME", "Jugo", "2", "B"),
            rec("ACME", "Aceite", "1", "A"),
            rec("ACME", "Jugo", "2", "B"),
            rec("ACME", "Aceite", "1", "C"),
            rec("ACME", "Aceite", "1", "A"),
        ];
        let dups = find_internal_duplicates(&records);
        assert_eq!(dups.len(), 4);
        assert_eq!(dups[0].source_sheet, "A");
        assert_eq!(dups[3].source_sheet, "B");
    }

    #[test]
    fn test_dedup_catalog_keeps_first() {
        let records = vec![
            rec("acme", "Jugo", "2", "B"),
            rec("ACME", "Jugo", "2", "B"),
            rec("ACME", "Jugo", "2", "C"),
        ];
        let catalog = dedup_catalog(&records);
        assert_eq!(catalog.len(), 2);
        assert_eq!(catalog[0].brand, "acme");
    }

    #[test]
    fn test_subtract_pairs_ignores_sheet() {
        let a = rec("ACME", "Jugo", "2", "A");
        let b = rec("ACME", "Jugo", "2", "B");
        let c = rec("ACME", "Jugo", "2", "C");
        let other = rec("ACME", "Aceite", "9", "C");
        let pair = CandidatePair {
            brand: "ACME".to_string(),
            record1: a.clone(),
            record2: b.clone(),
            similarity: 100,
            numbers1: Default::default(),
            numbers2: Default::default(),
        };
        let rest = subtract_pairs(vec![a, b, c, other.clone()], &[pair]);
        assert_eq!(rest, vec![other]);
    }

    #[test]
    fn test_classify_rejects_bad_config() {
        let config = MatchConfig {
            low_confidence_threshold: 95,
            confidence_threshold: 90,
            ..Default::default()
        };
        let result = classify(&[rec("ACME", "Jugo", "1", "A")], &config);
        assert!(matches!(result, Err(Error::InvalidConfig(_))));
    }

    #[test]
    fn test_classify_empty_catalog() {
        let result = classify(&[], &MatchConfig::default()).unwrap();
        assert_eq!(result, Classification::default());
    }

    #[test]
    fn test_classify_no_candidates_all_unmatched() {
        let records = vec![
            rec("ACME", "Aceite Oliva 1L", "1", "A"),
            rec("BETA", "Galletas Chocolate", "2", "B"),
        ];
        let result = classify(&records, &MatchConfig::default()).unwrap();
        assert_eq!(result.matched_pair_count(), 0);
        assert_eq!(result.unmatched.len(), 2);
    }

    #[test]
    fn test_classify_exact_and_partial() {
        let records = vec![
            rec("ACME", "Aceite Oliva 1L", "100", "A"),
            rec("ACME", "Aceite Oliva 1L", "100", "B"),
            rec("ACME", "Aceite Oliva 1 L", "100", "C"),
        ];
        let result = classify(&records, &MatchConfig::default()).unwrap();
        assert_eq!(result.exact_matches.len(), 1);
        assert_eq!(result.partial_matches.len(), 2);
        assert!(result.partial_matches.iter().all(|p| p.similarity == 90));
        assert!(result.unmatched.is_empty());
    }

    #[test]
    fn test_classify_flavor_variants_removed() {
        let records = vec![
            rec("ACME", "Jugo Naranja 1L", "100", "A"),
            rec("ACME", "Jugo Mango 1L", "100", "B"),
        ];
        let config = MatchConfig {
            same_sku_threshold: 60,
            ..Default::default()
        };
        let result = classify(&records, &config).unwrap();
        assert!(result.partial_matches.is_empty());
        assert_eq!(result.unmatched.len(), 2);
    }

    #[test]
    fn test_classify_confident_vs_review() {
        let records = vec![
            rec("ACME", "Galletas Avena Miel 200g", "500", "A"),
            rec("ACME", "Galletas Avena Miel 200g", "900", "B"),
            rec("ACME", "Galletas Avena y Miel 200g", "700", "C"),
        ];
        let result = classify(&records, &MatchConfig::default()).unwrap();
        assert_eq!(result.confident.len(), 3);
        assert!(result.needs_review.is_empty());

        let strict = MatchConfig {
            confidence_threshold: 100,
            ..Default::default()
        };
        let result = classify(&records, &strict).unwrap();
        assert_eq!(result.confident.len(), 1);
        assert_eq!(result.needs_review.len(), 2);
    }

    #[test]
    fn test_classify_close_skus_vetoed() {
        let records = vec![
            rec("ACME", "Galletas Avena Miel 200g", "500", "A"),
            rec("ACME", "Galletas Avena Miel 200g", "502", "B"),
        ];
        let result = classify(&records, &MatchConfig::default()).unwrap();
        assert!(result.confident.is_empty());
        assert_eq!(result.unmatched.len(), 2);
    }
}
