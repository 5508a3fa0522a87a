//! ブランド単位の総当たり照合
//!
//! 同じブランド内で、異なるシート（会社）のレコードどうしを全組み合わせで比較し、
//! 類似度・SKU条件・数値条件を満たすペアを候補として返す。
//!
//! ブランドグループ間に依存はないので rayon で並列に処理し、
//! 結果はグループの出現順に連結してから類似度で安定ソートする。

use crate::numbers::extract_numbers;
use crate::similarity::token_sort_ratio;
use crate::types::{CandidatePair, ProductRecord, SkuMode};
use log::debug;
use rayon::prelude::*;
use std::collections::HashMap;

/// 正規化ブランドでグループ化（最初に出現した順）
pub fn group_by_brand(records: &[ProductRecord]) -> Vec<(&str, Vec<&ProductRecord>)> {
    let mut index: HashMap<&str, usize> = HashMap::new();
    let mut groups: Vec<(&str, Vec<&ProductRecord>)> = Vec::new();

    for record in records {
        let brand = record.normalized_brand.as_str();
        match index.get(brand) {
            Some(&i) => groups[i].1.push(record),
            None => {
                index.insert(brand, groups.len());
                groups.push((brand, vec![record]));
            }
        }
    }

    groups
}

/// 2レコードを比較し、条件を満たせば候補ペアを返す
pub fn compare_records(
    brand: &str,
    record1: &ProductRecord,
    record2: &ProductRecord,
    threshold: u8,
    sku_mode: SkuMode,
) -> Option<CandidatePair> {
    if record1.source_sheet == record2.source_sheet {
        return None;
    }

    let similarity = token_sort_ratio(&record1.normalized_name, &record2.normalized_name);
    if similarity < threshold || !sku_mode.accepts(&record1.sku, &record2.sku) {
        return None;
    }

    // 容量・サイズが違うものは除外
    let numbers1 = extract_numbers(&record1.name);
    let numbers2 = extract_numbers(&record2.name);
    if numbers1.vetoes(&numbers2) {
        return None;
    }

    Some(CandidatePair {
        brand: brand.to_string(),
        record1: record1.clone(),
        record2: record2.clone(),
        similarity,
        numbers1,
        numbers2,
    })
}

fn match_group(
    brand: &str,
    members: &[&ProductRecord],
    threshold: u8,
    sku_mode: SkuMode,
) -> Vec<CandidatePair> {
    let mut pairs = Vec::new();
    for (i, record1) in members.iter().enumerate() {
        for record2 in &members[i + 1..] {
            if let Some(pair) = compare_records(brand, record1, record2, threshold, sku_mode) {
                pairs.push(pair);
            }
        }
    }
    pairs
}

/// 類似商品ペアを探す
///
/// # Arguments
/// * `records` - 全シートのレコード
/// * `threshold` - 類似度しきい値 (0-100)
/// * `sku_mode` - SKUが同じペアを探すか、異なるペアを探すか
///
/// # Returns
/// 類似度の降順に並んだ候補ペア（同点は生成順）
pub fn find_similar_products(
    records: &[ProductRecord],
    threshold: u8,
    sku_mode: SkuMode,
) -> Vec<CandidatePair> {
    let groups = group_by_brand(records);

    let per_group: Vec<Vec<CandidatePair>> = groups
        .par_iter()
        .map(|(brand, members)| match_group(brand, members, threshold, sku_mode))
        .collect();

    let mut pairs: Vec<CandidatePair> = per_group.into_iter().flatten().collect();
    pairs.sort_by(|a, b| b.similarity.cmp(&a.similarity));

    debug!(
        "{:?}: {}ブランド / {}件 → 候補 {}件 (しきい値 {})",
        sku_mode,
        groups.len(),
        records.len(),
        pairs.len(),
        threshold
    );

    pairs
}
