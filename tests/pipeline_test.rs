//! 分類パイプラインの統合テスト
//!
//! 代表的なカタログで6区分と会社別集計を確認する

use sku_dedup_common::{
    classify, company_aggregates, group_by_connected_product, ClassificationTier, MatchConfig,
    ProductRecord,
};
use std::collections::HashSet;

fn rec(brand: &str, name: &str, sku: &str, sheet: &str) -> ProductRecord {
    ProductRecord::new(brand, name, sku, sheet)
}

#[test]
fn test_exact_match_across_sheets() {
    let records = vec![
        rec("ACME", "Aceite Oliva 1L", "100", "A"),
        rec("acme", "Aceite Oliva 1L", "100", "B"),
    ];
    let result = classify(&records, &MatchConfig::default()).unwrap();

    assert_eq!(result.exact_matches.len(), 1);
    assert_eq!(result.exact_matches[0].similarity, 100);
    assert!(result.partial_matches.is_empty());
    assert!(result.unmatched.is_empty());
}

#[test]
fn test_same_sku_near_duplicate_is_partial() {
    let records = vec![
        rec("ACME", "Aceite Oliva 1L", "100", "A"),
        rec("ACME", "Aceite Oliva 1 L", "100", "B"),
    ];
    let result = classify(&records, &MatchConfig::default()).unwrap();

    assert_eq!(result.partial_matches.len(), 1, "部分一致になっていない");
    let pair = &result.partial_matches[0];
    assert_eq!(pair.similarity, 90);
    assert_eq!(pair.numbers1.values(), &[1.0]);
    assert_eq!(pair.numbers2.values(), &[1.0]);
}

#[test]
fn test_litro_spelling_partial_with_lower_threshold() {
    let records = vec![
        rec("ACME", "Aceite Oliva 1L", "100", "A"),
        rec("ACME", "Aceite Oliva 1 Litro", "100", "B"),
    ];

    // 既定 88 では届かない（類似度 80）
    let result = classify(&records, &MatchConfig::default()).unwrap();
    assert!(result.partial_matches.is_empty());
    assert_eq!(result.unmatched.len(), 2);

    let config = MatchConfig {
        same_sku_threshold: 80,
        ..Default::default()
    };
    let result = classify(&records, &config).unwrap();
    assert_eq!(result.partial_matches.len(), 1);
    assert!(result.unmatched.is_empty());
}

#[test]
fn test_different_volume_never_paired() {
    let records = vec![
        rec("ACME", "Aceite Oliva 500ML", "200", "A"),
        rec("ACME", "Aceite Oliva 1L", "300", "B"),
    ];
    let config = MatchConfig {
        low_confidence_threshold: 50,
        ..Default::default()
    };
    let result = classify(&records, &config).unwrap();

    assert_eq!(result.matched_pair_count(), 0);
    assert_eq!(result.unmatched.len(), 2);
}

#[test]
fn test_same_sheet_duplicate_is_internal() {
    let records = vec![
        rec("ACME", "Sal Fina", "5", "A"),
        rec("ACME", "Sal Fina", "5", "A"),
    ];
    let result = classify(&records, &MatchConfig::default()).unwrap();

    assert_eq!(result.internal_duplicates.len(), 2);
    assert_eq!(result.matched_pair_count(), 0);
    // 重複除去後の1件は単独商品として残る
    assert_eq!(result.unmatched.len(), 1);
}

#[test]
fn test_flavor_variants_not_matched() {
    let records = vec![
        rec("ACME", "Jugo Naranja 1L", "10", "A"),
        rec("ACME", "Jugo Mango 1L", "20", "B"),
    ];
    let config = MatchConfig {
        low_confidence_threshold: 60,
        confidence_threshold: 60,
        ..Default::default()
    };
    let result = classify(&records, &config).unwrap();
    assert!(result.confident.is_empty());
    assert!(result.needs_review.is_empty());
}

#[test]
fn test_inconsistent_config_rejected_before_matching() {
    let records = vec![rec("ACME", "Sal", "1", "A")];
    let config = MatchConfig {
        low_confidence_threshold: 95,
        confidence_threshold: 90,
        ..Default::default()
    };
    assert!(matches!(
        classify(&records, &config),
        Err(sku_dedup_common::Error::InvalidConfig(_))
    ));
}

fn mixed_catalog() -> Vec<ProductRecord> {
    vec![
        rec("ACME", "Aceite Oliva 1L", "100", "A"),
        rec("ACME", "Aceite Oliva 1L", "100", "B"),
        rec("ACME", "Aceite Oliva 1 L", "100", "C"),
        rec("ACME", "Galletas Avena Miel 200g", "500", "A"),
        rec("ACME", "Galletas Avena y Miel 200g", "900", "B"),
        rec("ACME", "Aceite Oliva 500ML", "200", "C"),
        rec("BETA", "Sal Fina", "5", "A"),
        rec("BETA", "Sal Fina", "5", "A"),
        rec("BETA", "Miel Pura 250g", "7", "C"),
    ]
}

#[test]
fn test_unmatched_disjoint_from_matched_tiers() {
    let result = classify(&mixed_catalog(), &MatchConfig::default()).unwrap();

    let mut matched: HashSet<(String, String, String)> = HashSet::new();
    for tier in [
        ClassificationTier::ExactMatch,
        ClassificationTier::PartialMatch,
        ClassificationTier::ConfidentDifferentSku,
        ClassificationTier::NeedsReviewDifferentSku,
    ] {
        for pair in result.pairs(tier) {
            for record in [&pair.record1, &pair.record2] {
                matched.insert((pair.brand.clone(), record.name.clone(), record.sku.clone()));
            }
        }
    }

    for record in &result.unmatched {
        let key = (
            record.normalized_brand.clone(),
            record.name.clone(),
            record.sku.clone(),
        );
        assert!(!matched.contains(&key), "単独商品が照合済みにも含まれる: {:?}", key);
    }

    let unmatched_names: Vec<&str> = result.unmatched.iter().map(|r| r.name.as_str()).collect();
    assert_eq!(unmatched_names, vec!["Aceite Oliva 500ML", "Sal Fina", "Miel Pura 250g"]);
}

#[test]
fn test_mixed_catalog_tiers_and_aggregates() {
    let result = classify(&mixed_catalog(), &MatchConfig::default()).unwrap();

    assert_eq!(result.exact_matches.len(), 1);
    assert_eq!(result.partial_matches.len(), 2);
    assert_eq!(result.confident.len(), 1);
    assert_eq!(result.confident[0].similarity, 96);
    assert!(result.needs_review.is_empty());
    assert_eq!(result.internal_duplicates.len(), 2);

    let aggregates = company_aggregates(&result);
    let companies: Vec<&str> = aggregates.iter().map(|a| a.company.as_str()).collect();
    assert_eq!(companies, vec!["A", "B", "C"]);

    let a = &aggregates[0];
    assert_eq!(a.count(ClassificationTier::ExactMatch), 1);
    assert_eq!(a.count(ClassificationTier::PartialMatch), 1);
    assert_eq!(a.different_sku, 1);
    assert_eq!(a.count(ClassificationTier::InternalDuplicate), 2);
    assert_eq!(a.count(ClassificationTier::Unmatched), 1);
    assert_eq!(a.total, 6);

    // 同一SKUの Aceite は3社にまたがる
    let all_same_sku: Vec<_> = result
        .exact_matches
        .iter()
        .chain(result.partial_matches.iter())
        .cloned()
        .collect();
    let spread = group_by_connected_product(&all_same_sku);
    assert!(spread.values().all(|&s| s == 3));
}

#[test]
fn test_different_sku_counted_once_across_confident_and_review() {
    let records = vec![
        rec("ACME", "Galletas Avena Miel 200g", "500", "A"),
        rec("ACME", "Galletas Avena Miel 200g", "900", "B"),
        rec("ACME", "Galletas Avena y Miel 200g", "700", "C"),
    ];
    let config = MatchConfig {
        confidence_threshold: 100,
        ..Default::default()
    };
    let result = classify(&records, &config).unwrap();
    assert_eq!(result.confident.len(), 1);
    assert_eq!(result.needs_review.len(), 2);

    let aggregates = company_aggregates(&result);
    let a = &aggregates[0];
    assert_eq!(a.company, "A");
    assert_eq!(a.count(ClassificationTier::ConfidentDifferentSku), 1);
    assert_eq!(a.count(ClassificationTier::NeedsReviewDifferentSku), 1);
    assert_eq!(a.different_sku, 1, "確度高と要確認の両方に出る商品を二重に数えている");
    assert_eq!(a.total, 1);
    assert!(aggregates.iter().all(|agg| agg.different_sku == 1 && agg.total == 1));
}

#[test]
fn test_classification_is_deterministic() {
    let first = classify(&mixed_catalog(), &MatchConfig::default()).unwrap();
    let second = classify(&mixed_catalog(), &MatchConfig::default()).unwrap();
    assert_eq!(first, second);
}
