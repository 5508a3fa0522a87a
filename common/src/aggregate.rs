//! 集計・グルーピング
//!
//! - 連結成分による商品グループと、そのグループが何社にまたがるか
//! - 会社（シート）ごとの区分別件数

use crate::classifier::Classification;
use crate::types::{CandidatePair, ClassificationTier, ProductKey, ProductRecord};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};

/// Union-Find（経路圧縮 + サイズ併合）
struct UnionFind {
    parent: Vec<usize>,
    size: Vec<usize>,
}

impl UnionFind {
    fn new() -> Self {
        Self {
            parent: Vec::new(),
            size: Vec::new(),
        }
    }

    fn push(&mut self) -> usize {
        let id = self.parent.len();
        self.parent.push(id);
        self.size.push(1);
        id
    }

    fn find(&mut self, x: usize) -> usize {
        let mut root = x;
        while self.parent[root] != root {
            root = self.parent[root];
        }
        let mut node = x;
        while self.parent[node] != root {
            let next = self.parent[node];
            self.parent[node] = root;
            node = next;
        }
        root
    }

    fn union(&mut self, a: usize, b: usize) {
        let (ra, rb) = (self.find(a), self.find(b));
        if ra == rb {
            return;
        }
        let (big, small) = if self.size[ra] >= self.size[rb] { (ra, rb) } else { (rb, ra) };
        self.parent[small] = big;
        self.size[big] += self.size[small];
    }
}

/// 1つの連結成分
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductGroup {
    pub products: Vec<ProductKey>,
    /// グループ内レコードが属するシート
    pub sheets: BTreeSet<String>,
}

impl ProductGroup {
    pub fn spread(&self) -> usize {
        self.sheets.len()
    }
}

/// ペアを辺とするグラフの連結成分を求める
///
/// ノードは (商品名, SKU)。成分は最初に現れたノードの順で返す。
pub fn connected_groups(pairs: &[CandidatePair]) -> Vec<ProductGroup> {
    let mut uf = UnionFind::new();
    let mut index: HashMap<ProductKey, usize> = HashMap::new();
    let mut keys: Vec<ProductKey> = Vec::new();
    let mut sheets: Vec<BTreeSet<String>> = Vec::new();

    let mut node = |record: &ProductRecord, uf: &mut UnionFind| -> usize {
        let key = record.product_key();
        let id = match index.get(&key) {
            Some(&id) => id,
            None => {
                let id = uf.push();
                index.insert(key.clone(), id);
                keys.push(key);
                sheets.push(BTreeSet::new());
                id
            }
        };
        sheets[id].insert(record.source_sheet.clone());
        id
    };

    for pair in pairs {
        let a = node(&pair.record1, &mut uf);
        let b = node(&pair.record2, &mut uf);
        uf.union(a, b);
    }

    let mut root_to_group: HashMap<usize, usize> = HashMap::new();
    let mut groups: Vec<ProductGroup> = Vec::new();
    for (id, key) in keys.into_iter().enumerate() {
        let root = uf.find(id);
        let g = *root_to_group.entry(root).or_insert_with(|| {
            groups.push(ProductGroup {
                products: Vec::new(),
                sheets: BTreeSet::new(),
            });
            groups.len() - 1
        });
        groups[g].products.push(key);
        groups[g].sheets.extend(sheets[id].iter().cloned());
    }

    groups
}

/// 各商品 (商品名, SKU) が何社にまたがるグループに属するか
///
/// A↔B と B↔C が一致すれば A, B, C は同じグループで、
/// グループ内のシート数が全員の値になる。
pub fn group_by_connected_product(pairs: &[CandidatePair]) -> BTreeMap<ProductKey, usize> {
    let mut result = BTreeMap::new();
    for group in connected_groups(pairs) {
        let spread = group.spread();
        for product in group.products {
            result.insert(product, spread);
        }
    }
    result
}

/// 会社数ごとのグループ数（2社にまたがるグループが何個、3社が何個…）
pub fn spread_distribution(pairs: &[CandidatePair]) -> BTreeMap<usize, usize> {
    let mut stats = BTreeMap::new();
    for group in connected_groups(pairs) {
        *stats.entry(group.spread()).or_insert(0) += 1;
    }
    stats
}

/// ペアを両側の商品に展開し、(シート, SKU, 商品名, ブランド) で重複を除いて
/// シートごとに数える
pub fn count_unique_per_sheet(pairs: &[CandidatePair]) -> BTreeMap<String, usize> {
    let mut seen: HashSet<(&str, &str, &str, &str)> = HashSet::new();
    let mut counts: BTreeMap<String, usize> = BTreeMap::new();
    for pair in pairs {
        for record in [&pair.record1, &pair.record2] {
            let key = (
                record.source_sheet.as_str(),
                record.sku.as_str(),
                record.name.as_str(),
                pair.brand.as_str(),
            );
            if seen.insert(key) {
                *counts.entry(record.source_sheet.clone()).or_insert(0) += 1;
            }
        }
    }
    counts
}

/// ペアに含まれる商品の一覧（重複なし、出現順）
pub fn unique_products(pairs: &[CandidatePair]) -> Vec<ProductRecord> {
    let mut seen = HashSet::new();
    let mut products = Vec::new();
    for pair in pairs {
        for record in [&pair.record1, &pair.record2] {
            let key = (
                record.normalized_brand.as_str(),
                record.name.as_str(),
                record.sku.as_str(),
                record.source_sheet.as_str(),
            );
            if seen.insert(key) {
                products.push(record.clone());
            }
        }
    }
    products
}

/// 指定会社がどちらかの側に含まれるペア
pub fn pairs_for_company<'a>(pairs: &'a [CandidatePair], company: &str) -> Vec<&'a CandidatePair> {
    pairs.iter().filter(|p| p.involves_company(company)).collect()
}

/// 指定会社側の商品一覧
pub fn unique_products_for_company(pairs: &[CandidatePair], company: &str) -> Vec<ProductRecord> {
    unique_products(pairs)
        .into_iter()
        .filter(|r| r.source_sheet == company)
        .collect()
}

fn count_records_per_sheet(records: &[ProductRecord]) -> BTreeMap<String, usize> {
    records.iter().fold(BTreeMap::new(), |mut counts, r| {
        *counts.entry(r.source_sheet.clone()).or_insert(0) += 1;
        counts
    })
}

/// 会社ごとの区分別件数
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompanyAggregate {
    pub company: String,
    pub counts: BTreeMap<ClassificationTier, usize>,
    /// 異SKU（確度高と要確認を合わせて重複除去した件数）
    pub different_sku: usize,
    /// 重複 + 完全一致 + 部分一致 + 異SKU + 単独
    pub total: usize,
}

impl CompanyAggregate {
    pub fn count(&self, tier: ClassificationTier) -> usize {
        self.counts.get(&tier).copied().unwrap_or(0)
    }
}

/// 分類結果から会社ごとの件数を集計する（会社名順）
///
/// シート内重複の行は、重複除去後に残った1件が他の区分にも数えられる。
pub fn company_aggregates(classification: &Classification) -> Vec<CompanyAggregate> {
    let per_tier: Vec<(ClassificationTier, BTreeMap<String, usize>)> = ClassificationTier::ALL
        .iter()
        .map(|&tier| {
            let counts = match tier {
                ClassificationTier::InternalDuplicate | ClassificationTier::Unmatched => {
                    count_records_per_sheet(classification.records(tier))
                }
                _ => count_unique_per_sheet(classification.pairs(tier)),
            };
            (tier, counts)
        })
        .collect();

    // 確度高と要確認の両方に出る商品は1件として数える
    let different_sku_pairs: Vec<CandidatePair> = classification
        .confident
        .iter()
        .chain(classification.needs_review.iter())
        .cloned()
        .collect();
    let different_sku_counts = count_unique_per_sheet(&different_sku_pairs);

    let companies: BTreeSet<&String> = per_tier
        .iter()
        .flat_map(|(_, counts)| counts.keys())
        .collect();

    companies
        .into_iter()
        .map(|company| {
            let counts: BTreeMap<ClassificationTier, usize> = per_tier
                .iter()
                .map(|(tier, sheet_counts)| (*tier, sheet_counts.get(company).copied().unwrap_or(0)))
                .collect();
            let different_sku = different_sku_counts.get(company).copied().unwrap_or(0);
            let total = [
                ClassificationTier::InternalDuplicate,
                ClassificationTier::ExactMatch,
                ClassificationTier::PartialMatch,
                ClassificationTier::Unmatched,
            ]
            .iter()
            .map(|tier| counts.get(tier).copied().unwrap_or(0))
            .sum::<usize>()
                + different_sku;
            CompanyAggregate {
                company: company.clone(),
                counts,
                different_sku,
                total,
            }
        })
        .collect()
}
