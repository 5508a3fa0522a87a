//! SKU Dedup Common Library
//!
//! CLIと共有される照合・分類エンジン
//!
//! - 名前の正規化・数値抽出・類似度
//! - ブランド単位の候補ペア探索
//! - 6区分への分類と会社別集計

pub mod aggregate;
pub mod classifier;
pub mod config;
pub mod error;
pub mod flavor;
pub mod matcher;
pub mod normalize;
pub mod numbers;
pub mod similarity;
pub mod types;

pub use aggregate::{
    company_aggregates, connected_groups, count_unique_per_sheet, group_by_connected_product,
    pairs_for_company, spread_distribution, unique_products, unique_products_for_company,
    CompanyAggregate, ProductGroup,
};
pub use classifier::{classify, Classification};
pub use config::MatchConfig;
pub use error::{Error, Result};
pub use flavor::{is_different_flavor, is_different_flavor_with, FlavorOptions};
pub use matcher::find_similar_products;
pub use normalize::{canonicalize_brand, normalize_name};
pub use numbers::{extract_numbers, NumericSignature};
pub use similarity::token_sort_ratio;
pub use types::{CandidatePair, ClassificationTier, ProductKey, ProductRecord, SkuMode};
