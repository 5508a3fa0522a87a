//! 商品レコード・候補ペアの型定義
//!
//! - ProductRecord: シート1行分の商品
//! - CandidatePair: 照合で見つかった商品ペア
//! - ClassificationTier: 分類結果の区分

use crate::error::{Error, Result};
use crate::normalize::{canonicalize_brand, normalize_name};
use crate::numbers::NumericSignature;
use serde::{Deserialize, Serialize};

/// 商品レコード（正規化済み）
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductRecord {
    /// ブランド（Marca）原文
    pub brand: String,
    /// ブランドの正規化形（trim + 大文字）
    pub normalized_brand: String,
    /// 商品名（Nombre SKU）原文
    pub name: String,
    /// 商品名の正規化形
    pub normalized_name: String,
    pub sku: String,
    /// 読み込み元シート（会社）
    pub source_sheet: String,
}

impl ProductRecord {
    pub fn new(
        brand: impl Into<String>,
        name: impl Into<String>,
        sku: impl Into<String>,
        source_sheet: impl Into<String>,
    ) -> Self {
        let brand = brand.into();
        let name = name.into();
        Self {
            normalized_brand: canonicalize_brand(&brand),
            normalized_name: normalize_name(&name),
            brand,
            name,
            sku: sku.into(),
            source_sheet: source_sheet.into(),
        }
    }

    /// 名前・SKUが空のレコードを拒否するコンストラクタ
    pub fn checked(
        brand: impl Into<String>,
        name: impl Into<String>,
        sku: impl Into<String>,
        source_sheet: impl Into<String>,
    ) -> Result<Self> {
        let record = Self::new(brand, name, sku, source_sheet);
        if record.name.trim().is_empty() {
            return Err(Error::MalformedRecord(format!(
                "{}: 商品名が空です (SKU={})",
                record.source_sheet, record.sku
            )));
        }
        if record.sku.trim().is_empty() {
            return Err(Error::MalformedRecord(format!(
                "{}: SKUが空です ({})",
                record.source_sheet, record.name
            )));
        }
        Ok(record)
    }

    /// 重複判定用キー (シート, SKU, 商品名)
    pub fn identity_key(&self) -> (&str, &str, &str) {
        (&self.source_sheet, &self.sku, &self.name)
    }

    /// 残差計算用キー (ブランド, 商品名, SKU)。シートを含まない
    pub fn catalog_key(&self) -> (&str, &str, &str) {
        (&self.normalized_brand, &self.name, &self.sku)
    }

    pub fn product_key(&self) -> ProductKey {
        ProductKey {
            name: self.name.clone(),
            sku: self.sku.clone(),
        }
    }
}

/// 連結成分グルーピングのノード (商品名, SKU)
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ProductKey {
    pub name: String,
    pub sku: String,
}

/// SKUの比較モード
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SkuMode {
    /// SKUが異なるペアのみ
    DifferentSku,
    /// SKUが同じペアのみ
    SameSku,
}

impl SkuMode {
    pub fn accepts(&self, sku1: &str, sku2: &str) -> bool {
        match self {
            SkuMode::DifferentSku => sku1 != sku2,
            SkuMode::SameSku => sku1 == sku2,
        }
    }
}

/// 照合候補ペア
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CandidatePair {
    /// 正規化済みブランド
    pub brand: String,
    pub record1: ProductRecord,
    pub record2: ProductRecord,
    /// 類似度 (0-100)
    pub similarity: u8,
    pub numbers1: NumericSignature,
    pub numbers2: NumericSignature,
}

impl CandidatePair {
    pub fn involves_company(&self, company: &str) -> bool {
        self.record1.source_sheet == company || self.record2.source_sheet == company
    }
}

/// 分類区分
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ClassificationTier {
    ExactMatch,
    PartialMatch,
    ConfidentDifferentSku,
    NeedsReviewDifferentSku,
    InternalDuplicate,
    Unmatched,
}

impl ClassificationTier {
    pub const ALL: [ClassificationTier; 6] = [
        ClassificationTier::InternalDuplicate,
        ClassificationTier::ExactMatch,
        ClassificationTier::PartialMatch,
        ClassificationTier::ConfidentDifferentSku,
        ClassificationTier::NeedsReviewDifferentSku,
        ClassificationTier::Unmatched,
    ];

    /// レポートの category 列に出すラベル
    pub fn category_label(&self) -> &'static str {
        match self {
            ClassificationTier::ExactMatch => "same name, same sku",
            ClassificationTier::PartialMatch => "similar name, same sku",
            ClassificationTier::ConfidentDifferentSku
            | ClassificationTier::NeedsReviewDifferentSku => "similar name, different sku",
            ClassificationTier::InternalDuplicate => "internal duplicate",
            ClassificationTier::Unmatched => "unique product",
        }
    }
}

impl std::fmt::Display for ClassificationTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ClassificationTier::ExactMatch => write!(f, "exact"),
            ClassificationTier::PartialMatch => write!(f, "partial"),
            ClassificationTier::ConfidentDifferentSku => write!(f, "confident"),
            ClassificationTier::NeedsReviewDifferentSku => write!(f, "needs_review"),
            ClassificationTier::InternalDuplicate => write!(f, "internal_duplicate"),
            ClassificationTier::Unmatched => write!(f, "unmatched"),
        }
    }
}
