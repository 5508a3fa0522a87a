//! 照合しきい値の設定
//!
//! パイプライン全体で使うしきい値を1つの構造体にまとめ、
//! 照合前に整合性を検証する。

use crate::error::{Error, Result};
use crate::flavor::FlavorOptions;
use serde::{Deserialize, Serialize};

/// 照合・分類のしきい値
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MatchConfig {
    /// 同一SKUペアの類似度しきい値
    pub same_sku_threshold: u8,
    /// 異SKUペアの下限（要確認の下限）
    pub low_confidence_threshold: u8,
    /// 異SKUペアを「確度高」とする類似度
    pub confidence_threshold: u8,
    /// 数値SKUの差がこれ以下なら連番とみなして除外
    pub sku_closeness: u64,
    pub flavor: FlavorOptions,
}

impl Default for MatchConfig {
    fn default() -> Self {
        Self {
            same_sku_threshold: 88,
            low_confidence_threshold: 85,
            confidence_threshold: 93,
            sku_closeness: 3,
            flavor: FlavorOptions::default(),
        }
    }
}

impl MatchConfig {
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// しきい値の整合性を検証する
    pub fn validate(&self) -> Result<()> {
        let thresholds = [
            ("same_sku_threshold", self.same_sku_threshold),
            ("low_confidence_threshold", self.low_confidence_threshold),
            ("confidence_threshold", self.confidence_threshold),
        ];
        for (name, value) in thresholds {
            if !(1..=100).contains(&value) {
                return Err(Error::InvalidConfig(format!(
                    "{} は 1-100 の範囲で指定してください: {}",
                    name, value
                )));
            }
        }

        if self.confidence_threshold < self.low_confidence_threshold {
            return Err(Error::InvalidConfig(format!(
                "confidence_threshold ({}) < low_confidence_threshold ({})",
                self.confidence_threshold, self.low_confidence_threshold
            )));
        }

        if !(0.0..=1.0).contains(&self.flavor.max_similarity) {
            return Err(Error::InvalidConfig(format!(
                "flavor.max_similarity は 0.0-1.0 の範囲で指定してください: {}",
                self.flavor.max_similarity
            )));
        }

        if self.flavor.min_token_length == 0 {
            return Err(Error::InvalidConfig(
                "flavor.min_token_length は 1 以上を指定してください".to_string(),
            ));
        }

        Ok(())
    }
}
