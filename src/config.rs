use crate::error::{DedupError, Result};
use crate::loader::LoaderOptions;
use serde::{Deserialize, Serialize};
use sku_dedup_common::MatchConfig;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    pub matching: MatchConfig,
    pub loader: LoaderOptions,
}

impl Config {
    /// 既定の場所から読み込む（無ければ既定値）
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path()?;

        if config_path.exists() {
            Self::load_from(&config_path)
        } else {
            Ok(Self::default())
        }
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(DedupError::FileNotFound(path.display().to_string()));
        }
        let content = std::fs::read_to_string(path)?;
        let config: Config = serde_json::from_str(&content)?;
        config.matching.validate()?;
        Ok(config)
    }

    /// `--config` が指定されていればそれを、無ければ既定の場所を読む
    pub fn resolve(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::load_from(path),
            None => Self::load(),
        }
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    pub fn config_path() -> Result<PathBuf> {
        let home = dirs::home_dir()
            .ok_or_else(|| DedupError::Config("ホームディレクトリが見つかりません".into()))?;
        Ok(home.join(".config").join("sku-dedup").join("config.json"))
    }

    /// CLIで指定されたしきい値で上書きし、検証する
    pub fn apply_overrides(
        &mut self,
        same_sku_threshold: Option<u8>,
        low_confidence_threshold: Option<u8>,
        confidence_threshold: Option<u8>,
        exclude: &[String],
    ) -> Result<()> {
        if let Some(v) = same_sku_threshold {
            self.matching.same_sku_threshold = v;
        }
        if let Some(v) = low_confidence_threshold {
            self.matching.low_confidence_threshold = v;
        }
        if let Some(v) = confidence_threshold {
            self.matching.confidence_threshold = v;
        }
        for sheet in exclude {
            if !self.loader.excluded_sheets.contains(sheet) {
                self.loader.excluded_sheets.push(sheet.clone());
            }
        }
        self.matching.validate()?;
        Ok(())
    }
}
