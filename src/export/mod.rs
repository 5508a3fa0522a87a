//! レポート出力
//!
//! - pairs: ペアごとの照合結果一覧
//! - summary: 会社別集計

pub mod pairs;
pub mod summary;

use crate::error::{DedupError, Result};
use log::info;
use rust_xlsxwriter::XlsxError;
use sku_dedup_common::Classification;
use std::path::{Path, PathBuf};

pub(crate) const COLOR_EXACT: u32 = 0xBDD7EE;
pub(crate) const COLOR_PARTIAL: u32 = 0xD9D2E9;
pub(crate) const COLOR_CONFIDENT: u32 = 0xC6E0B4;
pub(crate) const COLOR_UNMATCHED: u32 = 0xF4CCCC;

pub const PAIRS_FILE_NAME: &str = "matches.xlsx";
pub const SUMMARY_FILE_NAME: &str = "company_summary.xlsx";

pub(crate) fn xlsx_error(context: &'static str) -> impl Fn(XlsxError) -> DedupError {
    move |e| DedupError::ExcelGeneration(format!("{}: {}", context, e))
}

/// 出力先ディレクトリ内の (ペアレポート, 会社別集計) のパス
pub fn output_paths(output_dir: &Path) -> (PathBuf, PathBuf) {
    (
        output_dir.join(PAIRS_FILE_NAME),
        output_dir.join(SUMMARY_FILE_NAME),
    )
}

/// 両レポートを書き出し、書き出したパスを返す
pub fn export_reports(classification: &Classification, output_dir: &Path) -> Result<(PathBuf, PathBuf)> {
    std::fs::create_dir_all(output_dir)?;
    let (pairs_path, summary_path) = output_paths(output_dir);

    pairs::write_pairs_report(classification, &pairs_path)?;
    info!("ペアレポート出力: {}", pairs_path.display());

    let aggregates = sku_dedup_common::company_aggregates(classification);
    summary::write_company_summary(&aggregates, &summary_path)?;
    info!("会社別集計出力: {}", summary_path.display());

    Ok((pairs_path, summary_path))
}
