//! 照合結果一覧（ペアレポート）
//!
//! 1行1ペア。区分ごとに背景色を変え、単独商品は2件目側を空欄にする。

use super::{xlsx_error, COLOR_CONFIDENT, COLOR_EXACT, COLOR_PARTIAL, COLOR_UNMATCHED};
use crate::error::Result;
use rust_xlsxwriter::{Color, Format, Workbook};
use sku_dedup_common::{CandidatePair, Classification, ClassificationTier, ProductRecord};
use std::path::Path;

pub const HEADERS: [&str; 9] = [
    "Marca",
    "Nombre SKU 1",
    "SKU 1",
    "Subempresa 1",
    "Nombre SKU 2",
    "SKU 2",
    "Subempresa 2",
    "Similarity",
    "category",
];

/// 出力する区分と背景色（この順に並ぶ）
const SECTIONS: [(ClassificationTier, u32); 5] = [
    (ClassificationTier::ExactMatch, COLOR_EXACT),
    (ClassificationTier::PartialMatch, COLOR_PARTIAL),
    (ClassificationTier::ConfidentDifferentSku, COLOR_CONFIDENT),
    (ClassificationTier::NeedsReviewDifferentSku, COLOR_CONFIDENT),
    (ClassificationTier::Unmatched, COLOR_UNMATCHED),
];

const SIMILARITY_COL: usize = 7;

/// レポートの1行
#[derive(Debug, Clone, PartialEq)]
pub struct PairRow {
    pub cells: [String; 9],
    /// 類似度（単独商品は無し）。数値セルとして書く
    pub similarity: Option<u8>,
    pub tier: ClassificationTier,
}

impl PairRow {
    fn from_pair(pair: &CandidatePair, tier: ClassificationTier) -> Self {
        Self {
            cells: [
                pair.brand.clone(),
                pair.record1.name.clone(),
                pair.record1.sku.clone(),
                pair.record1.source_sheet.clone(),
                pair.record2.name.clone(),
                pair.record2.sku.clone(),
                pair.record2.source_sheet.clone(),
                pair.similarity.to_string(),
                tier.category_label().to_string(),
            ],
            similarity: Some(pair.similarity),
            tier,
        }
    }

    fn from_record(record: &ProductRecord, tier: ClassificationTier) -> Self {
        Self {
            cells: [
                record.normalized_brand.clone(),
                record.name.clone(),
                record.sku.clone(),
                record.source_sheet.clone(),
                String::new(),
                String::new(),
                String::new(),
                String::new(),
                tier.category_label().to_string(),
            ],
            similarity: None,
            tier,
        }
    }
}

/// 分類結果をレポートの行に展開する
pub fn build_rows(classification: &Classification) -> Vec<PairRow> {
    let mut rows = Vec::new();
    for (tier, _) in SECTIONS {
        rows.extend(
            classification
                .pairs(tier)
                .iter()
                .map(|p| PairRow::from_pair(p, tier)),
        );
        rows.extend(
            classification
                .records(tier)
                .iter()
                .map(|r| PairRow::from_record(r, tier)),
        );
    }
    rows
}

fn section_color(tier: ClassificationTier) -> u32 {
    SECTIONS
        .iter()
        .find(|(t, _)| *t == tier)
        .map(|(_, color)| *color)
        .unwrap_or(0xFFFFFF)
}

/// 各列の幅 = 最長セルの文字数 + 4
pub fn column_widths(rows: &[PairRow]) -> [usize; 9] {
    let mut widths = HEADERS.map(|h| h.chars().count());
    for row in rows {
        for (width, cell) in widths.iter_mut().zip(row.cells.iter()) {
            *width = (*width).max(cell.chars().count());
        }
    }
    widths.map(|w| w + 4)
}

/// ペアレポートをxlsxに書き出す
pub fn write_pairs_report(classification: &Classification, output_path: &Path) -> Result<()> {
    let rows = build_rows(classification);

    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();
    worksheet
        .set_name("Matches")
        .map_err(xlsx_error("シート名設定エラー"))?;

    let header_format = Format::new().set_bold();
    for (col, header) in HEADERS.iter().enumerate() {
        worksheet
            .write_string_with_format(0, col as u16, *header, &header_format)
            .map_err(xlsx_error("ヘッダ書き込みエラー"))?;
    }

    for (i, row) in rows.iter().enumerate() {
        let format = Format::new().set_background_color(Color::RGB(section_color(row.tier)));
        let row_num = (i + 1) as u32;
        for (col, value) in row.cells.iter().enumerate() {
            match (col, row.similarity) {
                (SIMILARITY_COL, Some(similarity)) => worksheet
                    .write_number_with_format(row_num, col as u16, similarity, &format)
                    .map_err(xlsx_error("セル書き込みエラー"))?,
                _ => worksheet
                    .write_string_with_format(row_num, col as u16, value, &format)
                    .map_err(xlsx_error("セル書き込みエラー"))?,
            };
        }
    }

    for (col, width) in column_widths(&rows).iter().enumerate() {
        worksheet
            .set_column_width(col as u16, *width as f64)
            .map_err(xlsx_error("列幅設定エラー"))?;
    }

    workbook
        .save(output_path)
        .map_err(xlsx_error("Excel保存エラー"))?;
    Ok(())
}
