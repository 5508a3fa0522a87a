//! 会社別集計レポート
//!
//! シート内重複の行は Duplicates に数えたうえで、残した1件が
//! 一致・単独の列にも現れるため、Total は行数より多くなることがある。

use super::xlsx_error;
use crate::error::Result;
use rust_xlsxwriter::{Color, Format, Workbook};
use sku_dedup_common::{ClassificationTier, CompanyAggregate};
use std::path::Path;

/// (見出し, 背景色, 列幅)
pub const COLUMNS: [(&str, u32, f64); 7] = [
    ("Company", 0xD3D3D3, 30.0),
    ("Duplicates", 0xA52A2A, 15.0),
    ("Same SKU same name", 0x87CEEB, 22.0),
    ("Same SKU similar name", 0x9370DB, 25.0),
    ("Same product different SKU", 0x90EE90, 28.0),
    ("Unique Products", 0xFF7F7F, 18.0),
    ("Total", 0xD3D3D3, 10.0),
];

/// 会社名以外の列の値
pub fn summary_values(aggregate: &CompanyAggregate) -> [usize; 6] {
    [
        aggregate.count(ClassificationTier::InternalDuplicate),
        aggregate.count(ClassificationTier::ExactMatch),
        aggregate.count(ClassificationTier::PartialMatch),
        aggregate.different_sku,
        aggregate.count(ClassificationTier::Unmatched),
        aggregate.total,
    ]
}

/// 会社別集計をxlsxに書き出す（1社1行、B2で枠固定）
pub fn write_company_summary(aggregates: &[CompanyAggregate], output_path: &Path) -> Result<()> {
    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();
    worksheet
        .set_name("Summary")
        .map_err(xlsx_error("シート名設定エラー"))?;

    let formats: Vec<Format> = COLUMNS
        .iter()
        .map(|(_, color, _)| Format::new().set_background_color(Color::RGB(*color)))
        .collect();

    for (col, (header, _, width)) in COLUMNS.iter().enumerate() {
        let header_format = formats[col].clone().set_bold();
        worksheet
            .write_string_with_format(0, col as u16, *header, &header_format)
            .map_err(xlsx_error("ヘッダ書き込みエラー"))?;
        worksheet
            .set_column_width(col as u16, *width)
            .map_err(xlsx_error("列幅設定エラー"))?;
    }

    for (i, aggregate) in aggregates.iter().enumerate() {
        let row = (i + 1) as u32;
        worksheet
            .write_string_with_format(row, 0, &aggregate.company, &formats[0])
            .map_err(xlsx_error("セル書き込みエラー"))?;
        for (offset, value) in summary_values(aggregate).iter().enumerate() {
            let col = offset + 1;
            worksheet
                .write_number_with_format(row, col as u16, *value as f64, &formats[col])
                .map_err(xlsx_error("セル書き込みエラー"))?;
        }
    }

    worksheet
        .set_freeze_panes(1, 1)
        .map_err(xlsx_error("枠固定エラー"))?;

    workbook
        .save(output_path)
        .map_err(xlsx_error("Excel保存エラー"))?;
    Ok(())
}
