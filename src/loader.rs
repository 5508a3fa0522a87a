//! ワークブック読み込み
//!
//! 1シート = 1社として、各シートの Marca / Nombre SKU / SKU 列から
//! 商品レコードを作る。

use crate::error::{DedupError, Result};
use calamine::{open_workbook_auto, Data, Reader};
use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use sku_dedup_common::ProductRecord;
use std::path::Path;

/// 読み込み設定
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoaderOptions {
    /// 読み込まないシート
    pub excluded_sheets: Vec<String>,
    pub brand_column: String,
    pub name_column: String,
    pub sku_column: String,
}

impl Default for LoaderOptions {
    fn default() -> Self {
        Self {
            excluded_sheets: vec!["Familia Corporativa".to_string()],
            brand_column: "Marca".to_string(),
            name_column: "Nombre SKU".to_string(),
            sku_column: "SKU".to_string(),
        }
    }
}

impl LoaderOptions {
    fn is_excluded(&self, sheet: &str) -> bool {
        self.excluded_sheets.iter().any(|s| s == sheet)
    }
}

/// セルを文字列化する。整数値の浮動小数は ".0" を付けない
pub fn cell_to_string(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        Data::Int(i) => i.to_string(),
        Data::Float(f) if f.is_finite() && f.fract() == 0.0 && f.abs() < 1e15 => {
            format!("{}", *f as i64)
        }
        other => other.to_string().trim().to_string(),
    }
}

fn cell_str(row: &[Data], idx: usize) -> String {
    row.get(idx).map(cell_to_string).unwrap_or_default()
}

/// ヘッダ行から (ブランド, 商品名, SKU) 列の位置を探す
fn find_columns(header: &[Data], options: &LoaderOptions) -> std::result::Result<[usize; 3], String> {
    let position = |name: &str| {
        header
            .iter()
            .position(|cell| cell_to_string(cell) == name)
            .ok_or_else(|| name.to_string())
    };
    Ok([
        position(&options.brand_column)?,
        position(&options.name_column)?,
        position(&options.sku_column)?,
    ])
}

/// 1シート分の行からレコードを作る（先頭行はヘッダ）
///
/// 必要な列が無いシートは `None`。
pub fn records_from_rows<'a, I>(sheet: &str, mut rows: I, options: &LoaderOptions) -> Option<Vec<ProductRecord>>
where
    I: Iterator<Item = &'a [Data]>,
{
    let Some(header) = rows.next() else {
        warn!("シート '{}' は空のためスキップ", sheet);
        return None;
    };

    let [brand_col, name_col, sku_col] = match find_columns(header, options) {
        Ok(cols) => cols,
        Err(missing) => {
            warn!("シート '{}' に列 '{}' が無いためスキップ", sheet, missing);
            return None;
        }
    };

    let mut records = Vec::new();
    for (i, row) in rows.enumerate() {
        let brand = cell_str(row, brand_col);
        let name = cell_str(row, name_col);
        let sku = cell_str(row, sku_col);
        if brand.is_empty() && name.is_empty() && sku.is_empty() {
            continue;
        }
        match ProductRecord::checked(brand, name, sku, sheet) {
            Ok(record) => records.push(record),
            // 行番号はヘッダを1行目として数える
            Err(e) => debug!("{}行目をスキップ: {}", i + 2, e),
        }
    }
    Some(records)
}

/// ワークブック全体を読み込む（シートはブック内の順）
///
/// # Errors
/// - ファイルが無い: `FileNotFound`
/// - 使えるシートが1つも無い: `NoUsableSheets`
pub fn load_catalog(path: &Path, options: &LoaderOptions) -> Result<Vec<ProductRecord>> {
    if !path.exists() {
        return Err(DedupError::FileNotFound(path.display().to_string()));
    }

    let mut workbook = open_workbook_auto(path)?;
    let sheet_names: Vec<String> = workbook.sheet_names().to_vec();

    let mut records = Vec::new();
    let mut usable_sheets = 0;
    for sheet in &sheet_names {
        if options.is_excluded(sheet) {
            debug!("除外シート: {}", sheet);
            continue;
        }

        let range = workbook.worksheet_range(sheet)?;
        if let Some(sheet_records) = records_from_rows(sheet, range.rows(), options) {
            debug!("シート '{}': {}件", sheet, sheet_records.len());
            usable_sheets += 1;
            records.extend(sheet_records);
        }
    }

    if usable_sheets == 0 {
        return Err(DedupError::NoUsableSheets(path.display().to_string()));
    }

    info!(
        "{}: {}シート / {}件を読み込み",
        path.display(),
        usable_sheets,
        records.len()
    );
    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn s(text: &str) -> Data {
        Data::String(text.to_string())
    }

    #[test]
    fn test_cell_to_string() {
        assert_eq!(cell_to_string(&Data::Float(100.0)), "100");
        assert_eq!(cell_to_string(&Data::Float(1.5)), "1.5");
        assert_eq!(cell_to_string(&Data::Int(42)), "42");
        assert_eq!(cell_to_string(&s("  SKU1 ")), "SKU1");
        assert_eq!(cell_to_string(&Data::Empty), "");
    }

    #[test]
    fn test_records_from_rows() {
        let rows = vec![
            vec![s("SKU"), s("Marca"), s("Nombre SKU")],
            vec![Data::Float(100.0), s("acme"), s("Aceite Oliva 1L")],
            vec![s("101"), s("acme"), Data::Empty],
            vec![Data::Empty, Data::Empty, Data::Empty],
            vec![s("102"), Data::Empty, s("Sal Fina")],
        ];
        let records = records_from_rows(
            "Empresa A",
            rows.iter().map(Vec::as_slice),
            &LoaderOptions::default(),
        )
        .unwrap();

        assert_eq!(records.len(), 2);
        assert_eq!(records[0].sku, "100");
        assert_eq!(records[0].normalized_brand, "ACME");
        assert_eq!(records[0].source_sheet, "Empresa A");
        // ブランドが空でも残す
        assert_eq!(records[1].brand, "");
    }

    #[test]
    fn test_missing_column_skips_sheet() {
        let rows = vec![vec![s("Marca"), s("Nombre")], vec![s("acme"), s("x")]];
        assert!(records_from_rows("A", rows.iter().map(Vec::as_slice), &LoaderOptions::default()).is_none());
    }

    #[test]
    fn test_custom_columns() {
        let options = LoaderOptions {
            brand_column: "Brand".to_string(),
            name_column: "Product".to_string(),
            sku_column: "Code".to_string(),
            ..Default::default()
        };
        let rows = vec![
            vec![s("Brand"), s("Product"), s("Code")],
            vec![s("acme"), s("Jugo"), s("7")],
        ];
        let records = records_from_rows("A", rows.iter().map(Vec::as_slice), &options).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].name, "Jugo");
    }

    #[test]
    fn test_excluded_sheet_default() {
        let options = LoaderOptions::default();
        assert!(options.is_excluded("Familia Corporativa"));
        assert!(!options.is_excluded("Empresa A"));
    }
}
