//! Spreadsheet export: long and wide tables to `.xlsx`.
//!
//! Both layouts go to a single worksheet named `Sheet1` with a bold header
//! row. Dates are written as ISO-8601 strings and missing prices as empty
//! cells. File names depend only on the content date, so a rerun for the
//! same day overwrites the earlier file.

use std::path::{Path, PathBuf};

use adjclose_core::domain::{OutputTable, PriceRow, WideTable};
use anyhow::{Context, Result};
use chrono::NaiveDate;
use rust_xlsxwriter::{Format, Workbook, Worksheet};

pub const SHEET_NAME: &str = "Sheet1";
pub const LONG_HEADER: [&str; 3] = ["Date", "Ticker", "Adjusted Close"];
const DATE_FORMAT: &str = "%Y-%m-%d";

/// `<prefix>_<YYYY-MM-DD>.xlsx`
pub fn daily_filename(prefix: &str, date: NaiveDate) -> String {
    format!("{prefix}_{}.xlsx", date.format(DATE_FORMAT))
}

/// `<prefix>_5Y_<YYYY-MM-DD>.xlsx`
pub fn history_filename(prefix: &str, date: NaiveDate) -> String {
    format!("{prefix}_5Y_{}.xlsx", date.format(DATE_FORMAT))
}

/// Write a table into `output_dir`, creating the directory if needed.
///
/// Returns the path of the written file.
pub fn save_table(
    table: &OutputTable,
    output_dir: &Path,
    prefix: &str,
    content_date: NaiveDate,
) -> Result<PathBuf> {
    std::fs::create_dir_all(output_dir)
        .with_context(|| format!("failed to create output dir: {}", output_dir.display()))?;

    let path = match table {
        OutputTable::Long(rows) => {
            let path = output_dir.join(daily_filename(prefix, content_date));
            export_long(rows, &path)?;
            path
        }
        OutputTable::Wide(wide) => {
            let path = output_dir.join(history_filename(prefix, content_date));
            export_wide(wide, &path)?;
            path
        }
    };

    log::info!("wrote {}", path.display());
    Ok(path)
}

/// Columns: Date, Ticker, Adjusted Close. One row per price row, in order.
pub fn export_long(rows: &[PriceRow], path: &Path) -> Result<()> {
    let mut workbook = Workbook::new();
    let bold = Format::new().set_bold();
    let sheet = new_sheet(&mut workbook)?;

    write_header(sheet, LONG_HEADER.iter().copied(), &bold)?;

    for (i, row) in rows.iter().enumerate() {
        let r = sheet_row(i + 1)?;
        sheet.write_string(r, 0, row.date.format(DATE_FORMAT).to_string())?;
        sheet.write_string(r, 1, row.ticker.as_str())?;
        if let Some(price) = row.adjusted_close.price() {
            sheet.write_number(r, 2, price)?;
        }
    }

    sheet.set_column_width(0, 12)?;
    sheet.set_column_width(2, 16)?;

    workbook
        .save(path)
        .with_context(|| format!("failed to write {}", path.display()))
}

/// Columns: Date, then one per ticker. One row per date, ascending.
pub fn export_wide(table: &WideTable, path: &Path) -> Result<()> {
    let mut workbook = Workbook::new();
    let bold = Format::new().set_bold();
    let sheet = new_sheet(&mut workbook)?;

    let header = std::iter::once("Date").chain(table.tickers.iter().map(|t| t.as_str()));
    write_header(sheet, header, &bold)?;

    for (i, (date, values)) in table.dates.iter().zip(&table.values).enumerate() {
        let r = sheet_row(i + 1)?;
        sheet.write_string(r, 0, date.format(DATE_FORMAT).to_string())?;
        for (j, value) in values.iter().enumerate() {
            if let Some(price) = value {
                sheet.write_number(r, sheet_col(j + 1)?, *price)?;
            }
        }
    }

    sheet.set_column_width(0, 12)?;

    workbook
        .save(path)
        .with_context(|| format!("failed to write {}", path.display()))
}

fn new_sheet(workbook: &mut Workbook) -> Result<&mut Worksheet> {
    let sheet = workbook.add_worksheet();
    sheet.set_name(SHEET_NAME)?;
    Ok(sheet)
}

fn write_header<'a>(
    sheet: &mut Worksheet,
    names: impl IntoIterator<Item = &'a str>,
    bold: &Format,
) -> Result<()> {
    for (j, name) in names.into_iter().enumerate() {
        sheet.write_string_with_format(0, sheet_col(j)?, name, bold)?;
    }
    Ok(())
}

fn sheet_row(i: usize) -> Result<u32> {
    u32::try_from(i).context("too many rows for one worksheet")
}

fn sheet_col(j: usize) -> Result<u16> {
    u16::try_from(j).context("too many columns for one worksheet")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn filenames_embed_iso_date() {
        let date = NaiveDate::from_ymd_opt(2024, 6, 5).unwrap();
        assert_eq!(
            daily_filename("Adjusted_Close", date),
            "Adjusted_Close_2024-06-05.xlsx"
        );
        assert_eq!(
            history_filename("Adjusted_Close", date),
            "Adjusted_Close_5Y_2024-06-05.xlsx"
        );
    }

    #[test]
    fn filenames_are_deterministic() {
        let date = NaiveDate::from_ymd_opt(2025, 1, 2).unwrap();
        assert_eq!(daily_filename("p", date), daily_filename("p", date));
        assert_ne!(
            daily_filename("p", date),
            daily_filename("p", date.succ_opt().unwrap())
        );
    }
}
