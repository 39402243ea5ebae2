use std::path::Path;

use anyhow::{Context, Result, bail};
use rust_xlsxwriter::{Format, Workbook};

pub const SHEET_NAME: &str = "Shopping List";
pub const COLUMN_HEADER: &str = "Ingredients";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Xlsx,
    Csv,
}

impl ExportFormat {
    /// `.csv` files get CSV; anything else is written as a workbook.
    #[must_use]
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("csv") => ExportFormat::Csv,
            _ => ExportFormat::Xlsx,
        }
    }

    #[must_use]
    pub fn extension(self) -> &'static str {
        match self {
            ExportFormat::Xlsx => "xlsx",
            ExportFormat::Csv => "csv",
        }
    }
}

/// Write the shopping list to `path`, one ingredient per row with a 1-based
/// row number in the first column. Returns the format used.
pub fn export_shopping_list(items: &[String], path: &Path) -> Result<ExportFormat> {
    if items.is_empty() {
        bail!("No ingredients to export");
    }
    let format = ExportFormat::from_path(path);
    match format {
        ExportFormat::Xlsx => write_xlsx(items, path)?,
        ExportFormat::Csv => write_csv(items, path)?,
    }
    Ok(format)
}

fn write_xlsx(items: &[String], path: &Path) -> Result<()> {
    let mut workbook = Workbook::new();
    let bold = Format::new().set_bold();
    let sheet = workbook.add_worksheet();
    sheet.set_name(SHEET_NAME)?;
    sheet.write_string_with_format(0, 1, COLUMN_HEADER, &bold)?;

    for (i, item) in items.iter().enumerate() {
        let row = u32::try_from(i + 1).context("Shopping list too long for a worksheet")?;
        sheet.write_number_with_format(row, 0, row, &bold)?;
        sheet.write_string(row, 1, item.as_str())?;
    }
    sheet.autofit();

    workbook
        .save(path)
        .with_context(|| format!("Failed to write {}", path.display()))?;
    Ok(())
}

fn write_csv(items: &[String], path: &Path) -> Result<()> {
    let mut wtr = csv::Writer::from_path(path)
        .with_context(|| format!("Failed to create {}", path.display()))?;
    wtr.write_record(["", COLUMN_HEADER])?;
    for (i, item) in items.iter().enumerate() {
        let n = (i + 1).to_string();
        wtr.write_record([n.as_str(), item.as_str()])?;
    }
    wtr.flush()?;
    Ok(())
}
