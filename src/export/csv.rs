use std::io::Write;

use csv::WriterBuilder;

use super::{DocumentRenderer, ExportError, ReportDocument};

/// Spreadsheet-friendly export: header, one record per row, then the summary.
#[derive(Debug, Clone, Copy, Default)]
pub struct CsvRenderer;

impl DocumentRenderer for CsvRenderer {
    fn extension(&self) -> &'static str {
        "csv"
    }

    fn render(&self, document: &ReportDocument, out: &mut dyn Write) -> Result<(), ExportError> {
        let mut writer = WriterBuilder::new().from_writer(out);
        writer.write_record(&document.columns)?;
        for row in &document.rows {
            writer.write_record(row.cells())?;
        }
        // summary records keep the column count so strict readers accept the file
        let padding = document.columns.len().saturating_sub(2);
        for (label, value) in &document.summary {
            let mut record = Vec::with_capacity(document.columns.len());
            record.push(label.as_str());
            record.extend(std::iter::repeat("").take(padding));
            record.push(value.as_str());
            writer.write_record(&record)?;
        }
        writer.flush()?;
        Ok(())
    }
}
