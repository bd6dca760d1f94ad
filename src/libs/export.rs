//! Period export to CSV and Excel.
//!
//! ```rust,no_run
//! use brainclock::libs::export::{ExportFormat, Exporter};
//! # let periods = Vec::new();
//!
//! let exporter = Exporter::new(ExportFormat::Excel, None);
//! exporter.export_periods(&periods)?;
//! # Ok::<(), anyhow::Error>(())
//! ```

use crate::libs::period::ProductivityPeriod;
use anyhow::Result;
use chrono::Local;
use rust_xlsxwriter::{Format, Workbook};
use std::path::{Path, PathBuf};

const HEADERS: [&str; 3] = ["start_time", "end_time", "recommended_activity"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum ExportFormat {
    Csv,
    /// `.xlsx` workbook with a formatted header row.
    Excel,
}

impl ExportFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::Csv => "csv",
            ExportFormat::Excel => "xlsx",
        }
    }
}

pub struct Exporter {
    format: ExportFormat,
    output_path: PathBuf,
}

impl Exporter {
    /// Without an explicit path the file is written to the working directory
    /// under a timestamped name.
    pub fn new(format: ExportFormat, output_path: Option<PathBuf>) -> Self {
        let output_path = output_path.unwrap_or_else(|| {
            PathBuf::from(format!(
                "brainclock_periods_{}.{}",
                Local::now().format("%Y%m%d_%H%M%S"),
                format.extension()
            ))
        });
        Self { format, output_path }
    }

    pub fn output_path(&self) -> &Path {
        &self.output_path
    }

    pub fn export_periods(&self, periods: &[ProductivityPeriod]) -> Result<PathBuf> {
        match self.format {
            ExportFormat::Csv => self.export_csv(periods)?,
            ExportFormat::Excel => self.export_excel(periods)?,
        }
        Ok(self.output_path.clone())
    }

    fn export_csv(&self, periods: &[ProductivityPeriod]) -> Result<()> {
        let mut wtr = csv::Writer::from_path(&self.output_path)?;
        wtr.write_record(HEADERS)?;
        for period in periods {
            let (start, end) = times(period);
            wtr.write_record([start.as_str(), end.as_str(), period.recommended_activity.as_str()])?;
        }
        wtr.flush()?;
        Ok(())
    }

    fn export_excel(&self, periods: &[ProductivityPeriod]) -> Result<()> {
        let mut workbook = Workbook::new();
        let worksheet = workbook.add_worksheet();

        let header_format = Format::new().set_bold().set_background_color(rust_xlsxwriter::Color::Gray);
        for (col, header) in HEADERS.iter().enumerate() {
            worksheet.write_string_with_format(0, col as u16, *header, &header_format)?;
        }

        for (i, period) in periods.iter().enumerate() {
            let row = i as u32 + 1;
            let (start, end) = times(period);
            worksheet.write_string(row, 0, &start)?;
            worksheet.write_string(row, 1, &end)?;
            worksheet.write_string(row, 2, &period.recommended_activity)?;
        }

        worksheet.autofit();
        workbook.save(&self.output_path)?;
        Ok(())
    }
}

fn times(period: &ProductivityPeriod) -> (String, String) {
    (period.start_time.format("%H:%M").to_string(), period.end_time.format("%H:%M").to_string())
}
