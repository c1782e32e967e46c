//! Run report
//!
//! Collects the outcome of every input file and renders the end-of-run
//! summary. The report can also be written as JSON for tooling.

use anyhow::{Context, Result};
use ref_dbc_converter::ConversionReport;
use serde::Serialize;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FileStatus {
    Converted,
    ConvertedWithWarnings,
    Failed,
}

/// Outcome for one input file
#[derive(Debug, Clone, Serialize)]
pub struct FileOutcome {
    pub input: PathBuf,
    pub output: PathBuf,
    pub status: FileStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub conversion: Option<ConversionReport>,
}

impl FileOutcome {
    pub fn from_result(
        input: PathBuf,
        output: PathBuf,
        result: &anyhow::Result<ConversionReport>,
    ) -> Self {
        match result {
            Ok(report) => Self {
                input,
                output,
                status: if report.has_warnings() {
                    FileStatus::ConvertedWithWarnings
                } else {
                    FileStatus::Converted
                },
                error: None,
                conversion: Some(report.clone()),
            },
            Err(e) => Self {
                input,
                output,
                status: FileStatus::Failed,
                error: Some(format!("{:#}", e)),
                conversion: None,
            },
        }
    }
}

/// Outcome of a whole run
#[derive(Debug, Clone, Default, Serialize)]
pub struct RunReport {
    pub files: Vec<FileOutcome>,
}

impl RunReport {
    pub fn push(&mut self, outcome: FileOutcome) {
        self.files.push(outcome);
    }

    /// Files converted, with or without warnings
    pub fn converted(&self) -> usize {
        self.files
            .iter()
            .filter(|f| f.status != FileStatus::Failed)
            .count()
    }

    pub fn failed(&self) -> usize {
        self.files.len() - self.converted()
    }

    /// True if any file failed or produced warnings
    pub fn had_issues(&self) -> bool {
        self.files.iter().any(|f| f.status != FileStatus::Converted)
    }

    pub fn summary(&self) -> String {
        format!(
            "Successfully processed {} out of {} file(s).",
            self.converted(),
            self.files.len()
        )
    }

    /// Write the report as pretty-printed JSON
    pub fn write_json(&self, path: &Path) -> Result<()> {
        let file = File::create(path)
            .with_context(|| format!("Failed to create report file: {:?}", path))?;
        let mut writer = BufWriter::new(file);
        serde_json::to_writer_pretty(&mut writer, self)
            .with_context(|| format!("Failed to write report file: {:?}", path))?;
        writer.flush()?;
        Ok(())
    }
}
