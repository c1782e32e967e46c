//! Main converter API
//!
//! The [`Converter`] runs the three pipeline stages in order: container
//! reading, signal line parsing and DBC writing. Each stage returns its own
//! warnings; the converter concatenates them into the [`ConversionReport`].

use crate::config::ConverterConfig;
use crate::formats::{ContainerContents, ReferenceReader};
use crate::signals::{DatabaseStats, DbcWriter, LineParser, ParsedLines, SignalDatabase};
use crate::types::{ConverterError, Result, Warning};
use serde::Serialize;
use std::fs::File;
use std::io::{BufWriter, Read, Write};
use std::path::Path;

/// Outcome of a successful conversion
#[derive(Debug, Clone, Default, Serialize)]
pub struct ConversionReport {
    /// Entries declared by the container
    pub entry_count: u16,
    /// Non-blank signal lines extracted from the entries
    pub line_count: usize,
    /// Size of the resulting database
    pub stats: DatabaseStats,
    /// All warnings, container warnings first
    pub warnings: Vec<Warning>,
}

impl ConversionReport {
    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }
}

/// The converter - entry point for all conversion operations
#[derive(Debug, Clone, Default)]
pub struct Converter {
    config: ConverterConfig,
}

impl Converter {
    /// Create a converter with default settings
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a converter with the given configuration
    pub fn with_config(config: ConverterConfig) -> Self {
        Self { config }
    }

    /// Read a reference container from any byte stream
    pub fn read_container<R: Read>(&self, reader: R) -> Result<ContainerContents> {
        ReferenceReader::new(reader).read_contents()
    }

    /// Build the message database from signal lines
    pub fn build_database<S: AsRef<str>>(&self, lines: &[S]) -> ParsedLines {
        LineParser::new(&self.config).parse(lines)
    }

    /// Write a database as DBC text
    pub fn write_dbc<W: Write>(&self, db: &SignalDatabase, writer: &mut W) -> Result<()> {
        DbcWriter::new(&self.config).write(db, writer)
    }

    /// Read and parse a container without writing anything
    ///
    /// Returns the database together with a report describing it.
    pub fn parse<R: Read>(&self, reader: R) -> Result<(SignalDatabase, ConversionReport)> {
        let contents = self.read_container(reader)?;
        let parsed = self.build_database(&contents.lines);

        let mut warnings = contents.warnings;
        warnings.extend(parsed.warnings);

        let report = ConversionReport {
            entry_count: contents.entry_count,
            line_count: contents.lines.len(),
            stats: parsed.database.stats(),
            warnings,
        };

        Ok((parsed.database, report))
    }

    /// Convert a reference container stream into DBC text
    ///
    /// # Example
    /// ```no_run
    /// use ref_dbc_converter::Converter;
    /// use std::fs::File;
    ///
    /// let input = File::open("session.ref").unwrap();
    /// let mut output = Vec::new();
    /// let report = Converter::new().convert(input, &mut output).unwrap();
    /// println!("{} messages", report.stats.num_messages);
    /// ```
    pub fn convert<R: Read, W: Write>(&self, reader: R, writer: &mut W) -> Result<ConversionReport> {
        let (database, report) = self.parse(reader)?;
        self.write_dbc(&database, writer)?;
        Ok(report)
    }

    /// Convert a reference file into a DBC file
    ///
    /// The input is parsed completely before the output file is created, so a
    /// fatal parse error never leaves a partial DBC behind.
    pub fn convert_file(&self, input: &Path, output: &Path) -> Result<ConversionReport> {
        log::info!("Converting reference file: {:?}", input);

        let file = File::open(input).map_err(|source| ConverterError::Open {
            path: input.to_path_buf(),
            source,
        })?;
        let (database, report) = self.parse(file)?;

        let out = File::create(output).map_err(ConverterError::Output)?;
        let mut writer = BufWriter::new(out);
        self.write_dbc(&database, &mut writer)?;
        writer.flush().map_err(ConverterError::Output)?;

        log::info!(
            "Wrote {} messages / {} signals to {:?}",
            report.stats.num_messages,
            report.stats.num_signals,
            output
        );

        Ok(report)
    }
}
