//! Core types for the reference-to-DBC converter
//!
//! This module defines the error type for fatal conditions and the structured
//! warning records every pipeline stage returns. Warnings never abort a
//! conversion; they are collected and handed back to the caller.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Result type for converter operations
pub type Result<T> = std::result::Result<T, ConverterError>;

/// Fatal errors - any of these aborts the conversion of the current file
#[derive(Debug, thiserror::Error)]
pub enum ConverterError {
    #[error("Truncated container while reading {context}: {source}")]
    Truncated {
        context: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to open input file {path:?}: {source}")]
    Open {
        path: std::path::PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid container: {0}")]
    InvalidContainer(String),

    #[error("Failed to write DBC output: {0}")]
    Output(#[source] std::io::Error),
}

impl ConverterError {
    /// Wrap a read failure with the name of the field being read
    pub(crate) fn truncated(context: impl Into<String>, source: std::io::Error) -> Self {
        ConverterError::Truncated {
            context: context.into(),
            source,
        }
    }
}

/// Category of a non-fatal anomaly
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WarningKind {
    /// A container entry could not be zlib-decompressed and was skipped
    EntryDecompression,
    /// Bytes remain after the last declared entry
    TrailingData,
    /// A signal line has fewer than the required number of fields
    ShortLine,
    /// The message ID field is not an unsigned 32-bit integer
    InvalidMessageId,
    /// The DLC field is present but not numeric
    InvalidDlc,
    /// The DLC field is absent
    MissingDlc,
    /// A numeric signal field failed to parse and was replaced by zero
    NumericFallback,
}

impl fmt::Display for WarningKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WarningKind::EntryDecompression => write!(f, "entry decompression"),
            WarningKind::TrailingData => write!(f, "trailing data"),
            WarningKind::ShortLine => write!(f, "short line"),
            WarningKind::InvalidMessageId => write!(f, "invalid message ID"),
            WarningKind::InvalidDlc => write!(f, "invalid DLC"),
            WarningKind::MissingDlc => write!(f, "missing DLC"),
            WarningKind::NumericFallback => write!(f, "numeric fallback"),
        }
    }
}

/// A single structured warning record
///
/// `entry` is the 1-based container entry number, `line` the 1-based index of
/// the line in the accumulated line sequence. Either may be absent depending
/// on the stage that produced the warning.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Warning {
    pub kind: WarningKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub entry: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub line: Option<usize>,
    /// Raw context: the offending line, field value or error text
    pub context: String,
}

impl Warning {
    /// Warning tied to a container entry
    pub fn for_entry(kind: WarningKind, entry: usize, context: impl Into<String>) -> Self {
        Self {
            kind,
            entry: Some(entry),
            line: None,
            context: context.into(),
        }
    }

    /// Warning tied to a signal line
    pub fn for_line(kind: WarningKind, line: usize, context: impl Into<String>) -> Self {
        Self {
            kind,
            entry: None,
            line: Some(line),
            context: context.into(),
        }
    }

    /// Warning about the container as a whole
    pub fn for_container(kind: WarningKind, context: impl Into<String>) -> Self {
        Self {
            kind,
            entry: None,
            line: None,
            context: context.into(),
        }
    }

    /// Emit this warning through the `log` facade
    ///
    /// A missing DLC is informational and goes out at info level.
    pub(crate) fn log(&self) {
        match self.kind {
            WarningKind::MissingDlc => log::info!("{}", self),
            _ => log::warn!("{}", self),
        }
    }
}

impl fmt::Display for Warning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            WarningKind::EntryDecompression => write!(
                f,
                "could not decompress entry #{}: {}",
                self.entry.unwrap_or_default(),
                self.context
            ),
            WarningKind::TrailingData => write!(
                f,
                "the file was processed, but there is unparsed data remaining at the end of the file"
            ),
            WarningKind::ShortLine => write!(
                f,
                "skipping malformed line #{} (not enough fields): {}",
                self.line.unwrap_or_default(),
                self.context
            ),
            WarningKind::InvalidMessageId => write!(
                f,
                "skipping line #{} (invalid message ID): {}",
                self.line.unwrap_or_default(),
                self.context
            ),
            WarningKind::InvalidDlc => write!(
                f,
                "line #{} has invalid DLC, assuming default: {}",
                self.line.unwrap_or_default(),
                self.context
            ),
            WarningKind::MissingDlc => write!(
                f,
                "line #{} is missing DLC field, assuming default",
                self.line.unwrap_or_default()
            ),
            WarningKind::NumericFallback => write!(
                f,
                "line #{} has an unparseable numeric field, using 0: {}",
                self.line.unwrap_or_default(),
                self.context
            ),
        }
    }
}
