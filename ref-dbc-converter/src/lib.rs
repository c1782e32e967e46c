//! Reference-to-DBC Converter Library
//!
//! Converts vendor "reference" files (a binary container of zlib-compressed
//! signal definition text) into Vector DBC CAN databases.
//!
//! # Architecture
//!
//! The conversion is a straight pipeline with no feedback between stages:
//! - [`formats::reference`] walks the container and decompresses its entries
//!   into text lines
//! - [`signals::lines`] parses those lines into messages and signals
//! - [`signals::dbc`] writes the messages as DBC text
//!
//! Fatal problems (broken container framing, write failures) are returned as
//! [`ConverterError`]. Everything else is a [`Warning`] collected in the
//! [`ConversionReport`]; warnings never stop a conversion.
//!
//! The library does NOT:
//! - Decide output file names
//! - Loop over multiple input files
//! - Set up logging (it only emits through the `log` facade)
//!
//! That is the job of the application layer (ref-dbc-cli).
//!
//! # Example Usage
//!
//! ```no_run
//! use ref_dbc_converter::{Converter, ConverterConfig};
//! use std::path::Path;
//!
//! let converter = Converter::with_config(ConverterConfig::new().with_default_dlc(8));
//! let report = converter
//!     .convert_file(Path::new("session.ref"), Path::new("session.dbc"))
//!     .unwrap();
//!
//! for warning in &report.warnings {
//!     eprintln!("Warning: {}", warning);
//! }
//! ```

// Public modules
pub mod config;
pub mod converter;
pub mod formats;
pub mod signals;
pub mod types;

// Re-export main types for convenience
pub use config::ConverterConfig;
pub use converter::{ConversionReport, Converter};
pub use signals::{
    ByteOrder, DatabaseStats, MessageDefinition, SignalDatabase, SignalDefinition, ValueType,
};
pub use types::{ConverterError, Result, Warning, WarningKind};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
