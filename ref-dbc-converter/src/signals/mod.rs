//! Signal database, signal line parser and DBC writer
//!
//! This module contains the in-memory model built from the decompressed
//! reference text and its serialization to DBC.

pub mod database;
pub mod dbc;
pub mod lines;

// Re-export key types for convenience
pub use database::{
    ByteOrder, DatabaseStats, MessageDefinition, SignalDatabase, SignalDefinition, ValueType,
};
pub use dbc::{format_number, DbcWriter};
pub use lines::{LineParser, ParsedLines};
