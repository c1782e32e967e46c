//! Input container formats
//!
//! Only the reference container is supported. It yields the raw signal
//! definition lines that the signal parser turns into a database.

pub mod reference;

pub use reference::{ContainerContents, ReferenceReader};
