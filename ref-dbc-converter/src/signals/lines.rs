//! Signal line parser
//!
//! Turns the CSV-like text lines stored in a reference container into the
//! message database. Each line describes one signal:
//!
//! ```text
//! name,msg_id,unit,start_bit,length,offset,factor,max,min,signed|unsigned,Intel|Motorola[,dlc]
//! ```
//!
//! Nothing in here is fatal. Malformed lines are skipped with a warning.
//!
//! Numeric signal fields (start bit through min) are parsed leniently: a
//! value that does not parse becomes zero and the line is still used.
//! Existing reference files rely on this, so the fallback is kept. When
//! [`ConverterConfig::warn_on_numeric_fallback`] is set, each fallback is
//! also reported as a [`WarningKind::NumericFallback`] warning.

use crate::config::ConverterConfig;
use crate::signals::database::{ByteOrder, SignalDatabase, SignalDefinition, ValueType};
use crate::types::{Warning, WarningKind};
use std::str::FromStr;

/// Minimum number of fields in a signal line (everything except the DLC)
pub const MIN_FIELDS: usize = 11;

const FIELD_NAME: usize = 0;
const FIELD_MESSAGE_ID: usize = 1;
const FIELD_UNIT: usize = 2;
const FIELD_START_BIT: usize = 3;
const FIELD_LENGTH: usize = 4;
const FIELD_OFFSET: usize = 5;
const FIELD_FACTOR: usize = 6;
const FIELD_MAX: usize = 7;
const FIELD_MIN: usize = 8;
const FIELD_SIGNEDNESS: usize = 9;
const FIELD_BYTE_ORDER: usize = 10;
const FIELD_DLC: usize = 11;

/// Output of the line parser
#[derive(Debug, Default)]
pub struct ParsedLines {
    pub database: SignalDatabase,
    pub warnings: Vec<Warning>,
}

/// Builds a [`SignalDatabase`] from signal definition lines
pub struct LineParser<'a> {
    config: &'a ConverterConfig,
}

impl<'a> LineParser<'a> {
    pub fn new(config: &'a ConverterConfig) -> Self {
        Self { config }
    }

    /// Parse all lines in order
    ///
    /// Line numbers in warnings are 1-based positions in `lines`.
    pub fn parse<S: AsRef<str>>(&self, lines: &[S]) -> ParsedLines {
        let mut parsed = ParsedLines::default();

        for (idx, line) in lines.iter().enumerate() {
            self.parse_line(idx + 1, line.as_ref(), &mut parsed);
        }

        log::debug!(
            "Parsed {} lines into {} messages ({} warnings)",
            lines.len(),
            parsed.database.stats().num_messages,
            parsed.warnings.len()
        );

        parsed
    }

    fn parse_line(&self, line_no: usize, line: &str, out: &mut ParsedLines) {
        let mut warn = |w: Warning| {
            w.log();
            out.warnings.push(w);
        };

        let trimmed = line.trim_matches(|c: char| c == ' ' || c == '\t' || c == ',');
        let fields: Vec<&str> = trimmed.split(',').collect();

        if fields.len() < MIN_FIELDS {
            warn(Warning::for_line(WarningKind::ShortLine, line_no, line));
            return;
        }

        let id = match parse_message_id(fields[FIELD_MESSAGE_ID]) {
            Some(id) => id,
            None => {
                warn(Warning::for_line(WarningKind::InvalidMessageId, line_no, line));
                return;
            }
        };

        let cfg = self.config;
        let start_bit: i64 = lenient(fields[FIELD_START_BIT], "start bit", line_no, cfg, &mut warn);
        let length: i64 = lenient(fields[FIELD_LENGTH], "length", line_no, cfg, &mut warn);
        let offset: f64 = lenient(fields[FIELD_OFFSET], "offset", line_no, cfg, &mut warn);
        let factor: f64 = lenient(fields[FIELD_FACTOR], "factor", line_no, cfg, &mut warn);
        let max: f64 = lenient(fields[FIELD_MAX], "max", line_no, cfg, &mut warn);
        let min: f64 = lenient(fields[FIELD_MIN], "min", line_no, cfg, &mut warn);

        let value_type = if fields[FIELD_SIGNEDNESS].eq_ignore_ascii_case("signed") {
            ValueType::Signed
        } else {
            ValueType::Unsigned
        };

        let byte_order = if fields[FIELD_BYTE_ORDER].eq_ignore_ascii_case("intel") {
            ByteOrder::LittleEndian
        } else {
            ByteOrder::BigEndian
        };

        let dlc = match fields.get(FIELD_DLC) {
            Some(raw) => match raw.parse::<u32>() {
                Ok(dlc) => dlc,
                Err(_) => {
                    warn(Warning::for_line(
                        WarningKind::InvalidDlc,
                        line_no,
                        format!("'{}' in {}", raw, line),
                    ));
                    self.config.default_dlc
                }
            },
            None => {
                warn(Warning::for_line(WarningKind::MissingDlc, line_no, line));
                self.config.default_dlc
            }
        };

        let signal = SignalDefinition {
            name: fields[FIELD_NAME].to_string(),
            start_bit,
            length,
            byte_order,
            value_type,
            factor,
            offset,
            min,
            max,
            unit: fields[FIELD_UNIT].to_string(),
        };

        log::trace!("Line {}: signal {} -> message {}", line_no, signal.name, id);

        out.database.upsert_signal(
            id,
            dlc,
            signal,
            |id| self.config.message_name(id),
            &self.config.node_name,
        );
    }
}

/// Message IDs are plain decimal digits: no sign, no surrounding whitespace
fn parse_message_id(raw: &str) -> Option<u32> {
    if raw.is_empty() || !raw.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    raw.parse().ok()
}

/// Parse a numeric field, falling back to zero
///
/// Signs are accepted, so negative bit positions pass through unchanged.
fn lenient<T: FromStr + Default>(
    raw: &str,
    label: &str,
    line_no: usize,
    config: &ConverterConfig,
    warn: &mut impl FnMut(Warning),
) -> T {
    match raw.parse::<T>() {
        Ok(value) => value,
        Err(_) => {
            if config.warn_on_numeric_fallback {
                warn(Warning::for_line(
                    WarningKind::NumericFallback,
                    line_no,
                    format!("{} '{}'", label, raw),
                ));
            }
            T::default()
        }
    }
}
