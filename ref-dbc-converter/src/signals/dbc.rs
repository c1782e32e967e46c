//! DBC file writer
//!
//! Serializes a [`SignalDatabase`] into Vector DBC text. Output is fully
//! deterministic: messages are sorted by numeric CAN ID and signals keep
//! their input order.

use crate::config::ConverterConfig;
use crate::signals::database::{MessageDefinition, SignalDatabase, SignalDefinition};
use crate::types::{ConverterError, Result};
use std::io::Write;

/// Section keywords listed in the `NS_` block
pub const NEW_SYMBOLS: &[&str] = &[
    "CM_",
    "BA_DEF_",
    "BA_",
    "VAL_",
    "CAT_DEF_",
    "CAT_",
    "FILTER",
    "BA_DEF_DEF_",
    "EV_DATA_",
    "ENVVAR_DATA_",
    "SGTYPE_",
    "SGTYPE_VAL_",
    "BA_DEF_SGTYPE_",
    "BA_SGTYPE_",
    "SIG_TYPE_REF_",
    "VAL_TABLE_",
    "SIG_GROUP_",
    "SIG_VALTYPE_",
    "SIGTYPE_VALTYPE_",
    "BO_TX_BU_",
    "BA_DEF_REL_",
    "BA_REL_",
    "BA_DEF_DEF_REL_",
    "BU_SG_REL_",
    "BU_EV_REL_",
    "BU_BO_REL_",
    "SG_MUL_VAL_",
];

/// Writes DBC text for a database
pub struct DbcWriter<'a> {
    config: &'a ConverterConfig,
}

impl<'a> DbcWriter<'a> {
    pub fn new(config: &'a ConverterConfig) -> Self {
        Self { config }
    }

    /// Write the complete DBC file
    ///
    /// Any failure of the underlying writer is returned as
    /// [`ConverterError::Output`].
    pub fn write<W: Write>(&self, db: &SignalDatabase, writer: &mut W) -> Result<()> {
        self.write_all(db, writer).map_err(ConverterError::Output)
    }

    #[cfg(test)]
    fn render(&self, db: &SignalDatabase) -> String {
        let mut buf = Vec::new();
        self.write(db, &mut buf).unwrap();
        String::from_utf8(buf).unwrap()
    }

    fn write_all<W: Write>(&self, db: &SignalDatabase, w: &mut W) -> std::io::Result<()> {
        self.write_preamble(w)?;

        let messages = db.messages_sorted();
        log::debug!("Writing {} messages", messages.len());

        for message in messages {
            self.write_message(message, w)?;
        }

        Ok(())
    }

    fn write_preamble<W: Write>(&self, w: &mut W) -> std::io::Result<()> {
        writeln!(w, "VERSION \"\"")?;
        writeln!(w)?;
        writeln!(w, "NS_ :")?;
        for symbol in NEW_SYMBOLS {
            writeln!(w, "\t{}", symbol)?;
        }
        writeln!(w)?;
        writeln!(w, "BS_:")?;
        writeln!(w)?;
        writeln!(w, "BU_: {}", self.config.node_name)?;
        writeln!(w)?;
        Ok(())
    }

    fn write_message<W: Write>(&self, msg: &MessageDefinition, w: &mut W) -> std::io::Result<()> {
        writeln!(w, "BO_ {} {}: {} {}", msg.id, msg.name, msg.dlc, msg.node)?;
        for signal in &msg.signals {
            self.write_signal(signal, w)?;
        }
        writeln!(w)
    }

    fn write_signal<W: Write>(&self, sig: &SignalDefinition, w: &mut W) -> std::io::Result<()> {
        writeln!(
            w,
            " SG_ {} : {}|{}@{}{} ({},{}) [{}|{}] \"{}\" {}",
            sig.name,
            sig.start_bit,
            sig.length,
            sig.byte_order.dbc_code(),
            sig.value_type.dbc_code(),
            format_number(sig.factor),
            format_number(sig.offset),
            format_number(sig.min),
            format_number(sig.max),
            sig.unit,
            self.config.node_name,
        )
    }
}

/// Shortest round-trip rendering of a float in "general" style
///
/// Plain decimal notation is used unless the decimal exponent is below -4 or
/// reaches the precision limit (6, or the digit count when that is smaller
/// and the value has no fractional digits), in which case the exponent form
/// `d.ddde+XX` is used. This is the layout DBC tools emit with `%g`.
pub fn format_number(value: f64) -> String {
    if value.is_nan() {
        return "NaN".to_string();
    }
    if value.is_infinite() {
        return if value > 0.0 { "+Inf" } else { "-Inf" }.to_string();
    }
    if value == 0.0 {
        return if value.is_sign_negative() { "-0" } else { "0" }.to_string();
    }

    // `{:e}` yields the shortest round-trip digits, e.g. "1.234e5"
    let sci = format!("{:e}", value.abs());
    let (mantissa, exp) = match sci.split_once('e') {
        Some((m, e)) => (m, e.parse::<i32>().unwrap_or(0)),
        None => (sci.as_str(), 0),
    };

    let digits = mantissa.chars().filter(char::is_ascii_digit).count() as i32;
    let decimal_point = exp + 1;

    let mut precision = 6;
    if precision > digits && digits >= decimal_point {
        precision = digits;
    }

    let sign = if value < 0.0 { "-" } else { "" };
    if exp < -4 || exp >= precision {
        let exp_sign = if exp < 0 { '-' } else { '+' };
        format!("{}{}e{}{:02}", sign, mantissa, exp_sign, exp.abs())
    } else {
        format!("{}{}", sign, value.abs())
    }
}
