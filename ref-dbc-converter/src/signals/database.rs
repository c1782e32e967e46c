//! In-memory message/signal database
//!
//! Holds the messages built from one reference file. Messages are keyed by
//! CAN ID; signals keep the order in which they were encountered.

use std::collections::HashMap;

/// A CAN message definition
#[derive(Debug, Clone, PartialEq)]
pub struct MessageDefinition {
    /// CAN message ID
    pub id: u32,
    /// Synthesized message name
    pub name: String,
    /// Frame length in bytes (largest value seen for this ID)
    pub dlc: u32,
    /// Sender node (sentinel, shared by all messages)
    pub node: String,
    /// Signals in input order
    pub signals: Vec<SignalDefinition>,
}

/// A CAN signal definition
#[derive(Debug, Clone, PartialEq)]
pub struct SignalDefinition {
    /// Signal name
    pub name: String,
    /// Start bit in the CAN frame (written as given, range is not checked)
    pub start_bit: i64,
    /// Length in bits
    pub length: i64,
    /// Byte order
    pub byte_order: ByteOrder,
    /// Value type (signed/unsigned)
    pub value_type: ValueType,
    /// Scale factor to convert raw value to physical value
    pub factor: f64,
    /// Offset to add after scaling
    pub offset: f64,
    /// Minimum physical value
    pub min: f64,
    /// Maximum physical value
    pub max: f64,
    /// Engineering unit, may be empty
    pub unit: String,
}

impl SignalDefinition {
    pub fn is_signed(&self) -> bool {
        self.value_type == ValueType::Signed
    }
}

/// Byte order for signal extraction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ByteOrder {
    /// Little-endian (Intel format)
    LittleEndian,
    /// Big-endian (Motorola format)
    BigEndian,
}

impl ByteOrder {
    /// DBC byte order digit: `0` Motorola, `1` Intel
    pub fn dbc_code(self) -> char {
        match self {
            ByteOrder::BigEndian => '0',
            ByteOrder::LittleEndian => '1',
        }
    }
}

/// Value type for signal interpretation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueType {
    /// Signed integer
    Signed,
    /// Unsigned integer
    Unsigned,
}

impl ValueType {
    /// DBC sign character: `-` signed, `+` unsigned
    pub fn dbc_code(self) -> char {
        match self {
            ValueType::Signed => '-',
            ValueType::Unsigned => '+',
        }
    }
}

/// The message database for one conversion run
#[derive(Debug, Clone, Default)]
pub struct SignalDatabase {
    /// All message definitions by CAN ID
    messages: HashMap<u32, MessageDefinition>,
}

impl SignalDatabase {
    /// Create a new empty signal database
    pub fn new() -> Self {
        Self {
            messages: HashMap::new(),
        }
    }

    /// Append a signal to the message with the given ID
    ///
    /// The message is created with `dlc` if it does not exist yet. For an
    /// existing message the larger of the stored and the new DLC is kept.
    pub fn upsert_signal(
        &mut self,
        id: u32,
        dlc: u32,
        signal: SignalDefinition,
        name: impl FnOnce(u32) -> String,
        node: &str,
    ) {
        let message = self
            .messages
            .entry(id)
            .or_insert_with(|| MessageDefinition {
                id,
                name: name(id),
                dlc,
                node: node.to_string(),
                signals: Vec::new(),
            });

        if dlc > message.dlc {
            log::debug!(
                "Message {} DLC raised from {} to {}",
                id,
                message.dlc,
                dlc
            );
            message.dlc = dlc;
        }

        message.signals.push(signal);
    }

    /// Get a message definition by CAN ID
    pub fn get_message(&self, can_id: u32) -> Option<&MessageDefinition> {
        self.messages.get(&can_id)
    }

    /// All messages in ascending CAN ID order
    pub fn messages_sorted(&self) -> Vec<&MessageDefinition> {
        let mut messages: Vec<&MessageDefinition> = self.messages.values().collect();
        messages.sort_unstable_by_key(|m| m.id);
        messages
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    /// Get database statistics
    pub fn stats(&self) -> DatabaseStats {
        let num_signals: usize = self.messages.values().map(|m| m.signals.len()).sum();

        DatabaseStats {
            num_messages: self.messages.len(),
            num_signals,
        }
    }
}

/// Database statistics
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, serde::Serialize)]
pub struct DatabaseStats {
    /// Total number of message definitions
    pub num_messages: usize,
    /// Total number of signal definitions
    pub num_signals: usize,
}
