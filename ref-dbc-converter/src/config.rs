//! Converter configuration types
//!
//! The reference format carries no node or message naming information, so
//! the values the converter synthesizes are configurable here. Defaults match
//! what downstream DBC tooling expects for anonymous senders.

use serde::{Deserialize, Serialize};

/// Default DLC assumed when a signal line carries none
pub const DEFAULT_DLC: u32 = 8;

/// Placeholder node used as sender and receiver for every frame
pub const DEFAULT_NODE: &str = "VECTOR__XXX";

/// Prefix for synthesized message names
pub const DEFAULT_MESSAGE_PREFIX: &str = "CAN_MSG_";

/// Configuration for a conversion run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConverterConfig {
    /// DLC used when the field is missing or unparseable
    #[serde(default = "default_dlc")]
    pub default_dlc: u32,

    /// Sentinel node name written as sender and receiver
    #[serde(default = "default_node")]
    pub node_name: String,

    /// Message names are `<prefix><id>`
    #[serde(default = "default_prefix")]
    pub message_name_prefix: String,

    /// Record a warning whenever a numeric signal field falls back to zero
    #[serde(default = "default_true")]
    pub warn_on_numeric_fallback: bool,
}

fn default_dlc() -> u32 {
    DEFAULT_DLC
}

fn default_node() -> String {
    DEFAULT_NODE.to_string()
}

fn default_prefix() -> String {
    DEFAULT_MESSAGE_PREFIX.to_string()
}

fn default_true() -> bool {
    true
}

impl Default for ConverterConfig {
    fn default() -> Self {
        Self {
            default_dlc: DEFAULT_DLC,
            node_name: default_node(),
            message_name_prefix: default_prefix(),
            warn_on_numeric_fallback: true,
        }
    }
}

impl ConverterConfig {
    /// Create a new converter configuration with default settings
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder method: set the fallback DLC
    pub fn with_default_dlc(mut self, dlc: u32) -> Self {
        self.default_dlc = dlc;
        self
    }

    /// Builder method: set the sentinel node name
    pub fn with_node_name(mut self, name: impl Into<String>) -> Self {
        self.node_name = name.into();
        self
    }

    /// Builder method: set the message name prefix
    pub fn with_message_name_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.message_name_prefix = prefix.into();
        self
    }

    /// Builder method: enable or disable numeric fallback warnings
    pub fn with_numeric_fallback_warnings(mut self, enabled: bool) -> Self {
        self.warn_on_numeric_fallback = enabled;
        self
    }

    /// Synthesized name for a message ID
    pub fn message_name(&self, id: u32) -> String {
        format!("{}{}", self.message_name_prefix, id)
    }
}
