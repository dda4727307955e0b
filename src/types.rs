//! Shared primitive aliases and enums.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Identifier of an ingested log source (usually its path).
pub type SourceId = String;
/// Station identifier text as extracted from a message.
pub type CallSign = String;

/// Band label used when a frequency falls outside every configured range.
pub const UNKNOWN_BAND: &str = "Unknown";

/// Whether the logging station transmitted or received the message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    /// Sent by the operator.
    Tx,
    /// Decoded from another station.
    Rx,
}

impl Direction {
    /// Text form used in the log file and the `direction` column.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Tx => "Tx",
            Self::Rx => "Rx",
        }
    }

    /// Parses the exact `Rx`/`Tx` token.
    pub fn from_token(token: &str) -> Option<Self> {
        match token {
            "Tx" => Some(Self::Tx),
            "Rx" => Some(Self::Rx),
            _ => None,
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
