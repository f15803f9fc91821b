//! Wire encodings.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::UnknownEncoding;

/// How a notification is laid out on the wire.
///
/// One run uses exactly one encoding for both the submission body and the
/// relayed frame.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WireEncoding {
    /// Compact binary document.
    #[default]
    Bson,
    /// Textual JSON object.
    Json,
}

impl WireEncoding {
    pub fn as_str(&self) -> &'static str {
        match self {
            WireEncoding::Bson => "bson",
            WireEncoding::Json => "json",
        }
    }

    /// Content type sent with a submission body.
    pub fn content_type(&self) -> &'static str {
        match self {
            WireEncoding::Bson => "application/bson",
            WireEncoding::Json => "application/json",
        }
    }
}

impl fmt::Display for WireEncoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for WireEncoding {
    type Err = UnknownEncoding;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "bson" => Ok(WireEncoding::Bson),
            "json" => Ok(WireEncoding::Json),
            other => Err(UnknownEncoding(other.to_string())),
        }
    }
}
