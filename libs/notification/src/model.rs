//! The notification value type.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::{DecodeError, EncodeError};
use crate::WireEncoding;

/// Attribute selector identifying which listeners receive a notification.
///
/// Backed by a `BTreeMap` so serialization is always in key order.
pub type Target = BTreeMap<String, String>;

/// Message used when none is configured.
pub const DEFAULT_MESSAGE: &str = "ComponentTest special message";

/// A test payload: target selector plus message body.
///
/// Immutable once built. Crosses every wire boundary by value.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Notification {
    target: Target,
    #[serde(rename = "notification")]
    message: String,
}

impl Notification {
    pub fn new<K, V>(target: impl IntoIterator<Item = (K, V)>, message: impl Into<String>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            target: target
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
            message: message.into(),
        }
    }

    /// The selector used when none is configured.
    pub fn default_target() -> Target {
        Target::from([
            ("customer".to_string(), "ComponentTest".to_string()),
            ("cluster".to_string(), "local".to_string()),
        ])
    }

    pub fn target(&self) -> &Target {
        &self.target
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    /// Serializes to wire bytes under `encoding`.
    pub fn encode(&self, encoding: WireEncoding) -> Result<Vec<u8>, EncodeError> {
        let result = match encoding {
            WireEncoding::Bson => bson::to_vec(self).map_err(|e| e.to_string()),
            WireEncoding::Json => serde_json::to_vec(self).map_err(|e| e.to_string()),
        };
        result.map_err(|detail| EncodeError { encoding, detail })
    }

    /// Parses wire bytes produced under `encoding`.
    ///
    /// Unknown extra fields are ignored; a missing `target` or `notification`
    /// field is an error.
    pub fn decode(encoding: WireEncoding, bytes: &[u8]) -> Result<Self, DecodeError> {
        let result = match encoding {
            WireEncoding::Bson => bson::from_slice::<Self>(bytes).map_err(|e| e.to_string()),
            WireEncoding::Json => serde_json::from_slice::<Self>(bytes).map_err(|e| e.to_string()),
        };
        result.map_err(|detail| DecodeError { encoding, detail })
    }

    /// Canonical textual form: a JSON object with keys in sorted order at
    /// every level. Two notifications are equal iff these strings are equal.
    pub fn canonical(&self) -> String {
        serde_json::json!({
            "notification": self.message,
            "target": self.target,
        })
        .to_string()
    }

    pub fn equals(&self, other: &Notification) -> bool {
        self.canonical() == other.canonical()
    }

    /// Exact-match subscription: the selector must carry exactly the same
    /// attributes and values as this notification's target.
    pub fn matches(&self, selector: &Target) -> bool {
        &self.target == selector
    }
}

impl Default for Notification {
    fn default() -> Self {
        Self {
            target: Self::default_target(),
            message: DEFAULT_MESSAGE.to_string(),
        }
    }
}

impl PartialEq for Notification {
    fn eq(&self, other: &Self) -> bool {
        self.equals(other)
    }
}

impl Eq for Notification {}
