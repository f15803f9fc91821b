//! # relaycheck-notification
//!
//! The payload a harness run pushes through the master and expects back from
//! an edge.
//!
//! A [`Notification`] is a target selector (attribute name to value) plus a
//! string message. It travels as either a BSON document or a JSON object with
//! the same two fields:
//!
//! ```text
//! { "target": { "cluster": "local", "customer": "ComponentTest" },
//!   "notification": "ComponentTest special message" }
//! ```
//!
//! Equality is defined on the canonical form (see [`Notification::canonical`]),
//! so the order in which target attributes were inserted never matters.

mod encoding;
mod error;
mod model;

pub use encoding::WireEncoding;
pub use error::{DecodeError, EncodeError, UnknownEncoding};
pub use model::{Notification, Target, DEFAULT_MESSAGE};
