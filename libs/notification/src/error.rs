//! Codec errors.

use thiserror::Error;

use crate::WireEncoding;

/// Bytes were not a well-formed notification under the active encoding.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("malformed {encoding} notification: {detail}")]
pub struct DecodeError {
    pub encoding: WireEncoding,
    pub detail: String,
}

/// A notification could not be serialized.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("failed to encode notification as {encoding}: {detail}")]
pub struct EncodeError {
    pub encoding: WireEncoding,
    pub detail: String,
}

/// An encoding name that is neither `bson` nor `json`.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("unknown wire encoding '{0}' (expected 'bson' or 'json')")]
pub struct UnknownEncoding(pub String);
