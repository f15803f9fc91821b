//! # relaycheck-id
//!
//! Typed identifiers for harness runs and the resources a run allocates.
//!
//! Every ID renders as `{prefix}_{ulid}`, for example
//! `run_01HV4Z2WQXKJNM8GPQY6VBKC3D`. The ULID keeps IDs unique across
//! concurrent runs on the same host, which matters because generated
//! network and container names are derived from the run ID.

mod macros;
mod types;

pub use types::*;

pub use ulid::Ulid;
