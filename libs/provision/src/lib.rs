//! # relaycheck-provision
//!
//! The provisioning backend a harness run allocates its isolated network and
//! notification-server nodes from.
//!
//! - [`Provisioner`]: the backend contract (networks, nodes, inspection)
//! - [`DockerProvisioner`]: Docker Engine implementation over `bollard`
//! - [`MockProvisioner`]: in-memory implementation with fault injection, used
//!   by the harness's own tests

mod backend;
mod docker;
mod error;
mod mock;
mod types;

pub use backend::Provisioner;
pub use docker::DockerProvisioner;
pub use error::ProvisionError;
pub use mock::{Fault, MockProvisioner, Operation};
pub use types::{NetworkHandle, NodeHandle, NodeInspection, NodeRole, NodeSpec};

/// Label attached to every network and container, valued with the run ID.
pub const RUN_LABEL: &str = "io.relaycheck.run";
