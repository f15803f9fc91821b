//! Provisioning backend interface.

use async_trait::async_trait;

use crate::{NetworkHandle, NodeHandle, NodeInspection, NodeSpec, ProvisionError};

/// Creates, inspects and destroys the networks and nodes of a run.
///
/// Nodes start detached: `create_node` returns as soon as the backend has
/// accepted the node, which may not be running yet.
#[async_trait]
pub trait Provisioner: Send + Sync {
    async fn create_network(
        &self,
        name: &str,
        labels: &[(String, String)],
    ) -> Result<NetworkHandle, ProvisionError>;

    /// Fails while nodes are still attached.
    async fn remove_network(&self, network: &NetworkHandle) -> Result<(), ProvisionError>;

    async fn create_node(&self, spec: &NodeSpec) -> Result<NodeHandle, ProvisionError>;

    async fn stop_node(&self, node: &NodeHandle) -> Result<(), ProvisionError>;

    async fn remove_node(&self, node: &NodeHandle) -> Result<(), ProvisionError>;

    async fn inspect_node(&self, node: &NodeHandle) -> Result<NodeInspection, ProvisionError>;
}
