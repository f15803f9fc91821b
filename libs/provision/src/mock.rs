//! In-memory provisioning backend with fault injection.

use std::collections::{BTreeMap, HashMap};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use tracing::debug;

use crate::{
    NetworkHandle, NodeHandle, NodeInspection, NodeRole, NodeSpec, ProvisionError, Provisioner,
};

/// A backend call that changed state, in the order it was made.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Operation {
    CreateNetwork(String),
    RemoveNetwork(String),
    CreateNode(String),
    StopNode(String),
    RemoveNode(String),
}

/// A failure to inject.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Fault {
    CreateNetwork,
    RemoveNetwork,
    /// The first `create_node` for this role fails.
    CreateNode(NodeRole),
    StopNode(NodeRole),
    RemoveNode(NodeRole),
    /// Nodes of this role never report running.
    NeverRunning(NodeRole),
    /// Nodes of this role run but expose no address on their network.
    NoAddress(NodeRole),
}

#[derive(Debug)]
struct MockNode {
    handle: NodeHandle,
    inspections: u32,
    stopped: bool,
}

#[derive(Debug, Default)]
struct MockState {
    networks: BTreeMap<String, NetworkHandle>,
    nodes: BTreeMap<String, MockNode>,
    operations: Vec<Operation>,
    faults: Vec<Fault>,
    /// Creation-time environment by node name, kept after removal.
    envs: BTreeMap<String, BTreeMap<String, String>>,
}

/// Provisioner that keeps everything in memory.
///
/// Mirrors the backend rules the harness depends on: a network with attached
/// nodes cannot be removed, and a node may need a few inspections before it
/// reports running.
pub struct MockProvisioner {
    state: Mutex<MockState>,
    id_counter: AtomicU64,
    address: String,
    startup_polls: u32,
}

impl MockProvisioner {
    /// Every node resolves to `127.0.0.1` and is running on first inspection.
    pub fn new() -> Self {
        Self {
            state: Mutex::new(MockState::default()),
            id_counter: AtomicU64::new(0),
            address: "127.0.0.1".to_string(),
            startup_polls: 0,
        }
    }

    pub fn with_fault(self, fault: Fault) -> Self {
        self.lock().faults.push(fault);
        self
    }

    /// Address reported for every node.
    pub fn with_address(mut self, address: impl Into<String>) -> Self {
        self.address = address.into();
        self
    }

    /// Number of inspections a node answers with "created" before "running".
    pub fn with_startup_polls(mut self, polls: u32) -> Self {
        self.startup_polls = polls;
        self
    }

    pub fn operations(&self) -> Vec<Operation> {
        self.lock().operations.clone()
    }

    pub fn live_networks(&self) -> Vec<String> {
        self.lock().networks.keys().cloned().collect()
    }

    pub fn live_nodes(&self) -> Vec<String> {
        self.lock()
            .nodes
            .values()
            .map(|node| node.handle.name.clone())
            .collect()
    }

    /// True once no network and no node is left.
    pub fn is_clean(&self) -> bool {
        let state = self.lock();
        state.networks.is_empty() && state.nodes.is_empty()
    }

    /// Environment a node was created with, even after it was removed.
    pub fn node_env(&self, name: &str) -> Option<BTreeMap<String, String>> {
        self.lock().envs.get(name).cloned()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, MockState> {
        // A poisoned lock only means another test thread panicked mid-call.
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn next_id(&self, kind: &str) -> String {
        let n = self.id_counter.fetch_add(1, Ordering::SeqCst);
        format!("{kind}-{n:012x}")
    }
}

impl Default for MockProvisioner {
    fn default() -> Self {
        Self::new()
    }
}

impl MockState {
    fn has_fault(&self, fault: Fault) -> bool {
        self.faults.contains(&fault)
    }

    /// Consumes a one-shot fault.
    fn take_fault(&mut self, fault: Fault) -> bool {
        match self.faults.iter().position(|f| *f == fault) {
            Some(index) => {
                self.faults.remove(index);
                true
            }
            None => false,
        }
    }
}

#[async_trait]
impl Provisioner for MockProvisioner {
    async fn create_network(
        &self,
        name: &str,
        _labels: &[(String, String)],
    ) -> Result<NetworkHandle, ProvisionError> {
        let id = self.next_id("net");
        let mut state = self.lock();
        if state.take_fault(Fault::CreateNetwork) {
            return Err(ProvisionError::operation("create network", name, "injected fault"));
        }
        if state.networks.contains_key(name) {
            return Err(ProvisionError::operation("create network", name, "already exists"));
        }

        let handle = NetworkHandle {
            id,
            name: name.to_string(),
        };
        state.networks.insert(name.to_string(), handle.clone());
        state.operations.push(Operation::CreateNetwork(name.to_string()));
        debug!(network = %name, "[MOCK] Network created");
        Ok(handle)
    }

    async fn remove_network(&self, network: &NetworkHandle) -> Result<(), ProvisionError> {
        let mut state = self.lock();
        state
            .operations
            .push(Operation::RemoveNetwork(network.name.clone()));
        if state.has_fault(Fault::RemoveNetwork) {
            return Err(ProvisionError::operation(
                "remove network",
                &network.name,
                "injected fault",
            ));
        }
        if state
            .nodes
            .values()
            .any(|node| node.handle.network.name == network.name)
        {
            return Err(ProvisionError::operation(
                "remove network",
                &network.name,
                "network has active endpoints",
            ));
        }
        state
            .networks
            .remove(&network.name)
            .map(|_| ())
            .ok_or_else(|| ProvisionError::NotFound {
                kind: "network",
                name: network.name.clone(),
            })
    }

    async fn create_node(&self, spec: &NodeSpec) -> Result<NodeHandle, ProvisionError> {
        let id = self.next_id("node");
        let mut state = self.lock();
        if state.take_fault(Fault::CreateNode(spec.role)) {
            return Err(ProvisionError::operation("create container", &spec.name, "injected fault"));
        }
        if !state.networks.contains_key(&spec.network.name) {
            return Err(ProvisionError::NotFound {
                kind: "network",
                name: spec.network.name.clone(),
            });
        }

        let handle = NodeHandle {
            id: id.clone(),
            name: spec.name.clone(),
            role: spec.role,
            network: spec.network.clone(),
        };
        state.envs.insert(spec.name.clone(), spec.env.clone());
        state.nodes.insert(
            id,
            MockNode {
                handle: handle.clone(),
                inspections: 0,
                stopped: false,
            },
        );
        state.operations.push(Operation::CreateNode(spec.name.clone()));
        debug!(node = %spec.name, role = %spec.role, "[MOCK] Node created");
        Ok(handle)
    }

    async fn stop_node(&self, node: &NodeHandle) -> Result<(), ProvisionError> {
        let mut state = self.lock();
        state.operations.push(Operation::StopNode(node.name.clone()));
        if state.has_fault(Fault::StopNode(node.role)) {
            return Err(ProvisionError::operation("stop container", &node.name, "injected fault"));
        }
        match state.nodes.get_mut(&node.id) {
            Some(entry) => {
                entry.stopped = true;
                Ok(())
            }
            None => Err(ProvisionError::NotFound {
                kind: "node",
                name: node.name.clone(),
            }),
        }
    }

    async fn remove_node(&self, node: &NodeHandle) -> Result<(), ProvisionError> {
        let mut state = self.lock();
        state.operations.push(Operation::RemoveNode(node.name.clone()));
        if state.has_fault(Fault::RemoveNode(node.role)) {
            return Err(ProvisionError::operation(
                "remove container",
                &node.name,
                "injected fault",
            ));
        }
        state
            .nodes
            .remove(&node.id)
            .map(|_| ())
            .ok_or_else(|| ProvisionError::NotFound {
                kind: "node",
                name: node.name.clone(),
            })
    }

    async fn inspect_node(&self, node: &NodeHandle) -> Result<NodeInspection, ProvisionError> {
        let startup_polls = self.startup_polls;
        let mut state = self.lock();
        let never_running = state.has_fault(Fault::NeverRunning(node.role));
        let no_address = state.has_fault(Fault::NoAddress(node.role));

        let entry = state
            .nodes
            .get_mut(&node.id)
            .ok_or_else(|| ProvisionError::NotFound {
                kind: "node",
                name: node.name.clone(),
            })?;
        entry.inspections += 1;

        let running = !entry.stopped && !never_running && entry.inspections > startup_polls;
        let status = if entry.stopped {
            "exited"
        } else if running {
            "running"
        } else {
            "created"
        };

        let mut addresses = HashMap::new();
        if running && !no_address {
            addresses.insert(entry.handle.network.name.clone(), self.address.clone());
        }

        Ok(NodeInspection {
            running,
            status: status.to_string(),
            addresses,
        })
    }
}
