//! Handles and specs exchanged with a provisioning backend.

use std::collections::{BTreeMap, HashMap};
use std::fmt;

/// An isolated network allocated for one run.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct NetworkHandle {
    /// Backend-assigned identifier.
    pub id: String,
    pub name: String,
}

/// Role of a notification-server node in the topology.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeRole {
    /// Accepts submissions and fans them out to subscribed edges.
    Master,
    /// Subscribes upstream to the master and relays to listeners.
    Edge,
}

impl NodeRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            NodeRole::Master => "master",
            NodeRole::Edge => "edge",
        }
    }
}

impl fmt::Display for NodeRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What to start: image, name, network and environment.
#[derive(Debug, Clone)]
pub struct NodeSpec {
    pub image: String,
    pub name: String,
    pub role: NodeRole,
    pub network: NetworkHandle,
    pub env: BTreeMap<String, String>,
    pub labels: BTreeMap<String, String>,
}

impl NodeSpec {
    /// `KEY=VALUE` pairs in key order.
    pub fn env_pairs(&self) -> Vec<String> {
        self.env.iter().map(|(k, v)| format!("{k}={v}")).collect()
    }
}

/// A node started in the background on a network.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct NodeHandle {
    /// Backend-assigned identifier.
    pub id: String,
    pub name: String,
    pub role: NodeRole,
    pub network: NetworkHandle,
}

/// Point-in-time view of a node.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NodeInspection {
    pub running: bool,
    /// Backend status string (`created`, `running`, `exited`, ...).
    pub status: String,
    /// Network name to address within that network.
    pub addresses: HashMap<String, String>,
}
