//! # relaycheck-component
//!
//! End-to-end harness for a master/edge notification topology.
//!
//! A run provisions an isolated network, a master node and one or more edge
//! nodes wired to it, subscribes a listener on every edge, submits a
//! notification to the master and checks that each listener receives an
//! equal one. Whatever happens, every allocated resource is released in
//! reverse order before the run reports.
//!
//! - [`Orchestrator`]: one run, start to teardown
//! - [`TopologyBuilder`]: ordered provisioning
//! - [`ProtocolDriver`]: submit, receive, compare
//! - [`ResourceLedger`]: reverse-order, failure-tolerant teardown
//! - [`AddressResolver`]: node addresses inside the run's network

pub mod orchestrator;

pub use config::{HarnessConfig, RemoteEndpoints};
pub use driver::ProtocolDriver;
pub use error::{HarnessError, TeardownError};
pub use lifecycle::{ResourceKind, ResourceLedger, ResourceState, TeardownReport};
pub use listener::Listener;
pub use orchestrator::{Orchestrator, RunReport};
pub use output::{ConsoleReporter, Phase, Reporter};
pub use resolver::AddressResolver;
pub use topology::{Topology, TopologyBuilder};
