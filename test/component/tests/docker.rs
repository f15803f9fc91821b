//! Full run against real containers.
//!
//! Needs a Docker daemon and `RELAYCHECK_IMAGE` naming a notification server
//! image. Run with `cargo test -p relaycheck-component --test docker -- --ignored`.

use std::sync::Arc;

use relaycheck_component::{ConsoleReporter, HarnessConfig, Orchestrator};
use relaycheck_provision::DockerProvisioner;

#[tokio::test]
#[ignore = "requires Docker and RELAYCHECK_IMAGE"]
async fn test_docker_topology_relays_notification() {
    let config = HarnessConfig::from_env().unwrap();
    assert!(config.image.is_some(), "RELAYCHECK_IMAGE must be set");
    let provisioner = Arc::new(DockerProvisioner::connect(config.stop_grace).unwrap());

    let report = Orchestrator::new(config, Some(provisioner), Arc::new(ConsoleReporter))
        .run()
        .await;

    assert!(report.passed(), "run failed: {:?}", report.outcome);
    assert!(report.teardown.is_clean(), "{:?}", report.teardown.failures);
}
