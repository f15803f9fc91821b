//! Docker Engine backend.

use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use bollard::container::{
    Config, CreateContainerOptions, InspectContainerOptions, RemoveContainerOptions,
    StartContainerOptions, StopContainerOptions,
};
use bollard::image::CreateImageOptions;
use bollard::network::{CreateNetworkOptions, InspectNetworkOptions};
use bollard::models::HostConfig;
use bollard::Docker;
use futures_util::TryStreamExt;
use tracing::{debug, info, warn};

use crate::{NetworkHandle, NodeHandle, NodeInspection, NodeSpec, ProvisionError, Provisioner};

/// Provisions bridge networks and containers on the local Docker daemon.
pub struct DockerProvisioner {
    docker: Docker,
    stop_grace: Duration,
}

impl DockerProvisioner {
    /// Connects using `DOCKER_HOST` or the platform default socket.
    pub fn connect(stop_grace: Duration) -> Result<Self, ProvisionError> {
        let docker = Docker::connect_with_local_defaults()
            .map_err(|e| ProvisionError::Unavailable(e.to_string()))?;
        Ok(Self { docker, stop_grace })
    }

    /// Pulls `image` unless it is already present locally.
    async fn ensure_image(&self, image: &str) -> Result<(), ProvisionError> {
        match self.docker.inspect_image(image).await {
            Ok(_) => return Ok(()),
            Err(e) if is_not_found(&e) => {}
            Err(e) => return Err(ProvisionError::operation("inspect image", image, e)),
        }

        info!(image = %image, "Pulling image");
        self.docker
            .create_image(
                Some(CreateImageOptions {
                    from_image: image.to_string(),
                    ..Default::default()
                }),
                None,
                None,
            )
            .try_collect::<Vec<_>>()
            .await
            .map_err(|e| ProvisionError::operation("pull image", image, e))?;
        Ok(())
    }
}

#[async_trait]
impl Provisioner for DockerProvisioner {
    async fn create_network(
        &self,
        name: &str,
        labels: &[(String, String)],
    ) -> Result<NetworkHandle, ProvisionError> {
        let options = CreateNetworkOptions {
            name: name.to_string(),
            driver: "bridge".to_string(),
            attachable: true,
            labels: labels.iter().cloned().collect::<HashMap<_, _>>(),
            ..Default::default()
        };
        self.docker
            .create_network(options)
            .await
            .map_err(|e| ProvisionError::operation("create network", name, e))?;

        // The create response shape differs across Engine API versions; the
        // inspect response always carries the ID.
        let network = self
            .docker
            .inspect_network(name, None::<InspectNetworkOptions<String>>)
            .await
            .map_err(|e| ProvisionError::operation("inspect network", name, e))?;

        let handle = NetworkHandle {
            id: network.id.unwrap_or_else(|| name.to_string()),
            name: name.to_string(),
        };
        debug!(network = %handle.name, id = %handle.id, "Docker network created");
        Ok(handle)
    }

    async fn remove_network(&self, network: &NetworkHandle) -> Result<(), ProvisionError> {
        self.docker
            .remove_network(&network.name)
            .await
            .map_err(|e| {
                if is_not_found(&e) {
                    ProvisionError::NotFound {
                        kind: "network",
                        name: network.name.clone(),
                    }
                } else {
                    ProvisionError::operation("remove network", &network.name, e)
                }
            })
    }

    async fn create_node(&self, spec: &NodeSpec) -> Result<NodeHandle, ProvisionError> {
        self.ensure_image(&spec.image).await?;

        let mut labels: HashMap<String, String> = spec.labels.clone().into_iter().collect();
        labels
            .entry("io.relaycheck.role".to_string())
            .or_insert_with(|| spec.role.to_string());

        let config = Config {
            image: Some(spec.image.clone()),
            env: Some(spec.env_pairs()),
            labels: Some(labels),
            host_config: Some(HostConfig {
                network_mode: Some(spec.network.name.clone()),
                ..Default::default()
            }),
            ..Default::default()
        };

        let created = self
            .docker
            .create_container(
                Some(CreateContainerOptions {
                    name: spec.name.clone(),
                    platform: None,
                }),
                config,
            )
            .await
            .map_err(|e| ProvisionError::operation("create container", &spec.name, e))?;

        let handle = NodeHandle {
            id: created.id,
            name: spec.name.clone(),
            role: spec.role,
            network: spec.network.clone(),
        };

        // The caller never sees a handle for a container that failed to start.
        if let Err(e) = self
            .docker
            .start_container(&handle.id, None::<StartContainerOptions<String>>)
            .await
        {
            let removal = self
                .docker
                .remove_container(
                    &handle.id,
                    Some(RemoveContainerOptions {
                        force: true,
                        v: true,
                        ..Default::default()
                    }),
                )
                .await;
            return Err(start_failure(&handle, e, removal));
        }

        debug!(node = %handle.name, id = %handle.id, role = %handle.role, "Docker container started");
        Ok(handle)
    }

    async fn stop_node(&self, node: &NodeHandle) -> Result<(), ProvisionError> {
        let options = StopContainerOptions {
            t: self.stop_grace.as_secs() as i64,
        };
        self.docker
            .stop_container(&node.id, Some(options))
            .await
            .map_err(|e| ProvisionError::operation("stop container", &node.name, e))
    }

    async fn remove_node(&self, node: &NodeHandle) -> Result<(), ProvisionError> {
        self.docker
            .remove_container(
                &node.id,
                Some(RemoveContainerOptions {
                    v: true,
                    force: true,
                    ..Default::default()
                }),
            )
            .await
            .map_err(|e| {
                if is_not_found(&e) {
                    ProvisionError::NotFound {
                        kind: "node",
                        name: node.name.clone(),
                    }
                } else {
                    ProvisionError::operation("remove container", &node.name, e)
                }
            })
    }

    async fn inspect_node(&self, node: &NodeHandle) -> Result<NodeInspection, ProvisionError> {
        let details = self
            .docker
            .inspect_container(&node.id, None::<InspectContainerOptions>)
            .await
            .map_err(|e| ProvisionError::operation("inspect container", &node.name, e))?;

        let (running, status) = details
            .state
            .map(|state| {
                (
                    state.running.unwrap_or(false),
                    state.status.map(|s| s.to_string()).unwrap_or_default(),
                )
            })
            .unwrap_or_default();

        let addresses = details
            .network_settings
            .and_then(|settings| settings.networks)
            .unwrap_or_default()
            .into_iter()
            .filter_map(|(network, endpoint)| {
                endpoint
                    .ip_address
                    .filter(|ip| !ip.is_empty())
                    .map(|ip| (network, ip))
            })
            .collect();

        Ok(NodeInspection {
            running,
            status,
            addresses,
        })
    }
}

/// Error for a container that was created but would not start.
///
/// Its ID is part of the error whenever the cleanup removal failed too,
/// because nothing else tracks that container.
fn start_failure(
    handle: &NodeHandle,
    start_err: bollard::errors::Error,
    removal: Result<(), bollard::errors::Error>,
) -> ProvisionError {
    let detail = match removal {
        Ok(()) => start_err.to_string(),
        Err(remove_err) => {
            warn!(
                node = %handle.name,
                id = %handle.id,
                error = %remove_err,
                "Failed to remove container that did not start"
            );
            format!(
                "{start_err}; container {} was left behind: {remove_err}",
                handle.id
            )
        }
    };
    ProvisionError::operation("start container", &handle.name, detail)
}

/// The Engine API answers 404 for missing images, containers and networks.
fn is_not_found(err: &bollard::errors::Error) -> bool {
    matches!(
        err,
        bollard::errors::Error::DockerResponseServerError {
            status_code: 404,
            ..
        }
    )
}
