// Copyright 2025 JiangLong.
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use crate::domain::config::{ControllerConfig, PlatformKind};
use crate::domain::registry::crd::DevfileRegistry;
use crate::domain::registry::outcome::{EnsureOutcome, ReconcileAction, RouteHost};
use crate::infrastructure::kubernetes::client::RegistryKubeClient;
use crate::infrastructure::kubernetes::resources::naming::{
    deployment_name, devfiles_route_name, ingress_name, oci_route_name, pvc_name,
    registry_namespace, service_name,
};
use crate::infrastructure::kubernetes::resources::{
    DeploymentBuilder, IngressBuilder, RouteBuilder, ServiceBuilder, VolumeClaimBuilder,
};
use crate::shared::error::{KubeError, Result};
use kube::ResourceExt;
use std::future::Future;
use std::sync::Arc;
use tracing::{error, info, warn};

/// Host served by the ingress on generic platforms.
///
/// Derived from the resource alone, never assigned by the cluster. An empty
/// string means the ingress rule matches any host.
pub fn ingress_host(registry: &DevfileRegistry) -> String {
    registry.ingress_domain().unwrap_or_default().to_string()
}

/// Drives one DevfileRegistry towards its desired state.
///
/// Every step is get-or-create: objects that already exist are left as they
/// are, even if their spec no longer matches what the builders produce.
/// A pass can therefore be rerun from the top at any point.
#[derive(Clone)]
pub struct DevfileRegistryReconciler {
    client: Arc<dyn RegistryKubeClient>,
    config: Arc<ControllerConfig>,
}

impl DevfileRegistryReconciler {
    pub fn new(client: Arc<dyn RegistryKubeClient>, config: Arc<ControllerConfig>) -> Self {
        Self { client, config }
    }

    pub fn config(&self) -> &ControllerConfig {
        &self.config
    }

    pub async fn reconcile(&self, namespace: &str, name: &str) -> Result<ReconcileAction> {
        let registry = match self.client.get_registry(namespace, name).await {
            Ok(registry) => registry,
            Err(e) if e.is_not_found() => {
                // Children are garbage collected through their owner references.
                info!(
                    namespace = %namespace,
                    name = %name,
                    "DevfileRegistry resource not found. Ignoring since object must be deleted"
                );
                return Ok(ReconcileAction::Done);
            }
            Err(e) => {
                error!(namespace = %namespace, name = %name, error = %e, "Failed to get DevfileRegistry");
                return Err(e);
            }
        };

        self.reconcile_registry(&registry).await
    }

    pub async fn reconcile_registry(&self, registry: &DevfileRegistry) -> Result<ReconcileAction> {
        let mut outcomes = vec![self.ensure_service(registry).await?];

        if registry.is_storage_enabled() {
            outcomes.push(self.ensure_pvc(registry).await?);
        }

        outcomes.push(self.ensure_deployment(registry).await?);

        let hostname = match self.config.platform {
            PlatformKind::Route => match self.resolve_route_host(registry).await? {
                RouteHost::Ready(host) => {
                    outcomes.push(self.ensure_oci_route(registry, &host).await?);
                    host
                }
                RouteHost::NeedsHostDiscovery(after) => {
                    return Ok(ReconcileAction::Requeue(after));
                }
                RouteHost::Created => {
                    return Ok(ReconcileAction::Requeue(self.config.host_discovery_requeue));
                }
            },
            PlatformKind::Generic => {
                let host = ingress_host(registry);
                outcomes.push(self.ensure_ingress(registry, &host).await?);
                host
            }
        };

        if registry.status_url() != hostname {
            self.update_status_url(registry, &hostname).await?;
        }

        let created = outcomes
            .iter()
            .filter(|o| **o == EnsureOutcome::Created)
            .count();
        if created > 0 {
            info!(
                namespace = %registry.namespace().unwrap_or_default(),
                name = %registry.name_any(),
                created,
                "Created child objects"
            );
        }

        // A child that exists but cannot be read yet is checked again shortly.
        if outcomes.iter().any(EnsureOutcome::is_pending) {
            return Ok(ReconcileAction::Requeue(self.config.host_discovery_requeue));
        }

        Ok(ReconcileAction::Done)
    }

    pub async fn ensure_service(&self, registry: &DevfileRegistry) -> Result<EnsureOutcome> {
        let namespace = registry_namespace(registry)?;
        let name = service_name(&registry.name_any());

        let lookup = self.client.get_service(&namespace, &name).await;
        if self.found("Service", &namespace, &name, lookup)?.is_some() {
            return Ok(EnsureOutcome::Existing);
        }

        let service = ServiceBuilder::new(registry).build()?;
        self.create("Service", &namespace, &name, self.client.create_service(&service))
            .await
    }

    pub async fn ensure_pvc(&self, registry: &DevfileRegistry) -> Result<EnsureOutcome> {
        let namespace = registry_namespace(registry)?;
        let name = pvc_name(&registry.name_any());

        let lookup = self.client.get_pvc(&namespace, &name).await;
        if self
            .found("PersistentVolumeClaim", &namespace, &name, lookup)?
            .is_some()
        {
            return Ok(EnsureOutcome::Existing);
        }

        let pvc = VolumeClaimBuilder::new(registry, &self.config.defaults).build()?;
        self.create(
            "PersistentVolumeClaim",
            &namespace,
            &name,
            self.client.create_pvc(&pvc),
        )
        .await
    }

    pub async fn ensure_deployment(&self, registry: &DevfileRegistry) -> Result<EnsureOutcome> {
        let namespace = registry_namespace(registry)?;
        let name = deployment_name(&registry.name_any());

        let lookup = self.client.get_deployment(&namespace, &name).await;
        if self.found("Deployment", &namespace, &name, lookup)?.is_some() {
            return Ok(EnsureOutcome::Existing);
        }

        let deployment = DeploymentBuilder::new(registry, &self.config.defaults).build()?;
        self.create(
            "Deployment",
            &namespace,
            &name,
            self.client.create_deployment(&deployment),
        )
        .await
    }

    /// Route branch: the devfiles route decides the host the OCI route
    /// follows.
    pub async fn resolve_route_host(&self, registry: &DevfileRegistry) -> Result<RouteHost> {
        match self
            .ensure_devfiles_route(registry, registry.ingress_domain())
            .await?
        {
            RouteHost::Created => self.discover_route_host(registry).await,
            resolved => Ok(resolved),
        }
    }

    /// First phase of route exposure.
    ///
    /// Returns `Created` only when the route was created without a host, in
    /// which case [`Self::discover_route_host`] has to read back what the
    /// platform assigned.
    pub async fn ensure_devfiles_route(
        &self,
        registry: &DevfileRegistry,
        host: Option<&str>,
    ) -> Result<RouteHost> {
        let namespace = registry_namespace(registry)?;
        let name = devfiles_route_name(&registry.name_any());

        let lookup = self.client.get_route(&namespace, &name).await;
        if let Some(route) = self.found("Route", &namespace, &name, lookup)? {
            return Ok(match route.assigned_host().or(host) {
                Some(host) => RouteHost::Ready(host.to_string()),
                None => RouteHost::NeedsHostDiscovery(self.config.host_discovery_requeue),
            });
        }

        let route = RouteBuilder::new(registry).build_devfiles(host)?;
        let outcome = self
            .create("Route", &namespace, &name, self.client.create_route(&route))
            .await?;

        Ok(match (host, outcome) {
            (Some(host), _) => RouteHost::Ready(host.to_string()),
            (None, EnsureOutcome::Pending) => {
                RouteHost::NeedsHostDiscovery(self.config.host_discovery_requeue)
            }
            (None, _) => RouteHost::Created,
        })
    }

    /// Second phase: read the devfiles route back to learn its host.
    ///
    /// A route that is not visible yet, or has no host yet, is expected right
    /// after creation and yields `NeedsHostDiscovery` rather than an error.
    pub async fn discover_route_host(&self, registry: &DevfileRegistry) -> Result<RouteHost> {
        let namespace = registry_namespace(registry)?;
        let name = devfiles_route_name(&registry.name_any());
        let retry = RouteHost::NeedsHostDiscovery(self.config.host_discovery_requeue);

        match self.client.get_route(&namespace, &name).await {
            Ok(route) => match route.assigned_host() {
                Some(host) => Ok(RouteHost::Ready(host.to_string())),
                None => {
                    info!(namespace = %namespace, name = %name, "Route has no host assigned yet");
                    Ok(retry)
                }
            },
            Err(e) if e.is_not_found() => {
                warn!(namespace = %namespace, name = %name, "Route not registered yet, requeueing");
                Ok(retry)
            }
            Err(e) => {
                error!(namespace = %namespace, name = %name, error = %e, "Failed to get Route");
                Err(e)
            }
        }
    }

    pub async fn ensure_oci_route(
        &self,
        registry: &DevfileRegistry,
        host: &str,
    ) -> Result<EnsureOutcome> {
        let namespace = registry_namespace(registry)?;
        let name = oci_route_name(&registry.name_any());

        let lookup = self.client.get_route(&namespace, &name).await;
        if self.found("Route", &namespace, &name, lookup)?.is_some() {
            return Ok(EnsureOutcome::Existing);
        }

        let route = RouteBuilder::new(registry).build_oci(Some(host))?;
        self.create("Route", &namespace, &name, self.client.create_route(&route))
            .await
    }

    pub async fn ensure_ingress(
        &self,
        registry: &DevfileRegistry,
        host: &str,
    ) -> Result<EnsureOutcome> {
        let namespace = registry_namespace(registry)?;
        let name = ingress_name(&registry.name_any());

        let lookup = self.client.get_ingress(&namespace, &name).await;
        if self.found("Ingress", &namespace, &name, lookup)?.is_some() {
            return Ok(EnsureOutcome::Existing);
        }

        let ingress = IngressBuilder::new(registry).build(host)?;
        self.create("Ingress", &namespace, &name, self.client.create_ingress(&ingress))
            .await
    }

    async fn update_status_url(&self, registry: &DevfileRegistry, url: &str) -> Result<()> {
        info!(
            namespace = %registry.namespace().unwrap_or_default(),
            name = %registry.name_any(),
            url = %url,
            "Updating DevfileRegistry status"
        );

        self.client
            .update_registry_url(registry, url)
            .await
            .map_err(|e| {
                error!(
                    name = %registry.name_any(),
                    error = %e,
                    "Failed to update DevfileRegistry status"
                );
                e
            })
    }

    /// Existing object, `None` when absent, or the read error.
    fn found<T>(
        &self,
        kind: &str,
        namespace: &str,
        name: &str,
        lookup: std::result::Result<T, KubeError>,
    ) -> Result<Option<T>> {
        match lookup {
            Ok(object) => Ok(Some(object)),
            Err(e) if e.is_not_found() => Ok(None),
            Err(e) => {
                error!(kind, namespace = %namespace, name = %name, error = %e, "Failed to get {}", kind);
                Err(e)
            }
        }
    }

    async fn create(
        &self,
        kind: &str,
        namespace: &str,
        name: &str,
        create: impl Future<Output = Result<()>>,
    ) -> Result<EnsureOutcome> {
        info!(kind, namespace = %namespace, name = %name, "Creating a new {}", kind);

        match create.await {
            Ok(()) => Ok(EnsureOutcome::Created),
            Err(KubeError::AlreadyExists { .. }) => {
                warn!(kind, namespace = %namespace, name = %name, "{} exists but is not visible yet", kind);
                Ok(EnsureOutcome::Pending)
            }
            Err(e) => {
                error!(kind, namespace = %namespace, name = %name, error = %e, "Failed to create new {}", kind);
                Err(e)
            }
        }
    }
}
