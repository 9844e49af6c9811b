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

use crate::domain::openshift::Route;
use crate::domain::registry::DevfileRegistry;
use crate::infrastructure::constants::FIELD_MANAGER;
use crate::shared::error::KubeError;
use k8s_openapi::api::apps::v1::Deployment;
use k8s_openapi::api::core::v1::{PersistentVolumeClaim, Service};
use k8s_openapi::api::networking::v1::Ingress;
use k8s_openapi::NamespaceResourceScope;
use kube::api::{Patch, PatchParams, PostParams};
use kube::{Api, Client, Resource, ResourceExt};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fmt::Debug;

/// Cluster operations the reconciler needs.
///
/// `get_*` returns [`KubeError::NotFound`] for a missing object so callers
/// can tell "absent" apart from a failed read; `create_*` returns
/// [`KubeError::AlreadyExists`] when it loses a create race.
#[async_trait::async_trait]
pub trait RegistryKubeClient: Send + Sync {
    async fn get_registry(&self, namespace: &str, name: &str)
        -> Result<DevfileRegistry, KubeError>;

    async fn get_service(&self, namespace: &str, name: &str) -> Result<Service, KubeError>;

    async fn create_service(&self, service: &Service) -> Result<(), KubeError>;

    async fn get_pvc(
        &self,
        namespace: &str,
        name: &str,
    ) -> Result<PersistentVolumeClaim, KubeError>;

    async fn create_pvc(&self, pvc: &PersistentVolumeClaim) -> Result<(), KubeError>;

    async fn get_deployment(&self, namespace: &str, name: &str)
        -> Result<Deployment, KubeError>;

    async fn create_deployment(&self, deployment: &Deployment) -> Result<(), KubeError>;

    async fn get_route(&self, namespace: &str, name: &str) -> Result<Route, KubeError>;

    async fn create_route(&self, route: &Route) -> Result<(), KubeError>;

    async fn get_ingress(&self, namespace: &str, name: &str) -> Result<Ingress, KubeError>;

    async fn create_ingress(&self, ingress: &Ingress) -> Result<(), KubeError>;

    /// Writes `status.url`, failing with [`KubeError::Conflict`] if the
    /// registry changed since it was read.
    async fn update_registry_url(
        &self,
        registry: &DevfileRegistry,
        url: &str,
    ) -> Result<(), KubeError>;
}

pub struct RegistryKubeClientImpl {
    client: Client,
}

impl RegistryKubeClientImpl {
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    pub fn get_client(&self) -> Client {
        self.client.clone()
    }

    /// Builds a client from an explicit kubeconfig and/or context, falling
    /// back to in-cluster or default kubeconfig resolution when neither is set.
    pub async fn connect(
        kubeconfig_path: Option<String>,
        context: Option<String>,
    ) -> Result<Self, KubeError> {
        use kube::config::{KubeConfigOptions, Kubeconfig};

        if kubeconfig_path.is_none() && context.is_none() {
            let client = Client::try_default().await.map_err(|e| {
                KubeError::KubeError(format!("Failed to create Kubernetes client: {}", e))
            })?;
            return Ok(Self { client });
        }

        let kubeconfig = if let Some(path) = kubeconfig_path {
            Kubeconfig::read_from(path)
                .map_err(|e| KubeError::KubeError(format!("Failed to load kubeconfig: {}", e)))?
        } else {
            Kubeconfig::read()
                .map_err(|e| KubeError::KubeError(format!("Failed to load kubeconfig: {}", e)))?
        };

        let config_options = KubeConfigOptions {
            context,
            cluster: None,
            user: None,
        };

        let config = kube::Config::from_custom_kubeconfig(kubeconfig, &config_options)
            .await
            .map_err(|e| {
                KubeError::KubeError(format!("Failed to create Kubernetes config: {}", e))
            })?;

        let client = Client::try_from(config).map_err(|e| {
            KubeError::KubeError(format!("Failed to create Kubernetes client: {}", e))
        })?;

        Ok(Self { client })
    }

    async fn get_namespaced<K>(&self, kind: &str, namespace: &str, name: &str) -> Result<K, KubeError>
    where
        K: Resource<Scope = NamespaceResourceScope, DynamicType = ()>
            + Clone
            + DeserializeOwned
            + Debug,
    {
        let api: Api<K> = Api::namespaced(self.client.clone(), namespace);
        api.get(name).await.map_err(|e| {
            if let kube::Error::Api(ae) = e {
                if ae.code == 404 {
                    KubeError::not_found(kind, name, namespace)
                } else {
                    KubeError::KubeError(ae.message)
                }
            } else {
                KubeError::KubeError(e.to_string())
            }
        })
    }

    async fn create_namespaced<K>(&self, kind: &str, object: &K) -> Result<(), KubeError>
    where
        K: Resource<Scope = NamespaceResourceScope, DynamicType = ()>
            + Clone
            + DeserializeOwned
            + Serialize
            + Debug,
    {
        let name = object.name_any();
        let namespace = object.namespace().ok_or_else(|| {
            KubeError::InvalidResource(format!("{} '{}' has no namespace", kind, name))
        })?;

        let api: Api<K> = Api::namespaced(self.client.clone(), &namespace);
        let pp = PostParams::default();

        match api.create(&pp, object).await {
            Ok(_) => Ok(()),
            Err(kube::Error::Api(ae)) if ae.code == 409 => {
                Err(KubeError::already_exists(kind, name, namespace))
            }
            Err(e) => Err(KubeError::KubeError(e.to_string())),
        }
    }
}

#[async_trait::async_trait]
impl RegistryKubeClient for RegistryKubeClientImpl {
    async fn get_registry(
        &self,
        namespace: &str,
        name: &str,
    ) -> Result<DevfileRegistry, KubeError> {
        self.get_namespaced("DevfileRegistry", namespace, name).await
    }

    async fn get_service(&self, namespace: &str, name: &str) -> Result<Service, KubeError> {
        self.get_namespaced("Service", namespace, name).await
    }

    async fn create_service(&self, service: &Service) -> Result<(), KubeError> {
        self.create_namespaced("Service", service).await
    }

    async fn get_pvc(
        &self,
        namespace: &str,
        name: &str,
    ) -> Result<PersistentVolumeClaim, KubeError> {
        self.get_namespaced("PersistentVolumeClaim", namespace, name)
            .await
    }

    async fn create_pvc(&self, pvc: &PersistentVolumeClaim) -> Result<(), KubeError> {
        self.create_namespaced("PersistentVolumeClaim", pvc).await
    }

    async fn get_deployment(
        &self,
        namespace: &str,
        name: &str,
    ) -> Result<Deployment, KubeError> {
        self.get_namespaced("Deployment", namespace, name).await
    }

    async fn create_deployment(&self, deployment: &Deployment) -> Result<(), KubeError> {
        self.create_namespaced("Deployment", deployment).await
    }

    async fn get_route(&self, namespace: &str, name: &str) -> Result<Route, KubeError> {
        self.get_namespaced("Route", namespace, name).await
    }

    async fn create_route(&self, route: &Route) -> Result<(), KubeError> {
        self.create_namespaced("Route", route).await
    }

    async fn get_ingress(&self, namespace: &str, name: &str) -> Result<Ingress, KubeError> {
        self.get_namespaced("Ingress", namespace, name).await
    }

    async fn create_ingress(&self, ingress: &Ingress) -> Result<(), KubeError> {
        self.create_namespaced("Ingress", ingress).await
    }

    async fn update_registry_url(
        &self,
        registry: &DevfileRegistry,
        url: &str,
    ) -> Result<(), KubeError> {
        let name = registry.name_any();
        let namespace = registry.namespace().ok_or_else(|| {
            KubeError::InvalidResource(format!("DevfileRegistry '{}' has no namespace", name))
        })?;

        let api: Api<DevfileRegistry> = Api::namespaced(self.client.clone(), &namespace);
        let patch_params = PatchParams {
            field_manager: Some(FIELD_MANAGER.to_string()),
            ..Default::default()
        };

        // resourceVersion turns the merge patch into a conditional write.
        let mut patch = serde_json::json!({ "status": { "url": url } });
        if let Some(resource_version) = registry.resource_version() {
            patch["metadata"] = serde_json::json!({ "resourceVersion": resource_version });
        }

        match api
            .patch_status(&name, &patch_params, &Patch::Merge(&patch))
            .await
        {
            Ok(_) => Ok(()),
            Err(kube::Error::Api(ae)) if ae.code == 409 => {
                Err(KubeError::conflict("DevfileRegistry", name, namespace))
            }
            Err(e) => Err(KubeError::KubeError(e.to_string())),
        }
    }
}
