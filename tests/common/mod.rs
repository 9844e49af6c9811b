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

//! In-memory cluster backing the reconciler in integration tests

#![allow(dead_code)]

use devfile_registry_operator::domain::config::{ControllerConfig, PlatformKind};
use devfile_registry_operator::domain::openshift::Route;
use devfile_registry_operator::domain::registry::{
    DevfileRegistry, DevfileRegistryReconciler, DevfileRegistrySpec, DevfileRegistryStatus,
};
use devfile_registry_operator::{KubeError, RegistryKubeClient};
use k8s_openapi::api::apps::v1::Deployment;
use k8s_openapi::api::core::v1::{PersistentVolumeClaim, Service};
use k8s_openapi::api::networking::v1::Ingress;
use kube::ResourceExt;
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};

type Key = (String, String);

fn key(namespace: &str, name: &str) -> Key {
    (namespace.to_string(), name.to_string())
}

fn object_key<K: ResourceExt>(object: &K) -> Key {
    key(&object.namespace().unwrap_or_default(), &object.name_any())
}

#[derive(Default)]
struct State {
    registries: HashMap<Key, DevfileRegistry>,
    services: HashMap<Key, Service>,
    pvcs: HashMap<Key, PersistentVolumeClaim>,
    deployments: HashMap<Key, Deployment>,
    routes: HashMap<Key, Route>,
    ingresses: HashMap<Key, Ingress>,
    /// "Kind/name" for every successful create, in order.
    created: Vec<String>,
    status_updates: Vec<(String, String)>,
    /// Objects that exist but are not returned by reads yet.
    hidden: HashSet<(&'static str, Key)>,
    failing_reads: HashSet<&'static str>,
    conflict_on_status: bool,
    resource_version: u64,
}

/// Fake API server. When `router_domain` is set, routes created without a
/// host get `<route>-<namespace>.<router_domain>`, like an OpenShift router.
#[derive(Default)]
pub struct FakeCluster {
    state: Mutex<State>,
    router_domain: Option<String>,
    hide_on_create: HashSet<&'static str>,
}

impl FakeCluster {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_router(domain: &str) -> Self {
        Self {
            router_domain: Some(domain.to_string()),
            ..Self::default()
        }
    }

    /// Newly created objects of `kind` stay invisible to reads until
    /// [`Self::reveal_all`].
    pub fn hiding_new(mut self, kind: &'static str) -> Self {
        self.hide_on_create.insert(kind);
        self
    }

    pub fn add_registry(&self, registry: DevfileRegistry) {
        let mut state = self.state.lock().unwrap();
        state.registries.insert(object_key(&registry), registry);
    }

    pub fn registry(&self, namespace: &str, name: &str) -> Option<DevfileRegistry> {
        let state = self.state.lock().unwrap();
        state.registries.get(&key(namespace, name)).cloned()
    }

    pub fn update_registry_spec(
        &self,
        namespace: &str,
        name: &str,
        update: impl FnOnce(&mut DevfileRegistrySpec),
    ) {
        let mut state = self.state.lock().unwrap();
        let registry = state.registries.get_mut(&key(namespace, name)).unwrap();
        update(&mut registry.spec);
    }

    pub fn service(&self, namespace: &str, name: &str) -> Option<Service> {
        self.state.lock().unwrap().services.get(&key(namespace, name)).cloned()
    }

    pub fn pvc(&self, namespace: &str, name: &str) -> Option<PersistentVolumeClaim> {
        self.state.lock().unwrap().pvcs.get(&key(namespace, name)).cloned()
    }

    pub fn deployment(&self, namespace: &str, name: &str) -> Option<Deployment> {
        self.state.lock().unwrap().deployments.get(&key(namespace, name)).cloned()
    }

    pub fn route(&self, namespace: &str, name: &str) -> Option<Route> {
        self.state.lock().unwrap().routes.get(&key(namespace, name)).cloned()
    }

    pub fn ingress(&self, namespace: &str, name: &str) -> Option<Ingress> {
        self.state.lock().unwrap().ingresses.get(&key(namespace, name)).cloned()
    }

    pub fn created(&self) -> Vec<String> {
        self.state.lock().unwrap().created.clone()
    }

    pub fn status_updates(&self) -> Vec<(String, String)> {
        self.state.lock().unwrap().status_updates.clone()
    }

    pub fn reveal_all(&self) {
        self.state.lock().unwrap().hidden.clear();
    }

    /// Simulates the router assigning a host to an existing route.
    pub fn assign_route_host(&self, namespace: &str, name: &str, host: &str) {
        let mut state = self.state.lock().unwrap();
        let route = state.routes.get_mut(&key(namespace, name)).unwrap();
        route.spec.host = Some(host.to_string());
    }

    /// Reads of `kind` fail with a generic API error.
    pub fn fail_reads_of(&self, kind: &'static str) {
        self.state.lock().unwrap().failing_reads.insert(kind);
    }

    /// Status writes fail as if the registry changed since it was read.
    pub fn conflict_on_status(&self) {
        self.state.lock().unwrap().conflict_on_status = true;
    }

    fn read<T: Clone>(
        &self,
        kind: &'static str,
        namespace: &str,
        name: &str,
        select: impl FnOnce(&State) -> Option<&T>,
    ) -> Result<T, KubeError> {
        let state = self.state.lock().unwrap();
        if state.failing_reads.contains(kind) {
            return Err(KubeError::KubeError(format!("{} read failed", kind)));
        }
        if state.hidden.contains(&(kind, key(namespace, name))) {
            return Err(KubeError::not_found(kind, name, namespace));
        }
        select(&*state)
            .cloned()
            .ok_or_else(|| KubeError::not_found(kind, name, namespace))
    }

    fn write<T: Clone + ResourceExt>(
        &self,
        kind: &'static str,
        object: &T,
        select: impl FnOnce(&mut State) -> &mut HashMap<Key, T>,
    ) -> Result<(), KubeError> {
        let object_key = object_key(object);
        let mut state = self.state.lock().unwrap();
        let objects = select(&mut *state);
        if objects.contains_key(&object_key) {
            return Err(KubeError::already_exists(
                kind,
                object_key.1.clone(),
                object_key.0.clone(),
            ));
        }
        objects.insert(object_key.clone(), object.clone());
        state.created.push(format!("{}/{}", kind, object_key.1));
        if self.hide_on_create.contains(kind) {
            state.hidden.insert((kind, object_key));
        }
        Ok(())
    }
}

#[async_trait::async_trait]
impl RegistryKubeClient for FakeCluster {
    async fn get_registry(
        &self,
        namespace: &str,
        name: &str,
    ) -> Result<DevfileRegistry, KubeError> {
        self.read("DevfileRegistry", namespace, name, |s| {
            s.registries.get(&key(namespace, name))
        })
    }

    async fn get_service(&self, namespace: &str, name: &str) -> Result<Service, KubeError> {
        self.read("Service", namespace, name, |s| {
            s.services.get(&key(namespace, name))
        })
    }

    async fn create_service(&self, service: &Service) -> Result<(), KubeError> {
        self.write("Service", service, |s| &mut s.services)
    }

    async fn get_pvc(
        &self,
        namespace: &str,
        name: &str,
    ) -> Result<PersistentVolumeClaim, KubeError> {
        self.read("PersistentVolumeClaim", namespace, name, |s| {
            s.pvcs.get(&key(namespace, name))
        })
    }

    async fn create_pvc(&self, pvc: &PersistentVolumeClaim) -> Result<(), KubeError> {
        self.write("PersistentVolumeClaim", pvc, |s| &mut s.pvcs)
    }

    async fn get_deployment(
        &self,
        namespace: &str,
        name: &str,
    ) -> Result<Deployment, KubeError> {
        self.read("Deployment", namespace, name, |s| {
            s.deployments.get(&key(namespace, name))
        })
    }

    async fn create_deployment(&self, deployment: &Deployment) -> Result<(), KubeError> {
        self.write("Deployment", deployment, |s| &mut s.deployments)
    }

    async fn get_route(&self, namespace: &str, name: &str) -> Result<Route, KubeError> {
        self.read("Route", namespace, name, |s| {
            s.routes.get(&key(namespace, name))
        })
    }

    async fn create_route(&self, route: &Route) -> Result<(), KubeError> {
        let mut route = route.clone();
        let route_key = object_key(&route);
        if route.assigned_host().is_none() {
            if let Some(ref domain) = self.router_domain {
                route.spec.host = Some(format!("{}-{}.{}", route_key.1, route_key.0, domain));
            }
        }

        self.write("Route", &route, |s| &mut s.routes)
    }

    async fn get_ingress(&self, namespace: &str, name: &str) -> Result<Ingress, KubeError> {
        self.read("Ingress", namespace, name, |s| {
            s.ingresses.get(&key(namespace, name))
        })
    }

    async fn create_ingress(&self, ingress: &Ingress) -> Result<(), KubeError> {
        self.write("Ingress", ingress, |s| &mut s.ingresses)
    }

    async fn update_registry_url(
        &self,
        registry: &DevfileRegistry,
        url: &str,
    ) -> Result<(), KubeError> {
        let registry_key = object_key(registry);
        let mut state = self.state.lock().unwrap();
        if state.conflict_on_status {
            return Err(KubeError::conflict(
                "DevfileRegistry",
                registry_key.1,
                registry_key.0,
            ));
        }

        state.resource_version += 1;
        let resource_version = state.resource_version.to_string();
        if let Some(stored) = state.registries.get_mut(&registry_key) {
            stored.status = Some(DevfileRegistryStatus {
                url: url.to_string(),
            });
            stored.metadata.resource_version = Some(resource_version);
        }
        state
            .status_updates
            .push((registry_key.1, url.to_string()));
        Ok(())
    }
}

/// A registry as the API server would return it: namespaced, with a uid.
pub fn registry(namespace: &str, name: &str, spec: DevfileRegistrySpec) -> DevfileRegistry {
    let mut registry = DevfileRegistry::new(name, spec);
    registry.metadata.namespace = Some(namespace.to_string());
    registry.metadata.uid = Some(format!("uid-{}-{}", namespace, name));
    registry.metadata.resource_version = Some("1".to_string());
    registry
}

pub fn reconciler(cluster: &Arc<FakeCluster>, platform: PlatformKind) -> DevfileRegistryReconciler {
    let client: Arc<dyn RegistryKubeClient> = cluster.clone();
    DevfileRegistryReconciler::new(client, Arc::new(ControllerConfig::new(platform)))
}
