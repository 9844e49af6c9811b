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

use super::naming::deployment_name;
use super::traits::RegistryResourceBuilder;
use super::volume::registry_storage_volume;
use crate::domain::config::RegistryDefaults;
use crate::domain::registry::DevfileRegistry;
use crate::infrastructure::constants::*;
use crate::shared::error::Result;
use k8s_openapi::api::apps::v1::{Deployment, DeploymentSpec};
use k8s_openapi::api::core::v1::{
    Container, ContainerPort, HTTPGetAction, PodSpec, PodTemplateSpec, Probe,
    ResourceRequirements, VolumeMount,
};
use k8s_openapi::apimachinery::pkg::api::resource::Quantity;
use k8s_openapi::apimachinery::pkg::apis::meta::v1::{LabelSelector, ObjectMeta};
use k8s_openapi::apimachinery::pkg::util::intstr::IntOrString;
use std::collections::BTreeMap;

/// Single-replica Deployment running the index server next to the OCI registry.
pub struct DeploymentBuilder<'a> {
    registry: &'a DevfileRegistry,
    defaults: &'a RegistryDefaults,
}

impl RegistryResourceBuilder for DeploymentBuilder<'_> {
    fn registry(&self) -> &DevfileRegistry {
        self.registry
    }
}

impl<'a> DeploymentBuilder<'a> {
    pub fn new(registry: &'a DevfileRegistry, defaults: &'a RegistryDefaults) -> Self {
        Self { registry, defaults }
    }

    pub fn index_image(&self) -> &str {
        self.registry
            .index_image()
            .unwrap_or(&self.defaults.index_image)
    }

    pub fn registry_image(&self) -> &str {
        self.registry
            .registry_image()
            .unwrap_or(&self.defaults.registry_image)
    }

    pub fn build(&self) -> Result<Deployment> {
        let registry_name = self.registry_name();

        Ok(Deployment {
            metadata: self.object_meta(deployment_name(&registry_name))?,
            spec: Some(DeploymentSpec {
                replicas: Some(DEPLOYMENT_REPLICAS),
                selector: LabelSelector {
                    match_labels: Some(self.get_selector_labels()),
                    ..Default::default()
                },
                template: PodTemplateSpec {
                    metadata: Some(ObjectMeta {
                        labels: Some(self.get_labels()),
                        ..Default::default()
                    }),
                    spec: Some(PodSpec {
                        containers: vec![self.build_index_container(), self.build_oci_container()],
                        volumes: Some(vec![registry_storage_volume(
                            self.registry,
                            &registry_name,
                        )]),
                        ..Default::default()
                    }),
                },
                ..Default::default()
            }),
            ..Default::default()
        })
    }

    fn build_index_container(&self) -> Container {
        Container {
            name: CONTAINER_NAME_INDEX.to_string(),
            image: Some(self.index_image().to_string()),
            ports: Some(vec![ContainerPort {
                container_port: INDEX_PORT,
                ..Default::default()
            }]),
            resources: Some(resource_requirements(
                (INDEX_CPU_REQUEST, INDEX_MEMORY_REQUEST),
                (INDEX_CPU_LIMIT, INDEX_MEMORY_LIMIT),
            )),
            liveness_probe: Some(index_probe()),
            readiness_probe: Some(index_probe()),
            ..Default::default()
        }
    }

    fn build_oci_container(&self) -> Container {
        Container {
            name: CONTAINER_NAME_OCI.to_string(),
            image: Some(self.registry_image().to_string()),
            ports: Some(vec![ContainerPort {
                container_port: OCI_PORT,
                ..Default::default()
            }]),
            resources: Some(resource_requirements(
                (OCI_CPU_REQUEST, OCI_MEMORY_REQUEST),
                (OCI_CPU_LIMIT, OCI_MEMORY_LIMIT),
            )),
            volume_mounts: Some(vec![VolumeMount {
                name: VOLUME_NAME_REGISTRY_STORAGE.to_string(),
                mount_path: REGISTRY_STORAGE_MOUNT_PATH.to_string(),
                ..Default::default()
            }]),
            ..Default::default()
        }
    }
}

fn index_probe() -> Probe {
    Probe {
        http_get: Some(HTTPGetAction {
            path: Some(INDEX_HEALTH_PATH.to_string()),
            port: IntOrString::Int(INDEX_PORT),
            ..Default::default()
        }),
        initial_delay_seconds: Some(PROBE_INITIAL_DELAY),
        period_seconds: Some(PROBE_PERIOD),
        ..Default::default()
    }
}

/// (cpu, memory) requests and limits.
fn resource_requirements(requests: (&str, &str), limits: (&str, &str)) -> ResourceRequirements {
    let quantities = |(cpu, memory): (&str, &str)| {
        let mut map = BTreeMap::new();
        map.insert("cpu".to_string(), Quantity(cpu.to_string()));
        map.insert("memory".to_string(), Quantity(memory.to_string()));
        map
    };

    ResourceRequirements {
        requests: Some(quantities(requests)),
        limits: Some(quantities(limits)),
        ..Default::default()
    }
}
