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

use super::naming::service_name;
use super::traits::RegistryResourceBuilder;
use crate::domain::registry::DevfileRegistry;
use crate::infrastructure::constants::*;
use crate::shared::error::KubeError;
use k8s_openapi::api::core::v1::{Service, ServicePort, ServiceSpec};
use k8s_openapi::apimachinery::pkg::util::intstr::IntOrString;

const REGISTRY_SERVICE_PORTS: &[(&str, i32)] = &[(INDEX_PORT_NAME, INDEX_PORT), (OCI_PORT_NAME, OCI_PORT)];

/// Service exposing the index server and the OCI registry.
pub struct ServiceBuilder<'a> {
    registry: &'a DevfileRegistry,
}

impl RegistryResourceBuilder for ServiceBuilder<'_> {
    fn registry(&self) -> &DevfileRegistry {
        self.registry
    }
}

impl<'a> ServiceBuilder<'a> {
    pub fn new(registry: &'a DevfileRegistry) -> Self {
        Self { registry }
    }

    pub fn build(&self) -> Result<Service, KubeError> {
        let ports = REGISTRY_SERVICE_PORTS
            .iter()
            .map(|(name, port)| self.create_service_port(name, *port))
            .collect();

        Ok(Service {
            metadata: self.object_meta(service_name(&self.registry_name()))?,
            spec: Some(ServiceSpec {
                ports: Some(ports),
                selector: Some(self.get_selector_labels()),
                ..Default::default()
            }),
            ..Default::default()
        })
    }

    fn create_service_port(&self, name: &str, port: i32) -> ServicePort {
        ServicePort {
            name: Some(name.to_string()),
            port,
            target_port: Some(IntOrString::Int(port)),
            protocol: Some("TCP".to_string()),
            ..Default::default()
        }
    }
}
