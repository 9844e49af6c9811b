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

use super::naming::{ingress_name, service_name};
use super::traits::RegistryResourceBuilder;
use crate::domain::registry::DevfileRegistry;
use crate::infrastructure::constants::*;
use crate::shared::error::Result;
use k8s_openapi::api::networking::v1::{
    HTTPIngressPath, HTTPIngressRuleValue, Ingress, IngressBackend, IngressRule,
    IngressServiceBackend, IngressSpec, IngressTLS, ServiceBackendPort,
};

/// Ingress exposing the index under `/` and the OCI registry under `/v2`.
pub struct IngressBuilder<'a> {
    registry: &'a DevfileRegistry,
}

impl RegistryResourceBuilder for IngressBuilder<'_> {
    fn registry(&self) -> &DevfileRegistry {
        self.registry
    }
}

impl<'a> IngressBuilder<'a> {
    pub fn new(registry: &'a DevfileRegistry) -> Self {
        Self { registry }
    }

    /// An empty host produces a rule matching any host.
    pub fn build(&self, host: &str) -> Result<Ingress> {
        let host = Some(host.to_string()).filter(|h| !h.is_empty());

        let rule = IngressRule {
            host: host.clone(),
            http: Some(HTTPIngressRuleValue {
                paths: vec![
                    self.build_path(INDEX_PATH, INDEX_PORT),
                    self.build_path(OCI_PATH, OCI_PORT),
                ],
            }),
        };

        Ok(Ingress {
            metadata: self.object_meta(ingress_name(&self.registry_name()))?,
            spec: Some(IngressSpec {
                rules: Some(vec![rule]),
                tls: self.build_tls(host),
                ..Default::default()
            }),
            ..Default::default()
        })
    }

    fn build_path(&self, path: &str, port: i32) -> HTTPIngressPath {
        HTTPIngressPath {
            path: Some(path.to_string()),
            path_type: INGRESS_PATH_TYPE_PREFIX.to_string(),
            backend: IngressBackend {
                service: Some(IngressServiceBackend {
                    name: service_name(&self.registry_name()),
                    port: Some(ServiceBackendPort {
                        number: Some(port),
                        name: None,
                    }),
                }),
                resource: None,
            },
        }
    }

    fn build_tls(&self, host: Option<String>) -> Option<Vec<IngressTLS>> {
        if !self.registry.is_tls_enabled() {
            return None;
        }

        Some(vec![IngressTLS {
            hosts: host.map(|h| vec![h]),
            secret_name: self.registry.tls_secret_name().map(str::to_string),
        }])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::registry::{DevfileRegistrySpec, TlsSpec};

    fn registry(spec: DevfileRegistrySpec) -> DevfileRegistry {
        let mut cr = DevfileRegistry::new("reg1", spec);
        cr.metadata.namespace = Some("ns1".to_string());
        cr.metadata.uid = Some("uid-1".to_string());
        cr
    }

    fn paths(ingress: &Ingress) -> Vec<(String, i32)> {
        ingress
            .spec
            .as_ref()
            .and_then(|s| s.rules.as_ref())
            .map(|rules| {
                rules
                    .iter()
                    .flat_map(|r| r.http.iter().flat_map(|h| h.paths.iter()))
                    .map(|p| {
                        let port = p
                            .backend
                            .service
                            .as_ref()
                            .and_then(|s| s.port.as_ref())
                            .and_then(|port| port.number)
                            .unwrap_or_default();
                        (p.path.clone().unwrap_or_default(), port)
                    })
                    .collect()
            })
            .unwrap_or_default()
    }

    #[test]
    fn routes_index_and_oci_paths() {
        let cr = registry(DevfileRegistrySpec::default());
        let ingress = IngressBuilder::new(&cr).build("example.com").unwrap();

        assert_eq!(ingress.metadata.name.as_deref(), Some("reg1"));
        assert_eq!(
            paths(&ingress),
            vec![("/".to_string(), 8080), ("/v2".to_string(), 5000)]
        );

        let rules = ingress.spec.unwrap().rules.unwrap();
        assert_eq!(rules.len(), 1);
        assert_eq!(rules[0].host.as_deref(), Some("example.com"));
    }

    #[test]
    fn empty_host_matches_any_host() {
        let cr = registry(DevfileRegistrySpec::default());
        let ingress = IngressBuilder::new(&cr).build("").unwrap();
        let rules = ingress.spec.unwrap().rules.unwrap();
        assert_eq!(rules[0].host, None);
    }

    #[test]
    fn tls_references_secret() {
        let cr = registry(DevfileRegistrySpec {
            tls: TlsSpec {
                enabled: Some(true),
                secret_name: Some("reg1-tls".to_string()),
            },
            ..Default::default()
        });
        let ingress = IngressBuilder::new(&cr).build("example.com").unwrap();
        let tls = ingress.spec.unwrap().tls.unwrap();
        assert_eq!(tls[0].hosts, Some(vec!["example.com".to_string()]));
        assert_eq!(tls[0].secret_name.as_deref(), Some("reg1-tls"));
    }

    #[test]
    fn no_tls_block_when_disabled() {
        let cr = registry(DevfileRegistrySpec::default());
        let ingress = IngressBuilder::new(&cr).build("example.com").unwrap();
        assert!(ingress.spec.unwrap().tls.is_none());
    }
}
