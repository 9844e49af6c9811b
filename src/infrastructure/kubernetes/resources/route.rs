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

use super::naming::{devfiles_route_name, oci_route_name, service_name};
use super::traits::RegistryResourceBuilder;
use crate::domain::openshift::{Route, RoutePort, RouteSpec, RouteTargetReference, TlsConfig};
use crate::domain::registry::DevfileRegistry;
use crate::infrastructure::constants::*;
use crate::shared::error::Result;
use k8s_openapi::apimachinery::pkg::util::intstr::IntOrString;

/// The pair of Routes exposing a registry on route-capable platforms.
///
/// Both routes must end up on the same host: the devfiles route is built
/// first (possibly host-less, letting the router assign one) and the host it
/// receives is then passed to the OCI route.
pub struct RouteBuilder<'a> {
    registry: &'a DevfileRegistry,
}

impl RegistryResourceBuilder for RouteBuilder<'_> {
    fn registry(&self) -> &DevfileRegistry {
        self.registry
    }
}

impl<'a> RouteBuilder<'a> {
    pub fn new(registry: &'a DevfileRegistry) -> Self {
        Self { registry }
    }

    /// Route for the devfile index. `None` leaves the host to the platform.
    pub fn build_devfiles(&self, host: Option<&str>) -> Result<Route> {
        self.build_route(
            devfiles_route_name(&self.registry_name()),
            host,
            INDEX_PATH,
            INDEX_PORT_NAME,
        )
    }

    /// Route for the OCI registry API.
    pub fn build_oci(&self, host: Option<&str>) -> Result<Route> {
        self.build_route(
            oci_route_name(&self.registry_name()),
            host,
            OCI_PATH,
            OCI_PORT_NAME,
        )
    }

    fn build_route(
        &self,
        name: String,
        host: Option<&str>,
        path: &str,
        target_port: &str,
    ) -> Result<Route> {
        let spec = RouteSpec {
            host: host.filter(|h| !h.is_empty()).map(str::to_string),
            path: Some(path.to_string()),
            to: RouteTargetReference {
                kind: ROUTE_TARGET_KIND.to_string(),
                name: service_name(&self.registry_name()),
                weight: Some(ROUTE_TARGET_WEIGHT),
            },
            port: Some(RoutePort {
                target_port: IntOrString::String(target_port.to_string()),
            }),
            tls: self.tls_config(),
        };

        Ok(Route {
            metadata: self.object_meta(name)?,
            spec,
        })
    }

    fn tls_config(&self) -> Option<TlsConfig> {
        self.registry.is_tls_enabled().then(|| TlsConfig {
            termination: ROUTE_TLS_TERMINATION_EDGE.to_string(),
            insecure_edge_termination_policy: Some(ROUTE_INSECURE_POLICY_REDIRECT.to_string()),
        })
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

    #[test]
    fn devfiles_route_targets_index_port() {
        let cr = registry(DevfileRegistrySpec::default());
        let route = RouteBuilder::new(&cr).build_devfiles(None).unwrap();

        assert_eq!(route.metadata.name.as_deref(), Some("reg1-devfiles"));
        assert_eq!(route.spec.host, None);
        assert_eq!(route.spec.path.as_deref(), Some("/"));
        assert_eq!(route.spec.to.name, "reg1");
        assert_eq!(route.spec.to.weight, Some(100));
        assert_eq!(
            route.spec.port.map(|p| p.target_port),
            Some(IntOrString::String(INDEX_PORT_NAME.to_string()))
        );
        assert!(route.spec.tls.is_none());
    }

    #[test]
    fn oci_route_shares_given_host() {
        let cr = registry(DevfileRegistrySpec::default());
        let route = RouteBuilder::new(&cr)
            .build_oci(Some("reg1.apps.example.com"))
            .unwrap();

        assert_eq!(route.metadata.name.as_deref(), Some("reg1-oci"));
        assert_eq!(route.spec.host.as_deref(), Some("reg1.apps.example.com"));
        assert_eq!(route.spec.path.as_deref(), Some("/v2"));
        assert_eq!(
            route.spec.port.map(|p| p.target_port),
            Some(IntOrString::String(OCI_PORT_NAME.to_string()))
        );
    }

    #[test]
    fn empty_host_is_left_to_the_platform() {
        let cr = registry(DevfileRegistrySpec::default());
        let route = RouteBuilder::new(&cr).build_devfiles(Some("")).unwrap();
        assert_eq!(route.spec.host, None);
    }

    #[test]
    fn tls_uses_edge_termination() {
        let cr = registry(DevfileRegistrySpec {
            tls: TlsSpec {
                enabled: Some(true),
                secret_name: None,
            },
            ..Default::default()
        });
        let route = RouteBuilder::new(&cr).build_devfiles(None).unwrap();
        let tls = route.spec.tls.unwrap();
        assert_eq!(tls.termination, "edge");
        assert_eq!(tls.insecure_edge_termination_policy.as_deref(), Some("Redirect"));
    }

    #[test]
    fn routes_are_owned_by_the_registry() {
        let cr = registry(DevfileRegistrySpec::default());
        let route = RouteBuilder::new(&cr).build_oci(None).unwrap();
        let owners = route.metadata.owner_references.unwrap();
        assert_eq!(owners.len(), 1);
        assert_eq!(owners[0].uid, "uid-1");
    }
}
