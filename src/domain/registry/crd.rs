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

//! DevfileRegistry custom resource

use crate::infrastructure::constants::DEFAULT_STORAGE_ENABLED;
use kube::CustomResource;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Desired state of a devfile registry.
///
/// Empty strings are treated the same as absent fields, so the operator
/// falls back to its configured defaults for either.
#[derive(CustomResource, Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[kube(
    group = "registry.devfile.io",
    version = "v1alpha1",
    kind = "DevfileRegistry",
    plural = "devfileregistries",
    namespaced,
    status = "DevfileRegistryStatus",
    printcolumn = r#"{"name":"URL", "type":"string", "jsonPath":".status.url", "description":"The URL for the Devfile Registry"}"#
)]
#[serde(rename_all = "camelCase")]
pub struct DevfileRegistrySpec {
    /// Image serving the devfile index.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub index_image: Option<String>,

    /// Image of the OCI registry that stores devfile stacks.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub registry_image: Option<String>,

    #[serde(default)]
    pub storage: StorageSpec,

    #[serde(default)]
    pub tls: TlsSpec,

    /// Host used for the ingress, or a fixed host for routes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ingress_domain: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct StorageSpec {
    /// Back the OCI registry with a PersistentVolumeClaim. Defaults to true.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enabled: Option<bool>,

    /// Requested volume size, e.g. "3Gi".
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct TlsSpec {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enabled: Option<bool>,

    /// Secret holding the certificate for the ingress host.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub secret_name: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct DevfileRegistryStatus {
    #[serde(default)]
    pub url: String,
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.is_empty())
}

impl DevfileRegistry {
    pub fn index_image(&self) -> Option<&str> {
        non_empty(&self.spec.index_image)
    }

    pub fn registry_image(&self) -> Option<&str> {
        non_empty(&self.spec.registry_image)
    }

    pub fn storage_size(&self) -> Option<&str> {
        non_empty(&self.spec.storage.size)
    }

    pub fn ingress_domain(&self) -> Option<&str> {
        non_empty(&self.spec.ingress_domain)
    }

    pub fn tls_secret_name(&self) -> Option<&str> {
        non_empty(&self.spec.tls.secret_name)
    }

    /// Storage is on unless explicitly disabled.
    pub fn is_storage_enabled(&self) -> bool {
        self.spec.storage.enabled.unwrap_or(DEFAULT_STORAGE_ENABLED)
    }

    pub fn is_tls_enabled(&self) -> bool {
        self.spec.tls.enabled.unwrap_or(false)
    }

    /// The URL currently recorded in status, empty if none.
    pub fn status_url(&self) -> &str {
        self.status.as_ref().map(|s| s.url.as_str()).unwrap_or("")
    }
}
