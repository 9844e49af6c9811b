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

//! Deterministic names, labels and ownership for a registry's child objects

use crate::domain::registry::DevfileRegistry;
use crate::infrastructure::constants::*;
use crate::shared::error::{KubeError, Result};
use k8s_openapi::apimachinery::pkg::apis::meta::v1::OwnerReference;
use kube::{Resource, ResourceExt};
use std::collections::BTreeMap;

// Deployment, Service, PVC and Ingress all reuse the CR name; the helpers
// keep callers from relying on that.

pub fn deployment_name(registry_name: &str) -> String {
    registry_name.to_string()
}

pub fn service_name(registry_name: &str) -> String {
    registry_name.to_string()
}

pub fn pvc_name(registry_name: &str) -> String {
    registry_name.to_string()
}

pub fn ingress_name(registry_name: &str) -> String {
    registry_name.to_string()
}

/// Route exposing the devfile index.
pub fn devfiles_route_name(registry_name: &str) -> String {
    format!("{}{}", registry_name, ROUTE_SUFFIX_DEVFILES)
}

/// Route exposing the OCI registry.
pub fn oci_route_name(registry_name: &str) -> String {
    format!("{}{}", registry_name, ROUTE_SUFFIX_OCI)
}

/// Labels selecting every object belonging to the named registry.
pub fn labels_for_registry(registry_name: &str) -> BTreeMap<String, String> {
    let mut labels = BTreeMap::new();
    labels.insert(LABEL_APP.to_string(), LABEL_APP_VALUE.to_string());
    labels.insert(LABEL_CR.to_string(), registry_name.to_string());
    labels
}

pub fn registry_namespace(registry: &DevfileRegistry) -> Result<String> {
    registry.namespace().ok_or_else(|| {
        KubeError::InvalidResource(format!(
            "DevfileRegistry '{}' has no namespace",
            registry.name_any()
        ))
    })
}

/// Controller owner reference pointing at the registry, so deleting it
/// cascades to every child.
pub fn owner_reference(registry: &DevfileRegistry) -> Result<OwnerReference> {
    let mut owner = registry.controller_owner_ref(&()).ok_or_else(|| {
        KubeError::InvalidResource(format!(
            "DevfileRegistry '{}' has no uid; cannot own child objects",
            registry.name_any()
        ))
    })?;
    // Foreground deletion of the registry waits for its children.
    owner.block_owner_deletion = Some(true);
    Ok(owner)
}
