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

use super::naming::pvc_name;
use super::traits::RegistryResourceBuilder;
use crate::domain::config::RegistryDefaults;
use crate::domain::registry::DevfileRegistry;
use crate::infrastructure::constants::*;
use crate::shared::error::Result;
use k8s_openapi::api::core::v1::{
    EmptyDirVolumeSource, PersistentVolumeClaim, PersistentVolumeClaimSpec,
    PersistentVolumeClaimVolumeSource, Volume, VolumeResourceRequirements,
};
use k8s_openapi::apimachinery::pkg::api::resource::Quantity;
use std::collections::BTreeMap;

/// PersistentVolumeClaim backing the OCI registry storage.
pub struct VolumeClaimBuilder<'a> {
    registry: &'a DevfileRegistry,
    defaults: &'a RegistryDefaults,
}

impl RegistryResourceBuilder for VolumeClaimBuilder<'_> {
    fn registry(&self) -> &DevfileRegistry {
        self.registry
    }
}

impl<'a> VolumeClaimBuilder<'a> {
    pub fn new(registry: &'a DevfileRegistry, defaults: &'a RegistryDefaults) -> Self {
        Self { registry, defaults }
    }

    pub fn storage_size(&self) -> &str {
        self.registry
            .storage_size()
            .unwrap_or(&self.defaults.storage_size)
    }

    pub fn build(&self) -> Result<PersistentVolumeClaim> {
        let mut requests = BTreeMap::new();
        requests.insert(
            "storage".to_string(),
            Quantity(self.storage_size().to_string()),
        );

        Ok(PersistentVolumeClaim {
            metadata: self.object_meta(pvc_name(&self.registry_name()))?,
            spec: Some(PersistentVolumeClaimSpec {
                access_modes: Some(vec![DEFAULT_ACCESS_MODE.to_string()]),
                resources: Some(VolumeResourceRequirements {
                    requests: Some(requests),
                    ..Default::default()
                }),
                ..Default::default()
            }),
            ..Default::default()
        })
    }
}

/// Registry storage volume for the pod: the claim when storage is enabled,
/// an emptyDir otherwise.
pub fn registry_storage_volume(registry: &DevfileRegistry, registry_name: &str) -> Volume {
    if registry.is_storage_enabled() {
        Volume {
            name: VOLUME_NAME_REGISTRY_STORAGE.to_string(),
            persistent_volume_claim: Some(PersistentVolumeClaimVolumeSource {
                claim_name: pvc_name(registry_name),
                read_only: None,
            }),
            ..Default::default()
        }
    } else {
        Volume {
            name: VOLUME_NAME_REGISTRY_STORAGE.to_string(),
            empty_dir: Some(EmptyDirVolumeSource::default()),
            ..Default::default()
        }
    }
}
