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

use super::naming::{labels_for_registry, owner_reference, registry_namespace};
use crate::domain::registry::DevfileRegistry;
use crate::shared::error::Result;
use k8s_openapi::apimachinery::pkg::apis::meta::v1::ObjectMeta;
use kube::ResourceExt;
use std::collections::BTreeMap;

/// Shared metadata handling for every object owned by a DevfileRegistry.
pub trait RegistryResourceBuilder {
    fn registry(&self) -> &DevfileRegistry;

    fn registry_name(&self) -> String {
        self.registry().name_any()
    }

    fn get_labels(&self) -> BTreeMap<String, String> {
        labels_for_registry(&self.registry_name())
    }

    fn get_selector_labels(&self) -> BTreeMap<String, String> {
        self.get_labels()
    }

    /// Name, namespace, labels and the controller owner reference.
    fn object_meta(&self, name: String) -> Result<ObjectMeta> {
        Ok(ObjectMeta {
            name: Some(name),
            namespace: Some(registry_namespace(self.registry())?),
            labels: Some(self.get_labels()),
            owner_references: Some(vec![owner_reference(self.registry())?]),
            ..Default::default()
        })
    }
}
