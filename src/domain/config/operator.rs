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

use crate::infrastructure::constants::*;
use crate::shared::error::KubeError;
use serde::{Deserialize, Serialize};
use std::fs::read_to_string;
use std::path::Path;
use std::time::Duration;

/// How the registry is exposed outside the cluster.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlatformKind {
    /// The cluster serves `route.openshift.io`; expose through two Routes.
    Route,
    /// Plain Kubernetes; expose through one Ingress.
    Generic,
}

impl PlatformKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            PlatformKind::Route => "route",
            PlatformKind::Generic => "generic",
        }
    }
}

/// Platform selection in the operator config file.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlatformSetting {
    #[default]
    Auto,
    Route,
    Generic,
}

impl PlatformSetting {
    pub fn as_str(&self) -> &'static str {
        match self {
            PlatformSetting::Auto => "auto",
            PlatformSetting::Route => "route",
            PlatformSetting::Generic => "generic",
        }
    }

    /// The pinned platform, or `None` when it has to be detected.
    pub fn pinned(&self) -> Option<PlatformKind> {
        match self {
            PlatformSetting::Auto => None,
            PlatformSetting::Route => Some(PlatformKind::Route),
            PlatformSetting::Generic => Some(PlatformKind::Generic),
        }
    }
}

impl std::str::FromStr for PlatformSetting {
    type Err = KubeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "auto" => Ok(PlatformSetting::Auto),
            "route" => Ok(PlatformSetting::Route),
            "generic" => Ok(PlatformSetting::Generic),
            _ => Err(KubeError::ConfigError(format!(
                "Invalid platform: {} (expected auto, route or generic)",
                s
            ))),
        }
    }
}

/// Values used when a DevfileRegistry leaves a field empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RegistryDefaults {
    pub index_image: String,
    pub registry_image: String,
    pub storage_size: String,
}

impl Default for RegistryDefaults {
    fn default() -> Self {
        Self {
            index_image: DEFAULT_INDEX_IMAGE.to_string(),
            registry_image: DEFAULT_REGISTRY_IMAGE.to_string(),
            storage_size: DEFAULT_STORAGE_SIZE.to_string(),
        }
    }
}

/// Operator configuration as read from `operator.toml`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OperatorConf {
    pub platform: PlatformSetting,
    pub host_discovery_requeue_secs: u64,
    pub error_requeue_secs: u64,
    pub defaults: RegistryDefaults,
}

impl Default for OperatorConf {
    fn default() -> Self {
        Self {
            platform: PlatformSetting::Auto,
            host_discovery_requeue_secs: HOST_DISCOVERY_REQUEUE_SECS,
            error_requeue_secs: ERROR_REQUEUE_SECS,
            defaults: RegistryDefaults::default(),
        }
    }
}

impl OperatorConf {
    /// Load configuration from a TOML file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, KubeError> {
        let path = path.as_ref();
        let content = read_to_string(path).map_err(|e| {
            KubeError::ConfigError(format!(
                "Failed to read config file {}: {}",
                path.display(),
                e
            ))
        })?;

        let conf: Self = toml::from_str(&content)?;
        Ok(conf)
    }

    pub fn validate(&self) -> Result<(), KubeError> {
        if self.defaults.index_image.trim().is_empty() {
            return Err(KubeError::ConfigError(
                "defaults.index_image must not be empty".to_string(),
            ));
        }

        if self.defaults.registry_image.trim().is_empty() {
            return Err(KubeError::ConfigError(
                "defaults.registry_image must not be empty".to_string(),
            ));
        }

        if self.defaults.storage_size.trim().is_empty() {
            return Err(KubeError::ConfigError(
                "defaults.storage_size must not be empty".to_string(),
            ));
        }

        if self.host_discovery_requeue_secs == 0 {
            return Err(KubeError::ConfigError(
                "host_discovery_requeue_secs must be > 0".to_string(),
            ));
        }

        if self.error_requeue_secs == 0 {
            return Err(KubeError::ConfigError(
                "error_requeue_secs must be > 0".to_string(),
            ));
        }

        Ok(())
    }

    /// Freeze the configuration once the platform is known.
    pub fn into_controller_config(self, platform: PlatformKind) -> ControllerConfig {
        ControllerConfig {
            platform,
            defaults: self.defaults,
            host_discovery_requeue: Duration::from_secs(self.host_discovery_requeue_secs),
            error_requeue: Duration::from_secs(self.error_requeue_secs),
        }
    }
}

/// Read-only configuration shared by every reconcile pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ControllerConfig {
    pub platform: PlatformKind,
    pub defaults: RegistryDefaults,
    pub host_discovery_requeue: Duration,
    pub error_requeue: Duration,
}

impl ControllerConfig {
    /// Built-in defaults for the given platform.
    pub fn new(platform: PlatformKind) -> Self {
        OperatorConf::default().into_controller_config(platform)
    }

    pub fn is_route_platform(&self) -> bool {
        self.platform == PlatformKind::Route
    }
}
