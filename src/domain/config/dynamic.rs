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

//! `-D key=value` overrides for the operator configuration

use crate::domain::config::operator::OperatorConf;
use crate::shared::error::KubeError;
use std::collections::HashMap;

pub const KEY_PLATFORM: &str = "operator.platform";
pub const KEY_HOST_DISCOVERY_REQUEUE: &str = "operator.host-discovery-requeue-secs";
pub const KEY_ERROR_REQUEUE: &str = "operator.error-requeue-secs";
pub const KEY_INDEX_IMAGE: &str = "operator.defaults.index-image";
pub const KEY_REGISTRY_IMAGE: &str = "operator.defaults.registry-image";
pub const KEY_STORAGE_SIZE: &str = "operator.defaults.storage-size";

const KNOWN_KEYS: &[&str] = &[
    KEY_PLATFORM,
    KEY_HOST_DISCOVERY_REQUEUE,
    KEY_ERROR_REQUEUE,
    KEY_INDEX_IMAGE,
    KEY_REGISTRY_IMAGE,
    KEY_STORAGE_SIZE,
];

/// Parse dynamic configuration properties from -D key=value format
pub fn parse_dynamic_configs(configs: &[String]) -> Result<HashMap<String, String>, KubeError> {
    let mut map = HashMap::new();

    for config in configs {
        let (key, value) = config.split_once('=').ok_or_else(|| {
            KubeError::ConfigError(format!(
                "Invalid config format: '{}'. Expected 'key=value'",
                config
            ))
        })?;

        let key = key.trim();
        if key.is_empty() {
            return Err(KubeError::ConfigError(format!(
                "Empty key in config: '{}'",
                config
            )));
        }

        map.insert(key.to_string(), value.trim().to_string());
    }

    Ok(map)
}

pub fn apply_to_operator_conf(
    configs: &HashMap<String, String>,
    conf: &mut OperatorConf,
) -> Result<(), KubeError> {
    if let Some(unknown) = configs.keys().find(|k| !KNOWN_KEYS.contains(&k.as_str())) {
        return Err(KubeError::ConfigError(format!(
            "Unknown config key: {}",
            unknown
        )));
    }

    if let Some(platform) = configs.get(KEY_PLATFORM) {
        conf.platform = platform.parse()?;
    }

    if let Some(secs) = configs.get(KEY_HOST_DISCOVERY_REQUEUE) {
        conf.host_discovery_requeue_secs = parse_secs(KEY_HOST_DISCOVERY_REQUEUE, secs)?;
    }

    if let Some(secs) = configs.get(KEY_ERROR_REQUEUE) {
        conf.error_requeue_secs = parse_secs(KEY_ERROR_REQUEUE, secs)?;
    }

    if let Some(image) = configs.get(KEY_INDEX_IMAGE) {
        conf.defaults.index_image = image.clone();
    }

    if let Some(image) = configs.get(KEY_REGISTRY_IMAGE) {
        conf.defaults.registry_image = image.clone();
    }

    if let Some(size) = configs.get(KEY_STORAGE_SIZE) {
        conf.defaults.storage_size = size.clone();
    }

    Ok(())
}

fn parse_secs(key: &str, value: &str) -> Result<u64, KubeError> {
    value
        .parse::<u64>()
        .map_err(|e| KubeError::ConfigError(format!("Invalid value for {}: {}", key, e)))
}
