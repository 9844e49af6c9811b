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

//! Detection of the network exposure mechanism the cluster offers

use crate::domain::config::{PlatformKind, PlatformSetting};
use crate::infrastructure::constants::ROUTE_API_GROUP;
use crate::shared::error::KubeError;
use k8s_openapi::apimachinery::pkg::apis::meta::v1::APIGroupList;
use kube::Client;

/// Route platform when the cluster serves the OpenShift route API group.
pub fn platform_for_groups(groups: &APIGroupList) -> PlatformKind {
    if groups.groups.iter().any(|g| g.name == ROUTE_API_GROUP) {
        PlatformKind::Route
    } else {
        PlatformKind::Generic
    }
}

/// Query the API groups once. Failure is returned to the caller; there is
/// no retry here.
pub async fn detect_platform(client: &Client) -> Result<PlatformKind, KubeError> {
    let groups = client
        .list_api_groups()
        .await
        .map_err(|e| KubeError::KubeError(format!("API discovery failed: {}", e)))?;

    Ok(platform_for_groups(&groups))
}

/// Use the configured platform if pinned, otherwise detect it.
pub async fn resolve_platform(
    client: &Client,
    setting: PlatformSetting,
) -> Result<PlatformKind, KubeError> {
    if let Some(platform) = setting.pinned() {
        tracing::info!(platform = platform.as_str(), "Using configured platform");
        return Ok(platform);
    }

    let platform = detect_platform(client).await?;
    tracing::info!(platform = platform.as_str(), "Detected platform");
    Ok(platform)
}
