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

/// Default images
pub const DEFAULT_INDEX_IMAGE: &str = "quay.io/devfile/metadata-server:next";
pub const DEFAULT_REGISTRY_IMAGE: &str = "registry:2.7.1";

/// Storage defaults
pub const DEFAULT_STORAGE_SIZE: &str = "3Gi";
pub const DEFAULT_STORAGE_ENABLED: bool = true;
pub const DEFAULT_ACCESS_MODE: &str = "ReadWriteOnce";
pub const VOLUME_NAME_REGISTRY_STORAGE: &str = "devfile-registry-storage";
pub const REGISTRY_STORAGE_MOUNT_PATH: &str = "/var/lib/registry";

/// Ports
pub const INDEX_PORT_NAME: &str = "devfile-registry-metadata";
pub const INDEX_PORT: i32 = 8080;
pub const OCI_PORT_NAME: &str = "oci-registry";
pub const OCI_PORT: i32 = 5000;

/// Paths served through the route/ingress
pub const INDEX_PATH: &str = "/";
pub const OCI_PATH: &str = "/v2";
pub const INDEX_HEALTH_PATH: &str = "/devfiles/index.json";

/// Health check configuration
pub const PROBE_INITIAL_DELAY: i32 = 3;
pub const PROBE_PERIOD: i32 = 3;

/// Container names
pub const CONTAINER_NAME_INDEX: &str = "devfile-registry-bootstrap";
pub const CONTAINER_NAME_OCI: &str = "oci-registry";

/// Container resources (requests, limits)
pub const INDEX_CPU_REQUEST: &str = "100m";
pub const INDEX_MEMORY_REQUEST: &str = "64Mi";
pub const INDEX_CPU_LIMIT: &str = "250m";
pub const INDEX_MEMORY_LIMIT: &str = "128Mi";
pub const OCI_CPU_REQUEST: &str = "100m";
pub const OCI_MEMORY_REQUEST: &str = "64Mi";
pub const OCI_CPU_LIMIT: &str = "500m";
pub const OCI_MEMORY_LIMIT: &str = "256Mi";

/// Resource labels
pub const LABEL_APP: &str = "app";
pub const LABEL_APP_VALUE: &str = "devfileregistry";
pub const LABEL_CR: &str = "devfileregistry_cr";

/// Object name suffixes
pub const ROUTE_SUFFIX_DEVFILES: &str = "-devfiles";
pub const ROUTE_SUFFIX_OCI: &str = "-oci";

/// Route settings
pub const ROUTE_API_GROUP: &str = "route.openshift.io";
pub const ROUTE_TARGET_KIND: &str = "Service";
pub const ROUTE_TARGET_WEIGHT: i32 = 100;
pub const ROUTE_TLS_TERMINATION_EDGE: &str = "edge";
pub const ROUTE_INSECURE_POLICY_REDIRECT: &str = "Redirect";

/// Ingress settings
pub const INGRESS_PATH_TYPE_PREFIX: &str = "Prefix";

/// Deployment settings
pub const DEPLOYMENT_REPLICAS: i32 = 1;

/// Field manager used for status patches
pub const FIELD_MANAGER: &str = "devfile-registry-operator";

/// Requeue intervals (seconds)
pub const HOST_DISCOVERY_REQUEUE_SECS: u64 = 1;
pub const ERROR_REQUEUE_SECS: u64 = 30;
