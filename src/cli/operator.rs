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

//! Operator commands

use crate::domain::config::{
    apply_to_operator_conf, parse_dynamic_configs, OperatorConf, PlatformKind,
};
use crate::domain::openshift::Route;
use crate::domain::registry::{DevfileRegistry, DevfileRegistryReconciler, ReconcileAction};
use crate::infrastructure::kubernetes::{resolve_platform, RegistryKubeClientImpl};
use crate::shared::error::KubeError;
use clap::Parser;
use futures::StreamExt;
use k8s_openapi::api::apps::v1::Deployment;
use k8s_openapi::api::core::v1::{PersistentVolumeClaim, Service};
use k8s_openapi::api::networking::v1::Ingress;
use kube::runtime::controller::Action;
use kube::runtime::watcher::Config as WatcherConfig;
use kube::runtime::Controller;
use kube::{Api, Client, CustomResourceExt, Resource, ResourceExt};
use std::sync::Arc;

/// Environment variable consulted when `--config` is not given.
pub const CONF_FILE_ENV: &str = "DEVFILE_REGISTRY_OPERATOR_CONF";

#[derive(Parser, Debug, Clone)]
pub struct RunCommand {
    /// Path to the operator configuration file (operator.toml)
    /// If not provided, DEVFILE_REGISTRY_OPERATOR_CONF is used, then built-in defaults
    #[arg(long, value_name = "PATH")]
    pub config: Option<String>,

    /// Only watch DevfileRegistry resources in this namespace
    /// If not specified, all namespaces are watched
    #[arg(long, short = 'n')]
    pub namespace: Option<String>,

    /// Path to kubeconfig file
    /// If not specified, uses in-cluster config or default kubeconfig resolution
    #[arg(long)]
    pub kubeconfig: Option<String>,

    /// Kubernetes context to use
    #[arg(long)]
    pub context: Option<String>,

    /// Dynamic configuration properties to override any settings (-D key=value)
    ///
    /// Keys: operator.platform (auto|route|generic),
    /// operator.host-discovery-requeue-secs, operator.error-requeue-secs,
    /// operator.defaults.index-image, operator.defaults.registry-image,
    /// operator.defaults.storage-size
    ///
    /// Example: -Doperator.platform=generic -Doperator.defaults.storage-size=5Gi
    #[arg(short = 'D', value_name = "KEY=VALUE")]
    pub properties: Vec<String>,
}

impl RunCommand {
    /// Resolve the configuration: file (or env) first, then `-D` overrides.
    pub fn load_conf(&self) -> anyhow::Result<OperatorConf> {
        let mut conf = if let Some(ref path) = self.config {
            OperatorConf::from_file(path)?
        } else if let Ok(env_path) = std::env::var(CONF_FILE_ENV) {
            OperatorConf::from_file(&env_path)?
        } else {
            tracing::info!("No configuration file specified, using default settings");
            OperatorConf::default()
        };

        if !self.properties.is_empty() {
            let dynamic_configs = parse_dynamic_configs(&self.properties)
                .map_err(|e| anyhow::anyhow!("Failed to parse dynamic configs: {}", e))?;
            apply_to_operator_conf(&dynamic_configs, &mut conf)?;
        }

        conf.validate()?;
        Ok(conf)
    }

    pub async fn execute(&self) -> anyhow::Result<()> {
        let conf = self.load_conf()?;

        let kube_client =
            RegistryKubeClientImpl::connect(self.kubeconfig.clone(), self.context.clone()).await?;
        let client = kube_client.get_client();
        tracing::info!("Connected to Kubernetes cluster");

        let platform = resolve_platform(&client, conf.platform).await?;
        let config = Arc::new(conf.into_controller_config(platform));
        let reconciler = Arc::new(DevfileRegistryReconciler::new(Arc::new(kube_client), config));

        run_controller(client, self.namespace.as_deref(), reconciler).await;
        Ok(())
    }
}

fn api_for<K>(client: &Client, namespace: Option<&str>) -> Api<K>
where
    K: Resource<Scope = k8s_openapi::NamespaceResourceScope, DynamicType = ()>,
{
    match namespace {
        Some(ns) => Api::namespaced(client.clone(), ns),
        None => Api::all(client.clone()),
    }
}

/// Watch DevfileRegistry resources and the children they own until a
/// termination signal arrives.
pub async fn run_controller(
    client: Client,
    namespace: Option<&str>,
    reconciler: Arc<DevfileRegistryReconciler>,
) {
    tracing::info!(
        namespace = namespace.unwrap_or("*"),
        platform = reconciler.config().platform.as_str(),
        "Starting DevfileRegistry controller"
    );

    let registries: Api<DevfileRegistry> = api_for(&client, namespace);
    let controller = Controller::new(registries, WatcherConfig::default())
        .owns(api_for::<Service>(&client, namespace), WatcherConfig::default())
        .owns(
            api_for::<PersistentVolumeClaim>(&client, namespace),
            WatcherConfig::default(),
        )
        .owns(api_for::<Deployment>(&client, namespace), WatcherConfig::default());

    let controller = match reconciler.config().platform {
        PlatformKind::Route => {
            controller.owns(api_for::<Route>(&client, namespace), WatcherConfig::default())
        }
        PlatformKind::Generic => {
            controller.owns(api_for::<Ingress>(&client, namespace), WatcherConfig::default())
        }
    };

    controller
        .shutdown_on_signal()
        .run(reconcile, error_policy, reconciler)
        .for_each(|result| async move {
            match result {
                Ok((obj, action)) => {
                    tracing::debug!(
                        registry = %obj.name,
                        ?action,
                        "Reconciled DevfileRegistry"
                    );
                }
                Err(e) => {
                    tracing::error!(error = %e, "DevfileRegistry controller stream error");
                }
            }
        })
        .await;

    tracing::info!("DevfileRegistry controller stopped");
}

async fn reconcile(
    registry: Arc<DevfileRegistry>,
    reconciler: Arc<DevfileRegistryReconciler>,
) -> Result<Action, KubeError> {
    let name = registry.name_any();
    let namespace = registry.namespace().ok_or_else(|| {
        KubeError::InvalidResource(format!("DevfileRegistry '{}' has no namespace", name))
    })?;

    let action = match reconciler.reconcile(&namespace, &name).await? {
        ReconcileAction::Done => Action::await_change(),
        ReconcileAction::Requeue(after) => Action::requeue(after),
    };
    Ok(action)
}

fn error_policy(
    registry: Arc<DevfileRegistry>,
    error: &KubeError,
    reconciler: Arc<DevfileRegistryReconciler>,
) -> Action {
    tracing::error!(
        namespace = %registry.namespace().unwrap_or_default(),
        name = %registry.name_any(),
        error = %error,
        "DevfileRegistry reconciliation failed"
    );
    Action::requeue(reconciler.config().error_requeue)
}

#[derive(Parser, Debug, Clone)]
pub struct CrdCommand {}

impl CrdCommand {
    pub fn render() -> anyhow::Result<String> {
        Ok(serde_yaml::to_string(&DevfileRegistry::crd())?)
    }

    pub fn execute(&self) -> anyhow::Result<()> {
        print!("{}", Self::render()?);
        Ok(())
    }
}
