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

// CLI command definitions

use super::operator::{CrdCommand, RunCommand};
use clap::Parser;

#[derive(Parser, Debug)]
#[command(
    name = "devfile-registry-operator",
    version,
    about = "Kubernetes operator for devfile registries",
    long_about = "Watches DevfileRegistry resources and deploys the devfile index and OCI registry behind a Route or an Ingress"
)]
pub struct CliArgs {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(clap::Subcommand, Debug)]
pub enum Commands {
    /// Run the controller until interrupted
    Run(RunCommand),

    /// Print the DevfileRegistry CustomResourceDefinition as YAML
    Crd(CrdCommand),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_run_with_overrides() {
        let args = CliArgs::try_parse_from([
            "devfile-registry-operator",
            "run",
            "-n",
            "ns1",
            "-Doperator.platform=generic",
            "-D",
            "operator.error-requeue-secs=10",
        ])
        .unwrap();

        match args.command {
            Commands::Run(cmd) => {
                assert_eq!(cmd.namespace.as_deref(), Some("ns1"));
                assert_eq!(
                    cmd.properties,
                    vec![
                        "operator.platform=generic".to_string(),
                        "operator.error-requeue-secs=10".to_string()
                    ]
                );
                assert!(cmd.config.is_none());
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn parses_crd() {
        let args = CliArgs::try_parse_from(["devfile-registry-operator", "crd"]).unwrap();
        assert!(matches!(args.command, Commands::Crd(_)));
    }
}
