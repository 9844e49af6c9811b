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

use std::time::Duration;

/// What the controller should do after a reconcile pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReconcileAction {
    /// Desired state reached; wait for the next change event.
    Done,
    /// Not an error, but the pass could not finish yet.
    Requeue(Duration),
}

/// Result of a single get-or-create step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnsureOutcome {
    Existing,
    Created,
    /// The read missed the object but the create was refused because it
    /// exists: it is not visible to reads yet.
    Pending,
}

impl EnsureOutcome {
    pub fn is_pending(&self) -> bool {
        matches!(self, Self::Pending)
    }
}

/// Progress of exposing the registry through routes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RouteHost {
    /// The devfiles route was just created without a host; the platform
    /// assigns one and it has to be read back.
    Created,
    /// The assigned host is not visible yet; try again after the delay.
    NeedsHostDiscovery(Duration),
    /// Both routes can be served under this host.
    Ready(String),
}
