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

//! DevfileRegistry resource and its reconciliation

pub mod crd;
pub mod outcome;
pub mod reconciler;

pub use self::crd::{
    DevfileRegistry, DevfileRegistrySpec, DevfileRegistryStatus, StorageSpec, TlsSpec,
};
pub use self::outcome::{EnsureOutcome, ReconcileAction, RouteHost};
pub use self::reconciler::{ingress_host, DevfileRegistryReconciler};
