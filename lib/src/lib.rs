// Copyright 2026 The Conform Authors
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
// https://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Core of the apply orchestrator: a dependency-ordered item scheduler
//! backed by a fixed-size worker pool, and the layered metadata store
//! (Metastack) that feeds it.
//!
//! Remote transport, bundle/group discovery, item-class implementations
//! beyond the two illustrative kinds in [`items`], repository loading, and
//! full CLI UX are external collaborators — see the `conform-cli` crate for
//! a thin binary wiring this core together.

pub mod aggregator;
pub mod error;
pub mod graph;
pub mod item;
pub mod items;
pub mod metastack;
pub mod mode;
pub mod pool;
pub mod runtime_config;
pub mod scheduler;
pub mod transport;
pub mod value;

pub use aggregator::{aggregate, AggregateCounts, AggregatorError};
pub use error::Error;
pub use graph::{GraphError, GraphNode};
pub use item::{ApplyOutcome, Item, ItemError, StatusRecord};
pub use items::{FileItem, PackageItem};
pub use metastack::{Metastack, MetastackError};
pub use mode::validate_mode;
pub use pool::{PoolError, WorkerPool};
pub use runtime_config::{CliOverrides, RuntimeConfig, RuntimeConfigError};
pub use scheduler::{apply, ItemResult, SchedulerError};
pub use transport::{shell_quote, RemoteTransport, RunResult};
pub use value::{deep_freeze, deep_merge, Frozen, Value, ValueError};
