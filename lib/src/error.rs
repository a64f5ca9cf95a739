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

//! Top-level error type composing each subsystem's own error enum.
//!
//! Mirrors the teacher's practice of one `#[derive(Error)]` enum per
//! boundary (`ConfigLoadError`, `ConfigGetError`, `ConfigUpdateError` in
//! `lib/src/config.rs`) rather than a single flat error type; this enum just
//! wires those together for callers that cross subsystem boundaries (the
//! scheduler, the CLI).

use thiserror::Error;

use crate::aggregator::AggregatorError;
use crate::graph::GraphError;
use crate::item::ItemError;
use crate::metastack::MetastackError;
use crate::pool::PoolError;
use crate::scheduler::SchedulerError;
use crate::value::ValueError;

#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Value(#[from] ValueError),
    #[error(transparent)]
    Metastack(#[from] MetastackError),
    #[error(transparent)]
    Item(#[from] ItemError),
    #[error(transparent)]
    Graph(#[from] GraphError),
    #[error(transparent)]
    Pool(#[from] PoolError),
    #[error(transparent)]
    Scheduler(#[from] SchedulerError),
    #[error(transparent)]
    Aggregator(#[from] AggregatorError),
}
