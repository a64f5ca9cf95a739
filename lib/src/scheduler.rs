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

//! The apply scheduler (§4.F): drives the dependency graph (§4.D) to
//! completion over a worker pool (§4.E), yielding one result per concrete
//! item and detecting cycles by the residue left after the dispatch/reap
//! loop can make no further progress.
//!
//! Grounded on `original_source/src/blockwart/node.py::apply_items`: the
//! ready/pending partition and the dispatch-reap-idle loop mirror its
//! structure; cycle detection is the same "whatever's left over isn't
//! ready" check.

use std::collections::{HashMap, HashSet, VecDeque};

use thiserror::Error;
use tracing::{debug, error};

use crate::graph;
use crate::item::{ApplyOutcome, Item, StatusRecord};
use crate::pool::WorkerPool;

#[derive(Debug, Error, PartialEq, Eq, Clone)]
pub enum SchedulerError {
    #[error("dependency cycle among items: {items:?}")]
    CyclicDependency { items: Vec<String> },
}

/// One concrete item's apply result, tagged with its id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemResult {
    pub id: String,
    pub before: StatusRecord,
    pub after: StatusRecord,
}

/// Runs every item in `items` to completion, honoring dependency order.
///
/// `interactive=true` forces the effective worker count to 1 regardless of
/// `workers` (§5).
pub fn apply(
    items: Vec<Box<dyn Item>>,
    workers: usize,
    interactive: bool,
) -> Result<Vec<ItemResult>, crate::error::Error> {
    let workers = if interactive { 1 } else { workers };
    let pool: WorkerPool<ApplyOutcome> = WorkerPool::new(workers)?;
    let nodes = graph::build(items)?;

    let order_index: HashMap<String, usize> = nodes
        .iter()
        .enumerate()
        .map(|(i, n)| (n.id.clone(), i))
        .collect();
    let mut deps: HashMap<String, Vec<String>> =
        nodes.iter().map(|n| (n.id.clone(), n.working_deps.clone())).collect();
    let mut items_map: HashMap<String, Option<Box<dyn Item>>> =
        nodes.into_iter().map(|n| (n.id, n.item)).collect();

    let mut ready: VecDeque<String> = VecDeque::new();
    let mut pending: HashSet<String> = HashSet::new();
    let mut by_order: Vec<&String> = deps.keys().collect();
    by_order.sort_by_key(|id| order_index[*id]);
    for id in by_order {
        if deps[id].is_empty() {
            ready.push_back(id.clone());
        } else {
            pending.insert(id.clone());
        }
    }

    let mut results = Vec::new();

    let resolve_dependents = |completed: &str,
                               deps: &mut HashMap<String, Vec<String>>,
                               pending: &mut HashSet<String>,
                               ready: &mut VecDeque<String>| {
        let mut newly_ready: Vec<String> = Vec::new();
        for id in pending.iter().cloned().collect::<Vec<_>>() {
            let d = deps.get_mut(&id).expect("every pending id has a deps entry");
            d.retain(|dep| dep != completed);
            if d.is_empty() {
                newly_ready.push(id);
            }
        }
        newly_ready.sort_by_key(|id| order_index[id]);
        for id in newly_ready {
            pending.remove(&id);
            ready.push_back(id);
        }
    };

    loop {
        // Synthetic items resolve instantly: they produce no task and
        // consume no worker, per §3's "produce no result" rule.
        loop {
            let synthetic_idx = ready
                .iter()
                .position(|id| items_map.get(id).map(|item| item.is_none()).unwrap_or(false));
            let Some(idx) = synthetic_idx else { break };
            let id = ready.remove(idx).unwrap();
            debug!(id = %id, "resolved synthetic type-group item");
            resolve_dependents(&id, &mut deps, &mut pending, &mut ready);
        }

        if ready.is_empty() && pool.busy_count() == 0 && pool.reapable_count() == 0 {
            break;
        }

        let mut made_progress = false;

        while let Some(id) = ready.front().cloned() {
            match pool.get_idle_worker(false) {
                Some(worker) => {
                    ready.pop_front();
                    made_progress = true;
                    let item = items_map
                        .get_mut(&id)
                        .and_then(|slot| slot.take())
                        .expect("ready concrete item still owns its Item");
                    debug!(id = %id, "dispatching item");
                    pool.start_task(worker, id, move || item.apply(interactive));
                }
                None => break,
            }
        }

        while let Some(reaped) = pool.get_reapable_worker() {
            made_progress = true;
            let (id, outcome) = pool.reap(reaped);
            debug!(id = %id, "reaped item");
            resolve_dependents(&id, &mut deps, &mut pending, &mut ready);
            if let Some((before, after)) = outcome {
                results.push(ItemResult { id, before, after });
            }
        }

        if !made_progress && pool.busy_count() > 0 {
            pool.wait();
        }
    }

    if !pending.is_empty() {
        // Synthetic type-group items never resolve on their own (they have
        // no result to produce) and so are never "ready"; a same-type cycle
        // leaves them stuck in `pending` alongside the real cycle members.
        // They aren't part of the cycle itself (§3: synthetic items produce
        // no result and are filtered from scheduler output), so exclude them
        // from the reported residue.
        let mut remaining: Vec<String> = pending
            .into_iter()
            .filter(|id| items_map.get(id).map(|item| item.is_some()).unwrap_or(false))
            .collect();
        remaining.sort();
        error!(items = ?remaining, "dependency cycle detected");
        return Err(SchedulerError::CyclicDependency { items: remaining }.into());
    }

    Ok(results)
}
