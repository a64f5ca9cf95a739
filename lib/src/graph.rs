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

//! Dependency graph builder (§4.D): injects synthetic type-group items and
//! validates that every declared dependency resolves to something in the
//! final graph.
//!
//! Grounded on `original_source/src/blockwart/node.py::inject_dummy_items`
//! (the `DummyItem`/type-bucket construction is carried over near-verbatim
//! in shape) with the unknown-dependency check promoted to build time, per
//! Design Notes §9's Open Question 1.

use std::collections::{BTreeMap, BTreeSet};

use thiserror::Error;
use tracing::debug;

use crate::item::{type_group_id, Item};

#[derive(Debug, Error, PartialEq, Eq, Clone)]
pub enum GraphError {
    #[error("item {item:?} depends on unknown id {dep:?}")]
    UnknownDependency { item: String, dep: String },
}

/// One node of the built graph: either a concrete item or a synthetic
/// type-group item (`item: None`).
pub struct GraphNode {
    pub id: String,
    pub working_deps: Vec<String>,
    pub item: Option<Box<dyn Item>>,
}

impl GraphNode {
    pub fn is_synthetic(&self) -> bool {
        self.item.is_none()
    }
}

fn type_prefix(id: &str) -> &str {
    id.split_once(':').map(|(prefix, _)| prefix).unwrap_or(id)
}

/// Builds the full graph from a flat list of concrete items: computes each
/// item's `working_deps`, materializes one synthetic `"type:"` item per
/// referenced type, and rejects any dependency that resolves to neither a
/// concrete item nor a materialized type-group (`UnknownDependency`, fatal).
pub fn build(items: Vec<Box<dyn Item>>) -> Result<Vec<GraphNode>, GraphError> {
    let mut concrete: Vec<(String, Vec<String>)> = Vec::with_capacity(items.len());
    for item in &items {
        let mut deps = Vec::new();
        for dep in item.static_deps().iter().chain(item.user_deps()) {
            if !deps.contains(dep) {
                deps.push(dep.clone());
            }
        }
        concrete.push((item.id().to_string(), deps));
    }

    let mut types: BTreeSet<&str> = BTreeSet::new();
    for (id, deps) in &concrete {
        types.insert(type_prefix(id));
        for dep in deps {
            types.insert(type_prefix(dep));
        }
    }

    let mut members: BTreeMap<&str, Vec<String>> = types.iter().map(|t| (*t, Vec::new())).collect();
    for (id, _) in &concrete {
        members.get_mut(type_prefix(id)).unwrap().push(id.clone());
    }

    let known_ids: BTreeSet<String> = concrete
        .iter()
        .map(|(id, _)| id.clone())
        .chain(types.iter().map(|t| type_group_id(t)))
        .collect();

    for (id, deps) in &concrete {
        for dep in deps {
            if !known_ids.contains(dep) {
                return Err(GraphError::UnknownDependency {
                    item: id.clone(),
                    dep: dep.clone(),
                });
            }
        }
    }

    let mut nodes = Vec::with_capacity(types.len() + concrete.len());
    for t in &types {
        let id = type_group_id(t);
        let working_deps = members.remove(t).unwrap_or_default();
        debug!(type_group = %id, member_count = working_deps.len(), "materialized type-group item");
        nodes.push(GraphNode {
            id,
            working_deps,
            item: None,
        });
    }

    let mut items_iter = items.into_iter();
    for (id, deps) in concrete {
        let item = items_iter
            .next()
            .expect("concrete ids and items are built from the same iteration");
        nodes.push(GraphNode {
            id,
            working_deps: deps,
            item: Some(item),
        });
    }

    Ok(nodes)
}
