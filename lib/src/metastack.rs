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

//! The ordered stack of named metadata layers (§4.B).
//!
//! Modeled on the teacher's `StackedConfig`/`ConfigLayer`
//! (`lib/src/config.rs`): layers are kept in an insertion-ordered map so that
//! re-setting an existing identifier cannot move it, and lookups fold over
//! the layers in that fixed order.

use indexmap::IndexMap;
use thiserror::Error;
use tracing::debug;

use crate::value::{deep_freeze, deep_merge, validate, value_at_path, Frozen, Path, Value, ValueError};

/// Errors raised at the metastack boundary itself, as distinct from
/// `ValueError`'s lower-level `value_at_path`/`validate` failures (§7).
#[derive(Debug, Error, PartialEq, Eq, Clone)]
pub enum MetastackError {
    /// `get_or_fail` found no layer with a value at the requested path.
    #[error("no value at path: {0}")]
    KeyNotFound(String),
}

/// An ordered stack of named metadata layers that composes into a single,
/// frozen view.
#[derive(Debug, Default, Clone)]
pub struct Metastack {
    layers: IndexMap<String, Value>,
}

impl Metastack {
    pub fn new() -> Self {
        Self {
            layers: IndexMap::new(),
        }
    }

    /// Validates `layer`, then inserts or replaces it at the position keyed
    /// by `identifier`. A fresh identifier is appended; an existing one keeps
    /// its original position (this is exactly `IndexMap::insert`'s
    /// behavior). Returns whether the stored value actually changed.
    ///
    /// Internal to the metadata-reactor driver; must not be exposed to
    /// user-supplied code (enforced by the caller, not by this type).
    pub fn set_layer(&mut self, identifier: impl Into<String>, layer: Value) -> Result<bool, ValueError> {
        validate(&layer)?;
        let identifier = identifier.into();
        let changed = self.layers.get(&identifier) != Some(&layer);
        debug!(identifier = %identifier, changed, "set_layer");
        self.layers.insert(identifier, layer);
        Ok(changed)
    }

    /// Iterates layers in insertion order, deep-merging every layer that has
    /// a value at `path` (earlier layers form the base, later layers
    /// overlay). Returns `default` if no layer had the path; see
    /// [`Metastack::get_or_fail`] for the failing variant.
    pub fn get(&self, path: impl Into<Path<'_>>, default: Value) -> Frozen {
        let path = path.into();
        match self.fold(path) {
            Some(value) => deep_freeze(&value),
            None => deep_freeze(&default),
        }
    }

    /// Like [`Metastack::get`], but fails with [`MetastackError::KeyNotFound`]
    /// instead of returning a default (§7).
    pub fn get_or_fail(&self, path: impl Into<Path<'_>>) -> Result<Frozen, MetastackError> {
        let path = path.into();
        self.fold(path)
            .map(|value| deep_freeze(&value))
            .ok_or_else(|| MetastackError::KeyNotFound(path_repr(path)))
    }

    pub fn has(&self, path: impl Into<Path<'_>>) -> bool {
        self.fold(path.into()).is_some()
    }

    /// The composed view as a (non-frozen) deep copy.
    pub fn as_dict(&self) -> Value {
        self.fold(Path::Segments(&[]))
            .unwrap_or_else(|| Value::map([]))
    }

    fn fold(&self, path: Path<'_>) -> Option<Value> {
        let mut result: Option<Value> = None;
        for layer in self.layers.values() {
            let Ok(found) = value_at_path(layer, path) else {
                continue;
            };
            result = Some(match result {
                None => found.clone(),
                Some(acc) => deep_merge(&acc, found),
            });
        }
        result
    }
}

fn path_repr(path: Path<'_>) -> String {
    match path {
        Path::Joined(s) => s.to_string(),
        Path::Segments(segs) => segs.join("/"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn map(entries: impl IntoIterator<Item = (&'static str, Value)>) -> Value {
        Value::map(entries.into_iter().map(|(k, v)| (k.to_string(), v)))
    }

    #[test]
    fn layer_override_scenario() {
        let mut stack = Metastack::new();
        stack
            .set_layer("base", map([("a", map([("x", Value::Int(1)), ("y", Value::Int(2))]))]))
            .unwrap();
        stack
            .set_layer("over", map([("a", map([("y", Value::Int(9))]))]))
            .unwrap();

        assert_eq!(
            stack.get("a", Value::Null).value(),
            &map([("x", Value::Int(1)), ("y", Value::Int(9))])
        );
        assert_eq!(stack.get("a/y", Value::Null).value(), &Value::Int(9));
        assert_eq!(stack.get("a/z", Value::Int(42)).value(), &Value::Int(42));
        assert!(stack.has("a/x"));
        assert!(!stack.has("b"));
    }

    #[test]
    fn empty_metastack_returns_default_and_has_is_false() {
        let stack = Metastack::new();
        assert_eq!(stack.get("anything", Value::Int(7)).value(), &Value::Int(7));
        assert!(!stack.has("anything"));
    }

    #[test]
    fn get_or_fail_surfaces_missing_path() {
        let stack = Metastack::new();
        assert_matches::assert_matches!(stack.get_or_fail("x"), Err(MetastackError::KeyNotFound(_)));
    }

    #[test]
    fn resetting_existing_identifier_is_a_noop_for_changed_and_order() {
        let mut stack = Metastack::new();
        stack.set_layer("a", map([("k", Value::Int(1))])).unwrap();
        stack.set_layer("b", map([("k", Value::Int(2))])).unwrap();
        let changed = stack
            .set_layer("a", map([("k", Value::Int(1))]))
            .unwrap();
        assert!(!changed);

        // `a` must still take precedence *below* `b`, i.e. it was not moved
        // to the end: overlay "b" should still win for shared keys.
        stack.set_layer("a", map([("k", Value::Int(3))])).unwrap();
        assert_eq!(stack.get("k", Value::Null).value(), &Value::Int(2));
    }

    #[test]
    fn set_layer_rejects_non_mapping_layer() {
        let mut stack = Metastack::new();
        assert_matches::assert_matches!(
            stack.set_layer("bad", Value::Int(1)),
            Err(ValueError::InvalidMetadata(_))
        );
    }

    #[test]
    fn path_splitting_equivalence() {
        let mut stack = Metastack::new();
        stack
            .set_layer("base", map([("a", map([("b", Value::Int(5))]))]))
            .unwrap();
        assert_eq!(
            stack.get("a/b", Value::Null).value(),
            stack.get(["a", "b"].as_slice(), Value::Null).value()
        );
    }

    #[test]
    fn as_dict_is_the_composed_view() {
        let mut stack = Metastack::new();
        stack.set_layer("base", map([("a", Value::Int(1))])).unwrap();
        stack.set_layer("over", map([("b", Value::Int(2))])).unwrap();
        assert_eq!(
            stack.as_dict(),
            map([("a", Value::Int(1)), ("b", Value::Int(2))])
        );
    }
}
