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

//! Metadata value utilities: the tagged value type, deep merge, key-path
//! lookup, and deep-freeze (§4.A).

use std::fmt;

use indexmap::IndexMap;
use thiserror::Error;

/// A metadata value: a scalar, an ordered list, or a mapping from string
/// keys to further values.
///
/// Represented as a tagged sum type rather than a generic opaque value, per
/// Design Notes §9: freezing is then a recursive transform into a read-only
/// variant instead of a runtime type dance.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
    List(Vec<Value>),
    Map(IndexMap<String, Value>),
}

impl Value {
    pub fn map(entries: impl IntoIterator<Item = (String, Value)>) -> Self {
        Value::Map(entries.into_iter().collect())
    }

    pub fn as_map(&self) -> Option<&IndexMap<String, Value>> {
        match self {
            Value::Map(m) => Some(m),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            Value::Int(i) => Some(*i),
            _ => None,
        }
    }

    fn is_map(&self) -> bool {
        matches!(self, Value::Map(_))
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => write!(f, "null"),
            Value::Bool(b) => write!(f, "{b}"),
            Value::Int(i) => write!(f, "{i}"),
            Value::Float(x) => write!(f, "{x}"),
            Value::Str(s) => write!(f, "{s:?}"),
            Value::List(items) => {
                write!(f, "[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{item}")?;
                }
                write!(f, "]")
            }
            Value::Map(map) => {
                write!(f, "{{")?;
                for (i, (k, v)) in map.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{k:?}: {v}")?;
                }
                write!(f, "}}")
            }
        }
    }
}

/// Errors raised by the metadata value utilities.
#[derive(Debug, Error, PartialEq, Eq, Clone)]
pub enum ValueError {
    /// `value_at_path` descended through a missing key or a non-mapping.
    #[error("path not found: {0}")]
    PathNotFound(String),
    /// A layer failed `validate`: its root was not a mapping, or (structurally,
    /// since keys are always strings in this representation) it was otherwise
    /// malformed.
    #[error("invalid metadata layer: {0}")]
    InvalidMetadata(String),
    /// A mutation was attempted against a frozen, composed view.
    #[error("attempted to write to a frozen metastack view")]
    FrozenWriteAttempt,
}

/// A path into a [`Value`], given either as a pre-split slice of keys or as
/// a `/`-joined convenience string (the `/` splitter is a caller-interface
/// convenience only, per §4.A).
#[derive(Debug, Clone, Copy)]
pub enum Path<'a> {
    Segments(&'a [&'a str]),
    Joined(&'a str),
}

impl<'a> Path<'a> {
    fn segments(&self) -> Vec<&'a str> {
        match self {
            Path::Segments(segs) => segs.to_vec(),
            Path::Joined(s) => {
                if s.is_empty() {
                    Vec::new()
                } else {
                    s.split('/').collect()
                }
            }
        }
    }
}

impl<'a> From<&'a str> for Path<'a> {
    fn from(s: &'a str) -> Self {
        Path::Joined(s)
    }
}

impl<'a> From<&'a [&'a str]> for Path<'a> {
    fn from(segs: &'a [&'a str]) -> Self {
        Path::Segments(segs)
    }
}

impl<'a, const N: usize> From<&'a [&'a str; N]> for Path<'a> {
    fn from(segs: &'a [&'a str; N]) -> Self {
        Path::Segments(segs.as_slice())
    }
}

/// Descends `value` mapping by mapping along `path`.
pub fn value_at_path<'v>(value: &'v Value, path: impl Into<Path<'_>>) -> Result<&'v Value, ValueError> {
    let segments = path.into().segments();
    let mut current = value;
    for (depth, segment) in segments.iter().enumerate() {
        let map = current.as_map().ok_or_else(|| {
            ValueError::PathNotFound(segments[..=depth].join("/"))
        })?;
        current = map
            .get(*segment)
            .ok_or_else(|| ValueError::PathNotFound(segments[..=depth].join("/")))?;
    }
    Ok(current)
}

/// Recursively combines `base` and `overlay`.
///
/// - Mapping + mapping: union of keys, recursively merged on collision.
/// - List + list (or anything else): `overlay` wins outright; no element-wise
///   merge is ever performed (see Design Notes §9, Open Question 2).
pub fn deep_merge(base: &Value, overlay: &Value) -> Value {
    match (base, overlay) {
        (Value::Map(base_map), Value::Map(overlay_map)) => {
            let mut merged = base_map.clone();
            for (key, overlay_value) in overlay_map {
                match merged.get(key) {
                    Some(base_value) => {
                        let combined = deep_merge(base_value, overlay_value);
                        merged.insert(key.clone(), combined);
                    }
                    None => {
                        merged.insert(key.clone(), overlay_value.clone());
                    }
                }
            }
            Value::Map(merged)
        }
        (_, overlay) => overlay.clone(),
    }
}

/// Validates that `value` is a well-formed metadata value whose root is a
/// mapping. String-keyed maps are enforced by [`Value`]'s representation, so
/// the only structural check left is the root shape.
pub fn validate(value: &Value) -> Result<(), ValueError> {
    if !value.is_map() {
        return Err(ValueError::InvalidMetadata(
            "layer root must be a mapping".to_string(),
        ));
    }
    Ok(())
}

/// A structurally immutable snapshot of a composed [`Value`].
///
/// `Frozen` exposes only read accessors plus a [`Frozen::try_mutate`] escape
/// hatch that always fails with [`ValueError::FrozenWriteAttempt`], so that
/// callers attempting to mutate a composed view back into the layer stack get
/// a real, catchable error rather than a silently-ignored write.
#[derive(Debug, Clone, PartialEq)]
pub struct Frozen(Value);

impl Frozen {
    pub fn value(&self) -> &Value {
        &self.0
    }

    pub fn into_value(self) -> Value {
        self.0
    }

    /// Always fails: frozen views cannot be written back into.
    pub fn try_mutate(&mut self) -> Result<(), ValueError> {
        Err(ValueError::FrozenWriteAttempt)
    }
}

/// Returns a structurally immutable snapshot of `value`. Deep-copies so that
/// no nested node aliases the input.
pub fn deep_freeze(value: &Value) -> Frozen {
    Frozen(value.clone())
}
