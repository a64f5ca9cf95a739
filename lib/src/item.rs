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

//! The item contract every configuration item satisfies (§4.C), plus the
//! before/after status record it returns from `apply`.

use std::fmt;

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq, Clone)]
pub enum ItemError {
    /// An item id did not match `^[a-z]+:[^:]*$` (§6).
    #[error("invalid item id {0:?}: must match ^[a-z]+:[^:]*$")]
    InvalidId(String),
    /// An attribute failed an item-specific validator (§6), e.g. the mode
    /// string validator.
    #[error("invalid attribute for {item_id}: {message}")]
    InvalidAttribute { item_id: String, message: String },
}

/// Before/after snapshot an item emits from `apply`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusRecord {
    pub correct: bool,
    pub fixable: bool,
    pub aborted: bool,
    /// Free-form diagnostic text, used for logging and test assertions
    /// (SPEC_FULL.md §3.1).
    pub details: String,
}

impl StatusRecord {
    pub fn correct(details: impl Into<String>) -> Self {
        Self {
            correct: true,
            fixable: true,
            aborted: false,
            details: details.into(),
        }
    }

    pub fn fixed(details: impl Into<String>) -> Self {
        Self {
            correct: false,
            fixable: true,
            aborted: false,
            details: details.into(),
        }
    }

    pub fn failed(details: impl Into<String>) -> Self {
        Self {
            correct: false,
            fixable: false,
            aborted: false,
            details: details.into(),
        }
    }

    pub fn aborted(details: impl Into<String>) -> Self {
        Self {
            correct: false,
            fixable: true,
            aborted: true,
            details: details.into(),
        }
    }
}

/// Outcome of one item's `apply`: `None` for synthetic type-group items,
/// `Some((before, after))` for real items.
pub type ApplyOutcome = Option<(StatusRecord, StatusRecord)>;

/// The narrow capability interface the scheduler depends on. Variants
/// (file, package, …) are external collaborators that implement this trait;
/// the scheduler never downcasts to a concrete type.
pub trait Item: Send {
    /// Canonical `"type:name"` id, unique across one apply run.
    fn id(&self) -> &str;

    /// Fixed list of item-ids this item always depends on.
    fn static_deps(&self) -> &[String];

    /// Dependencies declared by configuration.
    fn user_deps(&self) -> &[String];

    /// Runs the reconciliation. `interactive` permits the item to prompt,
    /// which forces the scheduler down to a single worker (§5).
    fn apply(&self, interactive: bool) -> ApplyOutcome;
}

/// Splits a canonical item id of the form `"type:name"` into its type
/// prefix and suffix, validating the `^[a-z]+:[^:]*$` grammar from §6.
pub fn item_type(id: &str) -> Result<&str, ItemError> {
    let Some((prefix, rest)) = id.split_once(':') else {
        return Err(ItemError::InvalidId(id.to_string()));
    };
    let valid_prefix = !prefix.is_empty() && prefix.bytes().all(|b| b.is_ascii_lowercase());
    let valid_rest = !rest.contains(':');
    if !valid_prefix || !valid_rest {
        return Err(ItemError::InvalidId(id.to_string()));
    }
    Ok(prefix)
}

/// The id of the synthetic type-group item for `item_type`, e.g. `"file:"`.
pub fn type_group_id(item_type: &str) -> String {
    format!("{item_type}:")
}

impl fmt::Debug for dyn Item {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Item").field("id", &self.id()).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn item_type_parses_valid_ids() {
        assert_eq!(item_type("file:/etc/hosts").unwrap(), "file");
        assert_eq!(item_type("file:").unwrap(), "file");
    }

    #[test]
    fn item_type_rejects_missing_colon() {
        assert_matches::assert_matches!(item_type("file"), Err(ItemError::InvalidId(_)));
    }

    #[test]
    fn item_type_rejects_uppercase_or_extra_colons() {
        assert_matches::assert_matches!(item_type("File:x"), Err(ItemError::InvalidId(_)));
        assert_matches::assert_matches!(item_type("file:a:b"), Err(ItemError::InvalidId(_)));
    }

    #[test]
    fn type_group_id_is_type_plus_colon() {
        assert_eq!(type_group_id("file"), "file:");
    }
}
