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

//! Apply result aggregator (§4.G): classifies each item's before/after
//! status pair into one of five buckets, in strict precedence order.
//!
//! Grounded on `original_source/src/blockwart/node.py::ApplyResult`, which
//! walks the same five clauses in the same order to bucket one node's
//! applied items.

use thiserror::Error;
use tracing::{error, info};

use crate::item::StatusRecord;
use crate::scheduler::ItemResult;

#[derive(Debug, Error, PartialEq, Eq, Clone)]
pub enum AggregatorError {
    #[error("item {item:?} has an inconsistent before/after status pair: {before:?} -> {after:?}")]
    InconsistentItemResult {
        item: String,
        before: StatusRecord,
        after: StatusRecord,
    },
}

/// Running totals over a set of applied items.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct AggregateCounts {
    pub correct: usize,
    pub fixed: usize,
    pub aborted: usize,
    pub unfixable: usize,
    pub failed: usize,
}

impl AggregateCounts {
    pub fn total(&self) -> usize {
        self.correct + self.fixed + self.aborted + self.unfixable + self.failed
    }
}

/// Classifies one `(before, after)` pair. Clauses are checked in the order
/// listed in §4.G; the first match wins.
fn classify(before: &StatusRecord, after: &StatusRecord) -> Option<&'static str> {
    if before.correct && after.correct {
        Some("correct")
    } else if after.aborted {
        Some("aborted")
    } else if !before.fixable || !after.fixable {
        Some("unfixable")
    } else if !before.correct && after.correct {
        Some("fixed")
    } else if !before.correct && !after.correct {
        Some("failed")
    } else {
        None
    }
}

/// Folds a list of item results into [`AggregateCounts`]. Any pair matching
/// none of the five clauses is an item-class bug, reported as
/// `InconsistentItemResult` and aborting the fold.
pub fn aggregate(results: &[ItemResult]) -> Result<AggregateCounts, AggregatorError> {
    let mut counts = AggregateCounts::default();
    for result in results {
        match classify(&result.before, &result.after) {
            Some("correct") => counts.correct += 1,
            Some("aborted") => counts.aborted += 1,
            Some("unfixable") => counts.unfixable += 1,
            Some("fixed") => counts.fixed += 1,
            Some("failed") => counts.failed += 1,
            _ => {
                let err = AggregatorError::InconsistentItemResult {
                    item: result.id.clone(),
                    before: result.before.clone(),
                    after: result.after.clone(),
                };
                error!(item = %result.id, "inconsistent item result");
                return Err(err);
            }
        }
    }
    info!(
        correct = counts.correct,
        fixed = counts.fixed,
        aborted = counts.aborted,
        unfixable = counts.unfixable,
        failed = counts.failed,
        "apply run complete"
    );
    Ok(counts)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn result(id: &str, before: StatusRecord, after: StatusRecord) -> ItemResult {
        ItemResult {
            id: id.to_string(),
            before,
            after,
        }
    }

    #[test]
    fn already_correct_item_is_counted_correct() {
        let r = result("file:a", StatusRecord::correct("x"), StatusRecord::correct("x"));
        let counts = aggregate(&[r]).unwrap();
        assert_eq!(counts.correct, 1);
        assert_eq!(counts.total(), 1);
    }

    #[test]
    fn fixed_item_is_counted_fixed() {
        let r = result("file:a", StatusRecord::fixed("x"), StatusRecord::correct("x"));
        let counts = aggregate(&[r]).unwrap();
        assert_eq!(counts.fixed, 1);
    }

    #[test]
    fn failed_item_is_counted_failed() {
        let r = result("file:a", StatusRecord::fixed("x"), StatusRecord::failed("x"));
        let counts = aggregate(&[r]).unwrap();
        assert_eq!(counts.failed, 1);
    }

    #[test]
    fn aborted_after_wins_over_other_clauses() {
        let r = result("file:a", StatusRecord::fixed("x"), StatusRecord::aborted("x"));
        let counts = aggregate(&[r]).unwrap();
        assert_eq!(counts.aborted, 1);
    }

    #[test]
    fn unfixable_item_is_counted_unfixable() {
        let before = StatusRecord {
            correct: false,
            fixable: false,
            aborted: false,
            details: "locked".to_string(),
        };
        let after = before.clone();
        let counts = aggregate(&[result("file:a", before, after)]).unwrap();
        assert_eq!(counts.unfixable, 1);
    }

    #[test]
    fn correct_before_but_incorrect_after_is_inconsistent() {
        // before.correct with after incorrect-but-fixable matches none of
        // the five clauses: an item is never supposed to regress like this.
        let before = StatusRecord::correct("x");
        let after = StatusRecord {
            correct: false,
            fixable: true,
            aborted: false,
            details: "x".to_string(),
        };
        let err = aggregate(&[result("file:a", before, after)]).unwrap_err();
        assert_matches::assert_matches!(err, AggregatorError::InconsistentItemResult { .. });
    }

    #[test]
    fn counter_sum_equals_number_of_items_processed() {
        let results = vec![
            result("file:a", StatusRecord::correct("x"), StatusRecord::correct("x")),
            result("file:b", StatusRecord::fixed("x"), StatusRecord::correct("x")),
            result("file:c", StatusRecord::fixed("x"), StatusRecord::failed("x")),
        ];
        let counts = aggregate(&results).unwrap();
        assert_eq!(counts.total(), results.len());
    }
}
