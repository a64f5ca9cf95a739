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

//! File-mode string validator (§6, illustrative item-side contract).
//!
//! Grounded on `original_source/src/blockwart/items/files.py::validator_mode`:
//! a mode string is three or four characters, each digit in `0..7`.

use crate::item::ItemError;

pub fn validate_mode(item_id: &str, value: &str) -> Result<(), ItemError> {
    if value.len() != 3 && value.len() != 4 {
        return Err(ItemError::InvalidAttribute {
            item_id: item_id.to_string(),
            message: format!(
                "mode should be three or four digits long, was: {value:?}"
            ),
        });
    }
    if !value.bytes().all(|b| b.is_ascii_digit()) {
        return Err(ItemError::InvalidAttribute {
            item_id: item_id.to_string(),
            message: format!("mode should be written as digits, got: {value:?}"),
        });
    }
    if value.bytes().any(|b| b - b'0' > 7) {
        return Err(ItemError::InvalidAttribute {
            item_id: item_id.to_string(),
            message: format!("invalid mode: {value:?}"),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_three_and_four_digit_modes() {
        assert!(validate_mode("file:x", "644").is_ok());
        assert!(validate_mode("file:x", "0644").is_ok());
    }

    #[test]
    fn rejects_empty_and_wrong_length() {
        assert!(validate_mode("file:x", "").is_err());
        assert!(validate_mode("file:x", "64").is_err());
        assert!(validate_mode("file:x", "12345").is_err());
    }

    #[test]
    fn rejects_out_of_range_digit() {
        assert!(validate_mode("file:x", "648").is_err());
    }

    #[test]
    fn rejects_non_digit_characters() {
        assert!(validate_mode("file:x", "-64").is_err());
    }
}
