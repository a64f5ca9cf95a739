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

//! A thin file item: desired mode/owner/group/content, reconciled by
//! `stat`-then-compare over the remote transport.
//!
//! Grounded on `original_source/src/blockwart/items/files.py`: the
//! `owner, group, mode = stat.split(":")` comparison and the corrective
//! `chmod`/`chown` commands are carried over in shape.

use std::sync::Arc;

use crate::item::{item_type, ApplyOutcome, Item, ItemError, StatusRecord};
use crate::mode::validate_mode;
use crate::transport::{shell_quote, RemoteTransport};

pub struct FileItem {
    id: String,
    static_deps: Vec<String>,
    user_deps: Vec<String>,
    path: String,
    mode: String,
    owner: String,
    group: String,
    content: String,
    transport: Arc<dyn RemoteTransport>,
}

impl FileItem {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        path: impl Into<String>,
        mode: impl Into<String>,
        owner: impl Into<String>,
        group: impl Into<String>,
        content: impl Into<String>,
        user_deps: Vec<String>,
        transport: Arc<dyn RemoteTransport>,
    ) -> Result<Self, ItemError> {
        let path = path.into();
        let id = format!("file:{path}");
        item_type(&id)?;
        let mode = mode.into();
        validate_mode(&id, &mode)?;
        Ok(Self {
            id,
            static_deps: Vec::new(),
            user_deps,
            path,
            mode,
            owner: owner.into(),
            group: group.into(),
            content: content.into(),
            transport,
        })
    }

    fn stat(&self) -> Option<(String, String, String)> {
        let result = self.transport.run(
            &format!("stat --format '%U:%G:%a' {}", shell_quote(&self.path)),
            false,
        );
        if !result.ok() {
            return None;
        }
        let stdout = String::from_utf8_lossy(&result.stdout);
        let (owner, rest) = stdout.trim().split_once(':')?;
        let (group, mode) = rest.split_once(':')?;
        Some((owner.to_string(), group.to_string(), mode.to_string()))
    }

    fn matches(&self, owner: &str, group: &str, mode: &str) -> bool {
        owner == self.owner && group == self.group && mode.trim_start_matches('0') == self.mode.trim_start_matches('0')
    }

    fn fix(&self) -> bool {
        let quoted_path = shell_quote(&self.path);
        let write = self.transport.run(
            &format!(
                "printf %s {} > {}",
                shell_quote(&self.content),
                quoted_path
            ),
            true,
        );
        let chmod = self
            .transport
            .run(&format!("chmod {} {}", shell_quote(&self.mode), quoted_path), true);
        let chown = self.transport.run(
            &format!(
                "chown {}:{} {}",
                shell_quote(&self.owner),
                shell_quote(&self.group),
                quoted_path
            ),
            true,
        );
        write.ok() && chmod.ok() && chown.ok()
    }
}

impl Item for FileItem {
    fn id(&self) -> &str {
        &self.id
    }

    fn static_deps(&self) -> &[String] {
        &self.static_deps
    }

    fn user_deps(&self) -> &[String] {
        &self.user_deps
    }

    fn apply(&self, _interactive: bool) -> ApplyOutcome {
        let before = match self.stat() {
            Some((owner, group, mode)) if self.matches(&owner, &group, &mode) => {
                StatusRecord::correct(format!("{} already matches desired state", self.id))
            }
            Some(_) => StatusRecord::fixed(format!("{} does not match desired state", self.id)),
            None => StatusRecord::failed(format!("{} could not be stat'd", self.id)),
        };

        if before.correct {
            return Some((before.clone(), before));
        }

        let after = if self.fix() {
            StatusRecord::correct(format!("{} fixed", self.id))
        } else {
            StatusRecord::failed(format!("{} could not be fixed", self.id))
        };
        Some((before, after))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    use crate::transport::RunResult;

    struct FakeTransport {
        stat_response: String,
        fix_ok: bool,
        commands: Mutex<Vec<String>>,
    }

    impl RemoteTransport for FakeTransport {
        fn run(&self, command: &str, _sudo: bool) -> RunResult {
            self.commands.lock().unwrap().push(command.to_string());
            if command.starts_with("stat") {
                RunResult {
                    stdout: self.stat_response.clone().into_bytes(),
                    stderr: Vec::new(),
                    returncode: 0,
                }
            } else {
                RunResult {
                    stdout: Vec::new(),
                    stderr: Vec::new(),
                    returncode: if self.fix_ok { 0 } else { 1 },
                }
            }
        }
    }

    fn item(transport: Arc<FakeTransport>) -> FileItem {
        FileItem::new(
            "/etc/motd",
            "644",
            "root",
            "root",
            "hello",
            Vec::new(),
            transport,
        )
        .unwrap()
    }

    #[test]
    fn already_correct_file_reports_correct_before_and_after() {
        let transport = Arc::new(FakeTransport {
            stat_response: "root:root:644".to_string(),
            fix_ok: true,
            commands: Mutex::new(Vec::new()),
        });
        let (before, after) = item(transport).apply(false).unwrap();
        assert!(before.correct && after.correct);
    }

    #[test]
    fn mismatched_file_is_fixed() {
        let transport = Arc::new(FakeTransport {
            stat_response: "nobody:nobody:600".to_string(),
            fix_ok: true,
            commands: Mutex::new(Vec::new()),
        });
        let (before, after) = item(transport).apply(false).unwrap();
        assert!(!before.correct);
        assert!(after.correct);
    }

    #[test]
    fn mismatched_file_that_cannot_be_fixed_fails() {
        let transport = Arc::new(FakeTransport {
            stat_response: "nobody:nobody:600".to_string(),
            fix_ok: false,
            commands: Mutex::new(Vec::new()),
        });
        let (before, after) = item(transport).apply(false).unwrap();
        assert!(!before.correct);
        assert!(!after.correct);
    }

    #[test]
    fn invalid_mode_is_rejected_at_construction() {
        let transport = Arc::new(FakeTransport {
            stat_response: String::new(),
            fix_ok: true,
            commands: Mutex::new(Vec::new()),
        });
        assert_matches::assert_matches!(
            FileItem::new("/x", "999", "root", "root", "", Vec::new(), transport),
            Err(ItemError::InvalidAttribute { .. })
        );
    }
}
