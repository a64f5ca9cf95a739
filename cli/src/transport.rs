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

//! A `RemoteTransport` that runs commands locally, as a stand-in for the
//! out-of-scope SSH client collaborator (§6). Good enough for the CLI's
//! smoke-level demonstration; a real deployment swaps this for an SSH
//! client without touching `conform-core`.

use std::process::Command;

use conform_core::{RemoteTransport, RunResult};

pub struct LocalShellTransport;

impl RemoteTransport for LocalShellTransport {
    fn run(&self, command: &str, sudo: bool) -> RunResult {
        let full_command = if sudo {
            format!("sudo {command}")
        } else {
            command.to_string()
        };
        match Command::new("sh").arg("-c").arg(&full_command).output() {
            Ok(output) => RunResult {
                stdout: output.stdout,
                stderr: output.stderr,
                returncode: output.status.code().unwrap_or(-1),
            },
            Err(err) => RunResult {
                stdout: Vec::new(),
                stderr: err.to_string().into_bytes(),
                returncode: -1,
            },
        }
    }
}
