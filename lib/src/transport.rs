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

//! The narrow interface items use to talk to a remote host (§6).
//!
//! Grounded on `original_source/src/blockwart/node.py` (`Node.run`,
//! `RunResult`); the SSH client itself remains an external collaborator, out
//! of scope for this core (§1).

/// Result of running one remote command.
#[derive(Debug, Clone, Default)]
pub struct RunResult {
    pub stdout: Vec<u8>,
    pub stderr: Vec<u8>,
    pub returncode: i32,
}

impl RunResult {
    pub fn ok(&self) -> bool {
        self.returncode == 0
    }
}

/// Runs a shell command on the remote host, optionally under `sudo`.
/// Implementations are external collaborators (an SSH client, a local
/// subprocess stand-in for tests, …); items never talk to a transport other
/// than through this trait.
pub trait RemoteTransport: Send + Sync {
    fn run(&self, command: &str, sudo: bool) -> RunResult;
}

/// Shell-quotes `value` using POSIX single-quote escaping, per §6: any
/// argument that may contain user data must be quoted this way before being
/// interpolated into a command string.
pub fn shell_quote(value: &str) -> String {
    let mut quoted = String::with_capacity(value.len() + 2);
    quoted.push('\'');
    for ch in value.chars() {
        if ch == '\'' {
            quoted.push_str("'\\''");
        } else {
            quoted.push(ch);
        }
    }
    quoted.push('\'');
    quoted
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shell_quote_wraps_plain_values() {
        assert_eq!(shell_quote("hello"), "'hello'");
    }

    #[test]
    fn shell_quote_escapes_embedded_single_quotes() {
        assert_eq!(shell_quote("it's"), r"'it'\''s'");
    }

    #[test]
    fn shell_quote_handles_empty_string() {
        assert_eq!(shell_quote(""), "''");
    }
}
