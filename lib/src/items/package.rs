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

//! A thin package item: desired installed/absent state, reconciled by
//! querying and driving a package manager over the remote transport.

use std::sync::Arc;

use crate::item::{item_type, ApplyOutcome, Item, ItemError, StatusRecord};
use crate::transport::{shell_quote, RemoteTransport};

pub struct PackageItem {
    id: String,
    static_deps: Vec<String>,
    user_deps: Vec<String>,
    name: String,
    installed: bool,
    transport: Arc<dyn RemoteTransport>,
}

impl PackageItem {
    pub fn new(
        name: impl Into<String>,
        installed: bool,
        user_deps: Vec<String>,
        transport: Arc<dyn RemoteTransport>,
    ) -> Result<Self, ItemError> {
        let name = name.into();
        let id = format!("package:{name}");
        item_type(&id)?;
        Ok(Self {
            id,
            static_deps: Vec::new(),
            user_deps,
            name,
            installed,
            transport,
        })
    }

    fn is_installed(&self) -> bool {
        self.transport
            .run(
                &format!("dpkg-query -W -f '${{Status}}' {}", shell_quote(&self.name)),
                false,
            )
            .ok()
    }

    fn fix(&self) -> bool {
        let command = if self.installed {
            format!("apt-get install -y {}", shell_quote(&self.name))
        } else {
            format!("apt-get remove -y {}", shell_quote(&self.name))
        };
        self.transport.run(&command, true).ok()
    }
}

impl Item for PackageItem {
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
        let currently_installed = self.is_installed();
        let matches = currently_installed == self.installed;
        let before = StatusRecord {
            correct: matches,
            fixable: true,
            aborted: false,
            details: format!(
                "{}: installed={currently_installed}, desired={}",
                self.id, self.installed
            ),
        };
        if matches {
            return Some((before.clone(), before));
        }
        let after = if self.fix() {
            StatusRecord::correct(format!("{} reconciled", self.id))
        } else {
            StatusRecord::failed(format!("{} could not be reconciled", self.id))
        };
        Some((before, after))
    }
}
