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

//! Process-level runtime configuration for the orchestrator host binary
//! (§4.H): worker count, interactive mode, and log verbosity. Layered the
//! same way the Metastack is layered conceptually, but it is a separate,
//! simpler stack — read once at process start, with no `set_layer` API and
//! no freeze semantics.
//!
//! Grounded on the layered-precedence shape of
//! `original_source` settings resolution (defaults, then file, then
//! environment, then explicit overrides), implemented with the `config`
//! crate rather than a bespoke resolver.

use std::path::PathBuf;

use config::{Config, Environment, File};
use serde::Deserialize;
use thiserror::Error;
use tracing::debug;

const ENV_PREFIX: &str = "CONFORM";
const CONFIG_PATH_ENV: &str = "CONFORM_CONFIG";

#[derive(Debug, Error)]
pub enum RuntimeConfigError {
    #[error("failed to resolve runtime configuration: {0}")]
    Load(#[from] config::ConfigError),
}

/// The orchestrator binary's own configuration. Distinct from the
/// Metastack: this configures the process, not node metadata.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RuntimeConfig {
    pub workers: usize,
    pub interactive: bool,
    pub log_filter: String,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            workers: 4,
            interactive: false,
            log_filter: "info".to_string(),
        }
    }
}

/// Explicit CLI flag values, highest precedence. `None` means "not passed".
#[derive(Debug, Clone, Default)]
pub struct CliOverrides {
    pub workers: Option<usize>,
    pub interactive: Option<bool>,
    pub log_filter: Option<String>,
}

impl RuntimeConfig {
    /// Resolves the effective configuration: compiled-in defaults, then an
    /// optional TOML file, then `CONFORM_*` environment variables, then
    /// `overrides`, each layer taking precedence over the last.
    pub fn resolve(overrides: &CliOverrides) -> Result<Self, RuntimeConfigError> {
        let defaults = RuntimeConfig::default();
        let config_path = std::env::var(CONFIG_PATH_ENV)
            .map(PathBuf::from)
            .unwrap_or_else(|_| default_config_path());

        let mut builder = Config::builder()
            .set_default("workers", defaults.workers as i64)?
            .set_default("interactive", defaults.interactive)?
            .set_default("log_filter", defaults.log_filter.clone())?
            .add_source(File::from(config_path.clone()).required(false))
            .add_source(Environment::with_prefix(ENV_PREFIX));

        if let Some(workers) = overrides.workers {
            builder = builder.set_override("workers", workers as i64)?;
        }
        if let Some(interactive) = overrides.interactive {
            builder = builder.set_override("interactive", interactive)?;
        }
        if let Some(log_filter) = &overrides.log_filter {
            builder = builder.set_override("log_filter", log_filter.clone())?;
        }

        let resolved: RuntimeConfig = builder.build()?.try_deserialize()?;
        debug!(
            workers = resolved.workers,
            interactive = resolved.interactive,
            log_filter = %resolved.log_filter,
            config_path = %config_path.display(),
            "resolved runtime configuration"
        );
        Ok(resolved)
    }
}

fn default_config_path() -> PathBuf {
    let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
    PathBuf::from(home)
        .join(".config")
        .join("conform")
        .join("config.toml")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Mutex, OnceLock};

    /// Environment-variable tests can't run concurrently with each other.
    fn env_guard() -> &'static Mutex<()> {
        static GUARD: OnceLock<Mutex<()>> = OnceLock::new();
        GUARD.get_or_init(|| Mutex::new(()))
    }

    fn clear_env() {
        std::env::remove_var("CONFORM_WORKERS");
        std::env::remove_var("CONFORM_INTERACTIVE");
        std::env::remove_var("CONFORM_LOG_FILTER");
        std::env::remove_var(CONFIG_PATH_ENV);
    }

    #[test]
    fn defaults_with_no_file_or_environment() {
        let _guard = env_guard().lock().unwrap();
        clear_env();
        std::env::set_var(CONFIG_PATH_ENV, "/nonexistent/conform/config.toml");
        let resolved = RuntimeConfig::resolve(&CliOverrides::default()).unwrap();
        clear_env();
        assert_eq!(resolved, RuntimeConfig::default());
    }

    #[test]
    fn environment_variable_overrides_default() {
        let _guard = env_guard().lock().unwrap();
        clear_env();
        std::env::set_var(CONFIG_PATH_ENV, "/nonexistent/conform/config.toml");
        std::env::set_var("CONFORM_WORKERS", "9");
        let resolved = RuntimeConfig::resolve(&CliOverrides::default()).unwrap();
        clear_env();
        assert_eq!(resolved.workers, 9);
    }

    #[test]
    fn cli_override_beats_environment_variable() {
        let _guard = env_guard().lock().unwrap();
        clear_env();
        std::env::set_var(CONFIG_PATH_ENV, "/nonexistent/conform/config.toml");
        std::env::set_var("CONFORM_WORKERS", "9");
        let overrides = CliOverrides {
            workers: Some(2),
            ..Default::default()
        };
        let resolved = RuntimeConfig::resolve(&overrides).unwrap();
        clear_env();
        assert_eq!(resolved.workers, 2);
    }

    #[test]
    fn environment_variable_beats_file_value() {
        let _guard = env_guard().lock().unwrap();
        clear_env();
        let dir = std::env::temp_dir().join(format!("conform-rc-test-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("config.toml");
        std::fs::write(&path, "workers = 6\n").unwrap();

        std::env::set_var(CONFIG_PATH_ENV, &path);
        std::env::set_var("CONFORM_WORKERS", "9");
        let resolved = RuntimeConfig::resolve(&CliOverrides::default()).unwrap();
        clear_env();
        std::fs::remove_file(&path).ok();

        assert_eq!(resolved.workers, 9);
    }

    #[test]
    fn file_value_beats_default() {
        let _guard = env_guard().lock().unwrap();
        clear_env();
        let dir = std::env::temp_dir().join(format!("conform-rc-test-file-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("config.toml");
        std::fs::write(&path, "workers = 6\ninteractive = true\n").unwrap();

        std::env::set_var(CONFIG_PATH_ENV, &path);
        let resolved = RuntimeConfig::resolve(&CliOverrides::default()).unwrap();
        clear_env();
        std::fs::remove_file(&path).ok();

        assert_eq!(resolved.workers, 6);
        assert!(resolved.interactive);
        assert_eq!(resolved.log_filter, "info");
    }
}
