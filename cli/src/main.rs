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

//! Thin entrypoint for the `conform` apply orchestrator (§4.J): resolves
//! runtime configuration, installs logging, builds a small demonstration
//! Metastack and item set, runs the scheduler to completion, and reports the
//! aggregated result.

use std::process::ExitCode;
use std::sync::Arc;

use clap::Parser;
use conform_core::{
    aggregate, apply, CliOverrides, Error as CoreError, FileItem, Item, Metastack, PackageItem,
    RuntimeConfig, Value,
};
use tracing_subscriber::EnvFilter;

mod transport;

use transport::LocalShellTransport;

/// Dependency-ordered item apply orchestrator.
#[derive(Parser, Debug)]
#[command(name = "conform")]
struct Args {
    /// Number of workers to run items with
    #[arg(long)]
    workers: Option<usize>,
    /// Allow items to prompt; forces a single worker
    #[arg(long)]
    interactive: bool,
    /// Log verbosity filter (e.g. "info", "debug", "conform_core=trace")
    #[arg(long)]
    log_filter: Option<String>,
}

impl From<&Args> for CliOverrides {
    fn from(args: &Args) -> Self {
        CliOverrides {
            workers: args.workers,
            interactive: if args.interactive { Some(true) } else { None },
            log_filter: args.log_filter.clone(),
        }
    }
}

/// Assembles the demonstration Metastack: a `base` layer with defaults and
/// an `overrides` layer that wins on conflicts, mirroring the layer-override
/// scenario from §8.
fn demo_metastack() -> Metastack {
    let mut stack = Metastack::new();
    stack
        .set_layer(
            "base",
            Value::map([
                (
                    "motd".to_string(),
                    Value::map([
                        ("content".to_string(), Value::Str("managed by conform\n".to_string())),
                        ("owner".to_string(), Value::Str("root".to_string())),
                        ("group".to_string(), Value::Str("root".to_string())),
                        ("mode".to_string(), Value::Str("644".to_string())),
                    ]),
                ),
                ("curl_installed".to_string(), Value::Bool(true)),
            ]),
        )
        .expect("well-formed literal layer");
    stack
        .set_layer(
            "overrides",
            Value::map([(
                "motd".to_string(),
                Value::map([(
                    "content".to_string(),
                    Value::Str("managed by conform (site override)\n".to_string()),
                )]),
            )]),
        )
        .expect("well-formed literal layer");
    stack
}

fn build_items(stack: &Metastack, transport: Arc<LocalShellTransport>) -> Vec<Box<dyn Item>> {
    let motd = stack.get("motd", Value::map([]));
    let motd = motd.value().as_map().expect("motd is a mapping");
    let content = motd.get("content").and_then(Value::as_str).unwrap_or_default();
    let owner = motd.get("owner").and_then(Value::as_str).unwrap_or("root");
    let group = motd.get("group").and_then(Value::as_str).unwrap_or("root");
    let mode = motd.get("mode").and_then(Value::as_str).unwrap_or("644");

    let installed = stack.has("curl_installed");

    let motd_item = FileItem::new(
        "/etc/motd",
        mode,
        owner,
        group,
        content,
        Vec::new(),
        Arc::clone(&transport),
    )
    .expect("demo motd item has a valid mode/id");

    let curl_item = PackageItem::new("curl", installed, Vec::new(), Arc::clone(&transport))
        .expect("demo curl item has a valid id");

    vec![Box::new(motd_item) as Box<dyn Item>, Box::new(curl_item) as Box<dyn Item>]
}

fn run(config: &RuntimeConfig) -> Result<bool, CoreError> {
    let stack = demo_metastack();
    let transport = Arc::new(LocalShellTransport);
    let items = build_items(&stack, transport);

    let results = apply(items, config.workers, config.interactive)?;
    let counts = aggregate(&results)?;

    println!(
        "correct={} fixed={} aborted={} unfixable={} failed={}",
        counts.correct, counts.fixed, counts.aborted, counts.unfixable, counts.failed
    );

    Ok(counts.aborted == 0 && counts.unfixable == 0 && counts.failed == 0)
}

fn main() -> ExitCode {
    let args = Args::parse();
    let overrides = CliOverrides::from(&args);

    let config = match RuntimeConfig::resolve(&overrides) {
        Ok(config) => config,
        Err(err) => {
            eprintln!("conform: failed to resolve configuration: {err}");
            return ExitCode::FAILURE;
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(config.log_filter.clone()))
        .init();

    match run(&config) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(err) => {
            eprintln!("conform: apply run failed: {err}");
            ExitCode::FAILURE
        }
    }
}
