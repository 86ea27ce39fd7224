//! Command implementations for the apidiff CLI
//!
//! Each command module provides a `run` function that executes the command
//! logic and returns the process exit code.

pub mod diff;
pub mod facade;
pub mod package;

use std::path::{Path, PathBuf};

use anyhow::Context;
use apidiff_core::types::Module;
use apidiff_core::{Change, FacadeRules, Package};
use colored::Colorize;

use crate::config::ApiDiffConfig;

/// Facade rules for a module: CLI flag, then config, then the module's
/// own friend declarations.
pub fn facade_rules(flag: Option<bool>, config: &ApiDiffConfig, module: &Module) -> FacadeRules {
    match flag.or_else(|| config.keep_internals()) {
        Some(keep_internals) => FacadeRules::new(keep_internals),
        None => FacadeRules::for_module(module),
    }
}

/// Load a module document off the async runtime.
pub async fn load_module(path: PathBuf) -> anyhow::Result<Module> {
    let display = path.display().to_string();
    tokio::task::spawn_blocking(move || apidiff_core::load_module(&path))
        .await
        .context("Module loader task failed")?
        .with_context(|| format!("Failed to load module {}", display))
}

/// Load a package document off the async runtime.
pub async fn load_package(path: PathBuf) -> anyhow::Result<Package> {
    let display = path.display().to_string();
    tokio::task::spawn_blocking(move || apidiff_core::load_package(&path))
        .await
        .context("Package loader task failed")?
        .with_context(|| format!("Failed to load package {}", display))
}

/// Grouped change listing: a header per classification, then one message
/// per line. Breaking changes come first.
pub fn grouped_report<'a>(changes: impl IntoIterator<Item = &'a Change>, use_colors: bool) -> String {
    let (breaking, non_breaking): (Vec<&Change>, Vec<&Change>) =
        changes.into_iter().partition(|c| c.is_breaking());

    if breaking.is_empty() && non_breaking.is_empty() {
        return "No changes\n".to_string();
    }

    let mut output = String::new();
    for (header, group) in [
        ("Breaking changes:", &breaking),
        ("Non-breaking changes:", &non_breaking),
    ] {
        if group.is_empty() {
            continue;
        }
        let header = if !use_colors {
            header.normal()
        } else if group[0].is_breaking() {
            header.red().bold()
        } else {
            header.green().bold()
        };
        output.push_str(&format!("{}\n", header));
        for change in group {
            output.push_str(change.message());
            output.push('\n');
        }
        output.push('\n');
    }
    output
}

/// Default output path for a facade: `<stem>.facade.json` next to the input.
pub fn default_facade_path(input: &Path) -> PathBuf {
    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "module".to_string());
    input.with_file_name(format!("{}.facade.json", stem))
}
