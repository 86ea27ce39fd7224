//! Facade command - Write the public facade of a module

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::Context;
use apidiff_core::{reduce_with, write_module};
use colored::Colorize;
use serde::Serialize;

use super::{default_facade_path, facade_rules, load_module};
use crate::config::ApiDiffConfig;
use crate::output::{Output, OutputFormat, TableDisplay};

/// Facade command result
#[derive(Debug, Serialize)]
pub struct FacadeSummary {
    pub input: String,
    pub output: String,
    pub module: String,
    pub keep_internals: bool,
    pub types_before: usize,
    pub types_after: usize,
}

impl TableDisplay for FacadeSummary {
    fn to_table(&self) -> String {
        format!(
            "{} {} -> {}\n  {} types kept of {}{}",
            "FACADE:".cyan().bold(),
            self.module,
            self.output,
            self.types_after,
            self.types_before,
            if self.keep_internals {
                " (internals kept)"
            } else {
                ""
            }
        )
    }
}

/// Run the facade command
pub async fn run(
    input: &Path,
    output: Option<&Path>,
    keep_internals: Option<bool>,
    config: &ApiDiffConfig,
    format: OutputFormat,
) -> anyhow::Result<ExitCode> {
    let module = load_module(input.to_path_buf()).await?;
    let rules = facade_rules(keep_internals, config, &module);
    let facade = reduce_with(&module, rules, &module);

    let output_path: PathBuf = output
        .map(Path::to_path_buf)
        .unwrap_or_else(|| default_facade_path(input));

    let summary = FacadeSummary {
        input: input.display().to_string(),
        output: output_path.display().to_string(),
        module: module.name.clone(),
        keep_internals: rules.keep_internals,
        types_before: module.type_count(),
        types_after: facade.type_count(),
    };

    tokio::task::spawn_blocking(move || write_module(&output_path, &facade))
        .await
        .context("Facade writer task failed")?
        .context("Failed to write facade")?;

    Output::new(summary, format).render()?;
    Ok(ExitCode::SUCCESS)
}
