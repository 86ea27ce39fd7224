//! Diff command - Compare the public surface of two modules
//!
//! Both modules are reduced to their facade first, so only changes that
//! other modules can observe are reported.

use std::path::Path;
use std::process::ExitCode;

use apidiff_core::{reduce_with, semantic_diff, DiffResult};
use colored::Colorize;
use serde::Serialize;

use super::{facade_rules, grouped_report, load_module};
use crate::config::ApiDiffConfig;
use crate::output::{Output, OutputConfig, OutputFormat, Outputter};

/// Diff command result
#[derive(Debug, Serialize)]
pub struct DiffReport {
    pub base: String,
    pub head: String,
    #[serde(flatten)]
    pub result: DiffResult,
    #[serde(skip)]
    pub verbose: bool,
}

impl Outputter for DiffReport {
    fn to_table(&self, config: &OutputConfig) -> String {
        let mut output = grouped_report(self.result.changes(), config.use_colors());

        if self.verbose {
            let footer = format!(
                "{} ({:.1}ms)",
                self.result.summary_text, self.result.duration_ms
            );
            if config.use_colors() {
                output.push_str(&footer.dimmed().to_string());
            } else {
                output.push_str(&footer);
            }
        }
        output.trim_end().to_string()
    }
}

/// Run the diff command
pub async fn run(
    base: &Path,
    head: &Path,
    keep_internals: Option<bool>,
    verbose: bool,
    config: &ApiDiffConfig,
    format: OutputFormat,
) -> anyhow::Result<ExitCode> {
    let (module_a, module_b) = tokio::try_join!(
        load_module(base.to_path_buf()),
        load_module(head.to_path_buf())
    )?;

    let facade_a = reduce_with(
        &module_a,
        facade_rules(keep_internals, config, &module_a),
        &module_a,
    );
    let facade_b = reduce_with(
        &module_b,
        facade_rules(keep_internals, config, &module_b),
        &module_b,
    );

    let result = semantic_diff(&facade_a, &facade_b);
    tracing::info!(
        changes = result.change_count(),
        breaking = result.summary.breaking_changes,
        "diff complete"
    );

    let report = DiffReport {
        base: base.display().to_string(),
        head: head.display().to_string(),
        result,
        verbose,
    };
    Output::new(report, format).render()?;
    Ok(ExitCode::SUCCESS)
}
