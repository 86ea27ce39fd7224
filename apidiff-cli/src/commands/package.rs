//! Package command - Compare a package against its base version
//!
//! Prints the suggested next version, then the changes per framework.
//! Can also write an xUnit report and fail when the package version is
//! lower than the suggestion.

use std::collections::BTreeMap;
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Context;
use apidiff_core::{compare_packages, TypeChanges};
use colored::Colorize;
use semver::Version;
use serde::Serialize;

use super::{grouped_report, load_package};
use crate::config::ApiDiffConfig;
use crate::output::{xunit, Output, OutputConfig, OutputFormat, Outputter};

/// Exit code when `--verify-version` fails.
pub const VERSION_TOO_LOW: u8 = 2;

/// Options for the package command
#[derive(Debug, Clone)]
pub struct PackageOptions {
    pub package: PathBuf,
    pub base: PathBuf,
    pub detailed: bool,
    pub xunit: bool,
    pub output_dir: Option<PathBuf>,
    pub verify_version: bool,
    pub quiet: bool,
}

/// Package command result
#[derive(Debug, Serialize)]
pub struct PackageReport {
    pub id: String,
    pub version: Version,
    pub base_version: Version,
    pub suggested_version: Version,
    pub frameworks: BTreeMap<String, Vec<TypeChanges>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub xunit_path: Option<String>,
    #[serde(skip)]
    pub detailed: bool,
    #[serde(skip)]
    pub quiet: bool,
}

impl PackageReport {
    pub fn version_too_low(&self) -> bool {
        self.version < self.suggested_version
    }
}

impl Outputter for PackageReport {
    fn to_table(&self, config: &OutputConfig) -> String {
        let mut output = format!("{}\n", self.suggested_version);
        if self.quiet {
            return output.trim_end().to_string();
        }

        for (framework, groups) in &self.frameworks {
            let mut changes = groups.iter().flat_map(|g| g.changes.iter()).peekable();

            if self.detailed {
                output.push_str(&format!("Framework: {}\n", framework));
                output.push_str(&grouped_report(changes, config.use_colors()));
                continue;
            }

            if changes.peek().is_none() {
                continue;
            }
            output.push_str(&format!("{}\n", framework));
            for change in changes {
                let marker = change.marker().to_string();
                let marker = match (config.use_colors(), change.is_breaking()) {
                    (false, _) => marker.normal(),
                    (true, true) => marker.red().bold(),
                    (true, false) => marker.green(),
                };
                output.push_str(&format!("{} {}\n", marker, change.message()));
            }
        }
        output.trim_end().to_string()
    }
}

/// Run the package command
pub async fn run(
    options: &PackageOptions,
    config: &ApiDiffConfig,
    format: OutputFormat,
) -> anyhow::Result<ExitCode> {
    let (head, base) = tokio::try_join!(
        load_package(options.package.clone()),
        load_package(options.base.clone())
    )?;

    tracing::debug!(
        package = %head.id,
        version = %head.version,
        base = %base.version,
        "comparing package with base version"
    );

    let diff = compare_packages(&base, &head);

    let xunit_path = if options.xunit {
        let dir = options
            .output_dir
            .clone()
            .or_else(|| config.report_dir())
            .unwrap_or_else(|| PathBuf::from("."));
        tokio::fs::create_dir_all(&dir)
            .await
            .with_context(|| format!("Failed to create {}", dir.display()))?;

        let path = dir.join(xunit::file_name(&head.id));
        let xml = xunit::render(&head.id, &diff, chrono::Utc::now())?;
        tokio::fs::write(&path, xml)
            .await
            .with_context(|| format!("Failed to write {}", path.display()))?;
        tracing::info!(path = %path.display(), "xUnit results saved");
        Some(path.display().to_string())
    } else {
        None
    };

    let report = PackageReport {
        id: head.id.clone(),
        version: head.version.clone(),
        base_version: base.version.clone(),
        suggested_version: diff.suggested_version.clone(),
        frameworks: diff.frameworks,
        xunit_path,
        detailed: options.detailed,
        quiet: options.quiet,
    };
    let too_low = report.version_too_low();
    Output::new(report, format).render()?;

    if options.verify_version && too_low {
        tracing::warn!("package version is lower than the suggested version");
        return Ok(ExitCode::from(VERSION_TOO_LOW));
    }
    Ok(ExitCode::SUCCESS)
}

#[cfg(test)]
mod tests {
    use super::*;
    use apidiff_core::{Change, ChangeType, EntityType};

    fn report(detailed: bool, quiet: bool) -> PackageReport {
        let mut frameworks = BTreeMap::new();
        frameworks.insert(
            "net6.0".to_string(),
            vec![TypeChanges::new(Some("Lib.Same".to_string()), vec![])],
        );
        frameworks.insert(
            "net8.0".to_string(),
            vec![TypeChanges::new(
                Some("Lib.Widget".to_string()),
                vec![
                    Change::breaking(ChangeType::Modified, EntityType::Type, "Type made sealed: Lib.Widget"),
                    Change::non_breaking(ChangeType::Added, EntityType::Method, "Method added: M"),
                ],
            )],
        );
        PackageReport {
            id: "Lib".to_string(),
            version: Version::new(1, 1, 0),
            base_version: Version::new(1, 0, 0),
            suggested_version: Version::new(2, 0, 0),
            frameworks,
            xunit_path: None,
            detailed,
            quiet,
        }
    }

    fn plain() -> OutputConfig {
        OutputConfig::new(OutputFormat::Table).without_colors()
    }

    #[test]
    fn test_table_default() {
        assert_eq!(
            report(false, false).to_table(&plain()),
            "2.0.0\nnet8.0\nB Type made sealed: Lib.Widget\nN Method added: M"
        );
    }

    #[test]
    fn test_table_quiet() {
        assert_eq!(report(false, true).to_table(&plain()), "2.0.0");
    }

    #[test]
    fn test_table_detailed() {
        let text = report(true, false).to_table(&plain());
        assert!(text.contains("Framework: net6.0\nNo changes\n"));
        assert!(text.contains("Framework: net8.0\nBreaking changes:\nType made sealed: Lib.Widget"));
        assert!(text.contains("Non-breaking changes:\nMethod added: M"));
    }

    #[test]
    fn test_version_too_low() {
        assert!(report(false, false).version_too_low());

        let mut ok = report(false, false);
        ok.version = Version::new(2, 0, 0);
        assert!(!ok.version_too_low());
    }
}
