//! xUnit-style XML report for package comparisons.
//!
//! One `testsuite` per framework, one `testcase` per type. Every breaking
//! change becomes a `failure`; non-breaking messages go to `system-out`.

use anyhow::Context;
use apidiff_core::{PackageDiff, TypeChanges};
use chrono::{DateTime, Utc};
use serde::Serialize;

const FRAMEWORK_CASE: &str = "<framework changes>";

#[derive(Debug, Serialize)]
#[serde(rename = "testsuites")]
struct TestSuites {
    #[serde(rename = "@name")]
    name: String,
    #[serde(rename = "@tests")]
    tests: usize,
    #[serde(rename = "@failures")]
    failures: usize,
    #[serde(rename = "@errors")]
    errors: usize,
    #[serde(rename = "@timestamp")]
    timestamp: String,
    #[serde(rename = "testsuite")]
    suites: Vec<TestSuite>,
}

#[derive(Debug, Serialize)]
struct TestSuite {
    #[serde(rename = "@name")]
    name: String,
    #[serde(rename = "@tests")]
    tests: usize,
    #[serde(rename = "@failures")]
    failures: usize,
    #[serde(rename = "@errors")]
    errors: usize,
    #[serde(rename = "testcase")]
    cases: Vec<TestCase>,
}

#[derive(Debug, Serialize)]
struct TestCase {
    #[serde(rename = "@name")]
    name: String,
    #[serde(rename = "failure")]
    failures: Vec<Failure>,
    #[serde(rename = "system-out", skip_serializing_if = "Option::is_none")]
    system_out: Option<String>,
}

#[derive(Debug, Serialize)]
struct Failure {
    #[serde(rename = "@type")]
    kind: &'static str,
    #[serde(rename = "@message")]
    message: String,
}

fn breaking_count(groups: &[TypeChanges]) -> usize {
    groups.iter().map(TypeChanges::breaking_count).sum()
}

fn test_case(group: &TypeChanges) -> TestCase {
    let (breaking, non_breaking): (Vec<_>, Vec<_>) =
        group.changes.iter().partition(|c| c.is_breaking());

    TestCase {
        name: group
            .type_name
            .clone()
            .unwrap_or_else(|| FRAMEWORK_CASE.to_string()),
        failures: breaking
            .into_iter()
            .map(|c| Failure {
                kind: "BreakingChange",
                message: c.message().to_string(),
            })
            .collect(),
        system_out: (!non_breaking.is_empty()).then(|| {
            non_breaking
                .iter()
                .map(|c| c.message())
                .collect::<Vec<_>>()
                .join("\n")
        }),
    }
}

/// Render the report as an XML document.
pub fn render(package_id: &str, diff: &PackageDiff, timestamp: DateTime<Utc>) -> anyhow::Result<String> {
    let suites: Vec<TestSuite> = diff
        .frameworks
        .iter()
        .map(|(framework, groups)| TestSuite {
            name: framework.clone(),
            tests: groups.len(),
            failures: breaking_count(groups),
            errors: 0,
            cases: groups.iter().map(test_case).collect(),
        })
        .collect();

    let report = TestSuites {
        name: package_id.to_string(),
        tests: suites.iter().map(|s| s.tests).sum(),
        failures: suites.iter().map(|s| s.failures).sum(),
        errors: 0,
        timestamp: timestamp.to_rfc3339(),
        suites,
    };

    let body = quick_xml::se::to_string(&report).context("Failed to serialize xUnit report")?;
    Ok(format!("<?xml version=\"1.0\" encoding=\"utf-8\"?>\n{}\n", body))
}

/// File name of the report for a package.
pub fn file_name(package_id: &str) -> String {
    format!("{}-changes.xml", package_id)
}
