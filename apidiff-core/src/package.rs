//! Package comparison: every module of a base package against its
//! counterpart in a head package, per target framework.

use std::collections::BTreeMap;

use semver::Version;
use serde::{Deserialize, Serialize};

use crate::differ::{diff_modules, Change, ChangeType, EntityType, TypeChanges};
use crate::reducer::reduce;
use crate::types::Module;
use crate::version::next_version;

/// A distributable package: an id, a version and the modules it ships
/// for each target framework.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Package {
    pub id: String,
    pub version: Version,
    #[serde(default)]
    pub frameworks: BTreeMap<String, Vec<PackageAssembly>>,
}

/// One module inside a package, keyed by its path in the package.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PackageAssembly {
    pub path: String,
    pub module: Module,
}

/// Result of comparing two packages.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PackageDiff {
    pub frameworks: BTreeMap<String, Vec<TypeChanges>>,
    pub suggested_version: Version,
}

impl PackageDiff {
    /// All changes across frameworks, in report order.
    pub fn changes(&self) -> impl Iterator<Item = &Change> {
        self.frameworks
            .values()
            .flatten()
            .flat_map(|group| group.changes.iter())
    }

    pub fn has_breaking_changes(&self) -> bool {
        self.changes().any(Change::is_breaking)
    }

    /// Frameworks with at least one change.
    pub fn changed_frameworks(&self) -> impl Iterator<Item = (&String, &Vec<TypeChanges>)> {
        self.frameworks
            .iter()
            .filter(|(_, groups)| groups.iter().any(|g| !g.changes.is_empty()))
    }
}

/// Compare `head` against `base`.
///
/// Only the base package's frameworks are considered. Both sides of each
/// assembly are reduced to their public facade before comparison.
pub fn compare_packages(base: &Package, head: &Package) -> PackageDiff {
    let mut frameworks = BTreeMap::new();

    for (framework, assemblies) in &base.frameworks {
        let head_assemblies: &[PackageAssembly] = head
            .frameworks
            .get(framework)
            .map(Vec::as_slice)
            .unwrap_or_default();
        frameworks.insert(
            framework.clone(),
            compare_framework(framework, assemblies, head_assemblies),
        );
    }

    let suggested_version = next_version(
        &base.version,
        frameworks
            .values()
            .flatten()
            .flat_map(|group: &TypeChanges| group.changes.iter()),
    );

    tracing::debug!(
        id = %base.id,
        base = %base.version,
        head = %head.version,
        suggested = %suggested_version,
        "compared packages"
    );

    PackageDiff {
        frameworks,
        suggested_version,
    }
}

fn compare_framework(
    framework: &str,
    base: &[PackageAssembly],
    head: &[PackageAssembly],
) -> Vec<TypeChanges> {
    if !base.is_empty() && head.is_empty() {
        return vec![TypeChanges::new(
            None,
            vec![Change::non_breaking(
                ChangeType::Removed,
                EntityType::Framework,
                format!("Framework support removed: {}", framework),
            )],
        )];
    }

    let mut groups = Vec::new();
    let mut removed = Vec::new();
    for assembly in base {
        match head.iter().find(|a| a.path == assembly.path) {
            Some(counterpart) => {
                let a = reduce(&assembly.module, false);
                let b = reduce(&counterpart.module, false);
                groups.extend(diff_modules(&a, &b));
            }
            None => removed.push(Change::breaking(
                ChangeType::Removed,
                EntityType::Assembly,
                format!("Assembly removed: {}", assembly.path),
            )),
        }
    }

    if !removed.is_empty() {
        groups.push(TypeChanges::new(None, removed));
    }
    groups
}
