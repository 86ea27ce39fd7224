//! Next-version suggestion from a set of classified changes.

use semver::Version;

use crate::differ::Change;

/// Suggest the version that should follow `current` given `changes`.
///
/// Standard semver rules, with two refinements for prereleases: a
/// prerelease whose patch is 0 already reserves a minor bump, and one
/// whose minor and patch are both 0 already reserves a major bump. Below
/// 1.0.0 every breaking change bumps the minor. The result never carries
/// prerelease or build metadata.
pub fn next_version<'a>(current: &Version, changes: impl IntoIterator<Item = &'a Change>) -> Version {
    let mut any = false;
    let mut breaking = false;
    for change in changes {
        any = true;
        breaking |= change.is_breaking();
    }

    let (mut major, mut minor, mut patch) = (current.major, current.minor, current.patch);
    let prerelease = !current.pre.is_empty();

    if !any {
        if !prerelease {
            patch += 1;
        }
    } else if !breaking || major == 0 {
        if !(prerelease && patch == 0) || (major == 0 && breaking) {
            minor += 1;
            patch = 0;
        }
    } else if !(prerelease && patch == 0 && minor == 0) {
        major += 1;
        minor = 0;
        patch = 0;
    }

    Version::new(major, minor, patch)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::differ::{ChangeType, EntityType};

    fn suggest(current: &str, breaking: bool, non_breaking: bool) -> String {
        let mut changes = Vec::new();
        if breaking {
            changes.push(Change::breaking(ChangeType::Modified, EntityType::Type, "breaking"));
        }
        if non_breaking {
            changes.push(Change::non_breaking(ChangeType::Added, EntityType::Type, "non-breaking"));
        }
        let current = Version::parse(current).unwrap();
        next_version(&current, &changes).to_string()
    }

    #[test]
    fn test_stable_versions() {
        assert_eq!(suggest("1.0.0", false, false), "1.0.1");
        assert_eq!(suggest("1.0.0", false, true), "1.1.0");
        assert_eq!(suggest("1.0.0", true, false), "2.0.0");
        assert_eq!(suggest("1.0.0", true, true), "2.0.0");
    }

    #[test]
    fn test_zero_major_versions() {
        assert_eq!(suggest("0.1.0", false, false), "0.1.1");
        assert_eq!(suggest("0.1.0", false, true), "0.2.0");
        assert_eq!(suggest("0.1.0", true, false), "0.2.0");
        assert_eq!(suggest("0.1.0", true, true), "0.2.0");
    }

    #[test]
    fn test_zero_major_prereleases() {
        assert_eq!(suggest("0.1.0-beta1", false, false), "0.1.0");
        assert_eq!(suggest("0.1.0-beta1", false, true), "0.1.0");
        assert_eq!(suggest("0.1.0-beta1", true, false), "0.2.0");
        assert_eq!(suggest("0.1.0-beta1", true, true), "0.2.0");

        assert_eq!(suggest("0.1.1-beta1", false, false), "0.1.1");
        assert_eq!(suggest("0.1.1-beta1", false, true), "0.2.0");
        assert_eq!(suggest("0.1.1-beta1", true, false), "0.2.0");
        assert_eq!(suggest("0.1.1-beta1", true, true), "0.2.0");
    }

    #[test]
    fn test_major_prerelease_reserves_major_bump() {
        assert_eq!(suggest("1.0.0-beta1", false, false), "1.0.0");
        assert_eq!(suggest("1.0.0-beta1", false, true), "1.0.0");
        assert_eq!(suggest("1.0.0-beta1", true, false), "1.0.0");
        assert_eq!(suggest("1.0.0-beta1", true, true), "1.0.0");
    }

    #[test]
    fn test_patch_prerelease() {
        assert_eq!(suggest("1.0.1-beta1", false, false), "1.0.1");
        assert_eq!(suggest("1.0.1-beta1", false, true), "1.1.0");
        assert_eq!(suggest("1.0.1-beta1", true, false), "2.0.0");
        assert_eq!(suggest("1.0.1-beta1", true, true), "2.0.0");
    }

    #[test]
    fn test_minor_prerelease() {
        assert_eq!(suggest("1.1.0-beta1", false, false), "1.1.0");
        assert_eq!(suggest("1.1.0-beta1", false, true), "1.1.0");
        assert_eq!(suggest("1.1.0-beta1", true, false), "2.0.0");
        assert_eq!(suggest("1.1.0-beta1", true, true), "2.0.0");

        assert_eq!(suggest("1.1.1-beta1", false, false), "1.1.1");
        assert_eq!(suggest("1.1.1-beta1", false, true), "1.2.0");
        assert_eq!(suggest("1.1.1-beta1", true, false), "2.0.0");
        assert_eq!(suggest("1.1.1-beta1", true, true), "2.0.0");
    }

    #[test]
    fn test_build_metadata_dropped() {
        let current = Version::parse("1.2.3+build.7").unwrap();
        let none: Vec<Change> = vec![];
        let next = next_version(&current, &none);
        assert_eq!(next, Version::new(1, 2, 4));
        assert!(next.build.is_empty());
    }
}
