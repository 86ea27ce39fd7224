//! apidiff core - public API surface comparison for compiled modules.
//!
//! This crate reduces a module's metadata to its externally visible
//! facade, compares two facades structurally, classifies every difference
//! as breaking or non-breaking, and suggests the next semantic version.
//!
//! # Features
//!
//! - **Facade reduction**: keep only what other modules can reference
//! - **Structural diffing**: types, members, signatures and enum tables
//! - **Parallel comparison**: top-level types are diffed concurrently using Rayon
//! - **Version suggestion**: semver next version from classified changes
//! - **Package comparison**: per-framework module comparison
//!
//! # Usage
//!
//! ```no_run
//! use std::path::Path;
//!
//! let before = apidiff_core::load_module(Path::new("before.json"))?;
//! let after = apidiff_core::load_module(Path::new("after.json"))?;
//!
//! let changes = apidiff_core::diff(
//!     &apidiff_core::reduce(&before, false),
//!     &apidiff_core::reduce(&after, false),
//! );
//! for change in &changes {
//!     println!("{}", change);
//! }
//! # Ok::<(), apidiff_core::ApiDiffError>(())
//! ```

pub mod differ;
pub mod error;
pub mod identity;
pub mod loader;
pub mod package;
pub mod reducer;
pub mod types;
pub mod version;

pub use differ::{
    diff, diff_modules, diff_types, semantic_diff, Change, ChangeType, Classification,
    DiffResult, DiffSummary, EntityType, TypeChanges,
};
pub use error::{ApiDiffError, Result};
pub use loader::{load_module, load_package, module_from_slice, write_module, TypeResolver};
pub use package::{compare_packages, Package, PackageAssembly, PackageDiff};
pub use reducer::{reduce, reduce_default, reduce_with, FacadeRules};
pub use version::next_version;
