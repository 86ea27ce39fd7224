//! Structural diff engine for metadata modules.
//!
//! Two modules are walked side by side and every difference in their
//! surface is reported as a [`Change`], classified as breaking or
//! non-breaking for existing compiled consumers.
//!
//! # Features
//!
//! - **Type-level diffing**: kind and modifier flags, interfaces, generic parameters
//! - **Member diffing**: properties, methods, parameters, fields, enum value tables
//! - **Overload matching**: methods match by signature key, optional-parameter aware
//! - **Parallel processing**: top-level types are compared concurrently via Rayon
//!
//! # Example
//!
//! ```
//! use apidiff_core::differ::diff;
//! use apidiff_core::types::Module;
//!
//! let before = Module::new("Lib", vec![]);
//! let after = before.clone();
//! assert!(diff(&before, &after).is_empty());
//! ```

pub mod changes;
pub mod comparator;
pub mod members;

pub use changes::{
    Change, ChangeCounts, ChangeType, Classification, DiffResult, DiffSummary, EntityType,
    TypeChanges,
};
pub use comparator::{diff, diff_modules, diff_types, semantic_diff};
