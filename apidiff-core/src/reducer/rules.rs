//! Visibility rules for facade reduction.

use serde::{Deserialize, Serialize};

use crate::types::{Module, TypeDef, Visibility};

/// Which declarations belong to a module's public contract.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FacadeRules {
    /// Also keep internal and protected-and-internal declarations.
    pub keep_internals: bool,
}

impl FacadeRules {
    pub fn new(keep_internals: bool) -> Self {
        Self { keep_internals }
    }

    /// Keep internals only when the module shares them with another module.
    pub fn for_module(module: &Module) -> Self {
        Self::new(!module.internals_visible_to.is_empty())
    }

    /// Check a top-level type. Anything not public is module-internal.
    pub fn keep_top_level(&self, visibility: Visibility) -> bool {
        visibility.is_public() || self.keep_internals
    }

    /// Check a member or nested type.
    pub fn keep_member(&self, visibility: Visibility) -> bool {
        match visibility {
            Visibility::Public | Visibility::Protected | Visibility::ProtectedOrInternal => true,
            Visibility::Internal | Visibility::ProtectedAndInternal => self.keep_internals,
            Visibility::Private => false,
        }
    }

    /// Check a type, using the nested rule for nested types.
    pub fn keep_type(&self, type_def: &TypeDef) -> bool {
        if type_def.is_nested() {
            self.keep_member(type_def.flags.visibility)
        } else {
            self.keep_top_level(type_def.flags.visibility)
        }
    }
}
