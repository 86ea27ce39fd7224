//! Reading and writing metadata documents, and type resolution.
//!
//! Decoding compiled binaries is left to an external exporter; this crate
//! exchanges the metadata model as JSON.

use std::collections::HashSet;
use std::fs;
use std::path::Path;

use crate::error::{ApiDiffError, Result};
use crate::package::Package;
use crate::types::{Module, TypeDef, TypeRef};

/// Resolves a type reference to its definition.
///
/// `None` means the definition is not available (for example it lives in
/// a module outside the comparison). Callers choose their own fallback.
pub trait TypeResolver {
    fn resolve(&self, reference: &TypeRef) -> Option<&TypeDef>;
}

impl TypeResolver for Module {
    fn resolve(&self, reference: &TypeRef) -> Option<&TypeDef> {
        match reference {
            TypeRef::Named { full_name, scope } => {
                if !scope.is_empty() && *scope != self.name {
                    return None;
                }
                find_recursive(&self.types, full_name)
            }
            TypeRef::GenericInstance { definition, .. } => self.resolve(definition),
            TypeRef::GenericParameter { .. } => None,
        }
    }
}

impl TypeResolver for [Module] {
    fn resolve(&self, reference: &TypeRef) -> Option<&TypeDef> {
        self.iter().find_map(|module| module.resolve(reference))
    }
}

fn find_recursive<'a>(types: &'a [TypeDef], full_name: &str) -> Option<&'a TypeDef> {
    for type_def in types {
        if type_def.full_name == full_name {
            return Some(type_def);
        }
        if let Some(found) = find_recursive(&type_def.nested_types, full_name) {
            return Some(found);
        }
    }
    None
}

/// Load and validate a module document.
pub fn load_module(path: &Path) -> Result<Module> {
    let bytes = fs::read(path).map_err(|e| ApiDiffError::io(path, e))?;
    let module = module_from_slice(&bytes)?;
    tracing::debug!(
        path = %path.display(),
        module = %module.name,
        types = module.type_count(),
        "loaded module"
    );
    Ok(module)
}

/// Parse and validate a module document held in memory.
pub fn module_from_slice(bytes: &[u8]) -> Result<Module> {
    let module: Module = serde_json::from_slice(bytes)?;
    validate(&module)?;
    Ok(module)
}

/// Write a module document, pretty-printed.
pub fn write_module(path: &Path, module: &Module) -> Result<()> {
    let json = serde_json::to_string_pretty(module)?;
    fs::write(path, json).map_err(|e| ApiDiffError::io(path, e))
}

/// Load a package document and validate every module it carries.
pub fn load_package(path: &Path) -> Result<Package> {
    let bytes = fs::read(path).map_err(|e| ApiDiffError::io(path, e))?;
    let package: Package = serde_json::from_slice(&bytes)?;
    for assembly in package.frameworks.values().flatten() {
        validate(&assembly.module)?;
    }
    tracing::debug!(
        path = %path.display(),
        id = %package.id,
        version = %package.version,
        frameworks = package.frameworks.len(),
        "loaded package"
    );
    Ok(package)
}

/// Check the invariants the diff engine relies on.
pub fn validate(module: &Module) -> Result<()> {
    if module.name.trim().is_empty() {
        return Err(ApiDiffError::invalid(&module.name, "module name is empty"));
    }

    let mut seen = HashSet::new();
    check_unique(module, &module.types, &mut seen)
}

fn check_unique<'a>(
    module: &Module,
    types: &'a [TypeDef],
    seen: &mut HashSet<&'a str>,
) -> Result<()> {
    for type_def in types {
        if !seen.insert(type_def.full_name.as_str()) {
            return Err(ApiDiffError::invalid(
                &module.name,
                format!("duplicate type {}", type_def.full_name),
            ));
        }
        check_unique(module, &type_def.nested_types, seen)?;
    }
    Ok(())
}
