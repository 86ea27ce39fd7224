//! Facade reduction: strip a module down to its externally visible surface.
//!
//! Reduction builds a new graph and leaves its input untouched. Surviving
//! method bodies become [`MethodBody::Unreachable`]; the diff engine never
//! looks at bodies, so this only matters when the facade is written out.

pub mod rules;

pub use rules::FacadeRules;

use crate::loader::TypeResolver;
use crate::types::{MethodBody, MethodDef, Module, PropertyDef, TypeDef};

/// Reduce a module, resolving interfaces against the module itself.
pub fn reduce(module: &Module, keep_internals: bool) -> Module {
    reduce_with(module, FacadeRules::new(keep_internals), module)
}

/// Reduce a module using [`FacadeRules::for_module`].
pub fn reduce_default(module: &Module) -> Module {
    reduce_with(module, FacadeRules::for_module(module), module)
}

/// Reduce a module with explicit rules and resolver.
pub fn reduce_with(module: &Module, rules: FacadeRules, resolver: &dyn TypeResolver) -> Module {
    let types: Vec<TypeDef> = module
        .types
        .iter()
        .filter(|t| rules.keep_top_level(t.flags.visibility))
        .map(|t| reduce_type(t, rules, resolver))
        .collect();

    let reduced = Module {
        name: module.name.clone(),
        internals_visible_to: module.internals_visible_to.clone(),
        types,
    };

    tracing::debug!(
        module = %module.name,
        keep_internals = rules.keep_internals,
        types_before = module.type_count(),
        types_after = reduced.type_count(),
        "reduced module to facade"
    );

    reduced
}

fn reduce_type(type_def: &TypeDef, rules: FacadeRules, resolver: &dyn TypeResolver) -> TypeDef {
    // An interface whose definition cannot be found is assumed visible.
    let interfaces = type_def
        .interfaces
        .iter()
        .filter(|iface| match resolver.resolve(iface) {
            Some(resolved) => rules.keep_type(resolved),
            None => true,
        })
        .cloned()
        .collect();

    let fields = type_def
        .fields
        .iter()
        .filter(|f| rules.keep_member(f.visibility))
        .cloned()
        .collect();

    let methods = type_def
        .methods
        .iter()
        .filter(|m| rules.keep_member(m.flags.visibility))
        .map(stub_body)
        .collect();

    let properties = type_def
        .properties
        .iter()
        .filter_map(|p| reduce_property(p, rules))
        .collect();

    let nested_types = type_def
        .nested_types
        .iter()
        .filter(|t| rules.keep_member(t.flags.visibility))
        .map(|t| reduce_type(t, rules, resolver))
        .collect();

    TypeDef {
        full_name: type_def.full_name.clone(),
        flags: type_def.flags,
        interfaces,
        generic_parameters: type_def.generic_parameters.clone(),
        methods,
        properties,
        fields,
        nested_types,
    }
}

/// Keep the surviving accessors; a property with none left disappears.
fn reduce_property(property: &PropertyDef, rules: FacadeRules) -> Option<PropertyDef> {
    let keep = |accessor: &Option<MethodDef>| {
        accessor
            .as_ref()
            .filter(|m| rules.keep_member(m.flags.visibility))
            .map(stub_body)
    };

    let getter = keep(&property.getter);
    let setter = keep(&property.setter);
    if getter.is_none() && setter.is_none() {
        return None;
    }

    Some(PropertyDef {
        name: property.name.clone(),
        parameters: property.parameters.clone(),
        property_type: property.property_type.clone(),
        getter,
        setter,
    })
}

fn stub_body(method: &MethodDef) -> MethodDef {
    let mut method = method.clone();
    if method.body.is_some() {
        method.body = Some(MethodBody::Unreachable);
    }
    method
}
