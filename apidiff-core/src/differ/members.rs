//! Member-level comparison: properties, methods, parameters, generic
//! parameters and fields.

use super::changes::{Change, ChangeType, EntityType};
use crate::identity::{self, display_parameters};
use crate::types::{FieldDef, GenericParameterDef, MethodDef, ParameterDef, PropertyDef, TypeDef};

pub(crate) fn method_display(declaring: &str, method: &MethodDef) -> String {
    format!(
        "{} {}::{}({})",
        method.return_type,
        declaring,
        method.name,
        display_parameters(&method.parameters)
    )
}

pub(crate) fn property_display(declaring: &str, property: &PropertyDef) -> String {
    format!(
        "{} {}::{}({})",
        property.property_type,
        declaring,
        property.name,
        display_parameters(&property.parameters)
    )
}

pub(crate) fn field_display(declaring: &str, field: &FieldDef) -> String {
    format!("{} {}::{}", field.field_type, declaring, field.name)
}

// =============================================================================
// Properties
// =============================================================================

fn find_property<'a>(candidates: &'a [PropertyDef], target: &PropertyDef) -> Option<&'a PropertyDef> {
    candidates.iter().find(|p| {
        p.name == target.name
            && identity::all_equal(
                p.parameters.iter().map(|x| &x.parameter_type),
                target.parameters.iter().map(|x| &x.parameter_type),
            )
    })
}

/// Compare the properties of two matched types.
pub fn diff_properties(a: &TypeDef, b: &TypeDef) -> Vec<Change> {
    let mut changes = Vec::new();

    for p1 in &a.properties {
        match find_property(&b.properties, p1) {
            None => changes.push(Change::breaking(
                ChangeType::Removed,
                EntityType::Property,
                format!("Property removed: {}", property_display(&a.full_name, p1)),
            )),
            Some(p2) => changes.extend(diff_property(&a.full_name, p1, p2)),
        }
    }

    for p2 in &b.properties {
        if find_property(&a.properties, p2).is_none() {
            changes.push(Change::non_breaking(
                ChangeType::Added,
                EntityType::Property,
                format!("Property added: {}", property_display(&b.full_name, p2)),
            ));
        }
    }

    changes
}

fn diff_property(declaring: &str, p1: &PropertyDef, p2: &PropertyDef) -> Vec<Change> {
    let display = property_display(declaring, p1);

    if !identity::equal(&p1.property_type, &p2.property_type) {
        return vec![Change::breaking(
            ChangeType::Modified,
            EntityType::Property,
            format!("Property type changed: {}", display),
        )];
    }

    let mut changes = Vec::new();
    for (accessor, before, after) in [
        ("getter", &p1.getter, &p2.getter),
        ("setter", &p1.setter, &p2.setter),
    ] {
        match (before, after) {
            (Some(m1), Some(m2)) => changes.extend(diff_method(declaring, m1, m2)),
            (Some(_), None) => changes.push(Change::breaking(
                ChangeType::Modified,
                EntityType::Property,
                format!("Property {} removed: {}", accessor, display),
            )),
            (None, Some(_)) => changes.push(Change::non_breaking(
                ChangeType::Modified,
                EntityType::Property,
                format!("Property {} added: {}", accessor, display),
            )),
            (None, None) => {}
        }
    }
    changes
}

// =============================================================================
// Methods
// =============================================================================

fn same_generic_shape(a: &[GenericParameterDef], b: &[GenericParameterDef]) -> bool {
    a.len() == b.len()
        && a.iter()
            .zip(b)
            .all(|(x, y)| x.owner == y.owner && identity::all_equal(&x.constraints, &y.constraints))
}

/// Find the counterpart of `target` among `candidates`.
///
/// Candidates share the signature key and generic shape. When several
/// remain (overloads differing only in return type), the one with the same
/// return type wins, else the first in declaration order.
fn find_method<'a>(
    candidates: &[&'a MethodDef],
    target: &MethodDef,
    without_defaults: bool,
) -> Option<&'a MethodDef> {
    let key = identity::method_signature(target, without_defaults);
    let matching: Vec<&'a MethodDef> = candidates
        .iter()
        .copied()
        .filter(|m| {
            identity::method_signature(m, without_defaults) == key
                && same_generic_shape(&m.generic_parameters, &target.generic_parameters)
        })
        .collect();

    let return_type = identity::normalize(&target.return_type);
    matching
        .iter()
        .copied()
        .find(|m| identity::normalize(&m.return_type) == return_type)
        .or_else(|| matching.first().copied())
}

/// Compare the non-accessor methods of two matched types.
pub fn diff_methods(a: &TypeDef, b: &TypeDef) -> Vec<Change> {
    let methods_a: Vec<&MethodDef> = a.methods.iter().filter(|m| !m.is_property_accessor()).collect();
    let methods_b: Vec<&MethodDef> = b.methods.iter().filter(|m| !m.is_property_accessor()).collect();
    let mut changes = Vec::new();

    for m1 in &methods_a {
        match find_method(&methods_b, m1, false) {
            None => changes.push(Change::breaking(
                ChangeType::Removed,
                EntityType::Method,
                format!("Method removed: {}", method_display(&a.full_name, m1)),
            )),
            Some(m2) => {
                changes.extend(diff_method(&a.full_name, m1, m2));

                // A call site that omitted the defaulted arguments must still bind.
                let has_defaults = m1.parameters.iter().any(ParameterDef::has_default);
                if has_defaults && find_method(&methods_b, m1, true).is_none() {
                    changes.push(Change::breaking(
                        ChangeType::Modified,
                        EntityType::Method,
                        format!(
                            "Method default parameters removed: {}",
                            method_display(&a.full_name, m1)
                        ),
                    ));
                }
            }
        }
    }

    for m2 in &methods_b {
        if find_method(&methods_a, m2, false).is_none() {
            changes.push(Change::non_breaking(
                ChangeType::Added,
                EntityType::Method,
                format!("Method added: {}", method_display(&b.full_name, m2)),
            ));
        }
    }

    changes
}

/// Compare two matched methods (or property accessors).
pub fn diff_method(declaring: &str, m1: &MethodDef, m2: &MethodDef) -> Vec<Change> {
    let display = method_display(declaring, m1);
    let mut changes = Vec::new();
    let mut modified = |breaking: bool, what: &str| {
        let message = format!("Method {}: {}", what, display);
        changes.push(if breaking {
            Change::breaking(ChangeType::Modified, EntityType::Method, message)
        } else {
            Change::non_breaking(ChangeType::Modified, EntityType::Method, message)
        });
    };

    let (f1, f2) = (m1.flags, m2.flags);
    if f1 != f2 {
        if !f1.is_abstract && f2.is_abstract {
            modified(true, "made abstract");
        } else if f1.is_abstract && !f2.is_abstract {
            if f2.is_virtual {
                modified(false, "made non-abstract but virtual");
            } else {
                modified(true, "made non-abstract");
            }
        }

        if !f1.is_virtual && f2.is_virtual {
            modified(true, "made virtual");
        } else if f1.is_virtual && !f2.is_virtual {
            modified(true, "made non-virtual");
        }

        if !f1.is_final && f2.is_final {
            modified(true, "made sealed");
        } else if f1.is_final && !f2.is_final {
            modified(false, "made non-sealed");
        }

        if !f1.is_static && f2.is_static {
            modified(true, "made static");
        } else if f1.is_static && !f2.is_static {
            modified(true, "made non-static");
        }

        let (public1, public2) = (f1.visibility.is_public(), f2.visibility.is_public());
        if public1 && !public2 {
            modified(true, "made non-public");
        } else if !public1 && public2 {
            modified(false, "made public");
        }
    }

    if !identity::equal(&m1.return_type, &m2.return_type) {
        modified(true, "return type changed");
    }

    changes.extend(diff_parameters(&display, &m1.parameters, &m2.parameters));
    changes.extend(diff_generic_parameters(
        &display,
        &m1.generic_parameters,
        &m2.generic_parameters,
    ));
    changes
}

// =============================================================================
// Parameters
// =============================================================================

/// Compare parameter lists position by position.
pub fn diff_parameters(subject: &str, a: &[ParameterDef], b: &[ParameterDef]) -> Vec<Change> {
    if a.len() != b.len() {
        return vec![Change::breaking(
            ChangeType::Modified,
            EntityType::Method,
            format!("Parameter count changed: {}", subject),
        )];
    }

    let mut changes = Vec::new();
    for (p1, p2) in a.iter().zip(b) {
        let mut push = |breaking: bool, what: &str, name: &str| {
            let message = format!("{}: {} {}", what, subject, name);
            changes.push(if breaking {
                Change::breaking(ChangeType::Modified, EntityType::Parameter, message)
            } else {
                Change::non_breaking(ChangeType::Modified, EntityType::Parameter, message)
            });
        };

        // Named arguments at call sites bind by name.
        if p1.name != p2.name {
            push(true, "Parameter name changed", &p1.name);
        }

        if !identity::equal(&p1.parameter_type, &p2.parameter_type)
            && !p1.parameter_type.is_generic_parameter()
        {
            push(true, "Parameter type changed", &p1.name);
        }

        if p1.attributes.without_default() != p2.attributes.without_default()
            || p1.is_sentinel != p2.is_sentinel
        {
            push(true, "Parameter attributes changed", &p1.name);
        }

        match (p1.has_default(), p2.has_default()) {
            (true, false) => push(false, "Default parameter value removed", &p1.name),
            (false, true) => push(false, "Default parameter value added", &p2.name),
            (true, true) if p1.default_value != p2.default_value => {
                push(false, "Default parameter value changed", &p1.name)
            }
            _ => {}
        }
    }
    changes
}

// =============================================================================
// Generic parameters
// =============================================================================

/// Compare generic parameter lists position by position.
pub fn diff_generic_parameters(
    subject: &str,
    a: &[GenericParameterDef],
    b: &[GenericParameterDef],
) -> Vec<Change> {
    if a.len() != b.len() {
        return vec![Change::breaking(
            ChangeType::Modified,
            EntityType::GenericParameter,
            format!("Generic parameter count changed: {}", subject),
        )];
    }

    let mut changes = Vec::new();
    for (g1, g2) in a.iter().zip(b) {
        let mut push = |breaking: bool, what: &str| {
            let message = format!("Generic parameter {}: {} {}", what, subject, g1.name);
            changes.push(if breaking {
                Change::breaking(ChangeType::Modified, EntityType::GenericParameter, message)
            } else {
                Change::non_breaking(ChangeType::Modified, EntityType::GenericParameter, message)
            });
        };

        if g1.name != g2.name {
            push(false, "name changed");
        }

        match (g1.has_constraints(), g2.has_constraints()) {
            (false, true) => push(true, "constraints added"),
            (true, false) => push(false, "constraints removed"),
            _ => {}
        }

        match (g1.requires_default_constructor, g2.requires_default_constructor) {
            (false, true) => push(true, "default constructor constraint added"),
            (true, false) => push(false, "default constructor constraint removed"),
            _ => {}
        }

        match (g1.requires_value_type, g2.requires_value_type) {
            (false, true) => push(true, "non-null value-type constraint added"),
            (true, false) => push(false, "non-null value-type constraint removed"),
            _ => {}
        }

        match (g1.requires_reference_type, g2.requires_reference_type) {
            (false, true) => push(true, "reference-type constraint added"),
            (true, false) => push(false, "reference-type constraint removed"),
            _ => {}
        }
    }
    changes
}

// =============================================================================
// Fields
// =============================================================================

/// Compare the fields of two matched types.
///
/// Enums compare their value table as a whole: appending values is the
/// only non-breaking change.
pub fn diff_fields(a: &TypeDef, b: &TypeDef) -> Vec<Change> {
    if a.flags.is_enum && b.flags.is_enum {
        return diff_enum_values(a, b);
    }

    let mut changes = Vec::new();
    for f1 in &a.fields {
        match b.fields.iter().find(|f| f.name == f1.name) {
            None => changes.push(Change::breaking(
                ChangeType::Removed,
                EntityType::Field,
                format!("Field removed: {}", field_display(&a.full_name, f1)),
            )),
            Some(f2) => changes.extend(diff_field(&a.full_name, f1, f2)),
        }
    }

    for f2 in &b.fields {
        if !a.fields.iter().any(|f| f.name == f2.name) {
            changes.push(Change::non_breaking(
                ChangeType::Added,
                EntityType::Field,
                format!("Field added: {}", field_display(&b.full_name, f2)),
            ));
        }
    }
    changes
}

fn diff_enum_values(a: &TypeDef, b: &TypeDef) -> Vec<Change> {
    let is_prefix = a.fields.len() <= b.fields.len()
        && a.fields
            .iter()
            .zip(&b.fields)
            .all(|(x, y)| x.name == y.name && x.constant == y.constant);

    if !is_prefix {
        vec![Change::breaking(
            ChangeType::Modified,
            EntityType::EnumValue,
            format!("Enum values changed: {}", a.full_name),
        )]
    } else if a.fields.len() < b.fields.len() {
        vec![Change::non_breaking(
            ChangeType::Added,
            EntityType::EnumValue,
            format!("Enum values added: {}", a.full_name),
        )]
    } else {
        vec![]
    }
}

fn diff_field(declaring: &str, f1: &FieldDef, f2: &FieldDef) -> Vec<Change> {
    let display = field_display(declaring, f1);
    let mut changes = Vec::new();
    let mut push = |breaking: bool, what: &str| {
        let message = format!("Field {}: {}", what, display);
        changes.push(if breaking {
            Change::breaking(ChangeType::Modified, EntityType::Field, message)
        } else {
            Change::non_breaking(ChangeType::Modified, EntityType::Field, message)
        });
    };

    if !identity::equal(&f1.field_type, &f2.field_type) {
        push(true, "type changed");
    }

    let (public1, public2) = (f1.visibility.is_public(), f2.visibility.is_public());
    if public1 && !public2 {
        push(true, "made non-public");
    } else if !public1 && public2 {
        push(false, "made public");
    }

    if !f1.is_static && f2.is_static {
        push(true, "made static");
    } else if f1.is_static && !f2.is_static {
        push(true, "made non-static");
    }

    if f1.constant != f2.constant {
        push(false, "value changed");
    }
    changes
}
