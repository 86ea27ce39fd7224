//! Module- and type-level comparison.

use rayon::prelude::*;
use std::collections::HashMap;
use std::time::Instant;

use super::changes::{Change, ChangeType, DiffResult, EntityType, TypeChanges};
use super::members;
use crate::identity;
use crate::types::{Module, TypeDef, TypeFlags};

fn index(types: &[TypeDef]) -> HashMap<&str, &TypeDef> {
    types.iter().map(|t| (t.full_name.as_str(), t)).collect()
}

/// Compare two modules, grouping changes per top-level type.
///
/// Types of `a` come first, in declaration order, followed by one group
/// per type that only exists in `b`. Types of `a` are compared in
/// parallel; the output order does not depend on scheduling.
pub fn diff_modules(a: &Module, b: &Module) -> Vec<TypeChanges> {
    let types_a = index(&a.types);
    let types_b = index(&b.types);

    let mut groups: Vec<TypeChanges> = a
        .types
        .par_iter()
        .map(|type_a| {
            let changes = match types_b.get(type_a.full_name.as_str()) {
                None => {
                    tracing::trace!(type_name = %type_a.full_name, "type only in base");
                    vec![Change::breaking(
                        ChangeType::Removed,
                        EntityType::Type,
                        format!("Type removed: {}", type_a.full_name),
                    )]
                }
                Some(type_b) => {
                    let changes = diff_types(type_a, type_b);
                    tracing::trace!(
                        type_name = %type_a.full_name,
                        changes = changes.len(),
                        "compared type"
                    );
                    changes
                }
            };
            TypeChanges::new(Some(type_a.full_name.clone()), changes)
        })
        .collect();

    groups.extend(
        b.types
            .iter()
            .filter(|t| !types_a.contains_key(t.full_name.as_str()))
            .map(|t| {
                TypeChanges::new(
                    Some(t.full_name.clone()),
                    vec![Change::non_breaking(
                        ChangeType::Added,
                        EntityType::Type,
                        format!("Type added: {}", t.full_name),
                    )],
                )
            }),
    );

    tracing::debug!(
        a = %a.name,
        b = %b.name,
        groups = groups.len(),
        changes = groups.iter().map(|g| g.changes.len()).sum::<usize>(),
        "diffed modules"
    );

    groups
}

/// Compare two modules into a flat change list.
pub fn diff(a: &Module, b: &Module) -> Vec<Change> {
    diff_modules(a, b)
        .into_iter()
        .flat_map(|group| group.changes)
        .collect()
}

/// Compare two modules and collect summary statistics and timing.
pub fn semantic_diff(a: &Module, b: &Module) -> DiffResult {
    let start = Instant::now();
    let mut result = DiffResult::new();
    for group in diff_modules(a, b) {
        result.add_type_changes(group);
    }
    result.finalize(start.elapsed().as_secs_f64() * 1000.0);
    result
}

/// Compare two types with the same full name.
///
/// Nested types are compared recursively and their changes are appended to
/// the enclosing type's list.
pub fn diff_types(a: &TypeDef, b: &TypeDef) -> Vec<Change> {
    let mut changes = Vec::new();

    if a.flags != b.flags {
        diff_type_flags(&a.full_name, &a.flags, &b.flags, &mut changes);
    }

    diff_interfaces(a, b, &mut changes);

    changes.extend(members::diff_generic_parameters(
        &a.full_name,
        &a.generic_parameters,
        &b.generic_parameters,
    ));
    changes.extend(members::diff_properties(a, b));
    changes.extend(members::diff_methods(a, b));

    for nested_a in &a.nested_types {
        match b.nested_type(&nested_a.full_name) {
            None => changes.push(Change::breaking(
                ChangeType::Removed,
                EntityType::Type,
                format!("Type removed: {}", nested_a.full_name),
            )),
            Some(nested_b) => changes.extend(diff_types(nested_a, nested_b)),
        }
    }
    for nested_b in &b.nested_types {
        if a.nested_type(&nested_b.full_name).is_none() {
            changes.push(Change::non_breaking(
                ChangeType::Added,
                EntityType::Type,
                format!("Type added: {}", nested_b.full_name),
            ));
        }
    }

    changes.extend(members::diff_fields(a, b));
    changes
}

fn diff_type_flags(full_name: &str, f1: &TypeFlags, f2: &TypeFlags, changes: &mut Vec<Change>) {
    let mut modified = |breaking: bool, what: &str| {
        let message = format!("Type made {}: {}", what, full_name);
        changes.push(if breaking {
            Change::breaking(ChangeType::Modified, EntityType::Type, message)
        } else {
            Change::non_breaking(ChangeType::Modified, EntityType::Type, message)
        });
    };

    // (before, after, breaking when set, breaking when cleared, name)
    let toggles = [
        (f1.is_interface, f2.is_interface, true, true, "interface"),
        (f1.is_enum, f2.is_enum, true, true, "enum"),
        (f1.is_value_type, f2.is_value_type, true, true, "value-type"),
        (f1.is_abstract, f2.is_abstract, true, false, "abstract"),
        (f1.is_sealed, f2.is_sealed, true, false, "sealed"),
    ];
    for (before, after, set_breaks, clear_breaks, name) in toggles {
        if !before && after {
            modified(set_breaks, name);
        } else if before && !after {
            modified(clear_breaks, &format!("non-{}", name));
        }
    }

    let (public1, public2) = (f1.visibility.is_public(), f2.visibility.is_public());
    if public1 && !public2 {
        modified(true, "non-public");
    } else if !public1 && public2 {
        modified(false, "public");
    }
}

fn diff_interfaces(a: &TypeDef, b: &TypeDef, changes: &mut Vec<Change>) {
    for iface in &a.interfaces {
        if !b.interfaces.iter().any(|other| identity::equal(iface, other)) {
            changes.push(Change::breaking(
                ChangeType::Removed,
                EntityType::Interface,
                format!("Interface removed from type: {} : {}", a.full_name, iface),
            ));
        }
    }
    for iface in &b.interfaces {
        if !a.interfaces.iter().any(|other| identity::equal(iface, other)) {
            changes.push(Change::non_breaking(
                ChangeType::Added,
                EntityType::Interface,
                format!("Interface added to type: {} : {}", a.full_name, iface),
            ));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{FieldDef, MethodDef, PropertyDef, TypeRef, Visibility};

    fn public() -> TypeFlags {
        TypeFlags {
            visibility: Visibility::Public,
            ..Default::default()
        }
    }

    fn void() -> TypeRef {
        TypeRef::named("System.Void", "mscorlib")
    }

    fn public_method(name: &str) -> MethodDef {
        let mut method = MethodDef::new(name, void());
        method.flags.visibility = Visibility::Public;
        method
    }

    fn widget() -> TypeDef {
        let mut widget = TypeDef::new("Lib.Widget", public());
        widget.methods = vec![public_method(".ctor"), public_method("Run")];
        widget.interfaces = vec![TypeRef::named("System.IDisposable", "mscorlib")];
        widget.fields = vec![FieldDef {
            name: "Count".to_string(),
            field_type: TypeRef::named("System.Int32", "mscorlib"),
            is_static: false,
            visibility: Visibility::Public,
            constant: None,
        }];
        let mut getter = public_method("get_Name");
        getter.is_getter = true;
        getter.return_type = TypeRef::named("System.String", "mscorlib");
        widget.methods.push(getter.clone());
        widget.properties = vec![PropertyDef {
            name: "Name".to_string(),
            parameters: vec![],
            property_type: TypeRef::named("System.String", "mscorlib"),
            getter: Some(getter),
            setter: None,
        }];
        widget
            .nested_types
            .push(TypeDef::new("Lib.Widget/Options", public()));
        widget
    }

    fn module(types: Vec<TypeDef>) -> Module {
        Module::new("Lib", types)
    }

    fn messages(changes: &[Change]) -> Vec<String> {
        changes.iter().map(|c| c.to_string()).collect()
    }

    #[test]
    fn test_identical_modules_have_no_changes() {
        let a = module(vec![widget(), TypeDef::new("Lib.Other", public())]);
        assert!(diff(&a, &a.clone()).is_empty());

        let groups = diff_modules(&a, &a);
        assert_eq!(groups.len(), 2);
        assert!(groups.iter().all(|g| g.changes.is_empty()));
    }

    #[test]
    fn test_sealed_class_with_added_method() {
        let a = module(vec![widget()]);
        let mut sealed = widget();
        sealed.flags.is_sealed = true;
        sealed.methods.push(public_method("Stop"));
        let b = module(vec![sealed]);

        assert_eq!(
            messages(&diff(&a, &b)),
            vec![
                "B Type made sealed: Lib.Widget",
                "N Method added: System.Void Lib.Widget::Stop()",
            ]
        );
    }

    #[test]
    fn test_type_removed_and_added() {
        let a = module(vec![widget(), TypeDef::new("Lib.Old", public())]);
        let b = module(vec![TypeDef::new("Lib.New", public()), widget()]);

        let groups = diff_modules(&a, &b);
        let names: Vec<Option<&str>> = groups.iter().map(|g| g.type_name.as_deref()).collect();
        assert_eq!(names, vec![Some("Lib.Widget"), Some("Lib.Old"), Some("Lib.New")]);
        assert_eq!(messages(&groups[1].changes), vec!["B Type removed: Lib.Old"]);
        assert_eq!(messages(&groups[2].changes), vec!["N Type added: Lib.New"]);
    }

    #[test]
    fn test_type_flag_changes() {
        let a = TypeDef::new("Lib.Shape", public());
        let mut b = a.clone();
        b.flags.is_abstract = true;
        b.flags.visibility = Visibility::Internal;

        assert_eq!(
            messages(&diff_types(&a, &b)),
            vec![
                "B Type made abstract: Lib.Shape",
                "B Type made non-public: Lib.Shape",
            ]
        );
        assert_eq!(
            messages(&diff_types(&b, &a)),
            vec![
                "N Type made non-abstract: Lib.Shape",
                "N Type made public: Lib.Shape",
            ]
        );
    }

    #[test]
    fn test_interface_changes() {
        let a = widget();
        let mut b = widget();
        b.interfaces = vec![TypeRef::named("System.ICloneable", "mscorlib")];

        assert_eq!(
            messages(&diff_types(&a, &b)),
            vec![
                "B Interface removed from type: Lib.Widget : System.IDisposable",
                "N Interface added to type: Lib.Widget : System.ICloneable",
            ]
        );
    }

    #[test]
    fn test_interface_scope_matters() {
        let a = widget();
        let mut b = widget();
        b.interfaces = vec![TypeRef::named("System.IDisposable", "System.Runtime")];

        let changes = diff_types(&a, &b);
        assert_eq!(changes.len(), 2);
        assert!(changes[0].is_breaking());
    }

    #[test]
    fn test_nested_type_changes_append_to_parent() {
        let a = widget();
        let mut b = widget();
        b.nested_types[0].flags.is_sealed = true;
        b.nested_types
            .push(TypeDef::new("Lib.Widget/Extra", public()));

        let groups = diff_modules(&module(vec![a]), &module(vec![b]));
        assert_eq!(groups.len(), 1);
        assert_eq!(
            messages(&groups[0].changes),
            vec![
                "B Type made sealed: Lib.Widget/Options",
                "N Type added: Lib.Widget/Extra",
            ]
        );
    }

    #[test]
    fn test_nested_type_removed() {
        let a = widget();
        let mut b = widget();
        b.nested_types.clear();

        assert_eq!(
            messages(&diff_types(&a, &b)),
            vec!["B Type removed: Lib.Widget/Options"]
        );
    }

    #[test]
    fn test_made_enum() {
        let a = TypeDef::new("Lib.Kind", public());
        let mut b = a.clone();
        b.flags.is_enum = true;
        b.flags.is_value_type = true;

        assert_eq!(
            messages(&diff_types(&a, &b)),
            vec!["B Type made enum: Lib.Kind", "B Type made value-type: Lib.Kind"]
        );
    }

    #[test]
    fn test_interface_toggle() {
        let class = TypeDef::new("Lib.Shape", public());
        let mut iface = class.clone();
        iface.flags.is_interface = true;
        iface.flags.is_abstract = true;

        assert_eq!(
            messages(&diff_types(&class, &iface)),
            vec!["B Type made interface: Lib.Shape", "B Type made abstract: Lib.Shape"]
        );
        assert_eq!(
            messages(&diff_types(&iface, &class)),
            vec![
                "B Type made non-interface: Lib.Shape",
                "N Type made non-abstract: Lib.Shape",
            ]
        );
    }

    #[test]
    fn test_semantic_diff_summary() {
        let a = module(vec![widget()]);
        let mut b = module(vec![widget()]);
        b.types[0].methods.push(public_method("Stop"));
        b.types.push(TypeDef::new("Lib.New", public()));

        let result = semantic_diff(&a, &b);
        assert_eq!(result.change_count(), 2);
        assert!(!result.has_breaking_changes());
        assert_eq!(result.summary.methods.added, 1);
        assert_eq!(result.summary.types.added, 1);
        assert_eq!(result.summary_text, "types: 1 added; methods: 1 added");
    }

    #[test]
    fn test_deterministic_order_across_runs() {
        let types: Vec<TypeDef> = (0..64)
            .map(|i| TypeDef::new(format!("Lib.T{}", i), public()))
            .collect();
        let a = module(types.clone());
        let b = module(types.into_iter().skip(1).collect());

        let first = messages(&diff(&a, &b));
        for _ in 0..4 {
            assert_eq!(messages(&diff(&a, &b)), first);
        }
        assert_eq!(first, vec!["B Type removed: Lib.T0"]);
    }
}
