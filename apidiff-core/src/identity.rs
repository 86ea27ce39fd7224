//! Canonical identity of type references.
//!
//! Generic parameters normalize by owner kind and position, never by name,
//! so renaming `T` to `TItem` still lines up across versions.

use crate::types::{GenericOwner, MethodDef, ParameterDef, TypeRef};

/// Canonical key for a type reference.
///
/// - method generic parameter at position N: `!!N`
/// - type generic parameter at position N: `!N`
/// - generic instance: `definition<arg,arg>`
/// - anything else: its full name
pub fn normalize(type_ref: &TypeRef) -> String {
    let mut out = String::new();
    write_normalized(type_ref, &mut out);
    out
}

fn write_normalized(type_ref: &TypeRef, out: &mut String) {
    match type_ref {
        TypeRef::Named { full_name, .. } => out.push_str(full_name),
        TypeRef::GenericInstance {
            definition,
            arguments,
        } => {
            write_normalized(definition, out);
            out.push('<');
            for (i, argument) in arguments.iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                write_normalized(argument, out);
            }
            out.push('>');
        }
        TypeRef::GenericParameter {
            owner, position, ..
        } => {
            out.push_str(match owner {
                GenericOwner::Method => "!!",
                GenericOwner::Type => "!",
            });
            out.push_str(&position.to_string());
        }
    }
}

/// Whether two references denote the same type.
///
/// Same normalized name and same declaring scope. Two same-named types
/// from different scopes are unequal; a portable reference and the real
/// framework assembly for one type are not reconciled.
pub fn equal(a: &TypeRef, b: &TypeRef) -> bool {
    normalize(a) == normalize(b) && a.scope() == b.scope()
}

/// Element-wise [`equal`] over two sequences.
pub fn all_equal<'a, A, B>(a: A, b: B) -> bool
where
    A: IntoIterator<Item = &'a TypeRef>,
    B: IntoIterator<Item = &'a TypeRef>,
{
    let mut a = a.into_iter();
    let mut b = b.into_iter();
    loop {
        match (a.next(), b.next()) {
            (None, None) => return true,
            (Some(x), Some(y)) if equal(x, y) => continue,
            _ => return false,
        }
    }
}

/// Matching key for a method: name and normalized parameter types.
///
/// The return type is not part of the key. With `without_defaults`,
/// parameters that carry a default value are left out, which models a
/// call site that omits the optional arguments.
pub fn method_signature(method: &MethodDef, without_defaults: bool) -> String {
    let mut out = method.name.clone();
    out.push('(');
    let parameters = method
        .parameters
        .iter()
        .filter(|p| !(without_defaults && p.has_default()));
    for (i, parameter) in parameters.enumerate() {
        if i > 0 {
            out.push(',');
        }
        if parameter.is_sentinel {
            out.push_str("...,");
        }
        write_normalized(&parameter.parameter_type, &mut out);
    }
    out.push(')');
    out
}

/// Display form of a parameter type list, e.g. `System.Int32,T`.
pub(crate) fn display_parameters(parameters: &[ParameterDef]) -> String {
    parameters
        .iter()
        .map(|p| p.parameter_type.to_string())
        .collect::<Vec<_>>()
        .join(",")
}
