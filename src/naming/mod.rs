//! Type-name resolution for the output dialect.
//!
//! Every type reference that appears in the output (base types, interfaces, member types,
//! parameter types) passes through [`resolve_name`]. The rules are applied in order:
//!
//! 1. an absent reference becomes the empty string
//! 2. a generic parameter is emitted by its bare name
//! 3. an array becomes `Array<element>`, recursively
//! 4. the four aliased primitives ([`Primitive`]) become their native names
//! 5. anything else becomes `cs.<lowercase namespace>.<name><args>`
//!
//! Simple names always go through [`convert_generic_tick`], so the backtick arity suffix the
//! runtime uses for generic types (``List`1``) never reaches the output.
//!
//! # Examples
//!
//! ```rust
//! use externdump::naming::{convert_generic_tick, namespace_path};
//!
//! assert_eq!(convert_generic_tick("Dictionary`2"), "Dictionary_2");
//! assert_eq!(namespace_path("System.Collections"), "cs.system.collections");
//! assert_eq!(namespace_path(""), "cs");
//! ```

use std::borrow::Cow;

use crate::provider::TypeHandle;

mod primitives;

pub use primitives::{Primitive, PRIMITIVE_NAMESPACE};

/// Root package every resolved reference is placed under
pub const TARGET_ROOT: &str = "cs";

/// Rewrite a trailing ``Name`N`` arity suffix to `Name_N`.
///
/// Only the last backtick counts, and only when it is followed by one or more digits that
/// run to the end of the name. Anything else is returned unchanged, which makes the
/// conversion idempotent.
///
/// ## Arguments
/// * 'name' - A simple type name as reported by the runtime
#[must_use]
pub fn convert_generic_tick(name: &str) -> Cow<'_, str> {
    match name.rsplit_once('`') {
        Some((base, arity)) if !arity.is_empty() && arity.bytes().all(|b| b.is_ascii_digit()) => {
            Cow::Owned(format!("{base}_{arity}"))
        }
        _ => Cow::Borrowed(name),
    }
}

/// The dotted package path for a namespace: `cs`, or `cs.` followed by the lowercased
/// namespace.
///
/// ## Arguments
/// * 'namespace' - Namespace in its original casing, empty for the global namespace
#[must_use]
pub fn namespace_path(namespace: &str) -> String {
    if namespace.is_empty() {
        TARGET_ROOT.to_string()
    } else {
        format!("{TARGET_ROOT}.{}", namespace.to_lowercase())
    }
}

/// Resolve a type reference to its canonical name in the output dialect.
///
/// Never fails; an absent reference maps to the empty string.
///
/// ## Arguments
/// * 'ty' - The type reference to resolve
pub fn resolve_name<T: TypeHandle>(ty: Option<&T>) -> String {
    let Some(ty) = ty else {
        return String::new();
    };

    if ty.is_generic_parameter() {
        return ty.name();
    }

    if let Some(element) = ty.element_type() {
        return format!("Array<{}>", resolve_name(Some(&element)));
    }

    let namespace = ty.namespace();
    let name = ty.name();
    if let Some(primitive) = Primitive::from_runtime_name(namespace.as_deref(), &name) {
        return primitive.alias().to_string();
    }

    let arguments: Vec<String> = ty
        .generic_arguments()
        .iter()
        .map(|argument| resolve_name(Some(argument)))
        .collect();

    let mut resolved = namespace_path(namespace.as_deref().unwrap_or_default());
    resolved.push('.');
    resolved.push_str(&convert_generic_tick(&name));
    if !arguments.is_empty() {
        resolved.push('<');
        resolved.push_str(&arguments.join(", "));
        resolved.push('>');
    }

    resolved
}
