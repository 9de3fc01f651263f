//! Turns a provider handle into a [`TypeDefinition`].
//!
//! This is the only place that asks the provider about a type's members. Every type
//! reference met on the way is resolved to a string immediately through
//! [`resolve_name`], so the finished model holds no handles.

use log::debug;

use crate::{
    model::{
        FieldEntry, GenericParameter, MethodEntry, ParameterEntry, PropertyEntry, TypeDefinition,
    },
    naming::resolve_name,
    provider::{MethodInfo, TypeHandle},
    Result,
};

/// Walk a type handle once and collect its description.
///
/// Members keep the provider's enumeration order. The builder validates nothing; a handle
/// the provider can fully enumerate always produces a definition.
///
/// ## Arguments
/// * 'handle' - The type to describe
///
/// # Errors
/// Propagates any failure reported by the provider.
pub fn build<T: TypeHandle>(handle: &T) -> Result<TypeDefinition> {
    let base_type = resolve_name(handle.base_type()?.as_ref());

    let interfaces = handle
        .interfaces()?
        .iter()
        .map(|interface| resolve_name(Some(interface)))
        .collect();

    let generic_parameters = handle
        .generic_parameters()?
        .iter()
        .map(|parameter| GenericParameter {
            name: parameter.name(),
        })
        .collect();

    let fields = handle
        .fields()?
        .into_iter()
        .map(|field| FieldEntry {
            type_name: resolve_name(field.field_type.as_ref()),
            name: field.name,
        })
        .collect();

    let properties = handle
        .properties()?
        .into_iter()
        .map(|property| PropertyEntry {
            type_name: resolve_name(property.property_type.as_ref()),
            name: property.name,
            can_read: property.can_read,
            can_write: property.can_write,
        })
        .collect();

    let methods = handle.methods()?.into_iter().map(method_entry).collect();

    let definition = TypeDefinition {
        namespace: handle.namespace().unwrap_or_default(),
        name: handle.name(),
        is_interface: handle.is_interface(),
        base_type,
        interfaces,
        generic_parameters,
        fields,
        properties,
        methods,
    };

    debug!(
        "built {}.{}: {} interfaces, {} generic parameters, {} fields, {} properties, {} methods",
        definition.namespace,
        definition.name,
        definition.interfaces.len(),
        definition.generic_parameters.len(),
        definition.fields.len(),
        definition.properties.len(),
        definition.methods.len()
    );

    Ok(definition)
}

fn method_entry<T: TypeHandle>(method: MethodInfo<T>) -> MethodEntry {
    MethodEntry {
        return_type: resolve_name(method.return_type.as_ref()),
        parameters: method
            .parameters
            .into_iter()
            .map(|parameter| ParameterEntry {
                type_name: resolve_name(parameter.parameter_type.as_ref()),
                name: parameter.name,
                has_default: parameter.has_default,
            })
            .collect(),
        name: method.name,
    }
}
