//! The in-memory description of one type.
//!
//! A [`TypeDefinition`] is built once by [`builder::build`], rendered once by
//! [`crate::serializer`], and never changed in between. All type references inside it are
//! already resolved to their output names; nothing points back into the provider.

pub mod builder;

use crate::{provider::TypeHandle, Result};

/// Snapshot of a single class or interface
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TypeDefinition {
    /// Namespace in its original casing, empty for the global namespace
    pub namespace: String,
    /// Simple name as reported by the binary, arity suffix included
    pub name: String,
    /// The type is an interface
    pub is_interface: bool,
    /// Resolved name of the base type, empty if there is none
    pub base_type: String,
    /// Resolved names of the implemented interfaces
    pub interfaces: Vec<String>,
    /// Declared generic parameters
    pub generic_parameters: Vec<GenericParameter>,
    /// Public fields
    pub fields: Vec<FieldEntry>,
    /// Public properties
    pub properties: Vec<PropertyEntry>,
    /// Public methods
    pub methods: Vec<MethodEntry>,
}

impl TypeDefinition {
    /// Build the snapshot for a type handle, see [`builder::build`].
    ///
    /// ## Arguments
    /// * 'handle' - The type to describe
    ///
    /// # Errors
    /// Propagates any failure reported by the provider while enumerating the type.
    pub fn from_handle<T: TypeHandle>(handle: &T) -> Result<Self> {
        builder::build(handle)
    }
}

/// A generic parameter of the described type
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenericParameter {
    /// Parameter name (`T`, `TKey`, ...)
    pub name: String,
}

/// A public field
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldEntry {
    /// Field name
    pub name: String,
    /// Resolved field type
    pub type_name: String,
}

/// A public property
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PropertyEntry {
    /// Property name
    pub name: String,
    /// Resolved property type
    pub type_name: String,
    /// The property has a getter
    pub can_read: bool,
    /// The property has a setter
    pub can_write: bool,
}

/// A public method
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MethodEntry {
    /// Method name
    pub name: String,
    /// Resolved return type
    pub return_type: String,
    /// Parameters in declaration order
    pub parameters: Vec<ParameterEntry>,
}

/// A parameter of a [`MethodEntry`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParameterEntry {
    /// Parameter name
    pub name: String,
    /// Resolved parameter type
    pub type_name: String,
    /// A default value is declared; the value itself is not recorded
    pub has_default: bool,
}
