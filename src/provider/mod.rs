//! The metadata provider seam.
//!
//! Everything that depends on how a binary is actually read lives behind the two traits in
//! this module. [`TypeMetadataProvider`] loads binaries and enumerates the types they make
//! visible; [`TypeHandle`] answers the per-type questions that the name resolver and the
//! model builder ask. The rest of the crate never touches a concrete metadata reader.
//!
//! The crate ships one implementation, [`cil::CilProvider`], which reads
//! ECMA-335 metadata with the `dotscope` crate.
//!
//! # Member records
//!
//! Members are reported as plain records generic over the handle type. Type references
//! inside them are `Option<T>`: a reference the provider cannot resolve is `None` and is
//! rendered as an empty string.

use std::path::Path;

use crate::Result;

pub mod cil;

/// Loads binaries and enumerates the types visible through them.
///
/// A provider is owned by exactly one [`crate::lookup::LookupDriver`] and is filled once,
/// before any lookup happens.
pub trait TypeMetadataProvider {
    /// The handle type this provider hands out for every type reference
    type Handle: TypeHandle;

    /// Load a binary and make its types visible.
    ///
    /// ## Arguments
    /// * 'path' - Path of the binary to load
    ///
    /// # Errors
    /// Returns [`crate::Error::Load`] if the binary cannot be read or parsed.
    fn load_binary(&mut self, path: &Path) -> Result<()>;

    /// All types currently visible, in a stable enumeration order.
    fn visible_types(&self) -> Vec<Self::Handle>;
}

/// Read-only view of a single type reference.
///
/// A handle may denote a type definition, a constructed type (array, generic instance) or a
/// generic parameter. The structural accessors (`is_generic_parameter`, `element_type`,
/// `generic_arguments`) drive name resolution; the member accessors are only meaningful for
/// definitions and return empty collections otherwise.
pub trait TypeHandle: Sized {
    /// Namespace as reported by the binary, `None` for the global namespace
    fn namespace(&self) -> Option<String>;

    /// Simple name, including a backtick arity suffix if the binary uses one
    fn name(&self) -> String;

    /// True if this is an interface type
    fn is_interface(&self) -> bool;

    /// True if this handle denotes a generic parameter of a type or a method
    fn is_generic_parameter(&self) -> bool;

    /// Element type, present only if this handle denotes an array
    fn element_type(&self) -> Option<Self>;

    /// Generic arguments of a constructed type (or the parameters of a generic definition)
    fn generic_arguments(&self) -> Vec<Self>;

    /// The type this type extends, if any
    ///
    /// # Errors
    /// Propagates provider failures.
    fn base_type(&self) -> Result<Option<Self>>;

    /// Implemented interfaces, in provider order
    ///
    /// # Errors
    /// Propagates provider failures.
    fn interfaces(&self) -> Result<Vec<Self>>;

    /// Declared generic parameters, in declaration order
    ///
    /// # Errors
    /// Propagates provider failures.
    fn generic_parameters(&self) -> Result<Vec<Self>>;

    /// Public instance and static fields
    ///
    /// # Errors
    /// Propagates provider failures.
    fn fields(&self) -> Result<Vec<FieldInfo<Self>>>;

    /// Public instance and static properties
    ///
    /// # Errors
    /// Propagates provider failures.
    fn properties(&self) -> Result<Vec<PropertyInfo<Self>>>;

    /// Public instance and static methods, constructors excluded
    ///
    /// # Errors
    /// Propagates provider failures.
    fn methods(&self) -> Result<Vec<MethodInfo<Self>>>;
}

/// A public field as reported by a provider
#[derive(Debug, Clone)]
pub struct FieldInfo<T> {
    /// Field name
    pub name: String,
    /// Declared type of the field
    pub field_type: Option<T>,
}

/// A public property as reported by a provider
#[derive(Debug, Clone)]
pub struct PropertyInfo<T> {
    /// Property name
    pub name: String,
    /// Declared type of the property
    pub property_type: Option<T>,
    /// The property has a getter
    pub can_read: bool,
    /// The property has a setter
    pub can_write: bool,
}

/// A public method as reported by a provider
#[derive(Debug, Clone)]
pub struct MethodInfo<T> {
    /// Method name
    pub name: String,
    /// Return type, `System.Void` for methods without a result
    pub return_type: Option<T>,
    /// Parameters in declaration order
    pub parameters: Vec<ParameterInfo<T>>,
}

/// A single method parameter
#[derive(Debug, Clone)]
pub struct ParameterInfo<T> {
    /// Parameter name, empty if the binary does not record one
    pub name: String,
    /// Declared parameter type
    pub parameter_type: Option<T>,
    /// The parameter declares a default value
    pub has_default: bool,
}
