//! Conversion of ECMA-335 type signatures into handles.

use dotscope::metadata::{signatures::TypeSignature, token::Token};
use log::warn;

use crate::{provider::{cil::CilHandle, TypeHandle}, Error, Result};

/// Deepest signature nesting that is converted before giving up
const MAX_RECURSION_DEPTH: usize = 50;

/// Everything needed to turn a signature into a handle.
///
/// Class and value type tokens are resolved through `resolve`; generic parameter indices
/// are looked up in the parameter lists of the declaring type and method.
pub struct SignatureScope<'a> {
    resolve: &'a dyn Fn(&Token) -> Option<CilHandle>,
    type_parameters: Vec<String>,
    method_parameters: Vec<String>,
}

impl<'a> SignatureScope<'a> {
    /// Create a scope for members of a type
    ///
    /// ## Arguments
    /// * 'resolve'         - Maps a `TypeDef` / `TypeRef` / `TypeSpec` token to a handle
    /// * 'type_parameters' - Generic parameter names of the declaring type, in order
    pub fn new(
        resolve: &'a dyn Fn(&Token) -> Option<CilHandle>,
        type_parameters: Vec<String>,
    ) -> Self {
        SignatureScope {
            resolve,
            type_parameters,
            method_parameters: Vec::new(),
        }
    }

    /// Add the generic parameter names of the method being converted
    #[must_use]
    pub fn with_method_parameters(mut self, method_parameters: Vec<String>) -> Self {
        self.method_parameters = method_parameters;
        self
    }

    /// Convert a signature into a handle.
    ///
    /// Returns `Ok(None)` for tokens the registry does not know and for element types that
    /// have no type identity (sentinels, bare modifiers).
    ///
    /// ## Arguments
    /// * 'signature' - The signature to convert
    ///
    /// # Errors
    /// Returns [`crate::Error::Malformed`] for a generic parameter index outside the
    /// declared parameters, or [`crate::Error::RecursionLimit`] for signatures nested
    /// deeper than the provider supports.
    pub fn convert(&self, signature: &TypeSignature) -> Result<Option<CilHandle>> {
        self.convert_at(signature, 0)
    }

    /// Like [`SignatureScope::convert`], but a member whose signature cannot be converted
    /// is reported with an unresolved type instead of failing the whole type.
    pub(super) fn convert_or_skip(&self, signature: &TypeSignature, member: &str) -> Option<CilHandle> {
        match self.convert(signature) {
            Ok(handle) => handle,
            Err(error) => {
                warn!("{member}: unreadable signature, type left empty ({error})");
                None
            }
        }
    }

    fn convert_at(&self, signature: &TypeSignature, depth: usize) -> Result<Option<CilHandle>> {
        if depth >= MAX_RECURSION_DEPTH {
            return Err(Error::RecursionLimit(MAX_RECURSION_DEPTH));
        }

        let handle = match signature {
            TypeSignature::Void => CilHandle::system("Void"),
            TypeSignature::Boolean => CilHandle::system("Boolean"),
            TypeSignature::Char => CilHandle::system("Char"),
            TypeSignature::I1 => CilHandle::system("SByte"),
            TypeSignature::U1 => CilHandle::system("Byte"),
            TypeSignature::I2 => CilHandle::system("Int16"),
            TypeSignature::U2 => CilHandle::system("UInt16"),
            TypeSignature::I4 => CilHandle::system("Int32"),
            TypeSignature::U4 => CilHandle::system("UInt32"),
            TypeSignature::I8 => CilHandle::system("Int64"),
            TypeSignature::U8 => CilHandle::system("UInt64"),
            TypeSignature::R4 => CilHandle::system("Single"),
            TypeSignature::R8 => CilHandle::system("Double"),
            TypeSignature::I => CilHandle::system("IntPtr"),
            TypeSignature::U => CilHandle::system("UIntPtr"),
            TypeSignature::String => CilHandle::system("String"),
            TypeSignature::Object => CilHandle::system("Object"),
            TypeSignature::TypedByRef => CilHandle::system("TypedReference"),
            TypeSignature::Class(token) | TypeSignature::ValueType(token) => {
                return Ok((self.resolve)(token));
            }
            TypeSignature::GenericParamType(index) => {
                CilHandle::GenericParameter(lookup_parameter(&self.type_parameters, *index, "!")?)
            }
            TypeSignature::GenericParamMethod(index) => CilHandle::GenericParameter(
                lookup_parameter(&self.method_parameters, *index, "!!")?,
            ),
            TypeSignature::SzArray(array) => match self.convert_at(&array.base, depth + 1)? {
                Some(element) => CilHandle::Array(Box::new(element)),
                None => return Ok(None),
            },
            TypeSignature::Array(array) => match self.convert_at(&array.base, depth + 1)? {
                Some(element) => CilHandle::Array(Box::new(element)),
                None => return Ok(None),
            },
            TypeSignature::Ptr(pointer) => {
                return Ok(self
                    .convert_at(&pointer.base, depth + 1)?
                    .map(|inner| inner.decorated("*")));
            }
            TypeSignature::ByRef(inner) => {
                return Ok(self
                    .convert_at(inner, depth + 1)?
                    .map(|inner| inner.decorated("&")));
            }
            TypeSignature::Pinned(inner) => return self.convert_at(inner, depth + 1),
            TypeSignature::GenericInst(base, arguments) => {
                let Some(base) = self.convert_at(base, depth + 1)? else {
                    return Ok(None);
                };

                let mut converted = Vec::with_capacity(arguments.len());
                for argument in arguments {
                    match self.convert_at(argument, depth + 1)? {
                        Some(argument) => converted.push(argument),
                        None => return Ok(None),
                    }
                }

                CilHandle::Named {
                    namespace: base.namespace(),
                    name: base.name(),
                    arguments: converted,
                }
            }
            _ => return Ok(None),
        };

        Ok(Some(handle))
    }
}

fn lookup_parameter(parameters: &[String], index: u32, marker: &str) -> Result<String> {
    usize::try_from(index)
        .ok()
        .and_then(|index| parameters.get(index))
        .cloned()
        .ok_or_else(|| {
            malformed_error!(
                "generic parameter {marker}{index} out of range, {} declared",
                parameters.len()
            )
        })
}
