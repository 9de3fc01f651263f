//! ECMA-335 metadata provider built on the `dotscope` crate.
//!
//! Every loaded binary is parsed into a [`CilObject`] and kept for the lifetime of the
//! provider. Registry types are handed out as [`CilHandle::Definition`]; everything a
//! member signature can mention (primitives, arrays, generic instances, generic parameters,
//! pointers and by-ref types) is converted from its `TypeSignature` into one of the
//! constructed handle variants by [`signature::SignatureScope`].
//!
//! Members and interfaces are reported the way runtime reflection reports them without
//! `DeclaredOnly`: what the type declares first, then what it inherits from base types that
//! are defined in a loaded binary. Constructors are not methods.

use std::sync::Arc;

use bitflags::bitflags;
use dotscope::{
    metadata::{
        token::Token,
        typesystem::{CilFlavor, CilType, CilTypeRc, TypeRegistry},
    },
    prelude::GenericParamList,
    CilObject,
};
use log::{debug, warn};

use crate::{
    provider::{FieldInfo, MethodInfo, PropertyInfo, TypeHandle, TypeMetadataProvider},
    Error, Result,
};

mod members;
pub mod signature;

use members::{list_fields, list_methods, list_properties, TypeMembers};

/// Metadata table index of `TypeDef` rows
const TYPEDEF_TABLE: u8 = 0x02;

/// Name of the pseudo type holding module-level members
const MODULE_TYPE: &str = "<Module>";

bitflags! {
    /// The `TypeAttributes` bits this provider inspects
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct TypeFlags: u32 {
        /// The type is an interface
        const INTERFACE = 0x0020;
    }
}

/// Finds the type a metadata token refers to.
///
/// Implemented by [`TypeRegistry`]; handles keep one to resolve the tokens in their member
/// signatures.
pub trait TypeLookup {
    /// The type behind `token`, if known
    fn get(&self, token: &Token) -> Option<CilTypeRc>;
}

impl TypeLookup for TypeRegistry {
    fn get(&self, token: &Token) -> Option<CilTypeRc> {
        TypeRegistry::get(self, token)
    }
}

/// A [`TypeMetadataProvider`] reading .NET binaries from disk.
#[derive(Default)]
pub struct CilProvider {
    assemblies: Vec<CilObject>,
}

impl CilProvider {
    /// Create a provider with nothing loaded
    #[must_use]
    pub fn new() -> Self {
        CilProvider::default()
    }

    /// Number of binaries loaded so far
    #[must_use]
    pub fn len(&self) -> usize {
        self.assemblies.len()
    }

    /// True if no binary has been loaded
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.assemblies.is_empty()
    }
}

impl TypeMetadataProvider for CilProvider {
    type Handle = CilHandle;

    fn load_binary(&mut self, path: &std::path::Path) -> Result<()> {
        let assembly = CilObject::from_path(path).map_err(|source| Error::Load {
            path: path.to_path_buf(),
            source: Box::new(source),
        })?;

        debug!(
            "{}: {} types in registry",
            path.display(),
            assembly.types().len()
        );
        self.assemblies.push(assembly);
        Ok(())
    }

    fn visible_types(&self) -> Vec<CilHandle> {
        let mut types = Vec::new();
        for assembly in &self.assemblies {
            let registry = assembly.types();
            let lookup: Arc<dyn TypeLookup> = registry.clone();
            for entry in registry.iter() {
                let cil_type = entry.value();
                if is_listed(cil_type) {
                    types.push(CilHandle::from_type(cil_type.clone(), &lookup));
                }
            }
        }
        types
    }
}

/// True for the types a binary defines, without the `<Module>` pseudo type
fn is_listed(ty: &CilType) -> bool {
    ty.token.table() == TYPEDEF_TABLE && ty.name != MODULE_TYPE
}

/// A type reference produced by [`CilProvider`].
#[derive(Clone)]
pub enum CilHandle {
    /// A type from a registry, usually a definition in a loaded binary
    Definition {
        /// The type itself
        ty: CilTypeRc,
        /// Types of the binary the type was found through, used to resolve its members
        types: Arc<dyn TypeLookup>,
    },
    /// A constructed or built-in type known only by name
    Named {
        /// Namespace, `None` for the global namespace
        namespace: Option<String>,
        /// Simple name, may carry an arity or a `&` / `*` suffix
        name: String,
        /// Generic arguments of a constructed generic type
        arguments: Vec<CilHandle>,
    },
    /// A generic parameter of the enclosing type or method
    GenericParameter(String),
    /// A single or multi dimensional array
    Array(Box<CilHandle>),
}

impl CilHandle {
    /// Wrap a registry type; generic parameter types become [`CilHandle::GenericParameter`]
    ///
    /// ## Arguments
    /// * 'ty'    - The registry type
    /// * 'types' - Lookup for the tokens in the type's member signatures
    pub fn from_type(ty: CilTypeRc, types: &Arc<dyn TypeLookup>) -> Self {
        if matches!(ty.flavor(), CilFlavor::GenericParameter { .. }) {
            return CilHandle::GenericParameter(ty.name.clone());
        }

        CilHandle::Definition {
            ty,
            types: types.clone(),
        }
    }

    fn system(name: &str) -> Self {
        CilHandle::Named {
            namespace: Some("System".to_string()),
            name: name.to_string(),
            arguments: Vec::new(),
        }
    }

    /// Same namespace, suffixed name, arguments dropped
    fn decorated(&self, suffix: &str) -> Self {
        CilHandle::Named {
            namespace: self.namespace(),
            name: format!("{}{suffix}", self.name()),
            arguments: Vec::new(),
        }
    }

    fn definition(&self) -> Option<(&CilTypeRc, &Arc<dyn TypeLookup>)> {
        match self {
            CilHandle::Definition { ty, types } => Some((ty, types)),
            _ => None,
        }
    }

    /// Member snapshots of the type and every base type defined in a loaded binary
    fn levels(ty: &CilTypeRc) -> Result<Vec<TypeMembers>> {
        hierarchy(ty)
            .iter()
            .map(|declaring| TypeMembers::read(declaring))
            .collect()
    }
}

impl TypeHandle for CilHandle {
    fn namespace(&self) -> Option<String> {
        match self {
            CilHandle::Definition { ty, .. } if ty.namespace.is_empty() => None,
            CilHandle::Definition { ty, .. } => Some(ty.namespace.clone()),
            CilHandle::Named { namespace, .. } => namespace.clone(),
            CilHandle::GenericParameter(_) => None,
            CilHandle::Array(element) => element.namespace(),
        }
    }

    fn name(&self) -> String {
        match self {
            CilHandle::Definition { ty, .. } => ty.name.clone(),
            CilHandle::Named { name, .. } => name.clone(),
            CilHandle::GenericParameter(name) => name.clone(),
            CilHandle::Array(element) => format!("{}[]", element.name()),
        }
    }

    fn is_interface(&self) -> bool {
        match self {
            CilHandle::Definition { ty, .. } => {
                TypeFlags::from_bits_truncate(ty.flags).contains(TypeFlags::INTERFACE)
            }
            _ => false,
        }
    }

    fn is_generic_parameter(&self) -> bool {
        matches!(self, CilHandle::GenericParameter(_))
    }

    fn element_type(&self) -> Option<Self> {
        match self {
            CilHandle::Array(element) => Some(element.as_ref().clone()),
            _ => None,
        }
    }

    fn generic_arguments(&self) -> Vec<Self> {
        match self {
            CilHandle::Named { arguments, .. } => arguments.clone(),
            CilHandle::Definition { ty, types } => instance_arguments(ty, types),
            _ => Vec::new(),
        }
    }

    fn base_type(&self) -> Result<Option<Self>> {
        let Some((ty, types)) = self.definition() else {
            return Ok(None);
        };

        Ok(ty.base().map(|base| CilHandle::from_type(base, types)))
    }

    fn interfaces(&self) -> Result<Vec<Self>> {
        let Some((ty, types)) = self.definition() else {
            return Ok(Vec::new());
        };

        Ok(all_interfaces(ty)
            .into_iter()
            .map(|interface| CilHandle::from_type(interface, types))
            .collect())
    }

    fn generic_parameters(&self) -> Result<Vec<Self>> {
        let Some((ty, _)) = self.definition() else {
            return Ok(Vec::new());
        };

        Ok(generic_parameter_names(&ty.generic_params)
            .into_iter()
            .map(CilHandle::GenericParameter)
            .collect())
    }

    fn fields(&self) -> Result<Vec<FieldInfo<Self>>> {
        let Some((ty, types)) = self.definition() else {
            return Ok(Vec::new());
        };

        let resolve = resolver(types);
        Ok(list_fields(&CilHandle::levels(ty)?, &resolve))
    }

    fn properties(&self) -> Result<Vec<PropertyInfo<Self>>> {
        let Some((ty, types)) = self.definition() else {
            return Ok(Vec::new());
        };

        let resolve = resolver(types);
        Ok(list_properties(&CilHandle::levels(ty)?, &resolve))
    }

    fn methods(&self) -> Result<Vec<MethodInfo<Self>>> {
        let Some((ty, types)) = self.definition() else {
            return Ok(Vec::new());
        };

        let resolve = resolver(types);
        list_methods(&CilHandle::levels(ty)?, &resolve)
    }
}

fn resolver(types: &Arc<dyn TypeLookup>) -> impl Fn(&Token) -> Option<CilHandle> + '_ {
    move |token: &Token| types.get(token).map(|ty| CilHandle::from_type(ty, types))
}

/// Arguments of a generic instance, empty for any other type
fn instance_arguments(ty: &CilType, types: &Arc<dyn TypeLookup>) -> Vec<CilHandle> {
    let mut arguments = Vec::new();
    for (_, instantiation) in ty.generic_args.iter() {
        for (_, argument) in instantiation.generic_args.iter() {
            match argument.upgrade() {
                Some(argument) => arguments.push(CilHandle::from_type(argument, types)),
                None => warn!("{}: dropped generic argument that no longer resolves", ty.name),
            }
        }
    }
    arguments
}

/// The type followed by every base type defined in a loaded binary
fn hierarchy(ty: &CilTypeRc) -> Vec<CilTypeRc> {
    let mut chain = vec![ty.clone()];
    let mut current = ty.base();

    while let Some(base) = current {
        if base.token.table() != TYPEDEF_TABLE
            || chain.iter().any(|known| known.token == base.token)
        {
            break;
        }
        current = base.base();
        chain.push(base);
    }
    chain
}

fn declared_interfaces(ty: &CilType) -> Vec<CilTypeRc> {
    let mut interfaces = Vec::new();
    for (_, interface) in ty.interfaces.iter() {
        match interface.upgrade() {
            Some(resolved) => interfaces.push(resolved),
            None => warn!("{}: dropped interface that no longer resolves", ty.name),
        }
    }
    interfaces
}

/// Every interface a type implements: declared ones first, then those of base types, then
/// those the interfaces themselves extend. Each token appears once.
fn all_interfaces(ty: &CilTypeRc) -> Vec<CilTypeRc> {
    let mut found: Vec<CilTypeRc> = Vec::new();
    for declaring in hierarchy(ty) {
        add_interfaces(&mut found, declared_interfaces(&declaring));
    }

    let mut next = 0;
    while next < found.len() {
        let extended = declared_interfaces(&found[next]);
        add_interfaces(&mut found, extended);
        next += 1;
    }
    found
}

fn add_interfaces(found: &mut Vec<CilTypeRc>, interfaces: Vec<CilTypeRc>) {
    for interface in interfaces {
        if !found.iter().any(|known| known.token == interface.token) {
            found.push(interface);
        }
    }
}

/// Generic parameter names ordered by parameter number
fn generic_parameter_names(parameters: &GenericParamList) -> Vec<String> {
    let mut parameters: Vec<_> = parameters
        .iter()
        .map(|(_, parameter)| (parameter.number, parameter.name.clone()))
        .collect();
    parameters.sort_by_key(|(number, _)| *number);
    parameters.into_iter().map(|(_, name)| name).collect()
}
