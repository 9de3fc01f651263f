//! Public member listing with runtime reflection semantics.
//!
//! Each type of a hierarchy is first read into a [`TypeMembers`] snapshot. The listing
//! functions then work on the snapshots only: level 0 is the type itself, every further
//! level a base type. Declared members keep their order and are never merged; members of
//! base types are skipped when static, and when a more derived level already has a member
//! with the same signature.

use std::collections::HashSet;

use bitflags::bitflags;
use dotscope::metadata::{
    method::{Method, MethodAccessFlags, MethodModifiers},
    signatures::TypeSignature,
    token::Token,
    typesystem::CilType,
};
use log::warn;

use crate::{
    naming::resolve_name,
    provider::{
        cil::{generic_parameter_names, signature::SignatureScope, CilHandle},
        FieldInfo, MethodInfo, ParameterInfo, PropertyInfo,
    },
    Result,
};

bitflags! {
    /// The `FieldAttributes` bits this provider inspects
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct FieldFlags: u32 {
        /// Accessibility mask
        const FIELD_ACCESS_MASK = 0x0007;
        /// Accessible by anyone who can see the enclosing type
        const PUBLIC = 0x0006;
        /// Member of the type rather than of an instance
        const STATIC = 0x0010;
    }
}

bitflags! {
    /// The `ParamAttributes` bits this provider inspects
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct ParamFlags: u32 {
        /// The parameter declares a default value
        const HAS_DEFAULT = 0x1000;
    }
}

/// The members of one type, as far as listing them is concerned
#[derive(Debug, Clone, Default)]
pub(super) struct TypeMembers {
    pub type_parameters: Vec<String>,
    pub fields: Vec<FieldView>,
    pub properties: Vec<PropertyView>,
    pub methods: Vec<MethodView>,
}

#[derive(Debug, Clone)]
pub(super) struct FieldView {
    pub name: String,
    pub flags: FieldFlags,
    pub signature: TypeSignature,
}

/// Visibility of a property accessor
#[derive(Debug, Clone, Copy)]
pub(super) struct Accessor {
    pub public: bool,
    pub is_static: bool,
}

#[derive(Debug, Clone)]
pub(super) struct PropertyView {
    pub name: String,
    pub signature: TypeSignature,
    pub getter: Option<Accessor>,
    pub setter: Option<Accessor>,
}

#[derive(Debug, Clone)]
pub(super) struct MethodView {
    pub name: String,
    pub public: bool,
    pub is_static: bool,
    pub generic_parameters: Vec<String>,
    pub return_type: TypeSignature,
    pub parameters: Vec<ParameterView>,
}

#[derive(Debug, Clone)]
pub(super) struct ParameterView {
    pub name: String,
    pub signature: TypeSignature,
    pub by_ref: bool,
    pub has_default: bool,
}

impl Accessor {
    fn read(method: &Method) -> Self {
        Accessor {
            public: method.flags_access == MethodAccessFlags::PUBLIC,
            is_static: method.flags_modifiers.contains(MethodModifiers::STATIC),
        }
    }
}

impl MethodView {
    fn read(method: &Method) -> Result<Self> {
        let mut parameters = Vec::with_capacity(method.signature.params.len());
        for (index, signature) in method.signature.params.iter().enumerate() {
            let sequence = u32::try_from(index + 1)
                .map_err(|_| malformed_error!("{}: too many parameters", method.name))?;
            let declared = method
                .params
                .iter()
                .map(|(_, param)| param)
                .find(|param| param.sequence == sequence);

            parameters.push(ParameterView {
                name: declared
                    .and_then(|param| param.name.clone())
                    .unwrap_or_default(),
                signature: signature.base.clone(),
                by_ref: signature.by_ref,
                has_default: declared.is_some_and(|param| {
                    ParamFlags::from_bits_truncate(param.flags).contains(ParamFlags::HAS_DEFAULT)
                        || param.default.get().is_some()
                }),
            });
        }

        let accessor = Accessor::read(method);
        Ok(MethodView {
            name: method.name.clone(),
            public: accessor.public,
            is_static: accessor.is_static,
            generic_parameters: generic_parameter_names(&method.generic_params),
            return_type: method.signature.return_type.base.clone(),
            parameters,
        })
    }

    fn is_constructor(&self) -> bool {
        self.name == ".ctor" || self.name == ".cctor"
    }
}

impl TypeMembers {
    /// Snapshot the members a type declares
    ///
    /// # Errors
    /// Returns [`crate::Error::Malformed`] for a method with more parameters than metadata
    /// can number.
    pub fn read(ty: &CilType) -> Result<Self> {
        let fields = ty
            .fields
            .iter()
            .map(|(_, field)| FieldView {
                name: field.name.clone(),
                flags: FieldFlags::from_bits_truncate(field.flags),
                signature: field.signature.base.clone(),
            })
            .collect();

        let properties = ty
            .properties
            .iter()
            .map(|(_, property)| PropertyView {
                name: property.name.clone(),
                signature: property.signature.base.clone(),
                getter: property
                    .fn_getter
                    .get()
                    .and_then(|getter| getter.upgrade())
                    .map(|getter| Accessor::read(&getter)),
                setter: property
                    .fn_setter
                    .get()
                    .and_then(|setter| setter.upgrade())
                    .map(|setter| Accessor::read(&setter)),
            })
            .collect();

        let mut methods = Vec::new();
        for (_, method_ref) in ty.methods.iter() {
            match method_ref.upgrade() {
                Some(method) => methods.push(MethodView::read(&method)?),
                None => warn!("{}: dropped method that no longer resolves", ty.name),
            }
        }

        Ok(TypeMembers {
            type_parameters: generic_parameter_names(&ty.generic_params),
            fields,
            properties,
            methods,
        })
    }
}

/// Public fields of a hierarchy
pub(super) fn list_fields(
    levels: &[TypeMembers],
    resolve: &dyn Fn(&Token) -> Option<CilHandle>,
) -> Vec<FieldInfo<CilHandle>> {
    let mut fields = Vec::new();
    for (level, members) in levels.iter().enumerate() {
        let scope = SignatureScope::new(resolve, members.type_parameters.clone());

        for field in &members.fields {
            if field.flags & FieldFlags::FIELD_ACCESS_MASK != FieldFlags::PUBLIC {
                continue;
            }
            if level > 0 && field.flags.contains(FieldFlags::STATIC) {
                continue;
            }

            fields.push(FieldInfo {
                name: field.name.clone(),
                field_type: scope.convert_or_skip(&field.signature, &field.name),
            });
        }
    }
    fields
}

/// Properties of a hierarchy with at least one public accessor
pub(super) fn list_properties(
    levels: &[TypeMembers],
    resolve: &dyn Fn(&Token) -> Option<CilHandle>,
) -> Vec<PropertyInfo<CilHandle>> {
    let mut seen = HashSet::new();
    let mut properties = Vec::new();
    for (level, members) in levels.iter().enumerate() {
        let scope = SignatureScope::new(resolve, members.type_parameters.clone());
        let mut declared = Vec::new();

        for property in &members.properties {
            let accessors: Vec<_> = property.getter.iter().chain(property.setter.iter()).collect();
            if !accessors.iter().any(|accessor| accessor.public) {
                continue;
            }
            if level > 0
                && (accessors.iter().all(|accessor| accessor.is_static)
                    || seen.contains(&property.name))
            {
                continue;
            }

            declared.push(property.name.clone());
            properties.push(PropertyInfo {
                name: property.name.clone(),
                property_type: scope.convert_or_skip(&property.signature, &property.name),
                can_read: property.getter.is_some(),
                can_write: property.setter.is_some(),
            });
        }
        seen.extend(declared);
    }
    properties
}

/// Public methods of a hierarchy, constructors excluded
///
/// # Errors
/// Propagates signature conversion failures.
pub(super) fn list_methods(
    levels: &[TypeMembers],
    resolve: &dyn Fn(&Token) -> Option<CilHandle>,
) -> Result<Vec<MethodInfo<CilHandle>>> {
    let mut seen = HashSet::new();
    let mut methods = Vec::new();
    for (level, members) in levels.iter().enumerate() {
        let mut declared = Vec::new();

        for method in &members.methods {
            if !method.public || method.is_constructor() {
                continue;
            }
            if level > 0 && method.is_static {
                continue;
            }

            let scope = SignatureScope::new(resolve, members.type_parameters.clone())
                .with_method_parameters(method.generic_parameters.clone());
            let info = method_info(&scope, method)?;

            let key = signature_key(&info);
            if level > 0 && seen.contains(&key) {
                continue;
            }
            declared.push(key);
            methods.push(info);
        }
        seen.extend(declared);
    }
    Ok(methods)
}

/// Name, return type and parameter types; what an override shares with its base method
fn signature_key(info: &MethodInfo<CilHandle>) -> (String, String, Vec<String>) {
    (
        info.name.clone(),
        resolve_name(info.return_type.as_ref()),
        info.parameters
            .iter()
            .map(|parameter| resolve_name(parameter.parameter_type.as_ref()))
            .collect(),
    )
}

fn method_info(scope: &SignatureScope<'_>, method: &MethodView) -> Result<MethodInfo<CilHandle>> {
    let return_type = scope.convert(&method.return_type)?;

    let mut parameters = Vec::with_capacity(method.parameters.len());
    for parameter in &method.parameters {
        let mut parameter_type = scope.convert(&parameter.signature)?;
        if parameter.by_ref {
            parameter_type = parameter_type.map(|inner| inner.decorated("&"));
        }

        parameters.push(ParameterInfo {
            name: parameter.name.clone(),
            parameter_type,
            has_default: parameter.has_default,
        });
    }

    Ok(MethodInfo {
        name: method.name.clone(),
        return_type,
        parameters,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const PUBLIC: Accessor = Accessor {
        public: true,
        is_static: false,
    };

    fn resolve(_: &Token) -> Option<CilHandle> {
        None
    }

    static RESOLVE: fn(&Token) -> Option<CilHandle> = resolve;

    fn field(name: &str, flags: FieldFlags) -> FieldView {
        FieldView {
            name: name.to_string(),
            flags,
            signature: TypeSignature::I4,
        }
    }

    fn method(name: &str, return_type: TypeSignature, parameters: Vec<TypeSignature>) -> MethodView {
        MethodView {
            name: name.to_string(),
            public: true,
            is_static: false,
            generic_parameters: Vec::new(),
            return_type,
            parameters: parameters
                .into_iter()
                .enumerate()
                .map(|(index, signature)| ParameterView {
                    name: format!("arg{index}"),
                    signature,
                    by_ref: false,
                    has_default: false,
                })
                .collect(),
        }
    }

    fn property(name: &str, getter: Option<Accessor>, setter: Option<Accessor>) -> PropertyView {
        PropertyView {
            name: name.to_string(),
            signature: TypeSignature::String,
            getter,
            setter,
        }
    }

    fn method_names(methods: &[MethodInfo<CilHandle>]) -> Vec<String> {
        methods.iter().map(|method| method.name.clone()).collect()
    }

    #[test]
    fn fields_are_public_only() {
        let levels = [TypeMembers {
            fields: vec![
                field("Count", FieldFlags::PUBLIC),
                field("hidden", FieldFlags::empty()),
                field("Shared", FieldFlags::PUBLIC | FieldFlags::STATIC),
                field("Family", FieldFlags::from_bits_truncate(0x0004)),
                field("Internal", FieldFlags::from_bits_truncate(0x0003)),
            ],
            ..TypeMembers::default()
        }];

        let fields = list_fields(&levels, &RESOLVE);
        let names: Vec<_> = fields.iter().map(|field| field.name.as_str()).collect();
        assert_eq!(names, ["Count", "Shared"]);
        assert_eq!(resolve_name(fields[0].field_type.as_ref()), "Int");
    }

    #[test]
    fn base_fields_skip_statics() {
        let levels = [
            TypeMembers {
                fields: vec![field("Own", FieldFlags::PUBLIC)],
                ..TypeMembers::default()
            },
            TypeMembers {
                fields: vec![
                    field("Inherited", FieldFlags::PUBLIC),
                    field("BaseShared", FieldFlags::PUBLIC | FieldFlags::STATIC),
                ],
                ..TypeMembers::default()
            },
        ];

        let fields = list_fields(&levels, &RESOLVE);
        let names: Vec<_> = fields.iter().map(|field| field.name.as_str()).collect();
        assert_eq!(names, ["Own", "Inherited"]);
    }

    #[test]
    fn field_with_generic_parameter_of_declaring_level() {
        let levels = [
            TypeMembers::default(),
            TypeMembers {
                type_parameters: vec!["TItem".to_string()],
                fields: vec![FieldView {
                    name: "Item".to_string(),
                    flags: FieldFlags::PUBLIC,
                    signature: TypeSignature::GenericParamType(0),
                }],
                ..TypeMembers::default()
            },
        ];

        let fields = list_fields(&levels, &RESOLVE);
        assert_eq!(resolve_name(fields[0].field_type.as_ref()), "TItem");
    }

    #[test]
    fn unreadable_field_type_is_left_empty() {
        let levels = [TypeMembers {
            fields: vec![FieldView {
                name: "Broken".to_string(),
                flags: FieldFlags::PUBLIC,
                signature: TypeSignature::GenericParamType(7),
            }],
            ..TypeMembers::default()
        }];

        let fields = list_fields(&levels, &RESOLVE);
        assert_eq!(fields.len(), 1);
        assert!(fields[0].field_type.is_none());
    }

    #[test]
    fn properties_need_a_public_accessor() {
        let private = Accessor {
            public: false,
            is_static: false,
        };
        let levels = [TypeMembers {
            properties: vec![
                property("Name", Some(PUBLIC), Some(PUBLIC)),
                property("ReadOnly", Some(PUBLIC), None),
                property("PrivateSet", Some(PUBLIC), Some(private)),
                property("WriteOnly", None, Some(PUBLIC)),
                property("Hidden", Some(private), Some(private)),
            ],
            ..TypeMembers::default()
        }];

        let properties = list_properties(&levels, &RESOLVE);
        let flags: Vec<_> = properties
            .iter()
            .map(|property| (property.name.as_str(), property.can_read, property.can_write))
            .collect();
        assert_eq!(
            flags,
            [
                ("Name", true, true),
                ("ReadOnly", true, false),
                ("PrivateSet", true, true),
                ("WriteOnly", false, true),
            ]
        );
        assert_eq!(
            resolve_name(properties[0].property_type.as_ref()),
            "cs.system.String"
        );
    }

    #[test]
    fn base_properties_skip_statics_and_redeclared() {
        let shared = Accessor {
            public: true,
            is_static: true,
        };
        let levels = [
            TypeMembers {
                properties: vec![property("Name", Some(PUBLIC), None)],
                ..TypeMembers::default()
            },
            TypeMembers {
                properties: vec![
                    property("Name", Some(PUBLIC), Some(PUBLIC)),
                    property("Id", Some(PUBLIC), None),
                    property("Default", Some(shared), None),
                ],
                ..TypeMembers::default()
            },
        ];

        let properties = list_properties(&levels, &RESOLVE);
        let names: Vec<_> = properties.iter().map(|property| property.name.as_str()).collect();
        assert_eq!(names, ["Name", "Id"]);
        assert!(!properties[0].can_write);
    }

    #[test]
    fn constructors_are_not_methods() {
        let mut hidden = method("Helper", TypeSignature::Void, vec![]);
        hidden.public = false;
        let levels = [TypeMembers {
            methods: vec![
                method(".ctor", TypeSignature::Void, vec![]),
                method(".cctor", TypeSignature::Void, vec![]),
                method("get_Name", TypeSignature::String, vec![]),
                method("Run", TypeSignature::Void, vec![TypeSignature::I4]),
                hidden,
            ],
            ..TypeMembers::default()
        }];

        let methods = list_methods(&levels, &RESOLVE).unwrap();
        assert_eq!(method_names(&methods), ["get_Name", "Run"]);
    }

    #[test]
    fn overloads_differing_by_return_type_are_kept() {
        let levels = [TypeMembers {
            methods: vec![
                method("op_Explicit", TypeSignature::I4, vec![TypeSignature::Object]),
                method("op_Explicit", TypeSignature::R8, vec![TypeSignature::Object]),
            ],
            ..TypeMembers::default()
        }];

        let methods = list_methods(&levels, &RESOLVE).unwrap();
        let returns: Vec<_> = methods
            .iter()
            .map(|method| resolve_name(method.return_type.as_ref()))
            .collect();
        assert_eq!(returns, ["Int", "Float"]);
    }

    #[test]
    fn declared_duplicates_are_kept() {
        let levels = [TypeMembers {
            methods: vec![
                method("Get", TypeSignature::I4, vec![TypeSignature::I4]),
                method("Get", TypeSignature::I4, vec![TypeSignature::I4]),
            ],
            ..TypeMembers::default()
        }];

        assert_eq!(list_methods(&levels, &RESOLVE).unwrap().len(), 2);
    }

    #[test]
    fn base_overrides_and_statics_are_skipped() {
        let mut create = method("Create", TypeSignature::Object, vec![]);
        create.is_static = true;
        let levels = [
            TypeMembers {
                methods: vec![method("ToString", TypeSignature::String, vec![])],
                ..TypeMembers::default()
            },
            TypeMembers {
                methods: vec![
                    method("ToString", TypeSignature::String, vec![]),
                    method("ToString", TypeSignature::String, vec![TypeSignature::String]),
                    method("GetHashCode", TypeSignature::I4, vec![]),
                    create,
                ],
                ..TypeMembers::default()
            },
        ];

        let methods = list_methods(&levels, &RESOLVE).unwrap();
        assert_eq!(method_names(&methods), ["ToString", "ToString", "GetHashCode"]);
        assert!(methods[0].parameters.is_empty());
        assert_eq!(methods[1].parameters.len(), 1);
    }

    #[test]
    fn parameters_carry_names_references_and_defaults() {
        let mut swap = method("Swap", TypeSignature::Void, vec![]);
        swap.generic_parameters = vec!["TValue".to_string()];
        swap.parameters = vec![
            ParameterView {
                name: "left".to_string(),
                signature: TypeSignature::GenericParamMethod(0),
                by_ref: true,
                has_default: false,
            },
            ParameterView {
                name: "count".to_string(),
                signature: TypeSignature::I4,
                by_ref: false,
                has_default: true,
            },
        ];
        let levels = [TypeMembers {
            methods: vec![swap],
            ..TypeMembers::default()
        }];

        let methods = list_methods(&levels, &RESOLVE).unwrap();
        let parameters = &methods[0].parameters;
        assert_eq!(parameters[0].name, "left");
        assert_eq!(resolve_name(parameters[0].parameter_type.as_ref()), "cs.TValue&");
        assert!(!parameters[0].has_default);
        assert_eq!(parameters[1].name, "count");
        assert_eq!(resolve_name(parameters[1].parameter_type.as_ref()), "Int");
        assert!(parameters[1].has_default);
    }

    #[test]
    fn unreadable_method_signature_fails() {
        let levels = [TypeMembers {
            methods: vec![method("Bad", TypeSignature::GenericParamMethod(0), vec![])],
            ..TypeMembers::default()
        }];

        assert!(list_methods(&levels, &RESOLVE).is_err());
    }

    #[test]
    fn default_flag_mask() {
        assert!(ParamFlags::from_bits_truncate(0x1010).contains(ParamFlags::HAS_DEFAULT));
        assert!(!ParamFlags::from_bits_truncate(0x0010).contains(ParamFlags::HAS_DEFAULT));
    }
}
