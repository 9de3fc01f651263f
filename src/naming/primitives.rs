//! Runtime types that the binding generator knows under a native name.

use strum::{EnumIter, IntoEnumIterator, IntoStaticStr};

/// Namespace that all aliased primitives live in
pub const PRIMITIVE_NAMESPACE: &str = "System";

/// A runtime primitive with a direct counterpart in the target language.
///
/// Only these four are aliased; every other `System` type, including the remaining
/// integral types, is emitted as a regular `cs.system.*` reference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, IntoStaticStr)]
pub enum Primitive {
    /// `System.Void`
    #[strum(serialize = "Void")]
    Void,
    /// `System.Int32`
    #[strum(serialize = "Int")]
    Int32,
    /// `System.Double`
    #[strum(serialize = "Float")]
    Double,
    /// `System.Boolean`
    #[strum(serialize = "Bool")]
    Boolean,
}

impl Primitive {
    /// The simple name the runtime reports for this primitive
    #[must_use]
    pub fn runtime_name(self) -> &'static str {
        match self {
            Primitive::Void => "Void",
            Primitive::Int32 => "Int32",
            Primitive::Double => "Double",
            Primitive::Boolean => "Boolean",
        }
    }

    /// The name emitted in place of a `cs.*` path
    #[must_use]
    pub fn alias(self) -> &'static str {
        self.into()
    }

    /// Look up a primitive by the namespace and simple name of a type.
    ///
    /// The namespace is compared ignoring ASCII case, the simple name exactly.
    ///
    /// ## Arguments
    /// * 'namespace' - Namespace of the type, `None` for the global namespace
    /// * 'name'      - Simple name of the type
    #[must_use]
    pub fn from_runtime_name(namespace: Option<&str>, name: &str) -> Option<Self> {
        if !namespace.is_some_and(|namespace| namespace.eq_ignore_ascii_case(PRIMITIVE_NAMESPACE)) {
            return None;
        }

        Primitive::iter().find(|primitive| primitive.runtime_name() == name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn aliases() {
        assert_eq!(Primitive::Void.alias(), "Void");
        assert_eq!(Primitive::Int32.alias(), "Int");
        assert_eq!(Primitive::Double.alias(), "Float");
        assert_eq!(Primitive::Boolean.alias(), "Bool");
    }

    #[test]
    fn lookup_requires_system_namespace() {
        assert_eq!(
            Primitive::from_runtime_name(Some("System"), "Int32"),
            Some(Primitive::Int32)
        );
        assert_eq!(Primitive::from_runtime_name(Some("Other"), "Int32"), None);
        assert_eq!(Primitive::from_runtime_name(None, "Int32"), None);
    }

    #[test]
    fn lookup_ignores_namespace_casing() {
        assert_eq!(
            Primitive::from_runtime_name(Some("system"), "Int32"),
            Some(Primitive::Int32)
        );
        assert_eq!(
            Primitive::from_runtime_name(Some("SYSTEM"), "Boolean"),
            Some(Primitive::Boolean)
        );
        assert_eq!(Primitive::from_runtime_name(Some("system.io"), "Int32"), None);
    }

    #[test]
    fn lookup_ignores_other_system_types() {
        assert_eq!(Primitive::from_runtime_name(Some("System"), "Int64"), None);
        assert_eq!(Primitive::from_runtime_name(Some("System"), "Single"), None);
        assert_eq!(Primitive::from_runtime_name(Some("System"), "String"), None);
        assert_eq!(Primitive::from_runtime_name(Some("System"), "int32"), None);
    }
}
