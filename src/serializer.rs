//! Renders a [`TypeDefinition`] as the line protocol read by the binding generator.
//!
//! The layout is fixed; every repeated block is preceded by its count:
//!
//! ```text
//! <name with arity suffix converted>
//! <is-interface: true|false>
//! <cs[.lowercase namespace]>
//! <base type, possibly empty>
//! <interface count>          then 1 line per interface
//! <generic parameter count>  then 1 line per parameter
//! <field count>              then 2 lines per field: name, type
//! <property count>           then 4 lines per property: name, type, can-read, can-write
//! <method count>             then per method: name, return type, parameter count,
//!                            then 3 lines per parameter: name, type, has-default
//! ```
//!
//! # Examples
//!
//! ```rust
//! use externdump::{model::TypeDefinition, serializer::serialize};
//!
//! let definition = TypeDefinition {
//!     namespace: "Lib".to_string(),
//!     name: "Box`1".to_string(),
//!     ..TypeDefinition::default()
//! };
//!
//! let lines = serialize(&definition);
//! assert_eq!(lines[0], "Box_1");
//! assert_eq!(lines[2], "cs.lib");
//! ```

use std::io::Write;

use crate::{
    model::TypeDefinition,
    naming::{convert_generic_tick, namespace_path},
    Result,
};

/// Accumulates protocol lines
struct LineWriter {
    lines: Vec<String>,
}

impl LineWriter {
    fn new() -> Self {
        LineWriter { lines: Vec::new() }
    }

    fn text(&mut self, value: impl Into<String>) {
        self.lines.push(value.into());
    }

    fn flag(&mut self, value: bool) {
        self.text(if value { "true" } else { "false" });
    }

    fn count(&mut self, value: usize) {
        self.text(value.to_string());
    }
}

/// Produce the ordered protocol lines for a type definition.
///
/// ## Arguments
/// * 'definition' - The model to render
#[must_use]
pub fn serialize(definition: &TypeDefinition) -> Vec<String> {
    let mut out = LineWriter::new();

    out.text(convert_generic_tick(&definition.name));
    out.flag(definition.is_interface);
    out.text(namespace_path(&definition.namespace));
    out.text(definition.base_type.as_str());

    out.count(definition.interfaces.len());
    for interface in &definition.interfaces {
        out.text(interface.as_str());
    }

    out.count(definition.generic_parameters.len());
    for parameter in &definition.generic_parameters {
        out.text(parameter.name.as_str());
    }

    out.count(definition.fields.len());
    for field in &definition.fields {
        out.text(field.name.as_str());
        out.text(field.type_name.as_str());
    }

    out.count(definition.properties.len());
    for property in &definition.properties {
        out.text(property.name.as_str());
        out.text(property.type_name.as_str());
        out.flag(property.can_read);
        out.flag(property.can_write);
    }

    out.count(definition.methods.len());
    for method in &definition.methods {
        out.text(method.name.as_str());
        out.text(method.return_type.as_str());
        out.count(method.parameters.len());
        for parameter in &method.parameters {
            out.text(parameter.name.as_str());
            out.text(parameter.type_name.as_str());
            out.flag(parameter.has_default);
        }
    }

    out.lines
}

/// Write the protocol lines for a type definition, one per line.
///
/// ## Arguments
/// * 'definition' - The model to render
/// * 'writer'     - Destination of the output
///
/// # Errors
/// Returns [`crate::Error::Io`] if the writer fails.
pub fn write_to<W: Write>(definition: &TypeDefinition, writer: &mut W) -> Result<()> {
    for line in serialize(definition) {
        writeln!(writer, "{line}")?;
    }
    writer.flush()?;
    Ok(())
}
