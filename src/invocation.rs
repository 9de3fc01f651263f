//! One complete run: load, look up, describe, print.
//!
//! Usage problems and lookup misses are not errors here. They are answered with a fixed
//! sentinel line on the output so that the consuming generator always reads something it
//! understands; only a binary that fails to load aborts the run.

use std::{io::Write, path::PathBuf};

use log::debug;

use crate::{
    lookup::LookupDriver, provider::TypeMetadataProvider, serializer::write_to, Result,
};

/// Printed when no type path was given
pub const NO_TYPE_PATH: &str = "<no type path provided>";

/// Printed when no visible type matches the requested path
pub const NO_TYPE_FOUND: &str = "<no type found>";

/// Arguments of a single run
#[derive(Debug, Clone, Default)]
pub struct Invocation {
    /// Dotted path of the type to describe
    pub type_path: Option<String>,
    /// Binaries to load before the lookup, in order
    pub binaries: Vec<PathBuf>,
}

/// How a run ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// No type path was given; the usage sentinel was printed
    MissingTypePath,
    /// Nothing matched; the lookup sentinel was printed
    NotFound,
    /// The type was found and its description printed
    Described,
}

/// Execute one invocation against a provider, writing the result to `out`.
///
/// Binaries are only loaded once a type path is known to be present. Nothing is written if
/// loading fails.
///
/// ## Arguments
/// * 'provider'   - A fresh provider, owned by this run
/// * 'invocation' - The requested type path and binaries
/// * 'out'        - Destination of the protocol lines
///
/// # Errors
/// Returns [`crate::Error::Load`] if a binary cannot be loaded, any provider failure raised
/// while describing the type, or [`crate::Error::Io`] if writing fails.
pub fn run<P, W>(provider: P, invocation: &Invocation, out: &mut W) -> Result<Outcome>
where
    P: TypeMetadataProvider,
    W: Write,
{
    let Some(type_path) = invocation.type_path.as_deref() else {
        writeln!(out, "{NO_TYPE_PATH}")?;
        out.flush()?;
        return Ok(Outcome::MissingTypePath);
    };

    let mut driver = LookupDriver::new(provider);
    driver.load_binaries(&invocation.binaries)?;

    match driver.lookup(type_path)? {
        Some(definition) => {
            write_to(&definition, out)?;
            Ok(Outcome::Described)
        }
        None => {
            debug!("no visible type matches '{type_path}'");
            writeln!(out, "{NO_TYPE_FOUND}")?;
            out.flush()?;
            Ok(Outcome::NotFound)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        test::{primitive, MockProvider, MockType},
        Error,
    };

    fn run_to_string(provider: MockProvider, invocation: &Invocation) -> (Outcome, String) {
        let mut buffer = Vec::new();
        let outcome = run(provider, invocation, &mut buffer).unwrap();
        (outcome, String::from_utf8(buffer).unwrap())
    }

    #[test]
    fn missing_type_path() {
        let (outcome, output) = run_to_string(MockProvider::new(), &Invocation::default());

        assert_eq!(outcome, Outcome::MissingTypePath);
        assert_eq!(output, "<no type path provided>\n");
    }

    #[test]
    fn missing_type_path_loads_nothing() {
        let invocation = Invocation {
            type_path: None,
            binaries: vec![PathBuf::from("does-not-exist.dll")],
        };

        let (outcome, _) = run_to_string(MockProvider::new(), &invocation);
        assert_eq!(outcome, Outcome::MissingTypePath);
    }

    #[test]
    fn not_found() {
        let invocation = Invocation {
            type_path: Some("nowhere.Nothing".to_string()),
            binaries: vec![],
        };

        let (outcome, output) = run_to_string(MockProvider::new(), &invocation);
        assert_eq!(outcome, Outcome::NotFound);
        assert_eq!(output, "<no type found>\n");
    }

    #[test]
    fn describes_found_type() {
        let mut provider = MockProvider::new();
        provider.add_binary(
            "mypkg.dll",
            vec![MockType::builder("mypkg", "MyClass")
                .with_field("Count", primitive("Int32"))
                .build()],
        );
        let invocation = Invocation {
            type_path: Some("mypkg.MyClass".to_string()),
            binaries: vec![PathBuf::from("mypkg.dll")],
        };

        let (outcome, output) = run_to_string(provider, &invocation);
        assert_eq!(outcome, Outcome::Described);
        assert_eq!(output, "MyClass\nfalse\ncs.mypkg\n\n0\n0\n1\nCount\nInt\n0\n0\n");
    }

    #[test]
    fn load_failure_writes_nothing() {
        let invocation = Invocation {
            type_path: Some("mypkg.MyClass".to_string()),
            binaries: vec![PathBuf::from("broken.dll")],
        };

        let mut buffer = Vec::new();
        let result = run(MockProvider::new(), &invocation, &mut buffer);

        assert!(matches!(result, Err(Error::Load { .. })));
        assert!(buffer.is_empty());
    }
}
