use std::path::PathBuf;

use thiserror::Error;

macro_rules! malformed_error {
    // Single string version
    ($msg:expr) => {
        crate::Error::Malformed {
            message: $msg.to_string(),
            file: file!(),
            line: line!(),
        }
    };

    // Format string with arguments version
    ($fmt:expr, $($arg:tt)*) => {
        crate::Error::Malformed {
            message: format!($fmt, $($arg)*),
            file: file!(),
            line: line!(),
        }
    };
}

/// The generic Error type, which provides coverage for all errors this library can potentially
/// return.
///
/// Only a failed binary load is fatal to an invocation. A missing type path and a type that
/// cannot be found are not errors; they are reported through sentinel lines by
/// [`crate::invocation::run`].
///
/// # Error Categories
///
/// ## Provider Errors
/// - [`Error::Load`] - A binary passed on the command line could not be loaded
/// - [`Error::Malformed`] - The provider met metadata it cannot describe
/// - [`Error::RecursionLimit`] - A type signature nested deeper than allowed
///
/// ## Output Errors
/// - [`Error::Io`] - Writing the serialized lines failed
///
/// # Examples
///
/// ```rust,no_run
/// use externdump::{lookup::LookupDriver, provider::cil::CilProvider, Error};
/// use std::path::PathBuf;
///
/// let mut driver = LookupDriver::new(CilProvider::new());
/// match driver.load_binaries(&[PathBuf::from("Library.dll")]) {
///     Ok(()) => println!("loaded"),
///     Err(Error::Load { path, source }) => {
///         eprintln!("cannot load {}: {}", path.display(), source);
///     }
///     Err(e) => eprintln!("other error: {e}"),
/// }
/// ```
#[derive(Error, Debug)]
pub enum Error {
    /// A binary could not be loaded by the metadata provider.
    ///
    /// This aborts the invocation before any lookup is attempted, so no partial
    /// output is ever produced.
    ///
    /// # Fields
    ///
    /// * `path` - The binary that failed to load
    /// * `source` - The provider's own error
    #[error("Failed to load binary '{}': {source}", path.display())]
    Load {
        /// The path that was handed to the provider
        path: PathBuf,
        /// The underlying provider failure
        #[source]
        source: Box<dyn std::error::Error + Send + Sync + 'static>,
    },

    /// The provider encountered metadata it could not turn into a type handle.
    ///
    /// The error includes the source location where the malformation was detected
    /// for debugging purposes.
    #[error("Malformed - {file}:{line}: {message}")]
    Malformed {
        /// The message to be printed for the Malformed error
        message: String,
        /// The source file in which this error occured
        file: &'static str,
        /// The source line in which this error occured
        line: u32,
    },

    /// Reached the maximum nesting depth while converting a type signature.
    #[error("Reach the maximum recursion level allowed - {0}")]
    RecursionLimit(usize),

    /// Writing the serialized type description failed.
    #[error("{0}")]
    Io(#[from] std::io::Error),
}
