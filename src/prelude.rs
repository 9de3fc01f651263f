//! # externdump Prelude
//!
//! The types needed to run a lookup end to end, for glob import.

// ================================================================================================
// Core Types and Error Handling
// ================================================================================================

/// The main error type for all externdump operations
pub use crate::Error;

/// The result type used throughout externdump
pub use crate::Result;

// ================================================================================================
// Providers
// ================================================================================================

/// The provider seam
pub use crate::provider::{TypeHandle, TypeMetadataProvider};

/// The `dotscope` backed provider
pub use crate::provider::cil::{CilHandle, CilProvider};

// ================================================================================================
// Lookup and Output
// ================================================================================================

/// Dotted-path lookup
pub use crate::lookup::{LookupDriver, TypePath};

/// The normalized type description
pub use crate::model::TypeDefinition;

/// The line protocol
pub use crate::serializer::{serialize, write_to};

/// A complete invocation
pub use crate::invocation::{run, Invocation, Outcome};
