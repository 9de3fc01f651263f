// Copyright 2025 Johann Kempter
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.
//
// SPDX-License-Identifier: Apache-2.0

#![doc(html_no_source)]
#![deny(missing_docs)]
#![allow(dead_code)]

//! # externdump
//!
//! Describes a single .NET type, read from compiled binaries, as a flat line protocol that
//! an extern-binding generator consumes to emit declarations for the type.
//!
//! Given a dotted path such as `mypkg.MyClass` and a list of binaries, the type is looked up
//! among everything the binaries define and printed as:
//!
//! - a header: name, interface flag, target package, resolved base type
//! - the implemented interfaces and generic parameters
//! - the public fields, properties and methods with their resolved types
//!
//! Every type reference is translated into the generator's dialect: four runtime primitives
//! become `Void`, `Int`, `Float` and `Bool`, arrays become `Array<T>`, and everything else is
//! placed under the `cs.` package with a lowercased namespace.
//!
//! ## Architecture
//!
//! - [`provider`] - the seam to the metadata reader, and the `dotscope` backed implementation
//! - [`naming`] - the type-name resolution rules
//! - [`model`] - the normalized description of one type
//! - [`serializer`] - the line protocol
//! - [`lookup`] - dotted-path parsing and matching
//! - [`invocation`] - one complete run, including the sentinel answers
//!
//! ## Example
//!
//! ```rust,no_run
//! use externdump::prelude::*;
//! use std::path::PathBuf;
//!
//! let invocation = Invocation {
//!     type_path: Some("mypkg.MyClass".to_string()),
//!     binaries: vec![PathBuf::from("mypkg.dll")],
//! };
//!
//! let stdout = std::io::stdout();
//! run(CilProvider::new(), &invocation, &mut stdout.lock())?;
//! # Ok::<(), externdump::Error>(())
//! ```

#[macro_use]
pub(crate) mod error;

/// Shared functionality which is used in unit-tests
#[cfg(test)]
pub(crate) mod test;

/// Convenient re-exports of the most commonly used types and traits.
///
/// # Example
///
/// ```rust,no_run
/// use externdump::prelude::*;
///
/// let mut driver = LookupDriver::new(CilProvider::new());
/// driver.load_binaries(&["Library.dll".into()])?;
/// if let Some(definition) = driver.lookup("library.Widget")? {
///     for line in serialize(&definition) {
///         println!("{line}");
///     }
/// }
/// # Ok::<(), externdump::Error>(())
/// ```
pub mod prelude;

/// The metadata provider seam and its `dotscope` implementation
pub mod provider;

/// Canonical type names in the generator's dialect
pub mod naming;

/// The normalized, provider independent description of a type
pub mod model;

/// The line protocol written to standard output
pub mod serializer;

/// Finding a type by its dotted path
pub mod lookup;

/// Running one complete invocation
pub mod invocation;

/// `externdump` Result type
///
/// A type alias for `std::result::Result<T, Error>` where the error type is always
/// [`crate::Error`].
pub type Result<T> = std::result::Result<T, Error>;

/// `externdump` Error type
///
/// # Examples
///
/// ```rust,no_run
/// use externdump::{provider::{cil::CilProvider, TypeMetadataProvider}, Error};
///
/// let mut provider = CilProvider::new();
/// match provider.load_binary(std::path::Path::new("missing.dll")) {
///     Ok(()) => println!("loaded"),
///     Err(Error::Load { path, .. }) => println!("cannot load {}", path.display()),
///     Err(e) => println!("Error: {}", e),
/// }
/// ```
pub use error::Error;
