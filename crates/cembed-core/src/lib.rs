//! # cembed-core
//!
//! A library for embedding binary files into generated C source code.
//!
//! This crate provides the core functionality for:
//! - Building a spec document from a directory tree (file discovery, id
//!   assignment, deterministic ordering)
//! - Emitting a self-contained C source file with each file's bytes as a
//!   static array, a lookup table, and a lookup-by-id function
//! - (De)serializing the spec document that connects the two stages
//!
//! ## Architecture
//!
//! The library is organized into several modules:
//!
//! - [`spec`]: The spec document data model and its JSON (de)serialization
//! - [`builder`]: Spec construction from one or more scan roots
//! - [`generator`]: Generated C source emission
//! - [`name`]: Symbol naming for generated code
//! - [`error`]: Error types and handling
//!
//! ## Example
//!
//! ```no_run
//! use cembed_core::{SourceGenerator, SpecBuilder};
//!
//! // Discover the files to embed and assemble a spec
//! let spec = SpecBuilder::new("assets").root("assets").build()?;
//!
//! // Emit the generated C source
//! let mut out = Vec::new();
//! SourceGenerator::new(spec, "assets").generate(&mut out)?;
//! # Ok::<(), cembed_core::Error>(())
//! ```
//!
//! The two stages may also run in separate processes: persist the spec with
//! [`Spec::to_json_pretty`](spec::Spec::to_json_pretty) and load it later
//! with [`Spec::from_json`](spec::Spec::from_json).

#![deny(unsafe_code)]
#![warn(missing_docs, rust_2018_idioms, unreachable_pub)]

pub mod builder;
pub mod error;
pub mod generator;
pub mod name;
pub mod spec;

// Re-export primary types for convenience
pub use builder::SpecBuilder;
pub use error::{Error, Result};
pub use generator::{GeneratedFile, SourceGenerator};
pub use spec::{InputFile, Spec};

/// Crate version for programmatic access
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
