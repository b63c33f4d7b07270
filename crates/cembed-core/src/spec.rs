//! The spec document: a fully serializable description of one generation job.
//!
//! A [`Spec`] lists the files to embed and the formatting parameters for the
//! generated source. It is produced by the [`SpecBuilder`](crate::SpecBuilder)
//! (or written by hand), persisted as a JSON document, and later consumed by
//! the [`SourceGenerator`](crate::SourceGenerator) — possibly in a different
//! process or environment. The document has no version field; its schema is
//! the interchange contract between the two stages.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::io::Read;

/// Default number of byte literals per row in generated array bodies
pub const DEFAULT_MAX_COLS: usize = 16;

/// Default element type emitted for generated arrays
pub const DEFAULT_VARIABLE_TYPE: &str = "uint8_t";

/// Default API prefix for the generated lookup function
pub const DEFAULT_API_PREFIX: &str = "default";

/// Default include guard recorded in the spec document
pub const DEFAULT_INCLUDE_GUARD: &str = "CEMBED_H_INCLUDED";

/// One embedded resource: a lookup key and the file that backs it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InputFile {
    /// Lookup key exposed to runtime callers; unique within a spec.
    /// Derived from the file's path relative to the scanned root, with
    /// forward-slash separators regardless of host platform.
    pub id: String,

    /// On-disk location the generator reads bytes from, relative to the
    /// base directory supplied at generation time
    pub path: String,
}

impl InputFile {
    /// Creates a new input file entry
    pub fn new(id: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            path: path.into(),
        }
    }
}

// Input files order by id alone so that sorting a collection yields the
// deterministic emission order.
impl PartialOrd for InputFile {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for InputFile {
    fn cmp(&self, other: &Self) -> Ordering {
        self.id.cmp(&other.id)
    }
}

/// A generation job description
///
/// `input_files` is kept sorted by id with ids unique. The generator does not
/// verify uniqueness itself; a spec violating it simply resolves lookups to
/// the first match.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Spec {
    /// Number of byte literals per row in generated array bodies; must be
    /// positive. Controls formatting only, never semantics.
    pub max_cols: usize,

    /// Namespacing token inserted into the generated lookup function's name
    pub api_prefix: String,

    /// Include guard name, reserved for header-generation variants
    pub include_guard: String,

    /// Element type emitted verbatim for each generated array (not
    /// type-checked; any C integer type name works)
    pub variable_type: String,

    /// Files to embed, sorted by id
    pub input_files: Vec<InputFile>,
}

impl Spec {
    /// Parses a spec document from a JSON string
    pub fn from_json(document: &str) -> Result<Self> {
        serde_json::from_str(document).map_err(Error::SpecParse)
    }

    /// Parses a spec document from a reader
    pub fn from_reader(reader: impl Read) -> Result<Self> {
        serde_json::from_reader(reader).map_err(Error::SpecParse)
    }

    /// Serializes the spec to a pretty-printed JSON document with the given
    /// indent width
    pub fn to_json_pretty(&self, indent: usize) -> Result<String> {
        let indent = " ".repeat(indent);
        let formatter = serde_json::ser::PrettyFormatter::with_indent(indent.as_bytes());
        let mut buf = Vec::new();
        let mut ser = serde_json::Serializer::with_formatter(&mut buf, formatter);
        self.serialize(&mut ser).map_err(Error::SpecSerialize)?;
        Ok(String::from_utf8(buf).expect("serde_json emits valid UTF-8"))
    }
}
