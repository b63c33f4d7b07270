//! Generated C source emission.
//!
//! The [`SourceGenerator`] consumes a [`Spec`] and writes a self-contained C
//! source file: a fixed preamble with the table-entry typedef, one static
//! byte array per input file (in spec order), a lookup table terminated by a
//! NULL sentinel row, and a single exported lookup function that linearly
//! scans the table by `strcmp`.
//!
//! ## Output layout
//!
//! ```c
//! // a.bin - assets/a.bin
//! static uint8_t file_data_0[] = {
//!     0x01,0x02,0x03,0x00
//! };
//!
//! static CEMBED_TableEntry cembed_table_entry[] = {
//!     { "a.bin", file_data_0, 3 },
//!     { NULL, NULL, 0 },
//! };
//! ```
//!
//! Every array carries one trailing `0x00` literal beyond the real content;
//! the size recorded in the table never counts it. Consumers that respect
//! the reported size reconstruct the original bytes exactly, and consumers
//! that want a NUL-terminated view get one for free.

use crate::error::{Error, Result};
use crate::name::{find_function_name, variable_name};
use crate::spec::{InputFile, Spec};
use std::fs::{self, File};
use std::io::{BufReader, Read, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, trace};

/// Row indent inside generated array and table bodies
const INDENT: &str = "    ";

/// Per-file bookkeeping produced during emission
///
/// One record is created per input file while its array is written, then
/// consumed by the table and lookup-function sections. Never persisted.
#[derive(Debug, Clone)]
pub struct GeneratedFile {
    /// Position of the file in spec order (0-indexed)
    pub file_index: usize,
    /// Lookup key from the spec
    pub id: String,
    /// Name of the emitted static array
    pub variable_name: String,
    /// Real bytes read from disk, excluding the trailing sentinel
    pub size: u64,
}

/// Emits a generated C source artifact from a spec
///
/// # Example
///
/// ```no_run
/// use cembed_core::{SourceGenerator, Spec};
/// use std::fs;
///
/// let document = fs::read_to_string("embed.json")?;
/// let spec = Spec::from_json(&document)?;
///
/// let mut out = Vec::new();
/// SourceGenerator::new(spec, "assets").generate(&mut out)?;
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[derive(Debug)]
pub struct SourceGenerator {
    spec: Spec,
    base: PathBuf,
}

impl SourceGenerator {
    /// Creates a generator for the given spec, resolving each input file's
    /// path against `base`
    pub fn new(spec: Spec, base: impl Into<PathBuf>) -> Self {
        Self {
            spec,
            base: base.into(),
        }
    }

    /// Runs the full emission pass: preamble, arrays, table, lookup function
    ///
    /// A failure partway through leaves an incomplete artifact behind the
    /// writer; the caller must discard it and retry from scratch.
    pub fn generate(&self, out: &mut impl Write) -> Result<()> {
        debug!(
            "generating source for {} input files",
            self.spec.input_files.len()
        );

        self.write_intro(out)?;
        let generated_files = self.write_arrays(out)?;
        self.write_table(out, &generated_files)?;
        self.write_find_function(out, &generated_files)?;

        debug!("generation complete");
        Ok(())
    }

    /// Writes the fixed preamble: banner, includes, table-entry typedef
    fn write_intro(&self, out: &mut impl Write) -> Result<()> {
        writeln!(out, "//")?;
        writeln!(out, "// generated by cembed")?;
        writeln!(out, "//")?;
        writeln!(out)?;
        writeln!(out, "#include <stddef.h>")?;
        writeln!(out, "#include <stdint.h>")?;
        writeln!(out, "#include <string.h>")?;
        writeln!(out)?;
        writeln!(out, "typedef struct TAG_CEMBED_TableEntry {{")?;
        writeln!(out, "{}const char* id;", INDENT)?;
        writeln!(out, "{}const uint8_t* data;", INDENT)?;
        writeln!(out, "{}size_t size;", INDENT)?;
        writeln!(out, "}} CEMBED_TableEntry;")?;
        Ok(())
    }

    /// Writes one static array per input file, in spec order
    fn write_arrays(&self, out: &mut impl Write) -> Result<Vec<GeneratedFile>> {
        let mut generated_files = Vec::with_capacity(self.spec.input_files.len());

        for (file_index, file) in self.spec.input_files.iter().enumerate() {
            generated_files.push(self.write_file_array(out, file, file_index)?);
        }

        Ok(generated_files)
    }

    /// Writes the array declaration for a single input file
    fn write_file_array(
        &self,
        out: &mut impl Write,
        file: &InputFile,
        file_index: usize,
    ) -> Result<GeneratedFile> {
        let path = self.base.join(&file.path);

        // Size is probed independently up front; the byte count observed
        // while encoding must agree or the run aborts.
        let expected_size = fs::metadata(&path)
            .map_err(|e| Error::file_open(&path, e))?
            .len();
        let reader = BufReader::new(File::open(&path).map_err(|e| Error::file_open(&path, e))?);

        self.emit_array(out, file, file_index, reader, expected_size, &path)
    }

    /// Emits one array from an already-open byte source and checks the read
    /// count against the independently probed size
    fn emit_array(
        &self,
        out: &mut impl Write,
        file: &InputFile,
        file_index: usize,
        reader: impl Read,
        expected_size: u64,
        path: &Path,
    ) -> Result<GeneratedFile> {
        let variable_name = variable_name(file_index);

        trace!(
            "embedding {} ({} bytes) as {}",
            path.display(),
            expected_size,
            variable_name
        );

        writeln!(out)?;
        writeln!(out, "// {} - {}", file.id, file.path)?;
        writeln!(
            out,
            "static {} {}[] = {{",
            self.spec.variable_type, variable_name
        )?;

        let size = encode_bytes(out, reader, self.spec.max_cols, path)?;

        writeln!(out)?;
        writeln!(out, "}};")?;

        if expected_size != size {
            return Err(Error::size_mismatch(path, expected_size, size));
        }

        Ok(GeneratedFile {
            file_index,
            id: file.id.clone(),
            variable_name,
            size,
        })
    }

    /// Writes the lookup table, one row per file plus the NULL sentinel row
    fn write_table(&self, out: &mut impl Write, generated_files: &[GeneratedFile]) -> Result<()> {
        writeln!(out)?;
        writeln!(out, "static CEMBED_TableEntry cembed_table_entry[] = {{")?;
        for generated_file in generated_files {
            writeln!(
                out,
                "{}{{ \"{}\", {}, {} }},",
                INDENT, generated_file.id, generated_file.variable_name, generated_file.size
            )?;
        }
        writeln!(out, "{}{{ NULL, NULL, 0 }},", INDENT)?;
        writeln!(out, "}};")?;
        Ok(())
    }

    /// Writes the exported lookup function: a linear `strcmp` scan that
    /// fills the output slots and returns 0 on the first match, 1 otherwise
    fn write_find_function(
        &self,
        out: &mut impl Write,
        generated_files: &[GeneratedFile],
    ) -> Result<()> {
        let function_name = find_function_name(&self.spec.api_prefix);

        writeln!(out)?;
        writeln!(
            out,
            "int {}(const char* id, const {}** data, size_t *size) {{",
            function_name, self.spec.variable_type
        )?;
        writeln!(
            out,
            "    for (int i = 0; i < {}; i++) {{",
            generated_files.len()
        )?;
        writeln!(out, "        if (strcmp(id, cembed_table_entry[i].id) == 0) {{")?;
        writeln!(out, "            *data = cembed_table_entry[i].data;")?;
        writeln!(out, "            *size = cembed_table_entry[i].size;")?;
        writeln!(out, "            return 0;")?;
        writeln!(out, "        }}")?;
        writeln!(out, "    }}")?;
        writeln!(out)?;
        writeln!(out, "    return 1;")?;
        writeln!(out, "}}")?;
        Ok(())
    }
}

/// Encodes a byte stream as two-digit lower-case hex literals, `max_cols`
/// per indented row, and appends the trailing `0x00` sentinel.
///
/// Returns the number of real bytes read, which never counts the sentinel.
/// If the content ends exactly on a row boundary the sentinel starts a new
/// row; an empty stream yields a lone un-indented `0x00`.
fn encode_bytes(
    out: &mut impl Write,
    reader: impl Read,
    max_cols: usize,
    path: &Path,
) -> Result<u64> {
    let max_cols = max_cols as u64;
    let mut count: u64 = 0;

    for byte in reader.bytes() {
        let byte = byte.map_err(|e| Error::file_read(path, count, e))?;

        if count % max_cols == 0 {
            if count != 0 {
                writeln!(out)?;
            }
            write!(out, "{}", INDENT)?;
        }

        write!(out, "0x{:02x},", byte)?;
        count += 1;
    }

    if count != 0 && count % max_cols == 0 {
        writeln!(out)?;
        write!(out, "{}", INDENT)?;
    }
    write!(out, "0x00")?;

    Ok(count)
}
