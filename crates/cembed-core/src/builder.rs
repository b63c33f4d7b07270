//! Spec construction from a directory tree.
//!
//! The [`SpecBuilder`] walks one or more root directories, assigns each
//! regular file a stable identifier (its root-relative path) and a storage
//! path (its base-relative path), and packages the sorted collection with the
//! generation parameters into a [`Spec`]. Running the builder twice over an
//! unchanged tree yields byte-identical documents.

use crate::error::{Error, Result};
use crate::spec::{
    InputFile, Spec, DEFAULT_API_PREFIX, DEFAULT_INCLUDE_GUARD, DEFAULT_MAX_COLS,
    DEFAULT_VARIABLE_TYPE,
};
use std::path::{Component, Path, PathBuf};
use tracing::{debug, trace};
use walkdir::WalkDir;

/// Builds a [`Spec`] from one or more scan roots
///
/// # Example
///
/// ```no_run
/// use cembed_core::SpecBuilder;
///
/// let spec = SpecBuilder::new("assets")
///     .root("assets")
///     .api_prefix("assets")
///     .build()?;
/// # Ok::<(), cembed_core::Error>(())
/// ```
#[derive(Debug, Clone)]
pub struct SpecBuilder {
    roots: Vec<PathBuf>,
    base: PathBuf,
    max_cols: usize,
    api_prefix: String,
    include_guard: String,
    variable_type: String,
}

impl SpecBuilder {
    /// Creates a builder with the given base directory for relative-path
    /// computation and default generation parameters
    pub fn new(base: impl Into<PathBuf>) -> Self {
        Self {
            roots: Vec::new(),
            base: base.into(),
            max_cols: DEFAULT_MAX_COLS,
            api_prefix: DEFAULT_API_PREFIX.to_string(),
            include_guard: DEFAULT_INCLUDE_GUARD.to_string(),
            variable_type: DEFAULT_VARIABLE_TYPE.to_string(),
        }
    }

    /// Adds a root directory to scan
    pub fn root(mut self, root: impl Into<PathBuf>) -> Self {
        self.roots.push(root.into());
        self
    }

    /// Adds several root directories to scan
    pub fn roots<I, P>(mut self, roots: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        self.roots.extend(roots.into_iter().map(Into::into));
        self
    }

    /// Sets the number of byte literals per generated row
    pub fn max_cols(mut self, max_cols: usize) -> Self {
        self.max_cols = max_cols;
        self
    }

    /// Sets the API prefix for the generated lookup function
    pub fn api_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.api_prefix = prefix.into();
        self
    }

    /// Sets the include guard recorded in the spec document
    pub fn include_guard(mut self, guard: impl Into<String>) -> Self {
        self.include_guard = guard.into();
        self
    }

    /// Sets the element type emitted for generated arrays
    pub fn variable_type(mut self, variable_type: impl Into<String>) -> Self {
        self.variable_type = variable_type.into();
        self
    }

    /// Scans all roots and assembles the spec
    ///
    /// Only regular files are collected; directories, symlinks and special
    /// files are skipped. Fails with [`Error::MissingDirectory`] if any root
    /// does not exist — no partial spec is produced.
    pub fn build(&self) -> Result<Spec> {
        let mut input_files = Vec::new();

        for root in &self.roots {
            if !root.exists() {
                return Err(Error::missing_directory(root));
            }

            debug!("scanning root: {}", root.display());

            for entry in WalkDir::new(root).follow_links(false) {
                let entry = entry?;

                // file_type() does not follow symlinks, so links to regular
                // files are excluded along with directories
                if !entry.file_type().is_file() {
                    trace!("skipping non-regular entry: {}", entry.path().display());
                    continue;
                }

                let id = relative_slash_path(entry.path(), root);
                let path = relative_slash_path(entry.path(), &self.base);
                trace!("found {} -> {}", id, path);

                input_files.push(InputFile::new(id, path));
            }
        }

        input_files.sort();

        debug!("collected {} input files", input_files.len());

        Ok(Spec {
            max_cols: self.max_cols,
            api_prefix: self.api_prefix.clone(),
            include_guard: self.include_guard.clone(),
            variable_type: self.variable_type.clone(),
            input_files,
        })
    }
}

/// Computes the lexical relative path from `base` to `path` and joins its
/// components with forward slashes regardless of host platform
fn relative_slash_path(path: &Path, base: &Path) -> String {
    let path_components = normal_components(path);
    let base_components = normal_components(base);

    let common = path_components
        .iter()
        .zip(&base_components)
        .take_while(|(a, b)| a == b)
        .count();

    let mut parts: Vec<String> = Vec::new();
    for _ in common..base_components.len() {
        parts.push("..".to_string());
    }
    for component in &path_components[common..] {
        parts.push(component.as_os_str().to_string_lossy().into_owned());
    }

    parts.join("/")
}

/// Path components with the no-op `.` entries dropped, so that `./assets`
/// and `assets` compare equal
fn normal_components(path: &Path) -> Vec<Component<'_>> {
    path.components()
        .filter(|c| !matches!(c, Component::CurDir))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::fs;
    use tempfile::TempDir;

    fn write_file(dir: &Path, rel: &str, contents: &[u8]) {
        let path = dir.join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, contents).unwrap();
    }

    #[test]
    fn test_relative_slash_path() {
        assert_eq!(
            relative_slash_path(Path::new("assets/sub/a.bin"), Path::new("assets")),
            "sub/a.bin"
        );
        assert_eq!(
            relative_slash_path(Path::new("./assets/a.bin"), Path::new(".")),
            "assets/a.bin"
        );
        assert_eq!(
            relative_slash_path(Path::new("assets/a.bin"), Path::new("other")),
            "../assets/a.bin"
        );
    }

    #[test]
    fn test_build_sorts_by_id() {
        let dir = TempDir::new().unwrap();
        write_file(dir.path(), "z.bin", b"z");
        write_file(dir.path(), "a.bin", b"a");
        write_file(dir.path(), "sub/m.bin", b"m");

        let spec = SpecBuilder::new(dir.path()).root(dir.path()).build().unwrap();

        let ids: Vec<&str> = spec.input_files.iter().map(|f| f.id.as_str()).collect();
        assert_eq!(ids, vec!["a.bin", "sub/m.bin", "z.bin"]);
    }

    #[test]
    fn test_build_ids_relative_to_root_paths_relative_to_base() {
        let dir = TempDir::new().unwrap();
        write_file(dir.path(), "assets/sub/a.bin", b"a");

        let spec = SpecBuilder::new(dir.path())
            .root(dir.path().join("assets"))
            .build()
            .unwrap();

        assert_eq!(spec.input_files.len(), 1);
        assert_eq!(spec.input_files[0].id, "sub/a.bin");
        assert_eq!(spec.input_files[0].path, "assets/sub/a.bin");
    }

    #[test]
    fn test_build_is_deterministic() {
        let dir = TempDir::new().unwrap();
        write_file(dir.path(), "b.bin", b"b");
        write_file(dir.path(), "a.bin", b"a");
        write_file(dir.path(), "nested/deep/c.bin", b"c");

        let builder = SpecBuilder::new(dir.path()).root(dir.path());
        let first = builder.build().unwrap();
        let second = builder.build().unwrap();

        assert_eq!(
            first.to_json_pretty(2).unwrap(),
            second.to_json_pretty(2).unwrap()
        );
    }

    #[test]
    fn test_build_ids_unique() {
        let dir = TempDir::new().unwrap();
        write_file(dir.path(), "a.bin", b"a");
        write_file(dir.path(), "sub/a.bin", b"a");
        write_file(dir.path(), "sub/b.bin", b"b");

        let spec = SpecBuilder::new(dir.path()).root(dir.path()).build().unwrap();

        let mut ids: Vec<&str> = spec.input_files.iter().map(|f| f.id.as_str()).collect();
        ids.dedup();
        assert_eq!(ids.len(), spec.input_files.len());
    }

    #[test]
    fn test_build_missing_root_fails() {
        let dir = TempDir::new().unwrap();
        let result = SpecBuilder::new(dir.path())
            .root(dir.path().join("does-not-exist"))
            .build();

        assert!(matches!(result, Err(Error::MissingDirectory { .. })));
    }

    #[test]
    fn test_build_skips_directories() {
        let dir = TempDir::new().unwrap();
        write_file(dir.path(), "sub/a.bin", b"a");

        let spec = SpecBuilder::new(dir.path()).root(dir.path()).build().unwrap();

        let ids: Vec<&str> = spec.input_files.iter().map(|f| f.id.as_str()).collect();
        assert_eq!(ids, vec!["sub/a.bin"]);
    }

    #[cfg(unix)]
    #[test]
    fn test_build_skips_symlinks() {
        let dir = TempDir::new().unwrap();
        write_file(dir.path(), "a.bin", b"a");
        std::os::unix::fs::symlink(dir.path().join("a.bin"), dir.path().join("link.bin"))
            .unwrap();

        let spec = SpecBuilder::new(dir.path()).root(dir.path()).build().unwrap();

        let ids: Vec<&str> = spec.input_files.iter().map(|f| f.id.as_str()).collect();
        assert_eq!(ids, vec!["a.bin"]);
    }

    #[test]
    fn test_build_multiple_roots() {
        let dir = TempDir::new().unwrap();
        write_file(dir.path(), "one/b.bin", b"b");
        write_file(dir.path(), "two/a.bin", b"a");

        let spec = SpecBuilder::new(dir.path())
            .root(dir.path().join("one"))
            .root(dir.path().join("two"))
            .build()
            .unwrap();

        let ids: Vec<&str> = spec.input_files.iter().map(|f| f.id.as_str()).collect();
        assert_eq!(ids, vec!["a.bin", "b.bin"]);
        assert_eq!(spec.input_files[0].path, "two/a.bin");
        assert_eq!(spec.input_files[1].path, "one/b.bin");
    }

    #[test]
    fn test_build_parameters_pass_through() {
        let dir = TempDir::new().unwrap();

        let spec = SpecBuilder::new(dir.path())
            .root(dir.path())
            .max_cols(8)
            .api_prefix("assets")
            .include_guard("ASSETS_H_INCLUDED")
            .variable_type("unsigned char")
            .build()
            .unwrap();

        assert_eq!(spec.max_cols, 8);
        assert_eq!(spec.api_prefix, "assets");
        assert_eq!(spec.include_guard, "ASSETS_H_INCLUDED");
        assert_eq!(spec.variable_type, "unsigned char");
        assert!(spec.input_files.is_empty());
    }
}
