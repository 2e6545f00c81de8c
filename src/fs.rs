//! File system primitives for the build root
//!
//! [`SafeWriter`] confines every write to the build root, rejecting
//! traversal before any byte lands on disk. [`mirror_into`] copies a
//! public-assets directory onto the root with flatten semantics.

use std::fs;
use std::io::Write;
use std::path::{Component, Path, PathBuf};

use walkdir::WalkDir;

use crate::error::{BakeryError, BakeryResult};

/// Writes bytes to paths inside a sandboxed root
///
/// Validation is lexical (absolute paths, empty paths, and any `..`
/// component are rejected) so escape attempts fail before the target's
/// parent directories exist.
#[derive(Debug, Clone)]
pub struct SafeWriter {
    root: PathBuf,
}

impl SafeWriter {
    /// Create a writer rooted at `root`
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// The sandbox root
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Write content to `relative` inside the root, atomically
    ///
    /// Creates parent directories as needed. Returns the full path the
    /// content was written to.
    pub fn write(&self, relative: &Path, content: &[u8]) -> BakeryResult<PathBuf> {
        self.validate(relative)?;

        let target = self.root.join(relative);
        if let Some(parent) = target.parent() {
            fs::create_dir_all(parent)?;
        }

        // tempfile + persist so a crashed build never leaves a torn file
        let parent = target.parent().unwrap_or(&self.root);
        let mut tmp = tempfile::NamedTempFile::new_in(parent)?;
        tmp.write_all(content)?;
        tmp.persist(&target).map_err(|e| e.error)?;

        Ok(target)
    }

    fn validate(&self, relative: &Path) -> BakeryResult<()> {
        let escape = || BakeryError::PathEscape {
            path: relative.to_path_buf(),
            root: self.root.clone(),
        };

        if relative.as_os_str().is_empty() {
            return Err(escape());
        }

        for component in relative.components() {
            match component {
                Component::Normal(_) | Component::CurDir => {}
                Component::ParentDir | Component::RootDir | Component::Prefix(_) => {
                    return Err(escape());
                }
            }
        }

        Ok(())
    }
}

/// Copy the contents of `source` into `root`, flattened
///
/// `source/404.html` lands at `root/404.html`, never at
/// `root/source/404.html`. Directories are copied recursively;
/// dotfiles are included.
pub fn mirror_into(source: &Path, root: &Path) -> BakeryResult<()> {
    fs::create_dir_all(root)?;

    for entry in fs::read_dir(source)? {
        let entry = entry?;
        let destination = root.join(entry.file_name());

        if entry.file_type()?.is_dir() {
            copy_dir_recursive(&entry.path(), &destination)?;
        } else {
            fs::copy(entry.path(), &destination)?;
        }
    }

    Ok(())
}

fn copy_dir_recursive(source: &Path, destination: &Path) -> BakeryResult<()> {
    fs::create_dir_all(destination)?;

    for entry in fs::read_dir(source)? {
        let entry = entry?;
        let target = destination.join(entry.file_name());

        if entry.file_type()?.is_dir() {
            copy_dir_recursive(&entry.path(), &target)?;
        } else {
            fs::copy(entry.path(), &target)?;
        }
    }

    Ok(())
}

/// Enumerate all regular files under `root`, recursively
///
/// Returns paths relative to `root`, dotfiles included, in a
/// deterministic (name-sorted) order.
pub fn walk_files(root: &Path) -> BakeryResult<Vec<PathBuf>> {
    let mut files = Vec::new();

    for entry in WalkDir::new(root).sort_by_file_name() {
        let entry = entry.map_err(|e| BakeryError::Io(e.into()))?;
        if !entry.file_type().is_file() {
            continue;
        }

        let relative = entry
            .path()
            .strip_prefix(root)
            .expect("walkdir yields paths under its root");
        files.push(relative.to_path_buf());
    }

    Ok(files)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn write_creates_parent_directories() {
        let dir = tempdir().unwrap();
        let writer = SafeWriter::new(dir.path());

        let written = writer
            .write(Path::new("posts/2024/hello.html"), b"<p>Hi!</p>")
            .unwrap();

        assert_eq!(fs::read(written).unwrap(), b"<p>Hi!</p>");
    }

    #[test]
    fn write_overwrites_existing_file() {
        let dir = tempdir().unwrap();
        let writer = SafeWriter::new(dir.path());

        writer.write(Path::new("index.html"), b"old").unwrap();
        writer.write(Path::new("index.html"), b"new").unwrap();

        assert_eq!(fs::read(dir.path().join("index.html")).unwrap(), b"new");
    }

    #[test]
    fn write_rejects_traversal_without_writing() {
        let dir = tempdir().unwrap();
        let writer = SafeWriter::new(dir.path().join("site"));

        let err = writer
            .write(Path::new("../escape.html"), b"nope")
            .unwrap_err();

        assert!(matches!(err, BakeryError::PathEscape { .. }));
        assert!(!dir.path().join("escape.html").exists());
        // the root itself must not have been created either
        assert!(!dir.path().join("site").exists());
    }

    #[test]
    fn write_rejects_nested_traversal() {
        let dir = tempdir().unwrap();
        let writer = SafeWriter::new(dir.path());

        let err = writer
            .write(Path::new("posts/../../escape.html"), b"nope")
            .unwrap_err();
        assert!(matches!(err, BakeryError::PathEscape { .. }));
    }

    #[test]
    fn write_rejects_absolute_path() {
        let dir = tempdir().unwrap();
        let writer = SafeWriter::new(dir.path());

        let err = writer.write(Path::new("/etc/passwd"), b"nope").unwrap_err();
        assert!(matches!(err, BakeryError::PathEscape { .. }));
    }

    #[test]
    fn write_rejects_empty_path() {
        let dir = tempdir().unwrap();
        let writer = SafeWriter::new(dir.path());

        let err = writer.write(Path::new(""), b"nope").unwrap_err();
        assert!(matches!(err, BakeryError::PathEscape { .. }));
    }

    #[test]
    fn mirror_flattens_source_contents() {
        let dir = tempdir().unwrap();
        let public = dir.path().join("public");
        let site = dir.path().join("site");

        fs::create_dir_all(public.join("assets")).unwrap();
        fs::write(public.join("404.html"), "not found").unwrap();
        fs::write(public.join("assets/app.css"), "body{}").unwrap();

        mirror_into(&public, &site).unwrap();

        // public/404.html -> site/404.html, NOT site/public/404.html
        assert_eq!(fs::read_to_string(site.join("404.html")).unwrap(), "not found");
        assert_eq!(
            fs::read_to_string(site.join("assets/app.css")).unwrap(),
            "body{}"
        );
        assert!(!site.join("public").exists());
    }

    #[test]
    fn walk_includes_dotfiles_and_sorts() {
        let dir = tempdir().unwrap();
        fs::create_dir_all(dir.path().join("sub")).unwrap();
        fs::write(dir.path().join(".well-known"), "x").unwrap();
        fs::write(dir.path().join("index.html"), "x").unwrap();
        fs::write(dir.path().join("sub/page.html"), "x").unwrap();

        let files = walk_files(dir.path()).unwrap();

        assert_eq!(
            files,
            vec![
                PathBuf::from(".well-known"),
                PathBuf::from("index.html"),
                PathBuf::from("sub/page.html"),
            ]
        );
    }
}
