//! File system operations (read, directory listing, glob).

use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

use super::RealRuntime;

impl RealRuntime {
    #[tracing::instrument(skip(self))]
    pub(crate) fn read_to_string_impl(&self, path: &Path) -> Result<String> {
        fs::read_to_string(path).with_context(|| format!("Failed to read {:?}", path))
    }

    #[tracing::instrument(skip(self))]
    pub(crate) fn read_dir_impl(&self, path: &Path) -> Result<Vec<PathBuf>> {
        let mut entries = fs::read_dir(path)
            .with_context(|| format!("Failed to list directory {:?}", path))?
            .map(|entry| Ok(entry?.path()))
            .collect::<Result<Vec<_>>>()?;
        // read_dir order is filesystem dependent
        entries.sort();
        Ok(entries)
    }

    #[tracing::instrument(skip(self))]
    pub(crate) fn exists_impl(&self, path: &Path) -> bool {
        path.exists()
    }

    #[tracing::instrument(skip(self))]
    pub(crate) fn is_dir_impl(&self, path: &Path) -> bool {
        path.is_dir()
    }

    #[tracing::instrument(skip(self))]
    pub(crate) fn glob_impl(&self, pattern: &str) -> Result<Vec<PathBuf>> {
        let paths = glob::glob(pattern)
            .with_context(|| format!("Invalid glob pattern {}", pattern))?
            .filter_map(|entry| entry.ok())
            .collect();
        Ok(paths)
    }
}

#[cfg(test)]
mod tests {
    use crate::runtime::{RealRuntime, Runtime};
    use tempfile::tempdir;

    #[test]
    fn test_real_runtime_file_ops() {
        let runtime = RealRuntime;
        let dir = tempdir().unwrap();
        let file_path = dir.path().join("METADATA");

        std::fs::write(&file_path, "Name: six\n").unwrap();
        assert!(runtime.exists(&file_path));
        assert!(!runtime.is_dir(&file_path));
        assert!(runtime.is_dir(dir.path()));

        let content = runtime.read_to_string(&file_path).unwrap();
        assert_eq!(content, "Name: six\n");

        assert!(runtime.read_to_string(&dir.path().join("missing")).is_err());
    }

    #[test]
    fn test_real_runtime_read_dir_sorted() {
        let runtime = RealRuntime;
        let dir = tempdir().unwrap();
        std::fs::create_dir(dir.path().join("b.dist-info")).unwrap();
        std::fs::create_dir(dir.path().join("a.dist-info")).unwrap();

        let entries = runtime.read_dir(dir.path()).unwrap();
        assert_eq!(
            entries,
            vec![dir.path().join("a.dist-info"), dir.path().join("b.dist-info")]
        );
    }

    #[test]
    fn test_real_runtime_glob() {
        let runtime = RealRuntime;
        let dir = tempdir().unwrap();
        let site = dir.path().join("lib/python3.12/site-packages");
        std::fs::create_dir_all(&site).unwrap();
        std::fs::create_dir_all(dir.path().join("lib/python2.7/site-packages")).unwrap();

        let pattern = format!("{}/lib/python3*/site-packages", dir.path().display());
        let found = runtime.glob(&pattern).unwrap();
        assert_eq!(found, vec![site]);
    }
}
