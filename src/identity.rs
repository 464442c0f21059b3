//! Identity of the test making a snapshot call.

use std::path::{Path, PathBuf};

/// The two facts the snapshot core needs about a test: its hierarchical
/// full name and the file it is defined in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TestIdentity {
    pub full_name: String,
    pub file: PathBuf,
}

impl TestIdentity {
    pub fn new(full_name: impl Into<String>, file: impl Into<PathBuf>) -> Self {
        Self {
            full_name: full_name.into(),
            file: file.into(),
        }
    }

    /// Identity of the running libtest test.
    ///
    /// libtest names each test thread after the test path, which becomes the
    /// full name. When the thread is unnamed or is the main thread,
    /// `fallback_name` is used instead. `file` is a `file!()` path; it is
    /// resolved against the working directory, then against `manifest_dir`
    /// and its ancestors, so paths relative to a workspace root also work.
    pub fn current(file: &str, manifest_dir: &str, fallback_name: &str) -> Self {
        let thread = std::thread::current();
        let full_name = match thread.name() {
            Some(name) if name != "main" => name.to_string(),
            _ => fallback_name.to_string(),
        };
        Self {
            full_name,
            file: resolve_test_file(Path::new(file), Path::new(manifest_dir)),
        }
    }
}

fn resolve_test_file(file: &Path, manifest_dir: &Path) -> PathBuf {
    if file.is_absolute() || file.exists() {
        return file.to_path_buf();
    }
    manifest_dir
        .ancestors()
        .map(|dir| dir.join(file))
        .find(|candidate| candidate.exists())
        .unwrap_or_else(|| manifest_dir.join(file))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn uses_thread_name_of_running_test() {
        let id = TestIdentity::current(file!(), env!("CARGO_MANIFEST_DIR"), "fallback");
        assert!(id.full_name.ends_with("uses_thread_name_of_running_test") || id.full_name == "fallback");
        assert!(id.file.exists());
    }

    #[test]
    fn resolves_against_manifest_ancestors() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("crates").join("inner");
        std::fs::create_dir_all(&nested).unwrap();
        std::fs::write(dir.path().join("top.rs"), "").unwrap();

        let resolved = resolve_test_file(Path::new("top.rs"), &nested);
        assert_eq!(resolved, dir.path().join("top.rs"));

        let missing = resolve_test_file(Path::new("nowhere/x.rs"), &nested);
        assert_eq!(missing, nested.join("nowhere/x.rs"));
    }
}
