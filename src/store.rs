//! Snapshot store files.
//!
//! One store file exists per test source file. It holds an ordered mapping
//! from snapshot key to canonical value, written as a readable listing with
//! one statement per key:
//!
//! ```text
//! snapshots["tests::render(0)"] = {
//!   "title": "hello"
//! };
//!
//! ```
//!
//! Keys are JSON string literals and values are [`Canonical::render`]
//! output (or `undefined` for a top-level absent value). Loading goes
//! through the dedicated parser in this module; the file is never evaluated.
//! A store is always rewritten in full.

use std::collections::HashMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use indexmap::IndexMap;
use once_cell::sync::Lazy;
use tracing::debug;

use crate::canonical::{Canonical, ABSENT_LITERAL};
use crate::config::SnapshotConfig;
use crate::errors::{Result, SnapshotError};

const STATEMENT_PREFIX: &str = "snapshots[";
const ASSIGNMENT: &str = "] = ";
const TERMINATOR: char = ';';

static PATH_GUARDS: Lazy<Mutex<HashMap<PathBuf, Arc<Mutex<()>>>>> =
    Lazy::new(|| Mutex::new(HashMap::new()));

/// Location of the store for `test_file`:
/// `<test dir>/<snapshot_dir>/<test file name><extension>`.
///
/// ```rust
/// use std::path::Path;
/// use snapkeep::{store_path_for, SnapshotConfig};
/// let path = store_path_for(Path::new("tests/render.rs"), &SnapshotConfig::plain());
/// assert_eq!(path, Path::new("tests/__snapshots__/render.rs.snap"));
/// ```
pub fn store_path_for(test_file: &Path, config: &SnapshotConfig) -> PathBuf {
    let dir = test_file.parent().unwrap_or_else(|| Path::new(""));
    let file_name = test_file
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    dir.join(&config.snapshot_dir)
        .join(format!("{}{}", file_name, config.extension))
}

/// Process-wide lock for one store path.
///
/// Holding it across load, modify, and persist keeps parallel tests in the
/// same binary from overwriting each other's new snapshots. Other processes
/// are not coordinated.
pub fn path_guard(path: &Path) -> Arc<Mutex<()>> {
    let mut guards = match PATH_GUARDS.lock() {
        Ok(guard) => guard,
        Err(poisoned) => poisoned.into_inner(),
    };
    guards.entry(path.to_path_buf()).or_default().clone()
}

/// In-memory copy of one store file.
#[derive(Debug, Clone, PartialEq)]
pub struct SnapshotStore {
    path: PathBuf,
    entries: IndexMap<String, Canonical>,
}

impl SnapshotStore {
    /// An empty store that will persist to `path`.
    pub fn empty(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            entries: IndexMap::new(),
        }
    }

    /// Reads the store at `path`. A missing file yields an empty store.
    pub fn load(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let content = match fs::read_to_string(&path) {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!(path = %path.display(), "no snapshot store yet");
                return Ok(Self::empty(path));
            }
            Err(e) => return Err(SnapshotError::io(path, e)),
        };
        let entries = parse_store(&content).map_err(|(line, message)| SnapshotError::Parse {
            path: path.clone(),
            line,
            message,
        })?;
        debug!(path = %path.display(), entries = entries.len(), "loaded snapshot store");
        Ok(Self { path, entries })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn get(&self, key: &str) -> Option<&Canonical> {
        self.entries.get(key)
    }

    /// Sets `key`. An existing key keeps its position; a new key is appended.
    pub fn insert(&mut self, key: impl Into<String>, value: Canonical) -> Option<Canonical> {
        self.entries.insert(key.into(), value)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Creates the store's directory if it does not exist yet.
    pub fn ensure_dir(&self) -> Result<()> {
        match self.path.parent() {
            Some(dir) if !dir.as_os_str().is_empty() && !dir.exists() => {
                debug!(dir = %dir.display(), "creating snapshot directory");
                fs::create_dir_all(dir).map_err(|e| SnapshotError::io(dir, e))
            }
            _ => Ok(()),
        }
    }

    /// Serializes the whole mapping in store format.
    pub fn to_source(&self) -> Result<String> {
        let mut out = String::new();
        for (key, value) in &self.entries {
            out.push_str(STATEMENT_PREFIX);
            out.push_str(&serde_json::to_string(key)?);
            out.push_str(ASSIGNMENT);
            out.push_str(&value.render()?);
            out.push(TERMINATOR);
            out.push_str("\n\n");
        }
        Ok(out)
    }

    /// Overwrites the store file with the full mapping.
    pub fn persist(&self) -> Result<()> {
        let source = self.to_source()?;
        fs::write(&self.path, source).map_err(|e| SnapshotError::io(&self.path, e))?;
        debug!(path = %self.path.display(), entries = self.entries.len(), "persisted snapshot store");
        Ok(())
    }
}

type ParseFailure = (usize, String);

/// Parses store source into its entries. Errors carry a 1-based line.
fn parse_store(content: &str) -> std::result::Result<IndexMap<String, Canonical>, ParseFailure> {
    let mut entries = IndexMap::new();
    let mut lines = content.lines().enumerate();

    while let Some((idx, line)) = lines.next() {
        if line.trim().is_empty() {
            continue;
        }
        let line_no = idx + 1;
        let rest = line
            .strip_prefix(STATEMENT_PREFIX)
            .ok_or_else(|| (line_no, format!("expected `{}`", STATEMENT_PREFIX)))?;
        let (key, after) = parse_key(rest).map_err(|m| (line_no, m))?;

        // Rendered values never contain a raw newline inside a string, so the
        // statement ends on the first line whose last character is `;`.
        let mut text = after.to_string();
        while !text.trim_end().ends_with(TERMINATOR) {
            let (_, next) = lines
                .next()
                .ok_or_else(|| (line_no, format!("unterminated snapshot `{}`", key)))?;
            text.push('\n');
            text.push_str(next);
        }
        let body = text.trim_end();
        let body = &body[..body.len() - TERMINATOR.len_utf8()];
        let value = parse_value(body).map_err(|m| (line_no, m))?;
        if entries.contains_key(&key) {
            return Err((line_no, format!("duplicate snapshot key `{}`", key)));
        }
        entries.insert(key, value);
    }
    Ok(entries)
}

/// Splits `"<key>"] = <rest>` into the decoded key and `<rest>`.
fn parse_key(rest: &str) -> std::result::Result<(String, &str), String> {
    let mut stream = serde_json::Deserializer::from_str(rest).into_iter::<String>();
    let key = match stream.next() {
        Some(Ok(key)) => key,
        Some(Err(e)) => return Err(format!("invalid snapshot key: {}", e)),
        None => return Err("missing snapshot key".to_string()),
    };
    let offset = stream.byte_offset();
    let after = rest[offset..]
        .strip_prefix(ASSIGNMENT)
        .ok_or_else(|| format!("expected `{}` after key `{}`", ASSIGNMENT.trim(), key))?;
    Ok((key, after))
}

fn parse_value(body: &str) -> std::result::Result<Canonical, String> {
    if body.trim() == ABSENT_LITERAL {
        return Ok(Canonical::Absent);
    }
    serde_json::from_str::<serde_json::Value>(body)
        .map(Canonical::from)
        .map_err(|e| format!("invalid snapshot value: {}", e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn store_with(entries: Vec<(&str, Canonical)>) -> SnapshotStore {
        let mut store = SnapshotStore::empty("unused.snap");
        for (k, v) in entries {
            store.insert(k, v);
        }
        store
    }

    #[test]
    fn writes_one_statement_per_key() {
        let store = store_with(vec![
            ("a(0)", Canonical::from(json!({"x": 1}))),
            ("a(1)", Canonical::Absent),
        ]);
        assert_eq!(
            store.to_source().unwrap(),
            "snapshots[\"a(0)\"] = {\n  \"x\": 1\n};\n\nsnapshots[\"a(1)\"] = undefined;\n\n"
        );
    }

    #[test]
    fn parses_what_it_writes() {
        let store = store_with(vec![
            ("z \"quoted\" (0)", Canonical::from(json!(["semi;", {"k": "v;"}]))),
            ("b(0)", Canonical::from(json!(1.5))),
            ("c(0)", Canonical::from(json!(42))),
            ("d(0)", Canonical::Absent),
            ("e(0)", Canonical::from(json!({}))),
        ]);
        let source = store.to_source().unwrap();
        let parsed = parse_store(&source).unwrap();
        let keys: Vec<_> = parsed.keys().cloned().collect();
        assert_eq!(keys, vec!["z \"quoted\" (0)", "b(0)", "c(0)", "d(0)", "e(0)"]);
        assert_eq!(parsed.get("d(0)"), Some(&Canonical::Absent));

        let mut reparsed = SnapshotStore::empty("unused.snap");
        reparsed.entries = parsed;
        assert_eq!(reparsed.to_source().unwrap(), source);
    }

    #[test]
    fn accepts_crlf_line_endings() {
        let source = "snapshots[\"a(0)\"] = [\r\n  1\r\n];\r\n\r\n";
        let parsed = parse_store(source).unwrap();
        assert_eq!(parsed.get("a(0)"), Some(&Canonical::from(json!([1]))));
    }

    #[test]
    fn reports_line_of_bad_statement() {
        let source = "snapshots[\"a(0)\"] = 1;\n\nexports[\"b(0)\"] = 2;\n";
        let (line, message) = parse_store(source).unwrap_err();
        assert_eq!(line, 3);
        assert!(message.contains("snapshots["));
    }

    #[test]
    fn reports_unterminated_statement() {
        let (line, message) = parse_store("snapshots[\"a(0)\"] = {\n  \"x\": 1\n}\n").unwrap_err();
        assert_eq!(line, 1);
        assert!(message.contains("unterminated"));
    }

    #[test]
    fn rejects_duplicate_keys() {
        let source = "snapshots[\"a(0)\"] = 1;\n\nsnapshots[\"b(0)\"] = [\n  1\n];\n\nsnapshots[\"a(0)\"] = 2;\n";
        let (line, message) = parse_store(source).unwrap_err();
        assert_eq!(line, 7);
        assert!(message.contains("duplicate snapshot key `a(0)`"));
    }

    #[test]
    fn insert_keeps_existing_position() {
        let mut store = store_with(vec![
            ("a(0)", Canonical::Null),
            ("b(0)", Canonical::Null),
        ]);
        store.insert("a(0)", Canonical::Bool(true));
        let keys: Vec<_> = store.keys().collect();
        assert_eq!(keys, vec!["a(0)", "b(0)"]);
        assert_eq!(store.get("a(0)"), Some(&Canonical::Bool(true)));
    }
}
