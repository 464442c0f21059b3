//! Comparison of stored and fresh canonical values.
//!
//! Both values are rendered to their stable text form and diffed line by
//! line. Any added or removed line is a divergence.

use std::io::Write;

use difference::{Changeset, Difference};
use termcolor::{Buffer, Color, ColorSpec, WriteColor};

use crate::canonical::Canonical;
use crate::errors::Result;

const REMOVED_PREFIX: &str = "  - ";
const ADDED_PREFIX: &str = "  + ";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Change {
    Added,
    Removed,
    Unchanged,
}

/// One run of consecutive lines sharing a [`Change`] tag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Segment {
    pub change: Change,
    pub text: String,
}

/// Ordered diff segments between a stored and a fresh rendering.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DivergenceReport {
    pub segments: Vec<Segment>,
}

/// Outcome of [`compare`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Comparison {
    pub matches: bool,
    pub report: DivergenceReport,
}

/// Diffs the renderings of `stored` and `fresh`.
///
/// ```rust
/// use serde_json::json;
/// use snapkeep::{compare, Canonical};
/// let stored = Canonical::from(json!({"a": 1, "b": 2}));
/// let same = compare(&stored, &stored.clone()).unwrap();
/// assert!(same.matches);
/// let changed = compare(&stored, &Canonical::from(json!({"a": 1, "b": 3}))).unwrap();
/// assert!(!changed.matches);
/// ```
pub fn compare(stored: &Canonical, fresh: &Canonical) -> Result<Comparison> {
    let before = stored.render()?;
    let after = fresh.render()?;
    Ok(compare_text(&before, &after))
}

/// Line diff of two already-rendered values.
pub fn compare_text(before: &str, after: &str) -> Comparison {
    let changeset = Changeset::new(before, after, "\n");
    let segments: Vec<Segment> = changeset
        .diffs
        .into_iter()
        .map(|diff| match diff {
            Difference::Same(text) => Segment {
                change: Change::Unchanged,
                text,
            },
            Difference::Add(text) => Segment {
                change: Change::Added,
                text,
            },
            Difference::Rem(text) => Segment {
                change: Change::Removed,
                text,
            },
        })
        .collect();
    let matches = segments.iter().all(|s| s.change == Change::Unchanged);
    Comparison {
        matches,
        report: DivergenceReport { segments },
    }
}

impl DivergenceReport {
    pub fn is_empty(&self) -> bool {
        self.segments.iter().all(|s| s.change == Change::Unchanged)
    }

    pub fn added(&self) -> impl Iterator<Item = &Segment> {
        self.segments.iter().filter(|s| s.change == Change::Added)
    }

    pub fn removed(&self) -> impl Iterator<Item = &Segment> {
        self.segments.iter().filter(|s| s.change == Change::Removed)
    }

    /// Human-readable report: a leading blank line, then every removed line
    /// prefixed `- ` and every added line prefixed `+ `. Unchanged lines are
    /// left out. With `use_colors`, removals are red and additions green.
    pub fn format(&self, use_colors: bool) -> String {
        let mut buf = if use_colors {
            Buffer::ansi()
        } else {
            Buffer::no_color()
        };
        let _ = write!(buf, "\n\n");
        for segment in &self.segments {
            let (prefix, color) = match segment.change {
                Change::Removed => (REMOVED_PREFIX, Color::Red),
                Change::Added => (ADDED_PREFIX, Color::Green),
                Change::Unchanged => continue,
            };
            let _ = buf.set_color(ColorSpec::new().set_fg(Some(color)));
            let _ = buf.write_all(prefix_lines(prefix, &segment.text).as_bytes());
            let _ = buf.reset();
        }
        String::from_utf8_lossy(buf.as_slice()).into_owned()
    }
}

/// Trims blank edges, removes the common indentation, and prefixes every
/// remaining line.
fn prefix_lines(prefix: &str, text: &str) -> String {
    let lines: Vec<&str> = text.trim_matches('\n').lines().collect();
    let indent = lines
        .iter()
        .filter(|l| !l.trim().is_empty())
        .map(|l| l.len() - l.trim_start().len())
        .min()
        .unwrap_or(0);
    let mut out = String::new();
    for line in lines {
        let body = line.get(indent..).unwrap_or_else(|| line.trim_start());
        out.push_str(prefix);
        out.push_str(body.trim_end());
        out.push('\n');
    }
    out
}
