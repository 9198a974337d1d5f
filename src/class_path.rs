//! Hierarchical operator classes
//!
//! A class path runs from the coarse mutation category down to the operator
//! mnemonic, e.g. `EXPRESSION-MUTATION/SCALAR/BINARY/AO/ADD`.

use std::fmt;

pub const SEPARATOR: char = '/';

/// Ordered, non-empty list of class segments
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ClassPath {
    segments: Vec<String>,
}

impl ClassPath {
    /// Build a path from its segments, root first.
    ///
    /// Returns `None` for an empty list or an empty segment.
    pub fn new<S: Into<String>>(segments: impl IntoIterator<Item = S>) -> Option<Self> {
        let segments: Vec<String> = segments.into_iter().map(Into::into).collect();
        if segments.is_empty() || segments.iter().any(|s| s.is_empty()) {
            return None;
        }
        Some(Self { segments })
    }

    /// Parse a `/`-joined path
    pub fn parse(text: &str) -> Option<Self> {
        Self::new(text.split(SEPARATOR))
    }

    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    pub fn depth(&self) -> usize {
        self.segments.len()
    }

    /// Last segment (the operator mnemonic for taxonomy paths)
    pub fn leaf(&self) -> &str {
        self.segments.last().map(String::as_str).unwrap_or_default()
    }

    pub fn segment(&self, index: usize) -> Option<&str> {
        self.segments.get(index).map(String::as_str)
    }

    /// Drop `count` trailing segments, always keeping the root.
    pub fn truncated(&self, count: usize) -> Self {
        let keep = self.segments.len().saturating_sub(count).max(1);
        Self {
            segments: self.segments[..keep].to_vec(),
        }
    }

    /// A copy with one more trailing segment
    pub fn child(&self, segment: impl Into<String>) -> Self {
        let mut segments = self.segments.clone();
        segments.push(segment.into());
        Self { segments }
    }

    /// This path followed by each parent up to the root
    pub fn ancestors(&self) -> impl Iterator<Item = ClassPath> + '_ {
        (1..=self.segments.len()).rev().map(move |keep| Self {
            segments: self.segments[..keep].to_vec(),
        })
    }

    pub fn starts_with(&self, prefix: &ClassPath) -> bool {
        self.segments.starts_with(&prefix.segments)
    }
}

impl fmt::Display for ClassPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, segment) in self.segments.iter().enumerate() {
            if i > 0 {
                write!(f, "{SEPARATOR}")?;
            }
            f.write_str(segment)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn path(text: &str) -> ClassPath {
        ClassPath::parse(text).unwrap()
    }

    #[test]
    fn test_parse_and_display() {
        let p = path("EXPRESSION-MUTATION/SCALAR/BINARY/AO/ADD");
        assert_eq!(p.depth(), 5);
        assert_eq!(p.leaf(), "ADD");
        assert_eq!(p.to_string(), "EXPRESSION-MUTATION/SCALAR/BINARY/AO/ADD");
    }

    #[test]
    fn test_rejects_empty_segments() {
        assert!(ClassPath::parse("").is_none());
        assert!(ClassPath::parse("A//B").is_none());
        assert!(ClassPath::new(Vec::<String>::new()).is_none());
    }

    #[test]
    fn test_truncate_keeps_root() {
        let p = path("STATEMENT-MUTATION/STATEMENT/DELETION/DELSTMT");
        assert_eq!(p.truncated(1).to_string(), "STATEMENT-MUTATION/STATEMENT/DELETION");
        assert_eq!(p.truncated(2).to_string(), "STATEMENT-MUTATION/STATEMENT");
        assert_eq!(p.truncated(10).to_string(), "STATEMENT-MUTATION");
        assert!(p.starts_with(&p.truncated(2)));
    }

    #[test]
    fn test_ancestors_walk_to_root() {
        let p = path("A/B/C");
        let all: Vec<String> = p.ancestors().map(|a| a.to_string()).collect();
        assert_eq!(all, vec!["A/B/C", "A/B", "A"]);
    }

    #[test]
    fn test_child() {
        assert_eq!(path("A/B").child("SWAPPED").to_string(), "A/B/SWAPPED");
    }
}
