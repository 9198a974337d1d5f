//! Rendering of the synthesized rules to the mutant-generation configuration
//!
//! One line per rule key:
//!
//! ```text
//! ADD(@1, @2) --> ADD$@1$@2$!SUB$@1$@2$, SUB(@1, @2); ADD$@1$@2$!SUB$@2$@1$, SUB(@2, @1);
//! ```

use std::io::Write;
use std::path::Path;

use tracing::info;

use crate::error::{MconfError, Result};
use crate::synth::{RuleGroup, RuleSet};

pub const HEADER: &str = "## Automatically generated mutant conf for MART ##";

/// Renders a [`RuleSet`] to configuration text
#[derive(Debug, Clone, Copy)]
pub struct ConfigSerializer {
    header: bool,
}

impl Default for ConfigSerializer {
    fn default() -> Self {
        Self { header: true }
    }
}

impl ConfigSerializer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Omit the leading comment block
    pub fn without_header(mut self) -> Self {
        self.header = false;
        self
    }

    /// `key --> name, expr; name, expr; ...;`
    pub fn render_group(group: &RuleGroup) -> String {
        let mut line = format!("{} -->", group.key);
        for rule in &group.rules {
            line.push_str(&format!(" {}, {};", rule.name, rule.expression()));
        }
        line
    }

    pub fn render(&self, rules: &RuleSet) -> String {
        let mut out = String::new();
        if self.header {
            out.push_str(HEADER);
            out.push_str("\n\n");
        }
        for group in rules.groups() {
            out.push_str(&Self::render_group(group));
            out.push('\n');
        }
        out
    }

    /// Write the rendered configuration, replacing `path` atomically
    pub fn write_to(&self, rules: &RuleSet, path: &Path) -> Result<()> {
        let write_error = |e: &dyn std::fmt::Display| MconfError::WriteError {
            file: path.to_path_buf(),
            error: e.to_string(),
        };

        let dir = match path.parent() {
            Some(p) if !p.as_os_str().is_empty() => p,
            _ => Path::new("."),
        };
        let mut tmp = tempfile::NamedTempFile::new_in(dir).map_err(|e| write_error(&e))?;
        tmp.write_all(self.render(rules).as_bytes())
            .map_err(|e| write_error(&e))?;
        tmp.persist(path).map_err(|e| write_error(&e.error))?;

        info!(path = %path.display(), keys = rules.groups().len(), "configuration written");
        Ok(())
    }
}
