//! Settings file parsing for configuration generation

use serde::Deserialize;
use std::path::Path;

use crate::error::{MconfError, TaxonomyError};

/// Characters that structure rule keys and rule names
pub const RESERVED_CHARS: &[char] = &[',', '(', ')', '$', '!'];
/// Operand kind tokens, which a literal may not shadow
pub const RESERVED_TOKENS: &[&str] = &["@", "V", "C", "P", "A"];

/// Top-level configuration structure
#[derive(Debug, Deserialize, Default)]
pub struct Config {
    #[serde(default = "default_version")]
    pub version: String,
    #[serde(default)]
    pub settings: Settings,
}

fn default_version() -> String {
    "1.0".to_string()
}

/// Literal parameters of the replace-only operators
#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
pub struct Settings {
    /// Offsets for `C --> C + k`
    #[serde(default = "default_scalar_constants")]
    pub scalar_constants: Vec<String>,
    /// Counters for argument and case-destination shuffling
    #[serde(default = "default_shuffle_counters")]
    pub shuffle_counters: Vec<String>,
    /// Counters for case removal
    #[serde(default = "default_case_remove_counters")]
    pub case_remove_counters: Vec<String>,
    /// Candidate callee names for callee substitution
    #[serde(default = "default_callee_names")]
    pub callee_names: Vec<String>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            scalar_constants: default_scalar_constants(),
            shuffle_counters: default_shuffle_counters(),
            case_remove_counters: default_case_remove_counters(),
            callee_names: default_callee_names(),
        }
    }
}

fn default_scalar_constants() -> Vec<String> {
    vec!["-1".to_string(), "1".to_string()]
}

fn default_shuffle_counters() -> Vec<String> {
    vec!["2".to_string()]
}

fn default_case_remove_counters() -> Vec<String> {
    vec!["1".to_string()]
}

fn default_callee_names() -> Vec<String> {
    vec!["dirname".to_string(), "basename".to_string()]
}

impl Settings {
    /// Check that every literal can be embedded in a rule name
    pub fn validate(&self) -> Result<(), TaxonomyError> {
        let invalid: Vec<String> = self
            .scalar_constants
            .iter()
            .chain(&self.shuffle_counters)
            .chain(&self.case_remove_counters)
            .chain(&self.callee_names)
            .filter(|lit| !is_valid_literal(lit))
            .cloned()
            .collect();

        if invalid.is_empty() {
            Ok(())
        } else {
            Err(TaxonomyError::InvalidLiteral { literals: invalid })
        }
    }
}

fn is_valid_literal(literal: &str) -> bool {
    !literal.is_empty()
        && !RESERVED_TOKENS.contains(&literal)
        && !literal
            .chars()
            .any(|c| c.is_whitespace() || RESERVED_CHARS.contains(&c))
}

impl Config {
    /// Load configuration from a YAML file
    pub fn load(path: &Path) -> Result<Self, MconfError> {
        let content = std::fs::read_to_string(path).map_err(|e| MconfError::ConfigError {
            message: format!("Failed to read config file '{}': {}", path.display(), e),
        })?;

        let config: Config =
            serde_yaml::from_str(&content).map_err(|e| MconfError::ConfigError {
                message: format!("Failed to parse config file '{}': {}", path.display(), e),
            })?;

        config.settings.validate()?;
        Ok(config)
    }

    /// Documented example settings file
    pub fn example() -> &'static str {
        r#"# Example settings for mutation configuration generation
version: "1.0"

settings:
  # C --> C + k for each k
  scalar_constants: ["-1", "1"]

  # SHUFFLEARGS / SHUFFLECASESDESTS counters
  shuffle_counters: ["2"]

  # REMOVECASES counters
  case_remove_counters: ["1"]

  # NEWCALLEE replaces each name by every other one
  callee_names: ["dirname", "basename"]
"#
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_parse_config() {
        let yaml = r#"
version: "1.0"
settings:
  scalar_constants: ["-2", "2"]
  callee_names: [strlen, strnlen, wcslen]
"#;

        let config: Config = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.version, "1.0");
        assert_eq!(config.settings.scalar_constants, vec!["-2", "2"]);
        assert_eq!(config.settings.callee_names.len(), 3);
        assert_eq!(config.settings.shuffle_counters, vec!["2"]);
    }

    #[test]
    fn test_defaults() {
        let config: Config = serde_yaml::from_str("version: \"1.0\"\n").unwrap();
        assert_eq!(config.settings, Settings::default());
        assert_eq!(config.settings.case_remove_counters, vec!["1"]);
    }

    #[test]
    fn test_example_parses() {
        let config: Config = serde_yaml::from_str(Config::example()).unwrap();
        assert_eq!(config.settings, Settings::default());
    }

    #[test]
    fn test_invalid_literals_reported_together() {
        let settings = Settings {
            callee_names: vec!["a b".to_string(), "ok".to_string(), "f(x)".to_string(), "V".to_string()],
            shuffle_counters: vec![String::new()],
            ..Settings::default()
        };
        match settings.validate() {
            Err(TaxonomyError::InvalidLiteral { literals }) => {
                assert_eq!(literals, vec!["", "a b", "f(x)", "V"]);
            }
            other => panic!("unexpected: {:?}", other),
        }
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "settings:\n  shuffle_counters: [\"2\", \"3\"]").unwrap();

        let config = Config::load(file.path()).unwrap();
        assert_eq!(config.version, "1.0");
        assert_eq!(config.settings.shuffle_counters, vec!["2", "3"]);
    }

    #[test]
    fn test_load_rejects_reserved_chars() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "settings:\n  callee_names: [\"a!b\", \"c\"]").unwrap();

        let result = Config::load(file.path());
        assert!(matches!(
            result,
            Err(MconfError::Taxonomy(TaxonomyError::InvalidLiteral { .. }))
        ));
    }
}
