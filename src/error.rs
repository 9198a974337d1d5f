//! Error types for taxonomy construction, rule decoding and classification

use std::path::PathBuf;
use thiserror::Error;

/// Structural defects in the operator taxonomy.
///
/// Any of these aborts the whole run: a partially valid configuration is
/// never rendered.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TaxonomyError {
    /// Operator placed under two class paths
    #[error("Operator '{op}' registered under two class paths: '{first}' and '{second}'")]
    DuplicateClassPath {
        op: String,
        first: String,
        second: String,
    },

    /// Operator has a format but no class path
    #[error("Operator '{op}' has no class path")]
    MissingClassPath { op: String },

    /// Operator registered twice with an operand format
    #[error("Operator '{op}' has more than one operand format")]
    DuplicateFormat { op: String },

    /// Operator used in the rule table without a format
    #[error("Operator '{op}' is used in the rule table but has no operand format")]
    UnknownOperator { op: String },

    /// Replace-only operator used as matcher
    #[error("Replace-only operator '{op}' used as a matcher")]
    ReplaceOnlyMatcher { op: String },

    /// Match-only operator used as replacer
    #[error("Match-only operator '{replacer}' listed as replacer of '{matcher}'")]
    MatchOnlyReplacer { matcher: String, replacer: String },

    /// A rule was emitted for a pair the rule table does not allow
    #[error("Operator '{replacer}' may not replace '{matcher}'")]
    ForbiddenPair { matcher: String, replacer: String },

    /// Nullary matcher without a dedicated expansion
    #[error("No expansion defined for operand-less matcher '{op}'")]
    UnhandledNullaryMatcher { op: String },

    /// Nullary matcher paired with a replacer its expansion cannot bind
    #[error("Matcher '{matcher}' cannot be replaced by '{replacer}': {reason}")]
    InvalidExpansion {
        matcher: String,
        replacer: String,
        reason: String,
    },

    /// Replacer takes more operands than the synthesizer supports
    #[error("Replacer '{op}' takes {arity} operands (at most 2 supported)")]
    InvalidReplacerArity { op: String, arity: usize },

    /// Two distinct rules encode to the same name
    #[error("Rule name '{name}' produced by both '{first}' and '{second}'")]
    RuleNameCollision {
        name: String,
        first: String,
        second: String,
    },

    /// Settings literal that would break rule-name encoding
    #[error("Invalid literal(s) in settings: {}", literals.join(", "))]
    InvalidLiteral { literals: Vec<String> },
}

/// Failures decoding or classifying a rule name
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    /// Rule name without exactly one match/replace separator
    #[error("Malformed rule name '{name}': expected '<matcher>!<replacer>'")]
    MalformedName { name: String },

    /// Leading token is not an operator
    #[error("Unknown operator '{token}' in rule name '{name}'")]
    UnknownOperator { name: String, token: String },

    /// Granularity outside {-1, 1..=5}
    #[error("Invalid classification level {level} (expected -1 or 1..=5)")]
    InvalidLevel { level: i32 },
}

/// Caller asked for something that is deliberately not implemented
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UnsupportedError {
    /// Selective-mutation kind without defined semantics
    #[error("Selective mutation kind '{kind}' is not supported")]
    SelectiveKind { kind: String },
}

/// Top-level error for library entry points that touch the file system
#[derive(Debug, Error)]
pub enum MconfError {
    #[error(transparent)]
    Taxonomy(#[from] TaxonomyError),

    #[error(transparent)]
    Decode(#[from] DecodeError),

    #[error(transparent)]
    Unsupported(#[from] UnsupportedError),

    /// Configuration error
    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    /// Failed to read an input file
    #[error("Failed to read file '{}': {error}", file.display())]
    FileReadError { file: PathBuf, error: String },

    /// Failed to parse a mutant descriptor
    #[error("Failed to parse descriptor '{}': {error}", file.display())]
    DescriptorError { file: PathBuf, error: String },

    /// Failed to write the generated configuration
    #[error("Failed to write '{}': {error}", file.display())]
    WriteError { file: PathBuf, error: String },
}

/// Result type for fallible library operations
pub type Result<T> = std::result::Result<T, MconfError>;
