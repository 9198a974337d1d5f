//! Mutation operator configuration for MART
//!
//! This library holds the taxonomy of mutation operators understood by the
//! MART mutant-generation engine, synthesizes every legal matcher/replacer
//! rule from it, renders those rules as a mutant configuration, and maps rule
//! names back onto operator classes to label generated mutants.
//!
//! # Example Settings
//!
//! ```yaml
//! version: "1.0"
//! settings:
//!   scalar_constants: ["-1", "1"]
//!   shuffle_counters: ["2"]
//!   case_remove_counters: ["1"]
//!   callee_names: ["dirname", "basename"]
//! ```
//!
//! # Usage
//!
//! ```no_run
//! use mutation_config_rust::{ConfigSerializer, RuleSynthesizer, Taxonomy};
//! use std::path::Path;
//!
//! let taxonomy = Taxonomy::standard().unwrap();
//! let rules = RuleSynthesizer::new(&taxonomy).synthesize().unwrap();
//! ConfigSerializer::new()
//!     .write_to(&rules, Path::new("mconf.txt"))
//!     .unwrap();
//! ```

pub mod class_path;
pub mod classify;
pub mod config;
pub mod descriptor;
pub mod error;
pub mod operand;
pub mod report;
pub mod resolver;
pub mod serialize;
pub mod synth;
pub mod taxonomy;

// Re-export main types at crate root
pub use class_path::ClassPath;
pub use classify::{decode_rule_name, DecodedRule, Granularity, OperatorClassifier, SelectiveKind};
pub use config::{Config, Settings};
pub use error::{DecodeError, MconfError, Result, TaxonomyError, UnsupportedError};
pub use operand::{Operand, OperandKind, OperandTypeSet};
pub use report::{ClassificationReport, GenerationReport};
pub use serialize::ConfigSerializer;
pub use synth::{Rule, RuleGroup, RuleKey, RuleName, RuleSet, RuleSynthesizer};
pub use taxonomy::{Op, Taxonomy, TaxonomyBuilder};
