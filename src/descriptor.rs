//! Mutant descriptors produced by the mutant-generation engine
//!
//! `mutantsInfos.json` maps each mutant id to a record whose `Type` field
//! holds the rule name that produced it. An optional duplicates file lists,
//! for each kept mutant, the ids found equivalent to it.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;

use tracing::warn;

use crate::classify::{Granularity, OperatorClassifier};
use crate::error::{DecodeError, MconfError, Result};

/// One mutant record; fields other than `Type` are kept as-is
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MutantInfo {
    #[serde(rename = "Type")]
    pub mutant_type: String,
    #[serde(rename = "FuncName", default, skip_serializing_if = "Option::is_none")]
    pub func_name: Option<String>,
    #[serde(rename = "SrcLoc", default, skip_serializing_if = "Option::is_none")]
    pub src_loc: Option<String>,
    #[serde(flatten)]
    pub extra: BTreeMap<String, serde_json::Value>,
}

/// Mutant id to record
pub type MutantInfos = BTreeMap<String, MutantInfo>;

/// Kept mutant id to the ids of its duplicates
pub type Duplicates = BTreeMap<String, Vec<String>>;

fn load_json<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T> {
    let content = std::fs::read_to_string(path).map_err(|e| MconfError::FileReadError {
        file: path.to_path_buf(),
        error: e.to_string(),
    })?;
    serde_json::from_str(&content).map_err(|e| MconfError::DescriptorError {
        file: path.to_path_buf(),
        error: e.to_string(),
    })
}

pub fn load_mutant_infos(path: &Path) -> Result<MutantInfos> {
    load_json(path)
}

pub fn load_duplicates(path: &Path) -> Result<Duplicates> {
    load_json(path)
}

/// Every mutant id not listed as someone's duplicate
pub fn candidate_mutants(infos: &MutantInfos, duplicates: &Duplicates) -> BTreeSet<String> {
    let dropped: BTreeSet<&String> = duplicates.values().flatten().collect();
    infos
        .keys()
        .filter(|id| !dropped.contains(id))
        .cloned()
        .collect()
}

/// Classification of one mutant
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MutantClass {
    pub id: String,
    pub rule: String,
    pub class: String,
}

/// Classify the given mutants.
///
/// Ids missing from `infos` are skipped with a warning; a record whose
/// `Type` cannot be decoded is an error.
pub fn classify_mutants<'a>(
    classifier: &OperatorClassifier<'_>,
    infos: &MutantInfos,
    ids: impl IntoIterator<Item = &'a String>,
    granularity: Granularity,
) -> std::result::Result<Vec<MutantClass>, DecodeError> {
    let mut classes = Vec::new();
    for id in ids {
        let Some(info) = infos.get(id) else {
            warn!(id = %id, "mutant id not in descriptor");
            continue;
        };
        classes.push(MutantClass {
            id: id.clone(),
            rule: info.mutant_type.clone(),
            class: classifier.class_of(&info.mutant_type, granularity)?,
        });
    }
    Ok(classes)
}

/// Mutant count per class
pub fn histogram(classes: &[MutantClass]) -> BTreeMap<&str, usize> {
    let mut counts = BTreeMap::new();
    for c in classes {
        *counts.entry(c.class.as_str()).or_insert(0) += 1;
    }
    counts
}
