use std::{fs, path::Path};

use serde::{Deserialize, Serialize};

use crate::{Result, ScorerErr, candidates::Candidate};

/// An input together with every candidate proposed for it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Example {
    #[serde(default)]
    pub candidates: Vec<Candidate>,
}

/// The examples a `Learner` iterates over.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Dataset {
    examples: Vec<Example>,
}

impl Dataset {
    pub fn new(examples: Vec<Example>) -> Self {
        Self { examples }
    }

    /// Parses a JSON array of examples.
    pub fn from_json_str(s: &str) -> Result<Self> {
        serde_json::from_str(s).map_err(|e| ScorerErr::Dataset(e.to_string()))
    }

    /// Reads and parses a JSON array of examples.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let raw = fs::read_to_string(path)?;
        Self::from_json_str(&raw)
    }

    pub fn len(&self) -> usize {
        self.examples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.examples.is_empty()
    }

    pub fn examples(&self) -> &[Example] {
        &self.examples
    }
}
