//! CLI configuration from environment.

use std::env;
use std::path::PathBuf;

const DEFAULT_AIRPORTS: &str = "data/airports.csv";

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub airports_path: PathBuf,
    pub rules_path: Option<PathBuf>,
}

impl Config {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        Self {
            airports_path: lookup("AVERT_AIRPORTS")
                .filter(|s| !s.trim().is_empty())
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_AIRPORTS)),
            rules_path: lookup("AVERT_RULES")
                .filter(|s| !s.trim().is_empty())
                .map(PathBuf::from),
        }
    }

    /// Command-line paths win over the environment.
    pub fn with_overrides(mut self, airports: Option<PathBuf>, rules: Option<PathBuf>) -> Self {
        if let Some(path) = airports {
            self.airports_path = path;
        }
        if rules.is_some() {
            self.rules_path = rules;
        }
        self
    }
}
