use serde::Deserialize;

use crate::constants::MAX_DEPTH;
use crate::Result;

/// Options shared by a parse session.
///
/// Deserializes from a JSON config object with camelCase keys; missing keys
/// keep their defaults.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "camelCase", deny_unknown_fields)]
pub struct ParseOptions {
    /// Deepest object nesting the coordinator will descend into.
    pub max_depth: usize,
    /// When true, literals must match the target kind's JSON type exactly.
    /// When false, numeric strings and numbers convert across scalar kinds.
    pub strict: bool,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            max_depth: MAX_DEPTH,
            strict: true,
        }
    }
}

impl ParseOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    pub fn with_strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    pub fn from_json_str(input: &str) -> Result<Self> {
        Ok(serde_json::from_str(input)?)
    }
}
