use serde::{Deserialize, Serialize};

/// How manifest builders assign leaf indices.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum IndexPolicy {
    /// Balance entries ordered by account bytes, content entries by
    /// identifier bytes. The root then depends only on the entry set.
    #[default]
    Sorted,
    /// Position in the caller's input sequence.
    InputOrder,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ManifestOptions {
    pub index_policy: IndexPolicy,
}

impl ManifestOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_index_policy(mut self, policy: IndexPolicy) -> Self {
        self.index_policy = policy;
        self
    }
}
