use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One claim flattened for a key/value store; `value` is the claim's JSON.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KvEntry {
    pub key: String,
    pub value: String,
}

pub fn to_kv_entries<C: Serialize>(claims: &BTreeMap<String, C>) -> Result<Vec<KvEntry>> {
    claims
        .iter()
        .map(|(key, claim)| {
            Ok(KvEntry {
                key: key.clone(),
                value: serde_json::to_string(claim)?,
            })
        })
        .collect()
}
