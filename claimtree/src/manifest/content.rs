use crate::bytes::{Bytes32, HexString, hex_list_to_bytes32, hex_to_bytes32};
use crate::error::{ClaimTreeError, Result};
use crate::leaf::{ContentEntry, LeafEncode};
use crate::manifest::kv::{KvEntry, to_kv_entries};
use crate::manifest::{build_tree, hex_proofs, leaves_by_index};
use crate::options::{IndexPolicy, ManifestOptions};
use crate::tree::MerkleTree;
use crate::verify::verify;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};
use tracing::{debug, info};

/// One raw content claim: an identifier such as a URN, optionally bound to
/// a content hash.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentItem {
    #[serde(alias = "urn")]
    pub identifier: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content_hash: Option<String>,
}

impl ContentItem {
    pub fn new<S: Into<String>>(identifier: S) -> Self {
        Self {
            identifier: identifier.into(),
            content_hash: None,
        }
    }

    pub fn with_content_hash<S: Into<String>>(mut self, content_hash: S) -> Self {
        self.content_hash = Some(content_hash.into());
        self
    }
}

impl From<&str> for ContentItem {
    fn from(identifier: &str) -> Self {
        Self::new(identifier)
    }
}

impl From<String> for ContentItem {
    fn from(identifier: String) -> Self {
        Self::new(identifier)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentClaim {
    pub index: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content_hash: Option<String>,
    pub proof: Vec<HexString>,
}

impl ContentClaim {
    pub fn entry(&self, identifier: &str) -> ContentEntry {
        ContentEntry {
            index: self.index,
            identifier: identifier.to_string(),
            content_hash: self.content_hash.clone(),
        }
    }

    pub fn verify(&self, identifier: &str, root: &Bytes32) -> Result<bool> {
        let proof = hex_list_to_bytes32(&self.proof)?;
        Ok(verify(&self.entry(identifier), &proof, root))
    }
}

/// Identifier/content-hash manifest. `total` is the number of claims.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentManifest {
    pub merkle_root: HexString,
    pub total: usize,
    pub claims: BTreeMap<String, ContentClaim>,
}

impl ContentManifest {
    pub fn build<I, T>(items: I, options: &ManifestOptions) -> Result<Self>
    where
        I: IntoIterator<Item = T>,
        T: Into<ContentItem>,
    {
        let mut items = normalize(items)?;
        if items.is_empty() {
            return Err(ClaimTreeError::EmptyInputSet);
        }
        if options.index_policy == IndexPolicy::Sorted {
            items.sort_unstable_by(|a, b| a.identifier.cmp(&b.identifier));
        }
        debug!(
            entries = items.len(),
            policy = ?options.index_policy,
            "building content manifest"
        );

        let entries: Vec<ContentEntry> = items
            .into_iter()
            .enumerate()
            .map(|(index, item)| ContentEntry {
                index,
                identifier: item.identifier,
                content_hash: item.content_hash,
            })
            .collect();

        let tree = build_tree(entries.iter().map(LeafEncode::leaf_hash).collect())?;
        let proofs = hex_proofs(&tree)?;

        let claims: BTreeMap<String, ContentClaim> = entries
            .into_iter()
            .zip(proofs)
            .map(|(entry, proof)| {
                let claim = ContentClaim {
                    index: entry.index,
                    content_hash: entry.content_hash,
                    proof,
                };
                (entry.identifier, claim)
            })
            .collect();

        let manifest = Self {
            merkle_root: tree.hex_root(),
            total: claims.len(),
            claims,
        };
        info!(
            root = %manifest.merkle_root,
            total = manifest.total,
            depth = tree.depth(),
            "built content manifest"
        );
        Ok(manifest)
    }

    pub fn root(&self) -> Result<Bytes32> {
        hex_to_bytes32(&self.merkle_root)
    }

    pub fn len(&self) -> usize {
        self.claims.len()
    }

    pub fn is_empty(&self) -> bool {
        self.claims.is_empty()
    }

    pub fn claim(&self, identifier: &str) -> Option<&ContentClaim> {
        self.claims.get(identifier)
    }

    pub fn entries(&self) -> Vec<ContentEntry> {
        let mut entries: Vec<ContentEntry> = self
            .claims
            .iter()
            .map(|(identifier, claim)| claim.entry(identifier))
            .collect();
        entries.sort_by_key(|entry| entry.index);
        entries
    }

    pub fn rebuild_tree(&self) -> Result<MerkleTree> {
        let indexed = self
            .claims
            .iter()
            .map(|(identifier, claim)| (claim.index, claim.entry(identifier).leaf_hash()));
        build_tree(leaves_by_index(self.claims.len(), indexed)?)
    }

    pub fn kv_entries(&self) -> Result<Vec<KvEntry>> {
        to_kv_entries(&self.claims)
    }

    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

fn normalize<I, T>(items: I) -> Result<Vec<ContentItem>>
where
    I: IntoIterator<Item = T>,
    T: Into<ContentItem>,
{
    let mut seen = HashSet::new();
    let mut out = Vec::new();
    for item in items {
        let item: ContentItem = item.into();
        if item.identifier.is_empty() {
            return Err(ClaimTreeError::InvalidIdentifier(
                "identifier must not be empty".to_string(),
            ));
        }
        if item.content_hash.as_deref() == Some("") {
            return Err(ClaimTreeError::InvalidIdentifier(format!(
                "{}: empty content hash",
                item.identifier
            )));
        }
        if !seen.insert(item.identifier.clone()) {
            return Err(ClaimTreeError::DuplicateEntry(item.identifier));
        }
        out.push(item);
    }
    Ok(out)
}

/// Reads a JSON array whose elements are identifier strings or
/// `{ "urn" | "identifier": .., "contentHash": .. }` objects.
pub fn content_items_from_json(value: &serde_json::Value) -> Result<Vec<ContentItem>> {
    let items = value.as_array().ok_or_else(|| {
        ClaimTreeError::MalformedInput("expected an array of content items".to_string())
    })?;

    items
        .iter()
        .enumerate()
        .map(|(position, item)| match item {
            serde_json::Value::String(identifier) => Ok(ContentItem::new(identifier.as_str())),
            serde_json::Value::Object(_) => {
                serde_json::from_value(item.clone()).map_err(ClaimTreeError::from)
            }
            other => Err(ClaimTreeError::MalformedInput(format!(
                "item {position}: unsupported value {other}"
            ))),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const HASH_V: &str = "QmVxw4Nvg4FMTcCwa7doiNZpshLJbCq8dokzgRTPGtqUy8";
    const HASH_T: &str = "QmTZzpvVdNbXXMrakkZvGnapuwJRAos9e4VnfCBcNva78N";

    #[test]
    fn test_two_entry_root_vector() {
        let manifest = ContentManifest::build([HASH_V, HASH_T], &ManifestOptions::default()).unwrap();

        assert_eq!(manifest.total, 2);
        assert_eq!(manifest.claims[HASH_T].index, 0);
        assert_eq!(manifest.claims[HASH_V].index, 1);
        assert_eq!(
            manifest.merkle_root,
            "0xd83b753feddc75f9bd39dfc16f85641f026a97e476f791c13e248e512200defa"
        );
        assert_eq!(
            manifest.claims[HASH_V].proof,
            vec!["0x197cb96484c68c6120e3cdd05d4a1083950f27325c4ad3bd16175645b396e71a".to_string()]
        );
    }

    #[test]
    fn test_round_trip_and_index_binding() {
        let items: Vec<ContentItem> = (0..7)
            .map(|i| ContentItem::new(format!("urn:item:{i}")).with_content_hash(format!("Qm{i}")))
            .collect();
        let manifest = ContentManifest::build(items, &ManifestOptions::default()).unwrap();
        let root = manifest.root().unwrap();

        for (identifier, claim) in &manifest.claims {
            assert!(claim.verify(identifier, &root).unwrap());

            let mut shifted = claim.clone();
            shifted.index = (claim.index + 1) % manifest.total;
            assert!(!shifted.verify(identifier, &root).unwrap());
        }
    }

    #[test]
    fn test_claim_for_other_identifier_fails() {
        let manifest = ContentManifest::build([HASH_V, HASH_T], &ManifestOptions::default()).unwrap();
        let root = manifest.root().unwrap();
        let claim = manifest.claim(HASH_T).unwrap();
        assert!(!claim.verify(HASH_V, &root).unwrap());
    }

    #[test]
    fn test_sorted_policy_ignores_input_order() {
        let a = ContentManifest::build(["urn:c", "urn:a", "urn:b"], &ManifestOptions::default()).unwrap();
        let b = ContentManifest::build(["urn:b", "urn:c", "urn:a"], &ManifestOptions::default()).unwrap();
        assert_eq!(a, b);
        assert_eq!(a.claims["urn:a"].index, 0);
    }

    #[test]
    fn test_input_order_policy() {
        let options = ManifestOptions::new().with_index_policy(IndexPolicy::InputOrder);
        let manifest = ContentManifest::build(["urn:c", "urn:a", "urn:b"], &options).unwrap();
        assert_eq!(manifest.claims["urn:c"].index, 0);
        assert_eq!(manifest.claims["urn:b"].index, 2);

        let root = manifest.root().unwrap();
        for (identifier, claim) in &manifest.claims {
            assert!(claim.verify(identifier, &root).unwrap());
        }
    }

    #[test]
    fn test_rejects_duplicates_and_empty() {
        let result = ContentManifest::build(["urn:a", "urn:b", "urn:a"], &ManifestOptions::default());
        assert!(matches!(result, Err(ClaimTreeError::DuplicateEntry(key)) if key == "urn:a"));

        let result = ContentManifest::build(["urn:a", ""], &ManifestOptions::default());
        assert!(matches!(result, Err(ClaimTreeError::InvalidIdentifier(_))));

        let items = vec![ContentItem::new("urn:a").with_content_hash("")];
        let result = ContentManifest::build(items, &ManifestOptions::default());
        assert!(matches!(result, Err(ClaimTreeError::InvalidIdentifier(msg)) if msg.contains("urn:a")));

        let none: Vec<ContentItem> = Vec::new();
        let result = ContentManifest::build(none, &ManifestOptions::default());
        assert!(matches!(result, Err(ClaimTreeError::EmptyInputSet)));
    }

    #[test]
    fn test_rebuild_tree() {
        let manifest = ContentManifest::build(["urn:a", "urn:b", "urn:c"], &ManifestOptions::default()).unwrap();
        let tree = manifest.rebuild_tree().unwrap();
        assert_eq!(tree.hex_root(), manifest.merkle_root);
        assert_eq!(manifest.entries()[2].identifier, "urn:c");
    }

    #[test]
    fn test_json_shape() {
        let items = vec![
            ContentItem::new("urn:a").with_content_hash("QmA"),
            ContentItem::new("urn:b"),
        ];
        let manifest = ContentManifest::build(items, &ManifestOptions::default()).unwrap();
        let value = serde_json::to_value(&manifest).unwrap();

        assert_eq!(value["total"], json!(2));
        assert_eq!(value["claims"]["urn:a"]["contentHash"], json!("QmA"));
        assert!(value["claims"]["urn:b"].get("contentHash").is_none());

        let text = manifest.to_json_pretty().unwrap();
        assert_eq!(ContentManifest::from_json(&text).unwrap(), manifest);
    }

    #[test]
    fn test_items_from_json() {
        let value = json!([
            "urn:plain",
            { "urn": "urn:with-hash", "contentHash": "QmX" },
            { "identifier": "urn:named" }
        ]);
        let items = content_items_from_json(&value).unwrap();
        assert_eq!(items[0], ContentItem::new("urn:plain"));
        assert_eq!(items[1], ContentItem::new("urn:with-hash").with_content_hash("QmX"));
        assert_eq!(items[2].content_hash, None);

        assert!(matches!(
            content_items_from_json(&json!([1])),
            Err(ClaimTreeError::MalformedInput(_))
        ));
        assert!(matches!(
            content_items_from_json(&json!({})),
            Err(ClaimTreeError::MalformedInput(_))
        ));
    }
}
