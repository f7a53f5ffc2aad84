use crate::bytes::{Bytes32, HexString, hex_list_to_bytes32, hex_to_bytes32};
use crate::error::{ClaimTreeError, Result, invalid_amount};
use crate::leaf::{BalanceEntry, LeafEncode, parse_account, parse_amount};
use crate::manifest::kv::{KvEntry, to_kv_entries};
use crate::manifest::{build_tree, hex_proofs, leaves_by_index};
use crate::options::{IndexPolicy, ManifestOptions};
use crate::tree::MerkleTree;
use crate::verify::verify;
use alloy_primitives::U256;
use num_bigint::BigUint;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};
use tracing::{debug, info};

/// Raw `(account, amount)` pairs in caller order.
pub type BalanceInput = Vec<(String, String)>;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BalanceClaim {
    pub index: usize,
    pub amount: HexString,
    pub proof: Vec<HexString>,
}

impl BalanceClaim {
    /// Re-derives the entry this claim was built from.
    pub fn entry(&self, account: &str) -> Result<BalanceEntry> {
        BalanceEntry::parse(account, &self.amount)
    }

    pub fn amount_value(&self, account: &str) -> Result<U256> {
        parse_amount(account, &self.amount)
    }

    pub fn verify(&self, account: &str, root: &Bytes32) -> Result<bool> {
        let entry = self.entry(account)?;
        let proof = hex_list_to_bytes32(&self.proof)?;
        Ok(verify(&entry, &proof, root))
    }
}

/// Token allocation manifest.
///
/// `token_total` is the exact sum of all amounts as minimal `0x` hex; claims
/// are keyed by EIP-55 checksummed account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BalanceManifest {
    pub merkle_root: HexString,
    pub token_total: HexString,
    pub claims: BTreeMap<String, BalanceClaim>,
}

impl BalanceManifest {
    /// Builds a manifest from raw `(account, amount)` pairs. Fails without
    /// producing anything if any pair is invalid or an account repeats after
    /// checksum normalization.
    pub fn build<I, K, V>(input: I, options: &ManifestOptions) -> Result<Self>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let mut entries = normalize(input)?;
        if entries.is_empty() {
            return Err(ClaimTreeError::EmptyInputSet);
        }
        if options.index_policy == IndexPolicy::Sorted {
            entries.sort_unstable_by_key(|entry| entry.account);
        }
        debug!(
            entries = entries.len(),
            policy = ?options.index_policy,
            "building balance manifest"
        );

        let tree = build_tree(entries.iter().map(LeafEncode::leaf_hash).collect())?;
        let proofs = hex_proofs(&tree)?;

        let mut total = BigUint::default();
        let mut claims = BTreeMap::new();
        for (index, (entry, proof)) in entries.iter().zip(proofs).enumerate() {
            total += amount_to_big(&entry.amount);
            claims.insert(
                entry.key(),
                BalanceClaim {
                    index,
                    amount: format!("0x{:x}", entry.amount),
                    proof,
                },
            );
        }

        let manifest = Self {
            merkle_root: tree.hex_root(),
            token_total: format!("0x{total:x}"),
            claims,
        };
        info!(
            root = %manifest.merkle_root,
            total = %manifest.token_total,
            claims = manifest.claims.len(),
            depth = tree.depth(),
            "built balance manifest"
        );
        Ok(manifest)
    }

    pub fn root(&self) -> Result<Bytes32> {
        hex_to_bytes32(&self.merkle_root)
    }

    pub fn total(&self) -> Result<BigUint> {
        parse_big_hex(&self.token_total)
            .ok_or_else(|| invalid_amount("tokenTotal", format!("{:?}", self.token_total)))
    }

    pub fn len(&self) -> usize {
        self.claims.len()
    }

    pub fn is_empty(&self) -> bool {
        self.claims.is_empty()
    }

    /// Looks up a claim by account in any accepted spelling.
    pub fn claim(&self, account: &str) -> Result<Option<&BalanceClaim>> {
        let key = parse_account(account)?.to_checksum(None);
        Ok(self.claims.get(&key))
    }

    /// Entries ordered by their claim index.
    pub fn entries(&self) -> Result<Vec<BalanceEntry>> {
        let mut indexed = self
            .claims
            .iter()
            .map(|(account, claim)| Ok((claim.index, claim.entry(account)?)))
            .collect::<Result<Vec<_>>>()?;
        indexed.sort_by_key(|(index, _)| *index);
        Ok(indexed.into_iter().map(|(_, entry)| entry).collect())
    }

    /// Rebuilds the tree from the claims alone.
    pub fn rebuild_tree(&self) -> Result<MerkleTree> {
        let indexed = self
            .claims
            .iter()
            .map(|(account, claim)| Ok((claim.index, claim.entry(account)?.leaf_hash())))
            .collect::<Result<Vec<_>>>()?;
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

fn normalize<I, K, V>(input: I) -> Result<Vec<BalanceEntry>>
where
    I: IntoIterator<Item = (K, V)>,
    K: AsRef<str>,
    V: AsRef<str>,
{
    let mut seen = HashSet::new();
    let mut entries = Vec::new();
    for (account, amount) in input {
        let entry = BalanceEntry::parse(account.as_ref(), amount.as_ref())?;
        if !seen.insert(entry.account) {
            return Err(ClaimTreeError::DuplicateEntry(entry.key()));
        }
        entries.push(entry);
    }
    Ok(entries)
}

pub(crate) fn amount_to_big(amount: &U256) -> BigUint {
    BigUint::from_bytes_be(&amount.to_be_bytes::<32>())
}

pub(crate) fn parse_big_hex(raw: &str) -> Option<BigUint> {
    let digits = raw.strip_prefix("0x")?;
    BigUint::parse_bytes(digits.as_bytes(), 16)
}

/// Reads an `{ account: amount }` JSON object. Amounts may be strings or
/// integers; they are validated later by [`BalanceManifest::build`].
///
/// Without serde_json's `preserve_order` feature the object comes back in
/// key order, which only matters under [`IndexPolicy::InputOrder`].
pub fn balance_input_from_json(value: &serde_json::Value) -> Result<BalanceInput> {
    let map = value.as_object().ok_or_else(|| {
        ClaimTreeError::MalformedInput("expected an object of account to amount".to_string())
    })?;

    map.iter()
        .map(|(account, amount)| {
            let amount = match amount {
                serde_json::Value::String(s) => s.clone(),
                serde_json::Value::Number(n) => n.to_string(),
                other => return Err(invalid_amount(account.as_str(), format!("unsupported value {other}"))),
            };
            Ok((account.clone(), amount))
        })
        .collect()
}
