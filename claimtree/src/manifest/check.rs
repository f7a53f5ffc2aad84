//! Independent re-verification of a distributed manifest.
//!
//! Every claim is checked against the stated root and the root is rebuilt
//! from the claims alone, so a manifest can be audited without the input
//! it was built from. Failing claims are collected, never short-circuited.
//! Balance claims are also keyed by distinct EIP-55 accounts, so an account
//! spelled two ways is reported rather than paid twice.

use crate::bytes::{Bytes32, HexString, bytes32_to_hex, hex_list_to_bytes32};
use crate::error::{ClaimTreeError, Result};
use crate::leaf::{LeafEncode, parse_account};
use crate::manifest::balance::{amount_to_big, parse_big_hex};
use crate::manifest::{BalanceManifest, ContentManifest, build_tree, leaves_by_index};
use crate::tree::process_proof;
use num_bigint::BigUint;
use serde::Serialize;
use std::collections::HashSet;
use tracing::{info, warn};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClaimFailure {
    pub key: String,
    pub index: usize,
    pub reason: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ManifestReport {
    pub checked: usize,
    pub failures: Vec<ClaimFailure>,
    /// Root recomputed from the claims ordered by index; `None` when the
    /// claims do not form a complete `0..n` index range.
    pub rebuilt_root: Option<HexString>,
    pub root_matches: bool,
    pub total_matches: bool,
    /// Comparison with an externally stored root, when one was given.
    pub external_root_matches: Option<bool>,
}

impl ManifestReport {
    pub fn verified(&self) -> usize {
        self.checked - self.failures.len()
    }

    pub fn is_valid(&self) -> bool {
        self.failures.is_empty()
            && self.root_matches
            && self.total_matches
            && self.external_root_matches != Some(false)
    }
}

struct ClaimLeaf<'a> {
    key: &'a str,
    index: usize,
    leaf: Result<Bytes32>,
    proof: &'a [HexString],
    /// Problem with the claim key itself, reported ahead of the proof outcome.
    key_error: Option<String>,
}

pub fn check_balance_manifest(
    manifest: &BalanceManifest,
    external_root: Option<&Bytes32>,
) -> Result<ManifestReport> {
    let root = manifest.root()?;

    let mut sum = Some(BigUint::default());
    let mut seen = HashSet::new();
    let mut claims = Vec::with_capacity(manifest.claims.len());
    for (account, claim) in &manifest.claims {
        // Unparseable keys already fail through `entry`.
        let key_error = parse_account(account).ok().and_then(|address| {
            let checksummed = address.to_checksum(None);
            if !seen.insert(address) {
                Some(ClaimTreeError::DuplicateEntry(checksummed).to_string())
            } else if checksummed != *account {
                Some(format!("claim key {account} is not EIP-55 checksummed"))
            } else {
                None
            }
        });
        let entry = claim.entry(account);
        match &entry {
            Ok(entry) => {
                if let Some(sum) = sum.as_mut() {
                    *sum += amount_to_big(&entry.amount);
                }
            }
            Err(_) => sum = None,
        }
        claims.push(ClaimLeaf {
            key: account,
            index: claim.index,
            leaf: entry.map(|entry| entry.leaf_hash()),
            proof: &claim.proof,
            key_error,
        });
    }

    let total_matches = match (sum, parse_big_hex(&manifest.token_total)) {
        (Some(sum), Some(stated)) => sum == stated,
        _ => false,
    };
    Ok(check_claims(&root, claims, total_matches, external_root))
}

pub fn check_content_manifest(
    manifest: &ContentManifest,
    external_root: Option<&Bytes32>,
) -> Result<ManifestReport> {
    let root = manifest.root()?;
    let claims = manifest
        .claims
        .iter()
        .map(|(identifier, claim)| ClaimLeaf {
            key: identifier,
            index: claim.index,
            leaf: Ok(claim.entry(identifier).leaf_hash()),
            proof: &claim.proof,
            key_error: None,
        })
        .collect();

    let total_matches = manifest.total == manifest.claims.len();
    Ok(check_claims(&root, claims, total_matches, external_root))
}

fn check_claims(
    root: &Bytes32,
    claims: Vec<ClaimLeaf<'_>>,
    total_matches: bool,
    external_root: Option<&Bytes32>,
) -> ManifestReport {
    let checked = claims.len();
    let mut failures = Vec::new();
    let mut indexed = Vec::with_capacity(checked);

    for claim in claims {
        let outcome = claim.leaf.and_then(|leaf| {
            indexed.push((claim.index, leaf));
            let proof = hex_list_to_bytes32(claim.proof)?;
            Ok(process_proof(&leaf, &proof) == *root)
        });
        let reason = match (claim.key_error, outcome) {
            (Some(reason), _) => reason,
            (None, Ok(true)) => continue,
            (None, Ok(false)) => "proof does not reproduce the merkle root".to_string(),
            (None, Err(err)) => err.to_string(),
        };
        warn!(key = claim.key, index = claim.index, %reason, "claim failed verification");
        failures.push(ClaimFailure {
            key: claim.key.to_string(),
            index: claim.index,
            reason,
        });
    }

    let rebuilt = if indexed.len() == checked {
        match leaves_by_index(checked, indexed).and_then(build_tree) {
            Ok(tree) => Some(tree.root()),
            Err(err) => {
                warn!(error = %err, "cannot rebuild tree from claims");
                None
            }
        }
    } else {
        None
    };

    let report = ManifestReport {
        checked,
        failures,
        rebuilt_root: rebuilt.as_ref().map(bytes32_to_hex),
        root_matches: rebuilt.as_ref() == Some(root),
        total_matches,
        external_root_matches: external_root.map(|external| external == root),
    };
    info!(
        checked = report.checked,
        failed = report.failures.len(),
        root_matches = report.root_matches,
        total_matches = report.total_matches,
        "checked manifest"
    );
    report
}
