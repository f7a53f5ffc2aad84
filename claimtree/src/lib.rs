//! # claimtree
//!
//! Merkle claim manifests for token airdrops and content-hash allowlists,
//! bit-compatible with Solidity distributors that verify with
//! `keccak256(abi.encodePacked(..))` leaves and sorted-pair hashing.
//!
//! ## Features
//!
//! - **`BalanceManifest`**: `account → amount` allocations with an exact token total
//! - **`ContentManifest`**: identifier (and optional content hash) claims bound to their index
//! - **`MerkleTree`**: layered tree with odd-node carry-up and per-leaf proofs
//! - Proof verification without the tree, and full manifest audits
//! - Serialization with serde in the `merkleRoot` / `claims` JSON layout
//!
//! ## Example
//!
//! ```rust
//! use claimtree::{BalanceManifest, ManifestOptions};
//!
//! let manifest = BalanceManifest::build(
//!     [
//!         ("0x1111111111111111111111111111111111111111", "200"),
//!         ("0x2222222222222222222222222222222222222222", "300"),
//!     ],
//!     &ManifestOptions::default(),
//! )
//! .unwrap();
//!
//! let root = manifest.root().unwrap();
//! let claim = manifest.claim("0x1111111111111111111111111111111111111111").unwrap().unwrap();
//! assert!(claim.verify("0x1111111111111111111111111111111111111111", &root).unwrap());
//! assert_eq!(manifest.token_total, "0x1f4");
//! ```

#![deny(unsafe_code)]
#![allow(clippy::module_name_repetitions)]

pub mod bytes;
pub mod error;
pub mod hashes;
pub mod leaf;
pub mod manifest;
pub mod options;
pub mod tree;
pub mod verify;

pub use bytes::{Bytes32, HexString};
pub use error::{ClaimTreeError, Result};
pub use hashes::{keccak256, node_hash};
pub use leaf::{BalanceEntry, ContentEntry, LeafEncode, parse_account, parse_amount};
pub use manifest::{
    BalanceClaim, BalanceInput, BalanceManifest, ClaimFailure, ContentClaim, ContentItem,
    ContentManifest, KvEntry, ManifestReport, balance_input_from_json, check_balance_manifest,
    check_content_manifest, content_items_from_json, to_kv_entries,
};
pub use options::{IndexPolicy, ManifestOptions};
pub use tree::{MerkleTree, process_proof};
pub use verify::{verify, verify_balance, verify_content, verify_hex};

#[cfg(test)]
mod tests {
    use super::*;
    use alloy_primitives::U256;
    use num_bigint::BigUint;
    use serde_json::json;

    const WALLET0: &str = "0x5aAeb6053F3E94C9b9A09f33669435E7Ef1BeAed";
    const WALLET1: &str = "0xfB6916095ca1df60bB79Ce92cE3Ea74c37c5d359";

    #[test]
    fn test_two_wallet_scenario() {
        let manifest = BalanceManifest::build(
            [(WALLET0, "100"), (WALLET1, "101")],
            &ManifestOptions::default(),
        )
        .unwrap();

        assert_eq!(
            manifest.merkle_root,
            "0x70a54ff060be958d34dd96b5a8e06c25601b43761e1966de01cec52baac0d4b4"
        );
        assert_eq!(manifest.token_total, "0xc9");

        let root = manifest.root().unwrap();
        let claim = manifest.claim(WALLET0).unwrap().unwrap();
        assert_eq!(claim.index, 0);
        assert_eq!(
            claim.proof,
            vec!["0xc09d7e14bbf35c66a76a02672531475d31f9b13cb88cc76816a1c97ce4d72c15".to_string()]
        );

        let wallet0 = parse_account(WALLET0).unwrap();
        let wallet1 = parse_account(WALLET1).unwrap();
        let proof = bytes::hex_list_to_bytes32(&claim.proof).unwrap();
        assert!(verify_balance(wallet0, U256::from(100u64), &proof, &root));
        assert!(!verify_balance(wallet0, U256::from(101u64), &proof, &root));
        assert!(!verify_balance(wallet1, U256::from(100u64), &proof, &root));
    }

    #[test]
    fn test_balance_manifest_e2e() {
        let input = balance_input_from_json(&json!({
            "0x1111111111111111111111111111111111111111": "1000",
            "0x2222222222222222222222222222222222222222": "2500",
            "0x3333333333333333333333333333333333333333": 500,
            "0x4444444444444444444444444444444444444444": "0x2ee",
            "0x5555555555555555555555555555555555555555": "1",
        }))
        .unwrap();
        let manifest = BalanceManifest::build(input, &ManifestOptions::default()).unwrap();
        assert_eq!(manifest.total().unwrap(), BigUint::from(4751u32));

        let text = manifest.to_json_pretty().unwrap();
        let loaded = BalanceManifest::from_json(&text).unwrap();
        let report = check_balance_manifest(&loaded, Some(&manifest.root().unwrap())).unwrap();
        assert!(report.is_valid());
        assert_eq!(report.verified(), 5);

        for (account, claim) in &loaded.claims {
            let entry = claim.entry(account).unwrap();
            assert!(verify_hex(&entry, &claim.proof, &loaded.merkle_root).unwrap());
        }
    }

    #[test]
    fn test_content_manifest_e2e() {
        let items = content_items_from_json(&json!([
            { "urn": "urn:decentraland:matic:collections-v2:0xabc:0", "contentHash": "QmHash0" },
            { "urn": "urn:decentraland:matic:collections-v2:0xabc:1", "contentHash": "QmHash1" },
            { "urn": "urn:decentraland:matic:collections-v2:0xabc:2", "contentHash": "QmHash2" },
        ]))
        .unwrap();
        let manifest = ContentManifest::build(items, &ManifestOptions::default()).unwrap();
        assert_eq!(manifest.total, 3);

        let root = manifest.root().unwrap();
        let claim = manifest.claim("urn:decentraland:matic:collections-v2:0xabc:0").unwrap();
        let proof = bytes::hex_list_to_bytes32(&claim.proof).unwrap();
        assert_eq!(
            bytes::bytes32_to_hex(&ContentEntry::new(0, "urn:decentraland:matic:collections-v2:0xabc:0")
                .with_content_hash("QmHash0")
                .leaf_hash()),
            "0x31c6f278e11e1ae233f8c81f8d1e64da6a882787e93791433c2336224f1c19d3"
        );
        assert!(verify_content(
            0,
            "urn:decentraland:matic:collections-v2:0xabc:0",
            Some("QmHash0"),
            &proof,
            &root
        ));
        assert!(!verify_content(
            1,
            "urn:decentraland:matic:collections-v2:0xabc:0",
            Some("QmHash0"),
            &proof,
            &root
        ));

        let report = check_content_manifest(&manifest, Some(&root)).unwrap();
        assert!(report.is_valid());
    }

    #[test]
    fn test_large_manifest_round_trip() {
        let input: Vec<(String, String)> = (1..=2_000u32)
            .map(|i| {
                let mut account = [0u8; 20];
                account[16..].copy_from_slice(&i.to_be_bytes());
                (format!("0x{}", hex::encode(account)), i.to_string())
            })
            .collect();
        let manifest = BalanceManifest::build(input, &ManifestOptions::default()).unwrap();

        assert_eq!(manifest.total().unwrap(), BigUint::from(2_000u64 * 2_001 / 2));
        let report = check_balance_manifest(&manifest, None).unwrap();
        assert!(report.is_valid());
        assert_eq!(report.checked, 2_000);
    }
}
