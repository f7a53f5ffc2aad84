//! Claim manifests: the distributable root, total and per-key proofs.

pub mod balance;
pub mod check;
pub mod content;
pub mod kv;

pub use balance::{BalanceClaim, BalanceInput, BalanceManifest, balance_input_from_json};
pub use check::{ClaimFailure, ManifestReport, check_balance_manifest, check_content_manifest};
pub use content::{ContentClaim, ContentItem, ContentManifest, content_items_from_json};
pub use kv::{KvEntry, to_kv_entries};

use crate::bytes::{Bytes32, HexString, bytes32_list_to_hex};
use crate::error::{ClaimTreeError, Result};
use crate::tree::MerkleTree;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

pub(crate) fn build_tree(leaves: Vec<Bytes32>) -> Result<MerkleTree> {
    #[cfg(feature = "parallel")]
    {
        MerkleTree::par_new(leaves)
    }
    #[cfg(not(feature = "parallel"))]
    {
        MerkleTree::new(leaves)
    }
}

/// Hex proof of every leaf, in leaf order.
pub(crate) fn hex_proofs(tree: &MerkleTree) -> Result<Vec<Vec<HexString>>> {
    #[cfg(feature = "parallel")]
    let indices = (0..tree.len()).into_par_iter();
    #[cfg(not(feature = "parallel"))]
    let indices = 0..tree.len();

    indices
        .map(|i| tree.proof(i).map(|proof| bytes32_list_to_hex(&proof)))
        .collect()
}

/// Places `(index, leaf)` pairs into a dense leaf vector, requiring the
/// indices to be exactly `0..len`.
pub(crate) fn leaves_by_index<I>(len: usize, indexed: I) -> Result<Vec<Bytes32>>
where
    I: IntoIterator<Item = (usize, Bytes32)>,
{
    let mut slots: Vec<Option<Bytes32>> = vec![None; len];
    for (index, leaf) in indexed {
        match slots.get_mut(index) {
            None => return Err(ClaimTreeError::IndexOutOfRange { index, len }),
            Some(slot) if slot.is_some() => {
                return Err(ClaimTreeError::MalformedInput(format!(
                    "index {index} is claimed twice"
                )));
            }
            Some(slot) => *slot = Some(leaf),
        }
    }
    slots
        .into_iter()
        .enumerate()
        .map(|(index, slot)| {
            slot.ok_or_else(|| ClaimTreeError::MalformedInput(format!("index {index} is missing")))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_leaves_by_index_reorders() {
        let leaves = leaves_by_index(3, vec![(2, [2u8; 32]), (0, [0u8; 32]), (1, [1u8; 32])]).unwrap();
        assert_eq!(leaves, vec![[0u8; 32], [1u8; 32], [2u8; 32]]);
    }

    #[test]
    fn test_leaves_by_index_rejects_gaps_and_repeats() {
        let repeated = leaves_by_index(2, vec![(0, [0u8; 32]), (0, [1u8; 32])]);
        assert!(matches!(repeated, Err(ClaimTreeError::MalformedInput(_))));

        let out_of_range = leaves_by_index(2, vec![(0, [0u8; 32]), (2, [1u8; 32])]);
        assert!(matches!(
            out_of_range,
            Err(ClaimTreeError::IndexOutOfRange { index: 2, len: 2 })
        ));

        let missing = leaves_by_index(2, vec![(1, [0u8; 32])]);
        assert!(matches!(missing, Err(ClaimTreeError::MalformedInput(_))));
    }
}
