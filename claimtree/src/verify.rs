use crate::bytes::{Bytes32, hex_list_to_bytes32, hex_to_bytes32};
use crate::error::Result;
use crate::leaf::{BalanceEntry, ContentEntry, LeafEncode};
use crate::tree::process_proof;
use alloy_primitives::{Address, U256};

/// Checks that `entry` is committed to by `root` through `proof`.
///
/// The entry must be the exact variant and index the tree was built with;
/// any mismatch simply yields `false`.
pub fn verify<E: LeafEncode + ?Sized>(entry: &E, proof: &[Bytes32], root: &Bytes32) -> bool {
    process_proof(&entry.leaf_hash(), proof) == *root
}

/// [`verify`] over hex-encoded proof elements and root, as they appear in a
/// serialized manifest.
pub fn verify_hex<E, S>(entry: &E, proof: &[S], root: &str) -> Result<bool>
where
    E: LeafEncode + ?Sized,
    S: AsRef<str>,
{
    let proof = hex_list_to_bytes32(proof)?;
    let root = hex_to_bytes32(root)?;
    Ok(verify(entry, &proof, &root))
}

pub fn verify_balance(account: Address, amount: U256, proof: &[Bytes32], root: &Bytes32) -> bool {
    verify(&BalanceEntry::new(account, amount), proof, root)
}

pub fn verify_content(
    index: usize,
    identifier: &str,
    content_hash: Option<&str>,
    proof: &[Bytes32],
    root: &Bytes32,
) -> bool {
    let mut entry = ContentEntry::new(index, identifier);
    entry.content_hash = content_hash.map(str::to_string);
    verify(&entry, proof, root)
}
