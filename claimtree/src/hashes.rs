use crate::bytes::{Bytes32, concat_sorted};
use sha3::{Digest, Keccak256};

#[must_use]
pub fn keccak256(data: &[u8]) -> Bytes32 {
    Keccak256::digest(data).into()
}

/// Parent of two nodes: `keccak256(min(a, b) || max(a, b))`.
///
/// Commutative, so neither tree construction nor proof folding tracks
/// left/right positions.
#[must_use]
pub fn node_hash(a: &Bytes32, b: &Bytes32) -> Bytes32 {
    keccak256(&concat_sorted(a, b))
}
