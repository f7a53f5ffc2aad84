use crate::bytes::{Bytes32, bytes32_to_hex};
use crate::error::{ClaimTreeError, Result};
use crate::hashes::node_hash;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Binary Merkle tree over an ordered leaf sequence.
///
/// Layer 0 holds the leaves in caller order, the last layer holds the root.
/// Pairs at even offsets are combined with the sorted-pair [`node_hash`];
/// the last node of an odd-sized layer moves up unchanged.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MerkleTree {
    layers: Vec<Vec<Bytes32>>,
}

fn next_layer(layer: &[Bytes32]) -> Vec<Bytes32> {
    layer.chunks(2).map(combine_chunk).collect()
}

#[cfg(feature = "parallel")]
fn par_next_layer(layer: &[Bytes32]) -> Vec<Bytes32> {
    layer.par_chunks(2).map(combine_chunk).collect()
}

#[inline]
fn combine_chunk(chunk: &[Bytes32]) -> Bytes32 {
    match chunk {
        [a, b] => node_hash(a, b),
        _ => chunk[0],
    }
}

impl MerkleTree {
    pub fn new(leaves: Vec<Bytes32>) -> Result<Self> {
        Self::build(leaves, next_layer)
    }

    /// Same tree as [`MerkleTree::new`], with each layer hashed on the rayon pool.
    #[cfg(feature = "parallel")]
    pub fn par_new(leaves: Vec<Bytes32>) -> Result<Self> {
        Self::build(leaves, par_next_layer)
    }

    fn build(leaves: Vec<Bytes32>, next: fn(&[Bytes32]) -> Vec<Bytes32>) -> Result<Self> {
        if leaves.is_empty() {
            return Err(ClaimTreeError::EmptyInputSet);
        }

        let mut layers = vec![leaves];
        loop {
            let top = &layers[layers.len() - 1];
            if top.len() == 1 {
                break;
            }
            let parent = next(top);
            layers.push(parent);
        }
        Ok(Self { layers })
    }

    pub fn root(&self) -> Bytes32 {
        self.layers[self.layers.len() - 1][0]
    }

    pub fn hex_root(&self) -> String {
        bytes32_to_hex(&self.root())
    }

    pub fn len(&self) -> usize {
        self.layers[0].len()
    }

    pub fn is_empty(&self) -> bool {
        self.layers[0].is_empty()
    }

    pub fn leaves(&self) -> &[Bytes32] {
        &self.layers[0]
    }

    pub fn layers(&self) -> &[Vec<Bytes32>] {
        &self.layers
    }

    /// Number of layers above the leaves.
    pub fn depth(&self) -> usize {
        self.layers.len() - 1
    }

    /// Siblings of the leaf at `index`, bottom to top. A layer where the
    /// ancestor was carried up without a partner contributes nothing.
    pub fn proof(&self, index: usize) -> Result<Vec<Bytes32>> {
        if index >= self.len() {
            return Err(ClaimTreeError::IndexOutOfRange {
                index,
                len: self.len(),
            });
        }

        let mut proof = Vec::with_capacity(self.depth());
        let mut pos = index;
        for layer in &self.layers[..self.depth()] {
            if let Some(sibling) = layer.get(pos ^ 1) {
                proof.push(*sibling);
            }
            pos /= 2;
        }
        Ok(proof)
    }

    pub fn render(&self) -> String {
        let mut lines = Vec::new();
        for (level, layer) in self.layers.iter().enumerate().rev() {
            lines.push(format!("layer {level}"));
            for (i, node) in layer.iter().enumerate() {
                let branch = if i + 1 == layer.len() { "└─" } else { "├─" };
                lines.push(format!("{branch} {i}) {}", bytes32_to_hex(node)));
            }
        }
        lines.join("\n")
    }
}

/// Folds `leaf` through `proof` with the sorted-pair rule.
#[must_use]
pub fn process_proof(leaf: &Bytes32, proof: &[Bytes32]) -> Bytes32 {
    proof
        .iter()
        .fold(*leaf, |running, sibling| node_hash(&running, sibling))
}
