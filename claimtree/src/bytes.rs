use crate::error::{ClaimTreeError, Result};

pub type Bytes32 = [u8; 32];
pub type HexString = String;

/// Parses a root or proof element. Failures are
/// [`ClaimTreeError::InvalidProofFormat`].
pub fn hex_to_bytes32(s: &str) -> Result<Bytes32> {
    let digits = s.strip_prefix("0x").unwrap_or(s);
    if digits.len() != 64 {
        return Err(ClaimTreeError::InvalidProofFormat(format!(
            "expected 64 hex digits, got {} in {s:?}",
            digits.len()
        )));
    }
    let mut bytes = [0u8; 32];
    hex::decode_to_slice(digits, &mut bytes)
        .map_err(|e| ClaimTreeError::InvalidProofFormat(format!("{s:?}: {e}")))?;
    Ok(bytes)
}

#[must_use]
pub fn bytes32_to_hex(bytes: &Bytes32) -> HexString {
    format!("0x{}", hex::encode(bytes))
}

pub fn hex_list_to_bytes32<S: AsRef<str>>(items: &[S]) -> Result<Vec<Bytes32>> {
    items.iter().map(|s| hex_to_bytes32(s.as_ref())).collect()
}

#[must_use]
pub fn bytes32_list_to_hex(items: &[Bytes32]) -> Vec<HexString> {
    items.iter().map(bytes32_to_hex).collect()
}

/// Concatenates two nodes smaller-first, the preimage of a sorted-pair hash.
#[must_use]
pub fn concat_sorted(a: &Bytes32, b: &Bytes32) -> [u8; 64] {
    let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
    let mut out = [0u8; 64];
    out[..32].copy_from_slice(lo);
    out[32..].copy_from_slice(hi);
    out
}
