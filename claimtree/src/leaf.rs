//! Packed leaf encodings for the two entry kinds.
//!
//! The byte layouts below are what the on-chain distributor hashes, so
//! they are pinned with known digests in the tests:
//!
//! | kind                         | preimage                                   |
//! |------------------------------|--------------------------------------------|
//! | balance                      | `account[20] ‖ amount[32]`                 |
//! | content, identifier only     | `index[32] ‖ identifier`                   |
//! | content, identifier and hash | `index[32] ‖ identifier ‖ content_hash`    |
//!
//! Integers are big-endian `uint256`, strings are raw UTF-8. Only content
//! leaves commit to their index.

use crate::bytes::Bytes32;
use crate::error::{ClaimTreeError, Result, invalid_amount};
use crate::hashes::keccak256;
use alloy_primitives::{Address, U256};
use alloy_sol_types::SolValue;
use serde::{Deserialize, Serialize};

pub trait LeafEncode {
    /// Solidity `abi.encodePacked` preimage of the leaf.
    fn encode_packed(&self) -> Vec<u8>;

    fn leaf_hash(&self) -> Bytes32 {
        keccak256(&self.encode_packed())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BalanceEntry {
    pub account: Address,
    pub amount: U256,
}

impl BalanceEntry {
    pub fn new(account: Address, amount: U256) -> Self {
        Self { account, amount }
    }

    /// Normalizes a raw `(account, amount)` pair as found in an input map.
    pub fn parse(account: &str, amount: &str) -> Result<Self> {
        let account = parse_account(account)?;
        let amount = parse_amount(&account.to_checksum(None), amount)?;
        Ok(Self { account, amount })
    }

    /// EIP-55 form of the account, the key this entry is stored under.
    pub fn key(&self) -> String {
        self.account.to_checksum(None)
    }
}

impl LeafEncode for BalanceEntry {
    fn encode_packed(&self) -> Vec<u8> {
        (self.account, self.amount).abi_encode_packed()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentEntry {
    pub index: usize,
    pub identifier: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content_hash: Option<String>,
}

impl ContentEntry {
    pub fn new<S: Into<String>>(index: usize, identifier: S) -> Self {
        Self {
            index,
            identifier: identifier.into(),
            content_hash: None,
        }
    }

    pub fn with_content_hash<S: Into<String>>(mut self, content_hash: S) -> Self {
        self.content_hash = Some(content_hash.into());
        self
    }
}

impl LeafEncode for ContentEntry {
    fn encode_packed(&self) -> Vec<u8> {
        let index = U256::from(self.index);
        match &self.content_hash {
            Some(hash) => (index, self.identifier.clone(), hash.clone()).abi_encode_packed(),
            None => (index, self.identifier.clone()).abi_encode_packed(),
        }
    }
}

/// Parses an account the way ethers' `getAddress` does: 40 hex digits with
/// an optional `0x` prefix. Single-case input is accepted as is, mixed-case
/// input must be a valid EIP-55 checksum.
pub fn parse_account(raw: &str) -> Result<Address> {
    let digits = raw.strip_prefix("0x").unwrap_or(raw);
    if digits.len() != 40 || !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
        return Err(ClaimTreeError::InvalidAccount(raw.to_string()));
    }

    let mut bytes = [0u8; 20];
    hex::decode_to_slice(digits, &mut bytes)
        .map_err(|_| ClaimTreeError::InvalidAccount(raw.to_string()))?;
    let account = Address::from(bytes);

    let has_lower = digits.bytes().any(|b| b.is_ascii_lowercase());
    let has_upper = digits.bytes().any(|b| b.is_ascii_uppercase());
    if has_lower && has_upper && account.to_checksum(None)[2..] != *digits {
        return Err(ClaimTreeError::InvalidAccount(raw.to_string()));
    }

    Ok(account)
}

/// Parses a strictly positive `uint256` amount given in decimal or `0x` hex.
///
/// Only plain digit strings are accepted: no sign, whitespace, separators
/// or fractional part.
pub fn parse_amount(key: &str, raw: &str) -> Result<U256> {
    if raw.is_empty() {
        return Err(invalid_amount(key, "empty amount"));
    }
    if raw.starts_with('-') {
        return Err(invalid_amount(key, format!("negative amount {raw}")));
    }

    let (digits, radix) = match raw.strip_prefix("0x") {
        Some(hex_digits) if hex_digits.bytes().all(|b| b.is_ascii_hexdigit()) => (hex_digits, 16),
        None if raw.bytes().all(|b| b.is_ascii_digit()) => (raw, 10),
        _ => return Err(invalid_amount(key, format!("non-canonical amount {raw:?}"))),
    };
    if digits.is_empty() {
        return Err(invalid_amount(key, "empty hex amount"));
    }
    let parsed =
        U256::from_str_radix(digits, radix).map_err(|e| invalid_amount(key, format!("{raw}: {e}")))?;

    if parsed.is_zero() {
        return Err(invalid_amount(key, "amount must be positive"));
    }
    Ok(parsed)
}
