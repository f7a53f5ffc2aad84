//! Balance manifest example - Token airdrop scenario.
//!
//! Builds a manifest from an `account -> amount` map, prints the
//! distributable JSON and verifies one claim the way a contract would.
//!
//! Run: `cargo run --example balance_manifest`

use claimtree::{BalanceManifest, ManifestOptions, balance_input_from_json, verify_hex};
use serde_json::json;

fn main() -> claimtree::Result<()> {
    tracing_subscriber::fmt::init();

    // What an external loader would hand over after reading the input file
    let raw = json!({
        "0x1111111111111111111111111111111111111111": "1000",
        "0x2222222222222222222222222222222222222222": "2500",
        "0x3333333333333333333333333333333333333333": "500",
        "0x5aaeb6053f3e94c9b9a09f33669435e7ef1beaed": "750",
    });

    let input = balance_input_from_json(&raw)?;
    let manifest = BalanceManifest::build(input, &ManifestOptions::default())?;

    println!("=== Airdrop Manifest ===\n");
    println!("Root:  {}", manifest.merkle_root);
    println!("Total: {}", manifest.token_total);
    println!("Claims: {}\n", manifest.len());

    // Keys come back checksummed
    let account = "0x5aAeb6053F3E94C9b9A09f33669435E7Ef1BeAed";
    if let Some(claim) = manifest.claim(account)? {
        println!("Claim for {account} (index {}):", claim.index);
        for (i, hash) in claim.proof.iter().enumerate() {
            println!("  [{i}] {hash}");
        }

        let entry = claim.entry(account)?;
        let valid = verify_hex(&entry, &claim.proof, &manifest.merkle_root)?;
        println!("\nProof valid: {valid}");
    }

    println!("\n=== JSON ===\n");
    println!("{}", manifest.to_json_pretty()?);

    Ok(())
}
