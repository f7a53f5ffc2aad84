//! Manifest audit example.
//!
//! Re-verifies every claim of a serialized manifest, rebuilds the root from
//! the claims, and compares it against a root read from the distributor
//! contract. Exits non-zero only after every claim has been checked.
//!
//! Run: `cargo run --example check_manifest`

use claimtree::{BalanceManifest, ManifestOptions, check_balance_manifest};
use std::process::ExitCode;

fn main() -> claimtree::Result<ExitCode> {
    tracing_subscriber::fmt::init();

    let built = BalanceManifest::build(
        [
            ("0x1111111111111111111111111111111111111111", "200"),
            ("0x2222222222222222222222222222222222222222", "300"),
            ("0x3333333333333333333333333333333333333333", "250"),
        ],
        &ManifestOptions::default(),
    )?;
    let onchain_root = built.root()?;

    // Simulate a manifest that was edited after publication
    let mut published = BalanceManifest::from_json(&built.to_json_pretty()?)?;
    if let Some(claim) = published.claims.values_mut().next() {
        claim.amount = "0x3e8".to_string();
    }

    let report = check_balance_manifest(&published, Some(&onchain_root))?;

    println!("Checked:  {}", report.checked);
    println!("Verified: {}", report.verified());
    for failure in &report.failures {
        println!("  FAILED [{}] {}: {}", failure.index, failure.key, failure.reason);
    }
    println!("Reconstructed root: {:?}", report.rebuilt_root);
    println!("Root matches manifest: {}", report.root_matches);
    println!("Total matches: {}", report.total_matches);
    println!("Root matches contract: {:?}", report.external_root_matches);

    Ok(if report.is_valid() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}
