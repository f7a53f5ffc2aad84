//! Content manifest example - Collection item allowlist.
//!
//! Each identifier is bound to its index and content hash, so a proof
//! cannot be replayed at a different position.
//!
//! Run: `cargo run --example content_manifest`

use claimtree::{ContentItem, ContentManifest, IndexPolicy, ManifestOptions, verify_content};

fn main() -> claimtree::Result<()> {
    tracing_subscriber::fmt::init();

    let items: Vec<ContentItem> = (0..5)
        .map(|i| {
            ContentItem::new(format!("urn:decentraland:matic:collections-v2:0xabc:{i}"))
                .with_content_hash(format!("QmHash{i}"))
        })
        .collect();

    let options = ManifestOptions::new().with_index_policy(IndexPolicy::Sorted);
    let manifest = ContentManifest::build(items, &options)?;

    println!("=== Content Manifest ===\n");
    println!("Root: {}", manifest.merkle_root);
    println!("Total: {}\n", manifest.total);

    let root = manifest.root()?;
    for entry in manifest.entries() {
        let claim = &manifest.claims[&entry.identifier];
        let proof = claimtree::bytes::hex_list_to_bytes32(&claim.proof)?;
        let valid = verify_content(
            entry.index,
            &entry.identifier,
            entry.content_hash.as_deref(),
            &proof,
            &root,
        );
        let replayed = verify_content(
            entry.index + 1,
            &entry.identifier,
            entry.content_hash.as_deref(),
            &proof,
            &root,
        );
        println!(
            "[{}] {} valid={} replayed-at-next-index={}",
            entry.index, entry.identifier, valid, replayed
        );
    }

    println!("\n=== Tree Structure ===\n");
    println!("{}", manifest.rebuild_tree()?.render());

    println!("\n=== Key/Value Export ===\n");
    for kv in manifest.kv_entries()? {
        println!("{} => {}", kv.key, kv.value);
    }

    Ok(())
}
