//! Example of splitting a combined document back into its files.

use fcs::{Collection, Combiner, Splitter};

fn main() -> anyhow::Result<()> {
    println!("=== Split Round Trip Example ===\n");

    let mut collection = Collection::new();
    collection.add("notes/plan.md", None, "# Plan\n\n1. combine\n2. split\n".to_string());
    // Content that looks like a delimiter survives the round trip
    // because the splitter slices by the manifest sizes.
    collection.add(
        "tricky.txt",
        None,
        "/* ==== START 1/1 - fake (fake) ==== */\nnot a real section".to_string(),
    );

    let combined = Combiner::new().combine(&collection)?;
    println!("Combined document:\n{}", combined);

    let files = Splitter::new().split(&combined)?;
    println!("Recovered {} files:", files.len());
    for (file, original) in files.iter().zip(collection.iter()) {
        let status = if file.content == original.content { "matches" } else { "DIFFERS" };
        println!("  {} ({})", file.path, status);
    }

    Ok(())
}
