//! Example of combining staged files into one annotated document.

use fcs::{Collection, CombineOptions, Combiner, StructureFormat};

fn main() -> anyhow::Result<()> {
    println!("=== Combine Example ===\n");

    // Stage a few files by hand; the CLI does this from disk and zips.
    let mut collection = Collection::new();
    collection.add("src/main.js", None, "console.log(\"hello\");\n".to_string());
    collection.add("src/util.js", None, "export const id = (x) => x;\n".to_string());
    collection.add("readme.md", None, "# Demo project\n".to_string());

    // 1. Default options: tree header, block delimiters, manifest on.
    let combined = Combiner::new().combine(&collection)?;
    println!("{}", combined);

    // 2. Markdown header with a line-comment delimiter preset.
    let preset = fcs::template::preset_by_name("Simple (Line)").expect("built-in preset");
    let options = CombineOptions {
        structure: StructureFormat::Markdown,
        start_template: preset.start.to_string(),
        end_template: preset.end.to_string(),
        ..CombineOptions::default()
    };
    let combined = Combiner::with_options(options).combine(&collection)?;
    println!("{}", combined);

    Ok(())
}
