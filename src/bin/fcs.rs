//! Command-line interface for fcs.
//!
//! Stages files, directories and zip archives into a collection, then
//! combines them into one annotated document or reports on them. The
//! `split` command reverses a combine into a zip of the original files.

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use comfy_table::Table;
use std::fs;
use std::path::{Path, PathBuf};

use fcs::template::{self, PRESETS};
use fcs::{
    classify, config, stats, Collection, CombineOptions, Combiner, ExclusionRules, Preferences,
    Splitter, StructureFormat,
};

#[derive(Parser)]
#[command(name = "fcs")]
#[command(about = "Combine text files into one document and split it back", version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Combine files, directories and zip archives into one document
    Combine(CombineArgs),

    /// Split a combined document into a zip of its files (alias: x)
    #[command(alias = "x")]
    Split {
        /// Combined document to split
        input: PathBuf,

        /// Output zip path (default: <input>_split.zip)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// List the recovered files
        #[arg(short, long)]
        verbose: bool,
    },

    /// List the files inside a combined document (alias: t)
    #[command(alias = "t")]
    List {
        /// Combined document to inspect
        input: PathBuf,

        /// Show sizes next to paths
        #[arg(short, long)]
        verbose: bool,
    },

    /// Show statistics for a set of inputs without combining them
    Stats {
        /// Files, directories and zip archives to analyze
        #[arg(required = true)]
        inputs: Vec<PathBuf>,

        /// Exclusion pattern; a trailing / excludes a directory (repeatable)
        #[arg(long = "exclude", value_name = "PATTERN")]
        exclude: Vec<String>,

        /// Log skipped files
        #[arg(short, long)]
        verbose: bool,
    },

    /// List the built-in delimiter presets
    Presets,
}

#[derive(Args)]
struct CombineArgs {
    /// Files, directories and zip archives to combine
    #[arg(required = true)]
    inputs: Vec<PathBuf>,

    /// Output file (default: derived from the inputs)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Structure header format
    #[arg(long, value_enum)]
    structure: Option<StructureFormat>,

    /// Omit delimiter comments and the structure header
    #[arg(long)]
    no_comments: bool,

    /// Omit the manifest line (splitting then relies on delimiters)
    #[arg(long)]
    no_manifest: bool,

    /// Start delimiter template, with {filename} {path} {index} {totalFiles}
    #[arg(long, value_name = "TEMPLATE")]
    start_template: Option<String>,

    /// End delimiter template
    #[arg(long, value_name = "TEMPLATE")]
    end_template: Option<String>,

    /// Use a named delimiter preset (see `fcs presets`)
    #[arg(long, conflicts_with_all = ["start_template", "end_template"])]
    preset: Option<String>,

    /// Exclusion pattern; a trailing / excludes a directory (repeatable)
    #[arg(long = "exclude", value_name = "PATTERN")]
    exclude: Vec<String>,

    /// Save the resolved settings as defaults for later runs
    #[arg(long)]
    save_config: bool,

    /// Log staged and skipped files
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Combine(args) => {
            init_logger(args.verbose);
            run_combine(args)
        }
        Commands::Split { input, output, verbose } => {
            init_logger(verbose);
            run_split(&input, output, verbose)
        }
        Commands::List { input, verbose } => {
            init_logger(verbose);
            run_list(&input, verbose)
        }
        Commands::Stats { inputs, exclude, verbose } => {
            init_logger(verbose);
            run_stats(&inputs, &exclude)
        }
        Commands::Presets => {
            init_logger(false);
            run_presets()
        }
    }
}

fn init_logger(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default)).init();
}

fn run_combine(args: CombineArgs) -> Result<()> {
    let prefs = load_preferences();
    let rules = build_exclusion_rules(&prefs, &args.exclude)?;

    let mut collection = Collection::new();
    ingest(&mut collection, &args.inputs, &rules);
    if collection.is_empty() {
        anyhow::bail!("no processable text files found in the inputs");
    }

    let options = resolve_options(&prefs, &args)?;
    if args.save_config {
        save_preferences(&prefs, &options, &args.exclude)?;
    }

    let output = args
        .output
        .unwrap_or_else(|| PathBuf::from(derive_combined_name(&collection)));
    Combiner::with_options(options)
        .combine_to_file(&collection, &output)
        .with_context(|| format!("Failed to write combined file: {}", output.display()))?;

    println!("Combined {} files into {}", collection.len(), output.display());
    Ok(())
}

fn run_split(input: &Path, output: Option<PathBuf>, verbose: bool) -> Result<()> {
    let text = fs::read_to_string(input)
        .with_context(|| format!("Failed to read file: {}", input.display()))?;

    let files = Splitter::new()
        .split(&text)
        .with_context(|| format!("Failed to split: {}", input.display()))?;

    let output = output.unwrap_or_else(|| split_output_name(input));
    let writer = fs::File::create(&output)
        .with_context(|| format!("Failed to create file: {}", output.display()))?;
    fcs::pack_zip(writer, &files)
        .with_context(|| format!("Failed to write archive: {}", output.display()))?;

    if verbose {
        for file in &files {
            println!("{} ({})", file.path, fcs::format_bytes(file.content.len() as u64));
        }
    }
    println!("Split {} files into {}", files.len(), output.display());
    Ok(())
}

fn run_list(input: &Path, verbose: bool) -> Result<()> {
    let text = fs::read_to_string(input)
        .with_context(|| format!("Failed to read file: {}", input.display()))?;

    let files = Splitter::new()
        .split(&text)
        .with_context(|| format!("Failed to parse: {}", input.display()))?;

    for file in &files {
        if verbose {
            println!("{} ({})", file.path, fcs::format_bytes(file.content.len() as u64));
        } else {
            println!("{}", file.path);
        }
    }
    Ok(())
}

fn run_stats(inputs: &[PathBuf], exclude: &[String]) -> Result<()> {
    let prefs = load_preferences();
    let rules = build_exclusion_rules(&prefs, exclude)?;

    let mut collection = Collection::new();
    ingest(&mut collection, inputs, &rules);
    if collection.is_empty() {
        anyhow::bail!("no processable text files found in the inputs");
    }

    let stats = stats::summarize(&collection);
    println!(
        "{} files, {}, {} lines, {} characters",
        stats.totals.files,
        fcs::format_bytes(stats.totals.bytes),
        stats.totals.lines,
        stats.totals.chars
    );

    let mut table = Table::new();
    table.set_header(vec!["Extension", "Files", "Size", "Lines", "Chars"]);
    for (ext, tally) in &stats.by_extension {
        table.add_row(vec![
            format!(".{}", ext),
            tally.files.to_string(),
            fcs::format_bytes(tally.bytes),
            tally.lines.to_string(),
            tally.chars.to_string(),
        ]);
    }
    println!("{table}");
    Ok(())
}

fn run_presets() -> Result<()> {
    for preset in PRESETS {
        println!("{}", preset.name);
        println!("  start: {}", preset.start);
        println!("  end:   {}", preset.end);
    }
    Ok(())
}

/// Merge saved preferences, preset and explicit flags into combine
/// options. Explicit templates beat the preset, which beats saved
/// preferences.
fn resolve_options(prefs: &Preferences, args: &CombineArgs) -> Result<CombineOptions> {
    let preset = match args.preset.as_deref() {
        Some(name) => Some(template::preset_by_name(name).ok_or_else(|| {
            anyhow::anyhow!("unknown preset '{}'; run `fcs presets` to list them", name)
        })?),
        None => None,
    };

    Ok(CombineOptions {
        structure: args.structure.unwrap_or(prefs.structure_format),
        suppress_comments: args.no_comments || prefs.disable_comments,
        start_template: args
            .start_template
            .clone()
            .or_else(|| preset.map(|p| p.start.to_string()))
            .unwrap_or_else(|| prefs.start_comment.clone()),
        end_template: args
            .end_template
            .clone()
            .or_else(|| preset.map(|p| p.end.to_string()))
            .unwrap_or_else(|| prefs.end_comment.clone()),
        emit_manifest: !args.no_manifest,
    })
}

fn preferences_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join(config::CONFIG_DIR_NAME).join(config::CONFIG_FILENAME))
}

fn load_preferences() -> Preferences {
    let Some(path) = preferences_path() else {
        return Preferences::default();
    };
    match Preferences::load_from_path(&path) {
        Ok(prefs) => prefs,
        Err(err) => {
            log::warn!("Failed to load preferences from {}: {}", path.display(), err);
            Preferences::default()
        }
    }
}

fn save_preferences(prefs: &Preferences, options: &CombineOptions, extra: &[String]) -> Result<()> {
    let path = preferences_path().context("Could not locate the user config directory")?;

    let mut exclusions: Vec<String> = prefs
        .exclusion_filter
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect();
    for pattern in extra {
        if !exclusions.iter().any(|existing| existing == pattern) {
            exclusions.push(pattern.clone());
        }
    }

    let updated = Preferences {
        structure_format: options.structure,
        disable_comments: options.suppress_comments,
        start_comment: options.start_template.clone(),
        end_comment: options.end_template.clone(),
        exclusion_filter: exclusions.join("\n"),
    };
    updated
        .save_to_path(&path)
        .with_context(|| format!("Failed to save preferences to {}", path.display()))?;
    println!("Saved preferences to {}", path.display());
    Ok(())
}

fn build_exclusion_rules(prefs: &Preferences, extra: &[String]) -> Result<ExclusionRules> {
    let patterns = prefs
        .exclusion_filter
        .lines()
        .chain(extra.iter().map(String::as_str));
    ExclusionRules::compile(patterns).context("Invalid exclusion pattern")
}

/// Stage each input: directories are walked, zips are expanded, loose
/// files are read directly. Per-file problems are logged and skipped so
/// the batch keeps going.
fn ingest(collection: &mut Collection, inputs: &[PathBuf], rules: &ExclusionRules) {
    for input in inputs {
        if input.is_dir() {
            ingest_directory(collection, input, rules);
        } else {
            let display = normalize_name(input);
            ingest_file(collection, input, &display, rules);
        }
    }
}

fn ingest_directory(collection: &mut Collection, dir: &Path, rules: &ExclusionRules) {
    let base: PathBuf = dir.file_name().map(PathBuf::from).unwrap_or_default();
    for entry in walkdir::WalkDir::new(dir).sort_by_file_name() {
        let entry = match entry {
            Ok(entry) => entry,
            Err(err) => {
                log::warn!("Skipping unreadable path under {}: {}", dir.display(), err);
                continue;
            }
        };
        if !entry.file_type().is_file() {
            continue;
        }
        let rel = entry.path().strip_prefix(dir).unwrap_or_else(|_| entry.path());
        let display = base.join(rel).to_string_lossy().replace('\\', "/");
        ingest_file(collection, entry.path(), &display, rules);
    }
}

fn ingest_file(collection: &mut Collection, path: &Path, display: &str, rules: &ExclusionRules) {
    if rules.is_excluded(display) {
        log::debug!("excluded: {}", display);
        return;
    }
    if classify::extension_of(display).eq_ignore_ascii_case("zip") {
        ingest_zip(collection, path);
        return;
    }
    if !classify::is_likely_text_file(display) {
        log::debug!("skipping unsupported file type: {}", display);
        return;
    }
    match fs::read_to_string(path) {
        Ok(content) => {
            log::debug!("staged: {}", display);
            collection.add(display, None, content);
        }
        Err(err) => log::warn!("Skipping {}: {}", path.display(), err),
    }
}

fn ingest_zip(collection: &mut Collection, path: &Path) {
    let archive_name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());
    let bytes = match fs::read(path) {
        Ok(bytes) => bytes,
        Err(err) => {
            log::warn!("Skipping {}: {}", path.display(), err);
            return;
        }
    };
    let entries = match fcs::open_zip(archive_name.clone(), bytes) {
        Ok(entries) => entries,
        Err(err) => {
            log::warn!("Skipping {}: {}", path.display(), err);
            return;
        }
    };
    for outcome in entries {
        match outcome {
            Ok((entry_path, content)) => {
                log::debug!("staged: {} > {}", archive_name, entry_path);
                collection.add(entry_path, Some(archive_name.clone()), content);
            }
            Err(err) => log::warn!("Skipping {}", err),
        }
    }
}

fn normalize_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().replace('\\', "/"))
        .unwrap_or_else(|| path.to_string_lossy().replace('\\', "/"))
}

/// Default output name: a single loose file or a single source archive
/// lends its stem, anything else gets a dated generic name.
fn derive_combined_name(collection: &Collection) -> String {
    let records = collection.records();
    if let [only] = records {
        if only.source_archive.is_none() {
            return format!("{}_combined.txt", stem(&only.display_name));
        }
    }
    if let Some(first) = records.first().and_then(|r| r.source_archive.as_deref()) {
        if records.iter().all(|r| r.source_archive.as_deref() == Some(first)) {
            return format!("{}_combined.txt", stem(first));
        }
    }
    format!("combined_files_{}.txt", chrono::Utc::now().format("%Y-%m-%d"))
}

/// File name without directory or extension. A name with no dot is kept
/// whole, so `Dockerfile` stays `Dockerfile`.
fn stem(name: &str) -> &str {
    let base = name.rsplit('/').next().unwrap_or(name);
    match base.rsplit_once('.') {
        Some((stem, _)) if !stem.is_empty() => stem,
        _ => base,
    }
}

fn split_output_name(input: &Path) -> PathBuf {
    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "combined".to_string());
    input.with_file_name(format!("{}_split.zip", stem))
}
