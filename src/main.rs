//! tqsave CLI - Command-line tool for Titan Quest save files.
//!
//! This is the main entry point for the tqsave command-line application.

mod logging;

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{debug, info, warn};
use walkdir::WalkDir;

use tqsave::files::keys::{player_table, stash_table};
use tqsave::prelude::*;

use crate::logging::{init_logging, LogConfig, LogFormat};

/// tqsave - Titan Quest save file tool
#[derive(Parser)]
#[command(name = "tqsave")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Game edition used to pick field descriptors (tq, tqit, tqae)
    #[arg(short, long, global = true, env = "TQ_GAME_VERSION", default_value = "tqae", value_parser = parse_game)]
    game: GameVersion,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Log output format
    #[arg(long, global = true, value_enum, default_value_t = LogFormat::Compact)]
    log_format: LogFormat,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List the variables of a save or record file
    Dump {
        /// Input file (.chr, .dxb, .vault, or .txt/.dbr text)
        #[arg(short, long)]
        input: PathBuf,

        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },

    /// Convert between the binary and text forms
    Convert {
        /// Input file
        #[arg(short, long)]
        input: PathBuf,

        /// Output file; .txt and .dbr are written as text
        #[arg(short, long)]
        output: PathBuf,
    },

    /// Change one value of an existing variable
    Set {
        /// Input file
        #[arg(short, long)]
        input: PathBuf,

        /// Variable name (first occurrence)
        #[arg(short, long)]
        name: String,

        /// New value in text form
        #[arg(long)]
        value: String,

        /// Value index within the variable
        #[arg(long, default_value_t = 0)]
        index: usize,

        /// Output file (defaults to overwriting the input)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Show a character summary
    Info {
        /// Path to Player.chr
        #[arg(short, long)]
        input: PathBuf,

        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },

    /// Check that every save file under a folder re-encodes to identical bytes
    Verify {
        /// Save folder to scan
        #[arg(short, long, env = "TQ_SAVE_DIR")]
        dir: PathBuf,
    },
}

fn parse_game(value: &str) -> std::result::Result<GameVersion, String> {
    value.parse()
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = LogConfig::from_verbosity(cli.verbose).with_format(cli.log_format);
    init_logging(&config).context("Failed to initialize logging")?;
    tqsave::files::validate_descriptor_tables().context("Invalid descriptor tables")?;

    match cli.command {
        Commands::Dump { input, json } => cmd_dump(&input, cli.game, json)?,
        Commands::Convert { input, output } => cmd_convert(&input, &output, cli.game)?,
        Commands::Set {
            input,
            name,
            value,
            index,
            output,
        } => cmd_set(&input, &name, &value, index, output.as_deref(), cli.game)?,
        Commands::Info { input, json } => cmd_info(&input, cli.game, json)?,
        Commands::Verify { dir } => cmd_verify(&dir, cli.game)?,
    }

    Ok(())
}

/// Type hints for a file, chosen from its name.
fn hints_for(path: &Path, version: GameVersion) -> Result<Box<dyn TypeHints>> {
    let name = path.file_name().and_then(|n| n.to_str()).unwrap_or_default();
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase)
        .unwrap_or_default();

    let hints: Box<dyn TypeHints> = if StashKind::from_file_name(name).is_some() || extension == "dxb" {
        Box::new(stash_table()?.hints(version))
    } else if matches!(extension.as_str(), "chr" | "vault") {
        Box::new(player_table()?.hints(version))
    } else {
        Box::new(NoHints)
    };
    Ok(hints)
}

fn read_collection(path: &Path, hints_path: &Path, version: GameVersion) -> Result<RecordCollection> {
    let format = Format::from_path(path);
    let hints = hints_for(hints_path, version)?;
    let provider = RecordCollectionProvider::new(format);

    provider
        .read_file(path, &*hints)
        .with_context(|| format!("Failed to read {}", path.display()))
}

fn write_collection(collection: &RecordCollection, path: &Path) -> Result<PathBuf> {
    let folder = path.parent().unwrap_or_else(|| Path::new(""));
    let file_name = path
        .file_name()
        .and_then(|n| n.to_str())
        .with_context(|| format!("Invalid output path {}", path.display()))?;

    RecordCollectionProvider::new(Format::from_path(path))
        .write(collection, folder, Some(file_name))
        .with_context(|| format!("Failed to write {}", path.display()))
}

fn cmd_dump(input: &Path, version: GameVersion, json: bool) -> Result<()> {
    let collection = read_collection(input, input, version)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&collection)?);
        return Ok(());
    }

    for (index, variable) in collection.iter().enumerate() {
        let values: Vec<String> = variable.values().iter().map(ToString::to_string).collect();
        println!(
            "{:>5} {:<32} {:<10} {}",
            index,
            variable.name(),
            variable.data_type(),
            values.join(";")
        );
    }

    println!("\nTotal: {} variables", collection.len());

    Ok(())
}

fn cmd_convert(input: &Path, output: &Path, version: GameVersion) -> Result<()> {
    println!("Converting: {} -> {}", input.display(), output.display());

    // The binary side decides which descriptors apply.
    let hints_path = match Format::from_path(input) {
        Format::Binary => input,
        Format::Text => output,
    };
    let collection = read_collection(input, hints_path, version)?;
    let written = write_collection(&collection, output)?;

    println!("Wrote {} variables to {}", collection.len(), written.display());

    Ok(())
}

fn cmd_set(
    input: &Path,
    name: &str,
    value: &str,
    index: usize,
    output: Option<&Path>,
    version: GameVersion,
) -> Result<()> {
    let output = output.unwrap_or(input);
    let mut collection = read_collection(input, input, version)?;

    let variable = collection
        .get_mut(name)
        .with_context(|| format!("No variable named {name:?} in {}", input.display()))?;
    let previous = variable.value(index)?.to_string();
    variable
        .set_text(index, value)
        .with_context(|| format!("Failed to set {name}[{index}]"))?;
    info!(name, index, %previous, new = value, "updated variable");

    let written = write_collection(&collection, output)?;
    println!("{name}[{index}]: {previous} -> {value} ({})", written.display());

    Ok(())
}

fn cmd_info(input: &Path, version: GameVersion, json: bool) -> Result<()> {
    let bytes = fs::read(input).with_context(|| format!("Failed to read {}", input.display()))?;
    let player = PlayerFile::parse(&bytes, version).context("Failed to parse character file")?;

    if json {
        println!("{}", serde_json::to_string_pretty(player.summary())?);
    } else {
        println!("{}", player.summary());
    }

    Ok(())
}

/// Outcome of re-encoding one file.
#[derive(Debug, PartialEq, Eq)]
enum Verified {
    Identical,
    Mismatch { offset: usize },
}

fn verify_file(path: &Path, version: GameVersion) -> Result<Verified> {
    let bytes = fs::read(path)?;
    let hints = hints_for(path, version)?;
    let id = path.file_name().map(|n| n.to_string_lossy().into_owned()).unwrap_or_default();

    let collection = BinaryCodec.decode(RecordId::new(id), &bytes, &*hints)?;
    let encoded = BinaryCodec.encode(&collection)?;

    if encoded == bytes {
        return Ok(Verified::Identical);
    }
    let offset = encoded
        .iter()
        .zip(&bytes)
        .position(|(a, b)| a != b)
        .unwrap_or_else(|| encoded.len().min(bytes.len()));
    Ok(Verified::Mismatch { offset })
}

fn is_save_file(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| ["chr", "dxb", "vault"].iter().any(|x| e.eq_ignore_ascii_case(x)))
}

fn cmd_verify(dir: &Path, version: GameVersion) -> Result<()> {
    println!("Scanning: {}", dir.display());

    let files: Vec<PathBuf> = WalkDir::new(dir)
        .into_iter()
        .filter_map(|entry| match entry {
            Ok(entry) => Some(entry),
            Err(e) => {
                warn!(error = %e, "skipping unreadable entry");
                None
            }
        })
        .filter(|entry| entry.file_type().is_file() && is_save_file(entry.path()))
        .map(|entry| entry.into_path())
        .collect();

    println!("Verifying {} files...", files.len());

    let pb = ProgressBar::new(files.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({eta})")?
            .progress_chars("#>-"),
    );

    let start = Instant::now();
    let mut identical = 0;
    let mut mismatches = 0;
    let mut errors = 0;

    for path in &files {
        match verify_file(path, version) {
            Ok(Verified::Identical) => {
                debug!(path = %path.display(), "identical");
                identical += 1;
            }
            Ok(Verified::Mismatch { offset }) => {
                pb.println(format!("Mismatch {} at offset {:#x}", path.display(), offset));
                mismatches += 1;
            }
            Err(e) => {
                pb.println(format!("Error {}: {:#}", path.display(), e));
                errors += 1;
            }
        }
        pb.inc(1);
    }

    pb.finish_with_message("Done");
    println!(
        "Verified {} files in {:?}: {} identical, {} mismatched, {} errors",
        files.len(),
        start.elapsed(),
        identical,
        mismatches,
        errors
    );

    if mismatches + errors > 0 {
        bail!("{} of {} files did not round-trip", mismatches + errors, files.len());
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stash_bytes() -> Vec<u8> {
        let collection = RecordCollection::with_variables(
            "winsys.dxb",
            vec![
                Variable::integer("sackWidth", 18),
                Variable::float("xOffset", 1.5),
                Variable::string("fName", "12"),
            ],
        );
        BinaryCodec.encode(&collection).unwrap()
    }

    #[test]
    fn test_hints_follow_file_name() {
        let stash = hints_for(Path::new("Sys/winsys.dxb"), GameVersion::TQAE).unwrap();
        assert_eq!(stash.data_type("xOffset"), Some(DataType::Float));

        let vault = hints_for(Path::new("Main.VAULT"), GameVersion::TQAE).unwrap();
        assert_eq!(vault.data_type("myPlayerName"), Some(DataType::WideString));

        let text = hints_for(Path::new("dump.txt"), GameVersion::TQAE).unwrap();
        assert_eq!(text.data_type("xOffset"), None);
    }

    #[test]
    fn test_verify_and_convert() {
        let dir = tempfile::tempdir().unwrap();
        let stash = dir.path().join("winsys.dxb");
        fs::write(&stash, stash_bytes()).unwrap();
        assert_eq!(verify_file(&stash, GameVersion::TQAE).unwrap(), Verified::Identical);

        let text = dir.path().join("winsys.txt");
        cmd_convert(&stash, &text, GameVersion::TQAE).unwrap();
        assert_eq!(
            fs::read_to_string(&text).unwrap(),
            "sackWidth,18,\r\nxOffset,1.500000,\r\nfName,12,\r\n"
        );

        let back = dir.path().join("copy").join("winsys.dxb");
        cmd_convert(&text, &back, GameVersion::TQAE).unwrap();
        assert_eq!(fs::read(&back).unwrap(), stash_bytes());
    }

    #[test]
    fn test_set_writes_new_value() {
        let dir = tempfile::tempdir().unwrap();
        let stash = dir.path().join("winsys.dxb");
        fs::write(&stash, stash_bytes()).unwrap();

        cmd_set(&stash, "sackWidth", "20", 0, None, GameVersion::TQAE).unwrap();
        let collection = read_collection(&stash, &stash, GameVersion::TQAE).unwrap();
        assert_eq!(collection.get("sackWidth").unwrap().get_i32(0).unwrap(), 20);
        assert!(cmd_set(&stash, "sackWidth", "wide", 0, None, GameVersion::TQAE).is_err());
        assert!(cmd_set(&stash, "missing", "1", 0, None, GameVersion::TQAE).is_err());
    }

    #[test]
    fn test_save_file_extensions() {
        assert!(is_save_file(Path::new("a/Player.chr")));
        assert!(is_save_file(Path::new("WINSYS.DXB")));
        assert!(!is_save_file(Path::new("notes.txt")));
    }
}
