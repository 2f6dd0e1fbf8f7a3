mod output;

use std::io::{self, Write};
use std::process::ExitCode;

use anyhow::{Context, Result, bail};
use clap::{Parser, ValueEnum};
use text_diff::{Alignment, DiffSession, DifferencerConfig};

#[derive(Parser)]
#[command(name = "text-diff")]
#[command(about = "Compare text files line by line, recognizing block moves and copies")]
#[command(version)]
pub struct Cli {
    #[arg(help = "Path to the old/base file")]
    old: String,
    #[arg(help = "Path to the new/changed file")]
    new: String,
    #[arg(help = "Third file for a base/yours/theirs merge (not yet supported)")]
    merge_theirs: Option<String>,

    #[arg(long, short, value_enum, default_value = "text", help = "Output format")]
    format: OutputFormat,
    #[arg(long, help = "Use the fastest preset (exact-only, no move detection)")]
    fast: bool,
    #[arg(long, help = "Use the most precise preset (wider move search)")]
    precise: bool,
    #[arg(long, short, help = "Quiet mode: report only whether the files differ")]
    quiet: bool,

    #[arg(long, help = "Disable exact common prefix/suffix matching")]
    no_match_ends: bool,
    #[arg(long, help = "Disable normalized common prefix/suffix matching")]
    no_normalized_ends: bool,
    #[arg(long, help = "Align on exact hashes only, ignoring whitespace-equal lines")]
    no_align_normalized: bool,
    #[arg(long, help = "Align on every line instead of rare lines only")]
    no_rare_lines: bool,
    #[arg(long, value_name = "N", help = "Max occurrences for a line to still count as rare")]
    max_rare_occurrences: Option<u32>,
    #[arg(long, help = "Do not require equal occurrence counts on both sides for rarity")]
    no_require_same_rarity: bool,
    #[arg(long, help = "Disable block move and copy detection")]
    no_moves: bool,
    #[arg(
        long,
        value_name = "X",
        help = "Similarity credit in (0, 1] for normalized-only matches"
    )]
    lcs_normalized_similarity: Option<f64>,
}

#[derive(Clone, Copy, ValueEnum, PartialEq, Eq)]
pub enum OutputFormat {
    Text,
    SideBySide,
    Json,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(&cli) {
        Ok(code) => code,
        Err(err) => {
            eprintln!("error: {err:#}");
            ExitCode::from(2)
        }
    }
}

fn run(cli: &Cli) -> Result<ExitCode> {
    if cli.fast && cli.precise {
        bail!("Cannot use both --fast and --precise flags together");
    }
    if cli.merge_theirs.is_some() {
        bail!("three-file merge is not implemented");
    }

    let config = build_config(cli)?;

    let mut session = DiffSession::new();
    let old = session
        .load_file(&cli.old)
        .with_context(|| format!("Failed to load old file: {}", cli.old))?;
    let new = session
        .load_file(&cli.new)
        .with_context(|| format!("Failed to load new file: {}", cli.new))?;

    let alignment = session
        .diff(old, new, &config)
        .context("Failed to compute alignment")?;

    for warning in &alignment.summary.warnings {
        eprintln!("warning: {warning}");
    }

    let stdout = io::stdout();
    let mut handle = stdout.lock();

    match cli.format {
        OutputFormat::Text => {
            output::text::write_interleaved(&mut handle, &session, old, new, &alignment, cli.quiet)?;
        }
        OutputFormat::SideBySide => {
            output::side_by_side::write_side_by_side(&mut handle, &session, old, new, &alignment)?;
        }
        OutputFormat::Json => {
            text_diff::write_json_report(&mut handle, &alignment, &cli.old, &cli.new)?;
        }
    }
    handle.flush()?;

    Ok(exit_code_for(&alignment))
}

fn build_config(cli: &Cli) -> Result<DifferencerConfig> {
    let mut config = if cli.fast {
        DifferencerConfig::fastest()
    } else if cli.precise {
        DifferencerConfig::most_precise()
    } else {
        DifferencerConfig::balanced()
    };

    if cli.no_match_ends {
        config.match_ends = false;
    }
    if cli.no_normalized_ends {
        config.match_normalized_ends = false;
    }
    if cli.no_align_normalized {
        config.align_normalized_lines = false;
    }
    if cli.no_rare_lines {
        config.align_rare_lines = false;
    }
    if let Some(n) = cli.max_rare_occurrences {
        config.max_rare_occurrences = n;
    }
    if cli.no_require_same_rarity {
        config.require_same_rarity = false;
    }
    if cli.no_moves {
        config.detect_moves = false;
    }
    if let Some(x) = cli.lcs_normalized_similarity {
        config.lcs_normalized_similarity = x;
    }

    config.validate().context("Invalid configuration")?;
    Ok(config)
}

fn exit_code_for(alignment: &Alignment) -> ExitCode {
    if alignment.has_differences() {
        ExitCode::from(1)
    } else {
        ExitCode::SUCCESS
    }
}
