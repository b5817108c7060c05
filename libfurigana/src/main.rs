use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use libfurigana::{build_engine, DiffKind, FuriganaConfig};
use std::io::Read;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

/// Furigana markup, romaji and tracked corrections for Japanese text.
#[derive(Parser)]
#[command(name = "furigana", version)]
struct Cli {
    /// TOML configuration file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Directory with jmdict.fst + jmdict.bincode (overrides the config)
    #[arg(long, global = true)]
    jmdict: Option<PathBuf>,

    /// Never query the web dictionary
    #[arg(long, global = true)]
    offline: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Print text with readings as 漢字{かんじ}
    Markup {
        /// Input file; text arguments or stdin when omitted
        #[arg(long, short)]
        file: Option<PathBuf>,
        text: Vec<String>,
    },
    /// Print a romanised transliteration
    Romaji {
        #[arg(long, short)]
        file: Option<PathBuf>,
        text: Vec<String>,
    },
    /// Token-level corrections between two files
    Diff {
        before: PathBuf,
        after: PathBuf,
        /// Print the operations as JSON
        #[arg(long)]
        json: bool,
    },
    /// Resolve one word through the dictionary
    Lookup { word: String },
}

fn read_input(file: Option<&Path>, text: &[String]) -> Result<String> {
    if let Some(path) = file {
        return std::fs::read_to_string(path).with_context(|| format!("reading {}", path.display()));
    }
    if !text.is_empty() {
        return Ok(text.join(" "));
    }
    let mut buf = String::new();
    std::io::stdin().read_to_string(&mut buf).context("reading stdin")?;
    Ok(buf.trim_end_matches('\n').to_string())
}

fn load_config(cli: &Cli) -> Result<FuriganaConfig> {
    let mut config = match &cli.config {
        Some(path) => FuriganaConfig::load_toml(path).with_context(|| format!("loading config {}", path.display()))?,
        None => FuriganaConfig::default(),
    };
    if let Some(dir) = &cli.jmdict {
        config.jmdict_dir = Some(dir.clone());
    }
    Ok(config)
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = load_config(&cli)?;
    let engine = build_engine(&config, cli.offline)?;

    match &cli.command {
        Command::Markup { file, text } => {
            let input = read_input(file.as_deref(), text)?;
            println!("{}", engine.furigana_markup(&input));
        }
        Command::Romaji { file, text } => {
            let input = read_input(file.as_deref(), text)?;
            println!("{}", engine.romaji_for_text(&input));
        }
        Command::Diff { before, after, json } => {
            let base = std::fs::read_to_string(before).with_context(|| format!("reading {}", before.display()))?;
            let current = std::fs::read_to_string(after).with_context(|| format!("reading {}", after.display()))?;
            let ops = engine.corrections(&base, &current);
            if *json {
                println!("{}", serde_json::to_string_pretty(&ops)?);
            } else {
                for op in &ops {
                    for line in op.text.split('\n') {
                        if op.kind == DiffKind::Equal && line.is_empty() {
                            continue;
                        }
                        println!("{} {}", op.kind.marker(), line);
                    }
                }
            }
        }
        Command::Lookup { word } => match engine.lookup(word) {
            Some(entry) => println!("{}\t{}\t{}", entry.word, entry.reading, entry.meaning),
            None => anyhow::bail!("no entry for {word}"),
        },
    }
    Ok(())
}
