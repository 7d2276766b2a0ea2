use anyhow::{Context, Result};
use clap::{ArgAction, Parser};
use crewlink_cli::{config, logging, output};
use crewlink_core::{Generator, GeneratorConfig, Roster, DEFAULT_MAX_ATTEMPTS};
use std::path::PathBuf;
use std::process::ExitCode;

/// Generate a connections puzzle from a tagged roster and print it as JSON
#[derive(Parser, Debug)]
#[command(name = "generate-puzzle", version, about)]
struct Args {
    /// Seed for a reproducible puzzle; omit for a fresh one
    seed: Option<String>,

    /// Tagged roster file
    #[arg(long, env = "CREWLINK_ROSTER")]
    roster: Option<PathBuf>,

    /// Emit display cells (name and image) instead of bare member ids
    #[arg(long)]
    resolve: bool,

    /// Construction attempts before giving up
    #[arg(long, default_value_t = DEFAULT_MAX_ATTEMPTS)]
    max_attempts: usize,

    /// Single-line JSON
    #[arg(long)]
    compact: bool,

    /// More log output on stderr (-v info, -vv debug)
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
}

fn main() -> ExitCode {
    let args = Args::parse();
    logging::init(args.verbose);

    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(args: Args) -> Result<()> {
    let path = args.roster.unwrap_or_else(config::default_roster_path);
    let roster = Roster::load(&path)
        .with_context(|| format!("loading tagged roster {}", path.display()))?;

    let generator = Generator::with_config(
        &roster,
        GeneratorConfig {
            max_attempts: args.max_attempts,
        },
    );
    let puzzle = generator.generate(args.seed.as_deref())?;

    let json = if args.resolve {
        output::to_json(&puzzle.resolve(&roster), args.compact)
    } else {
        output::to_json(&puzzle, args.compact)
    }
    .context("serializing puzzle")?;
    println!("{}", json);
    Ok(())
}
