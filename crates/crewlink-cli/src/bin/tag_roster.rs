use anyhow::{Context, Result};
use clap::{ArgAction, Parser};
use crewlink_cli::logging;
use crewlink_core::{
    classify_all, load_entities, save_tagged, Roster, TagReport, GROUP_COUNT, GROUP_SIZE,
};
use std::path::PathBuf;
use std::process::ExitCode;

/// Attach taxonomy tags to every character in a harvested roster
#[derive(Parser, Debug)]
#[command(name = "tag-roster", version, about)]
struct Args {
    /// Harvested roster file
    #[arg(long, env = "CREWLINK_RAW_ROSTER", default_value = "onepiece_characters.json")]
    input: PathBuf,

    /// Where to write the tagged roster
    #[arg(long, default_value = "onepiece_characters_tagged.json")]
    output: PathBuf,

    /// Print carrier counts per tag to stderr
    #[arg(long)]
    report: bool,

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
    let entities = load_entities(&args.input)
        .with_context(|| format!("loading harvested roster {}", args.input.display()))?;
    let roster = Roster::from_entities(classify_all(&entities))
        .with_context(|| format!("checking harvested roster {}", args.input.display()))?;
    save_tagged(&args.output, roster.entities())?;
    println!("Tagged {} characters -> {}", roster.len(), args.output.display());

    if args.report {
        let report = TagReport::new(&roster);
        eprint!("{}", report);

        let dimensions = report.usable_dimensions(GROUP_SIZE).len();
        if dimensions < GROUP_COUNT {
            tracing::warn!(
                dimensions,
                "too few dimensions with {}+ carriers to build a board",
                GROUP_SIZE
            );
        }
    }
    Ok(())
}
