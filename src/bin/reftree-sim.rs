//! reftree-sim — load a referral log, run the commission simulation, export.

use std::fs::File;
use std::io::BufWriter;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;

use reftree_rs::{Simulation, SimulationConfig, export, loader};

#[derive(Parser)]
#[command(name = "reftree-sim", version, about = "Referral tree commission simulator")]
struct Args {
    /// Referral log (comma-delimited, header row with ref-code columns)
    input: PathBuf,

    /// RNG seed; omit for an OS-entropy seed
    #[arg(long)]
    seed: Option<u64>,

    /// Write the populated tree as JSON
    #[arg(long, value_name = "PATH")]
    json: Option<PathBuf>,

    /// Write the populated tree as a self-contained D3 page
    #[arg(long, value_name = "PATH")]
    html: Option<PathBuf>,

    /// Benefit unit per referral signup
    #[arg(long, default_value_t = 100.0)]
    benefit: f64,

    /// Commission percent at distance 1 (halves per step)
    #[arg(long, default_value_t = 50.0)]
    first_level_percent: f64,

    /// Per-user additive acceptance probability, percent
    #[arg(long, default_value_t = 10.0)]
    pos_percent: f64,

    /// Gravity award percent, relative to the benefit unit
    #[arg(long, default_value_t = 10.0)]
    gravity_percent: f64,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    match run(Args::parse()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run(args: Args) -> reftree_rs::Result<()> {
    let records = loader::read_log(&args.input)?;
    tracing::info!(records = records.len(), input = %args.input.display(), "log loaded");

    let config = SimulationConfig {
        benefit: args.benefit,
        first_level_commission_percent: args.first_level_percent,
        pos_probability_percent: args.pos_percent,
        gravity_commission_percent: args.gravity_percent,
    };
    let sim = Simulation::new(config)?;

    let run = match args.seed {
        Some(seed) => sim.run_seeded(&records, seed)?,
        None => sim.run(&records)?,
    };
    println!("{}", run.stats);

    if let Some(path) = &args.json {
        let mut out = BufWriter::new(File::create(path)?);
        export::write_json(&run.tree, &mut out)?;
        println!("tree written to {}", path.display());
    }
    if let Some(path) = &args.html {
        let mut out = BufWriter::new(File::create(path)?);
        export::write_html(&run.tree, &mut out)?;
        println!("page written to {}", path.display());
    }

    Ok(())
}
