// lanejudge: replays recorded key input against a chart and prints the
// judgment tally.

mod simulation;

use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use lane_config::PlayConfig;
use lane_input::{ScriptedInput, read_log};
use lane_model::Chart;

use simulation::Simulation;

#[derive(Parser, Debug)]
#[command(name = "lanejudge", about = "Judge a key input replay against a chart")]
struct Args {
    /// Path to a chart JSON file.
    #[arg(long)]
    chart: PathBuf,

    /// Path to a key input log (JSON array of {time, key, pressed}).
    /// Without one every note is missed.
    #[arg(long)]
    inputs: Option<PathBuf>,

    /// Path to play config JSON file.
    #[arg(long, env = "LANEJUDGE_CONFIG", default_value = "lanejudge.json")]
    config: PathBuf,

    /// Print every judgment as a JSON line while simulating.
    #[arg(long)]
    events: bool,

    /// Print the tally as JSON.
    #[arg(long)]
    json: bool,

    /// Log every judgment.
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();
    let level = if args.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();

    let config = PlayConfig::read_or_default(&args.config)?;
    let chart = Chart::read(&args.chart)?;
    let input = match &args.inputs {
        Some(path) => ScriptedInput::from_log(&read_log(path)?, &config.key_bindings()?),
        None => {
            log::info!("No input log given, nothing will be hit");
            ScriptedInput::new()
        }
    };

    let mut sim = Simulation::new(chart, input, &config)?;
    let tally = if args.events {
        while !sim.is_finished() {
            for event in sim.step()? {
                println!("{}", serde_json::to_string(&event)?);
            }
        }
        sim.into_tally()
    } else {
        sim.run()?
    };

    if args.json {
        println!("{}", serde_json::to_string_pretty(&tally)?);
    } else {
        println!("{tally}");
    }
    Ok(())
}
