use clap::{Parser, Subcommand};
use ds_project::{ProjectError, ProjectResult};
use ds_sim::{
    FlowBand, Pacing, PlantSnapshot, RunSummary, Runner, RunnerEvent, Score, SimOptions,
    Simulation, TemperatureBand, run_sim,
};
use std::num::NonZeroUsize;
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "ds-cli")]
#[command(about = "Dual-reservoir plant simulator", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate a scenario file
    Validate {
        /// Path to the scenario file (YAML, or JSON by extension)
        scenario_path: PathBuf,
    },
    /// Run a scenario until it terminates or the tick limit is reached
    Run {
        /// Path to the scenario file (YAML, or JSON by extension)
        scenario_path: PathBuf,
        /// Maximum number of ticks (at least 1)
        #[arg(long, default_value = "100000")]
        max_ticks: NonZeroUsize,
        /// Pace ticks against the wall clock
        #[arg(long)]
        realtime: bool,
        /// Wall-clock stretch factor when pacing (1.0 = real time)
        #[arg(long, default_value_t = 1.0, value_parser = parse_scale)]
        scale: f64,
        /// Print one JSON snapshot per tick
        #[arg(long)]
        json: bool,
    },
}

fn main() -> ProjectResult<()> {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Validate { scenario_path } => cmd_validate(&scenario_path),
        Commands::Run {
            scenario_path,
            max_ticks,
            realtime,
            scale,
            json,
        } => cmd_run(&scenario_path, max_ticks, realtime.then_some(scale), json),
    }
}

fn parse_scale(s: &str) -> Result<f64, String> {
    let scale: f64 = s.parse().map_err(|e| format!("{e}"))?;
    if scale.is_finite() && scale > 0.0 {
        Ok(scale)
    } else {
        Err(format!("scale must be a positive finite number, got {s}"))
    }
}

fn cmd_validate(scenario_path: &Path) -> ProjectResult<()> {
    println!("Validating scenario: {}", scenario_path.display());
    let scenario = ds_project::load(scenario_path)?;
    scenario.build()?;
    println!("✓ Scenario '{}' is valid", scenario.name);
    Ok(())
}

fn print_snapshot(snapshot: &PlantSnapshot) {
    match serde_json::to_string(snapshot) {
        Ok(line) => println!("{line}"),
        Err(e) => tracing::error!(error = %e, "failed to serialize snapshot"),
    }
}

fn cmd_run(
    scenario_path: &Path,
    max_ticks: NonZeroUsize,
    pacing: Option<f64>,
    json: bool,
) -> ProjectResult<()> {
    let scenario = ds_project::load(scenario_path)?;
    let simulation = scenario.build()?;
    println!(
        "Running scenario '{}' (dt = {} ms)",
        scenario.name, scenario.plant.dt
    );

    let (summary, simulation) = match pacing {
        None => run_unpaced(simulation, max_ticks, json)?,
        Some(scale) => run_paced(simulation, max_ticks, scale, json)?,
    };

    println!(
        "Ran {} ticks ({:.1} s plant time)",
        summary.steps,
        ds_core::seconds(simulation.clock().t)
    );
    match &summary.termination {
        Some(termination) => println!("Terminated: {termination}"),
        None => println!("Stopped at tick limit"),
    }
    print_score(simulation.score());
    Ok(())
}

fn run_unpaced(
    mut simulation: Simulation,
    max_ticks: NonZeroUsize,
    json: bool,
) -> ProjectResult<(RunSummary, Simulation)> {
    let options = SimOptions {
        max_steps: max_ticks.get(),
    };
    let summary = run_sim(&mut simulation, &options, |s| {
        if json {
            print_snapshot(&s.snapshot());
        }
    })?;
    Ok((summary, simulation))
}

fn run_paced(
    simulation: Simulation,
    max_ticks: NonZeroUsize,
    scale: f64,
    json: bool,
) -> ProjectResult<(RunSummary, Simulation)> {
    // The worker enforces the tick limit itself and ends with `Stopped`.
    let runner = Runner::spawn_with_limit(simulation, Pacing::Scaled(scale), max_ticks.get())?;
    let mut steps = 0;
    let mut termination = None;

    for event in runner.events.iter() {
        match event {
            RunnerEvent::Tick(snapshot) => {
                steps += 1;
                if json {
                    print_snapshot(&snapshot);
                }
            }
            RunnerEvent::Finished(t) => termination = Some(t),
            RunnerEvent::Stopped => {}
            RunnerEvent::Error { message } => {
                return Err(ProjectError::Sim(ds_sim::SimError::Backend { message }));
            }
        }
    }

    let simulation = runner.join()?;
    Ok((RunSummary { steps, termination }, simulation))
}

fn print_score(score: &Score) {
    const ROWS: [(TemperatureBand, &str); 3] = [
        (TemperatureBand::Low, "low temp"),
        (TemperatureBand::Normal, "normal temp"),
        (TemperatureBand::High, "high temp"),
    ];
    println!("Score:");
    println!("  {:<12} {:>10} {:>10} {:>10}", "", "under", "on target", "over");
    for (band, label) in ROWS {
        println!(
            "  {:<12} {:>10.2} {:>10.2} {:>10.2}",
            label,
            score.get(band, FlowBand::Under),
            score.get(band, FlowBand::OnTarget),
            score.get(band, FlowBand::Over),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scale_must_be_positive_and_finite() {
        assert_eq!(parse_scale("0.5"), Ok(0.5));
        assert!(parse_scale("0").is_err());
        assert!(parse_scale("-2").is_err());
        assert!(parse_scale("inf").is_err());
        assert!(parse_scale("fast").is_err());
    }

    #[test]
    fn zero_tick_limit_is_rejected() {
        let parsed = Cli::try_parse_from(["ds-cli", "run", "plant.yaml", "--max-ticks", "0"]);
        assert!(parsed.is_err());

        let parsed =
            Cli::try_parse_from(["ds-cli", "run", "plant.yaml", "--realtime", "--scale", "1e300"])
                .unwrap();
        match parsed.command {
            Commands::Run {
                max_ticks, scale, ..
            } => {
                assert_eq!(max_ticks.get(), 100_000);
                assert_eq!(scale, 1e300);
            }
            Commands::Validate { .. } => panic!("expected run"),
        }
    }
}
