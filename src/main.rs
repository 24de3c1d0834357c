//! Command-line runner for the ED simulation engine.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;

use erflow::config::Config;
use erflow::models::TriageClassifier;
use erflow::simulation::{EngineOptions, SimulationEngine};

/// Emergency-department patient-flow simulation and staff rostering.
#[derive(Debug, Parser)]
#[command(name = "erflow", version, about)]
struct Cli {
    /// Path to the configuration file.
    #[arg(short, long, default_value = "config.json")]
    config: PathBuf,

    /// Simulation duration in days.
    #[arg(short, long, default_value_t = 28)]
    days: u32,

    /// RNG seed for reproducible runs.
    #[arg(short, long, default_value_t = 0)]
    seed: u64,

    /// Arrival-function label (defaults to the configured default).
    #[arg(long)]
    arrival_function: Option<String>,

    /// Triage classifier variant: CTAS, ESI, or MTS.
    #[arg(long, default_value = "CTAS")]
    triage_classifier: String,

    /// Scheduling-cycle length in days.
    #[arg(long, default_value_t = 28)]
    scheduling_period: usize,

    /// Override the nominal mean inter-arrival time, minutes.
    #[arg(long)]
    interarrival: Option<f64>,

    /// Override the number of treatment rooms.
    #[arg(long)]
    treatment_rooms: Option<u32>,

    /// Override the waiting-room capacity.
    #[arg(long)]
    waiting_capacity: Option<usize>,

    /// Directory for the hourly CSV log.
    #[arg(long, default_value = ".")]
    log_dir: PathBuf,
}

fn main() -> ExitCode {
    env_logger::init();
    let cli = Cli::parse();
    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            eprintln!("error: {error}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> erflow::Result<()> {
    let mut config = Config::from_file(&cli.config)?;

    if let Some(interarrival) = cli.interarrival {
        config.interarrival_time_mins = interarrival;
    }
    if let Some(rooms) = cli.treatment_rooms {
        config.er_treatment_rooms = rooms;
    }
    if let Some(capacity) = cli.waiting_capacity {
        config.er_capacity = capacity;
    }
    config.validate()?;

    let classifier = TriageClassifier::from_name(&cli.triage_classifier).ok_or_else(|| {
        erflow::EngineError::Config(format!(
            "unknown triage classifier '{}'; expected CTAS, ESI, or MTS",
            cli.triage_classifier
        ))
    })?;

    let options = EngineOptions {
        seed: cli.seed,
        classifier,
        arrival_function: cli.arrival_function.clone(),
        scheduling_period_days: cli.scheduling_period,
    };

    let mut engine = SimulationEngine::new(config, options)?;
    let report = engine.run_days(cli.days)?;
    let log_path = engine.write_csv(&cli.log_dir)?;

    println!("Simulation of {} complete ({} days)", report.er_name, cli.days);
    println!("  events processed:  {}", report.events_processed);
    println!("  arrivals:          {}", report.total_arrivals);
    println!("  patients treated:  {}", report.patients_treated);
    println!("  patients rejected: {}", report.patients_rejected);
    println!("  avg wait:          {:.1} min", report.avg_wait_mins);
    println!("  avg treatment:     {:.1} min", report.avg_treatment_mins);
    println!(
        "  room utilization:  {:.1}%  throughput: {:.1}%  rejection: {:.1}%",
        report.utilization.room_utilization_pct,
        report.utilization.throughput_pct,
        report.utilization.rejection_rate_pct
    );
    println!("  triage mix:");
    for (level, count) in &report.triage_counts {
        println!("    {:6} {count}", format!("{level:?}").to_uppercase());
    }
    println!("  hourly log: {}", log_path.display());
    Ok(())
}
