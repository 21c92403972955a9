use clap::{Parser, ValueEnum};
use navflow::inspect::FlowSnapshot;
use navflow::prelude::*;
use navflow::script::ScriptRunner;
use std::time::Instant;
use tracing_subscriber::EnvFilter;

/// How the final graph is printed.
#[derive(Debug, Clone, Copy, ValueEnum)]
enum OutputFormat {
    Tree,
    Json,
}

/// Replays a navigation script and shows the resulting destination graph
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Cli {
    /// Path to the navigation script JSON file
    script_path: String,
    /// Optional path to a flow options JSON file
    #[arg(short, long)]
    options: Option<String>,

    /// How to print the final graph
    #[arg(short, long, value_enum, default_value = "tree")]
    format: OutputFormat,

    /// Print every transition handed to the adapter
    #[arg(short, long)]
    transitions: bool,

    /// Log filter, e.g. `navflow=debug`. Falls back to RUST_LOG.
    #[arg(long)]
    log: Option<String>,
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.log.as_deref());

    let total_start = Instant::now();

    // --- 1. Loading ---
    let options = match &cli.options {
        Some(path) => FlowOptions::from_file(path)
            .unwrap_or_else(|e| exit_with_error(&format!("Failed to load options '{}': {}", path, e))),
        None => FlowOptions::default(),
    };
    let mut runner = ScriptRunner::from_file(&cli.script_path, options).unwrap_or_else(|e| {
        exit_with_error(&format!(
            "Failed to load script '{}': {}",
            &cli.script_path, e
        ))
    });

    // --- 2. Replay ---
    println!("\nReplaying navigation script...");
    let run_start = Instant::now();
    let reports = runner.run();
    let run_duration = run_start.elapsed();

    for report in &reports {
        match (&report.error, &report.destination) {
            (Some(error), _) => println!("  [{:>2}] {:<32} failed: {}", report.index, report.action, error),
            (None, Some(destination)) => {
                println!("  [{:>2}] {:<32} -> {}", report.index, report.action, destination)
            }
            (None, None) => println!("  [{:>2}] {}", report.index, report.action),
        }
    }

    if cli.transitions {
        println!("\n--- Transitions ---");
        for record in runner.transitions() {
            println!("{}", record);
        }
    }

    // --- 3. Result ---
    let flow = runner.flow();
    match cli.format {
        OutputFormat::Tree => {
            println!("\n--- Destination Graph ---");
            print!("{}", GraphFormatter::new(flow));
        }
        OutputFormat::Json => {
            let json = FlowSnapshot::capture(flow)
                .to_json()
                .unwrap_or_else(|e| exit_with_error(&format!("Failed to serialize snapshot: {}", e)));
            println!("{}", json);
        }
    }

    let failed = reports.iter().filter(|report| report.error.is_some()).count();
    println!("\n--- Summary ---");
    println!("Steps:                {}", reports.len());
    println!("Failed Steps:         {}", failed);
    println!("Active Destinations:  {}", flow.active_destinations().len());
    println!("Pending Transitions:  {}", flow.pending_presentations().len());
    println!("Replay:               {:?}", run_duration);
    println!("Total Execution:      {:?}", total_start.elapsed());
    println!();
}

fn init_tracing(filter: Option<&str>) {
    let filter = filter
        .map(EnvFilter::new)
        .unwrap_or_else(|| EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

fn exit_with_error(message: &str) -> ! {
    eprintln!("\nError: {}", message);
    std::process::exit(1);
}
