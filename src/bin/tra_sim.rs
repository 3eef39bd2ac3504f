use clap::{Parser, ValueEnum};
use serde::Serialize;
use std::fs;
use std::io::{self, Read};
use std::path::PathBuf;
use std::process::ExitCode;
use tra_sim::journal::LogLine;
use tra_sim::report::Report;
use tra_sim::scenario::{ScenarioSpec, parse_text};
use tra_sim::sim::{Fired, SimTime};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Format {
    /// `nSwitch nLink nPair nLabel period simulate_time` + links + flows
    Text,
    /// ScenarioSpec JSON
    Json,
}

#[derive(Debug, Parser)]
#[command(
    name = "tra-sim",
    about = "Run a switch network scenario on the discrete-event simulator"
)]
struct Args {
    /// Scenario file; reads stdin when omitted
    #[arg(long)]
    input: Option<PathBuf>,

    /// Scenario format
    #[arg(long, value_enum, default_value_t = Format::Text)]
    format: Format,

    /// Override the scenario's simulate time
    #[arg(long)]
    until: Option<u64>,

    /// Do not print the per-event log lines
    #[arg(long)]
    quiet_log: bool,

    /// Print the final report as JSON instead of text
    #[arg(long)]
    json_report: bool,

    /// Write log lines and the fired-event sequence to this JSON file
    #[arg(long)]
    log_json: Option<PathBuf>,
}

#[derive(Serialize)]
struct RunLog<'a> {
    lines: &'a [LogLine],
    fired: &'a [Fired],
}

fn read_input(args: &Args) -> io::Result<String> {
    match &args.input {
        Some(path) => fs::read_to_string(path),
        None => {
            let mut raw = String::new();
            io::stdin().read_to_string(&mut raw)?;
            Ok(raw)
        }
    }
}

fn run(args: Args) -> Result<(), Box<dyn std::error::Error>> {
    let raw = read_input(&args)?;
    let spec = match args.format {
        Format::Text => parse_text(&raw)?,
        Format::Json => ScenarioSpec::from_json(&raw)?,
    };
    let until = SimTime(args.until.unwrap_or(spec.horizon));

    let mut s = spec.build()?.with_journal();
    let summary = s.run(until)?;
    tracing::info!(
        executed = summary.executed,
        now = %summary.now,
        pending = s.sim.pending(),
        "运行结束"
    );

    if !args.quiet_log {
        for line in s.log_lines() {
            println!("{line}");
        }
    }

    let report = Report::collect(&s);
    if args.json_report {
        println!("{}", report.to_json()?);
    } else {
        print!("{}", report.render_text());
    }

    if let Some(path) = &args.log_json {
        let log = RunLog {
            lines: s.log_lines(),
            fired: s.fired(),
        };
        fs::write(path, serde_json::to_string_pretty(&log)?)?;
    }
    Ok(())
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .with_file(true)
        .with_line_number(true)
        .with_target(true)
        .init();

    let args = Args::parse();
    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            tracing::error!(%err, "仿真失败");
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}
