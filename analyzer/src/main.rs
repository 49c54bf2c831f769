use anyhow::Context;
use clap::{ArgGroup, Parser};
use generator::profile::{build_flight, render_scaled_pressure_log};
use input::samples::load_samples;
use pollucore::airquality::{mark_flight, parse_history, Pollutant};
use pollucore::extract::SCALED_PRESSURE_MARKER;
use pollucore::prelude::DEFAULT_THRESHOLD;
use report::model::DashboardModel;
use report::writer::{append_history, summary_line, write_dashboard};
use std::fs;
use std::path::PathBuf;
use workflow::config::WorkflowConfig;
use workflow::runner::Runner;

mod generator;
mod input;
mod report;
mod workflow;

#[derive(Parser)]
#[command(author, version, about = "Offline PolluSmartCell flight analyzer")]
#[command(group(ArgGroup::new("source").required(true).args(["log", "samples", "synthetic"])))]
struct Args {
    /// Raw telemetry log to extract pressure/temperature records from
    #[arg(long)]
    log: Option<PathBuf>,
    /// CSV of timestamp, altitude, temperature samples
    #[arg(long)]
    samples: Option<PathBuf>,
    /// Analyze a generated ascent instead of a file
    #[arg(long, default_value_t = false)]
    synthetic: bool,
    #[arg(long, default_value_t = 0)]
    seed: u64,
    /// Also write the generated ascent as a raw telemetry log
    #[arg(long, requires = "synthetic")]
    emit_log: Option<PathBuf>,
    /// Load a workflow config from YAML
    #[arg(long)]
    workflow: Option<PathBuf>,
    #[arg(long, default_value = SCALED_PRESSURE_MARKER)]
    marker: String,
    #[arg(long, default_value_t = DEFAULT_THRESHOLD, allow_hyphen_values = true)]
    threshold: f64,
    /// Skip malformed log records instead of aborting
    #[arg(long, default_value_t = false)]
    skip_malformed: bool,
    #[arg(long, default_value = "PM25")]
    pollutant: Pollutant,
    /// Saved air-quality history response to overlay on the flight
    #[arg(long)]
    air_quality: Option<PathBuf>,
    /// Write the dashboard model as JSON
    #[arg(long)]
    report: Option<PathBuf>,
    /// Append a one-line summary to this file
    #[arg(long)]
    history: Option<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let args = Args::parse();

    let workflow_config = if let Some(path) = &args.workflow {
        WorkflowConfig::load(path)?
    } else {
        WorkflowConfig::from_args(
            &args.marker,
            args.threshold,
            args.skip_malformed,
            args.pollutant,
        )
    };
    let runner = Runner::new(workflow_config);

    let (source, result) = if let Some(path) = &args.log {
        let text = fs::read_to_string(path)
            .with_context(|| format!("reading telemetry log {}", path.display()))?;
        (path.display().to_string(), runner.execute_log(&text)?)
    } else if let Some(path) = &args.samples {
        let rows = load_samples(path)?;
        (path.display().to_string(), runner.execute_samples(rows)?)
    } else {
        let rows = build_flight(args.seed)?;
        if let Some(path) = &args.emit_log {
            fs::write(path, render_scaled_pressure_log(&rows))
                .with_context(|| format!("writing synthetic log {}", path.display()))?;
        }
        ("synthetic".to_string(), runner.execute_samples(rows)?)
    };

    println!(
        "Flight {} -> rows {}, rejected {}, bins {}, rate points {}",
        source,
        result.rows.len(),
        result.rejected.len(),
        result.estimate.as_ref().map(|e| e.binned.len()).unwrap_or(0),
        result
            .estimate
            .as_ref()
            .map(|e| e.rate_of_change.len())
            .unwrap_or(0),
    );
    println!("{}", result.status_message());
    if let Some(query) = &result.query {
        println!("Air quality: {}", query.url(&runner.config().endpoint));
    }

    let mut model = DashboardModel::from_result(
        &result,
        &runner.config().endpoint,
        runner.metrics().snapshot(),
    );

    if let Some(path) = &args.air_quality {
        let body = fs::read_to_string(path)
            .with_context(|| format!("reading air-quality response {}", path.display()))?;
        let mut points = parse_history(&body, runner.config().pollutant)
            .with_context(|| format!("decoding air-quality response {}", path.display()))?;
        if let Some(window) = &result.window {
            mark_flight(&mut points, window);
        }
        println!(
            "{} readings: {} total, {} during flight",
            runner.config().pollutant.label(),
            points.len(),
            points.iter().filter(|p| p.during_flight).count()
        );
        model = model.with_air_quality(points);
    }

    if let Some(path) = &args.report {
        write_dashboard(&model, path)?;
    }
    if let Some(path) = &args.history {
        append_history(path, &summary_line(&source, &result))?;
    }

    Ok(())
}
