//! Cashflow XIRR CLI
//!
//! Solves the XIRR of every series in a CSV file (`Series,Date,Amount`)
//! and prints a table, or JSON with `--json`.

use anyhow::{Context, Result};
use cashflow_xirr::cashflow::{load_series, CashFlowSeries};
use cashflow_xirr::xirr::{xnpv, LogObserver, SeriesResult, SolverConfig, Termination, XirrSolver};
use chrono::NaiveDate;
use clap::Parser;
use serde::Serialize;
use std::path::PathBuf;
use std::time::Instant;

#[derive(Debug, Parser)]
#[command(name = "cashflow_xirr", version, about = "Internal rate of return for irregular cash flows")]
struct Cli {
    /// CSV file with Date and Amount columns and an optional Series column
    input: PathBuf,

    /// Print results as JSON
    #[arg(long)]
    json: bool,

    /// JSON solver configuration; flags below override its values
    #[arg(long)]
    config: Option<PathBuf>,

    /// Lower bound of the initial bracket, percent
    #[arg(long, allow_hyphen_values = true)]
    min_rate: Option<f64>,

    /// Upper bound of the initial bracket, percent
    #[arg(long, allow_hyphen_values = true)]
    max_rate: Option<f64>,

    /// Residual and bracket-span tolerance
    #[arg(long)]
    tolerance: Option<f64>,

    /// Grid steps in the first sampling pass
    #[arg(long)]
    initial_steps: Option<usize>,

    /// Outer iterations before giving up
    #[arg(long)]
    max_iterations: Option<usize>,

    /// Also report XNPV at this annual rate, percent
    #[arg(long, allow_hyphen_values = true)]
    discount_rate: Option<f64>,

    /// Log solver progress (debug level)
    #[arg(short, long)]
    verbose: bool,
}

impl Cli {
    fn solver_config(&self) -> Result<SolverConfig> {
        let mut config = match &self.config {
            Some(path) => SolverConfig::from_json_path(path)
                .with_context(|| format!("Failed to load solver config {}", path.display()))?,
            None => SolverConfig::default(),
        };

        if let Some(min) = self.min_rate {
            config.min_rate_pct = min;
        }
        if let Some(max) = self.max_rate {
            config.max_rate_pct = max;
        }
        if let Some(tolerance) = self.tolerance {
            config.tolerance = tolerance;
        }
        if let Some(steps) = self.initial_steps {
            config.initial_steps = steps;
        }
        if let Some(iterations) = self.max_iterations {
            config.max_iterations = iterations;
        }

        config.validate()?;
        Ok(config)
    }
}

#[derive(Serialize)]
struct XirrResponse {
    series: Vec<SeriesReport>,
    execution_time_ms: u64,
}

#[derive(Serialize)]
struct SeriesReport {
    id: String,
    epoch: Option<NaiveDate>,
    flow_count: usize,
    net_amount: f64,
    xirr_pct: Option<f64>,
    termination: Option<Termination>,
    iterations: Option<usize>,
    xnpv: Option<f64>,
    error: Option<String>,
}

impl SeriesReport {
    fn new(series: &CashFlowSeries, outcome: SeriesResult, discount_rate_pct: Option<f64>) -> Self {
        let xnpv = discount_rate_pct.map(|pct| xnpv(&series.flows, pct * 0.01));
        let mut report = Self {
            id: outcome.id,
            epoch: series.epoch(),
            flow_count: series.len(),
            net_amount: series.net_amount(),
            xirr_pct: None,
            termination: None,
            iterations: None,
            xnpv,
            error: None,
        };

        match outcome.result {
            Ok(solution) => {
                if !solution.is_converged() {
                    log::warn!(
                        "[{}] {:?} after {} passes, residual {}",
                        report.id,
                        solution.termination,
                        solution.iterations,
                        solution.residual
                    );
                }
                report.xirr_pct = Some(solution.rate_pct);
                report.termination = Some(solution.termination);
                report.iterations = Some(solution.iterations);
            }
            Err(e) => report.error = Some(e.to_string()),
        }
        report
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_filter = if cli.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter)).init();

    let start = Instant::now();
    let config = cli.solver_config()?;
    let series = load_series(&cli.input)
        .with_context(|| format!("Failed to load cash flows from {}", cli.input.display()))?;
    log::info!("Loaded {} series from {}", series.len(), cli.input.display());

    let solver = XirrSolver::new(config);
    log::debug!("Solver config: {:?}", solver.config());
    let outcomes = if cli.verbose {
        solver.solve_batch_with(&series, |s| LogObserver::new(s.id.clone()))
    } else {
        solver.solve_batch(&series)
    };

    let reports: Vec<SeriesReport> = series
        .iter()
        .zip(outcomes)
        .map(|(s, outcome)| SeriesReport::new(s, outcome, cli.discount_rate))
        .collect();

    if cli.json {
        let response = XirrResponse {
            series: reports,
            execution_time_ms: start.elapsed().as_millis() as u64,
        };
        println!("{}", serde_json::to_string_pretty(&response)?);
        return Ok(());
    }

    println!(
        "{:<20} {:>6} {:>14} {:>10} {:>11} {:>5} {:>14}",
        "Series", "Flows", "Net", "XIRR %", "Status", "Iter", "XNPV"
    );
    println!("{}", "-".repeat(86));
    for r in &reports {
        let xirr = r.xirr_pct.map_or_else(|| "-".to_string(), |v| format!("{:.2}", v));
        let status = r.termination.map_or_else(|| "Failed".to_string(), |t| format!("{:?}", t));
        let iterations = r.iterations.map_or_else(|| "-".to_string(), |n| n.to_string());
        let xnpv = r.xnpv.map_or_else(|| "-".to_string(), |v| format!("{:.2}", v));
        println!(
            "{:<20} {:>6} {:>14.2} {:>10} {:>11} {:>5} {:>14}",
            r.id, r.flow_count, r.net_amount, xirr, status, iterations, xnpv
        );
        if let Some(error) = &r.error {
            println!("  {}", error);
        }
    }

    println!("\nTotal time: {:?}", start.elapsed());
    Ok(())
}
