//! CLI definition and dispatch.

use clap::{Parser, Subcommand, ValueEnum};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

use crate::adapters::csv_adapter::{write_trade_table, CsvAdapter};
use crate::adapters::file_config_adapter::FileConfigAdapter;
use crate::adapters::html_report::chart_svg::format_money;
use crate::adapters::html_report::HtmlReportAdapter;
use crate::domain::assembly::{SourceLayout, DEFAULT_STATE_COLUMN, DEFAULT_YEAR};
use crate::domain::breakdown::{CategoryBreakdown, DEFAULT_PRODUCT_COLUMN, DEFAULT_TOP_N};
use crate::domain::config_validation::{validate_config, validate_rate};
use crate::domain::error::TariffscopeError;
use crate::domain::ranking::{rank_by_total_balance, RankedState};
use crate::domain::scenario::{
    baseline, case_study, process, slider_rates, sweep, Dashboard, PipelineOptions,
    DEFAULT_SLIDER_MAX, DEFAULT_SLIDER_STEP,
};
use crate::domain::tariff::{TariffModel, EXPORT_ELASTICITY, IMPORT_ELASTICITY};
use crate::domain::trade::TradeTable;
use crate::ports::config_port::ConfigPort;
use crate::ports::report_port::ReportPort;
use crate::ports::source_port::TradeSourcePort;

pub const DEFAULT_TITLE: &str = "North American Trade Visualization";
pub const DEFAULT_OUTPUT: &str = "dashboard.html";

#[derive(Parser, Debug)]
#[command(
    name = "tariffscope",
    about = "State-level US trade balances with Canada and Mexico under tariff scenarios"
)]
pub struct Cli {
    /// Debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Table,
    Csv,
    Json,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Print the state table projected at a tariff rate
    Project {
        #[arg(short, long)]
        config: PathBuf,
        #[arg(long)]
        rate: Option<f64>,
        #[arg(long, value_enum, default_value_t = OutputFormat::Table)]
        format: OutputFormat,
    },
    /// Rank states by total trade balance
    Rank {
        #[arg(short, long)]
        config: PathBuf,
        #[arg(long)]
        rate: Option<f64>,
        #[arg(long)]
        limit: Option<usize>,
    },
    /// Show the product-category breakdown for the case-study state
    Breakdown {
        #[arg(short, long)]
        config: PathBuf,
        #[arg(long)]
        top: Option<usize>,
    },
    /// Write the HTML dashboard
    Report {
        #[arg(short, long)]
        config: PathBuf,
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Validate a configuration and its sources
    Validate {
        #[arg(short, long)]
        config: PathBuf,
    },
}

/// Log to stderr. `RUST_LOG` is honoured unless `--verbose` is given.
pub fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("tariffscope=debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("tariffscope=info"))
    };
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(io::stderr)
        .try_init();
}

pub fn run(cli: Cli) -> ExitCode {
    let result = match cli.command {
        Command::Project {
            config,
            rate,
            format,
        } => run_project(&config, rate, format),
        Command::Rank {
            config,
            rate,
            limit,
        } => run_rank(&config, rate, limit),
        Command::Breakdown { config, top } => run_breakdown(&config, top),
        Command::Report { config, output } => run_report(&config, output.as_deref()),
        Command::Validate { config } => run_validate(&config),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            (&e).into()
        }
    }
}

pub fn load_config(path: &Path) -> Result<FileConfigAdapter, TariffscopeError> {
    tracing::info!(path = %path.display(), "loading config");
    FileConfigAdapter::from_file(path).map_err(|e| TariffscopeError::ConfigParse {
        file: path.display().to_string(),
        reason: e.to_string(),
    })
}

/// Load and validate; nothing is read from the sources until this passes.
pub fn load_valid_config(path: &Path) -> Result<FileConfigAdapter, TariffscopeError> {
    let config = load_config(path)?;
    validate_config(&config)?;
    Ok(config)
}

pub fn build_options(config: &dyn ConfigPort) -> PipelineOptions {
    PipelineOptions {
        layout: SourceLayout::new(
            config.get_string_or("data", "state_column", DEFAULT_STATE_COLUMN),
            config.get_string_or("data", "year", DEFAULT_YEAR),
        ),
        model: TariffModel::new(
            config.get_double("model", "import_elasticity", IMPORT_ELASTICITY),
            config.get_double("model", "export_elasticity", EXPORT_ELASTICITY),
        ),
    }
}

/// `--rate` when given, else `[model] tariff_rate`, else 0.
pub fn resolve_rate(
    rate_override: Option<f64>,
    config: &dyn ConfigPort,
) -> Result<f64, TariffscopeError> {
    match rate_override {
        Some(rate) => {
            validate_rate(rate)
                .map_err(|reason| TariffscopeError::config_invalid("cli", "rate", reason))?;
            Ok(rate)
        }
        None => Ok(config.get_double("model", "tariff_rate", 0.0)),
    }
}

fn top_n(config: &dyn ConfigPort, top_override: Option<usize>) -> usize {
    top_override.unwrap_or_else(|| {
        usize::try_from(config.get_int("case_study", "top_n", DEFAULT_TOP_N as i64))
            .unwrap_or(DEFAULT_TOP_N)
    })
}

/// Case-study breakdowns, or an empty list when no case-study state is set.
pub fn build_breakdowns(
    config: &dyn ConfigPort,
    port: &dyn TradeSourcePort,
    options: &PipelineOptions,
    top_override: Option<usize>,
) -> Result<Vec<CategoryBreakdown>, TariffscopeError> {
    let Some(state) = config.get_string("case_study", "state") else {
        return Ok(Vec::new());
    };
    let product_column =
        config.get_string_or("case_study", "product_column", DEFAULT_PRODUCT_COLUMN);
    case_study(
        port,
        &state,
        &product_column,
        &options.layout.value_column,
        top_n(config, top_override),
    )
}

pub fn build_dashboard(
    config: &dyn ConfigPort,
    port: &dyn TradeSourcePort,
) -> Result<Dashboard, TariffscopeError> {
    let options = build_options(config);
    let base = baseline(port, &options)?;

    let selected_rate = resolve_rate(None, config)?;
    let mut rates = slider_rates(
        config.get_double("report", "slider_max", DEFAULT_SLIDER_MAX),
        config.get_double("report", "slider_step", DEFAULT_SLIDER_STEP),
    );
    if !rates.contains(&selected_rate) {
        rates.push(selected_rate);
        rates.sort_by(f64::total_cmp);
    }
    tracing::info!(rates = rates.len(), "sweeping tariff rates");
    let scenarios = sweep(&base, &options.model, &rates);

    let breakdowns = build_breakdowns(config, port, &options, None)?;

    Ok(Dashboard {
        title: config.get_string_or("report", "title", DEFAULT_TITLE),
        year: options.layout.value_column.clone(),
        model: options.model,
        scenarios,
        selected_rate,
        case_study_state: config.get_string("case_study", "state"),
        breakdowns,
        show_ranking: config.get_bool("report", "show_ranking", true),
    })
}

fn cell(value: Option<f64>) -> String {
    value
        .map(|v| format!("{v:.2}"))
        .unwrap_or_else(|| "-".to_string())
}

/// Write `table` to `writer` in the requested format.
pub fn write_projection<W: Write>(
    table: &TradeTable,
    format: OutputFormat,
    mut writer: W,
) -> Result<(), TariffscopeError> {
    match format {
        OutputFormat::Csv => write_trade_table(table, writer),
        OutputFormat::Json => {
            serde_json::to_writer_pretty(&mut writer, &table.records).map_err(|e| {
                TariffscopeError::Report {
                    reason: format!("JSON write error: {e}"),
                }
            })?;
            writeln!(writer)?;
            Ok(())
        }
        OutputFormat::Table => {
            writeln!(
                writer,
                "{:<16} {:>12} {:>12} {:>12} {:>12} {:>12} {:>12} {:>12}",
                "State", "CA Exports", "CA Imports", "MX Exports", "MX Imports", "CA Balance",
                "MX Balance", "Total"
            )?;
            for r in table.iter() {
                writeln!(
                    writer,
                    "{:<16} {:>12} {:>12} {:>12} {:>12} {:>12} {:>12} {:>12}",
                    r.state,
                    cell(r.canada_exports),
                    cell(r.canada_imports),
                    cell(r.mexico_exports),
                    cell(r.mexico_imports),
                    cell(r.canada_balance),
                    cell(r.mexico_balance),
                    cell(r.total_balance),
                )?;
            }
            Ok(())
        }
    }
}

pub fn write_ranking<W: Write>(ranking: &[RankedState], mut writer: W) -> Result<(), TariffscopeError> {
    writeln!(writer, "{:>4}  {:<16} {:>16}", "Rank", "State", "Total Balance")?;
    for ranked in ranking {
        let total = ranked
            .record
            .total_balance
            .map(|v| format_money(v, 2))
            .unwrap_or_else(|| "n/a".to_string());
        writeln!(writer, "{:>4}  {:<16} {:>16}", ranked.rank, ranked.record.state, total)?;
    }
    Ok(())
}

pub fn write_breakdown<W: Write>(
    breakdown: &CategoryBreakdown,
    mut writer: W,
) -> Result<(), TariffscopeError> {
    writeln!(writer, "{} (total {})", breakdown.title, format_money(breakdown.total, 2))?;
    for share in &breakdown.shares {
        writeln!(
            writer,
            "  {:<48} {:>16} {:>6.1}%",
            share.label,
            format_money(share.value, 2),
            share.percent
        )?;
    }
    Ok(())
}

fn run_project(
    config_path: &Path,
    rate: Option<f64>,
    format: OutputFormat,
) -> Result<(), TariffscopeError> {
    let config = load_valid_config(config_path)?;
    let rate = resolve_rate(rate, &config)?;
    let port = CsvAdapter::from_config(&config)?;
    let table = process(&port, &build_options(&config), rate)?;
    tracing::info!(states = table.len(), rate, "projection complete");
    write_projection(&table, format, io::stdout().lock())
}

fn run_rank(
    config_path: &Path,
    rate: Option<f64>,
    limit: Option<usize>,
) -> Result<(), TariffscopeError> {
    let config = load_valid_config(config_path)?;
    let rate = resolve_rate(rate, &config)?;
    let port = CsvAdapter::from_config(&config)?;
    let table = process(&port, &build_options(&config), rate)?;

    let mut ranking = rank_by_total_balance(&table);
    if let Some(limit) = limit {
        ranking.truncate(limit);
    }
    write_ranking(&ranking, io::stdout().lock())
}

fn run_breakdown(config_path: &Path, top: Option<usize>) -> Result<(), TariffscopeError> {
    let config = load_valid_config(config_path)?;
    if !config.has_key("case_study", "state") {
        return Err(TariffscopeError::config_missing("case_study", "state"));
    }
    let port = CsvAdapter::from_config(&config)?;
    let breakdowns = build_breakdowns(&config, &port, &build_options(&config), top)?;
    if breakdowns.is_empty() {
        return Err(TariffscopeError::config_invalid(
            "case_study",
            "state",
            "no category sources configured for the case-study state",
        ));
    }

    let mut out = io::stdout().lock();
    for (i, breakdown) in breakdowns.iter().enumerate() {
        if i > 0 {
            writeln!(out)?;
        }
        write_breakdown(breakdown, &mut out)?;
    }
    Ok(())
}

fn run_report(config_path: &Path, output: Option<&Path>) -> Result<(), TariffscopeError> {
    let config = load_valid_config(config_path)?;
    let output = match output {
        Some(path) => path.to_path_buf(),
        None => config
            .get_path("report", "output")
            .unwrap_or_else(|| config.resolve_path(DEFAULT_OUTPUT)),
    };

    let port = CsvAdapter::from_config(&config)?;
    let dashboard = build_dashboard(&config, &port)?;
    HtmlReportAdapter::new().write(&dashboard, &output.to_string_lossy())?;
    eprintln!("Dashboard written to: {}", output.display());
    Ok(())
}

fn run_validate(config_path: &Path) -> Result<(), TariffscopeError> {
    let config = load_valid_config(config_path)?;
    eprintln!("Config validated successfully");

    let options = build_options(&config);
    let port = CsvAdapter::from_config(&config)?;
    let table = baseline(&port, &options)?;
    let incomplete = table.iter().filter(|r| r.has_missing_flow()).count();
    eprintln!(
        "Sources OK: {} states assembled from column {:?} ({} with incomplete data)",
        table.len(),
        options.layout.value_column,
        incomplete
    );

    let breakdowns = build_breakdowns(&config, &port, &options, None)?;
    if !breakdowns.is_empty() {
        eprintln!("Case study: {} category sources", breakdowns.len());
    }
    Ok(())
}
