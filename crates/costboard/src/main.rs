//! costboard - Cloud cost dashboard toolkit

mod cli;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use costboard_core::access::normalize_path;
use costboard_core::{load_entitlements, report_path, tag_path, ReportQuery, Settings};
use costboard_types::{
    ChartType, EntitlementStatus, MetricKey, ProviderType, ReportPeriod, ReportType,
};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(
    name = "costboard",
    version,
    about = "Cloud cost dashboard toolkit",
    long_about = "Aggregates cost and usage report payloads into chart-ready series and\n\
                  checks dashboard routes against user-access entitlements.\n\
                  \n\
                  Report files are JSON payloads as served by reports/{provider}/{group}/;\n\
                  pass several files to merge them as pages, or '-' for stdin.\n\
                  \n\
                  Examples:\n\
                    costboard aggregate march.json                     # Daily cost series\n\
                    costboard aggregate march.json --group-by cluster  # Cost per cluster\n\
                    costboard trend march.json february.json --chart rolling\n\
                    costboard top march.json --group-by project --limit 3\n\
                    costboard access /aws/details --entitlements access.json\n\
                    costboard path ocp cpu --group-by project --period previous\n\
                  \n\
                  Environment Variables:\n\
                    COSTBOARD_CONFIG                 # Settings file (default: <config_dir>/costboard/config.toml)\n\
                    COSTBOARD_NO_COLOR               # Disable ANSI colors (log-friendly)\n\
                    RUST_LOG                         # Log filter (default: costboard=info)"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Settings file
    #[arg(long, global = true, env = "COSTBOARD_CONFIG")]
    config: Option<PathBuf>,

    /// Only log warnings and errors
    #[arg(long, short = 'q', global = true)]
    quiet: bool,

    /// Disable ANSI colors (log-friendly)
    #[arg(long, global = true, env = "COSTBOARD_NO_COLOR")]
    no_color: bool,
}

#[derive(Subcommand)]
enum Command {
    /// Aggregate a report into a date- or group-keyed series
    Aggregate {
        /// Report payload(s), merged as pages
        #[arg(required = true)]
        files: Vec<PathBuf>,
        /// Metric to plot: cost, usage, infrastructure_cost, markup, request
        #[arg(long, short = 'm', default_value = "cost")]
        metric: String,
        /// Group-by key; dates when omitted
        #[arg(long, short = 'g')]
        group_by: Option<String>,
        #[arg(long, value_enum, default_value_t = PeriodArg::Current)]
        period: PeriodArg,
        /// Running total instead of daily values (date series only)
        #[arg(long, value_enum, default_value_t = ChartArg::Daily)]
        chart: ChartArg,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Compare the current period against the previous one, day by day
    Trend {
        current: PathBuf,
        previous: PathBuf,
        #[arg(long, short = 'm', default_value = "cost")]
        metric: MetricKey,
        #[arg(long, value_enum, default_value_t = ChartArg::Daily)]
        chart: ChartArg,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Rank groups and fold the rest into "Others"
    Top {
        #[arg(required = true)]
        files: Vec<PathBuf>,
        #[arg(long, short = 'g')]
        group_by: String,
        #[arg(long, short = 'm', default_value = "cost")]
        metric: MetricKey,
        /// Number of groups (default: top_items_limit setting)
        #[arg(long, short = 'n')]
        limit: Option<usize>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Markup, raw and usage components of the report's cost total
    Breakdown {
        #[arg(required = true)]
        files: Vec<PathBuf>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Decide whether a dashboard route is visible
    Access {
        /// Route pathname, e.g. /aws/details
        pathname: String,
        /// Entitlement payload or record list
        #[arg(long, short = 'e', conflicts_with = "access_dir")]
        entitlements: Option<PathBuf>,
        /// Directory holding all.json, gcp.json and ibm.json user-access payloads
        #[arg(long)]
        access_dir: Option<PathBuf>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Print the API path for a report or tag query
    Path {
        provider: ProviderType,
        /// Report family: cost, storage, instance-type, database, network, cpu, memory, volume
        #[arg(default_value = "cost")]
        report_type: ReportType,
        #[arg(long, short = 'g')]
        group_by: Vec<String>,
        #[arg(long, value_enum)]
        period: Option<PeriodArg>,
        /// Extra filter, e.g. --filter limit=5
        #[arg(long, value_parser = cli::parse_key_value)]
        filter: Vec<(String, String)>,
        /// Tags path instead of a report path
        #[arg(long)]
        tags: bool,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum PeriodArg {
    Current,
    Previous,
}

impl From<PeriodArg> for ReportPeriod {
    fn from(arg: PeriodArg) -> Self {
        match arg {
            PeriodArg::Current => ReportPeriod::Current,
            PeriodArg::Previous => ReportPeriod::Previous,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
enum ChartArg {
    Daily,
    Rolling,
}

impl From<ChartArg> for ChartType {
    fn from(arg: ChartArg) -> Self {
        match arg {
            ChartArg::Daily => ChartType::Daily,
            ChartArg::Rolling => ChartType::Rolling,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // --quiet overrides RUST_LOG
    let filter = if cli.quiet {
        tracing_subscriber::EnvFilter::new("warn")
    } else {
        tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("costboard=info"))
    };
    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_ansi(!cli.no_color),
        )
        .init();

    let settings = Settings::resolve(cli.config.as_deref()).context("Failed to load settings")?;
    let no_color = cli.no_color;

    match cli.command {
        Command::Aggregate {
            files,
            metric,
            group_by,
            period,
            chart,
            json,
        } => run_aggregate(&settings, &files, &metric, group_by, period, chart, json, no_color)?,
        Command::Trend {
            current,
            previous,
            metric,
            chart,
            json,
        } => run_trend(&settings, current, previous, metric, chart, json, no_color)?,
        Command::Top {
            files,
            group_by,
            metric,
            limit,
            json,
        } => run_top(&settings, &files, &group_by, metric, limit, json, no_color)?,
        Command::Breakdown { files, json } => run_breakdown(&settings, &files, json, no_color)?,
        Command::Access {
            pathname,
            entitlements,
            access_dir,
            json,
        } => run_access(&settings, &pathname, entitlements, access_dir, json).await?,
        Command::Path {
            provider,
            report_type,
            group_by,
            period,
            filter,
            tags,
        } => run_path(provider, report_type, group_by, period, filter, tags),
    }

    Ok(())
}

// ============================================================================
// Command Handlers
// ============================================================================

#[allow(clippy::too_many_arguments)]
fn run_aggregate(
    settings: &Settings,
    files: &[PathBuf],
    metric: &str,
    group_by: Option<String>,
    period: PeriodArg,
    chart: ChartArg,
    json: bool,
    no_color: bool,
) -> Result<()> {
    let report = cli::load_report(files)?;
    let series = settings
        .aggregator()
        .aggregate(&report, metric, group_by.as_deref(), period.into())?;

    let series = if group_by.is_none() {
        costboard_core::analytics::apply_chart_type(series, chart.into())
    } else {
        series
    };

    if json {
        println!("{}", cli::to_json(&series)?);
    } else if series.is_empty() {
        println!("No data");
    } else {
        println!("{}", cli::format_series_table(&series, no_color));
    }
    Ok(())
}

fn run_trend(
    settings: &Settings,
    current: PathBuf,
    previous: PathBuf,
    metric: MetricKey,
    chart: ChartArg,
    json: bool,
    no_color: bool,
) -> Result<()> {
    let current = cli::load_report(&[current])?;
    let previous = cli::load_report(&[previous])?;

    let trend = settings
        .aggregator()
        .merge_periods(&current, &previous, metric, chart.into())?;

    if json {
        println!("{}", cli::to_json(&trend)?);
    } else {
        println!("{}", cli::format_trend_table(&trend, no_color));
    }
    Ok(())
}

fn run_top(
    settings: &Settings,
    files: &[PathBuf],
    group_by: &str,
    metric: MetricKey,
    limit: Option<usize>,
    json: bool,
    no_color: bool,
) -> Result<()> {
    let report = cli::load_report(files)?;
    let limit = limit.unwrap_or(settings.top_items_limit);
    let top = settings
        .aggregator()
        .top_items(&report, metric, group_by, limit)?;

    if json {
        println!("{}", cli::to_json(&top)?);
    } else {
        println!("{}", cli::format_top_table(&top, no_color));
    }
    Ok(())
}

fn run_breakdown(settings: &Settings, files: &[PathBuf], json: bool, no_color: bool) -> Result<()> {
    let report = cli::load_report(files)?;
    let slices = settings.aggregator().cost_breakdown(&report);

    if json {
        println!("{}", cli::to_json(&slices)?);
    } else {
        println!("{}", cli::format_breakdown_table(&slices, no_color));
    }
    Ok(())
}

async fn run_access(
    settings: &Settings,
    pathname: &str,
    entitlements: Option<PathBuf>,
    access_dir: Option<PathBuf>,
    json: bool,
) -> Result<()> {
    let gate = settings.access_gate().context("Invalid route table")?;

    let status = match (entitlements, access_dir) {
        (Some(path), _) => EntitlementStatus::Loaded(cli::load_entitlements_file(&path)?),
        (None, Some(dir)) => load_entitlements(&cli::DirAccess::new(dir)).await,
        (None, None) => EntitlementStatus::Pending,
    };

    let decision = gate.decide(pathname, &status);
    let rule = gate.routes().find(pathname);

    if json {
        let output = serde_json::json!({
            "pathname": pathname,
            "normalized": normalize_path(pathname),
            "rule": rule,
            "decision": decision,
        });
        println!("{}", cli::to_json(&output)?);
    } else {
        match rule {
            Some(rule) => tracing::info!(rule = %rule.path_prefix, "Matched route"),
            None => tracing::info!("No route matches"),
        }
        println!("{}", decision.as_str());
    }
    Ok(())
}

fn run_path(
    provider: ProviderType,
    report_type: ReportType,
    group_by: Vec<String>,
    period: Option<PeriodArg>,
    filter: Vec<(String, String)>,
    tags: bool,
) {
    let mut query = ReportQuery::new();
    if let Some(period) = period {
        query = query.for_period(period.into());
    }
    for key in group_by {
        query = query.group_by(key);
    }
    for (key, value) in filter {
        query = query.filter(key, value);
    }

    let query = query.to_query_string();
    if tags {
        println!("{}", tag_path(provider, &query));
    } else {
        println!("{}", report_path(provider, report_type, &query));
    }
}
