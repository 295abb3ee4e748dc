//! Cost Policy
//!
//! Estimates the monthly cost of a proposed deployment from local pricing
//! catalogs and checks the deployment against the standard policy pack.
//! Meant to run as a gate before changes are applied.

use clap::{Parser, Subcommand, ValueEnum};
use core_config::tracing::{init_tracing, install_color_eyre};
use domain_cloud_resources::ResourceGraph;
use domain_finops::{render_table, CostEstimator, CostLineItem};
use domain_policy::{standard_pack, PolicyReport};
use domain_pricing::{CatalogLoader, CloudProvider, Decimal};
use eyre::{Result, WrapErr};
use std::collections::BTreeMap;
use std::path::PathBuf;
use std::process::ExitCode;
use strum::IntoEnumIterator;
use tracing::info;

mod config;

use config::Config;

#[derive(Parser)]
#[command(name = "cost-policy")]
#[command(about = "Estimate cloud costs and enforce policies on a proposed deployment")]
struct Cli {
    /// Directory holding the pricing catalogs (overrides PRICING_DATA_DIR)
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// Monthly budget in USD per provider (overrides MAX_MONTHLY_COST)
    #[arg(long, global = true)]
    max_monthly_cost: Option<Decimal>,

    /// Print Prometheus metrics to stderr when done
    #[arg(long, global = true)]
    print_metrics: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the monthly cost breakdown of a resource graph
    Estimate {
        /// Resource graph document (JSON)
        graph: PathBuf,

        /// Only estimate this provider. Defaults to every provider in the graph.
        #[arg(short, long)]
        provider: Option<CloudProvider>,

        #[arg(short, long, value_enum, default_value_t = OutputFormat::Table)]
        format: OutputFormat,
    },

    /// Run the standard policy pack. Exits non-zero on mandatory violations.
    Check {
        /// Resource graph document (JSON)
        graph: PathBuf,

        #[arg(short, long, value_enum, default_value_t = OutputFormat::Table)]
        format: OutputFormat,
    },
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Table,
    Json,
}

fn main() -> Result<ExitCode> {
    install_color_eyre();

    let cli = Cli::parse();
    let config = Config::from_env()?.with_overrides(cli.data_dir, cli.max_monthly_cost)?;
    init_tracing(&config.environment);

    observability::init_metrics().wrap_err("Failed to install metrics recorder")?;

    info!(data_dir = %config.pricing.data_dir().display(), "Using pricing catalogs");
    let loader = CatalogLoader::from_dir(config.pricing.data_dir());

    let code = match cli.command {
        Commands::Estimate {
            graph,
            provider,
            format,
        } => {
            let graph = ResourceGraph::from_file(&graph)?;
            let providers = match provider {
                Some(p) => vec![p],
                None => providers_in(&graph),
            };
            run_estimate(&graph, &loader, &providers, format)?
        }

        Commands::Check { graph, format } => {
            let graph = ResourceGraph::from_file(&graph)?;
            let mut pack = standard_pack(loader, &config.policy);
            let report = pack.evaluate(&graph)?;
            print_report(&report, format)?;

            if report.has_mandatory() {
                ExitCode::FAILURE
            } else {
                ExitCode::SUCCESS
            }
        }
    };

    if cli.print_metrics {
        eprintln!("{}", observability::render_metrics());
    }

    Ok(code)
}

/// Providers with at least one billable resource in the graph
fn providers_in(graph: &ResourceGraph) -> Vec<CloudProvider> {
    CloudProvider::iter()
        .filter(|provider| {
            graph
                .resources()
                .iter()
                .any(|r| r.kind.is_billable() && r.kind.provider() == Some(*provider))
        })
        .collect()
}

fn run_estimate(
    graph: &ResourceGraph,
    loader: &CatalogLoader,
    providers: &[CloudProvider],
    format: OutputFormat,
) -> Result<ExitCode> {
    let mut breakdowns: BTreeMap<CloudProvider, Vec<CostLineItem>> = BTreeMap::new();
    for &provider in providers {
        let mut estimator = CostEstimator::for_provider(provider, loader)?;
        let items = estimator
            .estimate(graph)
            .wrap_err_with(|| format!("Failed to estimate {provider} costs"))?;
        breakdowns.insert(provider, items);
    }

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&breakdowns)?),
        OutputFormat::Table => {
            if breakdowns.is_empty() {
                println!("No billable resources found.");
            }
            for (provider, items) in &breakdowns {
                println!("{provider}:");
                println!("{}", render_table(items));
                println!();
            }
        }
    }

    Ok(ExitCode::SUCCESS)
}

fn print_report(report: &PolicyReport, format: OutputFormat) -> Result<()> {
    if format == OutputFormat::Json {
        println!("{}", serde_json::to_string_pretty(report)?);
        return Ok(());
    }

    for violation in &report.violations {
        let subject = match &violation.resource {
            Some(resource) => format!("{} ({resource})", violation.policy),
            None => violation.policy.clone(),
        };
        println!("[{}] {subject}: {}", violation.enforcement_level, violation.message);
    }

    println!(
        "Policy pack [{}]: {} violation(s), {} mandatory",
        report.pack,
        report.violations.len(),
        report.mandatory().count()
    );
    Ok(())
}
