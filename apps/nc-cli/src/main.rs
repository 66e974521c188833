mod error;

use clap::{Args, Parser, Subcommand, ValueEnum};
use error::{AppError, AppResult};
use nc_config::{ReferenceConfig, Sector};
use nc_core::{Gas, Year, parse_year};
use nc_engine::{
    CalcContext, EngineOptions, GhgResult, Scenario, ScenarioResults, ScenarioSummary,
    evaluate_scenarios, sum_ghgs_for_scenario, summarize,
};
use nc_units::{split_value_and_unit, strip_per_year};
use serde::Deserialize;
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "nc-cli")]
#[command(about = "Neighbourhood calculator CLI - energy use and GHG emissions for development scenarios", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct ConfigArgs {
    /// Reference configuration (YAML or JSON); the built-in one if omitted
    #[arg(long)]
    config: Option<PathBuf>,
    /// Regional overrides file (YAML)
    #[arg(long, requires = "region")]
    regions: Option<PathBuf>,
    /// Region id to apply from the regions file
    #[arg(long, requires = "regions")]
    region: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate the reference configuration and any region overrides
    ValidateConfig {
        #[command(flatten)]
        config: ConfigArgs,
    },
    /// List energy sources, optionally for one sector
    Sources {
        #[arg(long, value_enum)]
        sector: Option<SectorArg>,
        #[command(flatten)]
        config: ConfigArgs,
    },
    /// Look up an emissions factor (g/MJ) for a source, gas and year
    Factor {
        /// Energy source id (e.g. grid, natGas)
        source: String,
        /// Gas symbol (CO2, CH4, N2O)
        gas: String,
        /// Year
        #[arg(value_parser = parse_year_arg)]
        year: Year,
        #[command(flatten)]
        config: ConfigArgs,
    },
    /// Convert a quantity between units, e.g. `convert "12 GJ/yr" kWh`
    Convert {
        /// Value with its unit
        quantity: String,
        /// Target unit
        to: String,
        /// Energy source the quantity belongs to (for fuel units such as L or kg)
        #[arg(long)]
        source: Option<String>,
        #[command(flatten)]
        config: ConfigArgs,
    },
    /// Evaluate scenarios from a YAML or JSON file
    Evaluate {
        /// File holding one scenario or a list of scenarios
        scenarios: PathBuf,
        /// Report emissions year by year for time-varying sources
        #[arg(long)]
        time_series: bool,
        /// Print full results as JSON
        #[arg(long)]
        json: bool,
        #[command(flatten)]
        config: ConfigArgs,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum SectorArg {
    Buildings,
    Transportation,
}

impl From<SectorArg> for Sector {
    fn from(arg: SectorArg) -> Self {
        match arg {
            SectorArg::Buildings => Sector::Buildings,
            SectorArg::Transportation => Sector::Transportation,
        }
    }
}

fn main() -> AppResult<()> {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    match cli.command {
        Commands::ValidateConfig { config } => cmd_validate_config(&config),
        Commands::Sources { sector, config } => cmd_sources(&config, sector.map(Sector::from)),
        Commands::Factor {
            source,
            gas,
            year,
            config,
        } => cmd_factor(&config, &source, &gas, year),
        Commands::Convert {
            quantity,
            to,
            source,
            config,
        } => cmd_convert(&config, &quantity, &to, source.as_deref()),
        Commands::Evaluate {
            scenarios,
            time_series,
            json,
            config,
        } => cmd_evaluate(&config, &scenarios, time_series, json),
    }
}

fn parse_year_arg(text: &str) -> Result<Year, String> {
    parse_year(text).map_err(|e| e.to_string())
}

fn build_context(args: &ConfigArgs, options: EngineOptions) -> AppResult<CalcContext> {
    let reference = match &args.config {
        Some(path) => nc_config::load_path(path)?,
        None => ReferenceConfig::builtin()?,
    };

    let regions = match &args.regions {
        Some(path) => Some(nc_config::load_regions_yaml(path)?),
        None => None,
    };
    let region = match (&regions, &args.region) {
        (Some(table), Some(id)) => Some(table.get(id)?),
        _ => None,
    };

    Ok(CalcContext::new(&reference, region, options)?)
}

fn cmd_validate_config(args: &ConfigArgs) -> AppResult<()> {
    let source = args
        .config
        .as_deref()
        .map(|p| p.display().to_string())
        .unwrap_or_else(|| "<built-in>".to_string());
    println!("Validating configuration: {}", source);

    let ctx = build_context(args, EngineOptions::default())?;
    let config = ctx.config();
    println!("✓ Configuration is valid");
    if let Some(region) = ctx.region() {
        println!("  Region: {}", region);
    }
    let span = ctx.span();
    println!("  Factor years: {}-{} ({} years)", span.start, span.end, span.len());
    println!("  Energy sources: {}", config.energy_sources.len());
    println!("  Transportation types: {}", config.transportation_types.len());
    println!("  Building energy codes: {}", config.building_energy_codes.len());
    println!("  Units: {}", ctx.units().symbols().len());
    Ok(())
}

fn cmd_sources(args: &ConfigArgs, sector: Option<Sector>) -> AppResult<()> {
    let ctx = build_context(args, EngineOptions::default())?;
    let sources: Vec<_> = match sector {
        Some(sector) => ctx.sector_sources(sector),
        None => ctx.config().energy_sources.values().collect(),
    };

    for source in sources {
        let varying = if ctx.factors().is_time_varying(&source.id)? {
            " (varies by year)"
        } else {
            ""
        };
        println!("  {} - {} [{}]{}", source.id, source.name, source.abs_unit, varying);
    }
    Ok(())
}

fn cmd_factor(args: &ConfigArgs, source: &str, gas: &str, year: Year) -> AppResult<()> {
    let ctx = build_context(args, EngineOptions::default())?;
    let gas: Gas = gas.parse()?;
    let factor = ctx.factors().factor(source, gas, year)?;
    let gwp = ctx.factors().gwp(gas)?;

    println!("{} {} in {}: {:.6e} g/MJ", source, gas, year, factor);
    if !gas.is_reference() {
        println!("  GWP {}: {} ({:.6e} g CO2e/MJ)", gas, gwp, factor * gwp);
    }
    let span = ctx.span();
    if !span.contains(year) {
        println!(
            "  note: {} is outside {}-{}, the nearest factor year was used",
            year, span.start, span.end
        );
    }
    Ok(())
}

fn cmd_convert(
    args: &ConfigArgs,
    quantity: &str,
    to: &str,
    source: Option<&str>,
) -> AppResult<()> {
    let ctx = build_context(args, EngineOptions::default())?;
    let (value, unit) = split_value_and_unit(quantity)?;
    if unit.is_empty() {
        return Err(AppError::InvalidInput(format!("'{}' has no unit", quantity)));
    }

    let converted = match source {
        Some(source_id) => ctx.units().convert_for_source(source_id, value, &unit, to)?,
        None => ctx
            .units()
            .convert(value, strip_per_year(&unit), strip_per_year(to))?,
    };
    println!("{} {} = {} {}", value, unit, converted, to);
    Ok(())
}

/// A scenario file holds either a single scenario or a list.
#[derive(Deserialize)]
#[serde(untagged)]
enum ScenarioFile {
    Many(Vec<Scenario>),
    One(Box<Scenario>),
}

impl ScenarioFile {
    fn into_vec(self) -> Vec<Scenario> {
        match self {
            ScenarioFile::Many(v) => v,
            ScenarioFile::One(s) => vec![*s],
        }
    }
}

fn load_scenarios(path: &Path) -> AppResult<Vec<Scenario>> {
    let content = std::fs::read_to_string(path).map_err(|source| AppError::ScenarioRead {
        path: path.to_path_buf(),
        source,
    })?;
    let parsed: Result<ScenarioFile, String> = match path.extension().and_then(|e| e.to_str()) {
        Some("json") => serde_json::from_str(&content).map_err(|e| e.to_string()),
        _ => serde_yaml::from_str(&content).map_err(|e| e.to_string()),
    };
    parsed
        .map(ScenarioFile::into_vec)
        .map_err(|message| AppError::ScenarioParse {
            path: path.to_path_buf(),
            message,
        })
}

fn cmd_evaluate(args: &ConfigArgs, path: &Path, time_series: bool, json: bool) -> AppResult<()> {
    let options = EngineOptions {
        track_time_variance: time_series,
    };
    let ctx = build_context(args, options)?;
    let scenarios = load_scenarios(path)?;
    tracing::info!(count = scenarios.len(), path = %path.display(), "evaluating scenarios");

    let mut results = Vec::with_capacity(scenarios.len());
    let mut failed = 0;
    for (scenario, result) in scenarios.iter().zip(evaluate_scenarios(&ctx, &scenarios)) {
        match result {
            Ok(r) => results.push(r),
            Err(e) => {
                failed += 1;
                eprintln!("✗ {}: {}", scenario.id, e);
            }
        }
    }

    if json {
        println!("{}", serde_json::to_string_pretty(&results)?);
    } else {
        for r in &results {
            print_summary(&summarize(r)?);
            if time_series {
                print_emissions_by_year(r)?;
            }
        }
    }

    if failed > 0 {
        return Err(AppError::BatchFailed {
            failed,
            total: scenarios.len(),
        });
    }
    Ok(())
}

fn print_summary(summary: &ScenarioSummary) {
    println!("\nScenario {} ({}):", summary.id, summary.year);
    println!("  Energy use:      {:.3} GJ/yr", summary.energy_use / 1000.0);
    println!("  Emissions:       {:.3} t CO2e/yr", summary.emissions);
    println!(
        "  Services:        capital {:.0}, maintenance {:.0}",
        summary.services_cap_cost, summary.services_maint_cost
    );
    println!(
        "  Infrastructure:  capital {:.0}, maintenance {:.0}",
        summary.infrastructure_cap_cost, summary.infrastructure_maint_cost
    );
    println!(
        "  Revenue:         development charges {:.0}, property taxes {:.0}",
        summary.development_charges, summary.property_taxes
    );
}

fn print_emissions_by_year(results: &ScenarioResults) -> AppResult<()> {
    match sum_ghgs_for_scenario(results)? {
        GhgResult::Constant(e) => {
            println!("  Emissions are constant: {:.3} t CO2e/yr", e.total);
        }
        GhgResult::TimeSeries(series) => {
            println!("  Emissions by year:");
            for (year, e) in series.iter() {
                println!("    {}: {:.3} t CO2e", year, e.total);
            }
        }
    }
    Ok(())
}
