use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use hazardplan::config::HazardPlanConfig;
use hazardplan::engine::AssessmentRequest;
use hazardplan::insurance::InsuranceCatalog;
use hazardplan::planner::{PreparednessPlanner, PreparednessReport};
use hazardplan::{telemetry, web};
use tracing::info;

#[derive(Parser, Debug)]
#[command(
    name = "hazardplan",
    about = "Location-specific disaster risk assessment and preparedness planning",
    version
)]
struct Cli {
    /// Configuration file (defaults to <config dir>/hazardplan/config.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    /// Log at debug level
    #[arg(short, long, global = true)]
    verbose: bool,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Assess a location and print a preparedness plan
    Assess(AssessArgs),
    /// List insurance plans for a disaster category
    Insurance {
        /// Category, e.g. flood or "cold wave"
        category: String,
    },
    /// Start the HTTP service
    Serve(ServeArgs),
}

#[derive(Args, Debug)]
struct AssessArgs {
    /// City name or "lat,lon"
    #[arg(short, long)]
    location: String,
    /// Insurance policy name (defaults to the configured policy)
    #[arg(short, long)]
    policy: Option<String>,
    /// Free-text description of past incidents at the location
    #[arg(long)]
    history: Option<String>,
    /// Print the full report as JSON
    #[arg(long)]
    json: bool,
    /// Also write the JSON report to this file
    #[arg(short, long)]
    output: Option<PathBuf>,
}

#[derive(Args, Debug, Default)]
struct ServeArgs {
    /// Override the configured host for the HTTP server
    #[arg(long)]
    host: Option<String>,
    /// Override the configured port for the HTTP server
    #[arg(long)]
    port: Option<u16>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = HazardPlanConfig::load_from_path(cli.config.clone())
        .context("Failed to load configuration")?;
    telemetry::init(&config.logging, cli.verbose)?;

    match cli.command {
        Command::Assess(args) => assess(&config, args).await,
        Command::Insurance { category } => {
            let catalog = InsuranceCatalog::load(config.insurance.catalog_path.as_deref())?;
            println!("{}", catalog.describe(&category));
            Ok(())
        }
        Command::Serve(args) => {
            let planner = Arc::new(PreparednessPlanner::from_config(&config)?);
            let host = args.host.unwrap_or_else(|| config.server.host.clone());
            let port = args.port.unwrap_or(config.server.port);
            web::run(planner, &host, port).await?;
            Ok(())
        }
    }
}

async fn assess(config: &HazardPlanConfig, args: AssessArgs) -> Result<()> {
    let planner = PreparednessPlanner::from_config(config)?;

    let mut request = AssessmentRequest::new(args.location);
    request.policy = args.policy;
    request.history = args.history;

    let report = match planner.plan(&request).await {
        Ok(report) => report,
        Err(e) => {
            eprintln!("{}", e.user_message());
            return Err(e.into());
        }
    };

    if let Some(path) = &args.output {
        report
            .write_to(path)
            .with_context(|| format!("Failed to write report to {}", path.display()))?;
    }

    if args.json {
        println!("{}", report.to_json()?);
    } else {
        print_report(&report);
    }

    info!("Done");
    Ok(())
}

fn print_report(report: &PreparednessReport) {
    let assessment = &report.assessment;
    let weather = &assessment.weather_analysis;

    println!(
        "Disaster risk for {} ({})",
        assessment.location,
        assessment.coordinates.format_coordinates()
    );
    println!(
        "  Overall: {} (score {:.2}; history {}, weather {:.2})",
        assessment.aggregate.level,
        assessment.aggregate.score,
        assessment.history_risk,
        assessment.aggregate.weather_score
    );
    println!("  Max precipitation: {:.1} mm", weather.max_precip_mm);
    match weather.max_temp_c {
        Some(temp) => println!("  Max temperature: {temp:.1}°C"),
        None => println!("  Max temperature: n/a"),
    }
    println!("  Max wind: {:.2} m/s", weather.max_wind_ms);

    if weather.risks_found.is_empty() && report.reported_hazards.is_empty() {
        println!("  Hazards: none detected");
    } else {
        let labels: Vec<&str> = weather
            .risks_found
            .iter()
            .chain(report.reported_hazards.iter())
            .map(|f| f.label.as_str())
            .collect();
        println!("  Hazards: {}", labels.join(", "));
    }

    println!("\nPreparedness plan:");
    for (i, step) in report.plan.plan.iter().enumerate() {
        println!("{:>3}. {}", i + 1, step);
    }

    if !report.recommended_insurance.is_empty() {
        println!("\nInsurance options ({}):", report.insurance_category);
        for plan in &report.recommended_insurance {
            println!(
                "  - {}: {} ({})",
                plan.plan_name, plan.best_for, plan.policy_details.premium
            );
        }
    }
}
