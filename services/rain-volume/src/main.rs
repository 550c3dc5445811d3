//! Rain volume CLI.
//!
//! Estimates how much precipitation is falling over a polygon using point
//! observations from OpenWeatherMap.

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use rain_common::{BoundingBox, Polygon};
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

use rain_volume::{plan_sampling, RainVolumeService, ReportFormatter, ServiceConfig};

#[derive(Parser, Debug)]
#[command(name = "rain-volume")]
#[command(about = "Estimate the volume of precipitation falling over an area")]
struct Cli {
    /// Path to a YAML configuration file
    #[arg(short, long, env = "RAIN_VOLUME_CONFIG")]
    config: Option<PathBuf>,

    /// Log level
    #[arg(long, default_value = "warn")]
    log_level: String,

    /// Emit logs as JSON
    #[arg(long)]
    log_json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Fetch precipitation and compute the volume over an area
    Compute {
        #[command(flatten)]
        area: AreaArgs,

        /// Sampling resolution in km (chosen from the area when omitted)
        #[arg(short, long)]
        resolution_km: Option<f64>,

        /// Skip the forecast projection
        #[arg(long)]
        no_forecast: bool,

        /// Override the number of concurrent requests
        #[arg(long)]
        concurrency: Option<usize>,

        /// Output format
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Table)]
        output: OutputFormat,
    },

    /// Show the area and sampling plan without fetching anything
    Area {
        #[command(flatten)]
        area: AreaArgs,

        /// Sampling resolution in km (chosen from the area when omitted)
        #[arg(short, long)]
        resolution_km: Option<f64>,

        /// Output format
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Table)]
        output: OutputFormat,
    },
}

#[derive(Args, Debug)]
#[group(required = true, multiple = false)]
struct AreaArgs {
    /// Polygon as WKT, e.g. "POLYGON((lon lat, ...))"
    #[arg(long)]
    wkt: Option<String>,

    /// Rectangle as "minLon,minLat,maxLon,maxLat"
    #[arg(long)]
    bbox: Option<String>,
}

impl AreaArgs {
    fn polygon(&self) -> Result<Polygon> {
        if let Some(wkt) = &self.wkt {
            return Polygon::from_wkt(wkt).context("Failed to parse --wkt");
        }
        if let Some(bbox) = &self.bbox {
            let bbox = BoundingBox::from_bbox_string(bbox).context("Failed to parse --bbox")?;
            return Polygon::from_bbox(&bbox).context("Invalid --bbox");
        }
        bail!("Either --wkt or --bbox is required")
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Table,
    Json,
}

fn init_tracing(cli: &Cli) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&cli.log_level));

    let builder = fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_level(true)
        .with_writer(std::io::stderr);

    if cli.log_json {
        builder.json().init();
    } else {
        builder.init();
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    init_tracing(&cli);

    let mut config = ServiceConfig::load(cli.config.as_deref())?;

    match cli.command {
        Commands::Compute {
            area,
            resolution_km,
            no_forecast,
            concurrency,
            output,
        } => {
            if no_forecast {
                config.forecast = false;
            }
            if let Some(n) = concurrency {
                config.fetch.max_concurrency = n;
            }

            let polygon = area.polygon()?;
            let service = RainVolumeService::openweathermap(config)
                .context("Failed to initialize rain volume service")?;

            info!(area_km2 = polygon.area_km2(), "Computing rain volume");
            let report = service.compute_rain_volume(polygon, resolution_km).await?;

            match output {
                OutputFormat::Json => println!("{}", ReportFormatter::format_json(&report)?),
                OutputFormat::Table => println!("{}", ReportFormatter::format_table(&report)),
            }
        }
        Commands::Area {
            area,
            resolution_km,
            output,
        } => {
            config.validate()?;
            let polygon = area.polygon()?;
            let plan = plan_sampling(&polygon, resolution_km, &config)?;

            match output {
                OutputFormat::Json => println!("{}", ReportFormatter::format_json(&plan)?),
                OutputFormat::Table => println!("{}", ReportFormatter::format_plan_table(&plan)),
            }
        }
    }

    Ok(())
}
