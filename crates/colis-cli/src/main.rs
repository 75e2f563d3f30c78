// SPDX-License-Identifier: AGPL-3.0
// Colis CLI - Command-line frontend

use anyhow::Result;
use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};
use colis_core::{ParcelCategory, RangeKind};
use std::path::PathBuf;

mod commands;
mod view;

#[derive(Parser)]
#[command(name = "colis")]
#[command(about = "Colis CLI - Parcel requests, history and finances", long_about = None)]
struct Cli {
    /// Backend base URL for this run only
    #[arg(long, global = true)]
    api_url: Option<String>,

    /// Settings file to use instead of the default one
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Print JSON instead of text
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
pub struct SessionArgs {
    /// Phone number of the account
    #[arg(short, long)]
    pub phone: String,
}

#[derive(Args)]
pub struct RangeArgs {
    /// Preset range (day, week, month, year, all)
    #[arg(short, long)]
    pub range: Option<RangeKind>,

    /// Date the preset is taken around (YYYY-MM-DD), today by default
    #[arg(long)]
    pub anchor: Option<NaiveDate>,

    /// First day of a custom range (YYYY-MM-DD)
    #[arg(long, requires = "to")]
    pub from: Option<NaiveDate>,

    /// Last day of a custom range (YYYY-MM-DD)
    #[arg(long, requires = "from")]
    pub to: Option<NaiveDate>,
}

#[derive(Subcommand)]
enum Commands {
    /// Estimate the delivery fee between two communes
    Fee {
        /// Pickup commune
        origin: String,

        /// Delivery commune
        destination: String,

        /// Request category (single, multiple, cargo, express)
        #[arg(short, long, default_value = "single", value_parser = parse_category)]
        category: ParcelCategory,
    },

    /// List the communes served and their quartiers
    Zones {
        /// Only show this commune
        commune: Option<String>,
    },

    /// Recent parcels, the latest one in transit and recent deliveries
    Home {
        #[command(flatten)]
        session: SessionArgs,
    },

    /// Parcels of a date range with their status counts
    History {
        #[command(flatten)]
        session: SessionArgs,

        #[command(flatten)]
        range: RangeArgs,
    },

    /// Paid and unpaid amounts, delivery counts and the monthly chart
    Finances {
        #[command(flatten)]
        session: SessionArgs,

        #[command(flatten)]
        range: RangeArgs,

        /// Year of the monthly chart, the anchor's year by default
        #[arg(long)]
        year: Option<i32>,
    },

    /// Delivery counts, door fees collected and the monthly chart
    Dashboard {
        #[command(flatten)]
        session: SessionArgs,

        #[command(flatten)]
        range: RangeArgs,

        /// Year of the monthly chart, the anchor's year by default
        #[arg(long)]
        year: Option<i32>,
    },

    /// Details of one parcel
    Parcel {
        #[command(flatten)]
        session: SessionArgs,

        /// Parcel ID
        id: String,
    },

    /// Show or change the stored settings
    #[command(subcommand)]
    Settings(SettingsCommand),
}

#[derive(Subcommand)]
pub enum SettingsCommand {
    /// Print the current settings
    Show,

    /// Store a new backend base URL
    SetApiUrl { url: String },

    /// Store the range preselected on range screens
    SetRange { range: RangeKind },
}

fn parse_category(raw: &str) -> Result<ParcelCategory, String> {
    ParcelCategory::parse(raw).ok_or_else(|| format!("unknown category {:?}", raw))
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("colis_cli=info".parse()?)
                .add_directive("colis_core=info".parse()?),
        )
        .init();

    let cli = Cli::parse();
    tracing::debug!("Starting Colis CLI v{}", env!("CARGO_PKG_VERSION"));

    let ctx = commands::Context::load(cli.config, cli.api_url, cli.json)?;

    match cli.command {
        Commands::Fee {
            origin,
            destination,
            category,
        } => commands::fee(&ctx, &origin, &destination, category),
        Commands::Zones { commune } => commands::zones(&ctx, commune.as_deref()),
        Commands::Home { session } => commands::home(&ctx, &session).await,
        Commands::History { session, range } => commands::history(&ctx, &session, &range).await,
        Commands::Finances {
            session,
            range,
            year,
        } => commands::finances(&ctx, &session, &range, year).await,
        Commands::Dashboard {
            session,
            range,
            year,
        } => commands::dashboard(&ctx, &session, &range, year).await,
        Commands::Parcel { session, id } => commands::parcel(&ctx, &session, &id).await,
        Commands::Settings(cmd) => commands::settings(&ctx, cmd),
    }
}
