//! odiFinder command line front end
//!
//! Runs the availability engine against a saved listings page or the live
//! site and prints the claimable meals as JSON.

use std::path::{Path, PathBuf};

use anyhow::{bail, Context};
use clap::{Args, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use odi_core::{
    check_availability, Credentials, FinderSettings, MealFinder, MealRecord, Strategy,
};

#[derive(Debug, Parser)]
#[command(name = "odi-finder")]
#[command(about = "Find claimable suspended meals on getodi.com")]
struct Cli {
    /// Settings file
    #[arg(long, global = true, env = "ODI_SETTINGS", default_value = "odi_settings.json")]
    settings: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Check a saved listings page without touching the network
    Check {
        /// HTML file of the listings page
        #[arg(long)]
        html: PathBuf,
        #[command(flatten)]
        overrides: Overrides,
    },
    /// Sign in and check the live listings page once
    Run {
        #[arg(long, env = "ODI_USERNAME")]
        username: Option<String>,
        #[arg(long, env = "ODI_PASSWORD", hide_env_values = true)]
        password: String,
        #[command(flatten)]
        overrides: Overrides,
    },
    /// Write a default settings file
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

/// Per-run overrides of the saved settings
#[derive(Debug, Args)]
struct Overrides {
    /// Detection strategy: button, counter or price-widget
    #[arg(long)]
    strategy: Option<Strategy>,
    /// City plate code
    #[arg(long)]
    city: Option<String>,
    /// Restaurant to track (repeatable, comma separated lists allowed)
    #[arg(long = "restaurant")]
    restaurants: Vec<String>,
}

impl Overrides {
    fn apply(&self, settings: &mut FinderSettings) {
        if let Some(strategy) = self.strategy {
            settings.strategy = strategy;
        }
        if let Some(city) = &self.city {
            settings.city_id = city.clone();
        }
        if !self.restaurants.is_empty() {
            settings.set_restaurants(&self.restaurants.join("\n"));
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Check { html, overrides } => {
            let settings = load_settings(&cli.settings, &overrides)?;
            let page = std::fs::read_to_string(&html)
                .with_context(|| format!("cannot read {}", html.display()))?;

            let records = check_availability(
                &page,
                &settings.restaurants,
                settings.strategy,
                &settings.city_id,
            )?;
            print_records(&records)
        }
        Commands::Run {
            username,
            password,
            overrides,
        } => {
            let settings = load_settings(&cli.settings, &overrides)?;
            let username = username.unwrap_or_else(|| settings.username.clone());

            let finder = MealFinder::new()?;
            finder
                .login(&Credentials::new(username, password))
                .await
                .context("sign-in failed")?;

            let records = finder
                .check(&settings.city_id, &settings.restaurants, settings.strategy)
                .await?;
            print_records(&records)
        }
        Commands::Init { force } => {
            if cli.settings.exists() && !force {
                bail!("{} already exists, use --force to overwrite", cli.settings.display());
            }
            FinderSettings::default().save(&cli.settings)?;
            tracing::info!(path = %cli.settings.display(), "wrote default settings");
            Ok(())
        }
    }
}

fn load_settings(path: &Path, overrides: &Overrides) -> anyhow::Result<FinderSettings> {
    let mut settings = FinderSettings::load(path)?;
    overrides.apply(&mut settings);
    settings.validate()?;

    if settings.restaurants.is_empty() {
        bail!("no restaurants configured; pass --restaurant or edit {}", path.display());
    }
    tracing::debug!(restaurants = ?settings.restaurants, strategy = %settings.strategy, "settings loaded");
    Ok(settings)
}

fn print_records(records: &[MealRecord]) -> anyhow::Result<()> {
    if records.is_empty() {
        tracing::info!("no claimable meals found");
    }
    println!("{}", serde_json::to_string_pretty(records)?);
    Ok(())
}
