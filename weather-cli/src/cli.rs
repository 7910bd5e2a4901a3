use std::sync::Arc;

use anyhow::{Context, anyhow, bail};
use clap::{Parser, Subcommand};
use inquire::Password;
use weather_core::{Config, SearchOutcome, WeatherSearch, provider_from_config};

use crate::output;

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "weather", version, about = "Current weather and 5-day outlook for a city")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Store the OpenWeather API key.
    Configure {
        /// Key to store; prompted for when omitted.
        #[arg(long)]
        api_key: Option<String>,
    },

    /// Show current weather and the daily outlook for a city.
    Show {
        /// City name, e.g. "London" or "New York".
        #[arg(required = true, num_args = 1..)]
        city: Vec<String>,

        /// Use this key instead of the stored one.
        #[arg(long, env = "OPENWEATHER_API_KEY", hide_env_values = true)]
        api_key: Option<String>,

        /// Print the result as JSON.
        #[arg(long)]
        json: bool,
    },
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        match self.command {
            Command::Configure { api_key } => configure(api_key),
            Command::Show { city, api_key, json } => show(&city.join(" "), api_key, json).await,
        }
    }
}

fn configure(api_key: Option<String>) -> anyhow::Result<()> {
    let mut cfg = Config::load()?;

    let key = match api_key {
        Some(key) => key,
        None => Password::new("OpenWeather API key:")
            .without_confirmation()
            .with_help_message("Get one at https://home.openweathermap.org/api_keys")
            .prompt()
            .context("Failed to read API key")?,
    };
    let key = key.trim();
    if key.is_empty() {
        bail!("API key must not be empty");
    }

    cfg.set_api_key(key.to_string());
    let path = cfg.save()?;
    println!("Saved API key to {}", path.display());

    Ok(())
}

async fn show(city: &str, api_key: Option<String>, json: bool) -> anyhow::Result<()> {
    let mut cfg = Config::load()?;
    if let Some(key) = api_key {
        cfg.set_api_key(key);
    }

    let client = provider_from_config(&cfg)?;
    let search = WeatherSearch::new(Arc::new(client));

    let report = match search.search(city).await {
        Ok(SearchOutcome::Completed(report)) => report,
        // Only one search runs per invocation.
        Ok(SearchOutcome::Superseded) => return Ok(()),
        Err(e) => return Err(anyhow!(output::describe_error(&e, city))),
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print!("{}", output::render_report(&report, &chrono::Local));
    }

    Ok(())
}
