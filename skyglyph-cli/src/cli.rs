use std::{io, process::ExitCode, sync::Arc};

use anyhow::Context;
use clap::{Parser, Subcommand};
use inquire::{InquireError, Password, PasswordDisplayMode, Text};
use skyglyph_core::{
    Config, FetchSession, OpenWeatherProvider, WeatherProvider, provider_from_config,
};
use tracing::{debug, info};

use crate::output::{self, Format};

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "skyglyph", version, about = "Current weather for a city")]
pub struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Store the OpenWeather API key.
    Configure {
        /// Key to store; prompted for when absent.
        #[arg(long)]
        api_key: Option<String>,
    },

    /// Show current weather for a city.
    Show {
        /// City name; prompted for when absent.
        city: Option<String>,

        /// Print the result as JSON.
        #[arg(long)]
        json: bool,

        /// Request timeout in seconds, overriding the config file.
        #[arg(long)]
        timeout: Option<u64>,
    },

    /// Keep asking for cities until the prompt is cancelled.
    Interactive,
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<ExitCode> {
        match self.command {
            Command::Configure { api_key } => configure(api_key),
            Command::Show { city, json, timeout } => show(city, json, timeout).await,
            Command::Interactive => interactive().await,
        }
    }
}

fn configure(api_key: Option<String>) -> anyhow::Result<ExitCode> {
    let mut config = Config::load()?;

    let api_key = match api_key {
        Some(key) => key,
        None => Password::new("OpenWeather API key:")
            .without_confirmation()
            .with_display_mode(PasswordDisplayMode::Masked)
            .prompt()
            .context("Failed to read API key")?,
    };

    config.set_api_key(api_key);
    // Reject blank input before it lands on disk.
    config.api_key()?;

    let path = config.save()?;
    println!("Saved configuration to {}", path.display());

    Ok(ExitCode::SUCCESS)
}

async fn show(
    city: Option<String>,
    json: bool,
    timeout: Option<u64>,
) -> anyhow::Result<ExitCode> {
    let mut config = Config::load_with_env()?;
    if let Some(secs) = timeout {
        config.timeout_secs = secs;
    }

    let provider = provider_from_config(&config)?;

    let city = match city {
        Some(city) => city,
        None => prompt_city().await?.context("No city entered")?,
    };

    info!(%city, "Fetching weather");
    let outcome = provider.fetch(&city).await;

    let ok = output::report(
        &outcome,
        Format::from_json_flag(json),
        &mut io::stdout().lock(),
        &mut io::stderr().lock(),
    )?;

    if ok {
        Ok(ExitCode::SUCCESS)
    } else {
        Ok(ExitCode::FAILURE)
    }
}

async fn interactive() -> anyhow::Result<ExitCode> {
    let config = Config::load_with_env()?;
    let provider = OpenWeatherProvider::from_config(&config)?;
    let mut session = FetchSession::new(Arc::new(provider));

    while let Some(city) = prompt_city().await? {
        session.submit(city);

        while let Some(outcome) = session.next_outcome().await {
            debug!(seq = outcome.seq, city = %outcome.city, "Fetch finished");
            output::report(
                &outcome.result,
                Format::Text,
                &mut io::stdout().lock(),
                &mut io::stderr().lock(),
            )?;
            println!();
        }
    }

    Ok(ExitCode::SUCCESS)
}

/// Ask for a city. `None` when the user cancels the prompt.
async fn prompt_city() -> anyhow::Result<Option<String>> {
    let answer = tokio::task::spawn_blocking(|| Text::new("Enter city name:").prompt())
        .await
        .context("City prompt task failed")?;

    match answer {
        Ok(city) => Ok(Some(city)),
        Err(InquireError::OperationCanceled | InquireError::OperationInterrupted) => Ok(None),
        Err(e) => Err(e).context("Failed to read city"),
    }
}
