use anyhow::Context;
use clap::{Parser, Subcommand};
use inquire::{InquireError, Password, Text};
use std::{process::ExitCode, sync::Arc};
use tracing::debug;
use weather_core::{
    Config, DisplayController, Query, SearchOutcome, ViewState,
    location::locator_from_config,
    provider::provider_from_config,
};

use crate::panels::TerminalPanels;

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "weather", version, about = "Weather CLI")]
pub struct Cli {
    /// Log more (-v info, -vv debug); RUST_LOG takes precedence.
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Store the OpenWeather API key.
    Configure,

    /// Show current weather and forecast for a city.
    Show {
        /// City name, e.g. "London" or "Paris,FR".
        city: String,
    },

    /// Show weather for your current location.
    Here {
        /// Latitude; defaults to the configured location or an IP lookup.
        #[arg(long, requires = "lon", allow_negative_numbers = true)]
        lat: Option<f64>,

        /// Longitude.
        #[arg(long, requires = "lat", allow_negative_numbers = true)]
        lon: Option<f64>,
    },

    /// Search repeatedly from a prompt.
    Interactive,
}

/// Prompt input that asks for a location search instead of a city.
const HERE_COMMAND: &str = "/here";

/// Exit status for a finished search: 0 found, 1 failed, 2 not found.
fn exit_status(outcome: SearchOutcome) -> u8 {
    match outcome {
        SearchOutcome::Settled(ViewState::NotFound) => 2,
        SearchOutcome::Settled(ViewState::Error) => 1,
        SearchOutcome::Settled(_) | SearchOutcome::Superseded => 0,
    }
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<ExitCode> {
        match self.command {
            Command::Configure => {
                configure()?;
                Ok(ExitCode::SUCCESS)
            }
            Command::Show { city } => {
                let city = city.trim();
                if city.is_empty() {
                    anyhow::bail!("City name must not be empty");
                }
                let config = Config::load()?;
                let controller = build_controller(&config)?;
                let outcome = controller.search(Query::city(city)).await;
                Ok(ExitCode::from(exit_status(outcome)))
            }
            Command::Here { lat, lon } => {
                let config = Config::load()?;
                let controller = build_controller(&config)?;
                let locator = locator_from_config(&config, lat.zip(lon));
                match controller.locate_and_search(locator.as_ref()).await {
                    Ok(outcome) => Ok(ExitCode::from(exit_status(outcome))),
                    Err(err) => {
                        debug!(error = %err, "location search abandoned");
                        Ok(ExitCode::FAILURE)
                    }
                }
            }
            Command::Interactive => {
                interactive().await?;
                Ok(ExitCode::SUCCESS)
            }
        }
    }
}

fn build_controller(config: &Config) -> anyhow::Result<DisplayController> {
    let provider = provider_from_config(config)?;
    Ok(DisplayController::new(
        provider,
        Arc::new(TerminalPanels::default()),
    ))
}

fn configure() -> anyhow::Result<()> {
    let mut config = Config::load()?;

    let api_key = Password::new("OpenWeather API key:")
        .without_confirmation()
        .with_help_message("Get one at https://openweathermap.org/api")
        .prompt()
        .context("Failed to read API key")?;

    let api_key = api_key.trim();
    if api_key.is_empty() {
        anyhow::bail!("API key must not be empty");
    }

    config.set_api_key(api_key.to_string());
    config.save()?;

    println!(
        "Saved API key to {}",
        Config::config_file_path()?.display()
    );
    Ok(())
}

async fn interactive() -> anyhow::Result<()> {
    let config = Config::load()?;
    let controller = build_controller(&config)?;
    let locator = locator_from_config(&config, None);

    loop {
        let input = Text::new("Search city:")
            .with_help_message("Enter a city, /here for your location, Esc to quit")
            .prompt();

        let input = match input {
            Ok(input) => input,
            Err(InquireError::OperationCanceled | InquireError::OperationInterrupted) => break,
            Err(err) => return Err(err).context("Failed to read search input"),
        };

        match input.trim() {
            "" => continue,
            HERE_COMMAND => {
                if let Err(err) = controller.locate_and_search(locator.as_ref()).await {
                    debug!(error = %err, "location search abandoned");
                }
            }
            city => {
                controller.search(Query::city(city)).await;
            }
        }
    }

    Ok(())
}
