use std::process::ExitCode;

use anyhow::Context;
use clap::{Parser, Subcommand, ValueEnum};
use forecast_core::{Config, ForecastPipeline, Format, UiState};
use inquire::{InquireError, Password, PasswordDisplayMode, Text};
use tracing::{debug, warn};

use crate::view::print_regions;

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "forecast", version, about = "City weather forecast")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Configure API credentials and the default city.
    Configure,

    /// Show today's weather and the next days for a city.
    Show {
        /// City name, e.g. "Paris" or "London,UK". Defaults to the configured city.
        city: Option<String>,

        #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },

    /// Look up the default city, then prompt for more cities until cancelled.
    Interactive {
        #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Text,
    Html,
}

impl From<OutputFormat> for Format {
    fn from(value: OutputFormat) -> Self {
        match value {
            OutputFormat::Text => Format::Text,
            OutputFormat::Html => Format::Html,
        }
    }
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<ExitCode> {
        match self.command {
            Command::Configure => configure(),
            Command::Show { city, format } => {
                let config = Config::load()?;
                debug!(api_host = %config.api_host, "Loaded configuration");
                let pipeline = ForecastPipeline::from_config(&config)?.with_format(format.into());
                let ui = UiState::new();

                ui.set_input(city.unwrap_or_else(|| config.default_city.clone()));
                let result = pipeline.run_input(&ui).await;
                if let Err(e) = &result {
                    warn!(error = %e, "Lookup failed");
                }
                print_regions(&ui.snapshot());

                Ok(if result.is_ok() { ExitCode::SUCCESS } else { ExitCode::FAILURE })
            }
            Command::Interactive { format } => interactive(format.into()).await,
        }
    }
}

fn configure() -> anyhow::Result<ExitCode> {
    let mut config = Config::load()?;

    let api_key = Password::new("API key:")
        .with_display_mode(PasswordDisplayMode::Masked)
        .without_confirmation()
        .prompt()
        .context("Failed to read API key")?;
    let api_host = Text::new("API host:")
        .with_default(&config.api_host)
        .prompt()
        .context("Failed to read API host")?;
    let default_city = Text::new("Default city:")
        .with_default(&config.default_city)
        .prompt()
        .context("Failed to read default city")?;

    config.api_key = Some(api_key.trim().to_string());
    config.api_host = api_host.trim().to_string();
    config.default_city = default_city.trim().to_string();

    let path = config.save()?;
    println!("Configuration saved to {}", path.display());

    Ok(ExitCode::SUCCESS)
}

async fn interactive(format: Format) -> anyhow::Result<ExitCode> {
    let config = Config::load()?;
    let pipeline = ForecastPipeline::from_config(&config)?.with_format(format);
    let ui = UiState::new();

    // Start-up lookup.
    ui.set_input(config.default_city.clone());
    if let Err(e) = pipeline.run_input(&ui).await {
        warn!(error = %e, city = %config.default_city, "Start-up lookup failed");
    }
    print_regions(&ui.snapshot());

    loop {
        let line = match Text::new("City:").prompt() {
            Ok(line) => line,
            Err(InquireError::OperationCanceled | InquireError::OperationInterrupted) => break,
            Err(e) => return Err(e).context("Failed to read city"),
        };

        println!();
        ui.set_input(line);
        if let Err(e) = pipeline.run_input(&ui).await {
            warn!(error = %e, "Lookup failed");
        }
        print_regions(&ui.snapshot());
    }

    Ok(ExitCode::SUCCESS)
}
