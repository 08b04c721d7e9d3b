use crate::{Config, error::ForecastError, model::ForecastEnvelope};
use async_trait::async_trait;
use std::fmt::Debug;

pub mod rapidweather;

pub use rapidweather::RapidWeatherProvider;

/// Something that can answer a forecast query with an unvalidated payload.
///
/// Implementations handle transport and HTTP-status failures; payload-level
/// checks happen in [`crate::forecast::validate`].
#[async_trait]
pub trait ForecastSource: Send + Sync + Debug {
    async fn fetch_forecast(&self, city: &str) -> Result<ForecastEnvelope, ForecastError>;
}

/// Construct the forecast source described by `config`.
pub fn source_from_config(config: &Config) -> anyhow::Result<Box<dyn ForecastSource>> {
    let api_key = config.require_api_key()?;

    Ok(Box::new(RapidWeatherProvider::new(
        api_key.to_owned(),
        config.api_host.clone(),
        config.base_url(),
    )))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn source_from_config_errors_when_missing_api_key() {
        let cfg = Config::default();
        let err = source_from_config(&cfg).unwrap_err();
        assert!(err.to_string().contains("No API key configured"));
    }

    #[test]
    fn source_from_config_works_when_configured() {
        let cfg = Config {
            api_key: Some("KEY".into()),
            ..Config::default()
        };
        assert!(source_from_config(&cfg).is_ok());
    }
}
