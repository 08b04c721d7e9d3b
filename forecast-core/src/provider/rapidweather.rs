use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use tracing::{debug, instrument, warn};

use crate::{
    error::ForecastError,
    model::{ErrorBody, ForecastEnvelope},
};

use super::ForecastSource;

const KEY_HEADER: &str = "x-rapidapi-key";
const HOST_HEADER: &str = "x-rapidapi-host";
const FORECAST_PATH: &str = "/data/2.5/forecast";

/// Forecast endpoint behind the RapidAPI gateway.
#[derive(Debug, Clone)]
pub struct RapidWeatherProvider {
    api_key: String,
    api_host: String,
    base_url: String,
    http: Client,
}

impl RapidWeatherProvider {
    /// No timeout is set on the client; a hung request stays pending.
    pub fn new(api_key: String, api_host: String, base_url: String) -> Self {
        Self {
            api_key,
            api_host,
            base_url: base_url.trim_end_matches('/').to_string(),
            http: Client::new(),
        }
    }

    fn forecast_url(&self) -> String {
        format!("{}{FORECAST_PATH}", self.base_url)
    }
}

#[async_trait]
impl ForecastSource for RapidWeatherProvider {
    #[instrument(skip(self), fields(host = %self.api_host))]
    async fn fetch_forecast(&self, city: &str) -> Result<ForecastEnvelope, ForecastError> {
        let url = self.forecast_url();
        debug!(url = %url, "Fetching forecast");

        let res = self
            .http
            .get(&url)
            .query(&[("q", city)])
            .header(KEY_HEADER, &self.api_key)
            .header(HOST_HEADER, &self.api_host)
            .send()
            .await
            .map_err(|e| {
                warn!(error = %e, "Forecast request failed");
                ForecastError::remote(format!("Failed to send forecast request: {e}"))
            })?;

        let status = res.status();
        let body = res.text().await.map_err(|e| {
            ForecastError::remote(format!("Failed to read forecast response body: {e}"))
        })?;

        if !status.is_success() {
            warn!(%status, body = %truncate_body(&body), "Forecast request rejected");
            return Err(http_error(status, &body));
        }

        serde_json::from_str(&body)
            .map_err(|e| ForecastError::remote(format!("Failed to parse forecast JSON: {e}")))
    }
}

/// Prefer the service's own `message`, else a generic status line.
fn http_error(status: StatusCode, body: &str) -> ForecastError {
    let message = serde_json::from_str::<ErrorBody>(body)
        .ok()
        .and_then(|b| b.message_text().map(str::to_owned))
        .unwrap_or_else(|| format!("HTTP error, status {}", status.as_u16()));

    ForecastError::Remote(message)
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    match body.char_indices().nth(MAX) {
        Some((idx, _)) => format!("{}...", &body[..idx]),
        None => body.to_string(),
    }
}
