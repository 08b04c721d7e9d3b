use std::sync::Arc;

use tracing::{debug, info, instrument, warn};

use crate::{
    Config,
    convert::ViewerZone,
    error::ForecastError,
    forecast::{extract, validate},
    model::DisplayForecast,
    provider::{ForecastSource, source_from_config},
    render::{CardRenderer, Format, TemplateError},
    ui::UiState,
};

/// How a run that did not fail ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunOutcome {
    /// The result was written to the UI.
    Rendered,
    /// A newer run started meanwhile; the result was dropped.
    Superseded,
}

/// Input resolution, fetch, validation and render for one city query.
#[derive(Debug, Clone)]
pub struct ForecastPipeline {
    source: Arc<dyn ForecastSource>,
    success_code: String,
    zone: ViewerZone,
    format: Format,
    renderer: Arc<CardRenderer>,
}

impl ForecastPipeline {
    pub fn new(source: Arc<dyn ForecastSource>) -> Result<Self, TemplateError> {
        Ok(Self {
            source,
            success_code: crate::config::DEFAULT_SUCCESS_CODE.to_string(),
            zone: ViewerZone::System,
            format: Format::default(),
            renderer: Arc::new(CardRenderer::new()?),
        })
    }

    pub fn from_config(config: &Config) -> anyhow::Result<Self> {
        let source: Arc<dyn ForecastSource> = Arc::from(source_from_config(config)?);
        Ok(Self::new(source)?
            .with_success_code(config.success_code.clone())
            .with_zone(config.viewer_zone()?))
    }

    pub fn with_success_code(mut self, code: impl Into<String>) -> Self {
        self.success_code = code.into();
        self
    }

    pub fn with_zone(mut self, zone: ViewerZone) -> Self {
        self.zone = zone;
        self
    }

    pub fn with_format(mut self, format: Format) -> Self {
        self.format = format;
        self
    }

    /// Look up `city_query` and render the outcome into `ui`.
    ///
    /// Failures are rendered into the error region and also returned, unless
    /// the run was superseded, in which case nothing is written.
    #[instrument(skip(self, ui))]
    pub async fn run(&self, ui: &UiState, city_query: &str) -> Result<RunOutcome, ForecastError> {
        let ticket = ui.start_run();

        let rendered = self.load(city_query).await.and_then(|forecast| {
            let (today, cards) = self.render_cards(&forecast).map_err(|e| {
                ForecastError::remote(format!("Failed to render forecast: {e}"))
            })?;
            Ok((forecast.today.location, today, cards))
        });

        match rendered {
            Ok((location, today, cards)) => {
                if ui.commit_success(ticket, today, &cards) {
                    info!(location = %location, days = cards.len(), "Forecast rendered");
                    Ok(RunOutcome::Rendered)
                } else {
                    debug!("Discarding superseded forecast");
                    Ok(RunOutcome::Superseded)
                }
            }
            Err(err) => {
                if ui.commit_failure(ticket, &err.user_message()) {
                    warn!(error = %err, "Forecast lookup failed");
                    Err(err)
                } else {
                    debug!(error = %err, "Discarding superseded failure");
                    Ok(RunOutcome::Superseded)
                }
            }
        }
    }

    fn render_cards(
        &self,
        forecast: &DisplayForecast,
    ) -> Result<(String, Vec<String>), TemplateError> {
        let today = self.renderer.today_card(&forecast.today, self.format)?;
        let cards = forecast
            .days
            .iter()
            .map(|day| self.renderer.day_card(day, self.format))
            .collect::<Result<Vec<_>, _>>()?;
        Ok((today, cards))
    }

    /// [`Self::run`] with whatever the input currently holds.
    pub async fn run_input(&self, ui: &UiState) -> Result<RunOutcome, ForecastError> {
        let query = ui.input_value();
        self.run(ui, &query).await
    }

    /// Fetch, validate and project without touching any UI.
    pub async fn load(&self, city_query: &str) -> Result<DisplayForecast, ForecastError> {
        let city = city_query.trim();
        if city.is_empty() {
            return Err(ForecastError::Validation);
        }

        let envelope = self.source.fetch_forecast(city).await?;
        let raw = validate(envelope, &self.success_code)?;
        extract(&raw, self.zone)
    }
}

#[cfg(test)]
mod tests {
    use std::{
        collections::HashMap,
        sync::atomic::{AtomicUsize, Ordering},
        time::Duration,
    };

    use async_trait::async_trait;
    use serde_json::{Value, json};

    use super::*;
    use crate::{model::ForecastEnvelope, ui::PipelineStatus};

    #[derive(Debug, Default)]
    struct FakeSource {
        replies: HashMap<String, (Duration, Result<Value, ForecastError>)>,
        calls: AtomicUsize,
    }

    impl FakeSource {
        fn reply(mut self, city: &str, delay_ms: u64, reply: Result<Value, ForecastError>) -> Self {
            self.replies
                .insert(city.to_string(), (Duration::from_millis(delay_ms), reply));
            self
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl ForecastSource for FakeSource {
        async fn fetch_forecast(&self, city: &str) -> Result<ForecastEnvelope, ForecastError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let (delay, reply) = self
                .replies
                .get(city)
                .cloned()
                .unwrap_or_else(|| (Duration::ZERO, Err(ForecastError::remote("city not found"))));
            tokio::time::sleep(delay).await;
            reply.map(|body| serde_json::from_value(body).unwrap())
        }
    }

    fn payload(city: &str, points: usize) -> Value {
        let list: Vec<Value> = (0..points)
            .map(|i| {
                json!({
                    "dt": 1_705_276_800 + i as i64 * 10_800,
                    "main": { "temp": 280.0, "feels_like": 278.0, "humidity": 70 },
                    "wind": { "speed": 3.0 },
                    "weather": [{ "description": "clear sky", "icon": "01d" }]
                })
            })
            .collect();
        json!({
            "cod": "200",
            "message": 0,
            "list": list,
            "city": { "name": city, "country": "GB", "sunrise": 1_705_304_700, "sunset": 1_705_336_200 }
        })
    }

    fn pipeline(source: Arc<FakeSource>) -> ForecastPipeline {
        ForecastPipeline::new(source)
            .expect("embedded templates compile")
            .with_zone(ViewerZone::from_offset_minutes(0).unwrap())
    }

    #[tokio::test]
    async fn blank_input_never_fetches() {
        let source = Arc::new(FakeSource::default());
        let pipeline = pipeline(source.clone());
        let ui = UiState::new();

        for query in ["", "   ", "\t\n"] {
            let err = pipeline.run(&ui, query).await.unwrap_err();
            assert_eq!(err, ForecastError::Validation);
            assert_eq!(ui.snapshot().error.content(), "Please enter a city name.");
        }
        assert_eq!(source.calls(), 0);
        assert_eq!(ui.status(), PipelineStatus::Failed);
    }

    #[tokio::test]
    async fn success_renders_today_and_strip() {
        let source = Arc::new(FakeSource::default().reply("London", 0, Ok(payload("London", 40))));
        let pipeline = pipeline(source.clone());
        let ui = UiState::new();

        let outcome = pipeline.run(&ui, "  London ").await.unwrap();
        assert_eq!(outcome, RunOutcome::Rendered);
        assert_eq!(source.calls(), 1);

        let snapshot = ui.snapshot();
        assert!(snapshot.today.is_visible());
        assert!(!snapshot.loading.is_visible());
        assert!(!snapshot.error.is_visible());
        assert!(snapshot.today.content().starts_with("London, GB"));
        assert_eq!(snapshot.daily.content().lines().count(), 4);
    }

    #[tokio::test]
    async fn html_format_renders_escaped_cards() {
        let mut body = payload("London", 16);
        body["city"]["name"] = json!("<b>London</b>");
        let source = Arc::new(FakeSource::default().reply("London", 0, Ok(body)));
        let pipeline = pipeline(source).with_format(Format::Html);
        let ui = UiState::new();

        pipeline.run(&ui, "London").await.unwrap();

        let snapshot = ui.snapshot();
        assert!(snapshot.today.content().contains("&lt;b&gt;London&lt;&#x2F;b&gt;, GB"));
        assert!(!snapshot.today.content().contains("<b>"));
        assert_eq!(snapshot.daily.content().matches("<div class=\"weather-card\">").count(), 1);
    }

    #[tokio::test]
    async fn remote_failure_is_shown() {
        let source = Arc::new(FakeSource::default());
        let pipeline = pipeline(source);
        let ui = UiState::new();

        let err = pipeline.run(&ui, "Atlantis").await.unwrap_err();
        assert_eq!(err, ForecastError::remote("city not found"));

        let snapshot = ui.snapshot();
        assert!(snapshot.error.is_visible());
        assert!(snapshot.error.content().contains("city not found"));
        assert!(!snapshot.today.is_visible());
        assert_eq!(snapshot.daily.content(), "");
    }

    #[tokio::test]
    async fn repeated_runs_render_identically() {
        let source = Arc::new(FakeSource::default().reply("London", 0, Ok(payload("London", 40))));
        let pipeline = pipeline(source);
        let ui = UiState::new();

        pipeline.run(&ui, "London").await.unwrap();
        let first = ui.snapshot().today.content().to_string();
        pipeline.run(&ui, "London").await.unwrap();
        let second = ui.snapshot().today.content().to_string();

        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn newer_run_wins_over_slower_older_run() {
        let source = Arc::new(
            FakeSource::default()
                .reply("Slow", 80, Ok(payload("Slow", 16)))
                .reply("Fast", 0, Ok(payload("Fast", 16))),
        );
        let pipeline = pipeline(source);
        let ui = UiState::new();

        let (slow, fast) = tokio::join!(pipeline.run(&ui, "Slow"), pipeline.run(&ui, "Fast"));

        assert_eq!(slow.unwrap(), RunOutcome::Superseded);
        assert_eq!(fast.unwrap(), RunOutcome::Rendered);
        assert!(ui.snapshot().today.content().starts_with("Fast, GB"));
    }

    #[tokio::test]
    async fn superseded_failure_is_not_shown() {
        let source = Arc::new(
            FakeSource::default()
                .reply("Broken", 80, Err(ForecastError::remote("boom")))
                .reply("Fast", 0, Ok(payload("Fast", 8))),
        );
        let pipeline = pipeline(source);
        let ui = UiState::new();

        let (broken, fast) = tokio::join!(pipeline.run(&ui, "Broken"), pipeline.run(&ui, "Fast"));

        assert_eq!(broken.unwrap(), RunOutcome::Superseded);
        assert_eq!(fast.unwrap(), RunOutcome::Rendered);
        assert!(!ui.snapshot().error.is_visible());
        assert_eq!(ui.status(), PipelineStatus::Success);
    }

    #[tokio::test]
    async fn run_input_reads_current_value() {
        let source = Arc::new(FakeSource::default().reply("Oslo", 0, Ok(payload("Oslo", 1))));
        let pipeline = pipeline(source);
        let ui = UiState::new();

        ui.set_input("Oslo");
        assert_eq!(pipeline.run_input(&ui).await.unwrap(), RunOutcome::Rendered);
        assert!(ui.snapshot().today.content().starts_with("Oslo, GB"));
    }
}
