//! Core library for the `forecast` widget.
//!
//! This crate defines:
//! - Configuration & credentials handling
//! - The forecast source abstraction and its HTTP implementation
//! - Payload validation, unit conversion and the display projection
//! - Display regions and the lookup pipeline that drives them
//!
//! It is used by `forecast-cli`, but can also be embedded by other front-ends
//! that own a set of display regions.

pub mod config;
pub mod convert;
pub mod error;
pub mod forecast;
pub mod model;
pub mod pipeline;
pub mod provider;
pub mod render;
pub mod ui;

pub use config::Config;
pub use convert::ViewerZone;
pub use error::ForecastError;
pub use model::{DaySummary, DisplayForecast, RawForecastResponse, TodaySummary};
pub use pipeline::{ForecastPipeline, RunOutcome};
pub use provider::{ForecastSource, RapidWeatherProvider};
pub use render::{CardRenderer, Format, TemplateError};
pub use ui::{PipelineStatus, Region, Regions, UiState};
