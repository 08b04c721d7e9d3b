//! Card templates for the today region and the daily strip.
//!
//! Templates are embedded and compiled once; `.html` templates are rendered
//! with auto-escaping on, so text coming from the forecast service cannot
//! inject markup.

use serde::Serialize;
use tera::{Context, Tera};
use thiserror::Error;

use crate::model::{DaySummary, TodaySummary};

/// Error type for card rendering
#[derive(Debug, Error)]
pub enum TemplateError {
    /// An embedded template failed to compile
    #[error("Template compilation failed: {0}")]
    Compile(String),

    /// Rendering a card failed
    #[error("Template rendering failed: {0}")]
    Render(String),
}

/// Output flavour of the rendered cards.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Format {
    /// Plain lines for a terminal.
    #[default]
    Text,
    /// HTML fragments for embedding in a page.
    Html,
}

impl Format {
    fn today_template(self) -> &'static str {
        match self {
            Format::Text => "today.txt",
            Format::Html => "today.html",
        }
    }

    fn day_template(self) -> &'static str {
        match self {
            Format::Text => "day.txt",
            Format::Html => "day.html",
        }
    }
}

mod embedded {
    pub const TODAY_TEXT: &str = "{{ location }}
  {{ temperature_c }}°C  {{ condition }}
  Feels Like {{ feels_like_c }}°C
  Humidity   {{ humidity_pct }}%
  Wind       {{ wind_kmh }} km/h
  Sunrise    {{ sunrise }}
  Sunset     {{ sunset }}
";

    pub const DAY_TEXT: &str = "{{ weekday }} {{ temperature_c }}°C  {{ condition }}
";

    pub const TODAY_HTML: &str = r#"<h1 class="city-name">{{ location }}</h1>
{% if icon %}<img src="https://openweathermap.org/img/wn/{{ icon }}@4x.png" alt="{{ condition }}" />
{% endif %}<div class="main-temp">{{ temperature_c }}°C</div>
<div class="main-condition">{{ condition }}</div>
<div class="main-weather-details">
<div class="detail-item"><i class="fas fa-temperature-half icon"></i><span>Feels Like</span><span>{{ feels_like_c }}°C</span></div>
<div class="detail-item"><i class="fas fa-tint icon"></i><span>Humidity</span><span>{{ humidity_pct }}%</span></div>
<div class="detail-item"><i class="fas fa-wind icon"></i><span>Wind</span><span>{{ wind_kmh }} km/h</span></div>
<div class="detail-item"><i class="fas fa-sun icon"></i><span>Sunrise</span><span>{{ sunrise }}</span></div>
<div class="detail-item"><i class="fas fa-moon icon"></i><span>Sunset</span><span>{{ sunset }}</span></div>
</div>
"#;

    pub const DAY_HTML: &str = r#"<div class="weather-card">
<h3>{{ weekday }}</h3>
{% if icon %}<img src="https://openweathermap.org/img/wn/{{ icon }}.png" alt="{{ condition }}" />
{% endif %}<div class="temp">{{ temperature_c }}°C</div>
<div class="condition">{{ condition }}</div>
</div>
"#;
}

/// Compiled card templates.
#[derive(Debug)]
pub struct CardRenderer {
    tera: Tera,
}

impl CardRenderer {
    pub fn new() -> Result<Self, TemplateError> {
        let mut tera = Tera::default();
        tera.autoescape_on(vec![".html"]);

        tera.add_raw_templates(vec![
            ("today.txt", embedded::TODAY_TEXT),
            ("day.txt", embedded::DAY_TEXT),
            ("today.html", embedded::TODAY_HTML),
            ("day.html", embedded::DAY_HTML),
        ])
        .map_err(|e| TemplateError::Compile(e.to_string()))?;

        Ok(Self { tera })
    }

    pub fn today_card(&self, today: &TodaySummary, format: Format) -> Result<String, TemplateError> {
        self.render(format.today_template(), today)
    }

    pub fn day_card(&self, day: &DaySummary, format: Format) -> Result<String, TemplateError> {
        self.render(format.day_template(), day)
    }

    /// Cards are always line-terminated so they can be appended back to back.
    fn render<T: Serialize>(&self, template: &str, data: &T) -> Result<String, TemplateError> {
        let context =
            Context::from_serialize(data).map_err(|e| TemplateError::Render(e.to_string()))?;
        let mut out = self
            .tera
            .render(template, &context)
            .map_err(|e| TemplateError::Render(e.to_string()))?;

        if !out.ends_with('\n') {
            out.push('\n');
        }
        Ok(out)
    }
}
