use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Body of a `forecast` response before any validation.
///
/// Everything is optional here: error payloads share the endpoint with
/// success payloads and only carry `cod` and `message`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ForecastEnvelope {
    #[serde(default)]
    pub cod: Option<ResponseCode>,
    #[serde(default)]
    pub message: Option<Value>,
    #[serde(default)]
    pub list: Option<Value>,
    #[serde(default)]
    pub city: Option<Value>,
}

impl ForecastEnvelope {
    /// The payload's own `message`, when it is a non-empty string.
    ///
    /// Successful payloads send `message: 0`, which is not a message.
    pub fn message_text(&self) -> Option<&str> {
        message_text(self.message.as_ref())
    }
}

/// Error body of a non-2xx response.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ErrorBody {
    #[serde(default)]
    pub message: Option<Value>,
}

impl ErrorBody {
    pub fn message_text(&self) -> Option<&str> {
        message_text(self.message.as_ref())
    }
}

fn message_text(value: Option<&Value>) -> Option<&str> {
    value
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
}

/// The `cod` field; the service sends it as a string on success and
/// sometimes as a number on failure.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum ResponseCode {
    Text(String),
    Number(i64),
}

impl ResponseCode {
    pub fn matches(&self, expected: &str) -> bool {
        match self {
            ResponseCode::Text(s) => s.trim() == expected,
            ResponseCode::Number(n) => n.to_string() == expected,
        }
    }
}

/// A validated forecast payload.
#[derive(Debug, Clone, PartialEq)]
pub struct RawForecastResponse {
    pub city: RawCity,
    pub points: Vec<RawPoint>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RawCity {
    pub name: String,
    #[serde(default)]
    pub country: String,
    pub sunrise: i64,
    pub sunset: i64,
}

/// One 3-hour forecast sample, temperatures in kelvin, wind in m/s.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RawPoint {
    pub dt: i64,
    pub main: RawMain,
    pub wind: RawWind,
    #[serde(default)]
    pub weather: Vec<RawCondition>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RawMain {
    pub temp: f64,
    pub feels_like: f64,
    pub humidity: u8,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RawWind {
    pub speed: f64,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RawCondition {
    pub description: String,
    pub icon: String,
}

/// Icon code of a condition, e.g. `"10d"`; the card templates turn it into
/// an image URL.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Icon(pub String);

/// UI-ready projection of one forecast response.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DisplayForecast {
    pub today: TodaySummary,
    pub days: Vec<DaySummary>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TodaySummary {
    /// `"<city>, <country>"`.
    pub location: String,
    pub temperature_c: i32,
    pub feels_like_c: i32,
    pub humidity_pct: u8,
    /// Already formatted with one decimal.
    pub wind_kmh: String,
    pub condition: String,
    pub icon: Option<Icon>,
    pub sunrise: String,
    pub sunset: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DaySummary {
    /// Short weekday, e.g. `"Tue"`.
    pub weekday: String,
    pub temperature_c: i32,
    pub condition: String,
    pub icon: Option<Icon>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn response_code_accepts_text_and_number() {
        let text: ResponseCode = serde_json::from_str("\"200\"").unwrap();
        let number: ResponseCode = serde_json::from_str("404").unwrap();

        assert!(text.matches("200"));
        assert!(!number.matches("200"));
        assert!(number.matches("404"));
    }

    #[test]
    fn numeric_message_is_not_a_message() {
        let envelope: ForecastEnvelope =
            serde_json::from_str(r#"{"cod":"200","message":0,"list":[]}"#).unwrap();
        assert_eq!(envelope.message_text(), None);

        let envelope: ForecastEnvelope =
            serde_json::from_str(r#"{"cod":"404","message":"city not found"}"#).unwrap();
        assert_eq!(envelope.message_text(), Some("city not found"));
        assert!(envelope.list.is_none());
    }

    #[test]
    fn icon_serializes_as_bare_code() {
        let json = serde_json::to_value(Icon("10d".to_string())).unwrap();
        assert_eq!(json, serde_json::json!("10d"));
    }

    #[test]
    fn point_without_conditions_still_parses() {
        let point: RawPoint = serde_json::from_str(
            r#"{"dt":1,"main":{"temp":280.0,"feels_like":279.0,"humidity":50},"wind":{"speed":1.0}}"#,
        )
        .unwrap();
        assert!(point.weather.is_empty());
    }
}
