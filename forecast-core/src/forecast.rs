//! Payload validation and the projection from raw points to display summaries.

use serde_json::Value;

use crate::{
    convert::{ViewerZone, kelvin_to_celsius, mps_to_kmh},
    error::{ForecastError, UNSUCCESSFUL_PAYLOAD_MESSAGE},
    model::{
        DaySummary, DisplayForecast, ForecastEnvelope, Icon, RawCity, RawForecastResponse,
        RawPoint, TodaySummary,
    },
};

/// Points are 3 hours apart, so every 8th one is roughly a day later.
pub const DAILY_STRIDE: usize = 8;

const UNKNOWN_CONDITION: &str = "Unknown";

/// Check the payload-level success marker and decode the typed fields.
pub fn validate(
    envelope: ForecastEnvelope,
    success_code: &str,
) -> Result<RawForecastResponse, ForecastError> {
    let unsuccessful = || {
        ForecastError::remote(
            envelope
                .message_text()
                .unwrap_or(UNSUCCESSFUL_PAYLOAD_MESSAGE),
        )
    };

    if !envelope
        .cod
        .as_ref()
        .is_some_and(|code| code.matches(success_code))
    {
        return Err(unsuccessful());
    }
    let list = match &envelope.list {
        Some(list) if !list.is_null() => list.clone(),
        _ => return Err(unsuccessful()),
    };

    let points: Vec<RawPoint> = serde_json::from_value(list)
        .map_err(|e| ForecastError::remote(format!("Malformed forecast list: {e}")))?;
    if points.is_empty() {
        return Err(ForecastError::remote("Forecast response contained no data"));
    }

    let city: RawCity = serde_json::from_value(envelope.city.unwrap_or(Value::Null))
        .map_err(|e| ForecastError::remote(format!("Malformed city descriptor: {e}")))?;

    Ok(RawForecastResponse { city, points })
}

/// Every `DAILY_STRIDE`-th point, without the first one (that is today).
pub fn daily_points(points: &[RawPoint]) -> impl Iterator<Item = &RawPoint> {
    points.iter().step_by(DAILY_STRIDE).skip(1)
}

/// Project a validated response for display in `zone`.
pub fn extract(
    raw: &RawForecastResponse,
    zone: ViewerZone,
) -> Result<DisplayForecast, ForecastError> {
    let first = raw
        .points
        .first()
        .ok_or_else(|| ForecastError::remote("Forecast response contained no data"))?;

    let (condition, icon) = condition_of(first);
    let today = TodaySummary {
        location: format!("{}, {}", raw.city.name, raw.city.country),
        temperature_c: kelvin_to_celsius(first.main.temp),
        feels_like_c: kelvin_to_celsius(first.main.feels_like),
        humidity_pct: first.main.humidity,
        wind_kmh: mps_to_kmh(first.wind.speed),
        condition,
        icon,
        sunrise: local_clock(zone, raw.city.sunrise)?,
        sunset: local_clock(zone, raw.city.sunset)?,
    };

    let days = daily_points(&raw.points)
        .map(|point| {
            let weekday = zone
                .weekday(point.dt)
                .ok_or_else(|| invalid_timestamp(point.dt))?;
            let (condition, icon) = condition_of(point);
            Ok(DaySummary {
                weekday,
                temperature_c: kelvin_to_celsius(point.main.temp),
                condition,
                icon,
            })
        })
        .collect::<Result<Vec<_>, ForecastError>>()?;

    Ok(DisplayForecast { today, days })
}

fn condition_of(point: &RawPoint) -> (String, Option<Icon>) {
    point
        .weather
        .first()
        .map(|w| (w.description.clone(), Some(Icon(w.icon.clone()))))
        .unwrap_or_else(|| (UNKNOWN_CONDITION.to_string(), None))
}

fn local_clock(zone: ViewerZone, epoch_secs: i64) -> Result<String, ForecastError> {
    zone.clock_time(epoch_secs)
        .ok_or_else(|| invalid_timestamp(epoch_secs))
}

fn invalid_timestamp(epoch_secs: i64) -> ForecastError {
    ForecastError::remote(format!("Invalid timestamp in forecast response: {epoch_secs}"))
}
