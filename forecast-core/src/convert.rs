//! Unit and time conversions used when projecting raw points for display.

use chrono::{DateTime, FixedOffset, Local};

const KELVIN_OFFSET: f64 = 273.15;
const MPS_TO_KMH: f64 = 3.6;

/// Kelvin to whole degrees Celsius. Halves round toward positive infinity.
pub fn kelvin_to_celsius(kelvin: f64) -> i32 {
    (kelvin - KELVIN_OFFSET + 0.5).floor() as i32
}

/// m/s to km/h, formatted with exactly one decimal.
pub fn mps_to_kmh(speed: f64) -> String {
    format!("{:.1}", speed * MPS_TO_KMH)
}

/// Time zone the viewer reads times in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ViewerZone {
    /// The host's local zone.
    #[default]
    System,
    Fixed(FixedOffset),
}

impl ViewerZone {
    pub fn from_offset_minutes(minutes: i32) -> Option<Self> {
        minutes
            .checked_mul(60)
            .and_then(FixedOffset::east_opt)
            .map(ViewerZone::Fixed)
    }

    pub fn localize(&self, epoch_secs: i64) -> Option<DateTime<FixedOffset>> {
        let utc = DateTime::from_timestamp(epoch_secs, 0)?;
        Some(match self {
            ViewerZone::System => utc.with_timezone(&Local).fixed_offset(),
            ViewerZone::Fixed(offset) => utc.with_timezone(offset),
        })
    }

    /// Two-digit 12-hour clock, e.g. `"06:04 AM"`.
    pub fn clock_time(&self, epoch_secs: i64) -> Option<String> {
        self.localize(epoch_secs)
            .map(|dt| dt.format("%I:%M %p").to_string())
    }

    /// Short weekday name, e.g. `"Mon"`.
    pub fn weekday(&self, epoch_secs: i64) -> Option<String> {
        self.localize(epoch_secs).map(|dt| dt.format("%a").to_string())
    }
}
