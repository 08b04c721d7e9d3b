use thiserror::Error;

/// Message shown when the lookup is triggered with nothing to look up.
pub const EMPTY_CITY_MESSAGE: &str = "Please enter a city name.";

/// Fallback used when a payload reports failure without saying why.
pub const UNSUCCESSFUL_PAYLOAD_MESSAGE: &str = "API response was not successful.";

/// Errors a single pipeline run can end with.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ForecastError {
    /// The city query was empty; nothing was sent.
    #[error("{}", EMPTY_CITY_MESSAGE)]
    Validation,

    /// Transport, HTTP status or payload-level failure reported by the forecast service.
    #[error("{0}")]
    Remote(String),
}

impl ForecastError {
    pub fn remote(message: impl Into<String>) -> Self {
        ForecastError::Remote(message.into())
    }

    /// Text written into the error region.
    pub fn user_message(&self) -> String {
        match self {
            ForecastError::Validation => EMPTY_CITY_MESSAGE.to_string(),
            ForecastError::Remote(message) => {
                format!("Failed to load weather data: {message}. Please check the city name.")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_message_is_static() {
        assert_eq!(ForecastError::Validation.to_string(), "Please enter a city name.");
        assert_eq!(ForecastError::Validation.user_message(), "Please enter a city name.");
    }

    #[test]
    fn remote_message_is_wrapped_for_display() {
        let err = ForecastError::remote("city not found");
        assert_eq!(err.to_string(), "city not found");
        assert_eq!(
            err.user_message(),
            "Failed to load weather data: city not found. Please check the city name."
        );
    }
}
