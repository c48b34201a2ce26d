use serde::{Deserialize, Serialize};
use std::fmt;

/// What the user searched for.
#[derive(Debug, Clone, PartialEq)]
pub enum Query {
    City(String),
    Coordinates { latitude: f64, longitude: f64 },
}

impl Query {
    pub fn city(name: impl Into<String>) -> Self {
        Self::City(name.into())
    }

    /// Query parameters selecting the location, without units or key.
    pub(crate) fn location_params(&self) -> Vec<(&'static str, String)> {
        match self {
            Self::City(name) => vec![("q", name.clone())],
            Self::Coordinates {
                latitude,
                longitude,
            } => vec![("lat", latitude.to_string()), ("lon", longitude.to_string())],
        }
    }
}

impl fmt::Display for Query {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::City(name) => f.write_str(name),
            Self::Coordinates {
                latitude,
                longitude,
            } => write!(f, "{latitude}, {longitude}"),
        }
    }
}

/// Result of a lookup that may legitimately find nothing.
#[derive(Debug, Clone, PartialEq)]
pub enum Lookup<T> {
    Found(T),
    NotFound,
}

/// Current conditions for one location.
///
/// Temperatures are kept as delivered; rounding is a display concern.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherReading {
    pub location_name: String,
    pub country_code: String,
    pub temperature_c: f64,
    pub condition_code: u32,
    pub condition_label: String,
    pub humidity_pct: u8,
    pub wind_speed_mps: f64,
}

/// One raw entry of the 3-hour forecast series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastSample {
    /// Provider timestamp, `YYYY-MM-DD HH:mm:ss`.
    pub timestamp_text: String,
    pub temperature_c: f64,
    pub condition_code: u32,
}

impl ForecastSample {
    /// Calendar date part of the timestamp.
    pub fn date_part(&self) -> &str {
        self.timestamp_text
            .split_once(' ')
            .map_or(self.timestamp_text.as_str(), |(date, _)| date)
    }

    /// Time-of-day part of the timestamp, empty when absent.
    pub fn time_part(&self) -> &str {
        self.timestamp_text
            .split_once(' ')
            .map_or("", |(_, time)| time)
    }
}

/// Provider series in delivery order.
pub type ForecastRawSeries = Vec<ForecastSample>;

/// One sample per future day.
pub type DailyForecast = Vec<ForecastSample>;
