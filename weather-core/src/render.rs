//! Display-ready strings for the weather and forecast panels.

use chrono::{NaiveDate, NaiveDateTime};
use serde::Serialize;

use crate::{
    WeatherError,
    icon::{ConditionIcon, map_icon},
    model::{ForecastSample, WeatherReading},
};

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Everything the weather panel shows for a found location.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RenderData {
    pub location: String,
    pub date: String,
    pub icon: ConditionIcon,
    pub temperature: String,
    pub condition: String,
    pub humidity: String,
    pub wind_speed: String,
    pub forecast: Vec<ForecastCard>,
}

/// One entry of the forecast list.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ForecastCard {
    pub date: String,
    pub icon: ConditionIcon,
    pub temperature: String,
}

/// Round half up, the way the panels always have (`-2.5` becomes `-2`).
pub fn round_temperature(celsius: f64) -> i64 {
    (celsius + 0.5).floor() as i64
}

pub fn format_temperature(celsius: f64) -> String {
    format!("{} °C", round_temperature(celsius))
}

/// Build the panel contents from a reading and its daily forecast.
///
/// Fails only when a forecast timestamp cannot be parsed.
pub fn build_render_data(
    reading: &WeatherReading,
    daily: &[ForecastSample],
    today: NaiveDate,
) -> Result<RenderData, WeatherError> {
    let location = if reading.country_code.is_empty() {
        reading.location_name.clone()
    } else {
        format!("{}, {}", reading.location_name, reading.country_code)
    };

    let forecast = daily
        .iter()
        .map(forecast_card)
        .collect::<Result<Vec<_>, _>>()?;

    Ok(RenderData {
        location,
        date: today.format("%a, %d %b").to_string(),
        icon: map_icon(reading.condition_code),
        temperature: format_temperature(reading.temperature_c),
        condition: reading.condition_label.clone(),
        humidity: format!("{}%", reading.humidity_pct),
        wind_speed: format!("{} M/s", reading.wind_speed_mps),
        forecast,
    })
}

fn forecast_card(sample: &ForecastSample) -> Result<ForecastCard, WeatherError> {
    let at = NaiveDateTime::parse_from_str(&sample.timestamp_text, TIMESTAMP_FORMAT).map_err(
        |e| {
            WeatherError::parse(
                "OpenWeather forecast",
                format!("bad timestamp {:?}: {e}", sample.timestamp_text),
            )
        },
    )?;

    Ok(ForecastCard {
        date: at.format("%b %d").to_string(),
        icon: map_icon(sample.condition_code),
        temperature: format_temperature(sample.temperature_c),
    })
}
