use crate::{
    Config, WeatherError,
    model::{ForecastRawSeries, Lookup, Query, WeatherReading},
    provider::openweather::OpenWeatherProvider,
};
use async_trait::async_trait;
use std::fmt::Debug;

pub mod openweather;

/// Source of current conditions and forecast series.
#[async_trait]
pub trait WeatherProvider: Send + Sync + Debug {
    /// Current conditions, or `Lookup::NotFound` when the provider cannot
    /// resolve the location.
    async fn fetch_current(&self, query: &Query) -> Result<Lookup<WeatherReading>, WeatherError>;

    /// Raw 5-day / 3-hour forecast series.
    async fn fetch_series(&self, query: &Query) -> Result<ForecastRawSeries, WeatherError>;
}

/// Construct the OpenWeather provider from config.
pub fn provider_from_config(config: &Config) -> Result<Box<dyn WeatherProvider>, WeatherError> {
    let api_key = config.api_key().ok_or(WeatherError::MissingApiKey)?;

    Ok(Box::new(OpenWeatherProvider::with_base_url(
        api_key.to_owned(),
        config.openweather.base_url.clone(),
    )))
}
