use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use tracing::{debug, instrument};

use crate::{
    WeatherError,
    error::truncate_body,
    model::{ForecastRawSeries, ForecastSample, Lookup, Query, WeatherReading},
};

use super::WeatherProvider;

pub const DEFAULT_BASE_URL: &str = "https://api.openweathermap.org";

const CURRENT_TARGET: &str = "OpenWeather current weather";
const FORECAST_TARGET: &str = "OpenWeather forecast";

#[derive(Debug, Clone)]
pub struct OpenWeatherProvider {
    api_key: String,
    base_url: String,
    http: Client,
}

impl OpenWeatherProvider {
    /// `base_url` is normally [`DEFAULT_BASE_URL`]; tests point it at a mock server.
    pub fn with_base_url(api_key: String, base_url: String) -> Self {
        Self {
            api_key,
            base_url: base_url.trim_end_matches('/').to_string(),
            http: Client::new(),
        }
    }

    async fn get(
        &self,
        endpoint: &str,
        target: &'static str,
        query: &Query,
    ) -> Result<(StatusCode, String), WeatherError> {
        let url = format!("{}/data/2.5/{endpoint}", self.base_url);

        let mut params = query.location_params();
        params.push(("units", "metric".to_string()));
        params.push(("appid", self.api_key.clone()));

        let res = self
            .http
            .get(&url)
            .query(&params)
            .send()
            .await
            .map_err(|e| WeatherError::network(target, e))?;

        let status = res.status();
        let body = res
            .text()
            .await
            .map_err(|e| WeatherError::network(target, e))?;

        debug!(%status, bytes = body.len(), "{target} responded");
        Ok((status, body))
    }
}

#[derive(Debug, Deserialize)]
struct OwMain {
    temp: f64,
    humidity: u8,
}

#[derive(Debug, Deserialize)]
struct OwWeather {
    id: u32,
    main: String,
}

#[derive(Debug, Deserialize)]
struct OwWind {
    speed: f64,
}

#[derive(Debug, Default, Deserialize)]
struct OwSys {
    #[serde(default)]
    country: String,
}

#[derive(Debug, Deserialize)]
struct OwCurrentResponse {
    name: String,
    /// Absent for coordinates outside any country.
    #[serde(default)]
    sys: OwSys,
    main: OwMain,
    weather: Vec<OwWeather>,
    wind: OwWind,
}

#[derive(Debug, Deserialize)]
struct OwForecastMain {
    temp: f64,
}

#[derive(Debug, Deserialize)]
struct OwForecastWeather {
    id: u32,
}

#[derive(Debug, Deserialize)]
struct OwForecastEntry {
    dt_txt: String,
    main: OwForecastMain,
    weather: Vec<OwForecastWeather>,
}

#[derive(Debug, Deserialize)]
struct OwForecastResponse {
    list: Vec<OwForecastEntry>,
}

#[derive(Debug, Deserialize)]
struct OwMessage {
    message: Option<String>,
}

/// OpenWeather answers unknown cities with `"message": "city not found"`.
/// A 404 without that body (wrong host, proxy page) is an ordinary failure.
fn is_not_found(body: &str) -> bool {
    serde_json::from_str::<OwMessage>(body)
        .ok()
        .and_then(|m| m.message)
        .is_some_and(|m| m.eq_ignore_ascii_case("city not found"))
}

fn ensure_success(target: &'static str, status: StatusCode, body: &str) -> Result<(), WeatherError> {
    if status.is_success() {
        return Ok(());
    }
    Err(WeatherError::Status {
        target,
        status: status.as_u16(),
        body: truncate_body(body),
    })
}

fn first_condition<'a, T>(target: &'static str, weather: &'a [T]) -> Result<&'a T, WeatherError> {
    weather
        .first()
        .ok_or_else(|| WeatherError::parse(target, "response contained no weather condition"))
}

#[async_trait]
impl WeatherProvider for OpenWeatherProvider {
    #[instrument(skip(self, query), fields(query = %query))]
    async fn fetch_current(&self, query: &Query) -> Result<Lookup<WeatherReading>, WeatherError> {
        let (status, body) = self.get("weather", CURRENT_TARGET, query).await?;

        if !status.is_success() && is_not_found(&body) {
            debug!("location not found");
            return Ok(Lookup::NotFound);
        }
        ensure_success(CURRENT_TARGET, status, &body)?;

        let parsed: OwCurrentResponse =
            serde_json::from_str(&body).map_err(|e| WeatherError::parse(CURRENT_TARGET, e))?;
        let condition = first_condition(CURRENT_TARGET, &parsed.weather)?;

        Ok(Lookup::Found(WeatherReading {
            location_name: parsed.name,
            country_code: parsed.sys.country,
            temperature_c: parsed.main.temp,
            condition_code: condition.id,
            condition_label: condition.main.clone(),
            humidity_pct: parsed.main.humidity,
            wind_speed_mps: parsed.wind.speed,
        }))
    }

    #[instrument(skip(self, query), fields(query = %query))]
    async fn fetch_series(&self, query: &Query) -> Result<ForecastRawSeries, WeatherError> {
        let (status, body) = self.get("forecast", FORECAST_TARGET, query).await?;
        ensure_success(FORECAST_TARGET, status, &body)?;

        let parsed: OwForecastResponse =
            serde_json::from_str(&body).map_err(|e| WeatherError::parse(FORECAST_TARGET, e))?;

        parsed
            .list
            .into_iter()
            .map(|entry| -> Result<ForecastSample, WeatherError> {
                let condition = first_condition(FORECAST_TARGET, &entry.weather)?;
                Ok(ForecastSample {
                    condition_code: condition.id,
                    timestamp_text: entry.dt_txt,
                    temperature_c: entry.main.temp,
                })
            })
            .collect()
    }
}
