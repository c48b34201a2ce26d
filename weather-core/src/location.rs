//! Sources for "current location" searches.

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::fmt::Debug;
use tracing::{debug, instrument};

use crate::{Config, WeatherError, model::Query};

pub const DEFAULT_LOOKUP_URL: &str = "http://ip-api.com/json";

/// Something that can tell where the user is.
#[async_trait]
pub trait Locator: Send + Sync + Debug {
    /// Coordinates of the user, or [`WeatherError::PermissionDenied`].
    async fn locate(&self) -> Result<Query, WeatherError>;
}

/// Coordinates supplied up front by flags or config.
#[derive(Debug, Clone)]
pub struct ConfiguredLocator {
    coordinates: Option<Query>,
}

impl ConfiguredLocator {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            coordinates: Some(Query::Coordinates {
                latitude,
                longitude,
            }),
        }
    }

    /// A locator that always refuses.
    pub fn unavailable() -> Self {
        Self { coordinates: None }
    }
}

#[async_trait]
impl Locator for ConfiguredLocator {
    async fn locate(&self) -> Result<Query, WeatherError> {
        self.coordinates.clone().ok_or_else(|| {
            WeatherError::PermissionDenied("no location configured".to_string())
        })
    }
}

/// Approximate location from the public IP address.
#[derive(Debug, Clone)]
pub struct IpLocator {
    lookup_url: String,
    http: Client,
}

#[derive(Debug, Deserialize)]
struct IpApiResponse {
    status: String,
    lat: Option<f64>,
    lon: Option<f64>,
    message: Option<String>,
}

impl IpLocator {
    pub fn new(lookup_url: String) -> Self {
        Self {
            lookup_url,
            http: Client::new(),
        }
    }
}

#[async_trait]
impl Locator for IpLocator {
    #[instrument(skip(self), fields(url = %self.lookup_url))]
    async fn locate(&self) -> Result<Query, WeatherError> {
        // Lookup failures surface as a refused location, not a search error.
        let res = self
            .http
            .get(&self.lookup_url)
            .send()
            .await
            .map_err(|e| WeatherError::PermissionDenied(format!("location lookup failed: {e}")))?;

        if !res.status().is_success() {
            return Err(WeatherError::PermissionDenied(format!(
                "location lookup failed with status {}",
                res.status()
            )));
        }

        let body: IpApiResponse = res
            .json()
            .await
            .map_err(|e| WeatherError::PermissionDenied(format!("unreadable location response: {e}")))?;

        match (body.status.as_str(), body.lat, body.lon) {
            ("success", Some(latitude), Some(longitude)) => {
                debug!(latitude, longitude, "located via IP");
                Ok(Query::Coordinates {
                    latitude,
                    longitude,
                })
            }
            _ => Err(WeatherError::PermissionDenied(
                body.message
                    .unwrap_or_else(|| "location lookup was unsuccessful".to_string()),
            )),
        }
    }
}

/// Pick a locator: explicit coordinates win, then config, then IP lookup.
pub fn locator_from_config(config: &Config, explicit: Option<(f64, f64)>) -> Box<dyn Locator> {
    if let Some((latitude, longitude)) = explicit {
        return Box::new(ConfiguredLocator::new(latitude, longitude));
    }
    if let Some(fixed) = config.fixed_location() {
        return Box::new(ConfiguredLocator {
            coordinates: Some(fixed),
        });
    }
    Box::new(IpLocator::new(config.location.lookup_url.clone()))
}
