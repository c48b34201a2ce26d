//! Core library for the `weather` CLI.
//!
//! This crate defines:
//! - Configuration & credentials handling
//! - The OpenWeather client and the location sources
//! - Forecast reduction and condition icons
//! - The display state controller that drives the panels
//!
//! It is used by `weather-cli`, but can also be reused by other front ends.

pub mod config;
pub mod controller;
pub mod error;
pub mod forecast;
pub mod icon;
pub mod location;
pub mod model;
pub mod provider;
pub mod render;

pub use config::Config;
pub use controller::{DisplayController, SearchOutcome, View, ViewSink, ViewState};
pub use error::WeatherError;
pub use forecast::select_daily;
pub use icon::{ConditionIcon, map_icon};
pub use location::{ConfiguredLocator, IpLocator, Locator};
pub use model::{ForecastSample, Lookup, Query, WeatherReading};
pub use provider::{WeatherProvider, openweather::OpenWeatherProvider};
pub use render::{ForecastCard, RenderData};
