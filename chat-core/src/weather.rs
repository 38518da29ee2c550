use async_trait::async_trait;
use log::{debug, warn};
use reqwest::Client;
use std::fmt::Debug;

use crate::{
    error::UpstreamError,
    model::{Location, WeatherSnapshot},
};

pub const OPENWEATHER_BASE_URL: &str = "https://api.openweathermap.org";

/// Fetches current conditions for a resolved location.
///
/// Total: `None` means "no weather available", whether the city was unusable
/// or the provider call failed.
#[async_trait]
pub trait WeatherFetcher: Send + Sync + Debug {
    async fn fetch(&self, location: &Location) -> Option<WeatherSnapshot>;
}

/// Current weather from OpenWeather, keyed by city name alone.
///
/// Known limitation: two cities sharing a name across countries cannot be
/// distinguished. Disambiguating would need the country converted to its
/// two-letter code, which this fetcher does not do.
#[derive(Debug, Clone)]
pub struct OpenWeatherFetcher {
    http: Client,
    base_url: String,
    api_key: String,
}

impl OpenWeatherFetcher {
    pub fn new(http: Client, api_key: String) -> Self {
        Self { http, base_url: OPENWEATHER_BASE_URL.to_string(), api_key }
    }

    /// Point the fetcher at a different endpoint. Used by tests.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    async fn fetch_current(&self, city: &str) -> Result<WeatherSnapshot, UpstreamError> {
        let url = format!("{}/data/2.5/weather", self.base_url);

        let res = self
            .http
            .get(&url)
            .query(&[("q", city), ("appid", self.api_key.as_str()), ("units", "metric")])
            .send()
            .await
            .map_err(|e| UpstreamError::transport("openweather", e))?;

        let status = res.status();
        let body = res.text().await.map_err(|e| UpstreamError::transport("openweather", e))?;

        if !status.is_success() {
            return Err(UpstreamError::status("openweather", status, &body));
        }

        serde_json::from_str(&body).map_err(|e| UpstreamError::decode("openweather", e))
    }
}

#[async_trait]
impl WeatherFetcher for OpenWeatherFetcher {
    async fn fetch(&self, location: &Location) -> Option<WeatherSnapshot> {
        // An absent or "Unknown" city would otherwise hit the weather API with
        // a meaningless query parameter.
        if !location.has_city() {
            debug!("No usable city in {location:?}, skipping weather lookup");
            return None;
        }

        let city = location.city.as_deref().unwrap_or_default();

        match self.fetch_current(city).await {
            Ok(snapshot) => Some(snapshot),
            Err(e) => {
                warn!("Error getting weather for {city}: {e}");
                None
            }
        }
    }
}
