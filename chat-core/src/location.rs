use async_trait::async_trait;
use log::{debug, warn};
use reqwest::Client;
use serde::Deserialize;
use std::fmt::Debug;

use crate::{error::UpstreamError, model::Location};

pub const IPAPI_BASE_URL: &str = "https://ipapi.co";

/// Maps a client network address to a best-effort place.
///
/// Total: implementations never fail outward. A failed lookup becomes the
/// `"Unknown"` triple so the rest of the pipeline stays defined.
#[async_trait]
pub trait LocationResolver: Send + Sync + Debug {
    async fn resolve(&self, address: &str) -> Location;
}

/// Geolocation via ipapi.co, with a configurable bypass address that resolves
/// to a fixed development location without a network call.
#[derive(Debug, Clone)]
pub struct IpApiResolver {
    http: Client,
    base_url: String,
    bypass_address: Option<String>,
}

impl IpApiResolver {
    pub fn new(http: Client) -> Self {
        Self { http, base_url: IPAPI_BASE_URL.to_string(), bypass_address: None }
    }

    /// Requests from `address` skip the live lookup and resolve to the fixed
    /// development location. Development seam, not production policy.
    pub fn with_bypass_address(mut self, address: impl Into<String>) -> Self {
        self.bypass_address = Some(address.into());
        self
    }

    /// Point the resolver at a different endpoint. Used by tests.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Fixed place returned for the bypass address.
    pub fn development_location() -> Location {
        Location::new("Waterloo", "Ontario", "Canada")
    }

    async fn lookup(&self, address: &str) -> Result<Location, UpstreamError> {
        let url = format!("{}/{}/json/", self.base_url, address);

        let res = self
            .http
            .get(&url)
            .send()
            .await
            .map_err(|e| UpstreamError::transport("ipapi", e))?;

        let status = res.status();
        let body = res.text().await.map_err(|e| UpstreamError::transport("ipapi", e))?;

        if !status.is_success() {
            return Err(UpstreamError::status("ipapi", status, &body));
        }

        let parsed: IpApiResponse =
            serde_json::from_str(&body).map_err(|e| UpstreamError::decode("ipapi", e))?;

        // Provider fields that are absent stay absent; the fallback path below
        // is the only place the "Unknown" sentinel is produced.
        Ok(Location { city: parsed.city, region: parsed.region, country: parsed.country_name })
    }
}

#[derive(Debug, Deserialize)]
struct IpApiResponse {
    city: Option<String>,
    region: Option<String>,
    country_name: Option<String>,
}

#[async_trait]
impl LocationResolver for IpApiResolver {
    async fn resolve(&self, address: &str) -> Location {
        if address.is_empty() {
            debug!("No client address supplied, skipping geolocation");
            return Location::unknown();
        }

        if self.bypass_address.as_deref() == Some(address) {
            debug!("Bypass address {address}, using fixed development location");
            return Self::development_location();
        }

        match self.lookup(address).await {
            Ok(location) => location,
            Err(e) => {
                warn!("Error getting location for address {address}: {e}");
                Location::unknown()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unreachable_resolver() -> IpApiResolver {
        // A .invalid host never resolves, so any live lookup fails fast.
        IpApiResolver::new(Client::new()).with_base_url("http://geolocation.invalid")
    }

    #[tokio::test]
    async fn failed_lookup_returns_unknown_triple() {
        let resolver = unreachable_resolver();
        let location = resolver.resolve("203.0.113.9").await;
        assert_eq!(location, Location::unknown());
    }

    #[tokio::test]
    async fn bypass_address_short_circuits_without_network() {
        // The endpoint is unreachable, so a non-fixed result proves no call
        // was made.
        let resolver = unreachable_resolver().with_bypass_address("127.0.0.1");

        let location = resolver.resolve("127.0.0.1").await;
        assert_eq!(location, Location::new("Waterloo", "Ontario", "Canada"));
    }

    #[tokio::test]
    async fn empty_address_is_unresolvable() {
        let resolver = unreachable_resolver();
        let location = resolver.resolve("").await;
        assert_eq!(location, Location::unknown());
    }
}
