use serde::{Deserialize, Serialize};

/// Sentinel city name used when geolocation failed outright.
pub const UNKNOWN: &str = "Unknown";

/// One incoming chat turn. `message` may be empty; it is passed through to the
/// prompt verbatim. `client_address` comes from the transport layer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatRequest {
    pub message: String,
    pub client_address: String,
}

/// The only externally observable result of a request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatReply {
    pub response: String,
}

/// Best-effort place resolved from a client address.
///
/// Fields absent in the provider response stay `None`; the resolver's fallback
/// path fills the whole triple with `"Unknown"` when the lookup fails.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Location {
    pub city: Option<String>,
    pub region: Option<String>,
    pub country: Option<String>,
}

impl Location {
    pub fn new(
        city: impl Into<String>,
        region: impl Into<String>,
        country: impl Into<String>,
    ) -> Self {
        Self {
            city: Some(city.into()),
            region: Some(region.into()),
            country: Some(country.into()),
        }
    }

    /// The fallback triple returned when resolution fails.
    pub fn unknown() -> Self {
        Self::new(UNKNOWN, UNKNOWN, UNKNOWN)
    }

    /// True when the city is usable as a weather query key.
    pub fn has_city(&self) -> bool {
        match self.city.as_deref() {
            Some(city) => !city.is_empty() && city != UNKNOWN,
            None => false,
        }
    }

    /// Human-readable place string for prompts: `"city, region, country"` when
    /// both region and country are known, otherwise the city alone.
    pub fn display_name(&self) -> String {
        let city = self.city.as_deref().filter(|c| !c.is_empty()).unwrap_or("your area");

        let region = self.region.as_deref().unwrap_or("");
        let country = self.country.as_deref().unwrap_or("");

        if !region.is_empty() && !country.is_empty() {
            format!("{city}, {region}, {country}")
        } else {
            city.to_string()
        }
    }
}

/// Raw current-weather payload from the weather provider.
///
/// Kept structurally close to the wire format; the prompt composer does the
/// defensive extraction of description and temperature.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WeatherSnapshot {
    #[serde(default)]
    pub weather: Vec<WeatherCondition>,
    pub main: Option<TempReading>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherCondition {
    pub description: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TempReading {
    pub temp: Option<f64>,
}

impl WeatherSnapshot {
    pub fn description(&self) -> Option<&str> {
        self.weather.first().and_then(|w| w.description.as_deref())
    }

    pub fn temperature_c(&self) -> Option<f64> {
        self.main.as_ref().and_then(|m| m.temp)
    }
}
