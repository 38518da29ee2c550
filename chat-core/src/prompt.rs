//! Prompt composition: pure, no I/O, exactly two output templates.

use crate::model::{Location, WeatherSnapshot};

const MISSING_DESCRIPTION: &str = "No weather data available";
const MISSING_TEMPERATURE: &str = "N/A";

/// Build the completion prompt from the user's message, the resolved location,
/// and the weather snapshot (or its absence).
///
/// Deterministic: identical inputs yield byte-identical prompts.
pub fn compose(message: &str, location: &Location, weather: Option<&WeatherSnapshot>) -> String {
    let location_str = location.display_name();

    match weather {
        None => format!(
            "The user asked: '{message}'. \
             I wasn't able to get current weather information for {location_str}. \
             Respond in a friendly, conversational way and apologize that you can't provide \
             current weather data, but offer to help in other ways or suggest they check a \
             weather app."
        ),
        Some(snapshot) => {
            let description = snapshot.description().unwrap_or(MISSING_DESCRIPTION);
            let temp = snapshot
                .temperature_c()
                .map_or_else(|| MISSING_TEMPERATURE.to_string(), |t| t.to_string());

            format!(
                "The user asked: '{message}'. \
                 The current weather in {location_str} is {description} with a temperature \
                 of {temp}°C. \
                 Respond in a friendly, conversational way that incorporates the weather \
                 information."
            )
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{TempReading, WeatherCondition};

    fn waterloo() -> Location {
        Location::new("Waterloo", "Ontario", "Canada")
    }

    fn clear_sky_18c() -> WeatherSnapshot {
        WeatherSnapshot {
            weather: vec![WeatherCondition { description: Some("clear sky".into()) }],
            main: Some(TempReading { temp: Some(18.0) }),
        }
    }

    #[test]
    fn missing_weather_produces_apology_without_temperature() {
        let prompt = compose("Should I bring an umbrella?", &waterloo(), None);

        assert!(prompt.contains("apologize"));
        assert!(prompt.contains("Waterloo, Ontario, Canada"));
        assert!(!prompt.contains("°C"));
        assert!(prompt.contains("Should I bring an umbrella?"));
    }

    #[test]
    fn weather_prompt_embeds_place_conditions_and_temperature() {
        let prompt = compose("How's the weather?", &waterloo(), Some(&clear_sky_18c()));

        assert!(prompt.contains("Waterloo, Ontario, Canada"));
        assert!(prompt.contains("clear sky"));
        assert!(prompt.contains("18"));
        assert!(prompt.contains("How's the weather?"));
    }

    #[test]
    fn partial_region_or_country_renders_city_alone() {
        let location = Location {
            city: Some("Waterloo".into()),
            region: Some("Ontario".into()),
            country: Some(String::new()),
        };
        let prompt = compose("hi", &location, Some(&clear_sky_18c()));

        assert!(prompt.contains("weather in Waterloo is"));
        assert!(!prompt.contains("Waterloo, Ontario"));
    }

    #[test]
    fn defensive_extraction_falls_back_to_literals() {
        let snapshot = WeatherSnapshot::default();
        let prompt = compose("hi", &waterloo(), Some(&snapshot));

        assert!(prompt.contains("No weather data available"));
        assert!(prompt.contains("N/A°C"));
    }

    #[test]
    fn compose_is_idempotent() {
        let snapshot = clear_sky_18c();
        let a = compose("same input", &waterloo(), Some(&snapshot));
        let b = compose("same input", &waterloo(), Some(&snapshot));
        assert_eq!(a, b);
    }

    #[test]
    fn empty_message_passes_through() {
        let prompt = compose("", &waterloo(), None);
        assert!(prompt.contains("The user asked: ''."));
    }
}
