use anyhow::{Context, Result, anyhow};
use log::debug;
use reqwest::Client;

use crate::{
    completion::{CompletionClient, MockCompletionClient, OpenAiClient},
    config::{CompletionMode, Config, ProviderId},
    location::{IpApiResolver, LocationResolver},
    model::{ChatReply, ChatRequest},
    prompt,
    weather::{OpenWeatherFetcher, WeatherFetcher},
};

/// The orchestration core: one request in, one reply out.
///
/// Stages run strictly in sequence and each absorbs its own failures, so
/// `handle` is total. A degraded stage output (unknown location, missing
/// weather) feeds forward into the next stage rather than aborting the chain.
#[derive(Debug)]
pub struct ChatPipeline {
    resolver: Box<dyn LocationResolver>,
    fetcher: Box<dyn WeatherFetcher>,
    completion: Box<dyn CompletionClient>,
}

impl ChatPipeline {
    pub fn new(
        resolver: Box<dyn LocationResolver>,
        fetcher: Box<dyn WeatherFetcher>,
        completion: Box<dyn CompletionClient>,
    ) -> Self {
        Self { resolver, fetcher, completion }
    }

    /// Build the live pipeline from configuration.
    ///
    /// Fails only on misconfiguration (missing required API keys); runtime
    /// provider failures are absorbed per stage.
    pub fn from_config(config: &Config) -> Result<Self> {
        let http = Client::builder()
            .timeout(config.timeout())
            .build()
            .context("Failed to build HTTP client")?;

        let resolver =
            IpApiResolver::new(http.clone()).with_bypass_address(config.bypass_address());

        let weather_key = config.provider_api_key(ProviderId::OpenWeather).ok_or_else(|| {
            anyhow!(
                "No API key configured for provider 'openweather'.\n\
                 Hint: add it to the config file or set OPENWEATHER_API_KEY."
            )
        })?;
        let fetcher = OpenWeatherFetcher::new(http.clone(), weather_key.to_owned());

        let completion: Box<dyn CompletionClient> = match config.completion_mode {
            CompletionMode::Mock => Box::new(MockCompletionClient),
            CompletionMode::Live => {
                let key = config.provider_api_key(ProviderId::OpenAi).ok_or_else(|| {
                    anyhow!(
                        "No API key configured for provider 'openai'.\n\
                         Hint: add it to the config file, set OPENAI_API_KEY, or switch \
                         completion_mode to \"mock\"."
                    )
                })?;
                Box::new(OpenAiClient::new(http, key.to_owned()))
            }
        };

        Ok(Self::new(Box::new(resolver), Box::new(fetcher), completion))
    }

    pub async fn handle(&self, request: &ChatRequest) -> ChatReply {
        debug!("User message: {}", request.message);
        debug!("Client address: {}", request.client_address);

        let location = self.resolver.resolve(&request.client_address).await;
        debug!("Location: {location:?}");

        let weather = self.fetcher.fetch(&location).await;
        debug!("Weather: {weather:?}");

        let prompt = prompt::compose(&request.message, &location, weather.as_ref());
        debug!("Prompt: {prompt}");

        let response = self.completion.complete(&prompt).await;
        debug!("Response: {response}");

        ChatReply { response }
    }
}
