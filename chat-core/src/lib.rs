//! Core library for the weather-aware chat backend.
//!
//! This crate defines:
//! - Configuration & credentials handling
//! - The four pipeline stages (location, weather, prompt, completion)
//! - Shared domain models (requests, replies, locations, snapshots)
//!
//! It is used by `chat-server`, but can also be reused by other binaries or services.

pub mod completion;
pub mod config;
pub mod error;
pub mod location;
pub mod model;
pub mod pipeline;
pub mod prompt;
pub mod weather;

pub use completion::{CompletionClient, MockCompletionClient, OpenAiClient};
pub use config::{CompletionMode, Config, ProviderConfig, ProviderId};
pub use location::{IpApiResolver, LocationResolver};
pub use model::{ChatReply, ChatRequest, Location, WeatherSnapshot};
pub use pipeline::ChatPipeline;
pub use weather::{OpenWeatherFetcher, WeatherFetcher};
