//! Binary crate for the weather-chat HTTP server.
//!
//! This crate focuses on:
//! - Loading configuration and credentials
//! - Routing `POST /chat` into the core pipeline
//! - Serializing the JSON reply

use actix_cors::Cors;
use actix_web::{App, HttpServer, web::Data};
use dotenv::dotenv;
use log::{error, info};

use chat_core::{ChatPipeline, Config};

mod handlers;
mod routes;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenv().ok();
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    info!("Starting weather-chat server");

    let mut config = match Config::load() {
        Ok(cfg) => cfg,
        Err(e) => {
            error!("Failed to load configuration: {e:#}");
            std::process::exit(1);
        }
    };
    config.apply_env_overrides();

    let pipeline = match ChatPipeline::from_config(&config) {
        Ok(pipeline) => Data::new(pipeline),
        Err(e) => {
            error!("Failed to build chat pipeline: {e:#}");
            std::process::exit(1);
        }
    };

    info!("Listening on 127.0.0.1:8080");

    HttpServer::new(move || {
        App::new()
            .app_data(pipeline.clone())
            .wrap(Cors::permissive())
            .configure(routes::configure)
    })
    .bind(("127.0.0.1", 8080))?
    .run()
    .await
}
