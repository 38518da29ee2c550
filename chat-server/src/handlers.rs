use actix_web::{HttpRequest, HttpResponse, Responder, web};
use log::info;
use serde::Deserialize;
use serde_json::json;

use chat_core::{ChatPipeline, ChatRequest};

/// Inbound body of `POST /chat`.
#[derive(Debug, Deserialize)]
pub struct ChatMessage {
    pub message: String,
}

pub async fn health_check() -> impl Responder {
    HttpResponse::Ok().json(json!({ "status": "ok" }))
}

/// Chat endpoint: always 200 when the pipeline ran; every upstream failure
/// degrades to apology text inside the reply, never to an error status.
pub async fn chat(
    pipeline: web::Data<ChatPipeline>,
    body: web::Json<ChatMessage>,
    req: HttpRequest,
) -> impl Responder {
    let client_address = client_address(&req);
    info!("Chat request from {client_address}");

    let request = ChatRequest {
        message: body.into_inner().message,
        client_address,
    };

    let reply = pipeline.handle(&request).await;
    HttpResponse::Ok().json(reply)
}

/// Proxy header if present, else the raw connection address.
fn client_address(req: &HttpRequest) -> String {
    req.headers()
        .get("x-forwarded-for")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(',').next())
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .or_else(|| req.peer_addr().map(|addr| addr.ip().to_string()))
        .unwrap_or_default()
}
