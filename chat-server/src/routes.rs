use actix_web::web;

use crate::handlers;

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/chat", web::post().to(handlers::chat))
        .route("/health", web::get().to(handlers::health_check));
}
