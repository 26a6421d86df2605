// HTTP request handlers for the login exchange gateway
pub mod exchange;
pub mod health;


use actix_web::web;

pub use exchange::{exchange_token, ExchangeForm};
pub use health::health;

/// Path of the token exchange endpoint
pub const EXCHANGE_PATH: &str = "/auth/token/exchange";

/// Register the gateway routes
pub fn configure_services(cfg: &mut web::ServiceConfig) {
    cfg.route(EXCHANGE_PATH, web::post().to(exchange_token))
        .route("/ping", web::get().to(health));
}
