#![warn(clippy::pedantic)]
#![warn(clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

use std::sync::Arc;
use std::time::Duration;

use actix_cors::Cors;
use actix_web::{middleware::Logger, web, App, HttpServer};
use anyhow::Context;
use login_exchange::{
    configure_services, handlers::EXCHANGE_PATH, settings::ExchangeSettings,
    utils::LoggingHelper, TokenExchange, TokenInfoVerifier,
};

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    // Load configuration from Settings.toml, .env and environment variables
    let settings = ExchangeSettings::load().context("Failed to load settings")?;
    settings.init_logging()?;

    let exchange = build_exchange(&settings)?;
    start_server(exchange, &settings).await?;
    Ok(())
}

/// Wire the tokeninfo verifier into the exchange pipeline
fn build_exchange(settings: &ExchangeSettings) -> anyhow::Result<TokenExchange> {
    let client_id = settings
        .verifier
        .get_client_id()
        .context("No client id configured")?;
    let verifier = TokenInfoVerifier::from_settings(&settings.verifier)
        .context("Failed to initialize identity verifier")?;

    let endpoint = verifier.endpoint().to_string();

    let exchange = TokenExchange::new(
        Arc::new(verifier),
        client_id,
        Duration::from_secs(settings.verifier.timeout_seconds),
    );
    LoggingHelper::log_verifier_configured(
        &endpoint,
        exchange.client_id(),
        settings.verifier.timeout_seconds,
    );

    Ok(exchange)
}

/// Start the server
///
/// # Errors
///
/// Returns an error if:
/// - Server binding fails
/// - Server fails to start
async fn start_server(exchange: TokenExchange, settings: &ExchangeSettings) -> std::io::Result<()> {
    let bind_address = settings.get_bind_address();
    print_startup_info(&bind_address);

    let exchange = web::Data::new(exchange);
    let cors_origins = settings.get_cors_origins();

    HttpServer::new(move || {
        let cors_origins = cors_origins.clone();
        let cors = Cors::default()
            .allowed_origin_fn(move |origin, _| {
                cors_origins
                    .iter()
                    .any(|allowed| allowed == origin.to_str().unwrap_or(""))
            })
            .allowed_methods(vec!["GET", "POST", "OPTIONS"])
            .allowed_headers(vec!["Content-Type", "Accept"])
            .max_age(3600);

        App::new()
            .app_data(exchange.clone())
            .wrap(cors)
            .wrap(Logger::default())
            .configure(configure_services)
    })
    .bind(&bind_address)?
    .run()
    .await
}

fn print_startup_info(bind_address: &str) {
    println!("Starting login exchange gateway on http://{bind_address}");
    println!();
    println!("Endpoints:");
    println!("  POST {EXCHANGE_PATH} - Exchange an id_token for a trust decision");
    println!("  GET  /ping                 - Health check");
}
