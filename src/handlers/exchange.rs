// Login exchange handler
use actix_web::web;
use serde::Deserialize;

use crate::exchange::TokenExchange;
use crate::models::ApiResult;
use crate::utils::logging::LoggingHelper;

/// Form body of the exchange endpoint
#[derive(Deserialize)]
pub struct ExchangeForm {
    pub id_token: Option<String>,
}

/// Exchange a provider ID token for a trust decision
///
/// A missing or undecodable form is treated like a missing `id_token`.
pub async fn exchange_token(
    form: Option<web::Form<ExchangeForm>>,
    exchange: web::Data<TokenExchange>,
) -> ApiResult {
    let id_token = form.as_ref().and_then(|form| form.id_token.as_deref());

    match exchange.exchange(id_token).await {
        Ok(decision) => {
            LoggingHelper::log_exchange_accepted(&decision);
            ApiResult::Success
        }
        Err(e) => {
            LoggingHelper::log_exchange_failed(&e);
            ApiResult::Failure(e.into())
        }
    }
}
