#![warn(clippy::pedantic)]
#![warn(clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

/// Version of the login exchange gateway
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub mod exchange;
pub mod handlers;
pub mod models;
pub mod settings;
pub mod utils;

#[cfg(any(test, feature = "testing"))]
pub mod testing;

/// Re-export commonly used items
pub use exchange::{ExchangeError, TokenExchange, TokenInfoVerifier, TokenVerifier};
pub use handlers::{configure_services, exchange_token, health};
pub use models::{ApiError, ApiResponse, ApiResult, IdentityClaims, ResultStatus};
pub use settings::ExchangeSettings;
