// End-to-end token exchange against a fake tokeninfo endpoint
use std::sync::Arc;
use std::time::Duration;

use actix_web::dev::ServerHandle;
use actix_web::http::StatusCode;
use actix_web::{test, web, App, HttpResponse, HttpServer};
use serde::Deserialize;
use serde_json::{json, Value};

use login_exchange::handlers::EXCHANGE_PATH;
use login_exchange::testing::constants::TEST_CLIENT_ID;
use login_exchange::testing::{assert_api_failure, assert_api_success, TestFixtures};
use login_exchange::{configure_services, ApiResponse, TokenExchange, TokenInfoVerifier};

#[derive(Deserialize)]
struct TokenInfoQuery {
    id_token: String,
}

/// Mimics Google's tokeninfo: the token value selects the answer
async fn fake_tokeninfo(query: web::Query<TokenInfoQuery>) -> HttpResponse {
    let claims = |aud: &str, verified: &str| {
        json!({
            "iss": "https://accounts.google.com",
            "aud": aud,
            "sub": "110169484474386276334",
            "email": "jane@example.com",
            "email_verified": verified,
            "given_name": "Jane",
            "family_name": "Doe",
            "locale": "en"
        })
    };

    match query.id_token.as_str() {
        "trusted" => HttpResponse::Ok().json(claims(TEST_CLIENT_ID, "true")),
        "foreign" => HttpResponse::Ok().json(claims("other.apps.googleusercontent.com", "true")),
        "unverified" => HttpResponse::Ok().json(claims(TEST_CLIENT_ID, "false")),
        "garbled" => HttpResponse::Ok().body("{\"aud\": "),
        _ => HttpResponse::BadRequest().json(json!({
            "error": "invalid_token",
            "error_description": "Invalid Value"
        })),
    }
}

fn start_fake_provider() -> (String, ServerHandle) {
    let server = HttpServer::new(|| App::new().route("/tokeninfo", web::get().to(fake_tokeninfo)))
        .workers(1)
        .bind(("127.0.0.1", 0))
        .expect("bind fake provider");
    let addr = server.addrs()[0];
    let server = server.run();
    let handle = server.handle();
    actix_web::rt::spawn(server);
    (format!("http://{addr}/tokeninfo"), handle)
}

fn exchange_for(endpoint: &str) -> TokenExchange {
    let settings = TestFixtures::settings(endpoint);
    let verifier = TokenInfoVerifier::from_settings(&settings.verifier).expect("verifier");
    TokenExchange::new(
        Arc::new(verifier),
        settings.verifier.get_client_id().expect("client id"),
        Duration::from_secs(settings.verifier.timeout_seconds),
    )
}

async fn post_token(exchange: TokenExchange, form: &str) -> (StatusCode, Value) {
    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(exchange))
            .configure(configure_services),
    )
    .await;
    let req = test::TestRequest::post()
        .uri(EXCHANGE_PATH)
        .insert_header(("Content-Type", "application/x-www-form-urlencoded"))
        .set_payload(form.to_string())
        .to_request();
    let resp = test::call_service(&app, req).await;
    let status = resp.status();
    (status, test::read_body_json(resp).await)
}

#[actix_web::test]
async fn test_end_to_end_status_codes() {
    let (endpoint, handle) = start_fake_provider();

    let cases = [
        ("id_token=trusted", StatusCode::OK, None),
        ("", StatusCode::UNPROCESSABLE_ENTITY, Some("missing_parameter")),
        ("id_token=foreign", StatusCode::UNAUTHORIZED, Some("untrusted_audience")),
        ("id_token=unverified", StatusCode::UNAUTHORIZED, Some("unverified_email")),
        ("id_token=expired", StatusCode::UNAUTHORIZED, Some("invalid_token")),
        ("id_token=garbled", StatusCode::INTERNAL_SERVER_ERROR, Some("verifier_protocol")),
    ];

    for (form, expected_status, expected_id) in cases {
        let (status, body) = post_token(exchange_for(&endpoint), form).await;
        assert_eq!(status, expected_status, "form: {form}");
        match expected_id {
            None => assert_eq!(body, json!({ "status": "SUCCESS" })),
            Some(id) => {
                assert_eq!(body["status"], "FAIL", "form: {form}");
                assert_eq!(body["error"]["id"], id, "form: {form}");
            }
        }
    }

    handle.stop(true).await;
}

#[actix_web::test]
async fn test_unreachable_provider_is_internal_error() {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").expect("bind");
    let addr = listener.local_addr().expect("addr");
    drop(listener);

    let (status, body) = post_token(
        exchange_for(&format!("http://{addr}/tokeninfo")),
        "id_token=trusted",
    )
    .await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["error"]["id"], "verifier_unavailable");
    assert_eq!(body["error"]["message"], "Internal Error");
}

#[actix_web::test]
async fn test_pipeline_outcomes_map_to_api_responses() {
    let (endpoint, handle) = start_fake_provider();
    let exchange = exchange_for(&endpoint);

    let accepted = exchange.exchange(Some("trusted")).await.expect("accepted");
    assert_eq!(accepted.claims.aud, TEST_CLIENT_ID);
    assert_eq!(accepted.claims.display_name().as_deref(), Some("Jane Doe"));

    let rejected = exchange.exchange(Some("unverified")).await.unwrap_err();
    let response = ApiResponse::from(login_exchange::ApiResult::Failure(rejected.into()));
    assert_api_failure(&response, "unverified_email", 401);

    assert_api_success(&ApiResponse::from(login_exchange::ApiResult::Success));

    handle.stop(true).await;
}
