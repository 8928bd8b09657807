use actix_web::{test, web, App};
use serde_json::{json, Value};
use std::sync::Arc;
use weatherman::{configure, AppState, InMemoryCredentialStore, MockWeatherProvider, OpenMeteoProvider, Settings, TokenIssuer, WeatherProvider};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn state_with(weather: Arc<dyn WeatherProvider>) -> web::Data<AppState> {
    let config = Settings::new_for_test().expect("Failed to load test config");
    let state = AppState::from_parts(config, Arc::new(InMemoryCredentialStore::new()), weather)
        .expect("Failed to build state");
    web::Data::new(state)
}

fn test_state() -> web::Data<AppState> {
    state_with(Arc::new(MockWeatherProvider))
}

#[actix_web::test]
async fn test_sign_up_sign_in_and_fetch_weather() {
    let app = test::init_service(App::new().configure(configure(test_state()))).await;

    let sign_up_response = test::TestRequest::post()
        .uri("/auth/sign-up")
        .set_json(json!({
            "username": "alice",
            "email": "a@x.com",
            "password": "s3cret"
        }))
        .send_request(&app)
        .await;

    assert_eq!(sign_up_response.status(), 201);
    let sign_up_body: Value = test::read_body_json(sign_up_response).await;
    assert!(sign_up_body["id"].is_i64());

    let sign_in_response = test::TestRequest::post()
        .uri("/auth/sign-in")
        .set_json(json!({
            "username": "alice",
            "password": "s3cret"
        }))
        .send_request(&app)
        .await;

    assert_eq!(sign_in_response.status(), 200);
    let sign_in_body: Value = test::read_body_json(sign_in_response).await;
    let token = sign_in_body["token"].as_str().unwrap();
    assert!(!token.is_empty());

    let weather_response = test::TestRequest::get()
        .uri("/api/get-weather")
        .insert_header(("Authorization", format!("Bearer {}", token)))
        .send_request(&app)
        .await;

    assert!(weather_response.status().is_success());
    let weather_body: Value = test::read_body_json(weather_response).await;
    assert_eq!(weather_body["account_id"], sign_up_body["id"]);
    assert!(weather_body["report"]["temperature_c"].is_number());

    let mock_response = test::TestRequest::get()
        .uri("/api/get-mock")
        .insert_header(("Authorization", format!("Bearer {}", token)))
        .send_request(&app)
        .await;
    assert_eq!(mock_response.status(), 200);
}

#[actix_web::test]
async fn test_invalid_login_is_uniform() {
    let app = test::init_service(App::new().configure(configure(test_state()))).await;

    test::TestRequest::post()
        .uri("/auth/sign-up")
        .set_json(json!({
            "username": "alice",
            "email": "a@x.com",
            "password": "s3cret"
        }))
        .send_request(&app)
        .await;

    let wrong_password = test::TestRequest::post()
        .uri("/auth/sign-in")
        .set_json(json!({ "username": "alice", "password": "wrong" }))
        .send_request(&app)
        .await;
    let unknown_user = test::TestRequest::post()
        .uri("/auth/sign-in")
        .set_json(json!({ "username": "nonexistent", "password": "s3cret" }))
        .send_request(&app)
        .await;

    assert_eq!(wrong_password.status(), 401);
    assert_eq!(wrong_password.status(), unknown_user.status());

    let wrong_password_body: Value = test::read_body_json(wrong_password).await;
    let unknown_user_body: Value = test::read_body_json(unknown_user).await;
    assert_eq!(wrong_password_body, unknown_user_body);
}

#[actix_web::test]
async fn test_duplicate_sign_up_is_conflict() {
    let app = test::init_service(App::new().configure(configure(test_state()))).await;
    let payload = json!({
        "username": "alice",
        "email": "a@x.com",
        "password": "s3cret"
    });

    let first = test::TestRequest::post()
        .uri("/auth/sign-up")
        .set_json(&payload)
        .send_request(&app)
        .await;
    assert_eq!(first.status(), 201);

    let second = test::TestRequest::post()
        .uri("/auth/sign-up")
        .set_json(&payload)
        .send_request(&app)
        .await;
    assert_eq!(second.status(), 409);

    let body: Value = test::read_body_json(second).await;
    assert_eq!(body["error"]["status"], 409);
}

#[actix_web::test]
async fn test_invalid_registration() {
    let app = test::init_service(App::new().configure(configure(test_state()))).await;

    let empty_password = test::TestRequest::post()
        .uri("/auth/sign-up")
        .set_json(json!({
            "username": "alice",
            "email": "a@x.com",
            "password": ""
        }))
        .send_request(&app)
        .await;
    assert_eq!(empty_password.status(), 400);

    let missing_email = test::TestRequest::post()
        .uri("/auth/sign-up")
        .set_json(json!({ "username": "alice", "password": "s3cret" }))
        .send_request(&app)
        .await;
    assert_eq!(missing_email.status(), 400);

    let not_json = test::TestRequest::post()
        .uri("/auth/sign-up")
        .insert_header(("Content-Type", "application/json"))
        .set_payload("{not json")
        .send_request(&app)
        .await;
    assert_eq!(not_json.status(), 400);
    let body: Value = test::read_body_json(not_json).await;
    assert_eq!(body["error"]["status"], 400);
}

#[actix_web::test]
async fn test_expired_token_rejected() {
    let state = test_state();
    let app = test::init_service(App::new().configure(configure(state.clone()))).await;

    let issuer = TokenIssuer::from_config(&state.config.auth).unwrap();
    let issued = chrono::Utc::now() - chrono::Duration::hours(1);
    let token = issuer.issue_at(1, issued).unwrap();

    let response = test::TestRequest::get()
        .uri("/api/get-weather")
        .insert_header(("Authorization", format!("Bearer {}", token)))
        .send_request(&app)
        .await;
    assert_eq!(response.status(), 401);
}

#[actix_web::test]
async fn test_token_from_other_secret_rejected() {
    let app = test::init_service(App::new().configure(configure(test_state()))).await;

    let foreign = TokenIssuer::new(b"some_other_secret", chrono::Duration::minutes(5))
        .unwrap()
        .issue(1)
        .unwrap();

    let response = test::TestRequest::get()
        .uri("/api/get-weather")
        .insert_header(("Authorization", format!("Bearer {}", foreign)))
        .send_request(&app)
        .await;
    assert_eq!(response.status(), 401);
}

#[actix_web::test]
async fn test_upstream_failure_is_bad_gateway() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/forecast"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let mut config = Settings::new_for_test().unwrap();
    config.weather.base_url = server.uri();
    let provider = OpenMeteoProvider::new(&config.weather).unwrap();
    let state = state_with(Arc::new(provider));
    let app = test::init_service(App::new().configure(configure(state.clone()))).await;

    let token = TokenIssuer::from_config(&state.config.auth)
        .unwrap()
        .issue(1)
        .unwrap();

    let response = test::TestRequest::get()
        .uri("/api/get-weather")
        .insert_header(("Authorization", format!("Bearer {}", token)))
        .send_request(&app)
        .await;
    assert_eq!(response.status(), 502);

    let body: Value = test::read_body_json(response).await;
    assert_eq!(body["error"]["message"], "Upstream service unavailable");
}
