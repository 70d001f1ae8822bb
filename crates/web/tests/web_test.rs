//! HTTP integration tests.
//!
//! Drive the full router with in-memory SQLite and the in-process session
//! store.

use axum::{
    body::Body,
    http::{
        header::{CONTENT_TYPE, COOKIE, LOCATION, SET_COOKIE},
        Request, StatusCode,
    },
    response::Response,
    Router,
};
use serde_json::Value;
use tower::ServiceExt;

use domain::{Driver, Manufacturer, NewCar, NewManufacturer, RegisterDriver};
use web_lib::config::WebConfig;
use web_lib::routes::create_router;
use web_lib::state::AppState;

const PASSWORD: &str = "1qazcde3";

// =============================================================================
// Test Helpers
// =============================================================================

async fn setup() -> (AppState, Router) {
    let state = web_lib::build_state(WebConfig::in_memory())
        .await
        .expect("test state");
    let app = create_router(state.clone());
    (state, app)
}

async fn register(state: &AppState, username: &str, license_number: &str) -> Driver {
    state
        .services
        .drivers
        .register_driver(RegisterDriver {
            username: username.to_string(),
            password: PASSWORD.to_string(),
            first_name: "Test".to_string(),
            last_name: "Driver".to_string(),
            license_number: license_number.to_string(),
        })
        .await
        .unwrap()
}

async fn manufacturer(state: &AppState, name: &str) -> Manufacturer {
    state
        .services
        .manufacturers
        .create_manufacturer(NewManufacturer {
            name: name.to_string(),
            country: "USA".to_string(),
        })
        .await
        .unwrap()
}

fn get(uri: &str, cookie: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().method("GET").uri(uri);
    if let Some(cookie) = cookie {
        builder = builder.header(COOKIE, cookie);
    }
    builder.body(Body::empty()).unwrap()
}

fn post_form(uri: &str, body: &str, cookie: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder()
        .method("POST")
        .uri(uri)
        .header(CONTENT_TYPE, "application/x-www-form-urlencoded");
    if let Some(cookie) = cookie {
        builder = builder.header(COOKIE, cookie);
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

async fn send(app: &Router, request: Request<Body>) -> Response {
    app.clone().oneshot(request).await.unwrap()
}

async fn json(response: Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

fn location(response: &Response) -> &str {
    response.headers()[LOCATION].to_str().unwrap()
}

/// `name=value` part of the session cookie set by the response.
fn session_cookie(response: &Response) -> Option<String> {
    response
        .headers()
        .get_all(SET_COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .find(|value| value.starts_with("sessionid="))
        .and_then(|value| value.split(';').next())
        .map(str::to_string)
}

async fn login(app: &Router, username: &str) -> String {
    let response = send(
        app,
        post_form(
            "/accounts/login",
            &format!("username={}&password={}", username, PASSWORD),
            None,
        ),
    )
    .await;
    assert_eq!(response.status(), StatusCode::FOUND);
    session_cookie(&response).expect("login sets a session cookie")
}

// =============================================================================
// Health
// =============================================================================

#[tokio::test]
async fn test_health_is_public() {
    let (_, app) = setup().await;

    let response = send(&app, get("/health", None)).await;
    assert_eq!(response.status(), StatusCode::OK);

    let body = json(response).await;
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["services"]["database"]["status"], "healthy");
}

// =============================================================================
// Login Gate
// =============================================================================

#[tokio::test]
async fn test_anonymous_dashboard_redirects_to_login() {
    let (_, app) = setup().await;

    let response = send(&app, get("/", None)).await;
    assert_eq!(response.status(), StatusCode::FOUND);
    assert_eq!(location(&response), "/accounts/login?next=%2F");
    assert!(session_cookie(&response).is_none());
}

#[tokio::test]
async fn test_anonymous_create_redirects_to_login() {
    let (_, app) = setup().await;

    let response = send(
        &app,
        post_form(
            "/drivers",
            "username=new.user&password1=1qazcde3&password2=1qazcde3&license_number=ABC12345",
            None,
        ),
    )
    .await;
    assert_eq!(response.status(), StatusCode::FOUND);
    assert!(location(&response).starts_with("/accounts/login?next="));

    let response = send(&app, post_form("/cars", "model=Continental", None)).await;
    assert_eq!(response.status(), StatusCode::FOUND);
    assert_eq!(location(&response), "/accounts/login?next=%2Fcars");
}

#[tokio::test]
async fn test_login_with_bad_credentials() {
    let (state, app) = setup().await;
    register(&state, "admin.user", "ABC12345").await;

    let response = send(
        &app,
        post_form("/accounts/login", "username=admin.user&password=wrong", None),
    )
    .await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert!(session_cookie(&response).is_none());
}

#[tokio::test]
async fn test_login_redirects_to_local_next_only() {
    let (state, app) = setup().await;
    register(&state, "admin.user", "ABC12345").await;

    let response = send(
        &app,
        post_form(
            "/accounts/login?next=%2Fcars",
            "username=admin.user&password=1qazcde3",
            None,
        ),
    )
    .await;
    assert_eq!(location(&response), "/cars");

    let response = send(
        &app,
        post_form(
            "/accounts/login?next=https%3A%2F%2Fexample.com",
            "username=admin.user&password=1qazcde3",
            None,
        ),
    )
    .await;
    assert_eq!(location(&response), "/");

    let response = send(
        &app,
        post_form(
            "/accounts/login?next=%2F%09%2Fexample.com",
            "username=admin.user&password=1qazcde3",
            None,
        ),
    )
    .await;
    assert_eq!(location(&response), "/");
}

#[tokio::test]
async fn test_logout_ends_session() {
    let (state, app) = setup().await;
    register(&state, "admin.user", "ABC12345").await;
    let cookie = login(&app, "admin.user").await;

    let response = send(&app, post_form("/accounts/logout", "", Some(&cookie))).await;
    assert_eq!(response.status(), StatusCode::FOUND);
    assert_eq!(location(&response), "/accounts/login");

    let response = send(&app, get("/", Some(&cookie))).await;
    assert_eq!(response.status(), StatusCode::FOUND);
}

#[tokio::test]
async fn test_session_of_deleted_driver_is_dropped() {
    let (state, app) = setup().await;
    let driver = register(&state, "admin.user", "ABC12345").await;
    let cookie = login(&app, "admin.user").await;

    state.services.drivers.delete_driver(driver.id).await.unwrap();

    let response = send(&app, get("/cars", Some(&cookie))).await;
    assert_eq!(response.status(), StatusCode::FOUND);
    assert_eq!(location(&response), "/accounts/login?next=%2Fcars");
}

// =============================================================================
// Dashboard
// =============================================================================

#[tokio::test]
async fn test_dashboard_counts_visits() {
    let (state, app) = setup().await;
    register(&state, "admin.user", "ABC12345").await;
    let cookie = login(&app, "admin.user").await;

    let response = send(&app, get("/", Some(&cookie))).await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = json(response).await;
    assert_eq!(body["num_visits"], 1);
    assert_eq!(body["num_drivers"], 1);
    assert_eq!(body["num_cars"], 0);
    assert_eq!(body["num_manufacturers"], 0);

    let body = json(send(&app, get("/", Some(&cookie))).await).await;
    assert_eq!(body["num_visits"], 2);
}

#[tokio::test]
async fn test_visits_are_per_session() {
    let (state, app) = setup().await;
    register(&state, "admin.user", "ABC12345").await;
    let first = login(&app, "admin.user").await;
    let second = login(&app, "admin.user").await;
    assert_ne!(first, second);

    send(&app, get("/", Some(&first))).await;
    send(&app, get("/", Some(&first))).await;

    let body = json(send(&app, get("/", Some(&second))).await).await;
    assert_eq!(body["num_visits"], 1);
}

#[tokio::test]
async fn test_login_as_another_driver_resets_visits() {
    let (state, app) = setup().await;
    register(&state, "admin.user", "ABC12345").await;
    register(&state, "bob", "BOB12345").await;
    let first = login(&app, "admin.user").await;

    send(&app, get("/", Some(&first))).await;
    send(&app, get("/", Some(&first))).await;

    let response = send(
        &app,
        post_form(
            "/accounts/login",
            "username=bob&password=1qazcde3",
            Some(&first),
        ),
    )
    .await;
    assert_eq!(response.status(), StatusCode::FOUND);
    let second = session_cookie(&response).expect("login sets a session cookie");
    assert_ne!(first, second);

    let body = json(send(&app, get("/", Some(&second))).await).await;
    assert_eq!(body["num_visits"], 1);
}

// =============================================================================
// Cars
// =============================================================================

#[tokio::test]
async fn test_car_list_and_detail() {
    let (state, app) = setup().await;
    let driver = register(&state, "admin.user", "ABC12345").await;
    let maker = manufacturer(&state, "Lincoln").await;
    let car = state
        .services
        .cars
        .create_car(NewCar {
            model: "Continental".to_string(),
            manufacturer_id: maker.id,
            driver_ids: vec![driver.id],
        })
        .await
        .unwrap();
    let cookie = login(&app, "admin.user").await;

    let body = json(send(&app, get("/cars", Some(&cookie))).await).await;
    assert_eq!(body["data"].as_array().unwrap().len(), 1);
    assert_eq!(body["meta"]["total"], 1);

    let response = send(&app, get(&format!("/cars/{}", car.id), Some(&cookie))).await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = json(response).await;
    assert_eq!(body["model"], "Continental");
    assert_eq!(body["manufacturer"]["name"], "Lincoln");
    assert_eq!(body["drivers"][0]["username"], "admin.user");
}

#[tokio::test]
async fn test_create_car() {
    let (state, app) = setup().await;
    let driver = register(&state, "admin.user", "ABC12345").await;
    let maker = manufacturer(&state, "Lincoln").await;
    let cookie = login(&app, "admin.user").await;

    let response = send(
        &app,
        post_form(
            "/cars",
            &format!(
                "model=Continental&manufacturer={}&drivers={}",
                maker.id, driver.id
            ),
            Some(&cookie),
        ),
    )
    .await;
    assert_eq!(response.status(), StatusCode::FOUND);
    assert_eq!(location(&response), "/cars");
    assert_eq!(state.services.cars.count_cars().await.unwrap(), 1);
}

#[tokio::test]
async fn test_create_car_reports_field_errors() {
    let (state, app) = setup().await;
    register(&state, "admin.user", "ABC12345").await;
    let cookie = login(&app, "admin.user").await;

    let response = send(&app, post_form("/cars", "drivers=bogus", Some(&cookie))).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body = json(response).await;
    assert_eq!(body["error"]["fields"]["model"][0], "This field is required.");
    assert_eq!(
        body["error"]["fields"]["manufacturer"][0],
        "This field is required."
    );
    assert_eq!(state.services.cars.count_cars().await.unwrap(), 0);
}

#[tokio::test]
async fn test_toggle_assignment() {
    let (state, app) = setup().await;
    let driver = register(&state, "admin.user", "ABC12345").await;
    let maker = manufacturer(&state, "Lincoln").await;
    let car = state
        .services
        .cars
        .create_car(NewCar {
            model: "Continental".to_string(),
            manufacturer_id: maker.id,
            driver_ids: vec![],
        })
        .await
        .unwrap();
    let cookie = login(&app, "admin.user").await;
    let uri = format!("/cars/{}/toggle-assign", car.id);

    let response = send(&app, post_form(&uri, "", Some(&cookie))).await;
    assert_eq!(response.status(), StatusCode::FOUND);
    assert_eq!(location(&response), format!("/cars/{}", car.id));
    let car_now = state.services.cars.get_car(car.id).await.unwrap();
    assert!(car_now.has_driver(&driver.id));

    send(&app, post_form(&uri, "", Some(&cookie))).await;
    let car_now = state.services.cars.get_car(car.id).await.unwrap();
    assert!(!car_now.has_driver(&driver.id));
}

// =============================================================================
// Drivers
// =============================================================================

#[tokio::test]
async fn test_driver_creation_rejects_bad_license() {
    let (state, app) = setup().await;
    register(&state, "admin.user", "ABC12345").await;
    let cookie = login(&app, "admin.user").await;

    let response = send(
        &app,
        post_form(
            "/drivers",
            "username=new.user&password1=user12test&password2=user12test&first_name=Test&last_name=Test&license_number=12345",
            Some(&cookie),
        ),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body = json(response).await;
    assert_eq!(
        body["error"]["fields"]["license_number"][0],
        "License number should consist of 8 characters"
    );
    assert_eq!(state.services.drivers.count_drivers().await.unwrap(), 1);
}

#[tokio::test]
async fn test_driver_creation() {
    let (state, app) = setup().await;
    register(&state, "admin.user", "ABC12345").await;
    let cookie = login(&app, "admin.user").await;

    let response = send(
        &app,
        post_form(
            "/drivers",
            "username=new.user&password1=user12test&password2=user12test&first_name=Test&last_name=Test&license_number=XYZ98765",
            Some(&cookie),
        ),
    )
    .await;
    assert_eq!(response.status(), StatusCode::FOUND);
    assert!(location(&response).starts_with("/drivers/"));

    let body = json(send(&app, get(location(&response), Some(&cookie))).await).await;
    assert_eq!(body["driver"]["username"], "new.user");
    assert_eq!(body["driver"]["license_number"], "XYZ98765");
    assert!(body["driver"].get("password_hash").is_none());
}

#[tokio::test]
async fn test_license_update() {
    let (state, app) = setup().await;
    let driver = register(&state, "admin.user", "ABC12345").await;
    let cookie = login(&app, "admin.user").await;

    let response = send(
        &app,
        post_form(
            &format!("/drivers/{}/license", driver.id),
            "license_number=DEF56789",
            Some(&cookie),
        ),
    )
    .await;
    assert_eq!(response.status(), StatusCode::FOUND);
    assert_eq!(location(&response), format!("/drivers/{}", driver.id));

    let updated = state.services.drivers.get_driver(driver.id).await.unwrap();
    assert_eq!(updated.license_number, "DEF56789");
}

#[tokio::test]
async fn test_driver_search() {
    let (state, app) = setup().await;
    register(&state, "admin.user", "ABC12345").await;
    register(&state, "bob", "BOB12345").await;
    let cookie = login(&app, "admin.user").await;

    let body = json(send(&app, get("/drivers?username=BO", Some(&cookie))).await).await;
    assert_eq!(body["meta"]["total"], 1);
    assert_eq!(body["data"][0]["username"], "bob");
}

// =============================================================================
// Manufacturers
// =============================================================================

#[tokio::test]
async fn test_manufacturer_crud() {
    let (state, app) = setup().await;
    register(&state, "admin.user", "ABC12345").await;
    let cookie = login(&app, "admin.user").await;

    let response = send(
        &app,
        post_form("/manufacturers", "name=Lincoln&country=USA", Some(&cookie)),
    )
    .await;
    assert_eq!(response.status(), StatusCode::FOUND);
    assert_eq!(location(&response), "/manufacturers");

    let body = json(send(&app, get("/manufacturers?name=linc", Some(&cookie))).await).await;
    assert_eq!(body["meta"]["total"], 1);
    let id = body["data"][0]["id"].as_str().unwrap().to_string();

    let response = send(
        &app,
        post_form(
            &format!("/manufacturers/{}/update", id),
            "name=Lincoln&country=United States",
            Some(&cookie),
        ),
    )
    .await;
    assert_eq!(response.status(), StatusCode::FOUND);

    let response = send(
        &app,
        post_form(&format!("/manufacturers/{}/delete", id), "", Some(&cookie)),
    )
    .await;
    assert_eq!(response.status(), StatusCode::FOUND);
    assert_eq!(
        state
            .services
            .manufacturers
            .count_manufacturers()
            .await
            .unwrap(),
        0
    );
}

#[tokio::test]
async fn test_manufacturer_list_is_paginated_by_five() {
    let (state, app) = setup().await;
    register(&state, "admin.user", "ABC12345").await;
    for name in ["Audi", "BMW", "Chevrolet", "Dodge", "Ford", "GMC"] {
        manufacturer(&state, name).await;
    }
    let cookie = login(&app, "admin.user").await;

    let body = json(send(&app, get("/manufacturers", Some(&cookie))).await).await;
    assert_eq!(body["data"].as_array().unwrap().len(), 5);
    assert_eq!(body["meta"]["total_pages"], 2);

    let body = json(send(&app, get("/manufacturers?page=2", Some(&cookie))).await).await;
    assert_eq!(body["data"][0]["name"], "GMC");
}
