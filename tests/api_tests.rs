//! HTTP client tests against the in-memory backend

mod common;

use common::MockBackend;
use pretty_assertions::assert_eq;
use worldwise::api::{ApiError, CityApi, HttpCityApi};
use worldwise::config::ApiConfig;
use worldwise::state::{City, CityId, NewCity, Position};

fn client(backend: &MockBackend) -> HttpCityApi {
    HttpCityApi::new(ApiConfig::new(backend.base_url())).unwrap()
}

fn seed() -> Vec<City> {
    vec![City::new(1, "Lisbon"), City::new(2, "Madrid"), City::new(3, "Berlin")]
}

#[tokio::test]
async fn test_list_cities_keeps_server_order() {
    let backend = MockBackend::start_with(seed()).await;

    let cities = client(&backend).list_cities().await.unwrap();

    assert_eq!(cities, seed());
    let requests = backend.captured_requests().await;
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].method, "GET");
    assert_eq!(requests[0].path, "/cities");
}

#[tokio::test]
async fn test_get_city_by_id() {
    let backend = MockBackend::start_with(seed()).await;

    let city = client(&backend).get_city(&CityId::from("2")).await.unwrap();

    assert_eq!(city.city_name, "Madrid");
    assert_eq!(backend.captured_requests().await[0].path, "/cities/2");
}

#[tokio::test]
async fn test_create_city_posts_json_and_returns_server_record() {
    let backend = MockBackend::start().await;
    let new_city = NewCity {
        city_name: "Lima".into(),
        country: "Peru".into(),
        emoji: "\u{1f1f5}\u{1f1ea}".into(),
        date: "2027-01-05T10:00:00.000Z".into(),
        notes: "Ceviche".into(),
        position: Position {
            lat: -12.05,
            lng: -77.04,
        },
    };

    let created = client(&backend).create_city(&new_city).await.unwrap();

    assert_eq!(created, new_city.clone().into_city(101));

    let requests = backend.captured_requests().await;
    assert_eq!(requests[0].method, "POST");
    assert_eq!(requests[0].path, "/cities");
    assert_eq!(requests[0].content_type.as_deref(), Some("application/json"));
    let body = requests[0].json();
    assert_eq!(body["cityName"], "Lima");
    assert_eq!(body["position"]["lng"], -77.04);
    assert!(body.get("id").is_none());
}

#[tokio::test]
async fn test_delete_city_ignores_body() {
    let backend = MockBackend::start_with(seed()).await;

    client(&backend).delete_city(&CityId::from(2)).await.unwrap();

    let requests = backend.captured_requests().await;
    assert_eq!(requests[0].method, "DELETE");
    assert_eq!(requests[0].path, "/cities/2");
    assert_eq!(backend.stored_cities().await.len(), 2);
}

#[tokio::test]
async fn test_non_success_status_is_an_error() {
    let backend = MockBackend::start_with(seed()).await;
    backend.respond_with(500, r#"{"error":"boom"}"#).await;

    let err = client(&backend).list_cities().await.unwrap_err();

    assert!(matches!(err, ApiError::Status { status: 500, .. }), "{err}");
}

#[tokio::test]
async fn test_missing_city_is_an_error() {
    let backend = MockBackend::start_with(seed()).await;

    let err = client(&backend).get_city(&CityId::from(99)).await.unwrap_err();

    assert!(matches!(err, ApiError::Status { status: 404, .. }), "{err}");
}

#[tokio::test]
async fn test_malformed_body_is_an_error() {
    let backend = MockBackend::start().await;
    backend.respond_with(200, "not json").await;

    let err = client(&backend).list_cities().await.unwrap_err();

    assert!(matches!(err, ApiError::Request(_)), "{err}");
}

#[tokio::test]
async fn test_unreachable_backend_is_an_error() {
    // Bind then drop a listener to get a port nobody is serving.
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let api = HttpCityApi::new(ApiConfig::new(format!("http://{addr}"))).unwrap();
    let err = api.list_cities().await.unwrap_err();

    assert!(matches!(err, ApiError::Request(_)), "{err}");
}
