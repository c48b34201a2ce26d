//! OpenWeather client and IP locator against a mock HTTP server.

use weather_core::{
    IpLocator, Locator, Lookup, OpenWeatherProvider, Query, WeatherError, WeatherProvider,
};
use wiremock::{
    Mock, MockServer, ResponseTemplate,
    matchers::{method, path, query_param},
};

fn current_london() -> serde_json::Value {
    serde_json::json!({
        "coord": { "lon": -0.1257, "lat": 51.5085 },
        "weather": [{ "id": 500, "main": "Rain", "description": "light rain", "icon": "10d" }],
        "main": { "temp": 15.4, "feels_like": 15.0, "pressure": 1012, "humidity": 82 },
        "wind": { "speed": 4.1, "deg": 240 },
        "sys": { "country": "GB" },
        "name": "London",
        "cod": 200
    })
}

fn forecast_body(timestamps: &[&str]) -> serde_json::Value {
    let list: Vec<_> = timestamps
        .iter()
        .enumerate()
        .map(|(i, ts)| {
            serde_json::json!({
                "dt": 1_700_000_000 + i as i64 * 10_800,
                "main": { "temp": 10.0 + i as f64, "humidity": 70 },
                "weather": [{ "id": 801, "main": "Clouds" }],
                "dt_txt": ts
            })
        })
        .collect();
    serde_json::json!({ "cod": "200", "cnt": list.len(), "list": list })
}

fn client(server: &MockServer) -> OpenWeatherProvider {
    OpenWeatherProvider::with_base_url("TEST_KEY".into(), server.uri())
}

// ============================================================================
// Current conditions
// ============================================================================

#[tokio::test]
async fn current_by_city_parses_reading() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/data/2.5/weather"))
        .and(query_param("q", "London"))
        .and(query_param("units", "metric"))
        .and(query_param("appid", "TEST_KEY"))
        .respond_with(ResponseTemplate::new(200).set_body_json(current_london()))
        .expect(1)
        .mount(&server)
        .await;

    let result = client(&server).fetch_current(&Query::city("London")).await;

    let Ok(Lookup::Found(reading)) = result else {
        panic!("expected a reading, got {result:?}");
    };
    assert_eq!(reading.location_name, "London");
    assert_eq!(reading.country_code, "GB");
    assert!((reading.temperature_c - 15.4).abs() < f64::EPSILON);
    assert_eq!(reading.condition_code, 500);
    assert_eq!(reading.condition_label, "Rain");
    assert_eq!(reading.humidity_pct, 82);
    assert!((reading.wind_speed_mps - 4.1).abs() < f64::EPSILON);
}

#[tokio::test]
async fn current_by_coordinates_sends_lat_lon() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/data/2.5/weather"))
        .and(query_param("lat", "51.5"))
        .and(query_param("lon", "-0.12"))
        .respond_with(ResponseTemplate::new(200).set_body_json(current_london()))
        .expect(1)
        .mount(&server)
        .await;

    let query = Query::Coordinates {
        latitude: 51.5,
        longitude: -0.12,
    };
    let result = client(&server).fetch_current(&query).await;

    assert!(matches!(result, Ok(Lookup::Found(_))), "got {result:?}");
}

#[tokio::test]
async fn unknown_city_is_not_found() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/data/2.5/weather"))
        .respond_with(ResponseTemplate::new(404).set_body_json(serde_json::json!({
            "cod": "404",
            "message": "city not found"
        })))
        .mount(&server)
        .await;

    let result = client(&server).fetch_current(&Query::city("Atlantis")).await;

    assert!(matches!(result, Ok(Lookup::NotFound)), "got {result:?}");
}

#[tokio::test]
async fn plain_404_page_is_status_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/data/2.5/weather"))
        .respond_with(
            ResponseTemplate::new(404).set_body_string("<html><body>nginx 404</body></html>"),
        )
        .mount(&server)
        .await;

    let result = client(&server).fetch_current(&Query::city("London")).await;

    assert!(
        matches!(result, Err(WeatherError::Status { status: 404, .. })),
        "got {result:?}"
    );
}

#[tokio::test]
async fn unauthorized_is_status_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/data/2.5/weather"))
        .respond_with(ResponseTemplate::new(401).set_body_json(serde_json::json!({
            "cod": 401,
            "message": "Invalid API key."
        })))
        .mount(&server)
        .await;

    let result = client(&server).fetch_current(&Query::city("London")).await;

    assert!(
        matches!(result, Err(WeatherError::Status { status: 401, .. })),
        "got {result:?}"
    );
}

#[tokio::test]
async fn malformed_current_body_is_parse_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/data/2.5/weather"))
        .respond_with(ResponseTemplate::new(200).set_body_string("not valid json"))
        .mount(&server)
        .await;

    let result = client(&server).fetch_current(&Query::city("London")).await;

    assert!(matches!(result, Err(WeatherError::Parse { .. })), "got {result:?}");
}

#[tokio::test]
async fn empty_weather_array_is_parse_error() {
    let server = MockServer::start().await;
    let mut body = current_london();
    body["weather"] = serde_json::json!([]);
    Mock::given(method("GET"))
        .and(path("/data/2.5/weather"))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(&server)
        .await;

    let result = client(&server).fetch_current(&Query::city("London")).await;

    assert!(matches!(result, Err(WeatherError::Parse { .. })), "got {result:?}");
}

#[tokio::test]
async fn missing_humidity_is_parse_error() {
    let server = MockServer::start().await;
    let mut body = current_london();
    if let Some(main) = body["main"].as_object_mut() {
        main.remove("humidity");
    }
    Mock::given(method("GET"))
        .and(path("/data/2.5/weather"))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(&server)
        .await;

    let result = client(&server).fetch_current(&Query::city("London")).await;

    assert!(matches!(result, Err(WeatherError::Parse { .. })), "got {result:?}");
}

#[tokio::test]
async fn missing_condition_label_is_parse_error() {
    let server = MockServer::start().await;
    let mut body = current_london();
    body["weather"] = serde_json::json!([{ "id": 500 }]);
    Mock::given(method("GET"))
        .and(path("/data/2.5/weather"))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(&server)
        .await;

    let result = client(&server).fetch_current(&Query::city("London")).await;

    assert!(matches!(result, Err(WeatherError::Parse { .. })), "got {result:?}");
}

#[tokio::test]
async fn missing_country_keeps_bare_name() {
    let server = MockServer::start().await;
    let mut body = current_london();
    if let Some(obj) = body.as_object_mut() {
        obj.remove("sys");
    }
    Mock::given(method("GET"))
        .and(path("/data/2.5/weather"))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(&server)
        .await;

    let result = client(&server).fetch_current(&Query::city("London")).await;

    let Ok(Lookup::Found(reading)) = result else {
        panic!("expected a reading, got {result:?}");
    };
    assert_eq!(reading.country_code, "");
    assert_eq!(reading.humidity_pct, 82);
}

#[tokio::test]
async fn unreachable_host_is_network_error() {
    let provider = OpenWeatherProvider::with_base_url("k".into(), "http://127.0.0.1:9".into());

    let result = provider.fetch_current(&Query::city("London")).await;

    assert!(matches!(result, Err(WeatherError::Network { .. })), "got {result:?}");
}

// ============================================================================
// Forecast series
// ============================================================================

#[tokio::test]
async fn forecast_keeps_provider_order() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/data/2.5/forecast"))
        .and(query_param("q", "London"))
        .and(query_param("units", "metric"))
        .respond_with(ResponseTemplate::new(200).set_body_json(forecast_body(&[
            "2024-10-14 15:00:00",
            "2024-10-14 18:00:00",
            "2024-10-15 12:00:00",
        ])))
        .mount(&server)
        .await;

    let series = client(&server)
        .fetch_series(&Query::city("London"))
        .await
        .expect("series");

    let stamps: Vec<_> = series.iter().map(|s| s.timestamp_text.as_str()).collect();
    assert_eq!(
        stamps,
        ["2024-10-14 15:00:00", "2024-10-14 18:00:00", "2024-10-15 12:00:00"]
    );
    assert_eq!(series[2].condition_code, 801);
    assert!((series[2].temperature_c - 12.0).abs() < f64::EPSILON);
}

#[tokio::test]
async fn forecast_server_error_is_status_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/data/2.5/forecast"))
        .respond_with(ResponseTemplate::new(500).set_body_string("Internal Server Error"))
        .mount(&server)
        .await;

    let result = client(&server).fetch_series(&Query::city("London")).await;

    assert!(
        matches!(result, Err(WeatherError::Status { status: 500, .. })),
        "got {result:?}"
    );
}

// ============================================================================
// IP location
// ============================================================================

#[tokio::test]
async fn ip_locator_returns_coordinates() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "status": "success",
            "city": "London",
            "lat": 51.5,
            "lon": -0.12
        })))
        .mount(&server)
        .await;

    let locator = IpLocator::new(format!("{}/json", server.uri()));
    let query = locator.locate().await.expect("located");

    assert_eq!(
        query,
        Query::Coordinates {
            latitude: 51.5,
            longitude: -0.12
        }
    );
}

#[tokio::test]
async fn ip_locator_failure_is_permission_denied() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "status": "fail",
            "message": "private range"
        })))
        .mount(&server)
        .await;

    let locator = IpLocator::new(format!("{}/json", server.uri()));
    let err = locator.locate().await.unwrap_err();

    assert!(matches!(err, WeatherError::PermissionDenied(_)));
    assert!(err.to_string().contains("private range"));
}
