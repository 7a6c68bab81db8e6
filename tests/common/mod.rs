//! Shared test harness for integration tests.
//!
//! Provides [`TestHarness`], which starts a mock TMDB server, points a real
//! [`TmdbProvider`] at it and wires every service to an in-memory database.

#![allow(dead_code)]

use std::sync::Arc;

use reelqueue::bootstrap::AppServices;
use reelqueue::metadata::TmdbProvider;
use reelqueue_db::pool::init_memory_pool;
use serde_json::{json, Value};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

pub const API_KEY: &str = "test-key";

/// Services backed by an in-memory DB and a mock TMDB server.
pub struct TestHarness {
    pub server: MockServer,
    pub services: AppServices,
}

impl TestHarness {
    pub async fn new() -> Self {
        let server = MockServer::start().await;
        let services = AppServices::new(
            init_memory_pool().expect("failed to create in-memory pool"),
            Arc::new(provider_for(&server)),
        );
        Self { server, services }
    }

    /// Serve `body` for `GET {route}`.
    pub async fn get(&self, route: &str, body: Value) {
        Mock::given(method("GET"))
            .and(path(route))
            .and(query_param("api_key", API_KEY))
            .respond_with(ResponseTemplate::new(200).set_body_json(body))
            .mount(&self.server)
            .await;
    }

    /// Serve a TMDB-style 404 for `GET {route}`.
    pub async fn missing(&self, route: &str) {
        Mock::given(method("GET"))
            .and(path(route))
            .respond_with(ResponseTemplate::new(404).set_body_json(json!({
                "success": false,
                "status_code": 34,
                "status_message": "The resource you requested could not be found."
            })))
            .mount(&self.server)
            .await;
    }
}

/// A provider with a generous quota pointed at `server`.
pub fn provider_for(server: &MockServer) -> TmdbProvider {
    TmdbProvider::new(API_KEY.to_string(), "en-US".to_string())
        .expect("failed to build provider")
        .with_base_url(server.uri())
        .with_requests_per_second(100)
}

pub fn movie_json(id: i64, title: &str, runtime: u32) -> Value {
    json!({
        "id": id,
        "title": title,
        "original_title": title,
        "release_date": "1962-04-11",
        "runtime": runtime,
        "genres": [{ "id": 18, "name": "Drama" }],
        "poster_path": format!("/{id}.jpg")
    })
}

pub fn person_json(id: i64, name: &str, department: &str, profile: Option<&str>) -> Value {
    json!({
        "id": id,
        "name": name,
        "known_for_department": department,
        "profile_path": profile
    })
}
