#![allow(dead_code)]

use eventdeck::client::RestClient;
use eventdeck::store::DataProvider;
use mockito::{Mock, ServerGuard};
use serde_json::{Value, json};
use std::sync::Arc;

pub fn users() -> Value {
    json!([
        {"id": "1", "name": "Ada Lovelace", "image": "https://example.com/ada.png"},
        {"id": "2", "name": "Grace Hopper", "image": "https://example.com/grace.png"}
    ])
}

pub fn events() -> Value {
    json!([
        {
            "id": "1",
            "title": "Rust Meetup",
            "description": "Monthly gathering",
            "startTime": "2024-03-10T19:00",
            "endTime": "2024-03-10T21:00",
            "location": "Library",
            "image": "https://example.com/rust.jpg",
            "createdBy": 1,
            "categoryIds": [1]
        },
        {
            "id": "5",
            "title": "Meetup",
            "description": "Board games",
            "startTime": "2024-03-11T18:00",
            "endTime": "2024-03-11T22:00",
            "location": "Cafe",
            "image": "",
            "createdBy": 2,
            "categoryIds": [2],
            "attendees": 12
        }
    ])
}

pub fn categories() -> Value {
    json!([
        {"id": "1", "name": "tech"},
        {"id": "2", "name": "games"},
        {"id": "3", "name": "relaxation"}
    ])
}

pub async fn mock_json(server: &mut ServerGuard, path: &str, body: &Value) -> Mock {
    server
        .mock("GET", path)
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(body.to_string())
        .create_async()
        .await
}

/// Mocks all three collections with the fixtures above.
pub async fn mock_collections(server: &mut ServerGuard) -> (Mock, Mock, Mock) {
    let u = mock_json(server, "/users", &users()).await;
    let e = mock_json(server, "/events", &events()).await;
    let c = mock_json(server, "/categories", &categories()).await;
    (u, e, c)
}

pub fn provider_for(server: &ServerGuard) -> Arc<DataProvider> {
    let client = RestClient::new(&server.url(), false).expect("mock server url is valid");
    Arc::new(DataProvider::new(client))
}
