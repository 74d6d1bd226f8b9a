//! Poster lookups against a local stand-in for the TMDB API.

use std::collections::HashMap;
use std::net::SocketAddr;

use axum::{
    extract::{Path, Query},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use poster_client::{PosterClient, PosterError, PosterSource};
use serde_json::json;

async fn movie(Path(id): Path<String>, Query(params): Query<HashMap<String, String>>) -> Response {
    if params.get("api_key").map(String::as_str) != Some("test-key") {
        return (
            StatusCode::UNAUTHORIZED,
            Json(json!({"status_code": 7, "status_message": "Invalid API key"})),
        )
            .into_response();
    }
    if params.get("language").map(String::as_str) != Some("en-US") {
        return StatusCode::BAD_REQUEST.into_response();
    }

    match id.as_str() {
        "27205" => Json(json!({"id": 27205, "poster_path": "/inception.jpg"})).into_response(),
        "155" => Json(json!({"id": 155, "poster_path": null})).into_response(),
        "13" => Json(json!({"id": 13, "poster_path": ""})).into_response(),
        "99" => Json(json!({"id": 99, "title": "No poster field"})).into_response(),
        "500" => "definitely not json".into_response(),
        _ => (
            StatusCode::NOT_FOUND,
            Json(json!({"status_code": 34, "status_message": "Not found"})),
        )
            .into_response(),
    }
}

async fn spawn_stub() -> SocketAddr {
    let app = Router::new().route("/3/movie/:id", get(movie));
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    addr
}

async fn client(api_key: &str) -> PosterClient {
    let addr = spawn_stub().await;
    PosterClient::new(api_key, None)
        .unwrap()
        .with_api_url(format!("http://{}/3", addr))
}

#[tokio::test]
async fn test_poster_path_is_joined_to_image_base() {
    let client = client("test-key").await;
    assert_eq!(
        client.poster_url("27205").await,
        "https://image.tmdb.org/t/p/w500/inception.jpg"
    );
}

#[tokio::test]
async fn test_missing_or_empty_poster_path_gives_empty_url() {
    let client = client("test-key").await;
    assert_eq!(client.poster_url("155").await, "");
    assert_eq!(client.poster_url("13").await, "");
    assert_eq!(client.poster_url("99").await, "");
    assert!(client.try_poster_url("99").await.unwrap().is_none());
}

#[tokio::test]
async fn test_bad_body_gives_empty_url() {
    let client = client("test-key").await;
    assert_eq!(client.poster_url("500").await, "");
    assert!(matches!(
        client.try_poster_url("500").await,
        Err(PosterError::Http(_))
    ));
}

#[tokio::test]
async fn test_error_status_gives_empty_url() {
    let client = client("test-key").await;
    assert_eq!(client.poster_url("404404").await, "");
    assert!(matches!(
        client.try_poster_url("404404").await,
        Err(PosterError::Status(status)) if status.as_u16() == 404
    ));
}

#[tokio::test]
async fn test_wrong_api_key_gives_empty_url() {
    let client = client("wrong-key").await;
    assert_eq!(client.poster_url("27205").await, "");
}
