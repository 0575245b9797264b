mod support;

use reqwest::StatusCode;
use serde_json::{Value, json};

const SERVER_HEADER: &str = "NG: Small Browser Based Game Server";

async fn post_join(body: &Value) -> (StatusCode, Option<String>, Value) {
    let base_url = support::ensure_server();
    let res = reqwest::Client::new()
        .post(format!("{base_url}/join"))
        .json(body)
        .send()
        .await
        .expect("request should succeed");

    let status = res.status();
    let server = res
        .headers()
        .get(reqwest::header::SERVER)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);
    let body = res.json::<Value>().await.expect("body should be json");
    (status, server, body)
}

#[tokio::test]
async fn health_check_answers_with_server_header() {
    let base_url = support::ensure_server();
    let res = reqwest::get(format!("{base_url}/"))
        .await
        .expect("request should succeed");

    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(
        res.headers()
            .get(reqwest::header::SERVER)
            .and_then(|v| v.to_str().ok()),
        Some(SERVER_HEADER)
    );
}

#[tokio::test]
async fn join_succeeds_for_new_player() {
    let name = support::unique_name("steve");
    let (status, server, body) =
        post_join(&json!({ "name": name, "first": 5, "second": 3 })).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(server.as_deref(), Some(SERVER_HEADER));
    assert_eq!(
        body,
        json!({
            "status": 200,
            "type": "Success",
            "title": "Joined Game",
            "detail": "Welcome to the game, player ;)"
        })
    );
}

#[tokio::test]
async fn join_rejects_taken_name() {
    let name = support::unique_name("twice");
    let payload = json!({ "name": name, "first": 2, "second": 9 });

    let (first_status, _, _) = post_join(&payload).await;
    assert_eq!(first_status, StatusCode::OK);

    let (status, _, body) = post_join(&payload).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["status"], 400);
    assert_eq!(body["type"], "Error");
    assert_eq!(body["title"], "Invalid Request");
    assert_eq!(
        body["detail"],
        "Invalid name: There is already a player here with that name"
    );
}

#[tokio::test]
async fn join_rejects_out_of_range_choice() {
    let name = support::unique_name("greedy");
    let (status, _, body) = post_join(&json!({ "name": name, "first": 11, "second": 3 })).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["title"], "Invalid Request");
    assert!(
        body["detail"]
            .as_str()
            .is_some_and(|detail| detail.contains("1 - 10")),
        "unexpected detail: {body}"
    );
}

#[tokio::test]
async fn join_rejects_malformed_json() {
    let base_url = support::ensure_server();
    let res = reqwest::Client::new()
        .post(format!("{base_url}/join"))
        .header(reqwest::header::CONTENT_TYPE, "application/json")
        .body("{\"name\": \"broken\", \"first\": ")
        .send()
        .await
        .expect("request should succeed");

    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body = res.json::<Value>().await.expect("body should be json");
    assert_eq!(body["status"], 400);
    assert_eq!(body["title"], "Invalid JSON");
}
