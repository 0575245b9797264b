// Shared HTTP response helpers so every endpoint answers with the same envelope.

use crate::interface_adapters::protocol::JoinGameResponse;
use axum::{
    Json,
    http::{StatusCode, header},
    response::{IntoResponse, Response},
};

pub const SERVER_NAME: &str = "NG: Small Browser Based Game Server";

pub fn envelope(
    status: StatusCode,
    kind: &str,
    title: &str,
    detail: impl Into<String>,
) -> Response {
    let body = JoinGameResponse {
        status: status.as_u16(),
        kind: kind.to_string(),
        title: title.to_string(),
        detail: detail.into(),
    };
    (status, [(header::SERVER, SERVER_NAME)], Json(body)).into_response()
}
