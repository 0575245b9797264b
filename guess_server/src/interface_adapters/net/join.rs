use crate::interface_adapters::http::{SERVER_NAME, envelope};
use crate::interface_adapters::protocol::JoinGameRequest;
use crate::interface_adapters::state::AppState;

use axum::{
    extract::{Json, State, rejection::JsonRejection},
    http::{StatusCode, header},
    response::{IntoResponse, Response},
};
use std::sync::Arc;
use tracing::{error, info, warn};

const WELCOME: &str = "Welcome to the game, player ;)";

pub async fn health_handler() -> impl IntoResponse {
    (
        [(header::SERVER, SERVER_NAME)],
        "It's working, the game server is up and running\n",
    )
}

pub async fn join_handler(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<JoinGameRequest>, JsonRejection>,
) -> Response {
    let request = match payload {
        Ok(Json(request)) => request,
        Err(rejection) => {
            let detail = rejection.body_text();
            warn!(error = %detail, "join request: invalid json");
            return envelope(StatusCode::BAD_REQUEST, "Error", "Invalid JSON", detail);
        }
    };

    let name = request.name.clone();
    info!(player = %name, "join request sending to engine");

    match state.engine.join(request.into()).await {
        Ok(response) if response.success => {
            envelope(StatusCode::OK, "Success", "Joined Game", WELCOME)
        }
        Ok(response) => {
            warn!(player = %name, reason = %response.message, "join request rejected");
            envelope(
                StatusCode::BAD_REQUEST,
                "Error",
                "Invalid Request",
                response.message,
            )
        }
        Err(e) => {
            error!(player = %name, error = %e, "engine unavailable for join");
            envelope(
                StatusCode::SERVICE_UNAVAILABLE,
                "Error",
                "Engine Unavailable",
                e.to_string(),
            )
        }
    }
}
