use std::{env, time::Duration};

// Runtime/server settings read from the environment.

pub fn http_port() -> u16 {
    env::var("GAME_SERVER_PORT")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(8089)
}

pub fn tick_interval() -> Duration {
    let millis = env::var("GAME_TICK_INTERVAL_MS")
        .ok()
        .and_then(|value| value.parse::<u64>().ok())
        .filter(|&value| value > 0)
        .unwrap_or(1000);
    Duration::from_millis(millis)
}

// Countdown ticks between a ready game and its first round.
pub fn waiting_count() -> u32 {
    env::var("GAME_WAITING_COUNT")
        .ok()
        .and_then(|value| value.parse().ok())
        .unwrap_or(10)
}

pub fn manual_run() -> bool {
    matches!(
        env::var("GAME_MANUAL_RUN").as_deref(),
        Ok("1") | Ok("true") | Ok("TRUE") | Ok("yes")
    )
}

pub fn subscriber_write_timeout() -> Duration {
    let millis = env::var("SUBSCRIBER_WRITE_TIMEOUT_MS")
        .ok()
        .and_then(|value| value.parse::<u64>().ok())
        .unwrap_or(2000);
    Duration::from_millis(millis)
}

pub fn cors_allowed_origins() -> Vec<String> {
    let raw = env::var("CORS_ALLOWED_ORIGINS")
        .unwrap_or_else(|_| "http://localhost:8091".to_string());
    raw.split(',')
        .map(str::trim)
        .filter(|origin| !origin.is_empty())
        .map(str::to_string)
        .collect()
}

pub const ACTION_CHANNEL_CAPACITY: usize = 64;
// One slot keeps the engine in step with event delivery.
pub const EVENT_CHANNEL_CAPACITY: usize = 1;
