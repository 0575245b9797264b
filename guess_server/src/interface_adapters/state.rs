use crate::use_cases::{BroadcasterHandle, EngineHandle};

#[derive(Clone)]
pub struct AppState {
    // Actions flowing from HTTP handlers into the engine loop.
    pub engine: EngineHandle,
    // Subscription requests for the event fan-out loop.
    pub broadcaster: BroadcasterHandle,
}
