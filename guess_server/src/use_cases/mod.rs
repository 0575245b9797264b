// Use cases layer: the engine and broadcaster loops and their message types.

pub mod broadcaster;
pub mod engine;
#[cfg(test)]
pub(crate) mod test_support;
pub mod types;

pub use broadcaster::{
    Broadcaster, BroadcasterClosed, BroadcasterHandle, Subscriber, SubscriberError,
};
pub use engine::{Engine, EngineError, EngineHandle};
pub use types::{Action, ActionResponse, EngineConfig, Event};
