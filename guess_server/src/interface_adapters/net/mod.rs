// Network adapter modules split by subscriber sockets vs plain HTTP routes.

pub mod join;
pub mod subscribe;

pub use join::{health_handler, join_handler};
pub use subscribe::{WsSubscriber, subscribe_handler};
