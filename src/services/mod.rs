pub mod chat;
pub mod details;
pub mod discovery;
pub mod generation;
pub mod logger;
pub mod providers;
pub mod status;

pub use chat::{ChatService, Exchange};
pub use discovery::DiscoveryService;
