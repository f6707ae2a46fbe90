//! CardDrop Server - hosted reward service library

pub mod catalog;
pub mod config;
pub mod routes;
mod state;

pub use catalog::CardCatalog;
pub use config::ServerConfig;
pub use routes::build_router;
pub use state::AppState;
