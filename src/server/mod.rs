mod auth_routes;
pub mod config;
pub mod error;
mod http_layers;
pub mod server;
pub mod state;
mod vote_routes;

pub use auth_routes::TOKENS_PATH;
pub use config::ServerConfig;
pub use error::ApiError;
pub use http_layers::*;
pub use server::{make_app, run_server};
pub(self) use auth_routes::make_auth_routes;
pub(self) use vote_routes::make_vote_routes;
