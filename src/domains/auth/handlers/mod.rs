// Auth domain handlers
pub mod wallet_handler;
pub mod auth_handler;

pub use wallet_handler::*;
pub use auth_handler::*;
