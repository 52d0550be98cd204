// Admin domain services
pub mod role_service;
pub mod state;

pub use role_service::*;
pub use state::*;
