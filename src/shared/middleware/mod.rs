// Request extractors
pub mod auth;
pub mod client_context;

pub use auth::*;
pub use client_context::*;
