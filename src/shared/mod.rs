// Shared module
pub mod config;
pub mod middleware;
pub mod database;
pub mod errors;
pub mod services;
pub mod telemetry;
pub mod utils;

pub use config::*;
pub use middleware::*;
pub use database::*;
pub use errors::*;
pub use services::*;
pub use utils::*;
