// Auth domain services
pub mod identity_resolver;
pub mod account_writer;
pub mod session_issuer;
pub mod wallet_auth_service;
pub mod legacy_auth_service;
pub mod account_service;
pub mod state;

pub use identity_resolver::*;
pub use account_writer::*;
pub use session_issuer::*;
pub use wallet_auth_service::*;
pub use legacy_auth_service::*;
pub use account_service::*;
pub use state::*;
