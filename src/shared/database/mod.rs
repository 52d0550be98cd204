// Shared database module
pub mod connection;
pub mod store;
pub mod memory_store;
pub mod repositories;

pub use connection::*;
pub use store::*;
pub use memory_store::*;
pub use repositories::*;
