// Auth domain models
pub mod user;
pub mod metadata;
pub mod history;
pub mod wallet;
pub mod jwt;
pub mod legacy;

pub use user::*;
pub use metadata::*;
pub use history::*;
pub use wallet::*;
pub use jwt::*;
pub use legacy::*;
