// GoodHive identity server
pub mod domains;
pub mod shared;
pub mod routes;
