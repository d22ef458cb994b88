pub mod backend;
pub mod schema;
pub mod store_impl;

pub use backend::DuckDbBackend;
