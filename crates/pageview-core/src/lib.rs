pub mod config;
pub mod error;
pub mod pageview;
pub mod report;
pub mod store;
pub mod synthetic;
