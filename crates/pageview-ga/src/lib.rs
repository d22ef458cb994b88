pub mod client;
pub mod credentials;
pub mod token;
pub mod wire;

pub use client::GoogleAnalyticsClient;
