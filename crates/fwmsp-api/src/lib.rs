// fwmsp-api: Async Rust client for the Firewalla MSP API v2

pub mod client;
pub mod error;
pub mod search;
pub mod transport;
pub mod types;

pub use client::MspClient;
pub use error::Error;
pub use search::{SearchOutcome, SearchReport};
pub use transport::TransportConfig;
