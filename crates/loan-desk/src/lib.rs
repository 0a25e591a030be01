pub mod client;
pub mod config;
pub mod error;
pub mod lending;
pub mod session;
pub mod telemetry;
