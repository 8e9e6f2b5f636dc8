pub mod client;
pub mod config;
pub mod error;
pub mod report;
pub mod runner;
pub mod session;

// Re-export common items
pub use config::{HarnessConfig, HeaderStyle};
pub use report::generate_report;
pub use runner::run_scenario;
