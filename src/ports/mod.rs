//! Port traits for hexagonal architecture.

pub mod config_port;
pub mod source_port;
pub mod report_port;
