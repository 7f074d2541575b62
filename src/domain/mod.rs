//! Core domain types and logic.

pub mod raw_table;
pub mod jurisdiction;
pub mod trade;
pub mod assembly;
pub mod balance;
pub mod tariff;
pub mod breakdown;
pub mod ranking;
pub mod scenario;
pub mod states;
pub mod config_validation;
pub mod error;
