//! Core domain types and logic.

pub mod price;
pub mod indicator;
pub mod strategy;
pub mod portfolio;
pub mod execution;
pub mod ledger;
pub mod summary;
pub mod backtest;
pub mod transform;
pub mod config_validation;
pub mod error;
