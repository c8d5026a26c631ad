//! Core domain types and logic.

pub mod chart;
pub mod config;
pub mod engine;
pub mod error;
pub mod indicator;
pub mod price;
pub mod table;
