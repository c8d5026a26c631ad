//! price-indices: volatility, RSI, Bollinger, MACD, SMA and EMA indicators
//! over daily cryptocurrency price series.
//!
//! Hexagonal architecture: domain logic in [`domain`], port traits in [`ports`],
//! concrete implementations in [`adapters`].

pub mod adapters;
pub mod cli;
pub mod domain;
pub mod ports;
