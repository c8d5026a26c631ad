//! Port traits: the boundaries between the indicator engine and the outside world.

pub mod chart_port;
pub mod config_port;
pub mod price_port;
pub mod report_port;
