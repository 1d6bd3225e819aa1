//! Outbound adapters (driven side).

pub mod kalshi;
