//! Implementations of ports (hexagonal adapters).
//!
//! - [`inbound`] - Command-line entry points
//! - [`outbound`] - Exchange clients

pub mod inbound;
pub mod outbound;
