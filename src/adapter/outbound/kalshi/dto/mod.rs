//! Kalshi data transfer objects.
//!
//! Contains types for API and WebSocket communication:
//! - WebSocket messages (subscriptions, book snapshots and deltas)
//! - REST API request and response bodies

pub mod message;
pub mod response;
