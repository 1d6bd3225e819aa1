//! Kalshi exchange integration.

pub mod client;
pub mod dto;
pub mod settings;
pub mod signer;
pub mod stream;

pub use client::KalshiClient;
pub use signer::Signer;
pub use stream::KalshiBookFeed;
