//! Application orchestration.
//!
//! Runtime wiring and lifecycle management: pick the market, start the
//! synchronizer, inventory tracker and market maker as independent tasks,
//! and stop them together.

pub mod engine;
pub mod orchestrator;
pub mod smoke;
pub mod startup;

pub use engine::{start_engine, EngineSettings, RunningEngine};
pub use orchestrator::{run_smoke, run_with_shutdown};
pub use smoke::{smoke_test, SmokeReport, DEFAULT_SMOKE_TIMEOUT, SMOKE_ORDER_SIZE};
pub use startup::{resolve_ticker, RunOptions};
