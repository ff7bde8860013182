#![forbid(unsafe_code)]

//! Headless runner for the Vitrine page.
//!
//! Mounts the full [`Portfolio`](vitrine::Portfolio) on a
//! [`HeadlessHost`](vitrine::HeadlessHost), replays a scripted visit on a
//! virtual clock, and writes one JSON line per frame.
//!
//! ```sh
//! RUST_LOG=debug cargo run -p vitrine-harness -- --frames=120 --trace=trace.jsonl
//! ```

pub mod config;
pub mod script;

pub use config::{Command, HarnessConfig};
pub use script::{Action, Summary, TraceRecord, run};
