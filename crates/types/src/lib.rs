// crates/types/src/lib.rs
//! Shared data model for the OpenClaw memory sync engine.
//!
//! `record` holds the raw wire shapes of the `.jsonl` transcript format;
//! `model` holds the normalized shapes that flow into storage.

pub mod model;
pub mod record;

pub use model::*;
pub use record::*;
