// crates/sync/src/lib.rs
pub mod sync;

pub use sync::*;
