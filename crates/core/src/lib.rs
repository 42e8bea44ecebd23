// crates/core/src/lib.rs
pub mod cron;
pub mod discovery;
pub mod error;
pub mod extract;
pub mod parser;

pub use cron::*;
pub use discovery::*;
pub use error::*;
pub use extract::*;
pub use parser::*;
