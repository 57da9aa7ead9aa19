// File: `crates/sdx-query/src/lib.rs`
pub mod error;
pub mod phase;
pub mod results;

pub use error::{QueryError, Result};
pub use phase::{Phase, PhaseKind};
pub use results::{PhaseResults, Report};
