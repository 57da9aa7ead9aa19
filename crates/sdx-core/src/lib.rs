// File: `crates/sdx-core/src/lib.rs`
pub mod error;
pub mod gset;
pub mod lattice;

pub use error::{CoreError, Result};
pub use gset::GSet;
pub use lattice::Lattice;
