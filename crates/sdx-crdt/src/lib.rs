//! CRDT response decoding for the Sardonyx client.
//!
//! The server resolves counters, sets, HyperLogLogs and maps itself and
//! returns the converged state as a nested wire structure. This crate turns
//! that structure into plain Rust values:
//!
//! - [`wire`] - the wire-level fetch response model
//! - [`value`] - the decoded value tree
//! - [`decoder`] - pure functions from one to the other
//!
//! ```rust
//! use sdx_crdt::decoder::decode_map;
//! use sdx_crdt::wire::{MapEntry, MapResponse};
//!
//! let response = MapResponse::new(vec![
//!     MapEntry::counter("visits", 3),
//!     MapEntry::flag("active", true),
//! ]);
//!
//! let tree = decode_map(&response);
//! assert_eq!(tree.counter("visits"), Some(3));
//! assert_eq!(tree.flag("active"), Some(true));
//! ```

pub mod decoder;
pub mod value;
pub mod wire;

pub use decoder::{
    decode_counter, decode_gset, decode_hll, decode_map, decode_response, decode_set,
    DecodedResponse,
};
pub use value::{ByteSet, CrdtValue, MapTree};
pub use wire::{
    CounterResponse, DataType, DtFetchResponse, DtValue, FieldType, MapEntry, MapField,
    MapResponse, SetResponse,
};
