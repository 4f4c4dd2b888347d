//! # vidimus-storage
//!
//! Storage abstraction for the Vidimus approval board.
//!
//! The board aggregator is a pure derivation over records owned by an
//! external relational store. This crate defines the read-only surface the
//! aggregator consumes ([`BoardStore`]) and ships one backend:
//!
//! - [`memory::MemoryStore`]: in-process maps behind an async lock, used by
//!   tests and the CLI.
//!
//! Backend failures propagate to the caller unchanged; this layer performs
//! no retries.

pub mod error;
pub mod memory;
pub mod traits;

pub use error::{Error, Result};
pub use memory::MemoryStore;
pub use traits::BoardStore;
