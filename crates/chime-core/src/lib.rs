//! # chime-core
//!
//! Core types and error handling for the chime sound engine.

pub mod error;
pub mod types;

pub use error::{Error, Result};
pub use types::*;
