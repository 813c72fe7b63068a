//! Core order types, diagnostics, and errors.
//!
//! This module provides the value types every other module works on:
//! orders reduced to what cost allocation needs, and the bilingual
//! diagnostic messages produced when configuration is invalid.

mod diagnostics;
mod error;
mod types;

pub use diagnostics::*;
pub use error::*;
pub use types::*;
