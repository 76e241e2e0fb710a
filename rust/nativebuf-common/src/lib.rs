//! Core definitions (error type and `Result` alias), relied upon by all nativebuf-* crates.

pub mod error;
pub mod result;

pub use result::Result;
