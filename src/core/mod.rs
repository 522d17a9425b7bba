//! Core types and constants for the frame maintainer

pub mod types;
pub mod constants;

pub use types::*;
pub use constants::*;
