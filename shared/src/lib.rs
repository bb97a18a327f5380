//! Shared types and models for SpiceTrack
//!
//! This crate contains domain types shared between the client core and any
//! front end embedding it.

pub mod models;
pub mod types;
pub mod validation;

pub use models::*;
pub use types::*;
pub use validation::*;
