//! Domain models for SpiceTrack

mod product;
mod purchase;
mod supplier;
mod user;

pub use product::*;
pub use purchase::*;
pub use supplier::*;
pub use user::*;
