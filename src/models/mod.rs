//! Core data models for the statistics client.

mod ids;
mod range;
mod stats;
mod tracked;

pub use ids::*;
pub use range::*;
pub use stats::*;
pub use tracked::*;
