//! Small helpers shared across layers.

pub mod dates;
pub mod timezone;
