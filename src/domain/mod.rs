//! Domain layer types and invariants.

pub mod blocks;
pub mod content;
pub mod documents;
pub mod error;
pub mod slug;
