//! Application services: content, documents, rendering and page assembly.

pub mod chrome;
pub mod content;
pub mod documents;
pub mod error;
pub mod feed;
pub mod render;
pub mod repos;
