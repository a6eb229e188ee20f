//! Traits describing the outbound adapters: the document store and the content API.

use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;

use crate::domain::blocks::Block;
use crate::domain::content::{ArticleSummary, Comment};
use crate::domain::documents::Document;

#[derive(Debug, Error)]
pub enum RepoError {
    #[error("persistence error: {0}")]
    Persistence(String),
    #[error("document store is not configured")]
    Unavailable,
    #[error("database timeout")]
    Timeout,
    #[error("stored document `{id}` is malformed: {message}")]
    Malformed { id: String, message: String },
}

impl RepoError {
    pub fn from_persistence(err: impl std::fmt::Display) -> Self {
        Self::Persistence(err.to_string())
    }
}

/// Read access to named collections of JSON documents.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    async fn list_documents(&self, collection: &str) -> Result<Vec<Document>, RepoError>;

    /// First document of `collection` whose top-level string `field` equals `value`.
    async fn find_by_field(
        &self,
        collection: &str,
        field: &str,
        value: &str,
    ) -> Result<Option<Document>, RepoError>;

    async fn health_check(&self) -> Result<(), RepoError>;
}

#[derive(Debug, Error)]
pub enum ContentApiError {
    #[error("content api base url is not configured")]
    NotConfigured,
    #[error("request to `{endpoint}` failed: {message}")]
    Transport {
        endpoint: &'static str,
        message: String,
    },
    #[error("`{endpoint}` answered with status {status}")]
    Status { endpoint: &'static str, status: u16 },
    #[error("`{endpoint}` returned an unreadable body: {message}")]
    Decode {
        endpoint: &'static str,
        message: String,
    },
}

/// An article as fetched by id. `content` is `None` when the upstream record
/// carried no inline blocks and they must be fetched separately.
#[derive(Debug, Clone, PartialEq)]
pub struct FetchedArticle {
    pub summary: ArticleSummary,
    pub content: Option<Vec<Block>>,
}

/// The remote content API fronting the workspace tool.
#[async_trait]
pub trait ContentApi: Send + Sync {
    async fn list_articles(&self) -> Result<Vec<ArticleSummary>, ContentApiError>;

    async fn get_article(&self, id: &str) -> Result<Option<FetchedArticle>, ContentApiError>;

    async fn get_blocks(&self, page_id: &str) -> Result<Vec<Block>, ContentApiError>;

    async fn list_comments(&self, page_id: &str) -> Result<Vec<Comment>, ContentApiError>;

    async fn add_comment(&self, page_id: &str, text: &str) -> Result<Value, ContentApiError>;
}
