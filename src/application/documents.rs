use std::sync::Arc;

use thiserror::Error;

use crate::application::repos::{DocumentStore, RepoError};
use crate::domain::documents::{Document, POSTS_COLLECTION};
use crate::domain::error::DomainError;

const SLUG_FIELD: &str = "slug";

#[derive(Debug, Error)]
pub enum DocumentError {
    #[error(transparent)]
    Domain(#[from] DomainError),
    #[error(transparent)]
    Repo(#[from] RepoError),
}

/// Post documents kept in the document database.
#[derive(Clone)]
pub struct DocumentService {
    store: Arc<dyn DocumentStore>,
}

impl DocumentService {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self { store }
    }

    pub async fn list_posts(&self) -> Result<Vec<Document>, DocumentError> {
        Ok(self.store.list_documents(POSTS_COLLECTION).await?)
    }

    pub async fn post_by_slug(&self, slug: &str) -> Result<Document, DocumentError> {
        if slug.trim().is_empty() {
            return Err(DomainError::validation("slug must not be empty").into());
        }

        self.store
            .find_by_field(POSTS_COLLECTION, SLUG_FIELD, slug)
            .await?
            .ok_or_else(|| DomainError::not_found("post").into())
    }

    pub async fn health_check(&self) -> Result<(), DocumentError> {
        Ok(self.store.health_check().await?)
    }
}
