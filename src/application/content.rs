use std::sync::Arc;

use serde_json::Value;
use thiserror::Error;
use tracing::{info, warn};

use crate::application::repos::{ContentApi, ContentApiError, FetchedArticle};
use crate::domain::blocks::Block;
use crate::domain::content::{ArticleDetail, ArticleSummary, Comment};
use crate::domain::error::DomainError;

const SOURCE: &str = "application::content::ContentService";

#[derive(Debug, Error)]
pub enum ContentError {
    #[error(transparent)]
    Domain(#[from] DomainError),
    #[error(transparent)]
    Api(#[from] ContentApiError),
}

/// Articles, blocks and comments from the content API.
#[derive(Clone)]
pub struct ContentService {
    api: Arc<dyn ContentApi>,
}

impl ContentService {
    pub fn new(api: Arc<dyn ContentApi>) -> Self {
        Self { api }
    }

    pub async fn list_articles(&self) -> Result<Vec<ArticleSummary>, ContentError> {
        Ok(self.api.list_articles().await?)
    }

    /// First listed article whose derived slug equals `slug`.
    pub async fn summary_by_slug(&self, slug: &str) -> Result<Option<ArticleSummary>, ContentError> {
        let articles = self.api.list_articles().await?;
        Ok(articles
            .into_iter()
            .find(|article| article.slug == slug && !article.id.is_empty()))
    }

    /// Resolve a slug to a full article. Unknown slugs yield `None`.
    pub async fn article_by_slug(&self, slug: &str) -> Result<Option<ArticleDetail>, ContentError> {
        let Some(summary) = self.summary_by_slug(slug).await? else {
            return Ok(None);
        };

        let Some(FetchedArticle {
            summary: mut fetched,
            content,
        }) = self.api.get_article(&summary.id).await?
        else {
            return Ok(None);
        };

        let (content, comments) = tokio::try_join!(
            self.content_or_blocks(&summary.id, content),
            self.comments_best_effort(&summary.id),
        )?;

        // The slug in the URL is authoritative even if the title changed upstream.
        fetched.slug = slug.to_string();

        Ok(Some(ArticleDetail {
            summary: fetched,
            content,
            comments,
        }))
    }

    /// Post a comment on a page and hand back whatever the API answered.
    pub async fn add_comment(&self, page_id: &str, comment: &str) -> Result<Value, ContentError> {
        if page_id.trim().is_empty() {
            return Err(DomainError::validation("page id must not be empty").into());
        }
        if comment.trim().is_empty() {
            return Err(DomainError::validation("comment must not be blank").into());
        }

        let result = self.api.add_comment(page_id, comment).await?;
        info!(target: SOURCE, page_id, "Comment submitted");
        Ok(result)
    }

    /// Comment on the article behind `slug`. Unknown slugs yield `None`.
    pub async fn comment_on_article(
        &self,
        slug: &str,
        comment: &str,
    ) -> Result<Option<Value>, ContentError> {
        if comment.trim().is_empty() {
            return Err(DomainError::validation("comment must not be blank").into());
        }
        let Some(summary) = self.summary_by_slug(slug).await? else {
            return Ok(None);
        };
        self.add_comment(&summary.id, comment).await.map(Some)
    }

    async fn content_or_blocks(
        &self,
        page_id: &str,
        content: Option<Vec<Block>>,
    ) -> Result<Vec<Block>, ContentError> {
        match content {
            Some(blocks) => Ok(blocks),
            None => Ok(self.api.get_blocks(page_id).await?),
        }
    }

    async fn comments_best_effort(&self, page_id: &str) -> Result<Vec<Comment>, ContentError> {
        match self.api.list_comments(page_id).await {
            Ok(comments) => Ok(comments),
            Err(err) => {
                warn!(target: SOURCE, page_id, error = %err, "Failed to load comments");
                Ok(Vec::new())
            }
        }
    }
}
