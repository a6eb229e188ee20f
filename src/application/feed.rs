use std::sync::Arc;

use serde_json::Value;
use thiserror::Error;
use tracing::debug;

use crate::application::content::{ContentError, ContentService};
use crate::application::error::HttpError;
use crate::application::render::{ArticleRenderer, render_rich_text};
use crate::config::SiteSettings;
use crate::domain::content::{ArticleDetail, ArticleSummary, Comment};
use crate::presentation::views::{ArticleCard, ArticleDetailContext, CommentView, IndexContext};
use crate::util::dates::format_date;

const SOURCE: &str = "application::feed::FeedService";
const ANONYMOUS_AUTHOR: &str = "Anonymous";

#[derive(Debug, Error)]
pub enum FeedError {
    #[error(transparent)]
    Content(#[from] ContentError),
}

impl From<FeedError> for HttpError {
    fn from(error: FeedError) -> Self {
        match error {
            FeedError::Content(inner) => inner.into(),
        }
    }
}

/// Turns content-service records into the view models of the public pages.
#[derive(Clone)]
pub struct FeedService {
    content: ContentService,
    renderer: Arc<ArticleRenderer>,
    site: SiteSettings,
}

impl FeedService {
    pub fn new(content: ContentService, renderer: Arc<ArticleRenderer>, site: SiteSettings) -> Self {
        Self {
            content,
            renderer,
            site,
        }
    }

    pub async fn index_context(&self) -> Result<IndexContext, FeedError> {
        let articles = self.content.list_articles().await?;
        let cards: Vec<ArticleCard> = articles
            .iter()
            .map(|article| self.summary_to_card(article))
            .collect();

        Ok(IndexContext {
            has_results: !cards.is_empty(),
            articles: cards,
        })
    }

    pub async fn post_detail(&self, slug: &str) -> Result<Option<ArticleDetailContext>, FeedError> {
        let Some(detail) = self.content.article_by_slug(slug).await? else {
            return Ok(None);
        };

        let ArticleDetail {
            summary,
            content,
            comments,
        } = detail;

        let rendered = self.renderer.render(&content);
        debug!(
            target: SOURCE,
            slug,
            blocks = rendered.block_count,
            comments = comments.len(),
            "Article prepared"
        );

        let card = self.summary_to_card(&summary);
        let description = if summary.seo_keywords.trim().is_empty() {
            self.site.description.clone()
        } else {
            summary.seo_keywords.clone()
        };

        Ok(Some(ArticleDetailContext {
            comment_action: format!("/posts/{}/comments", summary.slug),
            slug: summary.slug,
            title: card.title,
            description,
            category: card.category,
            published: card.published,
            author: card.author,
            tags: card.tags,
            featured_image_url: card.featured_image_url,
            body_html: rendered.html,
            has_code_blocks: rendered.contains_code,
            comments: comments
                .iter()
                .map(|comment| self.comment_view(comment))
                .collect(),
        }))
    }

    fn summary_to_card(&self, summary: &ArticleSummary) -> ArticleCard {
        ArticleCard {
            href: format!("/posts/{}", summary.slug),
            title: summary.title.clone(),
            category: summary.category.clone(),
            published: format_date(
                &summary.publish_date,
                &self.site.date_format,
                self.site.timezone,
            ),
            author: summary.author.clone(),
            tags: summary.tags.clone(),
            featured_image_url: summary.featured_image_url.clone(),
        }
    }

    fn comment_view(&self, comment: &Comment) -> CommentView {
        CommentView {
            author: comment
                .author
                .clone()
                .unwrap_or_else(|| ANONYMOUS_AUTHOR.to_string()),
            created: format_date(
                &Value::String(comment.created_time.clone()),
                &self.site.date_format,
                self.site.timezone,
            ),
            body_html: render_rich_text(&comment.rich_text),
        }
    }
}
