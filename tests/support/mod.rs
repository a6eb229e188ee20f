#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::{Router, body::Body};
use chrono_tz::Tz;
use http_body_util::BodyExt;
use serde_json::{Value, json};
use url::Url;

use tintero::application::chrome::ChromeService;
use tintero::application::content::ContentService;
use tintero::application::documents::DocumentService;
use tintero::application::feed::FeedService;
use tintero::application::render::ArticleRenderer;
use tintero::application::repos::{
    ContentApi, ContentApiError, DocumentStore, FetchedArticle, RepoError,
};
use tintero::config::{DEFAULT_DATE_FORMAT, SiteSettings};
use tintero::domain::blocks::{Block, RichTextSegment};
use tintero::domain::content::{ArticleSummary, Comment};
use tintero::domain::documents::Document;
use tintero::infra::http::{self, ApiState, HttpState, RouterState};

/// In-memory content API. Articles listed in `blocks_only` come back without
/// inline content so the service has to call `get_blocks`.
#[derive(Default)]
pub struct FakeContentApi {
    pub articles: Vec<ArticleSummary>,
    pub content: HashMap<String, Vec<Block>>,
    pub blocks_only: Vec<String>,
    pub comments: HashMap<String, Vec<Comment>>,
    pub fail_comments: bool,
    pub fail_listing: bool,
    pub posted: Mutex<Vec<(String, String)>>,
}

impl FakeContentApi {
    pub fn with_article(mut self, summary: ArticleSummary, content: Vec<Block>) -> Self {
        self.content.insert(summary.id.clone(), content);
        self.articles.push(summary);
        self
    }

    pub fn with_comment(mut self, page_id: &str, author: Option<&str>, text: &str) -> Self {
        let comments = self.comments.entry(page_id.to_string()).or_default();
        comments.push(Comment {
            id: format!("c-{}", comments.len() + 1),
            created_time: "2024-03-05T08:07:09.000Z".to_string(),
            rich_text: vec![RichTextSegment::plain(text)],
            author: author.map(str::to_string),
        });
        self
    }

    pub fn posted(&self) -> Vec<(String, String)> {
        self.posted.lock().expect("posted lock").clone()
    }
}

#[async_trait]
impl ContentApi for FakeContentApi {
    async fn list_articles(&self) -> Result<Vec<ArticleSummary>, ContentApiError> {
        if self.fail_listing {
            return Err(ContentApiError::Status {
                endpoint: "articles",
                status: 500,
            });
        }
        Ok(self.articles.clone())
    }

    async fn get_article(&self, id: &str) -> Result<Option<FetchedArticle>, ContentApiError> {
        let Some(summary) = self.articles.iter().find(|article| article.id == id) else {
            return Ok(None);
        };
        let content = if self.blocks_only.iter().any(|only| only == id) {
            None
        } else {
            Some(self.content.get(id).cloned().unwrap_or_default())
        };
        Ok(Some(FetchedArticle {
            summary: summary.clone(),
            content,
        }))
    }

    async fn get_blocks(&self, page_id: &str) -> Result<Vec<Block>, ContentApiError> {
        Ok(self.content.get(page_id).cloned().unwrap_or_default())
    }

    async fn list_comments(&self, page_id: &str) -> Result<Vec<Comment>, ContentApiError> {
        if self.fail_comments {
            return Err(ContentApiError::Transport {
                endpoint: "comments",
                message: "connection reset".to_string(),
            });
        }
        Ok(self.comments.get(page_id).cloned().unwrap_or_default())
    }

    async fn add_comment(&self, page_id: &str, text: &str) -> Result<Value, ContentApiError> {
        self.posted
            .lock()
            .expect("posted lock")
            .push((page_id.to_string(), text.to_string()));
        Ok(json!({ "id": "new-comment", "pageId": page_id, "text": text }))
    }
}

#[derive(Default)]
pub struct FakeDocumentStore {
    pub documents: HashMap<String, Vec<Document>>,
    pub unavailable: bool,
}

impl FakeDocumentStore {
    pub fn unavailable() -> Self {
        Self {
            unavailable: true,
            ..Self::default()
        }
    }

    pub fn with_post(mut self, id: &str, data: Value) -> Self {
        let Value::Object(map) = data else {
            panic!("post data must be a JSON object");
        };
        self.documents
            .entry("posts".to_string())
            .or_default()
            .push(Document::new(id, map));
        self
    }
}

#[async_trait]
impl DocumentStore for FakeDocumentStore {
    async fn list_documents(&self, collection: &str) -> Result<Vec<Document>, RepoError> {
        if self.unavailable {
            return Err(RepoError::Unavailable);
        }
        Ok(self.documents.get(collection).cloned().unwrap_or_default())
    }

    async fn find_by_field(
        &self,
        collection: &str,
        field: &str,
        value: &str,
    ) -> Result<Option<Document>, RepoError> {
        if self.unavailable {
            return Err(RepoError::Unavailable);
        }
        Ok(self.documents.get(collection).and_then(|documents| {
            documents
                .iter()
                .find(|document| document.field_str(field) == Some(value))
                .cloned()
        }))
    }

    async fn health_check(&self) -> Result<(), RepoError> {
        if self.unavailable {
            return Err(RepoError::Unavailable);
        }
        Ok(())
    }
}

pub fn site_settings() -> SiteSettings {
    SiteSettings {
        name: "Tintero".to_string(),
        description: "Notes and articles".to_string(),
        url: Url::parse("https://blog.example.com/").expect("site url"),
        timezone: Tz::UTC,
        date_format: DEFAULT_DATE_FORMAT.to_string(),
    }
}

pub fn summary(id: &str, title: &str) -> ArticleSummary {
    ArticleSummary {
        category: "Notes".to_string(),
        tags: vec!["rust".to_string()],
        author: "Ada".to_string(),
        ..ArticleSummary::new(id, title)
    }
}

pub fn paragraph(text: &str) -> Block {
    Block::Paragraph {
        rich_text: vec![RichTextSegment::plain(text)],
    }
}

/// Same wiring as the server binary, over fakes.
pub fn router_state(api: Arc<FakeContentApi>, store: Arc<FakeDocumentStore>) -> RouterState {
    let content = Arc::new(ContentService::new(api));
    let documents = Arc::new(DocumentService::new(store));
    let feed = Arc::new(FeedService::new(
        content.as_ref().clone(),
        Arc::new(ArticleRenderer::default()),
        site_settings(),
    ));
    let chrome = Arc::new(ChromeService::new(site_settings()));

    RouterState {
        http: HttpState {
            feed,
            content: content.clone(),
            documents: documents.clone(),
            chrome,
        },
        api: ApiState { content, documents },
    }
}

pub fn app(api: Arc<FakeContentApi>, store: Arc<FakeDocumentStore>) -> Router {
    http::build_app(router_state(api, store))
}

pub async fn body_to_string(body: Body) -> String {
    let bytes = body.collect().await.expect("collect body").to_bytes();
    String::from_utf8(bytes.to_vec()).expect("utf8 body")
}

pub async fn body_to_json(body: Body) -> Value {
    let bytes = body.collect().await.expect("collect body").to_bytes();
    serde_json::from_slice(&bytes).expect("json body")
}
