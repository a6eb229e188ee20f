//! HTTP client for the remote content API (`{base}/api/notion/...`).

use std::sync::Arc;
use std::time::Instant;

use async_trait::async_trait;
use metrics::{counter, histogram};
use reqwest::{Client, Method, StatusCode, Url};
use serde_json::{Value, json};
use tracing::debug;

use crate::application::repos::{ContentApi, ContentApiError, FetchedArticle};
use crate::config::ContentApiSettings;
use crate::domain::blocks::Block;
use crate::domain::content::{ArticleSummary, Comment};

use super::error::InfraError;

const SOURCE: &str = "infra::content_api";
const METRIC_REQUESTS: &str = "tintero_content_api_requests_total";
const METRIC_LATENCY: &str = "tintero_content_api_latency_ms";
const API_PREFIX: [&str; 2] = ["api", "notion"];
const COMMENT_USER_ID: &str = "anonymous";

const ENDPOINT_ARTICLES: &str = "articles";
const ENDPOINT_ARTICLE: &str = "article";
const ENDPOINT_BLOCKS: &str = "blocks";
const ENDPOINT_COMMENTS: &str = "comments";
const ENDPOINT_ADD_COMMENT: &str = "add_comment";

/// Pick the content API adapter for `settings`: the HTTP client when a base
/// URL is configured, otherwise an adapter that refuses every call.
pub fn build_content_api(settings: &ContentApiSettings) -> Result<Arc<dyn ContentApi>, InfraError> {
    match &settings.base_url {
        Some(base) => Ok(Arc::new(HttpContentApi::new(base.clone(), settings)?)),
        None => Ok(Arc::new(DisabledContentApi)),
    }
}

#[derive(Clone, Debug)]
pub struct HttpContentApi {
    client: Client,
    base: Url,
}

impl HttpContentApi {
    pub fn new(base: Url, settings: &ContentApiSettings) -> Result<Self, InfraError> {
        if base.cannot_be_a_base() {
            return Err(InfraError::configuration(format!(
                "content api base url `{base}` cannot carry a path"
            )));
        }

        let client = Client::builder()
            .user_agent(Self::user_agent())
            .timeout(settings.timeout)
            .build()
            .map_err(|err| InfraError::content_api(err.to_string()))?;

        Ok(Self { client, base })
    }

    pub fn user_agent() -> &'static str {
        concat!("tintero/", env!("CARGO_PKG_VERSION"))
    }

    fn url(&self, segments: &[&str]) -> Url {
        let mut url = self.base.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(API_PREFIX).extend(segments);
        }
        url
    }

    async fn request(
        &self,
        endpoint: &'static str,
        method: Method,
        segments: &[&str],
        body: Option<Value>,
    ) -> Result<Value, ContentApiError> {
        let started = Instant::now();
        let result = self.execute(endpoint, method, segments, body).await;

        let elapsed_ms = started.elapsed().as_secs_f64() * 1000.0;
        histogram!(METRIC_LATENCY, "endpoint" => endpoint).record(elapsed_ms);
        let outcome = if result.is_ok() { "ok" } else { "error" };
        counter!(METRIC_REQUESTS, "endpoint" => endpoint, "outcome" => outcome).increment(1);
        debug!(target: SOURCE, endpoint, outcome, elapsed_ms, "Content API call finished");

        result
    }

    async fn execute(
        &self,
        endpoint: &'static str,
        method: Method,
        segments: &[&str],
        body: Option<Value>,
    ) -> Result<Value, ContentApiError> {
        let mut request = self.client.request(method, self.url(segments));
        if let Some(body) = body {
            request = request.json(&body);
        }

        let response = request
            .send()
            .await
            .map_err(|err| ContentApiError::Transport {
                endpoint,
                message: err.to_string(),
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(ContentApiError::Status {
                endpoint,
                status: status.as_u16(),
            });
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|err| ContentApiError::Transport {
                endpoint,
                message: err.to_string(),
            })?;
        serde_json::from_slice(&bytes).map_err(|err| ContentApiError::Decode {
            endpoint,
            message: err.to_string(),
        })
    }
}

fn succeeded(body: &Value) -> bool {
    body.get("success").and_then(Value::as_bool).unwrap_or(false)
}

#[async_trait]
impl ContentApi for HttpContentApi {
    async fn list_articles(&self) -> Result<Vec<ArticleSummary>, ContentApiError> {
        let body = self
            .request(ENDPOINT_ARTICLES, Method::GET, &["articles"], None)
            .await?;

        let articles = match body.get("articles").and_then(Value::as_array) {
            Some(articles) if succeeded(&body) => articles,
            _ => return Ok(Vec::new()),
        };

        Ok(articles
            .iter()
            .filter_map(ArticleSummary::from_value)
            .collect())
    }

    async fn get_article(&self, id: &str) -> Result<Option<FetchedArticle>, ContentApiError> {
        let body = match self
            .request(ENDPOINT_ARTICLE, Method::GET, &["articles", id], None)
            .await
        {
            Ok(body) => body,
            Err(ContentApiError::Status { status, .. })
                if status == StatusCode::NOT_FOUND.as_u16() =>
            {
                return Ok(None);
            }
            Err(err) => return Err(err),
        };

        if !succeeded(&body) {
            return Ok(None);
        }
        let Some(article) = body.get("article") else {
            return Ok(None);
        };
        let Some(summary) = ArticleSummary::from_value(article) else {
            return Ok(None);
        };

        let content = article
            .get("content")
            .filter(|content| !content.is_null())
            .map(Block::list_from_value);

        Ok(Some(FetchedArticle { summary, content }))
    }

    async fn get_blocks(&self, page_id: &str) -> Result<Vec<Block>, ContentApiError> {
        let body = self
            .request(ENDPOINT_BLOCKS, Method::GET, &["blocks", page_id], None)
            .await?;

        // Either a bare array or a paginated `{results: [...]}` envelope.
        let blocks = body.get("results").unwrap_or(&body);
        Ok(Block::list_from_value(blocks))
    }

    async fn list_comments(&self, page_id: &str) -> Result<Vec<Comment>, ContentApiError> {
        let body = self
            .request(
                ENDPOINT_COMMENTS,
                Method::GET,
                &["articles", page_id, "comments"],
                None,
            )
            .await?;

        if !succeeded(&body) {
            return Ok(Vec::new());
        }
        Ok(body
            .get("comments")
            .map(Comment::list_from_value)
            .unwrap_or_default())
    }

    async fn add_comment(&self, page_id: &str, text: &str) -> Result<Value, ContentApiError> {
        self.request(
            ENDPOINT_ADD_COMMENT,
            Method::POST,
            &["articles", page_id, "comments"],
            Some(json!({ "text": text, "userId": COMMENT_USER_ID })),
        )
        .await
    }
}

/// Stand-in used when no content API base URL is configured.
#[derive(Clone, Copy, Debug, Default)]
pub struct DisabledContentApi;

#[async_trait]
impl ContentApi for DisabledContentApi {
    async fn list_articles(&self) -> Result<Vec<ArticleSummary>, ContentApiError> {
        Err(ContentApiError::NotConfigured)
    }

    async fn get_article(&self, _id: &str) -> Result<Option<FetchedArticle>, ContentApiError> {
        Err(ContentApiError::NotConfigured)
    }

    async fn get_blocks(&self, _page_id: &str) -> Result<Vec<Block>, ContentApiError> {
        Err(ContentApiError::NotConfigured)
    }

    async fn list_comments(&self, _page_id: &str) -> Result<Vec<Comment>, ContentApiError> {
        Err(ContentApiError::NotConfigured)
    }

    async fn add_comment(&self, _page_id: &str, _text: &str) -> Result<Value, ContentApiError> {
        Err(ContentApiError::NotConfigured)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn settings() -> ContentApiSettings {
        ContentApiSettings {
            base_url: None,
            timeout: Duration::from_secs(5),
        }
    }

    #[test]
    fn urls_append_api_prefix_and_escape_ids() {
        let base = Url::parse("https://fn.example.com/").expect("url");
        let api = HttpContentApi::new(base, &settings()).expect("client");
        assert_eq!(
            api.url(&["articles", "a/b", "comments"]).as_str(),
            "https://fn.example.com/api/notion/articles/a%2Fb/comments"
        );
    }

    #[test]
    fn base_path_is_preserved() {
        let base = Url::parse("https://fn.example.com/prod").expect("url");
        let api = HttpContentApi::new(base, &settings()).expect("client");
        assert_eq!(
            api.url(&["articles"]).as_str(),
            "https://fn.example.com/prod/api/notion/articles"
        );
    }

    #[tokio::test]
    async fn disabled_api_refuses_calls() {
        let api = DisabledContentApi;
        assert!(matches!(
            api.list_articles().await,
            Err(ContentApiError::NotConfigured)
        ));
    }
}
