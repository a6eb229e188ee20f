use std::sync::Arc;

use axum::{
    Form, Router,
    extract::{Path, State},
    http::StatusCode,
    middleware,
    response::{IntoResponse, Redirect, Response},
    routing::{get, post},
};
use serde::Deserialize;

use crate::{
    application::{
        chrome::ChromeService, content::ContentService, documents::DocumentService,
        feed::FeedService,
    },
    infra::assets::serve_static,
    presentation::views::{
        IndexTemplate, LayoutContext, PostTemplate, render_error_response,
        render_not_found_response, render_template_response,
    },
};

use super::{
    RouterState, db_health_response,
    middleware::{log_responses, set_request_context},
};

#[derive(Clone)]
pub struct HttpState {
    pub feed: Arc<FeedService>,
    pub content: Arc<ContentService>,
    pub documents: Arc<DocumentService>,
    pub chrome: Arc<ChromeService>,
}

pub fn build_router(state: RouterState) -> Router<RouterState> {
    Router::new()
        .route("/", get(index))
        .route("/posts/{slug}", get(post_detail))
        .route("/posts/{slug}/comments", post(submit_comment))
        .route("/_health/db", get(public_health))
        .route("/static/{*path}", get(serve_static))
        .fallback(fallback_router)
        .with_state(state)
        .layer(middleware::from_fn(log_responses))
        .layer(middleware::from_fn(set_request_context))
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct CommentForm {
    comment: String,
}

async fn index(State(state): State<HttpState>) -> Response {
    let chrome = state.chrome.load();

    match state.feed.index_context().await {
        Ok(content) => {
            let canonical = state.chrome.canonical_url("/");
            let view = LayoutContext::new(chrome.with_canonical(canonical), content);
            render_template_response(IndexTemplate { view }, StatusCode::OK)
        }
        Err(err) => render_error_response(chrome, err.into()),
    }
}

async fn post_detail(State(state): State<HttpState>, Path(slug): Path<String>) -> Response {
    let chrome = state.chrome.load();

    match state.feed.post_detail(&slug).await {
        Ok(Some(content)) => {
            let canonical = state.chrome.canonical_url(&format!("/posts/{}", content.slug));
            let meta = chrome
                .meta
                .clone()
                .with_canonical(canonical)
                .with_content(
                    format!("{} · {}", content.title, chrome.brand.title),
                    content.description.clone(),
                );
            let view = LayoutContext::new(chrome.with_meta(meta), content);
            render_template_response(PostTemplate { view }, StatusCode::OK)
        }
        Ok(None) => render_not_found_response(chrome),
        Err(err) => render_error_response(chrome, err.into()),
    }
}

async fn submit_comment(
    State(state): State<HttpState>,
    Path(slug): Path<String>,
    Form(form): Form<CommentForm>,
) -> Response {
    match state.content.comment_on_article(&slug, &form.comment).await {
        Ok(Some(_)) => Redirect::to(&format!("/posts/{slug}")).into_response(),
        Ok(None) => render_not_found_response(state.chrome.load()),
        Err(err) => render_error_response(state.chrome.load(), err.into()),
    }
}

async fn public_health(State(state): State<HttpState>) -> Response {
    db_health_response(state.documents.health_check().await)
}

async fn fallback_router(State(state): State<HttpState>) -> Response {
    render_not_found_response(state.chrome.load())
}
