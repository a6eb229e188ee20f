use axum::{
    Json,
    extract::{Path, State},
    response::IntoResponse,
};
use serde::Deserialize;
use serde_json::json;

use super::error::ApiError;
use super::state::ApiState;

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct AddCommentRequest {
    pub page_id: Option<String>,
    pub comment: Option<String>,
}

// -------- Content API --------
pub async fn list_articles(
    State(state): State<ApiState>,
) -> Result<impl IntoResponse, ApiError> {
    let articles = state.content.list_articles().await?;
    Ok(Json(articles))
}

pub async fn get_article(
    State(state): State<ApiState>,
    Path(slug): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let article = state
        .content
        .article_by_slug(&slug)
        .await?
        .ok_or_else(|| ApiError::not_found("article not found"))?;
    Ok(Json(article))
}

pub async fn add_comment(
    State(state): State<ApiState>,
    Json(request): Json<AddCommentRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let page_id = request.page_id.unwrap_or_default();
    let comment = request.comment.unwrap_or_default();

    let result = state.content.add_comment(&page_id, &comment).await?;
    Ok(Json(json!({ "success": true, "comment": result })))
}

// -------- Document store --------
pub async fn list_posts(State(state): State<ApiState>) -> Result<impl IntoResponse, ApiError> {
    let posts = state.documents.list_posts().await?;
    Ok(Json(posts))
}

pub async fn get_post(
    State(state): State<ApiState>,
    Path(slug): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let post = state.documents.post_by_slug(&slug).await?;
    Ok(Json(post))
}
