use async_trait::async_trait;
use serde_json::Value;
use sqlx::types::Json;

use crate::application::repos::{DocumentStore, RepoError};
use crate::domain::documents::Document;

use super::{PostgresRepositories, map_sqlx_error};

#[derive(sqlx::FromRow)]
struct DocumentRow {
    id: String,
    data: Json<Value>,
}

impl TryFrom<DocumentRow> for Document {
    type Error = RepoError;

    fn try_from(row: DocumentRow) -> Result<Self, Self::Error> {
        match row.data.0 {
            Value::Object(data) => Ok(Document::new(row.id, data)),
            other => Err(RepoError::Malformed {
                id: row.id,
                message: format!("expected a JSON object, found {other}"),
            }),
        }
    }
}

#[async_trait]
impl DocumentStore for PostgresRepositories {
    async fn list_documents(&self, collection: &str) -> Result<Vec<Document>, RepoError> {
        let rows = sqlx::query_as::<_, DocumentRow>(
            r#"
            SELECT id, data
            FROM documents
            WHERE collection = $1
            ORDER BY created_at, id
            "#,
        )
        .bind(collection)
        .fetch_all(self.pool())
        .await
        .map_err(map_sqlx_error)?;

        rows.into_iter().map(Document::try_from).collect()
    }

    async fn find_by_field(
        &self,
        collection: &str,
        field: &str,
        value: &str,
    ) -> Result<Option<Document>, RepoError> {
        let row = sqlx::query_as::<_, DocumentRow>(
            r#"
            SELECT id, data
            FROM documents
            WHERE collection = $1 AND data ->> $2::text = $3
            ORDER BY created_at, id
            LIMIT 1
            "#,
        )
        .bind(collection)
        .bind(field)
        .bind(value)
        .fetch_optional(self.pool())
        .await
        .map_err(map_sqlx_error)?;

        row.map(Document::try_from).transpose()
    }

    async fn health_check(&self) -> Result<(), RepoError> {
        self.ping().await.map_err(map_sqlx_error)
    }
}

/// Stand-in used when no database URL is configured.
#[derive(Clone, Copy, Debug, Default)]
pub struct DisabledDocumentStore;

#[async_trait]
impl DocumentStore for DisabledDocumentStore {
    async fn list_documents(&self, _collection: &str) -> Result<Vec<Document>, RepoError> {
        Err(RepoError::Unavailable)
    }

    async fn find_by_field(
        &self,
        _collection: &str,
        _field: &str,
        _value: &str,
    ) -> Result<Option<Document>, RepoError> {
        Err(RepoError::Unavailable)
    }

    async fn health_check(&self) -> Result<(), RepoError> {
        Err(RepoError::Unavailable)
    }
}
