use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Category {
    pub id: Uuid,
    pub name: String,
}

pub async fn list(db: &PgPool) -> Result<Vec<Category>, sqlx::Error> {
    sqlx::query_as::<_, Category>(r#"SELECT id, name FROM categories ORDER BY name"#)
        .fetch_all(db)
        .await
}

pub async fn find_by_id(db: &PgPool, id: Uuid) -> Result<Option<Category>, sqlx::Error> {
    sqlx::query_as::<_, Category>(r#"SELECT id, name FROM categories WHERE id = $1"#)
        .bind(id)
        .fetch_optional(db)
        .await
}

pub async fn create(db: &PgPool, name: &str) -> Result<Category, sqlx::Error> {
    sqlx::query_as::<_, Category>(
        r#"INSERT INTO categories (name) VALUES ($1) RETURNING id, name"#,
    )
    .bind(name)
    .fetch_one(db)
    .await
}

pub async fn update(db: &PgPool, id: Uuid, name: &str) -> Result<Option<Category>, sqlx::Error> {
    sqlx::query_as::<_, Category>(
        r#"UPDATE categories SET name = $2 WHERE id = $1 RETURNING id, name"#,
    )
    .bind(id)
    .bind(name)
    .fetch_optional(db)
    .await
}

pub async fn delete(db: &PgPool, id: Uuid) -> Result<bool, sqlx::Error> {
    let result = sqlx::query(r#"DELETE FROM categories WHERE id = $1"#)
        .bind(id)
        .execute(db)
        .await?;
    Ok(result.rows_affected() > 0)
}
