use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};
use time::OffsetDateTime;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "course_level", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum CourseLevel {
    Beginner,
    Intermediate,
    Advanced,
}

impl Default for CourseLevel {
    fn default() -> Self {
        CourseLevel::Beginner
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Course {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub price: f64,
    pub duration: String,
    pub level: CourseLevel,
    pub category_id: Uuid,
    pub instructor_id: Uuid,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
}

/// Course row with its category and instructor resolved for display.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct CourseWithRefs {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub price: f64,
    pub duration: String,
    pub level: CourseLevel,
    pub category_id: Uuid,
    pub category_name: String,
    pub instructor_id: Uuid,
    pub instructor_name: String,
    pub instructor_email: String,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
}

const COURSE_COLUMNS: &str = "id, title, description, price, duration, level, category_id, \
                              instructor_id, created_at, updated_at";

const COURSE_REF_QUERY: &str = r#"
    SELECT c.id, c.title, c.description, c.price, c.duration, c.level,
           c.category_id, cat.name AS category_name,
           c.instructor_id, u.name AS instructor_name, u.email AS instructor_email,
           c.created_at, c.updated_at
    FROM courses c
    JOIN categories cat ON cat.id = c.category_id
    JOIN users u ON u.id = c.instructor_id
"#;

pub async fn list_with_refs(db: &PgPool) -> Result<Vec<CourseWithRefs>, sqlx::Error> {
    sqlx::query_as::<_, CourseWithRefs>(&format!(
        "{COURSE_REF_QUERY} ORDER BY c.created_at DESC"
    ))
    .fetch_all(db)
    .await
}

pub async fn find_with_refs(db: &PgPool, id: Uuid) -> Result<Option<CourseWithRefs>, sqlx::Error> {
    sqlx::query_as::<_, CourseWithRefs>(&format!("{COURSE_REF_QUERY} WHERE c.id = $1"))
        .bind(id)
        .fetch_optional(db)
        .await
}

pub async fn find_by_id(db: &PgPool, id: Uuid) -> Result<Option<Course>, sqlx::Error> {
    sqlx::query_as::<_, Course>(&format!(
        r#"SELECT {COURSE_COLUMNS} FROM courses WHERE id = $1"#
    ))
    .bind(id)
    .fetch_optional(db)
    .await
}

#[allow(clippy::too_many_arguments)]
pub async fn create(
    db: &PgPool,
    title: &str,
    description: &str,
    price: f64,
    duration: &str,
    level: CourseLevel,
    category_id: Uuid,
    instructor_id: Uuid,
) -> Result<Course, sqlx::Error> {
    sqlx::query_as::<_, Course>(&format!(
        r#"
        INSERT INTO courses (title, description, price, duration, level, category_id, instructor_id)
        VALUES ($1, $2, $3, $4, $5, $6, $7)
        RETURNING {COURSE_COLUMNS}
        "#
    ))
    .bind(title)
    .bind(description)
    .bind(price)
    .bind(duration)
    .bind(level)
    .bind(category_id)
    .bind(instructor_id)
    .fetch_one(db)
    .await
}

#[allow(clippy::too_many_arguments)]
pub async fn update(
    db: &PgPool,
    id: Uuid,
    title: Option<&str>,
    description: Option<&str>,
    price: Option<f64>,
    duration: Option<&str>,
    level: Option<CourseLevel>,
    category_id: Option<Uuid>,
    instructor_id: Option<Uuid>,
) -> Result<Option<Course>, sqlx::Error> {
    sqlx::query_as::<_, Course>(&format!(
        r#"
        UPDATE courses
        SET title = COALESCE($2, title),
            description = COALESCE($3, description),
            price = COALESCE($4, price),
            duration = COALESCE($5, duration),
            level = COALESCE($6, level),
            category_id = COALESCE($7, category_id),
            instructor_id = COALESCE($8, instructor_id),
            updated_at = now()
        WHERE id = $1
        RETURNING {COURSE_COLUMNS}
        "#
    ))
    .bind(id)
    .bind(title)
    .bind(description)
    .bind(price)
    .bind(duration)
    .bind(level)
    .bind(category_id)
    .bind(instructor_id)
    .fetch_optional(db)
    .await
}

pub async fn delete(db: &PgPool, id: Uuid) -> Result<bool, sqlx::Error> {
    let result = sqlx::query(r#"DELETE FROM courses WHERE id = $1"#)
        .bind(id)
        .execute(db)
        .await?;
    Ok(result.rows_affected() > 0)
}
