use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};
use time::OffsetDateTime;
use uuid::Uuid;

use crate::courses::repo::CourseLevel;
use crate::error::{AppError, AppResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "enrollment_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum EnrollmentStatus {
    Active,
    Completed,
    Cancelled,
}

/// One ledger row: a student's relationship to one course over time.
/// The (student_id, course_id) pair is unique at the storage level.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Enrollment {
    pub id: Uuid,
    pub student_id: Uuid,
    pub course_id: Uuid,
    pub enrollment_date: OffsetDateTime,
    pub status: EnrollmentStatus,
    pub progress: i32,
    pub completed_at: Option<OffsetDateTime>,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
}

/// Ledger row with its course (and the course's category/instructor) resolved.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct EnrollmentWithCourse {
    pub id: Uuid,
    pub enrollment_date: OffsetDateTime,
    pub status: EnrollmentStatus,
    pub progress: i32,
    pub completed_at: Option<OffsetDateTime>,
    pub course_id: Uuid,
    pub course_title: String,
    pub course_description: String,
    pub course_price: f64,
    pub course_duration: String,
    pub course_level: CourseLevel,
    pub category_name: String,
    pub instructor_name: String,
    pub instructor_email: String,
}

/// Ledger row with the enrolled student resolved.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct EnrollmentWithStudent {
    pub id: Uuid,
    pub enrollment_date: OffsetDateTime,
    pub status: EnrollmentStatus,
    pub progress: i32,
    pub completed_at: Option<OffsetDateTime>,
    pub student_id: Uuid,
    pub student_name: String,
    pub student_email: String,
    pub student_avatar_url: Option<String>,
}

/// What Enroll does once the existing ledger row (if any) is known.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnrollAction {
    Insert,
    Reactivate,
}

/// Decides the enroll transition from the current row status. Active and
/// completed rows reject re-enrollment with distinct conflicts; a cancelled
/// row is reused instead of duplicated.
pub fn plan_enrollment(existing: Option<EnrollmentStatus>) -> AppResult<EnrollAction> {
    match existing {
        None => Ok(EnrollAction::Insert),
        Some(EnrollmentStatus::Cancelled) => Ok(EnrollAction::Reactivate),
        Some(EnrollmentStatus::Active) => {
            Err(AppError::conflict("You are already enrolled in this course"))
        }
        Some(EnrollmentStatus::Completed) => {
            Err(AppError::conflict("You have already completed this course"))
        }
    }
}

const ENROLLMENT_COLUMNS: &str = "id, student_id, course_id, enrollment_date, status, progress, \
                                  completed_at, created_at, updated_at";

/// The single row for a (student, course) pair, whatever its status.
pub async fn find_pair(
    db: &PgPool,
    student_id: Uuid,
    course_id: Uuid,
) -> Result<Option<Enrollment>, sqlx::Error> {
    sqlx::query_as::<_, Enrollment>(&format!(
        r#"SELECT {ENROLLMENT_COLUMNS} FROM enrollments WHERE student_id = $1 AND course_id = $2"#
    ))
    .bind(student_id)
    .bind(course_id)
    .fetch_optional(db)
    .await
}

pub async fn insert_active(
    db: &PgPool,
    student_id: Uuid,
    course_id: Uuid,
) -> Result<Enrollment, sqlx::Error> {
    sqlx::query_as::<_, Enrollment>(&format!(
        r#"
        INSERT INTO enrollments (student_id, course_id)
        VALUES ($1, $2)
        RETURNING {ENROLLMENT_COLUMNS}
        "#
    ))
    .bind(student_id)
    .bind(course_id)
    .fetch_one(db)
    .await
}

/// Re-enrollment after cancellation reuses the surviving row instead of
/// inserting a second one, so the unique pair index never blocks it.
pub async fn reactivate_cancelled(
    db: &PgPool,
    student_id: Uuid,
    course_id: Uuid,
) -> Result<Option<Enrollment>, sqlx::Error> {
    sqlx::query_as::<_, Enrollment>(&format!(
        r#"
        UPDATE enrollments
        SET status = 'active', progress = 0, enrollment_date = now(),
            completed_at = NULL, updated_at = now()
        WHERE student_id = $1 AND course_id = $2 AND status = 'cancelled'
        RETURNING {ENROLLMENT_COLUMNS}
        "#
    ))
    .bind(student_id)
    .bind(course_id)
    .fetch_optional(db)
    .await
}

/// active -> cancelled. Returns None when no active row exists; completed
/// and already-cancelled rows are never touched.
pub async fn cancel_active(
    db: &PgPool,
    student_id: Uuid,
    course_id: Uuid,
) -> Result<Option<Enrollment>, sqlx::Error> {
    sqlx::query_as::<_, Enrollment>(&format!(
        r#"
        UPDATE enrollments
        SET status = 'cancelled', updated_at = now()
        WHERE student_id = $1 AND course_id = $2 AND status = 'active'
        RETURNING {ENROLLMENT_COLUMNS}
        "#
    ))
    .bind(student_id)
    .bind(course_id)
    .fetch_optional(db)
    .await
}

/// Sets progress on the active row; progress 100 also flips the row to
/// completed and stamps completed_at. Returns None when no active row exists.
pub async fn update_progress(
    db: &PgPool,
    student_id: Uuid,
    course_id: Uuid,
    progress: i32,
) -> Result<Option<Enrollment>, sqlx::Error> {
    sqlx::query_as::<_, Enrollment>(&format!(
        r#"
        UPDATE enrollments
        SET progress = $3,
            status = CASE WHEN $3 = 100 THEN 'completed'::enrollment_status ELSE status END,
            completed_at = CASE WHEN $3 = 100 THEN now() ELSE completed_at END,
            updated_at = now()
        WHERE student_id = $1 AND course_id = $2 AND status = 'active'
        RETURNING {ENROLLMENT_COLUMNS}
        "#
    ))
    .bind(student_id)
    .bind(course_id)
    .bind(progress)
    .fetch_optional(db)
    .await
}

pub async fn list_by_student(
    db: &PgPool,
    student_id: Uuid,
) -> Result<Vec<EnrollmentWithCourse>, sqlx::Error> {
    sqlx::query_as::<_, EnrollmentWithCourse>(
        r#"
        SELECT e.id, e.enrollment_date, e.status, e.progress, e.completed_at,
               c.id AS course_id, c.title AS course_title,
               c.description AS course_description, c.price AS course_price,
               c.duration AS course_duration, c.level AS course_level,
               cat.name AS category_name,
               u.name AS instructor_name, u.email AS instructor_email
        FROM enrollments e
        JOIN courses c ON c.id = e.course_id
        JOIN categories cat ON cat.id = c.category_id
        JOIN users u ON u.id = c.instructor_id
        WHERE e.student_id = $1
        ORDER BY e.enrollment_date DESC
        "#,
    )
    .bind(student_id)
    .fetch_all(db)
    .await
}

pub async fn list_by_course(
    db: &PgPool,
    course_id: Uuid,
) -> Result<Vec<EnrollmentWithStudent>, sqlx::Error> {
    sqlx::query_as::<_, EnrollmentWithStudent>(
        r#"
        SELECT e.id, e.enrollment_date, e.status, e.progress, e.completed_at,
               u.id AS student_id, u.name AS student_name,
               u.email AS student_email, u.avatar_url AS student_avatar_url
        FROM enrollments e
        JOIN users u ON u.id = e.student_id
        WHERE e.course_id = $1
        ORDER BY e.enrollment_date DESC
        "#,
    )
    .bind(course_id)
    .fetch_all(db)
    .await
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;

    #[test]
    fn fresh_pair_inserts_a_new_row() {
        assert_eq!(plan_enrollment(None).expect("plan"), EnrollAction::Insert);
    }

    #[test]
    fn cancelled_row_is_reactivated_not_duplicated() {
        assert_eq!(
            plan_enrollment(Some(EnrollmentStatus::Cancelled)).expect("plan"),
            EnrollAction::Reactivate
        );
    }

    #[test]
    fn active_row_rejects_enrollment_with_conflict() {
        let err = plan_enrollment(Some(EnrollmentStatus::Active)).unwrap_err();
        assert_eq!(err.status(), StatusCode::CONFLICT);
        assert_eq!(err.to_string(), "You are already enrolled in this course");
    }

    #[test]
    fn completed_row_rejects_with_distinct_message() {
        let err = plan_enrollment(Some(EnrollmentStatus::Completed)).unwrap_err();
        assert_eq!(err.status(), StatusCode::CONFLICT);
        assert_eq!(err.to_string(), "You have already completed this course");
    }
}
