use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use tracing::{info, instrument};
use uuid::Uuid;

use crate::auth::extractors::AuthUser;
use crate::courses::dto::{CreateCourseRequest, UpdateCourseRequest};
use crate::courses::repo::{self, Course, CourseWithRefs};
use crate::error::{is_foreign_key_violation, AppError, AppResult};
use crate::state::AppState;

pub fn course_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_courses).post(create_course))
        .route("/:id", get(get_course).put(update_course).delete(delete_course))
}

#[instrument(skip(state))]
pub async fn list_courses(State(state): State<AppState>) -> AppResult<Json<Vec<CourseWithRefs>>> {
    Ok(Json(repo::list_with_refs(&state.db).await?))
}

#[instrument(skip(state))]
pub async fn get_course(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<CourseWithRefs>> {
    let course = repo::find_with_refs(&state.db, id)
        .await?
        .ok_or_else(|| AppError::not_found("Course not found"))?;
    Ok(Json(course))
}

#[instrument(skip(state, payload))]
pub async fn create_course(
    State(state): State<AppState>,
    caller: AuthUser,
    Json(payload): Json<CreateCourseRequest>,
) -> Result<(StatusCode, Json<Course>), AppError> {
    let payload = payload.validate()?;

    // The foreign keys reject dangling category/instructor references;
    // whether the instructor actually has the instructor role is not checked.
    let course = repo::create(
        &state.db,
        &payload.title,
        &payload.description,
        payload.price,
        &payload.duration,
        payload.level,
        payload.category_id,
        payload.instructor_id,
    )
    .await
    .map_err(reference_error)?;

    info!(course_id = %course.id, created_by = %caller.id, "course created");
    Ok((StatusCode::CREATED, Json(course)))
}

#[instrument(skip(state, payload))]
pub async fn update_course(
    State(state): State<AppState>,
    caller: AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateCourseRequest>,
) -> AppResult<Json<Course>> {
    let payload = payload.validate()?;

    let course = repo::update(
        &state.db,
        id,
        payload.title.as_deref(),
        payload.description.as_deref(),
        payload.price,
        payload.duration.as_deref(),
        payload.level,
        payload.category_id,
        payload.instructor_id,
    )
    .await
    .map_err(reference_error)?
    .ok_or_else(|| AppError::not_found("Course not found"))?;

    info!(course_id = %course.id, updated_by = %caller.id, "course updated");
    Ok(Json(course))
}

#[instrument(skip(state))]
pub async fn delete_course(
    State(state): State<AppState>,
    caller: AuthUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<serde_json::Value>> {
    let deleted = repo::delete(&state.db, id).await.map_err(|e| {
        if is_foreign_key_violation(&e) {
            AppError::conflict("Course has existing enrollments")
        } else {
            e.into()
        }
    })?;

    if !deleted {
        return Err(AppError::not_found("Course not found"));
    }
    info!(course_id = %id, deleted_by = %caller.id, "course deleted");
    Ok(Json(
        serde_json::json!({ "message": "Course deleted successfully" }),
    ))
}

fn reference_error(e: sqlx::Error) -> AppError {
    if is_foreign_key_violation(&e) {
        AppError::validation("category and instructor must reference existing records")
    } else {
        e.into()
    }
}
