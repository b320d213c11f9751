use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post, put},
    Json, Router,
};
use tracing::{info, instrument, warn};
use uuid::Uuid;

use crate::auth::extractors::AuthUser;
use crate::auth::guard::{ensure_course_owner_or_admin, ensure_self_or_admin, ensure_student};
use crate::courses::repo as courses_repo;
use crate::enrollments::dto::{EnrollmentResponse, ProgressRequest, StatusResponse};
use crate::enrollments::repo::{self, EnrollmentWithCourse, EnrollmentWithStudent};
use crate::error::{is_unique_violation, AppError, AppResult};
use crate::state::AppState;

pub fn enrollment_routes() -> Router<AppState> {
    Router::new()
        .route("/courses/:course_id/enroll", post(enroll).delete(unenroll))
        .route("/courses/:course_id/status", get(check_status))
        .route("/courses/:course_id/progress", put(update_progress))
        .route("/courses/:course_id/students", get(course_enrollments))
        .route("/user", get(own_enrollments))
        .route("/user/:user_id", get(user_enrollments))
}

#[instrument(skip(state))]
pub async fn enroll(
    State(state): State<AppState>,
    caller: AuthUser,
    Path(course_id): Path<Uuid>,
) -> Result<(StatusCode, Json<EnrollmentResponse>), AppError> {
    ensure_student(&caller)?;

    if courses_repo::find_by_id(&state.db, course_id).await?.is_none() {
        return Err(AppError::not_found("Course not found"));
    }

    // At most one ledger row exists per pair; plan_enrollment rejects
    // active/completed rows and reuses cancelled ones.
    let existing = repo::find_pair(&state.db, caller.id, course_id)
        .await?
        .map(|e| e.status);
    let enrollment = match repo::plan_enrollment(existing)? {
        repo::EnrollAction::Reactivate => {
            repo::reactivate_cancelled(&state.db, caller.id, course_id)
                .await?
                .ok_or_else(|| {
                    // The row changed under us between the read and the update.
                    AppError::conflict("You are already enrolled in this course")
                })?
        }
        repo::EnrollAction::Insert => repo::insert_active(&state.db, caller.id, course_id)
            .await
            .map_err(|e| {
                if is_unique_violation(&e) {
                    warn!(student_id = %caller.id, %course_id, "lost enroll race");
                    AppError::conflict("You are already enrolled in this course")
                } else {
                    e.into()
                }
            })?,
    };

    info!(student_id = %caller.id, %course_id, "enrolled");
    Ok((
        StatusCode::CREATED,
        Json(EnrollmentResponse {
            message: "Successfully enrolled in course".into(),
            enrollment,
        }),
    ))
}

#[instrument(skip(state))]
pub async fn unenroll(
    State(state): State<AppState>,
    caller: AuthUser,
    Path(course_id): Path<Uuid>,
) -> AppResult<Json<EnrollmentResponse>> {
    let enrollment = repo::cancel_active(&state.db, caller.id, course_id)
        .await?
        .ok_or_else(|| AppError::not_found("Active enrollment not found"))?;

    info!(student_id = %caller.id, %course_id, "unenrolled");
    Ok(Json(EnrollmentResponse {
        message: "Successfully unenrolled from course".into(),
        enrollment,
    }))
}

#[instrument(skip(state))]
pub async fn check_status(
    State(state): State<AppState>,
    caller: AuthUser,
    Path(course_id): Path<Uuid>,
) -> AppResult<Json<StatusResponse>> {
    let response = match repo::find_pair(&state.db, caller.id, course_id).await? {
        Some(enrollment) => StatusResponse::from(enrollment),
        None => StatusResponse::not_enrolled(),
    };
    Ok(Json(response))
}

#[instrument(skip(state, payload))]
pub async fn update_progress(
    State(state): State<AppState>,
    caller: AuthUser,
    Path(course_id): Path<Uuid>,
    Json(payload): Json<ProgressRequest>,
) -> AppResult<Json<EnrollmentResponse>> {
    let payload = payload.validate()?;

    let enrollment = repo::update_progress(&state.db, caller.id, course_id, payload.progress)
        .await?
        .ok_or_else(|| AppError::not_found("Active enrollment not found"))?;

    let message = if payload.progress == 100 {
        "Course completed successfully!"
    } else {
        "Progress updated successfully"
    };

    info!(student_id = %caller.id, %course_id, progress = payload.progress, "progress updated");
    Ok(Json(EnrollmentResponse {
        message: message.into(),
        enrollment,
    }))
}

#[instrument(skip(state))]
pub async fn own_enrollments(
    State(state): State<AppState>,
    caller: AuthUser,
) -> AppResult<Json<Vec<EnrollmentWithCourse>>> {
    Ok(Json(repo::list_by_student(&state.db, caller.id).await?))
}

#[instrument(skip(state))]
pub async fn user_enrollments(
    State(state): State<AppState>,
    caller: AuthUser,
    Path(user_id): Path<Uuid>,
) -> AppResult<Json<Vec<EnrollmentWithCourse>>> {
    ensure_self_or_admin(&caller, user_id)?;
    Ok(Json(repo::list_by_student(&state.db, user_id).await?))
}

#[instrument(skip(state))]
pub async fn course_enrollments(
    State(state): State<AppState>,
    caller: AuthUser,
    Path(course_id): Path<Uuid>,
) -> AppResult<Json<Vec<EnrollmentWithStudent>>> {
    let course = courses_repo::find_by_id(&state.db, course_id)
        .await?
        .ok_or_else(|| AppError::not_found("Course not found"))?;

    ensure_course_owner_or_admin(&caller, course.instructor_id)?;

    Ok(Json(repo::list_by_course(&state.db, course_id).await?))
}
