use axum::{extract::State, routing::get, Json, Router};
use tracing::instrument;

use crate::admin::dto::{CourseOverview, DashboardStats, InstructorOverview, StudentOverview};
use crate::admin::repo;
use crate::auth::extractors::AuthUser;
use crate::auth::guard::ensure_admin;
use crate::error::AppResult;
use crate::state::AppState;

pub fn admin_routes() -> Router<AppState> {
    Router::new()
        .route("/stats", get(stats))
        .route("/students", get(students))
        .route("/instructors", get(instructors))
        .route("/courses", get(courses))
}

#[instrument(skip(state))]
pub async fn stats(
    State(state): State<AppState>,
    caller: AuthUser,
) -> AppResult<Json<DashboardStats>> {
    ensure_admin(&caller)?;
    Ok(Json(repo::dashboard_stats(&state.db).await?))
}

#[instrument(skip(state))]
pub async fn students(
    State(state): State<AppState>,
    caller: AuthUser,
) -> AppResult<Json<Vec<StudentOverview>>> {
    ensure_admin(&caller)?;
    Ok(Json(repo::students_with_enrollments(&state.db).await?))
}

#[instrument(skip(state))]
pub async fn instructors(
    State(state): State<AppState>,
    caller: AuthUser,
) -> AppResult<Json<Vec<InstructorOverview>>> {
    ensure_admin(&caller)?;
    Ok(Json(repo::instructors_with_stats(&state.db).await?))
}

#[instrument(skip(state))]
pub async fn courses(
    State(state): State<AppState>,
    caller: AuthUser,
) -> AppResult<Json<Vec<CourseOverview>>> {
    ensure_admin(&caller)?;
    Ok(Json(repo::courses_overview(&state.db).await?))
}
