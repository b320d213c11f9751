use axum::{
    extract::{Path, State},
    routing::get,
    Json, Router,
};
use tracing::{info, instrument, warn};
use uuid::Uuid;

use crate::auth::dto::is_valid_email;
use crate::auth::extractors::AuthUser;
use crate::auth::guard::{ensure_admin, ensure_self_or_admin};
use crate::error::{AppError, AppResult};
use crate::state::AppState;
use crate::users::dto::{
    PublicUser, UpdateProfileRequest, UserResponse, UsersByRoleResponse, UsersResponse,
};
use crate::users::repo::{self, Role};

pub fn user_routes() -> Router<AppState> {
    Router::new()
        .route("/profile", get(get_profile).put(update_profile))
        .route("/", get(list_users))
        .route("/role/:role", get(users_by_role))
        .route("/:id", get(get_user_by_id).delete(delete_user))
}

#[instrument(skip(state))]
pub async fn get_profile(
    State(state): State<AppState>,
    caller: AuthUser,
) -> AppResult<Json<UserResponse>> {
    let user = repo::find_by_id(&state.db, caller.id)
        .await?
        .ok_or_else(|| AppError::not_found("User not found"))?;

    Ok(Json(UserResponse {
        message: "User profile retrieved successfully".into(),
        user: user.into(),
    }))
}

#[instrument(skip(state, payload))]
pub async fn update_profile(
    State(state): State<AppState>,
    caller: AuthUser,
    Json(mut payload): Json<UpdateProfileRequest>,
) -> AppResult<Json<UserResponse>> {
    if let Some(email) = payload.email.as_mut() {
        *email = email.trim().to_lowercase();
        if !is_valid_email(email) {
            return Err(AppError::validation("Invalid email"));
        }
        if repo::email_taken_by_other(&state.db, email, caller.id).await? {
            warn!(email = %email, "profile email already in use");
            return Err(AppError::conflict("Email is already in use"));
        }
    }
    if let Some(name) = payload.name.as_mut() {
        *name = name.trim().to_string();
        if name.is_empty() {
            return Err(AppError::validation("name must not be empty"));
        }
    }

    let user = repo::update_profile(
        &state.db,
        caller.id,
        payload.name.as_deref(),
        payload.email.as_deref(),
    )
    .await?
    .ok_or_else(|| AppError::not_found("User not found"))?;

    info!(user_id = %user.id, "profile updated");
    Ok(Json(UserResponse {
        message: "User profile updated successfully".into(),
        user: user.into(),
    }))
}

#[instrument(skip(state))]
pub async fn list_users(
    State(state): State<AppState>,
    caller: AuthUser,
) -> AppResult<Json<UsersResponse>> {
    ensure_admin(&caller)?;

    let users = repo::list_all(&state.db).await?;
    Ok(Json(UsersResponse {
        message: "Users retrieved successfully".into(),
        users: users.into_iter().map(PublicUser::from).collect(),
    }))
}

#[instrument(skip(state))]
pub async fn users_by_role(
    State(state): State<AppState>,
    caller: AuthUser,
    Path(role): Path<String>,
) -> AppResult<Json<UsersByRoleResponse>> {
    ensure_admin(&caller)?;

    let role = Role::parse(&role).ok_or_else(|| {
        AppError::validation("Invalid role. Must be one of: student, instructor, admin")
    })?;

    let users = repo::list_by_role(&state.db, role).await?;
    Ok(Json(UsersByRoleResponse {
        message: format!("Users with role '{}' retrieved successfully", role.as_str()),
        count: users.len(),
        users: users.into_iter().map(PublicUser::from).collect(),
    }))
}

#[instrument(skip(state))]
pub async fn get_user_by_id(
    State(state): State<AppState>,
    caller: AuthUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<UserResponse>> {
    ensure_self_or_admin(&caller, id)?;

    let user = repo::find_by_id(&state.db, id)
        .await?
        .ok_or_else(|| AppError::not_found("User not found"))?;

    Ok(Json(UserResponse {
        message: "User retrieved successfully".into(),
        user: user.into(),
    }))
}

#[instrument(skip(state))]
pub async fn delete_user(
    State(state): State<AppState>,
    caller: AuthUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<serde_json::Value>> {
    ensure_self_or_admin(&caller, id)?;

    if !repo::delete(&state.db, id).await? {
        return Err(AppError::not_found("User not found"));
    }

    info!(user_id = %id, deleted_by = %caller.id, "user deleted");
    Ok(Json(
        serde_json::json!({ "message": "User deleted successfully" }),
    ))
}
