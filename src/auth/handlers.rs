use axum::{
    extract::{FromRef, State},
    http::{header, HeaderMap, StatusCode},
    routing::{get, post},
    Json, Router,
};
use tracing::{info, instrument, warn};

use crate::auth::{
    cookie,
    dto::{AuthResponse, LoginRequest, RegisterRequest},
    extractors::AuthUser,
    jwt::JwtKeys,
    password::{hash_password, verify_password},
};
use crate::error::{AppError, AppResult};
use crate::state::AppState;
use crate::users::dto::{PublicUser, UserResponse};
use crate::users::repo::{self, Role};

pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/register", post(register_student))
        .route("/register/instructor", post(register_instructor))
        .route("/register/admin", post(register_admin))
        .route("/login", post(login))
        .route("/check", get(check))
        .route("/logout", post(logout))
}

#[instrument(skip(state, payload))]
pub async fn register_student(
    State(state): State<AppState>,
    Json(payload): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<AuthResponse>), AppError> {
    register_with_role(&state, payload, Role::Student).await
}

#[instrument(skip(state, payload))]
pub async fn register_instructor(
    State(state): State<AppState>,
    Json(payload): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<AuthResponse>), AppError> {
    register_with_role(&state, payload, Role::Instructor).await
}

#[instrument(skip(state, payload))]
pub async fn register_admin(
    State(state): State<AppState>,
    Json(payload): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<AuthResponse>), AppError> {
    register_with_role(&state, payload, Role::Admin).await
}

// The role comes from the endpoint, never from the request body.
async fn register_with_role(
    state: &AppState,
    payload: RegisterRequest,
    role: Role,
) -> Result<(StatusCode, Json<AuthResponse>), AppError> {
    let payload = payload.validate()?;

    if repo::find_by_email(&state.db, &payload.email).await?.is_some() {
        warn!(email = %payload.email, "email already registered");
        return Err(AppError::conflict("User already exists"));
    }

    let hash = hash_password(&payload.password)?;
    let user = repo::create(&state.db, &payload.name, &payload.email, &hash, role).await?;

    info!(user_id = %user.id, email = %user.email, role = role.as_str(), "user registered");
    Ok((
        StatusCode::CREATED,
        Json(AuthResponse {
            message: "User registered successfully".into(),
            user: user.into(),
        }),
    ))
}

#[instrument(skip(state, payload))]
pub async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> Result<(HeaderMap, Json<AuthResponse>), AppError> {
    let payload = payload.validate()?;

    // Unknown email and wrong password are indistinguishable to the caller.
    let user = repo::find_by_email(&state.db, &payload.email)
        .await?
        .ok_or(AppError::InvalidCredentials)?;

    if !verify_password(&payload.password, &user.password_hash)? {
        warn!(email = %payload.email, user_id = %user.id, "login invalid password");
        return Err(AppError::InvalidCredentials);
    }

    let keys = JwtKeys::from_ref(&state);
    let token = keys.sign(user.id, user.role)?;
    let max_age = keys.ttl.as_secs();

    let mut headers = HeaderMap::new();
    headers.insert(
        header::SET_COOKIE,
        cookie::session_cookie(&state.config.cookie, &token, max_age)
            .parse()
            .map_err(|e| AppError::Internal(anyhow::anyhow!("set-cookie header: {e}")))?,
    );

    info!(user_id = %user.id, email = %user.email, "user logged in");
    Ok((
        headers,
        Json(AuthResponse {
            message: "User logged in successfully".into(),
            user: user.into(),
        }),
    ))
}

#[instrument(skip(state))]
pub async fn check(
    State(state): State<AppState>,
    caller: AuthUser,
) -> AppResult<Json<UserResponse>> {
    let user = repo::find_by_id(&state.db, caller.id)
        .await?
        .ok_or_else(|| AppError::unauthenticated("User not found"))?;

    Ok(Json(UserResponse {
        message: "Authenticated".into(),
        user: PublicUser::from(user),
    }))
}

/// Clears the cookie. Already-issued tokens stay valid until expiry;
/// there is no server-side revocation list.
#[instrument(skip(state))]
pub async fn logout(
    State(state): State<AppState>,
    _caller: AuthUser,
) -> AppResult<(HeaderMap, Json<serde_json::Value>)> {
    let mut headers = HeaderMap::new();
    headers.insert(
        header::SET_COOKIE,
        cookie::expired_cookie(&state.config.cookie)
            .parse()
            .map_err(|e| AppError::Internal(anyhow::anyhow!("set-cookie header: {e}")))?,
    );
    Ok((
        headers,
        Json(serde_json::json!({ "message": "Logged out successfully" })),
    ))
}
