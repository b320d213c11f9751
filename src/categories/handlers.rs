use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use serde::Deserialize;
use tracing::{info, instrument};
use uuid::Uuid;

use crate::auth::extractors::AuthUser;
use crate::categories::repo::{self, Category};
use crate::error::{is_foreign_key_violation, is_unique_violation, AppError, AppResult};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct CategoryPayload {
    pub name: String,
}

impl CategoryPayload {
    fn validate(mut self) -> AppResult<Self> {
        self.name = self.name.trim().to_string();
        if self.name.is_empty() {
            return Err(AppError::validation("name must not be empty"));
        }
        Ok(self)
    }
}

pub fn category_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_categories).post(create_category))
        .route(
            "/:id",
            get(get_category).put(update_category).delete(delete_category),
        )
}

#[instrument(skip(state))]
pub async fn list_categories(State(state): State<AppState>) -> AppResult<Json<Vec<Category>>> {
    Ok(Json(repo::list(&state.db).await?))
}

#[instrument(skip(state))]
pub async fn get_category(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<Category>> {
    let category = repo::find_by_id(&state.db, id)
        .await?
        .ok_or_else(|| AppError::not_found("Category not found"))?;
    Ok(Json(category))
}

#[instrument(skip(state, payload))]
pub async fn create_category(
    State(state): State<AppState>,
    caller: AuthUser,
    Json(payload): Json<CategoryPayload>,
) -> Result<(StatusCode, Json<Category>), AppError> {
    let payload = payload.validate()?;

    let category = repo::create(&state.db, &payload.name).await.map_err(|e| {
        if is_unique_violation(&e) {
            AppError::conflict("Category already exists")
        } else {
            e.into()
        }
    })?;

    info!(category_id = %category.id, created_by = %caller.id, "category created");
    Ok((StatusCode::CREATED, Json(category)))
}

#[instrument(skip(state, payload))]
pub async fn update_category(
    State(state): State<AppState>,
    caller: AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<CategoryPayload>,
) -> AppResult<Json<Category>> {
    let payload = payload.validate()?;

    let category = repo::update(&state.db, id, &payload.name)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                AppError::conflict("Category already exists")
            } else {
                e.into()
            }
        })?
        .ok_or_else(|| AppError::not_found("Category not found"))?;

    info!(category_id = %category.id, updated_by = %caller.id, "category updated");
    Ok(Json(category))
}

/// Deleting a category still referenced by courses is blocked; the
/// foreign key violation surfaces as a conflict.
#[instrument(skip(state))]
pub async fn delete_category(
    State(state): State<AppState>,
    caller: AuthUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<serde_json::Value>> {
    let deleted = repo::delete(&state.db, id).await.map_err(|e| {
        if is_foreign_key_violation(&e) {
            AppError::conflict("Category is referenced by existing courses")
        } else {
            e.into()
        }
    })?;

    if !deleted {
        return Err(AppError::not_found("Category not found"));
    }
    info!(category_id = %id, deleted_by = %caller.id, "category deleted");
    Ok(Json(
        serde_json::json!({ "message": "Category deleted successfully" }),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn payload_trims_and_rejects_empty_names() {
        let ok = CategoryPayload {
            name: "  Programming  ".into(),
        }
        .validate()
        .expect("valid");
        assert_eq!(ok.name, "Programming");

        assert!(CategoryPayload { name: "   ".into() }.validate().is_err());
    }
}
