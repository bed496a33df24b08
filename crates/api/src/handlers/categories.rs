//! Handlers for the `/categories` resource.
//!
//! Categories are user-scoped labels with a color, listed with the
//! number of tasks assigned to each. A category still referenced by
//! tasks refuses deletion.

use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use vezir_core::error::CoreError;
use vezir_core::types::DbId;
use vezir_core::validation::{validate_category_name, validate_color, DEFAULT_CATEGORY_COLOR};
use vezir_db::models::category::{CategoryDelete, CreateCategory, UpdateCategory};
use vezir_db::repositories::CategoryRepo;

use crate::caching::cached_json;
use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /api/v1/categories
///
/// List the authenticated user's categories, alphabetically, each with
/// its task count. Supports conditional requests via `If-None-Match`.
pub async fn list_categories(
    auth: AuthUser,
    State(state): State<AppState>,
    headers: HeaderMap,
) -> AppResult<Response> {
    let categories = CategoryRepo::list_with_counts(&state.pool, auth.user_id).await?;

    cached_json(&headers, DataResponse::new(categories))
}

/// POST /api/v1/categories
///
/// Create a category. The color defaults when omitted. Returns 201 with
/// the created category (task count zero by definition).
pub async fn create_category(
    auth: AuthUser,
    State(state): State<AppState>,
    Json(input): Json<CreateCategory>,
) -> AppResult<impl IntoResponse> {
    let name = input.name.trim();
    validate_category_name(name)?;

    let color = input.color.as_deref().unwrap_or(DEFAULT_CATEGORY_COLOR);
    validate_color(color)?;

    let category = CategoryRepo::create(&state.pool, auth.user_id, name, color).await?;

    tracing::info!(
        category_id = category.id,
        user_id = auth.user_id,
        "Category created"
    );

    Ok((StatusCode::CREATED, DataResponse::new(category.with_count(0))))
}

/// GET /api/v1/categories/{id}
///
/// Fetch a single category with its task count. Supports conditional
/// requests via `If-None-Match`.
pub async fn get_category(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(category_id): Path<DbId>,
    headers: HeaderMap,
) -> AppResult<Response> {
    let category = CategoryRepo::find_with_count(&state.pool, auth.user_id, category_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Category",
            id: category_id,
        }))?;

    cached_json(&headers, DataResponse::new(category))
}

/// PUT /api/v1/categories/{id}
///
/// Update a category's name and color (both required).
pub async fn update_category(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(category_id): Path<DbId>,
    Json(input): Json<UpdateCategory>,
) -> AppResult<impl IntoResponse> {
    let name = input.name.trim();
    validate_category_name(name)?;
    validate_color(&input.color)?;

    let category = CategoryRepo::update(&state.pool, auth.user_id, category_id, name, &input.color)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Category",
            id: category_id,
        }))?;

    tracing::info!(category_id, user_id = auth.user_id, "Category updated");

    Ok(DataResponse::new(category))
}

/// DELETE /api/v1/categories/{id}
///
/// Delete a category, refusing while tasks still reference it (409).
/// Returns 204 No Content on success.
pub async fn delete_category(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(category_id): Path<DbId>,
) -> AppResult<StatusCode> {
    match CategoryRepo::delete(&state.pool, auth.user_id, category_id).await? {
        CategoryDelete::Deleted => {
            tracing::info!(category_id, user_id = auth.user_id, "Category deleted");
            Ok(StatusCode::NO_CONTENT)
        }
        CategoryDelete::NotFound => Err(AppError::Core(CoreError::NotFound {
            entity: "Category",
            id: category_id,
        })),
        CategoryDelete::InUse { task_count } => Err(AppError::Core(CoreError::Conflict(format!(
            "Cannot delete category with associated tasks ({task_count} assigned)"
        )))),
    }
}
