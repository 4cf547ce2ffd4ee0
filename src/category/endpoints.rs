//! Defines the JSON endpoints for managing categories.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use serde::Deserialize;

use crate::{
    AppState, Error,
    category::{
        Category, NewCategory, create_category, delete_category, get_all_categories,
        get_categories_by_type, get_category, update_category,
    },
    database_id::CategoryId,
    timezone,
    transaction::TransactionType,
};

/// The data needed to rename a category or change its icon.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateCategory {
    /// The new display name of the category.
    pub name: String,
    /// The new display icon of the category.
    pub icon: String,
}

/// A route handler for creating a new category.
///
/// # Errors
/// Returns an error if the category cannot be created.
pub async fn create_category_endpoint(
    State(state): State<AppState>,
    Json(new_category): Json<NewCategory>,
) -> Result<(StatusCode, Json<Category>), Error> {
    let now = timezone::local_now(&state.local_timezone)?;
    let connection = state
        .db_connection
        .lock()
        .map_err(|_| Error::DatabaseLockError)?;

    let category = create_category(new_category, now, &connection)?;

    Ok((StatusCode::CREATED, Json(category)))
}

/// A route handler for getting a category by its ID.
///
/// # Errors
/// Returns an error if the category does not exist.
pub async fn get_category_endpoint(
    State(state): State<AppState>,
    Path(category_id): Path<CategoryId>,
) -> Result<Json<Category>, Error> {
    let connection = state
        .db_connection
        .lock()
        .map_err(|_| Error::DatabaseLockError)?;

    get_category(&category_id, &connection).map(Json)
}

/// A route handler for listing every category.
pub async fn get_categories_endpoint(
    State(state): State<AppState>,
) -> Result<Json<Vec<Category>>, Error> {
    let connection = state
        .db_connection
        .lock()
        .map_err(|_| Error::DatabaseLockError)?;

    get_all_categories(&connection).map(Json)
}

/// A route handler for listing the categories of one type, e.g.
/// `GET /api/categories/type/income`.
pub async fn get_categories_by_type_endpoint(
    State(state): State<AppState>,
    Path(kind): Path<TransactionType>,
) -> Result<Json<Vec<Category>>, Error> {
    let connection = state
        .db_connection
        .lock()
        .map_err(|_| Error::DatabaseLockError)?;

    get_categories_by_type(kind, &connection).map(Json)
}

/// A route handler for renaming a category or changing its icon.
///
/// # Errors
/// Returns an error if the category does not exist.
pub async fn update_category_endpoint(
    State(state): State<AppState>,
    Path(category_id): Path<CategoryId>,
    Json(update): Json<UpdateCategory>,
) -> Result<Json<Category>, Error> {
    let now = timezone::local_now(&state.local_timezone)?;
    let connection = state
        .db_connection
        .lock()
        .map_err(|_| Error::DatabaseLockError)?;

    update_category(&category_id, &update.name, &update.icon, now, &connection).map(Json)
}

/// A route handler for deleting a category.
///
/// # Errors
/// Returns an error if the category does not exist or if transactions still
/// reference it.
pub async fn delete_category_endpoint(
    State(state): State<AppState>,
    Path(category_id): Path<CategoryId>,
) -> Result<StatusCode, Error> {
    let connection = state
        .db_connection
        .lock()
        .map_err(|_| Error::DatabaseLockError)?;

    delete_category(&category_id, &connection)?;

    Ok(StatusCode::NO_CONTENT)
}
