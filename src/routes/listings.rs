use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use tracing::debug;
use uuid::Uuid;

use crate::models::AppState;
use crate::schemas::{ListingCreate, ListingQuery, ListingResponse, ListingUpdate, ValidatedJson, ValidatedQuery};
use crate::types::{AppError, AppResult};

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/listings", get(list_listings).post(create_listing))
        .route(
            "/api/listings/{listing_id}",
            get(get_listing).patch(update_listing).delete(delete_listing),
        )
        .with_state(state)
}

async fn list_listings(
    State(_state): State<AppState>,
    ValidatedQuery(query): ValidatedQuery<ListingQuery>,
) -> AppResult<Json<Vec<ListingResponse>>> {
    debug!(page = query.page, per_page = query.per_page, "Listing search");
    Err(AppError::NotImplemented("listing search"))
}

async fn create_listing(
    State(_state): State<AppState>,
    ValidatedJson(_listing): ValidatedJson<ListingCreate>,
) -> AppResult<(StatusCode, Json<ListingResponse>)> {
    Err(AppError::NotImplemented("listing creation"))
}

async fn get_listing(
    State(_state): State<AppState>,
    Path(_listing_id): Path<Uuid>,
) -> AppResult<Json<ListingResponse>> {
    Err(AppError::NotImplemented("listing lookup"))
}

async fn update_listing(
    State(_state): State<AppState>,
    Path(_listing_id): Path<Uuid>,
    ValidatedJson(_update): ValidatedJson<ListingUpdate>,
) -> AppResult<Json<ListingResponse>> {
    Err(AppError::NotImplemented("listing update"))
}

async fn delete_listing(
    State(_state): State<AppState>,
    Path(_listing_id): Path<Uuid>,
) -> AppResult<StatusCode> {
    Err(AppError::NotImplemented("listing deletion"))
}
