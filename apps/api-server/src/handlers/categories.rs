//! Category handlers.

use actix_web::{HttpResponse, web};

use quill_shared::ApiResponse;
use quill_shared::dto::{CategoryDto, CreateCategoryRequest};

use crate::middleware::auth::Identity;
use crate::middleware::error::AppResult;
use crate::state::AppState;

/// GET /api/categories - all categories sorted by name.
pub async fn list(state: web::Data<AppState>) -> AppResult<HttpResponse> {
    let categories = state.categories.list().await?;
    let items: Vec<CategoryDto> = categories.into_iter().map(Into::into).collect();
    Ok(HttpResponse::Ok().json(ApiResponse::ok(items)))
}

/// POST /api/categories - create a category. Protected.
pub async fn create(
    _identity: Identity,
    state: web::Data<AppState>,
    body: web::Json<CreateCategoryRequest>,
) -> AppResult<HttpResponse> {
    let category = state.categories.create(&body.name).await?;
    Ok(HttpResponse::Created().json(ApiResponse::ok(CategoryDto::from(category))))
}
