//! Post handlers.

use actix_multipart::Multipart;
use actix_web::{HttpResponse, web};
use serde::Deserialize;
use uuid::Uuid;

use quill_core::ports::PostFilter;
use quill_core::service::{NewPost, PostPatch};
use quill_shared::dto::{DeletedResponse, PostDto};
use quill_shared::{ApiResponse, PageMeta};

use crate::handlers::forms::read_post_form;
use crate::middleware::auth::Identity;
use crate::middleware::error::{AppError, AppResult};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    pub page: Option<u64>,
    pub limit: Option<u64>,
    pub search: Option<String>,
    pub category: Option<String>,
}

fn parse_category(raw: Option<&str>) -> Result<Option<Uuid>, AppError> {
    match raw.map(str::trim) {
        None | Some("") => Ok(None),
        Some(id) => id
            .parse()
            .map(Some)
            .map_err(|_| AppError::BadRequest("category must be a valid id".to_string())),
    }
}

/// GET /api/posts - public listing with search, category filter, pagination.
pub async fn list(state: web::Data<AppState>, query: web::Query<ListQuery>) -> AppResult<HttpResponse> {
    let query = query.into_inner();

    // Zero values fall back to the pipeline defaults (page 1, limit 10).
    let filter = PostFilter {
        search: query.search.filter(|s| !s.trim().is_empty()),
        category: parse_category(query.category.as_deref())?,
        page: query.page.unwrap_or(1),
        limit: query.limit.unwrap_or(10),
    };

    let page = state.posts.list(filter).await?;

    let items: Vec<PostDto> = page.items.into_iter().map(Into::into).collect();
    let meta = PageMeta {
        total: page.total,
        page: page.page,
        limit: page.limit,
        pages: page.pages,
    };

    Ok(HttpResponse::Ok().json(ApiResponse::ok_with_meta(items, meta)))
}

/// GET /api/posts/{id} - public single-post lookup.
pub async fn get(state: web::Data<AppState>, id: web::Path<Uuid>) -> AppResult<HttpResponse> {
    let post = state.posts.get(id.into_inner()).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::ok(PostDto::from(post))))
}

/// POST /api/posts - create a post from a multipart form. Protected.
pub async fn create(
    identity: Identity,
    state: web::Data<AppState>,
    payload: Multipart,
) -> AppResult<HttpResponse> {
    let form = read_post_form(payload).await?;

    // Required-field check at the boundary; the pipeline re-checks anyway.
    let (Some(title), Some(content)) = (form.title, form.content) else {
        return Err(AppError::BadRequest(
            "Title and content are required.".to_string(),
        ));
    };

    tracing::debug!(subject = %identity.subject, title = %title, "creating post");

    let input = NewPost {
        title,
        content,
        author: form.author,
        category: parse_category(form.category.as_deref())?,
        upload: form.upload,
        image_url: form.featured_image,
    };

    let post = state.posts.create(input).await?;
    Ok(HttpResponse::Created().json(ApiResponse::ok(PostDto::from(post))))
}

/// PUT /api/posts/{id} - partial update from a multipart form. Protected.
pub async fn update(
    _identity: Identity,
    state: web::Data<AppState>,
    id: web::Path<Uuid>,
    payload: Multipart,
) -> AppResult<HttpResponse> {
    let form = read_post_form(payload).await?;

    let patch = PostPatch {
        title: form.title,
        content: form.content,
        author: form.author,
        category: parse_category(form.category.as_deref())?,
        upload: form.upload,
        image_url: form.featured_image,
    };

    let post = state.posts.update(id.into_inner(), patch).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::ok(PostDto::from(post))))
}

/// DELETE /api/posts/{id} - delete a post and clean up its stored image. Protected.
pub async fn remove(
    _identity: Identity,
    state: web::Data<AppState>,
    id: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    let deleted = state.posts.delete(id.into_inner()).await?;
    Ok(HttpResponse::Ok().json(DeletedResponse::new(deleted, "Post deleted successfully")))
}
