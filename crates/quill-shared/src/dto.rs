//! Data Transfer Objects - request/response types for the API.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use quill_core::domain::{Category, Post};

/// A post as exposed over the wire, with its category joined for display.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostDto {
    pub id: Uuid,
    pub title: String,
    pub content: String,
    pub slug: String,
    pub author: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<CategoryDto>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub featured_image: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<(Post, Option<Category>)> for PostDto {
    fn from((post, category): (Post, Option<Category>)) -> Self {
        Self {
            id: post.id,
            title: post.title,
            content: post.content,
            slug: post.slug,
            author: post.author,
            category: category.map(Into::into),
            featured_image: post.featured_image,
            created_at: post.created_at,
            updated_at: post.updated_at,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryDto {
    pub id: Uuid,
    pub name: String,
    pub created_at: DateTime<Utc>,
}

impl From<Category> for CategoryDto {
    fn from(category: Category) -> Self {
        Self {
            id: category.id,
            name: category.name,
            created_at: category.created_at,
        }
    }
}

/// Request body for creating a category.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateCategoryRequest {
    pub name: String,
}

/// Response for a successful post deletion: `{success, message, id}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeletedResponse {
    pub success: bool,
    pub message: String,
    pub id: Uuid,
}

impl DeletedResponse {
    pub fn new(id: Uuid, message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
            id,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn post_dto_uses_camel_case_field_names() {
        let post = Post::new(
            "T".to_string(),
            "C".to_string(),
            "t".to_string(),
            "Anonymous".to_string(),
            None,
            Some("/uploads/x.png".to_string()),
        );
        let json = serde_json::to_value(PostDto::from((post, None))).unwrap();

        assert_eq!(json["featuredImage"], "/uploads/x.png");
        assert!(json.get("createdAt").is_some());
        assert!(json.get("category").is_none());
    }
}
