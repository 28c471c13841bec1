use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Post entity - a published blog entry.
///
/// The `slug` is derived from the title at creation and re-derived on update
/// only when the title changes; it is unique across the whole collection.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Post {
    pub id: Uuid,
    pub title: String,
    pub content: String,
    pub slug: String,
    pub author: String,
    pub category_id: Option<Uuid>,
    /// Either a local `/uploads/...` path or an external URL.
    pub featured_image: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Post {
    /// Create a new post with a generated id and timestamps.
    pub fn new(
        title: String,
        content: String,
        slug: String,
        author: String,
        category_id: Option<Uuid>,
        featured_image: Option<String>,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            title,
            content,
            slug,
            author,
            category_id,
            featured_image,
            created_at: now,
            updated_at: now,
        }
    }
}
