//! Category operations - listing and creation (categories are immutable).

use std::sync::Arc;

use crate::domain::Category;
use crate::error::{DomainError, RepoError};
use crate::ports::CategoryRepository;

pub struct CategoryService {
    categories: Arc<dyn CategoryRepository>,
}

impl CategoryService {
    pub fn new(categories: Arc<dyn CategoryRepository>) -> Self {
        Self { categories }
    }

    /// All categories, sorted by name.
    pub async fn list(&self) -> Result<Vec<Category>, DomainError> {
        Ok(self.categories.list().await?)
    }

    /// Create a category. Names are trimmed and must be unique; uniqueness is
    /// only checked here because names never change afterwards.
    pub async fn create(&self, name: &str) -> Result<Category, DomainError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(DomainError::Validation(
                "Category name is required".to_string(),
            ));
        }

        if self.categories.find_by_name(name).await?.is_some() {
            return Err(DomainError::Duplicate("Category already exists".to_string()));
        }

        match self.categories.insert(Category::new(name.to_string())).await {
            Ok(category) => Ok(category),
            // The pre-check can race with a concurrent insert; the unique
            // index reports it as a constraint violation.
            Err(RepoError::Constraint(_)) => {
                Err(DomainError::Duplicate("Category already exists".to_string()))
            }
            Err(err) => Err(err.into()),
        }
    }
}
