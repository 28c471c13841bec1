//! PostgreSQL repository implementations.

use async_trait::async_trait;
use sea_orm::sea_query::extension::postgres::PgExpr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, DbConn, DbErr, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, QuerySelect,
    sea_query::Expr,
};
use uuid::Uuid;

use quill_core::domain::{Category, Post};
use quill_core::error::RepoError;
use quill_core::ports::{CategoryRepository, PostFilter, PostRepository, PostWithCategory};

use super::entity::category::{self, Entity as CategoryEntity};
use super::entity::post::{self, Entity as PostEntity};

fn map_db_err(err: DbErr) -> RepoError {
    let msg = err.to_string();
    if msg.contains("duplicate") || msg.contains("unique") {
        RepoError::Constraint(msg)
    } else {
        RepoError::Query(msg)
    }
}

/// PostgreSQL post repository.
pub struct PostgresPostRepository {
    db: DbConn,
}

impl PostgresPostRepository {
    pub fn new(db: DbConn) -> Self {
        Self { db }
    }

    fn filter_condition(filter: &PostFilter) -> Condition {
        let mut cond = Condition::all();
        if let Some(search) = &filter.search {
            let pattern = format!("%{search}%");
            cond = cond.add(
                Condition::any()
                    .add(Expr::col((PostEntity, post::Column::Title)).ilike(pattern.clone()))
                    .add(Expr::col((PostEntity, post::Column::Content)).ilike(pattern)),
            );
        }
        if let Some(category) = filter.category {
            cond = cond.add(post::Column::CategoryId.eq(category));
        }
        cond
    }
}

#[async_trait]
impl PostRepository for PostgresPostRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Post>, RepoError> {
        let result = PostEntity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(map_db_err)?;

        Ok(result.map(Into::into))
    }

    async fn find_with_category(&self, id: Uuid) -> Result<Option<PostWithCategory>, RepoError> {
        let result = PostEntity::find_by_id(id)
            .find_also_related(CategoryEntity)
            .one(&self.db)
            .await
            .map_err(map_db_err)?;

        Ok(result.map(|(p, c)| (p.into(), c.map(Into::into))))
    }

    async fn list(&self, filter: &PostFilter) -> Result<(Vec<PostWithCategory>, u64), RepoError> {
        let cond = Self::filter_condition(filter);

        let total = PostEntity::find()
            .filter(cond.clone())
            .count(&self.db)
            .await
            .map_err(map_db_err)?;

        let rows = PostEntity::find()
            .find_also_related(CategoryEntity)
            .filter(cond)
            .order_by_desc(post::Column::CreatedAt)
            .offset((filter.page - 1) * filter.limit)
            .limit(filter.limit)
            .all(&self.db)
            .await
            .map_err(map_db_err)?;

        let items = rows
            .into_iter()
            .map(|(p, c)| (p.into(), c.map(Into::into)))
            .collect();

        Ok((items, total))
    }

    async fn insert(&self, post: Post) -> Result<Post, RepoError> {
        let active: post::ActiveModel = post.into();
        let model = active.insert(&self.db).await.map_err(map_db_err)?;
        Ok(model.into())
    }

    async fn update(&self, post: Post) -> Result<Post, RepoError> {
        let active: post::ActiveModel = post.into();
        let model = active.update(&self.db).await.map_err(|err| match err {
            DbErr::RecordNotUpdated => RepoError::NotFound,
            other => map_db_err(other),
        })?;
        Ok(model.into())
    }

    async fn delete(&self, id: Uuid) -> Result<(), RepoError> {
        let result = PostEntity::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(map_db_err)?;

        if result.rows_affected == 0 {
            return Err(RepoError::NotFound);
        }

        Ok(())
    }

    async fn slug_exists(&self, slug: &str) -> Result<bool, RepoError> {
        let count = PostEntity::find()
            .filter(post::Column::Slug.eq(slug))
            .count(&self.db)
            .await
            .map_err(map_db_err)?;

        Ok(count > 0)
    }
}

/// PostgreSQL category repository.
pub struct PostgresCategoryRepository {
    db: DbConn,
}

impl PostgresCategoryRepository {
    pub fn new(db: DbConn) -> Self {
        Self { db }
    }
}

#[async_trait]
impl CategoryRepository for PostgresCategoryRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Category>, RepoError> {
        let result = CategoryEntity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(map_db_err)?;

        Ok(result.map(Into::into))
    }

    async fn find_by_name(&self, name: &str) -> Result<Option<Category>, RepoError> {
        let result = CategoryEntity::find()
            .filter(category::Column::Name.eq(name))
            .one(&self.db)
            .await
            .map_err(map_db_err)?;

        Ok(result.map(Into::into))
    }

    async fn list(&self) -> Result<Vec<Category>, RepoError> {
        let result = CategoryEntity::find()
            .order_by_asc(category::Column::Name)
            .all(&self.db)
            .await
            .map_err(map_db_err)?;

        Ok(result.into_iter().map(Into::into).collect())
    }

    async fn insert(&self, cat: Category) -> Result<Category, RepoError> {
        let active: category::ActiveModel = cat.into();
        let model = active.insert(&self.db).await.map_err(map_db_err)?;
        Ok(model.into())
    }
}
