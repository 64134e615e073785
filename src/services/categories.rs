//! Categories service

use bson::oid::ObjectId;
use validator::Validate;

use crate::{
    error::{AppError, AppResult},
    models::category::{Category, CategoryInput, CategoryQuery, CategoryResponse},
    repository::Repository,
};

use super::parse_path_id;

#[derive(Clone)]
pub struct CategoriesService {
    repository: Repository,
}

impl CategoriesService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    /// List categories matching the query
    pub async fn list(&self, query: &CategoryQuery) -> AppResult<Vec<CategoryResponse>> {
        query.validate()?;
        let categories = self.repository.categories.list(query).await?;
        Ok(categories.into_iter().map(CategoryResponse::from).collect())
    }

    /// Get category by ID
    pub async fn get(&self, id: &str) -> AppResult<CategoryResponse> {
        let id = parse_path_id(id, "Category")?;
        Ok(self.repository.categories.get(id).await?.into())
    }

    /// Create a category from validated input
    pub async fn create(&self, input: CategoryInput) -> AppResult<CategoryResponse> {
        input.validate()?;
        let category = self.assemble(input, None).await?;
        Ok(self.repository.categories.create(category).await?.into())
    }

    /// Replace a category wholesale
    pub async fn update(&self, id: &str, input: CategoryInput) -> AppResult<CategoryResponse> {
        let id = parse_path_id(id, "Category")?;
        input.validate()?;
        let category = self.assemble(input, Some(id)).await?;
        Ok(self.repository.categories.update(id, category).await?.into())
    }

    /// Delete a category. Rejected while books still reference it.
    pub async fn delete(&self, id: &str) -> AppResult<()> {
        let id = parse_path_id(id, "Category")?;
        let referencing = self.repository.books.count_by_category(id).await?;
        if referencing > 0 {
            return Err(AppError::ReferenceConflict(format!(
                "Cannot delete category: {} book(s) still reference it",
                referencing
            )));
        }
        self.repository.categories.delete(id).await
    }

    /// Enforce name uniqueness and build the document to store.
    /// `existing` excludes the category itself on update.
    async fn assemble(
        &self,
        input: CategoryInput,
        existing: Option<ObjectId>,
    ) -> AppResult<Category> {
        let name = input.name.trim().to_string();
        if self
            .repository
            .categories
            .name_exists(&name, existing)
            .await?
        {
            return Err(AppError::Duplicate(format!(
                "Category `{}` already exists",
                name
            )));
        }

        let now = bson::DateTime::now();
        Ok(Category {
            id: None,
            name,
            description: input.description,
            created_at: now,
            updated_at: now,
        })
    }
}
