//! Categories repository

use bson::{doc, oid::ObjectId, Document};
use futures::TryStreamExt;
use mongodb::options::IndexOptions;
use mongodb::{Collection, Database, IndexModel};

use crate::{
    error::{AppError, AppResult},
    models::category::{Category, CategoryQuery},
};

use super::{is_duplicate_key, page_options, sort_doc, substring_filter};

#[derive(Clone)]
pub struct CategoriesRepository {
    collection: Collection<Category>,
}

impl CategoriesRepository {
    pub fn new(db: &Database) -> Self {
        Self {
            collection: db.collection("categories"),
        }
    }

    /// Unique index on name; closes the check-then-insert race
    pub async fn ensure_indexes(&self) -> AppResult<()> {
        self.collection
            .create_index(
                IndexModel::builder()
                    .keys(doc! { "name": 1 })
                    .options(IndexOptions::builder().unique(true).build())
                    .build(),
            )
            .await?;
        Ok(())
    }

    /// Insert a new category, returning it with the store-assigned identifier
    pub async fn create(&self, mut category: Category) -> AppResult<Category> {
        category.id = None;
        let result = self.collection.insert_one(&category).await.map_err(|e| {
            if is_duplicate_key(&e) {
                AppError::Duplicate(format!("Category `{}` already exists", category.name))
            } else {
                AppError::Store(e)
            }
        })?;
        category.id = result.inserted_id.as_object_id();
        Ok(category)
    }

    /// Get a category by ID
    pub async fn get(&self, id: ObjectId) -> AppResult<Category> {
        self.collection
            .find_one(doc! { "_id": id })
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Category {} not found", id.to_hex())))
    }

    /// Whether a category with this ID exists
    pub async fn exists(&self, id: ObjectId) -> AppResult<bool> {
        Ok(self
            .collection
            .count_documents(doc! { "_id": id })
            .await?
            > 0)
    }

    /// Whether a category with this exact name exists, excluding `exclude`
    pub async fn name_exists(&self, name: &str, exclude: Option<ObjectId>) -> AppResult<bool> {
        let mut filter = doc! { "name": name };
        if let Some(id) = exclude {
            filter.insert("_id", doc! { "$ne": id });
        }
        Ok(self.collection.count_documents(filter).await? > 0)
    }

    /// List categories matching the query, one offset/limit page at a time
    pub async fn list(&self, query: &CategoryQuery) -> AppResult<Vec<Category>> {
        let mut filter = Document::new();
        if let Some(ref name) = query.name {
            filter.insert("name", substring_filter(name));
        }
        let options = page_options(
            query.offset,
            query.limit,
            sort_doc(query.sort_by.as_deref(), query.sort_order.as_deref()),
        );
        let categories = self
            .collection
            .find(filter)
            .with_options(options)
            .await?
            .try_collect()
            .await?;
        Ok(categories)
    }

    /// Full replace, preserving the original creation timestamp
    pub async fn update(&self, id: ObjectId, mut category: Category) -> AppResult<Category> {
        let existing = self.get(id).await?;
        category.id = Some(id);
        category.created_at = existing.created_at;
        let result = self
            .collection
            .replace_one(doc! { "_id": id }, &category)
            .await
            .map_err(|e| {
                if is_duplicate_key(&e) {
                    AppError::Duplicate(format!("Category `{}` already exists", category.name))
                } else {
                    AppError::Store(e)
                }
            })?;
        if result.matched_count == 0 {
            return Err(AppError::NotFound(format!(
                "Category {} not found",
                id.to_hex()
            )));
        }
        Ok(category)
    }

    /// Delete a category. A miss is reported, so repeated deletes are observable.
    pub async fn delete(&self, id: ObjectId) -> AppResult<()> {
        let result = self.collection.delete_one(doc! { "_id": id }).await?;
        if result.deleted_count == 0 {
            return Err(AppError::NotFound(format!(
                "Category {} not found",
                id.to_hex()
            )));
        }
        Ok(())
    }
}
