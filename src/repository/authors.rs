//! Authors repository

use bson::{doc, oid::ObjectId, Document};
use futures::TryStreamExt;
use mongodb::{Collection, Database};

use crate::{
    error::{AppError, AppResult},
    models::author::{Author, AuthorQuery},
};

use super::{page_options, sort_doc, substring_filter};

#[derive(Clone)]
pub struct AuthorsRepository {
    collection: Collection<Author>,
}

impl AuthorsRepository {
    pub fn new(db: &Database) -> Self {
        Self {
            collection: db.collection("authors"),
        }
    }

    /// Insert a new author, returning it with the store-assigned identifier
    pub async fn create(&self, mut author: Author) -> AppResult<Author> {
        author.id = None;
        let result = self.collection.insert_one(&author).await?;
        author.id = result.inserted_id.as_object_id();
        Ok(author)
    }

    /// Get an author by ID
    pub async fn get(&self, id: ObjectId) -> AppResult<Author> {
        self.collection
            .find_one(doc! { "_id": id })
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Author {} not found", id.to_hex())))
    }

    /// Whether an author with this ID exists
    pub async fn exists(&self, id: ObjectId) -> AppResult<bool> {
        Ok(self
            .collection
            .count_documents(doc! { "_id": id })
            .await?
            > 0)
    }

    /// List authors matching the query, one offset/limit page at a time
    pub async fn list(&self, query: &AuthorQuery) -> AppResult<Vec<Author>> {
        let mut filter = Document::new();
        if let Some(ref name) = query.name {
            filter.insert("name", substring_filter(name));
        }
        if let Some(ref nationality) = query.nationality {
            filter.insert("nationality", nationality.clone());
        }
        let options = page_options(
            query.offset,
            query.limit,
            sort_doc(query.sort_by.as_deref(), query.sort_order.as_deref()),
        );
        let authors = self
            .collection
            .find(filter)
            .with_options(options)
            .await?
            .try_collect()
            .await?;
        Ok(authors)
    }

    /// Full replace, preserving the original creation timestamp
    pub async fn update(&self, id: ObjectId, mut author: Author) -> AppResult<Author> {
        let existing = self.get(id).await?;
        author.id = Some(id);
        author.created_at = existing.created_at;
        let result = self.collection.replace_one(doc! { "_id": id }, &author).await?;
        if result.matched_count == 0 {
            return Err(AppError::NotFound(format!(
                "Author {} not found",
                id.to_hex()
            )));
        }
        Ok(author)
    }

    /// Delete an author. A miss is reported, so repeated deletes are observable.
    pub async fn delete(&self, id: ObjectId) -> AppResult<()> {
        let result = self.collection.delete_one(doc! { "_id": id }).await?;
        if result.deleted_count == 0 {
            return Err(AppError::NotFound(format!(
                "Author {} not found",
                id.to_hex()
            )));
        }
        Ok(())
    }
}
