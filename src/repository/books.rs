//! Books repository

use bson::{doc, oid::ObjectId, Document};
use futures::TryStreamExt;
use mongodb::options::IndexOptions;
use mongodb::{Collection, Database, IndexModel};

use crate::{
    error::{AppError, AppResult},
    models::book::{normalize_isbn, Book, BookQuery},
};

use super::{is_duplicate_key, page_options, parse_filter_id, sort_doc, substring_filter};

#[derive(Clone)]
pub struct BooksRepository {
    collection: Collection<Book>,
}

impl BooksRepository {
    pub fn new(db: &Database) -> Self {
        Self {
            collection: db.collection("books"),
        }
    }

    /// Unique index on ISBN; closes the check-then-insert race
    pub async fn ensure_indexes(&self) -> AppResult<()> {
        self.collection
            .create_index(
                IndexModel::builder()
                    .keys(doc! { "isbn": 1 })
                    .options(IndexOptions::builder().unique(true).build())
                    .build(),
            )
            .await?;
        Ok(())
    }

    /// Insert a new book, returning it with the store-assigned identifier
    pub async fn create(&self, mut book: Book) -> AppResult<Book> {
        book.id = None;
        let result = self.collection.insert_one(&book).await.map_err(|e| {
            if is_duplicate_key(&e) {
                AppError::Duplicate(format!("Book with ISBN {} already exists", book.isbn))
            } else {
                AppError::Store(e)
            }
        })?;
        book.id = result.inserted_id.as_object_id();
        Ok(book)
    }

    /// Get a book by ID
    pub async fn get(&self, id: ObjectId) -> AppResult<Book> {
        self.collection
            .find_one(doc! { "_id": id })
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Book {} not found", id.to_hex())))
    }

    /// List books matching the query, one offset/limit page at a time
    pub async fn list(&self, query: &BookQuery) -> AppResult<Vec<Book>> {
        let filter = build_filter(query)?;
        let options = page_options(
            query.offset,
            query.limit,
            sort_doc(query.sort_by.as_deref(), query.sort_order.as_deref()),
        );
        let books = self
            .collection
            .find(filter)
            .with_options(options)
            .await?
            .try_collect()
            .await?;
        Ok(books)
    }

    /// Full replace, preserving the original creation timestamp
    pub async fn update(&self, id: ObjectId, mut book: Book) -> AppResult<Book> {
        let existing = self.get(id).await?;
        book.id = Some(id);
        book.created_at = existing.created_at;
        let result = self
            .collection
            .replace_one(doc! { "_id": id }, &book)
            .await
            .map_err(|e| {
                if is_duplicate_key(&e) {
                    AppError::Duplicate(format!("Book with ISBN {} already exists", book.isbn))
                } else {
                    AppError::Store(e)
                }
            })?;
        if result.matched_count == 0 {
            return Err(AppError::NotFound(format!("Book {} not found", id.to_hex())));
        }
        Ok(book)
    }

    /// Delete a book. A miss is reported, so repeated deletes are observable.
    pub async fn delete(&self, id: ObjectId) -> AppResult<()> {
        let result = self.collection.delete_one(doc! { "_id": id }).await?;
        if result.deleted_count == 0 {
            return Err(AppError::NotFound(format!("Book {} not found", id.to_hex())));
        }
        Ok(())
    }

    /// Whether a book with this (normalized) ISBN exists, excluding `exclude`
    pub async fn isbn_exists(&self, isbn: &str, exclude: Option<ObjectId>) -> AppResult<bool> {
        let mut filter = doc! { "isbn": isbn };
        if let Some(id) = exclude {
            filter.insert("_id", doc! { "$ne": id });
        }
        Ok(self.collection.count_documents(filter).await? > 0)
    }

    /// Number of books referencing the given author
    pub async fn count_by_author(&self, author_id: ObjectId) -> AppResult<u64> {
        Ok(self
            .collection
            .count_documents(doc! { "author_id": author_id })
            .await?)
    }

    /// Number of books referencing the given category
    pub async fn count_by_category(&self, category_id: ObjectId) -> AppResult<u64> {
        Ok(self
            .collection
            .count_documents(doc! { "category_id": category_id })
            .await?)
    }
}

fn build_filter(query: &BookQuery) -> AppResult<Document> {
    let mut filter = Document::new();
    if let Some(ref title) = query.title {
        filter.insert("title", substring_filter(title));
    }
    if let Some(ref isbn) = query.isbn {
        filter.insert("isbn", normalize_isbn(isbn));
    }
    if let Some(ref author_id) = query.author_id {
        filter.insert("author_id", parse_filter_id("author_id", author_id)?);
    }
    if let Some(ref category_id) = query.category_id {
        filter.insert("category_id", parse_filter_id("category_id", category_id)?);
    }
    if let Some(ref language) = query.language {
        filter.insert("language", language.clone());
    }
    if let Some(ref tag) = query.tag {
        // Equality on an array field matches membership
        filter.insert("tags", tag.clone());
    }
    Ok(filter)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_query_builds_empty_filter() {
        let filter = build_filter(&BookQuery::default()).unwrap();
        assert!(filter.is_empty());
    }

    #[test]
    fn isbn_filter_is_normalized() {
        let query = BookQuery {
            isbn: Some("978-0-7432-7356-5".to_string()),
            ..BookQuery::default()
        };
        let filter = build_filter(&query).unwrap();
        assert_eq!(filter.get_str("isbn").unwrap(), "9780743273565");
    }

    #[test]
    fn title_filter_is_substring_matcher() {
        let query = BookQuery {
            title: Some("dune".to_string()),
            ..BookQuery::default()
        };
        let filter = build_filter(&query).unwrap();
        let title = filter.get_document("title").unwrap();
        assert_eq!(title.get_str("$regex").unwrap(), "dune");
        assert_eq!(title.get_str("$options").unwrap(), "i");
    }

    #[test]
    fn reference_filters_require_valid_ids() {
        let query = BookQuery {
            author_id: Some("garbage".to_string()),
            ..BookQuery::default()
        };
        assert!(build_filter(&query).is_err());

        let query = BookQuery {
            author_id: Some("507f1f77bcf86cd799439011".to_string()),
            category_id: Some("507f1f77bcf86cd799439012".to_string()),
            ..BookQuery::default()
        };
        let filter = build_filter(&query).unwrap();
        assert!(filter.get_object_id("author_id").is_ok());
        assert!(filter.get_object_id("category_id").is_ok());
    }
}
