//! Repository layer: the only code issuing document store operations

pub mod authors;
pub mod books;
pub mod categories;

use bson::{doc, oid::ObjectId, Bson, Document};
use mongodb::error::{ErrorKind, WriteFailure};
use mongodb::options::FindOptions;
use mongodb::Database;

use crate::error::{AppError, AppResult};
use crate::models::DEFAULT_LIMIT;

/// Main repository struct holding per-collection repositories
#[derive(Clone)]
pub struct Repository {
    db: Database,
    pub books: books::BooksRepository,
    pub authors: authors::AuthorsRepository,
    pub categories: categories::CategoriesRepository,
}

impl Repository {
    /// Create a new repository over the given database handle
    pub fn new(db: &Database) -> Self {
        Self {
            books: books::BooksRepository::new(db),
            authors: authors::AuthorsRepository::new(db),
            categories: categories::CategoriesRepository::new(db),
            db: db.clone(),
        }
    }

    /// Check connectivity to the document store
    pub async fn ping(&self) -> AppResult<()> {
        self.db.run_command(doc! { "ping": 1 }).await?;
        Ok(())
    }

    /// Create the unique indexes backing the ISBN and category-name constraints
    pub async fn ensure_indexes(&self) -> AppResult<()> {
        self.books.ensure_indexes().await?;
        self.categories.ensure_indexes().await?;
        Ok(())
    }
}

/// Escaped, case-insensitive substring matcher
pub(crate) fn substring_filter(value: &str) -> Bson {
    Bson::Document(doc! { "$regex": regex::escape(value), "$options": "i" })
}

/// Parse an identifier appearing in a list filter; unparseable values are
/// filter validation failures, not lookups that missed
pub(crate) fn parse_filter_id(field: &str, value: &str) -> AppResult<ObjectId> {
    ObjectId::parse_str(value)
        .map_err(|_| AppError::validation(field, "not a valid identifier"))
}

/// Sort document for a list query. Insertion order (`_id` ascending) when no
/// sort key is given; ObjectIds are monotonically increasing.
pub(crate) fn sort_doc(sort_by: Option<&str>, sort_order: Option<&str>) -> Document {
    match sort_by {
        Some(field) => {
            let direction = if sort_order == Some("desc") { -1 } else { 1 };
            doc! { field: direction }
        }
        None => doc! { "_id": 1 },
    }
}

/// Find options for an offset/limit page with the given sort
pub(crate) fn page_options(
    offset: Option<u64>,
    limit: Option<i64>,
    sort: Document,
) -> FindOptions {
    let mut options = FindOptions::default();
    options.skip = Some(offset.unwrap_or(0));
    options.limit = Some(limit.unwrap_or(DEFAULT_LIMIT));
    options.sort = Some(sort);
    options
}

/// True when a write failed against a unique index
pub(crate) fn is_duplicate_key(err: &mongodb::error::Error) -> bool {
    match *err.kind {
        ErrorKind::Write(WriteFailure::WriteError(ref write_error)) => write_error.code == 11000,
        _ => false,
    }
}
