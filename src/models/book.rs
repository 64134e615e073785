//! Book model and related types

use bson::oid::ObjectId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use validator::{Validate, ValidationError};

use super::{validate_non_blank, validate_sort_order, sort_key_error};

/// Book document as stored in the `books` collection
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Book {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub title: String,
    pub isbn: String,
    pub year: i32,
    pub author_id: ObjectId,
    pub category_id: ObjectId,
    pub stock: i32,
    pub description: Option<String>,
    pub publisher: Option<String>,
    pub language: Option<String>,
    pub pages: Option<i32>,
    #[serde(default)]
    pub tags: Vec<String>,
    pub created_at: bson::DateTime,
    pub updated_at: bson::DateTime,
}

/// Input representation for creating or replacing a book.
/// Never carries an identifier; the store assigns one at creation.
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct BookInput {
    #[validate(
        custom(function = "validate_non_blank"),
        length(max = 200, message = "must be at most 200 characters")
    )]
    pub title: String,
    /// Free-form ISBN; separators are stripped before storage and uniqueness checks
    #[validate(
        custom(function = "validate_non_blank"),
        length(max = 32, message = "must be at most 32 characters")
    )]
    pub isbn: String,
    #[validate(range(min = 1, max = 9999, message = "must be between 1 and 9999"))]
    pub year: i32,
    pub author_id: String,
    pub category_id: String,
    #[validate(range(min = 0, message = "must not be negative"))]
    pub stock: i32,
    #[validate(length(max = 1000, message = "must be at most 1000 characters"))]
    pub description: Option<String>,
    #[validate(length(max = 100, message = "must be at most 100 characters"))]
    pub publisher: Option<String>,
    #[validate(length(max = 50, message = "must be at most 50 characters"))]
    pub language: Option<String>,
    #[validate(range(min = 1, max = 10000, message = "must be between 1 and 10000"))]
    pub pages: Option<i32>,
    #[serde(default)]
    pub tags: Vec<String>,
}

/// Book representation returned to clients
#[derive(Debug, Serialize, ToSchema)]
pub struct BookResponse {
    pub id: String,
    pub title: String,
    pub isbn: String,
    pub year: i32,
    pub author_id: String,
    pub category_id: String,
    pub stock: i32,
    pub description: Option<String>,
    pub publisher: Option<String>,
    pub language: Option<String>,
    pub pages: Option<i32>,
    pub tags: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Book> for BookResponse {
    fn from(book: Book) -> Self {
        Self {
            id: book.id.map(|id| id.to_hex()).unwrap_or_default(),
            title: book.title,
            isbn: book.isbn,
            year: book.year,
            author_id: book.author_id.to_hex(),
            category_id: book.category_id.to_hex(),
            stock: book.stock,
            description: book.description,
            publisher: book.publisher,
            language: book.language,
            pages: book.pages,
            tags: book.tags,
            created_at: book.created_at.to_chrono(),
            updated_at: book.updated_at.to_chrono(),
        }
    }
}

/// Query parameters for listing books
#[derive(Debug, Default, Deserialize, Validate, IntoParams)]
pub struct BookQuery {
    /// Case-insensitive substring match on the title
    pub title: Option<String>,
    /// Exact match, compared after separator stripping
    pub isbn: Option<String>,
    /// Filter by author identifier
    pub author_id: Option<String>,
    /// Filter by category identifier
    pub category_id: Option<String>,
    /// Exact match on language
    pub language: Option<String>,
    /// Books tagged with this tag
    pub tag: Option<String>,
    pub offset: Option<u64>,
    /// Page size, 1..=100 (default 20)
    #[validate(range(min = 1, max = 100, message = "must be between 1 and 100"))]
    pub limit: Option<i64>,
    /// One of: title, year, created_at (default: insertion order)
    #[validate(custom(function = "validate_book_sort_key"))]
    pub sort_by: Option<String>,
    /// `asc` or `desc` (default asc)
    #[validate(custom(function = "validate_sort_order"))]
    pub sort_order: Option<String>,
}

fn validate_book_sort_key(value: &str) -> Result<(), ValidationError> {
    match value {
        "title" | "year" | "created_at" => Ok(()),
        _ => Err(sort_key_error("title, year, created_at")),
    }
}

/// Strip hyphen and space separators from an ISBN
pub fn normalize_isbn(raw: &str) -> String {
    raw.chars().filter(|c| *c != '-' && *c != ' ').collect()
}
