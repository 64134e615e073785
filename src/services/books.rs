//! Books service

use bson::oid::ObjectId;
use validator::Validate;

use crate::{
    error::{AppError, AppResult},
    models::book::{normalize_isbn, Book, BookInput, BookQuery, BookResponse},
    repository::Repository,
};

use super::{parse_path_id, parse_reference};

#[derive(Clone)]
pub struct BooksService {
    repository: Repository,
}

impl BooksService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    /// List books matching the query
    pub async fn list(&self, query: &BookQuery) -> AppResult<Vec<BookResponse>> {
        query.validate()?;
        let books = self.repository.books.list(query).await?;
        Ok(books.into_iter().map(BookResponse::from).collect())
    }

    /// Get book by ID
    pub async fn get(&self, id: &str) -> AppResult<BookResponse> {
        let id = parse_path_id(id, "Book")?;
        Ok(self.repository.books.get(id).await?.into())
    }

    /// Create a book from validated input
    pub async fn create(&self, input: BookInput) -> AppResult<BookResponse> {
        input.validate()?;
        let book = self.assemble(input, None).await?;
        Ok(self.repository.books.create(book).await?.into())
    }

    /// Replace a book wholesale
    pub async fn update(&self, id: &str, input: BookInput) -> AppResult<BookResponse> {
        let id = parse_path_id(id, "Book")?;
        input.validate()?;
        let book = self.assemble(input, Some(id)).await?;
        Ok(self.repository.books.update(id, book).await?.into())
    }

    /// Delete a book
    pub async fn delete(&self, id: &str) -> AppResult<()> {
        let id = parse_path_id(id, "Book")?;
        self.repository.books.delete(id).await
    }

    /// Resolve references, enforce ISBN uniqueness and build the document
    /// to store. `existing` excludes the book itself on update.
    async fn assemble(&self, input: BookInput, existing: Option<ObjectId>) -> AppResult<Book> {
        let author_id = parse_reference(&input.author_id, "author")?;
        let category_id = parse_reference(&input.category_id, "category")?;

        if !self.repository.authors.exists(author_id).await? {
            return Err(AppError::InvalidReference(format!(
                "author {} does not exist",
                input.author_id
            )));
        }
        if !self.repository.categories.exists(category_id).await? {
            return Err(AppError::InvalidReference(format!(
                "category {} does not exist",
                input.category_id
            )));
        }

        let isbn = normalize_isbn(&input.isbn);
        if self.repository.books.isbn_exists(&isbn, existing).await? {
            return Err(AppError::Duplicate(format!(
                "Book with ISBN {} already exists",
                isbn
            )));
        }

        let now = bson::DateTime::now();
        Ok(Book {
            id: None,
            title: input.title.trim().to_string(),
            isbn,
            year: input.year,
            author_id,
            category_id,
            stock: input.stock,
            description: input.description,
            publisher: input.publisher,
            language: input.language,
            pages: input.pages,
            tags: normalize_tags(input.tags),
            created_at: now,
            updated_at: now,
        })
    }
}

/// Lowercase, trim and deduplicate tags, dropping empties
fn normalize_tags(tags: Vec<String>) -> Vec<String> {
    let mut seen = Vec::new();
    for tag in tags {
        let tag = tag.trim().to_lowercase();
        if !tag.is_empty() && !seen.contains(&tag) {
            seen.push(tag);
        }
    }
    seen
}
