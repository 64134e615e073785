//! Business logic services

pub mod authors;
pub mod books;
pub mod categories;

use bson::oid::ObjectId;

use crate::{
    error::{AppError, AppResult},
    repository::Repository,
};

/// Container for all services
#[derive(Clone)]
pub struct Services {
    pub books: books::BooksService,
    pub authors: authors::AuthorsService,
    pub categories: categories::CategoriesService,
    repository: Repository,
}

impl Services {
    /// Create all services with the given repository
    pub fn new(repository: Repository) -> Self {
        Self {
            books: books::BooksService::new(repository.clone()),
            authors: authors::AuthorsService::new(repository.clone()),
            categories: categories::CategoriesService::new(repository.clone()),
            repository,
        }
    }

    /// Check connectivity to the document store
    pub async fn ping(&self) -> AppResult<()> {
        self.repository.ping().await
    }
}

/// Parse an identifier from a request path. An identifier that cannot be
/// parsed cannot resolve, so this reports `NotFound`.
pub(crate) fn parse_path_id(id: &str, what: &str) -> AppResult<ObjectId> {
    ObjectId::parse_str(id).map_err(|_| AppError::NotFound(format!("{} {} not found", what, id)))
}

/// Parse a foreign-key identifier from a request body
pub(crate) fn parse_reference(id: &str, what: &str) -> AppResult<ObjectId> {
    ObjectId::parse_str(id)
        .map_err(|_| AppError::InvalidReference(format!("{} {} does not exist", what, id)))
}
