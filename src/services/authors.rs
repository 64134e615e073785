//! Authors service

use validator::Validate;

use crate::{
    error::{AppError, AppResult},
    models::author::{Author, AuthorInput, AuthorQuery, AuthorResponse},
    repository::Repository,
};

use super::parse_path_id;

#[derive(Clone)]
pub struct AuthorsService {
    repository: Repository,
}

impl AuthorsService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    /// List authors matching the query
    pub async fn list(&self, query: &AuthorQuery) -> AppResult<Vec<AuthorResponse>> {
        query.validate()?;
        let authors = self.repository.authors.list(query).await?;
        Ok(authors.into_iter().map(AuthorResponse::from).collect())
    }

    /// Get author by ID
    pub async fn get(&self, id: &str) -> AppResult<AuthorResponse> {
        let id = parse_path_id(id, "Author")?;
        Ok(self.repository.authors.get(id).await?.into())
    }

    /// Create an author from validated input
    pub async fn create(&self, input: AuthorInput) -> AppResult<AuthorResponse> {
        input.validate()?;
        let author = assemble(input);
        Ok(self.repository.authors.create(author).await?.into())
    }

    /// Replace an author wholesale
    pub async fn update(&self, id: &str, input: AuthorInput) -> AppResult<AuthorResponse> {
        let id = parse_path_id(id, "Author")?;
        input.validate()?;
        let author = assemble(input);
        Ok(self.repository.authors.update(id, author).await?.into())
    }

    /// Delete an author. Rejected while books still reference it; an
    /// orphaned reference would only surface much later, far from its cause.
    pub async fn delete(&self, id: &str) -> AppResult<()> {
        let id = parse_path_id(id, "Author")?;
        let referencing = self.repository.books.count_by_author(id).await?;
        if referencing > 0 {
            return Err(AppError::ReferenceConflict(format!(
                "Cannot delete author: {} book(s) still reference it",
                referencing
            )));
        }
        self.repository.authors.delete(id).await
    }
}

fn assemble(input: AuthorInput) -> Author {
    let now = bson::DateTime::now();
    Author {
        id: None,
        name: input.name.trim().to_string(),
        biography: input.biography,
        birth_date: input.birth_date,
        death_date: input.death_date,
        nationality: input.nationality,
        created_at: now,
        updated_at: now,
    }
}
