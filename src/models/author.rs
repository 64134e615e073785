//! Author model and related types

use bson::oid::ObjectId;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use validator::{Validate, ValidationError};

use super::{validate_non_blank, validate_sort_order, sort_key_error};

/// Author document as stored in the `authors` collection
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Author {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub name: String,
    pub biography: Option<String>,
    pub birth_date: Option<NaiveDate>,
    pub death_date: Option<NaiveDate>,
    pub nationality: Option<String>,
    pub created_at: bson::DateTime,
    pub updated_at: bson::DateTime,
}

/// Input representation for creating or replacing an author
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[validate(schema(function = "validate_author_dates", skip_on_field_errors = false))]
pub struct AuthorInput {
    #[validate(
        custom(function = "validate_non_blank"),
        length(max = 100, message = "must be at most 100 characters")
    )]
    pub name: String,
    #[validate(length(max = 2000, message = "must be at most 2000 characters"))]
    pub biography: Option<String>,
    #[validate(custom(function = "validate_not_in_future"))]
    pub birth_date: Option<NaiveDate>,
    pub death_date: Option<NaiveDate>,
    #[validate(length(max = 50, message = "must be at most 50 characters"))]
    pub nationality: Option<String>,
}

/// Author representation returned to clients
#[derive(Debug, Serialize, ToSchema)]
pub struct AuthorResponse {
    pub id: String,
    pub name: String,
    pub biography: Option<String>,
    pub birth_date: Option<NaiveDate>,
    pub death_date: Option<NaiveDate>,
    pub nationality: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Author> for AuthorResponse {
    fn from(author: Author) -> Self {
        Self {
            id: author.id.map(|id| id.to_hex()).unwrap_or_default(),
            name: author.name,
            biography: author.biography,
            birth_date: author.birth_date,
            death_date: author.death_date,
            nationality: author.nationality,
            created_at: author.created_at.to_chrono(),
            updated_at: author.updated_at.to_chrono(),
        }
    }
}

/// Query parameters for listing authors
#[derive(Debug, Default, Deserialize, Validate, IntoParams)]
pub struct AuthorQuery {
    /// Case-insensitive substring match on the name
    pub name: Option<String>,
    /// Exact match on nationality
    pub nationality: Option<String>,
    pub offset: Option<u64>,
    /// Page size, 1..=100 (default 20)
    #[validate(range(min = 1, max = 100, message = "must be between 1 and 100"))]
    pub limit: Option<i64>,
    /// One of: name, created_at (default: insertion order)
    #[validate(custom(function = "validate_author_sort_key"))]
    pub sort_by: Option<String>,
    /// `asc` or `desc` (default asc)
    #[validate(custom(function = "validate_sort_order"))]
    pub sort_order: Option<String>,
}

fn validate_author_sort_key(value: &str) -> Result<(), ValidationError> {
    match value {
        "name" | "created_at" => Ok(()),
        _ => Err(sort_key_error("name, created_at")),
    }
}

fn validate_not_in_future(value: &NaiveDate) -> Result<(), ValidationError> {
    if *value > Utc::now().date_naive() {
        let mut err = ValidationError::new("birth_date");
        err.message = Some("must not be in the future".into());
        return Err(err);
    }
    Ok(())
}

/// Cross-field rule: a death date only makes sense after the birth date.
/// The error code carries the field name so the flattened report stays
/// field-addressable.
fn validate_author_dates(input: &AuthorInput) -> Result<(), ValidationError> {
    if let (Some(birth), Some(death)) = (input.birth_date, input.death_date) {
        if death <= birth {
            let mut err = ValidationError::new("death_date");
            err.message = Some("must be after birth_date".into());
            return Err(err);
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_input() -> AuthorInput {
        AuthorInput {
            name: "Frank Herbert".to_string(),
            biography: None,
            birth_date: NaiveDate::from_ymd_opt(1920, 10, 8),
            death_date: NaiveDate::from_ymd_opt(1986, 2, 11),
            nationality: Some("American".to_string()),
        }
    }

    #[test]
    fn accepts_valid_input() {
        assert!(valid_input().validate().is_ok());
    }

    #[test]
    fn rejects_blank_name() {
        let input = AuthorInput {
            name: " ".to_string(),
            ..valid_input()
        };
        assert!(input.validate().is_err());
    }

    #[test]
    fn rejects_birth_date_in_future() {
        let input = AuthorInput {
            birth_date: Some(Utc::now().date_naive() + chrono::Days::new(1)),
            death_date: None,
            ..valid_input()
        };
        assert!(input.validate().is_err());
    }

    #[test]
    fn rejects_death_before_birth() {
        let input = AuthorInput {
            birth_date: NaiveDate::from_ymd_opt(1986, 2, 11),
            death_date: NaiveDate::from_ymd_opt(1920, 10, 8),
            ..valid_input()
        };
        assert!(input.validate().is_err());
    }
}
