//! The backend part of the backend: the database interface
//!
//! The primary entry point to this module is the function [get_store_from_env], which returns an
//! object implementing the [TrioStore] trait. This object can be shared between threads in a
//! global application state and be used to create [TrioStoreFacade] instances for interaction
//! with the database. These provide a CRUD-like interface, using the data models from the [models]
//! module. The interface is split into one trait per application ([ListingStore] for the venue
//! and artist listings, [TriviaStore] and [DrinkStore]), which are combined by [TrioStoreFacade].
//!
//! The primary implementation of [TrioStore] ([postgres::PgDataStore]) wraps a PostgreSQL
//! connection pool and its corresponding facade objects hold one pooled connection each, using
//! the Diesel query DSL for implementing the database interaction.
//!
//! There is also a mock implementation for unittests.

use crate::cli_error::CliError;
use crate::cli_error::CliError::UnexpectedStoreError;
use crate::setup;
use chrono::{DateTime, Utc};
use std::fmt::Debug;

pub mod models;
mod postgres;
mod schema;
#[cfg(test)]
pub mod store_mock;
mod util;

/// Get a [TrioStore] instance, according the "DATABASE_URL" environment variable.
///
/// The DATABASE_URL must be a PosgreSQL connection url, following the schema
/// "postgres://{user}:{password}@{host}/{database}".
pub fn get_store_from_env() -> Result<impl TrioStore, CliError> {
    postgres::PgDataStore::new(&setup::get_database_url_from_env()?)
        .map_err(|err| UnexpectedStoreError(err.to_string()))
}

pub type VenueId = i32;
pub type ArtistId = i32;
pub type GenreId = i32;
pub type QuestionId = i32;
pub type CategoryId = i32;
pub type DrinkId = i32;

/// Venues, artists and their shows
pub trait ListingStore {
    /// Get all genres, sorted by name
    fn get_genres(&mut self) -> Result<Vec<models::Genre>, StoreError>;

    /// Get all venues, sorted by (state, city, name), with their number of shows starting at or
    /// after `now`
    fn get_venues(&mut self, now: DateTime<Utc>)
        -> Result<Vec<models::VenueListEntry>, StoreError>;
    /// Get all venues whose name contains the search term, case-insensitively. Sorted like
    /// [Self::get_venues].
    fn search_venues(
        &mut self,
        search_term: &str,
        now: DateTime<Utc>,
    ) -> Result<Vec<models::VenueListEntry>, StoreError>;
    fn get_venue(&mut self, venue_id: VenueId) -> Result<models::FullVenue, StoreError>;
    fn create_venue(&mut self, venue: models::FullNewVenue) -> Result<VenueId, StoreError>;
    /// Overwrite all fields and the genres of an existing venue
    fn update_venue(
        &mut self,
        venue_id: VenueId,
        venue: models::FullNewVenue,
    ) -> Result<(), StoreError>;
    /// Delete a venue, including its shows and genre associations.
    ///
    /// Returns the deleted venue or `Err(StoreError::NotExisting)`.
    fn delete_venue(&mut self, venue_id: VenueId) -> Result<models::Venue, StoreError>;

    /// Get all artists, sorted by name, with their number of shows starting at or after `now`
    fn get_artists(
        &mut self,
        now: DateTime<Utc>,
    ) -> Result<Vec<models::ArtistListEntry>, StoreError>;
    fn search_artists(
        &mut self,
        search_term: &str,
        now: DateTime<Utc>,
    ) -> Result<Vec<models::ArtistListEntry>, StoreError>;
    fn get_artist(&mut self, artist_id: ArtistId) -> Result<models::FullArtist, StoreError>;
    fn create_artist(&mut self, artist: models::FullNewArtist) -> Result<ArtistId, StoreError>;
    fn update_artist(
        &mut self,
        artist_id: ArtistId,
        artist: models::FullNewArtist,
    ) -> Result<(), StoreError>;
    fn delete_artist(&mut self, artist_id: ArtistId) -> Result<models::Artist, StoreError>;

    /// Get all shows, sorted by start time
    fn get_shows(&mut self) -> Result<Vec<models::ShowListEntry>, StoreError>;
    /// Get all shows whose artist name or venue name contains the search term,
    /// case-insensitively. Sorted by start time.
    fn search_shows(&mut self, search_term: &str)
        -> Result<Vec<models::ShowListEntry>, StoreError>;
    /// Create a new show.
    ///
    /// Returns `Err(StoreError::ConflictEntityExists)` if the artist has already a show at the
    /// venue at the same time and `Err(StoreError::InvalidInputData)` if the venue or artist does
    /// not exist.
    fn create_show(&mut self, show: models::Show) -> Result<(), StoreError>;
}

/// Trivia questions and their categories
pub trait TriviaStore {
    /// Get all categories, sorted by id
    fn get_categories(&mut self) -> Result<Vec<models::Category>, StoreError>;
    /// Get all questions, sorted by id
    fn get_questions(&mut self) -> Result<Vec<models::Question>, StoreError>;
    /// Get all questions of the given category, sorted by id.
    ///
    /// Returns `Err(StoreError::NotExisting)` if the category does not exist.
    fn get_questions_by_category(
        &mut self,
        category_id: CategoryId,
    ) -> Result<Vec<models::Question>, StoreError>;
    /// Get all questions whose question text contains the search term, case-insensitively
    fn search_questions(&mut self, search_term: &str)
        -> Result<Vec<models::Question>, StoreError>;
    fn create_question(
        &mut self,
        question: models::NewQuestion,
    ) -> Result<models::Question, StoreError>;
    /// Delete a question. Returns the deleted question or `Err(StoreError::NotExisting)`.
    fn delete_question(&mut self, question_id: QuestionId)
        -> Result<models::Question, StoreError>;
    /// Get all questions, which may be asked next in a quiz: Questions of the given category (or
    /// of any category, if `None`), excluding the previously asked questions.
    fn get_quiz_candidates(
        &mut self,
        category_id: Option<CategoryId>,
        previous_questions: &[QuestionId],
    ) -> Result<Vec<models::Question>, StoreError>;
}

/// The drinks menu of the coffee shop
pub trait DrinkStore {
    /// Get all drinks, sorted by id
    fn get_drinks(&mut self) -> Result<Vec<models::Drink>, StoreError>;
    /// Create a new drink.
    ///
    /// Returns `Err(StoreError::ConflictEntityExists)` if a drink with the same title exists.
    fn create_drink(&mut self, drink: models::NewDrink) -> Result<models::Drink, StoreError>;
    /// Update the given fields of a drink and return the updated drink
    fn update_drink(
        &mut self,
        drink_id: DrinkId,
        patch: models::DrinkPatch,
    ) -> Result<models::Drink, StoreError>;
    fn delete_drink(&mut self, drink_id: DrinkId) -> Result<(), StoreError>;
    /// Delete all drinks and store the sample drink ([models::NewDrink::water]) instead
    fn reset_drinks(&mut self) -> Result<(), StoreError>;
}

pub trait TrioStoreFacade: ListingStore + TriviaStore + DrinkStore {}

impl<T: ListingStore + TriviaStore + DrinkStore> TrioStoreFacade for T {}

pub trait TrioStore: Send + Sync {
    fn get_facade<'a>(&'a self) -> Result<Box<dyn TrioStoreFacade + 'a>, StoreError>;
}

#[derive(Debug)]
pub enum StoreError {
    /// Connection the database failed. See string description for details.
    ConnectionError(String),
    /// The query could not be executed because of some error not covered by the other members (see
    /// string description)
    QueryError(diesel::result::Error),
    /// Database transaction could not be commited due to a conflicting concurrent transaction
    TransactionConflict,
    /// The requested entity does not exist
    NotExisting,
    /// The entity could not be created or updated because it conflicts with an existing entity,
    /// e.g. a drink with the same title.
    ConflictEntityExists,
    /// The provided data is invalid, i.e. it does not match the expected ranges or violates a
    /// SQL constraint. See string description for details.
    InvalidInputData(String),
    /// Some data queried from the database could not be deserialized. See string description for
    /// details.
    InvalidDataInDatabase(String),
}

impl From<diesel::result::Error> for StoreError {
    fn from(error: diesel::result::Error) -> Self {
        match error {
            diesel::result::Error::NotFound => Self::NotExisting,
            diesel::result::Error::DatabaseError(
                diesel::result::DatabaseErrorKind::UniqueViolation,
                _,
            ) => Self::ConflictEntityExists,
            diesel::result::Error::DatabaseError(
                diesel::result::DatabaseErrorKind::SerializationFailure,
                _,
            ) => Self::TransactionConflict,
            diesel::result::Error::DatabaseError(
                e @ diesel::result::DatabaseErrorKind::ForeignKeyViolation
                | e @ diesel::result::DatabaseErrorKind::CheckViolation,
                info,
            ) => Self::InvalidInputData(
                info.constraint_name()
                    .and_then(postgres::description_for_postgres_constraint)
                    .map(|d| d.to_owned())
                    .unwrap_or_else(|| format!("{:?}", e)),
            ),
            diesel::result::Error::SerializationError(e) => Self::InvalidInputData(e.to_string()),
            diesel::result::Error::DeserializationError(e) => {
                Self::InvalidDataInDatabase(e.to_string())
            }
            _ => Self::QueryError(error),
        }
    }
}

impl From<r2d2::Error> for StoreError {
    fn from(error: r2d2::Error) -> Self {
        Self::ConnectionError(error.to_string())
    }
}

impl std::fmt::Display for StoreError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ConnectionError(e) => write!(f, "Error connecting to database: {}", e),
            Self::QueryError(e) => write!(f, "Error while executing database query: {}", e),
            Self::TransactionConflict => f.write_str("Database transaction could not be commited due to a conflicting concurrent transaction"),
            Self::NotExisting => f.write_str("Database record does not exist."),
            Self::ConflictEntityExists => f.write_str("Database record exists already."),
            Self::InvalidInputData(e) => {
                write!(f, "Data to be stored in database is not valid: {}", e)
            }
            StoreError::InvalidDataInDatabase(e) => {
                write!(f, "Data queried from database could not be deserialized: {}", e)
            },
        }
    }
}

impl std::error::Error for StoreError {}
