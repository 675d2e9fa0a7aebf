use crate::data_store::{ArtistId, CategoryId, DrinkId, GenreId, QuestionId, VenueId};
use chrono::{DateTime, Utc};
use diesel::deserialize::FromSql;
use diesel::prelude::*;
use diesel::query_builder::bind_collector::RawBytesBindCollector;
use diesel::serialize::ToSql;
use diesel::{AsExpression, FromSqlRow};
use serde::{Deserialize, Serialize};

// Fyyur

/// Maximum number of characters of the venue and artist names, cities, states, addresses, phone
/// numbers, facebook links and websites (VARCHAR columns in the database)
pub const SHORT_TEXT_MAX_CHARS: usize = 120;
pub const IMAGE_LINK_MAX_CHARS: usize = 500;
pub const SEEKING_DESCRIPTION_MAX_CHARS: usize = 1000;

#[derive(Clone, Debug, PartialEq, Queryable, Selectable, Identifiable)]
#[diesel(table_name=super::schema::venues)]
pub struct Venue {
    pub id: VenueId,
    pub name: String,
    pub city: String,
    pub state: String,
    pub address: String,
    pub phone: String,
    pub image_link: String,
    pub facebook_link: String,
    pub website: String,
    pub seeking_talent: bool,
    pub seeking_description: String,
}

/// Venue data for creating or updating a venue. Empty strings represent absent optional fields.
#[derive(Clone, Debug, Default, Insertable, AsChangeset)]
#[diesel(table_name=super::schema::venues)]
pub struct NewVenue {
    pub name: String,
    pub city: String,
    pub state: String,
    pub address: String,
    pub phone: String,
    pub image_link: String,
    pub facebook_link: String,
    pub website: String,
    pub seeking_talent: bool,
    pub seeking_description: String,
}

impl NewVenue {
    pub fn with_id(self, id: VenueId) -> Venue {
        Venue {
            id,
            name: self.name,
            city: self.city,
            state: self.state,
            address: self.address,
            phone: self.phone,
            image_link: self.image_link,
            facebook_link: self.facebook_link,
            website: self.website,
            seeking_talent: self.seeking_talent,
            seeking_description: self.seeking_description,
        }
    }
}

impl From<Venue> for NewVenue {
    fn from(value: Venue) -> Self {
        Self {
            name: value.name,
            city: value.city,
            state: value.state,
            address: value.address,
            phone: value.phone,
            image_link: value.image_link,
            facebook_link: value.facebook_link,
            website: value.website,
            seeking_talent: value.seeking_talent,
            seeking_description: value.seeking_description,
        }
    }
}

#[derive(Clone, Debug)]
pub struct FullNewVenue {
    pub venue: NewVenue,
    pub genre_ids: Vec<GenreId>,
}

/// A venue with its genres (sorted by name) and all its shows (sorted by start time)
#[derive(Clone, Debug)]
pub struct FullVenue {
    pub venue: Venue,
    pub genres: Vec<Genre>,
    pub shows: Vec<VenueShow>,
}

#[derive(Clone, Debug, PartialEq, Queryable)]
pub struct VenueShow {
    pub artist_id: ArtistId,
    pub artist_name: String,
    pub artist_image_link: String,
    pub start_time: DateTime<Utc>,
}

/// Condensed venue data for venue lists and search results
#[derive(Clone, Debug, PartialEq)]
pub struct VenueListEntry {
    pub id: VenueId,
    pub name: String,
    pub city: String,
    pub state: String,
    pub num_upcoming_shows: i64,
}

#[derive(Clone, Debug, PartialEq, Queryable, Selectable, Identifiable)]
#[diesel(table_name=super::schema::artists)]
pub struct Artist {
    pub id: ArtistId,
    pub name: String,
    pub city: String,
    pub state: String,
    pub phone: String,
    pub image_link: String,
    pub facebook_link: String,
    pub website: String,
    pub seeking_venue: bool,
    pub seeking_description: String,
}

/// Artist data for creating or updating an artist. Empty strings represent absent optional fields.
#[derive(Clone, Debug, Default, Insertable, AsChangeset)]
#[diesel(table_name=super::schema::artists)]
pub struct NewArtist {
    pub name: String,
    pub city: String,
    pub state: String,
    pub phone: String,
    pub image_link: String,
    pub facebook_link: String,
    pub website: String,
    pub seeking_venue: bool,
    pub seeking_description: String,
}

impl NewArtist {
    pub fn with_id(self, id: ArtistId) -> Artist {
        Artist {
            id,
            name: self.name,
            city: self.city,
            state: self.state,
            phone: self.phone,
            image_link: self.image_link,
            facebook_link: self.facebook_link,
            website: self.website,
            seeking_venue: self.seeking_venue,
            seeking_description: self.seeking_description,
        }
    }
}

impl From<Artist> for NewArtist {
    fn from(value: Artist) -> Self {
        Self {
            name: value.name,
            city: value.city,
            state: value.state,
            phone: value.phone,
            image_link: value.image_link,
            facebook_link: value.facebook_link,
            website: value.website,
            seeking_venue: value.seeking_venue,
            seeking_description: value.seeking_description,
        }
    }
}

#[derive(Clone, Debug)]
pub struct FullNewArtist {
    pub artist: NewArtist,
    pub genre_ids: Vec<GenreId>,
}

/// An artist with its genres (sorted by name) and all its shows (sorted by start time)
#[derive(Clone, Debug)]
pub struct FullArtist {
    pub artist: Artist,
    pub genres: Vec<Genre>,
    pub shows: Vec<ArtistShow>,
}

#[derive(Clone, Debug, PartialEq, Queryable)]
pub struct ArtistShow {
    pub venue_id: VenueId,
    pub venue_name: String,
    pub venue_image_link: String,
    pub start_time: DateTime<Utc>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct ArtistListEntry {
    pub id: ArtistId,
    pub name: String,
    pub city: String,
    pub state: String,
    pub num_upcoming_shows: i64,
}

#[derive(Clone, Debug, PartialEq, Queryable, Selectable, Identifiable)]
#[diesel(table_name=super::schema::genres)]
pub struct Genre {
    pub id: GenreId,
    pub name: String,
}

#[derive(Clone, Debug, PartialEq, Queryable, Selectable, Insertable)]
#[diesel(table_name=super::schema::shows)]
pub struct Show {
    pub venue_id: VenueId,
    pub artist_id: ArtistId,
    pub start_time: DateTime<Utc>,
}

/// A show together with the names of its venue and artist, as listed on the shows page
#[derive(Clone, Debug, PartialEq, Queryable)]
pub struct ShowListEntry {
    pub venue_id: VenueId,
    pub venue_name: String,
    pub artist_id: ArtistId,
    pub artist_name: String,
    pub artist_image_link: String,
    pub start_time: DateTime<Utc>,
}

// Trivia

#[derive(Clone, Debug, PartialEq, Queryable, Selectable, Identifiable)]
#[diesel(table_name=super::schema::categories)]
pub struct Category {
    pub id: CategoryId,
    pub type_name: String,
}

impl From<Category> for trio_api_types::Category {
    fn from(value: Category) -> Self {
        trio_api_types::Category {
            id: value.id,
            type_name: value.type_name,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Queryable, Selectable, Identifiable)]
#[diesel(table_name=super::schema::questions)]
pub struct Question {
    pub id: QuestionId,
    pub question: String,
    pub answer: String,
    pub category: CategoryId,
    pub difficulty: i32,
}

impl From<Question> for trio_api_types::Question {
    fn from(value: Question) -> Self {
        trio_api_types::Question {
            id: value.id,
            question: value.question,
            answer: value.answer,
            category: value.category,
            difficulty: value.difficulty,
        }
    }
}

#[derive(Clone, Debug, Insertable)]
#[diesel(table_name=super::schema::questions)]
pub struct NewQuestion {
    pub question: String,
    pub answer: String,
    pub category: CategoryId,
    pub difficulty: i32,
}

impl From<trio_api_types::NewQuestion> for NewQuestion {
    fn from(value: trio_api_types::NewQuestion) -> Self {
        Self {
            question: value.question,
            answer: value.answer,
            category: value.category,
            difficulty: value.difficulty,
        }
    }
}

// Coffee shop

#[derive(Clone, Debug, PartialEq, Queryable, Selectable, Identifiable)]
#[diesel(table_name=super::schema::drinks)]
pub struct Drink {
    pub id: DrinkId,
    pub title: String,
    pub recipe: Recipe,
}

impl Drink {
    /// Public representation of the drink, without the ingredient names
    pub fn short(self) -> trio_api_types::DrinkShort {
        trio_api_types::DrinkShort {
            id: self.id,
            title: self.title,
            recipe: self
                .recipe
                .0
                .into_iter()
                .map(|part| trio_api_types::ShortRecipePart {
                    color: part.color,
                    parts: part.parts,
                })
                .collect(),
        }
    }
}

impl From<Drink> for trio_api_types::DrinkLong {
    fn from(value: Drink) -> Self {
        trio_api_types::DrinkLong {
            id: value.id,
            title: value.title,
            recipe: value.recipe.0.into_iter().map(|p| p.into()).collect(),
        }
    }
}

pub const DRINK_TITLE_MAX_CHARS: usize = 80;

#[derive(Clone, Debug, Insertable)]
#[diesel(table_name=super::schema::drinks)]
pub struct NewDrink {
    pub title: String,
    pub recipe: Recipe,
}

impl From<trio_api_types::NewDrink> for NewDrink {
    fn from(value: trio_api_types::NewDrink) -> Self {
        Self {
            title: value.title,
            recipe: Recipe::from_api(value.recipe.into_parts()),
        }
    }
}

impl NewDrink {
    /// The sample drink, which is stored by the drinks reset command
    pub fn water() -> Self {
        Self {
            title: "water".to_owned(),
            recipe: Recipe(vec![RecipePart {
                name: "water".to_owned(),
                color: "blue".to_owned(),
                parts: 1,
            }]),
        }
    }
}

/// Partial update of a drink. `None` fields are left untouched.
#[derive(Clone, Debug, Default, AsChangeset)]
#[diesel(table_name=super::schema::drinks)]
pub struct DrinkPatch {
    pub title: Option<String>,
    pub recipe: Option<Recipe>,
}

impl DrinkPatch {
    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.recipe.is_none()
    }
}

impl From<trio_api_types::DrinkPatch> for DrinkPatch {
    fn from(value: trio_api_types::DrinkPatch) -> Self {
        Self {
            title: value.title,
            recipe: value
                .recipe
                .map(|recipe| Recipe::from_api(recipe.into_parts())),
        }
    }
}

/// The list of recipe parts of a drink, stored as JSON array in the database
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Default, AsExpression, FromSqlRow)]
#[diesel(sql_type = diesel::sql_types::Jsonb)]
#[serde(transparent)]
pub struct Recipe(pub Vec<RecipePart>);

impl Recipe {
    fn from_api(parts: Vec<trio_api_types::RecipePart>) -> Self {
        Self(parts.into_iter().map(|p| p.into()).collect())
    }
}

impl<DB> FromSql<diesel::sql_types::Jsonb, DB> for Recipe
where
    DB: diesel::backend::Backend,
    serde_json::Value: FromSql<diesel::sql_types::Jsonb, DB>,
{
    fn from_sql(bytes: DB::RawValue<'_>) -> diesel::deserialize::Result<Self> {
        let value = serde_json::Value::from_sql(bytes)?;
        Ok(serde_json::from_value(value)?)
    }
}

impl<DB> ToSql<diesel::sql_types::Jsonb, DB> for Recipe
where
    DB: diesel::backend::Backend,
    for<'c> DB: diesel::backend::Backend<BindCollector<'c> = RawBytesBindCollector<DB>>,
    serde_json::Value: ToSql<diesel::sql_types::Jsonb, DB>,
{
    fn to_sql<'b>(
        &'b self,
        out: &mut diesel::serialize::Output<'b, '_, DB>,
    ) -> diesel::serialize::Result {
        let value = serde_json::to_value(self)?;
        value.to_sql(&mut out.reborrow())
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct RecipePart {
    pub name: String,
    pub color: String,
    pub parts: i32,
}

impl From<trio_api_types::RecipePart> for RecipePart {
    fn from(value: trio_api_types::RecipePart) -> Self {
        Self {
            name: value.name,
            color: value.color,
            parts: value.parts,
        }
    }
}

impl From<RecipePart> for trio_api_types::RecipePart {
    fn from(value: RecipePart) -> Self {
        Self {
            name: value.name,
            color: value.color,
            parts: value.parts,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_short_drink_hides_ingredient_names() {
        let drink = Drink {
            id: 3,
            title: "Latte".to_owned(),
            recipe: Recipe(vec![
                RecipePart {
                    name: "espresso".to_owned(),
                    color: "brown".to_owned(),
                    parts: 1,
                },
                RecipePart {
                    name: "milk".to_owned(),
                    color: "white".to_owned(),
                    parts: 3,
                },
            ]),
        };
        let short = drink.short();
        assert_eq!(short.id, 3);
        assert_eq!(
            serde_json::to_value(&short.recipe).unwrap(),
            serde_json::json!([
                {"color": "brown", "parts": 1},
                {"color": "white", "parts": 3},
            ])
        );
    }

    #[test]
    fn test_recipe_is_stored_as_plain_array() {
        let value = serde_json::to_value(NewDrink::water().recipe).unwrap();
        assert_eq!(
            value,
            serde_json::json!([{"name": "water", "color": "blue", "parts": 1}])
        );
    }

    #[test]
    fn test_drinks_migration_seeds_water() {
        let up_sql = include_str!(
            "../../migrations/postgresql/2024-05-03-120000_create_drinks_table/up.sql"
        );
        let insert = up_sql
            .split("INSERT INTO drinks")
            .nth(1)
            .expect("drinks migration should insert the sample drink");
        let literals: Vec<&str> = insert.split('\'').skip(1).step_by(2).collect();
        let water = NewDrink::water();
        assert_eq!(literals[0], water.title);
        let recipe: Recipe = serde_json::from_str(literals[1]).unwrap();
        assert_eq!(recipe, water.recipe);
    }
}
