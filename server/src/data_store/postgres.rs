use super::util::like_pattern;
use super::{
    models, schema, ArtistId, CategoryId, DrinkId, DrinkStore, GenreId, ListingStore, QuestionId,
    StoreError, TrioStore, TrioStoreFacade, TriviaStore, VenueId,
};
use chrono::{DateTime, Utc};
use diesel::pg::PgConnection;
use diesel::prelude::*;
use std::collections::HashMap;

#[derive(Clone)]
pub struct PgDataStore {
    pool: diesel::r2d2::Pool<diesel::r2d2::ConnectionManager<PgConnection>>,
}

impl PgDataStore {
    pub fn new(database_url: &str) -> Result<Self, StoreError> {
        let connection_manager = diesel::r2d2::ConnectionManager::<PgConnection>::new(database_url);
        Ok(Self {
            pool: diesel::r2d2::Pool::builder()
                .test_on_check_out(true)
                .min_idle(Some(2))
                .build(connection_manager)?,
        })
    }
}

impl TrioStore for PgDataStore {
    fn get_facade<'a>(&'a self) -> Result<Box<dyn TrioStoreFacade + 'a>, StoreError> {
        Ok(Box::new(PgDataStoreFacade::with_pooled_connection(
            self.pool.get()?,
        )))
    }
}

pub struct PgDataStoreFacade {
    connection: diesel::r2d2::PooledConnection<diesel::r2d2::ConnectionManager<PgConnection>>,
}

impl PgDataStoreFacade {
    pub fn with_pooled_connection(
        connection: diesel::r2d2::PooledConnection<diesel::r2d2::ConnectionManager<PgConnection>>,
    ) -> Self {
        Self { connection }
    }
}

impl ListingStore for PgDataStoreFacade {
    fn get_genres(&mut self) -> Result<Vec<models::Genre>, StoreError> {
        use schema::genres::dsl::*;

        Ok(genres
            .order_by(name)
            .select(models::Genre::as_select())
            .load::<models::Genre>(&mut self.connection)?)
    }

    fn get_venues(
        &mut self,
        now: DateTime<Utc>,
    ) -> Result<Vec<models::VenueListEntry>, StoreError> {
        use schema::venues::dsl::*;

        self.connection.transaction(|connection| {
            let the_venues = venues
                .order_by((state, city, name, id))
                .select((id, name, city, state))
                .load::<(VenueId, String, String, String)>(connection)?;
            let upcoming_shows = count_upcoming_shows_by_venue(now, connection)?;
            Ok(venue_list_entries(the_venues, &upcoming_shows))
        })
    }

    fn search_venues(
        &mut self,
        search_term: &str,
        now: DateTime<Utc>,
    ) -> Result<Vec<models::VenueListEntry>, StoreError> {
        use schema::venues::dsl::*;

        self.connection.transaction(|connection| {
            let the_venues = venues
                .filter(name.ilike(like_pattern(search_term)))
                .order_by((state, city, name, id))
                .select((id, name, city, state))
                .load::<(VenueId, String, String, String)>(connection)?;
            let upcoming_shows = count_upcoming_shows_by_venue(now, connection)?;
            Ok(venue_list_entries(the_venues, &upcoming_shows))
        })
    }

    fn get_venue(&mut self, venue_id: VenueId) -> Result<models::FullVenue, StoreError> {
        use schema::{artists, genres, shows, venue_genres, venues};

        self.connection.transaction(|connection| {
            let venue = venues::table
                .find(venue_id)
                .select(models::Venue::as_select())
                .first::<models::Venue>(connection)?;

            let the_genres = genres::table
                .inner_join(venue_genres::table)
                .filter(venue_genres::venue_id.eq(venue_id))
                .order_by(genres::name)
                .select(models::Genre::as_select())
                .load::<models::Genre>(connection)?;

            let the_shows = shows::table
                .inner_join(artists::table)
                .filter(shows::venue_id.eq(venue_id))
                .order_by((shows::start_time, artists::name))
                .select((
                    shows::artist_id,
                    artists::name,
                    artists::image_link,
                    shows::start_time,
                ))
                .load::<models::VenueShow>(connection)?;

            Ok(models::FullVenue {
                venue,
                genres: the_genres,
                shows: the_shows,
            })
        })
    }

    fn create_venue(&mut self, venue: models::FullNewVenue) -> Result<VenueId, StoreError> {
        use schema::venues::dsl::*;

        self.connection.transaction(|connection| {
            let venue_id = diesel::insert_into(venues)
                .values(&venue.venue)
                .returning(id)
                .get_result::<VenueId>(connection)?;
            update_venue_genres(venue_id, &venue.genre_ids, connection)?;
            Ok(venue_id)
        })
    }

    fn update_venue(
        &mut self,
        venue_id: VenueId,
        venue: models::FullNewVenue,
    ) -> Result<(), StoreError> {
        use schema::venues::dsl::*;

        self.connection.transaction(|connection| {
            let count = diesel::update(venues)
                .filter(id.eq(venue_id))
                .set(&venue.venue)
                .execute(connection)?;
            if count == 0 {
                return Err(StoreError::NotExisting);
            }
            update_venue_genres(venue_id, &venue.genre_ids, connection)?;
            Ok(())
        })
    }

    fn delete_venue(&mut self, venue_id: VenueId) -> Result<models::Venue, StoreError> {
        use schema::venues::dsl::*;

        // Shows and genre associations are removed by the database (ON DELETE CASCADE)
        Ok(diesel::delete(venues.filter(id.eq(venue_id)))
            .returning(models::Venue::as_returning())
            .get_result::<models::Venue>(&mut self.connection)?)
    }

    fn get_artists(
        &mut self,
        now: DateTime<Utc>,
    ) -> Result<Vec<models::ArtistListEntry>, StoreError> {
        use schema::artists::dsl::*;

        self.connection.transaction(|connection| {
            let the_artists = artists
                .order_by((name, id))
                .select((id, name, city, state))
                .load::<(ArtistId, String, String, String)>(connection)?;
            let upcoming_shows = count_upcoming_shows_by_artist(now, connection)?;
            Ok(artist_list_entries(the_artists, &upcoming_shows))
        })
    }

    fn search_artists(
        &mut self,
        search_term: &str,
        now: DateTime<Utc>,
    ) -> Result<Vec<models::ArtistListEntry>, StoreError> {
        use schema::artists::dsl::*;

        self.connection.transaction(|connection| {
            let the_artists = artists
                .filter(name.ilike(like_pattern(search_term)))
                .order_by((name, id))
                .select((id, name, city, state))
                .load::<(ArtistId, String, String, String)>(connection)?;
            let upcoming_shows = count_upcoming_shows_by_artist(now, connection)?;
            Ok(artist_list_entries(the_artists, &upcoming_shows))
        })
    }

    fn get_artist(&mut self, artist_id: ArtistId) -> Result<models::FullArtist, StoreError> {
        use schema::{artist_genres, artists, genres, shows, venues};

        self.connection.transaction(|connection| {
            let artist = artists::table
                .find(artist_id)
                .select(models::Artist::as_select())
                .first::<models::Artist>(connection)?;

            let the_genres = genres::table
                .inner_join(artist_genres::table)
                .filter(artist_genres::artist_id.eq(artist_id))
                .order_by(genres::name)
                .select(models::Genre::as_select())
                .load::<models::Genre>(connection)?;

            let the_shows = shows::table
                .inner_join(venues::table)
                .filter(shows::artist_id.eq(artist_id))
                .order_by((shows::start_time, venues::name))
                .select((
                    shows::venue_id,
                    venues::name,
                    venues::image_link,
                    shows::start_time,
                ))
                .load::<models::ArtistShow>(connection)?;

            Ok(models::FullArtist {
                artist,
                genres: the_genres,
                shows: the_shows,
            })
        })
    }

    fn create_artist(&mut self, artist: models::FullNewArtist) -> Result<ArtistId, StoreError> {
        use schema::artists::dsl::*;

        self.connection.transaction(|connection| {
            let artist_id = diesel::insert_into(artists)
                .values(&artist.artist)
                .returning(id)
                .get_result::<ArtistId>(connection)?;
            update_artist_genres(artist_id, &artist.genre_ids, connection)?;
            Ok(artist_id)
        })
    }

    fn update_artist(
        &mut self,
        artist_id: ArtistId,
        artist: models::FullNewArtist,
    ) -> Result<(), StoreError> {
        use schema::artists::dsl::*;

        self.connection.transaction(|connection| {
            let count = diesel::update(artists)
                .filter(id.eq(artist_id))
                .set(&artist.artist)
                .execute(connection)?;
            if count == 0 {
                return Err(StoreError::NotExisting);
            }
            update_artist_genres(artist_id, &artist.genre_ids, connection)?;
            Ok(())
        })
    }

    fn delete_artist(&mut self, artist_id: ArtistId) -> Result<models::Artist, StoreError> {
        use schema::artists::dsl::*;

        Ok(diesel::delete(artists.filter(id.eq(artist_id)))
            .returning(models::Artist::as_returning())
            .get_result::<models::Artist>(&mut self.connection)?)
    }

    fn get_shows(&mut self) -> Result<Vec<models::ShowListEntry>, StoreError> {
        use schema::{artists, shows, venues};

        Ok(shows::table
            .inner_join(venues::table)
            .inner_join(artists::table)
            .order_by((shows::start_time, venues::name, artists::name))
            .select((
                shows::venue_id,
                venues::name,
                shows::artist_id,
                artists::name,
                artists::image_link,
                shows::start_time,
            ))
            .load::<models::ShowListEntry>(&mut self.connection)?)
    }

    fn search_shows(
        &mut self,
        search_term: &str,
    ) -> Result<Vec<models::ShowListEntry>, StoreError> {
        use schema::{artists, shows, venues};

        let pattern = like_pattern(search_term);
        Ok(shows::table
            .inner_join(venues::table)
            .inner_join(artists::table)
            .filter(
                artists::name
                    .ilike(pattern.clone())
                    .or(venues::name.ilike(pattern)),
            )
            .order_by((shows::start_time, venues::name, artists::name))
            .select((
                shows::venue_id,
                venues::name,
                shows::artist_id,
                artists::name,
                artists::image_link,
                shows::start_time,
            ))
            .load::<models::ShowListEntry>(&mut self.connection)?)
    }

    fn create_show(&mut self, show: models::Show) -> Result<(), StoreError> {
        use schema::shows::dsl::*;

        diesel::insert_into(shows)
            .values(&show)
            .execute(&mut self.connection)?;
        Ok(())
    }
}

impl TriviaStore for PgDataStoreFacade {
    fn get_categories(&mut self) -> Result<Vec<models::Category>, StoreError> {
        use schema::categories::dsl::*;

        Ok(categories
            .order_by(id)
            .select(models::Category::as_select())
            .load::<models::Category>(&mut self.connection)?)
    }

    fn get_questions(&mut self) -> Result<Vec<models::Question>, StoreError> {
        use schema::questions::dsl::*;

        Ok(questions
            .order_by(id)
            .select(models::Question::as_select())
            .load::<models::Question>(&mut self.connection)?)
    }

    fn get_questions_by_category(
        &mut self,
        category_id: CategoryId,
    ) -> Result<Vec<models::Question>, StoreError> {
        use schema::questions::dsl::*;

        self.connection.transaction(|connection| {
            // Check existence of the category, to distinguish unknown and empty categories
            schema::categories::table
                .find(category_id)
                .select(schema::categories::id)
                .first::<CategoryId>(connection)?;

            Ok(questions
                .filter(category.eq(category_id))
                .order_by(id)
                .select(models::Question::as_select())
                .load::<models::Question>(connection)?)
        })
    }

    fn search_questions(
        &mut self,
        search_term: &str,
    ) -> Result<Vec<models::Question>, StoreError> {
        use schema::questions::dsl::*;

        Ok(questions
            .filter(question.ilike(like_pattern(search_term)))
            .order_by(id)
            .select(models::Question::as_select())
            .load::<models::Question>(&mut self.connection)?)
    }

    fn create_question(
        &mut self,
        new_question: models::NewQuestion,
    ) -> Result<models::Question, StoreError> {
        use schema::questions::dsl::*;

        Ok(diesel::insert_into(questions)
            .values(&new_question)
            .returning(models::Question::as_returning())
            .get_result::<models::Question>(&mut self.connection)?)
    }

    fn delete_question(
        &mut self,
        question_id: QuestionId,
    ) -> Result<models::Question, StoreError> {
        use schema::questions::dsl::*;

        Ok(diesel::delete(questions.filter(id.eq(question_id)))
            .returning(models::Question::as_returning())
            .get_result::<models::Question>(&mut self.connection)?)
    }

    fn get_quiz_candidates(
        &mut self,
        category_id: Option<CategoryId>,
        previous_questions: &[QuestionId],
    ) -> Result<Vec<models::Question>, StoreError> {
        use schema::questions::dsl::*;

        let mut query = questions
            .filter(id.ne_all(previous_questions.to_vec()))
            .select(models::Question::as_select())
            .into_boxed();
        if let Some(category_id) = category_id {
            query = query.filter(category.eq(category_id));
        }
        Ok(query
            .order_by(id)
            .load::<models::Question>(&mut self.connection)?)
    }
}

impl DrinkStore for PgDataStoreFacade {
    fn get_drinks(&mut self) -> Result<Vec<models::Drink>, StoreError> {
        use schema::drinks::dsl::*;

        Ok(drinks
            .order_by(id)
            .select(models::Drink::as_select())
            .load::<models::Drink>(&mut self.connection)?)
    }

    fn create_drink(&mut self, drink: models::NewDrink) -> Result<models::Drink, StoreError> {
        use schema::drinks::dsl::*;

        Ok(diesel::insert_into(drinks)
            .values(&drink)
            .returning(models::Drink::as_returning())
            .get_result::<models::Drink>(&mut self.connection)?)
    }

    fn update_drink(
        &mut self,
        drink_id: DrinkId,
        patch: models::DrinkPatch,
    ) -> Result<models::Drink, StoreError> {
        use schema::drinks::dsl::*;

        // Diesel refuses to build an UPDATE statement without any assignments
        if patch.is_empty() {
            return Ok(drinks
                .filter(id.eq(drink_id))
                .select(models::Drink::as_select())
                .first::<models::Drink>(&mut self.connection)?);
        }
        Ok(diesel::update(drinks)
            .filter(id.eq(drink_id))
            .set(&patch)
            .returning(models::Drink::as_returning())
            .get_result::<models::Drink>(&mut self.connection)?)
    }

    fn delete_drink(&mut self, drink_id: DrinkId) -> Result<(), StoreError> {
        use schema::drinks::dsl::*;

        let count = diesel::delete(drinks.filter(id.eq(drink_id))).execute(&mut self.connection)?;
        if count == 0 {
            return Err(StoreError::NotExisting);
        }
        Ok(())
    }

    fn reset_drinks(&mut self) -> Result<(), StoreError> {
        use schema::drinks::dsl::*;

        self.connection.transaction(|connection| {
            diesel::delete(drinks).execute(connection)?;
            diesel::insert_into(drinks)
                .values(&models::NewDrink::water())
                .execute(connection)?;
            Ok(())
        })
    }
}

fn count_upcoming_shows_by_venue(
    now: DateTime<Utc>,
    connection: &mut PgConnection,
) -> Result<HashMap<VenueId, i64>, diesel::result::Error> {
    use schema::shows::dsl::*;

    Ok(shows
        .filter(start_time.ge(now))
        .group_by(venue_id)
        .select((venue_id, diesel::dsl::count_star()))
        .load::<(VenueId, i64)>(connection)?
        .into_iter()
        .collect())
}

fn count_upcoming_shows_by_artist(
    now: DateTime<Utc>,
    connection: &mut PgConnection,
) -> Result<HashMap<ArtistId, i64>, diesel::result::Error> {
    use schema::shows::dsl::*;

    Ok(shows
        .filter(start_time.ge(now))
        .group_by(artist_id)
        .select((artist_id, diesel::dsl::count_star()))
        .load::<(ArtistId, i64)>(connection)?
        .into_iter()
        .collect())
}

fn venue_list_entries(
    venues: Vec<(VenueId, String, String, String)>,
    upcoming_shows: &HashMap<VenueId, i64>,
) -> Vec<models::VenueListEntry> {
    venues
        .into_iter()
        .map(|(id, name, city, state)| models::VenueListEntry {
            num_upcoming_shows: upcoming_shows.get(&id).copied().unwrap_or(0),
            id,
            name,
            city,
            state,
        })
        .collect()
}

fn artist_list_entries(
    artists: Vec<(ArtistId, String, String, String)>,
    upcoming_shows: &HashMap<ArtistId, i64>,
) -> Vec<models::ArtistListEntry> {
    artists
        .into_iter()
        .map(|(id, name, city, state)| models::ArtistListEntry {
            num_upcoming_shows: upcoming_shows.get(&id).copied().unwrap_or(0),
            id,
            name,
            city,
            state,
        })
        .collect()
}

fn update_venue_genres(
    the_venue_id: VenueId,
    genre_ids: &[GenreId],
    connection: &mut PgConnection,
) -> Result<(), diesel::result::Error> {
    use schema::venue_genres::dsl::*;

    diesel::delete(venue_genres.filter(venue_id.eq(the_venue_id))).execute(connection)?;

    diesel::insert_into(venue_genres)
        .values(
            genre_ids
                .iter()
                .map(|the_genre_id| (venue_id.eq(the_venue_id), genre_id.eq(the_genre_id)))
                .collect::<Vec<_>>(),
        )
        .execute(connection)
        .map(|_| ())
}

fn update_artist_genres(
    the_artist_id: ArtistId,
    genre_ids: &[GenreId],
    connection: &mut PgConnection,
) -> Result<(), diesel::result::Error> {
    use schema::artist_genres::dsl::*;

    diesel::delete(artist_genres.filter(artist_id.eq(the_artist_id))).execute(connection)?;

    diesel::insert_into(artist_genres)
        .values(
            genre_ids
                .iter()
                .map(|the_genre_id| (artist_id.eq(the_artist_id), genre_id.eq(the_genre_id)))
                .collect::<Vec<_>>(),
        )
        .execute(connection)
        .map(|_| ())
}

/// Get a human-readable description of the consistency expectation that is checked by a specific
/// constraint in our Postgres database schema by the constraint's name.
///
/// These are visible to the user when creating entities inconsistently via the JSON APIs or the
/// web forms.
///
/// Returns None, when no human-readable description is present of the given constraint name. This
/// may be the case when we don't expect this constraint to be violated by a user interaction.
pub fn description_for_postgres_constraint(constraint_name: &str) -> Option<&'static str> {
    match constraint_name {
        "artist_genres_genre_id_fkey" => Some("Artist's genres must reference existing genres."),
        "questions_answer_check" => Some("Question's answer must not be empty."),
        "questions_category_fkey" => Some("Question's category must reference an existing category."),
        "questions_difficulty_check" => Some("Question's difficulty must be between 1 and 5."),
        "questions_question_check" => Some("Question's question must not be empty."),
        "shows_artist_id_fkey" => Some("Show's artist must reference an existing artist."),
        "shows_venue_id_fkey" => Some("Show's venue must reference an existing venue."),
        "venue_genres_genre_id_fkey" => Some("Venue's genres must reference existing genres."),
        _ => None,
    }
}
