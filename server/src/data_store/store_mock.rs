use crate::data_store::models::{
    Artist, ArtistListEntry, ArtistShow, Category, Drink, DrinkPatch, FullArtist, FullNewArtist,
    FullNewVenue, FullVenue, Genre, NewDrink, NewQuestion, Question, Show, ShowListEntry, Venue,
    VenueListEntry, VenueShow,
};
use crate::data_store::util::contains_ignore_case;
use crate::data_store::{
    ArtistId, CategoryId, DrinkId, DrinkStore, GenreId, ListingStore, QuestionId, StoreError,
    TrioStore, TrioStoreFacade, TriviaStore, VenueId,
};
use chrono::{DateTime, Utc};
use std::sync::{Mutex, MutexGuard};

/**
 * A mock [TrioStore] implementation for testing.
 *
 * The simulated database consists of the [StoreMockData] structure with vectors of entities. These
 * can be directly modified by the tests.
 *
 * The mock checks entity existence and emulates the unique and foreign key constraints of the
 * database schema. In addition, the [StoreMockData.next_error] attribute can be set to simulate a
 * database error.
 */
#[derive(Default)]
pub struct StoreMock {
    pub data: Mutex<StoreMockData>,
}

impl TrioStore for StoreMock {
    fn get_facade<'a>(&'a self) -> Result<Box<dyn TrioStoreFacade + 'a>, StoreError> {
        Ok(Box::new(StoreMockFacade { store: self }))
    }
}

#[derive(Default)]
pub struct StoreMockData {
    pub genres: Vec<Genre>,
    pub venues: Vec<Venue>,
    pub venue_genres: Vec<(VenueId, GenreId)>,
    pub artists: Vec<Artist>,
    pub artist_genres: Vec<(ArtistId, GenreId)>,
    pub shows: Vec<Show>,
    pub categories: Vec<Category>,
    pub questions: Vec<Question>,
    pub drinks: Vec<Drink>,
    /// If not none, the next call to a store facade method will return this error.
    pub next_error: Option<StoreError>,
}

impl StoreMockData {
    fn upcoming_shows_of_venue(&self, venue_id: VenueId, now: DateTime<Utc>) -> i64 {
        self.shows
            .iter()
            .filter(|s| s.venue_id == venue_id && s.start_time >= now)
            .count() as i64
    }

    fn upcoming_shows_of_artist(&self, artist_id: ArtistId, now: DateTime<Utc>) -> i64 {
        self.shows
            .iter()
            .filter(|s| s.artist_id == artist_id && s.start_time >= now)
            .count() as i64
    }

    fn venue_list(&self, search_term: Option<&str>, now: DateTime<Utc>) -> Vec<VenueListEntry> {
        let mut result: Vec<VenueListEntry> = self
            .venues
            .iter()
            .filter(|v| search_term.is_none_or(|term| contains_ignore_case(&v.name, term)))
            .map(|v| VenueListEntry {
                id: v.id,
                name: v.name.clone(),
                city: v.city.clone(),
                state: v.state.clone(),
                num_upcoming_shows: self.upcoming_shows_of_venue(v.id, now),
            })
            .collect();
        result.sort_by(|a, b| {
            (&a.state, &a.city, &a.name, a.id).cmp(&(&b.state, &b.city, &b.name, b.id))
        });
        result
    }

    fn artist_list(&self, search_term: Option<&str>, now: DateTime<Utc>) -> Vec<ArtistListEntry> {
        let mut result: Vec<ArtistListEntry> = self
            .artists
            .iter()
            .filter(|a| search_term.is_none_or(|term| contains_ignore_case(&a.name, term)))
            .map(|a| ArtistListEntry {
                id: a.id,
                name: a.name.clone(),
                city: a.city.clone(),
                state: a.state.clone(),
                num_upcoming_shows: self.upcoming_shows_of_artist(a.id, now),
            })
            .collect();
        result.sort_by(|a, b| (&a.name, a.id).cmp(&(&b.name, b.id)));
        result
    }

    fn genres_by_ids<'b>(&self, genre_ids: impl Iterator<Item = &'b GenreId>) -> Vec<Genre> {
        let genre_ids: Vec<GenreId> = genre_ids.copied().collect();
        let mut result: Vec<Genre> = self
            .genres
            .iter()
            .filter(|g| genre_ids.contains(&g.id))
            .cloned()
            .collect();
        result.sort_by(|a, b| a.name.cmp(&b.name));
        result
    }

    fn check_genres_exist(&self, genre_ids: &[GenreId]) -> Result<(), StoreError> {
        if genre_ids
            .iter()
            .all(|id| self.genres.iter().any(|g| g.id == *id))
        {
            Ok(())
        } else {
            Err(StoreError::InvalidInputData(
                "Genres must reference existing genres.".to_owned(),
            ))
        }
    }

    fn show_list(&self, filter: impl Fn(&Venue, &Artist) -> bool) -> Vec<ShowListEntry> {
        let mut result: Vec<ShowListEntry> = self
            .shows
            .iter()
            .filter_map(|s| {
                let venue = self.venues.iter().find(|v| v.id == s.venue_id)?;
                let artist = self.artists.iter().find(|a| a.id == s.artist_id)?;
                filter(venue, artist).then(|| ShowListEntry {
                    venue_id: venue.id,
                    venue_name: venue.name.clone(),
                    artist_id: artist.id,
                    artist_name: artist.name.clone(),
                    artist_image_link: artist.image_link.clone(),
                    start_time: s.start_time,
                })
            })
            .collect();
        result.sort_by_key(|s| s.start_time);
        result
    }
}

fn next_id<T>(entities: &[T], id: impl Fn(&T) -> i32) -> i32 {
    entities.iter().map(id).max().unwrap_or(0) + 1
}

struct StoreMockFacade<'a> {
    store: &'a StoreMock,
}

impl<'a> StoreMockFacade<'a> {
    /// Lock the mock data or return the simulated error, if present
    fn data(&self) -> Result<MutexGuard<'a, StoreMockData>, StoreError> {
        let mut data = self.store.data.lock().expect("Error while locking mutex.");
        if let Some(e) = data.next_error.take() {
            return Err(e);
        }
        Ok(data)
    }
}

impl ListingStore for StoreMockFacade<'_> {
    fn get_genres(&mut self) -> Result<Vec<Genre>, StoreError> {
        let data = self.data()?;
        let mut result = data.genres.clone();
        result.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(result)
    }

    fn get_venues(&mut self, now: DateTime<Utc>) -> Result<Vec<VenueListEntry>, StoreError> {
        Ok(self.data()?.venue_list(None, now))
    }

    fn search_venues(
        &mut self,
        search_term: &str,
        now: DateTime<Utc>,
    ) -> Result<Vec<VenueListEntry>, StoreError> {
        Ok(self.data()?.venue_list(Some(search_term), now))
    }

    fn get_venue(&mut self, venue_id: VenueId) -> Result<FullVenue, StoreError> {
        let data = self.data()?;
        let venue = data
            .venues
            .iter()
            .find(|v| v.id == venue_id)
            .cloned()
            .ok_or(StoreError::NotExisting)?;
        let genres = data.genres_by_ids(
            data.venue_genres
                .iter()
                .filter(|(v, _)| *v == venue_id)
                .map(|(_, g)| g),
        );
        let mut shows: Vec<VenueShow> = data
            .shows
            .iter()
            .filter(|s| s.venue_id == venue_id)
            .filter_map(|s| {
                let artist = data.artists.iter().find(|a| a.id == s.artist_id)?;
                Some(VenueShow {
                    artist_id: artist.id,
                    artist_name: artist.name.clone(),
                    artist_image_link: artist.image_link.clone(),
                    start_time: s.start_time,
                })
            })
            .collect();
        shows.sort_by_key(|s| s.start_time);
        Ok(FullVenue {
            venue,
            genres,
            shows,
        })
    }

    fn create_venue(&mut self, venue: FullNewVenue) -> Result<VenueId, StoreError> {
        let mut data = self.data()?;
        data.check_genres_exist(&venue.genre_ids)?;
        let venue_id = next_id(&data.venues, |v| v.id);
        data.venues.push(venue.venue.with_id(venue_id));
        data.venue_genres
            .extend(venue.genre_ids.into_iter().map(|g| (venue_id, g)));
        Ok(venue_id)
    }

    fn update_venue(&mut self, venue_id: VenueId, venue: FullNewVenue) -> Result<(), StoreError> {
        let mut data = self.data()?;
        data.check_genres_exist(&venue.genre_ids)?;
        let existing_venue = data
            .venues
            .iter_mut()
            .find(|v| v.id == venue_id)
            .ok_or(StoreError::NotExisting)?;
        *existing_venue = venue.venue.with_id(venue_id);
        data.venue_genres.retain(|(v, _)| *v != venue_id);
        data.venue_genres
            .extend(venue.genre_ids.into_iter().map(|g| (venue_id, g)));
        Ok(())
    }

    fn delete_venue(&mut self, venue_id: VenueId) -> Result<Venue, StoreError> {
        let mut data = self.data()?;
        let position = data
            .venues
            .iter()
            .position(|v| v.id == venue_id)
            .ok_or(StoreError::NotExisting)?;
        data.venue_genres.retain(|(v, _)| *v != venue_id);
        data.shows.retain(|s| s.venue_id != venue_id);
        Ok(data.venues.remove(position))
    }

    fn get_artists(&mut self, now: DateTime<Utc>) -> Result<Vec<ArtistListEntry>, StoreError> {
        Ok(self.data()?.artist_list(None, now))
    }

    fn search_artists(
        &mut self,
        search_term: &str,
        now: DateTime<Utc>,
    ) -> Result<Vec<ArtistListEntry>, StoreError> {
        Ok(self.data()?.artist_list(Some(search_term), now))
    }

    fn get_artist(&mut self, artist_id: ArtistId) -> Result<FullArtist, StoreError> {
        let data = self.data()?;
        let artist = data
            .artists
            .iter()
            .find(|a| a.id == artist_id)
            .cloned()
            .ok_or(StoreError::NotExisting)?;
        let genres = data.genres_by_ids(
            data.artist_genres
                .iter()
                .filter(|(a, _)| *a == artist_id)
                .map(|(_, g)| g),
        );
        let mut shows: Vec<ArtistShow> = data
            .shows
            .iter()
            .filter(|s| s.artist_id == artist_id)
            .filter_map(|s| {
                let venue = data.venues.iter().find(|v| v.id == s.venue_id)?;
                Some(ArtistShow {
                    venue_id: venue.id,
                    venue_name: venue.name.clone(),
                    venue_image_link: venue.image_link.clone(),
                    start_time: s.start_time,
                })
            })
            .collect();
        shows.sort_by_key(|s| s.start_time);
        Ok(FullArtist {
            artist,
            genres,
            shows,
        })
    }

    fn create_artist(&mut self, artist: FullNewArtist) -> Result<ArtistId, StoreError> {
        let mut data = self.data()?;
        data.check_genres_exist(&artist.genre_ids)?;
        let artist_id = next_id(&data.artists, |a| a.id);
        data.artists.push(artist.artist.with_id(artist_id));
        data.artist_genres
            .extend(artist.genre_ids.into_iter().map(|g| (artist_id, g)));
        Ok(artist_id)
    }

    fn update_artist(
        &mut self,
        artist_id: ArtistId,
        artist: FullNewArtist,
    ) -> Result<(), StoreError> {
        let mut data = self.data()?;
        data.check_genres_exist(&artist.genre_ids)?;
        let existing_artist = data
            .artists
            .iter_mut()
            .find(|a| a.id == artist_id)
            .ok_or(StoreError::NotExisting)?;
        *existing_artist = artist.artist.with_id(artist_id);
        data.artist_genres.retain(|(a, _)| *a != artist_id);
        data.artist_genres
            .extend(artist.genre_ids.into_iter().map(|g| (artist_id, g)));
        Ok(())
    }

    fn delete_artist(&mut self, artist_id: ArtistId) -> Result<Artist, StoreError> {
        let mut data = self.data()?;
        let position = data
            .artists
            .iter()
            .position(|a| a.id == artist_id)
            .ok_or(StoreError::NotExisting)?;
        data.artist_genres.retain(|(a, _)| *a != artist_id);
        data.shows.retain(|s| s.artist_id != artist_id);
        Ok(data.artists.remove(position))
    }

    fn get_shows(&mut self) -> Result<Vec<ShowListEntry>, StoreError> {
        Ok(self.data()?.show_list(|_, _| true))
    }

    fn search_shows(&mut self, search_term: &str) -> Result<Vec<ShowListEntry>, StoreError> {
        Ok(self.data()?.show_list(|venue, artist| {
            contains_ignore_case(&venue.name, search_term)
                || contains_ignore_case(&artist.name, search_term)
        }))
    }

    fn create_show(&mut self, show: Show) -> Result<(), StoreError> {
        let mut data = self.data()?;
        if !data.venues.iter().any(|v| v.id == show.venue_id) {
            return Err(StoreError::InvalidInputData(
                "Show's venue must reference an existing venue.".to_owned(),
            ));
        }
        if !data.artists.iter().any(|a| a.id == show.artist_id) {
            return Err(StoreError::InvalidInputData(
                "Show's artist must reference an existing artist.".to_owned(),
            ));
        }
        if data.shows.contains(&show) {
            return Err(StoreError::ConflictEntityExists);
        }
        data.shows.push(show);
        Ok(())
    }
}

impl TriviaStore for StoreMockFacade<'_> {
    fn get_categories(&mut self) -> Result<Vec<Category>, StoreError> {
        let data = self.data()?;
        let mut result = data.categories.clone();
        result.sort_by_key(|c| c.id);
        Ok(result)
    }

    fn get_questions(&mut self) -> Result<Vec<Question>, StoreError> {
        let data = self.data()?;
        let mut result = data.questions.clone();
        result.sort_by_key(|q| q.id);
        Ok(result)
    }

    fn get_questions_by_category(
        &mut self,
        category_id: CategoryId,
    ) -> Result<Vec<Question>, StoreError> {
        let data = self.data()?;
        if !data.categories.iter().any(|c| c.id == category_id) {
            return Err(StoreError::NotExisting);
        }
        let mut result: Vec<Question> = data
            .questions
            .iter()
            .filter(|q| q.category == category_id)
            .cloned()
            .collect();
        result.sort_by_key(|q| q.id);
        Ok(result)
    }

    fn search_questions(&mut self, search_term: &str) -> Result<Vec<Question>, StoreError> {
        let data = self.data()?;
        let mut result: Vec<Question> = data
            .questions
            .iter()
            .filter(|q| contains_ignore_case(&q.question, search_term))
            .cloned()
            .collect();
        result.sort_by_key(|q| q.id);
        Ok(result)
    }

    fn create_question(&mut self, question: NewQuestion) -> Result<Question, StoreError> {
        let mut data = self.data()?;
        if !data.categories.iter().any(|c| c.id == question.category) {
            return Err(StoreError::InvalidInputData(
                "Question's category must reference an existing category.".to_owned(),
            ));
        }
        let question = Question {
            id: next_id(&data.questions, |q| q.id),
            question: question.question,
            answer: question.answer,
            category: question.category,
            difficulty: question.difficulty,
        };
        data.questions.push(question.clone());
        Ok(question)
    }

    fn delete_question(&mut self, question_id: QuestionId) -> Result<Question, StoreError> {
        let mut data = self.data()?;
        let position = data
            .questions
            .iter()
            .position(|q| q.id == question_id)
            .ok_or(StoreError::NotExisting)?;
        Ok(data.questions.remove(position))
    }

    fn get_quiz_candidates(
        &mut self,
        category_id: Option<CategoryId>,
        previous_questions: &[QuestionId],
    ) -> Result<Vec<Question>, StoreError> {
        let data = self.data()?;
        Ok(data
            .questions
            .iter()
            .filter(|q| category_id.is_none_or(|c| q.category == c))
            .filter(|q| !previous_questions.contains(&q.id))
            .cloned()
            .collect())
    }
}

impl DrinkStore for StoreMockFacade<'_> {
    fn get_drinks(&mut self) -> Result<Vec<Drink>, StoreError> {
        let data = self.data()?;
        let mut result = data.drinks.clone();
        result.sort_by_key(|d| d.id);
        Ok(result)
    }

    fn create_drink(&mut self, drink: NewDrink) -> Result<Drink, StoreError> {
        let mut data = self.data()?;
        if data.drinks.iter().any(|d| d.title == drink.title) {
            return Err(StoreError::ConflictEntityExists);
        }
        let drink = Drink {
            id: next_id(&data.drinks, |d| d.id),
            title: drink.title,
            recipe: drink.recipe,
        };
        data.drinks.push(drink.clone());
        Ok(drink)
    }

    fn update_drink(&mut self, drink_id: DrinkId, patch: DrinkPatch) -> Result<Drink, StoreError> {
        let mut data = self.data()?;
        if let Some(title) = &patch.title {
            if data
                .drinks
                .iter()
                .any(|d| d.id != drink_id && d.title == *title)
            {
                return Err(StoreError::ConflictEntityExists);
            }
        }
        let drink = data
            .drinks
            .iter_mut()
            .find(|d| d.id == drink_id)
            .ok_or(StoreError::NotExisting)?;
        if let Some(title) = patch.title {
            drink.title = title;
        }
        if let Some(recipe) = patch.recipe {
            drink.recipe = recipe;
        }
        Ok(drink.clone())
    }

    fn delete_drink(&mut self, drink_id: DrinkId) -> Result<(), StoreError> {
        let mut data = self.data()?;
        let count_before = data.drinks.len();
        data.drinks.retain(|d| d.id != drink_id);
        if data.drinks.len() == count_before {
            return Err(StoreError::NotExisting);
        }
        Ok(())
    }

    fn reset_drinks(&mut self) -> Result<(), StoreError> {
        let mut data = self.data()?;
        let water = NewDrink::water();
        data.drinks = vec![Drink {
            id: 1,
            title: water.title,
            recipe: water.recipe,
        }];
        Ok(())
    }
}
