//! Song search: turns client filters into a SurrealQL predicate and a page of
//! results with pagination metadata.
//!
//! Filters are ANDed. `title` and a scalar `genre` are case-insensitive
//! substring matches, a `genre` array is an exact match against any of its
//! values, and `artist` is resolved through `user.stage_name` first. An
//! artist fragment that matches nobody short-circuits to an empty page.

use surrealdb::{engine::any::Any, method::Query, RecordId, Surreal};

use crate::{
    error::Result,
    models::{
        database_helpers::CountResult,
        pagination::PageRequest,
        song::{SongPage, SongWithArtist},
    },
};

/// Projection shared by every song list: artist populated, no audio URL.
pub const SONG_LIST_FIELDS: &str = "id, title, genre, duration, release_date, cover_image, \
    plays, likes, comments, \
    { id: artist.id, username: artist.username, stage_name: artist.stage_name, avatar: artist.avatar } AS artist";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GenreFilter {
    /// `genre=ro`: case-insensitive substring.
    Partial(String),
    /// `genre=Rock&genre=Pop` or `genre[]=Rock`: exact match on any value.
    AnyOf(Vec<String>),
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SongSearchParams {
    pub title: Option<String>,
    pub artist: Option<String>,
    pub genre: Option<GenreFilter>,
    pub page: PageRequest,
}

impl SongSearchParams {
    /// Builds the params from raw query-string pairs, keeping repeated keys
    /// so that a single `genre` can be told apart from a list of them.
    pub fn from_query_pairs(pairs: &[(String, String)]) -> Self {
        let first = |key: &str| {
            pairs
                .iter()
                .filter(|(k, _)| k == key)
                .map(|(_, v)| v.trim())
                .find(|v| !v.is_empty())
        };

        let mut genres = Vec::new();
        let mut genre_is_array = false;
        for (key, value) in pairs {
            match key.as_str() {
                "genre" => genres.push(value.trim().to_string()),
                "genre[]" => {
                    genre_is_array = true;
                    genres.push(value.trim().to_string());
                }
                _ => {}
            }
        }
        let genre_is_array = genre_is_array || genres.len() > 1;
        genres.retain(|g| !g.is_empty());

        let genre = match (genre_is_array, genres.len()) {
            (_, 0) => None,
            (false, _) => genres.pop().map(GenreFilter::Partial),
            (true, _) => Some(GenreFilter::AnyOf(genres)),
        };

        Self {
            title: first("title").map(str::to_string),
            artist: first("artist").map(str::to_string),
            genre,
            page: PageRequest::parse(first("page"), first("limit")),
        }
    }
}

/// The `WHERE` part of a song query, with its bound values.
#[derive(Debug, Clone, Default)]
pub struct SongPredicate {
    pub title: Option<String>,
    pub artist_ids: Option<Vec<RecordId>>,
    pub genre: Option<GenreFilter>,
}

impl SongPredicate {
    pub fn clauses(&self) -> Vec<&'static str> {
        let mut clauses = Vec::new();

        if self.title.is_some() {
            clauses.push("string::lowercase(title) CONTAINS string::lowercase($title)");
        }
        if self.artist_ids.is_some() {
            clauses.push("artist IN $artist_ids");
        }
        match self.genre {
            Some(GenreFilter::AnyOf(_)) => clauses.push("genre IN $genres"),
            Some(GenreFilter::Partial(_)) => {
                clauses.push("string::lowercase(genre) CONTAINS string::lowercase($genre)")
            }
            None => {}
        }

        clauses
    }

    pub fn where_clause(&self) -> String {
        let clauses = self.clauses();
        if clauses.is_empty() {
            String::new()
        } else {
            format!(" WHERE {}", clauses.join(" AND "))
        }
    }

    pub fn bind<'r>(&self, mut query: Query<'r, Any>) -> Query<'r, Any> {
        if let Some(title) = &self.title {
            query = query.bind(("title", title.clone()));
        }
        if let Some(ids) = &self.artist_ids {
            query = query.bind(("artist_ids", ids.clone()));
        }
        match &self.genre {
            Some(GenreFilter::AnyOf(genres)) => query = query.bind(("genres", genres.clone())),
            Some(GenreFilter::Partial(genre)) => query = query.bind(("genre", genre.clone())),
            None => {}
        }
        query
    }
}

pub struct SongQuery;

impl SongQuery {
    /// Ids of users whose stage name contains `fragment`, ignoring case.
    pub async fn resolve_artist_ids(db: &Surreal<Any>, fragment: &str) -> Result<Vec<RecordId>> {
        let sql = "SELECT VALUE id FROM user
            WHERE type::is::string(stage_name)
            AND string::lowercase(stage_name) CONTAINS string::lowercase($fragment);";

        let mut response = db
            .query(sql)
            .bind(("fragment", fragment.to_string()))
            .await?;
        let ids: Vec<RecordId> = response.take(0)?;
        Ok(ids)
    }

    pub async fn search(db: &Surreal<Any>, params: &SongSearchParams) -> Result<SongPage> {
        let page = params.page;

        let artist_ids = match &params.artist {
            Some(fragment) => {
                let ids = Self::resolve_artist_ids(db, fragment).await?;
                if ids.is_empty() {
                    tracing::debug!(artist = %fragment, "no stage name matches, empty page");
                    return Ok(SongPage {
                        songs: Vec::new(),
                        pagination: page.info(0),
                    });
                }
                Some(ids)
            }
            None => None,
        };

        let predicate = SongPredicate {
            title: params.title.clone(),
            artist_ids,
            genre: params.genre.clone(),
        };

        Self::fetch_page(db, &predicate, page).await
    }

    /// Runs the count and the page query for `predicate`, newest release first.
    pub async fn fetch_page(
        db: &Surreal<Any>,
        predicate: &SongPredicate,
        page: PageRequest,
    ) -> Result<SongPage> {
        let where_clause = predicate.where_clause();
        let sql = format!(
            "SELECT count() AS total FROM song{where_clause} GROUP ALL;
             SELECT {SONG_LIST_FIELDS} FROM song{where_clause}
             ORDER BY release_date DESC
             LIMIT {} START {};",
            page.limit,
            page.skip()
        );

        let mut response = predicate.bind(db.query(sql)).await?;
        let count: Option<CountResult> = response.take(0)?;
        let songs: Vec<SongWithArtist> = response.take(1)?;

        Ok(SongPage {
            songs,
            pagination: page.info(CountResult::total_or_zero(count)),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::music_genre::MusicGenre;
    use crate::db::test_db;
    use crate::test_utils::{seed_artist, seed_song, seed_user, SongSeed};

    fn pairs(raw: &[(&str, &str)]) -> Vec<(String, String)> {
        raw.iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_single_genre_is_partial() {
        let params = SongSearchParams::from_query_pairs(&pairs(&[("genre", "ro")]));
        assert_eq!(params.genre, Some(GenreFilter::Partial("ro".into())));
    }

    #[test]
    fn test_repeated_or_bracketed_genre_is_any_of() {
        let params =
            SongSearchParams::from_query_pairs(&pairs(&[("genre", "Rock"), ("genre", "Pop")]));
        assert_eq!(
            params.genre,
            Some(GenreFilter::AnyOf(vec!["Rock".into(), "Pop".into()]))
        );

        let params = SongSearchParams::from_query_pairs(&pairs(&[("genre[]", "Jazz")]));
        assert_eq!(params.genre, Some(GenreFilter::AnyOf(vec!["Jazz".into()])));
    }

    #[test]
    fn test_blank_filters_are_ignored() {
        let params = SongSearchParams::from_query_pairs(&pairs(&[
            ("title", "  "),
            ("artist", ""),
            ("genre", ""),
            ("page", "2"),
            ("limit", "5"),
        ]));
        assert_eq!(params.title, None);
        assert_eq!(params.artist, None);
        assert_eq!(params.genre, None);
        assert_eq!(params.page, PageRequest { page: 2, limit: 5 });
    }

    #[test]
    fn test_where_clause_ands_present_filters() {
        assert_eq!(SongPredicate::default().where_clause(), "");

        let predicate = SongPredicate {
            title: Some("love".into()),
            artist_ids: None,
            genre: Some(GenreFilter::AnyOf(vec!["Pop".into()])),
        };
        assert_eq!(
            predicate.where_clause(),
            " WHERE string::lowercase(title) CONTAINS string::lowercase($title) AND genre IN $genres"
        );
    }

    #[tokio::test]
    async fn test_pagination_over_twenty_five_songs() {
        let db = test_db().await;
        let artist = seed_artist(&db, "dj", "DJ Test").await;
        for i in 0..25 {
            seed_song(&db, SongSeed::new(&artist, &format!("Track {i:02}")).released_days_ago(i)).await;
        }

        let params = SongSearchParams {
            page: PageRequest { page: 3, limit: 10 },
            ..Default::default()
        };
        let page = SongQuery::search(&db, &params).await.unwrap();

        assert_eq!(page.songs.len(), 5);
        assert_eq!(page.pagination.total_items, 25);
        assert_eq!(page.pagination.total_pages, 3);
        assert!(!page.pagination.has_next);
        assert!(page.pagination.has_prev);
        // Newest first, so the last page holds the five oldest releases.
        let titles: Vec<_> = page.songs.iter().map(|s| s.title.as_str()).collect();
        assert_eq!(titles, ["Track 20", "Track 21", "Track 22", "Track 23", "Track 24"]);
    }

    #[tokio::test]
    async fn test_page_far_past_the_end_is_empty() {
        let db = test_db().await;
        let artist = seed_artist(&db, "dj", "DJ Test").await;
        seed_song(&db, SongSeed::new(&artist, "Only Track")).await;

        let params = SongSearchParams::from_query_pairs(&pairs(&[
            ("page", "4294967295"),
            ("limit", "4294967295"),
        ]));
        let page = SongQuery::search(&db, &params).await.unwrap();

        assert!(page.songs.is_empty());
        assert_eq!(page.pagination.total_items, 1);
        assert_eq!(page.pagination.limit, 100);
        assert!(!page.pagination.has_next);
        assert!(page.pagination.has_prev);
    }

    #[tokio::test]
    async fn test_unknown_artist_short_circuits_to_empty_page() {
        let db = test_db().await;
        let artist = seed_artist(&db, "singer", "Nightingale").await;
        seed_song(&db, SongSeed::new(&artist, "Morning Song")).await;

        let params = SongSearchParams {
            title: Some("Morning".into()),
            artist: Some("nobody-has-this-name".into()),
            genre: Some(GenreFilter::Partial("pop".into())),
            page: PageRequest::default(),
        };
        let page = SongQuery::search(&db, &params).await.unwrap();

        assert!(page.songs.is_empty());
        assert_eq!(page.pagination.total_items, 0);
        assert_eq!(page.pagination.total_pages, 0);
        assert!(!page.pagination.has_next);
    }

    #[tokio::test]
    async fn test_artist_fragment_matches_stage_name_not_username() {
        let db = test_db().await;
        let nightingale = seed_artist(&db, "bird_user", "Nightingale").await;
        let other = seed_artist(&db, "nightowl", "Owl").await;
        let _listener = seed_user(&db, "gale_listener").await;
        seed_song(&db, SongSeed::new(&nightingale, "Song A")).await;
        seed_song(&db, SongSeed::new(&other, "Song B")).await;

        let params = SongSearchParams {
            artist: Some("GALE".into()),
            ..Default::default()
        };
        let page = SongQuery::search(&db, &params).await.unwrap();

        assert_eq!(page.songs.len(), 1);
        assert_eq!(page.songs[0].title, "Song A");
        assert_eq!(page.songs[0].artist.stage_name.as_deref(), Some("Nightingale"));
        assert_eq!(page.songs[0].artist.username, "bird_user");
    }

    #[tokio::test]
    async fn test_title_and_genre_are_anded() {
        let db = test_db().await;
        let artist = seed_artist(&db, "band", "The Band").await;
        seed_song(&db, SongSeed::new(&artist, "Love Rocks").genre(MusicGenre::Rock)).await;
        seed_song(&db, SongSeed::new(&artist, "Love Pops").genre(MusicGenre::Pop)).await;
        seed_song(&db, SongSeed::new(&artist, "Hate Rocks").genre(MusicGenre::Rock)).await;

        let params = SongSearchParams {
            title: Some("love".into()),
            genre: Some(GenreFilter::Partial("ROCK".into())),
            ..Default::default()
        };
        let page = SongQuery::search(&db, &params).await.unwrap();

        assert_eq!(page.pagination.total_items, 1);
        assert_eq!(page.songs[0].title, "Love Rocks");
    }

    #[tokio::test]
    async fn test_genre_list_is_exact_match_any() {
        let db = test_db().await;
        let artist = seed_artist(&db, "band", "The Band").await;
        seed_song(&db, SongSeed::new(&artist, "One").genre(MusicGenre::Rock)).await;
        seed_song(&db, SongSeed::new(&artist, "Two").genre(MusicGenre::Pop)).await;
        seed_song(&db, SongSeed::new(&artist, "Three").genre(MusicGenre::Jazz)).await;

        let params = SongSearchParams {
            genre: Some(GenreFilter::AnyOf(vec!["Rock".into(), "Jazz".into()])),
            ..Default::default()
        };
        let page = SongQuery::search(&db, &params).await.unwrap();
        assert_eq!(page.pagination.total_items, 2);

        // Exact match: a fragment inside a list matches nothing.
        let params = SongSearchParams {
            genre: Some(GenreFilter::AnyOf(vec!["roc".into()])),
            ..Default::default()
        };
        let page = SongQuery::search(&db, &params).await.unwrap();
        assert_eq!(page.pagination.total_items, 0);
    }

    #[tokio::test]
    async fn test_title_input_is_not_a_pattern() {
        let db = test_db().await;
        let artist = seed_artist(&db, "band", "The Band").await;
        seed_song(&db, SongSeed::new(&artist, "What? (Live)")).await;
        seed_song(&db, SongSeed::new(&artist, "Whatever")).await;

        let params = SongSearchParams {
            title: Some("? (live".into()),
            ..Default::default()
        };
        let page = SongQuery::search(&db, &params).await.unwrap();
        assert_eq!(page.songs.len(), 1);
        assert_eq!(page.songs[0].title, "What? (Live)");
    }
}
