use chrono::Utc;
use serde::Deserialize;
use surrealdb::{engine::any::Any, RecordId, Surreal};

use crate::{
    error::{Error, Result},
    helpers::{
        record_helpers::{create_song_id, create_user_id, record_key, SONG_TABLE},
        song_helpers::ensure_can_manage,
    },
    models::{
        pagination::PageRequest,
        song::{NewComment, NewSong, Song, SongPage, SongWithArtist, UpdateSongRequest},
        user::UserRecord,
    },
    services::{
        song_query::{SongPredicate, SongQuery, SongSearchParams, SONG_LIST_FIELDS},
        storage_service::{ObjectStorage, StorageService},
    },
    validators::song_form::{CreateSongForm, MAX_TITLE_LEN},
};

pub const TRENDING_LIMIT: usize = 10;
pub const MAX_COMMENT_LEN: usize = 1000;

const AUDIO_FOLDER: &str = "songs/audio";
const COVER_FOLDER: &str = "songs/covers";

pub struct SongService;

impl SongService {
    pub async fn search(db: &Surreal<Any>, params: &SongSearchParams) -> Result<SongPage> {
        SongQuery::search(db, params).await
    }

    pub async fn list_songs(db: &Surreal<Any>, page: PageRequest) -> Result<SongPage> {
        SongQuery::fetch_page(db, &SongPredicate::default(), page).await
    }

    pub async fn list_artist_songs(
        db: &Surreal<Any>,
        artist_id: &str,
        page: PageRequest,
    ) -> Result<SongPage> {
        let predicate = SongPredicate {
            artist_ids: Some(vec![create_user_id(artist_id)]),
            ..Default::default()
        };
        SongQuery::fetch_page(db, &predicate, page).await
    }

    /// Top songs by like count, most recent first among equals. No time window.
    pub async fn get_trending(db: &Surreal<Any>) -> Result<Vec<SongWithArtist>> {
        let sql = format!(
            "SELECT id, title, genre, duration, release_date, cover_image, plays, likes, comments,
                created_at,
                array::len(likes) AS like_count,
                {{ id: artist.id, username: artist.username }} AS artist
            FROM song
            ORDER BY like_count DESC, created_at DESC
            LIMIT {TRENDING_LIMIT};"
        );

        let mut response = db.query(sql).await?;
        let songs: Vec<SongWithArtist> = response.take(0)?;
        Ok(songs)
    }

    /// Genres actually used by at least one song.
    pub async fn get_genres(db: &Surreal<Any>) -> Result<Vec<String>> {
        #[derive(Deserialize)]
        struct GenreRow {
            genre: String,
        }

        let mut response = db.query("SELECT genre FROM song GROUP BY genre;").await?;
        let rows: Vec<GenreRow> = response.take(0)?;
        Ok(rows.into_iter().map(|r| r.genre).collect())
    }

    pub async fn get_song(db: &Surreal<Any>, song_id: &str) -> Result<Song> {
        let song: Option<Song> = db
            .query("SELECT * FROM $song;")
            .bind(("song", create_song_id(song_id)))
            .await?
            .take(0)?;

        song.ok_or_else(|| Error::SongNotFound {
            id: song_id.to_string(),
        })
    }

    async fn get_song_with_artist(db: &Surreal<Any>, song: RecordId) -> Result<SongWithArtist> {
        let key = record_key(&song);
        let sql =
            format!("SELECT {SONG_LIST_FIELDS}, audio_url, album, lyrics, created_at FROM $song;");
        let result: Option<SongWithArtist> = db.query(sql).bind(("song", song)).await?.take(0)?;

        result.ok_or(Error::SongNotFound { id: key })
    }

    /// Song detail. Every fetch counts as a play; the increment is a single
    /// atomic update.
    pub async fn play_song(db: &Surreal<Any>, song_id: &str) -> Result<SongWithArtist> {
        let song = create_song_id(song_id);

        db.query("UPDATE $song SET plays += 1 RETURN NONE;")
            .bind(("song", song.clone()))
            .await?
            .check()?;

        Self::get_song_with_artist(db, song).await
    }

    /// Adds the user to the song's likes, or removes them if already there.
    /// Both branches run inside one `UPDATE`, so concurrent toggles cannot
    /// lose each other's writes.
    pub async fn toggle_like(
        db: &Surreal<Any>,
        song_id: &str,
        user: &RecordId,
    ) -> Result<SongWithArtist> {
        let song = create_song_id(song_id);
        let sql = "UPDATE $song SET likes = IF likes CONTAINS $user
                THEN array::complement(likes, [$user])
                ELSE array::union(likes, [$user])
            END RETURN NONE;";

        db.query(sql)
            .bind(("song", song.clone()))
            .bind(("user", user.clone()))
            .await?
            .check()?;

        Self::get_song_with_artist(db, song).await
    }

    pub async fn add_comment(
        db: &Surreal<Any>,
        song_id: &str,
        user: &RecordId,
        text: &str,
    ) -> Result<SongWithArtist> {
        let text = text.trim();
        if text.is_empty() {
            return Err(Error::InvalidInput {
                reason: "Comment text is required".to_string(),
            });
        }
        if text.chars().count() > MAX_COMMENT_LEN {
            return Err(Error::InvalidInput {
                reason: format!("Comment must be at most {MAX_COMMENT_LEN} characters"),
            });
        }

        // Existence first: appending to a missing record would be a silent no-op.
        let song = Self::get_song(db, song_id).await?;

        let comment = NewComment {
            user: user.clone(),
            text: text.to_string(),
            created_at: Utc::now().into(),
        };
        db.query("UPDATE $song SET comments += $comment RETURN NONE;")
            .bind(("song", song.id.clone()))
            .bind(("comment", comment))
            .await?
            .check()?;

        Self::get_song_with_artist(db, song.id).await
    }

    /// Stores both files, then the record. Anything stored before a failure
    /// is deleted again.
    pub async fn create_song(
        db: &Surreal<Any>,
        storage: &dyn ObjectStorage,
        artist: &UserRecord,
        form: CreateSongForm,
    ) -> Result<SongWithArtist> {
        let uploads = StorageService::upload_all(
            storage,
            &[
                (AUDIO_FOLDER, &form.audio_file),
                (COVER_FOLDER, &form.cover_image),
            ],
        )
        .await?;
        let (audio, cover) = (&uploads[0], &uploads[1]);

        let now = Utc::now();
        let new_song = NewSong {
            title: form.title,
            artist: artist.id.clone(),
            genre: form.genre,
            album: form.album,
            duration: form.duration,
            audio_url: audio.url.clone(),
            cover_image: cover.url.clone(),
            lyrics: form.lyrics,
            release_date: form.release_date.unwrap_or(now).into(),
            plays: 0,
            likes: Vec::new(),
            comments: Vec::new(),
            created_at: now.into(),
            updated_at: now.into(),
        };

        let created: Result<Option<Song>> = db
            .create(SONG_TABLE)
            .content(new_song)
            .await
            .map_err(Error::from);

        let song = match created {
            Ok(Some(song)) => song,
            Ok(None) => {
                StorageService::discard(storage, &uploads).await;
                return Err(Error::DbError("Could not create song".into()));
            }
            Err(err) => {
                StorageService::discard(storage, &uploads).await;
                return Err(err);
            }
        };

        tracing::info!(song = %song.id, artist = %artist.username, "song created");

        Self::get_song_with_artist(db, song.id).await
    }

    pub async fn update_song(
        db: &Surreal<Any>,
        song_id: &str,
        user: &UserRecord,
        changes: UpdateSongRequest,
    ) -> Result<SongWithArtist> {
        if let Some(title) = &changes.title {
            let len = title.trim().chars().count();
            if len == 0 || len > MAX_TITLE_LEN {
                return Err(Error::InvalidInput {
                    reason: format!("Title must be 1 to {MAX_TITLE_LEN} characters"),
                });
            }
        }

        let song = Self::get_song(db, song_id).await?;
        ensure_can_manage(&song, user)?;

        let sql = "UPDATE $song MERGE $changes RETURN NONE;
            UPDATE $song SET updated_at = time::now() RETURN NONE;";
        db.query(sql)
            .bind(("song", song.id.clone()))
            .bind(("changes", changes))
            .await?
            .check()?;

        Self::get_song_with_artist(db, song.id).await
    }

    /// Deletes the song, unlinks it everywhere it is referenced and removes
    /// its stored files.
    pub async fn delete_song(
        db: &Surreal<Any>,
        storage: &dyn ObjectStorage,
        song_id: &str,
        user: &UserRecord,
    ) -> Result<()> {
        let song = Self::get_song(db, song_id).await?;
        ensure_can_manage(&song, user)?;

        let sql = "
            DELETE $song;
            UPDATE playlist SET songs = array::complement(songs, [$song]) WHERE songs CONTAINS $song;
            UPDATE album SET songs = array::complement(songs, [$song]) WHERE songs CONTAINS $song;
            UPDATE user SET favorite_songs = array::complement(favorite_songs, [$song])
                WHERE favorite_songs CONTAINS $song;
        ";
        db.query(sql)
            .bind(("song", song.id.clone()))
            .await?
            .check()?;

        StorageService::discard_urls(storage, &[song.audio_url.as_str(), song.cover_image.as_str()]).await;

        tracing::info!(song = %song.id, by = %user.username, "song deleted");
        Ok(())
    }
}
