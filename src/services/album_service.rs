use chrono::Utc;
use surrealdb::{engine::any::Any, Surreal};

use crate::{
    error::{Error, Result},
    helpers::record_helpers::{create_album_id, ALBUM_TABLE},
    models::{
        album::{Album, AlbumPage, AlbumWithArtist, AlbumWithSongs, CreateAlbumRequest, NewAlbum},
        database_helpers::CountResult,
        pagination::PageRequest,
        song::{ArtistSummary, SongWithArtist},
        user::UserRecord,
    },
    services::{song_query::SONG_LIST_FIELDS, song_service::SongService},
};

const ALBUM_LIST_FIELDS: &str = "id, title, cover_image, genre, release_date, \
    array::len(songs) AS songs_count, \
    { id: artist.id, username: artist.username, stage_name: artist.stage_name, avatar: artist.avatar } AS artist";

pub struct AlbumService;

impl AlbumService {
    async fn find(db: &Surreal<Any>, album_id: &str) -> Result<Album> {
        let album: Option<Album> = db.select(create_album_id(album_id)).await?;
        album.ok_or_else(|| Error::AlbumNotFound {
            id: album_id.to_string(),
        })
    }

    pub async fn create_album(
        db: &Surreal<Any>,
        artist: &UserRecord,
        request: CreateAlbumRequest,
    ) -> Result<Album> {
        let title = request.title.trim().to_string();
        if title.is_empty() {
            return Err(Error::InvalidInput {
                reason: "Album title is required".to_string(),
            });
        }

        let now = Utc::now();
        let album: Album = db
            .create(ALBUM_TABLE)
            .content(NewAlbum {
                title,
                artist: artist.id.clone(),
                cover_image: request.cover_image,
                genre: request.genre,
                release_date: request.release_date.unwrap_or(now).into(),
                songs: Vec::new(),
                created_at: now.into(),
                updated_at: now.into(),
            })
            .await?
            .ok_or(Error::DbError("Could not create album".into()))?;

        tracing::info!(album = %album.id, artist = %artist.username, "album created");
        Ok(album)
    }

    /// Newest releases first.
    pub async fn list_albums(db: &Surreal<Any>, page: PageRequest) -> Result<AlbumPage> {
        let sql = format!(
            "SELECT count() AS total FROM album GROUP ALL;
            SELECT {ALBUM_LIST_FIELDS} FROM album ORDER BY release_date DESC LIMIT {} START {};",
            page.limit,
            page.skip()
        );

        let mut response = db.query(sql).await?;
        let count: Option<CountResult> = response.take(0)?;
        let albums: Vec<AlbumWithArtist> = response.take(1)?;

        Ok(AlbumPage {
            albums,
            pagination: page.info(CountResult::total_or_zero(count)),
        })
    }

    pub async fn get_album(db: &Surreal<Any>, album_id: &str) -> Result<AlbumWithSongs> {
        let album = Self::find(db, album_id).await?;

        let sql = format!(
            "SELECT id, username, stage_name, avatar FROM $artist;
            SELECT {SONG_LIST_FIELDS} FROM $songs;"
        );
        let mut response = db
            .query(sql)
            .bind(("artist", album.artist.clone()))
            .bind(("songs", album.songs.clone()))
            .await?;
        let artist: Option<ArtistSummary> = response.take(0)?;
        let songs: Vec<SongWithArtist> = response.take(1)?;

        let artist = artist.ok_or_else(|| Error::UserNotFound {
            id: album.artist.to_string(),
        })?;

        Ok(AlbumWithSongs {
            id: album.id,
            title: album.title,
            artist,
            cover_image: album.cover_image,
            genre: album.genre,
            release_date: album.release_date,
            songs,
        })
    }

    /// The album's artist (or an admin) may add that artist's own songs.
    pub async fn add_song(
        db: &Surreal<Any>,
        album_id: &str,
        user: &UserRecord,
        song_id: &str,
    ) -> Result<Album> {
        let album = Self::find(db, album_id).await?;
        if album.artist != user.id && !user.is_admin() {
            return Err(Error::Forbidden {
                reason: "Only the album's artist can add songs to it".to_string(),
            });
        }

        let song = SongService::get_song(db, song_id).await?;
        if song.artist != album.artist {
            return Err(Error::InvalidInput {
                reason: "Song must belong to the album's artist".to_string(),
            });
        }

        let sql = "UPDATE $album SET
                songs = array::union(songs, [$song]),
                updated_at = time::now();
            UPDATE $song SET album = $title RETURN NONE;";
        let mut response = db
            .query(sql)
            .bind(("album", album.id))
            .bind(("song", song.id))
            .bind(("title", album.title))
            .await?;
        let updated: Option<Album> = response.take(0)?;

        updated.ok_or_else(|| Error::AlbumNotFound {
            id: album_id.to_string(),
        })
    }
}
