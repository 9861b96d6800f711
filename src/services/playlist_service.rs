use chrono::Utc;
use surrealdb::{engine::any::Any, RecordId, Surreal};

use crate::{
    error::{Error, Result},
    helpers::{
        record_helpers::{create_playlist_id, create_song_id, PLAYLIST_TABLE},
        song_helpers::song_exists,
    },
    models::{
        playlist::{CreatePlaylistRequest, NewPlaylist, Playlist, PlaylistWithSongs},
        song::SongWithArtist,
    },
    services::song_query::SONG_LIST_FIELDS,
};

pub struct PlaylistService;

impl PlaylistService {
    async fn find(db: &Surreal<Any>, playlist_id: &str) -> Result<Playlist> {
        let playlist: Option<Playlist> = db.select(create_playlist_id(playlist_id)).await?;
        playlist.ok_or_else(|| Error::PlaylistNotFound {
            id: playlist_id.to_string(),
        })
    }

    async fn find_owned(db: &Surreal<Any>, playlist_id: &str, user: &RecordId) -> Result<Playlist> {
        let playlist = Self::find(db, playlist_id).await?;
        if &playlist.owner != user {
            return Err(Error::Forbidden {
                reason: "Only the playlist owner can change it".to_string(),
            });
        }
        Ok(playlist)
    }

    pub async fn create_playlist(
        db: &Surreal<Any>,
        owner: &RecordId,
        request: CreatePlaylistRequest,
    ) -> Result<Playlist> {
        let name = request.name.trim().to_string();
        if name.is_empty() {
            return Err(Error::InvalidInput {
                reason: "Playlist name is required".to_string(),
            });
        }

        let now = Utc::now();
        let playlist: Playlist = db
            .create(PLAYLIST_TABLE)
            .content(NewPlaylist {
                name,
                description: request.description,
                cover_image: request.cover_image,
                is_public: request.is_public,
                owner: owner.clone(),
                songs: Vec::new(),
                created_at: now.into(),
                updated_at: now.into(),
            })
            .await?
            .ok_or(Error::DbError("Could not create playlist".into()))?;

        db.query("UPDATE $owner SET playlists += $playlist RETURN NONE;")
            .bind(("owner", owner.clone()))
            .bind(("playlist", playlist.id.clone()))
            .await?
            .check()?;

        Ok(playlist)
    }

    pub async fn list_user_playlists(db: &Surreal<Any>, owner: &RecordId) -> Result<Vec<Playlist>> {
        let playlists: Vec<Playlist> = db
            .query("SELECT * FROM playlist WHERE owner = $owner ORDER BY created_at DESC;")
            .bind(("owner", owner.clone()))
            .await?
            .take(0)?;
        Ok(playlists)
    }

    pub async fn list_public_playlists(db: &Surreal<Any>) -> Result<Vec<Playlist>> {
        let playlists: Vec<Playlist> = db
            .query("SELECT * FROM playlist WHERE is_public = true ORDER BY created_at DESC;")
            .await?
            .take(0)?;
        Ok(playlists)
    }

    /// Private playlists are only visible to their owner.
    pub async fn get_playlist_with_songs(
        db: &Surreal<Any>,
        playlist_id: &str,
        viewer: Option<&RecordId>,
    ) -> Result<PlaylistWithSongs> {
        let playlist = Self::find(db, playlist_id).await?;
        if !playlist.is_public && viewer != Some(&playlist.owner) {
            return Err(Error::Forbidden {
                reason: "This playlist is private".to_string(),
            });
        }

        let sql = format!("SELECT {SONG_LIST_FIELDS} FROM $songs;");
        let songs: Vec<SongWithArtist> = db
            .query(sql)
            .bind(("songs", playlist.songs.clone()))
            .await?
            .take(0)?;

        Ok(PlaylistWithSongs {
            id: playlist.id,
            name: playlist.name,
            description: playlist.description,
            cover_image: playlist.cover_image,
            is_public: playlist.is_public,
            owner: playlist.owner,
            songs,
            created_at: playlist.created_at,
            updated_at: playlist.updated_at,
        })
    }

    pub async fn add_song(
        db: &Surreal<Any>,
        playlist_id: &str,
        user: &RecordId,
        song_id: &str,
    ) -> Result<Playlist> {
        let playlist = Self::find_owned(db, playlist_id, user).await?;
        if !song_exists(db, song_id).await? {
            return Err(Error::SongNotFound {
                id: song_id.to_string(),
            });
        }
        let song = create_song_id(song_id);
        if playlist.songs.contains(&song) {
            return Err(Error::InvalidInput {
                reason: "Song is already in this playlist".to_string(),
            });
        }

        // `array::union` keeps the list duplicate-free under concurrent adds.
        let sql = "UPDATE $playlist SET
                songs = array::union(songs, [$song]),
                updated_at = time::now();";
        let updated: Option<Playlist> = db
            .query(sql)
            .bind(("playlist", playlist.id))
            .bind(("song", song))
            .await?
            .take(0)?;

        updated.ok_or_else(|| Error::PlaylistNotFound {
            id: playlist_id.to_string(),
        })
    }

    pub async fn remove_song(
        db: &Surreal<Any>,
        playlist_id: &str,
        user: &RecordId,
        song_id: &str,
    ) -> Result<Playlist> {
        let playlist = Self::find_owned(db, playlist_id, user).await?;

        let sql = "UPDATE $playlist SET
                songs = array::complement(songs, [$song]),
                updated_at = time::now();";
        let updated: Option<Playlist> = db
            .query(sql)
            .bind(("playlist", playlist.id))
            .bind(("song", create_song_id(song_id)))
            .await?
            .take(0)?;

        updated.ok_or_else(|| Error::PlaylistNotFound {
            id: playlist_id.to_string(),
        })
    }

    pub async fn delete_playlist(db: &Surreal<Any>, playlist_id: &str, user: &RecordId) -> Result<()> {
        let playlist = Self::find_owned(db, playlist_id, user).await?;

        let sql = "DELETE $playlist;
            UPDATE $owner SET playlists = array::complement(playlists, [$playlist]) RETURN NONE;";
        db.query(sql)
            .bind(("playlist", playlist.id))
            .bind(("owner", playlist.owner))
            .await?
            .check()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::test_db;
    use crate::helpers::record_helpers::record_key;
    use crate::models::user::UserRecord;
    use crate::test_utils::{seed_artist, seed_song, seed_user, SongSeed};

    fn request(name: &str, is_public: bool) -> CreatePlaylistRequest {
        CreatePlaylistRequest {
            name: name.to_string(),
            description: None,
            cover_image: None,
            is_public,
        }
    }

    #[tokio::test]
    async fn test_create_links_playlist_to_owner() {
        let db = test_db().await;
        let owner = seed_user(&db, "owner").await;

        let playlist = PlaylistService::create_playlist(&db, &owner, request(" Road trip ", false))
            .await
            .unwrap();
        assert_eq!(playlist.name, "Road trip");
        assert!(playlist.songs.is_empty());

        let user: Option<UserRecord> = db.select(owner.clone()).await.unwrap();
        assert_eq!(user.unwrap().playlists, vec![playlist.id.clone()]);

        let err = PlaylistService::create_playlist(&db, &owner, request("  ", false))
            .await
            .unwrap_err();
        assert!(matches!(err, Error::InvalidInput { .. }));
    }

    #[tokio::test]
    async fn test_songs_are_added_once_and_kept_in_order() {
        let db = test_db().await;
        let artist = seed_artist(&db, "artist", "Artist").await;
        let owner = seed_user(&db, "owner").await;
        let first = seed_song(&db, SongSeed::new(&artist, "First")).await;
        let second = seed_song(&db, SongSeed::new(&artist, "Second")).await;
        let playlist = PlaylistService::create_playlist(&db, &owner, request("Mix", true))
            .await
            .unwrap();
        let key = record_key(&playlist.id);

        PlaylistService::add_song(&db, &key, &owner, &record_key(&second.id))
            .await
            .unwrap();
        PlaylistService::add_song(&db, &key, &owner, &record_key(&first.id))
            .await
            .unwrap();
        let err = PlaylistService::add_song(&db, &key, &owner, &record_key(&first.id))
            .await
            .unwrap_err();
        assert!(matches!(err, Error::InvalidInput { .. }));

        let full = PlaylistService::get_playlist_with_songs(&db, &key, None)
            .await
            .unwrap();
        let titles: Vec<_> = full.songs.iter().map(|s| s.title.as_str()).collect();
        assert_eq!(titles, ["Second", "First"]);

        let playlist = PlaylistService::remove_song(&db, &key, &owner, &record_key(&second.id))
            .await
            .unwrap();
        assert_eq!(playlist.songs, vec![first.id]);
    }

    #[tokio::test]
    async fn test_private_playlists_and_ownership() {
        let db = test_db().await;
        let owner = seed_user(&db, "owner").await;
        let stranger = seed_user(&db, "stranger").await;
        let private = PlaylistService::create_playlist(&db, &owner, request("Secret", false))
            .await
            .unwrap();
        PlaylistService::create_playlist(&db, &owner, request("Shared", true))
            .await
            .unwrap();
        let key = record_key(&private.id);

        assert!(PlaylistService::get_playlist_with_songs(&db, &key, Some(&owner))
            .await
            .is_ok());
        for viewer in [None, Some(&stranger)] {
            let err = PlaylistService::get_playlist_with_songs(&db, &key, viewer)
                .await
                .unwrap_err();
            assert!(matches!(err, Error::Forbidden { .. }));
        }

        let public = PlaylistService::list_public_playlists(&db).await.unwrap();
        assert_eq!(public.len(), 1);
        assert_eq!(public[0].name, "Shared");
        assert_eq!(
            PlaylistService::list_user_playlists(&db, &owner).await.unwrap().len(),
            2
        );

        let err = PlaylistService::delete_playlist(&db, &key, &stranger)
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Forbidden { .. }));

        PlaylistService::delete_playlist(&db, &key, &owner).await.unwrap();
        let err = PlaylistService::get_playlist_with_songs(&db, &key, Some(&owner))
            .await
            .unwrap_err();
        assert!(matches!(err, Error::PlaylistNotFound { .. }));
    }
}
