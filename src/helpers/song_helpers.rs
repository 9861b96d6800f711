use surrealdb::{engine::any::Any, Surreal};

use crate::{
    error::{Error, Result},
    helpers::record_helpers::create_song_id,
    models::{song::Song, user::UserRecord},
};

pub async fn song_exists(db: &Surreal<Any>, song_id: &str) -> Result<bool> {
    let sql_query = "SELECT * FROM $song_id;";
    let mut response = db
        .query(sql_query)
        .bind(("song_id", create_song_id(song_id)))
        .await?;
    let exists: Option<Song> = response.take(0)?;
    Ok(exists.is_some())
}

/// Only the uploading artist or an admin may edit or delete a song.
pub fn ensure_can_manage(song: &Song, user: &UserRecord) -> Result<()> {
    if user.is_admin() || song.artist == user.id {
        Ok(())
    } else {
        Err(Error::Forbidden {
            reason: "Only the song's artist or an admin can change it".to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::test_db;
    use crate::helpers::record_helpers::record_key;
    use crate::models::user::Role;
    use crate::test_utils::{seed_song, seed_user_with, SongSeed};

    #[tokio::test]
    async fn test_song_exists() {
        let db = test_db().await;
        let artist = seed_user_with(&db, "artist", Role::Artist, Some("Artist")).await;
        let song = seed_song(&db, SongSeed::new(&artist.id, "Titre")).await;
        let valid_id = record_key(&song.id);

        // --- An existing song is detected, with or without the table prefix ---
        assert!(song_exists(&db, &valid_id).await.unwrap());
        assert!(song_exists(&db, &format!("song:{valid_id}")).await.unwrap());

        // --- A well-formed but unknown id is not ---
        assert!(!song_exists(&db, "this_id_does_not_exist").await.unwrap());
    }

    #[tokio::test]
    async fn test_ensure_can_manage() {
        let db = test_db().await;
        let owner = seed_user_with(&db, "owner", Role::Artist, Some("Owner")).await;
        let other = seed_user_with(&db, "other", Role::Artist, Some("Other")).await;
        let admin = seed_user_with(&db, "admin", Role::Admin, None).await;
        let song = seed_song(&db, SongSeed::new(&owner.id, "Mine")).await;

        assert!(ensure_can_manage(&song, &owner).is_ok());
        assert!(ensure_can_manage(&song, &admin).is_ok());
        assert!(matches!(
            ensure_can_manage(&song, &other),
            Err(Error::Forbidden { .. })
        ));
    }
}
