use crate::{
    error::{Error, Result},
    helpers::{
        record_helpers::{create_song_id, create_user_id, record_key},
        song_helpers::song_exists,
    },
    models::{
        database_helpers::CountResult,
        pagination::PageRequest,
        user::{ProfileChanges, PublicProfile, Role, UpdateProfileRequest, UserPage, UserRecord},
    },
};
use surrealdb::{engine::any::Any, RecordId, Surreal};

pub struct UserService;

impl UserService {
    pub async fn get_user(db: &Surreal<Any>, user_id: &RecordId) -> Result<UserRecord> {
        let user: Option<UserRecord> = db.select(user_id.clone()).await?;
        user.ok_or_else(|| Error::UserNotFound {
            id: record_key(user_id),
        })
    }

    pub async fn get_public_profile(db: &Surreal<Any>, user_id: &str) -> Result<PublicProfile> {
        let sql = "SELECT id, username, role, stage_name, avatar, created_at FROM $user;";
        let profile: Option<PublicProfile> = db
            .query(sql)
            .bind(("user", create_user_id(user_id)))
            .await?
            .take(0)?;

        profile.ok_or_else(|| Error::UserNotFound {
            id: user_id.to_string(),
        })
    }

    pub async fn update_profile(
        db: &Surreal<Any>,
        user_id: &RecordId,
        request: UpdateProfileRequest,
    ) -> Result<UserRecord> {
        let changes = ProfileChanges::from(request);
        let updated: Option<UserRecord> = db
            .query("UPDATE $user MERGE $changes;")
            .bind(("user", user_id.clone()))
            .bind(("changes", changes))
            .await?
            .take(0)?;

        updated.ok_or_else(|| Error::UserNotFound {
            id: record_key(user_id),
        })
    }

    /// Set-membership toggle on one of the user's link arrays, in one `UPDATE`.
    async fn toggle_link(
        db: &Surreal<Any>,
        user_id: &RecordId,
        field: &'static str,
        target: RecordId,
    ) -> Result<UserRecord> {
        let sql = format!(
            "UPDATE $user SET {field} = IF {field} CONTAINS $target
                THEN array::complement({field}, [$target])
                ELSE array::union({field}, [$target])
            END;"
        );
        let updated: Option<UserRecord> = db
            .query(sql)
            .bind(("user", user_id.clone()))
            .bind(("target", target))
            .await?
            .take(0)?;

        updated.ok_or_else(|| Error::UserNotFound {
            id: record_key(user_id),
        })
    }

    pub async fn toggle_favorite_song(
        db: &Surreal<Any>,
        user_id: &RecordId,
        song_id: &str,
    ) -> Result<UserRecord> {
        if !song_exists(db, song_id).await? {
            return Err(Error::SongNotFound {
                id: song_id.to_string(),
            });
        }
        Self::toggle_link(db, user_id, "favorite_songs", create_song_id(song_id)).await
    }

    pub async fn toggle_favorite_artist(
        db: &Surreal<Any>,
        user_id: &RecordId,
        artist_id: &str,
    ) -> Result<UserRecord> {
        let artist = Self::get_user(db, &create_user_id(artist_id)).await?;
        if artist.role != Role::Artist {
            return Err(Error::InvalidInput {
                reason: format!("User {artist_id} is not an artist"),
            });
        }
        Self::toggle_link(db, user_id, "favorite_artists", artist.id).await
    }

    pub async fn list_users(db: &Surreal<Any>, page: PageRequest) -> Result<UserPage> {
        let sql = format!(
            "SELECT count() AS total FROM user GROUP ALL;
            SELECT * FROM user ORDER BY created_at DESC LIMIT {} START {};",
            page.limit,
            page.skip()
        );
        let mut response = db.query(sql).await?;
        let count: Option<CountResult> = response.take(0)?;
        let users: Vec<UserRecord> = response.take(1)?;

        Ok(UserPage {
            users,
            pagination: page.info(CountResult::total_or_zero(count)),
        })
    }

    pub async fn change_role(db: &Surreal<Any>, user_id: &str, role: Role) -> Result<UserRecord> {
        let updated: Option<UserRecord> = db
            .query("UPDATE $user SET role = $role;")
            .bind(("user", create_user_id(user_id)))
            .bind(("role", role))
            .await?
            .take(0)?;

        let user = updated.ok_or_else(|| Error::UserNotFound {
            id: user_id.to_string(),
        })?;
        tracing::info!(user = %user.id, role = %role, "role changed");
        Ok(user)
    }
}
