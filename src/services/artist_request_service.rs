use chrono::Utc;
use serde::Serialize;
use surrealdb::{engine::any::Any, Datetime, RecordId, Surreal};

use crate::{
    error::{Error, Result},
    helpers::record_helpers::{create_artist_request_id, record_key, ARTIST_REQUEST_TABLE},
    models::{
        artist_request::{
            ArtistApplication, ArtistRequest, ArtistRequestStatus, NewArtistRequest,
            StatusChangePayload,
        },
        database_helpers::CountResult,
        music_genre::MusicGenre,
        user::UserRecord,
    },
    services::storage_service::{ObjectStorage, StorageService},
    validators::{artist_request_form::ArtistRequestForm, user_validator::normalize_email},
};

const PROFILE_IMAGE_FOLDER: &str = "artist-requests";

/// `MERGE` content for an owner resubmission. `rejection_reason` is written
/// as NONE, which removes the previous reason.
#[derive(Debug, Serialize)]
struct Resubmission {
    full_name: String,
    stage_name: String,
    email: String,
    phone: Option<String>,
    bio: Option<String>,
    genre: Option<MusicGenre>,
    social_links: Option<String>,
    profile_image: String,
    status: ArtistRequestStatus,
    rejection_reason: Option<String>,
    updated_at: Datetime,
}

pub struct ArtistRequestService;

impl ArtistRequestService {
    fn ensure_account_email(user: &UserRecord, application: &ArtistApplication) -> Result<()> {
        if normalize_email(&user.email) == application.email {
            Ok(())
        } else {
            Err(Error::EmailMismatch)
        }
    }

    async fn pending_count(db: &Surreal<Any>, user: &RecordId) -> Result<u64> {
        let sql = "SELECT count() AS total FROM artist_request
            WHERE user = $user AND status = 'pending' GROUP ALL;";
        let row: Option<CountResult> = db
            .query(sql)
            .bind(("user", user.clone()))
            .await?
            .take(0)?;
        Ok(CountResult::total_or_zero(row))
    }

    async fn find(db: &Surreal<Any>, request_id: &str) -> Result<ArtistRequest> {
        let request: Option<ArtistRequest> = db
            .query("SELECT * FROM $request;")
            .bind(("request", create_artist_request_id(request_id)))
            .await?
            .take(0)?;

        request.ok_or_else(|| Error::ArtistRequestNotFound {
            id: request_id.to_string(),
        })
    }

    /// Files a new request for `user`. Both business checks run before the
    /// profile image is uploaded, so a refused request leaves nothing behind.
    pub async fn create_request(
        db: &Surreal<Any>,
        storage: &dyn ObjectStorage,
        user: &UserRecord,
        form: ArtistRequestForm,
    ) -> Result<ArtistRequest> {
        let ArtistRequestForm {
            application,
            profile_image,
        } = form;

        Self::ensure_account_email(user, &application)?;
        if Self::pending_count(db, &user.id).await? > 0 {
            return Err(Error::PendingArtistRequestExists);
        }

        let Some(image) = profile_image else {
            return Err(Error::Validation {
                messages: vec!["Profile image is required".to_string()],
            });
        };
        let uploads = StorageService::upload_all(storage, &[(PROFILE_IMAGE_FOLDER, &image)]).await?;

        let now = Utc::now();
        let new_request = NewArtistRequest {
            user: user.id.clone(),
            full_name: application.full_name,
            stage_name: application.stage_name,
            email: application.email,
            phone: application.phone,
            bio: application.bio,
            genre: application.genre,
            social_links: application.social_links,
            profile_image: uploads[0].url.clone(),
            status: ArtistRequestStatus::Pending,
            created_at: now.into(),
            updated_at: now.into(),
        };

        let created: Result<Option<ArtistRequest>> = db
            .create(ARTIST_REQUEST_TABLE)
            .content(new_request)
            .await
            .map_err(Error::from);

        match created {
            Ok(Some(request)) => {
                tracing::info!(request = %request.id, user = %user.username, "artist request filed");
                Ok(request)
            }
            Ok(None) => {
                StorageService::discard(storage, &uploads).await;
                Err(Error::DbError("Could not create artist request".into()))
            }
            Err(err) => {
                StorageService::discard(storage, &uploads).await;
                Err(err)
            }
        }
    }

    /// Owner edit of a rejected request; puts it back to pending. Without a
    /// new image the previous one is kept.
    pub async fn resubmit_request(
        db: &Surreal<Any>,
        storage: &dyn ObjectStorage,
        user: &UserRecord,
        request_id: &str,
        form: ArtistRequestForm,
    ) -> Result<ArtistRequest> {
        let current = Self::find(db, request_id).await?;
        if current.user != user.id {
            return Err(Error::Forbidden {
                reason: "Only the applicant can edit this request".to_string(),
            });
        }
        if !current.status.is_owner_editable() {
            return Err(Error::ArtistRequestNotEditable {
                status: current.status.to_string(),
            });
        }

        let ArtistRequestForm {
            application,
            profile_image,
        } = form;
        Self::ensure_account_email(user, &application)?;

        let uploads = match &profile_image {
            Some(image) => {
                StorageService::upload_all(storage, &[(PROFILE_IMAGE_FOLDER, image)]).await?
            }
            None => Vec::new(),
        };
        let profile_image = uploads
            .first()
            .map(|stored| stored.url.clone())
            .unwrap_or_else(|| current.profile_image.clone());

        let changes = Resubmission {
            full_name: application.full_name,
            stage_name: application.stage_name,
            email: application.email,
            phone: application.phone,
            bio: application.bio,
            genre: application.genre,
            social_links: application.social_links,
            profile_image,
            status: ArtistRequestStatus::Pending,
            rejection_reason: None,
            updated_at: Utc::now().into(),
        };

        let updated = Self::merge_if_rejected(db, &current.id, changes).await;

        match updated {
            Ok(Some(request)) => {
                if !uploads.is_empty() {
                    StorageService::discard_urls(storage, &[current.profile_image.as_str()]).await;
                }
                tracing::info!(request = %request.id, user = %user.username, "artist request resubmitted");
                Ok(request)
            }
            Ok(None) => {
                StorageService::discard(storage, &uploads).await;
                Err(Error::ArtistRequestNotEditable {
                    status: current.status.to_string(),
                })
            }
            Err(err) => {
                StorageService::discard(storage, &uploads).await;
                Err(err)
            }
        }
    }

    /// The status guard makes a concurrent admin decision win.
    async fn merge_if_rejected(
        db: &Surreal<Any>,
        request: &RecordId,
        changes: Resubmission,
    ) -> Result<Option<ArtistRequest>> {
        let row: Option<ArtistRequest> = db
            .query("UPDATE $request MERGE $changes WHERE status = 'rejected';")
            .bind(("request", request.clone()))
            .bind(("changes", changes))
            .await?
            .take(0)?;
        Ok(row)
    }

    /// Admin decision on a pending request. Approval promotes the applicant
    /// to the artist role under the requested stage name.
    pub async fn change_status(
        db: &Surreal<Any>,
        request_id: &str,
        payload: StatusChangePayload,
    ) -> Result<ArtistRequest> {
        let current = Self::find(db, request_id).await?;
        let next = payload.status;
        if !current.status.can_transition_to(next) || next == ArtistRequestStatus::Pending {
            return Err(Error::InvalidStatusTransition {
                from: current.status.to_string(),
                to: next.to_string(),
            });
        }

        let reason = match next {
            ArtistRequestStatus::Rejected => payload
                .rejection_reason
                .map(|r| r.trim().to_string())
                .filter(|r| !r.is_empty()),
            _ => None,
        };

        // The decision and the promotion commit together. Admins keep their role.
        let sql = "BEGIN TRANSACTION;
            LET $decided = (UPDATE $request SET
                status = $status,
                rejection_reason = $reason,
                updated_at = time::now()
            WHERE status = 'pending');
            IF $status = 'approved' AND array::len($decided) > 0 {
                UPDATE $user SET
                    role = IF role = 'admin' THEN role ELSE 'artist' END,
                    stage_name = $stage_name
                RETURN NONE;
            };
            SELECT * FROM $decided;
            COMMIT TRANSACTION;";
        let mut response = db
            .query(sql)
            .bind(("request", current.id.clone()))
            .bind(("status", next))
            .bind(("reason", reason))
            .bind(("user", current.user.clone()))
            .bind(("stage_name", current.stage_name.clone()))
            .await?;
        let last = response.num_statements().saturating_sub(1);
        let updated: Option<ArtistRequest> = response.take(last)?;

        let Some(request) = updated else {
            // Someone else decided first.
            let latest = Self::find(db, request_id).await?;
            return Err(Error::InvalidStatusTransition {
                from: latest.status.to_string(),
                to: next.to_string(),
            });
        };

        tracing::info!(request = %request.id, status = %next, "artist request decided");
        Ok(request)
    }

    pub async fn list_user_requests(
        db: &Surreal<Any>,
        user: &RecordId,
    ) -> Result<Vec<ArtistRequest>> {
        let requests: Vec<ArtistRequest> = db
            .query("SELECT * FROM artist_request WHERE user = $user ORDER BY created_at DESC;")
            .bind(("user", user.clone()))
            .await?
            .take(0)?;
        Ok(requests)
    }

    pub async fn list_requests(
        db: &Surreal<Any>,
        status: Option<ArtistRequestStatus>,
    ) -> Result<Vec<ArtistRequest>> {
        let where_clause = if status.is_some() {
            " WHERE status = $status"
        } else {
            ""
        };
        let sql = format!("SELECT * FROM artist_request{where_clause} ORDER BY created_at DESC;");

        let mut query = db.query(sql);
        if let Some(status) = status {
            query = query.bind(("status", status));
        }
        let requests: Vec<ArtistRequest> = query.await?.take(0)?;
        Ok(requests)
    }

    /// Visible to the applicant and to admins.
    pub async fn get_request(
        db: &Surreal<Any>,
        request_id: &str,
        user: &UserRecord,
    ) -> Result<ArtistRequest> {
        let request = Self::find(db, request_id).await?;
        if request.user == user.id || user.is_admin() {
            Ok(request)
        } else {
            Err(Error::Forbidden {
                reason: format!(
                    "Artist request {} belongs to another user",
                    record_key(&request.id)
                ),
            })
        }
    }
}
