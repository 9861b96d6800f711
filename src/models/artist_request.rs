use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use surrealdb::{Datetime, RecordId};

use crate::helpers::record_helpers::serialize_record_id;
use crate::models::music_genre::MusicGenre;

#[derive(
    Debug,
    PartialEq,
    Eq,
    Clone,
    Copy,
    Serialize,
    Deserialize,
    strum_macros::Display,
    strum_macros::EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum ArtistRequestStatus {
    Pending,
    Approved,
    Rejected,
}

impl ArtistRequestStatus {
    /// `pending -> approved | rejected`, `rejected -> pending`. Approved is terminal.
    pub fn can_transition_to(self, next: ArtistRequestStatus) -> bool {
        use ArtistRequestStatus::*;
        matches!(
            (self, next),
            (Pending, Approved) | (Pending, Rejected) | (Rejected, Pending)
        )
    }

    /// Owners may only touch a request that was turned down.
    pub fn is_owner_editable(self) -> bool {
        self == ArtistRequestStatus::Rejected
    }
}

#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(rename_all(serialize = "camelCase"))]
pub struct ArtistRequest {
    #[serde(serialize_with = "serialize_record_id")]
    pub id: RecordId,
    #[serde(serialize_with = "serialize_record_id")]
    pub user: RecordId,

    pub full_name: String,
    pub stage_name: String,
    pub email: String,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub bio: Option<String>,
    #[serde(default)]
    pub genre: Option<MusicGenre>,
    #[serde(default)]
    pub social_links: Option<String>,
    pub profile_image: String,

    pub status: ArtistRequestStatus,
    #[serde(default)]
    pub rejection_reason: Option<String>,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, Clone)]
pub struct NewArtistRequest {
    pub user: RecordId,
    pub full_name: String,
    pub stage_name: String,
    pub email: String,
    pub phone: Option<String>,
    pub bio: Option<String>,
    pub genre: Option<MusicGenre>,
    pub social_links: Option<String>,
    pub profile_image: String,
    pub status: ArtistRequestStatus,
    pub created_at: Datetime,
    pub updated_at: Datetime,
}

/// Applicant fields shared by creation and resubmission.
#[derive(Debug, Clone, PartialEq)]
pub struct ArtistApplication {
    pub full_name: String,
    pub stage_name: String,
    pub email: String,
    pub phone: Option<String>,
    pub bio: Option<String>,
    pub genre: Option<MusicGenre>,
    pub social_links: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusChangePayload {
    pub status: ArtistRequestStatus,
    pub rejection_reason: Option<String>,
}

#[derive(Debug, Deserialize, Default)]
pub struct ArtistRequestQuery {
    pub status: Option<ArtistRequestStatus>,
}

#[cfg(test)]
mod tests {
    use super::ArtistRequestStatus::*;

    #[test]
    fn test_allowed_transitions() {
        assert!(Pending.can_transition_to(Approved));
        assert!(Pending.can_transition_to(Rejected));
        assert!(Rejected.can_transition_to(Pending));
    }

    #[test]
    fn test_approved_is_terminal() {
        for next in [Pending, Approved, Rejected] {
            assert!(!Approved.can_transition_to(next));
        }
        assert!(!Approved.is_owner_editable());
    }

    #[test]
    fn test_no_skipping_or_self_transitions() {
        assert!(!Rejected.can_transition_to(Approved));
        assert!(!Pending.can_transition_to(Pending));
        assert!(!Pending.is_owner_editable());
        assert!(Rejected.is_owner_editable());
    }
}
