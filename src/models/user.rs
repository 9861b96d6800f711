use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use surrealdb::{Datetime, RecordId};

use crate::helpers::record_helpers::{serialize_record_id, serialize_record_ids};

#[derive(
    Debug, Default, PartialEq, Eq, Clone, Copy, Serialize, Deserialize, strum_macros::Display,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Role {
    #[default]
    Listener,
    Artist,
    Admin,
}

/// A user row. The password hash is never serialized out.
#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(rename_all(serialize = "camelCase"))]
pub struct UserRecord {
    #[serde(serialize_with = "serialize_record_id")]
    pub id: RecordId,
    pub username: String,
    pub email: String,
    #[serde(skip_serializing)]
    pub password: String,
    #[serde(default)]
    pub role: Role,
    #[serde(default)]
    pub stage_name: Option<String>,

    #[serde(default, serialize_with = "serialize_record_ids")]
    pub favorite_songs: Vec<RecordId>,
    #[serde(default, serialize_with = "serialize_record_ids")]
    pub favorite_artists: Vec<RecordId>,
    #[serde(default, serialize_with = "serialize_record_ids")]
    pub playlists: Vec<RecordId>,

    // Profile
    #[serde(default)]
    pub avatar: Option<String>,
    #[serde(default)]
    pub date_of_birth: Option<DateTime<Utc>>,
    #[serde(default)]
    pub gender: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,

    pub created_at: DateTime<Utc>,
}

impl UserRecord {
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }
}

/// What other users get to see.
#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(rename_all(serialize = "camelCase"))]
pub struct PublicProfile {
    #[serde(serialize_with = "serialize_record_id")]
    pub id: RecordId,
    pub username: String,
    #[serde(default)]
    pub role: Role,
    #[serde(default)]
    pub stage_name: Option<String>,
    #[serde(default)]
    pub avatar: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, Clone)]
pub struct NewUser {
    pub username: String,
    pub email: String,
    pub password: String,
    pub role: Role,
    pub stage_name: Option<String>,
    pub favorite_songs: Vec<RecordId>,
    pub favorite_artists: Vec<RecordId>,
    pub playlists: Vec<RecordId>,
    pub created_at: Datetime,
}

impl NewUser {
    pub fn listener(username: String, email: String, password_hash: String) -> Self {
        Self {
            username,
            email,
            password: password_hash,
            role: Role::Listener,
            stage_name: None,
            favorite_songs: vec![],
            favorite_artists: vec![],
            playlists: vec![],
            created_at: Utc::now().into(),
        }
    }
}

/// Self-service profile edits; absent fields are left untouched.
#[derive(Debug, Deserialize, Clone, Default)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProfileRequest {
    pub avatar: Option<String>,
    pub date_of_birth: Option<DateTime<Utc>>,
    pub gender: Option<String>,
    pub phone: Option<String>,
}

/// `MERGE` content built from an `UpdateProfileRequest`.
#[derive(Debug, Serialize, Clone, Default)]
pub struct ProfileChanges {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date_of_birth: Option<Datetime>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gender: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
}

impl From<UpdateProfileRequest> for ProfileChanges {
    fn from(req: UpdateProfileRequest) -> Self {
        Self {
            avatar: req.avatar,
            date_of_birth: req.date_of_birth.map(Datetime::from),
            gender: req.gender,
            phone: req.phone,
        }
    }
}

#[derive(Debug, Serialize, Clone)]
pub struct UserPage {
    pub users: Vec<UserRecord>,
    pub pagination: super::pagination::PaginationInfo,
}

#[derive(Debug, Deserialize)]
pub struct ChangeRolePayload {
    pub role: Role,
}
