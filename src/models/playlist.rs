use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use surrealdb::{Datetime, RecordId};

use crate::helpers::record_helpers::{serialize_record_id, serialize_record_ids};
use crate::models::song::SongWithArtist;

#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(rename_all(serialize = "camelCase"))]
pub struct Playlist {
    #[serde(serialize_with = "serialize_record_id")]
    pub id: RecordId,

    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub cover_image: Option<String>,
    pub is_public: bool,
    #[serde(serialize_with = "serialize_record_id")]
    pub owner: RecordId,
    #[serde(default, serialize_with = "serialize_record_ids")]
    pub songs: Vec<RecordId>,

    // Timestamps
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(rename_all(serialize = "camelCase"))]
pub struct PlaylistWithSongs {
    #[serde(serialize_with = "serialize_record_id")]
    pub id: RecordId,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub cover_image: Option<String>,
    pub is_public: bool,
    #[serde(serialize_with = "serialize_record_id")]
    pub owner: RecordId,
    pub songs: Vec<SongWithArtist>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, Clone)]
pub struct NewPlaylist {
    pub name: String,
    pub description: Option<String>,
    pub cover_image: Option<String>,
    pub is_public: bool,
    pub owner: RecordId,
    pub songs: Vec<RecordId>,
    pub created_at: Datetime,
    pub updated_at: Datetime,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct CreatePlaylistRequest {
    pub name: String,
    pub description: Option<String>,
    pub cover_image: Option<String>,
    #[serde(default)]
    pub is_public: bool,
}
