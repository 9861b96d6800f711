use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use surrealdb::{Datetime, RecordId};

use crate::helpers::record_helpers::{serialize_record_id, serialize_record_ids};
use crate::models::music_genre::MusicGenre;

/// A song row as stored, with `artist` still a record link.
#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(rename_all(serialize = "camelCase"))]
pub struct Song {
    #[serde(serialize_with = "serialize_record_id")]
    pub id: RecordId,

    pub title: String,
    #[serde(serialize_with = "serialize_record_id")]
    pub artist: RecordId,
    pub genre: MusicGenre,
    #[serde(default)]
    pub album: Option<String>,
    pub duration: u32, // seconds
    pub audio_url: String,
    pub cover_image: String,
    #[serde(default)]
    pub lyrics: Option<String>,
    pub release_date: DateTime<Utc>,

    // Stats
    #[serde(default)]
    pub plays: u64,
    #[serde(default, serialize_with = "serialize_record_ids")]
    pub likes: Vec<RecordId>,
    #[serde(default)]
    pub comments: Vec<Comment>,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(rename_all(serialize = "camelCase"))]
pub struct Comment {
    #[serde(serialize_with = "serialize_record_id")]
    pub user: RecordId,
    pub text: String,
    pub created_at: DateTime<Utc>,
}

/// The user fields a song is populated with.
#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(rename_all(serialize = "camelCase"))]
pub struct ArtistSummary {
    #[serde(serialize_with = "serialize_record_id")]
    pub id: RecordId,
    pub username: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stage_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
}

/// A song with its artist populated. List projections leave the detail-only
/// fields empty.
#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(rename_all(serialize = "camelCase"))]
pub struct SongWithArtist {
    #[serde(serialize_with = "serialize_record_id")]
    pub id: RecordId,
    pub title: String,
    pub artist: ArtistSummary,
    pub genre: MusicGenre,
    pub duration: u32,
    pub release_date: DateTime<Utc>,
    pub cover_image: String,
    #[serde(default)]
    pub plays: u64,
    #[serde(default, serialize_with = "serialize_record_ids")]
    pub likes: Vec<RecordId>,
    #[serde(default)]
    pub comments: Vec<Comment>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub audio_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub album: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lyrics: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

/// Content written by `CREATE song`.
#[derive(Debug, Serialize, Clone)]
pub struct NewSong {
    pub title: String,
    pub artist: RecordId,
    pub genre: MusicGenre,
    pub album: Option<String>,
    pub duration: u32,
    pub audio_url: String,
    pub cover_image: String,
    pub lyrics: Option<String>,
    pub release_date: Datetime,
    pub plays: u64,
    pub likes: Vec<RecordId>,
    pub comments: Vec<NewComment>,
    pub created_at: Datetime,
    pub updated_at: Datetime,
}

#[derive(Debug, Serialize, Clone)]
pub struct NewComment {
    pub user: RecordId,
    pub text: String,
    pub created_at: Datetime,
}

/// Metadata edits; absent fields are left untouched.
#[derive(Debug, Deserialize, Serialize, Clone, Default)]
#[serde(rename_all = "camelCase")]
pub struct UpdateSongRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub genre: Option<MusicGenre>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub album: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lyrics: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct CommentPayload {
    pub text: String,
}

/// Search result body: `{ songs, pagination }`.
#[derive(Debug, Serialize, Clone)]
pub struct SongPage {
    pub songs: Vec<SongWithArtist>,
    pub pagination: super::pagination::PaginationInfo,
}
