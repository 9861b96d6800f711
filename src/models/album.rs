use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use surrealdb::{Datetime, RecordId};

use crate::helpers::record_helpers::{serialize_record_id, serialize_record_ids};
use crate::models::{
    music_genre::MusicGenre,
    song::{ArtistSummary, SongWithArtist},
};

#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(rename_all(serialize = "camelCase"))]
pub struct Album {
    #[serde(serialize_with = "serialize_record_id")]
    pub id: RecordId,

    pub title: String,
    #[serde(serialize_with = "serialize_record_id")]
    pub artist: RecordId,
    #[serde(default)]
    pub cover_image: Option<String>,
    #[serde(default)]
    pub genre: Option<MusicGenre>,
    pub release_date: DateTime<Utc>,
    #[serde(default, serialize_with = "serialize_record_ids")]
    pub songs: Vec<RecordId>,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(rename_all(serialize = "camelCase"))]
pub struct AlbumWithArtist {
    #[serde(serialize_with = "serialize_record_id")]
    pub id: RecordId,
    pub title: String,
    pub artist: ArtistSummary,
    #[serde(default)]
    pub cover_image: Option<String>,
    #[serde(default)]
    pub genre: Option<MusicGenre>,
    pub release_date: DateTime<Utc>,
    #[serde(default)]
    pub songs_count: u32,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(rename_all(serialize = "camelCase"))]
pub struct AlbumWithSongs {
    #[serde(serialize_with = "serialize_record_id")]
    pub id: RecordId,
    pub title: String,
    pub artist: ArtistSummary,
    #[serde(default)]
    pub cover_image: Option<String>,
    #[serde(default)]
    pub genre: Option<MusicGenre>,
    pub release_date: DateTime<Utc>,
    pub songs: Vec<SongWithArtist>,
}

#[derive(Debug, Serialize, Clone)]
pub struct NewAlbum {
    pub title: String,
    pub artist: RecordId,
    pub cover_image: Option<String>,
    pub genre: Option<MusicGenre>,
    pub release_date: Datetime,
    pub songs: Vec<RecordId>,
    pub created_at: Datetime,
    pub updated_at: Datetime,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct CreateAlbumRequest {
    pub title: String,
    pub cover_image: Option<String>,
    pub genre: Option<MusicGenre>,
    pub release_date: Option<DateTime<Utc>>,
}

#[derive(Debug, Serialize, Clone)]
pub struct AlbumPage {
    pub albums: Vec<AlbumWithArtist>,
    pub pagination: super::pagination::PaginationInfo,
}
