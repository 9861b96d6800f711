use chrono::{Duration, Utc};
use surrealdb::{engine::any::Any, RecordId, Surreal};

use crate::{
    helpers::record_helpers::{SONG_TABLE, USER_TABLE},
    models::{
        music_genre::MusicGenre,
        song::{NewSong, Song},
        user::{NewUser, Role, UserRecord},
    },
};

pub async fn seed_user_with(
    db: &Surreal<Any>,
    username: &str,
    role: Role,
    stage_name: Option<&str>,
) -> UserRecord {
    let mut user = NewUser::listener(
        username.to_string(),
        format!("{username}@example.com"),
        "not-a-real-hash".to_string(),
    );
    user.role = role;
    user.stage_name = stage_name.map(str::to_string);

    db.create(USER_TABLE)
        .content(user)
        .await
        .unwrap()
        .expect("Test user creation returned nothing (None).")
}

pub async fn seed_user(db: &Surreal<Any>, username: &str) -> RecordId {
    seed_user_with(db, username, Role::Listener, None).await.id
}

pub async fn seed_artist(db: &Surreal<Any>, username: &str, stage_name: &str) -> RecordId {
    seed_user_with(db, username, Role::Artist, Some(stage_name))
        .await
        .id
}

pub struct SongSeed {
    artist: RecordId,
    title: String,
    genre: MusicGenre,
    days_ago: i64,
    created_minutes_ago: i64,
    likes: Vec<RecordId>,
}

impl SongSeed {
    pub fn new(artist: &RecordId, title: &str) -> Self {
        Self {
            artist: artist.clone(),
            title: title.to_string(),
            genre: MusicGenre::Pop,
            days_ago: 0,
            created_minutes_ago: 0,
            likes: Vec::new(),
        }
    }

    pub fn genre(mut self, genre: MusicGenre) -> Self {
        self.genre = genre;
        self
    }

    pub fn released_days_ago(mut self, days: i64) -> Self {
        self.days_ago = days;
        self
    }

    pub fn created_minutes_ago(mut self, minutes: i64) -> Self {
        self.created_minutes_ago = minutes;
        self
    }

    pub fn likes(mut self, likes: Vec<RecordId>) -> Self {
        self.likes = likes;
        self
    }
}

pub async fn seed_song(db: &Surreal<Any>, seed: SongSeed) -> Song {
    let released = Utc::now() - Duration::days(seed.days_ago);
    let created = Utc::now() - Duration::minutes(seed.created_minutes_ago);
    let song = NewSong {
        title: seed.title,
        artist: seed.artist,
        genre: seed.genre,
        album: None,
        duration: 180,
        audio_url: "https://cdn.example.com/audio.mp3".to_string(),
        cover_image: "https://cdn.example.com/cover.jpg".to_string(),
        lyrics: None,
        release_date: released.into(),
        plays: 0,
        likes: seed.likes,
        comments: Vec::new(),
        created_at: created.into(),
        updated_at: created.into(),
    };

    db.create(SONG_TABLE)
        .content(song)
        .await
        .unwrap()
        .expect("Test song creation returned nothing (None).")
}
