use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};

use crate::{
    error::{Error, Result},
    models::music_genre::MusicGenre,
    validators::multipart::{MultipartForm, UploadedFile},
};

pub const MAX_TITLE_LEN: usize = 200;

/// Typed `POST /api/songs` body.
#[derive(Debug, Clone)]
pub struct CreateSongForm {
    pub title: String,
    pub genre: MusicGenre,
    pub duration: u32,
    pub album: Option<String>,
    pub lyrics: Option<String>,
    pub release_date: Option<DateTime<Utc>>,
    pub audio_file: UploadedFile,
    pub cover_image: UploadedFile,
}

impl CreateSongForm {
    pub fn from_multipart(mut form: MultipartForm) -> Result<Self> {
        let mut messages = Vec::new();

        let title = form.text("title");
        match &title {
            None => messages.push("Title is required".to_string()),
            Some(t) if t.chars().count() > MAX_TITLE_LEN => {
                messages.push(format!("Title must be at most {MAX_TITLE_LEN} characters"))
            }
            Some(_) => {}
        }

        let genre = match form.text("genre") {
            None => {
                messages.push("Genre is required".to_string());
                None
            }
            Some(raw) => match parse_genre(&raw) {
                Ok(genre) => Some(genre),
                Err(message) => {
                    messages.push(message);
                    None
                }
            },
        };

        let duration = match form.text("duration") {
            None => {
                messages.push("Duration is required".to_string());
                None
            }
            Some(raw) => match parse_duration(&raw) {
                Some(d) => Some(d),
                None => {
                    messages.push("Duration must be a non-negative number of seconds".to_string());
                    None
                }
            },
        };

        let release_date = match form.text("releaseDate") {
            None => None,
            Some(raw) => match parse_date(&raw) {
                Some(date) => Some(date),
                None => {
                    messages.push("Release date must be an ISO 8601 date".to_string());
                    None
                }
            },
        };

        let audio_file = form.take_file("audioFile");
        match &audio_file {
            None => messages.push("Audio file is required".to_string()),
            Some(f) if !f.is_audio() => messages.push("Audio file must be an audio file".to_string()),
            Some(_) => {}
        }

        let cover_image = form.take_file("coverImage");
        match &cover_image {
            None => messages.push("Cover image is required".to_string()),
            Some(f) if !f.is_image() => messages.push("Cover image must be an image".to_string()),
            Some(_) => {}
        }

        match (title, genre, duration, audio_file, cover_image) {
            (Some(title), Some(genre), Some(duration), Some(audio_file), Some(cover_image))
                if messages.is_empty() =>
            {
                Ok(Self {
                    title,
                    genre,
                    duration,
                    album: form.text("album"),
                    lyrics: form.text("lyrics"),
                    release_date,
                    audio_file,
                    cover_image,
                })
            }
            _ => Err(Error::Validation { messages }),
        }
    }
}

pub fn parse_genre(raw: &str) -> core::result::Result<MusicGenre, String> {
    MusicGenre::from_str(raw).map_err(|_| {
        format!(
            "Genre must be one of: {}",
            MusicGenre::all_names().join(", ")
        )
    })
}

/// Whole or fractional seconds; fractions are rounded.
pub fn parse_duration(raw: &str) -> Option<u32> {
    let seconds: f64 = raw.parse().ok()?;
    if seconds.is_finite() && seconds >= 0.0 && seconds <= f64::from(u32::MAX) {
        Some(seconds.round() as u32)
    } else {
        None
    }
}

/// RFC 3339 timestamp or a plain `YYYY-MM-DD` date (midnight UTC).
pub fn parse_date(raw: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|dt| dt.and_utc())
}
