pub mod album;
pub mod artist_request;
pub mod playlist;
pub mod song;
pub mod user;

pub mod database_helpers;
pub mod envelope;
pub mod pagination;

pub mod music_genre;
