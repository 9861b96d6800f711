pub mod album_service;
pub mod artist_request_service;
pub mod auth_service;
pub mod playlist_service;
pub mod song_query;
pub mod song_service;
pub mod storage_service;
pub mod user_service;
