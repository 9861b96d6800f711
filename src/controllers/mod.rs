pub mod album_controller;
pub mod artist_request_controller;
pub mod auth_controller;
pub mod playlist_controller;
pub mod song_controller;
pub mod user_controller;
