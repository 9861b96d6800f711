pub mod album_routes;
pub mod artist_request_routes;
pub mod auth_routes;
pub mod playlist_routes;
pub mod song_routes;
pub mod user_routes;
