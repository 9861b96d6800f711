use axum::{
    routing::{get, post},
    Router,
};

use crate::{controllers::playlist_controller::PlaylistController, AppState};

pub struct PlaylistRoutes;

impl PlaylistRoutes {
    pub fn routes() -> Router<AppState> {
        Router::new()
            .route(
                "/",
                get(PlaylistController::get_public_playlists)
                    .post(PlaylistController::create_playlist),
            )
            .route("/me", get(PlaylistController::get_my_playlists))
            .route(
                "/{playlist_id}",
                get(PlaylistController::get_playlist_with_songs)
                    .delete(PlaylistController::delete_playlist),
            )
            .route(
                "/{playlist_id}/songs/{song_id}",
                post(PlaylistController::add_song).delete(PlaylistController::remove_song),
            )
    }
}
