use axum::{
    routing::{get, post},
    Router,
};

use crate::{controllers::album_controller::AlbumController, AppState};

pub struct AlbumRoutes;

impl AlbumRoutes {
    pub fn routes() -> Router<AppState> {
        Router::new()
            .route(
                "/",
                get(AlbumController::get_albums).post(AlbumController::create_album),
            )
            .route("/{album_id}", get(AlbumController::get_album))
            .route(
                "/{album_id}/songs/{song_id}",
                post(AlbumController::add_song),
            )
    }
}
