use axum::{
    routing::{get, post},
    Router,
};

use crate::{controllers::song_controller::SongController, AppState};

pub struct SongRoutes;

impl SongRoutes {
    pub fn routes() -> Router<AppState> {
        Router::new()
            .route(
                "/",
                get(SongController::list_songs).post(SongController::create_song),
            )
            .route("/search", get(SongController::search_songs))
            .route("/genres", get(SongController::get_genres))
            .route("/trending", get(SongController::get_trending))
            .route(
                "/artist/{artist_id}",
                get(SongController::list_artist_songs),
            )
            .route(
                "/{song_id}",
                get(SongController::get_song)
                    .put(SongController::update_song)
                    .delete(SongController::delete_song),
            )
            .route("/{song_id}/like", post(SongController::toggle_like))
            .route("/{song_id}/comments", post(SongController::add_comment))
    }
}
