use axum::{
    routing::{get, post, put},
    Router,
};

use crate::{controllers::user_controller::UserController, AppState};

pub struct UserRoutes;

impl UserRoutes {
    pub fn routes() -> Router<AppState> {
        Router::new()
            .route("/", get(UserController::list_users))
            .route(
                "/me",
                get(UserController::get_me).put(UserController::update_me),
            )
            .route(
                "/me/favorites/songs/{song_id}",
                post(UserController::toggle_favorite_song),
            )
            .route(
                "/me/favorites/artists/{artist_id}",
                post(UserController::toggle_favorite_artist),
            )
            .route("/{user_id}", get(UserController::get_user))
            .route("/{user_id}/role", put(UserController::change_role))
    }
}
