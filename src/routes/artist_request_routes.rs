use axum::{
    routing::{get, put},
    Router,
};

use crate::{controllers::artist_request_controller::ArtistRequestController, AppState};

pub struct ArtistRequestRoutes;

impl ArtistRequestRoutes {
    pub fn routes() -> Router<AppState> {
        Router::new()
            .route(
                "/",
                get(ArtistRequestController::list_requests)
                    .post(ArtistRequestController::create_request),
            )
            .route("/me", get(ArtistRequestController::list_my_requests))
            .route(
                "/{request_id}",
                get(ArtistRequestController::get_request)
                    .put(ArtistRequestController::resubmit_request),
            )
            .route(
                "/{request_id}/status",
                put(ArtistRequestController::change_status),
            )
    }
}
