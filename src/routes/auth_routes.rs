use axum::{routing::post, Router};

use crate::{controllers::auth_controller::AuthController, AppState};

pub struct AuthRoutes;

impl AuthRoutes {
    pub fn routes() -> Router<AppState> {
        Router::new()
            .route("/register", post(AuthController::register_handler))
            .route("/login", post(AuthController::login_handler))
    }
}
