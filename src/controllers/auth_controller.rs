use axum::{extract::State, http::StatusCode, Json};

use crate::{
    auth::models::{AuthResponse, LoginPayload, RegisterPayload},
    models::envelope::ApiResponse,
    services::auth_service::AuthService,
    AppState, Result,
};

pub struct AuthController;

impl AuthController {
    pub async fn register_handler(
        State(state): State<AppState>,
        Json(payload): Json<RegisterPayload>,
    ) -> Result<(StatusCode, Json<ApiResponse<AuthResponse>>)> {
        let auth = AuthService::register_user(&state.db, &state.auth_config, payload).await?;
        Ok((
            StatusCode::CREATED,
            ApiResponse::with_message(auth, "Registration successful"),
        ))
    }

    pub async fn login_handler(
        State(state): State<AppState>,
        Json(payload): Json<LoginPayload>,
    ) -> Result<Json<ApiResponse<AuthResponse>>> {
        let auth = AuthService::login_user(&state.db, &state.auth_config, payload).await?;
        Ok(ApiResponse::ok(auth))
    }
}
