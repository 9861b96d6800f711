use axum::{
    extract::{Path, Query, State},
    Json,
};

use crate::{
    middlewares::mw_auth::Ctx,
    models::{
        envelope::ApiResponse,
        pagination::PaginationQuery,
        user::{ChangeRolePayload, PublicProfile, UpdateProfileRequest, UserPage, UserRecord},
    },
    services::user_service::UserService,
    AppState, Result,
};

pub struct UserController;

impl UserController {
    pub async fn get_me(ctx: Ctx) -> Result<Json<ApiResponse<UserRecord>>> {
        Ok(ApiResponse::ok(ctx.user))
    }

    pub async fn update_me(
        State(state): State<AppState>,
        ctx: Ctx,
        Json(request): Json<UpdateProfileRequest>,
    ) -> Result<Json<ApiResponse<UserRecord>>> {
        let user = UserService::update_profile(&state.db, &ctx.user.id, request).await?;
        Ok(ApiResponse::with_message(user, "Profile updated"))
    }

    pub async fn get_user(
        State(state): State<AppState>,
        Path(user_id): Path<String>,
    ) -> Result<Json<ApiResponse<PublicProfile>>> {
        let profile = UserService::get_public_profile(&state.db, &user_id).await?;
        Ok(ApiResponse::ok(profile))
    }

    pub async fn toggle_favorite_song(
        State(state): State<AppState>,
        ctx: Ctx,
        Path(song_id): Path<String>,
    ) -> Result<Json<ApiResponse<UserRecord>>> {
        let user = UserService::toggle_favorite_song(&state.db, &ctx.user.id, &song_id).await?;
        Ok(ApiResponse::ok(user))
    }

    pub async fn toggle_favorite_artist(
        State(state): State<AppState>,
        ctx: Ctx,
        Path(artist_id): Path<String>,
    ) -> Result<Json<ApiResponse<UserRecord>>> {
        let user = UserService::toggle_favorite_artist(&state.db, &ctx.user.id, &artist_id).await?;
        Ok(ApiResponse::ok(user))
    }

    pub async fn list_users(
        State(state): State<AppState>,
        ctx: Ctx,
        Query(query): Query<PaginationQuery>,
    ) -> Result<Json<ApiResponse<UserPage>>> {
        ctx.require_admin()?;
        let page = UserService::list_users(&state.db, query.page_request()).await?;
        Ok(ApiResponse::ok(page))
    }

    pub async fn change_role(
        State(state): State<AppState>,
        ctx: Ctx,
        Path(user_id): Path<String>,
        Json(payload): Json<ChangeRolePayload>,
    ) -> Result<Json<ApiResponse<UserRecord>>> {
        ctx.require_admin()?;
        let user = UserService::change_role(&state.db, &user_id, payload.role).await?;
        Ok(ApiResponse::ok(user))
    }
}
