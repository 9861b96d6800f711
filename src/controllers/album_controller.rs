use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};

use crate::{
    middlewares::mw_auth::Ctx,
    models::{
        album::{Album, AlbumPage, AlbumWithSongs, CreateAlbumRequest},
        envelope::ApiResponse,
        pagination::PaginationQuery,
        user::Role,
    },
    services::album_service::AlbumService,
    AppState, Result,
};

pub struct AlbumController;

impl AlbumController {
    pub async fn create_album(
        State(state): State<AppState>,
        ctx: Ctx,
        Json(payload): Json<CreateAlbumRequest>,
    ) -> Result<(StatusCode, Json<ApiResponse<Album>>)> {
        ctx.require_role(&[Role::Artist, Role::Admin])?;
        let album = AlbumService::create_album(&state.db, &ctx.user, payload).await?;
        Ok((StatusCode::CREATED, ApiResponse::ok(album)))
    }

    pub async fn get_albums(
        State(state): State<AppState>,
        Query(query): Query<PaginationQuery>,
    ) -> Result<Json<ApiResponse<AlbumPage>>> {
        let page = AlbumService::list_albums(&state.db, query.page_request()).await?;
        Ok(ApiResponse::ok(page))
    }

    pub async fn get_album(
        State(state): State<AppState>,
        Path(album_id): Path<String>,
    ) -> Result<Json<ApiResponse<AlbumWithSongs>>> {
        let album = AlbumService::get_album(&state.db, &album_id).await?;
        Ok(ApiResponse::ok(album))
    }

    pub async fn add_song(
        State(state): State<AppState>,
        ctx: Ctx,
        Path((album_id, song_id)): Path<(String, String)>,
    ) -> Result<Json<ApiResponse<Album>>> {
        let album = AlbumService::add_song(&state.db, &album_id, &ctx.user, &song_id).await?;
        Ok(ApiResponse::ok(album))
    }
}
