use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};

use crate::{
    middlewares::mw_auth::Ctx,
    models::{
        envelope::ApiResponse,
        playlist::{CreatePlaylistRequest, Playlist, PlaylistWithSongs},
    },
    services::playlist_service::PlaylistService,
    AppState, Result,
};

pub struct PlaylistController;

impl PlaylistController {
    pub async fn create_playlist(
        State(state): State<AppState>,
        ctx: Ctx,
        Json(payload): Json<CreatePlaylistRequest>,
    ) -> Result<(StatusCode, Json<ApiResponse<Playlist>>)> {
        let playlist = PlaylistService::create_playlist(&state.db, &ctx.user.id, payload).await?;
        Ok((StatusCode::CREATED, ApiResponse::ok(playlist)))
    }

    pub async fn get_my_playlists(
        State(state): State<AppState>,
        ctx: Ctx,
    ) -> Result<Json<ApiResponse<Vec<Playlist>>>> {
        let playlists = PlaylistService::list_user_playlists(&state.db, &ctx.user.id).await?;
        Ok(ApiResponse::ok(playlists))
    }

    pub async fn get_public_playlists(
        State(state): State<AppState>,
    ) -> Result<Json<ApiResponse<Vec<Playlist>>>> {
        let playlists = PlaylistService::list_public_playlists(&state.db).await?;
        Ok(ApiResponse::ok(playlists))
    }

    pub async fn get_playlist_with_songs(
        State(state): State<AppState>,
        ctx: Option<Ctx>,
        Path(playlist_id): Path<String>,
    ) -> Result<Json<ApiResponse<PlaylistWithSongs>>> {
        let viewer = ctx.as_ref().map(|ctx| &ctx.user.id);
        let playlist =
            PlaylistService::get_playlist_with_songs(&state.db, &playlist_id, viewer).await?;
        Ok(ApiResponse::ok(playlist))
    }

    pub async fn add_song(
        State(state): State<AppState>,
        ctx: Ctx,
        Path((playlist_id, song_id)): Path<(String, String)>,
    ) -> Result<Json<ApiResponse<Playlist>>> {
        let playlist =
            PlaylistService::add_song(&state.db, &playlist_id, &ctx.user.id, &song_id).await?;
        Ok(ApiResponse::ok(playlist))
    }

    pub async fn remove_song(
        State(state): State<AppState>,
        ctx: Ctx,
        Path((playlist_id, song_id)): Path<(String, String)>,
    ) -> Result<Json<ApiResponse<Playlist>>> {
        let playlist =
            PlaylistService::remove_song(&state.db, &playlist_id, &ctx.user.id, &song_id).await?;
        Ok(ApiResponse::ok(playlist))
    }

    pub async fn delete_playlist(
        State(state): State<AppState>,
        ctx: Ctx,
        Path(playlist_id): Path<String>,
    ) -> Result<Json<ApiResponse<()>>> {
        PlaylistService::delete_playlist(&state.db, &playlist_id, &ctx.user.id).await?;
        Ok(ApiResponse::message("Playlist deleted"))
    }
}
