use axum::{
    extract::{Multipart, Path, Query, State},
    http::StatusCode,
    Json,
};

use crate::{
    middlewares::mw_auth::Ctx,
    models::{
        envelope::ApiResponse,
        pagination::PaginationQuery,
        song::{CommentPayload, SongPage, SongWithArtist, UpdateSongRequest},
        user::Role,
    },
    services::{song_query::SongSearchParams, song_service::SongService},
    validators::{multipart::MultipartForm, song_form::CreateSongForm},
    AppState, Result,
};

pub struct SongController;

impl SongController {
    /// `GET /api/songs/search?title=&artist=&genre=&page=&limit=`. Repeated
    /// `genre` keys (or `genre[]`) match any of the listed genres exactly.
    pub async fn search_songs(
        State(state): State<AppState>,
        Query(pairs): Query<Vec<(String, String)>>,
    ) -> Result<Json<ApiResponse<SongPage>>> {
        let params = SongSearchParams::from_query_pairs(&pairs);
        let page = SongService::search(&state.db, &params).await?;
        Ok(ApiResponse::ok(page))
    }

    pub async fn list_songs(
        State(state): State<AppState>,
        Query(query): Query<PaginationQuery>,
    ) -> Result<Json<ApiResponse<SongPage>>> {
        let page = SongService::list_songs(&state.db, query.page_request()).await?;
        Ok(ApiResponse::ok(page))
    }

    pub async fn list_artist_songs(
        State(state): State<AppState>,
        Path(artist_id): Path<String>,
        Query(query): Query<PaginationQuery>,
    ) -> Result<Json<ApiResponse<SongPage>>> {
        let page =
            SongService::list_artist_songs(&state.db, &artist_id, query.page_request()).await?;
        Ok(ApiResponse::ok(page))
    }

    pub async fn get_genres(
        State(state): State<AppState>,
    ) -> Result<Json<ApiResponse<Vec<String>>>> {
        let genres = SongService::get_genres(&state.db).await?;
        Ok(ApiResponse::ok(genres))
    }

    pub async fn get_trending(
        State(state): State<AppState>,
    ) -> Result<Json<ApiResponse<Vec<SongWithArtist>>>> {
        let songs = SongService::get_trending(&state.db).await?;
        Ok(ApiResponse::ok(songs))
    }

    pub async fn get_song(
        State(state): State<AppState>,
        Path(song_id): Path<String>,
    ) -> Result<Json<ApiResponse<SongWithArtist>>> {
        let song = SongService::play_song(&state.db, &song_id).await?;
        Ok(ApiResponse::ok(song))
    }

    pub async fn create_song(
        State(state): State<AppState>,
        ctx: Ctx,
        multipart: Multipart,
    ) -> Result<(StatusCode, Json<ApiResponse<SongWithArtist>>)> {
        ctx.require_role(&[Role::Artist, Role::Admin])?;

        let form = CreateSongForm::from_multipart(MultipartForm::read(multipart).await?)?;
        let song =
            SongService::create_song(&state.db, state.storage.as_ref(), &ctx.user, form).await?;

        Ok((
            StatusCode::CREATED,
            ApiResponse::with_message(song, "Song uploaded successfully"),
        ))
    }

    pub async fn update_song(
        State(state): State<AppState>,
        ctx: Ctx,
        Path(song_id): Path<String>,
        Json(changes): Json<UpdateSongRequest>,
    ) -> Result<Json<ApiResponse<SongWithArtist>>> {
        let song = SongService::update_song(&state.db, &song_id, &ctx.user, changes).await?;
        Ok(ApiResponse::ok(song))
    }

    pub async fn delete_song(
        State(state): State<AppState>,
        ctx: Ctx,
        Path(song_id): Path<String>,
    ) -> Result<Json<ApiResponse<()>>> {
        SongService::delete_song(&state.db, state.storage.as_ref(), &song_id, &ctx.user).await?;
        Ok(ApiResponse::message("Song deleted"))
    }

    pub async fn toggle_like(
        State(state): State<AppState>,
        ctx: Ctx,
        Path(song_id): Path<String>,
    ) -> Result<Json<ApiResponse<SongWithArtist>>> {
        let song = SongService::toggle_like(&state.db, &song_id, &ctx.user.id).await?;
        Ok(ApiResponse::ok(song))
    }

    pub async fn add_comment(
        State(state): State<AppState>,
        ctx: Ctx,
        Path(song_id): Path<String>,
        Json(payload): Json<CommentPayload>,
    ) -> Result<(StatusCode, Json<ApiResponse<SongWithArtist>>)> {
        let song = SongService::add_comment(&state.db, &song_id, &ctx.user.id, &payload.text).await?;
        Ok((StatusCode::CREATED, ApiResponse::ok(song)))
    }
}
