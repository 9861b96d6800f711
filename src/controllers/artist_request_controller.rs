use axum::{
    extract::{Multipart, Path, Query, State},
    http::StatusCode,
    Json,
};

use crate::{
    middlewares::mw_auth::Ctx,
    models::{
        artist_request::{ArtistRequest, ArtistRequestQuery, StatusChangePayload},
        envelope::ApiResponse,
    },
    services::artist_request_service::ArtistRequestService,
    validators::{artist_request_form::ArtistRequestForm, multipart::MultipartForm},
    AppState, Result,
};

pub struct ArtistRequestController;

impl ArtistRequestController {
    pub async fn create_request(
        State(state): State<AppState>,
        ctx: Ctx,
        multipart: Multipart,
    ) -> Result<(StatusCode, Json<ApiResponse<ArtistRequest>>)> {
        let form = ArtistRequestForm::from_multipart(MultipartForm::read(multipart).await?, true)?;
        let request =
            ArtistRequestService::create_request(&state.db, state.storage.as_ref(), &ctx.user, form)
                .await?;

        Ok((
            StatusCode::CREATED,
            ApiResponse::with_message(request, "Artist request submitted"),
        ))
    }

    pub async fn resubmit_request(
        State(state): State<AppState>,
        ctx: Ctx,
        Path(request_id): Path<String>,
        multipart: Multipart,
    ) -> Result<Json<ApiResponse<ArtistRequest>>> {
        let form = ArtistRequestForm::from_multipart(MultipartForm::read(multipart).await?, false)?;
        let request = ArtistRequestService::resubmit_request(
            &state.db,
            state.storage.as_ref(),
            &ctx.user,
            &request_id,
            form,
        )
        .await?;

        Ok(ApiResponse::with_message(request, "Artist request resubmitted"))
    }

    pub async fn change_status(
        State(state): State<AppState>,
        ctx: Ctx,
        Path(request_id): Path<String>,
        Json(payload): Json<StatusChangePayload>,
    ) -> Result<Json<ApiResponse<ArtistRequest>>> {
        ctx.require_admin()?;
        let request = ArtistRequestService::change_status(&state.db, &request_id, payload).await?;
        Ok(ApiResponse::ok(request))
    }

    pub async fn list_my_requests(
        State(state): State<AppState>,
        ctx: Ctx,
    ) -> Result<Json<ApiResponse<Vec<ArtistRequest>>>> {
        let requests = ArtistRequestService::list_user_requests(&state.db, &ctx.user.id).await?;
        Ok(ApiResponse::ok(requests))
    }

    pub async fn list_requests(
        State(state): State<AppState>,
        ctx: Ctx,
        Query(query): Query<ArtistRequestQuery>,
    ) -> Result<Json<ApiResponse<Vec<ArtistRequest>>>> {
        ctx.require_admin()?;
        let requests = ArtistRequestService::list_requests(&state.db, query.status).await?;
        Ok(ApiResponse::ok(requests))
    }

    pub async fn get_request(
        State(state): State<AppState>,
        ctx: Ctx,
        Path(request_id): Path<String>,
    ) -> Result<Json<ApiResponse<ArtistRequest>>> {
        let request = ArtistRequestService::get_request(&state.db, &request_id, &ctx.user).await?;
        Ok(ApiResponse::ok(request))
    }
}
