use crate::error::Result;
use crate::model::{ShortenRequest, ShortenResponse};
use crate::state::AppState;
use axum::extract::{Path, State};
use axum::http::header::LOCATION;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use tinylink_core::ShortenParams;

pub async fn shorten_handler(
    State(state): State<AppState>,
    Json(request): Json<ShortenRequest>,
) -> Result<Json<ShortenResponse>> {
    let params = ShortenParams::try_from(request)?;
    let link = state.shortener.shorten(params).await?;
    Ok(Json(link.into()))
}

pub async fn resolve_handler(
    State(state): State<AppState>,
    Path(code): Path<String>,
) -> Result<impl IntoResponse> {
    let url = state.redirector.resolve(&code).await?;
    Ok((StatusCode::FOUND, [(LOCATION, url)]))
}
