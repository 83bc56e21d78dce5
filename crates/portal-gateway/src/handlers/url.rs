use crate::error::{AppError, Result};
use crate::model::{ShortenRequestBody, ShortenResponseBody};
use crate::state::AppState;
use axum::extract::rejection::JsonRejection;
use axum::extract::{ConnectInfo, Path, State};
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use std::net::SocketAddr;
use tracing::warn;

pub async fn shorten_handler(
    State(state): State<AppState>,
    ConnectInfo(peer): ConnectInfo<SocketAddr>,
    payload: std::result::Result<Json<ShortenRequestBody>, JsonRejection>,
) -> Result<Json<ShortenResponseBody>> {
    let client = peer.ip().to_string();

    let Json(body) = payload.map_err(|e| {
        warn!(client = %client, error = %e, "rejected: malformed request body");
        AppError::MalformedBody
    })?;

    let shortened = state.shortener().shorten(&client, body.into()).await?;
    Ok(Json(shortened.into()))
}

pub async fn resolve_handler(
    State(state): State<AppState>,
    ConnectInfo(peer): ConnectInfo<SocketAddr>,
    Path(short): Path<String>,
) -> Result<Response> {
    let client = peer.ip().to_string();
    let target = state.redirector().resolve(&client, &short).await?;
    Ok((StatusCode::MOVED_PERMANENTLY, [(header::LOCATION, target)]).into_response())
}
