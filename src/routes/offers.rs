//! Offer session handlers
//!
//! Each request locks its session for the whole operation, so edits to one
//! offer are applied one at a time.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use chrono::{Datelike, Utc};
use uuid::Uuid;

use crate::cache::SharedSession;
use crate::error::{AppError, Result};
use crate::offer::{ItemCommand, OfferDocument, OfferSession};
use crate::pricing::Week;
use crate::AppState;

use super::requests::{
    AddItemRequest, CreateOfferRequest, SaveOfferRequest, SetFrequencyRequest, SetOfferTypeRequest,
    WeekQuery,
};
use super::responses::{OfferResponse, SummaryResponse};

async fn find_session(state: &AppState, id: Uuid) -> Result<SharedSession> {
    state
        .sessions
        .get(&id)
        .await
        .ok_or_else(|| AppError::NotFound(format!("Offer {}", id)))
}

/// Explicit week, or the current ISO week
fn resolve_week(week: Option<u8>) -> Result<Week> {
    match week {
        Some(week) => Week::new(week).map_err(|e| AppError::BadRequest(e.to_string())),
        None => Ok(Week::from_iso(Utc::now().iso_week().week())),
    }
}

pub async fn create_offer(
    State(state): State<AppState>,
    Json(req): Json<CreateOfferRequest>,
) -> Result<(StatusCode, Json<OfferResponse>)> {
    let mut session = OfferSession::new(req.offer_type);
    if let Some(frequency) = req.frequency {
        session.set_offer_frequency(&state.pricing_context(), frequency)?;
    }
    let shared = state.sessions.open(session).await;
    let session = shared.lock().await;
    Ok((StatusCode::CREATED, Json(OfferResponse::new(&session))))
}

pub async fn get_offer(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<OfferResponse>> {
    let shared = find_session(&state, id).await?;
    let session = shared.lock().await;
    Ok(Json(OfferResponse::new(&session)))
}

/// Close the session and drop it from the cache
pub async fn close_offer(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode> {
    let shared = state
        .sessions
        .remove(&id)
        .await
        .ok_or_else(|| AppError::NotFound(format!("Offer {}", id)))?;
    shared.lock().await.close();
    Ok(StatusCode::NO_CONTENT)
}

pub async fn set_offer_type(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(req): Json<SetOfferTypeRequest>,
) -> Result<Json<OfferResponse>> {
    let shared = find_session(&state, id).await?;
    let mut session = shared.lock().await;
    session.set_offer_type(req.offer_type)?;
    Ok(Json(OfferResponse::new(&session)))
}

pub async fn set_frequency(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(req): Json<SetFrequencyRequest>,
) -> Result<Json<OfferResponse>> {
    let shared = find_session(&state, id).await?;
    let mut session = shared.lock().await;
    let repriced = session.set_offer_frequency(&state.pricing_context(), req.frequency)?;
    let mut response = OfferResponse::new(&session);
    response.repriced_items = Some(repriced);
    Ok(Json(response))
}

pub async fn add_item(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(req): Json<AddItemRequest>,
) -> Result<(StatusCode, Json<OfferResponse>)> {
    let shared = find_session(&state, id).await?;
    let mut session = shared.lock().await;
    session.add_item(req.list)?;
    Ok((StatusCode::CREATED, Json(OfferResponse::new(&session))))
}

pub async fn update_item(
    State(state): State<AppState>,
    Path((id, item_id)): Path<(Uuid, u32)>,
    Json(command): Json<ItemCommand>,
) -> Result<Json<OfferResponse>> {
    let shared = find_session(&state, id).await?;
    let mut session = shared.lock().await;
    tracing::debug!("Offer {} item {}: {:?}", id, item_id, command);
    session.apply(&state.pricing_context(), item_id, command)?;
    Ok(Json(OfferResponse::new(&session)))
}

pub async fn remove_item(
    State(state): State<AppState>,
    Path((id, item_id)): Path<(Uuid, u32)>,
) -> Result<Json<OfferResponse>> {
    let shared = find_session(&state, id).await?;
    let mut session = shared.lock().await;
    session.remove_item(item_id)?;
    Ok(Json(OfferResponse::new(&session)))
}

pub async fn next_step(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<OfferResponse>> {
    let shared = find_session(&state, id).await?;
    let mut session = shared.lock().await;
    session.next(&state.pricing_context())?;
    Ok(Json(OfferResponse::new(&session)))
}

pub async fn previous_step(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<OfferResponse>> {
    let shared = find_session(&state, id).await?;
    let mut session = shared.lock().await;
    session.back()?;
    Ok(Json(OfferResponse::new(&session)))
}

pub async fn summary(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Query(query): Query<WeekQuery>,
) -> Result<Json<SummaryResponse>> {
    let week = resolve_week(query.week)?;
    let shared = find_session(&state, id).await?;
    let session = shared.lock().await;
    Ok(Json(SummaryResponse {
        week,
        summary: session.summary(week),
    }))
}

/// Build the hand-off document, close the session and drop it from the cache
pub async fn save_offer(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(req): Json<SaveOfferRequest>,
) -> Result<Json<OfferDocument>> {
    let week = resolve_week(req.week)?;
    let shared = find_session(&state, id).await?;
    let document = shared
        .lock()
        .await
        .finalize(req.company.as_deref(), week, Utc::now())?;
    state.sessions.remove(&id).await;
    Ok(Json(document))
}
