use axum::{extract::{State, Path}, http::StatusCode, response::IntoResponse, Json};
use crate::state::AppState;
use crate::api::dtos::{requests::CreateBookingRequest, responses::EventBookingsResponse};
use crate::error::AppError;
use std::sync::Arc;
use tracing::info;

pub async fn create_booking(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<CreateBookingRequest>,
) -> Result<impl IntoResponse, AppError> {
    info!("create_booking: event {}", payload.event_id);
    let booking = state.booking_service.create_booking(payload.into()).await?;
    Ok((StatusCode::CREATED, Json(booking)))
}

pub async fn list_bookings(
    State(state): State<Arc<AppState>>,
    Path(slug): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let bookings = state.booking_service.list_bookings_for_event(&slug).await?;
    Ok(Json(EventBookingsResponse { count: bookings.len() as i64, bookings }))
}
