use axum::{extract::{State, Path, Query}, http::StatusCode, response::IntoResponse, Json};
use crate::state::AppState;
use crate::api::extractors::auth::AuthUser;
use crate::api::dtos::{
    requests::{BookingListQuery, ClaimSlotRequest, ConfirmPaymentRequest},
    responses::ClaimResponse,
};
use crate::error::AppError;
use std::sync::Arc;

pub async fn claim_slot(
    State(state): State<Arc<AppState>>,
    AuthUser(user): AuthUser,
    Path((property_id, slot_id)): Path<(String, String)>,
    Json(payload): Json<ClaimSlotRequest>,
) -> Result<impl IntoResponse, AppError> {
    let outcome = state.booking_engine
        .claim_slot(&user, &property_id, &slot_id, payload.special_requests)
        .await?;

    Ok((StatusCode::CREATED, Json(ClaimResponse {
        booking: outcome.booking,
        client_secret: outcome.client_secret,
    })))
}

pub async fn confirm_payment(
    State(state): State<Arc<AppState>>,
    _user: AuthUser,
    Path(booking_id): Path<String>,
    Json(payload): Json<ConfirmPaymentRequest>,
) -> Result<impl IntoResponse, AppError> {
    let booking = state.booking_engine
        .confirm_payment(&booking_id, &payload.payment_reference)
        .await?;
    Ok(Json(booking))
}

pub async fn cancel_booking(
    State(state): State<Arc<AppState>>,
    AuthUser(user): AuthUser,
    Path(booking_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let booking = state.booking_engine.cancel_booking(&user, &booking_id).await?;
    Ok(Json(booking))
}

pub async fn list_bookings(
    State(state): State<Arc<AppState>>,
    AuthUser(user): AuthUser,
    Query(query): Query<BookingListQuery>,
) -> Result<impl IntoResponse, AppError> {
    let bookings = state.booking_repo.list_by_user(&user.id, query.status.as_deref()).await?;
    Ok(Json(bookings))
}

pub async fn get_booking(
    State(state): State<Arc<AppState>>,
    AuthUser(user): AuthUser,
    Path(booking_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let booking = state.booking_repo.find_by_id(&booking_id).await?
        .ok_or(AppError::BookingNotFound)?;

    if booking.user_id != user.id {
        // The property's provider keeps read access to its bookings.
        let property = state.property_repo.find_by_id(&booking.property_id).await?
            .ok_or(AppError::BookingNotFound)?;
        if property.provider_id != user.id {
            return Err(AppError::BookingNotFound);
        }
    }

    Ok(Json(booking))
}
