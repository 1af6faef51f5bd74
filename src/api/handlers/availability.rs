use axum::{extract::{State, Path, Query}, http::StatusCode, response::IntoResponse, Json};
use crate::state::AppState;
use crate::api::extractors::auth::AuthUser;
use crate::api::dtos::{
    requests::{AvailabilityQuery, CreateSlotRequest, RecurringAvailabilityRequest, UpdateSlotRequest},
    responses::GenerationResponse,
};
use crate::domain::models::{property::Property, recurrence::RecurrenceRule, slot::Slot, user::Principal};
use crate::domain::services::availability::expand_rule;
use crate::error::AppError;
use std::sync::Arc;
use chrono::{NaiveDate, NaiveTime};
use tracing::info;

async fn owned_property(state: &AppState, property_id: &str, user: &Principal) -> Result<Property, AppError> {
    let property = state.property_repo.find_by_id(property_id).await?
        .ok_or_else(|| AppError::NotFound("Property not found".into()))?;
    if property.provider_id != user.id {
        return Err(AppError::Forbidden("Unauthorized to manage this property".into()));
    }
    Ok(property)
}

pub async fn create_slot(
    State(state): State<Arc<AppState>>,
    AuthUser(user): AuthUser,
    Path(property_id): Path<String>,
    Json(payload): Json<CreateSlotRequest>,
) -> Result<impl IntoResponse, AppError> {
    owned_property(&state, &property_id, &user).await?;

    if payload.end_time <= payload.start_time {
        return Err(AppError::Validation("end_time must be after start_time".into()));
    }

    let slot = Slot::new(property_id.clone(), payload.start_time, payload.end_time, payload.price_override);
    let created = state.slot_repo.create(&slot).await?;
    info!("Slot created: {} for property {}", created.id, property_id);
    Ok((StatusCode::CREATED, Json(created)))
}

pub async fn list_availability(
    State(state): State<Arc<AppState>>,
    Path(property_id): Path<String>,
    Query(query): Query<AvailabilityQuery>,
) -> Result<impl IntoResponse, AppError> {
    state.property_repo.find_by_id(&property_id).await?
        .ok_or_else(|| AppError::NotFound("Property not found".into()))?;

    let slots = match (query.start, query.end) {
        (Some(start), Some(end)) => state.slot_repo.list_by_range(&property_id, start, end).await?,
        _ => state.slot_repo.list_by_property(&property_id).await?,
    };
    Ok(Json(slots))
}

pub async fn update_slot(
    State(state): State<Arc<AppState>>,
    AuthUser(user): AuthUser,
    Path((property_id, slot_id)): Path<(String, String)>,
    Json(payload): Json<UpdateSlotRequest>,
) -> Result<impl IntoResponse, AppError> {
    owned_property(&state, &property_id, &user).await?;

    let mut slot = state.slot_repo.find_by_id(&property_id, &slot_id).await?
        .ok_or_else(|| AppError::NotFound("Slot not found".into()))?;

    if let Some(status) = payload.status {
        match status.as_str() {
            "AVAILABLE" | "BOOKED" => slot.status = status,
            _ => return Err(AppError::Validation("Invalid slot status".into())),
        }
    }
    if let Some(price) = payload.price_override {
        slot.price_override = Some(price);
    }

    let updated = state.slot_repo.update(&slot).await?;
    info!("Slot updated: {} for property {}", updated.id, property_id);
    Ok(Json(updated))
}

pub async fn generate_recurring(
    State(state): State<Arc<AppState>>,
    AuthUser(user): AuthUser,
    Path(property_id): Path<String>,
    Json(payload): Json<RecurringAvailabilityRequest>,
) -> Result<impl IntoResponse, AppError> {
    let property = owned_property(&state, &property_id, &user).await?;

    let start_date = NaiveDate::parse_from_str(&payload.start_date, "%Y-%m-%d")
        .map_err(|_| AppError::Validation("Invalid start_date format (YYYY-MM-DD)".into()))?;
    let end_date = NaiveDate::parse_from_str(&payload.end_date, "%Y-%m-%d")
        .map_err(|_| AppError::Validation("Invalid end_date format (YYYY-MM-DD)".into()))?;
    let daily_start_time = NaiveTime::parse_from_str(&payload.daily_start_time, "%H:%M")
        .map_err(|_| AppError::Validation("Invalid daily_start_time format (HH:MM)".into()))?;
    let daily_end_time = NaiveTime::parse_from_str(&payload.daily_end_time, "%H:%M")
        .map_err(|_| AppError::Validation("Invalid daily_end_time format (HH:MM)".into()))?;

    let rule = RecurrenceRule {
        start_date,
        end_date,
        daily_start_time,
        daily_end_time,
        days_of_week: payload.days_of_week,
        price_override: payload.price_override,
    };

    let expanded = expand_rule(&property, &rule)?;
    let report = state.slot_repo.insert_batch(&expanded.candidates).await?;

    info!(
        "Recurring availability for property {}: {} created, {} rejected",
        property_id,
        report.created.len(),
        report.rejected + expanded.skipped
    );

    Ok((StatusCode::CREATED, Json(GenerationResponse {
        created: report.created.len(),
        rejected: report.rejected + expanded.skipped,
        slots: report.created,
    })))
}
