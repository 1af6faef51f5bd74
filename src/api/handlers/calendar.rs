use axum::{extract::{State, Path, Query}, response::IntoResponse, Json};
use crate::state::AppState;
use crate::api::dtos::{requests::CalendarQuery, responses::CalendarResponse};
use crate::domain::services::calendar::project_month;
use crate::error::AppError;
use std::collections::HashSet;
use std::sync::Arc;
use chrono::{NaiveDate, TimeZone, Utc};
use chrono_tz::Tz;

pub async fn get_calendar(
    State(state): State<Arc<AppState>>,
    Path(property_id): Path<String>,
    Query(query): Query<CalendarQuery>,
) -> Result<impl IntoResponse, AppError> {
    let property = state.property_repo.find_by_id(&property_id).await?
        .ok_or_else(|| AppError::NotFound("Property not found".into()))?;

    let first = NaiveDate::from_ymd_opt(query.year, query.month, 1)
        .ok_or_else(|| AppError::Validation("Invalid year/month".into()))?;
    let next_month = if query.month == 12 {
        NaiveDate::from_ymd_opt(query.year + 1, 1, 1)
    } else {
        NaiveDate::from_ymd_opt(query.year, query.month + 1, 1)
    }
        .ok_or_else(|| AppError::Validation("Invalid year/month".into()))?;

    let tz: Tz = property.timezone.parse()
        .map_err(|_| AppError::Validation(format!("Property has invalid timezone: {}", property.timezone)))?;

    let month_start = tz.from_local_datetime(&first.and_hms_opt(0, 0, 0).unwrap())
        .earliest()
        .ok_or_else(|| AppError::Validation("Unrepresentable month start".into()))?
        .with_timezone(&Utc);
    let month_end = tz.from_local_datetime(&next_month.and_hms_opt(0, 0, 0).unwrap())
        .earliest()
        .ok_or_else(|| AppError::Validation("Unrepresentable month end".into()))?
        .with_timezone(&Utc);

    let slots = state.slot_repo.list_by_range(&property_id, month_start, month_end).await?;
    let confirmed: HashSet<String> = state.booking_repo.find_confirmed_slot_ids(&property_id).await?
        .into_iter()
        .collect();

    let calendar = project_month(&property, query.year, query.month, &slots, &confirmed)?;

    Ok(Json(CalendarResponse {
        property_id,
        year: query.year,
        month: query.month,
        calendar,
    }))
}
