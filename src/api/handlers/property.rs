use axum::{extract::{State, Path}, http::StatusCode, response::IntoResponse, Json};
use crate::state::AppState;
use crate::api::extractors::auth::AuthUser;
use crate::api::dtos::requests::CreatePropertyRequest;
use crate::domain::models::property::Property;
use crate::error::AppError;
use std::sync::Arc;
use chrono_tz::Tz;
use tracing::info;

pub async fn create_property(
    State(state): State<Arc<AppState>>,
    AuthUser(user): AuthUser,
    Json(payload): Json<CreatePropertyRequest>,
) -> Result<impl IntoResponse, AppError> {
    if payload.hourly_rate <= 0 {
        return Err(AppError::Validation("hourly_rate must be positive".into()));
    }
    if payload.timezone.parse::<Tz>().is_err() {
        return Err(AppError::Validation("Invalid timezone".into()));
    }

    let property = Property::new(
        user.id.clone(),
        payload.name,
        payload.location,
        payload.hourly_rate,
        payload.timezone,
    );

    let created = state.property_repo.create(&property).await?;
    info!("Property created: {} by provider {}", created.id, user.id);
    Ok((StatusCode::CREATED, Json(created)))
}

pub async fn get_property(
    State(state): State<Arc<AppState>>,
    Path(property_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let property = state.property_repo.find_by_id(&property_id).await?
        .ok_or_else(|| AppError::NotFound("Property not found".into()))?;
    Ok(Json(property))
}

pub async fn list_my_properties(
    State(state): State<Arc<AppState>>,
    AuthUser(user): AuthUser,
) -> Result<impl IntoResponse, AppError> {
    let properties = state.property_repo.list_by_provider(&user.id).await?;
    Ok(Json(properties))
}
