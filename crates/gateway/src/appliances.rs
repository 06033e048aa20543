//! `/api/appliances` routes.

use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use ecowatt_core::error::StoreError;
use ecowatt_core::record::{Appliance, NewAppliance};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::SharedState;
use crate::error::ApiError;

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ConnectApplianceRequest {
    pub name: Option<String>,
    pub brand: Option<String>,
    #[serde(rename = "deviceID")]
    pub device_id: Option<String>,
    pub user_id: Option<String>,
    pub power_consumption: Option<f64>,
    pub usage_hours: Option<f64>,
    pub status: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ConnectApplianceResponse {
    pub message: &'static str,
    pub appliance: Appliance,
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: &'static str,
}

fn required(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

pub async fn list_handler(
    State(state): State<SharedState>,
    Path(user_id): Path<String>,
) -> Result<Json<Vec<Appliance>>, ApiError> {
    let appliances = state
        .store
        .list_appliances(&user_id)
        .await
        .map_err(|e| ApiError::store("Error fetching appliances", e))?;
    Ok(Json(appliances))
}

pub async fn connect_handler(
    State(state): State<SharedState>,
    payload: Result<Json<ConnectApplianceRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<ConnectApplianceResponse>), ApiError> {
    let Json(req) = payload?;
    let (Some(name), Some(brand), Some(device_id), Some(user_id)) = (
        required(req.name),
        required(req.brand),
        required(req.device_id),
        required(req.user_id),
    ) else {
        return Err(ApiError::bad_request("All fields are required"));
    };

    let appliance = state
        .store
        .add_appliance(NewAppliance {
            user_id,
            name,
            brand,
            device_id,
            power_consumption: req.power_consumption.unwrap_or(0.0),
            usage_hours: req.usage_hours.unwrap_or(0.0),
            status: required(req.status),
        })
        .await
        .map_err(|e| match e {
            StoreError::MissingReference(_) => ApiError::not_found("User not found"),
            other => ApiError::store("Error connecting appliance", other),
        })?;

    info!(appliance_id = %appliance.id, user_id = %appliance.user_id, "Appliance connected");
    Ok((
        StatusCode::CREATED,
        Json(ConnectApplianceResponse {
            message: "Appliance connected successfully",
            appliance,
        }),
    ))
}

pub async fn delete_handler(
    State(state): State<SharedState>,
    Path(id): Path<String>,
) -> Result<Json<MessageResponse>, ApiError> {
    let deleted = state
        .store
        .delete_appliance(&id)
        .await
        .map_err(|e| ApiError::store("Error deleting appliance", e))?;
    if !deleted {
        return Err(ApiError::not_found("Appliance not found"));
    }

    info!(appliance_id = %id, "Appliance deleted");
    Ok(Json(MessageResponse {
        message: "Appliance deleted successfully",
    }))
}
