use axum::Json;
use axum::body::Bytes;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use serde_json::Value;

use crate::domain::AppState;
use crate::infrastructure::http::api::{ApiError, ApiSuccess};
use crate::infrastructure::http::handlers::parse_site_id;
use crate::infrastructure::http::handlers::site_management::dto::{
    LegacyContentResponse, PublishRequest, SiteManagementResponse,
};

mod dto;

type SiteManagementResult = Result<ApiSuccess<SiteManagementResponse>, ApiError>;

pub async fn fetch_site_management<S: AppState>(
    Path(site_id): Path<String>,
    State(state): State<S>,
) -> SiteManagementResult {
    let site = parse_site_id(site_id)?;
    let management = state.site_management().fetch(&site).await?;
    Ok(ApiSuccess::new(StatusCode::OK, management.into()))
}

pub async fn fetch_default_site_management<S: AppState>(
    State(state): State<S>,
) -> SiteManagementResult {
    let management = state.site_management().fetch(state.default_site()).await?;
    Ok(ApiSuccess::new(StatusCode::OK, management.into()))
}

pub async fn save_draft<S: AppState>(
    Path(site_id): Path<String>,
    State(state): State<S>,
    Json(partial): Json<Value>,
) -> SiteManagementResult {
    let site = parse_site_id(site_id)?;
    if !partial.is_object() {
        return Err(ApiError::UnprocessableEntity(
            "draft must be a JSON object".to_string(),
        ));
    }

    let management = state.site_management().save_draft(&site, &partial).await?;
    Ok(ApiSuccess::new(StatusCode::OK, management.into()))
}

pub async fn publish<S: AppState>(
    Path(site_id): Path<String>,
    State(state): State<S>,
    body: Bytes,
) -> SiteManagementResult {
    let site = parse_site_id(site_id)?;
    let request = if body.is_empty() {
        PublishRequest::default()
    } else {
        serde_json::from_slice::<PublishRequest>(&body)
            .map_err(|err| ApiError::UnprocessableEntity(err.to_string()))?
    };
    if request.data.as_ref().is_some_and(|data| !data.is_object()) {
        return Err(ApiError::UnprocessableEntity(
            "data must be a JSON object".to_string(),
        ));
    }

    let management = state
        .site_management()
        .publish(&site, request.data.as_ref(), &request.note)
        .await?;
    Ok(ApiSuccess::new(StatusCode::OK, management.into()))
}

pub async fn reset_draft_to_published<S: AppState>(
    Path(site_id): Path<String>,
    State(state): State<S>,
) -> SiteManagementResult {
    let site = parse_site_id(site_id)?;
    let management = state.site_management().reset_draft_to_published(&site).await?;
    Ok(ApiSuccess::new(StatusCode::OK, management.into()))
}

pub async fn reset_draft_to_defaults<S: AppState>(
    Path(site_id): Path<String>,
    State(state): State<S>,
) -> SiteManagementResult {
    let site = parse_site_id(site_id)?;
    let management = state.site_management().reset_draft_to_defaults(&site).await?;
    Ok(ApiSuccess::new(StatusCode::OK, management.into()))
}

pub async fn restore_version<S: AppState>(
    Path((site_id, version)): Path<(String, i64)>,
    State(state): State<S>,
) -> SiteManagementResult {
    let site = parse_site_id(site_id)?;
    let management = state.site_management().restore_version(&site, version).await?;
    Ok(ApiSuccess::new(StatusCode::OK, management.into()))
}

pub async fn legacy_content<S: AppState>(
    Path(site_id): Path<String>,
    State(state): State<S>,
) -> Result<ApiSuccess<LegacyContentResponse>, ApiError> {
    let site = parse_site_id(site_id)?;
    let legacy = state.site_management().legacy_view(&site).await?;
    Ok(ApiSuccess::new(StatusCode::OK, legacy.into()))
}

pub async fn default_legacy_content<S: AppState>(
    State(state): State<S>,
) -> Result<ApiSuccess<LegacyContentResponse>, ApiError> {
    let legacy = state.site_management().legacy_view(state.default_site()).await?;
    Ok(ApiSuccess::new(StatusCode::OK, legacy.into()))
}
