use axum::http::StatusCode;
use site_common::SiteId;

use crate::infrastructure::http::api::ApiError;

pub mod site_management;

// health check handler
pub async fn health_check() -> StatusCode {
    StatusCode::OK
}

fn parse_site_id(site_id: String) -> Result<SiteId, ApiError> {
    SiteId::try_new(site_id).map_err(|err| ApiError::UnprocessableEntity(err.to_string()))
}
