//! Presigned-upload endpoint. The URL generation delegates entirely to the
//! object-storage client; nothing is read or written here.

use axum::{
    extract::{Query, State},
    Json,
};
use aws_sdk_s3::presigning::PresigningConfig;
use serde::Deserialize;
use std::sync::Arc;
use std::time::Duration;

use crate::reports::error::ReportsError;
use crate::shared::state::AppState;

// URL valid for 10 minutes
const UPLOAD_URL_TTL: Duration = Duration::from_secs(600);

#[derive(Debug, Deserialize)]
pub struct PresignQuery {
    pub filename: Option<String>,
}

/// GET /presignedPutUrl?filename=
pub async fn handle_presigned_put_url(
    State(state): State<Arc<AppState>>,
    Query(query): Query<PresignQuery>,
) -> Result<Json<serde_json::Value>, ReportsError> {
    let filename = query
        .filename
        .filter(|name| !name.is_empty())
        .ok_or_else(|| ReportsError::Validation("Missing filename parameter".to_string()))?;

    let client = state
        .drive
        .as_ref()
        .ok_or_else(|| ReportsError::Internal("S3 client is not initialized".to_string()))?;

    let presigning = PresigningConfig::expires_in(UPLOAD_URL_TTL)
        .map_err(|e| ReportsError::Internal(e.to_string()))?;

    let request = client
        .put_object()
        .bucket(&state.bucket_name)
        .key(&filename)
        .presigned(presigning)
        .await
        .map_err(|e| {
            log::error!("S3 presign failed: {:?}", e);
            ReportsError::Internal("Failed to generate upload URL".to_string())
        })?;

    Ok(Json(serde_json::json!({
        "presignedUrl": request.uri().to_string(),
        "accessUrl": format!("/callsim/{}", filename),
    })))
}
