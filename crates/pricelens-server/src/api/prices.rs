use axum::{
    body::Bytes,
    extract::{multipart::MultipartError, Multipart, State},
    http::StatusCode,
    Extension, Json,
};
use pricelens_core::{RecognitionResult, ResolutionOutcome};
use pricelens_scraper::PipelineError;

use crate::middleware::RequestId;

use super::{ApiError, ApiResponse, AppState, ResponseMeta};

const UPLOAD_FIELD: &str = "file";

struct Upload {
    file_name: String,
    bytes: Bytes,
}

/// Recognizes an uploaded product image and resolves retailer prices for it.
pub(super) async fn lookup(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    multipart: Multipart,
) -> Result<Json<ApiResponse<ResolutionOutcome>>, ApiError> {
    let upload = read_upload(multipart)
        .await
        .map_err(|e| map_multipart_error(req_id.0.clone(), &e))?
        .ok_or_else(|| ApiError::new(req_id.0.clone(), "bad_request", "No file uploaded"))?;

    if upload.file_name.is_empty() {
        return Err(ApiError::new(
            req_id.0.clone(),
            "bad_request",
            "No image selected",
        ));
    }

    let Some(vision) = state.vision.as_ref() else {
        return Err(ApiError::new(
            req_id.0.clone(),
            "recognition_unavailable",
            "image recognition is not configured",
        ));
    };

    tracing::info!(
        file_name = %upload.file_name,
        bytes = upload.bytes.len(),
        "running image lookup"
    );

    let recognition = vision.detect(&upload.bytes).await.map_err(|e| {
        tracing::warn!(error = %e, "image recognition failed");
        ApiError::new(req_id.0.clone(), "recognition_error", e.to_string())
    })?;

    run_pipeline(&state, req_id, &recognition).await
}

/// Resolves prices for a caller-supplied recognition result.
pub(super) async fn resolve(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Json(recognition): Json<RecognitionResult>,
) -> Result<Json<ApiResponse<ResolutionOutcome>>, ApiError> {
    run_pipeline(&state, req_id, &recognition).await
}

async fn run_pipeline(
    state: &AppState,
    req_id: RequestId,
    recognition: &RecognitionResult,
) -> Result<Json<ApiResponse<ResolutionOutcome>>, ApiError> {
    let outcome = state
        .pipeline
        .resolve(recognition)
        .await
        .map_err(|e| map_pipeline_error(req_id.0.clone(), &e))?;

    Ok(Json(ApiResponse {
        data: outcome,
        meta: ResponseMeta::new(req_id.0),
    }))
}

async fn read_upload(mut multipart: Multipart) -> Result<Option<Upload>, MultipartError> {
    while let Some(field) = multipart.next_field().await? {
        if field.name() != Some(UPLOAD_FIELD) {
            continue;
        }
        let file_name = field.file_name().unwrap_or_default().to_owned();
        let bytes = field.bytes().await?;
        return Ok(Some(Upload { file_name, bytes }));
    }
    Ok(None)
}

fn map_multipart_error(request_id: String, error: &MultipartError) -> ApiError {
    let code = if error.status() == StatusCode::PAYLOAD_TOO_LARGE {
        "payload_too_large"
    } else {
        "bad_request"
    };
    ApiError::new(request_id, code, error.body_text())
}

fn map_pipeline_error(request_id: String, error: &PipelineError) -> ApiError {
    tracing::warn!(error = %error, "price resolution aborted");
    match error {
        PipelineError::Recognition(message) => {
            ApiError::new(request_id, "recognition_error", message.clone())
        }
    }
}
