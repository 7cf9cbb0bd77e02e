use std::net::SocketAddr;

use axum::Router;
use axum::body::Bytes;
use axum::extract::{DefaultBodyLimit, Multipart, Query, State};
use axum::http::{StatusCode, header};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use serde::Deserialize;
use tower_http::trace::TraceLayer;

use crate::AppState;
use crate::event::process_body;
use compressor_core::{
    CompressError, CompressionOutcome, CompressionRequest, ImageSource, JPEG_CONTENT_TYPE,
    ResizePolicy, StorageError, TransformError, compress,
};

/// アップロードされる画像の上限
const MAX_UPLOAD_BYTES: usize = 32 * 1024 * 1024;

#[derive(Debug, Deserialize)]
pub struct SizeQuery {
    pub size: Option<u32>,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(resize_upload).post(resize_upload))
        .route("/compress", post(compress_envelope))
        .route("/health", get(health))
        .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// ローカルサーバを起動し、Ctrl-C まで待ち受ける
pub async fn serve(addr: SocketAddr, state: AppState) -> anyhow::Result<()> {
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(addr = %addr, "starting local server");

    axum::serve(listener, router(state))
        .with_graceful_shutdown(async {
            tokio::signal::ctrl_c().await.ok();
            tracing::info!("shutdown signal received");
        })
        .await?;

    Ok(())
}

pub async fn health() -> impl IntoResponse {
    (StatusCode::OK, "ok")
}

/// multipart の `image` を `size` の幅に縮小して JPEG で返す
pub async fn resize_upload(
    State(state): State<AppState>,
    Query(query): Query<SizeQuery>,
    mut multipart: Multipart,
) -> Result<Response, AppError> {
    let size = query
        .size
        .ok_or_else(|| AppError::BadRequest("query parameter `size` is required".to_string()))?;

    let mut image = None;
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(e.body_text()))?
    {
        if field.name() == Some("image") {
            let data = field
                .bytes()
                .await
                .map_err(|e| AppError::BadRequest(e.body_text()))?;
            image = Some(data);
            break;
        }
    }
    let image =
        image.ok_or_else(|| AppError::BadRequest("form field `image` is required".to_string()))?;

    tracing::info!(size, input_size = image.len(), "resizing uploaded image");

    let request = CompressionRequest {
        source: ImageSource::Upload(image),
        destination: None,
        target_size: ResizePolicy::Width(size),
    };

    match compress(state.store.as_ref(), &request, &state.options).await? {
        CompressionOutcome::Inline(output) => Ok((
            StatusCode::OK,
            [(header::CONTENT_TYPE, JPEG_CONTENT_TYPE)],
            output,
        )
            .into_response()),
        CompressionOutcome::Stored { location, .. } => Err(AppError::Internal(format!(
            "unexpected stored outcome for {location}"
        ))),
    }
}

/// `{bucket, objectKey, saveName}` を受け取り Lambda と同じ処理を行う
pub async fn compress_envelope(State(state): State<AppState>, body: Bytes) -> Response {
    let reply = process_body(&state, &body).await;
    let status =
        StatusCode::from_u16(reply.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

    (
        status,
        [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
        reply.message(),
    )
        .into_response()
}

#[derive(Debug)]
pub enum AppError {
    BadRequest(String),
    NotFound(String),
    TransformFailed(String),
    StorageUnavailable(String),
    Internal(String),
}

impl From<CompressError> for AppError {
    fn from(err: CompressError) -> Self {
        match err {
            CompressError::Validation(msg) => {
                tracing::warn!(error = %msg, "validation error");
                AppError::BadRequest(msg)
            }
            CompressError::Fetch { key, source, .. } => storage_error(&key, source),
            CompressError::Transform(transform_err) => transform_err.into(),
            CompressError::Store { key, source, .. } => {
                tracing::error!(key = %key, error = %source, "failed to store image");
                AppError::StorageUnavailable("storage error".to_string())
            }
        }
    }
}

fn storage_error(key: &str, err: StorageError) -> AppError {
    match err {
        StorageError::NotFound { key } => {
            tracing::warn!(key = %key, "object not found");
            AppError::NotFound("object not found".to_string())
        }
        StorageError::Forbidden => {
            tracing::error!(key = %key, "access denied by S3 (check AWS credentials)");
            AppError::StorageUnavailable("storage access denied".to_string())
        }
        StorageError::Internal(msg) => {
            tracing::error!(key = %key, error = %msg, "storage error");
            AppError::StorageUnavailable("storage error".to_string())
        }
    }
}

impl From<TransformError> for AppError {
    fn from(err: TransformError) -> Self {
        match err {
            TransformError::InvalidParams(msg) => {
                tracing::warn!(error = %msg, "invalid transform parameters");
                AppError::BadRequest(msg)
            }
            TransformError::ResolutionTooLarge { width, height } => {
                tracing::warn!(width = %width, height = %height, "image resolution too large");
                AppError::BadRequest(format!("image resolution {width}x{height} exceeds maximum"))
            }
            TransformError::Decode(msg) => {
                tracing::warn!(error = %msg, "failed to decode image");
                AppError::TransformFailed("unsupported or corrupt image".to_string())
            }
            TransformError::Encode(msg) | TransformError::ProcessingFailed(msg) => {
                tracing::error!(error = %msg, "image processing failed");
                AppError::TransformFailed(msg)
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            AppError::TransformFailed(msg) => (StatusCode::UNPROCESSABLE_ENTITY, msg),
            AppError::StorageUnavailable(msg) => {
                tracing::error!(error = %msg, "storage unavailable");
                (StatusCode::BAD_GATEWAY, "storage unavailable".to_string())
            }
            AppError::Internal(msg) => {
                tracing::error!(error = %msg, "internal server error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal server error".to_string(),
                )
            }
        };

        let body = serde_json::json!({ "error": message });
        (status, axum::Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{jpeg_bytes, png_bytes, test_state};
    use axum::body::Body;
    use axum::http::Request;
    use compressor_core::{MemoryObjectStore, ObjectLocation};
    use image::ImageFormat;
    use std::sync::Arc;
    use tower::ServiceExt;

    const BOUNDARY: &str = "compressor-test-boundary";

    fn multipart_body(field: &str, data: &[u8]) -> Vec<u8> {
        let mut body = Vec::new();
        body.extend_from_slice(format!("--{BOUNDARY}\r\n").as_bytes());
        body.extend_from_slice(
            format!(
                "Content-Disposition: form-data; name=\"{field}\"; filename=\"upload.bin\"\r\n"
            )
            .as_bytes(),
        );
        body.extend_from_slice(b"Content-Type: application/octet-stream\r\n\r\n");
        body.extend_from_slice(data);
        body.extend_from_slice(format!("\r\n--{BOUNDARY}--\r\n").as_bytes());
        body
    }

    fn upload_request(method: &str, uri: &str, field: &str, data: &[u8]) -> Request<Body> {
        Request::builder()
            .method(method)
            .uri(uri)
            .header(
                header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={BOUNDARY}"),
            )
            .body(Body::from(multipart_body(field, data)))
            .unwrap()
    }

    async fn body_bytes(response: Response) -> Bytes {
        axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap()
    }

    fn app() -> Router {
        router(test_state(Arc::new(MemoryObjectStore::new())))
    }

    #[tokio::test]
    async fn test_health() {
        let response = app()
            .oneshot(Request::get("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_bytes(response).await, "ok");
    }

    #[tokio::test]
    async fn test_resize_upload_scales_width() {
        let response = app()
            .oneshot(upload_request("POST", "/?size=64", "image", &jpeg_bytes(300, 200)))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers().get(header::CONTENT_TYPE).unwrap(),
            "image/jpeg"
        );

        let output = body_bytes(response).await;
        let img = image::load_from_memory_with_format(&output, ImageFormat::Jpeg).unwrap();
        assert_eq!((img.width(), img.height()), (64, 43));
    }

    #[tokio::test]
    async fn test_resize_upload_accepts_get() {
        let response = app()
            .oneshot(upload_request("GET", "/?size=32", "image", &png_bytes(64, 64)))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let output = body_bytes(response).await;
        let img = image::load_from_memory(&output).unwrap();
        assert_eq!((img.width(), img.height()), (32, 32));
    }

    #[tokio::test]
    async fn test_resize_upload_requires_size() {
        let response = app()
            .oneshot(upload_request("POST", "/", "image", &png_bytes(10, 10)))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_resize_upload_requires_image_field() {
        let response = app()
            .oneshot(upload_request("POST", "/?size=64", "file", &png_bytes(10, 10)))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body: serde_json::Value = serde_json::from_slice(&body_bytes(response).await).unwrap();
        assert_eq!(body["error"], "form field `image` is required");
    }

    #[tokio::test]
    async fn test_resize_upload_rejects_garbage() {
        let response = app()
            .oneshot(upload_request("POST", "/?size=64", "image", b"not an image"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[tokio::test]
    async fn test_resize_upload_rejects_bogus_gif_header() {
        // 署名は GIF だが、ヘッダの寸法は画素上限を超えるごみ
        let response = app()
            .oneshot(upload_request(
                "POST",
                "/?size=64",
                "image",
                b"GIF89a-but-not-really",
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
        let body: serde_json::Value = serde_json::from_slice(&body_bytes(response).await).unwrap();
        assert_eq!(body["error"], "unsupported or corrupt image");
    }

    #[tokio::test]
    async fn test_resize_upload_rejects_zero_size() {
        let response = app()
            .oneshot(upload_request("POST", "/?size=0", "image", &png_bytes(10, 10)))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_compress_envelope() {
        let store = Arc::new(MemoryObjectStore::new());
        store.insert(ObjectLocation::new("imgs", "cat.png"), png_bytes(512, 512));
        let app = router(test_state(store.clone()));

        let request = Request::post("/compress")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(
                r#"{"bucket":"imgs","objectKey":"cat.png","saveName":"cat_small.jpg"}"#,
            ))
            .unwrap();
        let response = app.oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_bytes(response).await, "Image compressed successfully");
        assert!(store.contains(&ObjectLocation::new("imgs", "cat_small.jpg")));
    }

    #[tokio::test]
    async fn test_compress_envelope_missing_object() {
        let request = Request::post("/compress")
            .body(Body::from(
                r#"{"bucket":"imgs","objectKey":"nope.png","saveName":"nope.jpg"}"#,
            ))
            .unwrap();
        let response = app().oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body_bytes(response).await, "Error in getting object from S3");
    }

    #[test]
    fn test_error_status_mapping() {
        let not_found = AppError::from(CompressError::Fetch {
            bucket: "imgs".to_string(),
            key: "cat.png".to_string(),
            source: StorageError::NotFound {
                key: "cat.png".to_string(),
            },
        });
        assert_eq!(not_found.into_response().status(), StatusCode::NOT_FOUND);

        let store_failed = AppError::from(CompressError::Store {
            bucket: "imgs".to_string(),
            key: "out.jpg".to_string(),
            source: StorageError::Internal("timeout".to_string()),
        });
        assert_eq!(store_failed.into_response().status(), StatusCode::BAD_GATEWAY);

        let too_large = AppError::from(TransformError::ResolutionTooLarge {
            width: 5000,
            height: 5000,
        });
        assert_eq!(too_large.into_response().status(), StatusCode::BAD_REQUEST);
    }
}
