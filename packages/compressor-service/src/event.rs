use aws_lambda_events::encodings::Body;
use aws_lambda_events::event::apigw::{ApiGatewayProxyRequest, ApiGatewayProxyResponse};
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use compressor_core::{
    CompressError, CompressionRequest, ImageSource, ObjectLocation, ResizePolicy, StorageError,
    TransformError, compress,
};
use http::HeaderValue;
use http::header::CONTENT_TYPE;
use lambda_runtime::{Error, LambdaEvent};
use serde::Deserialize;

use crate::AppState;

pub const SUCCESS_MESSAGE: &str = "Image compressed successfully";
const PARSE_FAILED: &str = "Error in unmarshalling request body";
const FETCH_FAILED: &str = "Error in getting object from S3";
const COMPRESS_FAILED: &str = "Error in compressing image";
const STORE_FAILED: &str = "Error in saving object to S3";

/// イベント本文の JSON
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompressEnvelope {
    pub bucket: String,
    pub object_key: String,
    pub save_name: String,
    #[serde(default)]
    pub width: Option<u32>,
    #[serde(default)]
    pub height: Option<u32>,
}

impl CompressEnvelope {
    /// 同じバケットの `saveName` へ保存するリクエストに変換する
    pub fn into_request(self, default_target: ResizePolicy) -> CompressionRequest {
        let target_size =
            ResizePolicy::from_dimensions(self.width, self.height).unwrap_or(default_target);

        CompressionRequest {
            destination: Some(ObjectLocation::new(self.bucket.clone(), self.save_name)),
            source: ImageSource::Object(ObjectLocation::new(self.bucket, self.object_key)),
            target_size,
        }
    }
}

/// イベント処理の結果
///
/// 呼び出し元には固定の文言だけを返し、詳細はログにのみ残す
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventReply {
    Success,
    Failure(&'static str),
}

impl EventReply {
    pub fn status_code(&self) -> u16 {
        match self {
            Self::Success => 200,
            Self::Failure(_) => 500,
        }
    }

    pub fn message(&self) -> &'static str {
        match self {
            Self::Success => SUCCESS_MESSAGE,
            Self::Failure(message) => *message,
        }
    }
}

impl From<&CompressError> for EventReply {
    fn from(err: &CompressError) -> Self {
        match err {
            CompressError::Validation(msg) => {
                tracing::warn!(error = %msg, "invalid compression request");
                Self::Failure(PARSE_FAILED)
            }
            CompressError::Fetch { bucket, key, source } => {
                match source {
                    StorageError::NotFound { .. } => {
                        tracing::warn!(bucket = %bucket, key = %key, "source object not found")
                    }
                    _ => tracing::error!(bucket = %bucket, key = %key, error = %source, "failed to fetch source object"),
                }
                Self::Failure(FETCH_FAILED)
            }
            CompressError::Transform(transform_err) => {
                match transform_err {
                    TransformError::Decode(msg) => {
                        tracing::warn!(error = %msg, "source is not a decodable image")
                    }
                    other => tracing::error!(error = %other, "image processing failed"),
                }
                Self::Failure(COMPRESS_FAILED)
            }
            CompressError::Store { bucket, key, source } => {
                tracing::error!(bucket = %bucket, key = %key, error = %source, "failed to store compressed image");
                Self::Failure(STORE_FAILED)
            }
        }
    }
}

/// JSON 本文を解釈して圧縮を実行する
///
/// Lambda とローカルサーバの `/compress` の両方から使う
pub async fn process_body(state: &AppState, body: &[u8]) -> EventReply {
    let envelope: CompressEnvelope = match serde_json::from_slice(body) {
        Ok(envelope) => envelope,
        Err(e) => {
            tracing::warn!(error = %e, "failed to parse request body");
            return EventReply::Failure(PARSE_FAILED);
        }
    };

    let request = envelope.into_request(state.options.policy);
    match compress(state.store.as_ref(), &request, &state.options).await {
        Ok(_) => EventReply::Success,
        Err(e) => EventReply::from(&e),
    }
}

/// API Gateway のプロキシイベントを処理する
///
/// リクエスト単位の失敗はすべて 500 のレスポンスとして返し、
/// ランタイムにはエラーを返さない
pub(crate) async fn function_handler(
    event: LambdaEvent<ApiGatewayProxyRequest>,
    state: &AppState,
) -> Result<ApiGatewayProxyResponse, Error> {
    let reply = match request_body(&event.payload) {
        Ok(body) => process_body(state, &body).await,
        Err(msg) => {
            tracing::warn!(request_id = %event.context.request_id, error = %msg, "invalid event body");
            EventReply::Failure(PARSE_FAILED)
        }
    };

    tracing::info!(
        request_id = %event.context.request_id,
        status = reply.status_code(),
        "event processed"
    );
    Ok(proxy_response(reply))
}

fn request_body(request: &ApiGatewayProxyRequest) -> Result<Vec<u8>, String> {
    let body = request.body.as_deref().ok_or("request body is empty")?;

    if request.is_base64_encoded {
        STANDARD
            .decode(body)
            .map_err(|e| format!("invalid base64 body: {e}"))
    } else {
        Ok(body.as_bytes().to_vec())
    }
}

fn proxy_response(reply: EventReply) -> ApiGatewayProxyResponse {
    let mut response = ApiGatewayProxyResponse {
        status_code: i64::from(reply.status_code()),
        body: Some(Body::Text(reply.message().to_string())),
        is_base64_encoded: false,
        ..Default::default()
    };
    response.headers.insert(
        CONTENT_TYPE,
        HeaderValue::from_static("text/plain; charset=utf-8"),
    );
    response
}
