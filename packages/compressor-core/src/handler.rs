use bytes::Bytes;

use crate::constants::JPEG_CONTENT_TYPE;
use crate::errors::CompressError;
use crate::storage::{ObjectLocation, ObjectStore};
use crate::transform::{ResizePolicy, TranscodeOptions, transcode};
use crate::validation::{validate_bucket, validate_key, validate_params};

/// 変換元の画像
#[derive(Debug, Clone)]
pub enum ImageSource {
    /// オブジェクトストレージから取得する
    Object(ObjectLocation),
    /// リクエストで直接アップロードされたバイト列
    Upload(Bytes),
}

/// 1回分の圧縮リクエスト
#[derive(Debug, Clone)]
pub struct CompressionRequest {
    pub source: ImageSource,
    /// None の場合は保存せずに呼び出し元へ返す
    pub destination: Option<ObjectLocation>,
    pub target_size: ResizePolicy,
}

/// 圧縮結果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CompressionOutcome {
    Stored { location: ObjectLocation, size: usize },
    Inline(Bytes),
}

/// 取得 → 変換 → 保存（または返却）を順に行う
///
/// どの段階で失敗してもそこで打ち切り、保存は変換が成功したときだけ行う。
/// `request.target_size` は `options.policy` より優先される。
pub async fn compress(
    store: &dyn ObjectStore,
    request: &CompressionRequest,
    options: &TranscodeOptions,
) -> Result<CompressionOutcome, CompressError> {
    validate_request(request)?;
    let options = options.with_policy(request.target_size);
    validate_params(&options.policy, Some(options.quality))
        .map_err(|e| CompressError::Validation(e.to_string()))?;

    let input = match &request.source {
        ImageSource::Object(location) => {
            tracing::info!(bucket = %location.bucket, key = %location.key, "fetching object");
            store
                .get(location)
                .await
                .map_err(|source| CompressError::Fetch {
                    bucket: location.bucket.clone(),
                    key: location.key.clone(),
                    source,
                })?
        }
        ImageSource::Upload(data) => data.clone(),
    };

    tracing::info!(
        input_size = input.len(),
        policy = ?options.policy,
        quality = options.quality,
        "transcoding image"
    );
    let output = transcode(&input, &options)?;

    let Some(destination) = &request.destination else {
        return Ok(CompressionOutcome::Inline(output));
    };

    let size = output.len();
    store
        .put(destination, output, JPEG_CONTENT_TYPE)
        .await
        .map_err(|source| CompressError::Store {
            bucket: destination.bucket.clone(),
            key: destination.key.clone(),
            source,
        })?;

    tracing::info!(bucket = %destination.bucket, key = %destination.key, size, "stored compressed image");
    Ok(CompressionOutcome::Stored {
        location: destination.clone(),
        size,
    })
}

fn validate_request(request: &CompressionRequest) -> Result<(), CompressError> {
    if let ImageSource::Object(location) = &request.source {
        validate_location(location)?;
    }
    if let ImageSource::Upload(data) = &request.source
        && data.is_empty()
    {
        return Err(CompressError::Validation("uploaded image is empty".to_string()));
    }
    if let Some(destination) = &request.destination {
        validate_location(destination)?;
    }
    Ok(())
}

fn validate_location(location: &ObjectLocation) -> Result<(), CompressError> {
    validate_bucket(&location.bucket)?;
    validate_key(&location.key)
}
