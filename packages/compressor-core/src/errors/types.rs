use thiserror::Error;

/// 圧縮リクエスト全体の統合エラー型
///
/// 取得失敗と保存失敗はどちらも [`StorageError`] を持つが、
/// どの段階で失敗したかを呼び出し側が区別できるよう別のバリアントにしている。
#[derive(Debug, Error)]
pub enum CompressError {
    #[error("validation error: {0}")]
    Validation(String),

    #[error("failed to fetch {bucket}/{key}: {source}")]
    Fetch {
        bucket: String,
        key: String,
        #[source]
        source: StorageError,
    },

    #[error("transform error: {0}")]
    Transform(#[from] TransformError),

    #[error("failed to store {bucket}/{key}: {source}")]
    Store {
        bucket: String,
        key: String,
        #[source]
        source: StorageError,
    },
}

/// ストレージアクセスエラー
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("object not found: {key}")]
    NotFound { key: String },

    #[error("access denied")]
    Forbidden,

    #[error("storage error: {0}")]
    Internal(String),
}

/// 画像変換エラー
#[derive(Debug, Error)]
pub enum TransformError {
    #[error("invalid parameters: {0}")]
    InvalidParams(String),

    #[error("image resolution exceeds maximum ({width}x{height})")]
    ResolutionTooLarge { width: u32, height: u32 },

    #[error("decode failed: {0}")]
    Decode(String),

    #[error("encode failed: {0}")]
    Encode(String),

    #[error("processing failed: {0}")]
    ProcessingFailed(String),
}
