pub mod constants;
pub mod errors;
pub mod handler;
pub mod storage;
pub mod transform;
pub mod validation;

#[cfg(test)]
mod testing;

// 公開API
pub use constants::{
    DEFAULT_EVENT_HEIGHT, DEFAULT_EVENT_WIDTH, DEFAULT_QUALITY, JPEG_CONTENT_TYPE, MAX_DIMENSION,
    MAX_PIXELS,
};
pub use errors::{CompressError, StorageError, TransformError};
pub use handler::{CompressionOutcome, CompressionRequest, ImageSource, compress};
#[cfg(any(test, feature = "test-util"))]
pub use storage::MemoryObjectStore;
pub use storage::{ObjectLocation, ObjectStore, S3ObjectStore, StaticCredentials, StorageConfig};
pub use transform::{ResizePolicy, TranscodeOptions, transcode};
pub use validation::{validate_bucket, validate_key, validate_params};
