use crate::errors::CompressError;

/// S3 のオブジェクトキー長の上限（UTF-8 バイト数）
const MAX_KEY_BYTES: usize = 1024;

/// オブジェクトキーを検証する
pub fn validate_key(key: &str) -> Result<(), CompressError> {
    if key.is_empty() {
        return Err(CompressError::Validation("key is empty".to_string()));
    }

    if key.len() > MAX_KEY_BYTES {
        return Err(CompressError::Validation(format!(
            "key is too long (max {MAX_KEY_BYTES} bytes)"
        )));
    }

    if key.chars().any(char::is_control) {
        return Err(CompressError::Validation(
            "control characters in key".to_string(),
        ));
    }

    Ok(())
}

/// バケット名を検証する
///
/// 3-63文字、小文字英数字・ハイフン・ドットのみ、先頭と末尾は英数字
pub fn validate_bucket(bucket: &str) -> Result<(), CompressError> {
    if !(3..=63).contains(&bucket.len()) {
        return Err(CompressError::Validation(format!(
            "bucket name must be 3-63 characters, got {}",
            bucket.len()
        )));
    }

    let valid_chars = bucket
        .chars()
        .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-' || c == '.');
    let valid_edges = bucket
        .chars()
        .next()
        .zip(bucket.chars().last())
        .is_some_and(|(first, last)| {
            first.is_ascii_alphanumeric() && last.is_ascii_alphanumeric()
        });

    if !valid_chars || !valid_edges || bucket.contains("..") {
        return Err(CompressError::Validation(format!(
            "invalid bucket name: {bucket}"
        )));
    }

    Ok(())
}
