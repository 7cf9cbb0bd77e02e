use crate::constants::MAX_PIXELS;
use crate::errors::TransformError;
use image::{DynamicImage, ImageFormat, ImageReader};
use std::io::Cursor;

/// 画像バイト列をデコードし、DynamicImage と元のフォーマットを返す
///
/// フォーマットは拡張子ではなく先頭バイトから推測する
pub fn decode_image(input: &[u8]) -> Result<(DynamicImage, ImageFormat), TransformError> {
    if input.is_empty() {
        return Err(TransformError::Decode("input is empty".to_string()));
    }

    let reader = ImageReader::new(Cursor::new(input))
        .with_guessed_format()
        .map_err(|e| TransformError::Decode(format!("failed to guess format: {e}")))?;

    let format = reader
        .format()
        .ok_or_else(|| TransformError::Decode("unsupported image format".to_string()))?;

    // ヘッダだけ読んでピクセル数を先に確認する。
    // この時点では画素データを読んでいないので、壊れたヘッダの寸法もここを通る
    let (width, height) = reader
        .into_dimensions()
        .map_err(|e| TransformError::Decode(e.to_string()))?;
    validate_source_dimensions(width, height)?;

    let img = image::load_from_memory_with_format(input, format)
        .map_err(|e| TransformError::Decode(e.to_string()))?;

    Ok((img, format))
}

/// ソース画像の総ピクセル数を検証し、メモリ枯渇を防ぐ
///
/// 上限を超えるヘッダは本物の巨大画像か壊れたデータか区別できないため、
/// どちらもデコードできない入力として扱う
fn validate_source_dimensions(width: u32, height: u32) -> Result<(), TransformError> {
    let total_pixels = width as u64 * height as u64;
    if total_pixels > MAX_PIXELS {
        return Err(TransformError::Decode(format!(
            "header reports {width}x{height}, exceeding the {MAX_PIXELS} pixel limit"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn png_bytes(width: u32, height: u32) -> Vec<u8> {
        let mut buf = Cursor::new(Vec::new());
        DynamicImage::new_rgb8(width, height)
            .write_to(&mut buf, ImageFormat::Png)
            .unwrap();
        buf.into_inner()
    }

    #[test]
    fn test_decode_png() {
        let (img, format) = decode_image(&png_bytes(30, 20)).unwrap();
        assert_eq!(format, ImageFormat::Png);
        assert_eq!((img.width(), img.height()), (30, 20));
    }

    #[test]
    fn test_decode_garbage() {
        let result = decode_image(b"definitely not an image");
        assert!(matches!(result, Err(TransformError::Decode(_))));
    }

    #[test]
    fn test_decode_gif_signature_with_junk_header() {
        // GIF の署名のあとに寸法として読める文字列が続く
        let result = decode_image(b"GIF89a-but-not-really");
        assert!(matches!(result, Err(TransformError::Decode(_))));
    }

    #[test]
    fn test_decode_empty() {
        assert!(matches!(decode_image(&[]), Err(TransformError::Decode(_))));
    }

    #[test]
    fn test_decode_truncated_png() {
        let data = png_bytes(30, 20);
        let result = decode_image(&data[..data.len() / 2]);
        assert!(matches!(result, Err(TransformError::Decode(_))));
    }

    #[test]
    fn test_validate_source_dimensions() {
        assert!(validate_source_dimensions(4000, 3000).is_ok());
        assert!(matches!(
            validate_source_dimensions(100_000, 100_000),
            Err(TransformError::Decode(_))
        ));
    }
}
