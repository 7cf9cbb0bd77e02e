use crate::errors::TransformError;
use image::DynamicImage;
use image::codecs::jpeg::JpegEncoder;
use std::io::Cursor;

/// 画像を JPEG にエンコードする
///
/// JPEG はアルファを持てないため RGB8 に変換してから書き出す
pub fn encode_jpeg(img: &DynamicImage, quality: u8) -> Result<Vec<u8>, TransformError> {
    let mut buf = Cursor::new(Vec::new());

    let encoder = JpegEncoder::new_with_quality(&mut buf, quality);
    img.to_rgb8()
        .write_with_encoder(encoder)
        .map_err(|e| TransformError::Encode(format!("JPEG encode failed: {e}")))?;

    Ok(buf.into_inner())
}
