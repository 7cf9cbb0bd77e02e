use bytes::Bytes;

use crate::constants::MAX_DIMENSION;
use crate::errors::TransformError;
use crate::transform::decode::decode_image;
use crate::transform::dimensions::calculate_target_dimensions;
use crate::transform::encode::encode_jpeg;
use crate::transform::orientation::Orientation;
use crate::transform::params::TranscodeOptions;
use crate::transform::resize::resize_image;
use crate::validation::validate_params;

/// 画像バイト列をデコード → リサイズ → JPEG エンコードする
///
/// 入力フォーマットに関係なく出力は常に JPEG。
/// メタデータ (EXIF) はデコード・エンコードで削除されるため、
/// 向きだけは先に画素へ反映しておく。
pub fn transcode(input: &[u8], options: &TranscodeOptions) -> Result<Bytes, TransformError> {
    validate_params(&options.policy, Some(options.quality))?;

    let (img, source_format) = decode_image(input)?;
    let img = Orientation::from_exif(input).apply(img);

    let (src_w, src_h) = (img.width(), img.height());
    let (dst_w, dst_h) = calculate_target_dimensions(src_w, src_h, options.policy);
    // リサイズを省略する場合も出力寸法の上限は守る
    validate_output_dimensions(dst_w, dst_h)?;

    tracing::debug!(
        format = ?source_format,
        src_w,
        src_h,
        dst_w,
        dst_h,
        "resizing image"
    );

    let resized = if dst_w != src_w || dst_h != src_h {
        resize_image(&img, dst_w, dst_h)?
    } else {
        img
    };

    let output = encode_jpeg(&resized, options.quality)?;
    Ok(Bytes::from(output))
}

/// 出力画像のサイズを検証する
fn validate_output_dimensions(width: u32, height: u32) -> Result<(), TransformError> {
    if width > MAX_DIMENSION || height > MAX_DIMENSION {
        return Err(TransformError::ResolutionTooLarge { width, height });
    }
    Ok(())
}
