use crate::constants::MAX_DIMENSION;
use crate::errors::TransformError;
use fast_image_resize::{FilterType, PixelType, ResizeAlg, ResizeOptions, Resizer, images::Image};
use image::DynamicImage;

/// 画像をリサイズする
///
/// fast_image_resize の Lanczos3 フィルタを使用する
pub fn resize_image(
    img: &DynamicImage,
    target_w: u32,
    target_h: u32,
) -> Result<DynamicImage, TransformError> {
    if target_w == 0 || target_h == 0 {
        return Err(TransformError::InvalidParams(format!(
            "target size must be non-zero, got {target_w}x{target_h}"
        )));
    }
    if target_w > MAX_DIMENSION || target_h > MAX_DIMENSION {
        return Err(TransformError::ResolutionTooLarge {
            width: target_w,
            height: target_h,
        });
    }

    // 出力は JPEG なのでここで RGB8 に揃える
    let rgb_img = img.to_rgb8();
    let width = rgb_img.width();
    let height = rgb_img.height();

    let src_image = Image::from_vec_u8(width, height, rgb_img.into_raw(), PixelType::U8x3)
        .map_err(|e| {
            TransformError::ProcessingFailed(format!("failed to create source image: {e}"))
        })?;

    let mut dst_image = Image::new(target_w, target_h, PixelType::U8x3);

    let mut resizer = Resizer::new();
    resizer
        .resize(
            &src_image,
            &mut dst_image,
            &ResizeOptions::new().resize_alg(ResizeAlg::Convolution(FilterType::Lanczos3)),
        )
        .map_err(|e| TransformError::ProcessingFailed(format!("resize failed: {e}")))?;

    let resized_rgb = image::RgbImage::from_raw(target_w, target_h, dst_image.into_vec())
        .ok_or_else(|| {
            TransformError::ProcessingFailed("failed to convert resized image".to_string())
        })?;

    Ok(DynamicImage::ImageRgb8(resized_rgb))
}
