//! テスト用の画像データ

use image::{DynamicImage, ImageFormat};
use std::io::Cursor;

/// Orientation タグだけを持つ リトルエンディアンの TIFF ブロック
fn orientation_tiff(orientation: u16) -> Vec<u8> {
    let mut tiff = Vec::new();
    // ヘッダ: "II", 42, IFD0 のオフセット
    tiff.extend_from_slice(&[0x49, 0x49, 0x2A, 0x00, 0x08, 0x00, 0x00, 0x00]);
    // エントリ数
    tiff.extend_from_slice(&1u16.to_le_bytes());
    // 0x0112 Orientation, SHORT, count 1, 値
    tiff.extend_from_slice(&0x0112u16.to_le_bytes());
    tiff.extend_from_slice(&3u16.to_le_bytes());
    tiff.extend_from_slice(&1u32.to_le_bytes());
    tiff.extend_from_slice(&orientation.to_le_bytes());
    tiff.extend_from_slice(&[0x00, 0x00]);
    // 次の IFD なし
    tiff.extend_from_slice(&0u32.to_le_bytes());
    tiff
}

/// EXIF Orientation 付きの JPEG を作る
///
/// SOI の直後に APP1 (Exif) セグメントを差し込む
pub(crate) fn jpeg_with_orientation(width: u32, height: u32, orientation: u16) -> Vec<u8> {
    let mut buf = Cursor::new(Vec::new());
    DynamicImage::new_rgb8(width, height)
        .write_to(&mut buf, ImageFormat::Jpeg)
        .unwrap();
    let jpeg = buf.into_inner();
    assert_eq!(&jpeg[..2], &[0xFF, 0xD8]);

    let tiff = orientation_tiff(orientation);
    let segment_len = u16::try_from(2 + 6 + tiff.len()).unwrap();

    let mut out = Vec::with_capacity(jpeg.len() + 4 + 6 + tiff.len());
    out.extend_from_slice(&jpeg[..2]);
    out.extend_from_slice(&[0xFF, 0xE1]);
    out.extend_from_slice(&segment_len.to_be_bytes());
    out.extend_from_slice(b"Exif\0\0");
    out.extend_from_slice(&tiff);
    out.extend_from_slice(&jpeg[2..]);
    out
}
