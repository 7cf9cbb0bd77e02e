use std::io::Cursor;
use std::sync::Arc;

use axum::body::Bytes;
use compressor_core::{MemoryObjectStore, ResizePolicy, TranscodeOptions};
use image::{DynamicImage, ImageFormat};

use crate::AppState;

pub fn png_bytes(width: u32, height: u32) -> Bytes {
    encode(width, height, ImageFormat::Png)
}

pub fn jpeg_bytes(width: u32, height: u32) -> Bytes {
    encode(width, height, ImageFormat::Jpeg)
}

fn encode(width: u32, height: u32, format: ImageFormat) -> Bytes {
    let mut buf = Cursor::new(Vec::new());
    DynamicImage::new_rgb8(width, height)
        .write_to(&mut buf, format)
        .unwrap();
    Bytes::from(buf.into_inner())
}

/// 既定設定（128x128, 品質 95）でメモリ上のストアを使う AppState
pub fn test_state(store: Arc<MemoryObjectStore>) -> AppState {
    AppState {
        store,
        options: TranscodeOptions::new(
            ResizePolicy::Exact {
                width: 128,
                height: 128,
            },
            None,
        ),
    }
}
