/// 出力画像の最大寸法（幅・高さ）
pub const MAX_DIMENSION: u32 = 4096;

/// 入力画像の最大ピクセル数（デコード後のメモリ枯渇を防ぐ）
pub const MAX_PIXELS: u64 = 100_000_000;

/// デフォルト JPEG 品質（1-100）
pub const DEFAULT_QUALITY: u8 = 95;

/// イベント経由の圧縮で使う既定の出力サイズ
pub const DEFAULT_EVENT_WIDTH: u32 = 128;
pub const DEFAULT_EVENT_HEIGHT: u32 = 128;

/// 出力は常に JPEG
pub const JPEG_CONTENT_TYPE: &str = "image/jpeg";
