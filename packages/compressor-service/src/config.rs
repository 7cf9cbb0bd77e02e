use std::str::FromStr;

use compressor_core::{
    DEFAULT_EVENT_HEIGHT, DEFAULT_EVENT_WIDTH, DEFAULT_QUALITY, ResizePolicy, StorageConfig,
    TranscodeOptions, validate_params,
};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("storage config: {0}")]
    Storage(String),

    #[error("invalid value for {name}: {value:?} ({reason})")]
    Invalid {
        name: &'static str,
        value: String,
        reason: String,
    },
}

/// サービス全体の設定
///
/// 起動時に一度だけ読み込み、各アダプタへ明示的に渡す
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub storage: StorageConfig,
    /// イベント経由でサイズ指定がないときの出力サイズ
    pub event_target: ResizePolicy,
    pub jpeg_quality: u8,
}

impl AppConfig {
    /// 環境変数から AppConfig を作成する
    ///
    /// 任意の環境変数:
    /// - COMPRESS_WIDTH / COMPRESS_HEIGHT（既定 128x128）
    /// - JPEG_QUALITY（既定 95）
    /// - ストレージ関連は [`StorageConfig::from_env`] を参照
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let storage = StorageConfig::from_lookup(&lookup).map_err(ConfigError::Storage)?;

        let width = parse_or(&lookup, "COMPRESS_WIDTH", DEFAULT_EVENT_WIDTH)?;
        let height = parse_or(&lookup, "COMPRESS_HEIGHT", DEFAULT_EVENT_HEIGHT)?;
        let jpeg_quality = parse_or(&lookup, "JPEG_QUALITY", DEFAULT_QUALITY)?;

        let event_target = ResizePolicy::Exact { width, height };
        validate_params(&event_target, Some(jpeg_quality)).map_err(|e| ConfigError::Invalid {
            name: "COMPRESS_WIDTH/COMPRESS_HEIGHT/JPEG_QUALITY",
            value: format!("{width}x{height} q{jpeg_quality}"),
            reason: e.to_string(),
        })?;

        Ok(Self {
            storage,
            event_target,
            jpeg_quality,
        })
    }

    pub fn transcode_options(&self) -> TranscodeOptions {
        TranscodeOptions::new(self.event_target, Some(self.jpeg_quality))
    }
}

fn parse_or<T>(
    lookup: impl Fn(&str) -> Option<String>,
    name: &'static str,
    default: T,
) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match lookup(name).filter(|value| !value.trim().is_empty()) {
        None => Ok(default),
        Some(value) => value.trim().parse().map_err(|e: T::Err| ConfigError::Invalid {
            name,
            reason: e.to_string(),
            value,
        }),
    }
}
