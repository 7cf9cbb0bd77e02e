use crate::constants::DEFAULT_QUALITY;
use crate::errors::TransformError;

/// リサイズ方針
///
/// 固定サイズ指定と、片方の寸法だけを指定してアスペクト比を維持する指定の
/// どちらか一方を表す。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResizePolicy {
    /// 指定した幅・高さにそのまま合わせる（アスペクト比は維持しない）
    Exact { width: u32, height: u32 },
    /// 幅を合わせ、高さは比率から計算する
    Width(u32),
    /// 高さを合わせ、幅は比率から計算する
    Height(u32),
}

impl ResizePolicy {
    /// 任意指定の幅・高さから ResizePolicy を作成
    pub fn from_dimensions(
        width: Option<u32>,
        height: Option<u32>,
    ) -> Result<Self, TransformError> {
        match (width, height) {
            (Some(width), Some(height)) => Ok(Self::Exact { width, height }),
            (Some(width), None) => Ok(Self::Width(width)),
            (None, Some(height)) => Ok(Self::Height(height)),
            (None, None) => Err(TransformError::InvalidParams(
                "either width or height is required".to_string(),
            )),
        }
    }

    /// 指定された幅・高さ（未指定は None）
    pub fn requested(&self) -> (Option<u32>, Option<u32>) {
        match *self {
            Self::Exact { width, height } => (Some(width), Some(height)),
            Self::Width(width) => (Some(width), None),
            Self::Height(height) => (None, Some(height)),
        }
    }
}

/// 変換オプション
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TranscodeOptions {
    pub policy: ResizePolicy,
    pub quality: u8,
}

impl TranscodeOptions {
    pub fn new(policy: ResizePolicy, quality: Option<u8>) -> Self {
        Self {
            policy,
            quality: quality.unwrap_or(DEFAULT_QUALITY),
        }
    }

    /// 方針だけ差し替えたオプションを返す
    pub fn with_policy(self, policy: ResizePolicy) -> Self {
        Self { policy, ..self }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_policy_from_dimensions() {
        assert_eq!(
            ResizePolicy::from_dimensions(Some(128), Some(96)).unwrap(),
            ResizePolicy::Exact {
                width: 128,
                height: 96
            }
        );
        assert_eq!(
            ResizePolicy::from_dimensions(Some(64), None).unwrap(),
            ResizePolicy::Width(64)
        );
        assert_eq!(
            ResizePolicy::from_dimensions(None, Some(64)).unwrap(),
            ResizePolicy::Height(64)
        );
        assert!(ResizePolicy::from_dimensions(None, None).is_err());
    }

    #[test]
    fn test_options_default_quality() {
        let options = TranscodeOptions::new(ResizePolicy::Width(64), None);
        assert_eq!(options.quality, DEFAULT_QUALITY);

        let options = options.with_policy(ResizePolicy::Height(10));
        assert_eq!(options.policy, ResizePolicy::Height(10));
        assert_eq!(options.quality, DEFAULT_QUALITY);
    }
}
