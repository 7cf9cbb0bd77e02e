use std::fmt;

use async_trait::async_trait;
use aws_config::BehaviorVersion;
use aws_sdk_s3::Client;
use aws_sdk_s3::config::http::HttpResponse;
use aws_sdk_s3::config::{Credentials, Region};
use aws_sdk_s3::error::{DisplayErrorContext, ProvideErrorMetadata, SdkError};
use aws_sdk_s3::primitives::ByteStream;
use bytes::Bytes;

use super::{ObjectLocation, ObjectStore};
use crate::errors::StorageError;

/// 静的なアクセスキーの組
#[derive(Clone, PartialEq, Eq)]
pub struct StaticCredentials {
    pub access_key_id: String,
    pub secret_access_key: String,
}

impl fmt::Debug for StaticCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StaticCredentials")
            .field("access_key_id", &self.access_key_id)
            .field("secret_access_key", &"<redacted>")
            .finish()
    }
}

/// S3 クライアントの構築設定
///
/// 未指定の項目は AWS SDK の既定のチェーン（Lambda の実行ロールなど）に任せる
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StorageConfig {
    pub credentials: Option<StaticCredentials>,
    pub region: Option<String>,
    pub endpoint_url: Option<String>,
}

impl StorageConfig {
    /// 環境変数から StorageConfig を作成する
    ///
    /// 任意の環境変数:
    /// - ACCESS_KEY_AWS / SECRET_KEY_AWS（両方そろっている必要がある）
    /// - REGION_AWS
    /// - S3_ENDPOINT_URL
    pub fn from_env() -> Result<Self, String> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// 任意の参照関数から StorageConfig を作成する
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, String> {
        let non_empty = |name: &str| lookup(name).filter(|value| !value.trim().is_empty());

        let credentials = match (non_empty("ACCESS_KEY_AWS"), non_empty("SECRET_KEY_AWS")) {
            (Some(access_key_id), Some(secret_access_key)) => Some(StaticCredentials {
                access_key_id,
                secret_access_key,
            }),
            (None, None) => None,
            (Some(_), None) => return Err("SECRET_KEY_AWS is not set".to_string()),
            (None, Some(_)) => return Err("ACCESS_KEY_AWS is not set".to_string()),
        };

        Ok(Self {
            credentials,
            region: non_empty("REGION_AWS"),
            endpoint_url: non_empty("S3_ENDPOINT_URL"),
        })
    }
}

/// aws-sdk-s3 によるオブジェクトストア
#[derive(Clone, Debug)]
pub struct S3ObjectStore {
    client: Client,
}

impl S3ObjectStore {
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    /// 設定から S3 クライアントを構築する
    pub async fn connect(config: &StorageConfig) -> Self {
        let mut loader = aws_config::defaults(BehaviorVersion::latest());

        if let Some(region) = &config.region {
            loader = loader.region(Region::new(region.clone()));
        }
        if let Some(credentials) = &config.credentials {
            loader = loader.credentials_provider(Credentials::new(
                credentials.access_key_id.clone(),
                credentials.secret_access_key.clone(),
                None,
                None,
                "compressor-static",
            ));
        }
        if let Some(endpoint_url) = &config.endpoint_url {
            loader = loader.endpoint_url(endpoint_url);
        }

        let shared = loader.load().await;
        let mut builder = aws_sdk_s3::config::Builder::from(&shared);
        // MinIO / LocalStack はパス形式のみ対応
        if config.endpoint_url.is_some() {
            builder = builder.force_path_style(true);
        }

        Self::new(Client::from_conf(builder.build()))
    }
}

#[async_trait]
impl ObjectStore for S3ObjectStore {
    async fn get(&self, location: &ObjectLocation) -> Result<Bytes, StorageError> {
        let output = self
            .client
            .get_object()
            .bucket(&location.bucket)
            .key(&location.key)
            .send()
            .await
            .map_err(|e| {
                let not_found = e
                    .as_service_error()
                    .is_some_and(|service| service.is_no_such_key());
                classify_sdk_error(e, &location.key, not_found)
            })?;

        let data = output
            .body
            .collect()
            .await
            .map_err(|e| StorageError::Internal(e.to_string()))?
            .into_bytes();

        Ok(data)
    }

    async fn put(
        &self,
        location: &ObjectLocation,
        data: Bytes,
        content_type: &str,
    ) -> Result<(), StorageError> {
        self.client
            .put_object()
            .bucket(&location.bucket)
            .key(&location.key)
            .content_type(content_type)
            .body(ByteStream::from(data))
            .send()
            .await
            .map_err(|e| classify_sdk_error(e, &location.key, false))?;

        Ok(())
    }
}

/// SDK のエラーを StorageError に分類する
fn classify_sdk_error<E>(
    err: SdkError<E, HttpResponse>,
    key: &str,
    not_found: bool,
) -> StorageError
where
    E: ProvideErrorMetadata + std::error::Error + 'static,
{
    let status = err.raw_response().map(|response| response.status().as_u16());
    let code = err.as_service_error().and_then(|service| service.code());

    match (status, code) {
        _ if not_found => StorageError::NotFound {
            key: key.to_string(),
        },
        (Some(404), _) | (_, Some("NoSuchKey" | "NotFound")) => StorageError::NotFound {
            key: key.to_string(),
        },
        (Some(403), _) | (_, Some("AccessDenied" | "Forbidden")) => StorageError::Forbidden,
        _ => StorageError::Internal(DisplayErrorContext(&err).to_string()),
    }
}
