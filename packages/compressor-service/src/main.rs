use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::{Parser, Subcommand};
use compressor_core::{ObjectStore, S3ObjectStore, TranscodeOptions};
use lambda_runtime::service_fn;
use tracing_subscriber::EnvFilter;

mod config;
mod event;
mod server;
#[cfg(test)]
mod test_support;

use config::AppConfig;

/// 各アダプタで共有する状態
///
/// S3 クライアントは起動時に一度だけ作り、以後は読み取り専用で使い回す
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn ObjectStore>,
    /// `policy` はイベントでサイズ指定がないときの既定値
    pub options: TranscodeOptions,
}

#[derive(Parser)]
#[command(name = "compressor")]
#[command(version, about = "Resize images stored in S3 and re-encode them as JPEG")]
struct Cli {
    // 省略時は Lambda ランタイムとして起動する
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Run a local HTTP server for development
    Local {
        /// Listen address
        #[arg(short, long, default_value = "0.0.0.0:3000", env = "LISTEN_ADDR")]
        addr: SocketAddr,

        /// Environment file loaded before reading the configuration
        #[arg(long, default_value = ".env")]
        env_file: PathBuf,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Some(Command::Local { addr, env_file }) => {
            let loaded = dotenvy::from_path(&env_file);
            init_tracing(false);
            if let Err(e) = loaded {
                tracing::warn!(path = %env_file.display(), error = %e, "env file not loaded");
            }

            let state = build_state().await?;
            server::serve(addr, state).await
        }
        None => {
            init_tracing(true);
            let state = build_state().await?;

            lambda_runtime::run(service_fn(|event| event::function_handler(event, &state)))
                .await
                .map_err(|e| anyhow::anyhow!(e))
        }
    }
}

async fn build_state() -> anyhow::Result<AppState> {
    let config = AppConfig::from_env().context("failed to load configuration")?;
    tracing::info!(
        region = ?config.storage.region,
        endpoint = ?config.storage.endpoint_url,
        static_credentials = config.storage.credentials.is_some(),
        target = ?config.event_target,
        quality = config.jpeg_quality,
        "configuration loaded"
    );

    let store = S3ObjectStore::connect(&config.storage).await;
    Ok(AppState {
        store: Arc::new(store),
        options: config.transcode_options(),
    })
}

/// Lambda では CloudWatch 向けに JSON（時刻はランタイム側が付ける）、
/// ローカルでは人が読む形式で出力する
fn init_tracing(json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false);

    if json {
        builder.json().with_ansi(false).without_time().init();
    } else {
        builder.init();
    }
}
