//! linepatch server entry point.
//!
//! Loads the configuration, opens the template store and serves the HTTP API
//! plus the static UI until Ctrl+C.
//!
//! # Usage
//!
//! ```text
//! linepatch [OPTIONS]
//!
//! Options:
//!   --config        <FILE>  Config file [default: platform config dir]
//!   --bind          <IP>    Listen address [default: 127.0.0.1]
//!   --port          <PORT>  Listen port [default: 8080]
//!   --templates-dir <DIR>   Template records directory [default: ./data/templates]
//!   --static-dir    <DIR>   UI assets directory [default: ./web/dist]
//!   --no-browser            Do not open the UI in a browser on start
//!   --log-level     <LEVEL> Log filter when RUST_LOG is unset [default: info]
//! ```
//!
//! # Precedence
//!
//! Command-line flags win over `LINEPATCH_*` environment variables, which win
//! over the config file, which wins over the built-in defaults.  `RUST_LOG`,
//! when set, overrides every other log level setting.
//!
//! | Variable                  | Flag              |
//! |---------------------------|-------------------|
//! | `LINEPATCH_CONFIG`        | `--config`        |
//! | `LINEPATCH_BIND`          | `--bind`          |
//! | `LINEPATCH_PORT`          | `--port`          |
//! | `LINEPATCH_TEMPLATES_DIR` | `--templates-dir` |
//! | `LINEPATCH_STATIC_DIR`    | `--static-dir`    |
//! | `LINEPATCH_NO_BROWSER`    | `--no-browser`    |
//! | `LINEPATCH_LOG_LEVEL`     | `--log-level`     |

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use tokio::net::TcpListener;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use linepatch_server::infrastructure::browser::open_browser;
use linepatch_server::infrastructure::http::{router, run_server, ApiState};
use linepatch_server::infrastructure::storage::config::{
    load_config, load_config_from, AppConfig, ConfigError,
};
use linepatch_server::infrastructure::storage::template_store::JsonTemplateStore;

// ── CLI argument definitions ──────────────────────────────────────────────────

/// Local web UI for editing values embedded in configuration files.
///
/// Every option left unset falls back to the config file, then to the
/// built-in default.
#[derive(Debug, Parser)]
#[command(
    name = "linepatch",
    about = "Template-driven editor for values embedded in text config files",
    version
)]
struct Cli {
    /// Path of the TOML config file.
    #[arg(long, env = "LINEPATCH_CONFIG")]
    config: Option<PathBuf>,

    /// IP address to bind the HTTP server to.
    #[arg(long, env = "LINEPATCH_BIND")]
    bind: Option<String>,

    /// TCP port of the HTTP server.
    #[arg(long, env = "LINEPATCH_PORT")]
    port: Option<u16>,

    /// Directory holding the template records.
    #[arg(long, env = "LINEPATCH_TEMPLATES_DIR")]
    templates_dir: Option<PathBuf>,

    /// Directory of the built UI assets.
    #[arg(long, env = "LINEPATCH_STATIC_DIR")]
    static_dir: Option<PathBuf>,

    /// Do not open the UI in the default browser on start.
    #[arg(long, env = "LINEPATCH_NO_BROWSER")]
    no_browser: bool,

    /// Log filter used when `RUST_LOG` is unset (e.g. `debug`).
    #[arg(long, env = "LINEPATCH_LOG_LEVEL")]
    log_level: Option<String>,
}

impl Cli {
    /// Loads the config file named by `--config`, or the one in the platform
    /// config directory, and applies the command-line overrides.
    ///
    /// # Errors
    ///
    /// Returns an error when the config file exists but cannot be read or
    /// parsed.
    fn load_app_config(&self) -> anyhow::Result<AppConfig> {
        let config = match &self.config {
            Some(path) => load_config_from(path)
                .with_context(|| format!("failed to load config from {}", path.display()))?,
            None => match load_config() {
                Ok(config) => config,
                Err(ConfigError::NoPlatformConfigDir) => AppConfig::default(),
                Err(e) => return Err(e).context("failed to load config"),
            },
        };
        Ok(self.apply_overrides(config))
    }

    /// Overwrites every config value that was given on the command line.
    fn apply_overrides(&self, mut config: AppConfig) -> AppConfig {
        if let Some(bind) = &self.bind {
            config.server.bind_address = bind.clone();
        }
        if let Some(port) = self.port {
            config.server.port = port;
        }
        if let Some(dir) = &self.templates_dir {
            config.storage.templates_dir = dir.clone();
        }
        if let Some(dir) = &self.static_dir {
            config.web.static_dir = dir.clone();
        }
        if self.no_browser {
            config.server.open_browser = false;
        }
        if let Some(level) = &self.log_level {
            config.logging.level = level.clone();
        }
        config
    }
}

/// Parses the configured bind address and port.
///
/// # Errors
///
/// Returns an error if `bind_address` is not a valid IP address.
fn listen_addr(config: &AppConfig) -> anyhow::Result<SocketAddr> {
    let server = &config.server;
    format!("{}:{}", server.bind_address, server.port)
        .parse()
        .with_context(|| {
            format!(
                "invalid bind address: '{}:{}'",
                server.bind_address, server.port
            )
        })
}

/// The URL a local browser should open for a server bound to `addr`.
fn browser_url(addr: SocketAddr) -> String {
    if addr.ip().is_unspecified() {
        format!("http://127.0.0.1:{}", addr.port())
    } else {
        format!("http://{addr}")
    }
}

/// Resolves once Ctrl+C is received.
async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => info!("received Ctrl+C, shutting down"),
        Err(e) => {
            error!("failed to listen for Ctrl+C signal: {e}");
            std::future::pending::<()>().await;
        }
    }
}

// ── Entry point ───────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = cli.load_app_config()?;

    // `RUST_LOG` wins; otherwise the configured level, otherwise `info`.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .or_else(|_| EnvFilter::try_new(&config.logging.level))
                .unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    info!("linepatch {} starting", env!("CARGO_PKG_VERSION"));

    let addr = listen_addr(&config)?;
    let store = JsonTemplateStore::open(&config.storage.templates_dir).with_context(|| {
        format!(
            "failed to open template store at {}",
            config.storage.templates_dir.display()
        )
    })?;
    if !config.web.static_dir.is_dir() {
        warn!(
            "static UI directory {} does not exist; only the API is served",
            config.web.static_dir.display()
        );
    }

    let app = router(ApiState::new(Arc::new(store)), &config.web.static_dir);
    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;

    if config.server.open_browser {
        let local = listener.local_addr().unwrap_or(addr);
        open_browser(&browser_url(local));
    }

    run_server(listener, app, shutdown_signal())
        .await
        .context("HTTP server failed")?;

    info!("linepatch stopped");
    Ok(())
}

// ── Tests ─────────────────────────────────────────────────────────────────────
