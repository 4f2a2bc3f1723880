//! boxscoutd — the boxscout daemon.
//!
//! Single binary that assembles the subsystems:
//! - NetBox inventory client
//! - Derivation pipeline + file reconciler, driven by the scheduler
//! - Webhook listener for out-of-band refresh triggers
//!
//! # Usage
//!
//! ```text
//! boxscoutd run --url https://netbox.example.com --directory /var/lib/prometheus/file_sd
//! ```

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use clap::{Parser, Subcommand};
use tokio::sync::watch;
use tracing::info;

use boxscout_core::config::{
    Config, DEFAULT_BACKOFF_MAX_SECS, DEFAULT_BACKOFF_MIN_SECS, DEFAULT_INTERVAL_SECS,
    DEFAULT_LISTEN,
};
use boxscout_inventory::NetBoxClient;
use boxscout_scheduler::{Backoff, FetchCallback, Scheduler};

#[derive(Parser)]
#[command(name = "boxscoutd", about = "NetBox → Prometheus file_sd sync daemon")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run the sync daemon.
    Run {
        /// Base URL of the NetBox instance.
        #[arg(long)]
        url: Option<String>,

        /// NetBox API token.
        #[arg(long, env = "NETBOX_TOKEN", hide_env_values = true)]
        token: Option<String>,

        /// Output directory for target list files.
        #[arg(long)]
        directory: Option<PathBuf>,

        /// Periodic refresh interval in seconds.
        #[arg(long)]
        interval: Option<u64>,

        /// Webhook listen address, e.g. 0.0.0.0:9099.
        #[arg(long)]
        listen: Option<SocketAddr>,

        /// Path to a boxscout.toml config file.
        #[arg(long)]
        config: Option<PathBuf>,
    },
}

/// Fully-resolved runtime settings: CLI over config file over defaults.
struct Settings {
    url: String,
    token: String,
    directory: PathBuf,
    interval: Duration,
    backoff_min: Duration,
    backoff_max: Duration,
    listen: SocketAddr,
}

fn resolve(
    url: Option<String>,
    token: Option<String>,
    directory: Option<PathBuf>,
    interval: Option<u64>,
    listen: Option<SocketAddr>,
    file: Config,
) -> anyhow::Result<Settings> {
    let netbox = file.netbox.unwrap_or_default();
    let output = file.output.unwrap_or_default();
    let schedule = file.schedule.unwrap_or_default();
    let webhook = file.webhook.unwrap_or_default();

    let url = url
        .or(netbox.url)
        .context("NetBox URL missing: pass --url or set [netbox] url")?;
    let token = token
        .or(netbox.token)
        .context("NetBox token missing: pass --token, set NETBOX_TOKEN, or set [netbox] token")?;
    let directory = directory
        .or(output.directory.map(PathBuf::from))
        .context("output directory missing: pass --directory or set [output] directory")?;

    let interval = Duration::from_secs(
        interval
            .or(schedule.interval_secs)
            .unwrap_or(DEFAULT_INTERVAL_SECS),
    );
    let backoff_min =
        Duration::from_secs(schedule.backoff_min_secs.unwrap_or(DEFAULT_BACKOFF_MIN_SECS));
    let backoff_max =
        Duration::from_secs(schedule.backoff_max_secs.unwrap_or(DEFAULT_BACKOFF_MAX_SECS));

    let listen = match listen {
        Some(listen) => listen,
        None => webhook
            .listen
            .as_deref()
            .unwrap_or(DEFAULT_LISTEN)
            .parse()
            .context("invalid webhook listen address")?,
    };

    Ok(Settings {
        url,
        token,
        directory,
        interval,
        backoff_min,
        backoff_max,
        listen,
    })
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing.
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,boxscoutd=debug,boxscout=debug".parse().unwrap()),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Command::Run {
            url,
            token,
            directory,
            interval,
            listen,
            config,
        } => {
            let file = match config {
                Some(path) => Config::from_file(&path)
                    .with_context(|| format!("failed to load {}", path.display()))?,
                None => Config::default(),
            };
            let settings = resolve(url, token, directory, interval, listen, file)?;
            run_daemon(settings).await
        }
    }
}

async fn run_daemon(settings: Settings) -> anyhow::Result<()> {
    info!("boxscoutd starting");

    // The output directory must be usable before scheduling begins.
    std::fs::create_dir_all(&settings.directory).with_context(|| {
        format!(
            "cannot create output directory {}",
            settings.directory.display()
        )
    })?;

    let client = Arc::new(NetBoxClient::new(&settings.url, &settings.token));
    let fetch: FetchCallback = Box::new(move || {
        let client = client.clone();
        Box::pin(async move { Ok(client.list_records().await?) })
    });

    let mut scheduler = Scheduler::new(
        fetch,
        settings.directory.clone(),
        settings.interval,
        Backoff::new(settings.backoff_min, settings.backoff_max),
    );
    let trigger = scheduler.trigger();

    // ── Shutdown signal ────────────────────────────────────────

    let (shutdown_tx, shutdown_rx) = watch::channel(false);

    // ── Start the reconciliation loop ──────────────────────────

    let scheduler_handle = tokio::spawn(async move {
        scheduler.run(shutdown_rx).await;
    });

    // ── Start the webhook listener ─────────────────────────────

    let router = boxscout_api::build_router(trigger);
    info!(addr = %settings.listen, "webhook listener starting");
    let listener = tokio::net::TcpListener::bind(settings.listen).await?;

    // Graceful shutdown on Ctrl-C.
    let server = axum::serve(listener, router).with_graceful_shutdown(async move {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install CTRL+C handler");
        info!("shutdown signal received");
        let _ = shutdown_tx.send(true);
    });

    server.await?;

    let _ = scheduler_handle.await;

    info!("boxscoutd stopped");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolve_requires_url_token_and_directory() {
        assert!(resolve(None, None, None, None, None, Config::default()).is_err());
        assert!(
            resolve(
                Some("http://nb".to_string()),
                Some("t".to_string()),
                None,
                None,
                None,
                Config::default()
            )
            .is_err()
        );
    }

    #[test]
    fn resolve_applies_defaults() {
        let settings = resolve(
            Some("http://nb".to_string()),
            Some("t".to_string()),
            Some(PathBuf::from("/tmp/sd")),
            None,
            None,
            Config::default(),
        )
        .unwrap();
        assert_eq!(settings.interval, Duration::from_secs(1800));
        assert_eq!(settings.backoff_min, Duration::from_secs(10));
        assert_eq!(settings.backoff_max, Duration::from_secs(320));
        assert_eq!(settings.listen, "0.0.0.0:9099".parse().unwrap());
    }

    #[test]
    fn cli_overrides_config_file() {
        let file: Config = toml::from_str(
            r#"
[netbox]
url = "http://file-nb"
token = "file-token"

[schedule]
interval_secs = 600
"#,
        )
        .unwrap();
        let settings = resolve(
            Some("http://cli-nb".to_string()),
            None,
            Some(PathBuf::from("/tmp/sd")),
            Some(60),
            None,
            file,
        )
        .unwrap();
        assert_eq!(settings.url, "http://cli-nb");
        assert_eq!(settings.token, "file-token");
        assert_eq!(settings.interval, Duration::from_secs(60));
    }
}
