//! Command-line surface: `serve` and `audit`.

use std::net::{IpAddr, Ipv4Addr};
use std::path::{Path, PathBuf};
use std::time::Duration;

use clap::{Args, Parser, Subcommand};
use pageminer_i18n::I18nConfig;
use pageminer_telemetry::{DEFAULT_LOG_LEVEL, LogFormat, LoggingConfig, init_logging};
use tracing::info;
use url::Url;

use crate::audit::run_audit;
use crate::error::{ServerError, ServerResult};
use crate::fetch::{DEFAULT_TIMEOUT_SECS, NativeFetcher};
use crate::serve::{
    DEFAULT_PORT, DEFAULT_PORT_ATTEMPTS, PreviewServer, bind_with_fallback, shutdown_signal,
};

const DEFAULT_BIND: IpAddr = IpAddr::V4(Ipv4Addr::LOCALHOST);

/// Top-level arguments.
#[derive(Debug, Parser)]
#[command(
    name = "pageminer-server",
    about = "Preview the PageMiner landing page and audit its translations"
)]
pub struct Cli {
    /// Log level used when `RUST_LOG` is unset.
    #[arg(long, global = true, env = "PAGEMINER_LOG_LEVEL", default_value = DEFAULT_LOG_LEVEL)]
    pub log_level: String,
    /// Log output format (`pretty` or `json`); inferred from the build when omitted.
    #[arg(long, global = true, env = "PAGEMINER_LOG_FORMAT")]
    pub log_format: Option<LogFormat>,
    /// Command to run.
    #[command(subcommand)]
    pub command: Command,
}

/// Subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Serve the site directory with permissive CORS headers.
    Serve(ServeArgs),
    /// Load every locale and report failures and missing keys.
    Audit(AuditArgs),
}

/// Arguments for `serve`.
#[derive(Debug, Args)]
pub struct ServeArgs {
    /// Site directory to serve.
    #[arg(long, env = "PAGEMINER_ROOT", default_value = ".")]
    pub root: PathBuf,
    /// First port to try.
    #[arg(long, env = "PAGEMINER_PORT", default_value_t = DEFAULT_PORT)]
    pub port: u16,
    /// Interface to bind.
    #[arg(long, env = "PAGEMINER_BIND", default_value_t = DEFAULT_BIND)]
    pub bind: IpAddr,
    /// Consecutive ports to try while the address is in use.
    #[arg(
        long,
        env = "PAGEMINER_PORT_ATTEMPTS",
        default_value_t = DEFAULT_PORT_ATTEMPTS,
        value_parser = clap::value_parser!(u16).range(1..)
    )]
    pub port_attempts: u16,
}

/// Arguments for `audit`.
#[derive(Debug, Args)]
pub struct AuditArgs {
    /// Site directory relative sources resolve against.
    #[arg(long, env = "PAGEMINER_ROOT", default_value = ".")]
    pub root: PathBuf,
    /// Localization configuration (JSON); built-in defaults when omitted.
    #[arg(long, env = "PAGEMINER_I18N_CONFIG")]
    pub config: Option<PathBuf>,
    /// Origin substituted into `{origin}` sources, e.g. a running preview server.
    #[arg(long, env = "PAGEMINER_ORIGIN", value_parser = parse_url)]
    pub origin: Option<Url>,
    /// Emit the report as JSON.
    #[arg(long)]
    pub json: bool,
    /// Timeout in seconds for remote sources.
    #[arg(long, env = "PAGEMINER_HTTP_TIMEOUT_SECS", default_value_t = DEFAULT_TIMEOUT_SECS)]
    pub timeout: u64,
}

/// Install logging and run the selected command.
///
/// # Errors
///
/// Returns the first [`ServerError`] raised by the command.
pub async fn run(cli: Cli) -> ServerResult<()> {
    let logging = LoggingConfig {
        level: &cli.log_level,
        format: cli.log_format.unwrap_or_else(LogFormat::infer),
    };
    init_logging(&logging).map_err(|err| ServerError::telemetry("telemetry.init", err))?;

    match cli.command {
        Command::Serve(args) => serve(args).await,
        Command::Audit(args) => audit(args).await,
    }
}

async fn serve(args: ServeArgs) -> ServerResult<()> {
    ensure_root(&args.root)?;
    let listener = bind_with_fallback(args.bind, args.port, args.port_attempts).await?;
    info!(root = %args.root.display(), "serving site directory; press Ctrl+C to stop");
    PreviewServer::new(&args.root)
        .serve(listener, shutdown_signal())
        .await
}

async fn audit(args: AuditArgs) -> ServerResult<()> {
    ensure_root(&args.root)?;
    let config = load_config(args.config.as_deref()).await?;
    let fetcher = NativeFetcher::new(
        &args.root,
        args.origin.as_ref(),
        Duration::from_secs(args.timeout),
    )?;

    let report = run_audit(&config, &fetcher).await?;
    if args.json {
        println!("{}", report.render_json()?);
    } else {
        print!("{}", report.render_text());
    }
    report.ensure_fallback()
}

/// Read and validate a configuration file, or fall back to the defaults.
///
/// # Errors
///
/// Returns [`ServerError::Io`] when the file cannot be read and
/// [`ServerError::Config`] when it is invalid.
pub async fn load_config(path: Option<&Path>) -> ServerResult<I18nConfig> {
    let Some(path) = path else {
        return Ok(I18nConfig::default());
    };
    let raw = tokio::fs::read_to_string(path)
        .await
        .map_err(|source| ServerError::io("config.read", Some(path.to_path_buf()), source))?;
    I18nConfig::from_json_str(&raw).map_err(|source| ServerError::Config {
        path: Some(path.to_path_buf()),
        source,
    })
}

fn ensure_root(root: &Path) -> ServerResult<()> {
    if root.is_dir() {
        Ok(())
    } else {
        Err(ServerError::MissingRoot {
            path: root.to_path_buf(),
        })
    }
}

fn parse_url(raw: &str) -> Result<Url, String> {
    let url = Url::parse(raw).map_err(|err| err.to_string())?;
    match url.scheme() {
        "http" | "https" => Ok(url),
        other => Err(format!("unsupported scheme `{other}`")),
    }
}
