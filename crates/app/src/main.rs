use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;

use dioxus::LaunchBuilder;
use dioxus::desktop::{Config as DesktopConfig, WindowBuilder, WindowCloseBehaviour};
use services::{AppServices, Clock, SiteConfig};
use tracing::Level;
use tracing_subscriber::FmtSubscriber;
use ui::{App, UiApp, build_app_context};

#[derive(Debug)]
enum ArgsError {
    MissingValue { flag: &'static str },
    UnknownArg(String),
    InvalidDbUrl { raw: String },
    InvalidLogLevel { raw: String },
}

impl fmt::Display for ArgsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgsError::MissingValue { flag } => write!(f, "{flag} requires a value"),
            ArgsError::UnknownArg(arg) => write!(f, "unknown argument: {arg}"),
            ArgsError::InvalidDbUrl { raw } => write!(f, "invalid --db value: {raw}"),
            ArgsError::InvalidLogLevel { raw } => write!(f, "invalid ASSESS_LOG value: {raw}"),
        }
    }
}

impl std::error::Error for ArgsError {}

fn require_value(
    args: &mut impl Iterator<Item = String>,
    flag: &'static str,
) -> Result<String, ArgsError> {
    args.next().ok_or(ArgsError::MissingValue { flag })
}

fn print_usage() {
    eprintln!("Usage:");
    eprintln!("  cargo run -p app -- ui       [--db <sqlite_url>] [--dataset <path>]");
    eprintln!("  cargo run -p app -- precache [--db <sqlite_url>] [--origin <url>] [--cache-version <tag>]");
    eprintln!();
    eprintln!("Defaults:");
    eprintln!("  --db sqlite://assess.sqlite3");
    eprintln!("  --origin http://localhost:8080");
    eprintln!("  --cache-version v1");
    eprintln!();
    eprintln!("Environment:");
    eprintln!("  ASSESS_DB_URL, ASSESS_ORIGIN, ASSESS_CACHE_VERSION, ASSESS_OFFLINE_FALLBACK,");
    eprintln!("  ASSESS_DATASET, ASSESS_POSTAL_API, ASSESS_LOG (error|warn|info|debug|trace)");
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Command {
    Ui,
    Precache,
}

impl Command {
    fn from_arg(arg: &str) -> Option<Self> {
        match arg {
            "ui" => Some(Self::Ui),
            "precache" => Some(Self::Precache),
            _ => None,
        }
    }
}

/// Apply command-line overrides on top of the environment configuration.
fn parse_config(
    args: &mut impl Iterator<Item = String>,
    mut config: SiteConfig,
) -> Result<SiteConfig, ArgsError> {
    config.db_url = normalize_sqlite_url(config.db_url);

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--db" => {
                let value = require_value(args, "--db")?;
                if value.trim().is_empty() {
                    return Err(ArgsError::InvalidDbUrl { raw: value });
                }
                config.db_url = normalize_sqlite_url(value);
            }
            "--origin" => config.origin = require_value(args, "--origin")?,
            "--cache-version" => config.cache_version = require_value(args, "--cache-version")?,
            "--dataset" => config.dataset_path = Some(PathBuf::from(require_value(args, "--dataset")?)),
            "--help" | "-h" => {
                print_usage();
                std::process::exit(0);
            }
            _ => return Err(ArgsError::UnknownArg(arg)),
        }
    }

    Ok(config)
}

fn normalize_sqlite_url(raw: String) -> String {
    if raw == "sqlite::memory:" || raw.starts_with("sqlite://") {
        return raw;
    }

    let trimmed = raw.trim().to_string();
    let path_str = trimmed
        .strip_prefix("sqlite:")
        .unwrap_or(trimmed.as_str())
        .to_string();
    let path = std::path::Path::new(&path_str);
    let absolute = if path.is_absolute() {
        path.to_path_buf()
    } else {
        std::env::current_dir()
            .unwrap_or_else(|_| PathBuf::from("."))
            .join(path)
    };
    format!("sqlite://{}", absolute.display())
}

fn log_level() -> Result<Level, ArgsError> {
    match std::env::var("ASSESS_LOG") {
        Ok(raw) => raw
            .trim()
            .parse::<Level>()
            .map_err(|_| ArgsError::InvalidLogLevel { raw }),
        Err(_) => Ok(Level::INFO),
    }
}

fn init_logging() -> Result<(), Box<dyn std::error::Error>> {
    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level()?)
        .with_target(false)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;
    Ok(())
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    init_logging()?;
    let mut argv: Vec<String> = std::env::args().skip(1).collect();

    // No subcommand launches the UI.
    let cmd = match argv.first().map(String::as_str) {
        None => Command::Ui,
        Some("--help" | "-h") => {
            print_usage();
            return Ok(());
        }
        Some(first) if first.starts_with("--") => Command::Ui,
        Some(first) => Command::from_arg(first).ok_or_else(|| {
            eprintln!("unknown subcommand: {first}");
            print_usage();
            std::io::Error::new(std::io::ErrorKind::InvalidInput, "unknown subcommand")
        })?,
    };

    if !argv.is_empty() && !argv[0].starts_with("--") {
        argv.remove(0);
    }

    let mut iter = argv.into_iter();
    let config = parse_config(&mut iter, SiteConfig::from_env()).map_err(|e| {
        eprintln!("{e}");
        print_usage();
        e
    })?;

    // Storage setup stays in the binary so services never touch the filesystem layout.
    prepare_sqlite_file(&config.db_url)?;
    let services = AppServices::new_sqlite(&config, Clock::System).await?;

    match cmd {
        Command::Ui => {
            let app: Arc<dyn UiApp> = Arc::new(services);
            let context = build_app_context(&app);

            // The wizard decides whether a close goes through; see `WindowCloseGuard`.
            let desktop_cfg = DesktopConfig::new()
                .with_window(
                    WindowBuilder::new()
                        .with_title("Business Assessment")
                        .with_always_on_top(false),
                )
                .with_close_behaviour(WindowCloseBehaviour::WindowHides);

            LaunchBuilder::desktop()
                .with_cfg(desktop_cfg)
                .with_context(context)
                .launch(App);
            Ok(())
        }
        Command::Precache => {
            let controller = services.cache_controller();
            let installed = controller.install().await?;
            println!(
                "installed {}: {} cached, {} failed",
                installed.bucket,
                installed.cached.len(),
                installed.failed.len()
            );
            for (url, reason) in &installed.failed {
                println!("  failed {url}: {reason}");
            }

            let activated = controller.activate().await?;
            for bucket in &activated.deleted {
                println!("deleted stale bucket {bucket}");
            }
            println!("state: {}", controller.state());
            Ok(())
        }
    }
}

fn prepare_sqlite_file(db_url: &str) -> Result<(), Box<dyn std::error::Error>> {
    if db_url == "sqlite::memory:" {
        return Ok(());
    }

    let path = db_url
        .strip_prefix("sqlite://")
        .ok_or_else(|| ArgsError::InvalidDbUrl {
            raw: db_url.to_string(),
        })?;
    let path = path.split('?').next().unwrap_or(path);
    if path.is_empty() {
        return Err(ArgsError::InvalidDbUrl {
            raw: db_url.to_string(),
        }
        .into());
    }

    let path = std::path::Path::new(path);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    if !path.exists() {
        std::fs::OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(false)
            .open(path)?;
    }

    Ok(())
}

#[tokio::main]
async fn main() {
    if let Err(err) = run().await {
        eprintln!("{err}");
        std::process::exit(2);
    }
}
