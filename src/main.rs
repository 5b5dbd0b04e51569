//! VizualNetwork: a launcher for third-party web proxy services
//!
//! This is the main entry point for the application.

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;
use vizualnetwork::{
    config::{self, Settings},
    engines::{build_proxy_url, EngineLoader},
    launch::SystemNavigator,
    network::HttpClient,
    probe::ConnectivityProbe,
    query::Target,
    theme::{self, FileThemeStore, ThemeStore},
    ui::{AppController, LaunchError, Notification},
    web::{create_router, AppState},
};

#[derive(Debug, Parser)]
#[command(name = "vizualnetwork", version, about = "Launcher for web proxy services")]
struct Cli {
    /// Path to configuration file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Run the web server (default)
    Serve,
    /// Print the proxy URL for a URL or search term
    Url {
        input: String,
        /// Engine id, defaults to the catalog default
        #[arg(short, long)]
        engine: Option<String>,
    },
    /// Open a URL or search term through a proxy in the default browser
    Open {
        input: String,
        #[arg(short, long)]
        engine: Option<String>,
    },
    /// List the proxy engines
    Engines {
        /// Check whether each engine answers
        #[arg(long)]
        probe: bool,
    },
    /// Show or change the saved theme
    Theme { name: Option<String> },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let settings = config::load(cli.config.as_deref())?;

    // Initialize logging
    let default_level = if settings.general.debug { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_target(false)
        .init();

    match cli.command.unwrap_or(Command::Serve) {
        Command::Serve => serve(settings).await,
        Command::Url { input, engine } => print_url(&settings, &input, engine.as_deref()),
        Command::Open { input, engine } => open(&settings, &input, engine.as_deref()),
        Command::Engines { probe } => list_engines(&settings, probe).await,
        Command::Theme { name } => theme_command(&settings, name.as_deref()),
    }
}

async fn serve(settings: Settings) -> Result<()> {
    info!("Starting VizualNetwork v{}", vizualnetwork::VERSION);
    info!(
        "Loaded configuration for instance: {}",
        settings.general.instance_name
    );

    // Initialize HTTP client
    let client = HttpClient::with_settings(&settings.outgoing)?;

    // Load engines
    let catalog = EngineLoader::load(&settings)?;

    // Create application state
    let state = AppState::new(settings.clone(), catalog, client)?;

    let _refresh = if settings.probe.enabled {
        info!(
            "Probing engines every {} seconds",
            settings.probe.interval_secs
        );
        Some(state.probe.spawn_refresh(
            state.catalog.clone(),
            Duration::from_secs(settings.probe.interval_secs),
        ))
    } else {
        None
    };

    // Create router
    let app = create_router(state);

    // Bind address
    let addr = SocketAddr::new(
        settings.server.bind_address.parse()?,
        settings.server.port,
    );

    info!("Starting server on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Controller for one CLI invocation, with `engine` selected if given
fn controller(settings: &Settings, engine: Option<&str>) -> Result<AppController> {
    let catalog = Arc::new(EngineLoader::load(settings)?);
    let mut app = AppController::new(catalog)
        .with_search_provider(settings.search.provider)
        .with_fallback_ttl(chrono::Duration::seconds(
            settings.launch.fallback_ttl_secs as i64,
        ))
        .with_themes(settings.ui.themes.clone());

    if let Some(id) = engine {
        if app.set_engine(id).is_err() {
            warn!(
                "Unknown engine {}, using {}",
                id,
                app.registry().current_id()
            );
        }
    }
    Ok(app)
}

fn print_notifications(notifications: &[Notification]) {
    for notification in notifications {
        println!("[{:?}] {}", notification.level, notification.message);
    }
}

fn print_url(settings: &Settings, input: &str, engine: Option<&str>) -> Result<()> {
    let app = controller(settings, engine)?;
    let target = Target::resolve(input, settings.search.provider)?;
    println!("{}", build_proxy_url(app.registry().current_id(), &target.url));
    Ok(())
}

fn open(settings: &Settings, input: &str, engine: Option<&str>) -> Result<()> {
    let mut app = controller(settings, engine)?;
    let result = app.submit_search(input, &SystemNavigator::new());
    print_notifications(app.notifications());

    match result {
        Ok(_) => Ok(()),
        Err(LaunchError::PopupBlocked { offer }) => {
            println!();
            println!("The browser did not open. Use the link directly:");
            println!("  {}", offer.proxy_url);
            for action in &offer.actions {
                println!("  - {}", action.label());
            }
            Ok(())
        }
        Err(e) => Err(e.into()),
    }
}

async fn list_engines(settings: &Settings, probe: bool) -> Result<()> {
    let catalog = EngineLoader::load(settings)?;
    let default_id = catalog.default_engine().id.clone();

    let reports = if probe {
        let client = HttpClient::with_settings(&settings.outgoing)?;
        let checker = ConnectivityProbe::new(client, &settings.probe);
        Some(checker.check_all(&catalog).await)
    } else {
        None
    };

    for (index, engine) in catalog.iter().enumerate() {
        let marker = if engine.id == default_id { "*" } else { " " };
        print!(
            "{} {} {:<12} {}",
            marker, engine.icon, engine.id, engine.description
        );
        if let Some(report) = reports.as_ref().and_then(|r| r.get(index)) {
            match report.latency_ms {
                Some(ms) => print!("  [{:?}, {}ms]", report.status, ms),
                None => print!("  [{:?}]", report.status),
            }
        }
        println!();
    }
    Ok(())
}

fn theme_command(settings: &Settings, name: Option<&str>) -> Result<()> {
    let store = FileThemeStore::user_default()?;

    match name {
        Some(name) => {
            let mut app = controller(settings, None)?;
            app.select_theme(name, &store)?;
            print_notifications(app.notifications());
        }
        None => {
            let stored = store.load()?;
            println!(
                "{}",
                theme::active_theme(
                    stored.as_deref(),
                    &settings.ui.themes,
                    &settings.ui.default_theme
                )
            );
        }
    }
    Ok(())
}
