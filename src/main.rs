//! Quotation Desk - Desktop client for quotation, customer and sales management.

use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use eframe::egui;
use quotation_desk as app;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use app::config::{AppConfig, ConfigLoadResult};
use app::session::{AppContext, SessionStore};
use app::ui::{App, SetupApp, SetupWizard};

/// Desktop client for quotation, customer and sales management.
#[derive(Parser)]
#[command(name = "quotation-desk")]
struct Cli {
    /// Use config.toml from current directory (dev mode)
    #[arg(long)]
    dev: bool,
}

/// Application launch mode.
enum LaunchMode {
    /// Normal operation with valid config.
    Normal(AppConfig),
    /// Setup wizard for first run or invalid config.
    Setup(SetupWizard, Option<String>),
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let _log_guard = init_logging();

    tracing::info!("Quotation Desk starting...");

    // Determine config path based on mode
    let config_path = if cli.dev {
        tracing::info!("Dev mode: loading config from current directory");
        PathBuf::from("config.toml")
    } else {
        AppConfig::default_path()
    };
    tracing::info!("Config path: {:?}", config_path);

    let launch_mode = match AppConfig::try_load(&config_path) {
        ConfigLoadResult::Loaded(config) => {
            tracing::info!("Config loaded successfully");
            LaunchMode::Normal(config)
        }
        ConfigLoadResult::Missing => {
            tracing::info!("Config missing, starting setup wizard");
            LaunchMode::Setup(SetupWizard::new(), None)
        }
        ConfigLoadResult::Invalid(e) => {
            tracing::warn!("Config invalid: {}", e);
            LaunchMode::Setup(SetupWizard::new(), Some(e.to_string()))
        }
    };

    match launch_mode {
        LaunchMode::Normal(config) => run_main_app(config, config_path),
        LaunchMode::Setup(wizard, error) => run_setup_wizard(wizard, error, config_path),
    }
}

/// Log to stderr and to a daily file in the data directory.
///
/// The returned guard flushes the file writer on drop.
fn init_logging() -> Option<tracing_appender::non_blocking::WorkerGuard> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let log_dir = AppConfig::data_dir().join("logs");

    let (file_layer, guard) = match std::fs::create_dir_all(&log_dir) {
        Ok(()) => {
            let appender = tracing_appender::rolling::daily(&log_dir, "quotation-desk.log");
            let (writer, guard) = tracing_appender::non_blocking(appender);
            (Some(fmt::layer().with_ansi(false).with_writer(writer)), Some(guard))
        }
        Err(_) => (None, None),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(file_layer)
        .init();

    guard
}

fn install_fonts(ctx: &egui::Context) {
    let mut fonts = egui::FontDefinitions::default();
    egui_phosphor::add_to_fonts(&mut fonts, egui_phosphor::Variant::Regular);
    ctx.set_fonts(fonts);
}

/// Run the setup wizard.
fn run_setup_wizard(wizard: SetupWizard, initial_error: Option<String>, config_path: PathBuf) -> anyhow::Result<()> {
    let setup = SetupApp::new(wizard, initial_error, config_path).context("Failed to create tokio runtime")?;

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title("Quotation Desk - Setup")
            .with_inner_size([600.0, 500.0])
            .with_min_inner_size([500.0, 400.0])
            .with_resizable(true),
        ..Default::default()
    };

    eframe::run_native(
        "Quotation Desk - Setup",
        options,
        Box::new(|_cc| Ok(Box::new(setup))),
    )
    .map_err(|e| anyhow::anyhow!("Setup window failed: {e}"))
}

/// Run the main application.
fn run_main_app(config: AppConfig, config_path: PathBuf) -> anyhow::Result<()> {
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title("Quotation Desk")
            .with_inner_size([1200.0, 800.0])
            .with_min_inner_size([900.0, 600.0]),
        ..Default::default()
    };

    // Create tokio runtime for async operations
    let rt = tokio::runtime::Runtime::new().context("Failed to create tokio runtime")?;

    let ctx = AppContext::init(config, SessionStore::default_location()).context("Failed to initialise API client")?;
    tracing::info!("API endpoint: {}", ctx.api.base_url());
    if let Some(user) = ctx.user() {
        tracing::info!("Restored session for {}", user.sales_p_name);
    }

    eframe::run_native(
        "Quotation Desk",
        options,
        Box::new(|cc| {
            install_fonts(&cc.egui_ctx);
            Ok(Box::new(App::new(ctx, config_path, rt)))
        }),
    )
    .map_err(|e| anyhow::anyhow!("Main window failed: {e}"))
}
