use std::sync::Arc;

use clap::Parser;
use eframe::egui;
use log::{info, warn};
use wake_client::{Dashboard, HttpProbe, MemoryStore, RestStore, RestStoreConfig, ServerStore};

mod app;
mod config;

use app::WakeDeckApp;
use config::AppConfig;

#[derive(Parser, Debug)]
#[command(name = "wakedeck", about = "Desktop dashboard for waking sleepy servers")]
struct Args {
    /// Backend REST endpoint, e.g. https://xyz.supabase.co
    #[arg(long)]
    backend_url: Option<String>,

    /// API key for the backend REST endpoint
    #[arg(long)]
    backend_api_key: Option<String>,

    /// Run against an in-memory store instead of a backend
    #[arg(long)]
    offline: bool,
}

fn main() -> Result<(), eframe::Error> {
    env_logger::init();

    let args = Args::parse();

    let mut config = AppConfig::load().unwrap_or_else(|e| {
        warn!("Failed to load config, using defaults: {}", e);
        AppConfig::default()
    });
    if let Some(url) = args.backend_url {
        config.backend_url = url;
    }
    if let Some(key) = args.backend_api_key {
        config.backend_api_key = key;
    }

    // The UI thread stays synchronous; all store and probe work runs on
    // this runtime.
    let runtime = tokio::runtime::Runtime::new().expect("failed to create tokio runtime");

    let store: Arc<dyn ServerStore> = if args.offline || config.backend_url.is_empty() {
        info!("Using in-memory server store (offline mode)");
        Arc::new(MemoryStore::new())
    } else {
        info!("Using REST server store at {}", config.backend_url);
        Arc::new(RestStore::new(RestStoreConfig {
            base_url: config.backend_url.clone(),
            api_key: config.backend_api_key.clone(),
            table: config.backend_table.clone(),
        }))
    };

    let dashboard = Dashboard::new(store, Arc::new(HttpProbe::new()), runtime.handle().clone());

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([900.0, 700.0])
            .with_title("WakeDeck"),
        ..Default::default()
    };

    eframe::run_native(
        "WakeDeck",
        options,
        Box::new(move |_cc| Ok(Box::new(WakeDeckApp::new(config, dashboard)))),
    )
}
