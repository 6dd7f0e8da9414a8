use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use api_ingress::{ApiIngress, ApiIngressConfig, RestfulModule};
use clap::{Parser, Subcommand};
use mimalloc::MiMalloc;
use runtime::{AppConfig, CliArgs};
use shop::config::ShopConfig;
use shop::Shop;
use tokio_util::sync::CancellationToken;

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

/// SLC Shop Server - membership shop backed by JSON stores
#[derive(Parser)]
#[command(name = "slc-server")]
#[command(about = "SLC Shop Server - membership shop backed by JSON stores")]
#[command(version)]
struct Cli {
    /// Path to configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Port for HTTP server (overrides config)
    #[arg(short, long)]
    port: Option<u16>,

    /// Print current configuration and exit
    #[arg(long)]
    print_config: bool,

    /// Log verbosity level (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the server
    Run,
    /// Check configuration
    Check,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let args = CliArgs {
        config: cli.config.as_ref().map(|p| p.to_string_lossy().to_string()),
        port: cli.port,
        print_config: cli.print_config,
        verbose: cli.verbose,
    };

    // Load configuration (normalized home_dir is applied inside)
    let mut config = AppConfig::load_or_default(cli.config.as_deref())?;
    config.apply_cli_overrides(&args);

    let logging_config = config.logging.clone().unwrap_or_default();
    runtime::logging::init_logging_from_config(&logging_config, &config.home_dir());
    tracing::info!("SLC Shop Server starting");

    if args.print_config {
        println!("{}", config.to_yaml()?);
        return Ok(());
    }

    match cli.command.unwrap_or(Commands::Run) {
        Commands::Run => run_server(config).await,
        Commands::Check => check_config(config),
    }
}

/// Module sections of the config bag, validated.
struct ModuleConfigs {
    ingress: ApiIngressConfig,
    shop: ShopConfig,
}

fn module_configs(config: &AppConfig) -> Result<ModuleConfigs> {
    let mut ingress: ApiIngressConfig = config.module_config("api_ingress")?;
    if ingress.bind_addr.trim().is_empty() {
        ingress.bind_addr = format!("{}:{}", config.server.host, config.server.port);
    }
    let shop: ShopConfig = config.module_config("shop")?;
    Ok(ModuleConfigs { ingress, shop })
}

fn request_timeout(config: &AppConfig) -> Duration {
    match config.server.timeout_sec {
        0 => api_ingress::DEFAULT_REQUEST_TIMEOUT,
        secs => Duration::from_secs(secs),
    }
}

async fn run_server(config: AppConfig) -> Result<()> {
    tracing::info!("Initializing modules...");
    let modules = module_configs(&config)?;

    let shop = Shop::init(modules.shop, &config.home_dir())
        .await
        .context("Failed to initialize shop module")?;
    tracing::info!(data_dir = %shop.data_dir().display(), "Shop module ready");

    let ingress = ApiIngress::new(modules.ingress, request_timeout(&config));
    let routes = shop.register_rest(axum::Router::new(), &ingress)?;
    let router = ingress.build_router(routes);

    let cancel = CancellationToken::new();
    let signal_cancel = cancel.clone();
    tokio::spawn(async move {
        if let Err(e) = runtime::shutdown::wait_for_shutdown().await {
            tracing::error!("Shutdown signal handler failed: {e:#}");
        }
        signal_cancel.cancel();
    });

    ingress.serve(router, cancel).await?;
    tracing::info!("SLC Shop Server stopped");
    Ok(())
}

fn check_config(config: AppConfig) -> Result<()> {
    tracing::info!("Checking configuration...");

    // AppConfig::load_* already normalized & created home_dir
    let modules = module_configs(&config)?;
    modules
        .ingress
        .bind_addr
        .parse::<std::net::SocketAddr>()
        .with_context(|| format!("Invalid bind address '{}'", modules.ingress.bind_addr))?;

    tracing::info!("Configuration is valid");
    println!("Configuration check passed");
    println!("Server config:");
    println!("{}", config.to_yaml()?);
    Ok(())
}
