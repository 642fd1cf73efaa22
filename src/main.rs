mod cli;

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use clap::Parser;
use cli::{Cli, Commands};

use reelbot::{bot, catalog, config, delivery, pipeline, relay, resolver, translate};

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    // Respect RUST_LOG env var if set, otherwise use defaults based on verbose flag
    let env_filter = std::env::var("RUST_LOG").unwrap_or_else(|_| {
        if cli.verbose {
            "reelbot=trace,tower_http=debug".to_string()
        } else {
            "reelbot=debug,tower_http=info".to_string()
        }
    });

    tracing_subscriber::fmt()
        .with_env_filter(&env_filter)
        .init();

    match cli.command {
        Commands::Start => {
            let rt = tokio::runtime::Runtime::new()?;
            rt.block_on(start_bot(cli.config.as_deref()))
        }
        Commands::Relay { host, port } => {
            let rt = tokio::runtime::Runtime::new()?;
            rt.block_on(start_relay(cli.config.as_deref(), host, port))
        }
        Commands::Validate {
            config: config_path,
        } => {
            let path = config_path.or(cli.config);
            validate_config(path.as_deref())
        }
        Commands::Version => {
            println!("reelbot {}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
    }
}

async fn start_bot(config_path: Option<&Path>) -> Result<()> {
    let config = config::load_config_or_default(config_path)?;
    config::validate_credentials(&config)?;

    tracing::info!("Starting reelbot");
    tracing::info!(
        "Catalog: {} (cache TTL {}s), translation target: {}",
        config.catalog.base_url,
        config.catalog.cache_ttl_secs,
        config.translator.language
    );

    let catalog_client = Arc::new(catalog::CatalogClient::new(&config.catalog));
    let fetcher = catalog::CatalogFetcher::new(
        catalog_client.clone(),
        Duration::from_secs(config.catalog.cache_ttl_secs),
    );
    let translator: Arc<dyn translate::Translator> =
        Arc::new(translate::GoogleTranslator::new(&config.translator));
    let resolver = resolver::DetailResolver::new(
        catalog_client,
        translator,
        config.translator.language.clone(),
    );
    let delivery = delivery::MediaDelivery::new(&config.delivery);
    let pipeline = pipeline::CommandPipeline::new(fetcher, resolver, delivery);

    let transport: Arc<dyn bot::ChatTransport> = Arc::new(bot::RubikaClient::new(&config.bot));

    // Create shutdown channel for the dispatcher
    let (shutdown_tx, shutdown_rx) = tokio::sync::mpsc::channel::<()>(1);
    let dispatcher = bot::Dispatcher::new(
        transport,
        pipeline,
        Duration::from_secs(config.bot.poll_interval_secs),
        shutdown_rx,
    );
    let dispatcher_handle = tokio::spawn(dispatcher.run());

    tokio::signal::ctrl_c().await?;
    tracing::info!("Shutting down...");
    let _ = shutdown_tx.send(()).await;
    let _ = dispatcher_handle.await;

    Ok(())
}

async fn start_relay(
    config_path: Option<&Path>,
    host: Option<String>,
    port: Option<u16>,
) -> Result<()> {
    let mut config = config::load_config_or_default(config_path)?;

    // Override host/port from CLI if specified
    if let Some(host) = host {
        config.relay.host = host;
    }
    if let Some(port) = port {
        config.relay.port = port;
    }

    relay::serve(&config.relay).await
}

fn validate_config(path: Option<&Path>) -> Result<()> {
    match path {
        Some(p) => println!("Validating config: {:?}", p),
        None => println!("No config file specified, using defaults"),
    }
    let config = config::load_config_or_default(path)?;
    println!("✓ Configuration is valid");
    println!("  Bot API: {}", config.bot.api_base);
    println!("  Catalog: {}", config.catalog.base_url);
    println!("  Cache TTL: {}s", config.catalog.cache_ttl_secs);
    println!("  Translation target: {}", config.translator.language);
    println!("  Poster relay: {}", config.delivery.relay_base);
    println!("  Relay service: {}:{}", config.relay.host, config.relay.port);

    config::validate_credentials(&config)?;
    println!("✓ Credentials present");

    Ok(())
}
