mod cli;

use arrlink::{
    apps::AGGREGATOR,
    arr::http_client,
    config,
    configure::{self, peers, RunOptions},
    context::{self, StackContext},
    secrets,
};

use anyhow::{Context, Result};
use clap::Parser;
use cli::{Cli, Commands};
use std::path::Path;

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Respect RUST_LOG env var if set, otherwise use defaults based on verbose flag
    let env_filter = std::env::var("RUST_LOG").unwrap_or_else(|_| {
        if cli.verbose {
            "arrlink=trace,reqwest=debug".to_string()
        } else {
            "arrlink=info".to_string()
        }
    });

    tracing_subscriber::fmt()
        .with_env_filter(&env_filter)
        .with_writer(std::io::stderr)
        .init();

    match cli.command.unwrap_or(Commands::Configure) {
        Commands::Configure => {
            let rt = tokio::runtime::Runtime::new()?;
            rt.block_on(configure_stack(cli.config.as_deref(), cli.force_update))
        }
        Commands::ListApps => {
            let rt = tokio::runtime::Runtime::new()?;
            rt.block_on(list_apps(cli.config.as_deref()))
        }
        Commands::TestApp { name } => {
            let rt = tokio::runtime::Runtime::new()?;
            rt.block_on(test_app(cli.config.as_deref(), &name))
        }
        Commands::Validate {
            config: config_path,
        } => {
            let path = config_path.or(cli.config);
            validate_config(path.as_deref())
        }
        Commands::Version => {
            println!("arrlink {}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
    }
}

async fn configure_stack(config_path: Option<&Path>, force_update: bool) -> Result<()> {
    let config = config::load_config_or_default(config_path)?;

    println!("Media App Configurator");
    println!("{}", "=".repeat(50));
    if config.use_external_urls {
        println!("Using HTTPRoute URLs (*.{})\n", config.domain);
    } else {
        println!("Using cluster-local URLs (*.{}.svc.cluster.local)\n", config.namespace);
    }

    tracing::info!("=== Loading API Keys ===");
    let provider = secrets::provider_from_config(&config.secrets);
    let (ctx, failures) = context::load_context(config, provider.as_ref());

    let client = http_client()?;
    let summary = configure::configure_all(
        &ctx,
        &client,
        &failures,
        RunOptions { force_update },
    )
    .await;

    println!("\n=== Summary ===");
    print!("{}", summary.render());

    Ok(())
}

/// Context with only Prowlarr's key loaded.
fn aggregator_context(config_path: Option<&Path>) -> Result<StackContext> {
    let config = config::load_config_or_default(config_path)?;
    let provider = secrets::provider_from_config(&config.secrets);

    let mut ctx = StackContext::new(config);
    ctx.load_key(provider.as_ref(), AGGREGATOR)
        .context("Failed to load Prowlarr API key")?;
    Ok(ctx)
}

async fn list_apps(config_path: Option<&Path>) -> Result<()> {
    let ctx = aggregator_context(config_path)?;
    let prowlarr = peers::prowlarr_api(&ctx, &http_client()?)?;

    let apps = prowlarr
        .list_applications()
        .await
        .context("Failed to list Prowlarr applications")?;

    println!("\nConfigured Applications in Prowlarr ({} total):\n", apps.len());
    for app in &apps {
        println!(
            "  • {} (ID: {}) - {}",
            app.name,
            app.id.unwrap_or_default(),
            app.implementation
        );
        println!("    Sync Level: {}", app.sync_level);
        if let Some(url) = app.base_url() {
            println!("    URL: {}", url);
        }
        println!();
    }

    Ok(())
}

async fn test_app(config_path: Option<&Path>, name: &str) -> Result<()> {
    let ctx = aggregator_context(config_path)?;

    let id = configure::test_one(&ctx, &http_client()?, name)
        .await
        .with_context(|| format!("Prowlarr test for '{}' failed", name))?;

    println!("✓ {} (ID: {}) passed Prowlarr's connection test", name, id);
    Ok(())
}

fn validate_config(path: Option<&Path>) -> Result<()> {
    let config = match path {
        Some(p) => {
            println!("Validating config: {:?}", p);
            let config = config::load_config(p)?;
            println!("✓ Configuration is valid");
            config
        }
        None => {
            println!("No config file specified, using defaults");
            config::Config::default()
        }
    };

    println!("  Namespace: {}", config.namespace);
    println!("  Domain: {}", config.domain);
    println!("  External URLs: {}", config.use_external_urls);
    println!("  Secret backend: {:?}", config.secrets.backend);
    println!(
        "  Download client: {} ({}:{})",
        config.download_client.name,
        config.download_client.host(&config.namespace),
        config.download_client.port
    );
    println!("  Overrides: {}", config.overrides.len());

    Ok(())
}
