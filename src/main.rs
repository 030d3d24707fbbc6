use clap::Parser;
use colored::*;
use eyre::{Context, Result};
use log::{LevelFilter, info};
use serde_json::Value;
use std::fs;
use std::path::PathBuf;

mod cli;

use cli::Cli;
use cli::commands::Commands;
use toolhub::config::Config;
use toolhub::daemon::Daemon;
use toolhub::ipc::{DaemonResponse, IpcClient};

/// Install the file logger. Without RUST_LOG the level starts at info and is
/// switched to the configured one by `apply_log_level`.
fn setup_logging() -> Result<()> {
    // Create log directory
    let log_dir = dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("toolhub")
        .join("logs");

    fs::create_dir_all(&log_dir).context("Failed to create log directory")?;

    let log_file = log_dir.join("toolhub.log");

    // Setup env_logger with file output
    let target = Box::new(
        fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&log_file)
            .context("Failed to open log file")?,
    );

    let mut builder = env_logger::Builder::new();
    if rust_log_set() {
        builder.parse_default_env();
    } else {
        builder.filter_level(LevelFilter::Trace);
    }
    builder.target(env_logger::Target::Pipe(target)).init();
    if !rust_log_set() {
        log::set_max_level(LevelFilter::Info);
    }

    info!("Logging initialized, writing to: {}", log_file.display());
    Ok(())
}

fn rust_log_set() -> bool {
    std::env::var_os("RUST_LOG").is_some()
}

/// RUST_LOG wins over the configured level
fn apply_log_level(config: &Config) {
    if rust_log_set() {
        return;
    }
    let level = config.log_level_filter();
    log::set_max_level(level);
    info!("Log level set to {}", level);
}

async fn run_application(cli: &Cli, config: Config) -> Result<()> {
    info!("Starting application");

    if cli.is_verbose() {
        println!("{}", "Verbose mode enabled".yellow());
    }

    match &cli.command {
        Commands::Serve { tools_dir } => handle_serve(tools_dir.clone(), config).await,
        command => handle_client_command(command, &config).await,
    }
}

async fn handle_serve(tools_dir: Option<PathBuf>, mut config: Config) -> Result<()> {
    if let Some(dir) = tools_dir {
        config.catalog.tools_dir = dir;
    }
    info!("Serving catalog from {}", config.catalog.tools_dir.display());

    let socket_path = config.server.socket_path.clone();
    let daemon = Daemon::new(config).context("Failed to build catalog")?;
    let stats = daemon.catalog().get_stats();
    println!(
        "{} {} tools in {} groups, listening on {}",
        "Serving:".green(),
        stats.total_tools,
        stats.total_groups,
        socket_path.display()
    );

    daemon
        .run(async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                log::warn!("Failed to listen for Ctrl-C: {}", e);
                std::future::pending::<()>().await;
            }
        })
        .await
        .context("Daemon failed")?;

    println!("{}", "Stopped".cyan());
    Ok(())
}

async fn handle_client_command(command: &Commands, config: &Config) -> Result<()> {
    info!("Handling client command: {:?}", command);
    let client = IpcClient::from_config(&config.server);

    let response = match command {
        Commands::Groups => client.list_groups().await,
        Commands::Group { name } => client.get_group(name).await,
        Commands::Tools => client.list_tools().await,
        Commands::Tool { name } => client.get_tool(name).await,
        Commands::Search { query } => {
            if query.trim().is_empty() {
                eyre::bail!("Search query must not be empty");
            }
            client.search(query).await
        }
        Commands::Refresh => client.refresh().await,
        Commands::Stats => client.stats().await,
        Commands::Serve { .. } => eyre::bail!("serve does not talk to a daemon"),
    }
    .with_context(|| format!("Is the daemon running at {}?", client.socket_path().display()))?;

    let result = into_result(response)?;
    match command {
        Commands::Groups => print_groups(&result),
        Commands::Group { .. } => print_group(&result),
        Commands::Tools => print_tools(&result["tools"]),
        Commands::Tool { .. } => print_tool(&result),
        Commands::Search { .. } => print_search(&result),
        Commands::Refresh => {
            println!("{}", "Catalog refreshed".green());
            print_stats(&result["stats"]);
        }
        Commands::Stats => print_stats(&result),
        Commands::Serve { .. } => {}
    }
    Ok(())
}

fn into_result(response: DaemonResponse) -> Result<Value> {
    match (response.result, response.error) {
        (_, Some(error)) => eyre::bail!("{} (code {})", error.message, error.code),
        (Some(result), None) => Ok(result),
        (None, None) => Ok(Value::Null),
    }
}

fn print_groups(result: &Value) {
    for group in result["groups"].as_array().into_iter().flatten() {
        println!(
            "{:<24} {:>3} tools ({} enabled)  {}",
            group["name"].as_str().unwrap_or_default().bold(),
            group["tool_count"],
            group["enabled_count"],
            group["description"].as_str().unwrap_or_default().dimmed()
        );
    }
}

fn print_group(result: &Value) {
    let group = &result["group"];
    println!(
        "{} [{}]",
        group["name"].as_str().unwrap_or_default().bold(),
        group["icon"].as_str().unwrap_or_default()
    );
    println!("  {}", group["description"].as_str().unwrap_or_default());
    print_tools(&result["tools"]);
}

fn print_tools(tools: &Value) {
    for tool in tools.as_array().into_iter().flatten() {
        let name = tool["name"].as_str().unwrap_or_default();
        let name = if tool["enabled"].as_bool().unwrap_or(true) {
            name.green()
        } else {
            name.red()
        };
        println!("  {:<32} {}", name, tool["description"].as_str().unwrap_or_default());
    }
}

fn print_tool(result: &Value) {
    let tool = &result["tool"];
    println!("{}", tool["name"].as_str().unwrap_or_default().bold());
    println!("  Group:    {}", result["group"].as_str().unwrap_or_default());
    println!("  Category: {}", tool["category"].as_str().unwrap_or_default());
    println!("  Enabled:  {}", tool["enabled"]);
    println!("  Tags:     {}", tool["tags"]);
    println!("  Source:   {}", tool["source_file"].as_str().unwrap_or_default());
    println!("  {}", tool["full_description"].as_str().unwrap_or_default());
}

fn print_search(result: &Value) {
    println!(
        "{} {} match(es) for '{}'",
        "Search:".green(),
        result["count"],
        result["query"].as_str().unwrap_or_default()
    );
    for hit in result["results"].as_array().into_iter().flatten() {
        println!(
            "  {:<32} {:<24} {}",
            hit["name"].as_str().unwrap_or_default().bold(),
            hit["group"].as_str().unwrap_or_default().cyan(),
            hit["description"].as_str().unwrap_or_default()
        );
    }
}

fn print_stats(stats: &Value) {
    println!("  Groups:        {}", stats["total_groups"]);
    println!("  Tools:         {}", stats["total_tools"]);
    println!("  Enabled:       {}", stats["enabled_tools"]);
    println!("  Disabled:      {}", stats["disabled_tools"]);
    println!(
        "  Last refresh:  {}",
        stats["last_refresh"].as_str().unwrap_or("never")
    );
    println!("  Interval:      {}s", stats["refresh_interval_secs"]);
}

#[tokio::main]
async fn main() -> Result<()> {
    // Setup logging first so config loading is recorded
    setup_logging().context("Failed to setup logging")?;

    // Parse CLI arguments
    let cli = Cli::parse();

    // Load configuration
    let config = Config::load(cli.config.as_ref()).context("Failed to load configuration")?;
    apply_log_level(&config);

    info!("Starting with config from: {:?}", cli.config);

    // Run the main application logic
    run_application(&cli, config).await.context("Application failed")?;

    Ok(())
}
