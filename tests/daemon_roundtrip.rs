//! End-to-end daemon tests over the Unix socket

use std::fs;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use serde_json::json;
use tempfile::TempDir;
use tokio::sync::oneshot;
use toolhub::config::{CatalogConfig, Config, ServerConfig};
use toolhub::daemon::Daemon;
use toolhub::error::Result;
use toolhub::ipc::{ErrorCode, IpcClient};

fn write_definition(dir: &Path, name: &str, category: &str, tags: &[&str]) {
    let definition = json!({
        "name": name,
        "description": format!("The {} tool", name),
        "metadata": {"category": category, "tags": tags}
    });
    fs::write(dir.join(format!("{}.json", name)), definition.to_string()).unwrap();
}

async fn wait_for_socket(path: &Path) {
    for _ in 0..200 {
        if path.exists() {
            return;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    panic!("daemon socket never appeared at {}", path.display());
}

/// Integration test: every catalog method answered by a live daemon
#[tokio::test]
async fn test_daemon_serves_catalog_over_socket() -> Result<()> {
    let temp = TempDir::new()?;
    let tools_dir = temp.path().join("tools");
    fs::create_dir(&tools_dir)?;
    write_definition(&tools_dir, "wiki_search", "Encyclopedia", &["encyclopedia"]);
    write_definition(&tools_dir, "yahoo_get_quote", "Finance", &["finance"]);

    let server = ServerConfig {
        socket_path: temp.path().join("toolhub.sock"),
        ..Default::default()
    };
    let config = Config {
        log_level: None,
        catalog: CatalogConfig {
            tools_dir: tools_dir.clone(),
            refresh_interval_secs: 3600,
            shutdown_timeout_ms: 1000,
        },
        server: server.clone(),
    };

    let daemon = Arc::new(Daemon::new(config)?);
    let (stop_tx, stop_rx) = oneshot::channel::<()>();
    let running = Arc::clone(&daemon);
    let task = tokio::spawn(async move {
        running
            .run(async {
                let _ = stop_rx.await;
            })
            .await
    });
    wait_for_socket(&server.socket_path).await;

    let client = IpcClient::from_config(&server);
    assert!(client.ping().await?);

    let groups = client.list_groups().await?.result.unwrap();
    assert_eq!(groups["groups"].as_array().unwrap().len(), 2);

    let group = client.get_group("Financial Markets").await?.result.unwrap();
    assert_eq!(group["tools"][0]["name"], "yahoo_get_quote");

    let missing = client.get_group("Nope").await?;
    assert_eq!(missing.error.unwrap().code, ErrorCode::GROUP_NOT_FOUND);

    let search = client.search("wiki").await?.result.unwrap();
    assert_eq!(search["count"], 1);
    assert_eq!(search["results"][0]["group"], "Knowledge & Reference");

    let empty = client.search("").await?;
    assert_eq!(empty.error.unwrap().code, ErrorCode::INVALID_PARAMS);

    // Not visible until a refresh
    write_definition(&tools_dir, "sec_filings", "SEC", &["edgar"]);
    let tools = client.list_tools().await?.result.unwrap();
    assert_eq!(tools["tools"].as_array().unwrap().len(), 2);

    let refreshed = client.refresh().await?.result.unwrap();
    assert_eq!(refreshed["stats"]["total_tools"], 3);

    let tool = client.get_tool("sec_filings").await?.result.unwrap();
    assert_eq!(tool["group"], "Regulatory Filings");

    let stats = client.stats().await?.result.unwrap();
    assert_eq!(stats["total_groups"], 3);
    assert_eq!(stats["refresh_interval_secs"], 3600);

    stop_tx.send(()).unwrap();
    task.await.unwrap()?;
    assert!(!server.socket_path.exists());
    Ok(())
}
