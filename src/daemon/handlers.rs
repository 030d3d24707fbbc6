//! Catalog request handlers
//!
//! Handles groups.*, tools.* and catalog.* IPC methods against the live catalog.

use std::future::Future;

use serde_json::json;

use crate::catalog::ToolCatalogCache;
use crate::ipc::messages::{DaemonError, DaemonRequest, DaemonResponse, Methods};
use crate::ipc::server::RequestHandler;

fn to_response<T: serde::Serialize>(id: u64, value: &T) -> DaemonResponse {
    match serde_json::to_value(value) {
        Ok(value) => DaemonResponse::success(id, value),
        Err(e) => DaemonResponse::error(id, DaemonError::internal_error(e.to_string())),
    }
}

/// Handle groups.list - every display group in sort order
pub fn handle_groups_list(id: u64, catalog: &ToolCatalogCache) -> DaemonResponse {
    DaemonResponse::success(id, json!({"groups": catalog.get_groups()}))
}

/// Handle groups.get - one group with its tools
pub fn handle_groups_get(request: &DaemonRequest, catalog: &ToolCatalogCache) -> DaemonResponse {
    let id = request.id;
    let name = match request.str_param("name") {
        Some(name) => name,
        None => return DaemonResponse::error(id, DaemonError::invalid_params("Missing 'name' parameter")),
    };

    // Group and tool list must come from the same snapshot
    let snapshot = catalog.snapshot();
    match snapshot.group(name) {
        Some(group) => DaemonResponse::success(id, json!({"group": group, "tools": snapshot.tools_in(name)})),
        None => DaemonResponse::error(id, DaemonError::group_not_found(name)),
    }
}

/// Handle tools.list - every tool sorted by name
pub fn handle_tools_list(id: u64, catalog: &ToolCatalogCache) -> DaemonResponse {
    DaemonResponse::success(id, json!({"tools": catalog.get_all_tools()}))
}

/// Handle tools.get - one tool by exact name
pub fn handle_tools_get(request: &DaemonRequest, catalog: &ToolCatalogCache) -> DaemonResponse {
    let id = request.id;
    let name = match request.str_param("name") {
        Some(name) => name,
        None => return DaemonResponse::error(id, DaemonError::invalid_params("Missing 'name' parameter")),
    };

    match catalog.get_tool(name) {
        Some((tool, group)) => DaemonResponse::success(id, json!({"tool": tool, "group": group})),
        None => DaemonResponse::error(id, DaemonError::tool_not_found(name)),
    }
}

/// Handle tools.search - substring search; blank queries are rejected here
pub fn handle_tools_search(request: &DaemonRequest, catalog: &ToolCatalogCache) -> DaemonResponse {
    let id = request.id;
    let query = match request.str_param("query") {
        Some(query) if !query.trim().is_empty() => query,
        _ => return DaemonResponse::error(id, DaemonError::invalid_params("Missing or empty 'query' parameter")),
    };

    let results = catalog.search_tools(query);
    DaemonResponse::success(
        id,
        json!({
            "query": query,
            "count": results.len(),
            "results": results,
        }),
    )
}

/// Handle catalog.refresh - rescan now and report the new stats
pub async fn handle_catalog_refresh(id: u64, catalog: &ToolCatalogCache) -> DaemonResponse {
    match catalog.refresh().await {
        Ok(report) => DaemonResponse::success(id, json!({"report": report, "stats": catalog.get_stats()})),
        Err(e) => {
            tracing::error!(error = %e, "Forced catalog refresh failed");
            DaemonResponse::error(id, DaemonError::internal_error(e.to_string()))
        }
    }
}

/// Handle catalog.stats
pub fn handle_catalog_stats(id: u64, catalog: &ToolCatalogCache) -> DaemonResponse {
    to_response(id, &catalog.get_stats())
}

/// Routes daemon requests to the catalog handlers
#[derive(Debug, Clone)]
pub struct CatalogRequestHandler {
    catalog: ToolCatalogCache,
}

impl CatalogRequestHandler {
    pub fn new(catalog: ToolCatalogCache) -> Self {
        Self { catalog }
    }

    pub async fn dispatch(&self, request: DaemonRequest) -> DaemonResponse {
        let id = request.id;
        let catalog = &self.catalog;
        match request.method.as_str() {
            Methods::PING => DaemonResponse::success(
                id,
                json!({"pong": true, "version": env!("CARGO_PKG_VERSION")}),
            ),
            Methods::GROUPS_LIST => handle_groups_list(id, catalog),
            Methods::GROUPS_GET => handle_groups_get(&request, catalog),
            Methods::TOOLS_LIST => handle_tools_list(id, catalog),
            Methods::TOOLS_GET => handle_tools_get(&request, catalog),
            Methods::TOOLS_SEARCH => handle_tools_search(&request, catalog),
            Methods::CATALOG_REFRESH => handle_catalog_refresh(id, catalog).await,
            Methods::CATALOG_STATS => handle_catalog_stats(id, catalog),
            other => DaemonResponse::error(id, DaemonError::method_not_found(other)),
        }
    }
}

impl RequestHandler for CatalogRequestHandler {
    fn handle(&self, request: DaemonRequest) -> impl Future<Output = DaemonResponse> + Send {
        self.dispatch(request)
    }
}
