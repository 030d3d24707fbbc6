//! Tool catalog cache
//!
//! Owns the live [`CatalogSnapshot`]. Refreshes rescan the definition source,
//! build a complete new snapshot off to the side and swap it in with a single
//! write, so readers only ever see whole snapshots. Refreshes are serialized by
//! their own lock; a refresh requested while another is running waits for it,
//! then performs its own scan.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, OnceLock, PoisonError, RwLock};
use std::time::{Duration, Instant};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::definition::{ToolDefinition, is_definition_file};
use super::snapshot::{
    CatalogSnapshot, DisplayGroup, SnapshotBuilder, SnapshotCounts, ToolMatch, ToolSummary,
};
use crate::error::{Result, ToolhubError};

/// Where tool definitions come from
pub trait DefinitionSource: Send + Sync {
    /// Human-readable location, used in log lines
    fn location(&self) -> String;

    /// Whether the source is currently available
    fn exists(&self) -> bool;

    /// Definition files in the order they should be read
    fn list(&self) -> std::io::Result<Vec<PathBuf>>;

    /// Raw content of one definition file
    fn read(&self, path: &Path) -> std::io::Result<String>;
}

/// Definitions stored as `*.json` files directly inside one directory
#[derive(Debug, Clone)]
pub struct DirectorySource {
    dir: PathBuf,
}

impl DirectorySource {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

impl DefinitionSource for DirectorySource {
    fn location(&self) -> String {
        self.dir.display().to_string()
    }

    fn exists(&self) -> bool {
        self.dir.is_dir()
    }

    fn list(&self) -> std::io::Result<Vec<PathBuf>> {
        let mut paths = Vec::new();
        for entry in fs::read_dir(&self.dir)? {
            let path = entry?.path();
            if path.is_file() && is_definition_file(&path) {
                paths.push(path);
            }
        }
        paths.sort();
        Ok(paths)
    }

    fn read(&self, path: &Path) -> std::io::Result<String> {
        fs::read_to_string(path)
    }
}

/// Outcome of one refresh pass
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RefreshReport {
    /// False when the source was unavailable and the old snapshot was kept.
    /// The counts below then describe the kept snapshot.
    pub published: bool,
    pub groups: usize,
    pub tools: usize,
    /// Definition files that could not be read or parsed
    pub skipped_files: usize,
    pub elapsed_ms: u64,
}

/// Aggregate figures for the live snapshot
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogStats {
    pub total_groups: usize,
    pub total_tools: usize,
    pub enabled_tools: usize,
    pub disabled_tools: usize,
    pub last_refresh: Option<DateTime<Utc>>,
    pub refresh_interval_secs: u64,
}

struct Inner {
    source: Box<dyn DefinitionSource>,
    refresh_interval: Duration,
    snapshot: RwLock<Arc<CatalogSnapshot>>,
    refresh_lock: Mutex<()>,
}

/// Handle to a tool catalog; clones share the same live snapshot
#[derive(Clone)]
pub struct ToolCatalogCache {
    inner: Arc<Inner>,
}

static SHARED: OnceLock<ToolCatalogCache> = OnceLock::new();

impl std::fmt::Debug for ToolCatalogCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ToolCatalogCache")
            .field("source", &self.inner.source.location())
            .field("refresh_interval", &self.inner.refresh_interval)
            .finish()
    }
}

impl ToolCatalogCache {
    /// Create a catalog over a directory and load it once before returning
    pub fn new(dir: impl Into<PathBuf>, refresh_interval: Duration) -> Result<Self> {
        Self::with_source(DirectorySource::new(dir), refresh_interval)
    }

    /// Create a catalog over any definition source and load it once
    pub fn with_source(
        source: impl DefinitionSource + 'static,
        refresh_interval: Duration,
    ) -> Result<Self> {
        if refresh_interval.is_zero() {
            return Err(ToolhubError::Config(
                "refresh interval must be greater than zero".to_string(),
            ));
        }

        let cache = Self {
            inner: Arc::new(Inner {
                source: Box::new(source),
                refresh_interval,
                snapshot: RwLock::new(Arc::new(CatalogSnapshot::empty())),
                refresh_lock: Mutex::new(()),
            }),
        };
        cache.refresh_blocking();
        Ok(cache)
    }

    /// Process-wide catalog. The first successful call fixes the directory and
    /// interval; later calls return that instance and ignore their arguments.
    pub fn shared(dir: impl Into<PathBuf>, refresh_interval: Duration) -> Result<Self> {
        if let Some(existing) = SHARED.get() {
            log::debug!("Shared catalog already initialized, ignoring new arguments");
            return Ok(existing.clone());
        }
        let cache = Self::new(dir, refresh_interval)?;
        Ok(SHARED.get_or_init(|| cache).clone())
    }

    pub fn refresh_interval(&self) -> Duration {
        self.inner.refresh_interval
    }

    /// Where definitions are read from
    pub fn source_location(&self) -> String {
        self.inner.source.location()
    }

    /// Rescan the source and publish a new snapshot.
    ///
    /// Never fails: an unavailable source keeps the current snapshot, and
    /// unreadable or malformed files are skipped.
    pub fn refresh_blocking(&self) -> RefreshReport {
        let _guard = self
            .inner
            .refresh_lock
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        let started = Instant::now();
        let source = &self.inner.source;

        if !source.exists() {
            log::warn!("Tools directory not found: {}", source.location());
            return RefreshReport::kept(self.snapshot().counts(), started);
        }

        let paths = match source.list() {
            Ok(paths) => paths,
            Err(e) => {
                log::warn!("Failed to list tools directory {}: {}", source.location(), e);
                return RefreshReport::kept(self.snapshot().counts(), started);
            }
        };

        let mut builder = SnapshotBuilder::new();
        let mut skipped_files = 0;
        for path in paths {
            let parsed = source
                .read(&path)
                .map_err(ToolhubError::from)
                .and_then(|content| ToolDefinition::from_json(&content));
            match parsed {
                Ok(def) => builder.add(&path, def),
                Err(e) => {
                    log::warn!("Skipping tool definition {}: {}", path.display(), e);
                    skipped_files += 1;
                }
            }
        }

        let snapshot = builder.finish(Utc::now());
        let counts = snapshot.counts();
        self.publish(snapshot);

        let report = RefreshReport {
            published: true,
            groups: counts.groups,
            tools: counts.tools,
            skipped_files,
            elapsed_ms: started.elapsed().as_millis() as u64,
        };
        log::info!(
            "Catalog refreshed: {} groups, {} tools, {} skipped in {}ms",
            report.groups,
            report.tools,
            report.skipped_files,
            report.elapsed_ms
        );
        report
    }

    /// Async refresh; the scan runs on the blocking pool.
    ///
    /// Only a panic inside the refresh body is reported as an error.
    pub async fn refresh(&self) -> Result<RefreshReport> {
        let cache = self.clone();
        tokio::task::spawn_blocking(move || cache.refresh_blocking())
            .await
            .map_err(|e| ToolhubError::Refresh(e.to_string()))
    }

    fn publish(&self, snapshot: CatalogSnapshot) {
        let mut live = self
            .inner
            .snapshot
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        *live = Arc::new(snapshot);
    }

    /// The live snapshot. Use this when several reads must agree with each other.
    pub fn snapshot(&self) -> Arc<CatalogSnapshot> {
        self.inner
            .snapshot
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Groups by ascending sort order, ties broken by name
    pub fn get_groups(&self) -> Vec<DisplayGroup> {
        self.snapshot().ordered_groups().into_iter().cloned().collect()
    }

    pub fn get_group(&self, name: &str) -> Option<DisplayGroup> {
        self.snapshot().group(name).cloned()
    }

    /// Tools of a group sorted by name; empty when the group is unknown
    pub fn get_tools_in_group(&self, name: &str) -> Vec<ToolSummary> {
        self.snapshot().tools_in(name).to_vec()
    }

    /// Every tool sorted by name; a name present in two groups appears twice
    pub fn get_all_tools(&self) -> Vec<ToolSummary> {
        self.snapshot().all_tools()
    }

    /// First tool with this exact name and the group holding it
    pub fn get_tool(&self, name: &str) -> Option<(ToolSummary, String)> {
        let snapshot = self.snapshot();
        snapshot
            .find_tool(name)
            .map(|(tool, group)| (tool.clone(), group.to_string()))
    }

    /// Case-insensitive substring search over names, descriptions and tags.
    /// Callers reject empty queries before calling.
    pub fn search_tools(&self, query: &str) -> Vec<ToolMatch> {
        self.snapshot().search(query)
    }

    pub fn get_stats(&self) -> CatalogStats {
        let snapshot = self.snapshot();
        let counts = snapshot.counts();
        CatalogStats {
            total_groups: counts.groups,
            total_tools: counts.tools,
            enabled_tools: counts.enabled,
            disabled_tools: counts.tools - counts.enabled,
            last_refresh: snapshot.refreshed_at(),
            refresh_interval_secs: self.inner.refresh_interval.as_secs(),
        }
    }
}

impl RefreshReport {
    /// Report for a pass that left the live snapshot in place
    fn kept(live: SnapshotCounts, started: Instant) -> Self {
        Self {
            published: false,
            groups: live.groups,
            tools: live.tools,
            skipped_files: 0,
            elapsed_ms: started.elapsed().as_millis() as u64,
        }
    }
}
