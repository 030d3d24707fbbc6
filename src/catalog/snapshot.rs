//! Catalog snapshots
//!
//! A snapshot is the complete result of one refresh pass. It is built by
//! [`SnapshotBuilder`], published once, and never mutated afterwards; every
//! query answers from a single snapshot so groups and their tool lists always
//! come from the same pass.

use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::definition::ToolDefinition;
use super::groups::{group_for_category, metadata_for_group};

/// Characters kept in a tool's short description
pub const DESCRIPTION_PREVIEW_CHARS: usize = 100;

/// Per-tool projection held in a group's tool list
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolSummary {
    pub name: String,
    /// Description cut to [`DESCRIPTION_PREVIEW_CHARS`] with a trailing ellipsis
    pub description: String,
    pub full_description: String,
    pub enabled: bool,
    /// Raw category from the definition file
    pub category: String,
    pub tags: Vec<String>,
    pub source_file: String,
}

impl ToolSummary {
    fn from_definition(path: &Path, def: ToolDefinition) -> Self {
        Self {
            name: def.resolved_name(path),
            description: preview(&def.description),
            full_description: def.description,
            enabled: def.enabled,
            category: def.metadata.category,
            tags: def.metadata.tags,
            source_file: path
                .file_name()
                .map(|s| s.to_string_lossy().into_owned())
                .unwrap_or_default(),
        }
    }

    /// Case-insensitive substring match on name, full description or any tag.
    /// `needle` must already be lowercased.
    fn matches(&self, needle: &str) -> bool {
        self.name.to_lowercase().contains(needle)
            || self.full_description.to_lowercase().contains(needle)
            || self.tags.iter().any(|t| t.to_lowercase().contains(needle))
    }
}

fn preview(description: &str) -> String {
    if description.chars().count() <= DESCRIPTION_PREVIEW_CHARS {
        return description.to_string();
    }
    let cut: String = description.chars().take(DESCRIPTION_PREVIEW_CHARS).collect();
    format!("{}...", cut)
}

/// One display group bucket as built by a refresh pass
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisplayGroup {
    pub name: String,
    pub icon: String,
    pub color: String,
    pub description: String,
    pub sort_order: u32,
    pub tool_count: usize,
    pub enabled_count: usize,
    /// Distinct raw categories folded into this group
    pub categories: BTreeSet<String>,
}

impl DisplayGroup {
    fn empty(name: &str) -> Self {
        let meta = metadata_for_group(name);
        Self {
            name: name.to_string(),
            icon: meta.icon.to_string(),
            color: meta.color.to_string(),
            description: meta.description.to_string(),
            sort_order: meta.sort_order,
            tool_count: 0,
            enabled_count: 0,
            categories: BTreeSet::new(),
        }
    }
}

/// Search hit carrying its owning group's presentation fields
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolMatch {
    #[serde(flatten)]
    pub tool: ToolSummary,
    pub group: String,
    pub group_icon: String,
    pub group_color: String,
}

/// Counts derived from a snapshot
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SnapshotCounts {
    pub groups: usize,
    pub tools: usize,
    pub enabled: usize,
}

/// The complete, immutable result of one refresh
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CatalogSnapshot {
    groups: BTreeMap<String, DisplayGroup>,
    tools: BTreeMap<String, Vec<ToolSummary>>,
    refreshed_at: Option<DateTime<Utc>>,
}

impl CatalogSnapshot {
    /// Snapshot with no groups that has never been refreshed
    pub fn empty() -> Self {
        Self::default()
    }

    /// When the refresh that produced this snapshot completed
    pub fn refreshed_at(&self) -> Option<DateTime<Utc>> {
        self.refreshed_at
    }

    /// Groups by ascending sort order, ties broken by name
    pub fn ordered_groups(&self) -> Vec<&DisplayGroup> {
        let mut groups: Vec<&DisplayGroup> = self.groups.values().collect();
        groups.sort_by(|a, b| a.sort_order.cmp(&b.sort_order).then_with(|| a.name.cmp(&b.name)));
        groups
    }

    pub fn group(&self, name: &str) -> Option<&DisplayGroup> {
        self.groups.get(name)
    }

    /// Tools in a group sorted by name; empty for unknown groups
    pub fn tools_in(&self, group: &str) -> &[ToolSummary] {
        self.tools.get(group).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Every tool across all groups, sorted by name, duplicates kept
    pub fn all_tools(&self) -> Vec<ToolSummary> {
        let mut all: Vec<ToolSummary> = self.tools.values().flatten().cloned().collect();
        all.sort_by(|a, b| a.name.cmp(&b.name));
        all
    }

    /// First tool with exactly this name, with its group name
    pub fn find_tool(&self, name: &str) -> Option<(&ToolSummary, &str)> {
        self.ordered_groups().into_iter().find_map(|group| {
            self.tools_in(&group.name)
                .iter()
                .find(|t| t.name == name)
                .map(|t| (t, group.name.as_str()))
        })
    }

    /// Tools matching `query` in group display order, then by tool name
    pub fn search(&self, query: &str) -> Vec<ToolMatch> {
        let needle = query.to_lowercase();
        let mut results = Vec::new();
        for group in self.ordered_groups() {
            for tool in self.tools_in(&group.name) {
                if tool.matches(&needle) {
                    results.push(ToolMatch {
                        tool: tool.clone(),
                        group: group.name.clone(),
                        group_icon: group.icon.clone(),
                        group_color: group.color.clone(),
                    });
                }
            }
        }
        results
    }

    pub fn counts(&self) -> SnapshotCounts {
        self.groups.values().fold(
            SnapshotCounts {
                groups: self.groups.len(),
                ..Default::default()
            },
            |mut acc, g| {
                acc.tools += g.tool_count;
                acc.enabled += g.enabled_count;
                acc
            },
        )
    }
}

/// Accumulates definitions for one refresh pass
#[derive(Debug, Default)]
pub struct SnapshotBuilder {
    groups: BTreeMap<String, DisplayGroup>,
    tools: BTreeMap<String, Vec<ToolSummary>>,
}

impl SnapshotBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold one parsed definition into its display group
    pub fn add(&mut self, path: &Path, def: ToolDefinition) {
        let group_name = group_for_category(&def.metadata.category);
        let summary = ToolSummary::from_definition(path, def);

        let group = self
            .groups
            .entry(group_name.to_string())
            .or_insert_with(|| DisplayGroup::empty(group_name));
        group.tool_count += 1;
        if summary.enabled {
            group.enabled_count += 1;
        }
        group.categories.insert(summary.category.clone());

        self.tools.entry(group_name.to_string()).or_default().push(summary);
    }

    /// Sort every tool list and stamp the snapshot
    pub fn finish(mut self, refreshed_at: DateTime<Utc>) -> CatalogSnapshot {
        for tools in self.tools.values_mut() {
            tools.sort_by(|a, b| a.name.cmp(&b.name));
        }
        CatalogSnapshot {
            groups: self.groups,
            tools: self.tools,
            refreshed_at: Some(refreshed_at),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::groups::FALLBACK_GROUP;
    use std::path::PathBuf;

    fn def(json: &str) -> ToolDefinition {
        ToolDefinition::from_json(json).unwrap()
    }

    fn sample() -> CatalogSnapshot {
        let mut builder = SnapshotBuilder::new();
        builder.add(
            &PathBuf::from("wiki_search.json"),
            def(r#"{"name": "wiki_search", "description": "Search Wikipedia", "metadata": {"category": "Encyclopedia", "tags": ["encyclopedia"]}}"#),
        );
        builder.add(
            &PathBuf::from("yahoo_get_quote.json"),
            def(r#"{"name": "yahoo_get_quote", "description": "Latest equity quote", "metadata": {"category": "Finance", "tags": ["finance"]}}"#),
        );
        builder.add(
            &PathBuf::from("yahoo_history.json"),
            def(r#"{"name": "yahoo_history", "description": "Price history", "enabled": false, "metadata": {"category": "Market Data"}}"#),
        );
        builder.add(
            &PathBuf::from("mystery.json"),
            def(r#"{"name": "mystery", "metadata": {"category": "Nonsense"}}"#),
        );
        builder.finish(Utc::now())
    }

    #[test]
    fn test_preview_short_description_untouched() {
        assert_eq!(preview("short"), "short");
    }

    #[test]
    fn test_preview_truncates_long_description() {
        let long = "x".repeat(DESCRIPTION_PREVIEW_CHARS + 20);
        let cut = preview(&long);
        assert!(cut.ends_with("..."));
        assert_eq!(cut.chars().count(), DESCRIPTION_PREVIEW_CHARS + 3);
    }

    #[test]
    fn test_preview_respects_char_boundaries() {
        let long = "é".repeat(DESCRIPTION_PREVIEW_CHARS + 1);
        let cut = preview(&long);
        assert_eq!(cut.chars().filter(|c| *c == 'é').count(), DESCRIPTION_PREVIEW_CHARS);
    }

    #[test]
    fn test_builder_groups_by_category() {
        let snap = sample();
        let finance = snap.group("Financial Markets").unwrap();
        assert_eq!(finance.tool_count, 2);
        assert_eq!(finance.enabled_count, 1);
        assert_eq!(
            finance.categories.iter().collect::<Vec<_>>(),
            vec!["Finance", "Market Data"]
        );
    }

    #[test]
    fn test_builder_fallback_group() {
        let snap = sample();
        let tools = snap.tools_in(FALLBACK_GROUP);
        assert_eq!(tools.len(), 1);
        assert_eq!(tools[0].name, "mystery");
    }

    #[test]
    fn test_count_invariant() {
        let snap = sample();
        for group in snap.ordered_groups() {
            assert_eq!(group.tool_count, snap.tools_in(&group.name).len());
            assert!(group.enabled_count <= group.tool_count);
        }
    }

    #[test]
    fn test_ordered_groups_by_sort_order() {
        let snap = sample();
        let names: Vec<&str> = snap.ordered_groups().iter().map(|g| g.name.as_str()).collect();
        assert_eq!(names, vec!["Financial Markets", "Knowledge & Reference", FALLBACK_GROUP]);
    }

    #[test]
    fn test_tools_sorted_within_group() {
        let mut builder = SnapshotBuilder::new();
        for name in ["zeta", "alpha", "mid"] {
            builder.add(
                &PathBuf::from(format!("{}.json", name)),
                def(&format!(r#"{{"name": "{}", "metadata": {{"category": "SEC"}}}}"#, name)),
            );
        }
        let snap = builder.finish(Utc::now());
        let names: Vec<&str> = snap
            .tools_in("Regulatory Filings")
            .iter()
            .map(|t| t.name.as_str())
            .collect();
        assert_eq!(names, vec!["alpha", "mid", "zeta"]);
    }

    #[test]
    fn test_all_tools_sorted_and_keeps_duplicates() {
        let mut builder = SnapshotBuilder::new();
        builder.add(&PathBuf::from("a.json"), def(r#"{"name": "dup", "metadata": {"category": "SEC"}}"#));
        builder.add(&PathBuf::from("b.json"), def(r#"{"name": "dup", "metadata": {"category": "Finance"}}"#));
        builder.add(&PathBuf::from("c.json"), def(r#"{"name": "alpha"}"#));
        let snap = builder.finish(Utc::now());
        let names: Vec<String> = snap.all_tools().into_iter().map(|t| t.name).collect();
        assert_eq!(names, vec!["alpha", "dup", "dup"]);
    }

    #[test]
    fn test_unknown_group_lookups() {
        let snap = sample();
        assert!(snap.group("Nope").is_none());
        assert!(snap.tools_in("Nope").is_empty());
    }

    #[test]
    fn test_search_by_name_tag_and_miss() {
        let snap = sample();

        let hits = snap.search("WIKI");
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].tool.name, "wiki_search");
        assert_eq!(hits[0].group, "Knowledge & Reference");
        assert_eq!(hits[0].group_icon, "book");

        let hits = snap.search("finance");
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].tool.name, "yahoo_get_quote");

        assert!(snap.search("zzz").is_empty());
    }

    #[test]
    fn test_search_tag_substring() {
        let snap = sample();
        let hits = snap.search("cyclo");
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].tool.name, "wiki_search");
    }

    #[test]
    fn test_search_by_description() {
        let snap = sample();
        let hits = snap.search("price history");
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].tool.name, "yahoo_history");
    }

    #[test]
    fn test_find_tool() {
        let snap = sample();
        let (tool, group) = snap.find_tool("yahoo_history").unwrap();
        assert!(!tool.enabled);
        assert_eq!(group, "Financial Markets");
        assert!(snap.find_tool("missing").is_none());
    }

    #[test]
    fn test_counts() {
        let counts = sample().counts();
        assert_eq!(counts.groups, 3);
        assert_eq!(counts.tools, 4);
        assert_eq!(counts.enabled, 3);
    }

    #[test]
    fn test_empty_snapshot() {
        let snap = CatalogSnapshot::empty();
        assert!(snap.refreshed_at().is_none());
        assert_eq!(snap.counts(), SnapshotCounts::default());
        assert!(snap.all_tools().is_empty());
    }

    #[test]
    fn test_match_serializes_flat() {
        let snap = sample();
        let hit = &snap.search("wiki")[0];
        let json = serde_json::to_value(hit).unwrap();
        assert_eq!(json["name"], "wiki_search");
        assert_eq!(json["group"], "Knowledge & Reference");
        assert_eq!(json["group_color"], "purple");
    }

    #[test]
    fn test_group_categories_serialize_sorted() {
        let snap = sample();
        let json = serde_json::to_value(snap.group("Financial Markets").unwrap()).unwrap();
        assert_eq!(json["categories"], serde_json::json!(["Finance", "Market Data"]));
    }
}
