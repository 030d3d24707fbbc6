//! Tool Catalog - grouped, periodically refreshed view of tool definitions
//!
//! Definitions are scanned from a directory of JSON files, folded into display
//! groups and published as immutable snapshots. A background task keeps the
//! catalog fresh; operators can force a refresh at any time.

mod cache;
mod definition;
mod groups;
mod refresher;
mod snapshot;

pub use cache::{CatalogStats, DefinitionSource, DirectorySource, RefreshReport, ToolCatalogCache};
pub use definition::{ToolDefinition, ToolMetadata, UNKNOWN_CATEGORY};
pub use groups::{FALLBACK_GROUP, GroupMetadata, group_for_category, metadata_for_group};
pub use refresher::CatalogRefresher;
pub use snapshot::{CatalogSnapshot, DESCRIPTION_PREVIEW_CHARS, DisplayGroup, ToolMatch, ToolSummary};
