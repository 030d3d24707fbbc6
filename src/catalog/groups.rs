//! Display group tables
//!
//! Raw categories are whatever each provider wrapper put in its definition file.
//! They fold into a small closed set of display groups through a fixed table.
//! Both tables are static and never change at runtime.

use serde::Serialize;

/// Group that receives every tool whose category has no mapping
pub const FALLBACK_GROUP: &str = "Other Tools";

/// Static presentation record for a display group
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct GroupMetadata {
    pub icon: &'static str,
    pub color: &'static str,
    pub description: &'static str,
    pub sort_order: u32,
}

/// Raw category -> display group name
const CATEGORY_MAPPING: &[(&str, &str)] = &[
    ("Finance", "Financial Markets"),
    ("Financial", "Financial Markets"),
    ("Market Data", "Financial Markets"),
    ("Equities", "Financial Markets"),
    ("Stocks", "Financial Markets"),
    ("Economics", "Economic Statistics"),
    ("Economic Data", "Economic Statistics"),
    ("Central Bank", "Economic Statistics"),
    ("Monetary Policy", "Economic Statistics"),
    ("Statistics", "Economic Statistics"),
    ("Trade", "Trade & Development"),
    ("International Trade", "Trade & Development"),
    ("SDG", "Trade & Development"),
    ("Development", "Trade & Development"),
    ("SEC", "Regulatory Filings"),
    ("Regulatory", "Regulatory Filings"),
    ("Filings", "Regulatory Filings"),
    ("Compliance", "Regulatory Filings"),
    ("Encyclopedia", "Knowledge & Reference"),
    ("Knowledge", "Knowledge & Reference"),
    ("Reference", "Knowledge & Reference"),
    ("Research", "Knowledge & Reference"),
    ("Analytics", "Data Analytics"),
    ("Data Analysis", "Data Analytics"),
    ("Files", "Data Analytics"),
    ("Local Data", "Data Analytics"),
    ("Documents", "Document Management"),
    ("SharePoint", "Document Management"),
    ("Collaboration", "Document Management"),
];

/// Display group name -> presentation record
const GROUP_METADATA: &[(&str, GroupMetadata)] = &[
    (
        "Financial Markets",
        GroupMetadata {
            icon: "chart-line",
            color: "green",
            description: "Quotes, price history and company fundamentals",
            sort_order: 1,
        },
    ),
    (
        "Economic Statistics",
        GroupMetadata {
            icon: "landmark",
            color: "blue",
            description: "Central bank series and macroeconomic indicators",
            sort_order: 2,
        },
    ),
    (
        "Trade & Development",
        GroupMetadata {
            icon: "globe",
            color: "teal",
            description: "International trade flows and sustainable development goals",
            sort_order: 3,
        },
    ),
    (
        "Regulatory Filings",
        GroupMetadata {
            icon: "file-contract",
            color: "orange",
            description: "SEC filings, company facts and disclosures",
            sort_order: 4,
        },
    ),
    (
        "Knowledge & Reference",
        GroupMetadata {
            icon: "book",
            color: "purple",
            description: "Encyclopedia lookup and reference material",
            sort_order: 5,
        },
    ),
    (
        "Data Analytics",
        GroupMetadata {
            icon: "database",
            color: "indigo",
            description: "Queries and analysis over local data files",
            sort_order: 6,
        },
    ),
    (
        "Document Management",
        GroupMetadata {
            icon: "folder-open",
            color: "cyan",
            description: "Document libraries and collaboration sites",
            sort_order: 7,
        },
    ),
    (FALLBACK_GROUP, FALLBACK_METADATA),
];

const FALLBACK_METADATA: GroupMetadata = GroupMetadata {
    icon: "toolbox",
    color: "gray",
    description: "Tools that do not belong to any other group",
    sort_order: 99,
};

/// Resolve a raw category to its display group name
pub fn group_for_category(category: &str) -> &'static str {
    CATEGORY_MAPPING
        .iter()
        .find(|(raw, _)| *raw == category)
        .map(|(_, group)| *group)
        .unwrap_or(FALLBACK_GROUP)
}

/// Presentation record for a group; the fallback record for unknown names
pub fn metadata_for_group(group: &str) -> GroupMetadata {
    GROUP_METADATA
        .iter()
        .find(|(name, _)| *name == group)
        .map(|(_, meta)| *meta)
        .unwrap_or(FALLBACK_METADATA)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_categories_resolve() {
        assert_eq!(group_for_category("Finance"), "Financial Markets");
        assert_eq!(group_for_category("Central Bank"), "Economic Statistics");
        assert_eq!(group_for_category("SDG"), "Trade & Development");
        assert_eq!(group_for_category("SEC"), "Regulatory Filings");
        assert_eq!(group_for_category("Encyclopedia"), "Knowledge & Reference");
        assert_eq!(group_for_category("Analytics"), "Data Analytics");
        assert_eq!(group_for_category("SharePoint"), "Document Management");
    }

    #[test]
    fn test_unmapped_category_falls_back() {
        assert_eq!(group_for_category("Nonsense"), FALLBACK_GROUP);
        assert_eq!(group_for_category("Unknown"), FALLBACK_GROUP);
        assert_eq!(group_for_category(""), FALLBACK_GROUP);
    }

    #[test]
    fn test_mapping_is_case_sensitive() {
        assert_eq!(group_for_category("finance"), FALLBACK_GROUP);
    }

    #[test]
    fn test_every_mapped_group_has_metadata() {
        for (_, group) in CATEGORY_MAPPING {
            assert!(
                GROUP_METADATA.iter().any(|(name, _)| name == group),
                "missing metadata for {}",
                group
            );
        }
    }

    #[test]
    fn test_metadata_is_non_empty() {
        for (name, meta) in GROUP_METADATA {
            assert!(!meta.icon.is_empty(), "{} has no icon", name);
            assert!(!meta.color.is_empty(), "{} has no color", name);
            assert!(!meta.description.is_empty(), "{} has no description", name);
        }
    }

    #[test]
    fn test_unknown_group_gets_fallback_metadata() {
        assert_eq!(metadata_for_group("No Such Group"), FALLBACK_METADATA);
        assert_eq!(metadata_for_group(FALLBACK_GROUP).sort_order, 99);
    }
}
