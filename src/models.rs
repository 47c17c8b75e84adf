//! Data models for the trends analyzer.
//!
//! This module contains the normalized product record returned by the
//! catalog fetcher, the ranked tag table produced by the aggregator, and
//! the report structures built from both.

use chrono::{DateTime, Utc};
use serde::Serialize;

/// One normalized catalog item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Record {
    /// Display title (never empty).
    pub name: String,
    /// One-line pitch, may be empty.
    pub tagline: String,
    /// Vote count as reported by the service.
    pub upvotes: u64,
    /// Comment count as reported by the service.
    pub comments: u64,
    /// Topic names in source order. Duplicates are kept.
    pub tags: Vec<String>,
}

impl Record {
    /// Returns the tags joined for display, or `N/A` when there are none.
    pub fn tags_label(&self) -> String {
        if self.tags.is_empty() {
            "N/A".to_string()
        } else {
            self.tags.join(", ")
        }
    }
}

/// A single row of a tag frequency table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TagCount {
    pub tag: String,
    pub count: usize,
}

/// Tags ranked by how often they occur, most frequent first.
///
/// Rows with equal counts keep the order in which their tag was first seen.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct TagFrequencyTable {
    rows: Vec<TagCount>,
}

impl TagFrequencyTable {
    /// Wraps rows that are already ranked.
    pub(crate) fn from_ranked(rows: Vec<TagCount>) -> Self {
        Self { rows }
    }

    pub fn rows(&self) -> &[TagCount] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Rows as `(tag, count)` pairs.
    #[cfg(test)]
    pub(crate) fn pairs(&self) -> Vec<(&str, usize)> {
        self.rows
            .iter()
            .map(|row| (row.tag.as_str(), row.count))
            .collect()
    }

    /// Highest count in the table (the first row).
    pub fn max_count(&self) -> Option<usize> {
        self.rows.first().map(|row| row.count)
    }

    /// Lowest count in the table (the last row).
    pub fn min_count(&self) -> Option<usize> {
        self.rows.last().map(|row| row.count)
    }

    /// Position of `count` between the table's min and max, in `[0.0, 1.0]`.
    ///
    /// A table whose rows all share one count maps that count to `1.0`.
    /// An empty table yields `0.0`.
    pub fn intensity(&self, count: usize) -> f64 {
        let (Some(min), Some(max)) = (self.min_count(), self.max_count()) else {
            return 0.0;
        };

        if max == min {
            return 1.0;
        }

        let clamped = count.clamp(min, max);
        (clamped - min) as f64 / (max - min) as f64
    }
}

/// Metadata shared by both report kinds.
#[derive(Debug, Clone, Serialize)]
pub struct ReportMetadata {
    /// When the report was produced.
    pub generated_at: DateTime<Utc>,
    /// Catalog endpoint that was queried.
    pub endpoint: String,
    /// Number of products requested.
    pub limit: u32,
    /// Number of products actually received.
    pub products_received: usize,
}

/// Product listing report.
#[derive(Debug, Clone, Serialize)]
pub struct ListingReport {
    pub metadata: ReportMetadata,
    pub products: Vec<Record>,
    /// Whether the limit can still grow.
    pub can_fetch_more: bool,
}

/// One ranked row of a tag report.
#[derive(Debug, Clone, Serialize)]
pub struct TagRow {
    pub rank: usize,
    pub tag: String,
    pub count: usize,
    /// Count scaled between the table's min and max, for chart colouring.
    pub intensity: f64,
}

/// Tag frequency report.
#[derive(Debug, Clone, Serialize)]
pub struct TagReport {
    pub metadata: ReportMetadata,
    /// Distinct tags across all received products.
    pub distinct_tags: usize,
    /// Requested number of rows.
    pub top: usize,
    pub tags: Vec<TagRow>,
}

impl TagReport {
    /// Build the report rows from a ranked table.
    pub fn new(
        metadata: ReportMetadata,
        distinct_tags: usize,
        top: usize,
        table: &TagFrequencyTable,
    ) -> Self {
        let tags = table
            .rows()
            .iter()
            .enumerate()
            .map(|(i, row)| TagRow {
                rank: i + 1,
                tag: row.tag.clone(),
                count: row.count,
                intensity: table.intensity(row.count),
            })
            .collect();

        Self {
            metadata,
            distinct_tags,
            top,
            tags,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table(rows: &[(&str, usize)]) -> TagFrequencyTable {
        TagFrequencyTable::from_ranked(
            rows.iter()
                .map(|(tag, count)| TagCount {
                    tag: tag.to_string(),
                    count: *count,
                })
                .collect(),
        )
    }

    #[test]
    fn test_tags_label() {
        let mut record = Record {
            name: "Widget".to_string(),
            tagline: String::new(),
            upvotes: 3,
            comments: 1,
            tags: vec!["AI".to_string(), "Productivity".to_string()],
        };
        assert_eq!(record.tags_label(), "AI, Productivity");

        record.tags.clear();
        assert_eq!(record.tags_label(), "N/A");
    }

    #[test]
    fn test_min_max_count() {
        let t = table(&[("c", 3), ("a", 2), ("b", 1)]);
        assert_eq!(t.max_count(), Some(3));
        assert_eq!(t.min_count(), Some(1));
        assert_eq!(TagFrequencyTable::default().max_count(), None);
    }

    #[test]
    fn test_intensity_scale() {
        let t = table(&[("c", 5), ("a", 3), ("b", 1)]);
        assert_eq!(t.intensity(5), 1.0);
        assert_eq!(t.intensity(3), 0.5);
        assert_eq!(t.intensity(1), 0.0);
    }

    #[test]
    fn test_intensity_flat_and_empty() {
        let flat = table(&[("x", 2), ("y", 2)]);
        assert_eq!(flat.intensity(2), 1.0);
        assert_eq!(TagFrequencyTable::default().intensity(4), 0.0);
    }

    #[test]
    fn test_tag_report_rows() {
        let metadata = ReportMetadata {
            generated_at: Utc::now(),
            endpoint: "https://catalog.test".to_string(),
            limit: 5,
            products_received: 5,
        };
        let report = TagReport::new(metadata, 4, 3, &table(&[("c", 3), ("a", 2), ("b", 1)]));

        assert_eq!(report.tags.len(), 3);
        assert_eq!(report.tags[0].rank, 1);
        assert_eq!(report.tags[0].tag, "c");
        assert_eq!(report.tags[0].intensity, 1.0);
        assert_eq!(report.tags[2].rank, 3);
        assert_eq!(report.tags[2].intensity, 0.0);
    }

    #[test]
    fn test_serializes_as_list() {
        let t = table(&[("x", 2)]);
        let json = serde_json::to_string(&t).unwrap();
        assert_eq!(json, r#"[{"tag":"x","count":2}]"#);
    }
}
