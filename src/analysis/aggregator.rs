//! Tag frequency aggregation.
//!
//! This module flattens the tags of fetched records and ranks them by
//! occurrence count.

use crate::models::{Record, TagCount, TagFrequencyTable};
use std::cmp::Reverse;
use std::collections::HashMap;

/// Count every tag across `records`, keeping first-appearance order.
///
/// Tags are compared exactly (case and whitespace included).
pub fn count_tags(records: &[Record]) -> Vec<TagCount> {
    let mut counts: Vec<TagCount> = Vec::new();
    let mut slots: HashMap<&str, usize> = HashMap::new();

    for tag in records.iter().flat_map(|r| &r.tags) {
        match slots.get(tag.as_str()) {
            Some(&slot) => counts[slot].count += 1,
            None => {
                slots.insert(tag.as_str(), counts.len());
                counts.push(TagCount {
                    tag: tag.clone(),
                    count: 1,
                });
            }
        }
    }

    counts
}

/// Rank tags by descending count and keep the first `top_n`.
///
/// Equal counts stay in first-appearance order. Fewer rows than `top_n`
/// are returned when there are fewer distinct tags; no tags at all gives an
/// empty table.
pub fn top_tags(records: &[Record], top_n: usize) -> TagFrequencyTable {
    let mut ranked = count_tags(records);

    // sort_by_key is stable
    ranked.sort_by_key(|row| Reverse(row.count));
    ranked.truncate(top_n);

    TagFrequencyTable::from_ranked(ranked)
}

/// Number of distinct tags across `records`.
pub fn distinct_tag_count(records: &[Record]) -> usize {
    count_tags(records).len()
}
