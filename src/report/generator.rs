//! Markdown and JSON report generation.
//!
//! This module renders listing and tag reports. Charts are left to
//! whatever consumes the JSON output; each tag row carries its intensity.

use crate::models::{ListingReport, Record, ReportMetadata, TagReport};
use anyhow::{Context, Result};
use serde::Serialize;
use std::path::Path;

/// Generate the Markdown product listing.
pub fn generate_listing_markdown(report: &ListingReport) -> String {
    let mut output = String::new();

    output.push_str("# Product Hunt Trends: Top Products\n\n");
    output.push_str(&generate_metadata_section(&report.metadata));
    output.push_str("## Products\n\n");

    if report.products.is_empty() {
        output.push_str("> ❌ No data received from the catalog API.\n\n");
        output.push_str(&generate_footer());
        return output;
    }

    for (i, product) in report.products.iter().enumerate() {
        output.push_str(&generate_product_block(i + 1, product));
    }

    if !report.can_fetch_more {
        output.push_str(&format!(
            "✅ You've reached the maximum limit of {} products.\n\n",
            report.metadata.limit
        ));
    }

    output.push_str(&generate_footer());
    output
}

/// Generate the Markdown tag frequency table.
pub fn generate_tags_markdown(report: &TagReport) -> String {
    let mut output = String::new();

    output.push_str("# Product Hunt Trends: Tag Frequency\n\n");
    output.push_str(&generate_metadata_section(&report.metadata));
    output.push_str("## Most Common Tags\n\n");

    if report.metadata.products_received == 0 {
        output.push_str("> ❌ No data available.\n\n");
    } else if report.tags.is_empty() {
        output.push_str("> No tags found to analyze.\n\n");
    } else {
        output.push_str(&format!(
            "*Showing {} of {} distinct tags*\n\n",
            report.tags.len(),
            report.distinct_tags
        ));
        output.push_str("| Rank | Tag | Count | Intensity |\n");
        output.push_str("|-----:|-----|------:|----------:|\n");

        for row in &report.tags {
            output.push_str(&format!(
                "| {} | {} | {} | {:.2} |\n",
                row.rank,
                escape_cell(&row.tag),
                row.count,
                row.intensity
            ));
        }
        output.push('\n');
    }

    output.push_str(&generate_footer());
    output
}

/// Generate the metadata section.
fn generate_metadata_section(metadata: &ReportMetadata) -> String {
    let mut section = String::new();

    section.push_str("## Metadata\n\n");
    section.push_str(&format!(
        "- **Generated:** {}\n",
        metadata.generated_at.format("%Y-%m-%d %H:%M:%S UTC")
    ));
    section.push_str(&format!("- **Endpoint:** {}\n", metadata.endpoint));
    section.push_str(&format!("- **Products Requested:** {}\n", metadata.limit));
    section.push_str(&format!(
        "- **Products Received:** {}\n",
        metadata.products_received
    ));
    section.push('\n');

    section
}

/// Generate a single product block.
fn generate_product_block(rank: usize, product: &Record) -> String {
    let mut block = String::new();

    block.push_str(&format!("### {}. {}\n\n", rank, product.name));

    if !product.tagline.is_empty() {
        block.push_str(&format!("*{}*\n\n", product.tagline));
    }

    block.push_str(&format!("- **Upvotes:** {}\n", product.upvotes));
    block.push_str(&format!("- **Comments:** {}\n", product.comments));
    block.push_str(&format!("- **Tags:** {}\n\n", product.tags_label()));
    block.push_str("---\n\n");

    block
}

/// Tag names may contain pipes, which would split a table cell.
fn escape_cell(text: &str) -> String {
    text.replace('|', "\\|")
}

/// Generate the report footer.
fn generate_footer() -> String {
    "*Report generated by phtrends using the Product Hunt API*\n".to_string()
}

/// Generate a JSON report.
pub fn generate_json_report<T: Serialize>(report: &T) -> Result<String> {
    serde_json::to_string_pretty(report).map_err(Into::into)
}

/// Write rendered report content to a file.
pub fn write_report(content: &str, path: &Path) -> Result<()> {
    std::fs::write(path, content)
        .with_context(|| format!("Failed to write report to {}", path.display()))
}
