//! Markdown summary generation
//!
//! This module renders crawl results as markdown: the POI table, the link
//! score table, and the full task report built from both.

use crate::output::summary::{CrawlSummary, OutputResult};
use crate::storage::PoisByUrl;
use std::collections::BTreeMap;
use std::fmt::Write as _;
use std::fs::File;
use std::io::Write;
use std::path::Path;

/// Makes a value safe to put in a table cell
fn cell(value: &str) -> String {
    value.replace('|', "\\|").replace(['\r', '\n'], " ")
}

/// Formats POIs as a markdown table
///
/// Rows are numbered from 1 across all URLs, in URL order. A missing
/// location is shown as `-`.
pub fn format_poi_table(pois: &PoisByUrl) -> String {
    let mut md = String::new();
    md.push_str("| Sno | URL | Name | Category | Location | Description |\n");
    md.push_str("| --- | --- | --- | --- | --- | --- |\n");

    let rows = pois
        .iter()
        .flat_map(|(url, list)| list.iter().map(move |poi| (url, poi)));

    for (sno, (url, poi)) in rows.enumerate() {
        let _ = writeln!(
            md,
            "| {} | {} | {} | {} | {} | {} |",
            sno + 1,
            cell(url),
            cell(&poi.name),
            cell(&poi.category),
            poi.location.as_deref().map_or_else(|| "-".to_string(), cell),
            cell(&poi.description)
        );
    }

    md
}

/// Formats link scores as a markdown table, highest score first
///
/// Equal scores are listed in URL order.
pub fn format_score_table(scores: &BTreeMap<String, f64>) -> String {
    let mut ranked: Vec<(&String, &f64)> = scores.iter().collect();
    ranked.sort_by(|a, b| b.1.total_cmp(a.1));

    let mut md = String::new();
    md.push_str("| Sno | URL | Score |\n");
    md.push_str("| --- | --- | --- |\n");
    for (sno, (url, score)) in ranked.into_iter().enumerate() {
        let _ = writeln!(md, "| {} | {} | {} |", sno + 1, cell(url), score);
    }
    md
}

/// Generates a markdown summary file
///
/// # Arguments
///
/// * `summary` - The crawl summary data
/// * `output_path` - Path where the markdown file should be written
///
/// # Returns
///
/// * `Ok(())` - Successfully wrote markdown summary
/// * `Err(OutputError)` - Failed to write summary
pub fn generate_markdown_summary(summary: &CrawlSummary, output_path: &Path) -> OutputResult<()> {
    let markdown = format_markdown_summary(summary);

    let mut file = File::create(output_path)?;
    file.write_all(markdown.as_bytes())?;

    tracing::info!("Wrote summary to {}", output_path.display());
    Ok(())
}

/// Formats a crawl summary as markdown
pub fn format_markdown_summary(summary: &CrawlSummary) -> String {
    let mut md = String::new();

    md.push_str(&format!("# POI Crawl Summary: {}\n\n", summary.task_name));

    md.push_str("## Task Information\n\n");
    md.push_str(&format!("- **Task ID**: {}\n", summary.task_id));
    md.push_str(&format!("- **Base URL**: {}\n", summary.base_url));
    md.push_str(&format!("- **Status**: {}\n", summary.status.to_db_string()));
    md.push_str(&format!("- **Created**: {}\n", summary.created_at));
    md.push_str(&format!("- **Updated**: {}\n\n", summary.updated_at));

    md.push_str("## Statistics\n\n");
    md.push_str(&format!("- **POIs Found**: {}\n", summary.total_pois));
    md.push_str(&format!("- **Pages With POIs**: {}\n", summary.urls_with_pois));
    if summary.total_links > 0 {
        md.push_str(&format!("- **Known Links**: {}\n", summary.total_links));
        md.push_str(&format!("- **Visited Links**: {}\n", summary.visited_links));
        md.push_str(&format!("- **Unvisited Links**: {}\n", summary.frontier_links));
        md.push_str(&format!("- **POI Yield**: {:.2}%\n", summary.poi_yield()));
    }
    md.push('\n');

    md.push_str("## Points of Interest\n\n");
    if summary.pois.is_empty() {
        md.push_str("No POIs found yet.\n\n");
    } else {
        md.push_str(&format_poi_table(&summary.pois));
        md.push('\n');
    }

    if !summary.url_scores.is_empty() {
        md.push_str("## Link Scores\n\n");
        md.push_str(&format_score_table(&summary.url_scores));
        md.push('\n');
    }

    md.push_str("---\n\n");
    md.push_str(&format!(
        "*Generated by poi-crawl v{} at {}*\n",
        env!("CARGO_PKG_VERSION"),
        chrono::Utc::now().to_rfc3339()
    ));

    md
}
