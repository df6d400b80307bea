//! Input loading and table rendering for the CLI commands

use anyhow::{Context, Result};
use comfy_table::{Cell, Color, ContentArrangement, Table};
use costboard_core::{merge_pages, EntitlementFetcher};
use costboard_types::{
    AccessType, BreakdownSlice, EntitlementRecord, RawReport, Series, TopItems, TrendPoint,
    UserAccess, UserAccessData,
};
use serde::Serialize;
use std::io::Read;
use std::path::{Path, PathBuf};

// ============================================================================
// Input
// ============================================================================

/// Read a file, or stdin for `-`
fn read_input(path: &Path) -> Result<String> {
    if path == Path::new("-") {
        let mut content = String::new();
        std::io::stdin()
            .read_to_string(&mut content)
            .context("Failed to read stdin")?;
        return Ok(content);
    }
    std::fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))
}

/// Load one report, merging several files as successive pages
pub fn load_report(paths: &[PathBuf]) -> Result<RawReport> {
    let pages = paths
        .iter()
        .map(|path| {
            let content = read_input(path)?;
            serde_json::from_str::<RawReport>(&content)
                .with_context(|| format!("Invalid report payload in {}", path.display()))
        })
        .collect::<Result<Vec<_>>>()?;

    tracing::debug!(pages = pages.len(), "Loaded report pages");
    Ok(merge_pages(pages))
}

/// Load an entitlement list
///
/// Accepts a user-access body (`{"data": [...]}` or `{"data": true}`) or a
/// bare array of records.
pub fn load_entitlements_file(path: &Path) -> Result<Vec<EntitlementRecord>> {
    let content = read_input(path)?;
    if let Ok(records) = serde_json::from_str::<Vec<EntitlementRecord>>(&content) {
        return Ok(records);
    }
    let access: UserAccess = serde_json::from_str(&content)
        .with_context(|| format!("Invalid user-access payload in {}", path.display()))?;
    Ok(match access.data {
        UserAccessData::Records(records) => records,
        UserAccessData::Flag(flag) => vec![EntitlementRecord::flag(flag)],
    })
}

/// User-access payloads saved as `<dir>/{all,gcp,ibm}.json`
///
/// A missing or unreadable file stands in for a failed query.
pub struct DirAccess {
    dir: PathBuf,
}

impl DirAccess {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }
}

impl EntitlementFetcher for DirAccess {
    async fn fetch_user_access(&self, kind: AccessType, query: &str) -> Result<UserAccess> {
        let path = self.dir.join(format!("{kind}.json"));
        tracing::debug!(path = %path.display(), query, "Reading user-access payload");
        let content = std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        serde_json::from_str(&content)
            .with_context(|| format!("Invalid user-access payload in {}", path.display()))
    }
}

/// Parse `key=value`
pub fn parse_key_value(s: &str) -> Result<(String, String), String> {
    let (key, value) = s
        .split_once('=')
        .ok_or_else(|| format!("expected key=value, got '{s}'"))?;
    if key.is_empty() {
        return Err(format!("empty key in '{s}'"));
    }
    Ok((key.to_string(), value.to_string()))
}

// ============================================================================
// Output
// ============================================================================

pub fn to_json<T: Serialize>(value: &T) -> Result<String> {
    serde_json::to_string_pretty(value).context("Failed to serialize output")
}

fn new_table(headers: &[&str], no_color: bool) -> Table {
    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    if no_color {
        table.set_header(headers.to_vec());
    } else {
        table.set_header(
            headers
                .iter()
                .map(|h| Cell::new(h).fg(Color::Cyan))
                .collect::<Vec<_>>(),
        );
    }
    table
}

fn format_amount(value: f64) -> String {
    format!("{value:.2}")
}

fn format_optional(value: Option<f64>) -> String {
    value.map(format_amount).unwrap_or_else(|| "-".to_string())
}

fn format_share(share: f64) -> String {
    format!("{:.1}%", share * 100.0)
}

pub fn format_series_table(series: &Series, no_color: bool) -> String {
    let value_header = format!("{} ({})", series.metric, series.units);
    let mut table = new_table(&["Key", value_header.as_str()], no_color);
    for point in series {
        table.add_row(vec![point.x.to_string(), format_amount(point.y)]);
    }
    table.add_row(vec!["Total".to_string(), format_amount(series.total())]);
    table.to_string()
}

pub fn format_trend_table(points: &[TrendPoint], no_color: bool) -> String {
    let mut table = new_table(&["Day", "Current", "Previous", "Change"], no_color);
    for point in points {
        let change = point
            .percent_change()
            .map(|p| format!("{p:+.1}%"))
            .unwrap_or_else(|| "-".to_string());
        table.add_row(vec![
            point.offset.to_string(),
            format_optional(point.current),
            format_optional(point.previous),
            change,
        ]);
    }
    table.to_string()
}

pub fn format_top_table(top: &TopItems, no_color: bool) -> String {
    let value_header = format!("{} ({})", top.metric, top.units);
    let mut table = new_table(
        &[top.group_key.as_str(), value_header.as_str(), "Share"],
        no_color,
    );
    for item in top.items.iter().chain(top.others.iter()) {
        table.add_row(vec![
            item.label.clone(),
            format_amount(item.value),
            format_share(item.share),
        ]);
    }
    table.add_row(vec![
        "Total".to_string(),
        format_amount(top.total),
        String::new(),
    ]);
    table.to_string()
}

pub fn format_breakdown_table(slices: &[BreakdownSlice], no_color: bool) -> String {
    let mut table = new_table(&["Component", "Value", "Units"], no_color);
    for slice in slices {
        table.add_row(vec![
            slice.kind.label().to_string(),
            format_amount(slice.value),
            slice.units.clone(),
        ]);
    }
    table.to_string()
}
