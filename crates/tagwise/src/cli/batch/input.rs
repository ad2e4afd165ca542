//! Reading batch input files: a JSON array or JSONL of `{id, url, caption}`.

use std::collections::HashSet;
use std::path::Path;
use tagwise_core::BatchItem;

/// Load batch items from a file.
///
/// Accepts a JSON array first and falls back to one object per line. Items
/// without a URL are dropped with a warning, since they can't be tagged.
pub fn load_items(path: &Path) -> anyhow::Result<Vec<BatchItem>> {
    let content = std::fs::read_to_string(path)?;
    let items = parse_items(&content)?;

    let (valid, skipped): (Vec<_>, Vec<_>) = items
        .into_iter()
        .partition(|item| !item.request.url.trim().is_empty());
    if !skipped.is_empty() {
        tracing::warn!("Skipping {} posts without a URL", skipped.len());
    }
    Ok(valid)
}

fn parse_items(content: &str) -> anyhow::Result<Vec<BatchItem>> {
    if let Ok(items) = serde_json::from_str::<Vec<BatchItem>>(content) {
        return Ok(items);
    }

    tracing::debug!("Input is not a JSON array, trying JSONL line-by-line");
    let mut items = Vec::new();
    for (line_no, line) in content.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let item: BatchItem = serde_json::from_str(line)
            .map_err(|e| anyhow::anyhow!("Invalid item on line {}: {e}", line_no + 1))?;
        items.push(item);
    }
    Ok(items)
}

/// Drop items whose id is already in `done`.
pub fn without_done(items: Vec<BatchItem>, done: &HashSet<String>) -> Vec<BatchItem> {
    items
        .into_iter()
        .filter(|item| !done.contains(&item.id))
        .collect()
}
