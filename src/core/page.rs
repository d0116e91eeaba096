// ColaCup - core/page.rs
//
// Current-page window resolution: find the logs emitted while the host's
// current page was on screen, without the host tagging entries explicitly.
//
// Two strategies, both restricted to the most recent `recency` entries:
//   - Lifecycle markers: "- Appear - <Type>" and a later "- Disappear - <Type>"
//     bound the window directly (host opt-in).
//   - Heuristic: the last run of entries from the target file, extended back
//     over a short gap of interleaved global logging.
//
// Core layer: pure logic, no I/O.

use crate::core::model::LogEntry;
use crate::util::constants::{
    APPEAR_MARKER_PREFIX, DISAPPEAR_MARKER_PREFIX, PAGE_START_COMPAT_SECS,
};

/// Inclusive timestamp bounds of the current page.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageWindow {
    pub start: f64,
    pub end: f64,
}

impl PageWindow {
    pub fn contains(&self, timestamp: f64) -> bool {
        self.start <= timestamp && timestamp <= self.end
    }
}

/// Last path component of a source file identifier.
pub fn normalize_file_name(file: &str) -> &str {
    file.rsplit(['/', '\\']).next().unwrap_or(file)
}

/// Type name derived from a source file name: `HomePage.swift` -> `HomePage`.
pub fn type_name(file: &str) -> &str {
    let name = normalize_file_name(file);
    match name.rfind('.') {
        Some(dot) if dot > 0 => &name[..dot],
        _ => name,
    }
}

/// The trailing `recency` entries of `logs`.
fn recent(logs: &[LogEntry], recency: usize) -> &[LogEntry] {
    &logs[logs.len().saturating_sub(recency)..]
}

/// Resolve the page window for `file` within the last `recency` entries.
///
/// Returns `None` when no window can be established.
pub fn resolve_window(
    logs: &[LogEntry],
    file: &str,
    use_lifecycle_markers: bool,
    recency: usize,
) -> Option<PageWindow> {
    let window = recent(logs, recency);
    if window.is_empty() {
        return None;
    }
    let target = normalize_file_name(file);

    if use_lifecycle_markers {
        if let Some(found) = marker_window(window, type_name(target)) {
            tracing::debug!(
                file = target,
                start = found.start,
                end = found.end,
                "Page window from lifecycle markers"
            );
            return Some(found);
        }
        tracing::debug!(file = target, "No lifecycle markers, using heuristic");
    }

    let found = heuristic_window(window, target);
    if found.is_none() {
        tracing::debug!(file = target, "No page window could be established");
    }
    found
}

/// Entries from `file` inside its resolved page window, in chronological order.
pub fn current_page_logs(
    logs: &[LogEntry],
    file: &str,
    use_lifecycle_markers: bool,
    recency: usize,
) -> Vec<LogEntry> {
    let Some(window) = resolve_window(logs, file, use_lifecycle_markers, recency) else {
        return Vec::new();
    };
    let target = normalize_file_name(file);

    recent(logs, recency)
        .iter()
        .filter(|entry| entry.file_name() == target && window.contains(entry.timestamp))
        .cloned()
        .collect()
}

/// Most recent appear marker followed by a disappear marker for `type_name`.
fn marker_window(window: &[LogEntry], type_name: &str) -> Option<PageWindow> {
    let appear = format!("{APPEAR_MARKER_PREFIX}{type_name}");
    let disappear = format!("{DISAPPEAR_MARKER_PREFIX}{type_name}");

    let appear_idx = window.iter().rposition(|e| e.message == appear)?;
    let disappear_entry = window[appear_idx + 1..]
        .iter()
        .find(|e| e.message == disappear)?;

    Some(PageWindow {
        start: window[appear_idx].timestamp,
        end: disappear_entry.timestamp,
    })
}

fn heuristic_window(window: &[LogEntry], target: &str) -> Option<PageWindow> {
    let end_idx = window.iter().rposition(|e| e.file_name() == target)?;
    let end = window[end_idx].timestamp;

    // Last foreign entry logged strictly before the page's last log.
    let boundary = window[..end_idx]
        .iter()
        .rposition(|e| e.file_name() != target && e.timestamp < end)?;
    let candidate = window[boundary + 1].timestamp;
    let mut start = candidate;

    // Global logging can interleave with the page's first logs; a page entry
    // shortly before the boundary still belongs to this visit.
    for entry in window[..boundary].iter().rev() {
        if candidate - entry.timestamp > PAGE_START_COMPAT_SECS {
            break;
        }
        if entry.file_name() == target {
            start = entry.timestamp;
        }
    }

    Some(PageWindow { start, end })
}
