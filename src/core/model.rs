// ColaCup - core/model.rs
//
// Core data model types. Pure data definitions with no I/O, no threads,
// no platform dependencies.
//
// These types are the shared vocabulary across all layers.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

// =============================================================================
// Log Entry (recorded by the host's logging collaborator)
// =============================================================================

/// A single log record as recorded by the host application.
///
/// Entries are immutable once recorded and arrive in chronological order.
/// The viewer never mutates them; it only filters, groups and projects them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogEntry {
    /// Seconds since the Unix epoch, with sub-second precision.
    pub timestamp: f64,

    /// Category label (e.g. "DEBUG", "ERROR", or a host-defined flag).
    pub flag: String,

    /// Subsystem label.
    pub module: String,

    /// Source file that emitted the log. May be a full path.
    pub file: String,

    /// Function that emitted the log.
    pub function: String,

    /// Source line that emitted the log.
    pub line: u64,

    /// Log message text.
    pub message: String,

    /// Grouping key joining several physical log calls into one logical entry.
    #[serde(default)]
    pub identifier: Option<String>,
}

impl LogEntry {
    /// Last path component of `file`.
    pub fn file_name(&self) -> &str {
        crate::core::page::normalize_file_name(&self.file)
    }

    /// Timestamp as a UTC date-time. `None` for non-finite or out-of-range values.
    pub fn date_time(&self) -> Option<DateTime<Utc>> {
        if !self.timestamp.is_finite() {
            return None;
        }
        let secs = self.timestamp.floor();
        let nanos = ((self.timestamp - secs) * 1e9).round().min(999_999_999.0) as u32;
        DateTime::from_timestamp(secs as i64, nanos)
    }
}

/// Entries sharing an identifier (or a lone entry without one), in display order.
pub type LogGroup = Vec<LogEntry>;

// =============================================================================
// Well-known flags
// =============================================================================

/// Flags emitted by the standard logging collaborator. Hosts may add their own.
pub mod flags {
    pub const DEBUG: &str = "DEBUG";
    pub const INFO: &str = "INFO";
    pub const SUCCESS: &str = "SUCCESS";
    pub const WARNING: &str = "WARNING";
    pub const ERROR: &str = "ERROR";
}

// =============================================================================
// Sort order and time range
// =============================================================================

/// Display order of groups.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    /// Oldest first.
    Ascending,
    /// Newest first.
    #[default]
    Descending,
}

impl SortOrder {
    pub fn label(&self) -> &'static str {
        match self {
            SortOrder::Ascending => "ascending",
            SortOrder::Descending => "descending",
        }
    }
}

/// Which slice of history the viewer shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum TimeRange {
    /// Logs emitted while the host's current page was visible.
    #[default]
    CurrentPage,
    /// Everything recorded since the app launched (in-memory history).
    SinceLaunch,
    /// A past day, read from the host's archive.
    SpecificDate(NaiveDate),
}

// =============================================================================
// Details projection
// =============================================================================

/// Named section of the details view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum SectionKind {
    Time,
    Content,
    Position,
    Function,
    Json,
}

impl SectionKind {
    /// Section header text.
    pub fn title(&self) -> &'static str {
        match self {
            SectionKind::Time => "Time",
            SectionKind::Content => "Content",
            SectionKind::Position => "Position",
            SectionKind::Function => "Function",
            SectionKind::Json => "JSON",
        }
    }
}

/// One row in a details section. Rows without a title are free text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DetailsItem {
    pub title: Option<String>,
    pub value: String,
}

impl DetailsItem {
    pub fn text(value: impl Into<String>) -> Self {
        Self {
            title: None,
            value: value.into(),
        }
    }

    pub fn titled(title: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            title: Some(title.into()),
            value: value.into(),
        }
    }
}

/// A read-only section of the details projection for one entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DetailsSection {
    pub kind: SectionKind,
    pub items: Vec<DetailsItem>,
}

// =============================================================================
// Viewer session lifecycle
// =============================================================================

/// Lifecycle of a viewer session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// Created, logs not read yet.
    Idle,
    /// `process_logs` is running on a background thread.
    Loading,
    /// Logs are processed; filter and search are available.
    Ready,
}

impl SessionState {
    pub fn label(&self) -> &'static str {
        match self {
            SessionState::Idle => "idle",
            SessionState::Loading => "loading",
            SessionState::Ready => "ready",
        }
    }
}

/// Identifies one `process_logs`/`filter`/`search` request.
pub type RequestId = u64;

/// Completion notifications delivered to the home thread by
/// `LogViewerSession::poll_events`. The display state has already been
/// updated when the caller sees one of these.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    /// Initial processing finished; the session is Ready.
    Loaded { request: RequestId, groups: usize },

    /// A filter pass finished and its groups are now displayed.
    Filtered { request: RequestId, groups: usize },

    /// A search finished and its groups are now displayed.
    Searched {
        request: RequestId,
        keyword: String,
        groups: usize,
    },
}

impl SessionEvent {
    pub fn request(&self) -> RequestId {
        match self {
            SessionEvent::Loaded { request, .. }
            | SessionEvent::Filtered { request, .. }
            | SessionEvent::Searched { request, .. } => *request,
        }
    }
}
