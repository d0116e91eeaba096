// ColaCup - app/source.rs
//
// Collaborator interfaces supplied by the host at session construction.
// The host owns log storage and knows which page is on screen; the viewer
// only reads through these traits.

use crate::core::model::LogEntry;
use chrono::NaiveDate;

/// Where the viewer reads logs from.
pub trait LogSource: Send + Sync {
    /// Full in-memory history since launch, oldest first.
    fn logs(&self) -> Vec<LogEntry>;

    /// Archived logs for a past day, oldest first. `None` if no archive exists.
    fn read_logs_from_disk(&self, date: NaiveDate) -> Option<Vec<LogEntry>>;
}

/// The page the user was looking at before opening the viewer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CurrentPage {
    /// Source file of the page; may be a full path.
    pub file: String,
    /// Resolve the page window from Appear/Disappear markers when present.
    pub use_lifecycle_markers: bool,
}

/// Host hook naming the current page.
pub trait CurrentPageProvider: Send + Sync {
    /// `None` when the host cannot tell which page is current.
    fn current_page(&self) -> Option<CurrentPage>;
}

/// In-memory log source, for hosts that already hold their history in a
/// `Vec` and have no archive.
#[derive(Debug, Clone, Default)]
pub struct MemoryLogSource {
    logs: Vec<LogEntry>,
    archives: Vec<(NaiveDate, Vec<LogEntry>)>,
}

impl MemoryLogSource {
    pub fn new(logs: Vec<LogEntry>) -> Self {
        Self {
            logs,
            archives: Vec::new(),
        }
    }

    /// Attach an archived day.
    pub fn with_archive(mut self, date: NaiveDate, logs: Vec<LogEntry>) -> Self {
        self.archives.push((date, logs));
        self
    }
}

impl LogSource for MemoryLogSource {
    fn logs(&self) -> Vec<LogEntry> {
        self.logs.clone()
    }

    fn read_logs_from_disk(&self, date: NaiveDate) -> Option<Vec<LogEntry>> {
        self.archives
            .iter()
            .find(|(day, _)| *day == date)
            .map(|(_, logs)| logs.clone())
    }
}

/// Fixed current page, for hosts that know the page up front.
impl CurrentPageProvider for CurrentPage {
    fn current_page(&self) -> Option<CurrentPage> {
        Some(self.clone())
    }
}
