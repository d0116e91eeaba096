// ColaCup - lib.rs
//
// Library entry point. ColaCup is the engine behind an in-app log viewer:
// filtering, grouping, throttled search, current-page resolution and
// details extraction. Rendering is left to the host.

pub mod app;
pub mod core;
pub mod platform;
pub mod util;

pub use app::session::LogViewerSession;
pub use app::source::{CurrentPage, CurrentPageProvider, LogSource, MemoryLogSource};
pub use core::filter::FilterModel;
pub use core::model::{LogEntry, LogGroup, SessionEvent, SessionState, SortOrder, TimeRange};
pub use platform::config::ViewerConfig;
pub use util::error::ColaCupError;
