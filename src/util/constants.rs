// ColaCup - util/constants.rs
//
// Single source of truth for all named constants, limits, and defaults.

// =============================================================================
// Library metadata
// =============================================================================

/// Library display name.
pub const APP_NAME: &str = "ColaCup";

/// Identifier used for config directories.
pub const APP_ID: &str = "ColaCup";

/// Current library version.
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

// =============================================================================
// Filter vocabulary
// =============================================================================

/// Sentinel selection meaning "no constraint" for flag and module sets.
pub const ALL_SENTINEL: &str = "ALL";

// =============================================================================
// Search
// =============================================================================

/// Collections smaller than this are searched synchronously; larger ones go
/// through the throttler so rapid keystrokes do not each trigger a full scan.
pub const DEFAULT_SYNC_SEARCH_THRESHOLD: usize = 3_000;

/// Minimum user-configurable synchronous search threshold.
pub const MIN_SYNC_SEARCH_THRESHOLD: usize = 1;

/// Maximum user-configurable synchronous search threshold.
pub const MAX_SYNC_SEARCH_THRESHOLD: usize = 1_000_000;

/// Minimum spacing between two throttled searches (ms).
pub const DEFAULT_SEARCH_THROTTLE_MS: u64 = 300;

/// Minimum user-configurable search throttle interval (ms).
pub const MIN_SEARCH_THROTTLE_MS: u64 = 50;

/// Maximum user-configurable search throttle interval (ms).
pub const MAX_SEARCH_THROTTLE_MS: u64 = 5_000;

// =============================================================================
// Current page resolution
// =============================================================================

/// Only the most recent entries are scanned when resolving the current page.
pub const DEFAULT_PAGE_RECENCY_WINDOW: usize = 1_000;

/// Minimum user-configurable recency window.
pub const MIN_PAGE_RECENCY_WINDOW: usize = 10;

/// Maximum user-configurable recency window.
pub const MAX_PAGE_RECENCY_WINDOW: usize = 100_000;

/// A same-file entry this close (seconds) before the candidate start pulls the
/// window start back to it. Compensates for global logging interleaved with
/// page logs around a page transition.
pub const PAGE_START_COMPAT_SECS: f64 = 2.0;

/// Message prefix logged by a page when it becomes visible.
pub const APPEAR_MARKER_PREFIX: &str = "- Appear - ";

/// Message prefix logged by a page when it stops being visible.
pub const DISAPPEAR_MARKER_PREFIX: &str = "- Disappear - ";

// =============================================================================
// Details
// =============================================================================

/// Replaces an extracted JSON span inside the content section.
pub const JSON_PLACEHOLDER: &str = "{ JSON at the bottom }";

/// Default display format for entry timestamps.
pub const DEFAULT_TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.3f";

/// Bounds for the configured display UTC offset (minutes).
pub const MIN_UTC_OFFSET_MINUTES: i32 = -12 * 60;
pub const MAX_UTC_OFFSET_MINUTES: i32 = 14 * 60;

// =============================================================================
// Logging
// =============================================================================

/// Default log level.
pub const DEFAULT_LOG_LEVEL: &str = "info";

/// Maximum length of a log message included in debug output.
pub const DEBUG_MAX_LINE_PREVIEW: usize = 200;

// =============================================================================
// Export
// =============================================================================

/// Maximum number of entries that can be exported in a single operation.
pub const MAX_EXPORT_ENTRIES: usize = 5_000_000;

// =============================================================================
// Configuration
// =============================================================================

/// Configuration file name.
pub const CONFIG_FILE_NAME: &str = "config.toml";
