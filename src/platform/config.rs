// ColaCup - platform/config.rs
//
// Config directory resolution and config.toml loading with validation.
// Every value is checked against named constants; bad values produce
// actionable warnings and fall back to defaults instead of failing.
//
// Uses the `directories` crate for XDG (Linux), AppData (Windows),
// Library (macOS/iOS) compliance.

use crate::core::details::DetailsFormatter;
use crate::core::model::{SortOrder, TimeRange};
use crate::util::constants;
use crate::util::error::ConfigError;
use chrono::format::{Item, StrftimeItems};
use chrono::{FixedOffset, Offset, Utc};
use directories::ProjectDirs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Resolve the platform configuration directory.
///
/// Falls back to the current directory if platform dirs cannot be determined.
pub fn config_dir() -> PathBuf {
    if let Some(proj_dirs) = ProjectDirs::from("", "", constants::APP_ID) {
        let dir = proj_dirs.config_dir().to_path_buf();
        tracing::debug!(config = %dir.display(), "Config directory resolved");
        dir
    } else {
        tracing::warn!("Could not determine platform directories, using current directory");
        PathBuf::from(".")
    }
}

// =============================================================================
// config.toml loading and validation
// =============================================================================

/// Raw deserialisable shape of config.toml.
///
/// Unknown keys are ignored so a newer config file works with an older library.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
pub struct RawConfig {
    /// `[viewer]` section.
    pub viewer: ViewerSection,
    /// `[details]` section.
    pub details: DetailsSection,
    /// `[logging]` section.
    pub logging: LoggingSection,
}

/// `[viewer]` config section.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
pub struct ViewerSection {
    /// Minimum spacing between throttled searches (ms).
    pub search_throttle_ms: Option<u64>,
    /// Collections smaller than this are searched synchronously.
    pub sync_search_threshold: Option<usize>,
    /// Entries scanned when resolving the current page.
    pub page_recency_window: Option<usize>,
    /// Use Appear/Disappear markers when the page hook does not say.
    pub use_lifecycle_markers: Option<bool>,
    /// "ascending" or "descending".
    pub default_sort: Option<String>,
    /// "current_page" or "since_launch".
    pub default_time_range: Option<String>,
}

/// `[details]` config section.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
pub struct DetailsSection {
    /// chrono strftime format for entry timestamps.
    pub time_format: Option<String>,
    /// Display offset from UTC in minutes.
    pub utc_offset_minutes: Option<i32>,
}

/// `[logging]` config section.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
pub struct LoggingSection {
    /// Log level: "error", "warn", "info", "debug", "trace".
    pub level: Option<String>,
}

/// Validated viewer configuration.
///
/// Passed explicitly into the session and the details formatter; nothing in
/// the crate reads process-wide settings.
#[derive(Debug, Clone, PartialEq)]
pub struct ViewerConfig {
    // -- Search --
    pub search_throttle: Duration,
    pub sync_search_threshold: usize,

    // -- Current page --
    pub page_recency_window: usize,
    pub use_lifecycle_markers: bool,

    // -- Initial filter --
    pub default_sort: SortOrder,
    pub default_time_range: TimeRange,

    // -- Details --
    pub time_format: String,
    pub utc_offset: FixedOffset,

    // -- Logging --
    pub log_level: Option<String>,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            search_throttle: Duration::from_millis(constants::DEFAULT_SEARCH_THROTTLE_MS),
            sync_search_threshold: constants::DEFAULT_SYNC_SEARCH_THRESHOLD,
            page_recency_window: constants::DEFAULT_PAGE_RECENCY_WINDOW,
            use_lifecycle_markers: false,
            default_sort: SortOrder::Descending,
            default_time_range: TimeRange::CurrentPage,
            time_format: constants::DEFAULT_TIME_FORMAT.to_string(),
            utc_offset: Utc.fix(),
            log_level: None,
        }
    }
}

impl ViewerConfig {
    /// Details formatter using this configuration's time settings.
    pub fn details_formatter(&self) -> DetailsFormatter {
        DetailsFormatter::new(&self.time_format, self.utc_offset)
    }
}

/// Read and parse config.toml without validation.
///
/// Returns `Ok(None)` if the file does not exist.
pub fn read_raw_config(config_path: &Path) -> Result<Option<RawConfig>, ConfigError> {
    if !config_path.exists() {
        return Ok(None);
    }
    let content = std::fs::read_to_string(config_path).map_err(|e| ConfigError::Io {
        path: config_path.to_path_buf(),
        source: e,
    })?;
    let raw = toml::from_str(&content).map_err(|e| ConfigError::TomlParse {
        path: config_path.to_path_buf(),
        source: e,
    })?;
    Ok(Some(raw))
}

/// Load and validate `config.toml` from the given config directory.
///
/// Returns the validated config and a list of non-fatal warnings. A missing
/// file yields defaults with no warnings; an unreadable or unparseable one
/// yields defaults with a warning.
pub fn load_config(config_dir: &Path) -> (ViewerConfig, Vec<String>) {
    let config_path = config_dir.join(constants::CONFIG_FILE_NAME);

    match read_raw_config(&config_path) {
        Ok(Some(raw)) => {
            tracing::info!(path = %config_path.display(), "Loaded config.toml");
            validate(raw)
        }
        Ok(None) => {
            tracing::debug!(path = %config_path.display(), "No config.toml found; using defaults");
            (ViewerConfig::default(), Vec::new())
        }
        Err(e) => {
            let msg = format!("{e}. Using defaults.");
            tracing::warn!("{}", msg);
            (ViewerConfig::default(), vec![msg])
        }
    }
}

/// Parse and validate config text supplied by the host.
pub fn load_config_str(content: &str) -> (ViewerConfig, Vec<String>) {
    match toml::from_str::<RawConfig>(content) {
        Ok(raw) => validate(raw),
        Err(e) => {
            let msg = format!("Failed to parse config: {e}. Using defaults.");
            tracing::warn!("{}", msg);
            (ViewerConfig::default(), vec![msg])
        }
    }
}

/// Validate each field against named constants, accumulating all warnings.
fn validate(raw: RawConfig) -> (ViewerConfig, Vec<String>) {
    let mut config = ViewerConfig::default();
    let mut warnings: Vec<String> = Vec::new();

    // -- Viewer: search_throttle_ms --
    if let Some(ms) = raw.viewer.search_throttle_ms {
        if (constants::MIN_SEARCH_THROTTLE_MS..=constants::MAX_SEARCH_THROTTLE_MS).contains(&ms) {
            config.search_throttle = Duration::from_millis(ms);
        } else {
            warnings.push(format!(
                "[viewer] search_throttle_ms = {ms} is out of range ({}-{}). Using default ({}).",
                constants::MIN_SEARCH_THROTTLE_MS,
                constants::MAX_SEARCH_THROTTLE_MS,
                constants::DEFAULT_SEARCH_THROTTLE_MS,
            ));
        }
    }

    // -- Viewer: sync_search_threshold --
    if let Some(threshold) = raw.viewer.sync_search_threshold {
        if (constants::MIN_SYNC_SEARCH_THRESHOLD..=constants::MAX_SYNC_SEARCH_THRESHOLD)
            .contains(&threshold)
        {
            config.sync_search_threshold = threshold;
        } else {
            warnings.push(format!(
                "[viewer] sync_search_threshold = {threshold} is out of range ({}-{}). Using default ({}).",
                constants::MIN_SYNC_SEARCH_THRESHOLD,
                constants::MAX_SYNC_SEARCH_THRESHOLD,
                constants::DEFAULT_SYNC_SEARCH_THRESHOLD,
            ));
        }
    }

    // -- Viewer: page_recency_window --
    if let Some(window) = raw.viewer.page_recency_window {
        if (constants::MIN_PAGE_RECENCY_WINDOW..=constants::MAX_PAGE_RECENCY_WINDOW)
            .contains(&window)
        {
            config.page_recency_window = window;
        } else {
            warnings.push(format!(
                "[viewer] page_recency_window = {window} is out of range ({}-{}). Using default ({}).",
                constants::MIN_PAGE_RECENCY_WINDOW,
                constants::MAX_PAGE_RECENCY_WINDOW,
                constants::DEFAULT_PAGE_RECENCY_WINDOW,
            ));
        }
    }

    if let Some(markers) = raw.viewer.use_lifecycle_markers {
        config.use_lifecycle_markers = markers;
    }

    // -- Viewer: default_sort --
    if let Some(ref sort) = raw.viewer.default_sort {
        match sort.to_lowercase().as_str() {
            "ascending" => config.default_sort = SortOrder::Ascending,
            "descending" => config.default_sort = SortOrder::Descending,
            other => warnings.push(format!(
                "[viewer] default_sort = \"{other}\" is not recognised. \
                 Expected \"ascending\" or \"descending\". Using default (descending).",
            )),
        }
    }

    // -- Viewer: default_time_range --
    if let Some(ref range) = raw.viewer.default_time_range {
        match range.to_lowercase().as_str() {
            "current_page" => config.default_time_range = TimeRange::CurrentPage,
            "since_launch" => config.default_time_range = TimeRange::SinceLaunch,
            other => warnings.push(format!(
                "[viewer] default_time_range = \"{other}\" is not recognised. \
                 Expected \"current_page\" or \"since_launch\". Using default (current_page).",
            )),
        }
    }

    // -- Details: time_format --
    if let Some(ref format) = raw.details.time_format {
        let invalid = format.is_empty()
            || StrftimeItems::new(format).any(|item| matches!(item, Item::Error));
        if invalid {
            warnings.push(format!(
                "[details] time_format = \"{format}\" is not a valid strftime format. \
                 Using default (\"{}\").",
                constants::DEFAULT_TIME_FORMAT,
            ));
        } else {
            config.time_format = format.clone();
        }
    }

    // -- Details: utc_offset_minutes --
    if let Some(minutes) = raw.details.utc_offset_minutes {
        let offset = (constants::MIN_UTC_OFFSET_MINUTES..=constants::MAX_UTC_OFFSET_MINUTES)
            .contains(&minutes)
            .then(|| FixedOffset::east_opt(minutes * 60))
            .flatten();
        match offset {
            Some(offset) => config.utc_offset = offset,
            None => warnings.push(format!(
                "[details] utc_offset_minutes = {minutes} is out of range ({}-{}). Using default (0).",
                constants::MIN_UTC_OFFSET_MINUTES,
                constants::MAX_UTC_OFFSET_MINUTES,
            )),
        }
    }

    // -- Logging: level --
    if let Some(ref level) = raw.logging.level {
        let valid = ["error", "warn", "info", "debug", "trace"];
        if valid.contains(&level.to_lowercase().as_str()) {
            config.log_level = Some(level.clone());
        } else {
            warnings.push(format!(
                "[logging] level = \"{level}\" is not recognised. \
                 Valid values: error, warn, info, debug, trace. Using default (info).",
            ));
        }
    }

    if !warnings.is_empty() {
        tracing::warn!(
            count = warnings.len(),
            "Config validation produced warnings"
        );
    }

    (config, warnings)
}
