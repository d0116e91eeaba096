// ColaCup - app/session.rs
//
// Viewer session: the orchestration layer between the host's screens and the
// core engine. Owns the display state (shown groups, filter model, flag and
// module vocabularies) and runs every scan off the calling thread.
//
// Architecture:
//   - `LogViewerSession` lives on the host's home thread. `process_logs`,
//     `filter` and large `search`es run on background threads.
//   - Results come back as `WorkerResult` messages over an mpsc channel.
//     Display state is only mutated in `poll_events`/`wait_event`, on the
//     home thread, so it needs no locking.
//   - Large searches go through a `Throttler`; a superseded search never
//     runs and never produces an event.
//   - Overlapping filter calls are not serialised: each completes and the
//     last one applied wins.
//
// Lifecycle: Idle -> Loading -> Ready. Filter and search require Ready.

use crate::app::source::{CurrentPageProvider, LogSource};
use crate::app::throttle::Throttler;
use crate::core::details::{self, DetailsFormatter};
use crate::core::export;
use crate::core::filter::{self, FilterModel};
use crate::core::model::{
    DetailsSection, LogEntry, LogGroup, RequestId, SessionEvent, SessionState, TimeRange,
};
use crate::core::page;
use crate::platform::config::ViewerConfig;
use crate::util::error::{self, SessionError};
use crate::util::logging;
use std::io::Write;
use std::path::Path;
use std::sync::{mpsc, Arc};
use std::time::Duration;

// =============================================================================
// Worker messages
// =============================================================================

/// Output of one range-based pass (initial load or filter).
struct RangeResult {
    model: FilterModel,
    base: Arc<Vec<LogEntry>>,
    page_cache: Option<Arc<Vec<LogEntry>>>,
    groups: Vec<LogGroup>,
    all_flags: Vec<String>,
    all_modules: Vec<String>,
}

enum WorkerResult {
    Loaded {
        request: RequestId,
        all_logs: Arc<Vec<LogEntry>>,
        result: RangeResult,
    },
    Filtered {
        request: RequestId,
        result: RangeResult,
    },
    Searched {
        request: RequestId,
        keyword: String,
        groups: Vec<LogGroup>,
    },
}

/// Everything a background pass needs to turn a time range into base logs.
#[derive(Clone)]
struct RangeInputs {
    all_logs: Arc<Vec<LogEntry>>,
    page_cache: Option<Arc<Vec<LogEntry>>>,
    source: Arc<dyn LogSource>,
    page_provider: Option<Arc<dyn CurrentPageProvider>>,
    recency: usize,
    default_markers: bool,
}

// =============================================================================
// LogViewerSession
// =============================================================================

/// One viewing session over the host's logs.
pub struct LogViewerSession {
    config: ViewerConfig,
    source: Arc<dyn LogSource>,
    page_provider: Option<Arc<dyn CurrentPageProvider>>,
    formatter: DetailsFormatter,
    throttler: Throttler,

    result_tx: mpsc::Sender<WorkerResult>,
    result_rx: mpsc::Receiver<WorkerResult>,
    next_request: RequestId,

    state: SessionState,
    all_logs: Arc<Vec<LogEntry>>,
    page_cache: Option<Arc<Vec<LogEntry>>>,
    base_logs: Arc<Vec<LogEntry>>,
    filtered_groups: Vec<LogGroup>,

    show_logs: Vec<LogGroup>,
    filter_model: FilterModel,
    all_flags: Vec<String>,
    all_modules: Vec<String>,
    keyword: String,
}

impl LogViewerSession {
    /// Create an idle session. `page_provider` is the host's current-page hook;
    /// without one, "current page" falls back to all logs.
    pub fn new(
        config: ViewerConfig,
        source: Arc<dyn LogSource>,
        page_provider: Option<Arc<dyn CurrentPageProvider>>,
    ) -> Self {
        let (result_tx, result_rx) = mpsc::channel();
        let filter_model = FilterModel::new(config.default_sort, config.default_time_range);

        Self {
            formatter: config.details_formatter(),
            throttler: Throttler::new(config.search_throttle),
            config,
            source,
            page_provider,
            result_tx,
            result_rx,
            next_request: 0,
            state: SessionState::Idle,
            all_logs: Arc::new(Vec::new()),
            page_cache: None,
            base_logs: Arc::new(Vec::new()),
            filtered_groups: Vec::new(),
            show_logs: Vec::new(),
            filter_model,
            all_flags: Vec::new(),
            all_modules: Vec::new(),
            keyword: String::new(),
        }
    }

    // -------------------------------------------------------------------------
    // Accessors
    // -------------------------------------------------------------------------

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn config(&self) -> &ViewerConfig {
        &self.config
    }

    /// Groups currently on display.
    pub fn show_logs(&self) -> &[LogGroup] {
        &self.show_logs
    }

    /// Active filter. Filter screens start from a clone of this.
    pub fn filter_model(&self) -> &FilterModel {
        &self.filter_model
    }

    /// Flags offered by the filter screen, led by `"ALL"`.
    pub fn all_flags(&self) -> &[String] {
        &self.all_flags
    }

    /// Modules offered by the filter screen, led by `"ALL"`.
    pub fn all_modules(&self) -> &[String] {
        &self.all_modules
    }

    /// Keyword of the search currently on display; empty when none.
    pub fn keyword(&self) -> &str {
        &self.keyword
    }

    // -------------------------------------------------------------------------
    // Operations
    // -------------------------------------------------------------------------

    /// Read the host's logs once and build the initial display.
    ///
    /// Completion is reported as `SessionEvent::Loaded`.
    pub fn process_logs(&mut self) -> Result<RequestId, SessionError> {
        if self.state == SessionState::Loading {
            return Err(SessionError::Busy);
        }
        self.state = SessionState::Loading;
        let request = self.next_request();

        let tx = self.result_tx.clone();
        let source = Arc::clone(&self.source);
        let page_provider = self.page_provider.clone();
        let model = self.filter_model.clone();
        let recency = self.config.page_recency_window;
        let default_markers = self.config.use_lifecycle_markers;

        std::thread::spawn(move || {
            let all_logs = Arc::new(source.logs());
            tracing::debug!(request, logs = all_logs.len(), "Logs read from source");

            let inputs = RangeInputs {
                all_logs: Arc::clone(&all_logs),
                page_cache: None,
                source,
                page_provider,
                recency,
                default_markers,
            };
            let result = run_range_pass(&inputs, model);

            // Receiver dropped (session gone); exit quietly.
            let _ = tx.send(WorkerResult::Loaded {
                request,
                all_logs,
                result,
            });
        });

        tracing::info!(request, "Processing logs");
        Ok(request)
    }

    /// Apply a new filter model. Completion is reported as
    /// `SessionEvent::Filtered`; the model becomes active at that point.
    pub fn filter(&mut self, model: FilterModel) -> Result<RequestId, SessionError> {
        self.require_ready()?;
        let request = self.next_request();

        let tx = self.result_tx.clone();
        let inputs = self.range_inputs();

        std::thread::spawn(move || {
            let result = run_range_pass(&inputs, model);
            let _ = tx.send(WorkerResult::Filtered { request, result });
        });

        tracing::debug!(request, "Filter submitted");
        Ok(request)
    }

    /// Search messages in the current time range, ignoring flag and module
    /// selections. Completion is reported as `SessionEvent::Searched`.
    ///
    /// An empty keyword restores the last filtered display without scanning.
    /// Below the synchronous threshold the scan runs inline; above it the
    /// scan is throttled and may be superseded by a later search.
    pub fn search(&mut self, keyword: &str) -> Result<RequestId, SessionError> {
        self.require_ready()?;
        let request = self.next_request();
        let keyword = keyword.to_string();

        if keyword.is_empty() {
            let _ = self.result_tx.send(WorkerResult::Searched {
                request,
                keyword,
                groups: self.filtered_groups.clone(),
            });
            return Ok(request);
        }

        let logs = Arc::clone(&self.base_logs);
        let sort = self.filter_model.sort;

        if logs.len() < self.config.sync_search_threshold {
            let groups = filter::search(&logs, &keyword, sort);
            let _ = self.result_tx.send(WorkerResult::Searched {
                request,
                keyword,
                groups,
            });
            return Ok(request);
        }

        tracing::trace!(
            request,
            logs = logs.len(),
            keyword = logging::preview(&keyword),
            delay_ms = self.throttler.interval().as_millis() as u64,
            "Search throttled"
        );
        let tx = self.result_tx.clone();
        self.throttler.execute(move || {
            let groups = filter::search(&logs, &keyword, sort);
            let _ = tx.send(WorkerResult::Searched {
                request,
                keyword,
                groups,
            });
        });
        Ok(request)
    }

    /// Details projection for one entry.
    pub fn details(&self, entry: &LogEntry) -> Vec<DetailsSection> {
        self.formatter.build(entry)
    }

    /// Share text for one entry.
    pub fn shared_representation(&self, entry: &LogEntry) -> String {
        details::shared_representation(entry)
    }

    /// Export the displayed groups as CSV.
    pub fn export_csv<W: Write>(&self, writer: W, path: &Path) -> error::Result<usize> {
        self.require_ready()?;
        Ok(export::export_csv(&self.show_logs, &self.formatter, writer, path)?)
    }

    /// Export the displayed groups as JSON.
    pub fn export_json<W: Write>(&self, writer: W, path: &Path) -> error::Result<usize> {
        self.require_ready()?;
        Ok(export::export_json(&self.show_logs, writer, path)?)
    }

    // -------------------------------------------------------------------------
    // Event delivery (home thread)
    // -------------------------------------------------------------------------

    /// Apply every finished result and return the matching events, in
    /// completion order. Never blocks.
    pub fn poll_events(&mut self) -> Vec<SessionEvent> {
        let mut events = Vec::new();
        while let Ok(result) = self.result_rx.try_recv() {
            events.push(self.apply(result));
        }
        events
    }

    /// Block up to `timeout` for the next finished result and apply it.
    pub fn wait_event(&mut self, timeout: Duration) -> Option<SessionEvent> {
        match self.result_rx.recv_timeout(timeout) {
            Ok(result) => Some(self.apply(result)),
            Err(_) => None,
        }
    }

    fn apply(&mut self, result: WorkerResult) -> SessionEvent {
        match result {
            WorkerResult::Loaded {
                request,
                all_logs,
                result,
            } => {
                self.all_logs = all_logs;
                // The old page was resolved against the previous collection.
                self.page_cache = None;
                let groups = self.apply_range_result(result);
                self.state = SessionState::Ready;
                tracing::info!(request, groups, "Session ready");
                SessionEvent::Loaded { request, groups }
            }
            WorkerResult::Filtered { request, result } => {
                let groups = self.apply_range_result(result);
                tracing::debug!(request, groups, "Filter applied");
                SessionEvent::Filtered { request, groups }
            }
            WorkerResult::Searched {
                request,
                keyword,
                groups,
            } => {
                let count = groups.len();
                self.show_logs = groups;
                self.keyword.clone_from(&keyword);
                tracing::debug!(request, groups = count, "Search applied");
                SessionEvent::Searched {
                    request,
                    keyword,
                    groups: count,
                }
            }
        }
    }

    fn apply_range_result(&mut self, result: RangeResult) -> usize {
        let count = result.groups.len();
        self.filter_model = result.model;
        self.base_logs = result.base;
        if result.page_cache.is_some() {
            self.page_cache = result.page_cache;
        }
        self.filtered_groups = result.groups.clone();
        self.show_logs = result.groups;
        self.all_flags = result.all_flags;
        self.all_modules = result.all_modules;
        self.keyword.clear();
        count
    }

    // -------------------------------------------------------------------------
    // Helpers
    // -------------------------------------------------------------------------

    fn next_request(&mut self) -> RequestId {
        self.next_request += 1;
        self.next_request
    }

    fn require_ready(&self) -> Result<(), SessionError> {
        if self.state == SessionState::Ready {
            Ok(())
        } else {
            Err(SessionError::NotReady {
                state: self.state.label(),
            })
        }
    }

    fn range_inputs(&self) -> RangeInputs {
        RangeInputs {
            all_logs: Arc::clone(&self.all_logs),
            page_cache: self.page_cache.clone(),
            source: Arc::clone(&self.source),
            page_provider: self.page_provider.clone(),
            recency: self.config.page_recency_window,
            default_markers: self.config.use_lifecycle_markers,
        }
    }
}

// =============================================================================
// Background passes
// =============================================================================

/// Resolve the time range, rebuild the vocabularies, prune the model against
/// them, then filter, group and order.
fn run_range_pass(inputs: &RangeInputs, mut model: FilterModel) -> RangeResult {
    let (base, page_cache) = logs_for_range(inputs, model.time_range);

    let (all_flags, all_modules) = filter::vocabulary(&base);
    model.retain_known(&all_flags, &all_modules);
    let groups = filter::apply_filter_model(&base, &model);

    tracing::debug!(
        base = base.len(),
        groups = groups.len(),
        sort = model.sort.label(),
        "Range pass complete"
    );

    RangeResult {
        model,
        base,
        page_cache,
        groups,
        all_flags,
        all_modules,
    }
}

/// Base logs for `range`. For the current page, also returns the value to
/// cache so the page is resolved only once per session.
fn logs_for_range(
    inputs: &RangeInputs,
    range: TimeRange,
) -> (Arc<Vec<LogEntry>>, Option<Arc<Vec<LogEntry>>>) {
    match range {
        TimeRange::SinceLaunch => (Arc::clone(&inputs.all_logs), None),
        TimeRange::SpecificDate(date) => match inputs.source.read_logs_from_disk(date) {
            Some(logs) => (Arc::new(logs), None),
            None => {
                tracing::warn!(%date, "No archived logs for date");
                (Arc::new(Vec::new()), None)
            }
        },
        TimeRange::CurrentPage => {
            if let Some(cached) = &inputs.page_cache {
                return (Arc::clone(cached), None);
            }
            let resolved = Arc::new(resolve_current_page(inputs));
            (Arc::clone(&resolved), Some(resolved))
        }
    }
}

/// Current page logs, or every log when the host cannot name the page.
fn resolve_current_page(inputs: &RangeInputs) -> Vec<LogEntry> {
    let Some(provider) = &inputs.page_provider else {
        tracing::warn!("No current page hook provided; showing all logs");
        return inputs.all_logs.to_vec();
    };
    let Some(current) = provider.current_page() else {
        tracing::warn!("Current page file could not be resolved; showing all logs");
        return inputs.all_logs.to_vec();
    };

    let markers = current.use_lifecycle_markers || inputs.default_markers;
    let logs = page::current_page_logs(&inputs.all_logs, &current.file, markers, inputs.recency);
    tracing::debug!(
        file = %current.file,
        markers,
        logs = logs.len(),
        "Current page resolved"
    );
    logs
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::source::{CurrentPage, MemoryLogSource};
    use crate::core::model::SortOrder;
    use crate::util::error::{ColaCupError, ExportError};
    use parking_lot::Mutex;

    /// Source whose history the test can replace between loads.
    #[derive(Default)]
    struct GrowingSource {
        logs: Mutex<Vec<LogEntry>>,
    }

    impl LogSource for GrowingSource {
        fn logs(&self) -> Vec<LogEntry> {
            self.logs.lock().clone()
        }

        fn read_logs_from_disk(&self, _date: chrono::NaiveDate) -> Option<Vec<LogEntry>> {
            None
        }
    }

    struct FailingWriter;

    impl Write for FailingWriter {
        fn write(&mut self, _buf: &[u8]) -> std::io::Result<usize> {
            Err(std::io::Error::new(std::io::ErrorKind::BrokenPipe, "closed"))
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Err(std::io::Error::new(std::io::ErrorKind::BrokenPipe, "closed"))
        }
    }

    const WAIT: Duration = Duration::from_secs(5);

    fn make_entry(timestamp: f64, flag: &str, module: &str, file: &str, message: &str) -> LogEntry {
        LogEntry {
            timestamp,
            flag: flag.to_string(),
            module: module.to_string(),
            file: file.to_string(),
            function: "f()".to_string(),
            line: 1,
            message: message.to_string(),
            identifier: None,
        }
    }

    fn since_launch_config() -> ViewerConfig {
        ViewerConfig {
            default_time_range: TimeRange::SinceLaunch,
            ..ViewerConfig::default()
        }
    }

    fn ready_session(logs: Vec<LogEntry>, config: ViewerConfig) -> LogViewerSession {
        let mut session =
            LogViewerSession::new(config, Arc::new(MemoryLogSource::new(logs)), None);
        session.process_logs().unwrap();
        let event = session.wait_event(WAIT).expect("load event");
        assert!(matches!(event, SessionEvent::Loaded { .. }));
        session
    }

    #[test]
    fn test_operations_require_ready() {
        let mut session = LogViewerSession::new(
            ViewerConfig::default(),
            Arc::new(MemoryLogSource::default()),
            None,
        );
        assert_eq!(
            session.search("x"),
            Err(SessionError::NotReady { state: "idle" })
        );
        session.process_logs().unwrap();
        assert_eq!(session.process_logs(), Err(SessionError::Busy));
        assert!(matches!(
            session.filter(FilterModel::default()),
            Err(SessionError::NotReady { state: "loading" })
        ));
    }

    #[test]
    fn test_load_builds_groups_and_vocabulary() {
        let logs = vec![
            make_entry(1.0, "DEBUG", "UI", "A.swift", "one"),
            make_entry(2.0, "ERROR", "Net", "B.swift", "two"),
        ];
        let session = ready_session(logs, since_launch_config());

        assert_eq!(session.state(), SessionState::Ready);
        assert_eq!(session.show_logs().len(), 2);
        // Descending by default.
        assert_eq!(session.show_logs()[0][0].message, "two");
        assert_eq!(session.all_flags(), ["ALL", "DEBUG", "ERROR"]);
        assert_eq!(session.all_modules(), ["ALL", "Net", "UI"]);
    }

    #[test]
    fn test_filter_updates_model_on_delivery() {
        let logs = vec![
            make_entry(1.0, "DEBUG", "UI", "A.swift", "one"),
            make_entry(2.0, "ERROR", "Net", "B.swift", "two"),
            make_entry(3.0, "ERROR", "UI", "B.swift", "three"),
        ];
        let mut session = ready_session(logs, since_launch_config());

        let mut model = session.filter_model().clone();
        model.update_selected_flag("ERROR", true);
        model.update_sort(SortOrder::Ascending);
        let request = session.filter(model.clone()).unwrap();

        // Not applied until delivered.
        assert!(session.filter_model().is_unconstrained());

        let event = session.wait_event(WAIT).unwrap();
        assert_eq!(event, SessionEvent::Filtered { request, groups: 2 });
        assert_eq!(session.filter_model(), &model);
        let messages: Vec<_> = session
            .show_logs()
            .iter()
            .map(|g| g[0].message.as_str())
            .collect();
        assert_eq!(messages, vec!["two", "three"]);
    }

    #[test]
    fn test_small_search_and_empty_keyword_restore() {
        let logs = vec![
            make_entry(1.0, "DEBUG", "UI", "A.swift", "token refreshed"),
            make_entry(2.0, "DEBUG", "UI", "A.swift", "other"),
        ];
        let mut session = ready_session(logs, since_launch_config());

        let request = session.search("token").unwrap();
        let events = session.poll_events();
        assert_eq!(
            events,
            vec![SessionEvent::Searched {
                request,
                keyword: "token".to_string(),
                groups: 1
            }]
        );
        assert_eq!(session.keyword(), "token");

        session.search("").unwrap();
        session.poll_events();
        assert_eq!(session.show_logs().len(), 2);
        assert_eq!(session.keyword(), "");
    }

    #[test]
    fn test_missing_page_hook_shows_all_logs() {
        let logs = vec![
            make_entry(1.0, "DEBUG", "UI", "A.swift", "one"),
            make_entry(2.0, "DEBUG", "UI", "B.swift", "two"),
        ];
        let session = ready_session(logs, ViewerConfig::default());
        assert_eq!(session.filter_model().time_range, TimeRange::CurrentPage);
        assert_eq!(session.show_logs().len(), 2);
    }

    #[test]
    fn test_current_page_is_resolved_through_hook() {
        let logs = vec![
            make_entry(1.0, "DEBUG", "UI", "Home.swift", "home"),
            make_entry(2.0, "DEBUG", "UI", "/src/Detail.swift", "detail 1"),
            make_entry(3.0, "DEBUG", "UI", "/src/Detail.swift", "detail 2"),
        ];
        let hook = CurrentPage {
            file: "Detail.swift".to_string(),
            use_lifecycle_markers: false,
        };
        let mut session = LogViewerSession::new(
            ViewerConfig::default(),
            Arc::new(MemoryLogSource::new(logs)),
            Some(Arc::new(hook)),
        );
        session.process_logs().unwrap();
        session.wait_event(WAIT).unwrap();

        let messages: Vec<_> = session
            .show_logs()
            .iter()
            .map(|g| g[0].message.as_str())
            .collect();
        assert_eq!(messages, vec!["detail 2", "detail 1"]);
        assert_eq!(session.all_flags(), ["ALL", "DEBUG"]);
    }

    #[test]
    fn test_missing_archive_yields_empty_display() {
        let logs = vec![make_entry(1.0, "DEBUG", "UI", "A.swift", "one")];
        let mut session = ready_session(logs, since_launch_config());

        let mut model = session.filter_model().clone();
        let date = chrono::NaiveDate::from_ymd_opt(2024, 1, 2).unwrap();
        model.update_time_range(TimeRange::SpecificDate(date));
        session.filter(model).unwrap();
        session.wait_event(WAIT).unwrap();

        assert!(session.show_logs().is_empty());
        assert_eq!(session.all_flags(), ["ALL"]);
    }

    #[test]
    fn test_reload_while_ready_refreshes_logs() {
        let source = Arc::new(GrowingSource::default());
        *source.logs.lock() = vec![make_entry(1.0, "DEBUG", "UI", "A.swift", "first")];
        let mut session = LogViewerSession::new(
            since_launch_config(),
            Arc::clone(&source) as Arc<dyn LogSource>,
            None,
        );
        session.process_logs().unwrap();
        session.wait_event(WAIT).unwrap();

        source
            .logs
            .lock()
            .push(make_entry(2.0, "ERROR", "Net", "B.swift", "second"));
        let request = session.process_logs().unwrap();
        assert_eq!(session.state(), SessionState::Loading);
        assert_eq!(
            session.wait_event(WAIT),
            Some(SessionEvent::Loaded { request, groups: 2 })
        );
        assert_eq!(session.state(), SessionState::Ready);
        assert_eq!(session.all_flags(), ["ALL", "DEBUG", "ERROR"]);
    }

    #[test]
    fn test_reload_discards_cached_current_page() {
        let source = Arc::new(GrowingSource::default());
        *source.logs.lock() = vec![
            make_entry(1.0, "DEBUG", "UI", "Home.swift", "home"),
            make_entry(2.0, "DEBUG", "UI", "Page.swift", "old page"),
        ];
        let hook = CurrentPage {
            file: "Page.swift".to_string(),
            use_lifecycle_markers: false,
        };
        let mut session = LogViewerSession::new(
            ViewerConfig::default(),
            Arc::clone(&source) as Arc<dyn LogSource>,
            Some(Arc::new(hook)),
        );
        session.process_logs().unwrap();
        session.wait_event(WAIT).unwrap();
        assert_eq!(session.show_logs()[0][0].message, "old page");

        // Leave the current page, then reload a longer history.
        let mut model = session.filter_model().clone();
        model.update_time_range(TimeRange::SinceLaunch);
        session.filter(model).unwrap();
        session.wait_event(WAIT).unwrap();

        source.logs.lock().extend([
            make_entry(5.0, "DEBUG", "UI", "Home.swift", "home again"),
            make_entry(6.0, "DEBUG", "UI", "Page.swift", "new page"),
        ]);
        session.process_logs().unwrap();
        session.wait_event(WAIT).unwrap();

        let mut model = session.filter_model().clone();
        model.update_time_range(TimeRange::CurrentPage);
        session.filter(model).unwrap();
        session.wait_event(WAIT).unwrap();

        let messages: Vec<_> = session
            .show_logs()
            .iter()
            .map(|g| g[0].message.as_str())
            .collect();
        assert_eq!(messages, vec!["new page"]);
    }

    #[test]
    fn test_export_errors_surface_as_top_level_error() {
        let idle = LogViewerSession::new(
            ViewerConfig::default(),
            Arc::new(MemoryLogSource::default()),
            None,
        );
        assert!(matches!(
            idle.export_csv(Vec::<u8>::new(), Path::new("out.csv")),
            Err(ColaCupError::Session(SessionError::NotReady { .. }))
        ));

        let logs = vec![make_entry(1.0, "DEBUG", "UI", "A.swift", "one")];
        let session = ready_session(logs, since_launch_config());
        let err = session
            .export_csv(FailingWriter, Path::new("out.csv"))
            .unwrap_err();
        assert!(matches!(
            err,
            ColaCupError::Export(ExportError::Csv { .. } | ExportError::Io { .. })
        ));
        assert!(err.to_string().contains("out.csv"));
    }
}
