use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::time::Instant;

use crate::announcer::Announcer;

// Pagination: one page per increment, hard cap per session
pub const PAGE_SIZE: usize = 5;
pub const MAX_RUNS: usize = 30;

// UI constants
pub const SPINNER_FRAME_COUNT: usize = 8;
pub const QUICK_SELECT_MAX: usize = 9;
pub const NARROW_WIDTH_THRESHOLD: u16 = 60;
pub const ERROR_TTL_SECS: u64 = 10;

/// Fixed user-visible text for a failed detail fetch; the underlying cause
/// goes to the debug log instead.
pub const DETAIL_ERROR_MESSAGE: &str = "Failed to load test run details. Please try again.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RunStatus {
    Completed,
    Passed,
    Failed,
    #[serde(other)]
    #[default]
    Unknown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TestStatus {
    Passed,
    Failed,
    Skipped,
    Blocked,
    #[serde(other)]
    Unknown,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, serde::Deserialize)]
pub struct RunCounts {
    pub passed: u32,
    pub failed: u32,
    #[serde(default)]
    pub skipped: u32,
    #[serde(default)]
    pub blocked: u32,
}

#[derive(Debug, Clone, PartialEq, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TestRunSummary {
    #[serde(rename = "_id")]
    pub id: String,
    pub project: String,
    pub status: RunStatus,
    #[serde(default)]
    pub start_time: Option<DateTime<Utc>>,
    #[serde(default)]
    pub end_time: Option<DateTime<Utc>>,
    pub results: RunCounts,
}

#[derive(Debug, Clone, PartialEq, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TestCase {
    #[serde(default)]
    pub suite: String,
    pub title: String,
    pub status: TestStatus,
    #[serde(default)]
    pub browser: String,
    #[serde(default)]
    pub duration: u64,
    #[serde(default)]
    pub error: Option<String>,
}

#[derive(Debug, Clone, PartialEq, serde::Deserialize)]
pub struct SuiteResult {
    pub name: String,
    #[serde(default)]
    pub tests: Vec<TestCase>,
}

/// Result payload of a detail record. The per-test breakdown arrives either
/// as a flat `tests` sequence, grouped `suites`, both, or neither.
#[derive(Debug, Clone, Default, PartialEq, serde::Deserialize)]
pub struct DetailResults {
    #[serde(default)]
    pub passed: u32,
    #[serde(default)]
    pub failed: u32,
    #[serde(default)]
    pub skipped: u32,
    #[serde(default)]
    pub blocked: u32,
    #[serde(default)]
    pub tests: Vec<TestCase>,
    #[serde(default)]
    pub suites: Vec<SuiteResult>,
}

impl DetailResults {
    /// Whole-percentage success rate over passed + failed. None when the
    /// denominator is zero.
    pub fn success_rate(&self) -> Option<u32> {
        let total = self.passed + self.failed;
        if total == 0 {
            return None;
        }
        Some((f64::from(self.passed) / f64::from(total) * 100.0).round() as u32)
    }
}

/// Full per-test breakdown for one run. The detail endpoint may return a
/// partial record, so every field tolerates absence.
#[derive(Debug, Clone, PartialEq, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TestRunDetail {
    #[serde(rename = "_id", default)]
    pub id: String,
    #[serde(default)]
    pub project: String,
    #[serde(default)]
    pub status: RunStatus,
    #[serde(default)]
    pub start_time: Option<DateTime<Utc>>,
    #[serde(default)]
    pub end_time: Option<DateTime<Utc>>,
    #[serde(default)]
    pub duration: u64,
    #[serde(default)]
    pub results: DetailResults,
}

/// Detail lifecycle for one run id. Absence from the map is the idle state,
/// so an id can never be loading and loaded at the same time.
#[derive(Debug, Clone, PartialEq)]
pub enum DetailState {
    Loading,
    Loaded(TestRunDetail),
    Error(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ItemKind {
    Run,
    DetailLoading,
    DetailError,
    DetailSummary,
    Suite,
    Test,
}

#[derive(Debug, Clone, Copy)]
pub struct ListItem {
    pub kind: ItemKind,
    pub run_idx: usize,
    pub suite_idx: Option<usize>,
    pub test_idx: Option<usize>,
}

pub enum ResolvedItem<'a> {
    Run(&'a TestRunSummary),
    DetailLoading,
    DetailError(&'a str),
    DetailSummary(&'a TestRunDetail),
    Suite(&'a SuiteResult),
    Test(&'a TestCase),
}

/// Immutable configuration set at startup.
pub struct AppConfig {
    pub base_url: String,
}

pub struct AppState {
    pub config: AppConfig,

    // Summary list
    pub runs: Vec<TestRunSummary>,
    pub limit: usize,
    pub initial_loading: bool,
    pub loading_more: bool,
    pub error: Option<(String, Instant)>,

    // Per-run detail state machine, keyed by run id
    pub details: HashMap<String, DetailState>,

    pub announcer: Announcer,

    // Flattened list for navigation and rendering
    pub items: Vec<ListItem>,
    pub cursor: usize,

    // Transient UI
    pub spinner_frame: usize,
    pub should_quit: bool,
}

impl AppState {
    pub fn new(base_url: String) -> Self {
        Self {
            config: AppConfig { base_url },
            runs: Vec::new(),
            limit: PAGE_SIZE,
            initial_loading: false,
            loading_more: false,
            error: None,
            details: HashMap::new(),
            announcer: Announcer::new(),
            items: Vec::new(),
            cursor: 0,
            spinner_frame: 0,
            should_quit: false,
        }
    }

    /// Arm the loading flags for a list fetch at `limit`. The first page
    /// drives the full-screen spinner, later pages the trailing one; the two
    /// flags are mutually exclusive by construction.
    pub fn begin_load(&mut self, limit: usize) {
        self.limit = limit;
        if limit == PAGE_SIZE {
            self.initial_loading = true;
        } else {
            self.loading_more = true;
        }
    }

    pub fn is_loading(&self) -> bool {
        self.initial_loading || self.loading_more
    }

    /// Replace the list wholesale with a fresh response. A reload discards
    /// cached detail; in-flight markers survive so a second toggle stays a
    /// no-op until the outstanding fetch lands.
    pub fn apply_runs(&mut self, runs: Vec<TestRunSummary>) {
        self.runs = runs;
        self.error = None;
        self.details.retain(|_, s| matches!(s, DetailState::Loading));
        self.initial_loading = false;
        self.loading_more = false;
        self.rebuild_items();
    }

    pub fn apply_load_error(&mut self, reason: &str) {
        self.set_error(format!("Failed to load test runs: {reason}"));
        self.initial_loading = false;
        self.loading_more = false;
    }

    /// Whether the server may have more runs: the heuristic is that the last
    /// page came back full and the hard cap is not yet reached.
    pub fn has_more(&self) -> bool {
        self.runs.len() >= self.limit && self.limit < MAX_RUNS
    }

    /// Raise the limit by one page, capped at `MAX_RUNS`. Returns the new
    /// limit when a reload should be issued.
    pub fn request_more(&mut self) -> Option<usize> {
        if !self.has_more() {
            return None;
        }
        self.limit = (self.limit + PAGE_SIZE).min(MAX_RUNS);
        Some(self.limit)
    }

    pub fn run_for_id(&self, id: &str) -> Option<&TestRunSummary> {
        self.runs.iter().find(|r| r.id == id)
    }

    /// Toggle the detail panel for a run: collapse when loaded, ignore while
    /// a fetch is outstanding, otherwise mark loading. Returns the id when a
    /// network call is needed.
    pub fn toggle_details(&mut self, id: &str) -> Option<String> {
        let project = self.run_for_id(id)?.project.clone();
        match self.details.get(id) {
            Some(DetailState::Loaded(_)) => {
                self.details.remove(id);
                self.announcer.announce(format!("Collapsed details for {project}"));
                self.rebuild_items();
                None
            }
            Some(DetailState::Loading) => None,
            Some(DetailState::Error(_)) | None => {
                self.details.insert(id.to_string(), DetailState::Loading);
                self.announcer.announce(format!("Loading details for {project}"));
                self.rebuild_items();
                Some(id.to_string())
            }
        }
    }

    /// Collapse without fetching. A run whose detail is not loaded is left
    /// untouched.
    pub fn collapse_details(&mut self, id: &str) {
        if !matches!(self.details.get(id), Some(DetailState::Loaded(_))) {
            return;
        }
        let project = self
            .run_for_id(id)
            .map(|r| r.project.clone())
            .unwrap_or_default();
        self.details.remove(id);
        self.announcer.announce(format!("Collapsed details for {project}"));
        self.rebuild_items();
    }

    /// Store a finished detail fetch. Results for ids that left the list or
    /// whose slot is no longer loading are discarded.
    pub fn apply_detail(&mut self, id: &str, detail: TestRunDetail) {
        if !matches!(self.details.get(id), Some(DetailState::Loading)) {
            tracing::debug!(id, "discarding detail result for non-loading run");
            return;
        }
        let Some(project) = self.run_for_id(id).map(|r| r.project.clone()) else {
            self.details.remove(id);
            return;
        };
        self.announcer.announce(format!(
            "Loaded details for {project}. {} tests passed, {} tests failed.",
            detail.results.passed, detail.results.failed
        ));
        self.details.insert(id.to_string(), DetailState::Loaded(detail));
        self.rebuild_items();
    }

    /// Record a failed detail fetch for one run id; other runs are untouched.
    pub fn apply_detail_error(&mut self, id: &str) {
        if !matches!(self.details.get(id), Some(DetailState::Loading)) {
            return;
        }
        if self.run_for_id(id).is_none() {
            self.details.remove(id);
            return;
        }
        self.details
            .insert(id.to_string(), DetailState::Error(DETAIL_ERROR_MESSAGE.to_string()));
        self.announcer.announce(DETAIL_ERROR_MESSAGE);
        self.rebuild_items();
    }

    pub fn detail(&self, id: &str) -> Option<&TestRunDetail> {
        match self.details.get(id) {
            Some(DetailState::Loaded(detail)) => Some(detail),
            _ => None,
        }
    }

    pub fn is_detail_loading(&self, id: &str) -> bool {
        matches!(self.details.get(id), Some(DetailState::Loading))
    }

    pub fn rebuild_items(&mut self) {
        let mut items = Vec::new();
        for (run_idx, run) in self.runs.iter().enumerate() {
            items.push(ListItem {
                kind: ItemKind::Run,
                run_idx,
                suite_idx: None,
                test_idx: None,
            });
            match self.details.get(&run.id) {
                Some(DetailState::Loading) => items.push(ListItem {
                    kind: ItemKind::DetailLoading,
                    run_idx,
                    suite_idx: None,
                    test_idx: None,
                }),
                Some(DetailState::Error(_)) => items.push(ListItem {
                    kind: ItemKind::DetailError,
                    run_idx,
                    suite_idx: None,
                    test_idx: None,
                }),
                Some(DetailState::Loaded(detail)) => {
                    items.push(ListItem {
                        kind: ItemKind::DetailSummary,
                        run_idx,
                        suite_idx: None,
                        test_idx: None,
                    });
                    if detail.results.suites.is_empty() {
                        for test_idx in 0..detail.results.tests.len() {
                            items.push(ListItem {
                                kind: ItemKind::Test,
                                run_idx,
                                suite_idx: None,
                                test_idx: Some(test_idx),
                            });
                        }
                    } else {
                        // Grouped shape wins when a record carries both.
                        for (suite_idx, suite) in detail.results.suites.iter().enumerate() {
                            items.push(ListItem {
                                kind: ItemKind::Suite,
                                run_idx,
                                suite_idx: Some(suite_idx),
                                test_idx: None,
                            });
                            for test_idx in 0..suite.tests.len() {
                                items.push(ListItem {
                                    kind: ItemKind::Test,
                                    run_idx,
                                    suite_idx: Some(suite_idx),
                                    test_idx: Some(test_idx),
                                });
                            }
                        }
                    }
                }
                None => {}
            }
        }
        self.items = items;
        if self.cursor >= self.items.len() && !self.items.is_empty() {
            self.cursor = self.items.len() - 1;
        } else if self.items.is_empty() {
            self.cursor = 0;
        }
    }

    pub fn resolve_item(&self, item: &ListItem) -> Option<ResolvedItem<'_>> {
        let run = self.runs.get(item.run_idx)?;
        match item.kind {
            ItemKind::Run => Some(ResolvedItem::Run(run)),
            ItemKind::DetailLoading => Some(ResolvedItem::DetailLoading),
            ItemKind::DetailError => match self.details.get(&run.id) {
                Some(DetailState::Error(message)) => Some(ResolvedItem::DetailError(message)),
                _ => None,
            },
            ItemKind::DetailSummary | ItemKind::Suite | ItemKind::Test => {
                let Some(DetailState::Loaded(detail)) = self.details.get(&run.id) else {
                    return None;
                };
                match item.kind {
                    ItemKind::DetailSummary => Some(ResolvedItem::DetailSummary(detail)),
                    ItemKind::Suite => detail
                        .results
                        .suites
                        .get(item.suite_idx?)
                        .map(ResolvedItem::Suite),
                    _ => {
                        let test = match item.suite_idx {
                            Some(suite_idx) => detail
                                .results
                                .suites
                                .get(suite_idx)?
                                .tests
                                .get(item.test_idx?)?,
                            None => detail.results.tests.get(item.test_idx?)?,
                        };
                        Some(ResolvedItem::Test(test))
                    }
                }
            }
        }
    }

    pub fn selected_run_id(&self) -> Option<&str> {
        let item = self.items.get(self.cursor)?;
        self.runs.get(item.run_idx).map(|r| r.id.as_str())
    }

    pub fn move_cursor_up(&mut self) {
        if self.cursor > 0 {
            self.cursor -= 1;
        }
    }

    pub fn move_cursor_down(&mut self) {
        if !self.items.is_empty() && self.cursor < self.items.len() - 1 {
            self.cursor += 1;
        }
    }

    /// Select the nth visible run (1-indexed).
    pub fn quick_select(&mut self, n: usize) {
        let mut run_count = 0;
        for (i, item) in self.items.iter().enumerate() {
            if item.kind == ItemKind::Run {
                run_count += 1;
                if run_count == n {
                    self.cursor = i;
                    break;
                }
            }
        }
    }

    pub fn advance_spinner(&mut self) {
        self.spinner_frame = (self.spinner_frame + 1) % SPINNER_FRAME_COUNT;
    }

    pub fn set_error(&mut self, msg: String) {
        self.error = Some((msg, Instant::now()));
    }

    pub fn clear_error(&mut self) {
        self.error = None;
    }

    pub fn prune_error(&mut self) {
        if let Some((_, ts)) = &self.error {
            if ts.elapsed().as_secs() >= ERROR_TTL_SECS {
                self.error = None;
            }
        }
    }

    pub fn error_message(&self) -> Option<&str> {
        self.error.as_ref().map(|(msg, _)| msg.as_str())
    }
}
