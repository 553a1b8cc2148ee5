#![allow(dead_code)]

use chrono::{TimeZone, Utc};
use trw::app::{
    AppState, DetailResults, RunCounts, RunStatus, SuiteResult, TestCase, TestRunDetail,
    TestRunSummary, TestStatus,
};

pub fn summary_with_id(id: &str, project: &str) -> TestRunSummary {
    TestRunSummary {
        id: id.to_string(),
        project: project.to_string(),
        status: RunStatus::Passed,
        start_time: Some(Utc.with_ymd_and_hms(2025, 7, 1, 10, 0, 0).unwrap()),
        end_time: Some(Utc.with_ymd_and_hms(2025, 7, 1, 10, 4, 30).unwrap()),
        results: RunCounts {
            passed: 10,
            failed: 0,
            skipped: 0,
            blocked: 0,
        },
    }
}

pub fn failed_summary(id: &str, project: &str) -> TestRunSummary {
    let mut run = summary_with_id(id, project);
    run.status = RunStatus::Failed;
    run.results = RunCounts {
        passed: 6,
        failed: 4,
        skipped: 1,
        blocked: 0,
    };
    run
}

pub fn detail_with_counts(passed: u32, failed: u32) -> TestRunDetail {
    TestRunDetail {
        id: String::new(),
        project: String::new(),
        status: RunStatus::Unknown,
        start_time: None,
        end_time: None,
        duration: 4000,
        results: DetailResults {
            passed,
            failed,
            ..DetailResults::default()
        },
    }
}

pub fn test_case(suite: &str, title: &str, status: TestStatus) -> TestCase {
    TestCase {
        suite: suite.to_string(),
        title: title.to_string(),
        status,
        browser: "chromium".to_string(),
        duration: 1200,
        error: None,
    }
}

pub fn detail_with_suites() -> TestRunDetail {
    let mut detail = detail_with_counts(2, 1);
    detail.results.suites = vec![
        SuiteResult {
            name: "auth".to_string(),
            tests: vec![
                test_case("auth", "logs in", TestStatus::Passed),
                test_case("auth", "rejects bad password", TestStatus::Failed),
            ],
        },
        SuiteResult {
            name: "billing".to_string(),
            tests: vec![test_case("billing", "creates invoice", TestStatus::Passed)],
        },
    ];
    detail
}

pub fn make_state_with_runs(runs: Vec<TestRunSummary>) -> AppState {
    let mut state = AppState::new("http://localhost:3000/api".to_string());
    state.runs = runs;
    state.rebuild_items();
    state
}
