use crate::app::{TestRunDetail, TestRunSummary};
use color_eyre::eyre::Result;

pub fn parse_summary(json: &str) -> Result<Vec<TestRunSummary>> {
    let runs: Vec<TestRunSummary> = serde_json::from_str(json)?;
    Ok(runs)
}

pub fn parse_detail(json: &str) -> Result<TestRunDetail> {
    let detail: TestRunDetail = serde_json::from_str(json)?;
    Ok(detail)
}
