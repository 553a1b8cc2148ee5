use crate::api::client::ApiClient;
use crate::api::parser;
use crate::events::AppEvent;
use tokio::sync::mpsc;

/// Fetch one page of run summaries and report the outcome to the event loop.
pub async fn fetch_runs(client: ApiClient, limit: usize, tx: mpsc::UnboundedSender<AppEvent>) {
    match client.fetch_summary(limit).await {
        Ok(json) => match parser::parse_summary(&json) {
            Ok(runs) => {
                let _ = tx.send(AppEvent::RunsResult(runs));
            }
            Err(e) => {
                let _ = tx.send(AppEvent::RunsError(format!("{e}")));
            }
        },
        Err(e) => {
            let _ = tx.send(AppEvent::RunsError(format!("{e}")));
        }
    }
}

/// Fetch the detail record for one run. The user-visible failure text is
/// fixed, so only the run id travels back on the error path; the cause is
/// logged here.
pub async fn fetch_detail_for_run(
    client: ApiClient,
    run_id: String,
    tx: mpsc::UnboundedSender<AppEvent>,
) {
    match client.fetch_detail(&run_id).await {
        Ok(json) => match parser::parse_detail(&json) {
            Ok(detail) => {
                let _ = tx.send(AppEvent::DetailResult { run_id, detail });
            }
            Err(e) => {
                tracing::warn!(%run_id, error = %e, "detail parse failed");
                let _ = tx.send(AppEvent::DetailError { run_id });
            }
        },
        Err(e) => {
            tracing::warn!(%run_id, error = %e, "detail fetch failed");
            let _ = tx.send(AppEvent::DetailError { run_id });
        }
    }
}
