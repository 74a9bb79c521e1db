use anyhow::Result;
use futures::StreamExt;
use serde::Serialize;
use std::time::Duration;
use store::LiveQuery;
use tracing::{info, warn};

use super::print_json;
use crate::cli::WatchTarget;
use crate::config::{AppConfig, AppState};

/// Writes made by other invocations reach the stream through the store's
/// `data_version` poller.
pub async fn watch(state: &AppState, config: &AppConfig, target: WatchTarget) -> Result<()> {
    let poller = state
        .store
        .follow_external_writes(Duration::from_millis(config.watch_interval_ms.max(1)));
    let outcome = match target {
        WatchTarget::Courses { student_id } => {
            follow(state.enrollments.enrolled_courses(student_id)).await
        }
        WatchTarget::Grades { student_id } => follow(state.grades.final_grade(student_id)).await,
    };
    poller.abort();
    outcome
}

/// Prints every emission until Ctrl-C or the end of the stream.
async fn follow<T: Serialize>(mut live: LiveQuery<T>) -> Result<()> {
    info!("Watching, press Ctrl-C to stop");
    loop {
        tokio::select! {
            item = live.next() => match item {
                Some(Ok(value)) => print_json(&value)?,
                Some(Err(e)) => warn!(error = %e, "Live query read failed"),
                None => break,
            },
            _ = tokio::signal::ctrl_c() => {
                info!("Stopped watching");
                break;
            }
        }
    }
    Ok(())
}
