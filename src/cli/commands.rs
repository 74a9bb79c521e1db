pub mod courses;
pub mod enrollment;
pub mod initdb;
pub mod login;
pub mod register;
pub mod students;
pub mod summary;
pub mod watch;

use anyhow::{Context, Result, anyhow};
use futures::StreamExt;
use serde::Serialize;
use store::LiveQuery;

/// Prints `value` as pretty JSON on stdout.
pub(crate) fn print_json<T: Serialize>(value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value).context("Failed to serialize output")?;
    println!("{}", json);
    Ok(())
}

/// Current snapshot of a live query. The subscription ends here.
pub(crate) async fn snapshot<T>(mut live: LiveQuery<T>) -> Result<T> {
    match live.next().await {
        Some(result) => Ok(result?),
        None => Err(anyhow!("Live query ended before its first result")),
    }
}
