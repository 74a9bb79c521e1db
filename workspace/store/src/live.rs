//! Change notification and live queries.
//!
//! Every successful write publishes a [`TableChange`] on the [`ChangeHub`].
//! A live query subscribes to the hub, delivers its initial snapshot and then
//! re-runs its whole projection each time one of its watched tables changes.
//! There is no diffing: each emission is a fresh read.

use async_stream::stream;
use futures::stream::BoxStream;
use std::future::Future;
use tokio::sync::broadcast::{self, error::RecvError};
use tracing::{debug, trace, warn};

use crate::error::Result;

/// A push-based query result. The first item is the current snapshot; later
/// items follow writes to the watched tables. Dropping the stream unsubscribes.
pub type LiveQuery<T> = BoxStream<'static, Result<T>>;

/// The tables a live query can watch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Table {
    Students,
    Teachers,
    Courses,
    Enrollments,
}

impl Table {
    pub const ALL: [Table; 4] = [
        Table::Students,
        Table::Teachers,
        Table::Courses,
        Table::Enrollments,
    ];
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeKind {
    Upserted,
    Deleted,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TableChange {
    pub table: Table,
    pub kind: ChangeKind,
}

/// Broadcasts table changes to every live query.
///
/// Cloning is cheap and every clone publishes on the same channel.
#[derive(Debug, Clone)]
pub struct ChangeHub {
    sender: broadcast::Sender<TableChange>,
}

impl ChangeHub {
    /// Creates a hub whose subscribers may fall `capacity` events behind
    /// before they are resynchronised.
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity.max(1));
        Self { sender }
    }

    /// Publishes a change. Called right after the write has committed.
    pub fn notify(&self, table: Table, kind: ChangeKind) {
        let change = TableChange { table, kind };
        // An error only means nobody is listening right now.
        match self.sender.send(change) {
            Ok(receivers) => trace!(?change, receivers, "Published table change"),
            Err(_) => trace!(?change, "Table change published with no live queries"),
        }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<TableChange> {
        self.sender.subscribe()
    }

    /// Number of live queries currently subscribed.
    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }

    /// Builds a live query over `tables`.
    ///
    /// The subscription is taken before the initial read so a write landing
    /// between the two is never missed. A failed read is delivered as an
    /// `Err` item and the query keeps listening.
    pub fn live<T, F, Fut>(&self, tables: &[Table], query: F) -> LiveQuery<T>
    where
        T: Send + 'static,
        F: Fn() -> Fut + Send + 'static,
        Fut: Future<Output = Result<T>> + Send + 'static,
    {
        let mut receiver = self.sender.subscribe();
        let watched = tables.to_vec();
        debug!(?watched, "Opening live query");

        Box::pin(stream! {
            yield query().await;

            loop {
                match receiver.recv().await {
                    Ok(change) if watched.contains(&change.table) => {
                        trace!(?change, "Live query refreshing");
                        yield query().await;
                    }
                    Ok(_) => continue,
                    Err(RecvError::Lagged(skipped)) => {
                        warn!(skipped, ?watched, "Live query lagged behind, resynchronising");
                        yield query().await;
                    }
                    Err(RecvError::Closed) => break,
                }
            }
        })
    }
}

impl Default for ChangeHub {
    fn default() -> Self {
        Self::new(64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::StreamExt;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    fn counting_query(hub: &ChangeHub, tables: &[Table]) -> (LiveQuery<usize>, Arc<AtomicUsize>) {
        let reads = Arc::new(AtomicUsize::new(0));
        let counter = reads.clone();
        let query = hub.live(tables, move || {
            let counter = counter.clone();
            async move { Ok(counter.fetch_add(1, Ordering::SeqCst) + 1) }
        });
        (query, reads)
    }

    #[tokio::test]
    async fn test_initial_snapshot_then_refresh_on_watched_table() {
        let hub = ChangeHub::new(8);
        let (mut query, _) = counting_query(&hub, &[Table::Courses]);

        assert_eq!(query.next().await.unwrap().unwrap(), 1);

        hub.notify(Table::Courses, ChangeKind::Upserted);
        assert_eq!(query.next().await.unwrap().unwrap(), 2);
    }

    #[tokio::test]
    async fn test_unwatched_tables_are_ignored() {
        let hub = ChangeHub::new(8);
        let (mut query, reads) = counting_query(&hub, &[Table::Courses, Table::Enrollments]);
        query.next().await.unwrap().unwrap();

        hub.notify(Table::Students, ChangeKind::Upserted);
        hub.notify(Table::Teachers, ChangeKind::Deleted);
        hub.notify(Table::Enrollments, ChangeKind::Deleted);

        assert_eq!(query.next().await.unwrap().unwrap(), 2);
        let extra = tokio::time::timeout(Duration::from_millis(50), query.next()).await;
        assert!(extra.is_err(), "no emission expected for unwatched tables");
        assert_eq!(reads.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_lagging_subscriber_resynchronises_once() {
        let hub = ChangeHub::new(2);
        let (mut query, _) = counting_query(&hub, &[Table::Courses]);
        query.next().await.unwrap().unwrap();

        for _ in 0..5 {
            hub.notify(Table::Courses, ChangeKind::Upserted);
        }

        // One resync for the overflow, then the two events still buffered.
        for expected in 2..=4 {
            assert_eq!(query.next().await.unwrap().unwrap(), expected);
        }
        let extra = tokio::time::timeout(Duration::from_millis(50), query.next()).await;
        assert!(extra.is_err());
    }

    #[tokio::test]
    async fn test_dropping_query_unsubscribes() {
        let hub = ChangeHub::new(8);
        let (query, _) = counting_query(&hub, &[Table::Students]);
        assert_eq!(hub.subscriber_count(), 1);

        drop(query);
        assert_eq!(hub.subscriber_count(), 0);
    }
}
