//! In-memory mirror of the remote catalog.
//!
//! The store holds the latest product list as an immutable snapshot behind a
//! [`watch`] channel. A refresh replaces the whole snapshot at once, so a
//! reader sees either the old list or the new one.

use std::sync::Arc;
use std::time::Duration;

use queens_beauty_core::{CatalogChange, CatalogGateway, GatewayError, Product, ProductId};
use tokio::sync::{broadcast, watch};
use tokio::task::JoinHandle;
use tokio::time::{Instant, Interval, MissedTickBehavior, interval_at};
use tracing::instrument;

/// How many products the category grid shows.
pub const FEATURED_LIMIT: usize = 12;

/// A catalog snapshot.
pub type Snapshot = Arc<[Product]>;

/// Shared handle to the cached catalog.
pub struct CatalogStore<G> {
    gateway: Arc<G>,
    snapshot: Arc<watch::Sender<Snapshot>>,
}

impl<G> Clone for CatalogStore<G> {
    fn clone(&self) -> Self {
        Self {
            gateway: Arc::clone(&self.gateway),
            snapshot: Arc::clone(&self.snapshot),
        }
    }
}

impl<G: CatalogGateway + 'static> CatalogStore<G> {
    /// Create an empty store. Call [`refresh`](Self::refresh) to load it.
    #[must_use]
    pub fn new(gateway: Arc<G>) -> Self {
        let (snapshot, _) = watch::channel(Snapshot::from(Vec::new()));
        Self {
            gateway,
            snapshot: Arc::new(snapshot),
        }
    }

    /// The gateway this store reads from.
    #[must_use]
    pub const fn gateway(&self) -> &Arc<G> {
        &self.gateway
    }

    /// Fetch the full product list and replace the snapshot.
    ///
    /// On error the current snapshot is kept.
    ///
    /// # Errors
    ///
    /// Returns the gateway error if the fetch fails.
    #[instrument(skip(self))]
    pub async fn refresh(&self) -> Result<usize, GatewayError> {
        let products = match self.gateway.list_products().await {
            Ok(products) => products,
            Err(e) => {
                tracing::warn!(error = %e, "Catalog refresh failed, keeping current snapshot");
                return Err(e);
            }
        };
        let count = products.len();
        let changed = self.snapshot.send_if_modified(|current| {
            if current.as_ref() == products.as_slice() {
                false
            } else {
                *current = Snapshot::from(products);
                true
            }
        });
        tracing::debug!(count, changed, "Catalog refreshed");
        Ok(count)
    }

    /// The current snapshot.
    #[must_use]
    pub fn snapshot(&self) -> Snapshot {
        self.snapshot.borrow().clone()
    }

    /// Subscribe to snapshot replacements.
    #[must_use]
    pub fn watch(&self) -> watch::Receiver<Snapshot> {
        self.snapshot.subscribe()
    }

    /// Look up a product in the current snapshot.
    #[must_use]
    pub fn find(&self, id: ProductId) -> Option<Product> {
        self.snapshot.borrow().iter().find(|p| p.id == id).cloned()
    }

    /// The newest `limit` products, newest first.
    #[must_use]
    pub fn featured(&self, limit: usize) -> Vec<Product> {
        newest(&self.snapshot.borrow(), limit)
    }

    /// Keep the snapshot in sync in a background task.
    ///
    /// The task refreshes on every gateway change notification and, when
    /// `poll` is set, on that period as well. It stops when the returned
    /// handle is dropped.
    #[must_use = "the sync task stops when the handle is dropped"]
    pub fn spawn_sync(&self, poll: Option<Duration>) -> SyncHandle {
        let store = self.clone();
        let changes = self.gateway.subscribe();
        let ticker = poll.map(|period| {
            let mut ticker = interval_at(Instant::now() + period, period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            ticker
        });
        SyncHandle {
            task: tokio::spawn(store.sync_loop(changes, ticker)),
        }
    }

    async fn sync_loop(
        self,
        mut changes: broadcast::Receiver<CatalogChange>,
        mut ticker: Option<Interval>,
    ) {
        let mut changes_open = true;
        loop {
            tokio::select! {
                change = changes.recv(), if changes_open => match change {
                    Ok(change) => {
                        tracing::debug!(?change, "Catalog change received");
                    }
                    Err(broadcast::error::RecvError::Lagged(skipped)) => {
                        tracing::debug!(skipped, "Catalog change notifications lagged");
                    }
                    Err(broadcast::error::RecvError::Closed) => {
                        changes_open = false;
                        if ticker.is_none() {
                            break;
                        }
                        continue;
                    }
                },
                _ = next_tick(ticker.as_mut()) => {}
            }
            // Errors are already logged and leave the snapshot untouched
            let _ = self.refresh().await;
        }
        tracing::debug!("Catalog sync stopped");
    }
}

/// The `limit` products with the highest ids, highest first.
#[must_use]
pub fn newest(products: &[Product], limit: usize) -> Vec<Product> {
    let mut products = products.to_vec();
    products.sort_by(|a, b| b.id.cmp(&a.id));
    products.truncate(limit);
    products
}

async fn next_tick(ticker: Option<&mut Interval>) {
    match ticker {
        Some(ticker) => {
            ticker.tick().await;
        }
        None => std::future::pending::<()>().await,
    }
}

/// Owns the background sync task and aborts it on drop.
#[derive(Debug)]
pub struct SyncHandle {
    task: JoinHandle<()>,
}

impl SyncHandle {
    /// Whether the task has stopped.
    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }
}

impl Drop for SyncHandle {
    fn drop(&mut self) {
        self.task.abort();
    }
}
