//! Actor driving the catalog's [`PaginatedList`].
//!
//! The feed task is the single owner of the list. Presentation code talks to
//! it through a [`FeedHandle`]; page fetches run as separate tasks and post
//! their outcome back onto the feed's completion channel, so every state
//! change happens on the feed task in arrival order.
//!
//! After each change the feed diffs what it last rendered against the list's
//! items (deduplicated by product id) and forwards the edit script to the
//! [`RenderSink`]. Load failures are reported through the [`Notifier`].

use std::sync::Arc;

use thiserror::Error;
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tracing::{debug, info};

use super::list_diff::{dedup_by_key, diff};
use super::ports::{CatalogService, Notice, Notifier, RenderSink};
use super::{
    Completion, ListStatus, OperationError, PageLoad, PageSizes, PaginatedList, Product,
    ProductId, ServiceResult,
};

/// Returned when the feed task has stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("catalog feed has stopped")]
pub struct FeedClosed;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FeedCommand {
    Activate,
    NearEnd(bool),
    Retry,
    Refresh,
}

/// State published after every change.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedSnapshot {
    /// List bookkeeping.
    pub status: ListStatus,
    /// Ids currently shown, in order.
    pub rendered: Vec<ProductId>,
    /// Error behind an errored list.
    pub last_error: Option<OperationError>,
}

type PageOutcome = (PageLoad, ServiceResult<Vec<Product>>);

/// Cloneable handle for sending presentation events to a running feed.
#[derive(Debug, Clone)]
pub struct FeedHandle {
    commands: mpsc::UnboundedSender<FeedCommand>,
    snapshots: watch::Receiver<FeedSnapshot>,
}

impl FeedHandle {
    fn send(&self, command: FeedCommand) -> Result<(), FeedClosed> {
        self.commands.send(command).map_err(|_| FeedClosed)
    }

    /// Screen appeared; load the first page if nothing is loaded yet.
    pub fn activate(&self) -> Result<(), FeedClosed> {
        self.send(FeedCommand::Activate)
    }

    /// Scroll position moved relative to the end of the list.
    pub fn near_end(&self, near: bool) -> Result<(), FeedClosed> {
        self.send(FeedCommand::NearEnd(near))
    }

    /// Re-issue the failed page request.
    pub fn retry(&self) -> Result<(), FeedClosed> {
        self.send(FeedCommand::Retry)
    }

    /// Discard everything and reload from the start.
    pub fn refresh(&self) -> Result<(), FeedClosed> {
        self.send(FeedCommand::Refresh)
    }

    /// Latest published state.
    pub fn snapshot(&self) -> FeedSnapshot {
        self.snapshots.borrow().clone()
    }

    /// Receiver for state changes.
    pub fn subscribe(&self) -> watch::Receiver<FeedSnapshot> {
        self.snapshots.clone()
    }

    /// Wait until the published state satisfies `predicate`.
    ///
    /// # Errors
    ///
    /// Returns [`FeedClosed`] if the feed stops before that happens.
    pub async fn wait_until(
        &self,
        predicate: impl FnMut(&FeedSnapshot) -> bool,
    ) -> Result<FeedSnapshot, FeedClosed> {
        let mut receiver = self.snapshots.clone();
        let snapshot = receiver.wait_for(predicate).await.map_err(|_| FeedClosed)?;
        Ok(snapshot.clone())
    }
}

/// Single owner of the catalog list, its rendering and its notifications.
pub struct CatalogFeed<C: ?Sized, S, N: ?Sized> {
    catalog: Arc<C>,
    sink: S,
    notifier: Arc<N>,
    list: PaginatedList<Product>,
    rendered: Vec<Product>,
    loading_shown: bool,
    outcomes: mpsc::UnboundedSender<PageOutcome>,
    snapshots: watch::Sender<FeedSnapshot>,
}

impl<C, S, N> CatalogFeed<C, S, N>
where
    C: CatalogService + ?Sized + 'static,
    S: RenderSink + 'static,
    N: Notifier + ?Sized + 'static,
{
    /// Start the feed task on the current Tokio runtime.
    ///
    /// The task stops once every [`FeedHandle`] is dropped.
    pub fn spawn(
        catalog: Arc<C>,
        sink: S,
        notifier: Arc<N>,
        sizes: PageSizes,
    ) -> (FeedHandle, JoinHandle<()>) {
        let (command_tx, command_rx) = mpsc::unbounded_channel();
        let (outcome_tx, outcome_rx) = mpsc::unbounded_channel();
        let list = PaginatedList::new(sizes);
        let (snapshot_tx, snapshot_rx) = watch::channel(FeedSnapshot {
            status: list.status(),
            rendered: Vec::new(),
            last_error: None,
        });

        let feed = Self {
            catalog,
            sink,
            notifier,
            list,
            rendered: Vec::new(),
            loading_shown: false,
            outcomes: outcome_tx,
            snapshots: snapshot_tx,
        };
        let task = tokio::spawn(feed.run(command_rx, outcome_rx));

        (
            FeedHandle {
                commands: command_tx,
                snapshots: snapshot_rx,
            },
            task,
        )
    }

    async fn run(
        mut self,
        mut commands: mpsc::UnboundedReceiver<FeedCommand>,
        mut outcomes: mpsc::UnboundedReceiver<PageOutcome>,
    ) {
        loop {
            // Commands queued before an outcome are handled first.
            tokio::select! {
                biased;
                command = commands.recv() => match command {
                    Some(command) => self.handle_command(command),
                    None => break,
                },
                Some((load, result)) = outcomes.recv() => self.handle_outcome(load, result),
            }
        }
        info!("catalog feed stopped");
    }

    fn handle_command(&mut self, command: FeedCommand) {
        let load = match command {
            FeedCommand::Activate => self.list.activate(),
            FeedCommand::NearEnd(near) => self.list.near_end(near),
            FeedCommand::Retry => self.list.retry(),
            FeedCommand::Refresh => Some(self.list.refresh()),
        };
        match load {
            Some(load) => self.fetch(load),
            None => debug!(?command, phase = ?self.list.phase(), "command issued no load"),
        }
        self.render();
    }

    fn handle_outcome(&mut self, load: PageLoad, result: ServiceResult<Vec<Product>>) {
        match self.list.complete(load, result) {
            Completion::Stale => return,
            Completion::Loaded { received } => debug!(received, "catalog page applied"),
            Completion::Failed(err) => self.notifier.notify(Notice::error(err.message())),
        }
        self.render();
    }

    fn fetch(&self, load: PageLoad) {
        let catalog = Arc::clone(&self.catalog);
        let outcomes = self.outcomes.clone();
        tokio::spawn(async move {
            let result = catalog.get_product_list(load.request()).await;
            if outcomes.send((load, result)).is_err() {
                debug!("catalog feed stopped before page arrived");
            }
        });
    }

    fn render(&mut self) {
        let next = dedup_by_key(self.list.items());
        if self.rendered.is_empty() && !next.is_empty() {
            self.sink.reset(&next);
        } else {
            let script = diff(&self.rendered, &next);
            if !script.is_empty() {
                self.sink.apply(&script);
            }
        }
        self.rendered = next;

        let loading = self.list.is_loading();
        if loading != self.loading_shown {
            self.sink.set_loading(loading);
            self.loading_shown = loading;
        }

        self.snapshots.send_replace(FeedSnapshot {
            status: self.list.status(),
            rendered: self.rendered.iter().map(|product| product.id.clone()).collect(),
            last_error: self.list.last_error().cloned(),
        });
    }
}

#[cfg(test)]
#[path = "catalog_feed_tests.rs"]
mod tests;
