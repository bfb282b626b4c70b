//! Catalog browsing state machine
//!
//! A [`Browser`] task owns the [`BrowseState`], turns parameter changes into
//! catalog requests and publishes a [`BrowseView`]. Consumers drive it through
//! a [`BrowseHandle`].
//!
//! Requests are never cancelled. Each one is tagged with a sequence number and
//! only the response to the most recently issued request is applied, so a slow
//! response for an outdated listing cannot overwrite a newer one.
use std::{sync::Arc, time::Duration};

use serde::Serialize;
use tokio::{
    sync::{mpsc, watch},
    task::JoinHandle,
};

use crate::{
    error::AppResult,
    models::{BrowseMode, Movie, MoviePage, SortKey},
    services::catalog::{CatalogProvider, CatalogRequest},
};

mod debounce;
mod state;

pub use debounce::Debounce;
pub use state::BrowseState;

/// Default quiet interval for search input
pub const SEARCH_DEBOUNCE: Duration = Duration::from_millis(400);

/// Everything the presentation layer needs to render a listing
#[derive(Debug, Clone, Serialize)]
pub struct BrowseView {
    pub state: BrowseState,
    pub movies: Vec<Movie>,
    pub is_loading: bool,
    pub error: Option<String>,
}

#[derive(Debug)]
enum BrowseCommand {
    SetSortKey(SortKey),
    SetBrowseMode(BrowseMode),
    SearchInput(String),
    NextPage,
    PrevPage,
    Reload,
}

struct Completed {
    seq: u64,
    request: CatalogRequest,
    result: AppResult<MoviePage>,
}

/// Handle to a running browser task
pub struct BrowseHandle {
    commands: mpsc::UnboundedSender<BrowseCommand>,
    view: watch::Receiver<BrowseView>,
    task: JoinHandle<()>,
}

impl BrowseHandle {
    /// Starts a browser and issues the initial discover request
    pub fn spawn(catalog: Arc<dyn CatalogProvider>, search_debounce: Duration) -> Self {
        let state = BrowseState::new();
        let (view_tx, view_rx) = watch::channel(BrowseView {
            state: state.clone(),
            movies: Vec::new(),
            is_loading: true,
            error: None,
        });
        let (command_tx, command_rx) = mpsc::unbounded_channel();
        let (completed_tx, completed_rx) = mpsc::unbounded_channel();

        let browser = Browser {
            catalog,
            state,
            search: Debounce::new(search_debounce),
            seq: 0,
            view: view_tx,
            completed: completed_tx,
        };
        let task = tokio::spawn(browser.run(command_rx, completed_rx));

        Self {
            commands: command_tx,
            view: view_rx,
            task,
        }
    }

    pub fn set_sort_key(&self, sort_key: SortKey) {
        self.send(BrowseCommand::SetSortKey(sort_key));
    }

    pub fn set_browse_mode(&self, browse_mode: BrowseMode) {
        self.send(BrowseCommand::SetBrowseMode(browse_mode));
    }

    /// Raw search box contents; takes effect once input stays quiet
    pub fn search_input(&self, input: impl Into<String>) {
        self.send(BrowseCommand::SearchInput(input.into()));
    }

    pub fn next_page(&self) {
        self.send(BrowseCommand::NextPage);
    }

    pub fn prev_page(&self) {
        self.send(BrowseCommand::PrevPage);
    }

    /// Re-issues the current request
    pub fn reload(&self) {
        self.send(BrowseCommand::Reload);
    }

    pub fn view(&self) -> BrowseView {
        self.view.borrow().clone()
    }

    /// Waits for the next published view; `false` once the browser stopped
    pub async fn changed(&mut self) -> bool {
        self.view.changed().await.is_ok()
    }

    pub async fn shutdown(self) {
        drop(self.commands);
        if let Err(e) = self.task.await {
            tracing::error!(error = %e, "Browser task ended abnormally");
        }
    }

    fn send(&self, command: BrowseCommand) {
        if let Err(e) = self.commands.send(command) {
            tracing::warn!(command = ?e.0, "Browser task is gone, command dropped");
        }
    }
}

struct Browser {
    catalog: Arc<dyn CatalogProvider>,
    state: BrowseState,
    search: Debounce<String>,
    seq: u64,
    view: watch::Sender<BrowseView>,
    completed: mpsc::UnboundedSender<Completed>,
}

impl Browser {
    async fn run(
        mut self,
        mut commands: mpsc::UnboundedReceiver<BrowseCommand>,
        mut completed: mpsc::UnboundedReceiver<Completed>,
    ) {
        tracing::debug!("Browser task started");
        self.issue();

        loop {
            tokio::select! {
                command = commands.recv() => match command {
                    Some(command) => self.handle(command),
                    None => break,
                },
                Some(query) = self.search.ready() => {
                    if self.state.set_query(&query) {
                        self.issue();
                    }
                }
                Some(done) = completed.recv() => self.apply(done),
            }
        }

        tracing::debug!("Browser task stopped");
    }

    fn handle(&mut self, command: BrowseCommand) {
        let changed = match command {
            BrowseCommand::SetSortKey(sort_key) => self.state.set_sort_key(sort_key),
            BrowseCommand::SetBrowseMode(browse_mode) => {
                self.state.set_browse_mode(browse_mode)
            }
            BrowseCommand::SearchInput(input) => {
                self.search.push(input);
                false
            }
            BrowseCommand::NextPage => self.state.next_page(),
            BrowseCommand::PrevPage => self.state.prev_page(),
            BrowseCommand::Reload => true,
        };

        if changed {
            self.issue();
        }
    }

    fn issue(&mut self) {
        self.seq += 1;
        let seq = self.seq;
        let request = self.state.request();

        tracing::debug!(seq, request = ?request, "Issuing catalog request");

        let state = self.state.clone();
        self.view.send_modify(|view| {
            view.state = state;
            view.is_loading = true;
        });

        let catalog = self.catalog.clone();
        let completed = self.completed.clone();
        tokio::spawn(async move {
            let result = request.execute(catalog.as_ref()).await;
            // The browser may already be gone; nothing is waiting then
            let _ = completed.send(Completed {
                seq,
                request,
                result,
            });
        });
    }

    fn apply(&mut self, done: Completed) {
        if done.seq != self.seq {
            tracing::debug!(
                seq = done.seq,
                latest = self.seq,
                request = ?done.request,
                "Discarding stale catalog response"
            );
            return;
        }

        let (movies, error) = match done.result {
            Ok(page) => {
                if self.state.set_total_pages(page.total_pages) {
                    tracing::debug!(
                        page = self.state.page(),
                        total_pages = page.total_pages,
                        "Listing shrank below the requested page"
                    );
                    self.issue();
                    return;
                }
                (page.results, None)
            }
            Err(e) => {
                tracing::error!(error = %e, request = ?done.request, "Error fetching movies");
                (Vec::new(), Some(e.to_string()))
            }
        };

        let state = self.state.clone();
        self.view.send_modify(|view| {
            view.state = state;
            view.movies = movies;
            view.error = error;
            view.is_loading = false;
        });
    }
}
