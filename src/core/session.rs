use crate::core::dashboard::{Dashboard, FetchTicket};
use crate::domain::model::{Column, RawRecord, SortState, ViewSnapshot};
use crate::domain::ports::RecordSource;
use crate::utils::debounce::Debouncer;
use crate::utils::error::Result;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{mpsc, watch};
use tokio::task::JoinSet;
use tokio::time::Instant;

pub const DEFAULT_SEARCH_DEBOUNCE: Duration = Duration::from_millis(300);

/// Everything a user can do to the table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DashboardEvent {
    SelectEnvironment(String),
    SelectCluster(String),
    Search(String),
    ToggleSort(Column),
    SetSort(SortState),
    ClearSort,
    GotoPage(usize),
    GotoPageInput(String),
    FirstPage,
    PreviousPage,
    NextPage,
    LastPage,
}

type FetchDone = (FetchTicket, Result<Vec<RawRecord>>);

/// Owns the dashboard and applies events one at a time. Fetches run as
/// spawned tasks and report back as they finish, so responses may arrive
/// in any order.
pub struct DashboardSession<S: ?Sized> {
    dashboard: Dashboard,
    source: Arc<S>,
    search: Debouncer<String>,
    snapshots: watch::Sender<ViewSnapshot>,
    fetches: JoinSet<FetchDone>,
    drain_on_close: bool,
}

impl<S: RecordSource + ?Sized + 'static> DashboardSession<S> {
    pub fn new(dashboard: Dashboard, source: Arc<S>) -> Self {
        let (snapshots, _) = watch::channel(dashboard.snapshot());
        Self {
            dashboard,
            source,
            search: Debouncer::new(DEFAULT_SEARCH_DEBOUNCE),
            snapshots,
            fetches: JoinSet::new(),
            drain_on_close: true,
        }
    }

    pub fn with_search_debounce(mut self, quiet: Duration) -> Self {
        self.search = Debouncer::new(quiet);
        self
    }

    /// When false, closing the event channel aborts in-flight fetches
    /// instead of waiting for them.
    pub fn with_drain_on_close(mut self, drain: bool) -> Self {
        self.drain_on_close = drain;
        self
    }

    /// Receives a fresh snapshot after every state change.
    pub fn subscribe(&self) -> watch::Receiver<ViewSnapshot> {
        self.snapshots.subscribe()
    }

    /// Runs until `events` closes, then applies any pending search and,
    /// when draining, waits for in-flight fetches before handing back the
    /// final state.
    pub async fn run(mut self, mut events: mpsc::Receiver<DashboardEvent>) -> Dashboard {
        let mut events_open = true;

        loop {
            if !events_open {
                if let Some(query) = self.search.flush() {
                    self.dashboard.set_query(&query);
                    self.publish();
                }
                if self.fetches.is_empty() {
                    break;
                }
                if !self.drain_on_close {
                    tracing::debug!("Aborting {} in-flight fetches", self.fetches.len());
                    self.fetches.abort_all();
                    break;
                }
            }

            let search_deadline = self.search.deadline();
            let fetching = !self.fetches.is_empty();

            tokio::select! {
                event = events.recv(), if events_open => match event {
                    Some(event) => {
                        self.handle(event);
                        self.publish();
                    }
                    None => {
                        tracing::debug!(
                            "Event channel closed with {} fetches in flight",
                            self.fetches.len()
                        );
                        events_open = false;
                    }
                },
                Some(joined) = self.fetches.join_next(), if fetching => match joined {
                    Ok((ticket, result)) => {
                        self.dashboard.complete_fetch(&ticket, result);
                        self.publish();
                    }
                    Err(e) => tracing::error!("Fetch task failed: {}", e),
                },
                _ = sleep_until_deadline(search_deadline), if search_deadline.is_some() => {
                    if let Some(query) = self.search.take_ready(Instant::now()) {
                        tracing::debug!("Applying search '{}'", query);
                        self.dashboard.set_query(&query);
                        self.publish();
                    }
                }
            }
        }

        self.dashboard
    }

    fn handle(&mut self, event: DashboardEvent) {
        // Sort and page events act on what the user typed before them.
        if !matches!(
            event,
            DashboardEvent::Search(_)
                | DashboardEvent::SelectEnvironment(_)
                | DashboardEvent::SelectCluster(_)
        ) {
            if let Some(query) = self.search.flush() {
                self.dashboard.set_query(&query);
            }
        }

        match event {
            DashboardEvent::SelectEnvironment(environment) => {
                self.dashboard.select_environment(&environment)
            }
            DashboardEvent::SelectCluster(cluster) => {
                if let Some(ticket) = self.dashboard.select_cluster(&cluster) {
                    self.spawn_fetch(ticket);
                }
            }
            DashboardEvent::Search(query) => self.search.push(query, Instant::now()),
            DashboardEvent::ToggleSort(column) => self.dashboard.toggle_sort(column),
            DashboardEvent::SetSort(sort) => self.dashboard.set_sort(sort),
            DashboardEvent::ClearSort => self.dashboard.clear_sort(),
            DashboardEvent::GotoPage(page_index) => self.dashboard.goto_page(page_index),
            DashboardEvent::GotoPageInput(input) => {
                if !self.dashboard.goto_page_input(&input) {
                    tracing::debug!("Ignoring page input '{}'", input);
                }
            }
            DashboardEvent::FirstPage => self.dashboard.first_page(),
            DashboardEvent::PreviousPage => self.dashboard.previous_page(),
            DashboardEvent::NextPage => self.dashboard.next_page(),
            DashboardEvent::LastPage => self.dashboard.last_page(),
        }
    }

    fn spawn_fetch(&mut self, ticket: FetchTicket) {
        let source = Arc::clone(&self.source);
        tracing::debug!(
            "Fetching cluster '{}' (request #{})",
            ticket.cluster,
            ticket.generation
        );
        self.fetches.spawn(async move {
            let result = source.fetch(&ticket.cluster).await;
            (ticket, result)
        });
    }

    fn publish(&self) {
        self.snapshots.send_replace(self.dashboard.snapshot());
    }
}

async fn sleep_until_deadline(deadline: Option<Instant>) {
    match deadline {
        Some(deadline) => tokio::time::sleep_until(deadline).await,
        None => std::future::pending().await,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::StaticSource;
    use serde_json::json;

    fn source() -> Arc<StaticSource> {
        let records = (0..30)
            .map(|i| {
                RawRecord::from_value(json!({
                    "deployment-name": format!("svc-{:02}", i),
                    "namespace": if i < 10 { "edge" } else { "core" },
                }))
            })
            .collect();
        Arc::new(StaticSource::new(records))
    }

    #[tokio::test(start_paused = true)]
    async fn test_session_fetches_and_pages() {
        let session = DashboardSession::new(Dashboard::default(), source());
        let mut snapshots = session.subscribe();
        let (tx, rx) = mpsc::channel(16);
        let handle = tokio::spawn(session.run(rx));

        tx.send(DashboardEvent::SelectCluster("prod".to_string()))
            .await
            .unwrap();
        snapshots.wait_for(|s| !s.loading && s.total_rows == 30).await.unwrap();

        tx.send(DashboardEvent::NextPage).await.unwrap();
        tx.send(DashboardEvent::NextPage).await.unwrap();
        drop(tx);

        let dashboard = handle.await.unwrap();
        assert_eq!(dashboard.rows().len(), 30);
        assert_eq!(dashboard.page_count(), 2);
        assert_eq!(dashboard.page_index(), 1);
        assert_eq!(dashboard.page_rows().len(), 10);
    }

    #[tokio::test(start_paused = true)]
    async fn test_search_waits_for_quiet_period() {
        let session = DashboardSession::new(Dashboard::default(), source());
        let mut snapshots = session.subscribe();
        let (tx, rx) = mpsc::channel(16);
        let handle = tokio::spawn(session.run(rx));

        tx.send(DashboardEvent::SelectCluster("prod".to_string()))
            .await
            .unwrap();
        snapshots
            .wait_for(|s| s.total_rows == 30)
            .await
            .unwrap();

        tx.send(DashboardEvent::Search("e".to_string())).await.unwrap();
        tokio::time::sleep(Duration::from_millis(100)).await;
        tx.send(DashboardEvent::Search("ed".to_string())).await.unwrap();
        tokio::time::sleep(Duration::from_millis(200)).await;
        assert_eq!(snapshots.borrow().query, "");

        tokio::time::sleep(Duration::from_millis(150)).await;
        assert_eq!(snapshots.borrow().query, "ed");
        assert_eq!(snapshots.borrow().filtered_rows, 10);

        drop(tx);
        let dashboard = handle.await.unwrap();
        assert_eq!(dashboard.query(), "ed");
    }

    #[tokio::test(start_paused = true)]
    async fn test_pending_search_applied_on_close() {
        let session = DashboardSession::new(Dashboard::default(), source())
            .with_search_debounce(Duration::from_secs(5));
        let (tx, rx) = mpsc::channel(16);
        let handle = tokio::spawn(session.run(rx));

        tx.send(DashboardEvent::SelectCluster("prod".to_string()))
            .await
            .unwrap();
        tx.send(DashboardEvent::Search("CORE".to_string()))
            .await
            .unwrap();
        drop(tx);

        let dashboard = handle.await.unwrap();
        assert_eq!(dashboard.filtered_len(), 20);
    }

    struct StalledSource;

    #[async_trait::async_trait]
    impl RecordSource for StalledSource {
        async fn fetch(&self, _cluster: &str) -> Result<Vec<RawRecord>> {
            std::future::pending().await
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_close_without_drain_abandons_fetch() {
        let session = DashboardSession::new(Dashboard::default(), Arc::new(StalledSource))
            .with_drain_on_close(false);
        let (tx, rx) = mpsc::channel(16);
        let handle = tokio::spawn(session.run(rx));

        tx.send(DashboardEvent::SelectCluster("prod".to_string()))
            .await
            .unwrap();
        tx.send(DashboardEvent::Search("api".to_string()))
            .await
            .unwrap();
        drop(tx);

        let dashboard = tokio::time::timeout(Duration::from_secs(1), handle)
            .await
            .expect("session should stop without waiting for the fetch")
            .unwrap();
        assert!(dashboard.is_loading());
        assert!(dashboard.rows().is_empty());
        assert_eq!(dashboard.query(), "api");
    }
}
