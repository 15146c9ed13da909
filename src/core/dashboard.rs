use crate::core::paginator::Paginator;
use crate::core::transform::to_rows;
use crate::core::view::derive_view;
use crate::domain::catalog::Catalog;
use crate::domain::model::{Column, FilterState, RawRecord, Row, SortState, ViewSnapshot};
use crate::utils::error::Result;
use chrono::{DateTime, Utc};

/// Identifies one outstanding fetch. Only the ticket from the latest
/// selection can change the row set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchTicket {
    pub cluster: String,
    pub generation: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchOutcome {
    Applied,
    Stale,
}

/// The table's whole state. Rows are replaced only by fetch results; search,
/// sort and paging derive a view without touching them.
#[derive(Debug, Clone)]
pub struct Dashboard {
    catalog: Catalog,
    environment: Option<String>,
    cluster: Option<String>,
    generation: u64,
    loading: bool,
    error: Option<String>,
    rows: Vec<Row>,
    fetched_at: Option<DateTime<Utc>>,
    filter: FilterState,
    sort: SortState,
    pager: Paginator,
    view: Vec<usize>,
}

impl Default for Dashboard {
    fn default() -> Self {
        Self::new(Catalog::default(), Paginator::default().page_size())
    }
}

impl Dashboard {
    pub fn new(catalog: Catalog, page_size: usize) -> Self {
        Self {
            catalog,
            environment: None,
            cluster: None,
            generation: 0,
            loading: false,
            error: None,
            rows: Vec::new(),
            fetched_at: None,
            filter: FilterState::default(),
            sort: SortState::default(),
            pager: Paginator::new(page_size),
            view: Vec::new(),
        }
    }

    /// Stored for display only; the environment does not gate fetching.
    pub fn select_environment(&mut self, environment: &str) {
        let environment = environment.trim();
        self.environment = (!environment.is_empty()).then(|| environment.to_string());
    }

    /// Starts a fetch for `cluster`. An empty selection is a no-op and
    /// returns `None`. Reselecting the current cluster fetches again.
    pub fn select_cluster(&mut self, cluster: &str) -> Option<FetchTicket> {
        let cluster = cluster.trim();
        if cluster.is_empty() {
            tracing::debug!("Empty cluster selection, nothing to fetch");
            return None;
        }
        if !self.catalog.has_cluster(cluster) {
            tracing::warn!("Cluster '{}' is not in the catalog, fetching anyway", cluster);
        }

        self.generation += 1;
        self.cluster = Some(cluster.to_string());
        self.loading = true;
        self.error = None;

        Some(FetchTicket {
            cluster: cluster.to_string(),
            generation: self.generation,
        })
    }

    pub fn is_current(&self, ticket: &FetchTicket) -> bool {
        ticket.generation == self.generation && self.cluster.as_deref() == Some(ticket.cluster.as_str())
    }

    /// Applies a finished fetch unless a newer selection superseded it.
    /// Failures clear the rows so no partial data is shown.
    pub fn complete_fetch(
        &mut self,
        ticket: &FetchTicket,
        result: Result<Vec<RawRecord>>,
    ) -> FetchOutcome {
        if !self.is_current(ticket) {
            tracing::warn!(
                "Discarding stale response for cluster '{}' (request #{}, current #{})",
                ticket.cluster,
                ticket.generation,
                self.generation
            );
            return FetchOutcome::Stale;
        }

        self.loading = false;
        match result {
            Ok(records) => {
                self.rows = to_rows(&records);
                self.error = None;
                self.fetched_at = Some(Utc::now());
                tracing::info!(
                    "Loaded {} deployments for cluster '{}'",
                    self.rows.len(),
                    ticket.cluster
                );
            }
            Err(e) => {
                tracing::warn!("Fetch for cluster '{}' failed: {}", ticket.cluster, e);
                self.rows.clear();
                self.error = Some(e.user_friendly_message());
                self.fetched_at = None;
            }
        }

        self.pager.first_page();
        self.refresh_view();
        FetchOutcome::Applied
    }

    pub fn set_query(&mut self, query: &str) {
        if self.filter.query == query {
            return;
        }
        self.filter.query = query.to_string();
        self.pager.first_page();
        self.refresh_view();
    }

    pub fn toggle_sort(&mut self, column: Column) {
        self.sort.toggle(column);
        self.pager.first_page();
        self.refresh_view();
    }

    pub fn set_sort(&mut self, sort: SortState) {
        self.sort = sort;
        self.pager.first_page();
        self.refresh_view();
    }

    pub fn clear_sort(&mut self) {
        self.set_sort(SortState::default());
    }

    pub fn goto_page(&mut self, page_index: usize) {
        self.pager.goto_page(page_index, self.view.len());
    }

    pub fn goto_page_input(&mut self, input: &str) -> bool {
        self.pager.goto_page_input(input, self.view.len())
    }

    pub fn first_page(&mut self) {
        self.pager.first_page();
    }

    pub fn last_page(&mut self) {
        self.pager.last_page(self.view.len());
    }

    pub fn next_page(&mut self) {
        self.pager.next_page(self.view.len());
    }

    pub fn previous_page(&mut self) {
        self.pager.previous_page();
    }

    fn refresh_view(&mut self) {
        self.view = derive_view(&self.rows, &self.filter, &self.sort);
        self.pager.clamp(self.view.len());
    }

    pub fn environment(&self) -> Option<&str> {
        self.environment.as_deref()
    }

    pub fn cluster(&self) -> Option<&str> {
        self.cluster.as_deref()
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    pub fn query(&self) -> &str {
        &self.filter.query
    }

    pub fn sort(&self) -> SortState {
        self.sort
    }

    pub fn filtered_len(&self) -> usize {
        self.view.len()
    }

    /// Filtered and sorted rows, all pages.
    pub fn visible_rows(&self) -> impl Iterator<Item = &Row> + '_ {
        self.view.iter().map(|&index| &self.rows[index])
    }

    pub fn page_rows(&self) -> Vec<&Row> {
        self.view[self.pager.range(self.view.len())]
            .iter()
            .map(|&index| &self.rows[index])
            .collect()
    }

    pub fn page_index(&self) -> usize {
        self.pager.page_index()
    }

    pub fn page_count(&self) -> usize {
        self.pager.page_count(self.view.len())
    }

    pub fn can_go_previous(&self) -> bool {
        self.pager.can_go_previous()
    }

    pub fn can_go_next(&self) -> bool {
        self.pager.can_go_next(self.view.len())
    }

    pub fn snapshot(&self) -> ViewSnapshot {
        ViewSnapshot {
            environment: self.environment.clone(),
            cluster: self.cluster.clone(),
            loading: self.loading,
            error: self.error.clone(),
            query: self.filter.query.clone(),
            sort: self.sort,
            page_index: self.page_index(),
            page_count: self.page_count(),
            page_size: self.pager.page_size(),
            total_rows: self.rows.len(),
            filtered_rows: self.view.len(),
            can_go_previous: self.can_go_previous(),
            can_go_next: self.can_go_next(),
            fetched_at: self.fetched_at,
            rows: self.page_rows().into_iter().cloned().collect(),
        }
    }
}
