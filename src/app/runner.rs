use crate::adapters::{RemoteSource, StaticSource};
use crate::app::render::render_table;
use crate::config::toml_config::DashboardConfig;
use crate::core::dashboard::Dashboard;
use crate::core::session::{DashboardEvent, DashboardSession};
use crate::domain::catalog::Catalog;
use crate::domain::model::{Column, SortDirection, SortState, ViewSnapshot};
use crate::domain::ports::{ConfigProvider, RecordSource};
use crate::utils::error::{DashboardError, Result};
use std::sync::Arc;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};
use tokio::sync::mpsc;

/// What to show for a single non-interactive run.
#[derive(Debug, Clone, Default)]
pub struct ViewRequest {
    pub environment: Option<String>,
    pub cluster: Option<String>,
    pub search: Option<String>,
    pub sort: Option<Column>,
    pub descending: bool,
    /// 1-based page number as typed.
    pub page: Option<String>,
}

impl ViewRequest {
    /// Events applied once the cluster's rows are in.
    fn view_events(&self) -> Vec<DashboardEvent> {
        let mut events = Vec::new();
        if let Some(search) = &self.search {
            events.push(DashboardEvent::Search(search.clone()));
        }
        if let Some(column) = self.sort {
            let direction = if self.descending {
                SortDirection::Descending
            } else {
                SortDirection::Ascending
            };
            events.push(DashboardEvent::SetSort(SortState::by(column, direction)));
        }
        if let Some(page) = &self.page {
            events.push(DashboardEvent::GotoPageInput(page.clone()));
        }
        events
    }
}

/// Mock data wins over the endpoint when both are configured.
pub async fn build_source(config: &DashboardConfig) -> Result<Arc<dyn RecordSource>> {
    match config.mock_data() {
        Some(path) => {
            tracing::info!("Serving records from {}", path);
            Ok(Arc::new(StaticSource::from_json_file(path).await?))
        }
        None => {
            let source = RemoteSource::from_config(config)?;
            tracing::info!("Using dashboard API at {}", source.endpoint());
            Ok(Arc::new(source))
        }
    }
}

fn new_session(
    config: &DashboardConfig,
    source: Arc<dyn RecordSource>,
) -> DashboardSession<dyn RecordSource> {
    let dashboard = Dashboard::new(config.catalog(), config.page_size());
    DashboardSession::new(dashboard, source).with_search_debounce(config.search_debounce())
}

fn session_stopped() -> DashboardError {
    DashboardError::SessionError {
        message: "dashboard session stopped unexpectedly".to_string(),
    }
}

fn session_panicked(e: tokio::task::JoinError) -> DashboardError {
    DashboardError::SessionError {
        message: format!("dashboard session panicked: {}", e),
    }
}

async fn send(tx: &mpsc::Sender<DashboardEvent>, event: DashboardEvent) -> Result<()> {
    tx.send(event).await.map_err(|_| session_stopped())
}

/// Selects, fetches, filters, sorts and pages once, returning what the table
/// would show.
pub async fn run_once(
    config: &DashboardConfig,
    source: Arc<dyn RecordSource>,
    request: &ViewRequest,
) -> Result<ViewSnapshot> {
    let session = new_session(config, source);
    let mut snapshots = session.subscribe();
    let (tx, rx) = mpsc::channel(32);
    let handle = tokio::spawn(session.run(rx));

    if let Some(environment) = &request.environment {
        send(&tx, DashboardEvent::SelectEnvironment(environment.clone())).await?;
    }
    match request.cluster.as_deref().map(str::trim) {
        Some(cluster) if !cluster.is_empty() => {
            send(&tx, DashboardEvent::SelectCluster(cluster.to_string())).await?;
            // A fetch result resets paging, so wait for it before navigating.
            snapshots
                .wait_for(|s| s.cluster.is_some() && !s.loading)
                .await
                .map_err(|_| session_stopped())?;
        }
        _ => tracing::warn!("No cluster selected, the table stays empty"),
    }

    for event in request.view_events() {
        send(&tx, event).await?;
    }
    drop(tx);

    let dashboard = handle.await.map_err(session_panicked)?;
    Ok(dashboard.snapshot())
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Event(DashboardEvent),
    ListClusters(String),
    ListEnvironments(String),
    Show,
    Help,
    Quit,
}

pub const HELP: &str = "\
commands:
  cluster <name>        select a cluster and fetch its deployments
  env <name>            select an environment
  clusters [filter]     list clusters
  envs [filter]         list environments
  search [text]         filter rows (empty clears)
  sort <column>         sort by column, again to flip direction
  unsort                clear sorting
  page <n>              go to page n
  next | prev | first | last
  show | help | quit";

/// Parses one line of interactive input. `Err` carries a message for the user.
pub fn parse_command(line: &str) -> std::result::Result<Command, String> {
    let line = line.trim();
    let (word, rest) = match line.split_once(char::is_whitespace) {
        Some((word, rest)) => (word, rest.trim()),
        None => (line, ""),
    };

    let event = |e: DashboardEvent| -> std::result::Result<Command, String> {
        Ok(Command::Event(e))
    };
    match word.to_lowercase().as_str() {
        "" | "show" => Ok(Command::Show),
        "help" | "?" => Ok(Command::Help),
        "quit" | "exit" | "q" => Ok(Command::Quit),
        "cluster" if !rest.is_empty() => event(DashboardEvent::SelectCluster(rest.to_string())),
        "env" | "environment" if !rest.is_empty() => {
            event(DashboardEvent::SelectEnvironment(rest.to_string()))
        }
        "clusters" => Ok(Command::ListClusters(rest.to_string())),
        "envs" | "environments" => Ok(Command::ListEnvironments(rest.to_string())),
        "search" | "/" => event(DashboardEvent::Search(rest.to_string())),
        "sort" => rest
            .parse::<Column>()
            .map(|column| Command::Event(DashboardEvent::ToggleSort(column)))
            .map_err(|e| e.to_string()),
        "unsort" => event(DashboardEvent::ClearSort),
        "page" | "goto" => event(DashboardEvent::GotoPageInput(rest.to_string())),
        "next" | "n" => event(DashboardEvent::NextPage),
        "prev" | "previous" | "p" => event(DashboardEvent::PreviousPage),
        "first" => event(DashboardEvent::FirstPage),
        "last" => event(DashboardEvent::LastPage),
        other => Err(format!("unknown command '{}', try 'help'", other)),
    }
}

fn option_list(options: &[&str]) -> String {
    if options.is_empty() {
        "(no match)\n".to_string()
    } else {
        format!("{}\n", options.join("\n"))
    }
}

/// Reads commands line by line and redraws the table whenever it changes.
/// Quitting abandons any fetch still in flight.
pub async fn run_interactive<R, W>(
    config: &DashboardConfig,
    source: Arc<dyn RecordSource>,
    input: R,
    mut output: W,
) -> Result<()>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let catalog: Catalog = config.catalog();
    let session = new_session(config, source).with_drain_on_close(false);
    let mut snapshots = session.subscribe();
    let (tx, rx) = mpsc::channel(32);
    let handle = tokio::spawn(session.run(rx));

    output.write_all(HELP.as_bytes()).await?;
    output.write_all(b"\n").await?;

    let mut lines = input.lines();
    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line? else { break };
                match parse_command(&line) {
                    Ok(Command::Event(event)) => send(&tx, event).await?,
                    Ok(Command::ListClusters(filter)) => {
                        output.write_all(option_list(&catalog.search_clusters(&filter)).as_bytes()).await?;
                    }
                    Ok(Command::ListEnvironments(filter)) => {
                        output.write_all(option_list(&catalog.search_environments(&filter)).as_bytes()).await?;
                    }
                    Ok(Command::Show) => {
                        let table = render_table(&snapshots.borrow_and_update());
                        output.write_all(table.as_bytes()).await?;
                    }
                    Ok(Command::Help) => {
                        output.write_all(HELP.as_bytes()).await?;
                        output.write_all(b"\n").await?;
                    }
                    Ok(Command::Quit) => break,
                    Err(message) => {
                        output.write_all(format!("{}\n", message).as_bytes()).await?;
                    }
                }
            }
            changed = snapshots.changed() => {
                if changed.is_err() {
                    break;
                }
                let table = render_table(&snapshots.borrow_and_update());
                output.write_all(table.as_bytes()).await?;
            }
        }
        output.flush().await?;
    }

    drop(tx);
    handle.await.map_err(session_panicked)?;
    output.flush().await?;
    Ok(())
}
