pub mod adapters;
pub mod app;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;

pub use adapters::{RemoteSource, StaticSource};
pub use config::DashboardConfig;
pub use core::dashboard::{Dashboard, FetchOutcome, FetchTicket};
pub use core::session::{DashboardEvent, DashboardSession};
pub use domain::catalog::Catalog;
pub use domain::model::{Column, RawRecord, Row, SortDirection, SortState, ViewSnapshot};
pub use domain::ports::{ConfigProvider, RecordSource};
pub use utils::error::{DashboardError, Result};
