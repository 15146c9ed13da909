pub mod dashboard;
pub mod paginator;
pub mod session;
pub mod transform;
pub mod view;

pub use crate::domain::model::{RawRecord, Row, ViewSnapshot};
pub use crate::domain::ports::{ConfigProvider, RecordSource};
pub use crate::utils::error::Result;
