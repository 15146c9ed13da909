use crate::domain::model::RawRecord;
use crate::utils::error::Result;
use async_trait::async_trait;
use std::collections::HashMap;
use std::time::Duration;

/// Where deployment records come from. The dashboard only ever asks for one
/// cluster at a time.
#[async_trait]
pub trait RecordSource: Send + Sync {
    async fn fetch(&self, cluster: &str) -> Result<Vec<RawRecord>>;
}

pub trait ConfigProvider: Send + Sync {
    fn api_endpoint(&self) -> Option<&str>;
    fn request_timeout(&self) -> Option<Duration>;
    fn extra_headers(&self) -> &HashMap<String, String>;
    fn page_size(&self) -> usize;
    fn search_debounce(&self) -> Duration;
}
