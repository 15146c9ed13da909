use crate::adapters::remote::parse_records;
use crate::domain::model::RawRecord;
use crate::domain::ports::RecordSource;
use crate::utils::error::Result;
use async_trait::async_trait;
use std::collections::HashMap;
use std::path::Path;

/// In-memory record source for demos, offline use and tests.
#[derive(Debug, Clone, Default)]
pub struct StaticSource {
    default_records: Vec<RawRecord>,
    per_cluster: HashMap<String, Vec<RawRecord>>,
}

impl StaticSource {
    pub fn new(records: Vec<RawRecord>) -> Self {
        Self {
            default_records: records,
            per_cluster: HashMap::new(),
        }
    }

    pub fn with_cluster(mut self, cluster: &str, records: Vec<RawRecord>) -> Self {
        self.per_cluster.insert(cluster.to_lowercase(), records);
        self
    }

    /// Reads a JSON array of records, the same shape the API returns.
    pub async fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let body = tokio::fs::read(path).await?;
        let records = parse_records(&body)?;
        tracing::debug!("Loaded {} mock records from {}", records.len(), path.display());
        Ok(Self::new(records))
    }
}

#[async_trait]
impl RecordSource for StaticSource {
    async fn fetch(&self, cluster: &str) -> Result<Vec<RawRecord>> {
        let records = self
            .per_cluster
            .get(&cluster.to_lowercase())
            .unwrap_or(&self.default_records);
        Ok(records.clone())
    }
}
