use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// One deployment object exactly as the dashboard API returned it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RawRecord {
    pub data: serde_json::Map<String, serde_json::Value>,
}

impl RawRecord {
    pub const DEPLOYMENT_NAME: &'static str = "deployment-name";
    pub const NAMESPACE: &'static str = "namespace";
    pub const MAIN_CONTAINER_IMAGES: &'static str = "main-container-images";
    pub const INIT_CONTAINER_IMAGES: &'static str = "init-container-images";

    /// Anything other than a JSON object carries no usable fields and
    /// becomes an empty record.
    pub fn from_value(value: serde_json::Value) -> Self {
        match value {
            serde_json::Value::Object(data) => Self { data },
            _ => Self::default(),
        }
    }

    pub fn get(&self, key: &str) -> Option<&serde_json::Value> {
        self.data.get(key)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Row {
    pub deployment_name: String,
    pub namespace: String,
    pub main_container_images: String,
    pub side_container_images: String,
}

impl Row {
    pub fn field(&self, column: Column) -> &str {
        match column {
            Column::DeploymentName => &self.deployment_name,
            Column::Namespace => &self.namespace,
            Column::MainContainerImages => &self.main_container_images,
            Column::SideContainerImages => &self.side_container_images,
        }
    }

    pub fn fields(&self) -> [&str; 4] {
        Column::ALL.map(|column| self.field(column))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Column {
    DeploymentName,
    Namespace,
    MainContainerImages,
    SideContainerImages,
}

impl Column {
    pub const ALL: [Column; 4] = [
        Column::DeploymentName,
        Column::Namespace,
        Column::MainContainerImages,
        Column::SideContainerImages,
    ];

    pub fn key(self) -> &'static str {
        match self {
            Column::DeploymentName => "deployment_name",
            Column::Namespace => "namespace",
            Column::MainContainerImages => "main_container_images",
            Column::SideContainerImages => "side_container_images",
        }
    }

    /// Key of the field in the upstream payload this column is built from.
    pub fn source_key(self) -> &'static str {
        match self {
            Column::DeploymentName => RawRecord::DEPLOYMENT_NAME,
            Column::Namespace => RawRecord::NAMESPACE,
            Column::MainContainerImages => RawRecord::MAIN_CONTAINER_IMAGES,
            Column::SideContainerImages => RawRecord::INIT_CONTAINER_IMAGES,
        }
    }

    pub fn header(self) -> &'static str {
        match self {
            Column::DeploymentName => "DEPLOYMENT NAME",
            Column::Namespace => "NAMESPACE",
            Column::MainContainerImages => "MAIN CONTAINER IMAGES",
            Column::SideContainerImages => "SIDE CONTAINER IMAGES",
        }
    }
}

impl fmt::Display for Column {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownColumn(pub String);

impl fmt::Display for UnknownColumn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let known: Vec<&str> = Column::ALL.iter().map(|c| c.key()).collect();
        write!(
            f,
            "unknown column '{}' (expected one of: {})",
            self.0,
            known.join(", ")
        )
    }
}

impl std::error::Error for UnknownColumn {}

impl FromStr for Column {
    type Err = UnknownColumn;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase();
        Column::ALL
            .into_iter()
            .find(|column| {
                wanted == column.key()
                    || wanted == column.source_key()
                    || wanted == column.header().to_lowercase()
            })
            .ok_or_else(|| UnknownColumn(s.to_string()))
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortDirection {
    #[default]
    Ascending,
    Descending,
}

impl SortDirection {
    pub fn flipped(self) -> Self {
        match self {
            SortDirection::Ascending => SortDirection::Descending,
            SortDirection::Descending => SortDirection::Ascending,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortState {
    pub column: Option<Column>,
    pub direction: SortDirection,
}

impl SortState {
    pub fn by(column: Column, direction: SortDirection) -> Self {
        Self {
            column: Some(column),
            direction,
        }
    }

    /// Same column flips direction, a different column starts ascending.
    pub fn toggle(&mut self, column: Column) {
        if self.column == Some(column) {
            self.direction = self.direction.flipped();
        } else {
            self.column = Some(column);
            self.direction = SortDirection::Ascending;
        }
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterState {
    pub query: String,
}

/// Display-ready state of the table, as handed to renderers and observers.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ViewSnapshot {
    pub environment: Option<String>,
    pub cluster: Option<String>,
    pub loading: bool,
    pub error: Option<String>,
    pub query: String,
    pub sort: SortState,
    pub page_index: usize,
    pub page_count: usize,
    pub page_size: usize,
    pub total_rows: usize,
    pub filtered_rows: usize,
    pub can_go_previous: bool,
    pub can_go_next: bool,
    pub fetched_at: Option<DateTime<Utc>>,
    pub rows: Vec<Row>,
}
