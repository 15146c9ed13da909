use crate::app::render::OutputFormat;
use crate::app::runner::ViewRequest;
use crate::config::toml_config::DashboardConfig;
use crate::domain::model::Column;
use crate::utils::error::Result;
use clap::Parser;

#[derive(Debug, Clone, Parser)]
#[command(name = "release-dashboard")]
#[command(about = "Searchable, sortable, paginated view of deployments per cluster")]
pub struct CliConfig {
    /// Path to a TOML configuration file
    #[arg(short, long)]
    pub config: Option<String>,

    /// Dashboard API endpoint (overrides the config file)
    #[arg(long, env = "RELEASE_DASHBOARD_ENDPOINT")]
    pub endpoint: Option<String>,

    /// Serve records from a JSON file instead of the API
    #[arg(long)]
    pub mock_data: Option<String>,

    #[arg(short, long)]
    pub environment: Option<String>,

    #[arg(short = 'C', long)]
    pub cluster: Option<String>,

    /// Case-insensitive text matched against every column
    #[arg(short, long)]
    pub search: Option<String>,

    /// Column to sort by (e.g. deployment_name, namespace)
    #[arg(long)]
    pub sort: Option<Column>,

    #[arg(long, requires = "sort")]
    pub descending: bool,

    /// 1-based page number
    #[arg(short, long)]
    pub page: Option<String>,

    #[arg(long)]
    pub page_size: Option<usize>,

    #[arg(short, long, value_enum, default_value_t = OutputFormat::Table)]
    pub format: OutputFormat,

    /// List clusters, optionally only those containing FILTER
    #[arg(long, value_name = "FILTER", num_args = 0..=1, default_missing_value = "")]
    pub list_clusters: Option<String>,

    /// List environments, optionally only those containing FILTER
    #[arg(long, value_name = "FILTER", num_args = 0..=1, default_missing_value = "")]
    pub list_environments: Option<String>,

    /// Read commands from stdin instead of rendering once
    #[arg(short, long)]
    pub interactive: bool,

    #[arg(long)]
    pub timeout_seconds: Option<u64>,

    #[arg(short, long, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, help = "Log as JSON lines")]
    pub json_logs: bool,
}

impl CliConfig {
    /// Loads the config file, if any, and lays the command-line flags over it.
    pub fn to_dashboard_config(&self) -> Result<DashboardConfig> {
        let mut config = match &self.config {
            Some(path) => DashboardConfig::from_file(path)?,
            None => DashboardConfig::default(),
        };

        if let Some(endpoint) = &self.endpoint {
            config.source.endpoint = Some(endpoint.clone());
        }
        if let Some(mock_data) = &self.mock_data {
            config.source.mock_data = Some(mock_data.clone());
        }
        if let Some(timeout) = self.timeout_seconds {
            config.source.timeout_seconds = Some(timeout);
        }
        if let Some(page_size) = self.page_size {
            config.view.page_size = Some(page_size);
        }

        Ok(config)
    }

    pub fn view_request(&self) -> ViewRequest {
        ViewRequest {
            environment: self.environment.clone(),
            cluster: self.cluster.clone(),
            search: self.search.clone(),
            sort: self.sort,
            descending: self.descending,
            page: self.page.clone(),
        }
    }
}
