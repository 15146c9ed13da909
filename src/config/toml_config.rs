use crate::core::paginator::DEFAULT_PAGE_SIZE;
use crate::core::session::DEFAULT_SEARCH_DEBOUNCE;
use crate::domain::catalog::Catalog;
use crate::domain::ports::ConfigProvider;
use crate::utils::error::{DashboardError, Result};
use crate::utils::validation::{self, Validate};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;
use std::time::Duration;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DashboardConfig {
    #[serde(default)]
    pub source: SourceConfig,
    #[serde(default)]
    pub view: ViewConfig,
    #[serde(default)]
    pub catalog: CatalogConfig,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SourceConfig {
    pub endpoint: Option<String>,
    pub timeout_seconds: Option<u64>,
    #[serde(default)]
    pub headers: HashMap<String, String>,
    /// JSON file served instead of calling the endpoint.
    pub mock_data: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ViewConfig {
    pub page_size: Option<usize>,
    pub search_debounce_ms: Option<u64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CatalogConfig {
    pub environments: Option<Vec<String>>,
    pub clusters: Option<Vec<String>>,
}

impl DashboardConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(DashboardError::IoError)?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| DashboardError::ConfigError {
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${DASHBOARD_API})，未定義的變數保持原樣
    fn substitute_env_vars(content: &str) -> Result<String> {
        use regex::Regex;
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| DashboardError::ConfigError {
            message: e.to_string(),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    pub fn validate_config(&self) -> Result<()> {
        match &self.source.mock_data {
            Some(path) => validation::validate_mock_data("source.mock_data", path)?,
            None => validation::validate_endpoint("source.endpoint", self.api_endpoint())?,
        }

        if let Some(timeout) = self.source.timeout_seconds {
            validation::validate_range("source.timeout_seconds", timeout, 1, 600)?;
        }

        if let Some(page_size) = self.view.page_size {
            validation::validate_at_least("view.page_size", page_size, 1)?;
        }

        if let Some(debounce) = self.view.search_debounce_ms {
            validation::validate_range("view.search_debounce_ms", debounce, 0, 10_000)?;
        }

        if let Some(environments) = &self.catalog.environments {
            validation::validate_options("catalog.environments", environments)?;
        }
        if let Some(clusters) = &self.catalog.clusters {
            validation::validate_options("catalog.clusters", clusters)?;
        }

        Ok(())
    }

    pub fn mock_data(&self) -> Option<&str> {
        self.source.mock_data.as_deref()
    }

    /// Configured options, falling back to the built-in lists per selector.
    pub fn catalog(&self) -> Catalog {
        let defaults = Catalog::default();
        Catalog::new(
            self.catalog
                .environments
                .clone()
                .unwrap_or(defaults.environments),
            self.catalog.clusters.clone().unwrap_or(defaults.clusters),
        )
    }
}

impl ConfigProvider for DashboardConfig {
    fn api_endpoint(&self) -> Option<&str> {
        self.source.endpoint.as_deref()
    }

    fn request_timeout(&self) -> Option<Duration> {
        self.source.timeout_seconds.map(Duration::from_secs)
    }

    fn extra_headers(&self) -> &HashMap<String, String> {
        &self.source.headers
    }

    fn page_size(&self) -> usize {
        self.view.page_size.unwrap_or(DEFAULT_PAGE_SIZE)
    }

    fn search_debounce(&self) -> Duration {
        self.view
            .search_debounce_ms
            .map(Duration::from_millis)
            .unwrap_or(DEFAULT_SEARCH_DEBOUNCE)
    }
}

impl Validate for DashboardConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}
