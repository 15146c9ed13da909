use serde::{Deserialize, Serialize};

pub const DEFAULT_ENVIRONMENTS: &[&str] = &["Dev", "Lit", "stg", "CS stg", "prod", "cs prod"];

pub const DEFAULT_CLUSTERS: &[&str] = &[
    "dev",
    "lit",
    "dev_corda",
    "np_dmz",
    "stg",
    "stg_dmz",
    "stg_corda",
    "prod",
    "prod_dmz",
    "prod_corda",
    "cslit",
    "cslit_dmz",
    "csstg",
    "csstg_dmz",
    "csprod",
];

/// Options offered by the environment and cluster selectors.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Catalog {
    pub environments: Vec<String>,
    pub clusters: Vec<String>,
}

impl Default for Catalog {
    fn default() -> Self {
        Self {
            environments: DEFAULT_ENVIRONMENTS.iter().map(|s| s.to_string()).collect(),
            clusters: DEFAULT_CLUSTERS.iter().map(|s| s.to_string()).collect(),
        }
    }
}

impl Catalog {
    pub fn new(environments: Vec<String>, clusters: Vec<String>) -> Self {
        Self {
            environments,
            clusters,
        }
    }

    pub fn search_environments(&self, query: &str) -> Vec<&str> {
        search_options(&self.environments, query)
    }

    pub fn search_clusters(&self, query: &str) -> Vec<&str> {
        search_options(&self.clusters, query)
    }

    pub fn has_cluster(&self, cluster: &str) -> bool {
        self.clusters.iter().any(|c| c.eq_ignore_ascii_case(cluster))
    }
}

fn search_options<'a>(options: &'a [String], query: &str) -> Vec<&'a str> {
    let needle = query.to_lowercase();
    options
        .iter()
        .filter(|option| option.to_lowercase().contains(&needle))
        .map(String::as_str)
        .collect()
}
