use crate::utils::error::{DashboardError, Result};
use std::collections::HashSet;
use std::path::Path;
use url::Url;

pub trait Validate {
    fn validate(&self) -> Result<()>;
}

fn invalid(field: &str, value: impl ToString, reason: impl Into<String>) -> DashboardError {
    DashboardError::InvalidConfigValueError {
        field: field.to_string(),
        value: value.to_string(),
        reason: reason.into(),
    }
}

/// The API endpoint must be present and an absolute http(s) URL with a host.
pub fn validate_endpoint(field: &str, endpoint: Option<&str>) -> Result<()> {
    let endpoint = endpoint.ok_or_else(|| DashboardError::MissingConfigError {
        field: field.to_string(),
    })?;

    let url = Url::parse(endpoint)
        .map_err(|e| invalid(field, endpoint, format!("Invalid URL format: {}", e)))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(invalid(
            field,
            endpoint,
            format!("Unsupported URL scheme: {}", url.scheme()),
        ));
    }
    if url.host_str().is_none() {
        return Err(invalid(field, endpoint, "URL has no host"));
    }
    Ok(())
}

/// Mock data has to be an existing file so a typo fails at startup rather
/// than on the first cluster selection.
pub fn validate_mock_data(field: &str, path: &str) -> Result<()> {
    if path.trim().is_empty() {
        return Err(invalid(field, path, "Path cannot be empty"));
    }
    if !Path::new(path).is_file() {
        return Err(invalid(field, path, "No such file"));
    }
    Ok(())
}

pub fn validate_at_least<T: PartialOrd + std::fmt::Display>(field: &str, value: T, min: T) -> Result<()> {
    if value < min {
        return Err(invalid(field, &value, format!("Value must be at least {}", min)));
    }
    Ok(())
}

pub fn validate_range<T: PartialOrd + std::fmt::Display>(
    field: &str,
    value: T,
    min: T,
    max: T,
) -> Result<()> {
    if value < min || value > max {
        return Err(invalid(
            field,
            &value,
            format!("Value must be between {} and {}", min, max),
        ));
    }
    Ok(())
}

/// Selector options: no blank entries, no duplicates ignoring case.
pub fn validate_options(field: &str, options: &[String]) -> Result<()> {
    let mut seen = HashSet::new();
    for option in options {
        if option.trim().is_empty() {
            return Err(invalid(field, option, "Option cannot be empty or whitespace-only"));
        }
        if !seen.insert(option.to_lowercase()) {
            return Err(invalid(field, option, "Duplicate option"));
        }
    }
    Ok(())
}
