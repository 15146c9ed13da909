use crate::domain::model::{Column, SortDirection, ViewSnapshot};
use crate::utils::error::{DashboardError, Result};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Table,
    Csv,
    Tsv,
    Json,
}

pub fn render(snapshot: &ViewSnapshot, format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Table => Ok(render_table(snapshot)),
        OutputFormat::Csv => render_delimited(snapshot, b','),
        OutputFormat::Tsv => render_delimited(snapshot, b'\t'),
        OutputFormat::Json => Ok(serde_json::to_string_pretty(snapshot)?),
    }
}

fn header_label(snapshot: &ViewSnapshot, column: Column) -> String {
    match (snapshot.sort.column, snapshot.sort.direction) {
        (Some(sorted), SortDirection::Ascending) if sorted == column => {
            format!("{} ^", column.header())
        }
        (Some(sorted), SortDirection::Descending) if sorted == column => {
            format!("{} v", column.header())
        }
        _ => column.header().to_string(),
    }
}

/// Fixed-width text table followed by a status line.
pub fn render_table(snapshot: &ViewSnapshot) -> String {
    let headers: Vec<String> = Column::ALL
        .iter()
        .map(|&column| header_label(snapshot, column))
        .collect();

    let mut widths: Vec<usize> = headers.iter().map(|h| h.chars().count()).collect();
    for row in &snapshot.rows {
        for (width, field) in widths.iter_mut().zip(row.fields()) {
            *width = (*width).max(field.chars().count());
        }
    }

    let mut out = String::new();
    let mut push_line = |cells: Vec<&str>| {
        let line: Vec<String> = cells
            .iter()
            .zip(&widths)
            .map(|(cell, &width)| format!("{:<width$}", cell, width = width))
            .collect();
        out.push_str(line.join("  ").trim_end());
        out.push('\n');
    };

    push_line(headers.iter().map(String::as_str).collect());
    let rule: Vec<String> = widths.iter().map(|&w| "-".repeat(w)).collect();
    push_line(rule.iter().map(String::as_str).collect());
    for row in &snapshot.rows {
        push_line(row.fields().to_vec());
    }

    if !snapshot.loading && snapshot.rows.is_empty() {
        out.push_str("No data available\n");
    }
    if snapshot.loading {
        out.push_str("Loading...\n");
    }
    if let Some(error) = &snapshot.error {
        out.push_str(&format!("Error: {}\n", error));
    }

    out.push_str(&format!(
        "Page {} of {} ({} of {} deployments)",
        snapshot.page_index + 1,
        snapshot.page_count,
        snapshot.filtered_rows,
        snapshot.total_rows
    ));
    if let Some(fetched_at) = snapshot.fetched_at {
        out.push_str(&format!(
            " - updated {}",
            fetched_at.format("%Y-%m-%d %H:%M:%S UTC")
        ));
    }
    out.push('\n');
    out
}

fn render_delimited(snapshot: &ViewSnapshot, delimiter: u8) -> Result<String> {
    let mut writer = csv::WriterBuilder::new()
        .delimiter(delimiter)
        .from_writer(Vec::new());

    writer.write_record(Column::ALL.iter().map(|c| c.key()))?;
    for row in &snapshot.rows {
        writer.write_record(row.fields())?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| DashboardError::IoError(e.into_error()))?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::{Row, SortState};

    fn snapshot() -> ViewSnapshot {
        ViewSnapshot {
            cluster: Some("prod".to_string()),
            page_count: 1,
            page_size: 20,
            total_rows: 1,
            filtered_rows: 1,
            rows: vec![Row {
                deployment_name: "svc1".to_string(),
                namespace: "ns1".to_string(),
                main_container_images: "img:a, img:b".to_string(),
                side_container_images: "img:c".to_string(),
            }],
            ..ViewSnapshot::default()
        }
    }

    #[test]
    fn test_table_has_headers_rows_and_footer() {
        let out = render_table(&snapshot());
        let lines: Vec<&str> = out.lines().collect();

        assert!(lines[0].starts_with("DEPLOYMENT NAME  NAMESPACE  MAIN CONTAINER IMAGES"));
        assert!(lines[1].starts_with("---------------"));
        assert!(lines[2].starts_with("svc1"));
        assert!(lines[2].contains("img:a, img:b"));
        assert_eq!(lines[3], "Page 1 of 1 (1 of 1 deployments)");
    }

    #[test]
    fn test_table_marks_sorted_column_and_error() {
        let mut snap = snapshot();
        snap.sort = SortState::by(Column::Namespace, SortDirection::Descending);
        snap.error = Some("HTTP error! status: 500".to_string());
        snap.rows.clear();

        let out = render_table(&snap);
        assert!(out.lines().next().unwrap().contains("NAMESPACE v"));
        assert!(out.contains("Error: HTTP error! status: 500"));
    }

    #[test]
    fn test_empty_page_says_no_data() {
        let mut snap = snapshot();
        snap.rows.clear();
        snap.filtered_rows = 0;

        let out = render_table(&snap);
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines[2], "No data available");
        assert_eq!(lines[3], "Page 1 of 1 (0 of 1 deployments)");

        snap.loading = true;
        let out = render_table(&snap);
        assert!(!out.contains("No data available"));
        assert!(out.contains("Loading..."));
    }

    #[test]
    fn test_csv_quotes_joined_images() {
        let out = render(&snapshot(), OutputFormat::Csv).unwrap();
        assert_eq!(
            out,
            "deployment_name,namespace,main_container_images,side_container_images\n\
             svc1,ns1,\"img:a, img:b\",img:c\n"
        );
    }

    #[test]
    fn test_tsv() {
        let out = render(&snapshot(), OutputFormat::Tsv).unwrap();
        assert_eq!(out.lines().nth(1), Some("svc1\tns1\timg:a, img:b\timg:c"));
    }

    #[test]
    fn test_json_snapshot() {
        let out = render(&snapshot(), OutputFormat::Json).unwrap();
        let value: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert_eq!(value["cluster"], "prod");
        assert_eq!(value["rows"][0]["main_container_images"], "img:a, img:b");
        assert_eq!(value["page_count"], 1);
    }
}
