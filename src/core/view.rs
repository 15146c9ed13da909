use crate::domain::model::{FilterState, Row, SortDirection, SortState};

/// True when the lowercased needle occurs in any field of the row.
/// An empty needle matches every row.
pub fn row_matches(row: &Row, needle: &str) -> bool {
    needle.is_empty()
        || row
            .fields()
            .iter()
            .any(|field| field.to_lowercase().contains(needle))
}

/// Positions of the rows that pass the filter, in input order.
pub fn filter_indices(rows: &[Row], filter: &FilterState) -> Vec<usize> {
    let needle = filter.query.to_lowercase();
    rows.iter()
        .enumerate()
        .filter(|(_, row)| row_matches(row, &needle))
        .map(|(index, _)| index)
        .collect()
}

/// Orders `indices` by the sort column. Ascending is a stable sort on the
/// field text; descending is its exact reverse.
pub fn sort_indices(rows: &[Row], indices: &mut [usize], sort: &SortState) {
    let Some(column) = sort.column else {
        return;
    };

    indices.sort_by(|&a, &b| rows[a].field(column).cmp(rows[b].field(column)));
    if sort.direction == SortDirection::Descending {
        indices.reverse();
    }
}

/// Filter then sort, leaving `rows` untouched.
pub fn derive_view(rows: &[Row], filter: &FilterState, sort: &SortState) -> Vec<usize> {
    let mut indices = filter_indices(rows, filter);
    sort_indices(rows, &mut indices, sort);
    indices
}
