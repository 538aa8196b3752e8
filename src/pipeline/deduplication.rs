//! Exact-duplicate detection and removal.
//!
//! Two rows are duplicates when their full tuples are equal across every
//! column, derived ones included. Null cells compare equal to each other.

use crate::table::{AlarmTable, Cell};
use std::collections::{HashMap, HashSet};
use tracing::info;

/// Rows whose tuple occurs more than once, every occurrence, in table order
pub fn duplicate_snapshot(table: &AlarmTable) -> AlarmTable {
    let rows = duplicated_rows(table);
    table.take_rows(&rows)
}

/// Indices of every row whose tuple occurs more than once
pub fn duplicated_rows(table: &AlarmTable) -> Vec<usize> {
    let tuples: Vec<Vec<Cell<'_>>> = (0..table.height()).map(|i| table.row(i)).collect();

    let mut counts: HashMap<&[Cell<'_>], usize> = HashMap::new();
    for tuple in &tuples {
        *counts.entry(tuple.as_slice()).or_insert(0) += 1;
    }

    tuples
        .iter()
        .enumerate()
        .filter(|(_, tuple)| counts[tuple.as_slice()] > 1)
        .map(|(i, _)| i)
        .collect()
}

/// Keep the first occurrence of every distinct tuple, preserving order
pub fn remove_duplicates(table: &AlarmTable) -> AlarmTable {
    let mut seen: HashSet<Vec<Cell<'_>>> = HashSet::with_capacity(table.height());
    let keep: Vec<usize> = (0..table.height())
        .filter(|&i| seen.insert(table.row(i)))
        .collect();

    let removed = table.height() - keep.len();
    info!(
        "Deduplication complete: removed {} duplicate rows, {} rows remaining",
        removed,
        keep.len()
    );

    table.take_rows(&keep)
}

/// Analyze duplicate patterns in a table
///
/// # Returns
///
/// Tuple of (distinct_tuples, duplicate_groups, surplus_rows)
pub fn analyze_duplicate_patterns(table: &AlarmTable) -> (usize, usize, usize) {
    let mut counts: HashMap<Vec<Cell<'_>>, usize> = HashMap::new();
    for i in 0..table.height() {
        *counts.entry(table.row(i)).or_insert(0) += 1;
    }

    let distinct = counts.len();
    let groups = counts.values().filter(|&&count| count > 1).count();
    let surplus = counts.values().map(|&count| count.saturating_sub(1)).sum();

    (distinct, groups, surplus)
}

/// Get deduplication effectiveness metrics
///
/// # Returns
///
/// Tuple of (reduction_percentage, rows_removed)
pub fn duplicate_metrics(input_count: usize, output_count: usize) -> (f64, usize) {
    let removed = input_count.saturating_sub(output_count);
    let reduction_percentage = if input_count > 0 {
        (removed as f64 / input_count as f64) * 100.0
    } else {
        0.0
    };

    (reduction_percentage, removed)
}
