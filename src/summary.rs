//! Descriptive statistics over a generated score matrix.

use itertools::Itertools;
use serde::Serialize;

use crate::scores::ScoreMatrix;

/// Number of rows holding one score value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValueCount {
    pub value: String,
    pub count: usize,
}

/// Summary of one processing request.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Summary {
    /// Number of score columns
    pub distinct_values: usize,
    pub rows: usize,
    pub missing_values: usize,
    /// `missing_values / rows`, `0.0` for an empty table
    pub missing_value_rate: f64,
    /// Share of rows without abstract, absent when no corpus was generated
    pub missing_abstract_rate: Option<f64>,
    /// Most frequent values, by count descending
    pub top_values: Vec<ValueCount>,
    /// Columns not listed in `top_values`
    pub remaining_values: usize,
}

impl Summary {
    pub fn missing_value_percent(&self) -> f64 {
        self.missing_value_rate * 100.0
    }

    pub fn missing_abstract_percent(&self) -> Option<f64> {
        self.missing_abstract_rate.map(|rate| rate * 100.0)
    }
}

fn rate(count: usize, total: usize) -> f64 {
    if total == 0 {
        0.0
    } else {
        count as f64 / total as f64
    }
}

/// Computes the summary; ties in the top list keep column order.
pub fn summarize(
    matrix: &ScoreMatrix,
    missing_values: usize,
    missing_abstracts: Option<usize>,
    top_n: usize,
) -> Summary {
    let rows = matrix.row_count();
    let top_values: Vec<ValueCount> = matrix
        .columns()
        .iter()
        .zip(matrix.column_sums())
        .sorted_by(|(_, a), (_, b)| b.cmp(a))
        .take(top_n)
        .map(|(value, count)| ValueCount {
            value: value.clone(),
            count,
        })
        .collect();

    Summary {
        distinct_values: matrix.column_count(),
        rows,
        missing_values,
        missing_value_rate: rate(missing_values, rows),
        missing_abstract_rate: missing_abstracts.map(|missing| rate(missing, rows)),
        remaining_values: matrix.column_count() - top_values.len(),
        top_values,
    }
}
