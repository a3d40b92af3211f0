//! Fixed-width interval bucketing of numeric value columns.
//!
//! Values are assigned to left-inclusive, right-exclusive ranges whose bounds
//! are multiples of the interval width, labelled `"<low>-<high>"`. Missing
//! values count as `0` and the bucket starting at `0` is labelled `"N/A"`.
//!
//! ```
//! use bibscores::bucket::bucketize;
//!
//! let labels = bucketize(&[Some("2018"), Some("2019"), Some("2021")], 2).unwrap();
//! assert_eq!(labels, ["2018-2020", "2018-2020", "2020-2022"]);
//! ```

use crate::ingest::UnifiedTable;
use crate::utils::leading_integer;
use crate::{Result, ScoresError, ValueKey};

/// Label used for the bucket holding missing values.
pub const NOT_AVAILABLE: &str = "N/A";

/// Ascending interval bounds covering a column's range.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Intervals {
    edges: Vec<i64>,
}

impl Intervals {
    /// Builds the multiples of `width` from `min - width` to `max + width` inclusive.
    ///
    /// # Errors
    ///
    /// Returns [`ScoresError::InvalidInterval`] if `width` is not positive or
    /// the bounds do not fit in an `i64`.
    pub fn new(min: i64, max: i64, width: i64) -> Result<Self> {
        if width <= 0 {
            return Err(ScoresError::InvalidInterval(width));
        }
        let low = min.saturating_sub(width);
        let high = max.saturating_add(width);
        let first_multiple = low.div_euclid(width) + i64::from(low.rem_euclid(width) != 0);
        let first = first_multiple
            .checked_mul(width)
            .ok_or(ScoresError::InvalidInterval(width))?;
        let last = high
            .div_euclid(width)
            .checked_mul(width)
            .ok_or(ScoresError::InvalidInterval(width))?;

        let edges = std::iter::successors(Some(first), |edge| {
            edge.checked_add(width).filter(|next| *next <= last)
        })
        .collect();
        Ok(Self { edges })
    }

    pub fn edges(&self) -> &[i64] {
        &self.edges
    }

    /// The `[low, high)` bounds containing `value`, if covered.
    pub fn bounds(&self, value: i64) -> Option<(i64, i64)> {
        let index = self.edges.partition_point(|edge| *edge <= value);
        if index == 0 || index >= self.edges.len() {
            return None;
        }
        Some((self.edges[index - 1], self.edges[index]))
    }

    /// Label of the bucket containing `value`.
    pub fn label(&self, value: i64) -> String {
        match self.bounds(value) {
            Some((0, _)) | None => NOT_AVAILABLE.to_string(),
            Some((low, high)) => format!("{low}-{high}"),
        }
    }
}

/// Replaces each value with the label of its interval.
///
/// # Errors
///
/// Returns [`ScoresError::InvalidInterval`] for a non-positive width and
/// [`ScoresError::InvalidValue`] for a value that is not an integer.
pub fn bucketize(values: &[Option<&str>], width: i64) -> Result<Vec<String>> {
    let numbers = values
        .iter()
        .map(|value| match value {
            None => Ok(0),
            Some(raw) => leading_integer(raw).ok_or_else(|| ScoresError::InvalidValue {
                value: raw.to_string(),
                message: "interval buckets need integer values".to_string(),
            }),
        })
        .collect::<Result<Vec<i64>>>()?;

    let (Some(min), Some(max)) = (numbers.iter().min(), numbers.iter().max()) else {
        return Ok(Vec::new());
    };
    let intervals = Intervals::new(*min, *max, width)?;
    tracing::debug!("Interval bounds: {:?}", intervals.edges());

    Ok(numbers.into_iter().map(|n| intervals.label(n)).collect())
}

/// Result of a bucketing request on a table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BucketOutcome {
    Applied,
    /// Key is not numeric, values left untouched
    Skipped { key: ValueKey },
}

/// Rewrites the table's value column into interval labels when `key` is numeric.
pub fn bucketize_table(
    table: &mut UnifiedTable,
    key: ValueKey,
    width: i64,
) -> Result<BucketOutcome> {
    if !key.is_numeric() {
        tracing::warn!(
            "Intervals unavailable for {}. Creating standard scores file.",
            key
        );
        return Ok(BucketOutcome::Skipped { key });
    }
    let labels = bucketize(&table.values(), width)?;
    table.set_values(labels)?;
    Ok(BucketOutcome::Applied)
}
