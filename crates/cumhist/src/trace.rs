//! Materialised one-hot trace of the map stage.

use std::fmt;

use ndarray::{Array2, ArrayView1, ArrayView2, Axis};

use crate::histogram::write_bracketed;

/// One row per input value, one column per bucket.
///
/// Row `i` holds a single `1` at the bucket of input `i` and `0` elsewhere.
/// Storage is row-major, so contiguous input sub-ranges map to contiguous
/// row blocks that can be written by independent tasks.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OneHotTrace {
    rows: Array2<u8>,
}

impl OneHotTrace {
    /// All-zero trace with `n_values` rows and `n_buckets` columns.
    pub fn zeros(n_values: usize, n_buckets: usize) -> Self {
        Self {
            rows: Array2::zeros((n_values, n_buckets)),
        }
    }

    /// Number of rows (input values).
    #[inline]
    pub fn n_values(&self) -> usize {
        self.rows.nrows()
    }

    #[inline]
    pub fn n_buckets(&self) -> usize {
        self.rows.ncols()
    }

    pub fn view(&self) -> ArrayView2<'_, u8> {
        self.rows.view()
    }

    pub(crate) fn as_array_mut(&mut self) -> &mut Array2<u8> {
        &mut self.rows
    }

    /// One-hot row of input `index`.
    pub fn row(&self, index: usize) -> ArrayView1<'_, u8> {
        self.rows.row(index)
    }

    /// Bucket marked in row `index`, if the row is one-hot.
    pub fn bucket_of(&self, index: usize) -> Option<usize> {
        let row = self.rows.row(index);
        let mut hot = row.iter().enumerate().filter(|&(_, &v)| v != 0);
        match (hot.next(), hot.next()) {
            (Some((bucket, &1)), None) => Some(bucket),
            _ => None,
        }
    }

    /// Whether every row has exactly one `1` and zeros elsewhere.
    pub fn is_one_hot(&self) -> bool {
        (0..self.n_values()).all(|i| self.bucket_of(i).is_some())
    }

    /// Iterate rows in input order.
    pub fn rows(&self) -> impl Iterator<Item = ArrayView1<'_, u8>> {
        self.rows.axis_iter(Axis(0))
    }
}

impl fmt::Display for OneHotTrace {
    /// One bracketed row per line.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, row) in self.rows().enumerate() {
            if i > 0 {
                f.write_str("\n")?;
            }
            write_bracketed(f, row.iter())?;
        }
        Ok(())
    }
}
