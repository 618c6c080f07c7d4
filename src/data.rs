//! Series data storage.
//!
//! Rows are kept for point reconstruction; the x and y columns are kept
//! separately as shared slices so a draw pass can snapshot them without
//! copying.

use crate::error::{Error, Result};
use crate::hit_test::DataRow;
use std::rc::Rc;

/// Immutable series data. Cloning is cheap.
#[derive(Debug, Clone)]
pub struct SeriesData {
    rows: Rc<[DataRow]>,
    x: Rc<[f64]>,
    y: Rc<[f64]>,
}

impl Default for SeriesData {
    fn default() -> Self {
        Self::from_rows(Vec::new())
    }
}

impl SeriesData {
    /// Build from parallel columns.
    ///
    /// # Errors
    ///
    /// Returns [`Error::DataLengthMismatch`] if the columns differ in length.
    pub fn from_xy(x: Vec<f64>, y: Vec<f64>) -> Result<Self> {
        if x.len() != y.len() {
            return Err(Error::DataLengthMismatch {
                x_len: x.len(),
                y_len: y.len(),
            });
        }

        let rows: Rc<[DataRow]> = x
            .iter()
            .zip(&y)
            .map(|(&x, &y)| DataRow::new(x, y))
            .collect();
        Ok(Self {
            rows,
            x: x.into(),
            y: y.into(),
        })
    }

    /// Build from rows.
    #[must_use]
    pub fn from_rows(rows: Vec<DataRow>) -> Self {
        let x = rows.iter().map(|r| r.x).collect();
        let y = rows.iter().map(|r| r.y).collect();
        Self {
            rows: rows.into(),
            x,
            y,
        }
    }

    /// Number of points.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether there are no points.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Data rows.
    #[must_use]
    pub fn rows(&self) -> &[DataRow] {
        &self.rows
    }

    /// Horizontal values.
    #[must_use]
    pub fn x(&self) -> &[f64] {
        &self.x
    }

    /// Vertical values.
    #[must_use]
    pub fn y(&self) -> &[f64] {
        &self.y
    }

    /// Shared handles to both columns.
    #[must_use]
    pub fn columns(&self) -> (Rc<[f64]>, Rc<[f64]>) {
        (Rc::clone(&self.x), Rc::clone(&self.y))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_xy() {
        let data = SeriesData::from_xy(vec![0.0, 1.0], vec![5.0, 6.0]).unwrap();
        assert_eq!(data.len(), 2);
        assert_eq!(data.rows()[1], DataRow::new(1.0, 6.0));
        assert_eq!(data.y(), &[5.0, 6.0]);
    }

    #[test]
    fn test_length_mismatch() {
        let err = SeriesData::from_xy(vec![0.0], vec![]).unwrap_err();
        assert!(matches!(err, Error::DataLengthMismatch { x_len: 1, y_len: 0 }));
    }

    #[test]
    fn test_from_rows_keeps_names() {
        let data = SeriesData::from_rows(vec![DataRow::new(2.0, 3.0).named("a")]);
        assert_eq!(data.x(), &[2.0]);
        assert_eq!(data.rows()[0].name.as_deref(), Some("a"));
    }

    #[test]
    fn test_columns_share_storage() {
        let data = SeriesData::from_xy(vec![1.0], vec![2.0]).unwrap();
        let (x, _) = data.columns();
        assert!(std::ptr::eq(x.as_ptr(), data.x().as_ptr()));
    }
}
