//! In-memory tabular data.

use ndarray::Array2;
use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// A single table value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Cell {
    Float(f64),
    Text(String),
    Missing,
}

impl Cell {
    /// Numeric coercion: floats pass through, text is parsed, everything else
    /// is missing.
    pub fn to_numeric(&self) -> Option<f64> {
        match self {
            Cell::Float(v) => Some(*v),
            Cell::Text(s) => s.trim().parse::<f64>().ok(),
            Cell::Missing => None,
        }
    }

    pub fn is_missing(&self) -> bool {
        matches!(self, Cell::Missing)
    }
}

/// Rows by named columns, materialized from an external source.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Table {
    names: Vec<String>,
    rows: Vec<Vec<Cell>>,
}

impl Table {
    /// Empty table with the given column names.
    pub fn new(names: Vec<String>) -> Self {
        Self {
            names,
            rows: Vec::new(),
        }
    }

    pub fn column_names(&self) -> &[String] {
        &self.names
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.names.iter().position(|n| n == name)
    }

    pub fn n_rows(&self) -> usize {
        self.rows.len()
    }

    pub fn n_cols(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn rows(&self) -> &[Vec<Cell>] {
        &self.rows
    }

    /// Iterate one column's cells, top to bottom.
    pub fn column(&self, index: usize) -> impl Iterator<Item = &Cell> {
        self.rows.iter().map(move |r| &r[index])
    }

    pub fn push_row(&mut self, row: Vec<Cell>) -> Result<()> {
        if row.len() != self.names.len() {
            return Err(Error::Data(format!(
                "row has {} values, table has {} columns",
                row.len(),
                self.names.len()
            )));
        }
        self.rows.push(row);
        Ok(())
    }

    pub fn set(&mut self, row: usize, col: usize, cell: Cell) {
        self.rows[row][col] = cell;
    }

    /// Concatenate another table's rows below this one's. Column names must
    /// match exactly, in order.
    pub fn append(&mut self, other: Table) -> Result<()> {
        if self.names != other.names {
            return Err(Error::Data(format!(
                "inconsistent columns: {:?} vs {:?}",
                self.names, other.names
            )));
        }
        self.rows.extend(other.rows);
        Ok(())
    }

    /// Sub-table with the requested columns, preserving the requested order.
    pub fn select_columns(&self, names: &[String]) -> Result<Table> {
        let indices: Vec<usize> = names
            .iter()
            .map(|n| {
                self.column_index(n)
                    .ok_or_else(|| Error::ColumnNotFound(n.clone()))
            })
            .collect::<Result<_>>()?;
        let rows = self
            .rows
            .iter()
            .map(|row| indices.iter().map(|&i| row[i].clone()).collect())
            .collect();
        Ok(Table {
            names: names.to_vec(),
            rows,
        })
    }

    /// Dense feature matrix. Every cell must coerce to numeric, which holds
    /// for feature columns after cleaning.
    pub fn to_matrix(&self) -> Result<Array2<f64>> {
        let mut flat = Vec::with_capacity(self.n_rows() * self.n_cols());
        for (i, row) in self.rows.iter().enumerate() {
            for (j, cell) in row.iter().enumerate() {
                let value = cell.to_numeric().ok_or_else(|| {
                    Error::Data(format!(
                        "non-numeric value in column {:?} at row {i}: {cell:?}",
                        self.names[j]
                    ))
                })?;
                flat.push(value);
            }
        }
        Array2::from_shape_vec((self.n_rows(), self.n_cols()), flat)
            .map_err(|e| Error::Data(e.to_string()))
    }

    /// A copy of the first `n` rows, for report examples.
    pub fn head(&self, n: usize) -> Table {
        Table {
            names: self.names.clone(),
            rows: self.rows.iter().take(n).cloned().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn cell_numeric_coercion() {
        assert_eq!(Cell::Float(2.5).to_numeric(), Some(2.5));
        assert_eq!(Cell::Text("3.5".to_string()).to_numeric(), Some(3.5));
        assert_eq!(Cell::Text(" 4 ".to_string()).to_numeric(), Some(4.0));
        assert_eq!(Cell::Text("n/a".to_string()).to_numeric(), None);
        assert_eq!(Cell::Text(String::new()).to_numeric(), None);
        assert_eq!(Cell::Missing.to_numeric(), None);
    }

    #[test]
    fn push_row_checks_width() {
        let mut t = Table::new(names(&["a", "b"]));
        assert!(t.push_row(vec![Cell::Float(1.0)]).is_err());
        assert!(t.push_row(vec![Cell::Float(1.0), Cell::Float(2.0)]).is_ok());
        assert_eq!(t.n_rows(), 1);
    }

    #[test]
    fn append_requires_matching_columns() {
        let mut a = Table::new(names(&["x", "y"]));
        a.push_row(vec![Cell::Float(1.0), Cell::Float(2.0)]).unwrap();
        let mut b = Table::new(names(&["x", "y"]));
        b.push_row(vec![Cell::Float(3.0), Cell::Float(4.0)]).unwrap();
        a.append(b).unwrap();
        assert_eq!(a.n_rows(), 2);

        let c = Table::new(names(&["x", "z"]));
        assert!(a.append(c).is_err());
    }

    #[test]
    fn select_columns_preserves_order() {
        let mut t = Table::new(names(&["a", "b", "c"]));
        t.push_row(vec![Cell::Float(1.0), Cell::Float(2.0), Cell::Float(3.0)])
            .unwrap();
        let sub = t.select_columns(&names(&["c", "a"])).unwrap();
        assert_eq!(sub.column_names(), ["c", "a"]);
        assert_eq!(sub.rows()[0], vec![Cell::Float(3.0), Cell::Float(1.0)]);
    }

    #[test]
    fn select_columns_missing_is_an_error() {
        let t = Table::new(names(&["a"]));
        let err = t.select_columns(&names(&["nope"])).unwrap_err();
        assert!(matches!(err, Error::ColumnNotFound(_)));
    }

    #[test]
    fn to_matrix_round_trip() {
        let mut t = Table::new(names(&["a", "b"]));
        t.push_row(vec![Cell::Float(1.0), Cell::Text("2".to_string())])
            .unwrap();
        t.push_row(vec![Cell::Float(3.0), Cell::Float(4.0)]).unwrap();
        let m = t.to_matrix().unwrap();
        assert_eq!(m.shape(), [2, 2]);
        assert_eq!(m[[0, 1]], 2.0);
        assert_eq!(m[[1, 0]], 3.0);
    }

    #[test]
    fn to_matrix_rejects_non_numeric() {
        let mut t = Table::new(names(&["a"]));
        t.push_row(vec![Cell::Text("oops".to_string())]).unwrap();
        let err = t.to_matrix().unwrap_err();
        assert!(err.to_string().contains("non-numeric"));
    }

    #[test]
    fn head_clones_first_rows() {
        let mut t = Table::new(names(&["a"]));
        for i in 0..5 {
            t.push_row(vec![Cell::Float(f64::from(i))]).unwrap();
        }
        let head = t.head(2);
        assert_eq!(head.n_rows(), 2);
        assert_eq!(head.column_names(), t.column_names());
        assert_eq!(head.rows()[1], vec![Cell::Float(1.0)]);
    }
}
