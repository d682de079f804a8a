//! Numeric coercion and mean imputation.

use crate::data::{Cell, Table};
use crate::{Error, Result};

/// Coerce the named columns to numeric in place.
///
/// Values that fail coercion become missing and are replaced by the column
/// mean computed over the values that did coerce. Means are per-table: train
/// and test tables cleaned separately use their own statistics.
pub fn clean_numeric(table: &mut Table, numeric_columns: &[String]) -> Result<()> {
    for name in numeric_columns {
        let col = table
            .column_index(name)
            .ok_or_else(|| Error::ColumnNotFound(name.clone()))?;

        let parsed: Vec<Option<f64>> = table.column(col).map(Cell::to_numeric).collect();
        let valid: Vec<f64> = parsed.iter().flatten().copied().collect();
        if valid.is_empty() {
            return Err(Error::Data(format!(
                "numeric column {name:?} has no parsable values to average"
            )));
        }
        let mean = valid.iter().sum::<f64>() / valid.len() as f64;

        for (row, value) in parsed.iter().enumerate() {
            table.set(row, col, Cell::Float(value.unwrap_or(mean)));
        }
    }
    Ok(())
}


#[cfg(test)]
mod property_tests {
    use super::*;
    use proptest::prelude::*;

    fn table_of(values: &[String]) -> Table {
        let mut t = Table::new(vec!["c".to_string()]);
        for v in values {
            t.push_row(vec![Cell::Text(v.clone())]).unwrap();
        }
        t
    }

    proptest! {
        #[test]
        fn prop_cleaning_leaves_no_missing_entries(
            numbers in prop::collection::vec(-1e6f64..1e6, 1..50),
            junk in prop::collection::vec("[a-z]{1,8}", 0..10),
        ) {
            let mut values: Vec<String> = numbers.iter().map(|v| v.to_string()).collect();
            values.extend(junk);
            let mut t = table_of(&values);
            clean_numeric(&mut t, &["c".to_string()]).unwrap();
            prop_assert_eq!(
                t.column(0).filter(|cell| cell.to_numeric().is_none()).count(),
                0
            );
        }

        #[test]
        fn prop_imputed_mean_stays_within_observed_range(
            numbers in prop::collection::vec(-1e6f64..1e6, 2..50),
        ) {
            let mut values: Vec<String> = numbers.iter().map(|v| v.to_string()).collect();
            values.push("junk".to_string());
            let mut t = table_of(&values);
            clean_numeric(&mut t, &["c".to_string()]).unwrap();

            let imputed = t.rows()[numbers.len()][0].to_numeric().unwrap();
            let min = numbers.iter().copied().fold(f64::INFINITY, f64::min);
            let max = numbers.iter().copied().fold(f64::NEG_INFINITY, f64::max);
            prop_assert!(imputed >= min - 1e-6 && imputed <= max + 1e-6);
        }
    }
}
