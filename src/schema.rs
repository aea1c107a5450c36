//! Canonical schema enforcement: presence, fill, and order.
//!
//! After materialization a table holds whatever columns the source offered,
//! under canonical labels where recognized. Enforcement turns that into the
//! fixed output shape: the supplier number must be present, every other
//! missing canonical column is injected with a fill value, pass-through
//! columns are dropped, and the survivors are ordered canonically.

use log::debug;

use crate::{
    aliases::CanonicalField,
    error::ConvertError,
    table::{Column, Table},
};

/// Fill value for canonical columns the source did not provide. The export
/// consumers historically accepted both conventions; empty is the default,
/// the `NULL` literal is selectable per deployment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FillPolicy {
    #[default]
    Empty,
    NullMarker,
}

impl FillPolicy {
    pub fn as_str(self) -> &'static str {
        match self {
            FillPolicy::Empty => "",
            FillPolicy::NullMarker => "NULL",
        }
    }
}

/// Rewrite `table` into canonical shape, or fail the file.
pub fn enforce(table: Table, fill: FillPolicy) -> Result<Table, ConvertError> {
    let rows = table.row_count();

    if table.column(CanonicalField::REQUIRED.as_str()).is_none() {
        return Err(ConvertError::MissingRequiredColumn {
            field: CanonicalField::REQUIRED.as_str(),
        });
    }

    let pass_through = table
        .columns
        .iter()
        .filter(|col| !is_canonical_label(&col.label))
        .count();
    if pass_through > 0 {
        debug!("dropping {pass_through} unrecognized column(s)");
    }

    let mut ordered = Vec::with_capacity(CanonicalField::ALL.len());
    for field in CanonicalField::ALL {
        match table.column(field.as_str()) {
            Some(column) => ordered.push(column.clone()),
            None => {
                debug!("filling absent column '{field}'");
                ordered.push(Column::filled(field.as_str(), fill.as_str(), rows));
            }
        }
    }

    let enforced = Table { columns: ordered };
    if enforced.width() < CanonicalField::ALL.len() {
        return Err(ConvertError::SchemaTooNarrow {
            expected: CanonicalField::ALL.len(),
            actual: enforced.width(),
        });
    }

    Ok(enforced)
}

fn is_canonical_label(label: &str) -> bool {
    CanonicalField::ALL
        .iter()
        .any(|field| field.as_str() == label)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::Cell;

    fn column(label: &str, values: &[&str]) -> Column {
        Column {
            label: label.to_string(),
            values: values.iter().map(|v| Cell::text(*v)).collect(),
        }
    }

    fn sample_table() -> Table {
        Table {
            columns: vec![
                column("Amount", &["10.00", "20.00"]),
                column("Supplier Number", &["4711", "4712"]),
                column("Supplier Name", &["Acme", "Globex"]),
                column("Batch Tag", &["a", "b"]),
            ],
        }
    }

    #[test]
    fn fills_missing_columns_and_orders_canonically() {
        let enforced = enforce(sample_table(), FillPolicy::Empty).unwrap();
        assert_eq!(enforced.width(), CanonicalField::ALL.len());
        assert_eq!(
            enforced.labels(),
            [
                "Supplier Name",
                "Supplier Number",
                "Reference",
                "Amount",
                "Currency",
                "Invoice Date",
                "Payment Date",
                "Entered Date",
            ]
        );
        // Injected columns carry the fill value for every row.
        assert_eq!(
            enforced.column("Reference").unwrap().values,
            vec![Cell::text(""), Cell::text("")]
        );
        // Pass-through columns are gone.
        assert!(enforced.column("Batch Tag").is_none());
    }

    #[test]
    fn null_marker_policy_fills_with_literal() {
        let enforced = enforce(sample_table(), FillPolicy::NullMarker).unwrap();
        assert_eq!(
            enforced.column("Invoice Date").unwrap().values,
            vec![Cell::text("NULL"), Cell::text("NULL")]
        );
    }

    #[test]
    fn missing_supplier_number_is_a_hard_failure() {
        let table = Table {
            columns: vec![
                column("Supplier Name", &["Acme"]),
                column("Amount", &["10.00"]),
            ],
        };
        assert_eq!(
            enforce(table, FillPolicy::Empty).unwrap_err(),
            ConvertError::MissingRequiredColumn {
                field: "Supplier Number"
            }
        );
    }

    #[test]
    fn enforce_is_idempotent() {
        let once = enforce(sample_table(), FillPolicy::Empty).unwrap();
        let twice = enforce(once.clone(), FillPolicy::Empty).unwrap();
        assert_eq!(once, twice);
    }
}
