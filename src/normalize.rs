//! Per-column value normalization, applied after schema enforcement.
//!
//! Date columns run the multi-format date chain, with a surviving bare zero
//! rewritten to the fill value as an explicit null date. Blank currencies
//! default to `USD`. Identifier columns lose the `.0` float-rendering
//! artifact so whole-number ids never print as floats, and a profile may ask
//! for leading-zero stripping on specific fields.

use crate::{
    aliases::{CanonicalField, Profile},
    data::Cell,
    dates::{self, EpochMode},
    schema::FillPolicy,
    table::Table,
};

pub const DEFAULT_CURRENCY: &str = "USD";

pub fn normalize(table: &mut Table, epoch: EpochMode, fill: FillPolicy, profile: Option<&Profile>) {
    for column in &mut table.columns {
        let Some(field) = field_of(&column.label) else {
            continue;
        };
        if field.is_date() {
            for value in &mut column.values {
                let normalized = dates::normalize_date(value, epoch);
                *value = if is_null_date(&normalized) {
                    Cell::text(fill.as_str())
                } else {
                    normalized
                };
            }
        }
        if field == CanonicalField::Currency {
            for value in &mut column.values {
                if value.is_blank() {
                    *value = Cell::text(DEFAULT_CURRENCY);
                }
            }
        }
        if field.is_identifier() {
            for value in &mut column.values {
                if let Cell::Number(n) = value {
                    if n.fract() == 0.0 && n.is_finite() {
                        *value = Cell::text(format!("{}", *n as i64));
                    }
                }
            }
        }
        if profile.is_some_and(|p| p.strip_leading_zeros.contains(&field)) {
            for value in &mut column.values {
                if let Cell::Text(s) = value {
                    *s = s.trim_start_matches('0').to_string();
                }
            }
        }
    }
}

/// A date cell that came back as a bare zero marks "no date" in several
/// source systems.
fn is_null_date(cell: &Cell) -> bool {
    match cell {
        Cell::Number(n) => *n == 0.0,
        Cell::Text(s) => s == "0",
    }
}

fn field_of(label: &str) -> Option<CanonicalField> {
    CanonicalField::ALL
        .into_iter()
        .find(|field| field.as_str() == label)
}
