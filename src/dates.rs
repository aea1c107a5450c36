//! Multi-format date normalization.
//!
//! Source systems emit dates as spreadsheet serial numbers, digit blocks
//! with or without separators, and abbreviated-month forms. The chain below
//! tries a fixed sequence of probes and returns `MM/DD/YYYY` on the first
//! hit; the priority order is part of the contract, because several inputs
//! are syntactically valid under more than one pattern (an 8-digit block
//! parses year-first before month-first ever runs). Every probe returns
//! `Option`, so a miss is a value, not an error.

use chrono::{Duration, NaiveDate};

use crate::data::Cell;

/// Which serial-number convention a workbook uses for dates. Constant per
/// file, supplied by the workbook reader.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EpochMode {
    /// Serial 1 is 1900-01-01, with the fictitious 1900-02-29 at serial 60.
    #[default]
    Epoch1900,
    /// Serial 0 is 1904-01-01.
    Epoch1904,
}

impl EpochMode {
    pub fn from_flag(flag: u8) -> Self {
        if flag == 0 {
            EpochMode::Epoch1900
        } else {
            EpochMode::Epoch1904
        }
    }
}

const OUTPUT_FORMAT: &str = "%m/%d/%Y";

/// Serial upper bound: year 10000 in either epoch.
const MAX_SERIAL: f64 = 2_958_466.0;

/// Normalize one date cell. Returns the formatted date on any probe hit,
/// otherwise the original cell unchanged.
pub fn normalize_date(cell: &Cell, epoch: EpochMode) -> Cell {
    // Serial interpretation only applies to cells that were numeric in the
    // source; a digit string is a written-out date, not a serial.
    if let Some(serial) = cell.as_number() {
        if let Some(date) = serial_to_date(serial, epoch) {
            return Cell::text(date.format(OUTPUT_FORMAT).to_string());
        }
    }

    let text = coerce_to_digits(cell);
    let text = text.replace('-', "");

    let probes: [fn(&str) -> Option<NaiveDate>; 5] = [
        probe_day_month_abbrev,
        probe_month_abbrev_day,
        probe_year_first_digits,
        probe_month_first_digits,
        probe_slash_separated,
    ];
    for probe in probes {
        if let Some(date) = probe(&text) {
            return Cell::text(date.format(OUTPUT_FORMAT).to_string());
        }
    }
    cell.clone()
}

/// Convert a spreadsheet serial number into a calendar date.
pub fn serial_to_date(serial: f64, epoch: EpochMode) -> Option<NaiveDate> {
    if !serial.is_finite() || serial >= MAX_SERIAL {
        return None;
    }
    let days = serial.trunc() as i64;
    let base = match epoch {
        EpochMode::Epoch1900 => {
            if days < 1 {
                return None;
            }
            // Serials below 60 predate the fictitious leap day and sit one
            // day closer to the epoch.
            if days < 60 {
                NaiveDate::from_ymd_opt(1899, 12, 31)?
            } else {
                NaiveDate::from_ymd_opt(1899, 12, 30)?
            }
        }
        EpochMode::Epoch1904 => {
            if days < 0 {
                return None;
            }
            NaiveDate::from_ymd_opt(1904, 1, 1)?
        }
    };
    base.checked_add_signed(Duration::days(days))
}

/// An integral numeric cell (or an integer string, leading zeros and all)
/// collapses to its plain digit form before the pattern probes run. This
/// drops the `.0` float-rendering artifact.
fn coerce_to_digits(cell: &Cell) -> String {
    match cell {
        Cell::Number(n) if n.fract() == 0.0 && n.is_finite() => format!("{}", *n as i64),
        Cell::Number(n) => n.to_string(),
        Cell::Text(s) => match s.trim().parse::<i64>() {
            Ok(value) => value.to_string(),
            Err(_) => s.clone(),
        },
    }
}

/// `05Jan16` and friends.
fn probe_day_month_abbrev(text: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(text, "%d%b%y").ok()
}

/// `Jan0516` and friends.
fn probe_month_abbrev_day(text: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(text, "%b%d%y").ok()
}

/// Unseparated year-first digit blocks: `20150315`, or `150315` with a
/// two-digit year.
fn probe_year_first_digits(text: &str) -> Option<NaiveDate> {
    if !text.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    match text.len() {
        8 => {
            let year = text[..4].parse().ok()?;
            from_parts(year, &text[4..6], &text[6..8])
        }
        6 => {
            let year = expand_two_digit_year(text[..2].parse().ok()?);
            from_parts(year, &text[2..4], &text[4..6])
        }
        _ => None,
    }
}

/// Unseparated month-first digit blocks: `03152015`.
fn probe_month_first_digits(text: &str) -> Option<NaiveDate> {
    if text.len() != 8 || !text.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    let year = text[4..8].parse().ok()?;
    from_parts(year, &text[..2], &text[2..4])
}

/// `2015/03/15`.
fn probe_slash_separated(text: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(text, "%Y/%m/%d").ok()
}

fn from_parts(year: i32, month: &str, day: &str) -> Option<NaiveDate> {
    NaiveDate::from_ymd_opt(year, month.parse().ok()?, day.parse().ok()?)
}

/// Same pivot as `%y` parsing: 00-68 land in the 2000s.
fn expand_two_digit_year(two_digit: i32) -> i32 {
    if two_digit <= 68 {
        2000 + two_digit
    } else {
        1900 + two_digit
    }
}
