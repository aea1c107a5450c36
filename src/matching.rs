//! Fuzzy string matching and header canonicalization.
//!
//! Similarity is a normalized edit-distance ratio in `[0, 100]`, computed
//! case-insensitively with `similar`. Header resolution walks the alias
//! table in declared order and returns the first field with an alias at or
//! above the benchmark; the scan order is the tie-break, deliberately, so
//! two runs over the same table always resolve an ambiguous header the same
//! way.

use similar::TextDiff;

use crate::aliases::{AliasTable, CanonicalField};

/// Benchmark for resolving a raw header against an alias. Strict on purpose:
/// a near miss that lands in the wrong canonical column is worse than an
/// unrecognized header routed to manual review.
pub const HEADER_BENCHMARK: u8 = 93;

/// Similarity of two strings as a score in `[0, 100]`, case-insensitive.
pub fn score(a: &str, b: &str) -> u8 {
    let a = a.to_lowercase();
    let b = b.to_lowercase();
    let ratio = TextDiff::from_chars(a.as_str(), b.as_str()).ratio();
    (ratio * 100.0).round() as u8
}

pub fn is_similar(a: &str, b: &str, benchmark: u8) -> bool {
    score(a, b) >= benchmark
}

/// Best score of `pattern` against any equal-length window of `text`.
/// Used for filename/profile detection, where the stem carries date and
/// sequence noise around the interesting fragment.
pub fn partial_score(text: &str, pattern: &str) -> u8 {
    let text: Vec<char> = text.to_lowercase().chars().collect();
    let pattern: Vec<char> = pattern.to_lowercase().chars().collect();
    if pattern.is_empty() || text.is_empty() {
        return 0;
    }
    // Slide the shorter string over the longer one.
    let (haystack, needle) = if pattern.len() <= text.len() {
        (text, pattern)
    } else {
        (pattern, text)
    };
    let needle: String = needle.into_iter().collect();
    let mut best = 0u8;
    for window in haystack.windows(needle.chars().count()) {
        let candidate: String = window.iter().collect();
        best = best.max(score(&candidate, &needle));
        if best == 100 {
            break;
        }
    }
    best
}

/// Strict-mode canonicalization: the canonical field for a raw header, or
/// `None` when nothing in the table comes close enough. First alias at or
/// above the benchmark wins, both across fields and within a field's list.
pub fn resolve_field(raw_header: &str, table: &AliasTable) -> Option<CanonicalField> {
    let unit = normalize_header(raw_header);
    if unit.trim().is_empty() {
        return None;
    }
    for (field, aliases) in table.iter() {
        for alias in aliases {
            if is_similar(&unit, alias, HEADER_BENCHMARK) {
                return Some(field);
            }
        }
    }
    None
}

/// Rewrite-mode canonicalization: the canonical field name when recognized,
/// otherwise the (underscore-normalized) original string, kept as a
/// pass-through column label.
pub fn canonical_label(raw_header: &str, table: &AliasTable) -> String {
    match resolve_field(raw_header, table) {
        Some(field) => field.as_str().to_string(),
        None => normalize_header(raw_header),
    }
}

/// Source systems disagree on `Invoice_Date` vs `Invoice Date`; fold the
/// underscore variant before matching.
fn normalize_header(raw: &str) -> String {
    raw.replace('_', " ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aliases::{AliasTable, CanonicalField, builtin_profiles};

    #[test]
    fn score_is_case_insensitive_and_symmetric() {
        assert_eq!(score("Vendor Name", "vendor name"), 100);
        assert_eq!(score("abc", "xyz"), 0);
        assert_eq!(score("Invoice", "Inovice"), score("Inovice", "Invoice"));
    }

    #[test]
    fn every_builtin_alias_round_trips() {
        let table = AliasTable::builtin();
        for (field, aliases) in table.iter() {
            for alias in aliases {
                assert_eq!(
                    resolve_field(alias, &table),
                    Some(field),
                    "alias '{alias}' did not resolve to {field}"
                );
            }
        }
    }

    #[test]
    fn near_spellings_resolve_and_distant_ones_pass_through() {
        let table = AliasTable::builtin();
        assert_eq!(
            resolve_field("Vendor_Name", &table),
            Some(CanonicalField::SupplierName)
        );
        assert_eq!(
            resolve_field("Invoice Numbe", &table),
            Some(CanonicalField::Reference)
        );
        assert_eq!(resolve_field("Warehouse Zone", &table), None);
        assert_eq!(
            canonical_label("Warehouse Zone", &table),
            "Warehouse Zone".to_string()
        );
    }

    #[test]
    fn blank_headers_never_match() {
        let table = AliasTable::builtin();
        assert_eq!(resolve_field("", &table), None);
        assert_eq!(resolve_field("   ", &table), None);
        assert_eq!(resolve_field("___", &table), None);
    }

    #[test]
    fn first_match_wins_under_profile_override() {
        // Under the odd-header profile, `Vendor` must land on the supplier
        // number, not the name.
        let profiles = builtin_profiles();
        let table = AliasTable::builtin().with_profile(&profiles[0]);
        assert_eq!(
            resolve_field("Vendor", &table),
            Some(CanonicalField::SupplierNumber)
        );
        assert_eq!(
            resolve_field("Vendor Name", &table),
            Some(CanonicalField::SupplierName)
        );
    }

    #[test]
    fn partial_score_finds_embedded_fragments() {
        assert!(partial_score("Summa Export 2016-03", "Summa") >= 95);
        assert!(partial_score("VCU_weekly_run", "VCU") >= 95);
        assert!(partial_score("Oracle AP dump", "Summa") < 85);
    }
}
