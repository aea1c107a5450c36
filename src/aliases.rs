//! Canonical schema fields, the alias table, and source profiles.
//!
//! The alias table maps every canonical output column to the header
//! spellings the source systems are known to emit. Entry order matters twice
//! over: fields are scanned in canonical order and aliases within a field in
//! declaration order, and the first fuzzy hit wins. That priority is part of
//! the contract, so the table is an ordered `Vec`, never a hash map.
//!
//! A [`Profile`] names a problem source and narrows specific alias lists for
//! it (a source whose `Vendor` column is actually the supplier number, for
//! example). Profiles can be declared in a YAML file and are selected per
//! input file by fuzzy-matching the file stem against the profile's hints.

use std::{fs::File, io::BufReader, path::Path};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::matching;

/// Benchmark used when matching a filename stem against profile hints.
/// Looser than header resolution: filenames carry dates and sequence noise.
pub const PROFILE_HINT_BENCHMARK: u8 = 85;

/// The fixed output columns, in final output order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CanonicalField {
    #[serde(rename = "Supplier Name")]
    SupplierName,
    #[serde(rename = "Supplier Number")]
    SupplierNumber,
    #[serde(rename = "Reference")]
    Reference,
    #[serde(rename = "Amount")]
    Amount,
    #[serde(rename = "Currency")]
    Currency,
    #[serde(rename = "Invoice Date")]
    InvoiceDate,
    #[serde(rename = "Payment Date")]
    PaymentDate,
    #[serde(rename = "Entered Date")]
    EnteredDate,
}

impl CanonicalField {
    pub const ALL: [CanonicalField; 8] = [
        CanonicalField::SupplierName,
        CanonicalField::SupplierNumber,
        CanonicalField::Reference,
        CanonicalField::Amount,
        CanonicalField::Currency,
        CanonicalField::InvoiceDate,
        CanonicalField::PaymentDate,
        CanonicalField::EnteredDate,
    ];

    /// The one column a file cannot ship without.
    pub const REQUIRED: CanonicalField = CanonicalField::SupplierNumber;

    pub fn as_str(self) -> &'static str {
        match self {
            CanonicalField::SupplierName => "Supplier Name",
            CanonicalField::SupplierNumber => "Supplier Number",
            CanonicalField::Reference => "Reference",
            CanonicalField::Amount => "Amount",
            CanonicalField::Currency => "Currency",
            CanonicalField::InvoiceDate => "Invoice Date",
            CanonicalField::PaymentDate => "Payment Date",
            CanonicalField::EnteredDate => "Entered Date",
        }
    }

    pub fn is_date(self) -> bool {
        matches!(
            self,
            CanonicalField::InvoiceDate | CanonicalField::PaymentDate | CanonicalField::EnteredDate
        )
    }

    /// Columns that carry identifiers rather than quantities; the `.0`
    /// float-rendering artifact is stripped from these.
    pub fn is_identifier(self) -> bool {
        matches!(
            self,
            CanonicalField::SupplierNumber | CanonicalField::Reference
        )
    }
}

impl std::fmt::Display for CanonicalField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Ordered canonical-field → alias-list mapping.
#[derive(Debug, Clone)]
pub struct AliasTable {
    entries: Vec<(CanonicalField, Vec<String>)>,
}

impl AliasTable {
    /// The known header spellings across source systems. Each field's list is
    /// scanned front to back, so the most literal spellings come first.
    pub fn builtin() -> Self {
        let owned = |aliases: &[&str]| aliases.iter().map(|a| a.to_string()).collect::<Vec<_>>();
        AliasTable {
            entries: vec![
                (
                    CanonicalField::SupplierName,
                    owned(&["Vendor Name", "Name1", "Name", "Vname", "Vendor", "Vendor Vname"]),
                ),
                (
                    CanonicalField::SupplierNumber,
                    owned(&[
                        "Vendor Id",
                        "Vendor ID",
                        "Vendor Number",
                        "Duns no",
                        "Vendor number",
                        "Vendor #",
                        "Vend no",
                    ]),
                ),
                (
                    CanonicalField::Reference,
                    owned(&[
                        "Invoice Id",
                        "AP Invoice Number",
                        "Invoice",
                        "Doc Number",
                        "Credit Memo",
                        "Reference Number",
                        "Invoice #",
                        "Inv no",
                        "Vendor Credit memo/reference",
                        "Credit Memo Number",
                        "Invoice num",
                        "Invoice Number",
                        "Invoice/Reference",
                    ]),
                ),
                (
                    CanonicalField::Amount,
                    owned(&[
                        "Gross Amount",
                        "Gross Amt",
                        "TranInvAmt",
                        "cost amt",
                        "Invoice Amt",
                        "Invoice Amount",
                        "Amount",
                        "Amt",
                        "Inv Amt",
                        "Credit memo Amount",
                        "Invoice Amount SUM",
                        "Base Inv Amt",
                    ]),
                ),
                (
                    CanonicalField::Currency,
                    owned(&[
                        "Currency",
                        "Curr",
                        "Inv Currency",
                        "InvCurrency",
                        "Currency USD",
                        "Invoice Currency Code",
                        "Txn Currency Cd",
                    ]),
                ),
                (
                    CanonicalField::InvoiceDate,
                    owned(&[
                        "AP Invoice Date",
                        "Invoice Date",
                        "doc date",
                        "Invoice Dte",
                        "Document Date",
                        "CreditMemo Date",
                        "Credit Memo Date",
                        "Invoice Dt",
                        "InvoiceDte",
                        "Inv date",
                    ]),
                ),
                (
                    CanonicalField::PaymentDate,
                    owned(&[
                        "AP Check Date",
                        "Payment Date",
                        "pay due date",
                        "AP Payment Due Date",
                        "Clear Date",
                        "Clearing date",
                        "Date Processed",
                        "Clearing Date",
                        "PaymentDate",
                        "Check date",
                        "Pymt Date",
                        "Accounting Dt",
                    ]),
                ),
                (
                    CanonicalField::EnteredDate,
                    owned(&[
                        "Date added",
                        "Post Date",
                        "Entered Date",
                        "Posting Date",
                        "Create Date",
                        "ReconDate",
                        "entry date",
                        "Create Dt",
                        "Payment Entry Date",
                    ]),
                ),
            ],
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (CanonicalField, &[String])> {
        self.entries
            .iter()
            .map(|(field, aliases)| (*field, aliases.as_slice()))
    }

    pub fn aliases(&self, field: CanonicalField) -> &[String] {
        self.entries
            .iter()
            .find(|(f, _)| *f == field)
            .map(|(_, aliases)| aliases.as_slice())
            .unwrap_or(&[])
    }

    /// Replace one field's alias list. Used by profile application; the
    /// field's position in the scan order is unchanged.
    pub fn set_aliases(&mut self, field: CanonicalField, aliases: Vec<String>) {
        if let Some(entry) = self.entries.iter_mut().find(|(f, _)| *f == field) {
            entry.1 = aliases;
        }
    }

    /// A fresh table with this profile's overrides applied.
    pub fn with_profile(&self, profile: &Profile) -> AliasTable {
        let mut table = self.clone();
        for over in &profile.overrides {
            table.set_aliases(over.field, over.aliases.clone());
        }
        table
    }
}

impl Default for AliasTable {
    fn default() -> Self {
        AliasTable::builtin()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AliasOverride {
    pub field: CanonicalField,
    pub aliases: Vec<String>,
}

/// A named override set for a known problem source.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Profile {
    pub name: String,
    /// Filename fragments that identify the source, matched fuzzily against
    /// the input file's stem.
    #[serde(default)]
    pub hints: Vec<String>,
    #[serde(default)]
    pub overrides: Vec<AliasOverride>,
    /// Fields whose values should lose leading zeros for this source.
    #[serde(default)]
    pub strip_leading_zeros: Vec<CanonicalField>,
}

/// Sources whose exports label the supplier number column plain `Vendor`;
/// the default alias lists would misread it as the supplier name.
pub fn builtin_profiles() -> Vec<Profile> {
    vec![Profile {
        name: "odd-header".to_string(),
        hints: vec!["Summa".to_string(), "VCU".to_string()],
        overrides: vec![
            AliasOverride {
                field: CanonicalField::SupplierName,
                aliases: vec!["Vendor Name".to_string()],
            },
            AliasOverride {
                field: CanonicalField::SupplierNumber,
                aliases: vec!["Vendor".to_string()],
            },
        ],
        strip_leading_zeros: Vec::new(),
    }]
}

#[derive(Debug, Deserialize)]
struct ProfileFile {
    profiles: Vec<Profile>,
}

pub fn load_profiles(path: &Path) -> Result<Vec<Profile>> {
    let file = File::open(path).with_context(|| format!("Opening profile file {path:?}"))?;
    let parsed: ProfileFile = serde_yaml::from_reader(BufReader::new(file))
        .with_context(|| format!("Parsing profile file {path:?}"))?;
    Ok(parsed.profiles)
}

/// First profile whose hints fuzzily match the file stem, if any.
pub fn detect_profile<'a>(profiles: &'a [Profile], stem: &str) -> Option<&'a Profile> {
    profiles.iter().find(|profile| {
        profile
            .hints
            .iter()
            .any(|hint| matching::partial_score(stem, hint) >= PROFILE_HINT_BENCHMARK)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_table_covers_every_canonical_field() {
        let table = AliasTable::builtin();
        for field in CanonicalField::ALL {
            assert!(
                !table.aliases(field).is_empty(),
                "no aliases for {field}"
            );
        }
    }

    #[test]
    fn profile_override_replaces_alias_list_in_place() {
        let table = AliasTable::builtin();
        let profiles = builtin_profiles();
        let narrowed = table.with_profile(&profiles[0]);
        assert_eq!(narrowed.aliases(CanonicalField::SupplierNumber), ["Vendor"]);
        assert_eq!(
            narrowed.aliases(CanonicalField::SupplierName),
            ["Vendor Name"]
        );
        // Untouched fields keep the builtin lists.
        assert_eq!(
            narrowed.aliases(CanonicalField::Currency),
            table.aliases(CanonicalField::Currency)
        );
    }

    #[test]
    fn detect_profile_matches_noisy_stems() {
        let profiles = builtin_profiles();
        assert!(detect_profile(&profiles, "Summa Export 2016-03").is_some());
        assert!(detect_profile(&profiles, "VCU_weekly_run").is_some());
        assert!(detect_profile(&profiles, "Oracle AP dump").is_none());
    }

    #[test]
    fn profiles_round_trip_through_yaml() {
        let yaml = r#"
profiles:
  - name: acme
    hints: [ACME]
    overrides:
      - field: Supplier Number
        aliases: [Acct No]
    strip_leading_zeros: [Supplier Number]
"#;
        let parsed: ProfileFile = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(parsed.profiles.len(), 1);
        let profile = &parsed.profiles[0];
        assert_eq!(profile.overrides[0].field, CanonicalField::SupplierNumber);
        assert_eq!(
            profile.strip_leading_zeros,
            vec![CanonicalField::SupplierNumber]
        );
    }
}
