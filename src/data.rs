use std::fmt;

/// A raw cell as delivered by either the text tokenizer or a workbook reader.
///
/// Numeric cells are kept numeric until value normalization so that the date
/// chain can distinguish a spreadsheet serial from a digit string, and so the
/// `.0` rendering artifact can be stripped only where the schema asks for it.
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Text(String),
    Number(f64),
}

impl Cell {
    pub fn text(value: impl Into<String>) -> Self {
        Cell::Text(value.into())
    }

    pub fn is_blank(&self) -> bool {
        match self {
            Cell::Text(s) => s.trim().is_empty(),
            Cell::Number(_) => false,
        }
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            Cell::Number(n) => Some(*n),
            Cell::Text(_) => None,
        }
    }

    /// Whitespace trim plus embedded-quote removal, applied to every field of
    /// every tokenized row. Numbers pass through untouched.
    pub fn cleaned(&self) -> Cell {
        match self {
            Cell::Text(s) => {
                let trimmed = s.trim();
                if trimmed.contains('"') {
                    Cell::Text(trimmed.replace('"', ""))
                } else {
                    Cell::Text(trimmed.to_string())
                }
            }
            Cell::Number(n) => Cell::Number(*n),
        }
    }

    /// Rendering for output rows. Integral floats keep the `.0` suffix they
    /// had in the source workbook; the normalizer strips it per column.
    pub fn render(&self) -> String {
        match self {
            Cell::Text(s) => s.clone(),
            Cell::Number(n) => {
                if n.fract() == 0.0 && n.is_finite() {
                    format!("{n:.1}")
                } else {
                    n.to_string()
                }
            }
        }
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.render())
    }
}

impl From<&str> for Cell {
    fn from(value: &str) -> Self {
        Cell::Text(value.to_string())
    }
}

impl From<f64> for Cell {
    fn from(value: f64) -> Self {
        Cell::Number(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cleaned_strips_whitespace_and_quotes() {
        assert_eq!(Cell::text("  \"Acme\"  ").cleaned(), Cell::text("Acme"));
        assert_eq!(Cell::text("plain").cleaned(), Cell::text("plain"));
        assert_eq!(Cell::Number(7.5).cleaned(), Cell::Number(7.5));
    }

    #[test]
    fn render_keeps_integral_float_artifact() {
        assert_eq!(Cell::Number(12345.0).render(), "12345.0");
        assert_eq!(Cell::Number(99.95).render(), "99.95");
        assert_eq!(Cell::text("0042").render(), "0042");
    }

    #[test]
    fn blank_detection_ignores_numbers() {
        assert!(Cell::text("   ").is_blank());
        assert!(Cell::text("").is_blank());
        assert!(!Cell::Number(0.0).is_blank());
    }
}
