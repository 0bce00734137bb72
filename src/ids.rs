//! Identifier normalisation and the label vocabulary.
//!
//! Victim and solutions files do not agree on how an ID is spelled: one
//! column may hold `7`, another `7.0` or ` 007`. Every comparison goes
//! through [`normalize_id`] so both sides meet in the same canonical form.

use std::collections::HashSet;
use std::fmt;

pub const ID_COLUMN: &str = "ID";
pub const LABEL_COLUMN: &str = "grooming_label";

pub const YES: &str = "yes";
pub const NO: &str = "no";

// Integral floats above this are not exactly representable as integers anyway
const MAX_EXACT_FLOAT: f64 = 9_007_199_254_740_992.0; // 2^53

/// Binary annotation written into [`LABEL_COLUMN`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GroomingLabel {
    /// ID listed in the solutions file
    Yes,
    /// ID not listed
    No,
}

impl GroomingLabel {
    pub fn as_str(self) -> &'static str {
        match self {
            GroomingLabel::Yes => YES,
            GroomingLabel::No => NO,
        }
    }

    pub fn from_membership(present: bool) -> Self {
        if present {
            GroomingLabel::Yes
        } else {
            GroomingLabel::No
        }
    }
}

impl fmt::Display for GroomingLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Canonical string form of an identifier cell.
///
/// Integers lose leading zeros and signs (`+007` -> `7`), integral floats in
/// plain decimal notation collapse to the integer (`7.0` -> `7`), everything
/// else (exponent forms like `1e3` included) is only trimmed.
pub fn normalize_id(raw: &str) -> String {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return String::new();
    }
    if let Ok(n) = trimmed.parse::<i128>() {
        return n.to_string();
    }
    if !is_plain_decimal(trimmed) {
        return trimmed.to_string();
    }
    if let Ok(f) = trimmed.parse::<f64>() {
        if f.is_finite() && f.fract() == 0.0 && f.abs() <= MAX_EXACT_FLOAT {
            return (f as i64).to_string();
        }
    }
    trimmed.to_string()
}

// optional sign, digits, one dot, digits; at least one digit
fn is_plain_decimal(s: &str) -> bool {
    let body = s.strip_prefix(&['+', '-'][..]).unwrap_or(s);
    let mut parts = body.splitn(2, '.');
    let int_part = parts.next().unwrap_or("");
    let frac_part = parts.next().unwrap_or("");
    (!int_part.is_empty() || !frac_part.is_empty())
        && int_part.bytes().all(|b| b.is_ascii_digit())
        && frac_part.bytes().all(|b| b.is_ascii_digit())
}

/// Set of normalised grooming-positive IDs from one solutions table
#[derive(Debug, Clone, Default)]
pub struct SolutionIds {
    ids: HashSet<String>,
}

impl SolutionIds {
    pub fn from_values<'a, I>(values: I) -> Self
    where
        I: IntoIterator<Item = &'a str>,
    {
        let ids = values
            .into_iter()
            .map(normalize_id)
            .filter(|id| !id.is_empty()) // blank cells never mark a row
            .collect();
        Self { ids }
    }

    pub fn contains(&self, raw: &str) -> bool {
        let id = normalize_id(raw);
        !id.is_empty() && self.ids.contains(&id)
    }

    pub fn label_for(&self, raw: &str) -> GroomingLabel {
        GroomingLabel::from_membership(self.contains(raw))
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}
