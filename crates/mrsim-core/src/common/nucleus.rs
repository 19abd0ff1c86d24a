use crate::common::isotopes::{IsotopeProperties, IsotopeTable};
use crate::domain::{MrsimError, MrsimResult};
use serde::Serialize;
use std::fmt::{Display, Formatter};

const MAX_MASS_DIGITS: usize = 3;

/// Canonical `<mass number><element>` isotope symbol, e.g. `13C`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct NucleusSymbol(String);

impl NucleusSymbol {
    /// Reorders `H1`/`1H`-style input into canonical form without consulting a table.
    ///
    /// The input must be exactly one run of ASCII digits and one run of ASCII
    /// letters, in either order. Element letters are case-normalized and the
    /// mass number has at most three significant digits.
    pub fn canonicalize(text: &str) -> Option<Self> {
        let trimmed = text.trim();
        let split = trimmed
            .char_indices()
            .skip(1)
            .find(|(index, c)| {
                let previous = trimmed.as_bytes()[index - 1];
                previous.is_ascii_digit() != c.is_ascii_digit()
            })
            .map(|(index, _)| index)?;

        let (first, second) = trimmed.split_at(split);
        let (digits, letters) = if first.bytes().all(|b| b.is_ascii_digit()) {
            (first, second)
        } else {
            (second, first)
        };

        if digits.is_empty()
            || letters.is_empty()
            || !digits.bytes().all(|b| b.is_ascii_digit())
            || !letters.bytes().all(|b| b.is_ascii_alphabetic())
            || letters.len() > 2
        {
            return None;
        }

        let mass_number = digits.trim_start_matches('0');
        if mass_number.is_empty() || mass_number.len() > MAX_MASS_DIGITS {
            return None;
        }

        let mut element = letters.to_ascii_lowercase();
        element[..1].make_ascii_uppercase();
        Some(Self(format!("{mass_number}{element}")))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn mass_number(&self) -> u32 {
        self.0
            .bytes()
            .take_while(u8::is_ascii_digit)
            .fold(0, |acc, digit| acc * 10 + u32::from(digit - b'0'))
    }

    pub fn element(&self) -> &str {
        self.0.trim_start_matches(|c: char| c.is_ascii_digit())
    }
}

impl Display for NucleusSymbol {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for NucleusSymbol {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Resolves user-written isotope symbols against an isotope table.
#[derive(Debug, Clone, Copy)]
pub struct NucleusResolver<'a> {
    table: &'a IsotopeTable,
}

impl<'a> NucleusResolver<'a> {
    pub const fn new(table: &'a IsotopeTable) -> Self {
        Self { table }
    }

    pub fn resolve(&self, symbol: &str) -> MrsimResult<NucleusSymbol> {
        let canonical = NucleusSymbol::canonicalize(symbol).ok_or_else(|| {
            MrsimError::UnknownIsotope {
                field: String::new(),
                symbol: symbol.to_string(),
            }
        })?;

        if self.table.contains(canonical.as_str()) {
            Ok(canonical)
        } else {
            Err(MrsimError::UnknownIsotope {
                field: String::new(),
                symbol: canonical.0,
            })
        }
    }

    pub fn properties(&self, symbol: &NucleusSymbol) -> Option<&'a IsotopeProperties> {
        self.table.get(symbol.as_str())
    }
}

pub fn resolve(symbol: &str, table: &IsotopeTable) -> MrsimResult<NucleusSymbol> {
    NucleusResolver::new(table).resolve(symbol)
}
