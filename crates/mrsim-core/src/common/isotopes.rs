//! Read-only isotope-property table keyed by canonical nucleus symbol.
//!
//! The standard table lists the NMR-active isotopes the kernel knows how to
//! simulate: nuclear spin quantum number, natural abundance in percent, and
//! the reduced gyromagnetic ratio γ/2π in MHz/T.

use serde::Serialize;
use std::collections::BTreeMap;
use std::sync::{Arc, OnceLock};

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct IsotopeProperties {
    pub spin: f64,
    pub natural_abundance: f64,
    pub gyromagnetic_ratio: f64,
}

impl IsotopeProperties {
    pub const fn new(spin: f64, natural_abundance: f64, gyromagnetic_ratio: f64) -> Self {
        Self {
            spin,
            natural_abundance,
            gyromagnetic_ratio,
        }
    }

    pub fn is_quadrupolar(&self) -> bool {
        self.spin > 0.5
    }

    /// Larmor frequency in Hz at `magnetic_flux_density` tesla (ν0 = -γB0).
    pub fn larmor_frequency(&self, magnetic_flux_density: f64) -> f64 {
        -self.gyromagnetic_ratio * 1.0e6 * magnetic_flux_density
    }
}

const STANDARD_ISOTOPES: [(&str, f64, f64, f64); 70] = [
    ("1H", 0.5, 99.9885, 42.577_478),
    ("2H", 1.0, 0.0115, 6.535_903),
    ("3He", 0.5, 0.000_134, -32.434),
    ("6Li", 1.0, 7.59, 6.265_7),
    ("7Li", 1.5, 92.41, 16.548_2),
    ("9Be", 1.5, 100.0, -5.983_4),
    ("10B", 3.0, 19.9, 4.575_2),
    ("11B", 1.5, 80.1, 13.662_9),
    ("13C", 0.5, 1.07, 10.708_4),
    ("14N", 1.0, 99.632, 3.077_7),
    ("15N", 0.5, 0.368, -4.317_3),
    ("17O", 2.5, 0.038, -5.774_3),
    ("19F", 0.5, 100.0, 40.078),
    ("21Ne", 1.5, 0.27, -3.363_1),
    ("23Na", 1.5, 100.0, 11.268_8),
    ("25Mg", 2.5, 10.0, -2.608_3),
    ("27Al", 2.5, 100.0, 11.103_1),
    ("29Si", 0.5, 4.683_2, -8.465_5),
    ("31P", 0.5, 100.0, 17.251_5),
    ("33S", 1.5, 0.76, 3.271_7),
    ("35Cl", 1.5, 75.78, 4.176_5),
    ("37Cl", 1.5, 24.22, 3.476_5),
    ("39K", 1.5, 93.258_1, 1.989_3),
    ("41K", 1.5, 6.730_2, 1.091_9),
    ("43Ca", 3.5, 0.135, -2.868_8),
    ("45Sc", 3.5, 100.0, 10.359_1),
    ("47Ti", 2.5, 7.44, -2.404_1),
    ("49Ti", 3.5, 5.41, -2.404_8),
    ("51V", 3.5, 99.75, 11.213_3),
    ("53Cr", 1.5, 9.501, -2.411_5),
    ("55Mn", 2.5, 100.0, 10.576_3),
    ("57Fe", 0.5, 2.119, 1.381_6),
    ("59Co", 3.5, 100.0, 10.077),
    ("61Ni", 1.5, 1.139_9, -3.811_4),
    ("63Cu", 1.5, 69.15, 11.298_2),
    ("65Cu", 1.5, 30.85, 12.103),
    ("67Zn", 2.5, 4.1, 2.669_1),
    ("69Ga", 1.5, 60.108, 10.247_8),
    ("71Ga", 1.5, 39.892, 13.020_8),
    ("73Ge", 4.5, 7.76, -1.489_7),
    ("75As", 1.5, 100.0, 7.315),
    ("77Se", 0.5, 7.63, 8.157_1),
    ("79Br", 1.5, 50.69, 10.704_2),
    ("81Br", 1.5, 49.31, 11.538_4),
    ("85Rb", 2.5, 72.17, 4.125_3),
    ("87Rb", 1.5, 27.83, 13.998_4),
    ("87Sr", 4.5, 7.0, -1.852_4),
    ("89Y", 0.5, 100.0, -2.094_9),
    ("91Zr", 2.5, 11.22, -3.974_7),
    ("93Nb", 4.5, 100.0, 10.452_3),
    ("95Mo", 2.5, 15.92, 2.787_4),
    ("103Rh", 0.5, 100.0, -1.347_6),
    ("107Ag", 0.5, 51.839, -1.733_1),
    ("109Ag", 0.5, 48.161, -1.992_4),
    ("111Cd", 0.5, 12.8, -9.069),
    ("113Cd", 0.5, 12.22, -9.486_9),
    ("115In", 4.5, 95.71, 9.385_6),
    ("117Sn", 0.5, 7.68, -15.261),
    ("119Sn", 0.5, 8.59, -15.966),
    ("125Te", 0.5, 7.07, -13.545),
    ("127I", 2.5, 100.0, 8.578_7),
    ("129Xe", 0.5, 26.400_6, -11.861),
    ("133Cs", 3.5, 100.0, 5.623_4),
    ("137Ba", 1.5, 11.232, 4.763_4),
    ("139La", 3.5, 99.91, 6.061_2),
    ("183W", 0.5, 14.31, 1.795_7),
    ("195Pt", 0.5, 33.832, 9.292),
    ("199Hg", 0.5, 16.87, 7.712_3),
    ("205Tl", 0.5, 70.476, 24.973),
    ("207Pb", 0.5, 22.1, 9.034),
];

#[derive(Debug, Clone, PartialEq)]
pub struct IsotopeTable {
    entries: BTreeMap<String, IsotopeProperties>,
}

impl IsotopeTable {
    pub fn standard() -> Self {
        Self::from_entries(STANDARD_ISOTOPES.iter().map(
            |&(symbol, spin, natural_abundance, gyromagnetic_ratio)| {
                (
                    symbol,
                    IsotopeProperties::new(spin, natural_abundance, gyromagnetic_ratio),
                )
            },
        ))
    }

    /// The standard table, built once and shared by every caller.
    pub fn shared() -> Arc<Self> {
        static SHARED: OnceLock<Arc<IsotopeTable>> = OnceLock::new();
        Arc::clone(SHARED.get_or_init(|| Arc::new(Self::standard())))
    }

    pub fn from_entries<I, S>(entries: I) -> Self
    where
        I: IntoIterator<Item = (S, IsotopeProperties)>,
        S: Into<String>,
    {
        Self {
            entries: entries
                .into_iter()
                .map(|(symbol, properties)| (symbol.into(), properties))
                .collect(),
        }
    }

    pub fn get(&self, symbol: &str) -> Option<&IsotopeProperties> {
        self.entries.get(symbol)
    }

    pub fn contains(&self, symbol: &str) -> bool {
        self.entries.contains_key(symbol)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &IsotopeProperties)> {
        self.entries
            .iter()
            .map(|(symbol, properties)| (symbol.as_str(), properties))
    }
}
