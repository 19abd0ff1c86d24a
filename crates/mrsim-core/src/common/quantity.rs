//! Physical-quantity strings such as `"100 kHz"`, `"9.4 T"` or `"54.735 deg"`.
//!
//! A quantity is a magnitude plus one unit from a fixed table. Every unit
//! belongs to exactly one [`Dimension`] and carries its scale relative to the
//! dimension's canonical unit (Hz, T, rad, the bare ratio, m, s), so
//! conversion is a single multiply/divide.

use crate::common::constants::DEG_TO_RAD;
use crate::domain::{MrsimError, MrsimResult};
use serde::Serialize;
use std::fmt::{Display, Formatter};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Dimension {
    Frequency,
    MagneticFluxDensity,
    Angle,
    Dimensionless,
    Length,
    Time,
}

impl Dimension {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Frequency => "frequency",
            Self::MagneticFluxDensity => "magnetic flux density",
            Self::Angle => "angle",
            Self::Dimensionless => "dimensionless",
            Self::Length => "length",
            Self::Time => "time",
        }
    }
}

impl Display for Dimension {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str((*self).as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Unit {
    pub symbol: &'static str,
    pub dimension: Dimension,
    /// Size of one of this unit in the dimension's canonical unit.
    pub scale: f64,
}

const fn unit(symbol: &'static str, dimension: Dimension, scale: f64) -> Unit {
    Unit {
        symbol,
        dimension,
        scale,
    }
}

const UNITS: [Unit; 31] = [
    unit("Hz", Dimension::Frequency, 1.0),
    unit("mHz", Dimension::Frequency, 1.0e-3),
    unit("kHz", Dimension::Frequency, 1.0e3),
    unit("MHz", Dimension::Frequency, 1.0e6),
    unit("GHz", Dimension::Frequency, 1.0e9),
    unit("T", Dimension::MagneticFluxDensity, 1.0),
    unit("mT", Dimension::MagneticFluxDensity, 1.0e-3),
    unit("µT", Dimension::MagneticFluxDensity, 1.0e-6),
    unit("uT", Dimension::MagneticFluxDensity, 1.0e-6),
    unit("G", Dimension::MagneticFluxDensity, 1.0e-4),
    unit("rad", Dimension::Angle, 1.0),
    unit("mrad", Dimension::Angle, 1.0e-3),
    unit("deg", Dimension::Angle, DEG_TO_RAD),
    unit("°", Dimension::Angle, DEG_TO_RAD),
    unit("", Dimension::Dimensionless, 1.0),
    unit("ppm", Dimension::Dimensionless, 1.0e-6),
    unit("ppb", Dimension::Dimensionless, 1.0e-9),
    unit("%", Dimension::Dimensionless, 1.0e-2),
    unit("m", Dimension::Length, 1.0),
    unit("cm", Dimension::Length, 1.0e-2),
    unit("mm", Dimension::Length, 1.0e-3),
    unit("µm", Dimension::Length, 1.0e-6),
    unit("um", Dimension::Length, 1.0e-6),
    unit("nm", Dimension::Length, 1.0e-9),
    unit("s", Dimension::Time, 1.0),
    unit("ms", Dimension::Time, 1.0e-3),
    unit("µs", Dimension::Time, 1.0e-6),
    unit("us", Dimension::Time, 1.0e-6),
    unit("ns", Dimension::Time, 1.0e-9),
    unit("min", Dimension::Time, 60.0),
    unit("h", Dimension::Time, 3600.0),
];

/// Looks up a unit symbol. The Greek small mu is accepted for the micro sign.
pub fn lookup_unit(symbol: &str) -> Option<Unit> {
    let normalized = symbol.trim().replace('\u{3bc}', "\u{b5}");
    UNITS
        .iter()
        .find(|candidate| candidate.symbol == normalized)
        .copied()
}

pub fn units_for(dimension: Dimension) -> impl Iterator<Item = &'static str> {
    UNITS
        .iter()
        .filter(move |candidate| candidate.dimension == dimension)
        .map(|candidate| candidate.symbol)
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PhysicalQuantity {
    magnitude: f64,
    unit: Unit,
}

impl PhysicalQuantity {
    pub const fn new(magnitude: f64, unit: Unit) -> Self {
        Self { magnitude, unit }
    }

    pub const fn magnitude(&self) -> f64 {
        self.magnitude
    }

    pub const fn unit(&self) -> Unit {
        self.unit
    }

    pub const fn dimension(&self) -> Dimension {
        self.unit.dimension
    }

    /// Magnitude expressed in the canonical unit of the quantity's dimension.
    pub fn canonical_value(&self) -> f64 {
        self.magnitude * self.unit.scale
    }

    pub fn to(&self, target_unit: &str) -> MrsimResult<f64> {
        convert(self, target_unit)
    }

    pub fn ensure_dimension(&self, expected: Dimension, field: &str) -> MrsimResult<()> {
        if self.dimension() == expected {
            Ok(())
        } else {
            Err(MrsimError::UnitMismatch {
                field: field.to_string(),
                expected,
                found: self.dimension(),
            })
        }
    }
}

impl Display for PhysicalQuantity {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        if self.unit.symbol.is_empty() {
            write!(f, "{}", self.magnitude)
        } else {
            write!(f, "{} {}", self.magnitude, self.unit.symbol)
        }
    }
}

/// Parses `<number><optional space><unit>`.
pub fn parse(text: &str) -> MrsimResult<PhysicalQuantity> {
    let trimmed = text.trim();
    let invalid = |reason: String| MrsimError::InvalidQuantity {
        field: String::new(),
        text: text.to_string(),
        reason,
    };

    if trimmed.is_empty() {
        return Err(invalid("empty quantity".to_string()));
    }

    let numeric_end = trimmed
        .char_indices()
        .find(|(_, c)| !matches!(c, '0'..='9' | '+' | '-' | '.' | 'e' | 'E'))
        .map_or(trimmed.len(), |(index, _)| index);

    let (magnitude, rest) = (1..=numeric_end)
        .rev()
        .find_map(|end| {
            trimmed[..end]
                .parse::<f64>()
                .ok()
                .map(|value| (value, &trimmed[end..]))
        })
        .ok_or_else(|| invalid("expected a number followed by a unit".to_string()))?;

    if !magnitude.is_finite() {
        return Err(invalid("magnitude is not finite".to_string()));
    }

    let symbol = rest.trim();
    let unit = lookup_unit(symbol).ok_or_else(|| invalid(format!("unrecognized unit '{symbol}'")))?;
    Ok(PhysicalQuantity::new(magnitude, unit))
}

/// Converts `quantity` into `target_unit`, which must share its dimension.
pub fn convert(quantity: &PhysicalQuantity, target_unit: &str) -> MrsimResult<f64> {
    let target = lookup_unit(target_unit).ok_or_else(|| MrsimError::InvalidQuantity {
        field: String::new(),
        text: target_unit.to_string(),
        reason: "unrecognized target unit".to_string(),
    })?;

    if target.dimension != quantity.dimension() {
        return Err(MrsimError::UnitMismatch {
            field: String::new(),
            expected: target.dimension,
            found: quantity.dimension(),
        });
    }

    if target.scale == quantity.unit.scale {
        return Ok(quantity.magnitude);
    }
    Ok(quantity.canonical_value() / target.scale)
}

/// Parses `text` for `field`, requires `expected`, and returns the value in `target_unit`.
pub fn parse_as(
    text: &str,
    expected: Dimension,
    target_unit: &str,
    field: &str,
) -> MrsimResult<f64> {
    let quantity = parse(text).map_err(|error| error.with_field(field))?;
    quantity.ensure_dimension(expected, field)?;
    quantity.to(target_unit).map_err(|error| error.with_field(field))
}

#[cfg(test)]
mod tests {
    use super::{Dimension, convert, lookup_unit, parse, parse_as, units_for};
    use crate::domain::MrsimError;

    fn assert_close(actual: f64, expected: f64) {
        let tolerance = 1.0e-12 * expected.abs().max(1.0);
        assert!(
            (actual - expected).abs() <= tolerance,
            "expected {expected}, got {actual}"
        );
    }

    #[test]
    fn parses_prefixed_frequency_units() {
        let quantity = parse("100 kHz").expect("frequency should parse");
        assert_eq!(quantity.dimension(), Dimension::Frequency);
        assert_close(quantity.magnitude(), 100.0);
        assert_close(quantity.to("Hz").expect("kHz converts to Hz"), 1.0e5);
        assert_close(parse("2.5MHz").expect("no space").to("kHz").expect("to kHz"), 2500.0);
    }

    #[test]
    fn canonical_round_trip_returns_the_magnitude() {
        let cases = [
            ("12.5 Hz", "Hz"),
            ("-3 kHz", "kHz"),
            ("9.4 T", "T"),
            ("54.735 deg", "deg"),
            ("0.25 rad", "rad"),
            ("10 ppm", "ppm"),
            ("1e3 mT", "mT"),
        ];

        for (text, unit) in cases {
            let quantity = parse(text).expect("quantity should parse");
            let value = convert(&quantity, unit).expect("same-unit conversion succeeds");
            assert_close(value, quantity.magnitude());
        }
    }

    #[test]
    fn degrees_convert_to_radians() {
        let value = parse_as("54.735 deg", Dimension::Angle, "rad", "rotor_angle")
            .expect("angle should convert");
        assert_close(value, 54.735_f64.to_radians());

        let symbol = parse("90°").expect("degree sign is a unit");
        assert_close(symbol.to("rad").expect("to rad"), std::f64::consts::FRAC_PI_2);
    }

    #[test]
    fn bare_numbers_are_dimensionless() {
        let quantity = parse(" 0.5 ").expect("bare number parses");
        assert_eq!(quantity.dimension(), Dimension::Dimensionless);
        assert_close(quantity.to("ppm").expect("ratio to ppm"), 5.0e5);
    }

    #[test]
    fn mismatched_dimension_names_the_field() {
        let error = parse_as("5 m", Dimension::Frequency, "Hz", "spectral_width")
            .expect_err("length is not a frequency");

        assert_eq!(
            error,
            MrsimError::UnitMismatch {
                field: "spectral_width".to_string(),
                expected: Dimension::Frequency,
                found: Dimension::Length,
            }
        );
    }

    #[test]
    fn convert_rejects_cross_dimension_targets() {
        let quantity = parse("9.4 T").expect("flux density parses");
        let error = convert(&quantity, "Hz").expect_err("tesla is not hertz");
        assert_eq!(
            error,
            MrsimError::UnitMismatch {
                field: String::new(),
                expected: Dimension::Frequency,
                found: Dimension::MagneticFluxDensity,
            }
        );
        assert_eq!(
            error.with_field("magnetic_flux_density").field(),
            Some("magnetic_flux_density")
        );
    }

    #[test]
    fn malformed_text_is_an_invalid_quantity() {
        for text in ["", "kHz", "ten Hz", "5 furlongs", "1e999 Hz"] {
            let error = parse_as(text, Dimension::Frequency, "Hz", "rotor_frequency")
                .expect_err("malformed quantity should fail");
            match error {
                MrsimError::InvalidQuantity { field, .. } => assert_eq!(field, "rotor_frequency"),
                other => panic!("unexpected error for '{text}': {other:?}"),
            }
        }
    }

    #[test]
    fn micro_prefix_accepts_both_mu_forms() {
        assert_eq!(lookup_unit("µs"), lookup_unit("\u{3bc}s"));
        assert!(lookup_unit("µT").is_some());
        assert!(units_for(Dimension::Angle).any(|symbol| symbol == "deg"));
    }
}
