//! Acquisition configuration: field, rotor geometry, spectral window and the
//! detection nucleus.
//!
//! Window parameters live in the `direct_dimension` sub-mapping. Acquisition
//! parameters are normally written at the top level, but the older layout
//! that nests them inside `direct_dimension` is accepted too; a key written in
//! both places is rejected.

use super::options::{
    OptionDefault, OptionKind, OptionSpec, ensure_known_keys, read_integer, read_mapping,
    read_quantity, read_text,
};
use crate::common::constants::{DEFAULT_MAGNETIC_FLUX_DENSITY, DEFAULT_NUMBER_OF_POINTS};
use crate::common::isotopes::IsotopeProperties;
use crate::common::nucleus::{NucleusResolver, NucleusSymbol};
use crate::common::quantity::Dimension;
use crate::domain::{Mapping, MrsimError, MrsimResult};
use serde::Serialize;

pub const DIRECT_DIMENSION: OptionSpec =
    OptionSpec::new("direct_dimension", OptionKind::Mapping, OptionDefault::Required);
pub const MAGNETIC_FLUX_DENSITY: OptionSpec = OptionSpec::quantity(
    "magnetic_flux_density",
    Dimension::MagneticFluxDensity,
    "T",
    DEFAULT_MAGNETIC_FLUX_DENSITY,
);
pub const ROTOR_FREQUENCY: OptionSpec =
    OptionSpec::quantity("rotor_frequency", Dimension::Frequency, "Hz", "0 kHz");
pub const ROTOR_ANGLE: OptionSpec =
    OptionSpec::quantity("rotor_angle", Dimension::Angle, "rad", "54.735 deg");
pub const ROTOR_PHASE: OptionSpec =
    OptionSpec::quantity("rotor_phase", Dimension::Angle, "rad", "0 rad");
pub const DETECTION_NUCLEUS: OptionSpec =
    OptionSpec::new("nucleus", OptionKind::Nucleus, OptionDefault::Text("1H"));

pub const ACQUISITION_OPTIONS: [OptionSpec; 5] = [
    MAGNETIC_FLUX_DENSITY,
    ROTOR_FREQUENCY,
    ROTOR_ANGLE,
    ROTOR_PHASE,
    DETECTION_NUCLEUS,
];

pub const SPECTRUM_OPTIONS: [OptionSpec; 6] = [
    DIRECT_DIMENSION,
    MAGNETIC_FLUX_DENSITY,
    ROTOR_FREQUENCY,
    ROTOR_ANGLE,
    ROTOR_PHASE,
    DETECTION_NUCLEUS,
];

pub const NUMBER_OF_POINTS: OptionSpec = OptionSpec::new(
    "number_of_points",
    OptionKind::Integer { minimum: 1 },
    OptionDefault::Integer(DEFAULT_NUMBER_OF_POINTS),
);
pub const SPECTRAL_WIDTH: OptionSpec =
    OptionSpec::quantity("spectral_width", Dimension::Frequency, "Hz", "100 kHz");
pub const REFERENCE_OFFSET: OptionSpec =
    OptionSpec::quantity("reference_offset", Dimension::Frequency, "Hz", "0 Hz");

pub const DIRECT_DIMENSION_OPTIONS: [OptionSpec; 3] =
    [NUMBER_OF_POINTS, SPECTRAL_WIDTH, REFERENCE_OFFSET];

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DetectionNucleus {
    pub isotope: NucleusSymbol,
    #[serde(flatten)]
    pub properties: IsotopeProperties,
}

/// Compiled acquisition parameters in Hz, T and rad.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Spectrum {
    pub number_of_points: usize,
    pub spectral_width: f64,
    pub reference_offset: f64,
    pub magnetic_flux_density: f64,
    pub rotor_frequency: f64,
    pub rotor_angle: f64,
    pub rotor_phase: f64,
    pub detection: DetectionNucleus,
}

impl Spectrum {
    pub fn larmor_frequency(&self) -> f64 {
        self.detection
            .properties
            .larmor_frequency(self.magnetic_flux_density)
    }

    /// Frequency step between neighbouring points, in Hz.
    pub fn increment(&self) -> f64 {
        self.spectral_width / self.number_of_points as f64
    }
}

pub fn build_spectrum(map: &Mapping, resolver: &NucleusResolver<'_>) -> MrsimResult<Spectrum> {
    ensure_known_keys(map, &SPECTRUM_OPTIONS)?;

    let direct_dimension = read_mapping(map, &DIRECT_DIMENSION)?
        .ok_or_else(|| MrsimError::schema(DIRECT_DIMENSION.name, "spectrum"))?;

    let acquisition = Acquisition::merge(map, direct_dimension)?;
    let (number_of_points, spectral_width, reference_offset) =
        build_direct_dimension(direct_dimension)
            .map_err(|error| error.in_scope(DIRECT_DIMENSION.name))?;

    let magnetic_flux_density =
        acquisition.non_negative(&MAGNETIC_FLUX_DENSITY, "a non-negative flux density", "T")?;
    let rotor_frequency =
        acquisition.non_negative(&ROTOR_FREQUENCY, "a non-negative spinning frequency", "Hz")?;

    Ok(Spectrum {
        number_of_points,
        spectral_width,
        reference_offset,
        magnetic_flux_density,
        rotor_frequency,
        rotor_angle: acquisition.quantity(&ROTOR_ANGLE)?,
        rotor_phase: acquisition.quantity(&ROTOR_PHASE)?,
        detection: resolve_detection_nucleus(&acquisition.values, resolver)
            .map_err(|error| error.in_scope(acquisition.scope(&DETECTION_NUCLEUS)))?,
    })
}

/// Top-level acquisition keys plus any written inside `direct_dimension`.
///
/// Keys taken from `direct_dimension` keep that prefix in their error paths.
struct Acquisition {
    values: Mapping,
    nested: Vec<&'static str>,
}

impl Acquisition {
    fn merge(map: &Mapping, direct_dimension: &Mapping) -> MrsimResult<Self> {
        let allowed: Vec<OptionSpec> = DIRECT_DIMENSION_OPTIONS
            .iter()
            .chain(ACQUISITION_OPTIONS.iter())
            .copied()
            .collect();
        ensure_known_keys(direct_dimension, &allowed)
            .map_err(|error| error.in_scope(DIRECT_DIMENSION.name))?;

        let mut values: Mapping = map
            .iter()
            .filter(|(key, _)| key.as_str() != DIRECT_DIMENSION.name)
            .map(|(key, value)| (key.clone(), value.clone()))
            .collect();
        let mut nested = Vec::new();

        for spec in &ACQUISITION_OPTIONS {
            if let Some(value) = direct_dimension.get(spec.name) {
                if values.contains_key(spec.name) {
                    return Err(MrsimError::validation(
                        spec.name,
                        "a single definition",
                        "definitions at top level and inside direct_dimension",
                    )
                    .in_scope(DIRECT_DIMENSION.name));
                }
                values.insert(spec.name.to_string(), value.clone());
                nested.push(spec.name);
            }
        }
        Ok(Self { values, nested })
    }

    fn scope(&self, spec: &OptionSpec) -> &'static str {
        if self.nested.contains(&spec.name) {
            DIRECT_DIMENSION.name
        } else {
            ""
        }
    }

    fn quantity(&self, spec: &OptionSpec) -> MrsimResult<f64> {
        read_quantity(&self.values, spec, "spectrum")
            .map_err(|error| error.in_scope(self.scope(spec)))
    }

    fn non_negative(&self, spec: &OptionSpec, expected: &str, unit: &str) -> MrsimResult<f64> {
        let value = self.quantity(spec)?;
        if value < 0.0 {
            return Err(
                MrsimError::validation(spec.name, expected, format!("{value} {unit}"))
                    .in_scope(self.scope(spec)),
            );
        }
        Ok(value)
    }
}

fn build_direct_dimension(map: &Mapping) -> MrsimResult<(usize, f64, f64)> {
    let number_of_points = read_integer(map, &NUMBER_OF_POINTS, DIRECT_DIMENSION.name)?;
    let number_of_points = usize::try_from(number_of_points).map_err(|_| {
        MrsimError::validation(
            NUMBER_OF_POINTS.name,
            "a platform-sized point count",
            number_of_points.to_string(),
        )
    })?;

    let spectral_width = read_quantity(map, &SPECTRAL_WIDTH, DIRECT_DIMENSION.name)?;
    if spectral_width <= 0.0 {
        return Err(MrsimError::validation(
            SPECTRAL_WIDTH.name,
            "a positive frequency",
            format!("{spectral_width} Hz"),
        ));
    }

    let reference_offset = read_quantity(map, &REFERENCE_OFFSET, DIRECT_DIMENSION.name)?;
    Ok((number_of_points, spectral_width, reference_offset))
}

fn resolve_detection_nucleus(
    acquisition: &Mapping,
    resolver: &NucleusResolver<'_>,
) -> MrsimResult<DetectionNucleus> {
    let text = read_text(acquisition, &DETECTION_NUCLEUS)?
        .ok_or_else(|| MrsimError::schema(DETECTION_NUCLEUS.name, "spectrum"))?;

    let unsupported = |nucleus: String| MrsimError::UnsupportedNucleus { nucleus };
    let isotope = resolver.resolve(text).map_err(|error| match error {
        MrsimError::UnknownIsotope { symbol, .. } => unsupported(symbol),
        other => other,
    })?;
    let properties = *resolver
        .properties(&isotope)
        .ok_or_else(|| unsupported(isotope.to_string()))?;

    Ok(DetectionNucleus {
        isotope,
        properties,
    })
}
