use super::options::{
    OptionDefault, OptionKind, OptionSpec, ensure_known_keys, read_float, read_mapping,
    read_quantity, read_text,
};
use crate::common::nucleus::{NucleusResolver, NucleusSymbol};
use crate::common::quantity::Dimension;
use crate::domain::{Mapping, MrsimError, MrsimResult};
use serde::Serialize;

pub const ISOTOPE_SYMBOL: OptionSpec =
    OptionSpec::new("isotope_symbol", OptionKind::Nucleus, OptionDefault::Text("1H"));
pub const NUCLEUS: OptionSpec =
    OptionSpec::new("nucleus", OptionKind::Nucleus, OptionDefault::Absent);
pub const ISOTROPIC_CHEMICAL_SHIFT: OptionSpec = OptionSpec::quantity(
    "isotropic_chemical_shift",
    Dimension::Dimensionless,
    "ppm",
    "0 ppm",
);
pub const SHIELDING_SYMMETRIC: OptionSpec =
    OptionSpec::new("shielding_symmetric", OptionKind::Mapping, OptionDefault::Empty);

pub const SITE_OPTIONS: [OptionSpec; 4] = [
    ISOTOPE_SYMBOL,
    NUCLEUS,
    ISOTROPIC_CHEMICAL_SHIFT,
    SHIELDING_SYMMETRIC,
];

pub const ANISOTROPY: OptionSpec =
    OptionSpec::quantity("anisotropy", Dimension::Dimensionless, "ppm", "0 ppm");
pub const ASYMMETRY: OptionSpec =
    OptionSpec::new("asymmetry", OptionKind::Float, OptionDefault::Float(0.0));
pub const ALPHA: OptionSpec = OptionSpec::quantity("alpha", Dimension::Angle, "rad", "0 rad");
pub const BETA: OptionSpec = OptionSpec::quantity("beta", Dimension::Angle, "rad", "0 rad");
pub const GAMMA: OptionSpec = OptionSpec::quantity("gamma", Dimension::Angle, "rad", "0 rad");

pub const SHIELDING_OPTIONS: [OptionSpec; 5] = [ANISOTROPY, ASYMMETRY, ALPHA, BETA, GAMMA];

/// Symmetric part of the nuclear shielding tensor in the Haeberlen convention.
///
/// `anisotropy` is in ppm, Euler angles in radians.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct SymmetricTensor {
    pub anisotropy: f64,
    pub asymmetry: f64,
    pub alpha: f64,
    pub beta: f64,
    pub gamma: f64,
}

/// One nucleus with its chemical-shift parameters. Shifts are stored in ppm.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Site {
    pub isotope: NucleusSymbol,
    pub isotropic_chemical_shift: f64,
    pub shielding_symmetric: SymmetricTensor,
}

pub fn build_site(map: &Mapping, resolver: &NucleusResolver<'_>) -> MrsimResult<Site> {
    ensure_known_keys(map, &SITE_OPTIONS)?;

    let isotope = resolve_site_isotope(map, resolver)?;
    let isotropic_chemical_shift = read_quantity(map, &ISOTROPIC_CHEMICAL_SHIFT, "site")?;
    let shielding_symmetric = match read_mapping(map, &SHIELDING_SYMMETRIC)? {
        Some(tensor) => build_symmetric_tensor(tensor)
            .map_err(|error| error.in_scope(SHIELDING_SYMMETRIC.name))?,
        None => SymmetricTensor::default(),
    };

    Ok(Site {
        isotope,
        isotropic_chemical_shift,
        shielding_symmetric,
    })
}

fn explicit_text<'a>(map: &'a Mapping, spec: &OptionSpec) -> MrsimResult<Option<&'a str>> {
    read_text(
        map,
        &OptionSpec {
            default: OptionDefault::Absent,
            ..*spec
        },
    )
}

fn resolve_site_isotope(
    map: &Mapping,
    resolver: &NucleusResolver<'_>,
) -> MrsimResult<NucleusSymbol> {
    let resolve = |symbol: &str, spec: &OptionSpec| {
        resolver
            .resolve(symbol)
            .map_err(|error| error.with_field(spec.name))
    };
    let primary = explicit_text(map, &ISOTOPE_SYMBOL)?;
    let alias = explicit_text(map, &NUCLEUS)?;

    match (primary, alias) {
        (Some(primary), Some(alias)) => {
            let resolved = resolve(primary, &ISOTOPE_SYMBOL)?;
            if resolve(alias, &NUCLEUS)? != resolved {
                return Err(MrsimError::validation(
                    NUCLEUS.name,
                    format!("the same isotope as isotope_symbol '{resolved}'"),
                    format!("'{alias}'"),
                ));
            }
            Ok(resolved)
        }
        (Some(symbol), None) => resolve(symbol, &ISOTOPE_SYMBOL),
        (None, Some(symbol)) => resolve(symbol, &NUCLEUS),
        (None, None) => match ISOTOPE_SYMBOL.default {
            OptionDefault::Text(symbol) => resolve(symbol, &ISOTOPE_SYMBOL),
            _ => Err(MrsimError::schema(ISOTOPE_SYMBOL.name, "site")),
        },
    }
}

pub fn build_symmetric_tensor(map: &Mapping) -> MrsimResult<SymmetricTensor> {
    ensure_known_keys(map, &SHIELDING_OPTIONS)?;

    let asymmetry = read_float(map, &ASYMMETRY, SHIELDING_SYMMETRIC.name)?;
    if !(0.0..=1.0).contains(&asymmetry) {
        return Err(MrsimError::validation(
            ASYMMETRY.name,
            "a value in [0, 1]",
            asymmetry.to_string(),
        ));
    }

    Ok(SymmetricTensor {
        anisotropy: read_quantity(map, &ANISOTROPY, SHIELDING_SYMMETRIC.name)?,
        asymmetry,
        alpha: read_quantity(map, &ALPHA, SHIELDING_SYMMETRIC.name)?,
        beta: read_quantity(map, &BETA, SHIELDING_SYMMETRIC.name)?,
        gamma: read_quantity(map, &GAMMA, SHIELDING_SYMMETRIC.name)?,
    })
}
