use super::CliError;
use super::helpers::{print_json, read_json_file};
use mrsim_core::common::{IsotopeProperties, IsotopeTable, NucleusResolver, NucleusSymbol};
use mrsim_core::domain::Mapping;
use mrsim_core::methods::{
    EVENT_OPTIONS, METHOD_OPTIONS, PRESETS, SPECTRAL_DIMENSION_OPTIONS, preset,
};
use mrsim_core::models::isotopomer::ISOTOPOMER_OPTIONS;
use mrsim_core::models::options::{OptionSpec, as_mapping};
use mrsim_core::models::site::{SHIELDING_OPTIONS, SITE_OPTIONS};
use mrsim_core::models::spectrum::{DIRECT_DIMENSION_OPTIONS, SPECTRUM_OPTIONS};
use mrsim_core::models::{Isotopomer, build_spectrum};
use mrsim_core::simulator::Simulator;
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};

#[derive(clap::Args)]
pub(super) struct MethodArgs {
    /// Preset name, e.g. BlochDecaySpectrum or Method2D
    #[arg(value_name = "PRESET")]
    preset: String,

    /// JSON file with method overrides
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub(super) enum OptionEntity {
    Site,
    #[value(alias = "shielding_symmetric")]
    ShieldingSymmetric,
    Isotopomer,
    Spectrum,
    #[value(alias = "direct_dimension")]
    DirectDimension,
    Method,
    #[value(alias = "spectral_dimension")]
    SpectralDimension,
    Event,
}

impl OptionEntity {
    fn options(self) -> &'static [OptionSpec] {
        match self {
            Self::Site => &SITE_OPTIONS,
            Self::ShieldingSymmetric => &SHIELDING_OPTIONS,
            Self::Isotopomer => &ISOTOPOMER_OPTIONS,
            Self::Spectrum => &SPECTRUM_OPTIONS,
            Self::DirectDimension => &DIRECT_DIMENSION_OPTIONS,
            Self::Method => &METHOD_OPTIONS,
            Self::SpectralDimension => &SPECTRAL_DIMENSION_OPTIONS,
            Self::Event => &EVENT_OPTIONS,
        }
    }
}

#[derive(Serialize)]
struct IsotopomerReport<'a> {
    isotopomers: &'a [Isotopomer],
    isotope_list: &'a BTreeSet<NucleusSymbol>,
}

pub(super) fn run_isotopomers_command(source: &str) -> Result<i32, CliError> {
    let mut simulator = Simulator::new();
    simulator.load_isotopomers(source)?;
    print_json(&IsotopomerReport {
        isotopomers: simulator.isotopomers(),
        isotope_list: simulator.isotope_list(),
    })?;
    Ok(0)
}

pub(super) fn run_spectrum_command(path: &Path) -> Result<i32, CliError> {
    let document = read_json_file(path)?;
    let table = IsotopeTable::shared();
    let spectrum = build_spectrum(
        as_mapping(&document, "spectrum")?,
        &NucleusResolver::new(&table),
    )?;
    print_json(&spectrum)?;
    Ok(0)
}

pub(super) fn run_method_command(args: MethodArgs) -> Result<i32, CliError> {
    let factory = preset(&args.preset).ok_or_else(|| {
        let known = PRESETS
            .iter()
            .map(|template| template.name)
            .collect::<Vec<_>>()
            .join(", ");
        CliError::Usage(format!(
            "unknown method preset '{}'; expected one of: {known}",
            args.preset
        ))
    })?;

    let overrides = match &args.config {
        Some(path) => as_mapping(&read_json_file(path)?, "method")?.clone(),
        None => Mapping::new(),
    };
    let method = factory.build(&overrides, &IsotopeTable::shared())?;
    print_json(&method)?;
    Ok(0)
}

pub(super) fn run_isotopes_command() -> Result<i32, CliError> {
    let table = IsotopeTable::shared();
    let rows: BTreeMap<&str, &IsotopeProperties> = table.iter().collect();
    print_json(&rows)?;
    Ok(0)
}

pub(super) fn run_options_command(entity: OptionEntity) -> Result<i32, CliError> {
    print_json(entity.options())?;
    Ok(0)
}
