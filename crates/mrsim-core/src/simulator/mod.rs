//! Composition root: owns validated isotopomers and the validated spectrum
//! and hands both to an injected kernel.

mod kernel;
mod source;

pub use kernel::{Kernel, KernelOptions, RunError, SimulationOutput};
pub use source::{
    DefaultFetcher, ISOTOPOMERS_KEY, SourceFetcher, SourceLocation, extract_isotopomers,
    import_json, read_isotopomers,
};

use crate::common::isotopes::IsotopeTable;
use crate::common::nucleus::{NucleusResolver, NucleusSymbol};
use crate::domain::{Mapping, MrsimError, MrsimResult};
use crate::models::options::as_mapping;
use crate::models::{Isotopomer, Spectrum, build_isotopomers, build_spectrum};
use serde_json::Value;
use std::collections::BTreeSet;
use std::sync::Arc;
use tracing::{debug, info};

#[derive(Debug, Clone)]
pub struct Simulator {
    table: Arc<IsotopeTable>,
    raw_isotopomers: Vec<Value>,
    isotopomers: Vec<Isotopomer>,
    raw_spectrum: Mapping,
    spectrum: Option<Spectrum>,
    isotope_list: BTreeSet<NucleusSymbol>,
}

impl Default for Simulator {
    fn default() -> Self {
        Self::new()
    }
}

impl Simulator {
    /// Empty simulator backed by the standard isotope table.
    pub fn new() -> Self {
        Self::with_isotope_table(IsotopeTable::shared())
    }

    pub fn with_isotope_table(table: Arc<IsotopeTable>) -> Self {
        Self {
            table,
            raw_isotopomers: Vec::new(),
            isotopomers: Vec::new(),
            raw_spectrum: Mapping::new(),
            spectrum: None,
            isotope_list: BTreeSet::new(),
        }
    }

    /// Simulator with optional initial isotopomers and spectrum, validated
    /// through the same setters as later updates.
    pub fn from_parts(isotopomers: Option<Value>, spectrum: Option<Value>) -> MrsimResult<Self> {
        let mut simulator = Self::new();
        if let Some(isotopomers) = isotopomers {
            simulator.set_isotopomers(isotopomers)?;
        }
        if let Some(spectrum) = spectrum {
            simulator.set_spectrum(spectrum)?;
        }
        Ok(simulator)
    }

    pub fn isotope_table(&self) -> &IsotopeTable {
        &self.table
    }

    /// Replaces every isotopomer. On error the previous state is kept.
    pub fn set_isotopomers(&mut self, isotopomers: Value) -> MrsimResult<()> {
        let resolver = NucleusResolver::new(&self.table);
        let (compiled, isotope_lists) = build_isotopomers(&isotopomers, &resolver)?;
        let isotope_list: BTreeSet<NucleusSymbol> = isotope_lists.into_iter().flatten().collect();

        debug!(
            isotopomers = compiled.len(),
            isotopes = ?isotope_list,
            "isotopomers replaced"
        );
        self.raw_isotopomers = match isotopomers {
            Value::Array(items) => items,
            _ => Vec::new(),
        };
        self.isotopomers = compiled;
        self.isotope_list = isotope_list;
        Ok(())
    }

    /// Replaces the acquisition configuration. On error the previous state is kept.
    pub fn set_spectrum(&mut self, spectrum: Value) -> MrsimResult<()> {
        let compiled = build_spectrum(
            as_mapping(&spectrum, "spectrum")?,
            &NucleusResolver::new(&self.table),
        )?;

        debug!(
            nucleus = %compiled.detection.isotope,
            points = compiled.number_of_points,
            "spectrum replaced"
        );
        self.raw_spectrum = match spectrum {
            Value::Object(map) => map,
            _ => Mapping::new(),
        };
        self.spectrum = Some(compiled);
        Ok(())
    }

    pub fn load_isotopomers(&mut self, source: &str) -> MrsimResult<()> {
        self.load_isotopomers_with(source, &DefaultFetcher)
    }

    pub fn load_isotopomers_with(
        &mut self,
        source: &str,
        fetcher: &dyn SourceFetcher,
    ) -> MrsimResult<()> {
        let location = SourceLocation::parse(source);
        let isotopomers = read_isotopomers(&location, fetcher)?;
        self.set_isotopomers(isotopomers)?;
        info!(
            source = %location,
            isotopomers = self.isotopomers.len(),
            "loaded isotopomers"
        );
        Ok(())
    }

    pub fn raw_isotopomers(&self) -> &[Value] {
        &self.raw_isotopomers
    }

    pub fn isotopomers(&self) -> &[Isotopomer] {
        &self.isotopomers
    }

    pub fn raw_spectrum(&self) -> &Mapping {
        &self.raw_spectrum
    }

    pub fn spectrum(&self) -> Option<&Spectrum> {
        self.spectrum.as_ref()
    }

    /// Union of site isotopes over all isotopomers.
    pub fn isotope_list(&self) -> &BTreeSet<NucleusSymbol> {
        &self.isotope_list
    }

    pub fn run<K: Kernel>(
        &self,
        kernel: &K,
        options: &KernelOptions,
    ) -> Result<SimulationOutput, RunError<K::Error>> {
        if self.isotopomers.is_empty() {
            return Err(RunError::Precondition(MrsimError::Precondition {
                requirement: "isotopomers",
            }));
        }
        let spectrum = self.spectrum.as_ref().ok_or(RunError::Precondition(
            MrsimError::Precondition {
                requirement: "spectrum",
            },
        ))?;

        debug!(
            isotopomers = self.isotopomers.len(),
            nucleus = %spectrum.detection.isotope,
            "invoking kernel"
        );
        kernel
            .simulate(spectrum, &self.isotopomers, options)
            .map_err(RunError::Kernel)
    }
}
