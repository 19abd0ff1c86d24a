use super::options::{
    OptionDefault, OptionKind, OptionSpec, as_mapping, ensure_known_keys, read_float,
    read_sequence, read_text, sequence_of_mappings,
};
use super::site::{Site, build_site};
use crate::common::nucleus::{NucleusResolver, NucleusSymbol};
use crate::domain::{Mapping, MrsimError, MrsimResult, json_type_name};
use serde::Serialize;
use serde_json::Value;

pub const SITES: OptionSpec = OptionSpec::new("sites", OptionKind::Sequence, OptionDefault::Empty);
pub const COUPLINGS: OptionSpec =
    OptionSpec::new("couplings", OptionKind::Sequence, OptionDefault::Empty);
pub const ABUNDANCE: OptionSpec =
    OptionSpec::new("abundance", OptionKind::Float, OptionDefault::Float(1.0));
pub const NAME: OptionSpec = OptionSpec::new("name", OptionKind::Text, OptionDefault::Absent);
pub const DESCRIPTION: OptionSpec =
    OptionSpec::new("description", OptionKind::Text, OptionDefault::Absent);

pub const ISOTOPOMER_OPTIONS: [OptionSpec; 5] = [SITES, COUPLINGS, ABUNDANCE, NAME, DESCRIPTION];

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Isotopomer {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub sites: Vec<Site>,
    /// Coupling records are not interpreted here; they are handed to the kernel as given.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub couplings: Vec<Mapping>,
    pub abundance: f64,
}

impl Isotopomer {
    /// Isotope of every site, in site order. Duplicates are kept.
    pub fn isotope_list(&self) -> Vec<NucleusSymbol> {
        self.sites.iter().map(|site| site.isotope.clone()).collect()
    }
}

pub fn build_isotopomer(
    map: &Mapping,
    resolver: &NucleusResolver<'_>,
) -> MrsimResult<(Isotopomer, Vec<NucleusSymbol>)> {
    ensure_known_keys(map, &ISOTOPOMER_OPTIONS)?;

    let sites = sequence_of_mappings(read_sequence(map, &SITES)?, SITES.name)?
        .into_iter()
        .enumerate()
        .map(|(index, site)| {
            build_site(site, resolver)
                .map_err(|error| error.in_scope(&format!("{}[{index}]", SITES.name)))
        })
        .collect::<MrsimResult<Vec<_>>>()?;

    let couplings = sequence_of_mappings(read_sequence(map, &COUPLINGS)?, COUPLINGS.name)?
        .into_iter()
        .cloned()
        .collect();

    let abundance = read_float(map, &ABUNDANCE, "isotopomer")?;
    if abundance < 0.0 {
        return Err(MrsimError::validation(
            ABUNDANCE.name,
            "a non-negative number",
            abundance.to_string(),
        ));
    }

    let isotopomer = Isotopomer {
        name: read_text(map, &NAME)?.map(str::to_string),
        description: read_text(map, &DESCRIPTION)?.map(str::to_string),
        sites,
        couplings,
        abundance,
    };
    let isotope_list = isotopomer.isotope_list();
    Ok((isotopomer, isotope_list))
}

/// Builds every isotopomer of a JSON array, failing on the first invalid entry.
pub fn build_isotopomers(
    value: &Value,
    resolver: &NucleusResolver<'_>,
) -> MrsimResult<(Vec<Isotopomer>, Vec<Vec<NucleusSymbol>>)> {
    let items = value.as_array().ok_or_else(|| {
        MrsimError::validation(
            "isotopomers",
            "an array of isotopomer objects",
            json_type_name(value),
        )
    })?;

    let mut isotopomers = Vec::with_capacity(items.len());
    let mut isotope_lists = Vec::with_capacity(items.len());
    for (index, item) in items.iter().enumerate() {
        let scope = format!("isotopomers[{index}]");
        let map = as_mapping(item, &scope)?;
        let (isotopomer, isotope_list) =
            build_isotopomer(map, resolver).map_err(|error| error.in_scope(&scope))?;
        isotopomers.push(isotopomer);
        isotope_lists.push(isotope_list);
    }
    Ok((isotopomers, isotope_lists))
}
