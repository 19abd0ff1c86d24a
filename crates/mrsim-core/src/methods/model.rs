use crate::common::nucleus::NucleusSymbol;
use serde::Serialize;

/// Selects transitions by their `P` (spin-transition) and `D` (satellite)
/// symmetry functions, one entry per channel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TransitionQuery {
    #[serde(rename = "P")]
    pub p: Vec<i32>,
    #[serde(rename = "D", skip_serializing_if = "Option::is_none")]
    pub d: Option<Vec<i32>>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Event {
    pub fraction: f64,
    pub magnetic_flux_density: f64,
    pub rotor_frequency: f64,
    pub rotor_angle: f64,
    pub transition_query: TransitionQuery,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SpectralDimension {
    pub count: usize,
    pub spectral_width: f64,
    pub reference_offset: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    pub events: Vec<Event>,
}

impl SpectralDimension {
    pub fn increment(&self) -> f64 {
        self.spectral_width / self.count as f64
    }
}

/// Compiled acquisition method. Quantities are in T, Hz and rad.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Method {
    pub template: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub channels: Vec<NucleusSymbol>,
    pub magnetic_flux_density: f64,
    pub rotor_angle: f64,
    pub rotor_frequency: f64,
    pub spectral_dimensions: Vec<SpectralDimension>,
    /// Row-major `n x n` matrix over the spectral dimensions.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub affine_matrix: Option<Vec<f64>>,
}

impl Method {
    pub fn dimensionality(&self) -> usize {
        self.spectral_dimensions.len()
    }

    pub fn events(&self) -> impl Iterator<Item = &Event> {
        self.spectral_dimensions
            .iter()
            .flat_map(|dimension| dimension.events.iter())
    }
}
