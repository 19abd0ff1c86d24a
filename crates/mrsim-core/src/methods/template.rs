use serde::Serialize;

use super::model::TransitionQuery;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TemplateKind {
    /// Events and transition queries are fixed by the template.
    Fixed,
    Generic,
}

/// Static `P`/`D` symmetry query. An empty `d` leaves the satellite
/// symmetry unconstrained.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct QueryTemplate {
    #[serde(rename = "P")]
    pub p: &'static [i32],
    #[serde(rename = "D")]
    pub d: &'static [i32],
}

impl QueryTemplate {
    pub fn to_query(self) -> TransitionQuery {
        TransitionQuery {
            p: self.p.to_vec(),
            d: (!self.d.is_empty()).then(|| self.d.to_vec()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MethodTemplate {
    pub name: &'static str,
    pub kind: TemplateKind,
    pub channels: usize,
    pub spectral_dimensions: usize,
    /// Query given to every event that does not carry its own.
    pub transition_query: QueryTemplate,
    pub accepts_affine_matrix: bool,
}

const SINGLE_QUANTUM: QueryTemplate = QueryTemplate { p: &[-1], d: &[] };
const CENTRAL_TRANSITION: QueryTemplate = QueryTemplate { p: &[-1], d: &[0] };

pub const BLOCH_DECAY_SPECTRUM: MethodTemplate = MethodTemplate {
    name: "BlochDecaySpectrum",
    kind: TemplateKind::Fixed,
    channels: 1,
    spectral_dimensions: 1,
    transition_query: SINGLE_QUANTUM,
    accepts_affine_matrix: false,
};

pub const BLOCH_DECAY_CENTRAL_TRANSITION_SPECTRUM: MethodTemplate = MethodTemplate {
    name: "BlochDecayCentralTransitionSpectrum",
    kind: TemplateKind::Fixed,
    channels: 1,
    spectral_dimensions: 1,
    transition_query: CENTRAL_TRANSITION,
    accepts_affine_matrix: false,
};

pub const METHOD_1D: MethodTemplate = MethodTemplate {
    name: "Method1D",
    kind: TemplateKind::Generic,
    channels: 1,
    spectral_dimensions: 1,
    transition_query: SINGLE_QUANTUM,
    accepts_affine_matrix: false,
};

pub const METHOD_2D: MethodTemplate = MethodTemplate {
    name: "Method2D",
    kind: TemplateKind::Generic,
    channels: 1,
    spectral_dimensions: 2,
    transition_query: SINGLE_QUANTUM,
    accepts_affine_matrix: true,
};

pub const PRESETS: [MethodTemplate; 4] = [
    BLOCH_DECAY_SPECTRUM,
    BLOCH_DECAY_CENTRAL_TRANSITION_SPECTRUM,
    METHOD_1D,
    METHOD_2D,
];

/// Case-insensitive lookup of a preset by name.
pub fn find_template(name: &str) -> Option<&'static MethodTemplate> {
    PRESETS
        .iter()
        .find(|template| template.name.eq_ignore_ascii_case(name.trim()))
}

const GENERIC_ARGS: &str = "
Parameters
----------

name: str (optional)
    Name or id of the method.

label: str (optional)
    Short label for the method.

description: str (optional)
    Free-form description of the method.

channels: list of str
    Isotope symbols the method acts on, e.g. ['13C']. The list length is fixed
    by the method; single-channel methods take exactly one symbol.

spectral_dimensions: list of mappings (optional)
    One mapping per spectral dimension with `count`, `spectral_width`,
    `reference_offset`, `label` and, for generic methods, `events`. Defaults to
    the method's number of default dimensions.

magnetic_flux_density: quantity (optional)
    Global external field strength in T. Default 9.4 T.

rotor_angle: quantity (optional)
    Global angle between rotation axis and external field in rad. Default
    0.9553166 rad, the magic angle.
";

const ARGS_FREQ: &str = "
rotor_frequency: quantity (optional)
    Global sample spinning frequency in Hz. Default 0 Hz.
";

const ARGS_AFFINE: &str = "
affine_matrix: list (optional)
    Square n x n transformation applied to the frequency coordinates, where n
    is the number of spectral dimensions. Given flat in row-major order or as
    a list of rows.
";

const RETURNS: &str = "
Return
------
    A compiled Method.
";

const NOTES: &str = "
Note
----
Parameters given outside `spectral_dimensions` are global. Events may override
the global field, rotor angle and rotor frequency individually.
";

impl MethodTemplate {
    /// Parameter documentation assembled for this template.
    pub fn docstring(&self) -> String {
        let parts: &[&str] = match (self.kind, self.accepts_affine_matrix) {
            (_, true) => &[GENERIC_ARGS, ARGS_AFFINE, RETURNS, NOTES],
            (TemplateKind::Generic, false) => &[GENERIC_ARGS, ARGS_FREQ, RETURNS, NOTES],
            (TemplateKind::Fixed, false) => &[GENERIC_ARGS, ARGS_FREQ, RETURNS],
        };
        parts.concat()
    }

    pub const fn is_fixed(&self) -> bool {
        matches!(self.kind, TemplateKind::Fixed)
    }
}

#[cfg(test)]
mod tests {
    use super::{BLOCH_DECAY_CENTRAL_TRANSITION_SPECTRUM, METHOD_1D, METHOD_2D, find_template};

    #[test]
    fn presets_are_found_by_name() {
        let template = find_template("blochdecayspectrum").expect("preset exists");
        assert_eq!(template.name, "BlochDecaySpectrum");
        assert!(template.is_fixed());
        assert!(find_template("Method3D").is_none());
    }

    #[test]
    fn central_transition_query_constrains_d() {
        let query = BLOCH_DECAY_CENTRAL_TRANSITION_SPECTRUM
            .transition_query
            .to_query();
        assert_eq!(query.p, vec![-1]);
        assert_eq!(query.d, Some(vec![0]));
        assert_eq!(METHOD_1D.transition_query.to_query().d, None);
    }

    #[test]
    fn docstrings_document_only_accepted_parameters() {
        assert!(METHOD_2D.docstring().contains("affine_matrix"));
        assert!(!METHOD_2D.docstring().contains("rotor_frequency"));
        assert!(METHOD_1D.docstring().contains("Note"));
        assert!(!METHOD_1D.docstring().contains("affine_matrix"));
    }
}
