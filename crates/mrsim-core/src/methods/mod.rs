//! Acquisition methods built from declarative templates.
//!
//! A [`MethodTemplate`] fixes the channel count, the number of spectral
//! dimensions and the default transition query. Fixed presets additionally
//! freeze their events; only the exposed global and per-dimension window
//! parameters may be overridden.

mod builder;
mod model;
mod template;

pub use builder::{
    EVENT_OPTIONS, METHOD_OPTIONS, MethodFactory, SPECTRAL_DIMENSION_OPTIONS, build_method,
    extract_spectral_dimensions, generate_method,
};
pub use model::{Event, Method, SpectralDimension, TransitionQuery};
pub use template::{
    BLOCH_DECAY_CENTRAL_TRANSITION_SPECTRUM, BLOCH_DECAY_SPECTRUM, METHOD_1D, METHOD_2D,
    MethodTemplate, PRESETS, QueryTemplate, TemplateKind, find_template,
};

/// Factory for the named preset, documented with the preset's own docstring.
pub fn preset(name: &str) -> Option<MethodFactory> {
    find_template(name).map(|template| generate_method(template, template.docstring()))
}
