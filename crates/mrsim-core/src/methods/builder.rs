use super::model::{Event, Method, SpectralDimension, TransitionQuery};
use super::template::{MethodTemplate, QueryTemplate};
use crate::common::constants::{DEFAULT_MAGNETIC_FLUX_DENSITY, DEFAULT_NUMBER_OF_POINTS};
use crate::common::isotopes::IsotopeTable;
use crate::common::nucleus::{NucleusResolver, NucleusSymbol};
use crate::common::quantity::Dimension;
use crate::domain::{Mapping, MrsimError, MrsimResult, json_type_name};
use crate::models::options::{
    OptionDefault, OptionKind, OptionSpec, ensure_known_keys, read_float, read_integer,
    read_mapping, read_optional_quantity, read_quantity, read_sequence, read_text,
    sequence_of_mappings,
};
use serde_json::Value;
use tracing::debug;

pub const NAME: OptionSpec = OptionSpec::new("name", OptionKind::Text, OptionDefault::Absent);
pub const LABEL: OptionSpec = OptionSpec::new("label", OptionKind::Text, OptionDefault::Absent);
pub const DESCRIPTION: OptionSpec =
    OptionSpec::new("description", OptionKind::Text, OptionDefault::Absent);
pub const CHANNELS: OptionSpec =
    OptionSpec::new("channels", OptionKind::Sequence, OptionDefault::Required);
pub const MAGNETIC_FLUX_DENSITY: OptionSpec = OptionSpec::quantity(
    "magnetic_flux_density",
    Dimension::MagneticFluxDensity,
    "T",
    DEFAULT_MAGNETIC_FLUX_DENSITY,
);
pub const ROTOR_ANGLE: OptionSpec =
    OptionSpec::quantity("rotor_angle", Dimension::Angle, "rad", "0.9553166 rad");
pub const ROTOR_FREQUENCY: OptionSpec =
    OptionSpec::quantity("rotor_frequency", Dimension::Frequency, "Hz", "0 Hz");
pub const SPECTRAL_DIMENSIONS: OptionSpec =
    OptionSpec::new("spectral_dimensions", OptionKind::Sequence, OptionDefault::Empty);
pub const AFFINE_MATRIX: OptionSpec =
    OptionSpec::new("affine_matrix", OptionKind::Sequence, OptionDefault::Absent);

pub const METHOD_OPTIONS: [OptionSpec; 9] = [
    NAME,
    LABEL,
    DESCRIPTION,
    CHANNELS,
    MAGNETIC_FLUX_DENSITY,
    ROTOR_ANGLE,
    ROTOR_FREQUENCY,
    SPECTRAL_DIMENSIONS,
    AFFINE_MATRIX,
];

pub const COUNT: OptionSpec = OptionSpec::new(
    "count",
    OptionKind::Integer { minimum: 1 },
    OptionDefault::Integer(DEFAULT_NUMBER_OF_POINTS),
);
pub const SPECTRAL_WIDTH: OptionSpec =
    OptionSpec::quantity("spectral_width", Dimension::Frequency, "Hz", "25 kHz");
pub const REFERENCE_OFFSET: OptionSpec =
    OptionSpec::quantity("reference_offset", Dimension::Frequency, "Hz", "0 Hz");
pub const EVENTS: OptionSpec =
    OptionSpec::new("events", OptionKind::Sequence, OptionDefault::Empty);

pub const SPECTRAL_DIMENSION_OPTIONS: [OptionSpec; 5] =
    [COUNT, SPECTRAL_WIDTH, REFERENCE_OFFSET, LABEL, EVENTS];

pub const FRACTION: OptionSpec =
    OptionSpec::new("fraction", OptionKind::Float, OptionDefault::Float(1.0));
pub const EVENT_MAGNETIC_FLUX_DENSITY: OptionSpec = OptionSpec::optional_quantity(
    "magnetic_flux_density",
    Dimension::MagneticFluxDensity,
    "T",
);
pub const EVENT_ROTOR_FREQUENCY: OptionSpec =
    OptionSpec::optional_quantity("rotor_frequency", Dimension::Frequency, "Hz");
pub const EVENT_ROTOR_ANGLE: OptionSpec =
    OptionSpec::optional_quantity("rotor_angle", Dimension::Angle, "rad");
pub const TRANSITION_QUERY: OptionSpec =
    OptionSpec::new("transition_query", OptionKind::Mapping, OptionDefault::Absent);

pub const EVENT_OPTIONS: [OptionSpec; 5] = [
    FRACTION,
    EVENT_MAGNETIC_FLUX_DENSITY,
    EVENT_ROTOR_FREQUENCY,
    EVENT_ROTOR_ANGLE,
    TRANSITION_QUERY,
];

const QUERY_P: OptionSpec = OptionSpec::new("P", OptionKind::Sequence, OptionDefault::Required);
const QUERY_D: OptionSpec = OptionSpec::new("D", OptionKind::Sequence, OptionDefault::Absent);
const QUERY_OPTIONS: [OptionSpec; 2] = [QUERY_P, QUERY_D];

/// Builds methods of one template; the product of [`generate_method`].
#[derive(Debug, Clone, PartialEq)]
pub struct MethodFactory {
    template: MethodTemplate,
    docstring: String,
}

impl MethodFactory {
    pub const fn name(&self) -> &'static str {
        self.template.name
    }

    pub fn docstring(&self) -> &str {
        &self.docstring
    }

    pub const fn template(&self) -> &MethodTemplate {
        &self.template
    }

    pub fn build(&self, overrides: &Mapping, table: &IsotopeTable) -> MrsimResult<Method> {
        build_method(&self.template, overrides, table)
    }
}

pub fn generate_method(template: &MethodTemplate, docstring: impl Into<String>) -> MethodFactory {
    MethodFactory {
        template: *template,
        docstring: docstring.into(),
    }
}

/// Splits `spectral_dimensions` off a method mapping without touching the input.
///
/// An absent key yields `default_count` empty dimension mappings.
pub fn extract_spectral_dimensions(
    map: &Mapping,
    default_count: usize,
) -> MrsimResult<(Vec<Value>, Mapping)> {
    let mut remaining = map.clone();
    let dimensions = match remaining.remove(SPECTRAL_DIMENSIONS.name) {
        None | Some(Value::Null) => vec![Value::Object(Mapping::new()); default_count],
        Some(Value::Array(items)) => items,
        Some(other) => {
            return Err(MrsimError::validation(
                SPECTRAL_DIMENSIONS.name,
                "an array",
                json_type_name(&other),
            ));
        }
    };
    Ok((dimensions, remaining))
}

#[derive(Debug, Clone, Copy)]
struct EventDefaults {
    magnetic_flux_density: f64,
    rotor_frequency: f64,
    rotor_angle: f64,
    transition_query: QueryTemplate,
    channels: usize,
}

pub fn build_method(
    template: &MethodTemplate,
    overrides: &Mapping,
    table: &IsotopeTable,
) -> MrsimResult<Method> {
    if template.is_fixed() {
        ensure_not_frozen(template, overrides)?;
    }
    ensure_known_keys(overrides, &METHOD_OPTIONS)?;

    let (dimensions, globals) =
        extract_spectral_dimensions(overrides, template.spectral_dimensions)?;
    if dimensions.len() != template.spectral_dimensions {
        return Err(MrsimError::validation(
            SPECTRAL_DIMENSIONS.name,
            format!(
                "{} spectral dimension(s) for {}",
                template.spectral_dimensions, template.name
            ),
            format!("{} spectral dimension(s)", dimensions.len()),
        ));
    }

    let channels = build_channels(&globals, template, &NucleusResolver::new(table))?;
    let magnetic_flux_density = non_negative(
        read_quantity(&globals, &MAGNETIC_FLUX_DENSITY, template.name)?,
        &MAGNETIC_FLUX_DENSITY,
    )?;
    let rotor_angle = read_quantity(&globals, &ROTOR_ANGLE, template.name)?;
    let rotor_frequency = non_negative(
        read_quantity(&globals, &ROTOR_FREQUENCY, template.name)?,
        &ROTOR_FREQUENCY,
    )?;

    let defaults = EventDefaults {
        magnetic_flux_density,
        rotor_frequency,
        rotor_angle,
        transition_query: template.transition_query,
        channels: template.channels,
    };
    let spectral_dimensions = sequence_of_mappings(&dimensions, SPECTRAL_DIMENSIONS.name)?
        .into_iter()
        .enumerate()
        .map(|(index, dimension)| {
            build_spectral_dimension(dimension, &defaults).map_err(|error| {
                error.in_scope(&format!("{}[{index}]", SPECTRAL_DIMENSIONS.name))
            })
        })
        .collect::<MrsimResult<Vec<_>>>()?;

    let method = Method {
        template: template.name,
        name: read_text(&globals, &NAME)?.map(str::to_string),
        label: read_text(&globals, &LABEL)?.map(str::to_string),
        description: read_text(&globals, &DESCRIPTION)?.map(str::to_string),
        channels,
        magnetic_flux_density,
        rotor_angle,
        rotor_frequency,
        affine_matrix: build_affine_matrix(&globals, template)?,
        spectral_dimensions,
    };
    debug!(
        method = template.name,
        dimensions = method.dimensionality(),
        "compiled method"
    );
    Ok(method)
}

/// Fixed presets own their events and transition queries.
fn ensure_not_frozen(template: &MethodTemplate, overrides: &Mapping) -> MrsimResult<()> {
    let dimensions: &[Value] = match overrides.get(SPECTRAL_DIMENSIONS.name) {
        Some(Value::Array(items)) => items.as_slice(),
        _ => &[],
    };
    let dimension_maps = || dimensions.iter().filter_map(Value::as_object);

    let redefines_query = dimension_maps()
        .filter_map(|dimension| dimension.get(EVENTS.name))
        .filter_map(Value::as_array)
        .flatten()
        .filter_map(Value::as_object)
        .any(|event| event.contains_key(TRANSITION_QUERY.name));
    if redefines_query {
        return Err(MrsimError::frozen_attribute(
            TRANSITION_QUERY.name,
            template.name,
        ));
    }

    if dimension_maps().any(|dimension| dimension.contains_key(EVENTS.name))
        || overrides.contains_key(EVENTS.name)
    {
        return Err(MrsimError::frozen_attribute(EVENTS.name, template.name));
    }
    Ok(())
}

fn build_channels(
    map: &Mapping,
    template: &MethodTemplate,
    resolver: &NucleusResolver<'_>,
) -> MrsimResult<Vec<NucleusSymbol>> {
    if map.get(CHANNELS.name).is_none_or(Value::is_null) {
        return Err(MrsimError::schema(CHANNELS.name, template.name));
    }

    let channels = read_sequence(map, &CHANNELS)?
        .iter()
        .enumerate()
        .map(|(index, item)| match item {
            Value::String(symbol) => resolver
                .resolve(symbol)
                .map_err(|error| error.with_field(&format!("{}[{index}]", CHANNELS.name))),
            other => Err(MrsimError::validation(
                format!("{}[{index}]", CHANNELS.name),
                "an isotope symbol",
                json_type_name(other),
            )),
        })
        .collect::<MrsimResult<Vec<_>>>()?;

    if channels.len() != template.channels {
        return Err(MrsimError::validation(
            CHANNELS.name,
            format!("{} channel(s) for {}", template.channels, template.name),
            format!("{} channel(s)", channels.len()),
        ));
    }
    Ok(channels)
}

fn build_spectral_dimension(
    map: &Mapping,
    defaults: &EventDefaults,
) -> MrsimResult<SpectralDimension> {
    ensure_known_keys(map, &SPECTRAL_DIMENSION_OPTIONS)?;

    let count = read_integer(map, &COUNT, "spectral_dimension")?;
    let count = usize::try_from(count).map_err(|_| {
        MrsimError::validation(COUNT.name, "a platform-sized count", count.to_string())
    })?;

    let spectral_width = read_quantity(map, &SPECTRAL_WIDTH, "spectral_dimension")?;
    if spectral_width <= 0.0 {
        return Err(MrsimError::validation(
            SPECTRAL_WIDTH.name,
            "a positive frequency",
            format!("{spectral_width} Hz"),
        ));
    }

    let events = sequence_of_mappings(read_sequence(map, &EVENTS)?, EVENTS.name)?;
    let events = if events.is_empty() {
        vec![default_event(defaults)]
    } else {
        events
            .into_iter()
            .enumerate()
            .map(|(index, event)| {
                build_event(event, defaults)
                    .map_err(|error| error.in_scope(&format!("{}[{index}]", EVENTS.name)))
            })
            .collect::<MrsimResult<Vec<_>>>()?
    };

    Ok(SpectralDimension {
        count,
        spectral_width,
        reference_offset: read_quantity(map, &REFERENCE_OFFSET, "spectral_dimension")?,
        label: read_text(map, &LABEL)?.map(str::to_string),
        events,
    })
}

fn default_event(defaults: &EventDefaults) -> Event {
    Event {
        fraction: 1.0,
        magnetic_flux_density: defaults.magnetic_flux_density,
        rotor_frequency: defaults.rotor_frequency,
        rotor_angle: defaults.rotor_angle,
        transition_query: defaults.transition_query.to_query(),
    }
}

fn build_event(map: &Mapping, defaults: &EventDefaults) -> MrsimResult<Event> {
    ensure_known_keys(map, &EVENT_OPTIONS)?;

    let fraction = read_float(map, &FRACTION, "event")?;
    if !(0.0..=1.0).contains(&fraction) {
        return Err(MrsimError::validation(
            FRACTION.name,
            "a value in [0, 1]",
            fraction.to_string(),
        ));
    }

    let magnetic_flux_density = match read_optional_quantity(map, &EVENT_MAGNETIC_FLUX_DENSITY)? {
        Some(value) => non_negative(value, &EVENT_MAGNETIC_FLUX_DENSITY)?,
        None => defaults.magnetic_flux_density,
    };
    let rotor_frequency = match read_optional_quantity(map, &EVENT_ROTOR_FREQUENCY)? {
        Some(value) => non_negative(value, &EVENT_ROTOR_FREQUENCY)?,
        None => defaults.rotor_frequency,
    };
    let rotor_angle =
        read_optional_quantity(map, &EVENT_ROTOR_ANGLE)?.unwrap_or(defaults.rotor_angle);

    let transition_query = match read_mapping(map, &TRANSITION_QUERY)? {
        Some(query) => build_transition_query(query, defaults.channels)
            .map_err(|error| error.in_scope(TRANSITION_QUERY.name))?,
        None => defaults.transition_query.to_query(),
    };

    Ok(Event {
        fraction,
        magnetic_flux_density,
        rotor_frequency,
        rotor_angle,
        transition_query,
    })
}

fn build_transition_query(map: &Mapping, channels: usize) -> MrsimResult<TransitionQuery> {
    ensure_known_keys(map, &QUERY_OPTIONS)?;
    if map.get(QUERY_P.name).is_none_or(Value::is_null) {
        return Err(MrsimError::schema(QUERY_P.name, TRANSITION_QUERY.name));
    }

    let p = read_symmetry(map, &QUERY_P, channels)?;
    let d = match map.get(QUERY_D.name) {
        None | Some(Value::Null) => None,
        Some(_) => Some(read_symmetry(map, &QUERY_D, channels)?),
    };
    Ok(TransitionQuery { p, d })
}

/// One integer symmetry value per channel.
fn read_symmetry(map: &Mapping, spec: &OptionSpec, channels: usize) -> MrsimResult<Vec<i32>> {
    let values = read_sequence(map, spec)?
        .iter()
        .enumerate()
        .map(|(index, item)| {
            item.as_i64()
                .and_then(|value| i32::try_from(value).ok())
                .ok_or_else(|| {
                    MrsimError::validation(
                        format!("{}[{index}]", spec.name),
                        "an integer",
                        item.to_string(),
                    )
                })
        })
        .collect::<MrsimResult<Vec<_>>>()?;

    if values.len() != channels {
        return Err(MrsimError::validation(
            spec.name,
            format!("{channels} value(s), one per channel"),
            format!("{} value(s)", values.len()),
        ));
    }
    Ok(values)
}

/// Accepts a flat row-major list of `n * n` numbers or a list of `n` rows.
fn build_affine_matrix(map: &Mapping, template: &MethodTemplate) -> MrsimResult<Option<Vec<f64>>> {
    if map.get(AFFINE_MATRIX.name).is_none_or(Value::is_null) {
        return Ok(None);
    }
    if !template.accepts_affine_matrix {
        return Err(MrsimError::validation(
            AFFINE_MATRIX.name,
            format!("no affine matrix for {}", template.name),
            "an affine matrix",
        ));
    }

    let n = template.spectral_dimensions;
    let shape_error = |found: String| {
        MrsimError::validation(AFFINE_MATRIX.name, format!("a {n}x{n} matrix"), found)
    };

    let rows = read_sequence(map, &AFFINE_MATRIX)?;
    let elements: Vec<&Value> = if !rows.is_empty() && rows.iter().all(Value::is_array) {
        if rows.len() != n || rows.iter().any(|row| row.as_array().map_or(0, Vec::len) != n) {
            return Err(shape_error(format!("{} row(s) of uneven length", rows.len())));
        }
        rows.iter().filter_map(Value::as_array).flatten().collect()
    } else {
        rows.iter().collect()
    };
    if elements.len() != n * n {
        return Err(shape_error(format!("{} entries", elements.len())));
    }

    elements
        .into_iter()
        .map(|element| {
            element
                .as_f64()
                .filter(|value| value.is_finite())
                .ok_or_else(|| {
                    MrsimError::validation(
                        AFFINE_MATRIX.name,
                        "a matrix of finite numbers",
                        json_type_name(element),
                    )
                })
        })
        .collect::<MrsimResult<Vec<_>>>()
        .map(Some)
}

fn non_negative(value: f64, spec: &OptionSpec) -> MrsimResult<f64> {
    if value >= 0.0 {
        return Ok(value);
    }
    let unit = match spec.kind {
        OptionKind::Quantity { unit, .. } => unit,
        _ => "",
    };
    Err(MrsimError::validation(
        spec.name,
        "a non-negative value",
        format!("{value} {unit}").trim_end(),
    ))
}

#[cfg(test)]
mod tests {
    use super::{build_method, extract_spectral_dimensions, generate_method};
    use crate::common::constants::MAGIC_ANGLE_RAD;
    use crate::common::isotopes::IsotopeTable;
    use crate::domain::{Mapping, MrsimError};
    use crate::methods::template::{
        BLOCH_DECAY_CENTRAL_TRANSITION_SPECTRUM, BLOCH_DECAY_SPECTRUM, METHOD_1D, METHOD_2D,
    };
    use serde_json::{Value, json};

    fn mapping(value: Value) -> Mapping {
        value.as_object().cloned().expect("overrides should be an object")
    }

    #[test]
    fn bloch_decay_defaults_fill_one_dimension_with_one_event() {
        let table = IsotopeTable::standard();
        let method = build_method(
            &BLOCH_DECAY_SPECTRUM,
            &mapping(json!({ "channels": ["13C"] })),
            &table,
        )
        .expect("defaults are valid");

        assert_eq!(method.template, "BlochDecaySpectrum");
        assert_eq!(method.channels[0].as_str(), "13C");
        assert_eq!(method.magnetic_flux_density, 9.4);
        assert!((method.rotor_angle - MAGIC_ANGLE_RAD).abs() < 1.0e-6);
        assert_eq!(method.dimensionality(), 1);

        let dimension = &method.spectral_dimensions[0];
        assert_eq!(dimension.count, 1024);
        assert_eq!(dimension.spectral_width, 25_000.0);
        assert_eq!(dimension.events.len(), 1);
        assert_eq!(dimension.events[0].transition_query.p, vec![-1]);
        assert_eq!(dimension.events[0].magnetic_flux_density, 9.4);
    }

    #[test]
    fn fixed_preset_rejects_events_and_transition_queries() {
        let table = IsotopeTable::standard();

        let events = mapping(json!({
            "channels": ["1H"],
            "spectral_dimensions": [{ "events": [{ "fraction": 1 }] }]
        }));
        let error = build_method(&BLOCH_DECAY_SPECTRUM, &events, &table)
            .expect_err("events are frozen");
        assert_eq!(
            error,
            MrsimError::frozen_attribute("events", "BlochDecaySpectrum")
        );

        let query = mapping(json!({
            "channels": ["1H"],
            "spectral_dimensions": [{ "events": [{ "transition_query": { "P": [1] } }] }]
        }));
        let error = build_method(&BLOCH_DECAY_CENTRAL_TRANSITION_SPECTRUM, &query, &table)
            .expect_err("transition query is frozen");
        assert_eq!(error.field(), Some("transition_query"));
        assert_eq!(
            error.to_string(),
            "`transition_query` attribute cannot be modified for \
             BlochDecayCentralTransitionSpectrum method"
        );

        let top_level = mapping(json!({ "channels": ["1H"], "events": [] }));
        assert!(matches!(
            build_method(&BLOCH_DECAY_SPECTRUM, &top_level, &table),
            Err(MrsimError::FrozenAttribute { .. })
        ));
    }

    #[test]
    fn generic_method_accepts_events_and_inherits_globals() {
        let table = IsotopeTable::standard();
        let overrides = mapping(json!({
            "channels": ["27Al"],
            "magnetic_flux_density": "14.1 T",
            "rotor_frequency": "10 kHz",
            "spectral_dimensions": [{
                "count": 512,
                "spectral_width": "50 kHz",
                "events": [
                    { "fraction": 0.5, "transition_query": { "P": [-1], "D": [0] } },
                    { "fraction": 0.5, "rotor_angle": "90 deg" }
                ]
            }]
        }));

        let method = build_method(&METHOD_1D, &overrides, &table).expect("generic accepts events");
        let events: Vec<_> = method.events().collect();
        assert_eq!(events.len(), 2);
        assert_eq!(events[0].magnetic_flux_density, 14.1);
        assert_eq!(events[0].rotor_frequency, 10_000.0);
        assert_eq!(events[0].transition_query.d, Some(vec![0]));
        assert!((events[1].rotor_angle - std::f64::consts::FRAC_PI_2).abs() < 1.0e-12);
        assert_eq!(events[1].transition_query.p, vec![-1]);
    }

    #[test]
    fn dimension_and_channel_counts_are_validated() {
        let table = IsotopeTable::standard();

        let two_dimensions =
            mapping(json!({ "channels": ["1H"], "spectral_dimensions": [{}, {}] }));
        let error = build_method(&METHOD_1D, &two_dimensions, &table)
            .expect_err("1D method takes one dimension");
        assert_eq!(error.field(), Some("spectral_dimensions"));

        let two_channels = mapping(json!({ "channels": ["1H", "13C"] }));
        let error = build_method(&BLOCH_DECAY_SPECTRUM, &two_channels, &table)
            .expect_err("single channel");
        assert_eq!(error.field(), Some("channels"));

        let missing = build_method(&BLOCH_DECAY_SPECTRUM, &Mapping::new(), &table)
            .expect_err("channels are required");
        assert_eq!(missing, MrsimError::schema("channels", "BlochDecaySpectrum"));

        let unknown =
            mapping(json!({ "channels": ["H1", "12C"], "spectral_dimensions": [{}, {}] }));
        let error = build_method(&METHOD_2D, &unknown, &table).expect_err("12C has no spin");
        assert_eq!(
            error,
            MrsimError::UnknownIsotope {
                field: "channels[1]".to_string(),
                symbol: "12C".to_string(),
            }
        );
    }

    #[test]
    fn affine_matrix_is_only_accepted_by_two_dimensional_methods() {
        let table = IsotopeTable::standard();
        let nested = mapping(json!({
            "channels": ["87Rb"],
            "affine_matrix": [[1, -1], [0, 1]]
        }));
        let method = build_method(&METHOD_2D, &nested, &table).expect("2x2 matrix is valid");
        assert_eq!(method.affine_matrix, Some(vec![1.0, -1.0, 0.0, 1.0]));
        assert_eq!(method.dimensionality(), 2);

        let flat = mapping(json!({ "channels": ["87Rb"], "affine_matrix": [1, 0, 0] }));
        assert!(build_method(&METHOD_2D, &flat, &table).is_err());

        let one_dimensional = mapping(json!({ "channels": ["1H"], "affine_matrix": [1] }));
        let error = build_method(&METHOD_1D, &one_dimensional, &table)
            .expect_err("1D has no affine matrix");
        assert_eq!(error.field(), Some("affine_matrix"));
    }

    #[test]
    fn nested_errors_report_the_dimension_and_event() {
        let table = IsotopeTable::standard();
        let overrides = mapping(json!({
            "channels": ["1H"],
            "spectral_dimensions": [{ "events": [{}, { "magnetic_flux_density": "4 kHz" }] }]
        }));
        let error = build_method(&METHOD_1D, &overrides, &table).expect_err("wrong dimension");
        assert_eq!(
            error.field(),
            Some("spectral_dimensions[0].events[1].magnetic_flux_density")
        );
    }

    #[test]
    fn spectral_dimension_extraction_leaves_the_input_alone() {
        let map = mapping(json!({ "channels": ["1H"], "spectral_dimensions": [{ "count": 8 }] }));
        let (dimensions, remaining) = extract_spectral_dimensions(&map, 1).expect("array");

        assert_eq!(dimensions, vec![json!({ "count": 8 })]);
        assert!(!remaining.contains_key("spectral_dimensions"));
        assert!(map.contains_key("spectral_dimensions"));

        let (defaults, _) = extract_spectral_dimensions(&Mapping::new(), 2).expect("absent");
        assert_eq!(defaults, vec![json!({}), json!({})]);
    }

    #[test]
    fn factory_carries_name_and_docstring() {
        let table = IsotopeTable::standard();
        let factory = generate_method(&METHOD_2D, METHOD_2D.docstring());
        assert_eq!(factory.name(), "Method2D");
        assert!(factory.docstring().contains("affine_matrix"));

        let method = factory
            .build(&mapping(json!({ "channels": ["1H"], "name": "shifted-echo" })), &table)
            .expect("factory builds");
        assert_eq!(method.name.as_deref(), Some("shifted-echo"));
    }
}
