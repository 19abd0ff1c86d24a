//! Recognized-option tables and the typed readers that interpret them.
//!
//! Each entity builder declares its options as a static `[OptionSpec]`
//! (name, kind with expected dimension, default). The same tables are used to
//! reject unknown keys and to document the accepted configuration.

use crate::common::quantity::{Dimension, parse_as};
use crate::domain::{Mapping, MrsimError, MrsimResult, json_type_name};
use serde::Serialize;
use serde_json::Value;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum OptionKind {
    /// A quantity string or a bare number in `unit`. Values are returned in `unit`.
    Quantity {
        dimension: Dimension,
        unit: &'static str,
    },
    Integer {
        minimum: i64,
    },
    Float,
    Nucleus,
    Text,
    Sequence,
    Mapping,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum OptionDefault {
    Required,
    Absent,
    Empty,
    Quantity(&'static str),
    Integer(i64),
    Float(f64),
    Text(&'static str),
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct OptionSpec {
    pub name: &'static str,
    pub kind: OptionKind,
    pub default: OptionDefault,
}

impl OptionSpec {
    pub const fn quantity(
        name: &'static str,
        dimension: Dimension,
        unit: &'static str,
        default: &'static str,
    ) -> Self {
        Self {
            name,
            kind: OptionKind::Quantity { dimension, unit },
            default: OptionDefault::Quantity(default),
        }
    }

    pub const fn optional_quantity(
        name: &'static str,
        dimension: Dimension,
        unit: &'static str,
    ) -> Self {
        Self {
            name,
            kind: OptionKind::Quantity { dimension, unit },
            default: OptionDefault::Absent,
        }
    }

    pub const fn new(name: &'static str, kind: OptionKind, default: OptionDefault) -> Self {
        Self {
            name,
            kind,
            default,
        }
    }
}

/// Present, non-null value for `spec`.
fn lookup<'a>(map: &'a Mapping, spec: &OptionSpec) -> Option<&'a Value> {
    map.get(spec.name).filter(|value| !value.is_null())
}

fn missing(spec: &OptionSpec, context: &str) -> MrsimError {
    MrsimError::schema(spec.name, context)
}

pub fn ensure_known_keys(map: &Mapping, table: &[OptionSpec]) -> MrsimResult<()> {
    for key in map.keys() {
        if !table.iter().any(|spec| spec.name == key) {
            let expected = table
                .iter()
                .map(|spec| spec.name)
                .collect::<Vec<_>>()
                .join(", ");
            return Err(MrsimError::validation(
                key.as_str(),
                format!("one of: {expected}"),
                "an unrecognized option",
            ));
        }
    }
    Ok(())
}

pub fn read_optional_quantity(map: &Mapping, spec: &OptionSpec) -> MrsimResult<Option<f64>> {
    let OptionKind::Quantity { dimension, unit } = spec.kind else {
        return Err(MrsimError::validation(
            spec.name,
            "a quantity option",
            "a non-quantity option",
        ));
    };

    match lookup(map, spec) {
        Some(Value::String(text)) => parse_as(text, dimension, unit, spec.name).map(Some),
        Some(Value::Number(number)) => number.as_f64().map(Some).ok_or_else(|| {
            MrsimError::validation(spec.name, "a finite number", number.to_string())
        }),
        Some(other) => Err(MrsimError::validation(
            spec.name,
            format!("a {dimension} quantity string"),
            json_type_name(other),
        )),
        None => match spec.default {
            OptionDefault::Quantity(text) => parse_as(text, dimension, unit, spec.name).map(Some),
            _ => Ok(None),
        },
    }
}

pub fn read_quantity(map: &Mapping, spec: &OptionSpec, context: &str) -> MrsimResult<f64> {
    read_optional_quantity(map, spec)?.ok_or_else(|| missing(spec, context))
}

pub fn read_integer(map: &Mapping, spec: &OptionSpec, context: &str) -> MrsimResult<i64> {
    let minimum = match spec.kind {
        OptionKind::Integer { minimum } => minimum,
        _ => i64::MIN,
    };

    let value = match lookup(map, spec) {
        Some(Value::Number(number)) => number
            .as_i64()
            .or_else(|| {
                number
                    .as_f64()
                    .filter(|value| value.fract() == 0.0 && value.abs() < 9.0e15)
                    .map(|value| value as i64)
            })
            .ok_or_else(|| {
                MrsimError::validation(spec.name, "an integer", number.to_string())
            })?,
        Some(Value::String(text)) => text.trim().parse::<i64>().map_err(|_| {
            MrsimError::validation(spec.name, "an integer", format!("'{text}'"))
        })?,
        Some(other) => {
            return Err(MrsimError::validation(
                spec.name,
                "an integer",
                json_type_name(other),
            ));
        }
        None => match spec.default {
            OptionDefault::Integer(value) => value,
            _ => return Err(missing(spec, context)),
        },
    };

    if value < minimum {
        return Err(MrsimError::validation(
            spec.name,
            format!("an integer >= {minimum}"),
            value.to_string(),
        ));
    }
    Ok(value)
}

pub fn read_float(map: &Mapping, spec: &OptionSpec, context: &str) -> MrsimResult<f64> {
    let value = match lookup(map, spec) {
        Some(Value::Number(number)) => number.as_f64(),
        Some(Value::String(text)) => text.trim().parse::<f64>().ok(),
        Some(other) => {
            return Err(MrsimError::validation(
                spec.name,
                "a number",
                json_type_name(other),
            ));
        }
        None => match spec.default {
            OptionDefault::Float(value) => Some(value),
            _ => return Err(missing(spec, context)),
        },
    };

    value.filter(|value| value.is_finite()).ok_or_else(|| {
        MrsimError::validation(
            spec.name,
            "a finite number",
            lookup(map, spec).map_or_else(String::new, Value::to_string),
        )
    })
}

pub fn read_text<'a>(map: &'a Mapping, spec: &OptionSpec) -> MrsimResult<Option<&'a str>> {
    match lookup(map, spec) {
        Some(Value::String(text)) => Ok(Some(text.as_str())),
        Some(other) => Err(MrsimError::validation(
            spec.name,
            "a string",
            json_type_name(other),
        )),
        None => match spec.default {
            OptionDefault::Text(text) => Ok(Some(text)),
            _ => Ok(None),
        },
    }
}

/// Sequence option; an absent value reads as an empty sequence.
pub fn read_sequence<'a>(map: &'a Mapping, spec: &OptionSpec) -> MrsimResult<&'a [Value]> {
    match lookup(map, spec) {
        Some(Value::Array(items)) => Ok(items.as_slice()),
        Some(other) => Err(MrsimError::validation(
            spec.name,
            "an array",
            json_type_name(other),
        )),
        None => Ok(&[]),
    }
}

pub fn read_mapping<'a>(map: &'a Mapping, spec: &OptionSpec) -> MrsimResult<Option<&'a Mapping>> {
    match lookup(map, spec) {
        Some(Value::Object(inner)) => Ok(Some(inner)),
        Some(other) => Err(MrsimError::validation(
            spec.name,
            "an object",
            json_type_name(other),
        )),
        None => Ok(None),
    }
}

/// Requires every element of `items` to be a mapping; `field` names the sequence.
pub fn sequence_of_mappings<'a>(items: &'a [Value], field: &str) -> MrsimResult<Vec<&'a Mapping>> {
    items
        .iter()
        .enumerate()
        .map(|(index, item)| {
            item.as_object().ok_or_else(|| {
                MrsimError::validation(
                    format!("{field}[{index}]"),
                    "an object",
                    json_type_name(item),
                )
            })
        })
        .collect()
}

pub fn as_mapping<'a>(value: &'a Value, field: &str) -> MrsimResult<&'a Mapping> {
    value
        .as_object()
        .ok_or_else(|| MrsimError::validation(field, "an object", json_type_name(value)))
}

#[cfg(test)]
mod tests {
    use super::{
        OptionDefault, OptionKind, OptionSpec, ensure_known_keys, read_float, read_integer,
        read_optional_quantity, read_quantity, read_sequence, sequence_of_mappings,
    };
    use crate::common::quantity::Dimension;
    use crate::domain::{Mapping, MrsimError};
    use serde_json::json;

    const WIDTH: OptionSpec =
        OptionSpec::quantity("spectral_width", Dimension::Frequency, "Hz", "100 kHz");
    const POINTS: OptionSpec = OptionSpec::new(
        "number_of_points",
        OptionKind::Integer { minimum: 1 },
        OptionDefault::Integer(1024),
    );
    const FRACTION: OptionSpec =
        OptionSpec::new("fraction", OptionKind::Float, OptionDefault::Required);

    fn mapping(value: serde_json::Value) -> Mapping {
        value.as_object().cloned().expect("test value should be an object")
    }

    #[test]
    fn quantity_defaults_and_bare_numbers_use_the_canonical_unit() {
        let empty = Mapping::new();
        assert_eq!(read_quantity(&empty, &WIDTH, "test").expect("default applies"), 1.0e5);

        let bare = mapping(json!({ "spectral_width": 2500 }));
        assert_eq!(read_quantity(&bare, &WIDTH, "test").expect("bare number in Hz"), 2500.0);

        let null = mapping(json!({ "spectral_width": null }));
        assert_eq!(read_quantity(&null, &WIDTH, "test").expect("null is absent"), 1.0e5);
    }

    #[test]
    fn quantity_of_the_wrong_kind_is_rejected() {
        let wrong = mapping(json!({ "spectral_width": "9.4 T" }));
        let error = read_quantity(&wrong, &WIDTH, "test").expect_err("tesla is not a width");
        assert!(matches!(
            error,
            MrsimError::UnitMismatch { ref field, .. } if field == "spectral_width"
        ));

        let boolean = mapping(json!({ "spectral_width": true }));
        assert!(matches!(
            read_optional_quantity(&boolean, &WIDTH),
            Err(MrsimError::Validation { .. })
        ));
    }

    #[test]
    fn integers_accept_whole_floats_and_strings_but_enforce_minimum() {
        let cases = [(json!(2048), 2048), (json!(512.0), 512), (json!("16"), 16)];
        for (value, expected) in cases {
            let map = mapping(json!({ "number_of_points": value }));
            assert_eq!(read_integer(&map, &POINTS, "test").expect("integer parses"), expected);
        }

        let zero = mapping(json!({ "number_of_points": 0 }));
        assert!(read_integer(&zero, &POINTS, "test").is_err());
        let fractional = mapping(json!({ "number_of_points": 1.5 }));
        assert!(read_integer(&fractional, &POINTS, "test").is_err());
    }

    #[test]
    fn required_float_reports_a_schema_error() {
        let error =
            read_float(&Mapping::new(), &FRACTION, "event").expect_err("fraction is required");
        assert_eq!(error, MrsimError::schema("fraction", "event"));
    }

    #[test]
    fn unknown_keys_are_listed_against_the_table() {
        let map = mapping(json!({ "spectral_width": "1 kHz", "sw": 3 }));
        let error = ensure_known_keys(&map, &[WIDTH, POINTS]).expect_err("sw is unknown");
        assert_eq!(error.field(), Some("sw"));
        assert!(error.to_string().contains("spectral_width, number_of_points"));
    }

    #[test]
    fn sequences_must_hold_mappings() {
        const SITES: OptionSpec =
            OptionSpec::new("sites", OptionKind::Sequence, OptionDefault::Empty);
        let map = mapping(json!({ "sites": [{}, 3] }));
        let items = read_sequence(&map, &SITES).expect("sites is an array");
        let error = sequence_of_mappings(items, "sites").expect_err("3 is not a mapping");
        assert_eq!(error.field(), Some("sites[1]"));

        let not_array = mapping(json!({ "sites": {} }));
        assert!(read_sequence(&not_array, &SITES).is_err());
        assert!(read_sequence(&Mapping::new(), &SITES).expect("absent is empty").is_empty());
    }
}
