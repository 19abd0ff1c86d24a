use mrsim_core::common::IsotopeTable;
use mrsim_core::domain::{Mapping, MrsimError};
use mrsim_core::methods::{BLOCH_DECAY_SPECTRUM, METHOD_1D, PRESETS, generate_method, preset};
use serde_json::{Value, json};

fn mapping(value: Value) -> Mapping {
    value.as_object().cloned().expect("overrides should be an object")
}

fn events_override() -> Mapping {
    mapping(json!({
        "channels": ["13C"],
        "spectral_dimensions": [{
            "count": 256,
            "events": [{ "fraction": 1, "rotor_angle": "0 deg" }]
        }]
    }))
}

#[test]
fn fixed_preset_freezes_events_that_a_generic_method_accepts() {
    let table = IsotopeTable::standard();

    let bloch = generate_method(&BLOCH_DECAY_SPECTRUM, BLOCH_DECAY_SPECTRUM.docstring());
    let error = bloch
        .build(&events_override(), &table)
        .expect_err("preset events are frozen");
    assert_eq!(
        error,
        MrsimError::FrozenAttribute {
            attribute: "events".to_string(),
            method: "BlochDecaySpectrum".to_string(),
        }
    );
    assert_eq!(error.placeholder(), "INPUT.FROZEN_ATTRIBUTE");

    let generic = generate_method(&METHOD_1D, METHOD_1D.docstring());
    let method = generic
        .build(&events_override(), &table)
        .expect("generic methods take events");
    assert_eq!(method.spectral_dimensions[0].count, 256);
    assert_eq!(method.spectral_dimensions[0].events[0].rotor_angle, 0.0);
}

#[test]
fn every_preset_builds_from_channels_alone() {
    let table = IsotopeTable::standard();
    for template in &PRESETS {
        let factory = preset(template.name).expect("preset is registered");
        let method = factory
            .build(&mapping(json!({ "channels": ["1H"] })), &table)
            .expect("channels alone are enough");
        assert_eq!(method.template, template.name);
        assert_eq!(method.dimensionality(), template.spectral_dimensions);
        assert!(method.events().all(|event| event.transition_query.p == [-1]));
    }
}

#[test]
fn overrides_are_not_consumed_by_building() {
    let table = IsotopeTable::standard();
    let overrides = mapping(json!({ "channels": ["1H"], "spectral_dimensions": [{}] }));
    let before = overrides.clone();

    preset("Method1D")
        .expect("preset is registered")
        .build(&overrides, &table)
        .expect("overrides are valid");
    assert_eq!(overrides, before);
}
