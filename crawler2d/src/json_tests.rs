use crate::{CreatureConfig, Error, LegPairConfig};

fn assert_approx(actual: f32, expected: f32) {
    let diff = (actual - expected).abs();
    assert!(
        diff <= 1.0e-6,
        "expected {expected}, got {actual} (diff {diff})"
    );
}

#[test]
fn empty_object_is_the_default_config() {
    let config = CreatureConfig::from_json_str("{}").unwrap();
    assert_eq!(config, CreatureConfig::default());
}

#[test]
fn partial_config_overrides_only_the_given_keys() {
    let config = CreatureConfig::from_json_str(
        r#"{
            "padding": 12,
            "spine": { "segmentCount": 12, "followSmoothing": { "fast": 0.9 } },
            "motion": { "turnRate": { "slow": 0.05 }, "maxSlipAngle": 0.5 },
            "legs": [{ "spineIndex": 3, "upperLen": 20, "lowerLen": 25 }]
        }"#,
    )
    .unwrap();
    let defaults = CreatureConfig::default();

    assert_approx(config.padding, 12.0);
    assert_eq!(config.spine.segment_count, 12);
    assert_approx(config.spine.spacing, defaults.spine.spacing);
    assert_approx(
        config.spine.follow_smoothing.slow,
        defaults.spine.follow_smoothing.slow,
    );
    assert_approx(config.spine.follow_smoothing.fast, 0.9);
    assert_approx(config.motion.turn_rate.slow, 0.05);
    assert_approx(config.motion.turn_rate.fast, defaults.motion.turn_rate.fast);
    assert_approx(config.motion.max_slip_angle, 0.5);
    assert_eq!(config.gait, defaults.gait);
    assert_eq!(config.legs, vec![LegPairConfig::new(3, 20.0, 25.0, 1.0)]);
}

#[test]
fn malformed_json_is_a_parse_error() {
    let err = CreatureConfig::from_json_str("{ \"padding\": ").unwrap_err();
    assert!(matches!(err, Error::JsonParse { .. }));

    let err = CreatureConfig::from_json_str(r#"{ "padding": "wide" }"#).unwrap_err();
    assert!(matches!(err, Error::JsonParse { .. }));
}

#[test]
fn parsed_config_is_validated() {
    let err = CreatureConfig::from_json_str(
        r#"{ "legs": [{ "spineIndex": 25, "upperLen": 20, "lowerLen": 25 }] }"#,
    )
    .unwrap_err();
    assert!(matches!(
        err,
        Error::InvalidLegSegment {
            pair: 0,
            segment: 25,
            segment_count: 20
        }
    ));

    let err = CreatureConfig::from_json_str(r#"{ "spine": { "spacing": -1 } }"#).unwrap_err();
    assert!(matches!(err, Error::InvalidValue { .. }));
}

#[test]
fn bundled_web_config_matches_the_defaults() {
    let config =
        CreatureConfig::from_json_str(include_str!("../../crawler2d-web/assets/creature.json"))
            .unwrap();
    assert_eq!(config, CreatureConfig::default());
}
