use crate::{GaitClock, GaitConfig, Side, TripodGroup};

#[test]
fn tripod_groups_alternate_along_the_body_and_across_pairs() {
    assert_eq!(TripodGroup::for_leg(0, Side::Left), TripodGroup::A);
    assert_eq!(TripodGroup::for_leg(0, Side::Right), TripodGroup::B);
    assert_eq!(TripodGroup::for_leg(1, Side::Left), TripodGroup::B);
    assert_eq!(TripodGroup::for_leg(1, Side::Right), TripodGroup::A);
    assert_eq!(TripodGroup::for_leg(4, Side::Left), TripodGroup::A);
    assert_eq!(TripodGroup::A.other(), TripodGroup::B);
}

#[test]
fn clock_is_frozen_at_idle_speed() {
    let config = GaitConfig::default();
    let mut clock = GaitClock::default();
    for _ in 0..100 {
        assert_eq!(clock.advance(config.min_speed, &config), TripodGroup::A);
    }
    assert_eq!(clock.phase(), 0.0);
}

#[test]
fn active_group_switches_only_past_the_hysteresis_band() {
    let config = GaitConfig::default();
    let mut clock = GaitClock::default();
    let mut switches = Vec::new();
    let mut last = clock.active_group();
    for _ in 0..400 {
        let group = clock.advance(1.0, &config);
        let wave = clock.phase().sin();
        if group != last {
            switches.push(wave);
            last = group;
        }
        if wave.abs() <= config.hysteresis {
            continue;
        }
        let expected = if wave > 0.0 {
            TripodGroup::A
        } else {
            TripodGroup::B
        };
        assert_eq!(group, expected);
    }
    assert!(switches.len() >= 4, "switches: {switches:?}");
    for wave in switches {
        assert!(wave.abs() > config.hysteresis);
    }
}

#[test]
fn yield_turn_sticks_while_idle() {
    let config = GaitConfig::default();
    let mut clock = GaitClock::default();
    clock.yield_turn();
    assert_eq!(clock.active_group(), TripodGroup::B);
    assert_eq!(clock.advance(0.0, &config), TripodGroup::B);
}
