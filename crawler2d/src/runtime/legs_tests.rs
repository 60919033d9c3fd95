use crate::{
    BodyMotion, GaitConfig, Leg, LegPairConfig, LegTick, Side, SpineSegment, StepKind, StepParams,
};
use glam::Vec2;
use std::f32::consts::FRAC_PI_2;

fn assert_approx(actual: f32, expected: f32) {
    let diff = (actual - expected).abs();
    assert!(
        diff <= 1.0e-3,
        "expected {expected}, got {actual} (diff {diff})"
    );
}

fn segment_at(position: Vec2) -> SpineSegment {
    SpineSegment {
        position,
        angle: -FRAC_PI_2,
        width: 20.0,
    }
}

fn tick<'a>(config: &'a GaitConfig, speed: f32, may_step: bool) -> LegTick<'a> {
    LegTick {
        config,
        motion: BodyMotion {
            speed,
            ..BodyMotion::default()
        },
        params: StepParams::for_speed(speed, config),
        may_step,
        idle: speed <= config.min_speed,
        time: 0.0,
    }
}

fn leg(side: Side) -> Leg {
    Leg::new(0, &LegPairConfig::new(0, 45.0, 55.0, 0.8), side, Vec2::new(500.0, 400.0))
}

#[test]
fn new_leg_starts_planted_beside_the_body() {
    let left = leg(Side::Left);
    let right = leg(Side::Right);
    assert_approx(left.foot.x, 430.0);
    assert_approx(right.foot.x, 570.0);
    assert!(!left.is_moving);
    assert_eq!(left.bend_direction(), -right.bend_direction());
}

#[test]
fn ideal_placement_lies_on_the_leg_side() {
    let config = GaitConfig::default();
    let segment = segment_at(Vec2::new(500.0, 400.0));
    let params = StepParams::for_speed(0.0, &config);
    let motion = BodyMotion::default();

    // Heading up the screen puts the left side at negative x.
    let left = leg(Side::Left).ideal_placement(&segment, &motion, &config, &params);
    let right = leg(Side::Right).ideal_placement(&segment, &motion, &config, &params);
    assert!(left.x < 500.0);
    assert!(right.x > 500.0);
    assert_approx(left.distance(segment.position), 100.0 * config.reach_factor);
}

#[test]
fn turn_steps_need_the_turn_and_settle_steps_need_idle() {
    let config = GaitConfig::default();
    let segment = segment_at(Vec2::new(500.0, 330.0));

    let mut waiting = leg(Side::Left);
    assert_eq!(waiting.update(&segment, &tick(&config, 0.5, false)), None);
    assert!(!waiting.is_moving);

    let mut stepping = leg(Side::Left);
    assert_eq!(
        stepping.update(&segment, &tick(&config, 0.5, true)),
        Some(StepKind::Turn)
    );

    let mut settling = leg(Side::Left);
    let still = segment_at(Vec2::new(500.0, 400.0));
    assert_eq!(settling.update(&still, &tick(&config, 0.0, false)), None);
    settling.foot = settling.ideal_foot + Vec2::new(3.0, 0.0);
    let started = settling.update(&still, &tick(&config, 0.0, true));
    assert_eq!(started, Some(StepKind::Settle));
}

#[test]
fn step_arcs_and_lands_exactly_on_target() {
    let config = GaitConfig::default();
    let segment = segment_at(Vec2::new(500.0, 330.0));
    let mut leg = leg(Side::Right);
    let t = tick(&config, 1.0, true);

    assert_eq!(leg.update(&segment, &t), Some(StepKind::Turn));
    let target = leg.target_foot;
    let mut last_phase = leg.step_phase;
    let mut peak = 0.0f32;
    let mut ticks = 1;
    while leg.is_moving {
        assert_eq!(leg.update(&segment, &tick(&config, 1.0, false)), None);
        assert!(leg.step_phase > last_phase);
        last_phase = leg.step_phase;
        peak = peak.max(leg.lift_height);
        ticks += 1;
        assert!(ticks < 20);
    }
    assert_eq!(leg.foot, target);
    assert_eq!(leg.lift_height, 0.0);
    assert!(peak > config.lift.fast * 0.8);
}

#[test]
fn overreach_takes_a_critical_step_outside_the_turn() {
    let config = GaitConfig::default();
    let mut leg = leg(Side::Left);
    let far = segment_at(Vec2::new(500.0, 200.0));
    let started = leg.update(&far, &tick(&config, 0.5, false));
    assert_eq!(started, Some(StepKind::Critical));
    assert_eq!(leg.last_step, Some(StepKind::Critical));
}

#[test]
fn foot_never_exceeds_leg_length_under_teleports() {
    let config = GaitConfig::default();
    let mut leg = leg(Side::Left);
    let jumps = [
        Vec2::new(900.0, 700.0),
        Vec2::new(100.0, 100.0),
        Vec2::new(520.0, 90.0),
        Vec2::new(40.0, 760.0),
    ];
    for (i, position) in jumps.iter().cycle().take(40).enumerate() {
        let segment = SpineSegment {
            position: *position,
            angle: i as f32 * 0.7,
            width: 24.0,
        };
        for may_step in [false, true, false] {
            leg.update(&segment, &tick(&config, 1.0, may_step));
            let reach = leg.shoulder.distance(leg.foot);
            assert!(
                reach <= leg.length() + 1.0e-3,
                "reach {reach} exceeds {}",
                leg.length()
            );
        }
    }
}
