use crate::config::{GaitConfig, LegPairConfig};
use crate::geometry::{direction, ease_out_cubic, lerp, lerp_vec2};
use crate::runtime::{BodyMotion, SpineSegment, TripodGroup};
use glam::Vec2;
use std::f32::consts::{FRAC_PI_2, PI};

/// Initial foot distance from the body, as a fraction of leg length.
const INITIAL_REACH_FACTOR: f32 = 0.7;

#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum Side {
    Left,
    Right,
}

impl Side {
    pub fn sign(self) -> f32 {
        match self {
            Self::Left => -1.0,
            Self::Right => 1.0,
        }
    }
}

/// Why a leg started its current step.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum StepKind {
    /// The foot drifted from its ideal point and the leg's tripod group holds the turn.
    Turn,
    /// The body is idle and the foot is tidied onto its ideal point.
    Settle,
    /// The foot was beyond maximum reach; taken regardless of whose turn it is.
    Critical,
}

/// Speed-dependent stepping parameters, evaluated once per tick for all legs.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct StepParams {
    pub threshold: f32,
    pub step_speed: f32,
    pub lift: f32,
    pub anticipation: f32,
}

impl StepParams {
    pub fn for_speed(speed: f32, config: &GaitConfig) -> Self {
        Self {
            threshold: config.step_threshold.at(speed),
            step_speed: config.step_speed.at(speed),
            lift: config.lift.at(speed),
            anticipation: config.anticipation.at(speed),
        }
    }
}

/// Everything a leg reads during its update besides its own segment.
#[derive(Copy, Clone, Debug)]
pub struct LegTick<'a> {
    pub config: &'a GaitConfig,
    pub motion: BodyMotion,
    pub params: StepParams,
    /// The leg's group holds the turn and the other group has no foot in the air.
    pub may_step: bool,
    /// The body is below the gait's minimum speed.
    pub idle: bool,
    pub time: f64,
}

/// One leg: static rig data plus its stepping state.
#[derive(Clone, Debug)]
pub struct Leg {
    pair_index: usize,
    segment: usize,
    side: Side,
    group: TripodGroup,

    pub upper_len: f32,
    pub lower_len: f32,
    pub spread: f32,

    /// Logical (planted or interpolated) foot.
    pub foot: Vec2,
    pub target_foot: Vec2,
    pub previous_foot: Vec2,
    /// Visually damped foot used by the renderer.
    pub render_foot: Vec2,
    pub lift_height: f32,
    pub render_lift_height: f32,
    pub step_phase: f32,
    pub is_moving: bool,
    pub last_step_time: f64,
    pub last_step: Option<StepKind>,

    /// Shoulder anchor as of the last update.
    pub shoulder: Vec2,
    /// Ideal foot placement as of the last update.
    pub ideal_foot: Vec2,
}

impl Leg {
    pub fn new(pair_index: usize, pair: &LegPairConfig, side: Side, center: Vec2) -> Self {
        let reach = (pair.upper_len + pair.lower_len) * INITIAL_REACH_FACTOR;
        let foot = center + Vec2::new(side.sign() * reach, 0.0);
        Self {
            pair_index,
            segment: pair.spine_index,
            side,
            group: TripodGroup::for_leg(pair_index, side),
            upper_len: pair.upper_len,
            lower_len: pair.lower_len,
            spread: pair.spread,
            foot,
            target_foot: foot,
            previous_foot: foot,
            render_foot: foot,
            lift_height: 0.0,
            render_lift_height: 0.0,
            step_phase: 0.0,
            is_moving: false,
            last_step_time: 0.0,
            last_step: None,
            shoulder: center,
            ideal_foot: foot,
        }
    }

    pub fn pair_index(&self) -> usize {
        self.pair_index
    }

    /// Index of the spine segment this leg hangs from.
    pub fn segment_index(&self) -> usize {
        self.segment
    }

    pub fn side(&self) -> Side {
        self.side
    }

    pub fn group(&self) -> TripodGroup {
        self.group
    }

    pub fn length(&self) -> f32 {
        self.upper_len + self.lower_len
    }

    pub fn max_reach(&self, config: &GaitConfig) -> f32 {
        self.length() - config.reach_margin
    }

    /// Elbow bend passed to the IK solver, mirrored per side.
    pub fn bend_direction(&self) -> i32 {
        match self.side {
            Side::Left => 1,
            Side::Right => -1,
        }
    }

    pub fn shoulder_for(&self, segment: &SpineSegment, config: &GaitConfig) -> Vec2 {
        let perp = segment.angle + FRAC_PI_2;
        segment.position + direction(perp) * self.side.sign() * segment.width * config.shoulder_offset
    }

    /// Foot placement the leg steps toward: splayed out from the segment and pushed ahead along
    /// the body velocity.
    pub fn ideal_placement(
        &self,
        segment: &SpineSegment,
        motion: &BodyMotion,
        config: &GaitConfig,
        params: &StepParams,
    ) -> Vec2 {
        let sign = self.side.sign();
        let perp = segment.angle + FRAC_PI_2;
        let reach = self.length() * config.reach_factor;
        let leg_angle = perp + sign * config.splay_angle * self.spread;
        let mut ideal = segment.position + direction(leg_angle) * sign * reach;

        if motion.velocity.length() > config.anticipation_min_velocity {
            ideal += motion.velocity.normalize_or_zero() * params.anticipation;
        }
        ideal
    }

    /// Advances the leg by one tick. Returns the kind of step started this tick, if any.
    pub fn update(&mut self, segment: &SpineSegment, tick: &LegTick<'_>) -> Option<StepKind> {
        let config = tick.config;
        let shoulder = self.shoulder_for(segment, config);
        let ideal = self.ideal_placement(segment, &tick.motion, config, &tick.params);
        self.shoulder = shoulder;
        self.ideal_foot = ideal;

        let max_reach = self.max_reach(config);
        let started = if self.is_moving {
            None
        } else {
            let drift = ideal.distance(self.foot);
            let reach = shoulder.distance(self.foot);
            let needs_step =
                drift > tick.params.threshold || reach > max_reach * config.needs_step_ratio;

            let kind = if tick.may_step && needs_step {
                Some(StepKind::Turn)
            } else if reach > max_reach {
                Some(StepKind::Critical)
            } else if tick.may_step && tick.idle && drift > config.settle_tolerance {
                Some(StepKind::Settle)
            } else {
                None
            };
            if let Some(kind) = kind {
                self.begin_step(ideal, kind, tick.time);
            }
            kind
        };

        if self.is_moving {
            self.advance_step(&tick.params);
        } else {
            self.lift_height = 0.0;
        }

        self.limit_reach(shoulder, max_reach, config.overreach_correction);

        let smoothing = if self.is_moving {
            config.render_smoothing_moving
        } else {
            config.render_smoothing_planted
        };
        self.render_foot = lerp_vec2(self.render_foot, self.foot, smoothing);
        self.render_lift_height = lerp(
            self.render_lift_height,
            self.lift_height,
            config.lift_smoothing,
        );

        started
    }

    fn begin_step(&mut self, target: Vec2, kind: StepKind, time: f64) {
        self.is_moving = true;
        self.step_phase = 0.0;
        self.previous_foot = self.foot;
        self.target_foot = target;
        self.last_step_time = time;
        self.last_step = Some(kind);
    }

    fn advance_step(&mut self, params: &StepParams) {
        self.step_phase += params.step_speed;
        if self.step_phase >= 1.0 {
            self.is_moving = false;
            self.step_phase = 1.0;
            self.foot = self.target_foot;
            self.lift_height = 0.0;
        } else {
            let t = ease_out_cubic(self.step_phase);
            self.foot = lerp_vec2(self.previous_foot, self.target_foot, t);
            self.lift_height = (self.step_phase * PI).sin() * params.lift;
        }
    }

    /// Pulls an overextended foot part of the way back to maximum reach, then hard-limits it to
    /// the full leg length.
    fn limit_reach(&mut self, shoulder: Vec2, max_reach: f32, correction: f32) {
        let offset = self.foot - shoulder;
        let dist = offset.length();
        if dist <= max_reach {
            return;
        }

        let boundary = shoulder + offset / dist * max_reach;
        self.foot = lerp_vec2(self.foot, boundary, correction);

        let length = self.length();
        let offset = self.foot - shoulder;
        let dist = offset.length();
        if dist > length {
            self.foot = shoulder + offset * (length / dist);
        }
    }
}
