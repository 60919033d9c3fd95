use crate::config::{CreatureConfig, SpineConfig};
use crate::geometry::{
    angle_diff, constrain_distance, direction, heading, lerp, lerp_vec2, normalize_angle,
};
use crate::runtime::InputTracker;
use glam::Vec2;
use std::f32::consts::{FRAC_PI_2, PI};

/// Separations at or below this are left alone by the self-intersection pass.
const SEPARATION_EPSILON: f32 = 0.1;

/// Coincident head and cursor leave the heading untouched.
const TURN_EPSILON: f32 = 1.0e-3;

/// A cursor within this angle of straight behind the head keeps the previous turn direction.
const REVERSE_ZONE: f32 = 0.5;

#[derive(Copy, Clone, Debug, PartialEq)]
pub struct SpineSegment {
    pub position: Vec2,
    /// Heading in `(-PI, PI]`. The head faces its target, followers face their predecessor.
    pub angle: f32,
    pub width: f32,
}

/// Body kinematics produced by the spine and consumed by the legs and the gait clock.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct BodyMotion {
    /// Smoothed pointer speed in px/s.
    pub smooth_speed: f32,
    /// `smooth_speed` normalized into `[0, 1]`.
    pub speed: f32,
    /// Smoothed head displacement per tick.
    pub velocity: Vec2,
    /// Blend-in factor of the traveling wave, `0` when idle.
    pub idle_blend: f32,
}

/// Per-tick inputs the spine needs besides the pointer.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct SpineFrame {
    pub dt: f32,
    /// Simulation time in seconds.
    pub time: f64,
    /// Gait phase as of the previous tick; drives the head wiggle.
    pub gait_phase: f32,
}

/// Ordered body chain. Segment 0 is the head.
#[derive(Clone, Debug)]
pub struct SpineChain {
    pub(super) segments: Vec<SpineSegment>,
    spacing: f32,
    motion: BodyMotion,
    /// Sign of the last head turn, `0` before the first one.
    turn_sign: f32,
}

impl SpineChain {
    /// Builds a straight vertical chain hanging below `head`. `config` must already be
    /// validated: the chain is never empty.
    pub(crate) fn new(config: &SpineConfig, head: Vec2) -> Self {
        let segments = (0..config.segment_count)
            .map(|i| SpineSegment {
                position: head + Vec2::new(0.0, i as f32 * config.spacing),
                angle: -FRAC_PI_2,
                width: config.segment_width(i),
            })
            .collect();

        Self {
            segments,
            spacing: config.spacing,
            motion: BodyMotion::default(),
            turn_sign: 0.0,
        }
    }

    pub fn segments(&self) -> &[SpineSegment] {
        &self.segments
    }

    pub fn segment(&self, index: usize) -> Option<&SpineSegment> {
        self.segments.get(index)
    }

    pub fn head(&self) -> &SpineSegment {
        &self.segments[0]
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    pub fn spacing(&self) -> f32 {
        self.spacing
    }

    pub fn motion(&self) -> BodyMotion {
        self.motion
    }

    /// Runs one relaxation pass and returns the body motion for this tick.
    pub fn update(
        &mut self,
        input: &mut InputTracker,
        config: &CreatureConfig,
        frame: SpineFrame,
    ) -> BodyMotion {
        if input.is_tracking() {
            self.follow_pointer(input, config, frame);
        } else {
            self.coast(input, config);
        }
        self.motion
    }

    fn follow_pointer(
        &mut self,
        input: &mut InputTracker,
        config: &CreatureConfig,
        frame: SpineFrame,
    ) {
        let motion_cfg = &config.motion;
        let sample = input.advance();
        let instant_speed = sample.displacement.length() / frame.dt.max(motion_cfg.min_speed_dt);

        if sample.reset_speed {
            self.motion.smooth_speed = 0.0;
        }
        self.motion.smooth_speed = lerp(
            self.motion.smooth_speed,
            instant_speed,
            motion_cfg.speed_smoothing,
        );
        let speed = (self.motion.smooth_speed / motion_cfg.speed_scale).min(1.0);
        self.motion.speed = speed;
        self.motion.idle_blend = (speed / motion_cfg.idle_blend_speed).min(1.0);

        let cursor = input.smooth_cursor(motion_cfg.pointer_smoothing.at(speed));

        let head = &mut self.segments[0];
        let to_cursor = cursor - head.position;
        let dist = to_cursor.length();
        let target_angle = heading(to_cursor);

        if dist > TURN_EPSILON {
            let max_turn = motion_cfg.turn_rate.at(speed).max(0.0);
            let mut delta = angle_diff(head.angle, target_angle);
            if delta.abs() > PI - REVERSE_ZONE && self.turn_sign != 0.0 {
                delta = self.turn_sign * delta.abs();
            }
            let delta = delta.max(-max_turn).min(max_turn);
            if delta != 0.0 {
                self.turn_sign = delta.signum();
            }
            head.angle = normalize_angle(head.angle + delta);
        }

        let old_position = head.position;
        if dist > motion_cfg.arrive_radius {
            let step = (dist * motion_cfg.follow_speed.at(speed)).min(dist);
            let facing = motion_cfg.facing_weight.at(speed);
            let max_slip = motion_cfg.max_slip_angle;
            let slip = (angle_diff(target_angle, head.angle) * facing)
                .max(-max_slip)
                .min(max_slip);
            head.position += direction(target_angle + slip) * step;
        }

        if speed > motion_cfg.wiggle_min_speed {
            let wiggle = (frame.gait_phase * 2.0).sin() * motion_cfg.wiggle_amplitude * speed;
            head.position += direction(head.angle + FRAC_PI_2) * wiggle;
        }
        head.position = input.clamp(head.position);

        self.motion.velocity = lerp_vec2(
            self.motion.velocity,
            head.position - old_position,
            motion_cfg.velocity_smoothing,
        );

        self.relax_followers(config, frame.time);
        self.separate(config.spine.min_separation_ratio);
    }

    fn relax_followers(&mut self, config: &CreatureConfig, time: f64) {
        let motion_cfg = &config.motion;
        let speed = self.motion.speed;
        let count = self.segments.len() as f32;

        let smoothing = config.spine.follow_smoothing.at(speed);
        let max_bend = config.spine.max_bend_angle;
        let wave_amount = motion_cfg.wave_amplitude.at(speed) * self.motion.idle_blend;
        let wave_frequency = motion_cfg.wave_frequency.at(speed);
        let wave_time = wave_clock(time, motion_cfg.wave_time_scale, wave_frequency);

        for i in 1..self.segments.len() {
            let prev = self.segments[i - 1];
            let seg = &mut self.segments[i];

            let ideal = prev.angle + PI;
            let current = heading(seg.position - prev.position);
            let bend = angle_diff(ideal, current);
            let limited = if bend.abs() > max_bend {
                normalize_angle(ideal + bend.signum() * max_bend)
            } else {
                current
            };
            let candidate = prev.position + direction(limited) * self.spacing;

            let wave_phase = wave_time + i as f32 * motion_cfg.wave_segment_phase;
            let wave = wave_phase.sin() * wave_amount * (i as f32 / count);
            let offset = direction(prev.angle + FRAC_PI_2) * wave;

            seg.position = lerp_vec2(seg.position, candidate + offset, smoothing);
            seg.angle = heading(prev.position - seg.position);
        }
    }

    /// Pushes apart non-adjacent segments that came closer than the minimum separation.
    /// The head never moves here.
    pub(super) fn separate(&mut self, min_separation_ratio: f32) {
        let min_dist = self.spacing * min_separation_ratio;
        let n = self.segments.len();
        for i in 0..n {
            for j in (i + 2)..n {
                let delta = self.segments[j].position - self.segments[i].position;
                let dist = delta.length();
                if dist >= min_dist || dist <= SEPARATION_EPSILON {
                    continue;
                }
                let push = delta / dist * (min_dist - dist) * 0.5;
                if i > 0 {
                    self.segments[i].position -= push;
                }
                self.segments[j].position += push;
            }
        }
    }

    /// Pointer-less update: speed decays and the chain settles onto its spacing without the
    /// wave or bend limits, clamped to the viewport.
    fn coast(&mut self, input: &InputTracker, config: &CreatureConfig) {
        let motion_cfg = &config.motion;
        let decay = motion_cfg.idle_decay;

        self.motion.smooth_speed = lerp(self.motion.smooth_speed, 0.0, decay);
        self.motion.speed = (self.motion.smooth_speed / motion_cfg.speed_scale).min(1.0);
        self.motion.idle_blend = (self.motion.speed / motion_cfg.idle_blend_speed).min(1.0);
        self.motion.velocity = lerp_vec2(self.motion.velocity, Vec2::ZERO, decay);

        self.segments[0].position = input.clamp(self.segments[0].position);

        let smoothing = config.spine.rest_smoothing;
        for i in 1..self.segments.len() {
            let prev = self.segments[i - 1];
            let seg = &mut self.segments[i];
            let constrained = constrain_distance(seg.position, prev.position, self.spacing);
            seg.position = input.clamp(lerp_vec2(seg.position, constrained, smoothing));
            seg.angle = heading(prev.position - seg.position);
        }
    }
}

/// Wave clock at `time`, wrapped to one period before narrowing to `f32`.
pub(super) fn wave_clock(time: f64, time_scale: f32, frequency: f32) -> f32 {
    (time * f64::from(time_scale) * f64::from(frequency)).rem_euclid(std::f64::consts::TAU) as f32
}
