//! Partial JSON creature configs. Every key is optional; absent keys keep their defaults.

use crate::{
    CreatureConfig, Error, GaitConfig, LegPairConfig, MotionConfig, SpeedRange, SpineConfig,
};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Root {
    padding: Option<f32>,
    spine: Option<SpineDef>,
    motion: Option<MotionDef>,
    gait: Option<GaitDef>,
    legs: Option<Vec<LegPairDef>>,
}

#[derive(Copy, Clone, Debug, Deserialize)]
struct SpeedRangeDef {
    slow: Option<f32>,
    fast: Option<f32>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SpineDef {
    segment_count: Option<usize>,
    spacing: Option<f32>,
    head_width: Option<f32>,
    width_taper: Option<f32>,
    min_width: Option<f32>,
    max_bend_angle: Option<f32>,
    min_separation_ratio: Option<f32>,
    follow_smoothing: Option<SpeedRangeDef>,
    rest_smoothing: Option<f32>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct MotionDef {
    max_dt: Option<f32>,
    min_speed_dt: Option<f32>,
    speed_scale: Option<f32>,
    speed_smoothing: Option<f32>,
    idle_decay: Option<f32>,
    velocity_smoothing: Option<f32>,
    pointer_smoothing: Option<SpeedRangeDef>,
    follow_speed: Option<SpeedRangeDef>,
    turn_rate: Option<SpeedRangeDef>,
    facing_weight: Option<SpeedRangeDef>,
    max_slip_angle: Option<f32>,
    arrive_radius: Option<f32>,
    wiggle_amplitude: Option<f32>,
    wiggle_min_speed: Option<f32>,
    wave_amplitude: Option<SpeedRangeDef>,
    wave_frequency: Option<SpeedRangeDef>,
    wave_time_scale: Option<f32>,
    wave_segment_phase: Option<f32>,
    idle_blend_speed: Option<f32>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GaitDef {
    gait_speed: Option<SpeedRangeDef>,
    phase_step: Option<f32>,
    min_speed: Option<f32>,
    hysteresis: Option<f32>,
    step_threshold: Option<SpeedRangeDef>,
    step_speed: Option<SpeedRangeDef>,
    lift: Option<SpeedRangeDef>,
    anticipation: Option<SpeedRangeDef>,
    anticipation_min_velocity: Option<f32>,
    reach_factor: Option<f32>,
    reach_margin: Option<f32>,
    needs_step_ratio: Option<f32>,
    overreach_correction: Option<f32>,
    shoulder_offset: Option<f32>,
    splay_angle: Option<f32>,
    settle_tolerance: Option<f32>,
    render_smoothing_moving: Option<f32>,
    render_smoothing_planted: Option<f32>,
    lift_smoothing: Option<f32>,
}

fn default_spread() -> f32 {
    1.0
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct LegPairDef {
    spine_index: usize,
    upper_len: f32,
    lower_len: f32,
    #[serde(default = "default_spread")]
    spread: f32,
}

fn set<T>(target: &mut T, value: Option<T>) {
    if let Some(value) = value {
        *target = value;
    }
}

fn set_range(target: &mut SpeedRange, value: Option<SpeedRangeDef>) {
    if let Some(def) = value {
        set(&mut target.slow, def.slow);
        set(&mut target.fast, def.fast);
    }
}

impl SpineDef {
    fn apply(self, out: &mut SpineConfig) {
        set(&mut out.segment_count, self.segment_count);
        set(&mut out.spacing, self.spacing);
        set(&mut out.head_width, self.head_width);
        set(&mut out.width_taper, self.width_taper);
        set(&mut out.min_width, self.min_width);
        set(&mut out.max_bend_angle, self.max_bend_angle);
        set(&mut out.min_separation_ratio, self.min_separation_ratio);
        set_range(&mut out.follow_smoothing, self.follow_smoothing);
        set(&mut out.rest_smoothing, self.rest_smoothing);
    }
}

impl MotionDef {
    fn apply(self, out: &mut MotionConfig) {
        set(&mut out.max_dt, self.max_dt);
        set(&mut out.min_speed_dt, self.min_speed_dt);
        set(&mut out.speed_scale, self.speed_scale);
        set(&mut out.speed_smoothing, self.speed_smoothing);
        set(&mut out.idle_decay, self.idle_decay);
        set(&mut out.velocity_smoothing, self.velocity_smoothing);
        set_range(&mut out.pointer_smoothing, self.pointer_smoothing);
        set_range(&mut out.follow_speed, self.follow_speed);
        set_range(&mut out.turn_rate, self.turn_rate);
        set_range(&mut out.facing_weight, self.facing_weight);
        set(&mut out.max_slip_angle, self.max_slip_angle);
        set(&mut out.arrive_radius, self.arrive_radius);
        set(&mut out.wiggle_amplitude, self.wiggle_amplitude);
        set(&mut out.wiggle_min_speed, self.wiggle_min_speed);
        set_range(&mut out.wave_amplitude, self.wave_amplitude);
        set_range(&mut out.wave_frequency, self.wave_frequency);
        set(&mut out.wave_time_scale, self.wave_time_scale);
        set(&mut out.wave_segment_phase, self.wave_segment_phase);
        set(&mut out.idle_blend_speed, self.idle_blend_speed);
    }
}

impl GaitDef {
    fn apply(self, out: &mut GaitConfig) {
        set_range(&mut out.gait_speed, self.gait_speed);
        set(&mut out.phase_step, self.phase_step);
        set(&mut out.min_speed, self.min_speed);
        set(&mut out.hysteresis, self.hysteresis);
        set_range(&mut out.step_threshold, self.step_threshold);
        set_range(&mut out.step_speed, self.step_speed);
        set_range(&mut out.lift, self.lift);
        set_range(&mut out.anticipation, self.anticipation);
        set(&mut out.anticipation_min_velocity, self.anticipation_min_velocity);
        set(&mut out.reach_factor, self.reach_factor);
        set(&mut out.reach_margin, self.reach_margin);
        set(&mut out.needs_step_ratio, self.needs_step_ratio);
        set(&mut out.overreach_correction, self.overreach_correction);
        set(&mut out.shoulder_offset, self.shoulder_offset);
        set(&mut out.splay_angle, self.splay_angle);
        set(&mut out.settle_tolerance, self.settle_tolerance);
        set(&mut out.render_smoothing_moving, self.render_smoothing_moving);
        set(&mut out.render_smoothing_planted, self.render_smoothing_planted);
        set(&mut out.lift_smoothing, self.lift_smoothing);
    }
}

impl CreatureConfig {
    /// Parses a partial config on top of [`CreatureConfig::default`] and validates the result.
    pub fn from_json_str(input: &str) -> Result<Self, Error> {
        let root: Root = serde_json::from_str(input).map_err(|e| Error::JsonParse {
            message: e.to_string(),
        })?;

        let mut config = Self::default();
        set(&mut config.padding, root.padding);
        if let Some(spine) = root.spine {
            spine.apply(&mut config.spine);
        }
        if let Some(motion) = root.motion {
            motion.apply(&mut config.motion);
        }
        if let Some(gait) = root.gait {
            gait.apply(&mut config.gait);
        }
        if let Some(legs) = root.legs {
            config.legs = legs
                .into_iter()
                .map(|leg| {
                    LegPairConfig::new(leg.spine_index, leg.upper_len, leg.lower_len, leg.spread)
                })
                .collect();
        }

        config.validate()?;
        Ok(config)
    }
}
