use crate::Error;
use crate::geometry::lerp;
use std::f32::consts::PI;

/// A tunable that varies with normalized body speed (`0` = idle, `1` = full speed).
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct SpeedRange {
    pub slow: f32,
    pub fast: f32,
}

impl SpeedRange {
    pub const fn new(slow: f32, fast: f32) -> Self {
        Self { slow, fast }
    }

    #[inline]
    pub fn at(&self, speed: f32) -> f32 {
        lerp(self.slow, self.fast, speed)
    }

    fn is_finite(&self) -> bool {
        self.slow.is_finite() && self.fast.is_finite()
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct SpineConfig {
    pub segment_count: usize,
    pub spacing: f32,
    pub head_width: f32,
    /// Width lost per segment toward the tail.
    pub width_taper: f32,
    pub min_width: f32,
    /// Maximum deviation of a follower from the in-line heading of its predecessor.
    pub max_bend_angle: f32,
    /// Non-adjacent segments are pushed apart below `spacing * min_separation_ratio`.
    pub min_separation_ratio: f32,
    pub follow_smoothing: SpeedRange,
    /// Damping used while coasting with no pointer.
    pub rest_smoothing: f32,
}

impl Default for SpineConfig {
    fn default() -> Self {
        Self {
            segment_count: 20,
            spacing: 18.0,
            head_width: 28.0,
            width_taper: 1.2,
            min_width: 8.0,
            max_bend_angle: PI * 0.15,
            min_separation_ratio: 0.8,
            follow_smoothing: SpeedRange::new(0.5, 0.8),
            rest_smoothing: 0.3,
        }
    }
}

impl SpineConfig {
    pub fn segment_width(&self, index: usize) -> f32 {
        (self.head_width - index as f32 * self.width_taper).max(self.min_width)
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct MotionConfig {
    /// Upper bound for a single tick's time step, in seconds.
    pub max_dt: f32,
    /// Lower bound on the divisor used for instantaneous pointer speed.
    pub min_speed_dt: f32,
    /// Smoothed pointer speed (px/s) that maps to normalized speed `1`.
    pub speed_scale: f32,
    pub speed_smoothing: f32,
    /// Per-tick decay of speed and velocity while the pointer is away.
    pub idle_decay: f32,
    pub velocity_smoothing: f32,
    pub pointer_smoothing: SpeedRange,
    pub follow_speed: SpeedRange,
    /// Radians per tick.
    pub turn_rate: SpeedRange,
    /// Weight of the current heading when blending toward the target heading.
    pub facing_weight: SpeedRange,
    /// Largest angle between the head's movement and the bearing to the cursor.
    pub max_slip_angle: f32,
    pub arrive_radius: f32,
    pub wiggle_amplitude: f32,
    pub wiggle_min_speed: f32,
    pub wave_amplitude: SpeedRange,
    pub wave_frequency: SpeedRange,
    pub wave_time_scale: f32,
    pub wave_segment_phase: f32,
    /// Speed at which the traveling wave is fully blended in.
    pub idle_blend_speed: f32,
}

impl Default for MotionConfig {
    fn default() -> Self {
        Self {
            max_dt: 0.1,
            min_speed_dt: 0.016,
            speed_scale: 800.0,
            speed_smoothing: 0.1,
            idle_decay: 0.15,
            velocity_smoothing: 0.6,
            pointer_smoothing: SpeedRange::new(0.1, 0.4),
            follow_speed: SpeedRange::new(0.1, 0.3),
            turn_rate: SpeedRange::new(0.03, 0.08),
            facing_weight: SpeedRange::new(0.7, 0.3),
            max_slip_angle: PI * 0.25,
            arrive_radius: 5.0,
            wiggle_amplitude: 1.5,
            wiggle_min_speed: 0.1,
            wave_amplitude: SpeedRange::new(0.1, 0.8),
            wave_frequency: SpeedRange::new(0.6, 2.0),
            wave_time_scale: 3.0,
            wave_segment_phase: 0.4,
            idle_blend_speed: 0.12,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct GaitConfig {
    pub gait_speed: SpeedRange,
    /// Fixed per-tick multiplier applied to `gait_speed`.
    pub phase_step: f32,
    /// The gait oscillator only runs above this normalized speed.
    pub min_speed: f32,
    /// `sin(phase)` must cross `±hysteresis` before the active group switches.
    pub hysteresis: f32,
    pub step_threshold: SpeedRange,
    pub step_speed: SpeedRange,
    pub lift: SpeedRange,
    pub anticipation: SpeedRange,
    /// Body velocity (px/tick) below which no anticipation is applied.
    pub anticipation_min_velocity: f32,
    pub reach_factor: f32,
    /// Maximum reach is `upper + lower - reach_margin`.
    pub reach_margin: f32,
    pub needs_step_ratio: f32,
    pub overreach_correction: f32,
    /// Shoulder offset from the spine, as a fraction of segment width.
    pub shoulder_offset: f32,
    /// Splay of the ideal foot direction away from the perpendicular, scaled by each pair's spread.
    pub splay_angle: f32,
    pub settle_tolerance: f32,
    pub render_smoothing_moving: f32,
    pub render_smoothing_planted: f32,
    pub lift_smoothing: f32,
}

impl Default for GaitConfig {
    fn default() -> Self {
        Self {
            gait_speed: SpeedRange::new(1.5, 8.0),
            phase_step: 0.016,
            min_speed: 0.02,
            hysteresis: 0.3,
            step_threshold: SpeedRange::new(25.0, 60.0),
            step_speed: SpeedRange::new(0.12, 0.3),
            lift: SpeedRange::new(3.0, 12.0),
            anticipation: SpeedRange::new(5.0, 20.0),
            anticipation_min_velocity: 0.1,
            reach_factor: 0.55,
            reach_margin: 5.0,
            needs_step_ratio: 0.9,
            overreach_correction: 0.5,
            shoulder_offset: 0.4,
            splay_angle: PI * 0.25,
            settle_tolerance: 1.5,
            render_smoothing_moving: 0.6,
            render_smoothing_planted: 0.4,
            lift_smoothing: 0.5,
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq)]
pub struct LegPairConfig {
    pub spine_index: usize,
    pub upper_len: f32,
    pub lower_len: f32,
    pub spread: f32,
}

impl LegPairConfig {
    pub const fn new(spine_index: usize, upper_len: f32, lower_len: f32, spread: f32) -> Self {
        Self {
            spine_index,
            upper_len,
            lower_len,
            spread,
        }
    }
}

pub fn default_leg_pairs() -> Vec<LegPairConfig> {
    vec![
        LegPairConfig::new(2, 45.0, 55.0, 0.8),
        LegPairConfig::new(5, 50.0, 60.0, 0.9),
        LegPairConfig::new(8, 45.0, 55.0, 0.85),
        LegPairConfig::new(11, 40.0, 50.0, 0.8),
        LegPairConfig::new(14, 35.0, 45.0, 0.7),
        LegPairConfig::new(17, 25.0, 35.0, 0.6),
    ]
}

/// Every tunable of the creature. `Default` is the reference crawler.
#[derive(Clone, Debug, PartialEq)]
pub struct CreatureConfig {
    /// Inset from every viewport edge that positions are clamped to.
    pub padding: f32,
    pub spine: SpineConfig,
    pub motion: MotionConfig,
    pub gait: GaitConfig,
    pub legs: Vec<LegPairConfig>,
}

impl Default for CreatureConfig {
    fn default() -> Self {
        Self {
            padding: 30.0,
            spine: SpineConfig::default(),
            motion: MotionConfig::default(),
            gait: GaitConfig::default(),
            legs: default_leg_pairs(),
        }
    }
}

impl CreatureConfig {
    pub fn validate(&self) -> Result<(), Error> {
        non_negative("padding", self.padding)?;

        let spine = &self.spine;
        if spine.segment_count < 2 {
            return Err(Error::invalid(format!(
                "spine.segment_count must be at least 2, got {}",
                spine.segment_count
            )));
        }
        positive("spine.spacing", spine.spacing)?;
        positive("spine.head_width", spine.head_width)?;
        non_negative("spine.width_taper", spine.width_taper)?;
        positive("spine.min_width", spine.min_width)?;
        non_negative("spine.max_bend_angle", spine.max_bend_angle)?;
        non_negative("spine.min_separation_ratio", spine.min_separation_ratio)?;
        unit_interval("spine.rest_smoothing", spine.rest_smoothing)?;
        range_finite("spine.follow_smoothing", spine.follow_smoothing)?;

        let motion = &self.motion;
        positive("motion.max_dt", motion.max_dt)?;
        positive("motion.min_speed_dt", motion.min_speed_dt)?;
        positive("motion.speed_scale", motion.speed_scale)?;
        unit_interval("motion.speed_smoothing", motion.speed_smoothing)?;
        unit_interval("motion.idle_decay", motion.idle_decay)?;
        unit_interval("motion.velocity_smoothing", motion.velocity_smoothing)?;
        positive("motion.idle_blend_speed", motion.idle_blend_speed)?;
        non_negative("motion.max_slip_angle", motion.max_slip_angle)?;
        non_negative("motion.arrive_radius", motion.arrive_radius)?;
        finite("motion.wiggle_amplitude", motion.wiggle_amplitude)?;
        finite("motion.wiggle_min_speed", motion.wiggle_min_speed)?;
        finite("motion.wave_time_scale", motion.wave_time_scale)?;
        finite("motion.wave_segment_phase", motion.wave_segment_phase)?;
        for (name, range) in [
            ("motion.pointer_smoothing", motion.pointer_smoothing),
            ("motion.follow_speed", motion.follow_speed),
            ("motion.turn_rate", motion.turn_rate),
            ("motion.facing_weight", motion.facing_weight),
            ("motion.wave_amplitude", motion.wave_amplitude),
            ("motion.wave_frequency", motion.wave_frequency),
        ] {
            range_finite(name, range)?;
        }

        let gait = &self.gait;
        for (name, range) in [
            ("gait.gait_speed", gait.gait_speed),
            ("gait.step_threshold", gait.step_threshold),
            ("gait.lift", gait.lift),
            ("gait.anticipation", gait.anticipation),
        ] {
            range_finite(name, range)?;
        }
        if !(gait.step_speed.slow > 0.0 && gait.step_speed.fast > 0.0)
            || !gait.step_speed.is_finite()
        {
            return Err(Error::invalid(
                "gait.step_speed must be positive at both ends",
            ));
        }
        non_negative("gait.phase_step", gait.phase_step)?;
        finite("gait.min_speed", gait.min_speed)?;
        unit_interval("gait.hysteresis", gait.hysteresis)?;
        non_negative("gait.anticipation_min_velocity", gait.anticipation_min_velocity)?;
        positive("gait.reach_factor", gait.reach_factor)?;
        non_negative("gait.reach_margin", gait.reach_margin)?;
        positive("gait.needs_step_ratio", gait.needs_step_ratio)?;
        unit_interval("gait.overreach_correction", gait.overreach_correction)?;
        non_negative("gait.shoulder_offset", gait.shoulder_offset)?;
        finite("gait.splay_angle", gait.splay_angle)?;
        non_negative("gait.settle_tolerance", gait.settle_tolerance)?;
        unit_interval("gait.render_smoothing_moving", gait.render_smoothing_moving)?;
        unit_interval("gait.render_smoothing_planted", gait.render_smoothing_planted)?;
        unit_interval("gait.lift_smoothing", gait.lift_smoothing)?;

        for (pair, leg) in self.legs.iter().enumerate() {
            if leg.spine_index >= spine.segment_count {
                return Err(Error::InvalidLegSegment {
                    pair,
                    segment: leg.spine_index,
                    segment_count: spine.segment_count,
                });
            }
            positive(&format!("legs[{pair}].upper_len"), leg.upper_len)?;
            positive(&format!("legs[{pair}].lower_len"), leg.lower_len)?;
            finite(&format!("legs[{pair}].spread"), leg.spread)?;
            if leg.upper_len + leg.lower_len <= gait.reach_margin {
                return Err(Error::invalid(format!(
                    "legs[{pair}] is shorter than gait.reach_margin ({})",
                    gait.reach_margin
                )));
            }
        }

        Ok(())
    }
}

fn finite(name: &str, value: f32) -> Result<(), Error> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(Error::invalid(format!("{name} must be finite, got {value}")))
    }
}

fn positive(name: &str, value: f32) -> Result<(), Error> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(Error::invalid(format!("{name} must be positive, got {value}")))
    }
}

fn non_negative(name: &str, value: f32) -> Result<(), Error> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(Error::invalid(format!(
            "{name} must be non-negative, got {value}"
        )))
    }
}

fn unit_interval(name: &str, value: f32) -> Result<(), Error> {
    if value.is_finite() && (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(Error::invalid(format!("{name} must be in [0, 1], got {value}")))
    }
}

fn range_finite(name: &str, range: SpeedRange) -> Result<(), Error> {
    if range.is_finite() {
        Ok(())
    } else {
        Err(Error::invalid(format!(
            "{name} must be finite, got {}..{}",
            range.slow, range.fast
        )))
    }
}
