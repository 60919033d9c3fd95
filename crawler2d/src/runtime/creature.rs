use crate::Error;
use crate::config::CreatureConfig;
use crate::runtime::{
    BodyMotion, FrameSnapshot, GaitClock, InputTracker, Leg, LegTick, Side, SpineChain,
    SpineFrame, StepKind, StepParams, TripodGroup, Viewport,
};

/// A leg that started a step during a tick.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct StepStart {
    /// Index into [`Creature::legs`].
    pub leg: usize,
    pub group: TripodGroup,
    pub kind: StepKind,
}

/// Summary of one simulation tick.
#[derive(Clone, Debug, PartialEq)]
pub struct TickReport {
    pub tick: u64,
    /// The time step actually applied, after clamping.
    pub dt: f32,
    pub motion: BodyMotion,
    /// Group that held the turn while the legs were updated.
    pub active_group: TripodGroup,
    pub steps: Vec<StepStart>,
}

/// The whole simulation: config, input, spine, legs and gait clock advanced together.
#[derive(Clone, Debug)]
pub struct Creature {
    config: CreatureConfig,
    input: InputTracker,
    spine: SpineChain,
    legs: Vec<Leg>,
    gait: GaitClock,
    pub(super) time: f64,
    tick: u64,
}

impl Creature {
    /// Builds the creature coiled at the viewport center, heading up.
    pub fn new(config: CreatureConfig, viewport: Viewport) -> Result<Self, Error> {
        config.validate()?;
        if !viewport.fits_padding(config.padding) {
            log::warn!(
                "viewport {}x{} is smaller than the boundary padding {}",
                viewport.width,
                viewport.height,
                config.padding
            );
        }

        let center = viewport.center();
        let input = InputTracker::new(viewport, config.padding);
        let spine = SpineChain::new(&config.spine, center);
        let legs = config
            .legs
            .iter()
            .enumerate()
            .flat_map(|(pair_index, pair)| {
                [Side::Left, Side::Right].map(|side| Leg::new(pair_index, pair, side, center))
            })
            .collect();

        Ok(Self {
            config,
            input,
            spine,
            legs,
            gait: GaitClock::default(),
            time: 0.0,
            tick: 0,
        })
    }

    pub fn config(&self) -> &CreatureConfig {
        &self.config
    }

    pub fn input(&self) -> &InputTracker {
        &self.input
    }

    /// Host notifications (pointer, visibility) go through here.
    pub fn input_mut(&mut self) -> &mut InputTracker {
        &mut self.input
    }

    pub fn viewport(&self) -> Viewport {
        self.input.viewport()
    }

    pub fn resize(&mut self, viewport: Viewport) {
        self.input.resize(viewport);
    }

    pub fn spine(&self) -> &SpineChain {
        &self.spine
    }

    pub fn legs(&self) -> &[Leg] {
        &self.legs
    }

    pub fn gait(&self) -> &GaitClock {
        &self.gait
    }

    /// Simulation time in seconds.
    pub fn time(&self) -> f64 {
        self.time
    }

    pub fn tick(&self) -> u64 {
        self.tick
    }

    /// Advances the simulation by `dt` seconds. Non-finite or negative steps count as zero and
    /// long steps are clamped to `motion.max_dt`.
    pub fn update(&mut self, dt: f32) -> TickReport {
        let dt = if dt.is_finite() {
            dt.max(0.0).min(self.config.motion.max_dt)
        } else {
            0.0
        };
        self.time += f64::from(dt);
        self.tick += 1;

        let frame = SpineFrame {
            dt,
            time: self.time,
            gait_phase: self.gait.phase(),
        };
        let motion = self.spine.update(&mut self.input, &self.config, frame);
        let active_group = self.gait.advance(motion.speed, &self.config.gait);
        let steps = self.update_legs(motion, active_group);

        TickReport {
            tick: self.tick,
            dt,
            motion,
            active_group,
            steps,
        }
    }

    fn update_legs(&mut self, motion: BodyMotion, active: TripodGroup) -> Vec<StepStart> {
        let gait = &self.config.gait;
        let params = StepParams::for_speed(motion.speed, gait);
        let idle = motion.speed <= gait.min_speed;
        let segments = self.spine.segments();

        let mut airborne = [false; 2];
        for leg in &self.legs {
            if leg.is_moving {
                airborne[leg.group().index()] = true;
            }
        }

        let mut steps = Vec::new();
        for (index, leg) in self.legs.iter_mut().enumerate() {
            let Some(segment) = segments.get(leg.segment_index()) else {
                continue;
            };
            let group = leg.group();
            let tick = LegTick {
                config: gait,
                motion,
                params,
                may_step: group == active && !airborne[group.other().index()],
                idle,
                time: self.time,
            };
            if let Some(kind) = leg.update(segment, &tick) {
                airborne[group.index()] = true;
                if kind == StepKind::Critical {
                    log::debug!(
                        "leg {index} overreached; critical step outside group {group:?}'s turn"
                    );
                }
                steps.push(StepStart {
                    leg: index,
                    group,
                    kind,
                });
            }
        }

        if idle && !self.legs.iter().any(|leg| leg.is_moving) {
            let tolerance = gait.settle_tolerance;
            let unsettled = |group: TripodGroup| {
                self.legs
                    .iter()
                    .any(|leg| leg.group() == group && leg.ideal_foot.distance(leg.foot) > tolerance)
            };
            let yield_turn = !unsettled(active) && unsettled(active.other());
            if yield_turn {
                self.gait.yield_turn();
            }
        }

        steps
    }

    /// Read-only view handed to frame observers.
    pub fn snapshot(&self, dt: f32) -> FrameSnapshot<'_> {
        FrameSnapshot {
            tick: self.tick,
            dt,
            time: self.time,
            viewport: self.viewport(),
            segments: self.spine.segments(),
            legs: &self.legs,
        }
    }
}
