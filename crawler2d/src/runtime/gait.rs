use crate::config::GaitConfig;

/// One of the two alternating leg sets of a tripod gait.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum TripodGroup {
    A,
    B,
}

impl TripodGroup {
    /// Group of a leg from its pair index and side: neighbouring pairs alternate, and the two
    /// legs of a pair never share a group.
    pub fn for_leg(pair_index: usize, side: crate::Side) -> Self {
        let right = matches!(side, crate::Side::Right);
        if (pair_index % 2 == 1) ^ right {
            Self::B
        } else {
            Self::A
        }
    }

    pub fn index(self) -> usize {
        match self {
            Self::A => 0,
            Self::B => 1,
        }
    }

    pub fn other(self) -> Self {
        match self {
            Self::A => Self::B,
            Self::B => Self::A,
        }
    }
}

/// Global gait oscillator shared by every leg.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct GaitClock {
    phase: f32,
    active: TripodGroup,
}

impl Default for GaitClock {
    fn default() -> Self {
        Self {
            phase: 0.0,
            active: TripodGroup::A,
        }
    }
}

impl GaitClock {
    pub fn phase(&self) -> f32 {
        self.phase
    }

    pub fn active_group(&self) -> TripodGroup {
        self.active
    }

    /// Advances the oscillator for one tick at normalized body `speed`.
    ///
    /// The oscillator is frozen at or below `min_speed`. While it runs, the active group only
    /// changes once `sin(phase)` crosses `±hysteresis`.
    pub fn advance(&mut self, speed: f32, config: &GaitConfig) -> TripodGroup {
        if speed > config.min_speed {
            self.phase += config.gait_speed.at(speed) * config.phase_step;
            let wave = self.phase.sin();
            if wave > config.hysteresis {
                self.active = TripodGroup::A;
            } else if wave < -config.hysteresis {
                self.active = TripodGroup::B;
            }
        }
        self.active
    }

    /// Hands the turn to the other group. Used while idle so both groups can settle.
    pub fn yield_turn(&mut self) {
        self.active = self.active.other();
    }
}
