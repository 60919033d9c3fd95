use super::uniform;
use crate::geometry::Rect;
use crate::runtime::{FrameObserver, FrameSnapshot};
use glam::Vec2;

/// Spine segments inside the block grown by this much count as "near".
const BODY_NEAR_MARGIN: Vec2 = Vec2::new(30.0, 50.0);
const FOOT_NEAR_MARGIN: Vec2 = Vec2::new(20.0, 30.0);
const BODY_HIT_RADIUS: f32 = 40.0;
const FOOT_HIT_RADIUS: f32 = 30.0;
/// Seconds a glyph stays cracked before it may recover, and then spends recovering.
const RECOVER_DELAY: f64 = 0.5;
const SETTLE_DELAY: f64 = 0.5;

const FRAGMENT_GLYPHS: [char; 8] = ['/', '\\', '|', '-', '*', '.', '`', '\''];

/// Displacement applied to a cracked glyph.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct CrackOffset {
    pub x: f32,
    pub y: f32,
    pub rotation_deg: f32,
}

/// Debris shard spawned when a glyph cracks. The host animates and removes it.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct CrackFragment {
    pub glyph: char,
    pub origin: Vec2,
    pub font_size_px: f32,
    pub drift: Vec2,
    pub spin_deg: f32,
}

#[derive(Clone, Debug, PartialEq)]
pub enum DamageEvent {
    Cracked {
        index: usize,
        offset: CrackOffset,
        fragments: Vec<CrackFragment>,
    },
    Recovering {
        index: usize,
    },
    Settled {
        index: usize,
    },
}

#[derive(Copy, Clone, Debug, PartialEq)]
pub enum GlyphState {
    Intact,
    Cracked { since: f64 },
    Recovering { since: f64 },
}

#[derive(Copy, Clone, Debug, PartialEq)]
struct Glyph {
    rect: Rect,
    state: GlyphState,
}

/// Cracks glyphs of a text block that the creature walks over and lets them recover once it
/// moves away. Timing follows the simulation clock of the observed frames.
#[derive(Clone, Debug)]
pub struct TextDamage {
    rng: fastrand::Rng,
    block: Option<Rect>,
    glyphs: Vec<Glyph>,
    events: Vec<DamageEvent>,
}

impl TextDamage {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: fastrand::Rng::with_seed(seed),
            block: None,
            glyphs: Vec::new(),
            events: Vec::new(),
        }
    }

    /// Replaces the measured layout. Glyph states survive when the glyph count is unchanged.
    pub fn set_layout(&mut self, block: Rect, glyphs: Vec<Rect>) {
        self.block = Some(block);
        if glyphs.len() == self.glyphs.len() {
            for (glyph, rect) in self.glyphs.iter_mut().zip(glyphs) {
                glyph.rect = rect;
            }
        } else {
            self.glyphs = glyphs
                .into_iter()
                .map(|rect| Glyph {
                    rect,
                    state: GlyphState::Intact,
                })
                .collect();
        }
    }

    pub fn glyph_count(&self) -> usize {
        self.glyphs.len()
    }

    pub fn glyph_state(&self, index: usize) -> Option<GlyphState> {
        self.glyphs.get(index).map(|glyph| glyph.state)
    }

    pub fn drain_events(&mut self) -> std::vec::Drain<'_, DamageEvent> {
        self.events.drain(..)
    }

    fn update(&mut self, frame: &FrameSnapshot<'_>) {
        let Some(block) = self.block else {
            return;
        };
        let now = frame.time;
        let body_zone = block.expand(BODY_NEAR_MARGIN.x, BODY_NEAR_MARGIN.y);
        let foot_zone = block.expand(FOOT_NEAR_MARGIN.x, FOOT_NEAR_MARGIN.y);
        let near = frame.segment_positions().any(|p| body_zone.contains(p))
            || frame.rendered_feet().any(|p| foot_zone.contains(p));

        for (index, glyph) in self.glyphs.iter_mut().enumerate() {
            let center = glyph.rect.center();
            let mut hit = None;
            for p in frame.segment_positions() {
                if p.distance(center) < BODY_HIT_RADIUS {
                    hit = Some(p - center);
                }
            }
            for p in frame.rendered_feet() {
                if p.distance(center) < FOOT_HIT_RADIUS {
                    hit = Some(p - center);
                }
            }

            match (glyph.state, hit) {
                (GlyphState::Intact | GlyphState::Recovering { .. }, Some(hit)) => {
                    glyph.state = GlyphState::Cracked { since: now };
                    let offset = crack_offset(&mut self.rng, hit);
                    let origin = Vec2::new(center.x, glyph.rect.min.y);
                    let fragments = crack_fragments(&mut self.rng, origin);
                    self.events.push(DamageEvent::Cracked {
                        index,
                        offset,
                        fragments,
                    });
                }
                (GlyphState::Cracked { since }, _) if !near && now - since > RECOVER_DELAY => {
                    glyph.state = GlyphState::Recovering { since: now };
                    self.events.push(DamageEvent::Recovering { index });
                }
                (GlyphState::Recovering { since }, None) if now - since >= SETTLE_DELAY => {
                    glyph.state = GlyphState::Intact;
                    self.events.push(DamageEvent::Settled { index });
                }
                _ => {}
            }
        }
    }
}

impl FrameObserver for TextDamage {
    fn on_frame(&mut self, frame: &FrameSnapshot<'_>) {
        self.update(frame);
    }
}

fn crack_offset(rng: &mut fastrand::Rng, hit: Vec2) -> CrackOffset {
    let away = if hit.x > 0.0 {
        -1.0
    } else if hit.x < 0.0 {
        1.0
    } else {
        0.0
    };
    CrackOffset {
        x: away * uniform(rng, 5.0, 20.0),
        y: uniform(rng, 10.0, 30.0),
        rotation_deg: uniform(rng, -20.0, 20.0),
    }
}

fn crack_fragments(rng: &mut fastrand::Rng, origin: Vec2) -> Vec<CrackFragment> {
    let count = rng.usize(2..=4);
    (0..count)
        .map(|_| CrackFragment {
            glyph: FRAGMENT_GLYPHS[rng.usize(..FRAGMENT_GLYPHS.len())],
            origin,
            font_size_px: uniform(rng, 8.0, 16.0),
            drift: Vec2::new(uniform(rng, -30.0, 30.0), uniform(rng, 20.0, 60.0)),
            spin_deg: uniform(rng, -90.0, 90.0),
        })
        .collect()
}
