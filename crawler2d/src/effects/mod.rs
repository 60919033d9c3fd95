//! Decorative frame observers. The creature never depends on these.

mod text_damage;
mod vhs;

pub use text_damage::*;
pub use vhs::*;

/// Uniform sample in `[lo, hi)`.
fn uniform(rng: &mut fastrand::Rng, lo: f32, hi: f32) -> f32 {
    lo + rng.f32() * (hi - lo)
}

#[cfg(test)]
mod vhs_tests;

#[cfg(test)]
mod text_damage_tests;
