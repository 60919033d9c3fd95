//! Stateless geometric helpers shared by the spine, the legs and the renderer.

use glam::Vec2;
use std::f32::consts::{PI, TAU};

/// Below this separation two points are treated as coincident.
const COINCIDENT_EPSILON: f32 = 1.0e-3;

/// Margin kept between an IK target and the fully extended / fully folded pose.
const IK_REACH_MARGIN: f32 = 2.0;

/// Linear interpolation. `t` is not clamped.
#[inline]
pub fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

#[inline]
pub fn lerp_vec2(a: Vec2, b: Vec2, t: f32) -> Vec2 {
    a + (b - a) * t
}

/// Cubic ease-out: fast start, soft landing.
#[inline]
pub fn ease_out_cubic(t: f32) -> f32 {
    let inv = 1.0 - t;
    1.0 - inv * inv * inv
}

/// Unit vector pointing along `angle` (radians).
#[inline]
pub fn direction(angle: f32) -> Vec2 {
    let (sin, cos) = angle.sin_cos();
    Vec2::new(cos, sin)
}

/// Heading of `v` in radians; zero for the zero vector.
#[inline]
pub fn heading(v: Vec2) -> f32 {
    v.y.atan2(v.x)
}

/// Wraps `angle` into `(-PI, PI]`.
pub fn normalize_angle(angle: f32) -> f32 {
    let wrapped = (angle + PI).rem_euclid(TAU) - PI;
    if wrapped <= -PI { wrapped + TAU } else { wrapped }
}

/// Signed shortest rotation that takes `from` onto `to`.
#[inline]
pub fn angle_diff(from: f32, to: f32) -> f32 {
    normalize_angle(to - from)
}

/// Projects `point` onto the circle of radius `distance` around `anchor`.
///
/// Coincident points fall back to the +x direction.
pub fn constrain_distance(point: Vec2, anchor: Vec2, distance: f32) -> Vec2 {
    let delta = point - anchor;
    let current = delta.length();
    if current < COINCIDENT_EPSILON {
        return anchor + Vec2::new(distance, 0.0);
    }
    anchor + delta * (distance / current)
}

/// Output of [`solve_two_bone_ik`].
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct IkSolution {
    pub elbow: Vec2,
    /// Effective endpoint after the requested distance was clamped into the reachable band.
    pub end: Vec2,
    pub upper_angle: f32,
    pub lower_angle: f32,
}

/// Analytic two-bone IK.
///
/// The requested distance is clamped into `[|len1 - len2| + 2, len1 + len2 - 2]` before the law
/// of cosines is applied, so unreachable or degenerate targets still produce a finite pose.
/// `bend_direction >= 0` bends the elbow counter-clockwise from the origin->target line.
pub fn solve_two_bone_ik(
    origin: Vec2,
    target: Vec2,
    len1: f32,
    len2: f32,
    bend_direction: i32,
) -> IkSolution {
    let delta = target - origin;
    let angle_to_target = heading(delta);

    let min_dist = (len1 - len2).abs() + IK_REACH_MARGIN;
    let max_dist = len1 + len2 - IK_REACH_MARGIN;
    // `max` then `min` (not `clamp`): tiny bones can produce `min_dist > max_dist`.
    let dist = delta.length().max(min_dist).min(max_dist).max(COINCIDENT_EPSILON);

    let bend = if bend_direction >= 0 { 1.0 } else { -1.0 };
    let shoulder_angle = if len1 > COINCIDENT_EPSILON {
        let cos = (len1 * len1 + dist * dist - len2 * len2) / (2.0 * len1 * dist);
        cos.clamp(-1.0, 1.0).acos()
    } else {
        0.0
    };

    let upper_angle = angle_to_target + shoulder_angle * bend;
    let elbow = origin + direction(upper_angle) * len1;
    let end = origin + direction(angle_to_target) * dist;
    let lower_angle = heading(end - elbow);

    IkSolution {
        elbow,
        end,
        upper_angle,
        lower_angle,
    }
}

/// Axis-aligned rectangle in surface coordinates.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Rect {
    pub min: Vec2,
    pub max: Vec2,
}

impl Rect {
    pub fn new(min: Vec2, max: Vec2) -> Self {
        Self { min, max }
    }

    pub fn from_origin_size(origin: Vec2, size: Vec2) -> Self {
        Self {
            min: origin,
            max: origin + size,
        }
    }

    pub fn center(&self) -> Vec2 {
        (self.min + self.max) * 0.5
    }

    pub fn size(&self) -> Vec2 {
        self.max - self.min
    }

    /// Grows the rectangle by `dx` on the left/right and `dy` on the top/bottom.
    pub fn expand(&self, dx: f32, dy: f32) -> Self {
        let margin = Vec2::new(dx, dy);
        Self {
            min: self.min - margin,
            max: self.max + margin,
        }
    }

    /// Strict containment, matching the proximity tests of the text-damage effect.
    pub fn contains(&self, point: Vec2) -> bool {
        point.x > self.min.x && point.x < self.max.x && point.y > self.min.y && point.y < self.max.y
    }
}
