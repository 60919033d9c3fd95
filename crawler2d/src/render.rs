use crate::geometry::{direction, heading, solve_two_bone_ik};
use crate::{Creature, Leg, SpineSegment};
use glam::Vec2;
use std::f32::consts::FRAC_PI_2;

/// Legs lifted higher than this use the highlighted bone palette.
const LIFTED_THRESHOLD: f32 = 2.0;

const SHOULDER_JOINT_RADIUS: f32 = 5.0;
const ELBOW_JOINT_RADIUS: f32 = 4.0;
const UPPER_BONE_THICKNESS: f32 = 5.0;
const LOWER_BONE_THICKNESS: f32 = 4.0;

/// Non-premultiplied RGBA, components in `[0, 1]`.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Color {
    pub const WHITE: Self = Self::rgb(255, 255, 255);
    pub const BLACK: Self = Self::rgb(0, 0, 0);
    pub const TRANSPARENT: Self = Self::BLACK.with_alpha(0.0);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self {
            r: r as f32 / 255.0,
            g: g as f32 / 255.0,
            b: b as f32 / 255.0,
            a: 1.0,
        }
    }

    pub const fn with_alpha(self, a: f32) -> Self {
        Self { a, ..self }
    }

    /// `[r, g, b]` scaled to `0..=255`.
    pub fn to_rgb8(self) -> [u8; 3] {
        [self.r, self.g, self.b].map(|c| (c.max(0.0).min(1.0) * 255.0).round() as u8)
    }
}

const SHADOW: Color = Color::BLACK;
const BONE_LIGHT: [Color; 3] = [
    Color::rgb(0xe8, 0xe8, 0xe8),
    Color::rgb(0xd8, 0xd8, 0xd8),
    Color::rgb(0xa0, 0xa0, 0xa0),
];
const BONE_LIFTED: [Color; 3] = [
    Color::rgb(0xff, 0xff, 0xff),
    Color::rgb(0xf5, 0xf5, 0xf5),
    Color::rgb(0xcc, 0xcc, 0xcc),
];
const JOINT: [Color; 3] = [
    Color::rgb(0xff, 0xff, 0xff),
    Color::rgb(0xd0, 0xd0, 0xd0),
    Color::rgb(0x90, 0x90, 0x90),
];
const SKULL: [Color; 3] = [
    Color::rgb(0xff, 0xff, 0xff),
    Color::rgb(0xe8, 0xe8, 0xe8),
    Color::rgb(0xa0, 0xa0, 0xa0),
];
const CLAW: Color = Color::rgb(0x88, 0x88, 0x88);
const RIB: Color = Color::rgb(0xb0, 0xb0, 0xb0);
const EYE_SOCKET: Color = Color::rgb(0x1a, 0x1a, 0x1a);
const EYE_GLOW: Color = Color::rgb(0xff, 0x00, 0x00);
const TOOTH: Color = Color::rgb(0xc0, 0xc0, 0xc0);

#[derive(Copy, Clone, Debug, PartialEq)]
pub struct GradientStop {
    pub offset: f32,
    pub color: Color,
}

impl GradientStop {
    pub const fn new(offset: f32, color: Color) -> Self {
        Self { offset, color }
    }
}

/// Fill style. Gradient coordinates are in the current (translated/rotated) frame.
#[derive(Clone, Debug, PartialEq)]
pub enum Paint {
    Solid(Color),
    Linear {
        start: Vec2,
        end: Vec2,
        stops: Vec<GradientStop>,
    },
    Radial {
        inner_center: Vec2,
        inner_radius: f32,
        outer_center: Vec2,
        outer_radius: f32,
        stops: Vec<GradientStop>,
    },
}

impl Paint {
    fn stops3(colors: [Color; 3], middle: f32) -> Vec<GradientStop> {
        vec![
            GradientStop::new(0.0, colors[0]),
            GradientStop::new(middle, colors[1]),
            GradientStop::new(1.0, colors[2]),
        ]
    }
}

/// One immediate-mode 2D drawing instruction, in the order it must be replayed.
#[derive(Clone, Debug, PartialEq)]
pub enum DrawCommand {
    Save,
    Restore,
    Translate(Vec2),
    Rotate(f32),
    FillEllipse {
        center: Vec2,
        radii: Vec2,
        rotation: f32,
        paint: Paint,
    },
    FillCircle {
        center: Vec2,
        radius: f32,
        paint: Paint,
    },
    FillRect {
        origin: Vec2,
        size: Vec2,
        paint: Paint,
    },
    FillRoundRect {
        origin: Vec2,
        size: Vec2,
        radius: f32,
        paint: Paint,
    },
    FillTriangle {
        points: [Vec2; 3],
        paint: Paint,
    },
    StrokeQuadratic {
        from: Vec2,
        control: Vec2,
        to: Vec2,
        color: Color,
        width: f32,
    },
    FillText {
        position: Vec2,
        text: String,
        /// Monospace font size in pixels.
        size_px: f32,
        color: Color,
    },
}

/// Something that can execute draw commands, e.g. a Canvas2D context.
pub trait RenderSink {
    fn draw(&mut self, command: &DrawCommand);
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct DrawList {
    pub commands: Vec<DrawCommand>,
}

impl DrawList {
    pub fn clear(&mut self) {
        self.commands.clear();
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    pub fn push(&mut self, command: DrawCommand) {
        self.commands.push(command);
    }

    pub fn replay<S: RenderSink + ?Sized>(&self, sink: &mut S) {
        for command in &self.commands {
            sink.draw(command);
        }
    }
}

impl RenderSink for DrawList {
    fn draw(&mut self, command: &DrawCommand) {
        self.commands.push(command.clone());
    }
}

pub fn build_draw_list(creature: &Creature) -> DrawList {
    let mut out = DrawList::default();
    append_draw_list(&mut out, creature);
    out
}

/// Projects the creature: legs first, then the spine from tail to head.
pub fn append_draw_list(out: &mut DrawList, creature: &Creature) {
    let segments = creature.spine().segments();
    for leg in creature.legs() {
        if let Some(segment) = segments.get(leg.segment_index()) {
            append_leg(out, leg, segment, creature);
        }
    }
    append_spine(out, segments);
}

fn append_leg(out: &mut DrawList, leg: &Leg, segment: &SpineSegment, creature: &Creature) {
    let shoulder = leg.shoulder_for(segment, &creature.config().gait);
    let foot = leg.render_foot - Vec2::new(0.0, leg.render_lift_height);
    let ik = solve_two_bone_ik(
        shoulder,
        foot,
        leg.upper_len,
        leg.lower_len,
        leg.bend_direction(),
    );
    let lifted = leg.lift_height > LIFTED_THRESHOLD;

    append_joint(out, shoulder, SHOULDER_JOINT_RADIUS);
    append_bone(out, shoulder, ik.elbow, UPPER_BONE_THICKNESS, lifted);
    append_joint(out, ik.elbow, ELBOW_JOINT_RADIUS);
    append_bone(out, ik.elbow, ik.end, LOWER_BONE_THICKNESS, lifted);

    out.push(DrawCommand::Save);
    out.push(DrawCommand::Translate(ik.end));
    out.push(DrawCommand::Rotate(ik.lower_angle));
    out.push(DrawCommand::FillTriangle {
        points: [Vec2::ZERO, Vec2::new(12.0, -3.0), Vec2::new(12.0, 3.0)],
        paint: Paint::Solid(CLAW),
    });
    out.push(DrawCommand::Restore);
}

fn append_spine(out: &mut DrawList, segments: &[SpineSegment]) {
    let count = segments.len();
    for i in (0..count).rev() {
        let segment = &segments[i];
        if i == 0 {
            append_head(out, segment);
            continue;
        }

        let prev = &segments[i - 1];
        append_bone(out, segment.position, prev.position, segment.width * 0.4, false);
        append_joint(out, segment.position, segment.width * 0.35);
        if i % 3 == 0 && i + 3 < count {
            append_ribs(out, segment);
        }
    }
}

fn append_ribs(out: &mut DrawList, segment: &SpineSegment) {
    let perp = segment.angle + FRAC_PI_2;
    let length = segment.width * 1.2;
    for side in [-1.0f32, 1.0] {
        let to = segment.position + direction(perp) * side * length;
        let control = segment.position + direction(perp + side * 0.3) * side * length * 0.6;
        out.push(DrawCommand::StrokeQuadratic {
            from: segment.position,
            control,
            to,
            color: RIB,
            width: 2.0,
        });
    }
}

/// Bone from `a` to `b`: drop shadow, two knuckle ellipses and a rounded shaft.
fn append_bone(out: &mut DrawList, a: Vec2, b: Vec2, thickness: f32, lifted: bool) {
    let delta = b - a;
    let length = delta.length();
    let t = thickness;

    out.push(DrawCommand::Save);
    out.push(DrawCommand::Translate(a));
    out.push(DrawCommand::Rotate(heading(delta)));

    out.push(DrawCommand::FillEllipse {
        center: Vec2::new(length * 0.5, 3.0),
        radii: Vec2::new(length * 0.5 + 2.0, t * 0.5 + 1.0),
        rotation: 0.0,
        paint: Paint::Solid(SHADOW.with_alpha(0.3)),
    });

    let palette = if lifted { BONE_LIFTED } else { BONE_LIGHT };
    let paint = Paint::Linear {
        start: Vec2::new(0.0, -t),
        end: Vec2::new(0.0, t),
        stops: Paint::stops3(palette, 0.3),
    };
    out.push(DrawCommand::FillEllipse {
        center: Vec2::new(4.0, 0.0),
        radii: Vec2::new(t * 0.7, t * 0.6),
        rotation: 0.0,
        paint: paint.clone(),
    });
    out.push(DrawCommand::FillEllipse {
        center: Vec2::new(length - 4.0, 0.0),
        radii: Vec2::new(t * 0.6, t * 0.5),
        rotation: 0.0,
        paint: paint.clone(),
    });
    out.push(DrawCommand::FillRoundRect {
        origin: Vec2::new(4.0, -t * 0.35),
        size: Vec2::new((length - 8.0).max(0.0), t * 0.7),
        radius: t * 0.3,
        paint,
    });

    out.push(DrawCommand::Restore);
}

fn append_joint(out: &mut DrawList, center: Vec2, radius: f32) {
    out.push(DrawCommand::FillCircle {
        center: center + Vec2::splat(2.0),
        radius,
        paint: Paint::Solid(SHADOW.with_alpha(0.25)),
    });
    out.push(DrawCommand::FillCircle {
        center,
        radius,
        paint: Paint::Radial {
            inner_center: center - Vec2::splat(radius * 0.3),
            inner_radius: 0.0,
            outer_center: center,
            outer_radius: radius,
            stops: Paint::stops3(JOINT, 0.5),
        },
    });
}

fn append_head(out: &mut DrawList, head: &SpineSegment) {
    out.push(DrawCommand::Save);
    out.push(DrawCommand::Translate(head.position));
    out.push(DrawCommand::Rotate(head.angle));

    out.push(DrawCommand::FillEllipse {
        center: Vec2::new(3.0, 3.0),
        radii: Vec2::new(22.0, 16.0),
        rotation: 0.0,
        paint: Paint::Solid(SHADOW.with_alpha(0.3)),
    });
    out.push(DrawCommand::FillEllipse {
        center: Vec2::ZERO,
        radii: Vec2::new(20.0, 15.0),
        rotation: 0.0,
        paint: Paint::Radial {
            inner_center: Vec2::new(-8.0, -6.0),
            inner_radius: 0.0,
            outer_center: Vec2::ZERO,
            outer_radius: 25.0,
            stops: Paint::stops3(SKULL, 0.4),
        },
    });

    for side in [-1.0f32, 1.0] {
        out.push(DrawCommand::FillEllipse {
            center: Vec2::new(8.0, 5.0 * side),
            radii: Vec2::new(5.0, 6.0),
            rotation: -0.2 * side,
            paint: Paint::Solid(EYE_SOCKET),
        });
    }
    for side in [-1.0f32, 1.0] {
        let eye = Vec2::new(10.0, 5.0 * side);
        out.push(DrawCommand::FillCircle {
            center: eye,
            radius: 6.0,
            paint: Paint::Radial {
                inner_center: eye,
                inner_radius: 0.0,
                outer_center: eye,
                outer_radius: 6.0,
                stops: vec![
                    GradientStop::new(0.0, EYE_GLOW),
                    GradientStop::new(0.5, EYE_GLOW),
                    GradientStop::new(1.0, EYE_GLOW.with_alpha(0.0)),
                ],
            },
        });
        out.push(DrawCommand::FillCircle {
            center: eye,
            radius: 2.0,
            paint: Paint::Solid(Color::WHITE),
        });
    }

    for tooth in -3..=3 {
        let y = tooth as f32 * 3.0;
        out.push(DrawCommand::FillTriangle {
            points: [
                Vec2::new(18.0, y),
                Vec2::new(25.0, tooth as f32 * 2.5),
                Vec2::new(18.0, y + 1.5),
            ],
            paint: Paint::Solid(TOOTH),
        });
    }

    out.push(DrawCommand::Restore);
}

