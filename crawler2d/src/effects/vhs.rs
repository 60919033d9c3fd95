use super::uniform;
use crate::render::{Color, DrawCommand, DrawList, GradientStop, Paint};
use crate::runtime::{FrameObserver, FrameSnapshot, Viewport};
use glam::Vec2;

const STATIC_LINE_COUNT: usize = 5;
const STATIC_LINE_ALPHA: f32 = 0.03;
const GLITCH_CHANCE: f32 = 0.02;
const GLITCH_MAX: f32 = 0.5;
const GLITCH_DECAY: f32 = 0.95;
const GLITCH_VISIBLE: f32 = 0.1;
const LABEL_SIZE_PX: f32 = 12.0;

const BACKGROUND: [Color; 3] = [
    Color::rgb(0x1a, 0x15, 0x20),
    Color::rgb(0x0d, 0x0a, 0x12),
    Color::rgb(0x05, 0x03, 0x08),
];
const GLITCH_RED: Color = Color::rgb(255, 50, 50);
const GLITCH_CYAN: Color = Color::rgb(50, 255, 255);

/// A horizontal band of tape noise scrolling down the screen.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct StaticLine {
    pub y: f32,
    /// Pixels per frame.
    pub speed: f32,
    pub thickness: f32,
    pub opacity: f32,
}

/// VHS-style backdrop: gradient, scrolling static, glitch bars, REC label and vignette.
#[derive(Clone, Debug)]
pub struct VhsOverlay {
    rng: fastrand::Rng,
    lines: Vec<StaticLine>,
    glitch: f32,
    clock_label: String,
}

impl VhsOverlay {
    pub fn new(viewport: Viewport, seed: u64) -> Self {
        let mut rng = fastrand::Rng::with_seed(seed);
        let lines = (0..STATIC_LINE_COUNT)
            .map(|_| StaticLine {
                y: rng.f32() * viewport.height,
                speed: uniform(&mut rng, 1.0, 3.0),
                thickness: uniform(&mut rng, 1.0, 4.0),
                opacity: uniform(&mut rng, 0.0, 0.3),
            })
            .collect();
        Self {
            rng,
            lines,
            glitch: 0.0,
            clock_label: String::new(),
        }
    }

    pub fn static_lines(&self) -> &[StaticLine] {
        &self.lines
    }

    pub fn glitch_intensity(&self) -> f32 {
        self.glitch
    }

    pub fn clock_label(&self) -> &str {
        &self.clock_label
    }

    /// Sets the wall-clock text drawn in the top-right corner (see [`format_clock`]).
    pub fn set_clock_label(&mut self, label: impl Into<String>) {
        self.clock_label = label.into();
    }

    /// Appends one frame of the overlay and advances its noise state.
    pub fn draw(&mut self, out: &mut DrawList, viewport: Viewport) {
        let (width, height) = (viewport.width, viewport.height);
        let center = viewport.center();
        let full = (Vec2::ZERO, Vec2::new(width, height));

        out.push(DrawCommand::FillRect {
            origin: full.0,
            size: full.1,
            paint: Paint::Radial {
                inner_center: center,
                inner_radius: 0.0,
                outer_center: center,
                outer_radius: width * 0.7,
                stops: vec![
                    GradientStop::new(0.0, BACKGROUND[0]),
                    GradientStop::new(0.5, BACKGROUND[1]),
                    GradientStop::new(1.0, BACKGROUND[2]),
                ],
            },
        });

        if self.rng.f32() < GLITCH_CHANCE {
            self.glitch = self.rng.f32() * GLITCH_MAX;
        }
        self.glitch *= GLITCH_DECAY;

        for line in &mut self.lines {
            line.y += line.speed;
            if line.y > height {
                line.y = -10.0;
                line.speed = uniform(&mut self.rng, 1.0, 3.0);
            }
            out.push(DrawCommand::FillRect {
                origin: Vec2::new(0.0, line.y),
                size: Vec2::new(width, line.thickness),
                paint: Paint::Solid(Color::WHITE.with_alpha(STATIC_LINE_ALPHA * line.opacity)),
            });
        }

        if self.glitch > GLITCH_VISIBLE {
            let bars = (self.glitch * 10.0).floor() as usize;
            for _ in 0..bars {
                let y = self.rng.f32() * height;
                let bar_height = uniform(&mut self.rng, 2.0, 7.0);
                let color = if self.rng.bool() {
                    GLITCH_RED
                } else {
                    GLITCH_CYAN
                };
                out.push(DrawCommand::FillRect {
                    origin: Vec2::new(0.0, y),
                    size: Vec2::new(width, bar_height),
                    paint: Paint::Solid(color.with_alpha(self.glitch * 0.3)),
                });
            }
        }

        let label = Color::WHITE.with_alpha(0.15);
        out.push(DrawCommand::FillText {
            position: Vec2::new(20.0, 30.0),
            text: "REC \u{25cf}".to_string(),
            size_px: LABEL_SIZE_PX,
            color: label,
        });
        if !self.clock_label.is_empty() {
            out.push(DrawCommand::FillText {
                position: Vec2::new(width - 80.0, 30.0),
                text: self.clock_label.clone(),
                size_px: LABEL_SIZE_PX,
                color: label,
            });
        }

        out.push(DrawCommand::FillRect {
            origin: full.0,
            size: full.1,
            paint: Paint::Radial {
                inner_center: center,
                inner_radius: height * 0.3,
                outer_center: center,
                outer_radius: height * 0.9,
                stops: vec![
                    GradientStop::new(0.0, Color::TRANSPARENT),
                    GradientStop::new(1.0, Color::BLACK.with_alpha(0.7)),
                ],
            },
        });
    }
}

impl FrameObserver for VhsOverlay {
    fn draw_underlay(&mut self, out: &mut DrawList, frame: &FrameSnapshot<'_>) {
        self.draw(out, frame.viewport);
    }
}

/// `HH:MM:SS`, zero padded.
pub fn format_clock(hours: u32, minutes: u32, seconds: u32) -> String {
    format!("{hours:02}:{minutes:02}:{seconds:02}")
}
