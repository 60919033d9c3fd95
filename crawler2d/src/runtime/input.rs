use crate::Error;
use crate::geometry::lerp_vec2;
use glam::Vec2;

/// Size of the drawing surface in surface pixels.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

impl Viewport {
    pub fn new(width: f32, height: f32) -> Result<Self, Error> {
        if !(width.is_finite() && height.is_finite() && width > 0.0 && height > 0.0) {
            return Err(Error::InvalidViewport { width, height });
        }
        Ok(Self { width, height })
    }

    pub fn center(&self) -> Vec2 {
        Vec2::new(self.width * 0.5, self.height * 0.5)
    }

    /// Inclusive `(min, max)` corners of the safe interior.
    ///
    /// Collapses onto the lower bound when the viewport is narrower than twice the padding.
    pub fn interior(&self, padding: f32) -> (Vec2, Vec2) {
        let min = Vec2::splat(padding);
        let max = Vec2::new(
            (self.width - padding).max(padding),
            (self.height - padding).max(padding),
        );
        (min, max)
    }

    pub fn clamp(&self, point: Vec2, padding: f32) -> Vec2 {
        let (min, max) = self.interior(padding);
        point.max(min).min(max)
    }

    pub fn fits_padding(&self, padding: f32) -> bool {
        self.width >= padding * 2.0 && self.height >= padding * 2.0
    }
}

/// Pointer state as last reported by the host.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct PointerState {
    /// Smoothed cursor the head actually chases.
    pub current: Vec2,
    /// Latest clamped pointer sample.
    pub target: Vec2,
    /// Target as of the previous tick, used for pointer speed.
    pub previous: Vec2,
    pub on_screen: bool,
    /// Set when the pointer (or the page) comes back; cleared by the next sample.
    pub just_returned: bool,
}

/// Pointer movement consumed by the spine once per tick.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct PointerSample {
    pub target: Vec2,
    /// Target displacement since the previous tick.
    pub displacement: Vec2,
    /// The pointer re-entered since the last tick; speed history must be discarded.
    pub reset_speed: bool,
}

/// Turns raw pointer, visibility and resize notifications into a clamped, smoothed target.
#[derive(Clone, Debug)]
pub struct InputTracker {
    pointer: PointerState,
    viewport: Viewport,
    padding: f32,
    page_visible: bool,
    reset_speed: bool,
}

impl InputTracker {
    pub fn new(viewport: Viewport, padding: f32) -> Self {
        let center = viewport.center();
        Self {
            pointer: PointerState {
                current: center,
                target: center,
                previous: center,
                on_screen: true,
                just_returned: false,
            },
            viewport,
            padding,
            page_visible: true,
            reset_speed: false,
        }
    }

    pub fn pointer(&self) -> &PointerState {
        &self.pointer
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn padding(&self) -> f32 {
        self.padding
    }

    pub fn page_visible(&self) -> bool {
        self.page_visible
    }

    /// The head should chase the pointer this tick.
    pub fn is_tracking(&self) -> bool {
        self.pointer.on_screen && self.page_visible
    }

    pub fn clamp(&self, point: Vec2) -> Vec2 {
        self.viewport.clamp(point, self.padding)
    }

    pub fn pointer_moved(&mut self, x: f32, y: f32) {
        if !(x.is_finite() && y.is_finite()) {
            return;
        }
        self.pointer.target = self.clamp(Vec2::new(x, y));
        self.pointer.on_screen = true;
        if self.pointer.just_returned {
            // The jump from where the pointer left to where it came back is not movement.
            self.pointer.just_returned = false;
            self.pointer.previous = self.pointer.target;
            self.reset_speed = true;
        }
    }

    pub fn pointer_left(&mut self) {
        self.pointer.on_screen = false;
    }

    pub fn pointer_entered(&mut self) {
        self.pointer.just_returned = true;
        self.pointer.on_screen = true;
    }

    /// A hidden page stops pointer tracking; showing it again arms the re-entry reset but
    /// tracking only resumes with the next pointer sample.
    pub fn set_page_visible(&mut self, visible: bool) {
        if visible {
            self.pointer.just_returned = true;
        } else {
            self.pointer.on_screen = false;
        }
        self.page_visible = visible;
    }

    pub fn resize(&mut self, viewport: Viewport) {
        if !viewport.fits_padding(self.padding) {
            log::warn!(
                "viewport {}x{} is smaller than the boundary padding {}; clamping collapses",
                viewport.width,
                viewport.height,
                self.padding
            );
        }
        self.viewport = viewport;
        self.pointer.target = self.clamp(self.pointer.target);
        self.pointer.previous = self.clamp(self.pointer.previous);
        self.pointer.current = self.clamp(self.pointer.current);
    }

    /// Consumes this tick's pointer movement.
    pub fn advance(&mut self) -> PointerSample {
        let reset_speed = std::mem::take(&mut self.reset_speed);
        let displacement = self.pointer.target - self.pointer.previous;
        self.pointer.previous = self.pointer.target;
        PointerSample {
            target: self.pointer.target,
            displacement,
            reset_speed,
        }
    }

    /// Moves the smoothed cursor toward the target and returns it.
    pub fn smooth_cursor(&mut self, factor: f32) -> Vec2 {
        self.pointer.current = lerp_vec2(self.pointer.current, self.pointer.target, factor);
        self.pointer.current
    }
}
