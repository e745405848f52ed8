use crate::core::Point;
use crate::error::InkwashResult;
use crate::surface::Surface;

/// Frames a trail point lives before it is discarded.
pub const TRAIL_AGE_LIMIT: u32 = 20;
/// Stroke width at age 0, in CSS pixels.
pub const TRAIL_MAX_WIDTH: f64 = 4.0;
/// Narrowest stroke the trail will draw.
pub const TRAIL_MIN_WIDTH: f64 = 0.5;
/// Stroke alpha at age 0.
pub const TRAIL_MAX_ALPHA: f64 = 0.3;
/// Dark ink color, straight RGB.
pub const TRAIL_INK_RGB: [u8; 3] = [30, 41, 59];

/// One recorded pointer position, aged by the frame tick.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TrailPoint {
    pub pos: Point,
    pub age: u32,
}

/// Fraction of life remaining at `age`: 1 when fresh, approaching 0 at the
/// age limit.
pub fn age_factor(age: u32) -> f64 {
    1.0 - f64::from(age) / f64::from(TRAIL_AGE_LIMIT)
}

/// Stroke width for a segment whose older endpoint has `age`.
pub fn stroke_width(age: u32) -> f64 {
    (TRAIL_MAX_WIDTH * age_factor(age)).max(TRAIL_MIN_WIDTH)
}

/// Stroke alpha for a segment whose older endpoint has `age`.
pub fn stroke_alpha(age: u32) -> f64 {
    TRAIL_MAX_ALPHA * age_factor(age)
}

/// The pointer ink trail: a buffer of recent pointer positions, aged each
/// frame and drawn as a fading, narrowing stroke.
///
/// Compositing is the stage's concern: the trail's surface is blended with a
/// multiply kernel so the ink darkens whatever sits beneath it.
pub struct InkTrail {
    points: Vec<TrailPoint>,
    enabled: bool,
}

impl InkTrail {
    /// `hover_capable` is false on touch-primary devices; the trail then
    /// records and draws nothing so no per-frame work is wasted.
    pub fn new(hover_capable: bool) -> Self {
        Self {
            points: Vec::new(),
            enabled: hover_capable,
        }
    }

    pub fn enabled(&self) -> bool {
        self.enabled
    }

    /// Record a pointer-move position as a fresh point. Called once per move
    /// event; the point is drawn at full width and alpha on the frame it was
    /// recorded and ages out over the following ticks.
    pub fn record(&mut self, pos: Point) {
        if !self.enabled {
            return;
        }
        self.points.push(TrailPoint { pos, age: 0 });
    }

    /// Age every point by one frame and discard the expired. Runs before
    /// this frame's input is absorbed, so points recorded in the current
    /// frame keep age 0 for their first draw.
    pub fn tick(&mut self) {
        for p in &mut self.points {
            p.age += 1;
        }
        self.points.retain(|p| p.age < TRAIL_AGE_LIMIT);
    }

    /// Live points, oldest first.
    pub fn points(&self) -> &[TrailPoint] {
        &self.points
    }

    /// Draw each adjacent pair as a round-capped segment, tapered by the
    /// older endpoint's age. Always clears the surface first so strokes from
    /// earlier frames never linger after their points expire.
    pub fn render(&self, surface: &mut Surface) -> InkwashResult<()> {
        let points = &self.points;
        surface.draw(|p| {
            for pair in points.windows(2) {
                let older = pair[0];
                let newer = pair[1];
                p.set_color(TRAIL_INK_RGB, stroke_alpha(older.age));
                p.stroke_segment(older.pos, newer.pos, stroke_width(older.age));
            }
            Ok(())
        })
    }
}
