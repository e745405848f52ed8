use crate::error::{InkwashError, InkwashResult};

pub use kurbo::{Affine, BezPath, Point, Rect, Vec2};

/// Index of a simulated frame since mount (frame 0 is the first tick).
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
pub struct FrameIndex(pub u64);

/// Frame rate as an exact rational (e.g. 60/1).
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Fps {
    pub num: u32,
    pub den: u32, // must be > 0
}

impl Fps {
    pub fn new(num: u32, den: u32) -> InkwashResult<Self> {
        if den == 0 {
            return Err(InkwashError::validation("Fps den must be > 0"));
        }
        if num == 0 {
            return Err(InkwashError::validation("Fps num must be > 0"));
        }
        Ok(Self { num, den })
    }

    pub fn as_f64(self) -> f64 {
        f64::from(self.num) / f64::from(self.den)
    }

    pub fn frame_duration(self) -> std::time::Duration {
        std::time::Duration::from_secs_f64(f64::from(self.den) / f64::from(self.num))
    }
}

/// Host viewport in CSS pixels plus the device-pixel-ratio used for surfaces.
///
/// A zero-area viewport is valid: it yields an empty scene population and
/// drawing is skipped until the host reports a real size.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
    pub dpr: f64,
}

impl Viewport {
    pub fn new(width: f64, height: f64, dpr: f64) -> InkwashResult<Self> {
        if !width.is_finite() || !height.is_finite() || width < 0.0 || height < 0.0 {
            return Err(InkwashError::validation(
                "Viewport dimensions must be finite and >= 0",
            ));
        }
        if !dpr.is_finite() || dpr <= 0.0 {
            return Err(InkwashError::validation("Viewport dpr must be > 0"));
        }
        Ok(Self { width, height, dpr })
    }

    /// True when there is no drawable area.
    pub fn is_empty(self) -> bool {
        self.width <= 0.0 || self.height <= 0.0
    }

    /// Surface width in device pixels.
    pub fn device_width(self) -> u32 {
        (self.width * self.dpr).ceil().max(0.0) as u32
    }

    /// Surface height in device pixels.
    pub fn device_height(self) -> u32 {
        (self.height * self.dpr).ceil().max(0.0) as u32
    }
}
