use crate::core::Vec2;
use crate::ease::Ease;
use std::time::Duration;

/// A timed, eased interpolation between two 2D values.
///
/// Advanced by the owner's frame tick; the value is a pure function of
/// elapsed time, so ticking with a large `dt` lands exactly on the target.
#[derive(Clone, Copy, Debug)]
pub struct Tween {
    from: Vec2,
    to: Vec2,
    duration: Duration,
    elapsed: Duration,
    ease: Ease,
}

impl Tween {
    pub fn new(from: Vec2, to: Vec2, duration: Duration, ease: Ease) -> Self {
        Self {
            from,
            to,
            duration,
            elapsed: Duration::ZERO,
            ease,
        }
    }

    /// Advance elapsed time, saturating at the duration.
    pub fn advance(&mut self, dt: Duration) {
        self.elapsed = (self.elapsed + dt).min(self.duration);
    }

    /// Current interpolated value.
    pub fn value(&self) -> Vec2 {
        let t = if self.duration.is_zero() {
            1.0
        } else {
            self.elapsed.as_secs_f64() / self.duration.as_secs_f64()
        };
        let k = self.ease.apply(t);
        self.from + (self.to - self.from) * k
    }

    pub fn target(&self) -> Vec2 {
        self.to
    }

    pub fn finished(&self) -> bool {
        self.elapsed >= self.duration
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoints_are_exact() {
        let mut tw = Tween::new(
            Vec2::new(10.0, 0.0),
            Vec2::new(-800.0, 0.0),
            Duration::from_millis(400),
            Ease::OutCubic,
        );
        assert_eq!(tw.value(), Vec2::new(10.0, 0.0));
        assert!(!tw.finished());
        tw.advance(Duration::from_millis(400));
        assert!(tw.finished());
        assert_eq!(tw.value(), Vec2::new(-800.0, 0.0));
    }

    #[test]
    fn overshooting_dt_saturates() {
        let mut tw = Tween::new(
            Vec2::ZERO,
            Vec2::new(100.0, 0.0),
            Duration::from_millis(500),
            Ease::OutCubic,
        );
        tw.advance(Duration::from_secs(10));
        assert!(tw.finished());
        assert_eq!(tw.value(), Vec2::new(100.0, 0.0));
    }

    #[test]
    fn out_cubic_front_loads_motion() {
        let mut tw = Tween::new(
            Vec2::ZERO,
            Vec2::new(100.0, 0.0),
            Duration::from_millis(400),
            Ease::OutCubic,
        );
        tw.advance(Duration::from_millis(200));
        assert!(tw.value().x > 50.0);
    }

    #[test]
    fn zero_duration_is_immediately_finished() {
        let tw = Tween::new(Vec2::ZERO, Vec2::new(5.0, 5.0), Duration::ZERO, Ease::Linear);
        assert!(tw.finished());
        assert_eq!(tw.value(), Vec2::new(5.0, 5.0));
    }
}
