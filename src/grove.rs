use crate::core::Viewport;
use crate::rng::Rng64;

/// Horizontal span of viewport width that yields one stalk.
pub const STALK_SPACING_PX: f64 = 100.0;

/// Depth-bucketed stalk color, far to near. Distant stalks wash out to slate,
/// near ones read as saturated ink green.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum ColorToken {
    Slate,
    MidGreen,
    DeepGreen,
}

impl ColorToken {
    /// Bucket a parallax depth in [0, 1) by the 0.5 / 0.8 thresholds.
    pub fn for_depth(depth: f64) -> Self {
        if depth > 0.8 {
            Self::DeepGreen
        } else if depth > 0.5 {
            Self::MidGreen
        } else {
            Self::Slate
        }
    }

    pub fn rgb8(self) -> [u8; 3] {
        match self {
            Self::Slate => [148, 163, 184],
            Self::MidGreen => [74, 222, 128],
            Self::DeepGreen => [22, 101, 52],
        }
    }
}

/// Which side of the stalk a leaf blade extends toward.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum LeafSide {
    Left,
    Right,
}

impl LeafSide {
    pub fn signum(self) -> f64 {
        match self {
            Self::Left => -1.0,
            Self::Right => 1.0,
        }
    }
}

/// A single leaf blade, immutable once generated.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Leaf {
    /// Attachment height above the stalk base, in CSS pixels.
    pub height_offset: f64,
    pub side: LeafSide,
    pub length: f64,
    /// Blade curl parameter in [0.2, 0.7), reserved for shaping.
    pub curve_angle: f64,
}

/// One procedural plant. All fields are fixed at generation time; only the
/// scene's global time makes it move.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Stalk {
    /// Horizontal anchor of the base, in CSS pixels.
    pub origin_x: f64,
    pub width: f64,
    pub total_height: f64,
    /// Stacked trapezoid segments, always in 6..=9.
    pub segment_count: u32,
    /// Constant per-segment horizontal drift giving each stalk a slight
    /// asymmetric posture.
    pub lean_bias: f64,
    pub color: ColorToken,
    /// In [0.1, 0.5); doubles as the painter's-sort depth key.
    pub opacity: f64,
    /// Oscillation rate in radians per frame.
    pub sway_speed: f64,
    pub sway_phase: f64,
    pub leaves: Vec<Leaf>,
}

impl Stalk {
    pub fn segment_height(&self) -> f64 {
        self.total_height / f64::from(self.segment_count)
    }
}

/// Build the stalk population for a viewport: one stalk per ~100px of width,
/// parallax depth uniform in [0, 1). A zero-area viewport produces an empty
/// population. Regenerated wholesale on resize; never updated incrementally.
pub fn generate(viewport: Viewport, rng: &mut Rng64) -> Vec<Stalk> {
    if viewport.is_empty() {
        return Vec::new();
    }

    let count = (viewport.width / STALK_SPACING_PX).floor() as usize;
    let mut stalks = Vec::with_capacity(count);

    for _ in 0..count {
        // 0 = far, approaching 1 = near. Near stalks are wider, taller,
        // more opaque and more saturated.
        let depth = rng.next_f64_01();
        let origin_x = rng.next_f64_01() * viewport.width;
        let width = 4.0 + depth * 15.0;
        let total_height = viewport.height * (0.6 + depth * 0.6);

        let segment_count = 6 + rng.next_below(4) as u32;
        let segment_height = total_height / f64::from(segment_count);

        // The base two segments never bear leaves.
        let mut leaves = Vec::new();
        for s in 2..segment_count {
            if !rng.next_bool(0.6) {
                continue;
            }
            leaves.push(Leaf {
                height_offset: f64::from(s) * segment_height,
                side: if rng.next_bool(0.5) {
                    LeafSide::Right
                } else {
                    LeafSide::Left
                },
                length: 20.0 + rng.next_f64_01() * 40.0 * depth,
                curve_angle: 0.2 + rng.next_f64_01() * 0.5,
            });
        }

        let lean_bias = (rng.next_f64_01() - 0.5) * 0.1;
        let sway_speed = 0.002 + rng.next_f64_01() * 0.003;
        let sway_phase = rng.next_range(0.0, std::f64::consts::TAU);

        stalks.push(Stalk {
            origin_x,
            width,
            total_height,
            segment_count,
            lean_bias,
            color: ColorToken::for_depth(depth),
            opacity: 0.1 + depth * 0.4,
            sway_speed,
            sway_phase,
            leaves,
        });
    }

    stalks
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vp(width: f64, height: f64) -> Viewport {
        Viewport::new(width, height, 1.0).unwrap()
    }

    #[test]
    fn population_count_scales_with_width() {
        let mut rng = Rng64::new(1);
        assert_eq!(generate(vp(1000.0, 800.0), &mut rng).len(), 10);
        let mut rng = Rng64::new(1);
        assert_eq!(generate(vp(500.0, 800.0), &mut rng).len(), 5);
        let mut rng = Rng64::new(1);
        assert_eq!(generate(vp(99.0, 800.0), &mut rng).len(), 0);
    }

    #[test]
    fn zero_viewport_yields_empty_population() {
        let mut rng = Rng64::new(1);
        assert!(generate(vp(0.0, 800.0), &mut rng).is_empty());
        let mut rng = Rng64::new(1);
        assert!(generate(vp(1000.0, 0.0), &mut rng).is_empty());
    }

    #[test]
    fn generation_is_deterministic_per_seed() {
        let a = generate(vp(1200.0, 900.0), &mut Rng64::new(77));
        let b = generate(vp(1200.0, 900.0), &mut Rng64::new(77));
        assert_eq!(a, b);
        let c = generate(vp(1200.0, 900.0), &mut Rng64::new(78));
        assert_ne!(a, c);
    }

    #[test]
    fn stalk_fields_stay_in_documented_ranges() {
        for seed in 0..8 {
            let stalks = generate(vp(1500.0, 800.0), &mut Rng64::new(seed));
            assert!(!stalks.is_empty());
            for s in &stalks {
                assert!((6..=9).contains(&s.segment_count));
                assert!((4.0..19.0).contains(&s.width));
                assert!((480.0..960.0).contains(&s.total_height));
                assert!((0.1..0.5).contains(&s.opacity));
                assert!((0.0..1500.0).contains(&s.origin_x));
                assert!(s.lean_bias.abs() <= 0.05);
                assert!((0.002..0.005).contains(&s.sway_speed));
                assert!((0.0..std::f64::consts::TAU).contains(&s.sway_phase));
            }
        }
    }

    #[test]
    fn leaves_attach_above_the_base_segments() {
        for seed in 0..8 {
            let stalks = generate(vp(1500.0, 800.0), &mut Rng64::new(seed));
            for s in &stalks {
                assert!(s.leaves.len() <= (s.segment_count - 2) as usize);
                for leaf in &s.leaves {
                    let index = leaf.height_offset / s.segment_height();
                    assert!(index.round() >= 2.0);
                    assert!((20.0..60.0).contains(&leaf.length));
                    assert!((0.2..0.7).contains(&leaf.curve_angle));
                }
            }
        }
    }

    #[test]
    fn color_buckets_match_depth_thresholds() {
        assert_eq!(ColorToken::for_depth(0.0), ColorToken::Slate);
        assert_eq!(ColorToken::for_depth(0.5), ColorToken::Slate);
        assert_eq!(ColorToken::for_depth(0.51), ColorToken::MidGreen);
        assert_eq!(ColorToken::for_depth(0.8), ColorToken::MidGreen);
        assert_eq!(ColorToken::for_depth(0.81), ColorToken::DeepGreen);
        assert_eq!(ColorToken::for_depth(0.999), ColorToken::DeepGreen);
    }

    #[test]
    fn opacity_is_monotonic_in_depth_formula() {
        // opacity = 0.1 + 0.4 * depth over the generated population:
        // recover depth and confirm ordering matches opacity ordering.
        let stalks = generate(vp(2000.0, 800.0), &mut Rng64::new(3));
        let mut pairs: Vec<(f64, f64)> = stalks
            .iter()
            .map(|s| ((s.opacity - 0.1) / 0.4, s.opacity))
            .collect();
        pairs.sort_by(|a, b| a.0.total_cmp(&b.0));
        for w in pairs.windows(2) {
            assert!(w[0].1 <= w[1].1);
        }
    }
}
