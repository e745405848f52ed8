use crate::core::{BezPath, Point, Viewport};
use crate::error::InkwashResult;
use crate::grove::{self, Stalk};
use crate::rng::Rng64;
use crate::surface::{Painter, Surface};

/// Peak horizontal sway displacement at a stalk tip, in CSS pixels.
pub const SWAY_AMPLITUDE_PX: f64 = 15.0;

/// Instantaneous sway amplitude for one stalk at frame `t`.
pub fn sway_at(t: u64, sway_speed: f64, sway_phase: f64) -> f64 {
    ((t as f64) * sway_speed + sway_phase).sin() * SWAY_AMPLITUDE_PX
}

/// Horizontal displacement at normalized height `progress` (0 = base,
/// 1 = tip). Quadratic growth keeps the base pinned and whips the tip:
/// displacement is exactly 0 at the base and exactly `sway` at the tip.
pub fn sway_displacement(sway: f64, progress: f64) -> f64 {
    sway * progress * progress
}

/// Back-to-front draw order: ascending opacity, so faint (far) stalks are
/// painted first and near ones occlude them. Opacity never changes after
/// generation, but the population is small enough to re-sort every frame.
pub fn painter_order(stalks: &[Stalk]) -> Vec<usize> {
    let mut order: Vec<usize> = (0..stalks.len()).collect();
    order.sort_by(|&a, &b| stalks[a].opacity.total_cmp(&stalks[b].opacity));
    order
}

/// The background parallax scene: owns the stalk population and a global
/// frame counter, and paints the layered grove each frame.
pub struct GroveScene {
    viewport: Viewport,
    seed: u64,
    stalks: Vec<Stalk>,
    t: u64,
}

impl GroveScene {
    pub fn new(viewport: Viewport, seed: u64) -> Self {
        let mut scene = Self {
            viewport,
            seed,
            stalks: Vec::new(),
            t: 0,
        };
        scene.regenerate();
        scene
    }

    /// Rebuild the population from scratch for a new viewport. Stalk count
    /// and heights are dimension-derived, so resize never updates in place.
    pub fn resize(&mut self, viewport: Viewport) {
        self.viewport = viewport;
        self.regenerate();
    }

    #[tracing::instrument(skip(self), fields(width = self.viewport.width, height = self.viewport.height))]
    fn regenerate(&mut self) {
        let mut rng = Rng64::new(self.seed);
        self.stalks = grove::generate(self.viewport, &mut rng);
    }

    /// Advance the global frame counter by one.
    pub fn tick(&mut self) {
        self.t += 1;
    }

    pub fn time(&self) -> u64 {
        self.t
    }

    pub fn stalks(&self) -> &[Stalk] {
        &self.stalks
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    /// Paint the grove into `surface`. The surface is cleared even when the
    /// population is empty, so a degenerate viewport still yields a clean
    /// background.
    pub fn render(&self, surface: &mut Surface) -> InkwashResult<()> {
        let order = painter_order(&self.stalks);
        let t = self.t;
        let base_y = self.viewport.height;
        let stalks = &self.stalks;

        surface.draw(|p| {
            for &i in &order {
                let s = &stalks[i];
                let sway = sway_at(t, s.sway_speed, s.sway_phase);
                p.with_group_opacity(s.opacity, |p| {
                    p.set_color(s.color.rgb8(), 1.0);
                    draw_stalk(p, s, sway, base_y);
                    Ok(())
                })?;
            }
            Ok(())
        })
    }
}

fn draw_stalk(p: &mut Painter<'_>, s: &Stalk, sway: f64, base_y: f64) {
    let n = f64::from(s.segment_count);
    let seg_h = s.segment_height();
    let half = s.width / 2.0;
    let inset = s.width * 0.05;

    // x of the segment boundary at index j (0 = base, segment_count = tip).
    let boundary_x = |j: u32| -> f64 {
        let progress = f64::from(j) / n;
        s.origin_x + sway_displacement(sway, progress) + s.lean_bias * f64::from(j)
    };

    for i in 0..s.segment_count {
        let x_bottom = boundary_x(i);
        let x_top = boundary_x(i + 1);
        let y_bottom = base_y - f64::from(i) * seg_h;
        let y_top = base_y - f64::from(i + 1) * seg_h;

        // Trapezoid: full width at the bottom edge, tapered to 90% at the top.
        let mut seg = BezPath::new();
        seg.move_to((x_bottom - half, y_bottom));
        seg.line_to((x_top - half + inset, y_top));
        seg.line_to((x_top + half - inset, y_top));
        seg.line_to((x_bottom + half, y_bottom));
        seg.close_path();
        p.fill_path(&seg);

        // Joint knuckle at every internal boundary, skipped at the base.
        if i > 0 {
            p.fill_ellipse(Point::new(x_bottom, y_bottom), half + 2.0, 3.0);
        }
    }

    for leaf in &s.leaves {
        let progress = leaf.height_offset / s.total_height;
        let leaf_x =
            s.origin_x + sway_displacement(sway, progress) + s.lean_bias * progress * n;
        let leaf_y = base_y - leaf.height_offset;
        let dir = leaf.side.signum();

        // Tapered blade: out to the tip along one quadratic, back along
        // another, with the tip trailing the sway slightly.
        let tip = (leaf_x + leaf.length * dir + sway * 0.5, leaf_y + leaf.length * 0.5);
        let mut blade = BezPath::new();
        blade.move_to((leaf_x, leaf_y));
        blade.quad_to((leaf_x + leaf.length * 0.2 * dir, leaf_y - 5.0), tip);
        blade.quad_to(
            (leaf_x + leaf.length * 0.5 * dir, leaf_y + 10.0),
            (leaf_x, leaf_y + 3.0),
        );
        blade.close_path();
        p.fill_path(&blade);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grove::{ColorToken, LeafSide};

    fn vp(width: f64, height: f64) -> Viewport {
        Viewport::new(width, height, 1.0).unwrap()
    }

    fn bare_stalk(opacity: f64) -> Stalk {
        Stalk {
            origin_x: 50.0,
            width: 10.0,
            total_height: 400.0,
            segment_count: 8,
            lean_bias: 0.0,
            color: ColorToken::MidGreen,
            opacity,
            sway_speed: 0.003,
            sway_phase: 0.0,
            leaves: vec![crate::grove::Leaf {
                height_offset: 200.0,
                side: LeafSide::Right,
                length: 30.0,
                curve_angle: 0.4,
            }],
        }
    }

    #[test]
    fn displacement_is_pinned_at_base_and_full_at_tip() {
        for sway in [-15.0, -3.2, 0.0, 7.7, 15.0] {
            assert_eq!(sway_displacement(sway, 0.0), 0.0);
            assert_eq!(sway_displacement(sway, 1.0), sway);
        }
    }

    #[test]
    fn displacement_grows_quadratically() {
        let half = sway_displacement(10.0, 0.5);
        assert!((half - 2.5).abs() < 1e-12);
        assert!(half < 5.0); // below the linear midpoint
    }

    #[test]
    fn sway_is_bounded_by_amplitude() {
        for t in 0..500 {
            let s = sway_at(t, 0.004, 1.3);
            assert!(s.abs() <= SWAY_AMPLITUDE_PX);
        }
    }

    #[test]
    fn painter_order_sorts_faint_first() {
        let stalks = vec![bare_stalk(0.45), bare_stalk(0.12), bare_stalk(0.3)];
        assert_eq!(painter_order(&stalks), vec![1, 2, 0]);
    }

    #[test]
    fn tick_advances_time_monotonically() {
        let mut scene = GroveScene::new(vp(300.0, 300.0), 5);
        assert_eq!(scene.time(), 0);
        scene.tick();
        scene.tick();
        assert_eq!(scene.time(), 2);
    }

    #[test]
    fn resize_regenerates_population_from_scratch() {
        let mut scene = GroveScene::new(vp(1000.0, 800.0), 9);
        let original = scene.stalks().to_vec();
        assert_eq!(original.len(), 10);

        scene.resize(vp(500.0, 800.0));
        assert_eq!(scene.stalks().len(), 5);

        // Same seed and dimensions reproduce the identical population.
        scene.resize(vp(1000.0, 800.0));
        assert_eq!(scene.stalks(), &original[..]);
    }

    #[test]
    fn resize_to_zero_empties_the_scene() {
        let mut scene = GroveScene::new(vp(1000.0, 800.0), 9);
        scene.resize(vp(0.0, 800.0));
        assert!(scene.stalks().is_empty());
    }
}
