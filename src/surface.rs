use crate::core::{Affine, BezPath, Point, Viewport};
use crate::error::{InkwashError, InkwashResult};

/// A rendered frame in RGBA8.
#[derive(Clone, Debug)]
pub struct FrameRGBA {
    pub width: u32,
    pub height: u32,
    pub data: Vec<u8>,
    pub premultiplied: bool,
}

#[derive(Clone, Debug, Default)]
pub struct SurfaceSettings {
    /// Straight-alpha color the surface is cleared to before every draw;
    /// `None` clears to transparent.
    pub clear_rgba: Option<[u8; 4]>,
}

/// A viewport-sized raster target backed by `vello_cpu`.
///
/// Callers draw in CSS pixels; the backing pixmap is allocated at device
/// resolution and the device-pixel-ratio scale is applied once per draw, so
/// drawing code never sees device coordinates. The render context is kept
/// across frames and recreated only when the size changes.
pub struct Surface {
    viewport: Viewport,
    settings: SurfaceSettings,
    width_u16: u16,
    height_u16: u16,
    ctx: Option<vello_cpu::RenderContext>,
    pixmap: vello_cpu::Pixmap,
}

impl Surface {
    pub fn new(viewport: Viewport, settings: SurfaceSettings) -> InkwashResult<Self> {
        let (width_u16, height_u16) = device_dims(viewport)?;
        Ok(Self {
            viewport,
            settings,
            width_u16,
            height_u16,
            ctx: None,
            pixmap: vello_cpu::Pixmap::new(width_u16, height_u16),
        })
    }

    /// Reallocate the backing pixmap for a new viewport. The old contents
    /// are discarded; the next draw starts from the clear color.
    pub fn resize(&mut self, viewport: Viewport) -> InkwashResult<()> {
        let (width_u16, height_u16) = device_dims(viewport)?;
        if width_u16 != self.width_u16 || height_u16 != self.height_u16 {
            self.pixmap = vello_cpu::Pixmap::new(width_u16, height_u16);
            self.ctx = None;
            self.width_u16 = width_u16;
            self.height_u16 = height_u16;
        }
        self.viewport = viewport;
        Ok(())
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn is_empty(&self) -> bool {
        self.width_u16 == 0 || self.height_u16 == 0
    }

    /// Clear, run the draw closure, and rasterize into the backing pixmap.
    /// A no-op on a zero-sized surface.
    pub fn draw(
        &mut self,
        f: impl FnOnce(&mut Painter<'_>) -> InkwashResult<()>,
    ) -> InkwashResult<()> {
        if self.is_empty() {
            return Ok(());
        }

        let clear = self
            .settings
            .clear_rgba
            .map(premul_rgba8)
            .unwrap_or([0, 0, 0, 0]);
        clear_pixmap(&mut self.pixmap, clear);

        let mut ctx = match self.ctx.take() {
            None => vello_cpu::RenderContext::new(self.width_u16, self.height_u16),
            Some(ctx) if ctx.width() == self.width_u16 && ctx.height() == self.height_u16 => ctx,
            Some(_) => vello_cpu::RenderContext::new(self.width_u16, self.height_u16),
        };
        ctx.reset();
        ctx.set_blend_mode(vello_cpu::peniko::BlendMode::default());
        ctx.set_paint_transform(vello_cpu::kurbo::Affine::IDENTITY);
        ctx.set_transform(affine_to_cpu(Affine::scale(self.viewport.dpr)));

        let mut painter = Painter { ctx: &mut ctx };
        f(&mut painter)?;

        ctx.flush();
        ctx.render_to_pixmap(&mut self.pixmap);
        self.ctx = Some(ctx);
        Ok(())
    }

    /// Premultiplied RGBA8 bytes of the backing pixmap.
    pub fn data(&self) -> &[u8] {
        self.pixmap.data_as_u8_slice()
    }

    pub fn readback(&self) -> FrameRGBA {
        FrameRGBA {
            width: u32::from(self.width_u16),
            height: u32::from(self.height_u16),
            data: self.pixmap.data_as_u8_slice().to_vec(),
            premultiplied: true,
        }
    }
}

/// Draw handle passed to `Surface::draw` closures. Paint state is sticky:
/// `set_color` applies to every fill and stroke until the next call.
pub struct Painter<'a> {
    ctx: &'a mut vello_cpu::RenderContext,
}

impl Painter<'_> {
    /// Set the paint from straight RGB and an alpha in [0, 1].
    pub fn set_color(&mut self, rgb: [u8; 3], alpha: f64) {
        let a = (alpha.clamp(0.0, 1.0) * 255.0).round() as u8;
        self.ctx
            .set_paint(vello_cpu::peniko::Color::from_rgba8(rgb[0], rgb[1], rgb[2], a));
    }

    /// Run `f` inside a group opacity layer so overlapping shapes dim as a
    /// unit. Full opacity skips the layer.
    pub fn with_group_opacity(
        &mut self,
        opacity: f64,
        f: impl FnOnce(&mut Self) -> InkwashResult<()>,
    ) -> InkwashResult<()> {
        let opacity = opacity.clamp(0.0, 1.0) as f32;
        if opacity < 1.0 {
            self.ctx.push_opacity_layer(opacity);
        }
        let out = f(self);
        if opacity < 1.0 {
            self.ctx.pop_layer();
        }
        out
    }

    pub fn fill_path(&mut self, path: &BezPath) {
        let cpu_path = bezpath_to_cpu(path);
        self.ctx.fill_path(&cpu_path);
    }

    pub fn fill_ellipse(&mut self, center: Point, rx: f64, ry: f64) {
        let e = kurbo::Ellipse::new((center.x, center.y), (rx, ry), 0.0);
        let mut p = vello_cpu::kurbo::BezPath::new();
        for el in e.path_elements(0.1) {
            p.push(el);
        }
        self.ctx.fill_path(&p);
    }

    /// Stroke a single segment with round caps and joins.
    pub fn stroke_segment(&mut self, a: Point, b: Point, width: f64) {
        self.ctx.set_stroke(
            vello_cpu::kurbo::Stroke::new(width)
                .with_caps(vello_cpu::kurbo::Cap::Round)
                .with_join(vello_cpu::kurbo::Join::Round),
        );
        let mut p = vello_cpu::kurbo::BezPath::new();
        p.move_to(point_to_cpu(a));
        p.line_to(point_to_cpu(b));
        self.ctx.stroke_path(&p);
    }
}

fn device_dims(viewport: Viewport) -> InkwashResult<(u16, u16)> {
    let width: u16 = viewport
        .device_width()
        .try_into()
        .map_err(|_| InkwashError::render("surface width exceeds u16"))?;
    let height: u16 = viewport
        .device_height()
        .try_into()
        .map_err(|_| InkwashError::render("surface height exceeds u16"))?;
    Ok((width, height))
}

fn premul_rgba8(rgba: [u8; 4]) -> [u8; 4] {
    let [r, g, b, a] = rgba;
    let a16 = u16::from(a);
    let premul = |c: u8| -> u8 { (((u16::from(c) * a16) + 127) / 255) as u8 };
    [premul(r), premul(g), premul(b), a]
}

fn clear_pixmap(pixmap: &mut vello_cpu::Pixmap, rgba: [u8; 4]) {
    for px in pixmap.data_as_u8_slice_mut().chunks_exact_mut(4) {
        px.copy_from_slice(&rgba);
    }
}

fn affine_to_cpu(a: Affine) -> vello_cpu::kurbo::Affine {
    vello_cpu::kurbo::Affine::new(a.as_coeffs())
}

fn point_to_cpu(p: Point) -> vello_cpu::kurbo::Point {
    vello_cpu::kurbo::Point::new(p.x, p.y)
}

fn bezpath_to_cpu(path: &BezPath) -> vello_cpu::kurbo::BezPath {
    use kurbo::PathEl;

    let mut out = vello_cpu::kurbo::BezPath::new();
    for &el in path.elements() {
        match el {
            PathEl::MoveTo(p) => out.move_to(point_to_cpu(p)),
            PathEl::LineTo(p) => out.line_to(point_to_cpu(p)),
            PathEl::QuadTo(p1, p2) => out.quad_to(point_to_cpu(p1), point_to_cpu(p2)),
            PathEl::CurveTo(p1, p2, p3) => {
                out.curve_to(point_to_cpu(p1), point_to_cpu(p2), point_to_cpu(p3))
            }
            PathEl::ClosePath => out.close_path(),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn device_dims_follow_dpr() {
        let vp = Viewport::new(1280.0, 720.0, 1.5).unwrap();
        let surface = Surface::new(vp, SurfaceSettings::default()).unwrap();
        let frame = surface.readback();
        assert_eq!((frame.width, frame.height), (1920, 1080));
        assert_eq!(frame.data.len(), 1920 * 1080 * 4);
        assert!(frame.premultiplied);
    }

    #[test]
    fn zero_viewport_surface_skips_draw() {
        let vp = Viewport::new(0.0, 720.0, 1.0).unwrap();
        let mut surface = Surface::new(vp, SurfaceSettings::default()).unwrap();
        assert!(surface.is_empty());

        let mut called = false;
        surface
            .draw(|_| {
                called = true;
                Ok(())
            })
            .unwrap();
        assert!(!called);
        assert!(surface.readback().data.is_empty());
    }

    #[test]
    fn oversized_viewport_is_rejected() {
        let vp = Viewport::new(70_000.0, 100.0, 1.0).unwrap();
        assert!(Surface::new(vp, SurfaceSettings::default()).is_err());
        // DPR can push an otherwise fine size over the limit.
        let vp = Viewport::new(40_000.0, 100.0, 2.0).unwrap();
        assert!(Surface::new(vp, SurfaceSettings::default()).is_err());
    }

    #[test]
    fn clear_color_fills_the_frame() {
        let vp = Viewport::new(4.0, 4.0, 1.0).unwrap();
        let mut surface = Surface::new(
            vp,
            SurfaceSettings {
                clear_rgba: Some([253, 251, 247, 255]),
            },
        )
        .unwrap();
        surface.draw(|_| Ok(())).unwrap();
        for px in surface.data().chunks_exact(4) {
            assert_eq!(px, [253, 251, 247, 255]);
        }
    }

    #[test]
    fn resize_reallocates_the_pixmap() {
        let vp = Viewport::new(100.0, 100.0, 1.0).unwrap();
        let mut surface = Surface::new(vp, SurfaceSettings::default()).unwrap();
        surface
            .resize(Viewport::new(50.0, 40.0, 1.0).unwrap())
            .unwrap();
        let frame = surface.readback();
        assert_eq!((frame.width, frame.height), (50, 40));
        assert_eq!(frame.data.len(), 50 * 40 * 4);
    }
}
