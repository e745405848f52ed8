use crate::error::{InkwashError, InkwashResult};

pub type PremulRgba8 = [u8; 4];

/// Porter-Duff source-over for a single premultiplied pixel, with an extra
/// uniform source opacity.
pub fn over(dst: PremulRgba8, src: PremulRgba8, opacity: f32) -> PremulRgba8 {
    let opacity = opacity.clamp(0.0, 1.0);
    if opacity <= 0.0 || src[3] == 0 {
        return dst;
    }

    let op = ((opacity * 255.0).round() as i32).clamp(0, 255) as u16;
    let sa = mul_div255(u16::from(src[3]), op);
    if sa == 0 {
        return dst;
    }

    let inv = 255u16 - u16::from(sa);

    let mut out = [0u8; 4];
    out[3] = add_sat_u8(sa, mul_div255(u16::from(dst[3]), inv));

    for i in 0..3 {
        let sc = mul_div255(u16::from(src[i]), op);
        let dc = mul_div255(u16::from(dst[i]), inv);
        out[i] = add_sat_u8(sc, dc);
    }
    out
}

pub fn over_in_place(dst: &mut [u8], src: &[u8], opacity: f32) -> InkwashResult<()> {
    if dst.len() != src.len() || !dst.len().is_multiple_of(4) {
        return Err(InkwashError::render(
            "over_in_place expects equal-length rgba8 buffers",
        ));
    }
    for (d, s) in dst.chunks_exact_mut(4).zip(src.chunks_exact(4)) {
        let out = over([d[0], d[1], d[2], d[3]], [s[0], s[1], s[2], s[3]], opacity);
        d.copy_from_slice(&out);
    }
    Ok(())
}

/// Source-over with the multiply blend, for the ink trail overlay: where the
/// source is opaque the result is the channel product, so ink can only darken
/// what it covers.
pub fn multiply_over_in_place(dst: &mut [u8], src: &[u8], opacity: f32) -> InkwashResult<()> {
    if dst.len() != src.len() || !dst.len().is_multiple_of(4) {
        return Err(InkwashError::render(
            "multiply_over_in_place expects equal-length rgba8 buffers",
        ));
    }
    blend_over_in_place(dst, src, opacity, |s, d| s * d);
    Ok(())
}

/// Porter-Duff source-over with a separable blend applied to unpremultiplied
/// channels:
///   out_a = sa + da * (1 - sa)
///   out_p = sp * (1 - da) + dp * (1 - sa) + B(sc, dc) * sa * da
fn blend_over_in_place<F>(dst: &mut [u8], src: &[u8], opacity: f32, blend_fn: F)
where
    F: Fn(f32, f32) -> f32,
{
    let opacity = opacity.clamp(0.0, 1.0);
    if opacity <= 0.0 {
        return;
    }

    for (d, s) in dst.chunks_exact_mut(4).zip(src.chunks_exact(4)) {
        let sp_r = (s[0] as f32 / 255.0) * opacity;
        let sp_g = (s[1] as f32 / 255.0) * opacity;
        let sp_b = (s[2] as f32 / 255.0) * opacity;
        let sa = (s[3] as f32 / 255.0) * opacity;

        let dp_r = d[0] as f32 / 255.0;
        let dp_g = d[1] as f32 / 255.0;
        let dp_b = d[2] as f32 / 255.0;
        let da = d[3] as f32 / 255.0;

        let inv_sa = 1.0 - sa;
        let out_a = (sa + da * inv_sa).clamp(0.0, 1.0);

        let unpremul = |p: f32, a: f32| if a > 0.0 { (p / a).clamp(0.0, 1.0) } else { 0.0 };
        let b_r = blend_fn(unpremul(sp_r, sa), unpremul(dp_r, da)).clamp(0.0, 1.0);
        let b_g = blend_fn(unpremul(sp_g, sa), unpremul(dp_g, da)).clamp(0.0, 1.0);
        let b_b = blend_fn(unpremul(sp_b, sa), unpremul(dp_b, da)).clamp(0.0, 1.0);

        let out_p_r = (sp_r * (1.0 - da) + dp_r * inv_sa + b_r * sa * da).clamp(0.0, 1.0);
        let out_p_g = (sp_g * (1.0 - da) + dp_g * inv_sa + b_g * sa * da).clamp(0.0, 1.0);
        let out_p_b = (sp_b * (1.0 - da) + dp_b * inv_sa + b_b * sa * da).clamp(0.0, 1.0);

        d[0] = (out_p_r * 255.0).round().clamp(0.0, 255.0) as u8;
        d[1] = (out_p_g * 255.0).round().clamp(0.0, 255.0) as u8;
        d[2] = (out_p_b * 255.0).round().clamp(0.0, 255.0) as u8;
        d[3] = (out_a * 255.0).round().clamp(0.0, 255.0) as u8;
    }
}

/// Flatten an RGBA8 frame over an opaque background, for image export.
pub fn flatten_to_opaque_rgba8(
    dst: &mut [u8],
    src: &[u8],
    src_is_premul: bool,
    bg_rgba: [u8; 4],
) -> InkwashResult<()> {
    if dst.len() != src.len() || !dst.len().is_multiple_of(4) {
        return Err(InkwashError::render(
            "flatten_to_opaque_rgba8 expects equal-length rgba8 buffers",
        ));
    }

    let bg_r = bg_rgba[0] as u16;
    let bg_g = bg_rgba[1] as u16;
    let bg_b = bg_rgba[2] as u16;

    for (d, s) in dst.chunks_exact_mut(4).zip(src.chunks_exact(4)) {
        let a = s[3] as u16;
        if a == 255 {
            d.copy_from_slice(s);
            d[3] = 255;
            continue;
        }

        let inv = 255u16 - a;

        let (r, g, b) = if src_is_premul {
            (
                s[0] as u16 + u16::from(mul_div255(bg_r, inv)),
                s[1] as u16 + u16::from(mul_div255(bg_g, inv)),
                s[2] as u16 + u16::from(mul_div255(bg_b, inv)),
            )
        } else {
            (
                u16::from(mul_div255(s[0] as u16, a)) + u16::from(mul_div255(bg_r, inv)),
                u16::from(mul_div255(s[1] as u16, a)) + u16::from(mul_div255(bg_g, inv)),
                u16::from(mul_div255(s[2] as u16, a)) + u16::from(mul_div255(bg_b, inv)),
            )
        };

        d[0] = r.min(255) as u8;
        d[1] = g.min(255) as u8;
        d[2] = b.min(255) as u8;
        d[3] = 255;
    }

    Ok(())
}

fn mul_div255(x: u16, y: u16) -> u8 {
    (((u32::from(x) * u32::from(y)) + 127) / 255) as u8
}

fn add_sat_u8(a: u8, b: u8) -> u8 {
    a.saturating_add(b)
}
