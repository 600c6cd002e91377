//! EPU blend operators
//!
//! Pure per-texel binary operators over (destination, source, alpha).
//! The formulas are part of the decoder contract: every platform's
//! compositor must apply them identically.

use gx_common::EpuBlend;

/// Apply a blend mode: `dst` is the accumulated layer value, `src` the
/// generator output, `a` in [0, 1].
pub fn apply(blend: EpuBlend, dst: [f32; 3], src: [f32; 3], a: f32) -> [f32; 3] {
    let mut out = [0.0; 3];
    match blend {
        EpuBlend::Add => {
            for i in 0..3 {
                out[i] = dst[i] + src[i] * a;
            }
        }
        EpuBlend::Multiply => {
            for i in 0..3 {
                out[i] = dst[i] * mix(1.0, src[i], a);
            }
        }
        EpuBlend::Max => {
            for i in 0..3 {
                out[i] = dst[i].max(src[i] * a);
            }
        }
        EpuBlend::Lerp => {
            for i in 0..3 {
                out[i] = mix(dst[i], src[i], a);
            }
        }
        EpuBlend::Screen => {
            for i in 0..3 {
                out[i] = 1.0 - (1.0 - dst[i]) * (1.0 - src[i] * a);
            }
        }
        EpuBlend::HsvMod => {
            let (h, s, v) = rgb_to_hsv(dst);
            // src acts as (hue shift, saturation scale, value scale),
            // each attenuated by alpha
            let h = (h + src[0] * a).rem_euclid(1.0);
            let s = (s * mix(1.0, src[1] * 2.0, a)).clamp(0.0, 1.0);
            let v = v * mix(1.0, src[2] * 2.0, a);
            out = hsv_to_rgb(h, s, v);
        }
        EpuBlend::Min => {
            for i in 0..3 {
                out[i] = dst[i].min(src[i] * a);
            }
        }
        EpuBlend::Overlay => {
            for i in 0..3 {
                let overlaid = if dst[i] < 0.5 {
                    2.0 * dst[i] * src[i]
                } else {
                    1.0 - 2.0 * (1.0 - dst[i]) * (1.0 - src[i])
                };
                out[i] = mix(dst[i], overlaid, a);
            }
        }
    }
    out
}

#[inline]
pub(crate) fn mix(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

fn rgb_to_hsv(rgb: [f32; 3]) -> (f32, f32, f32) {
    let [r, g, b] = rgb;
    let max = r.max(g).max(b);
    let min = r.min(g).min(b);
    let delta = max - min;

    let h = if delta <= 1e-6 {
        0.0
    } else if max == r {
        (((g - b) / delta).rem_euclid(6.0)) / 6.0
    } else if max == g {
        ((b - r) / delta + 2.0) / 6.0
    } else {
        ((r - g) / delta + 4.0) / 6.0
    };
    let s = if max <= 1e-6 { 0.0 } else { delta / max };
    (h, s, max)
}

fn hsv_to_rgb(h: f32, s: f32, v: f32) -> [f32; 3] {
    let h6 = h.rem_euclid(1.0) * 6.0;
    let c = v * s;
    let x = c * (1.0 - (h6.rem_euclid(2.0) - 1.0).abs());
    let m = v - c;
    let (r, g, b) = match h6 as u32 {
        0 => (c, x, 0.0),
        1 => (x, c, 0.0),
        2 => (0.0, c, x),
        3 => (0.0, x, c),
        4 => (x, 0.0, c),
        _ => (c, 0.0, x),
    };
    [r + m, g + m, b + m]
}

#[cfg(test)]
mod tests {
    use super::*;

    const DST: [f32; 3] = [0.25, 0.5, 0.75];
    const SRC: [f32; 3] = [0.6, 0.3, 0.1];

    fn assert_rgb_eq(a: [f32; 3], b: [f32; 3]) {
        for i in 0..3 {
            assert!((a[i] - b[i]).abs() < 1e-5, "channel {i}: {} vs {}", a[i], b[i]);
        }
    }

    #[test]
    fn add_formula() {
        assert_rgb_eq(
            apply(EpuBlend::Add, DST, SRC, 0.5),
            [0.25 + 0.3, 0.5 + 0.15, 0.75 + 0.05],
        );
    }

    #[test]
    fn multiply_at_zero_alpha_is_identity() {
        assert_rgb_eq(apply(EpuBlend::Multiply, DST, SRC, 0.0), DST);
    }

    #[test]
    fn lerp_endpoints() {
        assert_rgb_eq(apply(EpuBlend::Lerp, DST, SRC, 0.0), DST);
        assert_rgb_eq(apply(EpuBlend::Lerp, DST, SRC, 1.0), SRC);
    }

    #[test]
    fn screen_never_darkens() {
        let out = apply(EpuBlend::Screen, DST, SRC, 1.0);
        for i in 0..3 {
            assert!(out[i] >= DST[i] - 1e-6);
        }
    }

    #[test]
    fn max_and_min_are_componentwise() {
        assert_rgb_eq(apply(EpuBlend::Max, DST, SRC, 1.0), [0.6, 0.5, 0.75]);
        assert_rgb_eq(apply(EpuBlend::Min, DST, SRC, 1.0), [0.25, 0.3, 0.1]);
    }

    #[test]
    fn overlay_at_zero_alpha_is_identity() {
        assert_rgb_eq(apply(EpuBlend::Overlay, DST, SRC, 0.0), DST);
    }

    #[test]
    fn hsv_round_trip() {
        for rgb in [[0.8, 0.2, 0.1], [0.1, 0.9, 0.4], [0.3, 0.3, 0.3]] {
            let (h, s, v) = rgb_to_hsv(rgb);
            assert_rgb_eq(hsv_to_rgb(h, s, v), rgb);
        }
    }

    #[test]
    fn hsv_mod_zero_shift_preserves_hue() {
        // A zero hue shift with neutral scales (0.5 -> x1.0) is identity
        let out = apply(EpuBlend::HsvMod, DST, [0.0, 0.5, 0.5], 1.0);
        assert_rgb_eq(out, DST);
    }
}
