//! HSV conversion and the vibrancy filter applied to planet textures.

use crate::material::clamp_color;
use crate::Color;

/// RGB in [0, 1] to HSV with hue, saturation and value all in [0, 1].
pub fn rgb_to_hsv(rgb: Color) -> Color {
    let max = rgb.max_element();
    let min = rgb.min_element();
    let value = max;

    if max == min {
        return Color::new(0.0, 0.0, value);
    }

    let delta = max - min;
    let saturation = delta / max;
    let rc = (max - rgb.x) / delta;
    let gc = (max - rgb.y) / delta;
    let bc = (max - rgb.z) / delta;

    let h = if rgb.x == max {
        bc - gc
    } else if rgb.y == max {
        2.0 + rc - bc
    } else {
        4.0 + gc - rc
    };

    Color::new((h / 6.0).rem_euclid(1.0), saturation, value)
}

/// HSV with all channels in [0, 1] back to RGB in [0, 1].
pub fn hsv_to_rgb(hsv: Color) -> Color {
    let (h, s, v) = (hsv.x, hsv.y, hsv.z);
    if s == 0.0 {
        return Color::splat(v);
    }

    let sector = (h * 6.0).floor();
    let f = h * 6.0 - sector;
    let p = v * (1.0 - s);
    let q = v * (1.0 - s * f);
    let t = v * (1.0 - s * (1.0 - f));

    match (sector as i32).rem_euclid(6) {
        0 => Color::new(v, t, p),
        1 => Color::new(q, v, p),
        2 => Color::new(p, v, t),
        3 => Color::new(p, q, v),
        4 => Color::new(t, p, v),
        _ => Color::new(v, p, q),
    }
}

/// Boost saturation and contrast of a 0-255 texture color.
///
/// Saturation is doubled (capped at 1), value goes through `v^0.8`, and
/// pixels whose red channel dominates get red amplified by 1.2.
pub fn enhance_vibrancy(rgb: Color) -> Color {
    let mut hsv = rgb_to_hsv(rgb / 255.0);
    hsv.y = (hsv.y * 2.0).min(1.0);
    hsv.z = hsv.z.max(0.0).powf(0.8);

    let mut out = hsv_to_rgb(hsv) * 255.0;
    if out.x > out.y && out.x > out.z {
        out.x *= 1.2;
    }
    clamp_color(out)
}
