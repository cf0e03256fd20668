//! Color-space helpers: 8-bit HSV conversion (hue range [0, 180), the
//! convention camera pipelines use for byte-sized hue), a jet-style
//! colormap, and an integer luminance approximation.

/// RGB -> HSV with hue in [0, 180).
///
/// The conversion is value-preserving and, for fully saturated inputs at
/// hue multiples of 10, exactly invertible through [`hsv_to_rgb`]; the
/// Rainbow effect depends on that for drift-free repeated rotation.
pub fn rgb_to_hsv(r: u8, g: u8, b: u8) -> (u8, u8, u8) {
    let v = r.max(g).max(b);
    let min = r.min(g).min(b);
    let delta = v - min;

    let s = if v == 0 {
        0
    } else {
        ((255.0 * delta as f32 / v as f32).round()) as u8
    };

    let h = if delta == 0 {
        0
    } else {
        let delta = delta as f32;
        let raw = if v == r {
            30.0 * (g as f32 - b as f32) / delta
        } else if v == g {
            60.0 + 30.0 * (b as f32 - r as f32) / delta
        } else {
            120.0 + 30.0 * (r as f32 - g as f32) / delta
        };
        let rounded = raw.round() as i32;
        rounded.rem_euclid(180) as u8
    };

    (h, s, v)
}

/// HSV (hue in [0, 180)) -> RGB.
pub fn hsv_to_rgb(h: u8, s: u8, v: u8) -> (u8, u8, u8) {
    if s == 0 {
        return (v, v, v);
    }
    let sector = (h / 30) % 6;
    let f = (h % 30) as f32 / 30.0;
    let v_f = v as f32;
    let s_f = s as f32 / 255.0;
    let p = (v_f * (1.0 - s_f)).round() as u8;
    let q = (v_f * (1.0 - s_f * f)).round() as u8;
    let t = (v_f * (1.0 - s_f * (1.0 - f))).round() as u8;
    match sector {
        0 => (v, t, p),
        1 => (q, v, p),
        2 => (p, v, t),
        3 => (p, q, v),
        4 => (t, p, v),
        _ => (v, p, q),
    }
}

/// Integer luminance approximation (ITU-R 601 weights).
pub fn luma(rgb: [u8; 3]) -> u8 {
    let [r, g, b] = rgb;
    ((299 * r as u32 + 587 * g as u32 + 114 * b as u32 + 500) / 1000) as u8
}

/// Jet-style colormap: gray level 0 maps to deep blue, 255 to deep red.
pub fn jet(gray: u8) -> [u8; 3] {
    let x = gray as f32 / 255.0;
    let r = (1.5 - (4.0 * x - 3.0).abs()).clamp(0.0, 1.0);
    let g = (1.5 - (4.0 * x - 2.0).abs()).clamp(0.0, 1.0);
    let b = (1.5 - (4.0 * x - 1.0).abs()).clamp(0.0, 1.0);
    [
        (r * 255.0).round() as u8,
        (g * 255.0).round() as u8,
        (b * 255.0).round() as u8,
    ]
}
